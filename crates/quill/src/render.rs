//! Terminal rendering of segments with highlighted markup spans.

use console::Style;
use quill_segmenter::{MarkupRule, MarkupScanner, Segment, SegmentConfig};

/// Render a segment's decorated content, coloring markup spans.
///
/// The span state resumes from the segment's carried markup id, so a quote
/// opened in an earlier segment stays colored. Prefix and suffix are dimmed.
pub(crate) fn render_segment(segment: &Segment, config: &SegmentConfig, colored: bool) -> String {
    if !colored {
        return segment.decorated.clone();
    }

    let scanner = MarkupScanner::new(&config.rules);
    let initial = scanner.resolve(segment.carried_markup_id.as_deref());

    let prefix = if segment.ordinal > 1 { config.prefix.as_str() } else { "" };
    let suffix = if segment.ordinal < segment.total {
        config.suffix.as_str()
    } else {
        ""
    };

    let dim = Style::new().dim().force_styling(true);
    let mut rendered = dim.apply_to(prefix).to_string();
    for span in scanner.spans(&segment.raw, initial) {
        match span.rule {
            Some(rule) => rendered.push_str(&rule_style(rule).apply_to(span.text).to_string()),
            None => rendered.push_str(span.text),
        }
    }
    rendered.push_str(&dim.apply_to(suffix).to_string());
    rendered
}

/// Header line for a segment, e.g. `Part 2/5 · 240 chars`.
pub(crate) fn segment_header(segment: &Segment) -> String {
    format!(
        "Part {}/{} · {} chars",
        segment.ordinal,
        segment.total,
        segment.char_len()
    )
}

/// Terminal style for a rule's color.
///
/// Accepts `#rrggbb` (mapped to the nearest xterm-256 color) or a color name
/// understood by [`Style::from_dotted_str`]. Anything else renders unstyled.
pub(crate) fn rule_style(rule: &MarkupRule) -> Style {
    let style = match hex_to_ansi256(&rule.color) {
        Some(code) => Style::new().color256(code),
        None if rule.color.is_empty() || rule.color.starts_with('#') => Style::new(),
        None => Style::from_dotted_str(&rule.color),
    };
    style.force_styling(true)
}

/// Map a `#rrggbb` color onto the xterm 6x6x6 color cube.
fn hex_to_ansi256(color: &str) -> Option<u8> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);

    // Cube levels sit at 0, 95, 135, 175, 215, 255
    let level = |c: u8| match c {
        0..48 => 0,
        48..115 => 1,
        _ => (c - 35) / 40,
    };
    Some(16 + 36 * level(r) + 6 * level(g) + level(b))
}
