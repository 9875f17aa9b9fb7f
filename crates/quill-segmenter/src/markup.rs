//! Paired-delimiter markup scanning.
//!
//! A [`MarkupRule`] describes a span such as quoted speech (`"..."`) or an
//! emphasized action (`*...*`). [`MarkupScanner`] walks text left to right and
//! tracks which rule, if any, is open at each position. Rules are tried in
//! declaration order and the first start marker that matches wins, with no
//! longest-match priority.

/// A paired start/end marker that delimits a highlighted span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRule {
    /// Stable identifier, carried across segment boundaries.
    pub id: String,
    /// Human-readable name (e.g. "Speech").
    pub name: String,
    /// Marker that opens the span. An empty marker never opens.
    pub start: String,
    /// Marker that closes the span. An empty marker never closes.
    pub end: String,
    /// Display color, usually a `#rrggbb` hex string.
    pub color: String,
}

impl MarkupRule {
    /// Create a rule with the given id and markers.
    ///
    /// The name defaults to the id and the color is left empty.
    pub fn new(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            start: start.into(),
            end: end.into(),
            color: String::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// A run of text with uniform markup state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// Text of the run. Markers belong to the run they open or close.
    pub text: &'a str,
    /// Rule coloring this run, `None` for plain text.
    pub rule: Option<&'a MarkupRule>,
}

/// One transition of the scanner at a given position.
enum Step<'a> {
    Open(&'a MarkupRule),
    Close(&'a MarkupRule),
    Advance,
}

/// Markup state machine over an ordered rule set.
#[derive(Debug, Clone, Copy)]
pub struct MarkupScanner<'a> {
    rules: &'a [MarkupRule],
}

impl<'a> MarkupScanner<'a> {
    /// Create a scanner over `rules`, matched in slice order.
    #[must_use]
    pub fn new(rules: &'a [MarkupRule]) -> Self {
        Self { rules }
    }

    /// Look up a carried rule id.
    ///
    /// Unknown ids resolve to `None`, so a segment produced with an older
    /// rule set renders as plain text instead of failing.
    pub fn resolve(&self, id: Option<&str>) -> Option<&'a MarkupRule> {
        let id = id?;
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Return the markup state after scanning `fragment` from `initial`.
    pub fn scan(&self, fragment: &str, initial: Option<&'a MarkupRule>) -> Option<&'a MarkupRule> {
        let mut state = initial;
        let mut pos = 0;

        while pos < fragment.len() {
            let rest = &fragment[pos..];
            match self.step(rest, state) {
                Step::Open(rule) => {
                    state = Some(rule);
                    pos += rule.start.len();
                }
                Step::Close(rule) => {
                    state = None;
                    pos += rule.end.len();
                }
                Step::Advance => pos += char_width(rest),
            }
        }

        state
    }

    /// Split `fragment` into colored and plain [`Span`]s, starting from `initial`.
    ///
    /// The opening marker starts a colored run and the closing marker ends it,
    /// so the markers are colored together with their content. Concatenating
    /// the span texts reproduces `fragment`.
    pub fn spans<'t>(&self, fragment: &'t str, initial: Option<&'a MarkupRule>) -> Vec<Span<'t>>
    where
        'a: 't,
    {
        let mut spans = Vec::new();
        let mut state = initial;
        let mut span_start = 0;
        let mut pos = 0;

        while pos < fragment.len() {
            let rest = &fragment[pos..];
            match self.step(rest, state) {
                Step::Open(rule) => {
                    if pos > span_start {
                        spans.push(Span {
                            text: &fragment[span_start..pos],
                            rule: None,
                        });
                    }
                    span_start = pos;
                    state = Some(rule);
                    pos += rule.start.len();
                }
                Step::Close(rule) => {
                    pos += rule.end.len();
                    spans.push(Span {
                        text: &fragment[span_start..pos],
                        rule: Some(rule),
                    });
                    span_start = pos;
                    state = None;
                }
                Step::Advance => pos += char_width(rest),
            }
        }

        if span_start < fragment.len() {
            spans.push(Span {
                text: &fragment[span_start..],
                rule: state,
            });
        }

        spans
    }

    fn step(&self, rest: &str, state: Option<&'a MarkupRule>) -> Step<'a> {
        match state {
            Some(rule) if !rule.end.is_empty() && rest.starts_with(rule.end.as_str()) => {
                Step::Close(rule)
            }
            Some(_) => Step::Advance,
            None => self
                .rules
                .iter()
                .find(|rule| !rule.start.is_empty() && rest.starts_with(rule.start.as_str()))
                .map_or(Step::Advance, Step::Open),
        }
    }
}

/// Byte width of the first character of a non-empty string.
fn char_width(s: &str) -> usize {
    s.chars().next().map_or(1, char::len_utf8)
}
