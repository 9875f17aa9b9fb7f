//! Segment assembly.
//!
//! [`segment`] walks whitespace-preserving tokens and packs them into
//! segments whose decorated length (prefix + raw content + suffix) fits the
//! configured maximum. A single token that cannot fit even an empty segment
//! is force-split so the walk always makes progress.

use uuid::Uuid;

use crate::error::SegmentError;
use crate::markup::{MarkupRule, MarkupScanner};
use crate::tokens::Tokens;

/// Segmentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Maximum decorated segment length in characters. Must be at least 1.
    pub max_length: usize,
    /// Prepended to every segment except the first.
    pub prefix: String,
    /// Appended to every segment except the last.
    pub suffix: String,
    /// Markup rules, matched in order.
    pub rules: Vec<MarkupRule>,
}

impl SegmentConfig {
    /// Create a configuration with no prefix, suffix or rules.
    #[must_use]
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            prefix: String::new(),
            suffix: String::new(),
            rules: Vec::new(),
        }
    }

    /// Set the continuation prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the continuation suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Append a markup rule.
    #[must_use]
    pub fn with_rule(mut self, rule: MarkupRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Check that the configuration can be segmented with.
    ///
    /// # Errors
    ///
    /// Returns `SegmentError::InvalidConfiguration` if `max_length` is 0.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.max_length == 0 {
            return Err(SegmentError::InvalidConfiguration(
                "max_length must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// One piece of segmented output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Segment {
    /// Unique identifier. Not stable across calls.
    pub id: Uuid,
    /// Exact slice of the source text.
    #[cfg_attr(feature = "serde", serde(rename = "rawContent"))]
    pub raw: String,
    /// Raw content with prefix and suffix applied.
    #[cfg_attr(feature = "serde", serde(rename = "decoratedContent"))]
    pub decorated: String,
    /// Byte offset of the raw content in the source text.
    #[cfg_attr(feature = "serde", serde(rename = "startOffset"))]
    pub start: usize,
    /// Byte offset one past the raw content in the source text.
    #[cfg_attr(feature = "serde", serde(rename = "endOffset"))]
    pub end: usize,
    /// 1-based position in the sequence.
    pub ordinal: usize,
    /// Number of segments in the sequence.
    pub total: usize,
    /// Rule that was open when this segment began.
    pub carried_markup_id: Option<String>,
}

impl Segment {
    /// Length of the decorated content in characters.
    pub fn char_len(&self) -> usize {
        self.decorated.chars().count()
    }
}

/// Split `text` into segments according to `config`.
///
/// Concatenating the `raw` content of the result reproduces `text`. Empty
/// text yields no segments.
///
/// # Errors
///
/// Returns `SegmentError::InvalidConfiguration` if `config.max_length` is 0.
/// No other input is rejected.
pub fn segment(text: &str, config: &SegmentConfig) -> Result<Vec<Segment>, SegmentError> {
    config.validate()?;

    let mut builder = SegmentBuilder::new(text, config);
    for token in Tokens::new(text) {
        builder.push(token);
    }
    let segments = builder.finish();

    tracing::debug!(
        segments = segments.len(),
        chars = text.chars().count(),
        max_length = config.max_length,
        "Segmented text"
    );

    Ok(segments)
}

/// A closed segment awaiting numbering and decoration.
struct Closed<'r> {
    start: usize,
    end: usize,
    carried: Option<&'r MarkupRule>,
}

/// Incremental state of the segmentation walk.
///
/// Tokens arrive in order and are contiguous, so the open segment is always
/// `text[start..end]`.
struct SegmentBuilder<'t, 'r> {
    text: &'t str,
    config: &'r SegmentConfig,
    scanner: MarkupScanner<'r>,
    prefix_len: usize,
    suffix_len: usize,
    closed: Vec<Closed<'r>>,
    start: usize,
    end: usize,
    /// Character count of `text[start..end]`.
    len: usize,
    /// Markup state when the open segment began.
    carried: Option<&'r MarkupRule>,
    /// Markup state at `end`.
    state: Option<&'r MarkupRule>,
}

impl<'t, 'r> SegmentBuilder<'t, 'r> {
    fn new(text: &'t str, config: &'r SegmentConfig) -> Self {
        Self {
            text,
            config,
            scanner: MarkupScanner::new(&config.rules),
            prefix_len: config.prefix.chars().count(),
            suffix_len: config.suffix.chars().count(),
            closed: Vec::new(),
            start: 0,
            end: 0,
            len: 0,
            carried: None,
            state: None,
        }
    }

    /// Prefix length for the open segment. The first segment has none.
    fn effective_prefix_len(&self) -> usize {
        if self.closed.is_empty() {
            0
        } else {
            self.prefix_len
        }
    }

    fn push(&mut self, mut token: &'t str) {
        let mut token_len = token.chars().count();
        while token_len > 0 {
            let tentative = self.effective_prefix_len() + self.len + token_len + self.suffix_len;

            if tentative <= self.config.max_length {
                self.state = self.scanner.scan(token, self.state);
                self.end += token.len();
                self.len += token_len;
                return;
            }

            if self.len > 0 {
                // Re-evaluate the token against an empty segment
                self.close();
            } else {
                let (rest, head_len) = self.force_split(token);
                token = rest;
                token_len -= head_len;
            }
        }
    }

    /// Emit the head of an oversized token as its own segment.
    ///
    /// Returns the rest of the token and the character count of the head.
    fn force_split(&mut self, token: &'t str) -> (&'t str, usize) {
        let available = self
            .config
            .max_length
            .saturating_sub(self.effective_prefix_len() + self.suffix_len)
            .max(1);
        let split_at = token
            .char_indices()
            .nth(available)
            .map_or(token.len(), |(idx, _)| idx);
        let (head, rest) = token.split_at(split_at);

        let head_len = head.chars().count();

        tracing::debug!(
            offset = self.end,
            head_chars = head_len,
            rest_bytes = rest.len(),
            "Force-splitting token that exceeds segment length"
        );

        self.state = self.scanner.scan(head, self.state);
        self.end += head.len();
        self.len += head_len;
        self.close();
        (rest, head_len)
    }

    /// Close the open segment, carrying the current markup state forward.
    fn close(&mut self) {
        if self.len > 0 {
            self.closed.push(Closed {
                start: self.start,
                end: self.end,
                carried: self.carried,
            });
        }
        self.start = self.end;
        self.len = 0;
        self.carried = self.state;
    }

    fn finish(mut self) -> Vec<Segment> {
        self.close();

        let total = self.closed.len();
        self.closed
            .into_iter()
            .enumerate()
            .map(|(idx, closed)| {
                let raw = &self.text[closed.start..closed.end];
                let prefix = if idx == 0 { "" } else { self.config.prefix.as_str() };
                let suffix = if idx + 1 == total {
                    ""
                } else {
                    self.config.suffix.as_str()
                };
                Segment {
                    id: Uuid::new_v4(),
                    raw: raw.to_owned(),
                    decorated: format!("{prefix}{raw}{suffix}"),
                    start: closed.start,
                    end: closed.end,
                    ordinal: idx + 1,
                    total,
                    carried_markup_id: closed.carried.map(|rule| rule.id.clone()),
                }
            })
            .collect()
    }
}
