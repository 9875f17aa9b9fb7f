//! Word-boundary text segmentation with markup span tracking.
//!
//! This crate splits long free-form text into bounded-length segments that
//! can be pasted one by one into a chat interface with a message size limit.
//! Splits fall on whitespace boundaries whenever possible, and every segment
//! remembers which markup span (quoted speech, emphasized action, ...) was
//! open when it began, so a renderer can keep coloring a span that was cut
//! in half by a segment break.
//!
//! # Architecture
//!
//! - [`MarkupScanner`]: pure state machine over paired start/end markers.
//!   Used by the segmenter to carry span state across boundaries, and by
//!   renderers to produce colored [`Span`]s.
//! - [`segment`]: the segmentation algorithm producing [`Segment`]s.
//!
//! # Example
//!
//! ```
//! use quill_segmenter::{MarkupRule, SegmentConfig, segment};
//!
//! let config = SegmentConfig::new(15)
//!     .with_suffix("...")
//!     .with_rule(MarkupRule::new("q", "\"", "\""));
//! let segments = segment(r#"He said "hello world" loudly"#, &config).unwrap();
//!
//! let joined: String = segments.iter().map(|s| s.raw.as_str()).collect();
//! assert_eq!(joined, r#"He said "hello world" loudly"#);
//! assert_eq!(segments[0].carried_markup_id, None);
//! ```

mod error;
mod markup;
mod segmenter;
mod tokens;

pub use error::SegmentError;
pub use markup::{MarkupRule, MarkupScanner, Span};
pub use segmenter::{Segment, SegmentConfig, segment};
