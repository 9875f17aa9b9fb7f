//! Segmentation error types.

/// Error returned by [`segment`](crate::segment).
///
/// Only configuration problems are errors; every input string is handled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    /// The configuration cannot be used for segmentation.
    #[error("Invalid segment configuration: {0}")]
    InvalidConfiguration(String),
}
