//! Error types.

/// Errors for shingle extraction, fingerprinting and comparison.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A parameter is out of range or inconsistent.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
    /// Fingerprinting needs an odd number of courses so the majority vote cannot tie.
    #[error("courses must be odd for fingerprinting (got {courses})")]
    EvenCourses {
        /// The rejected course count.
        courses: usize,
    },
    /// Two matrices or vectors being compared have a different number of tabs.
    #[error("tab count mismatch (expected {expected}, got {got})")]
    TabCountMismatch {
        /// Tab count of the left operand.
        expected: usize,
        /// Tab count of the right operand.
        got: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
