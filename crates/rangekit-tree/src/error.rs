use std::fmt;

/// Errors reported by tree construction and tree operations.
///
/// Validation always happens before any mutation, so a failed call never
/// leaves a tree partially updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// A tree cannot be built from a zero-length array.
    EmptyInput,
    /// An index or range bound fell outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::EmptyInput => {
                write!(f, "cannot build a tree from an empty array")
            }
            TreeError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for array of length {len}")
            }
        }
    }
}

impl std::error::Error for TreeError {}
