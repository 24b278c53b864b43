use thiserror::Error;

/// Errors produced while expanding a node range expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Term looks like an interval but cannot be parsed as `prefix[low-high]`
    #[error("Invalid node format {term}.")]
    InvalidTerm { term: String },

    /// Interval whose lower bound is greater than its upper bound
    #[error("Invalid node format {term}: lower bound {low} is greater than upper bound {high}.")]
    InvertedBounds { term: String, low: u64, high: u64 },

    /// Expression that names no nodes at all
    #[error("Node range expression '{expression}' does not name any node.")]
    Empty { expression: String },
}

impl RangeError {
    #[must_use]
    pub fn invalid(term: &str) -> Self {
        Self::InvalidTerm {
            term: term.to_string(),
        }
    }

    /// The term that caused the failure, if the error is tied to one
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::InvalidTerm { term } | Self::InvertedBounds { term, .. } => Some(term),
            Self::Empty { .. } => None,
        }
    }
}
