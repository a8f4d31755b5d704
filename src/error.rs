use thiserror::Error;

/// Everything that can go wrong while validating input or computing a layout.
///
/// Validation failures (`DanglingReference`, `DuplicateId`, `InvalidSize`) are raised
/// before any placement work starts, so a failed call never yields a partial layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("edge `{edge}` references unknown node `{node}`")]
    DanglingReference { edge: String, node: String },

    #[error("duplicate id `{id}`")]
    DuplicateId { id: String },

    #[error("node `{id}` has invalid size {width}x{height}")]
    InvalidSize { id: String, width: f64, height: f64 },

    #[error("internal invariant violated: {message}")]
    InternalInvariantViolation { message: String },
}

impl LayoutError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariantViolation {
            message: message.into(),
        }
    }
}
