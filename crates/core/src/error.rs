/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
///
/// Cancelling a run is not represented here: the engine reports it through
/// [`crate::Cancelled`] so algorithms can bail out with `?`.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// Free-form message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration files that fail to parse.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration value outside the range the visualiser accepts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An algorithm identifier that does not name one of the sorting algorithms.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// The task driving a run ended without handing its context back.
    #[error("run aborted: {0}")]
    RunAborted(String),
}

impl SortVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<&str> for SortVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
