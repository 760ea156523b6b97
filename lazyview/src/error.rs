use thiserror::Error;

/// Why an asynchronous source rejected.
///
/// Carried by every [`Rejection`](crate::Rejection) and handed to the error
/// views. Computations report failures through [`IntoEvent`](crate::IntoEvent),
/// which turns an `Err(e)` into [`Reason::Error`] and a `None` into
/// [`Reason::None`]. Cancellation and timeouts come from [`LazySource`](crate::LazySource).
#[derive(Error, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Reason {
    /// A general error with a message describing what went wrong.
    #[error("{0}")]
    Error(String),

    /// The computation produced no value.
    #[error("Operation returned None!")]
    None,

    /// The source was closed before the computation finished.
    #[error("Task was cancelled!")]
    Cancelled,

    /// The computation did not settle within its deadline.
    #[error("deadline has elapsed!")]
    Timeout,
}

impl Reason {
    pub fn error(message: impl Into<String>) -> Self {
        Reason::Error(message.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Reason::None)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reason::Error(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Reason::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Reason::Timeout)
    }
}

/// Fatal conditions surfaced to the host rendering layer.
///
/// A rejection with a configured error view never ends up here. These are
/// misconfigurations or misuse that the host should let bubble to its own
/// error boundary.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum LazyError {
    /// A rejection reached the dispatcher but no error view is configured.
    /// Displays as the reason itself.
    #[error("{0}")]
    Unhandled(Reason),

    /// An event arrived after the view was torn down.
    #[error("view was torn down")]
    TornDown,

    /// Contextual configuration could not be read.
    #[error("invalid lazy configuration: {0}")]
    Config(String),
}

impl LazyError {
    /// The rejection reason, if this error is an unhandled rejection.
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            LazyError::Unhandled(reason) => Some(reason),
            _ => None,
        }
    }
}
