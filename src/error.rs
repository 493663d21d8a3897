use reqwest::StatusCode;
use thiserror::Error;

/// Reasons the metadata provider could not answer.
///
/// These never leave `MetadataClient`: every variant is logged and turned
/// into "no answer" so resolution can continue with the local catalog.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider credentials are not configured")]
    Unconfigured,

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status} during {stage}")]
    Status {
        stage: &'static str,
        status: StatusCode,
    },

    #[error("provider response is missing `{0}`")]
    MissingField(&'static str),

    #[error("provider returned no matching track")]
    NoResults,

    #[error("provider has no key for this track")]
    KeyUnknown,
}

/// Errors that cross the query boundary.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The caller sent nothing to resolve; no lookup was attempted.
    #[error("Please provide a query")]
    EmptyQuery,

    /// Unexpected failure inside resolution. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Text safe to hand back to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            QueryError::EmptyQuery => "Please provide a query",
            QueryError::Internal(_) => "An error occurred while processing your request",
        }
    }
}
