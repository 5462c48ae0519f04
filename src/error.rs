use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`LundimatinApiClient`](crate::LundimatinApiClient).
///
/// Statuses 400, 401 and 403 invalidate the held session token as a side
/// effect, so the next call re-authenticates instead of looping on a dead
/// token. A 404 is a resource-level condition and leaves the token alone.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials or session token rejected (HTTP 401).
    #[error("{0}")]
    Authentication(String),

    /// Malformed request (HTTP 400).
    #[error("{0}")]
    BadRequest(String),

    /// Structurally invalid token (HTTP 403).
    #[error("{0}")]
    Forbidden(String),

    /// Requested resource does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Everything else: unexpected statuses, JSON decode failures,
    /// unsupported verbs, transport failures, missing configuration.
    #[error("{0}")]
    Api(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api(format!("HTTP request failed: {err}"))
    }
}
