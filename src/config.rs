use std::env;

use crate::error::{Error, Result};

/// Environment variable naming the API base URL, e.g.
/// `https://mycompany.lundimatin.biz/api/`.
pub const BASE_URL_ENV: &str = "LUNDI_MATIN_BASE_URL";

/// Code version sent on `auth` unless the caller overrides it.
pub const DEFAULT_CODE_VERSION: &str = "1";

/// Login credentials carried by the client for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub code_version: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            code_version: DEFAULT_CODE_VERSION.to_string(),
        }
    }
}

/// Resolve the API base URL from the environment.
///
/// The value is read on every call rather than cached, so a missing or blank
/// value is reported by the first operation that needs it, not at client
/// construction.
pub fn base_url() -> Result<String> {
    match env::var(BASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(Error::Api(format!(
            "{BASE_URL_ENV} environment variable is not set"
        ))),
    }
}
