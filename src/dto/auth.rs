use serde::Serialize;

use crate::config::Credentials;

/// Application code under which external clients are registered.
pub const CODE_APPLICATION: &str = "webservice_externe";

/// Clear-text password type accepted by the `auth` endpoint.
pub const PASSWORD_TYPE_CLEAR: u8 = 0;

/// Body of the `POST auth` login call.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
    pub password_type: u8,
    pub code_application: String,
    pub code_version: String,
}

impl AuthRequest {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            password_type: PASSWORD_TYPE_CLEAR,
            code_application: CODE_APPLICATION.to_string(),
            code_version: credentials.code_version.clone(),
        }
    }
}
