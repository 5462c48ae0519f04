use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{self, Credentials};
use crate::dto::{ApiResponse, AuthRequest, ClientQuery};
use crate::error::{Error, Result};

/// Media type every endpoint expects in `Accept`.
pub const ACCEPT_HEADER: &str = "application/api.rest-v1+json";
/// Media type for POST/PUT request bodies.
pub const CONTENT_TYPE_HEADER: &str = "application/json";

const AUTH_ENDPOINT: &str = "auth";
const TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP verbs the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a JSON body; GET and DELETE never do.
    fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(Error::Api(format!("Unsupported HTTP method: {other}"))),
        }
    }
}

/// Stateful client for the Lundi Matin REST API.
///
/// Holds the login credentials and the session token issued by `auth`. The
/// token is obtained lazily by the first call that needs one, sent as the
/// password half of HTTP Basic credentials on every subsequent call, and
/// cleared whenever the server answers 400, 401 or 403 so the next call
/// re-authenticates. Construction performs no network activity.
pub struct LundimatinApiClient {
    credentials: Credentials,
    token: Option<String>,
    base_url: Option<String>,
}

impl LundimatinApiClient {
    /// Create a client with the default protocol code version.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, password),
            token: None,
            base_url: None,
        }
    }

    /// Override the code version sent on `auth`.
    pub fn with_code_version(mut self, code_version: impl Into<String>) -> Self {
        self.credentials.code_version = code_version.into();
        self
    }

    /// Use a fixed base URL instead of the `LUNDI_MATIN_BASE_URL` value.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resume a session with a token obtained earlier.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Login and obtain a session token.
    ///
    /// Credentials travel in the request body for this call only; no
    /// Authorization header is sent. On success the token is stored for
    /// subsequent calls and returned.
    pub async fn authenticate(&mut self) -> Result<String> {
        let body = serde_json::to_value(AuthRequest::new(&self.credentials))
            .map_err(|e| Error::Api(format!("Invalid auth payload: {e}")))?;
        let response = self
            .execute(Method::Post, AUTH_ENDPOINT, &[], Some(&body), false)
            .await?;

        let token = response
            .datas
            .as_ref()
            .and_then(|datas| datas.get("token"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Api("Authentication response carried no token".to_string()))?
            .to_string();

        debug!("authenticated as {}", self.credentials.username);
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Generic API call: GET with query parameters, POST/PUT with a JSON
    /// body, DELETE with neither.
    ///
    /// Authenticates first when no token is held — exactly once, not in a
    /// loop; an authentication failure propagates without contacting the
    /// target endpoint.
    pub async fn call(
        &mut self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        if self.token.is_none() {
            debug!("no session token held, authenticating first");
            self.authenticate().await?;
        }
        self.execute(method, endpoint, query, body, true).await
    }

    /// List clients with the conventional search parameters.
    pub async fn get_clients(&mut self, query: &ClientQuery) -> Result<ApiResponse> {
        self.call(Method::Get, "clients", &query.to_query(), None)
            .await
    }

    /// Fetch a single client by id.
    pub async fn get_client(&mut self, client_id: &str) -> Result<ApiResponse> {
        self.call(Method::Get, &format!("clients/{client_id}"), &[], None)
            .await
    }

    /// Update a client. `attributes` is sent verbatim as the JSON body;
    /// callers pass only the non-blank fields they want changed.
    pub async fn update_client(&mut self, client_id: &str, attributes: &Value) -> Result<ApiResponse> {
        self.call(
            Method::Put,
            &format!("clients/{client_id}"),
            &[],
            Some(attributes),
        )
        .await
    }

    /// True while a session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Current session token, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Drop the held token without a network call (logout).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// One blocking round trip: build the request, send it, map the response.
    ///
    /// The transport client is built per call and dropped with it; no
    /// connection is retained between calls.
    async fn execute(
        &mut self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        authorize: bool,
    ) -> Result<ApiResponse> {
        let url = join_url(&self.resolve_base_url()?, endpoint);

        let client = Client::builder()
            .connect_timeout(TIMEOUT)
            .timeout(TIMEOUT)
            .build()?;

        let mut request = match method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
            Method::Put => client.put(&url),
            Method::Delete => client.delete(&url),
        };

        // Query parameters belong to GET only, the JSON body to POST/PUT only.
        if method == Method::Get {
            let pairs = non_blank_pairs(query);
            if !pairs.is_empty() {
                request = request.query(&pairs);
            }
        }

        request = request.header(ACCEPT, ACCEPT_HEADER);
        let empty = Value::Object(serde_json::Map::new());
        if method.has_body() {
            request = request
                .header(CONTENT_TYPE, CONTENT_TYPE_HEADER)
                .json(body.unwrap_or(&empty));
        }
        if authorize {
            if let Some(token) = &self.token {
                let credentials = BASE64.encode(format!(":{token}"));
                request = request.header(AUTHORIZATION, format!("Basic {credentials}"));
            }
        }

        debug!("{} {}", method.as_str(), url);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("API response status: {status}");

        self.handle_response(status, &text)
    }

    fn resolve_base_url(&self) -> Result<String> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => config::base_url(),
        }
    }

    /// Single decode-and-map policy applied to every response.
    fn handle_response(&mut self, status: StatusCode, body: &str) -> Result<ApiResponse> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| Error::Api(format!("Invalid JSON response: {e}")))?;

        match status.as_u16() {
            200 | 201 => {
                if let Some(warnings) = &response.warnings {
                    if !warnings.is_empty() {
                        warn!("API returned {} warning(s)", warnings.len());
                    }
                }
                Ok(response)
            }
            // 400/401/403 mean the held token or credentials are no longer
            // trustworthy; drop the token so the next call re-authenticates.
            400 => {
                self.token = None;
                Err(Error::BadRequest(response.message_or(
                    "Bad Request. Check parameters and Accept header.",
                )))
            }
            401 => {
                self.token = None;
                Err(Error::Authentication(
                    response.message_or("Unauthorized. Please re-authenticate."),
                ))
            }
            403 => {
                self.token = None;
                Err(Error::Forbidden(
                    response.message_or("Forbidden. Invalid token."),
                ))
            }
            // Resource-not-found is not a credential problem: keep the token.
            404 => Err(Error::NotFound(response.message_or("Not Found"))),
            405 => Err(Error::Api(format!(
                "Method Not Allowed: {}",
                response.message.as_deref().unwrap_or_default()
            ))),
            410 => Err(Error::Api(format!(
                "Version Incompatibility: {}",
                response.message.as_deref().unwrap_or_default()
            ))),
            415 => Err(Error::Api(format!(
                "Unsupported Media Type: {}",
                response.message.as_deref().unwrap_or_default()
            ))),
            500 => Err(Error::Api(format!(
                "Internal Server Error: {}",
                response.message.as_deref().unwrap_or_default()
            ))),
            code => Err(Error::Api(format!("Unexpected status code: {code}"))),
        }
    }
}

/// Join the base URL and endpoint, tolerating a missing trailing slash.
fn join_url(base: &str, endpoint: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

/// Drop query pairs whose value is blank; `tel=` is noise to the API.
fn non_blank_pairs(query: &[(String, String)]) -> Vec<(&str, &str)> {
    query
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_known_verbs() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("Put".parse::<Method>().unwrap(), Method::Put);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn unsupported_method_is_an_api_error() {
        let err = "PATCH".parse::<Method>().unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert_eq!(err.to_string(), "Unsupported HTTP method: PATCH");
    }

    #[test]
    fn blank_query_values_are_dropped() {
        let query = vec![
            ("nom".to_string(), "Dupont".to_string()),
            ("tel".to_string(), String::new()),
            ("ville".to_string(), "   ".to_string()),
        ];
        assert_eq!(non_blank_pairs(&query), vec![("nom", "Dupont")]);
    }

    #[test]
    fn all_blank_query_encodes_to_nothing() {
        let query = vec![
            ("tel".to_string(), String::new()),
            ("ville".to_string(), " ".to_string()),
        ];
        assert!(non_blank_pairs(&query).is_empty());
    }

    #[test]
    fn join_url_tolerates_missing_trailing_slash() {
        assert_eq!(join_url("https://api.test/", "auth"), "https://api.test/auth");
        assert_eq!(join_url("https://api.test", "auth"), "https://api.test/auth");
    }

    #[test]
    fn client_starts_unauthenticated() {
        let client = LundimatinApiClient::new("user", "secret");
        assert!(!client.is_authenticated());
        assert!(client.session_token().is_none());
    }

    #[test]
    fn token_can_be_restored_and_cleared() {
        let mut client = LundimatinApiClient::new("user", "secret").with_token("T");
        assert!(client.is_authenticated());
        assert_eq!(client.session_token(), Some("T"));

        client.clear_token();
        assert!(!client.is_authenticated());
    }
}
