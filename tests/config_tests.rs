use std::sync::Mutex;

use lundimatin_rs::config::{self, Credentials, BASE_URL_ENV, DEFAULT_CODE_VERSION};
use lundimatin_rs::{Error, LundimatinApiClient};

// The base URL is process-global state; serialize the tests that touch it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_base_url_reads_the_environment() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var(BASE_URL_ENV, "https://api.example.test/");

    assert_eq!(config::base_url().unwrap(), "https://api.example.test/");

    std::env::remove_var(BASE_URL_ENV);
}

#[test]
fn test_blank_base_url_counts_as_unset() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var(BASE_URL_ENV, "   ");

    let err = config::base_url().unwrap_err();
    assert!(matches!(err, Error::Api(_)));

    std::env::remove_var(BASE_URL_ENV);
}

#[tokio::test]
async fn test_missing_base_url_fails_before_any_network_attempt() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::remove_var(BASE_URL_ENV);

    let mut client = LundimatinApiClient::new("user", "secret").with_token("T");
    let err = client.get_client("42").await.unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    assert_eq!(
        err.to_string(),
        format!("{BASE_URL_ENV} environment variable is not set")
    );
}

#[tokio::test]
async fn test_missing_base_url_also_fails_the_implicit_authenticate() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::remove_var(BASE_URL_ENV);

    let mut client = LundimatinApiClient::new("user", "secret");
    let err = client.get_client("42").await.unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    assert!(!client.is_authenticated());
}

#[test]
fn test_credentials_default_code_version() {
    let credentials = Credentials::new("user", "secret");
    assert_eq!(credentials.username, "user");
    assert_eq!(credentials.password, "secret");
    assert_eq!(credentials.code_version, DEFAULT_CODE_VERSION);
}
