//! # lundimatin-rs
//!
//! A Rust client library for the Lundi Matin REST API, featuring lazy
//! authentication, session token caching and a typed error taxonomy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lundimatin_rs::{ClientQuery, LundimatinApiClient};
//!
//! # async fn example() -> lundimatin_rs::Result<()> {
//! // The API base URL is read from LUNDI_MATIN_BASE_URL
//! let mut client = LundimatinApiClient::new("user", "secret");
//!
//! // The first call authenticates implicitly and caches the token
//! let response = client.get_clients(&ClientQuery::default().with_limit(20)).await?;
//! if let Some(clients) = response.payload() {
//!     println!("{clients:#}");
//! }
//!
//! // Fetch and update a single record
//! let _ = client.get_client("42").await?;
//! client
//!     .update_client("42", &serde_json::json!({ "nom": "Dupont" }))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Session lifecycle
//!
//! The token issued by `auth` is the only state the client mutates. It is
//! obtained lazily by the first operation that needs one, sent as the
//! password half of HTTP Basic credentials on every subsequent call, and
//! dropped as soon as the server answers 400, 401 or 403 — the next call
//! then re-authenticates. A 404 leaves the session intact.
//!
//! ## Configuration
//!
//! The base URL comes from the mandatory `LUNDI_MATIN_BASE_URL` environment
//! variable, resolved by the first call that needs it. The bundled
//! `lundimatin` binary also loads it from a `.env` file and takes its
//! credentials from `LUNDI_MATIN_USERNAME` / `LUNDI_MATIN_PASSWORD`.

pub mod api_client;
pub mod config;
pub mod dto;
pub mod error;

// Re-export commonly used types at the crate root
pub use api_client::{LundimatinApiClient, Method};
pub use dto::{ApiResponse, ClientQuery, ClientRecord};
pub use error::{Error, Result};
