//! Client for Secret Server and Secret Server Cloud.
//!
//! Authenticates with an OAuth2 password grant or a static bearer token and
//! reads, searches and writes secrets and secret templates over HTTPS.
//!
//! ```no_run
//! use tss_sdk::{Client, Configuration, UserCredential};
//!
//! # async fn run() -> tss_sdk::TssResult<()> {
//! let client = Client::new(Configuration::for_tenant(
//!     "acme",
//!     UserCredential::password("svc-reader", "correct horse"),
//! ))?;
//! let secret = client.secret(1).await?;
//! if let Some(password) = secret.field("password") {
//!     println!("{} characters", password.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod resource;
pub mod secrets;

pub use client::Client;
pub use config::Configuration;
pub use credential::UserCredential;
pub use error::{TssError, TssResult};
pub use resource::{Endpoint, Resource};
pub use secrets::{
    Secret, SecretField, SecretSearchResult, SecretSummary, SecretTemplate, SecretTemplateField,
};
pub use tss_common::{LogLevel, TlsConfig};

pub use reqwest::Method;
