//! Shared cross-cutting helpers for the Secret Server SDK.
//!
//! This crate provides centralized implementations for:
//! - HTTP transport configuration and building (timeouts, TLS roots)
//! - Log levels and tracing dispatch construction

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod tracing_config;

pub use error::CommonError;
pub use http::{HttpConfig, TlsConfig, build_http_client};
pub use tracing_config::{LogLevel, TracingConfig, build_dispatch};
