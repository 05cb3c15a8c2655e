//! Shared test utilities for the Secret Server SDK.
//!
//! This crate provides:
//! - Proptest generators for URLs, paths, tenants and filenames
//! - Wiremock helpers standing in for the token and REST endpoints
//! - JSON fixtures shaped like real server responses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
