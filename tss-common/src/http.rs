//! HTTP transport configuration and building.
//!
//! Every SDK client owns the transport built here, so TLS roots and timeouts
//! never leak into a process-wide default.

use reqwest::{Certificate, Client, ClientBuilder};
use std::time::Duration;

/// TLS settings applied to a single transport.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Additional PEM-encoded root certificates to trust
    pub root_certificates_pem: Vec<Vec<u8>>,
    /// Accept invalid or self-signed server certificates
    pub accept_invalid_certs: bool,
}

impl TlsConfig {
    /// Trust an additional PEM-encoded root certificate.
    #[must_use]
    pub fn with_root_certificate_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.root_certificates_pem.push(pem.into());
        self
    }

    /// Accept invalid server certificates. Only meant for test servers.
    #[must_use]
    pub const fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// User agent string
    pub user_agent: String,
    /// TLS settings
    pub tls: TlsConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: concat!("tss-sdk-rust/", env!("CARGO_PKG_VERSION")).to_string(),
            tls: TlsConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set a custom user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the TLS settings.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }
}

/// Build a configured HTTP client.
///
/// Creates a reqwest client with rustls TLS, connection pooling, any extra
/// root certificates from [`TlsConfig`], and the configured timeouts.
///
/// # Errors
///
/// Returns an error if a root certificate is not valid PEM or the client
/// cannot be built (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use tss_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default()
///     .with_timeout(Duration::from_secs(60));
/// let client = build_http_client(&config).expect("Failed to build client");
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(&config.user_agent)
        .use_rustls_tls();

    for pem in &config.tls.root_certificates_pem {
        builder = builder.add_root_certificate(Certificate::from_pem(pem)?);
    }

    if config.tls.accept_invalid_certs {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert!(config.user_agent.starts_with("tss-sdk-rust/"));
        assert!(config.tls.root_certificates_pem.is_empty());
        assert!(!config.tls.accept_invalid_certs);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::default()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent")
            .with_tls(TlsConfig::default().with_accept_invalid_certs(true));

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.tls.accept_invalid_certs);
    }

    #[test]
    fn test_build_client() {
        let config = HttpConfig::default();
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_accepting_invalid_certs() {
        let config =
            HttpConfig::default().with_tls(TlsConfig::default().with_accept_invalid_certs(true));
        assert!(build_http_client(&config).is_ok());
    }
}
