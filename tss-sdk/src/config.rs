//! Client configuration.

use crate::{
    credential::UserCredential,
    error::{TssError, TssResult},
};
use std::time::Duration;
use tracing::Dispatch;
use tss_common::{HttpConfig, LogLevel, TlsConfig};

/// Cloud tenants resolve to `https://{tenant}.secretservercloud.{tld}/`.
pub const DEFAULT_TLD: &str = "com";
/// REST API prefix appended to the base URL.
pub const DEFAULT_API_PATH_URI: &str = "/api/v1";
/// OAuth2 token endpoint appended to the base URL.
pub const DEFAULT_TOKEN_PATH_URI: &str = "/oauth2/token";

/// Client configuration.
///
/// Exactly one of `server_url` and `tenant` must be non-empty; the check runs
/// in [`Client::new`](crate::Client::new).
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Credentials exchanged for a bearer token
    pub credentials: UserCredential,
    /// Self-hosted server URL, e.g. `https://tss.example.com/SecretServer`
    pub server_url: String,
    /// Secret Server Cloud tenant
    pub tenant: String,
    /// Top-level domain of the cloud tenant (default: `com`)
    pub tld: String,
    /// REST API path (default: `/api/v1`)
    pub api_path_uri: String,
    /// Token endpoint path (default: `/oauth2/token`)
    pub token_path_uri: String,
    /// TLS settings for the client's own transport
    pub tls: Option<TlsConfig>,
    /// Verbosity of the client's own logger
    pub log_level: LogLevel,
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// User agent override
    pub user_agent: Option<String>,
    /// Caller-supplied logger; replaces the one built from `log_level`
    pub dispatch: Option<Dispatch>,
}

impl Configuration {
    /// Create a configuration with no server identity set.
    #[must_use]
    pub fn new(credentials: UserCredential) -> Self {
        Self {
            credentials,
            server_url: String::new(),
            tenant: String::new(),
            tld: String::new(),
            api_path_uri: String::new(),
            token_path_uri: String::new(),
            tls: None,
            log_level: LogLevel::default(),
            timeout: HttpConfig::default().timeout,
            user_agent: None,
            dispatch: None,
        }
    }

    /// Target a self-hosted server.
    #[must_use]
    pub fn for_server(server_url: impl Into<String>, credentials: UserCredential) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::new(credentials)
        }
    }

    /// Target a Secret Server Cloud tenant.
    #[must_use]
    pub fn for_tenant(tenant: impl Into<String>, credentials: UserCredential) -> Self {
        Self {
            tenant: tenant.into(),
            ..Self::new(credentials)
        }
    }

    /// Set the cloud top-level domain (e.g. `eu`, `com.au`).
    #[must_use]
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = tld.into();
        self
    }

    /// Set the REST API path.
    #[must_use]
    pub fn with_api_path_uri(mut self, path: impl Into<String>) -> Self {
        self.api_path_uri = path.into();
        self
    }

    /// Set the token endpoint path.
    #[must_use]
    pub fn with_token_path_uri(mut self, path: impl Into<String>) -> Self {
        self.token_path_uri = path.into();
        self
    }

    /// Set TLS settings.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Set log verbosity.
    #[must_use]
    pub const fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Route the client's logs to the given dispatch.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Validate the server identity and fill in defaults.
    ///
    /// API and token paths are stored without leading or trailing slashes.
    pub(crate) fn normalize(mut self) -> TssResult<Self> {
        if self.server_url.is_empty() == self.tenant.is_empty() {
            return Err(TssError::invalid_config(
                "either server_url or tenant must be set",
            ));
        }
        if self.credentials.is_blank_token() {
            return Err(TssError::invalid_config("access token must not be empty"));
        }

        if self.tld.is_empty() {
            self.tld = DEFAULT_TLD.to_string();
        }
        if self.api_path_uri.is_empty() {
            self.api_path_uri = DEFAULT_API_PATH_URI.to_string();
        }
        self.api_path_uri = self.api_path_uri.trim_matches('/').to_string();
        if self.token_path_uri.is_empty() {
            self.token_path_uri = DEFAULT_TOKEN_PATH_URI.to_string();
        }
        self.token_path_uri = self.token_path_uri.trim_matches('/').to_string();

        Ok(self)
    }

    /// Transport settings derived from this configuration.
    pub(crate) fn http_config(&self) -> HttpConfig {
        let mut http = HttpConfig::default().with_timeout(self.timeout);
        if let Some(user_agent) = &self.user_agent {
            http = http.with_user_agent(user_agent.clone());
        }
        if let Some(tls) = &self.tls {
            http = http.with_tls(tls.clone());
        }
        http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> UserCredential {
        UserCredential::password("user", "pass")
    }

    #[test]
    fn test_defaults_applied() {
        let config = Configuration::for_tenant("acme", creds()).normalize().unwrap();
        assert_eq!(config.tld, "com");
        assert_eq!(config.api_path_uri, "api/v1");
        assert_eq!(config.token_path_uri, "oauth2/token");
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_paths_trimmed() {
        let config = Configuration::for_server("https://h/", creds())
            .with_api_path_uri("//SecretServer/api/v2/")
            .with_token_path_uri("SecretServer/oauth2/token/")
            .normalize()
            .unwrap();
        assert_eq!(config.api_path_uri, "SecretServer/api/v2");
        assert_eq!(config.token_path_uri, "SecretServer/oauth2/token");
    }

    #[test]
    fn test_custom_tld_kept() {
        let config = Configuration::for_tenant("acme", creds())
            .with_tld("eu")
            .normalize()
            .unwrap();
        assert_eq!(config.tld, "eu");
    }

    #[test]
    fn test_neither_identity_rejected() {
        let err = Configuration::new(creds()).normalize().unwrap_err();
        assert!(matches!(err, TssError::InvalidConfig(_)));
    }

    #[test]
    fn test_both_identities_rejected() {
        let mut config = Configuration::for_server("https://h", creds());
        config.tenant = "acme".to_string();
        let err = config.normalize().unwrap_err();
        assert!(matches!(err, TssError::InvalidConfig(_)));
    }

    #[test]
    fn test_blank_access_token_rejected() {
        let err = Configuration::for_server("https://h", UserCredential::access_token(""))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, TssError::InvalidConfig(_)));
    }

    #[test]
    fn test_http_config_follows_configuration() {
        let config = Configuration::for_server("https://h", creds())
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("ops-tool/2")
            .with_tls(TlsConfig::default().with_accept_invalid_certs(true));
        let http = config.http_config();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.user_agent, "ops-tool/2");
        assert!(http.tls.accept_invalid_certs);
    }
}
