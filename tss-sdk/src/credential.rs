//! Credentials used to authenticate against the token endpoint.

use secrecy::{ExposeSecret, SecretString};

/// How the client authenticates.
///
/// Secret material is held in [`SecretString`] and is redacted from `Debug`
/// output.
#[derive(Debug, Clone)]
pub enum UserCredential {
    /// A pre-issued bearer token, sent as-is on every request
    AccessToken(SecretString),
    /// OAuth2 password grant, exchanged for a token on every request
    Password {
        /// Account name
        username: String,
        /// Account password
        password: SecretString,
        /// Active Directory domain, if the account is a domain account
        domain: Option<String>,
    },
}

impl UserCredential {
    /// Authenticate with a static access token.
    #[must_use]
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(SecretString::from(token.into()))
    }

    /// Authenticate with a username and password.
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: SecretString::from(password.into()),
            domain: None,
        }
    }

    /// Attach a domain to a password credential. Token credentials are
    /// returned unchanged.
    #[must_use]
    pub fn with_domain(self, domain: impl Into<String>) -> Self {
        match self {
            Self::Password {
                username, password, ..
            } => {
                let domain = domain.into();
                Self::Password {
                    username,
                    password,
                    domain: (!domain.is_empty()).then_some(domain),
                }
            }
            token @ Self::AccessToken(_) => token,
        }
    }

    /// The static token, when this credential carries one.
    #[must_use]
    pub const fn static_token(&self) -> Option<&SecretString> {
        match self {
            Self::AccessToken(token) => Some(token),
            Self::Password { .. } => None,
        }
    }

    pub(crate) fn is_blank_token(&self) -> bool {
        self.static_token()
            .is_some_and(|token| token.expose_secret().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_credential_with_domain() {
        let cred = UserCredential::password("admin", "hunter2").with_domain("CORP");
        match cred {
            UserCredential::Password {
                username,
                password,
                domain,
            } => {
                assert_eq!(username, "admin");
                assert_eq!(password.expose_secret(), "hunter2");
                assert_eq!(domain.as_deref(), Some("CORP"));
            }
            UserCredential::AccessToken(_) => panic!("expected password credential"),
        }
    }

    #[test]
    fn test_empty_domain_is_dropped() {
        let cred = UserCredential::password("admin", "hunter2").with_domain("");
        assert!(matches!(cred, UserCredential::Password { domain: None, .. }));
    }

    #[test]
    fn test_domain_ignored_for_tokens() {
        let cred = UserCredential::access_token("tok").with_domain("CORP");
        assert_eq!(cred.static_token().map(|t| t.expose_secret()), Some("tok"));
    }

    #[test]
    fn test_blank_token_detection() {
        assert!(UserCredential::access_token("").is_blank_token());
        assert!(!UserCredential::access_token("tok").is_blank_token());
        assert!(!UserCredential::password("", "").is_blank_token());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", UserCredential::password("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));

        let debug = format!("{:?}", UserCredential::access_token("bearer-xyz"));
        assert!(!debug.contains("bearer-xyz"));
    }
}
