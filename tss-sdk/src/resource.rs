//! API resources and the endpoints the client can address.

use crate::error::TssError;
use std::{fmt, str::FromStr};

/// Top-level REST collections the client is allowed to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `secrets`
    Secrets,
    /// `secret-templates`
    SecretTemplates,
}

impl Resource {
    /// Path segment of the collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secrets => "secrets",
            Self::SecretTemplates => "secret-templates",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = TssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_matches('/') {
            "secrets" => Ok(Self::Secrets),
            "secret-templates" => Ok(Self::SecretTemplates),
            _ => {
                tracing::error!(resource = s, "unknown resource");
                Err(TssError::UnknownResource(s.to_string()))
            }
        }
    }
}

/// Where a request goes: the OAuth2 token endpoint or a REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `{base}/{token_path}`
    Token,
    /// `{base}/{api_path}/{resource}/{path}`
    Resource(Resource),
}

impl From<Resource> for Endpoint {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}
