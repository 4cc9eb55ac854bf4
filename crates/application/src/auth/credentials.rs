//! Turning a resolved auth config into request credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use workbench_domain::{ApiKeyLocation, AuthConfig};

/// What an auth config adds to an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResolution {
    /// Nothing is added.
    None,
    /// Add this header.
    Header {
        /// Header name (e.g., "Authorization").
        name: String,
        /// Header value (e.g., "Bearer token123").
        value: String,
    },
    /// Add this query parameter.
    QueryParam {
        /// Query parameter name.
        name: String,
        /// Query parameter value.
        value: String,
    },
}

/// Computes the credentials for an auth config.
///
/// `OAuth` 1.0 and `OAuth` 2.0 without an access token add nothing, as does
/// an API key with an empty name. `InheritParent` must be resolved first and
/// also adds nothing.
#[must_use]
pub fn resolve_credentials(auth: &AuthConfig) -> AuthResolution {
    match auth {
        AuthConfig::None | AuthConfig::InheritParent | AuthConfig::OAuth1(_) => {
            AuthResolution::None
        }
        AuthConfig::Basic { username, password } => resolve_basic(username, password),
        AuthConfig::Bearer { token } => resolve_bearer(token),
        AuthConfig::ApiKey {
            key,
            value,
            location,
        } => resolve_api_key(key, value, *location),
        AuthConfig::OAuth2(config) => config
            .access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map_or(AuthResolution::None, resolve_bearer),
    }
}

fn resolve_bearer(token: &str) -> AuthResolution {
    AuthResolution::Header {
        name: "Authorization".to_string(),
        value: format!("Bearer {token}"),
    }
}

fn resolve_basic(username: &str, password: &str) -> AuthResolution {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    AuthResolution::Header {
        name: "Authorization".to_string(),
        value: format!("Basic {encoded}"),
    }
}

fn resolve_api_key(key: &str, value: &str, location: ApiKeyLocation) -> AuthResolution {
    if key.is_empty() {
        return AuthResolution::None;
    }
    match location {
        ApiKeyLocation::Header => AuthResolution::Header {
            name: key.to_string(),
            value: value.to_string(),
        },
        ApiKeyLocation::Query => AuthResolution::QueryParam {
            name: key.to_string(),
            value: value.to_string(),
        },
    }
}
