//! Authorization configuration types

use serde::{Deserialize, Serialize};

/// Authorization attached to a collection, folder or request.
///
/// `InheritParent` never carries credentials; only the other variants are
/// valid results of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthConfig {
    /// No authorization.
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic {
        /// Username (may contain variables).
        #[serde(default)]
        username: String,
        /// Password (may contain variables).
        #[serde(default)]
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The token (may contain variables like `{{access_token}}`).
        #[serde(default)]
        token: String,
    },
    /// API key sent as a header or query parameter.
    ApiKey {
        /// Header or parameter name.
        #[serde(default)]
        key: String,
        /// The key value.
        #[serde(default)]
        value: String,
        /// Where the key is added.
        #[serde(rename = "in", default)]
        location: ApiKeyLocation,
    },
    /// `OAuth` 1.0 credentials.
    #[serde(rename = "oauth1")]
    OAuth1(OAuth1Config),
    /// `OAuth` 2.0 credentials.
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Config),
    /// Use whatever the nearest ancestor resolves to.
    InheritParent,
}

impl AuthConfig {
    /// The inheriting variant; used as the serde default for requests.
    #[must_use]
    pub const fn inherit() -> Self {
        Self::InheritParent
    }

    /// Returns true for `InheritParent`.
    #[must_use]
    pub const fn is_inherit(&self) -> bool {
        matches!(self, Self::InheritParent)
    }

    /// Returns true if credentials are attached.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::None | Self::InheritParent)
    }

    /// Lowercase tag as written on the wire.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
            Self::ApiKey { .. } => "apiKey",
            Self::OAuth1(_) => "oauth1",
            Self::OAuth2(_) => "oauth2",
            Self::InheritParent => "inheritParent",
        }
    }

    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates an API key authentication.
    #[must_use]
    pub fn api_key(
        key: impl Into<String>,
        value: impl Into<String>,
        location: ApiKeyLocation,
    ) -> Self {
        Self::ApiKey {
            key: key.into(),
            value: value.into(),
            location,
        }
    }

    /// Every credential string, in declaration order.
    #[must_use]
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Self::None | Self::InheritParent => Vec::new(),
            Self::Basic { username, password } => vec![username.as_str(), password.as_str()],
            Self::Bearer { token } => vec![token.as_str()],
            Self::ApiKey { key, value, .. } => vec![key.as_str(), value.as_str()],
            Self::OAuth1(c) => vec![
                c.consumer_key.as_str(),
                c.consumer_secret.as_str(),
                c.token.as_str(),
                c.token_secret.as_str(),
            ],
            Self::OAuth2(c) => {
                let mut fields = vec![
                    c.access_token_url.as_str(),
                    c.client_id.as_str(),
                    c.client_secret.as_str(),
                ];
                fields.extend(c.scope.as_deref());
                fields.extend(c.access_token.as_deref());
                match &c.grant {
                    OAuth2Grant::Password { username, password } => {
                        fields.extend([username.as_str(), password.as_str()]);
                    }
                    OAuth2Grant::Client => {}
                    OAuth2Grant::Code {
                        auth_url,
                        redirect_uri,
                        code,
                    } => fields.extend([auth_url.as_str(), redirect_uri.as_str(), code.as_str()]),
                }
                fields
            }
        }
    }

    /// Mutable references to every credential string, for in-place templating.
    pub fn strings_mut(&mut self) -> Vec<&mut String> {
        match self {
            Self::None | Self::InheritParent => Vec::new(),
            Self::Basic { username, password } => vec![username, password],
            Self::Bearer { token } => vec![token],
            Self::ApiKey { key, value, .. } => vec![key, value],
            Self::OAuth1(c) => vec![
                &mut c.consumer_key,
                &mut c.consumer_secret,
                &mut c.token,
                &mut c.token_secret,
            ],
            Self::OAuth2(c) => {
                let mut fields = vec![
                    &mut c.access_token_url,
                    &mut c.client_id,
                    &mut c.client_secret,
                ];
                fields.extend(c.scope.as_mut());
                fields.extend(c.access_token.as_mut());
                match &mut c.grant {
                    OAuth2Grant::Password { username, password } => {
                        fields.extend([username, password]);
                    }
                    OAuth2Grant::Client => {}
                    OAuth2Grant::Code {
                        auth_url,
                        redirect_uri,
                        code,
                    } => fields.extend([auth_url, redirect_uri, code]),
                }
                fields
            }
        }
    }
}

/// Location for API key authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Add to request headers
    #[default]
    Header,
    /// Add to query parameters
    Query,
}

impl ApiKeyLocation {
    /// Lowercase tag as written on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
        }
    }
}

/// `OAuth` 1.0 credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OAuth1Config {
    /// Consumer key.
    pub consumer_key: String,
    /// Consumer secret.
    pub consumer_secret: String,
    /// Access token.
    pub token: String,
    /// Access token secret.
    pub token_secret: String,
    /// Signature method, e.g. `HMAC-SHA1`.
    pub signature_method: String,
}

/// `OAuth` 2.0 credentials and grant parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Config {
    /// Grant type and its specific fields.
    #[serde(flatten)]
    pub grant: OAuth2Grant,
    /// Token endpoint.
    #[serde(default)]
    pub access_token_url: String,
    /// Client identifier.
    #[serde(default)]
    pub client_id: String,
    /// Client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Space-separated scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Token obtained out of band, sent as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl OAuth2Config {
    /// Creates a client-credentials config.
    #[must_use]
    pub fn client_credentials(
        access_token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            grant: OAuth2Grant::Client,
            access_token_url: access_token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: None,
            access_token: None,
        }
    }
}

/// `OAuth` 2.0 grant with its grant-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grantType", rename_all = "camelCase")]
pub enum OAuth2Grant {
    /// Resource owner password grant.
    Password {
        /// Resource owner username.
        #[serde(default)]
        username: String,
        /// Resource owner password.
        #[serde(default)]
        password: String,
    },
    /// Client credentials grant.
    Client,
    /// Authorization code grant.
    #[serde(rename_all = "camelCase")]
    Code {
        /// Authorization endpoint.
        #[serde(default)]
        auth_url: String,
        /// Redirect URI registered for the client.
        #[serde(default)]
        redirect_uri: String,
        /// Code received on the redirect.
        #[serde(default)]
        code: String,
    },
}

impl OAuth2Grant {
    /// Lowercase tag as written on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::Client => "client",
            Self::Code { .. } => "code",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tags_are_camel_case() {
        let value = serde_json::to_value(AuthConfig::InheritParent).unwrap();
        assert_eq!(value, json!({"type": "inheritParent"}));

        let value = serde_json::to_value(AuthConfig::api_key(
            "X-Key",
            "secret",
            ApiKeyLocation::Query,
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({"type": "apiKey", "key": "X-Key", "value": "secret", "in": "query"})
        );
    }

    #[test]
    fn test_oauth2_grant_fields_are_flat() {
        let auth: AuthConfig = serde_json::from_value(json!({
            "type": "oauth2",
            "grantType": "code",
            "accessTokenUrl": "https://auth.test/token",
            "clientId": "cid",
            "clientSecret": "secret",
            "authUrl": "https://auth.test/authorize",
            "redirectUri": "https://app.test/cb",
            "code": "abc"
        }))
        .unwrap();

        let AuthConfig::OAuth2(config) = &auth else {
            unreachable!("Expected OAuth2 auth");
        };
        assert_eq!(config.client_id, "cid");
        let OAuth2Grant::Code { redirect_uri, .. } = &config.grant else {
            unreachable!("Expected code grant");
        };
        assert_eq!(redirect_uri, "https://app.test/cb");

        let back = serde_json::to_value(&auth).unwrap();
        assert_eq!(back["grantType"], "code");
        assert_eq!(back["authUrl"], "https://auth.test/authorize");
    }

    #[test]
    fn test_strings_mut_covers_grant_fields() {
        let mut auth = AuthConfig::OAuth2(OAuth2Config {
            grant: OAuth2Grant::Password {
                username: "u".to_string(),
                password: "p".to_string(),
            },
            scope: Some("read".to_string()),
            ..OAuth2Config::client_credentials("t", "c", "s")
        });
        assert_eq!(auth.strings_mut().len(), 6);
        assert_eq!(auth.strings(), vec!["t", "c", "s", "read", "u", "p"]);
        assert!(AuthConfig::InheritParent.strings_mut().is_empty());
    }

    #[test]
    fn test_inherit_is_not_configured() {
        assert!(!AuthConfig::InheritParent.is_configured());
        assert!(!AuthConfig::None.is_configured());
        assert!(AuthConfig::bearer("t").is_configured());
    }
}
