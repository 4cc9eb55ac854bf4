//! `OAuth` 2.0 token request building
//!
//! Only the token request is built here; exchanging it and any browser
//! redirect flow are left to the caller.

use workbench_domain::{HttpMethod, OAuth2Config, OAuth2Grant};

use crate::ports::{TransportBody, TransportRequest};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds the form parameters sent to the token endpoint.
#[must_use]
pub fn oauth2_token_params(config: &OAuth2Config) -> Vec<(String, String)> {
    let mut params: Vec<(&str, &str)> = match &config.grant {
        OAuth2Grant::Password { username, password } => vec![
            ("grant_type", "password"),
            ("username", username.as_str()),
            ("password", password.as_str()),
        ],
        OAuth2Grant::Client => vec![("grant_type", "client_credentials")],
        OAuth2Grant::Code {
            redirect_uri, code, ..
        } => vec![
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    };
    params.push(("client_id", config.client_id.as_str()));
    params.push(("client_secret", config.client_secret.as_str()));
    if let Some(scope) = config.scope.as_deref().filter(|s| !s.is_empty()) {
        params.push(("scope", scope));
    }

    params
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Builds the POST request that asks the token endpoint for an access token.
#[must_use]
pub fn oauth2_token_request(config: &OAuth2Config) -> TransportRequest {
    TransportRequest {
        method: HttpMethod::Post,
        url: config.access_token_url.clone(),
        headers: vec![
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ],
        body: Some(TransportBody::UrlEncoded(oauth2_token_params(config))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_client_credentials_request() {
        let mut config = OAuth2Config::client_credentials("https://auth.test/token", "cid", "sec");
        config.scope = Some("read write".to_string());

        let request = oauth2_token_request(&config);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://auth.test/token");
        assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(
            request.body,
            Some(TransportBody::UrlEncoded(pairs(&[
                ("grant_type", "client_credentials"),
                ("client_id", "cid"),
                ("client_secret", "sec"),
                ("scope", "read write"),
            ])))
        );
    }

    #[test]
    fn test_password_grant_params() {
        let config = OAuth2Config {
            grant: OAuth2Grant::Password {
                username: "ann".to_string(),
                password: "pw".to_string(),
            },
            ..OAuth2Config::client_credentials("https://auth.test/token", "cid", "sec")
        };
        assert_eq!(
            oauth2_token_params(&config),
            pairs(&[
                ("grant_type", "password"),
                ("username", "ann"),
                ("password", "pw"),
                ("client_id", "cid"),
                ("client_secret", "sec"),
            ])
        );
    }

    #[test]
    fn test_code_grant_params() {
        let config = OAuth2Config {
            grant: OAuth2Grant::Code {
                auth_url: "https://auth.test/authorize".to_string(),
                redirect_uri: "https://app.test/cb".to_string(),
                code: "xyz".to_string(),
            },
            ..OAuth2Config::client_credentials("https://auth.test/token", "cid", "sec")
        };
        let params = oauth2_token_params(&config);
        assert_eq!(params[0], ("grant_type".to_string(), "authorization_code".to_string()));
        assert_eq!(params[1], ("code".to_string(), "xyz".to_string()));
        assert_eq!(params[2], ("redirect_uri".to_string(), "https://app.test/cb".to_string()));
    }
}
