//! Postman Collection v2.1 exporter.
//!
//! A one-way projection: the canonical tree is written depth-first with
//! folders ahead of sibling requests. Saved responses are not exported.

use serde_json::Value;
use url::Url;
use workbench_domain::{
    AuthConfig, Collection, Folder, FormDataType, Header, OAuth2Grant, QueryParam, RawLanguage,
    Request, RequestBody, Variable,
};

use crate::import::postman::types::{
    PostmanAuth, PostmanAuthParam, PostmanBody, PostmanBodyFile, PostmanBodyOptions,
    PostmanDescription, PostmanFormDataParam, PostmanFormParam, PostmanGraphQL, PostmanHeader,
    PostmanInfo, PostmanItem, PostmanQueryParam, PostmanRawOptions, PostmanRequest,
    PostmanSegments, PostmanUrl, PostmanUrlStructured, PostmanVariable,
};
use crate::import::postman::{POSTMAN_SCHEMA_V21, PostmanCollection};
use crate::serialization::{SerializationError, to_json_stable};

/// Projects a collection into the Postman v2.1 shape.
#[must_use]
pub fn export_collection(collection: &Collection) -> PostmanCollection {
    let auth = match &collection.auth {
        None | Some(AuthConfig::InheritParent) => PostmanAuth::of_type("noauth"),
        Some(auth) => export_auth(auth),
    };

    PostmanCollection {
        info: PostmanInfo {
            postman_id: Some(collection.id.clone()),
            name: collection.name.clone(),
            description: description(collection.description.as_deref()),
            schema: Some(POSTMAN_SCHEMA_V21.to_string()),
        },
        item: export_items(&collection.folders, &collection.requests),
        auth: Some(auth),
        variable: collection.variables.iter().map(export_variable).collect(),
        event: Vec::new(),
    }
}

/// Exports a collection as deterministic, pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_collection_json(collection: &Collection) -> Result<String, SerializationError> {
    let exported = export_collection(collection);
    tracing::debug!(
        collection = %collection.name,
        items = exported.item.len(),
        "collection exported"
    );
    to_json_stable(&exported)
}

fn export_items(folders: &[Folder], requests: &[Request]) -> Vec<PostmanItem> {
    folders
        .iter()
        .map(export_folder)
        .chain(requests.iter().map(export_request))
        .collect()
}

fn export_folder(folder: &Folder) -> PostmanItem {
    PostmanItem {
        name: folder.name.clone(),
        description: description(folder.description.as_deref()),
        item: Some(export_items(&folder.folders, &folder.requests)),
        request: None,
        response: Vec::new(),
        event: Vec::new(),
        auth: folder.auth.as_ref().and_then(nested_auth),
    }
}

fn export_request(request: &Request) -> PostmanItem {
    PostmanItem {
        name: request.name.clone(),
        description: None,
        item: None,
        request: Some(PostmanRequest {
            method: request.method.as_str().to_string(),
            header: request.headers.iter().map(export_header).collect(),
            url: export_url(&request.url, &request.query_params),
            auth: nested_auth(&request.auth),
            body: export_body(&request.body),
            description: description(request.description.as_deref()),
        }),
        response: Vec::new(),
        event: Vec::new(),
        auth: None,
    }
}

fn description(text: Option<&str>) -> Option<PostmanDescription> {
    text.filter(|t| !t.trim().is_empty())
        .map(|t| PostmanDescription::Text(t.to_string()))
}

fn export_variable(variable: &Variable) -> PostmanVariable {
    PostmanVariable {
        key: variable.name.clone(),
        value: Value::String(variable.initial_value.clone()),
        var_type: Some("string".to_string()),
        description: None,
        disabled: false,
    }
}

fn export_header(header: &Header) -> PostmanHeader {
    PostmanHeader {
        key: header.key.clone(),
        value: header.value.clone(),
        header_type: Some("text".to_string()),
        description: header.description.clone(),
        disabled: !header.is_selected,
    }
}

fn export_url(raw: &str, query: &[QueryParam]) -> PostmanUrl {
    let parsed = Url::parse(raw).ok();
    let protocol = parsed
        .as_ref()
        .map(|url| url.scheme().to_string())
        .or_else(|| raw.split_once("://").map(|(scheme, _)| scheme.to_string()))
        .filter(|scheme| !scheme.is_empty());
    let host = parsed
        .as_ref()
        .and_then(Url::host_str)
        .map(|host| host.split('.').map(str::to_string).collect())
        .unwrap_or_default();

    PostmanUrl::Structured(PostmanUrlStructured {
        raw: Some(raw.to_string()),
        protocol,
        host: PostmanSegments::Parts(host),
        port: None,
        path: PostmanSegments::default(),
        query: query
            .iter()
            .map(|param| PostmanQueryParam {
                key: param.key.clone(),
                value: Some(param.value.clone()),
                description: param.description.clone(),
                disabled: !param.is_selected,
            })
            .collect(),
    })
}

/// Folder and request auth: inheriting is Postman's default, so it is omitted.
fn nested_auth(auth: &AuthConfig) -> Option<PostmanAuth> {
    (!auth.is_inherit()).then(|| export_auth(auth))
}

fn params(pairs: &[(&str, &str)]) -> Vec<PostmanAuthParam> {
    pairs
        .iter()
        .map(|(key, value)| PostmanAuthParam::string(key, value))
        .collect()
}

fn export_auth(auth: &AuthConfig) -> PostmanAuth {
    match auth {
        AuthConfig::None | AuthConfig::InheritParent => PostmanAuth::of_type("noauth"),
        AuthConfig::Basic { username, password } => PostmanAuth {
            basic: params(&[("username", username.as_str()), ("password", password.as_str())]),
            ..PostmanAuth::of_type("basic")
        },
        AuthConfig::Bearer { token } => PostmanAuth {
            bearer: params(&[("token", token.as_str())]),
            ..PostmanAuth::of_type("bearer")
        },
        AuthConfig::ApiKey {
            key,
            value,
            location,
        } => PostmanAuth {
            apikey: params(&[("key", key.as_str()), ("value", value.as_str()), ("in", location.as_str())]),
            ..PostmanAuth::of_type("apikey")
        },
        AuthConfig::OAuth1(config) => PostmanAuth {
            oauth1: params(&[
                ("consumerKey", config.consumer_key.as_str()),
                ("consumerSecret", config.consumer_secret.as_str()),
                ("token", config.token.as_str()),
                ("tokenSecret", config.token_secret.as_str()),
                ("signatureMethod", config.signature_method.as_str()),
            ]),
            ..PostmanAuth::of_type("oauth1")
        },
        AuthConfig::OAuth2(config) => {
            let grant_type = match &config.grant {
                OAuth2Grant::Password { .. } => "password_credentials",
                OAuth2Grant::Client => "client_credentials",
                OAuth2Grant::Code { .. } => "authorization_code",
            };
            let mut pairs: Vec<(&str, &str)> = vec![
                ("grant_type", grant_type),
                ("accessTokenUrl", config.access_token_url.as_str()),
                ("clientId", config.client_id.as_str()),
                ("clientSecret", config.client_secret.as_str()),
            ];
            if let Some(scope) = &config.scope {
                pairs.push(("scope", scope.as_str()));
            }
            if let Some(token) = &config.access_token {
                pairs.push(("accessToken", token.as_str()));
            }
            match &config.grant {
                OAuth2Grant::Password { username, password } => {
                    pairs.extend([("username", username.as_str()), ("password", password.as_str())]);
                }
                OAuth2Grant::Client => {}
                OAuth2Grant::Code {
                    auth_url,
                    redirect_uri,
                    code,
                } => pairs.extend([
                    ("authUrl", auth_url.as_str()),
                    ("redirect_uri", redirect_uri.as_str()),
                    ("code", code.as_str()),
                ]),
            }
            PostmanAuth {
                oauth2: params(&pairs),
                ..PostmanAuth::of_type("oauth2")
            }
        }
    }
}

fn export_body(body: &RequestBody) -> Option<PostmanBody> {
    let exported = match body {
        RequestBody::None => return None,
        RequestBody::Raw { content, language } => PostmanBody {
            raw: Some(content.clone()),
            options: Some(PostmanBodyOptions {
                raw: Some(PostmanRawOptions {
                    language: Some(RawLanguage::effective(*language).as_str().to_string()),
                }),
            }),
            ..PostmanBody::mode("raw")
        },
        RequestBody::FormData { items } => PostmanBody {
            formdata: items
                .iter()
                .map(|item| PostmanFormDataParam {
                    key: item.key.clone(),
                    value: Some(item.value.clone()),
                    param_type: Some(
                        match item.item_type {
                            FormDataType::Text => "text",
                            FormDataType::File => "file",
                        }
                        .to_string(),
                    ),
                    src: item
                        .src
                        .as_ref()
                        .filter(|src| !src.is_empty())
                        .map_or(Value::Null, |src| Value::String(src.clone())),
                    description: None,
                    disabled: !item.is_selected,
                })
                .collect(),
            ..PostmanBody::mode("formdata")
        },
        RequestBody::UrlEncoded { items } => PostmanBody {
            urlencoded: items
                .iter()
                .map(|item| PostmanFormParam {
                    key: item.key.clone(),
                    value: Some(item.value.clone()),
                    param_type: Some("text".to_string()),
                    description: None,
                    disabled: !item.is_selected,
                })
                .collect(),
            ..PostmanBody::mode("urlencoded")
        },
        RequestBody::File(file) => PostmanBody {
            file: Some(PostmanBodyFile {
                src: file.src.clone(),
                content: None,
            }),
            ..PostmanBody::mode("file")
        },
        RequestBody::GraphQl { query, variables } => PostmanBody {
            graphql: Some(PostmanGraphQL {
                query: query.clone(),
                variables: Some(variables.clone()),
            }),
            ..PostmanBody::mode("graphql")
        },
    };
    Some(exported)
}
