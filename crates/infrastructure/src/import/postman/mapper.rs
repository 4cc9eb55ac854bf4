//! Postman → canonical mapping

use serde_json::Value;
use workbench_domain::{
    ApiKeyLocation, AuthConfig, Collection, FileBody, Folder, FormDataItem, FormDataType, Header,
    HttpMethod, OAuth1Config, OAuth2Config, OAuth2Grant, QueryParam, RawLanguage, Request,
    RequestBody, ResponseEntry, UrlEncodedItem, Variable,
};

use super::types::{
    PostmanAuth, PostmanAuthParam, PostmanBody, PostmanBodyFile, PostmanCollection,
    PostmanGraphQL, PostmanItem, PostmanRequest, PostmanVariable,
};
use crate::import::document::{scalar_text, str_field};
use crate::import::warning::{ImportWarning, child_path};

const DEFAULT_FOLDER_NAME: &str = "Untitled Folder";
const DEFAULT_REQUEST_NAME: &str = "Postman Request";

/// Maps a parsed Postman collection into the canonical model.
pub fn map_collection(postman: &PostmanCollection) -> (Collection, Vec<ImportWarning>) {
    let mut mapper = Mapper::default();
    let name = if postman.info.name.trim().is_empty() {
        "Imported Postman Collection".to_string()
    } else {
        postman.info.name.clone()
    };

    let mut collection = Collection::new(&name);
    collection.description = postman.info.description.as_ref().and_then(|d| d.text());
    collection.auth = Some(
        postman
            .auth
            .as_ref()
            .map_or(AuthConfig::None, |auth| mapper.auth(auth, &name)),
    );
    collection.variables = postman.variable.iter().map(map_variable).collect();
    if !postman.event.is_empty() {
        mapper.scripts_skipped(&name);
    }

    let (folders, requests) = mapper.items(&postman.item, &name);
    collection.folders = folders;
    collection.requests = requests;
    (collection, mapper.warnings)
}

fn map_variable(variable: &PostmanVariable) -> Variable {
    let mut mapped = Variable::new(&variable.key, scalar_text(&variable.value));
    mapped.is_selected = !variable.disabled;
    mapped
}

#[derive(Default)]
struct Mapper {
    warnings: Vec<ImportWarning>,
}

impl Mapper {
    fn items(&mut self, items: &[PostmanItem], path: &str) -> (Vec<Folder>, Vec<Request>) {
        let mut folders = Vec::new();
        let mut requests = Vec::new();

        for item in items {
            if let Some(children) = &item.item {
                folders.push(self.folder(item, children, path));
            } else if let Some(request) = &item.request {
                if let Some(mapped) = self.request(item, request, path) {
                    requests.push(mapped);
                }
            } else {
                self.warnings.push(ImportWarning::warning(
                    child_path(path, &item.name),
                    "item has neither a request nor sub-items; skipped",
                ));
            }
        }

        (folders, requests)
    }

    fn folder(&mut self, item: &PostmanItem, children: &[PostmanItem], parent: &str) -> Folder {
        let name = if item.name.is_empty() {
            DEFAULT_FOLDER_NAME
        } else {
            item.name.as_str()
        };
        let path = child_path(parent, name);

        let mut folder = Folder::new(name);
        folder.description = item.description_text();
        folder.auth = item.auth.as_ref().map(|auth| self.auth(auth, &path));
        if !item.event.is_empty() {
            self.scripts_skipped(&path);
        }

        let (folders, requests) = self.items(children, &path);
        folder.folders = folders;
        folder.requests = requests;
        folder
    }

    fn request(
        &mut self,
        item: &PostmanItem,
        source: &PostmanRequest,
        parent: &str,
    ) -> Option<Request> {
        let name = if item.name.is_empty() {
            DEFAULT_REQUEST_NAME
        } else {
            item.name.as_str()
        };
        let path = child_path(parent, name);

        let Ok(method) = source.method.parse::<HttpMethod>() else {
            self.warnings.push(ImportWarning::warning(
                &path,
                format!("method {} is not supported; request skipped", source.method),
            ));
            return None;
        };

        let mut request = Request::new(name).with_target(method, source.url.raw());
        request.description = source.description_text().or_else(|| item.description_text());
        request.headers = source
            .header
            .iter()
            .map(|h| Header {
                key: h.key.clone(),
                value: h.value.clone(),
                description: h.description.clone(),
                is_selected: !h.disabled,
            })
            .collect();
        request.query_params = source
            .url
            .query_params()
            .iter()
            .map(|q| QueryParam {
                key: q.key.clone(),
                value: q.value.clone().unwrap_or_default(),
                description: q.description.clone(),
                is_selected: !q.disabled,
            })
            .collect();
        request.auth = source
            .auth
            .as_ref()
            .map_or(AuthConfig::InheritParent, |auth| self.auth(auth, &path));

        let language = source.body.as_ref().and_then(PostmanBody::raw_language);
        request.content_type = if language == Some("json") {
            "application/json".to_string()
        } else {
            "text/plain".to_string()
        };
        request.body = source
            .body
            .as_ref()
            .map_or(RequestBody::None, |body| self.body(body, &path));

        for response in &item.response {
            if let Some(entry) = map_response(response) {
                request.push_response(entry);
            }
        }
        if !item.event.is_empty() {
            self.scripts_skipped(&path);
        }

        Some(request)
    }

    fn body(&mut self, body: &PostmanBody, path: &str) -> RequestBody {
        match body.mode.as_str() {
            "raw" => {
                let language = body
                    .raw_language()
                    .and_then(RawLanguage::parse)
                    .unwrap_or(RawLanguage::Text);
                RequestBody::raw(body.raw.clone().unwrap_or_default(), language)
            }
            "formdata" => RequestBody::FormData {
                items: body
                    .formdata
                    .iter()
                    .map(|param| {
                        let is_file = param.param_type.as_deref() == Some("file");
                        FormDataItem {
                            key: param.key.clone(),
                            value: param.value.clone().unwrap_or_default(),
                            item_type: if is_file {
                                FormDataType::File
                            } else {
                                FormDataType::Text
                            },
                            src: if is_file { param.src_path() } else { None },
                            is_selected: !param.disabled,
                        }
                    })
                    .collect(),
            },
            "urlencoded" => RequestBody::UrlEncoded {
                items: body
                    .urlencoded
                    .iter()
                    .map(|param| UrlEncodedItem {
                        key: param.key.clone(),
                        value: param.value.clone().unwrap_or_default(),
                        is_selected: !param.disabled,
                    })
                    .collect(),
            },
            "file" => {
                let file = body.file.clone().unwrap_or_else(|| PostmanBodyFile {
                    src: None,
                    content: None,
                });
                let src = file.src.filter(|s| !s.is_empty());
                RequestBody::File(FileBody {
                    name: src
                        .as_deref()
                        .and_then(|s| s.rsplit(['/', '\\']).next())
                        .unwrap_or_default()
                        .to_string(),
                    content: file.content.unwrap_or_default(),
                    src,
                })
            }
            "graphql" => {
                let graphql = body.graphql.clone().unwrap_or_else(|| PostmanGraphQL {
                    query: String::new(),
                    variables: None,
                });
                RequestBody::GraphQl {
                    query: graphql.query,
                    variables: graphql.variables.unwrap_or_default(),
                }
            }
            "" | "none" => RequestBody::None,
            other => {
                self.warnings.push(ImportWarning::warning(
                    path,
                    format!("body mode {other} is not supported; body dropped"),
                ));
                RequestBody::None
            }
        }
    }

    fn auth(&mut self, auth: &PostmanAuth, path: &str) -> AuthConfig {
        match auth.auth_type.as_str() {
            "noauth" => AuthConfig::None,
            "inherit" => AuthConfig::InheritParent,
            "basic" => AuthConfig::basic(param(&auth.basic, "username"), param(&auth.basic, "password")),
            "bearer" => AuthConfig::bearer(param(&auth.bearer, "token")),
            "apikey" => {
                let location = if param(&auth.apikey, "in") == "query" {
                    ApiKeyLocation::Query
                } else {
                    ApiKeyLocation::Header
                };
                AuthConfig::api_key(param(&auth.apikey, "key"), param(&auth.apikey, "value"), location)
            }
            "oauth1" => AuthConfig::OAuth1(OAuth1Config {
                consumer_key: param(&auth.oauth1, "consumerKey"),
                consumer_secret: param(&auth.oauth1, "consumerSecret"),
                token: param(&auth.oauth1, "token"),
                token_secret: param(&auth.oauth1, "tokenSecret"),
                signature_method: param(&auth.oauth1, "signatureMethod"),
            }),
            "oauth2" => {
                let params = &auth.oauth2;
                let grant = match param(params, "grant_type").as_str() {
                    "password" | "password_credentials" => OAuth2Grant::Password {
                        username: param(params, "username"),
                        password: param(params, "password"),
                    },
                    "code" | "authorization_code" | "authorization_code_with_pkce" => {
                        OAuth2Grant::Code {
                            auth_url: param(params, "authUrl"),
                            redirect_uri: param(params, "redirect_uri"),
                            code: param(params, "code"),
                        }
                    }
                    _ => OAuth2Grant::Client,
                };
                AuthConfig::OAuth2(OAuth2Config {
                    grant,
                    access_token_url: param(params, "accessTokenUrl"),
                    client_id: param(params, "clientId"),
                    client_secret: param(params, "clientSecret"),
                    scope: optional_param(params, "scope"),
                    access_token: optional_param(params, "accessToken"),
                })
            }
            other => {
                self.warnings.push(ImportWarning::warning(
                    path,
                    format!("auth type {other} is not supported; using no auth"),
                ));
                AuthConfig::None
            }
        }
    }

    fn scripts_skipped(&mut self, path: &str) {
        self.warnings
            .push(ImportWarning::info(path, "scripts are not imported"));
    }
}

fn param(params: &[PostmanAuthParam], key: &str) -> String {
    PostmanAuth::get_param(params, key).unwrap_or_default()
}

fn optional_param(params: &[PostmanAuthParam], key: &str) -> Option<String> {
    PostmanAuth::get_param(params, key).filter(|v| !v.is_empty())
}

fn map_response(response: &Value) -> Option<ResponseEntry> {
    let code = response.get("code").and_then(Value::as_u64)?;
    let code = u16::try_from(code).ok()?;
    Some(ResponseEntry::now(
        code,
        str_field(response, "status").unwrap_or_default(),
        str_field(response, "body").unwrap_or_default(),
    ))
}
