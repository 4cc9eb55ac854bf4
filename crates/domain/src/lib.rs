//! Workbench Domain - Core model types
//!
//! Collections, folders, requests and their authorization settings, plus the
//! pure tree operations over them. Nothing in this crate performs I/O.

pub mod auth;
pub mod collection;
pub mod error;
pub mod id;
pub mod request;

pub use auth::{
    ApiKeyLocation, AuthConfig, OAuth1Config, OAuth2Config, OAuth2Grant, resolve_auth,
    try_resolve_auth,
};
pub use collection::{Collection, Folder, Node, NodeKind, NodeRef, Variable};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use request::{
    FileBody, FormDataItem, FormDataType, Header, HttpMethod, KeyValue, QueryParam, RawLanguage,
    Request, RequestBody, ResponseEntry, UrlEncodedItem,
};
