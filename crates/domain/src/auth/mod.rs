//! Authorization types and inheritance

mod resolve;
mod types;

pub use resolve::{resolve_auth, try_resolve_auth};
pub use types::{ApiKeyLocation, AuthConfig, OAuth1Config, OAuth2Config, OAuth2Grant};
