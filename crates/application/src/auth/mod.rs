//! Applying authorization to outgoing requests.
//!
//! This module provides:
//! - credential computation for resolved auth configs
//! - `OAuth2` token request building

mod credentials;
mod oauth;

pub use credentials::{AuthResolution, resolve_credentials};
pub use oauth::{oauth2_token_params, oauth2_token_request};
