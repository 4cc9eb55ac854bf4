//! Adapters for outbound ports.

mod reqwest_transport;

pub use reqwest_transport::{DEFAULT_TIMEOUT_MS, ReqwestTransport};
