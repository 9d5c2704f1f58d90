//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::headers::Headers;
use crate::http::RequestMode;

/// Base URL, default headers and request mode shared by every call of a client.
///
/// Missing fields take their defaults when deserialized, so a host can keep a
/// partial config in JSON or TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub default_headers: Headers,
    pub mode: RequestMode,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            default_headers: Headers::defaults(),
            mode: RequestMode::Cors,
        }
    }
}
