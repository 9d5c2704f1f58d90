//! Asynchronous fetch client with content negotiation.
//!
//! # Overview
//! Issues GET/POST/PUT/DELETE requests against a configurable base URL through
//! a host-supplied `Transport`. Query strings and request bodies are encoded
//! automatically, response bodies are decoded from their `Content-Type`, and
//! statuses outside `[200, 310)` become `ClientError::Status`.
//!
//! # Design
//! - `Client` holds only configuration and the transport; nothing is shared
//!   between calls besides that configuration.
//! - Each stage of the pipeline is a free function (`resolve_url`,
//!   `encode_query`, `encode_body`, `validate_status`, `decode_response`) so it
//!   can be tested on its own.
//! - Response bodies are consumed by value: a response is validated, then
//!   decoded, and never read twice.
//! - No retries, timeouts or pooling; wrap the transport for those.

pub mod body;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod headers;
pub mod http;
pub mod query;
pub mod status;
pub mod types;
pub mod url;

pub use body::{encode_body, Payload};
pub use client::Client;
pub use config::ClientConfig;
pub use decode::{decode_response, ResponseData};
pub use error::{ClientError, ErrorKind};
pub use headers::Headers;
pub use http::{
    HttpMethod, RequestBody, RequestMode, RequestOptions, ResponseEnvelope, Transport, TransportError,
};
pub use query::{encode_query, QueryParams, QueryValue};
pub use status::validate_status;
pub use types::{Blob, FormData, FormValue, SearchParams};
pub use url::resolve_url;
