//! Request payloads and their transport encoding.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::RequestBody;
use crate::types::{Blob, FormData, SearchParams};

/// What a caller can send as a request body.
///
/// Binary, url-encoded, multipart and text payloads are handed to the
/// transport as they are; a structured `Value` is serialized to JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Blob(Blob),
    SearchParams(SearchParams),
    FormData(FormData),
    Text(String),
    Value(Value),
}

impl Payload {
    /// Structured payload from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        Ok(Payload::Value(serde_json::to_value(value)?))
    }
}

impl Default for Payload {
    /// The empty JSON object.
    fn default() -> Self {
        Payload::Value(Value::Object(Default::default()))
    }
}

impl From<Blob> for Payload {
    fn from(blob: Blob) -> Self {
        Payload::Blob(blob)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Blob(Blob::octet_stream(bytes))
    }
}

impl From<SearchParams> for Payload {
    fn from(params: SearchParams) -> Self {
        Payload::SearchParams(params)
    }
}

impl From<FormData> for Payload {
    fn from(form: FormData) -> Self {
        Payload::FormData(form)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Value(value)
    }
}

/// Turn a payload into what the transport receives.
pub fn encode_body(payload: Payload) -> Result<RequestBody, ClientError> {
    Ok(match payload {
        Payload::Blob(blob) => RequestBody::Blob(blob),
        Payload::SearchParams(params) => RequestBody::SearchParams(params),
        Payload::FormData(form) => RequestBody::FormData(form),
        Payload::Text(text) => RequestBody::Text(text),
        Payload::Value(value) => RequestBody::Text(serde_json::to_string(&value)?),
    })
}
