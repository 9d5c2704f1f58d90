//! Response decoding keyed on `Content-Type`.
//!
//! # Design
//! The header value is matched by substring, case-sensitive, in a fixed
//! order: JSON, plain text, octet stream, then form data. The form-data arm
//! matches `multipart/form-data` or the literal `application/x-www-form-encoded`.
//! A missing or unmatched header is a `ClientError::Decode`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::{HttpMethod, ResponseEnvelope};
use crate::types::{Blob, FormData};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Text(String),
    Blob(Blob),
    Form(FormData),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            ResponseData::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            ResponseData::Form(form) => Some(form),
            _ => None,
        }
    }

    /// Deserialize a JSON body into `T`. Other bodies are a `Json` error.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        match self {
            ResponseData::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseData::Text(text) => Ok(serde_json::from_str(&text)?),
            ResponseData::Blob(blob) => Ok(serde_json::from_slice(blob.bytes())?),
            ResponseData::Form(_) => Err(ClientError::Json(serde::de::Error::custom(
                "form data is not JSON",
            ))),
        }
    }
}

/// Decode `response` according to its `Content-Type`, consuming the body.
pub async fn decode_response(
    response: ResponseEnvelope,
    url: &str,
    method: HttpMethod,
) -> Result<ResponseData, ClientError> {
    let Some(content_type) = response.content_type().map(str::to_string) else {
        tracing::warn!(%method, url, "response has no Content-Type");
        return Err(ClientError::Decode {
            method,
            url: url.to_string(),
            content_type: None,
        });
    };

    if content_type.contains("application/json") {
        tracing::debug!(%method, url, "decoding json");
        return Ok(ResponseData::Json(response.json().await?));
    }
    if content_type.contains("text/plain") {
        tracing::debug!(%method, url, "decoding text");
        return Ok(ResponseData::Text(response.text().await));
    }
    if content_type.contains("application/octet-stream") {
        tracing::debug!(%method, url, "decoding blob");
        return Ok(ResponseData::Blob(response.blob().await));
    }
    if content_type.contains("multipart/form-data")
        || content_type.contains("application/x-www-form-encoded")
    {
        tracing::debug!(%method, url, "decoding form data");
        return Ok(ResponseData::Form(response.form_data().await?));
    }

    tracing::warn!(%method, url, content_type = %content_type, "unsupported Content-Type");
    Err(ClientError::Decode {
        method,
        url: url.to_string(),
        content_type: Some(content_type),
    })
}
