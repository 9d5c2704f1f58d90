//! HTTP transport types for the injected-transport pattern.
//!
//! # Design
//! The client never opens a socket. It hands a URL and `RequestOptions` to a
//! `Transport` supplied by the host and receives a `ResponseEnvelope` back,
//! which keeps the pipeline deterministic and easy to test. The envelope's
//! body accessors take `self`, so a response body can be read at most once.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::headers::{Headers, CONTENT_TYPE};
use crate::types::{Blob, FormData, SearchParams};

/// Error produced by a transport. Passed to the caller untranslated.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch request mode forwarded to the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    #[default]
    Cors,
    SameOrigin,
    NoCors,
    Navigate,
}

impl RequestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMode::Cors => "cors",
            RequestMode::SameOrigin => "same-origin",
            RequestMode::NoCors => "no-cors",
            RequestMode::Navigate => "navigate",
        }
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-ready request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Blob(Blob),
    SearchParams(SearchParams),
    FormData(FormData),
    Text(String),
}

/// Everything a transport needs besides the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub mode: RequestMode,
}

/// An HTTP response as produced by a transport.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl ResponseEnvelope {
    pub fn new(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }

    /// Read the body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Read the body as UTF-8 text, replacing invalid sequences.
    pub async fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Read the body as a `Blob` typed with the response `Content-Type`.
    pub async fn blob(self) -> Blob {
        let content_type = self.content_type().unwrap_or_default().to_string();
        Blob::new(self.body, content_type)
    }

    /// Read a multipart or url-encoded body as `FormData`.
    pub async fn form_data(self) -> Result<FormData, ClientError> {
        let content_type = self.content_type().unwrap_or_default().to_string();
        if content_type.contains("multipart/form-data") {
            FormData::from_multipart(self.body, &content_type).await
        } else {
            FormData::from_urlencoded(&self.body)
        }
    }
}

/// The injected network primitive.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request against `url`.
    async fn fetch(&self, url: &str, options: RequestOptions) -> Result<ResponseEnvelope, TransportError>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn fetch(&self, url: &str, options: RequestOptions) -> Result<ResponseEnvelope, TransportError> {
        (**self).fetch(url, options).await
    }
}
