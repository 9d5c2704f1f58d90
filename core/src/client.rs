//! Request client built on an injected transport.
//!
//! # Design
//! `Client` owns a `ClientConfig` and a `Transport`. Every verb runs the same
//! pipeline: resolve the URL against the base, encode the query or the body,
//! call the transport with the default headers overlaid by the per-call ones,
//! validate the status, then decode the body by `Content-Type`. A failed status
//! check consumes the body, so decoding never runs on that path. `delete` stops
//! after validation. Setters take `&mut self`; share a configured client by
//! reference or clone it.

use tracing::instrument;

use crate::body::{encode_body, Payload};
use crate::config::ClientConfig;
use crate::decode::{decode_response, ResponseData};
use crate::error::ClientError;
use crate::headers::Headers;
use crate::http::{HttpMethod, RequestBody, RequestMode, RequestOptions, ResponseEnvelope, Transport};
use crate::query::QueryParams;
use crate::status::validate_status;
use crate::url::resolve_url;

#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self::with_config(ClientConfig::new(base_url), transport)
    }

    pub fn with_config(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Merge `headers` over the default headers; `headers` wins on conflicts.
    pub fn set_headers(&mut self, headers: &Headers) {
        self.config.default_headers.merge(headers);
    }

    pub fn set_default_url(&mut self, url: impl Into<String>) {
        self.config.base_url = url.into();
    }

    pub fn set_mode(&mut self, mode: RequestMode) {
        self.config.mode = mode;
    }

    /// GET `target` with `params` appended as a query string.
    #[instrument(skip(self, params, headers))]
    pub async fn get(
        &self,
        target: &str,
        params: &QueryParams,
        headers: &Headers,
    ) -> Result<ResponseData, ClientError> {
        let url = resolve_url(target, &self.config.base_url);
        let full_url = format!("{url}{}", params.to_query_string());
        let response = self
            .send(&full_url, self.options(HttpMethod::Get, headers, None))
            .await?;
        self.finish(response, &url, HttpMethod::Get).await
    }

    #[instrument(skip(self, payload, headers))]
    pub async fn post(
        &self,
        target: &str,
        payload: impl Into<Payload>,
        headers: &Headers,
    ) -> Result<ResponseData, ClientError> {
        self.send_with_body(HttpMethod::Post, target, payload.into(), headers)
            .await
    }

    #[instrument(skip(self, payload, headers))]
    pub async fn put(
        &self,
        target: &str,
        payload: impl Into<Payload>,
        headers: &Headers,
    ) -> Result<ResponseData, ClientError> {
        self.send_with_body(HttpMethod::Put, target, payload.into(), headers)
            .await
    }

    /// DELETE `target`. The response body is only read if the status is rejected.
    #[instrument(skip(self, headers))]
    pub async fn delete(&self, target: &str, headers: &Headers) -> Result<(), ClientError> {
        let url = resolve_url(target, &self.config.base_url);
        let response = self
            .send(&url, self.options(HttpMethod::Delete, headers, None))
            .await?;
        validate_status(response, &url, HttpMethod::Delete).await?;
        Ok(())
    }

    async fn send_with_body(
        &self,
        method: HttpMethod,
        target: &str,
        payload: Payload,
        headers: &Headers,
    ) -> Result<ResponseData, ClientError> {
        let body = encode_body(payload)?;
        let url = resolve_url(target, &self.config.base_url);
        let response = self
            .send(&url, self.options(method, headers, Some(body)))
            .await?;
        self.finish(response, &url, method).await
    }

    fn options(&self, method: HttpMethod, headers: &Headers, body: Option<RequestBody>) -> RequestOptions {
        RequestOptions {
            method,
            headers: self.config.default_headers.merged(headers),
            body,
            mode: self.config.mode,
        }
    }

    async fn send(&self, url: &str, options: RequestOptions) -> Result<ResponseEnvelope, ClientError> {
        tracing::debug!(method = %options.method, url, "sending request");
        Ok(self.transport.fetch(url, options).await?)
    }

    async fn finish(
        &self,
        response: ResponseEnvelope,
        url: &str,
        method: HttpMethod,
    ) -> Result<ResponseData, ClientError> {
        let response = validate_status(response, url, method).await?;
        decode_response(response, url, method).await
    }
}
