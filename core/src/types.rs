//! Body value types shared by requests and responses.
//!
//! # Design
//! These mirror the platform body types a fetch caller deals with: a binary
//! `Blob`, url-encoded `SearchParams` and `FormData`. They are plain owned data
//! so a transport can put them on the wire however it likes. `FormData` knows
//! how to render and parse `multipart/form-data` because transports need the
//! former and response decoding needs the latter.

use std::convert::Infallible;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::ClientError;

const OCTET_STREAM: &str = "application/octet-stream";

/// Binary content together with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    content_type: String,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    /// A blob typed `application/octet-stream`.
    pub fn octet_stream(bytes: impl Into<Bytes>) -> Self {
        Self::new(bytes, OCTET_STREAM)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Ordered `name=value` pairs sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// First value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_urlencoded::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

/// One value of a `FormData` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { filename: String, blob: Blob },
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            FormValue::File { .. } => None,
        }
    }

    pub fn as_file(&self) -> Option<(&str, &Blob)> {
        match self {
            FormValue::File { filename, blob } => Some((filename, blob)),
            FormValue::Text(_) => None,
        }
    }
}

/// Ordered form entries; a name may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(Vec<(String, FormValue)>);

impl FormData {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), FormValue::Text(value.into())));
    }

    pub fn append_file(&mut self, name: impl Into<String>, filename: impl Into<String>, blob: Blob) {
        self.0.push((
            name.into(),
            FormValue::File {
                filename: filename.into(),
                blob,
            },
        ));
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append_text(name, value);
        self
    }

    pub fn file(mut self, name: impl Into<String>, filename: impl Into<String>, blob: Blob) -> Self {
        self.append_file(name, filename, blob);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a `multipart/form-data` body delimited by `boundary`.
    ///
    /// The matching header value is `multipart/form-data; boundary={boundary}`.
    /// CR, LF and `"` in names and filenames are written as `%0D`, `%0A` and
    /// `%22`, as browsers do.
    pub fn to_multipart(&self, boundary: &str) -> Bytes {
        let mut buf = BytesMut::new();
        for (name, value) in &self.0 {
            buf.put_slice(format!("--{boundary}\r\n").as_bytes());
            match value {
                FormValue::Text(text) => {
                    buf.put_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape_quoted(name))
                            .as_bytes(),
                    );
                    buf.put_slice(text.as_bytes());
                }
                FormValue::File { filename, blob } => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            escape_quoted(name),
                            escape_quoted(filename),
                            blob.content_type()
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(blob.bytes());
                }
            }
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{boundary}--\r\n").as_bytes());
        buf.freeze()
    }

    /// Parse a `multipart/form-data` body. `content_type` must carry the boundary.
    pub async fn from_multipart(body: Bytes, content_type: &str) -> Result<Self, ClientError> {
        let boundary = multer::parse_boundary(content_type).map_err(|e| ClientError::Form(e.to_string()))?;
        let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut form = FormData::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ClientError::Form(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);
            let mime = field
                .content_type()
                .map(|m| m.to_string())
                .unwrap_or_else(|| OCTET_STREAM.to_string());
            let data = field.bytes().await.map_err(|e| ClientError::Form(e.to_string()))?;
            match filename {
                Some(filename) => form.append_file(name, filename, Blob::new(data, mime)),
                None => form.append_text(name, String::from_utf8_lossy(&data).into_owned()),
            }
        }
        Ok(form)
    }

    /// Parse a url-encoded body into text entries.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, ClientError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(|e| ClientError::Form(e.to_string()))?;
        Ok(Self(
            pairs
                .into_iter()
                .map(|(n, v)| (n, FormValue::Text(v)))
                .collect(),
        ))
    }
}

impl From<SearchParams> for FormData {
    fn from(params: SearchParams) -> Self {
        Self(
            params
                .0
                .into_iter()
                .map(|(n, v)| (n, FormValue::Text(v)))
                .collect(),
        )
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\r', "%0D")
        .replace('\n', "%0A")
        .replace('"', "%22")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_serialize_as_form_urlencoded() {
        let params = SearchParams::new().with("q", "rust lang").with("page", "2");
        assert_eq!(params.to_string(), "q=rust+lang&page=2");
    }

    #[test]
    fn search_params_keep_order_and_repeats() {
        let params: SearchParams = [("a", "1"), ("b", "two words"), ("a", "3")].into_iter().collect();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some("1"));
        let values: Vec<_> = params.iter().filter(|(n, _)| *n == "a").map(|(_, v)| v).collect();
        assert_eq!(values, vec!["1", "3"]);
        assert_eq!(params.to_string(), "a=1&b=two+words&a=3");
    }

    #[test]
    fn blob_reports_type_and_length() {
        let blob = Blob::octet_stream(vec![1u8, 2, 3]);
        assert_eq!(blob.content_type(), "application/octet-stream");
        assert_eq!(blob.len(), 3);
        assert!(!blob.is_empty());
    }

    #[test]
    fn multipart_rendering() {
        let form = FormData::new()
            .text("title", "hello")
            .file("doc", "a.txt", Blob::new("abc", "text/plain"));
        let body = form.to_multipart("XyZ");
        let expected = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\r\n\
            hello\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"doc\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            abc\r\n\
            --XyZ--\r\n";
        assert_eq!(body, Bytes::from(expected));
    }

    #[tokio::test]
    async fn multipart_parse_reads_text_and_file_fields() {
        let body = "--b0undary\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\r\n\
            André\r\n\
            --b0undary\r\n\
            Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            PNG\r\n\
            --b0undary--\r\n";
        let form = FormData::from_multipart(Bytes::from(body), "multipart/form-data; boundary=b0undary")
            .await
            .unwrap();

        assert_eq!(form.len(), 2);
        assert_eq!(form.get("name").and_then(FormValue::as_text), Some("André"));
        let (filename, blob) = form.get("avatar").and_then(FormValue::as_file).unwrap();
        assert_eq!(filename, "me.png");
        assert_eq!(blob.content_type(), "image/png");
        assert_eq!(blob.bytes().as_ref(), b"PNG");
    }

    #[tokio::test]
    async fn multipart_without_boundary_is_a_form_error() {
        let err = FormData::from_multipart(Bytes::new(), "multipart/form-data")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Form(_)));
    }

    #[test]
    fn urlencoded_parse() {
        let form = FormData::from_urlencoded(b"a=1&b=x%20y").unwrap();
        assert_eq!(form.get("a").and_then(FormValue::as_text), Some("1"));
        assert_eq!(form.get("b").and_then(FormValue::as_text), Some("x y"));
    }

    #[test]
    fn multipart_escapes_line_breaks_and_quotes_in_names() {
        let form = FormData::new().file("a\"b", "x\r\ny.txt", Blob::new("z", "text/plain"));
        let body = form.to_multipart("B");
        let expected = "--B\r\n\
            Content-Disposition: form-data; name=\"a%22b\"; filename=\"x%0D%0Ay.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            z\r\n\
            --B--\r\n";
        assert_eq!(body, Bytes::from(expected));
    }

    #[tokio::test]
    async fn line_breaks_in_field_names_cannot_add_headers() {
        let form = FormData::new().text("a\r\nX-Injected: 1\r\n\r\nevil", "v");
        let body = form.to_multipart("B");
        assert!(!body.windows(12).any(|w| w == b"\r\nX-Injected"));

        let parsed = FormData::from_multipart(body, "multipart/form-data; boundary=B")
            .await
            .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed.get("a%0D%0AX-Injected: 1%0D%0A%0D%0Aevil").and_then(FormValue::as_text),
            Some("v")
        );
    }
}
