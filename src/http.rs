use std::{collections::HashMap, time::Duration};

use reqwest::{header::HeaderMap, StatusCode};
use serde::Deserialize;

use crate::{
    errors::{ApiError, Error},
    REQUEST_ID_HEADER, VERSION_HEADER,
};

/// Per-call request options.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Idempotency key attached as `Cko-Idempotency-Key` (POST/PUT only).
    pub idempotency_key: Option<String>,
    /// Override the overall request timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status, headers and raw body envelope surfaced alongside every typed response.
#[derive(Clone, Debug, Default)]
pub struct HttpMetadata {
    pub status: String,
    pub status_code: u16,
    /// `Cko-Request-Id` response header, when present.
    pub request_id: Option<String>,
    /// `Cko-Version` response header, when present.
    pub version: Option<String>,
    pub headers: HashMap<String, String>,
    /// Raw response body bytes as received.
    pub body: Vec<u8>,
}

impl HttpMetadata {
    pub(crate) fn from_parts(status: StatusCode, headers: &HeaderMap, body: Vec<u8>) -> Self {
        let mut map = HashMap::with_capacity(headers.len());
        for (name, value) in headers {
            if let Ok(v) = value.to_str() {
                map.insert(name.as_str().to_string(), v.to_string());
            }
        }
        Self {
            status: status
                .canonical_reason()
                .unwrap_or_else(|| status.as_str())
                .to_string(),
            status_code: status.as_u16(),
            request_id: header_value(headers, REQUEST_ID_HEADER),
            version: header_value(headers, VERSION_HEADER),
            headers: map,
            body,
        }
    }
}

/// Response types that carry an [`HttpMetadata`] envelope.
///
/// Every response struct embeds a `#[serde(skip)]` metadata field; the
/// dispatcher fills it in through this trait after decoding, so no runtime
/// reflection is involved.
pub trait HttpMetadataTarget {
    fn set_http_metadata(&mut self, metadata: HttpMetadata);
    fn http_metadata(&self) -> &HttpMetadata;
}

macro_rules! impl_http_metadata_target {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::http::HttpMetadataTarget for $ty {
            fn set_http_metadata(&mut self, metadata: $crate::http::HttpMetadata) {
                self.http_metadata = metadata;
            }

            fn http_metadata(&self) -> &$crate::http::HttpMetadata {
                &self.http_metadata
            }
        }
    )+};
}
pub(crate) use impl_http_metadata_target;

/// Response surface for non-JSON bodies (CSV reports, PDFs, plain text).
#[derive(Clone, Debug, Default)]
pub struct ContentResponse {
    pub http_metadata: HttpMetadata,
    /// Decoded body text (lossy for binary content types).
    pub content: String,
}

impl_http_metadata_target!(ContentResponse);

impl ContentResponse {
    /// Parses the body as headerless CSV rows.
    pub fn csv_records(&self) -> Result<Vec<Vec<String>>, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.content.as_bytes());
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| {
                Error::Configuration(format!("response body is not valid CSV: {err}"))
            })?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }
        Ok(rows)
    }
}

/// How a response body should be decoded, keyed on its `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyKind {
    Json,
    Csv,
    Text,
    Binary,
}

pub(crate) fn classify_content_type(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    if content_type.contains("json") {
        BodyKind::Json
    } else if content_type.contains("csv") {
        BodyKind::Csv
    } else if content_type.starts_with("text/") {
        BodyKind::Text
    } else if content_type.is_empty() {
        // Empty-body responses often omit the header; treat as JSON-shaped.
        BodyKind::Json
    } else {
        BodyKind::Binary
    }
}

pub(crate) fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Error detail shape returned by the gateway on status >= 400. All fields
/// are optional; unparseable bodies still surface the raw status.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error_codes: Vec<String>,
}

pub(crate) fn parse_api_error(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Error {
    let status_text = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let header_request_id = header_value(headers, REQUEST_ID_HEADER);

    let mut api_error = ApiError::new(status.as_u16(), status_text);
    api_error.request_id = header_request_id;

    if body.is_empty() {
        return api_error.into();
    }

    if let Ok(detail) = serde_json::from_slice::<ErrorDetail>(body) {
        if detail.request_id.is_some() {
            api_error.request_id = detail.request_id;
        }
        api_error.error_type = detail.error_type;
        api_error.error_codes = detail.error_codes;
    }
    api_error.raw_body = Some(String::from_utf8_lossy(body).into_owned());
    api_error.into()
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderValue, CONTENT_TYPE};

    use super::*;

    #[test]
    fn parses_structured_error_body() {
        let body =
            br#"{"request_id":"r1","error_type":"request_invalid","error_codes":["x"]}"#;
        let err = parse_api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            &HeaderMap::new(),
            body,
        );
        let Error::Api(api) = err else {
            panic!("expected api error");
        };
        assert_eq!(api.status_code, 422);
        assert_eq!(api.request_id.as_deref(), Some("r1"));
        assert_eq!(api.error_type.as_deref(), Some("request_invalid"));
        assert_eq!(api.error_codes, vec!["x"]);
    }

    #[test]
    fn unparseable_error_body_still_surfaces_status() {
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_static("req_header_id"),
        );
        let err = parse_api_error(StatusCode::BAD_GATEWAY, &headers, b"<html>oops</html>");
        let Error::Api(api) = err else {
            panic!("expected api error");
        };
        assert_eq!(api.status_code, 502);
        assert_eq!(api.request_id.as_deref(), Some("req_header_id"));
        assert_eq!(api.error_type, None);
        assert_eq!(api.raw_body.as_deref(), Some("<html>oops</html>"));
    }

    #[test]
    fn classifies_content_types() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert_eq!(classify_content_type(&headers), BodyKind::Json);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
        assert_eq!(classify_content_type(&headers), BodyKind::Csv);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(classify_content_type(&headers), BodyKind::Text);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        assert_eq!(classify_content_type(&headers), BodyKind::Binary);
    }

    #[test]
    fn csv_records_parse_rows() {
        let response = ContentResponse {
            content: "id,amount\npay_1,1000\n".into(),
            ..Default::default()
        };
        let rows = response.csv_records().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["pay_1", "1000"]);
    }
}
