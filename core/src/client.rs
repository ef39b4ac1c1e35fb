//! Stateless HTTP request builder and response parser for the records API.
//!
//! # Design
//! `RecordsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `RecordService` glues the two halves to a `Transport`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LoginOutcome, LoginRequest, Record};

/// Origin of the production records API.
pub const DEFAULT_API_URL: &str = "https://sistema-hernani-back-end.onrender.com";

/// Bytes kept as-is in an id path segment: the RFC 3986 unreserved set.
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Synchronous, stateless client for the records API.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    base_url: String,
}

impl Default for RecordsClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl RecordsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_records(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/get_records", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The identifier is never part of the body, even if `record` has one.
    pub fn build_add_record(&self, record: &Record) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/add_record".to_string(), &record.fields)
    }

    pub fn build_update_record(&self, id: &str, record: &Record) -> Result<HttpRequest, ApiError> {
        let path = format!("/update_record/{}", id_segment(id));
        self.json_request(HttpMethod::Put, path, &record.fields)
    }

    pub fn build_delete_record(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/delete_record/{}", self.base_url, id_segment(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_login(&self, username: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let input = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.json_request(HttpMethod::Post, "/login".to_string(), &input)
    }

    pub fn parse_list_records(&self, response: HttpResponse) -> Result<Vec<Record>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The API's response body is not part of the contract; only the status
    /// is checked.
    pub fn parse_add_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    pub fn parse_update_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    /// Anything but 200 is a rejection; there is no error case.
    pub fn parse_login(&self, response: HttpResponse) -> LoginOutcome {
        if response.status == 200 {
            LoginOutcome::Authenticated
        } else {
            LoginOutcome::Rejected
        }
    }

    fn json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn id_segment(id: &str) -> String {
    utf8_percent_encode(id, ID_SEGMENT).to_string()
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
