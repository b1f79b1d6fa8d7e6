//! PostgREST request shapes and response decoding for the `users` table.
//!
//! Transport-free: both the native reqwest store and the browser gloo store
//! build a [`RestRequest`] here, send it however they can, and hand the
//! status and body back to the `decode_*` functions.

use serde::Deserialize;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::record::{Record, RecordFields, RecordId};

const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully described HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl RestRequest {
    fn new(config: &StoreConfig, method: Method, url: String) -> Self {
        Self {
            method,
            url,
            headers: vec![
                ("apikey", config.api_key.clone()),
                ("Authorization", format!("Bearer {}", config.api_key)),
            ],
            body: None,
        }
    }

    fn json_body(mut self, fields: &RecordFields) -> Result<Self, StoreError> {
        let body = serde_json::to_string(fields).map_err(|e| StoreError::Decode(e.to_string()))?;
        self.headers.push(("Content-Type", "application/json".to_string()));
        self.headers.push(("Prefer", RETURN_REPRESENTATION.to_string()));
        self.body = Some(body);
        Ok(self)
    }

    /// Value of the first header named `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn row_url(config: &StoreConfig, id: RecordId) -> String {
    format!("{}?id=eq.{}", config.table_url(), id)
}

pub fn list_request(config: &StoreConfig) -> RestRequest {
    RestRequest::new(config, Method::Get, format!("{}?select=*", config.table_url()))
}

pub fn insert_request(config: &StoreConfig, fields: &RecordFields) -> Result<RestRequest, StoreError> {
    RestRequest::new(config, Method::Post, config.table_url()).json_body(fields)
}

pub fn update_request(
    config: &StoreConfig,
    id: RecordId,
    fields: &RecordFields,
) -> Result<RestRequest, StoreError> {
    RestRequest::new(config, Method::Patch, row_url(config, id)).json_body(fields)
}

pub fn delete_request(config: &StoreConfig, id: RecordId) -> RestRequest {
    RestRequest::new(config, Method::Delete, row_url(config, id))
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
}

fn check_status(status: u16, body: &str) -> Result<(), StoreError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            details,
        }) => match details {
            Some(details) if !details.is_empty() => format!("{message} ({details})"),
            _ => message,
        },
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => body.trim().to_string(),
    };
    Err(StoreError::Rejected { status, message })
}

fn parse_rows(body: &str) -> Result<Vec<Record>, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

pub fn decode_list(status: u16, body: &str) -> Result<Vec<Record>, StoreError> {
    check_status(status, body)?;
    parse_rows(body)
}

pub fn decode_insert(status: u16, body: &str) -> Result<Record, StoreError> {
    check_status(status, body)?;
    parse_rows(body)?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
}

/// An update that matched nothing comes back as an empty array.
pub fn decode_update(id: RecordId, status: u16, body: &str) -> Result<Record, StoreError> {
    check_status(status, body)?;
    parse_rows(body)?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound(id))
}

/// Any success status confirms a delete, even when no row matched.
pub fn decode_delete(status: u16, body: &str) -> Result<(), StoreError> {
    check_status(status, body)
}
