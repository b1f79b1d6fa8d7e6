//! Native Record Store over HTTP (reqwest).

use async_trait::async_trait;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::postgrest::{self, Method, RestRequest};
use crate::record::{Record, RecordFields, RecordId};
use crate::store::{RecordStore, Result};

pub struct HttpStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl HttpStore {
    /// Build a client honoring the configured request timeout.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn send(&self, request: RestRequest) -> Result<(u16, String)> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        debug!(method = request.method.as_str(), url = %request.url, "store request");

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        debug!(status, bytes = body.len(), "store response");
        Ok((status, body))
    }
}

#[async_trait(?Send)]
impl RecordStore for HttpStore {
    async fn list(&self) -> Result<Vec<Record>> {
        let (status, body) = self.send(postgrest::list_request(&self.config)).await?;
        postgrest::decode_list(status, &body)
    }

    async fn insert(&self, fields: &RecordFields) -> Result<Record> {
        let request = postgrest::insert_request(&self.config, fields)?;
        let (status, body) = self.send(request).await?;
        postgrest::decode_insert(status, &body)
    }

    async fn update(&self, id: RecordId, fields: &RecordFields) -> Result<Record> {
        let request = postgrest::update_request(&self.config, id, fields)?;
        let (status, body) = self.send(request).await?;
        postgrest::decode_update(id, status, &body)
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let (status, body) = self.send(postgrest::delete_request(&self.config, id)).await?;
        postgrest::decode_delete(status, &body)
    }
}
