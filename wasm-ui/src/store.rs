//! Browser Record Store over `fetch` (gloo-net).

use async_trait::async_trait;
use gloo::net::http::{Method as HttpMethod, RequestBuilder};
use users_rs::postgrest::{self, Method, RestRequest};
use users_rs::store::Result;
use users_rs::{Record, RecordFields, RecordId, RecordStore, StoreConfig, StoreError};

/// No request timeout: a hung `fetch` keeps its form busy.
pub struct GlooStore {
    config: StoreConfig,
}

impl GlooStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    async fn send(&self, request: RestRequest) -> Result<(u16, String)> {
        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        };
        tracing::debug!(method = request.method.as_str(), url = %request.url, "store request");

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| StoreError::Transport(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait(?Send)]
impl RecordStore for GlooStore {
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
