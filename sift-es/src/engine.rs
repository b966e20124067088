//! HTTP dispatch to an Elasticsearch-compatible engine.

use crate::{response, serialize};
use async_trait::async_trait;
use sift::engine::{EngineHits, SearchEngine};
use sift::query::ast::CompiledQuery;
use sift::{Error, Result};
use tracing::debug;

pub struct EsEngine {
    client: reqwest::Client,
    base_url: String,
}

impl EsEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured client to control timeouts, TLS, or retries.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchEngine for EsEngine {
    async fn execute(&self, collection: &str, query: &CompiledQuery) -> Result<EngineHits> {
        let url = format!("{}/{}/_search", self.base_url, collection);
        let body = serialize::body(query);
        debug!(%url, "dispatching compiled query");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::EngineProtocol(format!(
                "engine returned {status}: {detail}"
            )));
        }

        let value = response
            .json()
            .await
            .map_err(|e| Error::EngineProtocol(format!("unreadable response body: {e}")))?;
        response::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let engine = EsEngine::new("http://localhost:9200/");
        assert_eq!(engine.base_url, "http://localhost:9200");
    }
}
