//! Caller-facing search surface: one collection, one configuration, one
//! injected engine.

use crate::config::SearchConfig;
use crate::engine::SearchEngine;
use crate::query::compiler::QueryCompiler;
use crate::query::request::{QueryScope, SearchOptions, SearchRequest};
use crate::results::{self, SearchResponse};
use crate::Result;
use std::sync::Arc;
use tracing::warn;

pub struct SearchIndex {
    collection: String,
    compiler: QueryCompiler,
    engine: Arc<dyn SearchEngine>,
}

impl SearchIndex {
    pub fn new(
        collection: impl Into<String>,
        config: SearchConfig,
        engine: Arc<dyn SearchEngine>,
    ) -> Self {
        Self {
            collection: collection.into(),
            compiler: QueryCompiler::new(config),
            engine,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn config(&self) -> &SearchConfig {
        self.compiler.config()
    }

    /// Search with a phrase. `"*"` matches every record in scope.
    pub async fn search(&self, phrase: &str, options: SearchOptions) -> Result<SearchResponse> {
        self.dispatch(Some(phrase), options).await
    }

    /// Search with no phrase: all records, subject to `where` and
    /// `exclude`, in engine-default order.
    pub async fn search_all(&self, options: SearchOptions) -> Result<SearchResponse> {
        self.dispatch(None, options).await
    }

    async fn dispatch(
        &self,
        phrase: Option<&str>,
        options: SearchOptions,
    ) -> Result<SearchResponse> {
        let request = SearchRequest::from_options(phrase, options, self.compiler.config())?;
        if request.scope == QueryScope::Relation {
            // the engine query runs against the whole collection, so any
            // filter the caller applied upstream is bypassed
            warn!(
                collection = %self.collection,
                "search issued against an already-filtered scope; the engine query ignores upstream filters"
            );
        }
        let compiled = self.compiler.compile(&request)?;
        let hits = self.engine.execute(&self.collection, &compiled).await?;
        Ok(results::translate(hits))
    }
}
