//! The engine capability seam.
//!
//! The compiler never talks to a concrete engine; it produces a
//! [`CompiledQuery`](crate::query::ast::CompiledQuery) and hands it to
//! whatever implements [`SearchEngine`]. The in-memory implementation in
//! [`memory`] carries the assumed analyzer chain and exists so the
//! compiler's behavior can be exercised without a live engine.

pub mod memory;

use crate::query::ast::CompiledQuery;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A record as the engine indexes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: HashMap<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// One ranked hit from the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineHit {
    pub id: String,
    pub score: f32,
}

/// Ranked hit list, in the engine's order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineHits {
    pub hits: Vec<EngineHit>,
    pub total: usize,
}

/// The external full-text engine, reached through its query protocol.
/// Cancellation and timeouts belong to the transport behind this trait.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Execute a compiled query against a collection and return the
    /// ranked hit list.
    async fn execute(&self, collection: &str, query: &CompiledQuery) -> Result<EngineHits>;
}
