//! Translation of engine hit lists back to domain identifiers.
//!
//! The engine's ranking is authoritative: hits come back in engine order
//! and are never reordered here. Malformed responses are rejected by the
//! wire adapter before this layer runs; retries, if any, belong to the
//! transport.

use crate::engine::{EngineHit, EngineHits};

/// Ranked search outcome, in engine order.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub hits: Vec<EngineHit>,
    pub total: usize,
}

impl SearchResponse {
    /// Record identifiers, preserving engine order exactly.
    pub fn ids(&self) -> Vec<String> {
        self.hits.iter().map(|h| h.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

pub fn translate(hits: EngineHits) -> SearchResponse {
    SearchResponse {
        total: hits.total,
        hits: hits.hits,
    }
}
