//! Elasticsearch wire adapter for sift.
//!
//! Serializes a [`CompiledQuery`](sift::query::ast::CompiledQuery) into ES
//! Query DSL JSON (bool must/must_not/should composition, term, match,
//! match_phrase with slop, fuzzy with edit distance and transpositions),
//! dispatches it over the engine's HTTP protocol, and parses the ranked
//! hit list back into [`EngineHits`](sift::engine::EngineHits).
//!
//! The engine's analyzers (case folding, ASCII folding, stemming,
//! word-merge and word-start variants) are configured at schema-setup
//! time; this adapter depends on them but does not manage them.

pub mod engine;
pub mod response;
pub mod serialize;

pub use engine::EsEngine;
