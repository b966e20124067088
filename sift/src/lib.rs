//! Query compilation layer for full-text search engines.
//!
//! Turns a search phrase plus structured options (operator, fields,
//! misspelling policy, exclusions, match mode) into an engine-neutral
//! [`CompiledQuery`](query::ast::CompiledQuery), dispatches it through the
//! [`SearchEngine`](engine::SearchEngine) capability trait, and maps the
//! ranked hits back to record identifiers. The engine's analyzers and
//! scoring are external collaborators; an in-memory reference engine is
//! provided for tests.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod index;
pub mod query;
pub mod results;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use index::SearchIndex;
