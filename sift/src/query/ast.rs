//! Compiled query plan.
//!
//! The engine-neutral output of compilation: immutable once assembled,
//! produced per request, dispatched, and discarded. Wire adapters
//! serialize this into the engine's structured query language.

use crate::fields::ResolvedField;
use crate::query::request::Operator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One sub-query against a single analyzed field variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompiledClause {
    /// Whole normalized phrase equals the normalized field value.
    Exact { field: ResolvedField, phrase: String },

    /// Token prefixes some word of the field, at any word position.
    Prefix { field: ResolvedField, token: String },

    /// Token matches the field's stemmed token index (including the
    /// word-merge variants the analyzer produces).
    Stemmed { field: ResolvedField, token: String },

    /// Token matches within a bounded edit distance.
    Fuzzy {
        field: ResolvedField,
        token: String,
        max_edits: u32,
        transpositions: bool,
        prefix_length: u32,
    },

    /// Tokens appear in the field in the same relative order, with at
    /// most `slop` interleaved positions.
    Phrase {
        field: ResolvedField,
        tokens: Vec<String>,
        slop: u32,
    },
}

impl CompiledClause {
    pub fn field(&self) -> &ResolvedField {
        match self {
            CompiledClause::Exact { field, .. }
            | CompiledClause::Prefix { field, .. }
            | CompiledClause::Stemmed { field, .. }
            | CompiledClause::Fuzzy { field, .. }
            | CompiledClause::Phrase { field, .. } => field,
        }
    }
}

/// One query token with its OR-combined clause alternatives across the
/// field scope. A token matching any alternative counts as matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGroup {
    pub token: String,
    pub alternatives: Vec<CompiledClause>,
}

/// The positive side of the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositiveQuery {
    /// Every record in scope (wildcard sentinel or absent phrase).
    MatchAll,

    /// Nothing matches (phrase normalized to an empty token sequence).
    MatchNone,

    /// Token groups combined by `operator`; `merged` carries the
    /// word-space-normalization alternatives for the whole phrase,
    /// OR-combined against the group combination.
    Text {
        operator: Operator,
        groups: Vec<TokenGroup>,
        merged: Vec<CompiledClause>,
    },
}

/// Exact-equality constraint from a `where` filter, AND-ed in
/// independently of text relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// Requested result ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    /// Engine relevance scoring; the result sequence is never reordered
    /// locally.
    Relevance,
    /// Filter-only query with no scoring signal; ordering delegated to
    /// the engine.
    EngineDefault,
    /// Explicit field sort override.
    Field { name: String, ascending: bool },
}

/// The full compiled plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub positive: PositiveQuery,
    /// Always OR-combined among themselves and subtracted from the match
    /// set, whatever the positive operator.
    pub negative: Vec<CompiledClause>,
    pub filters: Vec<FieldFilter>,
    pub sort: Sort,
    pub limit: usize,
    pub offset: usize,
}
