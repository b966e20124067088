//! Order-sensitive phrase clause building.

use crate::fields::{MatchType, ResolvedField};
use crate::query::ast::CompiledClause;
use crate::query::compiler::clause;

/// Build phrase-mode clauses across the field scope. Fields are
/// OR-combined: at least one must independently satisfy the order
/// constraint. Exact fields keep whole-value equality semantics. Scoring
/// is requested from the engine, never imposed here.
pub fn build(
    fields: &[ResolvedField],
    phrase: &str,
    tokens: &[String],
    slop: u32,
) -> Vec<CompiledClause> {
    fields
        .iter()
        .map(|field| match field.match_type {
            MatchType::Exact => clause::build_exact(field, phrase),
            _ => CompiledClause::Phrase {
                field: field.clone(),
                tokens: tokens.to_vec(),
                slop,
            },
        })
        .collect()
}
