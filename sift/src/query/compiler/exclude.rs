//! Exclusion compilation.
//!
//! Exclusion phrases subtract from the match set regardless of the main
//! operator. Each phrase is scoped to the same fields the positive query
//! uses: content matching the phrase in a field outside that scope never
//! excludes a record.

use crate::analysis;
use crate::fields::{MatchType, ResolvedField};
use crate::query::ast::CompiledClause;

/// Compile exclusion phrases into negative clauses over the positive
/// scope. Non-exact fields get an order-sensitive full-text match with
/// default normalization and stemming (strict, slop 0); fields the
/// positive query matches exactly get exact-equality exclusion instead.
pub fn compile(exclude: &[String], scope: &[ResolvedField]) -> Vec<CompiledClause> {
    let mut negative = Vec::new();
    for phrase in exclude {
        let tokens = analysis::tokenize(phrase);
        if tokens.is_empty() {
            continue;
        }
        for field in scope {
            match field.match_type {
                MatchType::Exact => negative.push(CompiledClause::Exact {
                    field: field.clone(),
                    phrase: tokens.join(" "),
                }),
                _ => negative.push(CompiledClause::Phrase {
                    // exclusions always match against the default
                    // analyzed variant, whatever variant the positive
                    // side queried
                    field: ResolvedField {
                        name: field.name.clone(),
                        indexed_name: format!("{}.analyzed", field.name),
                        match_type: MatchType::Default,
                        weight: field.weight,
                    },
                    tokens: tokens.clone(),
                    slop: 0,
                }),
            }
        }
    }
    negative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldSpec;
    use crate::{fields, SearchConfig};

    fn scope(specs: &[FieldSpec]) -> Vec<ResolvedField> {
        fields::resolve(&SearchConfig::default(), specs).unwrap()
    }

    #[test]
    fn test_scoped_to_positive_fields() {
        let scope = scope(&[FieldSpec::new("color")]);
        let negative = compile(&["butter".to_string()], &scope);
        assert_eq!(negative.len(), 1);
        match &negative[0] {
            CompiledClause::Phrase { field, tokens, slop } => {
                assert_eq!(field.indexed_name, "color.analyzed");
                assert_eq!(tokens, &["butter"]);
                assert_eq!(*slop, 0);
            }
            other => panic!("expected phrase clause, got {other:?}"),
        }
    }

    #[test]
    fn test_word_start_scope_excludes_via_analyzed_variant() {
        let scope = scope(&[FieldSpec::with_match("name", MatchType::WordStart)]);
        let negative = compile(&["eggplant".to_string()], &scope);
        match &negative[0] {
            CompiledClause::Phrase { field, .. } => {
                assert_eq!(field.indexed_name, "name.analyzed");
            }
            other => panic!("expected phrase clause, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_scope_compiles_exact_exclusion() {
        let scope = scope(&[FieldSpec::with_match("name", MatchType::Exact)]);
        let negative = compile(&["Peanut Butter Tub".to_string()], &scope);
        match &negative[0] {
            CompiledClause::Exact { phrase, .. } => assert_eq!(phrase, "peanut butter tub"),
            other => panic!("expected exact clause, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_phrase_is_noop() {
        let scope = scope(&[FieldSpec::new("name")]);
        assert!(compile(&["   ".to_string()], &scope).is_empty());
    }
}
