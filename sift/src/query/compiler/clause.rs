//! Per-token clause building.

use crate::analysis;
use crate::fields::{MatchType, ResolvedField};
use crate::query::ast::CompiledClause;
use crate::query::request::MisspellingPolicy;

/// Engine-default edit-distance curve by token length. Tokens under three
/// characters never match fuzzily; they can still match literally or via
/// stemming.
pub fn curve_max_edits(token_len: usize) -> u32 {
    match token_len {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Effective bound for one token: the policy's distance, capped by the
/// curve. The cap is never raised, however severe the misspelling.
pub fn effective_max_edits(token: &str, policy: &MisspellingPolicy) -> u32 {
    policy
        .edit_distance
        .min(curve_max_edits(token.chars().count()))
}

/// Build the OR-combined alternatives for one token on one resolved
/// field. Exact fields are whole-phrase and handled by the assembler, not
/// here.
pub fn build(field: &ResolvedField, token: &str, policy: &MisspellingPolicy) -> Vec<CompiledClause> {
    let mut alternatives = Vec::with_capacity(2);
    match field.match_type {
        MatchType::WordStart => alternatives.push(CompiledClause::Prefix {
            field: field.clone(),
            token: token.to_string(),
        }),
        MatchType::Default | MatchType::Stemmed => alternatives.push(CompiledClause::Stemmed {
            field: field.clone(),
            token: token.to_string(),
        }),
        MatchType::Exact => return alternatives,
    }

    if policy.enabled {
        let max_edits = effective_max_edits(token, policy);
        if max_edits > 0 {
            alternatives.push(CompiledClause::Fuzzy {
                field: field.clone(),
                token: token.to_string(),
                max_edits,
                transpositions: policy.transpositions,
                prefix_length: policy.prefix_length,
            });
        }
    }
    alternatives
}

/// Whole-phrase exact-equality clause.
pub fn build_exact(field: &ResolvedField, phrase: &str) -> CompiledClause {
    CompiledClause::Exact {
        field: field.clone(),
        phrase: analysis::normalize_phrase(phrase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldSpec;
    use crate::{fields, SearchConfig};

    fn resolved(match_type: MatchType) -> ResolvedField {
        fields::resolve(
            &SearchConfig::default(),
            &[FieldSpec::with_match("name", match_type)],
        )
        .unwrap()
        .remove(0)
    }

    #[test]
    fn test_curve() {
        assert_eq!(curve_max_edits(1), 0);
        assert_eq!(curve_max_edits(2), 0);
        assert_eq!(curve_max_edits(3), 1);
        assert_eq!(curve_max_edits(5), 1);
        assert_eq!(curve_max_edits(6), 2);
        assert_eq!(curve_max_edits(20), 2);
    }

    #[test]
    fn test_policy_caps_curve() {
        let policy = MisspellingPolicy::default();
        // default distance 1 even for long tokens
        assert_eq!(effective_max_edits("thisisareallylongword", &policy), 1);
        let loose = MisspellingPolicy {
            edit_distance: 2,
            ..policy
        };
        assert_eq!(effective_max_edits("thisisareallylongword", &loose), 2);
        // the curve still wins for short tokens
        assert_eq!(effective_max_edits("fin", &loose), 1);
        assert_eq!(effective_max_edits("1%", &loose), 0);
    }

    #[test]
    fn test_short_tokens_get_no_fuzzy_alternative() {
        let field = resolved(MatchType::Default);
        let alternatives = build(&field, "1%", &MisspellingPolicy::default());
        assert_eq!(alternatives.len(), 1);
        assert!(matches!(alternatives[0], CompiledClause::Stemmed { .. }));
    }

    #[test]
    fn test_word_start_keeps_fuzzy() {
        let field = resolved(MatchType::WordStart);
        let alternatives = build(&field, "siracha", &MisspellingPolicy::default());
        assert!(matches!(alternatives[0], CompiledClause::Prefix { .. }));
        assert!(matches!(alternatives[1], CompiledClause::Fuzzy { .. }));
    }

    #[test]
    fn test_disabled_policy_skips_fuzzy() {
        let field = resolved(MatchType::Default);
        let policy = MisspellingPolicy {
            enabled: false,
            ..MisspellingPolicy::default()
        };
        let alternatives = build(&field, "sriracha", &policy);
        assert_eq!(alternatives.len(), 1);
    }

    #[test]
    fn test_exact_normalizes_phrase() {
        let field = resolved(MatchType::Exact);
        match build_exact(&field, "Ben & Jerry's") {
            CompiledClause::Exact { phrase, .. } => assert_eq!(phrase, "ben and jerrys"),
            other => panic!("expected exact clause, got {other:?}"),
        }
    }
}
