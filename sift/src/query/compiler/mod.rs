//! The query compiler: a pure, stateless transformation from
//! [`SearchRequest`] to [`CompiledQuery`].
//!
//! Token groups combine across the phrase with the requested operator;
//! within one token's group, fields are always OR-combined. Exclusions are
//! OR-combined negatives subtracted whatever the operator. `where` filters
//! AND in as exact-equality constraints independent of scoring. No shared
//! mutable state, no blocking, safe to call from any number of threads.

pub mod clause;
pub mod exclude;
pub mod phrase;

use crate::analysis;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::fields::{self, FieldSpec, MatchType, ResolvedField};
use crate::query::ast::{
    CompiledClause, CompiledQuery, FieldFilter, PositiveQuery, Sort, TokenGroup,
};
use crate::query::request::{MatchMode, SearchRequest, SortDirection};
use tracing::debug;

pub struct QueryCompiler {
    config: SearchConfig,
}

impl QueryCompiler {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn compile(&self, request: &SearchRequest) -> Result<CompiledQuery> {
        let scope = self.resolve_scope(request)?;
        let negative = exclude::compile(&request.exclude, &scope);
        let filters = request
            .filters
            .iter()
            .map(|(field, value)| FieldFilter {
                field: field.clone(),
                value: value.clone(),
            })
            .collect();

        let positive = self.compile_positive(request, &scope);
        let sort = match (&request.order, &positive) {
            (Some((name, direction)), _) => Sort::Field {
                name: name.clone(),
                ascending: *direction == SortDirection::Asc,
            },
            (None, PositiveQuery::MatchAll) => Sort::EngineDefault,
            (None, _) => Sort::Relevance,
        };

        let compiled = CompiledQuery {
            positive,
            negative,
            filters,
            sort,
            limit: request.limit,
            offset: request.offset,
        };
        debug!(
            negative = compiled.negative.len(),
            filters = compiled.filters.len(),
            "compiled search query"
        );
        Ok(compiled)
    }

    /// Resolve the field scope, applying the request-level match mode:
    /// `word_start` retargets every default-matched field to its
    /// word-start variant.
    fn resolve_scope(&self, request: &SearchRequest) -> Result<Vec<ResolvedField>> {
        let mut specs: Vec<FieldSpec> = if request.fields.is_empty() {
            self.config.default_fields.clone()
        } else {
            request.fields.clone()
        };
        if request.match_mode == MatchMode::WordStart {
            for spec in &mut specs {
                if matches!(spec.match_type, MatchType::Default | MatchType::Stemmed) {
                    spec.match_type = MatchType::WordStart;
                }
            }
        }
        fields::resolve(&self.config, &specs)
    }

    fn compile_positive(&self, request: &SearchRequest, scope: &[ResolvedField]) -> PositiveQuery {
        if request.is_match_all() {
            return PositiveQuery::MatchAll;
        }
        let phrase = request.phrase.as_deref().unwrap_or_default();
        let tokens = analysis::tokenize(phrase);
        if tokens.is_empty() {
            // nothing left after normalization: a no-op query, not an error
            return PositiveQuery::MatchNone;
        }

        if request.match_mode == MatchMode::Phrase {
            let alternatives = phrase::build(scope, phrase, &tokens, self.config.phrase_slop);
            return PositiveQuery::Text {
                operator: request.operator,
                groups: vec![TokenGroup {
                    token: tokens.join(" "),
                    alternatives,
                }],
                merged: vec![],
            };
        }

        let groups = tokens
            .iter()
            .map(|token| TokenGroup {
                token: token.clone(),
                alternatives: scope
                    .iter()
                    .flat_map(|field| clause::build(field, token, &request.misspellings))
                    .collect(),
            })
            .collect();

        // whole-phrase alternatives, OR-combined against the token groups:
        // exact-equality for exact fields, and the space-stripped merge for
        // analyzed fields so "dish washer" can reach "Dishwasher"
        let mut merged = Vec::new();
        for field in scope {
            if field.match_type == MatchType::Exact {
                merged.push(clause::build_exact(field, phrase));
            }
        }
        if tokens.len() > 1 {
            let joined = tokens.concat();
            for field in scope {
                if matches!(field.match_type, MatchType::Default | MatchType::Stemmed) {
                    merged.push(CompiledClause::Stemmed {
                        field: field.clone(),
                        token: joined.clone(),
                    });
                    if request.misspellings.enabled {
                        let max_edits = clause::effective_max_edits(&joined, &request.misspellings);
                        if max_edits > 0 {
                            merged.push(CompiledClause::Fuzzy {
                                field: field.clone(),
                                token: joined.clone(),
                                max_edits,
                                transpositions: request.misspellings.transpositions,
                                prefix_length: request.misspellings.prefix_length,
                            });
                        }
                    }
                }
            }
        }

        PositiveQuery::Text {
            operator: request.operator,
            groups,
            merged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::request::{Operator, SearchOptions};
    use serde_json::json;

    fn compile(phrase: Option<&str>, options: SearchOptions) -> CompiledQuery {
        let config = SearchConfig::default();
        let request = SearchRequest::from_options(phrase, options, &config).unwrap();
        QueryCompiler::new(config).compile(&request).unwrap()
    }

    #[test]
    fn test_wildcard_compiles_to_match_all() {
        let compiled = compile(Some("*"), SearchOptions::default());
        assert_eq!(compiled.positive, PositiveQuery::MatchAll);
        assert_eq!(compiled.sort, Sort::EngineDefault);
        assert!(compiled.negative.is_empty());
    }

    #[test]
    fn test_absent_phrase_is_filter_only() {
        let options = SearchOptions::default().filter("name", "Product A");
        let compiled = compile(None, options);
        assert_eq!(compiled.positive, PositiveQuery::MatchAll);
        assert_eq!(compiled.filters.len(), 1);
        assert_eq!(compiled.filters[0].field, "name");
    }

    #[test]
    fn test_empty_phrase_matches_nothing() {
        let compiled = compile(Some("  - "), SearchOptions::default());
        assert_eq!(compiled.positive, PositiveQuery::MatchNone);
    }

    #[test]
    fn test_one_group_per_token_with_relevance_sort() {
        let compiled = compile(Some("fresh honey"), SearchOptions::default());
        assert_eq!(compiled.sort, Sort::Relevance);
        match compiled.positive {
            PositiveQuery::Text {
                operator, groups, ..
            } => {
                assert_eq!(operator, Operator::Or);
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].token, "fresh");
                // stemmed + fuzzy per default field
                assert_eq!(groups[0].alternatives.len(), 2);
            }
            other => panic!("expected text query, got {other:?}"),
        }
    }

    #[test]
    fn test_merged_word_space_alternative() {
        let compiled = compile(Some("dish washer"), SearchOptions::default());
        match compiled.positive {
            PositiveQuery::Text { merged, .. } => {
                assert!(merged.iter().any(|c| matches!(
                    c,
                    CompiledClause::Stemmed { token, .. } if token == "dishwasher"
                )));
                assert!(merged.iter().any(|c| matches!(
                    c,
                    CompiledClause::Fuzzy { token, .. } if token == "dishwasher"
                )));
            }
            other => panic!("expected text query, got {other:?}"),
        }
    }

    #[test]
    fn test_phrase_mode_single_group() {
        let options =
            SearchOptions::from_value(json!({"match": "phrase"})).unwrap();
        let compiled = compile(Some("fresh honey"), options);
        match compiled.positive {
            PositiveQuery::Text { groups, merged, .. } => {
                assert_eq!(groups.len(), 1);
                assert!(merged.is_empty());
                match &groups[0].alternatives[0] {
                    CompiledClause::Phrase { tokens, slop, .. } => {
                        assert_eq!(tokens, &["fresh", "honey"]);
                        assert_eq!(*slop, 1);
                    }
                    other => panic!("expected phrase clause, got {other:?}"),
                }
            }
            other => panic!("expected text query, got {other:?}"),
        }
    }

    #[test]
    fn test_word_start_mode_retargets_default_fields() {
        let options =
            SearchOptions::from_value(json!({"match": "word_start"})).unwrap();
        let compiled = compile(Some("egg"), options);
        match compiled.positive {
            PositiveQuery::Text { groups, .. } => match &groups[0].alternatives[0] {
                CompiledClause::Prefix { field, .. } => {
                    assert_eq!(field.indexed_name, "name.word_start");
                }
                other => panic!("expected prefix clause, got {other:?}"),
            },
            other => panic!("expected text query, got {other:?}"),
        }
    }

    #[test]
    fn test_exclusions_survive_match_all() {
        let options = SearchOptions::from_value(json!({"exclude": "butter"})).unwrap();
        let compiled = compile(Some("*"), options);
        assert_eq!(compiled.positive, PositiveQuery::MatchAll);
        assert_eq!(compiled.negative.len(), 1);
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let config = SearchConfig::default();
        let options = SearchOptions::from_value(json!({
            "operator": "and",
            "fields": ["name", {"name": "word_start"}],
            "exclude": ["peanut butter"],
            "misspellings": {"transpositions": true}
        }))
        .unwrap();
        let request =
            SearchRequest::from_options(Some("Fresh Honey"), options, &config).unwrap();
        let compiler = QueryCompiler::new(config);
        let first = compiler.compile(&request).unwrap();
        let second = compiler.compile(&request).unwrap();
        assert_eq!(first, second);
    }
}
