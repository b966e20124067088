//! In-memory reference engine.
//!
//! Implements the analyzer chain the compiler assumes a real engine has
//! configured at schema-setup time (case folding, ASCII folding, Snowball
//! stemming, adjacent-word merging, prefix and bounded-fuzzy matching)
//! and evaluates compiled queries against documents held in memory.
//! Scoring is deterministic: clause-kind base weight times field weight,
//! normalized by field length, ties broken by insertion order. This is
//! the engine the behavioral test suite runs against; it is not a search
//! product.

use crate::analysis::{AnalyzedField, Analyzer};
use crate::engine::{Document, EngineHit, EngineHits, SearchEngine};
use crate::query::ast::{CompiledClause, CompiledQuery, PositiveQuery, Sort};
use crate::query::request::Operator;
use crate::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

struct StoredDoc {
    id: String,
    raw: HashMap<String, Value>,
    analyzed: HashMap<String, AnalyzedField>,
}

#[derive(Default)]
pub struct MemoryEngine {
    analyzer: Analyzer,
    collections: RwLock<HashMap<String, Vec<StoredDoc>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index documents into a collection, analyzing every string field.
    pub fn index(&self, collection: &str, docs: Vec<Document>) {
        let mut collections = self.collections.write();
        let stored = collections.entry(collection.to_string()).or_default();
        for doc in docs {
            let analyzed = doc
                .fields
                .iter()
                .filter_map(|(name, value)| match value {
                    Value::String(text) => Some((name.clone(), self.analyzer.analyze(text))),
                    _ => None,
                })
                .collect();
            stored.push(StoredDoc {
                id: doc.id,
                raw: doc.fields,
                analyzed,
            });
        }
    }

    pub fn clear(&self, collection: &str) {
        self.collections.write().remove(collection);
    }

    fn eval_clause(&self, doc: &StoredDoc, clause: &CompiledClause) -> Option<f32> {
        let field = clause.field();
        let analyzed = doc.analyzed.get(&field.name)?;
        let norm = 1.0 / (analyzed.tokens.len().max(1) as f32).sqrt();
        match clause {
            CompiledClause::Exact { phrase, .. } => {
                (analyzed.exact == *phrase).then_some(2.0 * field.weight)
            }
            CompiledClause::Prefix { token, .. } => analyzed
                .tokens
                .iter()
                .any(|t| t.starts_with(token.as_str()))
                .then_some(0.9 * field.weight * norm),
            CompiledClause::Stemmed { token, .. } => {
                let stem = self.analyzer.stem(token);
                let hit = analyzed.tokens.iter().any(|t| t == token)
                    || analyzed.stems.iter().any(|s| s == &stem)
                    || analyzed.shingles.iter().any(|s| s == token)
                    || analyzed.shingle_stems.iter().any(|s| s == &stem);
                hit.then_some(field.weight * norm)
            }
            CompiledClause::Fuzzy {
                token,
                max_edits,
                transpositions,
                prefix_length,
                ..
            } => {
                let best = analyzed
                    .tokens
                    .iter()
                    .chain(analyzed.shingles.iter())
                    .filter(|candidate| shares_prefix(token, candidate, *prefix_length))
                    .map(|candidate| crate::analysis::edit_distance(token, candidate, *transpositions))
                    .min()?;
                (best as u32 <= *max_edits)
                    .then_some(0.6 * field.weight * norm / (1.0 + best as f32))
            }
            CompiledClause::Phrase { tokens, slop, .. } => {
                let query_stems: Vec<String> =
                    tokens.iter().map(|t| self.analyzer.stem(t)).collect();
                phrase_match(&analyzed.stems, &query_stems, *slop as usize)
                    .then_some(1.5 * field.weight * norm)
            }
        }
    }

    fn eval_positive(&self, doc: &StoredDoc, positive: &PositiveQuery) -> Option<f32> {
        match positive {
            PositiveQuery::MatchAll => Some(1.0),
            PositiveQuery::MatchNone => None,
            PositiveQuery::Text {
                operator,
                groups,
                merged,
            } => {
                let group_scores: Vec<Option<f32>> = groups
                    .iter()
                    .map(|group| {
                        group
                            .alternatives
                            .iter()
                            .filter_map(|clause| self.eval_clause(doc, clause))
                            .fold(None, |best: Option<f32>, s| {
                                Some(best.map_or(s, |b| b.max(s)))
                            })
                    })
                    .collect();

                let token_score = if group_scores.is_empty() {
                    None
                } else {
                    match operator {
                        Operator::And => group_scores
                            .iter()
                            .copied()
                            .sum::<Option<f32>>(),
                        Operator::Or => {
                            let matched: Vec<f32> =
                                group_scores.iter().filter_map(|s| *s).collect();
                            (!matched.is_empty()).then(|| matched.iter().sum())
                        }
                    }
                };

                let merged_score = merged
                    .iter()
                    .filter_map(|clause| self.eval_clause(doc, clause))
                    .fold(None, |best: Option<f32>, s| {
                        Some(best.map_or(s, |b| b.max(s)))
                    });

                match (token_score, merged_score) {
                    (Some(t), Some(m)) => Some(t.max(m)),
                    (score, None) | (None, score) => score,
                }
            }
        }
    }
}

fn shares_prefix(a: &str, b: &str, prefix_length: u32) -> bool {
    let n = prefix_length as usize;
    if n == 0 {
        return true;
    }
    let pa: Vec<char> = a.chars().take(n).collect();
    let pb: Vec<char> = b.chars().take(n).collect();
    pa.len() == n && pa == pb
}

/// Query stems must appear in the document in the same relative order,
/// with at most `slop` extra positions interleaved. No reordering.
fn phrase_match(doc: &[String], query: &[String], slop: usize) -> bool {
    if query.is_empty() || doc.len() < query.len() {
        return false;
    }
    for start in 0..doc.len() {
        if doc[start] != query[0] {
            continue;
        }
        let mut budget = slop;
        let mut pos = start;
        let mut ok = true;
        for term in &query[1..] {
            let window_end = (pos + 2 + budget).min(doc.len());
            match (pos + 1..window_end).find(|&p| &doc[p] == term) {
                Some(p) => {
                    budget -= p - pos - 1;
                    pos = p;
                }
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            return true;
        }
    }
    false
}

fn sort_key(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl SearchEngine for MemoryEngine {
    async fn execute(&self, collection: &str, query: &CompiledQuery) -> Result<EngineHits> {
        let collections = self.collections.read();
        let docs: &[StoredDoc] = collections
            .get(collection)
            .map(|v| v.as_slice())
            .unwrap_or_default();

        let mut matched: Vec<(usize, &StoredDoc, f32)> = Vec::new();
        'docs: for (seq, doc) in docs.iter().enumerate() {
            for filter in &query.filters {
                if doc.raw.get(&filter.field) != Some(&filter.value) {
                    continue 'docs;
                }
            }
            for clause in &query.negative {
                if self.eval_clause(doc, clause).is_some() {
                    continue 'docs;
                }
            }
            if let Some(score) = self.eval_positive(doc, &query.positive) {
                matched.push((seq, doc, score));
            }
        }

        match &query.sort {
            Sort::Relevance => {
                matched.sort_by(|a, b| {
                    b.2.partial_cmp(&a.2)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.0.cmp(&b.0))
                });
            }
            Sort::EngineDefault => {}
            Sort::Field { name, ascending } => {
                matched.sort_by(|a, b| {
                    let ord = sort_key(a.1.raw.get(name)).cmp(&sort_key(b.1.raw.get(name)));
                    let ord = if *ascending { ord } else { ord.reverse() };
                    ord.then(a.0.cmp(&b.0))
                });
            }
        }

        let total = matched.len();
        let hits = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, doc, score)| EngineHit {
                id: doc.id.clone(),
                score,
            })
            .collect();
        debug!(collection, total, "memory engine executed query");
        Ok(EngineHits { hits, total })
    }
}
