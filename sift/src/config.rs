//! Per-index search configuration.
//!
//! Passed explicitly to [`SearchIndex`](crate::index::SearchIndex) at
//! construction so that concurrent compilations against differently
//! configured indexes never interfere. There is no ambient global state.

use crate::fields::FieldSpec;
use crate::query::request::MisspellingPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields queried when a request names none.
    pub default_fields: Vec<FieldSpec>,
    /// Closed set of searchable fields. `None` allows any field name;
    /// with a set, an unknown field is a configuration error.
    pub searchable: Option<Vec<String>>,
    /// Base misspelling policy, overridable per request.
    pub misspellings: MisspellingPolicy,
    /// Positional slop for phrase-mode queries. Small by design: admits a
    /// stray word between phrase tokens but never a reordering.
    pub phrase_slop: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_fields: vec![FieldSpec::new("name")],
            searchable: None,
            misspellings: MisspellingPolicy::default(),
            phrase_slop: 1,
        }
    }
}

impl SearchConfig {
    pub fn with_default_fields(fields: Vec<FieldSpec>) -> Self {
        Self {
            default_fields: fields,
            ..Self::default()
        }
    }
}
