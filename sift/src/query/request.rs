//! Caller-facing search request model.
//!
//! Options arrive either programmatically (builder methods) or as loosely
//! shaped JSON ([`SearchOptions::from_value`]); both funnel into the same
//! closed, eagerly validated [`SearchRequest`] before compilation. Unknown
//! option keys and unknown match types fail immediately with a
//! configuration error, never lazily at dispatch time.

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::fields::{FieldSpec, MatchType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Phrase that compiles to "match every record in scope".
pub const WILDCARD: &str = "*";

/// How query tokens combine across a multi-word phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    And,
    /// At least one token must match (the default).
    #[default]
    Or,
}

/// Overall matching mode for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Default,
    /// Order-sensitive phrase matching.
    Phrase,
    /// Every token must prefix a word in the field.
    WordStart,
}

/// Bounded-edit-distance matching policy.
///
/// The effective bound for a token is `min(edit_distance, curve(len))`
/// where the engine-default curve allows 0 edits below 3 characters,
/// 1 for 3-5, and 2 from 6 up. The curve is never exceeded, however badly
/// a token is misspelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MisspellingPolicy {
    pub enabled: bool,
    pub edit_distance: u32,
    /// Count an adjacent-character swap as one edit instead of two.
    pub transpositions: bool,
    /// Leading characters that must match exactly before edits apply.
    pub prefix_length: u32,
}

impl Default for MisspellingPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            edit_distance: 1,
            transpositions: false,
            prefix_length: 0,
        }
    }
}

/// `misspellings` option value: a bare bool or a partial policy override.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MisspellingsOption {
    Enabled(bool),
    Policy(MisspellingsOverride),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MisspellingsOverride {
    pub edit_distance: Option<u32>,
    pub transpositions: Option<bool>,
    pub prefix_length: Option<u32>,
}

impl MisspellingsOption {
    /// Merge onto the configured base policy.
    pub fn apply(&self, base: MisspellingPolicy) -> MisspellingPolicy {
        match self {
            MisspellingsOption::Enabled(enabled) => MisspellingPolicy {
                enabled: *enabled,
                ..base
            },
            MisspellingsOption::Policy(over) => MisspellingPolicy {
                enabled: true,
                edit_distance: over.edit_distance.unwrap_or(base.edit_distance),
                transpositions: over.transpositions.unwrap_or(base.transpositions),
                prefix_length: over.prefix_length.unwrap_or(base.prefix_length),
            },
        }
    }
}

/// `fields` entries: `"name"` / `"name^2"`, the `{name: match_type}`
/// shorthand, or a full spec object (distinguished by a valid `match`
/// key). Map values are validated when the request is built: an unknown
/// match type is a configuration error, never a field literally named
/// after the typo.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Shorthand(String),
    Object(BTreeMap<String, Value>),
    #[serde(skip)]
    Spec(FieldSpec),
}

impl FieldOption {
    pub fn into_specs(self) -> Result<Vec<FieldSpec>> {
        match self {
            FieldOption::Shorthand(s) => Ok(vec![FieldSpec::parse(&s)?]),
            FieldOption::Spec(spec) => Ok(vec![spec]),
            FieldOption::Object(map) => {
                // a spec object carries a `match` key naming a match
                // type; any other map is the {field: match_type}
                // shorthand and every value must name a match type
                let is_spec = map
                    .get("match")
                    .is_some_and(|v| serde_json::from_value::<MatchType>(v.clone()).is_ok());
                if is_spec {
                    let object: serde_json::Map<String, Value> = map.into_iter().collect();
                    let spec: FieldSpec = serde_json::from_value(Value::Object(object))
                        .map_err(|e| Error::Configuration(format!("invalid field spec: {e}")))?;
                    return Ok(vec![spec]);
                }
                map.into_iter()
                    .map(|(name, value)| {
                        let match_type: MatchType = serde_json::from_value(value.clone())
                            .map_err(|_| {
                                Error::Configuration(format!(
                                    "unknown match type {value} for field {name:?}"
                                ))
                            })?;
                        let mut spec = FieldSpec::parse(&name)?;
                        spec.match_type = match_type;
                        Ok(spec)
                    })
                    .collect()
            }
        }
    }
}

/// `exclude` accepts a single phrase or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Explicit sort override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Whether the search was issued against the whole collection or a scope
/// the caller already filtered upstream. The engine query bypasses any
/// upstream filter, so the latter earns a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryScope {
    #[default]
    Collection,
    Relation,
}

/// The recognized option set. Unknown keys are rejected when parsed from
/// JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    pub operator: Option<Operator>,
    pub fields: Vec<FieldOption>,
    #[serde(rename = "match")]
    pub match_mode: Option<MatchMode>,
    pub misspellings: Option<MisspellingsOption>,
    pub exclude: Option<OneOrMany>,
    #[serde(rename = "where")]
    pub filters: BTreeMap<String, Value>,
    pub order: Option<SortSpec>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    #[serde(skip)]
    pub scope: QueryScope,
}

impl SearchOptions {
    /// Parse a loose JSON options object, surfacing unknown keys or
    /// malformed values as configuration errors.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::Configuration(format!("invalid search options: {e}")))
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields.into_iter().map(FieldOption::Spec).collect();
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }

    pub fn misspellings(mut self, enabled: bool) -> Self {
        self.misspellings = Some(MisspellingsOption::Enabled(enabled));
        self
    }

    pub fn transpositions(mut self, transpositions: bool) -> Self {
        self.misspellings = Some(MisspellingsOption::Policy(MisspellingsOverride {
            transpositions: Some(transpositions),
            ..MisspellingsOverride::default()
        }));
        self
    }

    pub fn exclude(mut self, phrases: Vec<String>) -> Self {
        self.exclude = Some(OneOrMany::Many(phrases));
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn scope(mut self, scope: QueryScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Default result window, matching the engine-side page cap.
pub const DEFAULT_LIMIT: usize = 1_000;

/// A fully validated request: options merged with index configuration,
/// fields expanded, policy resolved. Immutable once built; compilation is
/// a pure function of this value.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub phrase: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub operator: Operator,
    pub match_mode: MatchMode,
    pub misspellings: MisspellingPolicy,
    pub exclude: Vec<String>,
    pub filters: BTreeMap<String, Value>,
    pub order: Option<(String, SortDirection)>,
    pub limit: usize,
    pub offset: usize,
    pub scope: QueryScope,
}

impl SearchRequest {
    pub fn from_options(
        phrase: Option<&str>,
        options: SearchOptions,
        config: &SearchConfig,
    ) -> Result<Self> {
        let mut fields = Vec::new();
        for option in options.fields {
            fields.extend(option.into_specs()?);
        }

        let misspellings = match &options.misspellings {
            Some(option) => option.apply(config.misspellings),
            None => config.misspellings,
        };

        Ok(Self {
            phrase: phrase.map(|p| p.to_string()),
            fields,
            operator: options.operator.unwrap_or_default(),
            match_mode: options.match_mode.unwrap_or_default(),
            misspellings,
            exclude: options.exclude.map(OneOrMany::into_vec).unwrap_or_default(),
            filters: options.filters,
            order: options.order.map(|s| (s.field, s.direction)),
            limit: options.limit.unwrap_or(DEFAULT_LIMIT),
            offset: options.offset.unwrap_or(0),
            scope: options.scope,
        })
    }

    /// True when the phrase is the explicit match-all sentinel or absent.
    pub fn is_match_all(&self) -> bool {
        match self.phrase.as_deref() {
            None => true,
            Some(p) => p.trim() == WILDCARD,
        }
    }
}
