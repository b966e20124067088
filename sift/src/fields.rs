//! Logical field specifications and their resolution to concrete analyzed
//! field variants.
//!
//! A caller names fields logically (`name`, `name^2`, `{name: word_start}`);
//! the resolver maps each to the analyzed variant the engine indexes for
//! that match type. Resolution happens once per request and fails closed:
//! a field outside the configured searchable set is a configuration error,
//! never a silently narrowed scope.

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How a field's content is matched against the query phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Stemmed token matching with word-space normalization.
    #[default]
    Default,
    /// Whole-value equality after case and ASCII folding.
    Exact,
    /// Each query token prefixes some word in the field.
    WordStart,
    /// Stemmed token matching (alias of the default analyzed variant).
    Stemmed,
}

/// One requested field: logical name, match type, boost weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, rename = "match")]
    pub match_type: MatchType,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            match_type: MatchType::Default,
            weight: 1.0,
        }
    }

    pub fn with_match(name: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            name: name.into(),
            match_type,
            weight: 1.0,
        }
    }

    /// Parse the caret-weight shorthand: `"name^2"` is `name` boosted 2x.
    pub fn parse(spec: &str) -> Result<Self> {
        match spec.split_once('^') {
            Some((name, boost)) => {
                let weight: f32 = boost.parse().map_err(|_| {
                    Error::Configuration(format!("invalid field boost in {spec:?}"))
                })?;
                if weight <= 0.0 {
                    return Err(Error::Configuration(format!(
                        "field boost must be positive in {spec:?}"
                    )));
                }
                Ok(Self {
                    name: name.to_string(),
                    match_type: MatchType::Default,
                    weight,
                })
            }
            None => Ok(Self::new(spec)),
        }
    }
}

/// A field resolved to the concrete analyzed variant to query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedField {
    /// Logical field name as the caller gave it.
    pub name: String,
    /// Concrete analyzed field, e.g. `name.analyzed` or `name.word_start`.
    pub indexed_name: String,
    pub match_type: MatchType,
    pub weight: f32,
}

impl ResolvedField {
    /// The analyzed-variant suffix for a match type. Default and stemmed
    /// both target the stemmed + word-merge variant so that a phrase with
    /// no spaces matches content with spaces and vice versa.
    fn variant_suffix(match_type: MatchType) -> &'static str {
        match match_type {
            MatchType::Default | MatchType::Stemmed => "analyzed",
            MatchType::Exact => "exact",
            MatchType::WordStart => "word_start",
        }
    }
}

/// Resolve requested fields against the index configuration. An empty
/// request falls back to the configured default fields.
pub fn resolve(config: &SearchConfig, requested: &[FieldSpec]) -> Result<Vec<ResolvedField>> {
    let specs = if requested.is_empty() {
        &config.default_fields
    } else {
        requested
    };

    let mut resolved = Vec::with_capacity(specs.len());
    for spec in specs {
        if let Some(searchable) = &config.searchable {
            if !searchable.iter().any(|f| f == &spec.name) {
                return Err(Error::Configuration(format!(
                    "field {:?} is not searchable on this index",
                    spec.name
                )));
            }
        }
        if spec.weight <= 0.0 {
            return Err(Error::Configuration(format!(
                "field {:?} has non-positive weight {}",
                spec.name, spec.weight
            )));
        }
        resolved.push(ResolvedField {
            name: spec.name.clone(),
            indexed_name: format!(
                "{}.{}",
                spec.name,
                ResolvedField::variant_suffix(spec.match_type)
            ),
            match_type: spec.match_type,
            weight: spec.weight,
        });
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_name_field() {
        let config = SearchConfig::default();
        let fields = resolve(&config, &[]).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[0].indexed_name, "name.analyzed");
        assert_eq!(fields[0].match_type, MatchType::Default);
    }

    #[test]
    fn test_variant_names() {
        let config = SearchConfig::default();
        let fields = resolve(
            &config,
            &[
                FieldSpec::with_match("name", MatchType::Exact),
                FieldSpec::with_match("name", MatchType::WordStart),
            ],
        )
        .unwrap();
        assert_eq!(fields[0].indexed_name, "name.exact");
        assert_eq!(fields[1].indexed_name, "name.word_start");
    }

    #[test]
    fn test_caret_weight() {
        let spec = FieldSpec::parse("title^2.5").unwrap();
        assert_eq!(spec.name, "title");
        assert_eq!(spec.weight, 2.5);
        assert!(FieldSpec::parse("title^zero").is_err());
        assert!(FieldSpec::parse("title^-1").is_err());
    }

    #[test]
    fn test_unsearchable_field_fails_closed() {
        let config = SearchConfig {
            searchable: Some(vec!["name".to_string()]),
            ..SearchConfig::default()
        };
        let err = resolve(&config, &[FieldSpec::new("password")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_duplicate_names_both_resolve() {
        let config = SearchConfig::default();
        let fields = resolve(
            &config,
            &[
                FieldSpec::new("name"),
                FieldSpec::with_match("name", MatchType::Exact),
            ],
        )
        .unwrap();
        assert_eq!(fields.len(), 2);
    }
}
