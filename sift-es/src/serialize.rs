//! Compiled-query to ES Query DSL serialization.

use serde_json::{json, Map, Value};
use sift::query::ast::{CompiledClause, CompiledQuery, PositiveQuery, Sort};
use sift::query::request::Operator;

/// Build the `_search` request body.
pub fn body(query: &CompiledQuery) -> Value {
    let mut bool_query = Map::new();
    bool_query.insert("must".to_string(), json!([positive(&query.positive)]));

    if !query.negative.is_empty() {
        let must_not: Vec<Value> = query.negative.iter().map(clause).collect();
        bool_query.insert("must_not".to_string(), Value::Array(must_not));
    }

    if !query.filters.is_empty() {
        let filter: Vec<Value> = query
            .filters
            .iter()
            .map(|f| keyed("term", keyed(&f.field, f.value.clone())))
            .collect();
        bool_query.insert("filter".to_string(), Value::Array(filter));
    }

    let mut body = Map::new();
    body.insert(
        "query".to_string(),
        keyed("bool", Value::Object(bool_query)),
    );
    body.insert("from".to_string(), json!(query.offset));
    body.insert("size".to_string(), json!(query.limit));
    if let Sort::Field { name, ascending } = &query.sort {
        let order = if *ascending { "asc" } else { "desc" };
        body.insert(
            "sort".to_string(),
            Value::Array(vec![keyed(name, json!({"order": order}))]),
        );
    }
    Value::Object(body)
}

/// Single-key JSON object.
fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn positive(positive: &PositiveQuery) -> Value {
    match positive {
        PositiveQuery::MatchAll => json!({"match_all": {}}),
        PositiveQuery::MatchNone => json!({"bool": {"must_not": [{"match_all": {}}]}}),
        PositiveQuery::Text {
            operator,
            groups,
            merged,
        } => {
            let group_values: Vec<Value> = groups
                .iter()
                .map(|group| {
                    let alternatives: Vec<Value> =
                        group.alternatives.iter().map(clause).collect();
                    json!({"bool": {"should": alternatives, "minimum_should_match": 1}})
                })
                .collect();

            let token_part = match operator {
                Operator::And => json!({"bool": {"must": group_values}}),
                Operator::Or => {
                    json!({"bool": {"should": group_values, "minimum_should_match": 1}})
                }
            };

            if merged.is_empty() {
                token_part
            } else {
                let mut should = vec![token_part];
                should.extend(merged.iter().map(clause));
                json!({"bool": {"should": should, "minimum_should_match": 1}})
            }
        }
    }
}

fn clause(clause: &CompiledClause) -> Value {
    let field = clause.field();
    let boost = (field.weight != 1.0).then_some(field.weight);
    let mut params = Map::new();
    if let Some(boost) = boost {
        params.insert("boost".to_string(), json!(boost));
    }
    let (kind, params) = match clause {
        CompiledClause::Exact { phrase, .. } => {
            params.insert("value".to_string(), json!(phrase));
            ("term", params)
        }
        // prefix semantics come from the word_start analyzer the field
        // variant carries, so both read as plain match clauses on the wire
        CompiledClause::Prefix { token, .. } | CompiledClause::Stemmed { token, .. } => {
            params.insert("query".to_string(), json!(token));
            ("match", params)
        }
        CompiledClause::Fuzzy {
            token,
            max_edits,
            transpositions,
            prefix_length,
            ..
        } => {
            params.insert("value".to_string(), json!(token));
            params.insert("fuzziness".to_string(), json!(max_edits));
            params.insert("transpositions".to_string(), json!(transpositions));
            params.insert("prefix_length".to_string(), json!(prefix_length));
            ("fuzzy", params)
        }
        CompiledClause::Phrase { tokens, slop, .. } => {
            params.insert("query".to_string(), json!(tokens.join(" ")));
            params.insert("slop".to_string(), json!(slop));
            ("match_phrase", params)
        }
    };
    keyed(kind, keyed(&field.indexed_name, Value::Object(params)))
}
