//! Property tests for the compiler's pure-function contract.

use proptest::prelude::*;
use sift::query::compiler::QueryCompiler;
use sift::query::request::{Operator, SearchOptions, SearchRequest};
use sift::SearchConfig;

fn compile(phrase: &str, options: SearchOptions) -> sift::query::ast::CompiledQuery {
    let config = SearchConfig::default();
    let request = SearchRequest::from_options(Some(phrase), options, &config).unwrap();
    QueryCompiler::new(config).compile(&request).unwrap()
}

proptest! {
    /// Compiling the same request twice yields structurally identical
    /// output.
    #[test]
    fn compile_is_deterministic(phrase in "[a-zA-Z0-9% ]{0,40}") {
        let first = compile(&phrase, SearchOptions::default());
        let second = compile(&phrase, SearchOptions::default());
        prop_assert_eq!(first, second);
    }

    /// Case folding is idempotent: upper, lower, and mixed case compile
    /// to the same plan.
    #[test]
    fn compile_case_folds(phrase in "[a-zA-Z ]{1,40}") {
        let upper = compile(&phrase.to_uppercase(), SearchOptions::default());
        let lower = compile(&phrase.to_lowercase(), SearchOptions::default());
        let mixed = compile(&phrase, SearchOptions::default());
        prop_assert_eq!(&upper, &lower);
        prop_assert_eq!(&upper, &mixed);
    }

    /// The operator never changes which clauses exist, only how token
    /// groups combine.
    #[test]
    fn operator_preserves_clause_set(phrase in "[a-z]{1,8}( [a-z]{1,8}){0,3}") {
        use sift::query::ast::PositiveQuery;
        let or = compile(&phrase, SearchOptions::default().operator(Operator::Or));
        let and = compile(&phrase, SearchOptions::default().operator(Operator::And));
        match (or.positive, and.positive) {
            (
                PositiveQuery::Text { groups: a, merged: ma, .. },
                PositiveQuery::Text { groups: b, merged: mb, .. },
            ) => {
                prop_assert_eq!(a, b);
                prop_assert_eq!(ma, mb);
            }
            (a, b) => prop_assert_eq!(a, b),
        }
    }
}
