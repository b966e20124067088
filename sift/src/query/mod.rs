pub mod ast;
pub mod compiler;
pub mod request;

pub use ast::{CompiledClause, CompiledQuery, FieldFilter, PositiveQuery, Sort, TokenGroup};
pub use compiler::QueryCompiler;
pub use request::{
    MatchMode, MisspellingPolicy, Operator, QueryScope, SearchOptions, SearchRequest, WILDCARD,
};
