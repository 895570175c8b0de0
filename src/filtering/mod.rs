//! # Filtering, search and sort
//!
//! Turns the list parameters of a request into a [`QueryPlan`]: an ordered set
//! of predicates, ORDER BY clauses and whitelisted includes. The same plan
//! drives both the count query and the page query.
//!
//! ## Query parameter examples
//!
//! ```rust,ignore
//! // Free-text search across the filter's search fields (OR-combined)
//! GET /provinces?search=jak
//!
//! // Caller sort, falls back to the filter's default sort when invalid
//! GET /athletes?sort=age&order=desc
//!
//! // Eager-load whitelisted relations
//! GET /athletes?includes=Province,Sport
//!
//! // Typed filter fields declared by the filter itself
//! GET /athletes?province_id=3&min_age=18&max_age=30
//! ```
//!
//! ## Validation drops
//!
//! Sort fields, search fields, filter columns and includes that fail
//! validation are left out of the query and reported in
//! [`QueryPlan::dropped`]. They never fail the request.
//!
//! ## Dialects
//!
//! - `PostgreSQL`: search uses `ILIKE`
//! - `MySQL`, `SQLite`, `SQL Server`: search uses `LIKE`

pub mod conditions;
pub mod dialect;
pub mod includes;
pub mod query_builder;
pub mod search;
pub mod sort;
pub mod validation;

pub use conditions::{
    DropKind, Dropped, FilterSet, LIKE_ESCAPE, PatternKind, Predicate, escape_like_wildcards,
};
pub use dialect::{Dialect, PatternOperator};
pub use includes::{IncludeResolver, resolve_includes};
pub use query_builder::{QueryBuilder, QueryPlan};
pub use search::build_search_predicate;
pub use sort::{SortClause, SortDirection, SortTarget, parse_default_sort, resolve_sort};
pub use validation::{column_ref, is_valid_identifier, is_valid_relation_path};
