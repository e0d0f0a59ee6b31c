//! Full-text search support (spec.md §4.4 C4).

mod fts;

pub use fts::build_match_expression;
