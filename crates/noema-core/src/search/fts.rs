//! FTS5 query builder (spec.md §4.4 C4).
//!
//! SQLite's FTS5 `MATCH` operand has its own small grammar (`AND`/`OR`/`NOT`,
//! `"phrase"` quoting, column filters, `*` prefix). A raw user query handed
//! straight to `MATCH` can therefore throw a syntax error on stray
//! punctuation instead of just finding nothing. This module reduces an
//! arbitrary query string down to a conjunction of safe bareword tokens.

/// Build a MATCH expression from a raw query string.
///
/// Tokenizes on whitespace, strips characters FTS5 treats specially
/// (`" * ( ) : ^ -`), drops tokens shorter than two characters, and joins
/// the survivors with an implicit `AND` (FTS5's default when terms are
/// juxtaposed). Returns `None` when no token survives — the caller treats an
/// unresolvable query as an empty result, never an error (spec.md §7 item 5).
pub fn build_match_expression(query: &str) -> Option<String> {
    let tokens: Vec<String> = query
        .split_whitespace()
        .map(sanitize_token)
        .filter(|t| t.chars().count() >= 2)
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" AND "))
    }
}

/// Strip FTS5 special characters from a single token, leaving alphanumerics,
/// underscores, and hyphens within the word.
fn sanitize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
