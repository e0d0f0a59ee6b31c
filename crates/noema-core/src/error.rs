//! Engine error taxonomy (spec.md §7).

/// Errors surfaced by the engine.
///
/// "Not found" on a read is deliberately absent from this enum — per
/// spec.md §7 item 4, the retrieval surface is total and absorbs absent
/// nodes/edges into empty results rather than raising an error.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Underlying SQLite failure, including constraint violations that
    /// should not occur under the documented upsert/cascade contracts
    /// (taxonomy item 3) — if one surfaces it is a programmer error, not a
    /// recoverable outcome.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O failure opening or preparing the database file (taxonomy item 1).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input rejected before any write (taxonomy item 2): an
    /// empty node name, an unrecognized node kind, a missing required
    /// reasoning-chain field, and similar caller mistakes.
    #[error("validation error: {0}")]
    Validation(String),

    /// The engine could not determine where to open its database file.
    #[error("initialization error: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
