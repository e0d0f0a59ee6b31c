//! Schema bootstrap (spec.md §4.1 C1).
//!
//! A single idempotent DDL batch, applied with `CREATE ... IF NOT EXISTS`
//! rather than a versioned migration chain — schema migration between
//! incompatible versions is an explicit non-goal (SPEC_FULL.md §1), so there
//! is exactly one schema and no upgrade path to maintain.

use rusqlite::Connection;

use crate::error::Result;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    name TEXT PRIMARY KEY,
    node_type TEXT NOT NULL,
    sub_type TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    description TEXT,
    statement TEXT,
    content TEXT,
    confidence REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    properties TEXT NOT NULL DEFAULT '{}',
    search_text TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_nodes_type ON nodes(node_type);
CREATE INDEX IF NOT EXISTS idx_nodes_type_sub_type ON nodes(node_type, sub_type);
CREATE INDEX IF NOT EXISTS idx_nodes_status ON nodes(status);
CREATE INDEX IF NOT EXISTS idx_nodes_updated ON nodes(updated_at);

CREATE TABLE IF NOT EXISTS observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    node_name TEXT NOT NULL REFERENCES nodes(name) ON DELETE CASCADE,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_observations_node ON observations(node_name, id);

CREATE TABLE IF NOT EXISTS edges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_name TEXT NOT NULL REFERENCES nodes(name) ON DELETE CASCADE,
    to_name TEXT NOT NULL REFERENCES nodes(name) ON DELETE CASCADE,
    relation_type TEXT NOT NULL,
    confidence REAL,
    weight REAL NOT NULL DEFAULT 0.5,
    context TEXT,
    properties TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    UNIQUE(from_name, to_name, relation_type)
);

CREATE INDEX IF NOT EXISTS idx_edges_from ON edges(from_name);
CREATE INDEX IF NOT EXISTS idx_edges_to ON edges(to_name);
CREATE INDEX IF NOT EXISTS idx_edges_relation_type ON edges(relation_type);

CREATE TABLE IF NOT EXISTS aliases (
    alias TEXT PRIMARY KEY,
    canonical_name TEXT NOT NULL REFERENCES nodes(name) ON DELETE CASCADE,
    match_score REAL NOT NULL DEFAULT 1.0
);

CREATE INDEX IF NOT EXISTS idx_aliases_canonical ON aliases(canonical_name);

CREATE VIRTUAL TABLE IF NOT EXISTS nodes_fts USING fts5(
    name,
    search_text,
    content='nodes',
    content_rowid='rowid'
);

CREATE TRIGGER IF NOT EXISTS nodes_ai AFTER INSERT ON nodes BEGIN
    INSERT INTO nodes_fts(rowid, name, search_text)
    VALUES (NEW.rowid, NEW.name, NEW.search_text);
END;

CREATE TRIGGER IF NOT EXISTS nodes_ad AFTER DELETE ON nodes BEGIN
    INSERT INTO nodes_fts(nodes_fts, rowid, name, search_text)
    VALUES ('delete', OLD.rowid, OLD.name, OLD.search_text);
END;

CREATE TRIGGER IF NOT EXISTS nodes_au AFTER UPDATE ON nodes BEGIN
    INSERT INTO nodes_fts(nodes_fts, rowid, name, search_text)
    VALUES ('delete', OLD.rowid, OLD.name, OLD.search_text);
    INSERT INTO nodes_fts(rowid, name, search_text)
    VALUES (NEW.rowid, NEW.name, NEW.search_text);
END;
"#;

/// Apply PRAGMAs for a single-writer, WAL-mode, foreign-key-enforcing
/// connection (spec.md §5).
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

/// Bootstrap the schema. Idempotent — safe to call on every `Engine::open`.
pub fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
