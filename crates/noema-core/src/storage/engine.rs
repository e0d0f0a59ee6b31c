//! The engine: write path (C3), search & lookup (C5), and lifecycle (C10).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::codec::{self, EncodedNode};
use crate::error::{EngineError, Result};
use crate::model::{
    Alias, Edge, GraphFragment, Node, NodeInput, NodeKind, Observation, ObservationBatch,
    RelationInput, RelationKey, SearchOptions, DEFAULT_MATCH_SCORE,
};
use crate::search::build_match_expression;
use crate::storage::schema;

/// Environment variable consulted by [`Engine::open`] when no explicit path
/// is given (spec.md §4.10, SPEC_FULL.md §2).
pub const DB_PATH_ENV_VAR: &str = "NOEMA_GRAPH_DB_PATH";

/// The knowledge-graph storage engine. Owns a single SQLite connection
/// behind a mutex — every write batch runs inside one transaction, and reads
/// share the same serialized connection (spec.md §5).
pub struct Engine {
    conn: Mutex<Connection>,
}

impl Engine {
    /// Open (creating if absent) the database at `path`, or at the default
    /// location when `path` is `None`: the `NOEMA_GRAPH_DB_PATH` environment
    /// variable, falling back to a `directories::ProjectDirs` data directory.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let resolved = match path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        if let Some(parent) = resolved.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!(path = %resolved.display(), "opening knowledge graph database");
        let conn = Connection::open(&resolved)?;
        schema::configure_connection(&conn)?;
        schema::bootstrap(&conn)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a database that exists only for the lifetime of the connection
    /// (primarily for tests that still want to exercise `Engine::open`'s
    /// signature against a concrete file, see `tempfile`-backed harnesses).
    pub fn open_at(path: &Path) -> Result<Self> {
        Self::open(Some(path.to_path_buf()))
    }

    fn default_db_path() -> Result<PathBuf> {
        if let Ok(from_env) = std::env::var(DB_PATH_ENV_VAR) {
            if !from_env.is_empty() {
                return Ok(PathBuf::from(from_env));
            }
        }

        let dirs = ProjectDirs::from("dev", "noema", "graph")
            .ok_or_else(|| EngineError::Init("could not determine project directories".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("noema-graph.db"))
    }

    /// Best-effort WAL checkpoint, then drop the connection. Consuming
    /// `self` makes this the last thing a caller can do with the engine.
    pub fn close(self) -> Result<()> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        checkpoint(&conn);
        tracing::info!("knowledge graph database closed");
        Ok(())
    }

    /// Best-effort WAL checkpoint without closing the connection, callable
    /// from a shutdown-signal listener that only holds a shared reference
    /// (spec.md §4.10, [`crate::lifecycle`]).
    pub fn checkpoint(&self) {
        if let Ok(conn) = self.conn.lock() {
            checkpoint(&conn);
        }
    }

    // ---- C3 write path -----------------------------------------------

    pub fn create_nodes(&self, nodes: Vec<NodeInput>) -> Result<Vec<Node>> {
        let mut names = Vec::with_capacity(nodes.len());
        let mut conn = self.conn.lock().expect("connection mutex poisoned");
        let tx = conn.transaction()?;
        let now = Utc::now();

        for input in &nodes {
            NodeKind::parse(&input.entity_type)?;
            let encoded = codec::encode_node(input)?;
            upsert_node(&tx, &encoded, now)?;

            for content in &input.observations {
                insert_observation(&tx, &encoded.name, content, now)?;
            }
            for alias in &input.aliases {
                upsert_alias(&tx, alias, &encoded.name, DEFAULT_MATCH_SCORE)?;
            }
            names.push(encoded.name.clone());
        }

        tx.commit()?;
        drop(conn);

        names
            .into_iter()
            .map(|name| {
                self.get_node_by_name(&name)?
                    .ok_or_else(|| EngineError::Database(rusqlite::Error::QueryReturnedNoRows))
            })
            .collect()
    }

    pub fn create_relations(&self, relations: Vec<RelationInput>) -> Result<Vec<Edge>> {
        let mut keys = Vec::with_capacity(relations.len());
        let mut conn = self.conn.lock().expect("connection mutex poisoned");
        let tx = conn.transaction()?;
        let now = Utc::now();

        for input in &relations {
            if input.from.trim().is_empty() || input.to.trim().is_empty() {
                return Err(EngineError::Validation(
                    "relation from/to must not be empty".into(),
                ));
            }
            if input.relation_type.trim().is_empty() {
                return Err(EngineError::Validation(
                    "relation type must not be empty".into(),
                ));
            }

            let properties_json = serde_json::to_string(&input.properties)
                .map_err(|e| EngineError::Validation(format!("failed to encode properties: {e}")))?;

            tx.execute(
                "INSERT INTO edges (from_name, to_name, relation_type, confidence, weight, context, properties, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(from_name, to_name, relation_type) DO UPDATE SET
                     confidence = excluded.confidence,
                     weight = excluded.weight,
                     context = excluded.context,
                     properties = excluded.properties",
                params![
                    input.from,
                    input.to,
                    input.relation_type,
                    input.confidence,
                    input.resolved_weight(),
                    input.context,
                    properties_json,
                    now.to_rfc3339(),
                ],
            )?;

            keys.push((input.from.clone(), input.to.clone(), input.relation_type.clone()));
        }

        tx.commit()?;
        drop(conn);

        keys.into_iter()
            .map(|(from, to, relation_type)| {
                self.get_edge(&from, &to, &relation_type)?
                    .ok_or_else(|| EngineError::Database(rusqlite::Error::QueryReturnedNoRows))
            })
            .collect()
    }

    pub fn add_observations(&self, batch: Vec<ObservationBatch>) -> Result<()> {
        let mut conn = self.conn.lock().expect("connection mutex poisoned");
        let tx = conn.transaction()?;
        let now = Utc::now();

        for item in &batch {
            for content in &item.contents {
                insert_observation(&tx, &item.node, content, now)?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn delete_nodes(&self, names: &[String]) -> Result<()> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        for name in names {
            conn.execute("DELETE FROM nodes WHERE name = ?1", params![name])?;
        }
        Ok(())
    }

    pub fn delete_relations(&self, triples: &[RelationKey]) -> Result<()> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        for key in triples {
            conn.execute(
                "DELETE FROM edges WHERE from_name = ?1 AND to_name = ?2 AND relation_type = ?3",
                params![key.from, key.to, key.relation_type],
            )?;
        }
        Ok(())
    }

    // ---- C5 search & lookup --------------------------------------------

    pub fn get_node_by_name(&self, name: &str) -> Result<Option<Node>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        self.get_node_by_name_locked(&conn, name)
    }

    fn get_node_by_name_locked(&self, conn: &Connection, name: &str) -> Result<Option<Node>> {
        if let Some(node) = fetch_node_row(conn, name)? {
            let observations = fetch_observations(conn, name)?;
            return Ok(Some(codec::with_observations(node, observations)));
        }

        let canonical: Option<String> = conn
            .query_row(
                "SELECT canonical_name FROM aliases WHERE alias = ?1",
                params![name.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;

        match canonical {
            Some(canonical_name) => {
                if let Some(node) = fetch_node_row(conn, &canonical_name)? {
                    let observations = fetch_observations(conn, &canonical_name)?;
                    Ok(Some(codec::with_observations(node, observations)))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    pub fn get_nodes_by_names(&self, names: &[String]) -> Result<Vec<Node>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            if let Some(node) = self.get_node_by_name_locked(&conn, name)? {
                out.push(node);
            }
        }
        Ok(out)
    }

    pub fn resolve_alias(&self, alias: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        let canonical: Option<String> = conn
            .query_row(
                "SELECT canonical_name FROM aliases WHERE alias = ?1",
                params![alias.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(canonical)
    }

    pub fn search_nodes(&self, query: &str, opts: SearchOptions) -> Result<GraphFragment> {
        let Some(match_expr) = build_match_expression(query) else {
            return Ok(GraphFragment::default());
        };

        let conn = self.conn.lock().expect("connection mutex poisoned");

        let mut type_filter = String::new();
        if let Some(types) = &opts.node_types {
            let placeholders = vec!["?"; types.len()].join(", ");
            type_filter = format!(" AND nodes.node_type IN ({placeholders})");
        }

        let sql = format!(
            "SELECT nodes.* FROM nodes_fts
             JOIN nodes ON nodes.rowid = nodes_fts.rowid
             WHERE nodes_fts MATCH ?{type_filter}
             ORDER BY rank
             LIMIT ?"
        );

        let limit = if opts.limit == 0 { i64::MAX } else { opts.limit as i64 };
        let mut stmt = conn.prepare(&sql)?;

        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&match_expr];
        if let Some(types) = &opts.node_types {
            for t in types {
                params.push(t);
            }
        }
        params.push(&limit);

        let rows = stmt.query_map(params.as_slice(), |row| row_to_node(row))?;

        let mut entities = Vec::new();
        for row in rows {
            let node = row?;
            let observations = fetch_observations(&conn, &node.name)?;
            entities.push(codec::with_observations(node, observations));
        }

        let names: Vec<String> = entities.iter().map(|n| n.name.clone()).collect();
        let relations = edges_among_locked(&conn, &names)?;

        Ok(GraphFragment::new(entities, relations))
    }

    /// Edges directly connecting two named nodes, used by traversal and
    /// reasoning-subgraph assembly to fetch the edges among a node set.
    pub(crate) fn edges_among(&self, names: &[String]) -> Result<Vec<Edge>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock().expect("connection mutex poisoned");
        edges_among_locked(&conn, names)
    }

    pub(crate) fn get_edge(&self, from: &str, to: &str, relation_type: &str) -> Result<Option<Edge>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        get_edge_locked(&conn, from, to, relation_type)
    }

    /// Outgoing edges from a node, optionally filtered to a set of relation
    /// types matched case-insensitively (spec.md §9 — temporal relation
    /// matching does not rewrite the stored value).
    pub(crate) fn outgoing_edges(&self, from: &str) -> Result<Vec<Edge>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        outgoing_edges_locked(&conn, from)
    }

    pub(crate) fn incoming_edges(&self, to: &str) -> Result<Vec<Edge>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        incoming_edges_locked(&conn, to)
    }

    /// Every edge in the graph, optionally restricted to the nodes named in
    /// `scope` (on either endpoint). Used by conflict detection, which scans
    /// the whole edge set for a fixed relation type rather than walking from
    /// a seed (spec.md §4.9).
    pub(crate) fn all_edges(&self, scope: Option<&[String]>) -> Result<Vec<Edge>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        match scope {
            None => {
                let mut stmt = conn.prepare("SELECT * FROM edges")?;
                let rows = stmt.query_map([], |row| row_to_edge(row))?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(EngineError::from)
            }
            Some(names) if names.is_empty() => Ok(Vec::new()),
            Some(names) => {
                let placeholders = names.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                let sql = format!(
                    "SELECT * FROM edges WHERE from_name IN ({placeholders}) OR to_name IN ({placeholders})"
                );
                let mut stmt = conn.prepare(&sql)?;
                let bound: Vec<&dyn rusqlite::ToSql> = names
                    .iter()
                    .chain(names.iter())
                    .map(|n| n as &dyn rusqlite::ToSql)
                    .collect();
                let rows = stmt.query_map(bound.as_slice(), |row| row_to_edge(row))?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(EngineError::from)
            }
        }
    }

    pub(crate) fn node_exists(&self, name: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM nodes WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub(crate) fn aliases_for(&self, canonical_name: &str) -> Result<Vec<Alias>> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT alias, canonical_name, match_score FROM aliases WHERE canonical_name = ?1",
        )?;
        let rows = stmt.query_map(params![canonical_name], |row| {
            Ok(Alias {
                alias: row.get(0)?,
                canonical_name: row.get(1)?,
                match_score: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(EngineError::from)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Ok(conn) = self.conn.lock() {
            checkpoint(&conn);
        }
    }
}

fn checkpoint(conn: &Connection) {
    if let Err(e) = conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);") {
        tracing::warn!(error = %e, "WAL checkpoint failed during close");
    }
}

fn upsert_node(conn: &Connection, encoded: &EncodedNode, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO nodes (name, node_type, sub_type, status, description, statement, content, confidence, created_at, updated_at, properties, search_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9, ?10, ?11)
         ON CONFLICT(name) DO UPDATE SET
             node_type = excluded.node_type,
             sub_type = excluded.sub_type,
             status = excluded.status,
             description = excluded.description,
             statement = excluded.statement,
             content = excluded.content,
             confidence = excluded.confidence,
             updated_at = excluded.updated_at,
             properties = excluded.properties,
             search_text = excluded.search_text",
        params![
            encoded.name,
            encoded.node_type,
            encoded.sub_type,
            encoded.status.as_str(),
            encoded.description,
            encoded.statement,
            encoded.content,
            encoded.confidence,
            now.to_rfc3339(),
            encoded.properties_json,
            encoded.search_text,
        ],
    )?;
    Ok(())
}

fn insert_observation(conn: &Connection, node_name: &str, content: &str, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO observations (node_name, content, created_at) VALUES (?1, ?2, ?3)",
        params![node_name, content, now.to_rfc3339()],
    )?;
    Ok(())
}

fn upsert_alias(conn: &Connection, alias: &str, canonical_name: &str, match_score: f64) -> Result<()> {
    conn.execute(
        "INSERT INTO aliases (alias, canonical_name, match_score) VALUES (?1, ?2, ?3)
         ON CONFLICT(alias) DO UPDATE SET canonical_name = excluded.canonical_name, match_score = excluded.match_score",
        params![alias.to_lowercase(), canonical_name, match_score],
    )?;
    Ok(())
}

fn parse_timestamp(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
            )
        })
}

fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<Node> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    codec::decode_node(
        row.get("name")?,
        row.get("node_type")?,
        row.get("sub_type")?,
        row.get("status")?,
        row.get("description")?,
        row.get("statement")?,
        row.get("content")?,
        row.get("confidence")?,
        parse_timestamp(&created_at)?,
        parse_timestamp(&updated_at)?,
        row.get("properties")?,
        row.get("search_text")?,
    )
    .map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
        )
    })
}

fn fetch_node_row(conn: &Connection, name: &str) -> Result<Option<Node>> {
    let node = conn
        .query_row("SELECT * FROM nodes WHERE name = ?1", params![name], |row| {
            row_to_node(row)
        })
        .optional()?;
    Ok(node)
}

fn fetch_observations(conn: &Connection, node_name: &str) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(
        "SELECT id, content, created_at FROM observations WHERE node_name = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![node_name], |row| {
        let created_at: String = row.get(2)?;
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, created_at))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, content, created_at) = row?;
        out.push(Observation { id, content, created_at: parse_timestamp(&created_at)? });
    }
    Ok(out)
}

fn row_to_edge(row: &rusqlite::Row) -> rusqlite::Result<Edge> {
    let created_at: String = row.get("created_at")?;
    let properties_json: String = row.get("properties")?;
    let properties = serde_json::from_str(&properties_json).unwrap_or_default();

    Ok(Edge {
        id: row.get("id")?,
        from: row.get("from_name")?,
        to: row.get("to_name")?,
        relation_type: row.get("relation_type")?,
        confidence: row.get("confidence")?,
        weight: row.get("weight")?,
        context: row.get("context")?,
        properties,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn get_edge_locked(conn: &Connection, from: &str, to: &str, relation_type: &str) -> Result<Option<Edge>> {
    let edge = conn
        .query_row(
            "SELECT * FROM edges WHERE from_name = ?1 AND to_name = ?2 AND relation_type = ?3",
            params![from, to, relation_type],
            |row| row_to_edge(row),
        )
        .optional()?;
    Ok(edge)
}

fn outgoing_edges_locked(conn: &Connection, from: &str) -> Result<Vec<Edge>> {
    let mut stmt = conn.prepare("SELECT * FROM edges WHERE from_name = ?1")?;
    let rows = stmt.query_map(params![from], |row| row_to_edge(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(EngineError::from)
}

fn incoming_edges_locked(conn: &Connection, to: &str) -> Result<Vec<Edge>> {
    let mut stmt = conn.prepare("SELECT * FROM edges WHERE to_name = ?1")?;
    let rows = stmt.query_map(params![to], |row| row_to_edge(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(EngineError::from)
}

fn edges_among_locked(conn: &Connection, names: &[String]) -> Result<Vec<Edge>> {
    let placeholders = names.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT * FROM edges WHERE from_name IN ({placeholders}) AND to_name IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = names
        .iter()
        .chain(names.iter())
        .map(|n| n as &dyn rusqlite::ToSql)
        .collect();
    let rows = stmt.query_map(params.as_slice(), |row| row_to_edge(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(EngineError::from)
}
