//! Shared black-box test harness: one isolated, `tempfile`-backed `Engine`
//! per test so scenarios never interfere with each other.

use noema_core::model::NodeInput;
use noema_core::Engine;
use serde_json::Map;
use tempfile::TempDir;

/// A temporary database and the engine opened against it. The `TempDir`
/// must stay alive for the engine's lifetime — dropping it deletes the
/// backing file out from under an open connection.
pub struct TestDb {
    pub engine: Engine,
    _dir: TempDir,
}

pub fn test_engine() -> TestDb {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("graph.db");
    let engine = Engine::open_at(&path).expect("failed to open engine");
    TestDb { engine, _dir: dir }
}

/// Build a minimal `NodeInput` for an `Entity` node with only a name.
pub fn entity(name: &str) -> NodeInput {
    NodeInput {
        name: name.to_string(),
        entity_type: "Entity".to_string(),
        sub_type: None,
        description: None,
        statement: None,
        content: None,
        confidence: None,
        confidence_score: None,
        observations: Vec::new(),
        aliases: Vec::new(),
        extra: Map::new(),
    }
}

/// Same as [`entity`] but with an explicit node kind.
pub fn node_of_kind(name: &str, kind: &str) -> NodeInput {
    let mut input = entity(name);
    input.entity_type = kind.to_string();
    input
}
