//! Storage layer: schema bootstrap and the `Engine`'s write/read paths
//! (spec.md C1, C3, C5, C10).

pub mod engine;
pub mod schema;

pub use engine::Engine;
