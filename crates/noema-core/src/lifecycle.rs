//! Process-level shutdown hook (spec.md §4.10 C10, SPEC_FULL.md §2).
//!
//! A host embedding this engine gets a working checkpoint-on-signal for
//! free rather than needing to wire one up itself — the requirement belongs
//! to the storage engine, not the excluded agent-protocol front-end.

#![cfg(unix)]

use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::error::Result;
use crate::storage::Engine;

/// Register a background thread that listens for `SIGINT`/`SIGTERM` and
/// runs a best-effort WAL checkpoint when one arrives. The signal is not
/// otherwise handled — re-raising or exiting after the checkpoint is the
/// host process's own concern.
///
/// The returned `JoinHandle` runs for the lifetime of the process; a host
/// may drop it without joining.
pub fn install_shutdown_hook(engine: Arc<Engine>) -> Result<std::thread::JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    let handle = std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            tracing::info!("shutdown signal received, checkpointing database");
            engine.checkpoint();
        }
    });

    Ok(handle)
}
