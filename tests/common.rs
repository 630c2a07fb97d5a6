//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use sparklog::engine::MetricsEngine;
use sparklog::probe::SystemProbe;
use sparklog::test_utils::RecordingSink;
use sparklog::window::WindowStore;

/// An engine over a fresh window store, a scripted probe and a recording
/// sink, so tests never touch the process-wide store.
pub fn engine_with(
    probe: impl SystemProbe + 'static,
    sink: RecordingSink,
) -> (Arc<MetricsEngine>, Arc<WindowStore>) {
    let store = Arc::new(WindowStore::new());
    let engine = Arc::new(MetricsEngine::new(
        store.clone(),
        Box::new(probe),
        Arc::new(sink),
    ));
    (engine, store)
}
