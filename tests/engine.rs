//! Tick engine behaviour: sampling order, cold-start handling, reporting
//! format and silence rules.

use std::sync::{Arc, Mutex};

use sparklog::render::sparkline;
use sparklog::test_utils::{FakeProbe, RecordingSink};
use sparklog::types::ProbeFn;
use sparklog::window::WINDOW_CAPACITY;
use sparklog::{GraphStyle, MetricRequest};

mod common;
use common::engine_with;

#[test]
fn cpu_tick_emits_one_line_with_stats_and_sparkline() {
    let sink = RecordingSink::new();
    let (engine, store) = engine_with(FakeProbe::flat(Some(50.0), None, None), sink.clone());
    let request = MetricRequest::builtins(["cpu"], GraphStyle::Bar).unwrap();

    engine.tick(&request);

    let window = store.snapshot("cpu").expect("cpu window exists");
    assert_eq!(window.len(), WINDOW_CAPACITY);
    assert_eq!(window.last(), Some(&Some(50)));

    let expected = format!(
        "CPU   : 50% | min, mean, max (50, 50, 50) | {}",
        sparkline(&window, GraphStyle::Bar)
    );
    assert_eq!(sink.lines(), vec![expected]);
}

#[test]
fn cold_start_zero_cpu_reading_is_skipped() {
    let sink = RecordingSink::new();
    let (engine, store) = engine_with(FakeProbe::cpu_script([0.0, 37.0]), sink.clone());
    let request = MetricRequest::builtins(["cpu"], GraphStyle::Bar).unwrap();

    engine.tick(&request);

    // No sample appended, and a window of nothing but gaps stays silent.
    let window = store.snapshot("cpu").expect("cpu window exists");
    assert_eq!(window.len(), WINDOW_CAPACITY - 1);
    assert!(window.iter().all(Option::is_none));
    assert!(sink.lines().is_empty());

    engine.tick(&request);

    // A subsequent non-zero reading appends and reports normally.
    let window = store.snapshot("cpu").unwrap();
    assert_eq!(window.len(), WINDOW_CAPACITY);
    assert_eq!(window.last(), Some(&Some(37)));
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("CPU   : 37%"), "line: {}", lines[0]);
}

#[test]
fn empty_request_logs_nothing_and_creates_no_windows() {
    let sink = RecordingSink::new();
    let (engine, store) = engine_with(FakeProbe::flat(None, None, None), sink.clone());
    let request = MetricRequest::builtins(Vec::<&str>::new(), GraphStyle::Bar).unwrap();

    engine.tick(&request);

    assert!(sink.lines().is_empty());
    assert!(store.tracked_names().is_empty());
}

#[test]
fn failing_custom_callback_records_absent_without_aborting_the_tick() {
    let sink = RecordingSink::new();
    let (engine, store) = engine_with(FakeProbe::flat(None, Some(55.0), None), sink.clone());

    let failing: ProbeFn = Arc::new(|| Err(anyhow::anyhow!("gauge backend unreachable")));
    let request = MetricRequest::new(
        ["memory"],
        GraphStyle::Bar,
        vec![("queue_depth".to_string(), failing)],
    )
    .unwrap();

    engine.tick(&request);

    // The custom window exists, holds only absent samples, and stays silent.
    let queue = store.snapshot("queue_depth").expect("custom window exists");
    assert_eq!(queue.len(), WINDOW_CAPACITY);
    assert!(queue.iter().all(Option::is_none));

    // Memory still sampled and reported.
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Memory: 55%"), "line: {}", lines[0]);
}

#[test]
fn custom_metrics_are_sampled_before_builtins() {
    let sink = RecordingSink::new();
    let (engine, store) = engine_with(FakeProbe::flat(None, Some(42.0), None), sink);

    // The callback inspects the memory window at sampling time. Windows are
    // ensured (29 absent samples) before any sampling, so seeing 29 entries
    // proves memory had not been sampled yet when the custom ran.
    let observed = Arc::new(Mutex::new(None));
    let observer = observed.clone();
    let observing_store = store.clone();
    let callback: ProbeFn = Arc::new(move || {
        let len = observing_store.snapshot("memory").map(|w| w.len());
        *observer.lock().unwrap() = len;
        Ok(Some(1.0))
    });

    let request = MetricRequest::new(
        ["memory"],
        GraphStyle::Bar,
        vec![("order_probe".to_string(), callback)],
    )
    .unwrap();
    engine.tick(&request);

    assert_eq!(*observed.lock().unwrap(), Some(WINDOW_CAPACITY - 1));
    assert_eq!(
        store.snapshot("memory").unwrap().len(),
        WINDOW_CAPACITY,
        "memory sampled after the custom callback"
    );
}

#[test]
fn unavailable_builtin_reading_appends_an_absent_sample() {
    let sink = RecordingSink::new();
    let (engine, store) = engine_with(FakeProbe::flat(None, None, None), sink.clone());
    let request = MetricRequest::builtins(["memory"], GraphStyle::Bar).unwrap();

    engine.tick(&request);

    let window = store.snapshot("memory").unwrap();
    assert_eq!(window.len(), WINDOW_CAPACITY);
    assert!(window.iter().all(Option::is_none));
    // All-absent window: nothing meaningful to report.
    assert!(sink.lines().is_empty());
}

#[test]
fn only_metrics_named_by_this_request_are_reported() {
    let sink = RecordingSink::new();
    let (engine, _store) = engine_with(FakeProbe::flat(None, Some(42.0), Some(66.0)), sink.clone());

    let drive_request = MetricRequest::builtins(["drive"], GraphStyle::Bar).unwrap();
    engine.tick(&drive_request);
    assert_eq!(sink.lines().len(), 1);

    // Drive history is still in the shared store, but a memory-only request
    // must not report it.
    let memory_request = MetricRequest::builtins(["memory"], GraphStyle::Bar).unwrap();
    engine.tick(&memory_request);

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Memory:"), "line: {}", lines[1]);
}

#[test]
fn unrequested_custom_registrations_are_still_reported() {
    let sink = RecordingSink::new();
    let (engine, _store) = engine_with(FakeProbe::flat(None, None, None), sink.clone());

    let gauge: ProbeFn = Arc::new(|| Ok(Some(7.0)));
    let request = MetricRequest::new(
        Vec::<&str>::new(),
        GraphStyle::Bar,
        vec![("backlog".to_string(), gauge)],
    )
    .unwrap();

    engine.tick(&request);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("backlog:  7%"), "line: {}", lines[0]);
}
