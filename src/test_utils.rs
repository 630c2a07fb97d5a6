//! Scripted probe and recording sink for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::probe::SystemProbe;
use crate::sink::MetricSink;

/// A probe returning scripted readings instead of touching the OS.
///
/// CPU readings are consumed front-to-back; once the script is exhausted the
/// last reading repeats. Memory and drive readings are constant. Every CPU
/// query bumps a shared counter, which tests use to observe whether the
/// scheduler thread is still ticking.
pub struct FakeProbe {
    cpu_script: VecDeque<Option<f64>>,
    last_cpu: Option<f64>,
    memory: Option<f64>,
    drive: Option<f64>,
    cpu_calls: Arc<AtomicUsize>,
}

impl FakeProbe {
    /// A probe that always returns the same readings.
    pub fn flat(cpu: Option<f64>, memory: Option<f64>, drive: Option<f64>) -> Self {
        Self {
            cpu_script: VecDeque::new(),
            last_cpu: cpu,
            memory,
            drive,
            cpu_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A probe whose CPU readings follow `script` (then repeat the last
    /// entry); memory and drive are unavailable.
    pub fn cpu_script<I>(script: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            cpu_script: script.into_iter().map(Some).collect(),
            last_cpu: None,
            memory: None,
            drive: None,
            cpu_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of CPU queries made so far.
    pub fn cpu_call_counter(&self) -> Arc<AtomicUsize> {
        self.cpu_calls.clone()
    }
}

impl SystemProbe for FakeProbe {
    fn cpu_percent(&mut self) -> Option<f64> {
        self.cpu_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reading) = self.cpu_script.pop_front() {
            self.last_cpu = reading;
        }
        self.last_cpu
    }

    fn memory_percent(&mut self) -> Option<f64> {
        self.memory
    }

    fn drive_free_percent(&mut self) -> Option<f64> {
        self.drive
    }
}

/// A probe that panics on first use, for scheduler-failure tests.
pub struct PanickingProbe;

impl SystemProbe for PanickingProbe {
    fn cpu_percent(&mut self) -> Option<f64> {
        panic!("probe failure injected by test");
    }

    fn memory_percent(&mut self) -> Option<f64> {
        panic!("probe failure injected by test");
    }

    fn drive_free_percent(&mut self) -> Option<f64> {
        panic!("probe failure injected by test");
    }
}

/// A sink that records every emitted line, with a switchable enabled flag.
#[derive(Clone)]
pub struct RecordingSink {
    enabled: Arc<AtomicBool>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A sink whose `enabled` predicate reports false.
    pub fn disabled() -> Self {
        let sink = Self::new();
        sink.enabled.store(false, Ordering::SeqCst);
        sink
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Everything emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSink for RecordingSink {
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
