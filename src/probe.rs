//! Builtin metric sources.
//!
//! The [`SystemProbe`] trait is the seam between the sampling engine and the
//! operating system; [`SysinfoProbe`] is the production implementation backed
//! by the `sysinfo` crate. Tests substitute a scripted probe.

use sysinfo::{Disks, System};

/// Zero-argument queries for the three builtin metrics. Each returns a
/// percentage, or `None` when the reading is unavailable.
pub trait SystemProbe: Send {
    /// Instantaneous CPU utilisation, measured non-blocking (no fixed
    /// measurement interval). The very first reading after process start is
    /// frequently an exact-zero artifact of this sampling mode.
    fn cpu_percent(&mut self) -> Option<f64>;

    /// Currently used memory as a percentage of total.
    fn memory_percent(&mut self) -> Option<f64>;

    /// Free space percentage averaged across all mounted drives. Individual
    /// drives that cannot be queried are excluded from the aggregate.
    fn drive_free_percent(&mut self) -> Option<f64>;
}

/// `sysinfo`-backed probe.
///
/// CPU utilisation comes from the delta between consecutive refreshes, which
/// is exactly the non-blocking read the engine expects: the first refresh has
/// no predecessor and reports zero.
pub struct SysinfoProbe {
    system: System,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for SysinfoProbe {
    fn cpu_percent(&mut self) -> Option<f64> {
        self.system.refresh_cpu();
        Some(self.system.global_cpu_info().cpu_usage() as f64)
    }

    fn memory_percent(&mut self) -> Option<f64> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return None;
        }
        Some(self.system.used_memory() as f64 / total as f64 * 100.0)
    }

    fn drive_free_percent(&mut self) -> Option<f64> {
        let disks = Disks::new_with_refreshed_list();
        let free_percents: Vec<f64> = disks
            .iter()
            .filter(|disk| disk.total_space() > 0)
            .map(|disk| disk.available_space() as f64 / disk.total_space() as f64 * 100.0)
            .collect();
        if free_percents.is_empty() {
            return None;
        }
        Some(free_percents.iter().sum::<f64>() / free_percents.len() as f64)
    }
}
