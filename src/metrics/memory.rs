use sysinfo::System;

use super::snapshot::MemoryMetrics;

/// Host memory reader. Unlike the rest of the metrics this does not come
/// from the sampled stream; the consumer polls it once per published CPU
/// update so the gauge moves at the same cadence as everything else.
pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        Self { sys }
    }

    pub fn poll(&mut self) -> MemoryMetrics {
        self.sys.refresh_memory();
        MemoryMetrics {
            total: self.sys.total_memory(),
            used: self.sys.used_memory(),
            available: self.sys.available_memory(),
            swap_total: self.sys.total_swap(),
            swap_used: self.sys.used_swap(),
        }
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}
