use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::snapshot::NetDiskMetrics;

static OUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"out:\s*([\d.]+)\s*packets/s,\s*([\d.]+)\s*bytes/s").unwrap()
});
static IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"in:\s*([\d.]+)\s*packets/s,\s*([\d.]+)\s*bytes/s").unwrap()
});
static READ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"read:\s*([\d.]+)\s*ops/s\s*([\d.]+)\s*KBytes/s").unwrap()
});
static WRITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"write:\s*([\d.]+)\s*ops/s\s*([\d.]+)\s*KBytes/s").unwrap()
});

/// Folds one sampling unit into the previous network/disk snapshot. Rates
/// absent from the unit keep their prior values.
pub fn ingest(unit: &str, prev: &NetDiskMetrics) -> NetDiskMetrics {
    let mut metrics = *prev;

    if let Some(caps) = OUT_RE.captures(unit) {
        set_rate(&caps, 1, &mut metrics.out_packets_per_s);
        set_rate(&caps, 2, &mut metrics.out_bytes_per_s);
    }
    if let Some(caps) = IN_RE.captures(unit) {
        set_rate(&caps, 1, &mut metrics.in_packets_per_s);
        set_rate(&caps, 2, &mut metrics.in_bytes_per_s);
    }
    if let Some(caps) = READ_RE.captures(unit) {
        set_rate(&caps, 1, &mut metrics.read_ops_per_s);
        set_rate(&caps, 2, &mut metrics.read_kbytes_per_s);
    }
    if let Some(caps) = WRITE_RE.captures(unit) {
        set_rate(&caps, 1, &mut metrics.write_ops_per_s);
        set_rate(&caps, 2, &mut metrics.write_kbytes_per_s);
    }

    metrics
}

fn set_rate(caps: &Captures<'_>, group: usize, field: &mut f64) {
    if let Some(value) = caps.get(group).and_then(|g| g.as_str().parse().ok()) {
        *field = value;
    }
}
