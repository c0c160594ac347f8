use std::sync::LazyLock;

use regex::Regex;

use crate::soc::ChipProfile;

use super::snapshot::{ClusterReading, CpuMetrics};

static RESIDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)-Cluster\s+HW active residency:\s+(\d+\.\d+)%").unwrap()
});
static FREQUENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)-Cluster\s+HW active frequency:\s+(\d+)\s+MHz").unwrap()
});
static CORE_RESIDENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CPU (\d+) active residency:\s+(\d+\.\d+)%").unwrap());
static CORE_FREQUENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CPU\s+(\d+)\s+frequency:\s+(\d+)\s+MHz$").unwrap());

/// Scans one sampling unit and folds it into the previous snapshot. The
/// returned snapshot is the published value; `prev` is never mutated.
pub fn ingest(unit: &str, prev: &CpuMetrics, profile: ChipProfile) -> CpuMetrics {
    let mut metrics = prev.clone();
    match profile {
        ChipProfile::PerCoreWorkaround { max_core_index } => {
            ingest_per_core(unit, &mut metrics, max_core_index);
        }
        ChipProfile::StandardDual | ChipProfile::QuadUltra => {
            ingest_clustered(unit, &mut metrics);
        }
    }
    metrics
}

fn ingest_clustered(unit: &str, metrics: &mut CpuMetrics) {
    let mut e_cores = Vec::new();
    let mut p_cores = Vec::new();
    let mut e_active_total: i64 = 0;
    let mut e_active_count: i64 = 0;
    let mut p_active_total: i64 = 0;
    let mut p_active_count: i64 = 0;
    let mut e_freq_total: i64 = 0;
    let mut p_freq_total: i64 = 0;

    for line in unit.lines() {
        if let Some(caps) = RESIDENCY_RE.captures(line)
            && let Ok(percent) = caps[2].parse::<f64>()
        {
            let cluster = &caps[1];
            let active = percent as i64;
            if let Some(reading) = sub_cluster(metrics, cluster) {
                reading.active = active;
            }
            if cluster.starts_with('E') {
                e_active_total += active;
                e_active_count += 1;
            } else if cluster.starts_with('P') {
                p_active_total += active;
                p_active_count += 1;
                metrics.p_cluster_active = p_active_total / p_active_count;
            }
        }

        if let Some(caps) = FREQUENCY_RE.captures(line)
            && let Ok(freq) = caps[2].parse::<i64>()
        {
            let cluster = &caps[1];
            if let Some(reading) = sub_cluster(metrics, cluster) {
                reading.freq_mhz = freq;
            }
            if cluster.starts_with('E') {
                e_freq_total += freq;
                metrics.e_cluster_freq_mhz = e_freq_total;
            } else if cluster.starts_with('P') {
                p_freq_total += freq;
                metrics.p_cluster_freq_mhz = p_freq_total;
            }
        }

        classify_shared_line(line, metrics, &mut e_cores, &mut p_cores);
    }

    metrics.e_cores = e_cores;
    metrics.p_cores = p_cores;
    apply_cluster_rules(metrics);
    if e_active_count > 0 {
        metrics.e_cluster_active = e_active_total / e_active_count;
    }
}

/// Combines the named sub-cluster readings into the two summary fields.
/// Rule selection keys purely off nonzero accumulated values; there is no
/// chip-identity switch on this path.
fn apply_cluster_rules(metrics: &mut CpuMetrics) {
    if metrics.e1.active != 0 {
        metrics.e_cluster_active = (metrics.e0.active + metrics.e1.active) / 2;
        metrics.e_cluster_freq_mhz = metrics.e0.freq_mhz.max(metrics.e1.freq_mhz);
    }
    if metrics.p3.active != 0 {
        metrics.p_cluster_active =
            (metrics.p0.active + metrics.p1.active + metrics.p2.active + metrics.p3.active) / 4;
        metrics.p_cluster_freq_mhz = metrics
            .p0
            .freq_mhz
            .max(metrics.p1.freq_mhz)
            .max(metrics.p2.freq_mhz)
            .max(metrics.p3.freq_mhz);
    } else if metrics.p1.active != 0 {
        metrics.p_cluster_active = (metrics.p0.active + metrics.p1.active) / 2;
        metrics.p_cluster_freq_mhz = metrics.p0.freq_mhz.max(metrics.p1.freq_mhz);
    } else {
        // Single performance cluster: usage accumulates by addition, not
        // averaging. See single_p_cluster_accumulates_by_addition.
        metrics.p_cluster_active += metrics.p0.active;
    }
}

fn ingest_per_core(unit: &str, metrics: &mut CpuMetrics, max_core_index: usize) {
    let mut e_cores = Vec::new();
    let mut p_cores = Vec::new();
    let mut e_residency = BucketMean::default();
    let mut p_residency = BucketMean::default();
    let mut e_frequency = BucketMean::default();
    let mut p_frequency = BucketMean::default();

    for line in unit.lines() {
        if let Some(caps) = CORE_RESIDENCY_RE.captures(line)
            && let (Ok(core), Ok(percent)) = (caps[1].parse::<usize>(), caps[2].parse::<f64>())
            && core <= max_core_index
        {
            if core <= 3 {
                e_residency.add(percent);
            } else {
                p_residency.add(percent);
            }
        }

        if let Some(caps) = CORE_FREQUENCY_RE.captures(line)
            && let (Ok(core), Ok(freq)) = (caps[1].parse::<usize>(), caps[2].parse::<f64>())
            && core <= max_core_index
        {
            if core <= 3 {
                e_frequency.add(freq);
            } else {
                p_frequency.add(freq);
            }
        }

        classify_shared_line(line, metrics, &mut e_cores, &mut p_cores);
    }

    // A mean is only trusted when strictly inside its domain; all-zero or
    // saturated windows are sampling boundary artifacts.
    if let Some(mean) = e_residency.mean()
        && mean > 0.0
        && mean < 100.0
    {
        metrics.e_cluster_active = mean as i64;
    }
    if let Some(mean) = p_residency.mean()
        && mean > 0.0
        && mean < 100.0
    {
        metrics.p_cluster_active = mean as i64;
    }
    if let Some(mean) = e_frequency.mean()
        && mean > 0.0
    {
        metrics.e_cluster_freq_mhz = mean as i64;
    }
    if let Some(mean) = p_frequency.mean()
        && mean > 0.0
    {
        metrics.p_cluster_freq_mhz = mean as i64;
    }

    metrics.e_cores = e_cores;
    metrics.p_cores = p_cores;
}

/// Power and core-index lines are reported the same way on every chip.
fn classify_shared_line(
    line: &str,
    metrics: &mut CpuMetrics,
    e_cores: &mut Vec<usize>,
    p_cores: &mut Vec<usize>,
) {
    if line.contains("CPU ") && line.contains("frequency") {
        if let Some(core) = core_index(line) {
            if line.contains("E-Cluster") {
                e_cores.push(core);
            } else if line.contains("P-Cluster") {
                p_cores.push(core);
            }
        }
    } else if line.contains("ANE Power") {
        if let Some(watts) = power_watts(line, 2) {
            metrics.ane_w = watts;
        }
    } else if line.contains("CPU Power") {
        if let Some(watts) = power_watts(line, 2) {
            metrics.cpu_w = watts;
        }
    } else if line.contains("GPU Power") {
        if let Some(watts) = power_watts(line, 2) {
            metrics.gpu_w = watts;
        }
    } else if line.contains("Combined Power (CPU + GPU + ANE)") {
        if let Some(watts) = power_watts(line, 7) {
            metrics.package_w = watts;
        }
    }
}

/// Reads a whitespace-separated field as milliwatts and converts to watts.
fn power_watts(line: &str, field: usize) -> Option<f64> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let raw = fields.get(field)?;
    let mw: f64 = raw.trim_end_matches("mW").parse().ok()?;
    Some(mw / 1000.0)
}

fn core_index(line: &str) -> Option<usize> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return None;
    }
    fields[1].trim_start_matches("CPU").parse().ok()
}

fn sub_cluster<'a>(metrics: &'a mut CpuMetrics, name: &str) -> Option<&'a mut ClusterReading> {
    match name {
        "E0" => Some(&mut metrics.e0),
        "E1" => Some(&mut metrics.e1),
        "P0" => Some(&mut metrics.p0),
        "P1" => Some(&mut metrics.p1),
        "P2" => Some(&mut metrics.p2),
        "P3" => Some(&mut metrics.p3),
        _ => None,
    }
}

#[derive(Default)]
struct BucketMean {
    sum: f64,
    count: u32,
}

impl BucketMean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}
