use std::sync::LazyLock;

use regex::Regex;

use super::snapshot::GpuMetrics;

static GPU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"GPU\s*(HW)?\s*active\s*(residency|frequency):\s+(\d+\.\d+)%?").unwrap()
});
static FREQ_HISTOGRAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*MHz:\s*(\d+)%").unwrap());

/// Folds one sampling unit into the previous GPU snapshot.
pub fn ingest(unit: &str, prev: &GpuMetrics) -> GpuMetrics {
    let mut metrics = *prev;

    for line in unit.lines() {
        if !line.contains("GPU active") && !line.contains("GPU HW active") {
            continue;
        }

        if let Some(caps) = GPU_RE.captures(line) {
            if &caps[2] == "residency" {
                if let Ok(active) = caps[3].parse::<f64>() {
                    metrics.active = active;
                }
            } else if let Ok(freq) = caps[3].parse::<i64>() {
                metrics.freq_mhz = freq;
            }
        }

        // The residency line carries a frequency histogram; the first entry
        // with nonzero percent is the reported frequency.
        for caps in FREQ_HISTOGRAM_RE.captures_iter(line) {
            if let (Ok(freq), Ok(residency)) = (caps[1].parse::<i64>(), caps[2].parse::<f64>())
                && residency > 0.0
            {
                metrics.freq_mhz = freq;
                break;
            }
        }
    }

    metrics
}
