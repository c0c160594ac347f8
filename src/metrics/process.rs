use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::snapshot::ProcessRecord;

static PROCESS_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    // The trailing float-plus-whitespace rejects rows that only look like
    // table entries.
    Regex::new(r"(?m)^\s*(\S.*?)\s+(\d+)\s+(\d+\.\d+)\s+\d+\.\d+\s+").unwrap()
});

/// Rows never surfaced: the monitor itself, its harness, and the sampler
/// feeding it.
const EXCLUDED_NAMES: [&str; 3] = ["silitop", "main", "powermetrics"];

/// Folds one sampling unit's table rows into the carried process list.
/// Within a unit the first occurrence of a pid wins; a pid already carried
/// from earlier units is refreshed in place, so the published list stays
/// unique by pid. Sorted by CPU time descending, ties in encounter order.
pub fn ingest(unit: &str, prev: &[ProcessRecord]) -> Vec<ProcessRecord> {
    let mut records = prev.to_vec();
    let mut seen_in_unit = HashSet::new();

    for line in unit.lines() {
        let Some(caps) = PROCESS_ROW_RE.captures(line) else {
            continue;
        };
        let name = &caps[1];
        if EXCLUDED_NAMES.contains(&name) {
            continue;
        }
        let (Ok(pid), Ok(cpu_ms_per_s)) = (caps[2].parse::<i64>(), caps[3].parse::<f64>())
        else {
            continue;
        };
        if !seen_in_unit.insert(pid) {
            continue;
        }
        match records.iter_mut().find(|r| r.pid == pid) {
            Some(existing) => {
                existing.name = name.to_string();
                existing.cpu_ms_per_s = cpu_ms_per_s;
            }
            None => records.push(ProcessRecord {
                pid,
                name: name.to_string(),
                cpu_ms_per_s,
            }),
        }
    }

    records.sort_by(|a, b| b.cpu_ms_per_s.total_cmp(&a.cpu_ms_per_s));
    records
}
