use std::collections::HashMap;
use std::process::Command;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SocError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: &'static str,
        source: std::io::Error,
    },
    #[error("{command} exited with {status}")]
    Status {
        command: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("sysctl output is missing {key}")]
    MissingKey { key: &'static str },
    #[error("unparsable value for {key}: {value:?}")]
    BadValue { key: &'static str, value: String },
}

/// Hardware identity read once at startup and passed by value to whoever
/// needs it. Not re-queried while running.
#[derive(Debug, Clone, Default)]
pub struct SocInfo {
    pub name: String,
    pub core_count: String,
    pub e_core_count: u32,
    pub p_core_count: u32,
    pub gpu_core_count: String,
}

/// Aggregation strategy for the CPU extractor, selected once from the
/// identified chip model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipProfile {
    /// One efficiency and one performance cluster reported directly.
    StandardDual,
    /// Ultra variants report E0/E1 and P0..P3 sub-clusters.
    QuadUltra,
    /// Models whose cluster aggregates are misreported by the sampler;
    /// usage is rebuilt from per-core readings, indices 0..=max_core_index.
    PerCoreWorkaround { max_core_index: usize },
}

impl ChipProfile {
    pub fn from_soc(info: &SocInfo) -> Self {
        match info.name.as_str() {
            // 16 cores (4E + 12P)
            "Apple M3 Max" => ChipProfile::PerCoreWorkaround { max_core_index: 15 },
            // 12 cores (4E + 8P)
            "Apple M2 Max" => ChipProfile::PerCoreWorkaround { max_core_index: 11 },
            "Apple M1 Ultra" | "Apple M2 Ultra" => ChipProfile::QuadUltra,
            _ => ChipProfile::StandardDual,
        }
    }
}

/// Queries sysctl and system_profiler for the chip identity. Both commands
/// are required capabilities; any failure here is fatal for the caller.
pub fn detect() -> Result<SocInfo, SocError> {
    let sysctl = run_command(
        "sysctl",
        &[
            "machdep.cpu",
            "hw.perflevel0.logicalcpu",
            "hw.perflevel1.logicalcpu",
        ],
    )?;
    let props = parse_sysctl_output(&sysctl);

    let name = props
        .get("machdep.cpu.brand_string")
        .cloned()
        .unwrap_or_default();
    let core_count = props
        .get("machdep.cpu.core_count")
        .cloned()
        .unwrap_or_default();
    let e_core_count = parse_core_count(&props, "hw.perflevel1.logicalcpu")?;
    let p_core_count = parse_core_count(&props, "hw.perflevel0.logicalcpu")?;

    let profiler = run_command(
        "system_profiler",
        &["-detailLevel", "basic", "SPDisplaysDataType"],
    )?;
    let gpu_core_count = parse_gpu_cores(&profiler);

    let soc = SocInfo {
        name,
        core_count,
        e_core_count,
        p_core_count,
        gpu_core_count,
    };
    info!(
        model = %soc.name,
        e_cores = soc.e_core_count,
        p_cores = soc.p_core_count,
        gpu_cores = %soc.gpu_core_count,
        "identified chip"
    );
    Ok(soc)
}

fn run_command(command: &'static str, args: &[&str]) -> Result<String, SocError> {
    let output = Command::new(command)
        .args(args)
        .output()
        .map_err(|source| SocError::Spawn { command, source })?;
    if !output.status.success() {
        return Err(SocError::Status {
            command,
            status: output.status,
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse_sysctl_output(output: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            props.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    props
}

fn parse_core_count(
    props: &HashMap<String, String>,
    key: &'static str,
) -> Result<u32, SocError> {
    let value = props.get(key).ok_or(SocError::MissingKey { key })?;
    value.parse().map_err(|_| SocError::BadValue {
        key,
        value: value.clone(),
    })
}

fn parse_gpu_cores(output: &str) -> String {
    for line in output.lines() {
        if line.contains("Total Number of Cores") {
            if let Some((_, value)) = line.split_once(": ") {
                return value.trim().to_string();
            }
            break;
        }
    }
    "?".to_string()
}
