use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::metrics::snapshot::{CpuMetrics, GpuMetrics, NetDiskMetrics, ProcessRecord};
use crate::metrics::{cpu, gpu, netdisk, process};
use crate::soc::ChipProfile;

const SAMPLER_COMMAND: &str = "powermetrics";

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: &'static str,
        source: std::io::Error,
    },
    #[error("{command} has no stdout pipe")]
    MissingStdout { command: &'static str },
    #[error("failed to read from {command}: {source}")]
    Read {
        command: &'static str,
        source: std::io::Error,
    },
    #[error("{command} exited with {status}")]
    Exited {
        command: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("failed to reap {command}: {source}")]
    Reap {
        command: &'static str,
        source: std::io::Error,
    },
}

/// Receiving halves of the four snapshot channels. Each holds a single slot,
/// so the scan task cannot run ahead of the consumer.
pub struct MetricStreams {
    pub cpu: mpsc::Receiver<CpuMetrics>,
    pub gpu: mpsc::Receiver<GpuMetrics>,
    pub netdisk: mpsc::Receiver<NetDiskMetrics>,
    pub processes: mpsc::Receiver<Vec<ProcessRecord>>,
}

struct Publishers {
    cpu: mpsc::Sender<CpuMetrics>,
    gpu: mpsc::Sender<GpuMetrics>,
    netdisk: mpsc::Sender<NetDiskMetrics>,
    processes: mpsc::Sender<Vec<ProcessRecord>>,
}

fn channels() -> (Publishers, MetricStreams) {
    let (cpu_tx, cpu_rx) = mpsc::channel(1);
    let (gpu_tx, gpu_rx) = mpsc::channel(1);
    let (netdisk_tx, netdisk_rx) = mpsc::channel(1);
    let (process_tx, process_rx) = mpsc::channel(1);
    (
        Publishers {
            cpu: cpu_tx,
            gpu: gpu_tx,
            netdisk: netdisk_tx,
            processes: process_tx,
        },
        MetricStreams {
            cpu: cpu_rx,
            gpu: gpu_rx,
            netdisk: netdisk_rx,
            processes: process_rx,
        },
    )
}

/// Spawns the sampling subprocess and the scan task feeding the extractors.
/// The task ends cleanly on cancellation, on a departed consumer, or on a
/// clean EOF; a subprocess that cannot be spawned, read, or that exits with
/// a failure status resolves the handle to an error.
pub fn spawn(
    interval_ms: u64,
    profile: ChipProfile,
    cancel: CancellationToken,
) -> (MetricStreams, JoinHandle<Result<(), SamplerError>>) {
    let (publishers, streams) = channels();
    let handle = tokio::spawn(run(interval_ms, profile, cancel, publishers));
    (streams, handle)
}

async fn run(
    interval_ms: u64,
    profile: ChipProfile,
    cancel: CancellationToken,
    publishers: Publishers,
) -> Result<(), SamplerError> {
    let mut child = Command::new(SAMPLER_COMMAND)
        .args([
            "--samplers",
            "cpu_power,gpu_power,thermal,network,disk",
            "--show-process-gpu",
            "--show-process-energy",
            "--show-initial-usage",
            "--show-process-netstats",
            "-i",
            &interval_ms.to_string(),
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SamplerError::Spawn {
            command: SAMPLER_COMMAND,
            source,
        })?;

    let stdout = child.stdout.take().ok_or(SamplerError::MissingStdout {
        command: SAMPLER_COMMAND,
    })?;

    info!(interval_ms, ?profile, "sampling subprocess started");

    match scan(BufReader::new(stdout), profile, cancel, publishers).await {
        Ok(ScanEnd::Eof) => {
            // The stream only ends when the subprocess is gone; a failure
            // status there is fatal, a clean one is a clean shutdown.
            let status = child.wait().await.map_err(|source| SamplerError::Reap {
                command: SAMPLER_COMMAND,
                source,
            })?;
            if status.success() {
                debug!("sampling stream ended");
                Ok(())
            } else {
                Err(SamplerError::Exited {
                    command: SAMPLER_COMMAND,
                    status,
                })
            }
        }
        Ok(ScanEnd::Stopped) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            debug!("sampling stopped");
            Ok(())
        }
        Err(err) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            Err(err)
        }
    }
}

#[derive(Debug)]
enum ScanEnd {
    /// The line source ran dry without anyone asking it to stop.
    Eof,
    /// Cancellation was observed or the consumer dropped its receivers.
    Stopped,
}

/// The single scan loop. Every line is fed through the four extractors in
/// fixed order and the resulting snapshots published in that same order.
/// Each publish blocks until the consumer accepts it and is raced against
/// cancellation, so a consumer that left mid-handoff cannot wedge the task.
async fn scan<R>(
    reader: R,
    profile: ChipProfile,
    cancel: CancellationToken,
    publishers: Publishers,
) -> Result<ScanEnd, SamplerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut cpu_metrics = CpuMetrics::default();
    let mut gpu_metrics = GpuMetrics::default();
    let mut netdisk_metrics = NetDiskMetrics::default();
    let mut processes: Vec<ProcessRecord> = Vec::new();

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break Ok(ScanEnd::Stopped),
            next = lines.next_line() => next,
        };
        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(ScanEnd::Eof),
            Err(source) => {
                break Err(SamplerError::Read {
                    command: SAMPLER_COMMAND,
                    source,
                });
            }
        };

        cpu_metrics = cpu::ingest(&line, &cpu_metrics, profile);
        gpu_metrics = gpu::ingest(&line, &gpu_metrics);
        netdisk_metrics = netdisk::ingest(&line, &netdisk_metrics);
        processes = process::ingest(&line, &processes);

        let delivered = publish(&cancel, &publishers.cpu, cpu_metrics.clone()).await
            && publish(&cancel, &publishers.gpu, gpu_metrics).await
            && publish(&cancel, &publishers.netdisk, netdisk_metrics).await
            && publish(&cancel, &publishers.processes, processes.clone()).await;
        if !delivered {
            break Ok(ScanEnd::Stopped);
        }
    }
}

async fn publish<T>(cancel: &CancellationToken, tx: &mpsc::Sender<T>, value: T) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = tx.send(value) => sent.is_ok(),
    }
}
