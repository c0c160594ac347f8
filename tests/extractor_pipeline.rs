//! Feeds captured-style sampler output through the extractors one line at a
//! time, the same way the subprocess driver does, and checks the snapshots
//! that would be published.

use proptest::prelude::*;
use silitop::metrics::snapshot::{
    ClusterReading, CpuMetrics, GpuMetrics, NetDiskMetrics, ProcessRecord,
};
use silitop::metrics::{cpu, gpu, netdisk, process};
use silitop::soc::ChipProfile;

#[derive(Default)]
struct Snapshots {
    cpu: CpuMetrics,
    gpu: GpuMetrics,
    netdisk: NetDiskMetrics,
    processes: Vec<ProcessRecord>,
}

fn fold_block(mut snaps: Snapshots, block: &str, profile: ChipProfile) -> Snapshots {
    for line in block.lines() {
        snaps.cpu = cpu::ingest(line, &snaps.cpu, profile);
        snaps.gpu = gpu::ingest(line, &snaps.gpu);
        snaps.netdisk = netdisk::ingest(line, &snaps.netdisk);
        snaps.processes = process::ingest(line, &snaps.processes);
    }
    snaps
}

const FIRST_BLOCK: &str = "\
Machine model: MacBookPro18,3
OS version: 23E224

*** Sampled system activity (Thu Aug 21 10:15:01 2025 -0700) (1003.21ms elapsed) ***

*** Running tasks ***

Name                               ID     CPU ms/s  samp ms/s  User%  Deadlines (<2 ms, 2-5 ms)  Wakeups (Intr, Pkg idle)  GPU ms/s
WindowServer                       372    523.97    523.97     78.74  183  12                     2349  1004              14.62
kernel_task                        0      210.40    210.40     0.00   0  0                        519  288               0.00
powermetrics                       9876   12.00     12.00      1.00   0  0                        4  2                   0.00
coreaudiod                         565    88.10     88.10      63.10  9  1                        402  77                0.00
ALL_TASKS                          -2     1010.51   1010.51    52.33  192  13                     3274  1371             14.62

**** Processor usage ****

E-Cluster HW active frequency: 1187 MHz
E-Cluster HW active residency:  45.12% (600 MHz: .25% 972 MHz: 11.12% 1332 MHz: 33.75%)
E-Cluster idle residency:  54.88%
CPU 0 frequency: 1026 MHz (E-Cluster)
CPU 0 active residency:  18.32%
CPU 1 frequency: 1032 MHz (E-Cluster)
CPU 1 active residency:  16.44%
P0-Cluster HW active frequency: 2807 MHz
P0-Cluster HW active residency:  22.51%
P1-Cluster HW active frequency: 3204 MHz
P1-Cluster HW active residency:  46.09%
CPU 4 frequency: 3204 MHz (P-Cluster)
CPU 5 frequency: 3198 MHz (P-Cluster)

ANE Power: 53 mW
CPU Power: 2501 mW
GPU Power: 78 mW
Combined Power (CPU + GPU + ANE): 2632 mW

**** GPU usage ****

GPU HW active frequency: 444 MHz
GPU HW active residency:  13.63% (389 MHz: .21% 444 MHz: 13% 612 MHz: 0%)
GPU idle residency:  86.37%

**** Network activity ****

out: 12.30 packets/s, 4567.00 bytes/s
in: 8.10 packets/s, 1234.50 bytes/s

**** Disk activity ****

read: 5.00 ops/s 100.00 KBytes/s write: 2.50 ops/s 48.00 KBytes/s
";

const SECOND_BLOCK: &str = "\
*** Sampled system activity (Thu Aug 21 10:15:02 2025 -0700) (1001.47ms elapsed) ***

Name                               ID     CPU ms/s  samp ms/s  User%  Deadlines (<2 ms, 2-5 ms)  Wakeups (Intr, Pkg idle)  GPU ms/s
WindowServer                       372    101.22    101.22     70.01  44  3                      812  350               3.10
Safari                             812    640.00    640.00     88.20  12  2                      97  40                 1.25

E-Cluster HW active residency:  12.00%
CPU Power: 801 mW
";

#[test]
fn full_sample_block_populates_all_four_snapshots() {
    let snaps = fold_block(Snapshots::default(), FIRST_BLOCK, ChipProfile::StandardDual);

    assert_eq!(snaps.cpu.e_cluster_active, 45);
    assert_eq!(snaps.cpu.e_cluster_freq_mhz, 1187);
    assert_eq!(snaps.cpu.p_cluster_active, 34);
    assert_eq!(snaps.cpu.p_cluster_freq_mhz, 3204);
    assert_eq!(snaps.cpu.p0, ClusterReading { active: 22, freq_mhz: 2807 });
    assert_eq!(snaps.cpu.p1, ClusterReading { active: 46, freq_mhz: 3204 });
    assert!((snaps.cpu.ane_w - 0.053).abs() < 1e-9);
    assert!((snaps.cpu.cpu_w - 2.501).abs() < 1e-9);
    assert!((snaps.cpu.gpu_w - 0.078).abs() < 1e-9);
    assert!((snaps.cpu.package_w - 2.632).abs() < 1e-9);

    assert!((snaps.gpu.active - 13.63).abs() < 1e-9);
    assert_eq!(snaps.gpu.freq_mhz, 444);

    assert!((snaps.netdisk.out_packets_per_s - 12.3).abs() < 1e-9);
    assert!((snaps.netdisk.out_bytes_per_s - 4567.0).abs() < 1e-9);
    assert!((snaps.netdisk.in_packets_per_s - 8.1).abs() < 1e-9);
    assert!((snaps.netdisk.in_bytes_per_s - 1234.5).abs() < 1e-9);
    assert!((snaps.netdisk.read_ops_per_s - 5.0).abs() < 1e-9);
    assert!((snaps.netdisk.read_kbytes_per_s - 100.0).abs() < 1e-9);
    assert!((snaps.netdisk.write_ops_per_s - 2.5).abs() < 1e-9);
    assert!((snaps.netdisk.write_kbytes_per_s - 48.0).abs() < 1e-9);

    let names: Vec<&str> = snaps.processes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["WindowServer", "kernel_task", "coreaudiod"]);
    assert_eq!(snaps.processes[0].pid, 372);
    assert!((snaps.processes[0].cpu_ms_per_s - 523.97).abs() < 1e-9);
}

#[test]
fn following_block_refreshes_only_what_it_reports() {
    let first = fold_block(Snapshots::default(), FIRST_BLOCK, ChipProfile::StandardDual);
    let second = fold_block(first, SECOND_BLOCK, ChipProfile::StandardDual);

    // Reported by the second block.
    assert_eq!(second.cpu.e_cluster_active, 12);
    assert!((second.cpu.cpu_w - 0.801).abs() < 1e-9);

    // Everything else carries the first block's readings.
    assert_eq!(second.cpu.e_cluster_freq_mhz, 1187);
    assert_eq!(second.cpu.p_cluster_active, 34);
    assert_eq!(second.cpu.p_cluster_freq_mhz, 3204);
    assert!((second.cpu.package_w - 2.632).abs() < 1e-9);
    assert!((second.gpu.active - 13.63).abs() < 1e-9);
    assert_eq!(second.gpu.freq_mhz, 444);
    assert!((second.netdisk.in_bytes_per_s - 1234.5).abs() < 1e-9);

    // WindowServer refreshed in place, Safari added, the rest retained.
    let rows: Vec<(&str, f64)> = second
        .processes
        .iter()
        .map(|r| (r.name.as_str(), r.cpu_ms_per_s))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Safari", 640.0),
            ("kernel_task", 210.4),
            ("WindowServer", 101.22),
            ("coreaudiod", 88.1),
        ]
    );
}

fn per_core_block(residency: impl Fn(usize) -> f64, frequency: impl Fn(usize) -> i64) -> String {
    let mut lines = Vec::new();
    for core in 0..16 {
        lines.push(format!("CPU {core} active residency:  {:.2}%", residency(core)));
        lines.push(format!("CPU {core} frequency: {} MHz", frequency(core)));
    }
    lines.join("\n")
}

#[test]
fn per_core_profile_reads_core_lines_instead_of_cluster_lines() {
    let profile = ChipProfile::PerCoreWorkaround { max_core_index: 15 };
    let block = format!(
        "{}\nCPU Power: 1750 mW",
        per_core_block(
            |core| if core <= 3 { 40.0 } else { 10.0 },
            |core| if core <= 3 { 1002 } else { 3030 },
        ),
    );

    let snaps = fold_block(Snapshots::default(), &block, profile);
    assert_eq!(snaps.cpu.e_cluster_active, 40);
    assert_eq!(snaps.cpu.p_cluster_active, 10);
    assert_eq!(snaps.cpu.e_cluster_freq_mhz, 1002);
    assert_eq!(snaps.cpu.p_cluster_freq_mhz, 3030);
    assert!((snaps.cpu.cpu_w - 1.75).abs() < 1e-9);

    // Saturated and idle one-line windows are boundary artifacts and leave
    // the summaries alone.
    let boundary = "CPU 2 active residency:  100.00%\nCPU 5 active residency:  0.00%";
    let after = fold_block(snaps, boundary, profile);
    assert_eq!(after.cpu.e_cluster_active, 40);
    assert_eq!(after.cpu.p_cluster_active, 10);
}

proptest! {
    #[test]
    fn workaround_means_follow_reported_residencies(
        residencies in prop::collection::vec(0.5f64..99.5, 16),
    ) {
        let unit = residencies
            .iter()
            .enumerate()
            .map(|(core, pct)| format!("CPU {core} active residency:  {pct:.2}%"))
            .collect::<Vec<_>>()
            .join("\n");
        let m = cpu::ingest(
            &unit,
            &CpuMetrics::default(),
            ChipProfile::PerCoreWorkaround { max_core_index: 15 },
        );

        let parsed: Vec<f64> = residencies
            .iter()
            .map(|pct| format!("{pct:.2}").parse::<f64>().unwrap())
            .collect();
        let e_mean = parsed[..4].iter().sum::<f64>() / 4.0;
        let p_mean = parsed[4..].iter().sum::<f64>() / 12.0;

        prop_assert_eq!(m.e_cluster_active, e_mean as i64);
        prop_assert_eq!(m.p_cluster_active, p_mean as i64);
        prop_assert!((0..=100).contains(&m.e_cluster_active));
        prop_assert!((0..=100).contains(&m.p_cluster_active));
    }

    #[test]
    fn boundary_windows_keep_the_previous_summaries(
        prev_e in 0i64..=100,
        prev_p in 0i64..=100,
        saturated in prop::bool::ANY,
    ) {
        let prev = CpuMetrics {
            e_cluster_active: prev_e,
            p_cluster_active: prev_p,
            ..CpuMetrics::default()
        };
        let pct = if saturated { 100.0 } else { 0.0 };
        let unit = (0..16)
            .map(|core| format!("CPU {core} active residency:  {pct:.2}%"))
            .collect::<Vec<_>>()
            .join("\n");
        let m = cpu::ingest(
            &unit,
            &prev,
            ChipProfile::PerCoreWorkaround { max_core_index: 15 },
        );

        prop_assert_eq!(m.e_cluster_active, prev_e);
        prop_assert_eq!(m.p_cluster_active, prev_p);
    }
}
