/// One named sub-cluster reading (E0, E1, P0..P3) as reported per sampling
/// unit. Chips with more than two clusters expose several of these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterReading {
    pub active: i64,
    pub freq_mhz: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuMetrics {
    pub e_cluster_active: i64,
    pub e_cluster_freq_mhz: i64,
    pub p_cluster_active: i64,
    pub p_cluster_freq_mhz: i64,
    pub e_cores: Vec<usize>,
    pub p_cores: Vec<usize>,
    pub ane_w: f64,
    pub cpu_w: f64,
    pub gpu_w: f64,
    pub package_w: f64,
    pub e0: ClusterReading,
    pub e1: ClusterReading,
    pub p0: ClusterReading,
    pub p1: ClusterReading,
    pub p2: ClusterReading,
    pub p3: ClusterReading,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpuMetrics {
    pub active: f64,
    pub freq_mhz: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetDiskMetrics {
    pub out_packets_per_s: f64,
    pub out_bytes_per_s: f64,
    pub in_packets_per_s: f64,
    pub in_bytes_per_s: f64,
    pub read_ops_per_s: f64,
    pub read_kbytes_per_s: f64,
    pub write_ops_per_s: f64,
    pub write_kbytes_per_s: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: i64,
    pub name: String,
    /// CPU time consumed in milliseconds per second of wall time.
    pub cpu_ms_per_s: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}
