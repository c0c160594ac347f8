use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Gauge;

use crate::format::gigabytes;
use crate::metrics::snapshot::{CpuMetrics, GpuMetrics, MemoryMetrics};
use crate::ui::theme::Theme;

fn usage_gauge(title: String, percent: i64, theme: &Theme) -> Gauge<'static> {
    let clamped = percent.clamp(0, 100);
    Gauge::default()
        .block(theme.block(title))
        .gauge_style(theme.gauge_style())
        .ratio(clamped as f64 / 100.0)
        .label(format!("{clamped}%"))
}

pub fn render_ecpu(frame: &mut Frame, area: Rect, cpu: &CpuMetrics, theme: &Theme) {
    let title = format!(
        "E-CPU Usage: {}% @ {} MHz",
        cpu.e_cluster_active, cpu.e_cluster_freq_mhz
    );
    frame.render_widget(usage_gauge(title, cpu.e_cluster_active, theme), area);
}

pub fn render_pcpu(frame: &mut Frame, area: Rect, cpu: &CpuMetrics, theme: &Theme) {
    let title = format!(
        "P-CPU Usage: {}% @ {} MHz",
        cpu.p_cluster_active, cpu.p_cluster_freq_mhz
    );
    frame.render_widget(usage_gauge(title, cpu.p_cluster_active, theme), area);
}

pub fn render_gpu(frame: &mut Frame, area: Rect, gpu: &GpuMetrics, theme: &Theme) {
    let percent = gpu.active as i64;
    let title = format!("GPU Usage: {}% @ {} MHz", percent, gpu.freq_mhz);
    frame.render_widget(usage_gauge(title, percent, theme), area);
}

/// Utilization is derived from draw against an 8 W full scale.
pub fn render_ane(frame: &mut Frame, area: Rect, cpu: &CpuMetrics, theme: &Theme) {
    let percent = (cpu.ane_w * 100.0 / 8.0) as i64;
    let title = format!("ANE Usage: {}% @ {:.1} W", percent, cpu.ane_w);
    frame.render_widget(usage_gauge(title, percent, theme), area);
}

pub fn render_memory(frame: &mut Frame, area: Rect, memory: &MemoryMetrics, theme: &Theme) {
    let ratio = if memory.total > 0 {
        (memory.used as f64 / memory.total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let title = format!(
        "Memory Usage: {:.2} GB / {:.2} GB (Swap: {:.2}/{:.2} GB)",
        gigabytes(memory.used),
        gigabytes(memory.total),
        gigabytes(memory.swap_used),
        gigabytes(memory.swap_total)
    );
    let gauge = Gauge::default()
        .block(theme.block(title))
        .gauge_style(theme.gauge_style())
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, area);
}
