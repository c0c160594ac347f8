use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Sparkline};

use crate::metrics::snapshot::CpuMetrics;
use crate::ui::theme::Theme;

pub fn render_breakdown(frame: &mut Frame, area: Rect, cpu: &CpuMetrics, theme: &Theme) {
    let title = format!("{:.1} W CPU - {:.1} W GPU", cpu.cpu_w, cpu.gpu_w);
    let text = format!(
        "CPU Power: {:.1} W\nGPU Power: {:.1} W\nANE Power: {:.1} W\nTotal Power: {:.1} W",
        cpu.cpu_w, cpu.gpu_w, cpu.ane_w, cpu.package_w
    );
    let paragraph = Paragraph::new(text)
        .block(theme.block(title))
        .style(theme.text_style());
    frame.render_widget(paragraph, area);
}

/// Rolling window averages, newest on the left.
pub fn render_trend(
    frame: &mut Frame,
    area: Rect,
    trend: &VecDeque<u64>,
    package_w: f64,
    theme: &Theme,
) {
    let data: Vec<u64> = trend.iter().copied().collect();
    let sparkline = Sparkline::default()
        .block(theme.block(format!("{package_w:.1} W Total Power")))
        .data(&data)
        .style(theme.text_style());
    frame.render_widget(sparkline, area);
}
