use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;

use crate::metrics::snapshot::NetDiskMetrics;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, netdisk: &NetDiskMetrics, theme: &Theme) {
    let text = format!(
        "Out: {:.1} packets/s, {:.1} bytes/s\n\
         In: {:.1} packets/s, {:.1} bytes/s\n\
         Read: {:.1} ops/s, {:.1} KBytes/s\n\
         Write: {:.1} ops/s, {:.1} KBytes/s",
        netdisk.out_packets_per_s,
        netdisk.out_bytes_per_s,
        netdisk.in_packets_per_s,
        netdisk.in_bytes_per_s,
        netdisk.read_ops_per_s,
        netdisk.read_kbytes_per_s,
        netdisk.write_ops_per_s,
        netdisk.write_kbytes_per_s
    );
    let paragraph = Paragraph::new(text)
        .block(theme.block("Network & Disk Info".to_string()))
        .style(theme.text_style());
    frame.render_widget(paragraph, area);
}
