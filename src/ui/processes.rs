use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;

use crate::format::truncate_unicode;
use crate::metrics::snapshot::ProcessRecord;
use crate::ui::theme::Theme;

/// Display cap; the extractor hands over the full deduplicated list.
const MAX_ROWS: usize = 15;

pub fn render(frame: &mut Frame, area: Rect, processes: &[ProcessRecord], theme: &Theme) {
    let width = area.width.saturating_sub(2) as usize;
    let lines: Vec<String> = processes
        .iter()
        .take(MAX_ROWS)
        .map(|p| {
            let row = format!("{} - {}: {:.2} ms/s", p.pid, p.name, p.cpu_ms_per_s);
            truncate_unicode(&row, width)
        })
        .collect();
    let paragraph = Paragraph::new(lines.join("\n"))
        .block(theme.block("Process Info".to_string()))
        .style(theme.text_style());
    frame.render_widget(paragraph, area);
}
