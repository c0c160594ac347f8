use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;

use crate::soc::SocInfo;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, soc: &SocInfo, theme: &Theme) {
    let name = if soc.name.is_empty() {
        "Unknown Model"
    } else {
        soc.name.as_str()
    };
    let gpu_cores = if soc.gpu_core_count.is_empty() {
        "?"
    } else {
        soc.gpu_core_count.as_str()
    };
    let text = format!(
        "{}\nTotal Cores: {}\nE-Cores: {}\nP-Cores: {}\nGPU Cores: {}",
        name,
        soc.e_core_count + soc.p_core_count,
        soc.e_core_count,
        soc.p_core_count,
        gpu_cores
    );
    let paragraph = Paragraph::new(text)
        .block(theme.block("Apple Silicon".to_string()))
        .style(theme.text_style());
    frame.render_widget(paragraph, area);
}
