use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        let accent = match name.to_lowercase().as_str() {
            "green" => Color::Green,
            "red" => Color::Red,
            "blue" => Color::Blue,
            "cyan" => Color::Cyan,
            "magenta" => Color::Magenta,
            "yellow" => Color::Yellow,
            "white" => Color::White,
            other => {
                warn!(color = other, "unsupported color, using white");
                Color::White
            }
        };
        Theme { accent }
    }

    /// The bordered block every panel sits in, carrying the panel's live
    /// title text.
    pub fn block(&self, title: String) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.accent))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.accent)
                    .add_modifier(Modifier::BOLD),
            ))
    }

    pub fn gauge_style(&self) -> Style {
        Style::default().fg(self.accent).bg(Color::Reset)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_resolve() {
        assert_eq!(Theme::from_name("green").accent, Color::Green);
        assert_eq!(Theme::from_name("magenta").accent, Color::Magenta);
        assert_eq!(Theme::from_name("white").accent, Color::White);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Theme::from_name("Cyan").accent, Color::Cyan);
    }

    #[test]
    fn unknown_color_falls_back_to_white() {
        assert_eq!(Theme::from_name("mauve").accent, Color::White);
    }
}
