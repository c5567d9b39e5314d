use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::config::PracticeMode;
use crate::session::engine::SessionEngine;
use crate::session::stats::DisplayStats;
use crate::ui::theme::Theme;

pub struct StatsBar<'a> {
    engine: &'a SessionEngine,
    stats: DisplayStats,
    theme: &'a Theme,
}

impl<'a> StatsBar<'a> {
    pub fn new(engine: &'a SessionEngine, stats: DisplayStats, theme: &'a Theme) -> Self {
        Self {
            engine,
            stats,
            theme,
        }
    }

    fn mode_display(&self) -> String {
        match self.engine.mode() {
            PracticeMode::Curriculum => self
                .engine
                .current_lesson()
                .map(|l| l.name.to_string())
                .unwrap_or_else(|| "Curriculum".to_string()),
            PracticeMode::Sentences => "Sentence Practice".to_string(),
            PracticeMode::Code => match self.engine.current_language() {
                Some(language) => format!("Code ({})", language.to_uppercase()),
                None => "Code Practice".to_string(),
            },
        }
    }
}

fn format_timer(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

impl Widget for StatsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let timer = format_timer(self.stats.remaining.as_secs());
        let mode_style = Style::default().fg(colors.accent());
        let value_style = Style::default().fg(colors.fg());
        let dim_style = Style::default().fg(colors.text_pending());

        let mut spans = vec![
            Span::styled(self.mode_display(), mode_style),
            Span::styled(" | ", dim_style),
            Span::styled(format!("TIME {timer}"), value_style),
            Span::styled(" | ", dim_style),
            Span::styled(format!("WPM {}", self.stats.wpm), value_style),
            Span::styled(" | ", dim_style),
            Span::styled(format!("ACC {}%", self.stats.accuracy), value_style),
        ];
        if self.engine.hard_mode() {
            spans.push(Span::styled(" | ", dim_style));
            spans.push(Span::styled("HARD", Style::default().fg(colors.warning())));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(0), "00:00");
        assert_eq!(format_timer(65), "01:05");
        assert_eq!(format_timer(600), "10:00");
    }
}
