use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::stats::SessionResult;
use crate::ui::theme::Theme;

pub struct ResultsPanel<'a> {
    result: &'a SessionResult,
    theme: &'a Theme,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(result: &'a SessionResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let title_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let value_style = Style::default().fg(colors.fg());

        let mut lines = vec![
            Line::from(Span::styled("SESSION COMPLETE", title_style)),
            Line::default(),
            Line::from(Span::styled(
                format!(
                    "WPM {}   ACC {}%   ERRORS {}",
                    self.result.wpm, self.result.accuracy, self.result.errors
                ),
                value_style,
            )),
        ];

        match self.result.passed {
            Some(true) => lines.push(Line::from(Span::styled(
                "Lesson cleared!",
                Style::default().fg(colors.success()),
            ))),
            Some(false) => lines.push(Line::from(Span::styled(
                "Requirements not met. Lesson will repeat.",
                Style::default().fg(colors.error()),
            ))),
            None => {}
        }
        if self.result.new_record {
            lines.push(Line::from(Span::styled(
                format!("New personal best: {} WPM", self.result.wpm),
                Style::default().fg(colors.success()),
            )));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "ENTER next session    R repeat lesson    ESC quit",
            Style::default().fg(colors.text_pending()),
        )));

        let block = Block::bordered().border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines)
            .block(block)
            .centered()
            .render(area, buf);
    }
}
