use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::chunk::PracticeChunk;
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    chunk: &'a PracticeChunk,
    typed: &'a [char],
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(chunk: &'a PracticeChunk, typed: &'a [char], theme: &'a Theme) -> Self {
        Self {
            chunk,
            typed,
            theme,
        }
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let cursor = self.typed.len();

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        for (idx, &target_ch) in self.chunk.chars().iter().enumerate() {
            let style = if idx < cursor {
                if self.typed[idx] == target_ch {
                    Style::default().fg(colors.text_correct())
                } else {
                    Style::default()
                        .fg(colors.text_incorrect())
                        .add_modifier(Modifier::UNDERLINED)
                }
            } else if idx == cursor {
                Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg())
            } else {
                Style::default().fg(colors.text_pending())
            };

            // Mistyped characters show what was actually typed; newlines get
            // a visible marker so a wrong keypress there has somewhere to
            // paint.
            let display = if target_ch == '\n' {
                "\u{21b5}".to_string()
            } else if idx < cursor && self.typed[idx] != target_ch {
                self.typed[idx].to_string()
            } else {
                target_ch.to_string()
            };

            lines.last_mut().expect("at least one line").push(Span::styled(display, style));
            if target_ch == '\n' {
                lines.push(Vec::new());
            }
        }

        let ratatui_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(ratatui_lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
