use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::keyboard::finger::{Hand, hand_of};
use crate::keyboard::key::PhysicalKey;
use crate::keyboard::resolver::KeyMapping;
use crate::keyboard::rows::diagram_rows;
use crate::ui::theme::Theme;

/// Keyboard guidance widget: highlights the next expected key, plus the
/// opposite-hand shift key when the next character needs it.
pub struct KeyboardDiagram<'a> {
    mapping: &'a KeyMapping,
    expected_key: Option<PhysicalKey>,
    expected_char: Option<char>,
    theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        mapping: &'a KeyMapping,
        expected_key: Option<PhysicalKey>,
        expected_char: Option<char>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            mapping,
            expected_key,
            expected_char,
            theme,
        }
    }

    fn label(&self, key: PhysicalKey) -> String {
        if let Some(label) = key.control_label() {
            return label.to_string();
        }
        match self.mapping.base_char(key) {
            Some(ch) if !ch.is_control() => ch.to_uppercase().to_string(),
            _ => String::new(),
        }
    }

    /// Which shift key to highlight: the hand opposite the expected key.
    fn shift_highlight(&self) -> Option<PhysicalKey> {
        let key = self.expected_key?;
        let ch = self.expected_char?;
        if !self.mapping.requires_shift(key, ch) {
            return None;
        }
        match hand_of(key) {
            Hand::Left => Some(PhysicalKey::ShiftRight),
            Hand::Right => Some(PhysicalKey::ShiftLeft),
        }
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let shift_key = self.shift_highlight();

        let mut lines = Vec::new();
        for row in diagram_rows() {
            let mut spans = Vec::new();
            for key in row {
                let active = self.expected_key == Some(key) || shift_key == Some(key);
                let style = if active {
                    Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.text_pending())
                };
                let label = self.label(key);
                spans.push(Span::styled(format!("[{:^3}]", label), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        let block = Block::bordered().border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
