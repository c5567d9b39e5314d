use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_pending: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub accent: String,
    pub border: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// Load a user theme from the config directory, if one exists.
    pub fn load(name: &str) -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        let path = config_dir
            .join("typedrill")
            .join("themes")
            .join(format!("{name}.toml"));
        let content = fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "terminal-default".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1a1b26".to_string(),
            fg: "#c0caf5".to_string(),
            text_correct: "#9ece6a".to_string(),
            text_incorrect: "#f7768e".to_string(),
            text_pending: "#565f89".to_string(),
            text_cursor_bg: "#c0caf5".to_string(),
            text_cursor_fg: "#1a1b26".to_string(),
            accent: "#7aa2f7".to_string(),
            border: "#414868".to_string(),
            error: "#f7768e".to_string(),
            warning: "#e0af68".to_string(),
            success: "#9ece6a".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color {
        Self::parse_color(&self.bg)
    }
    pub fn fg(&self) -> Color {
        Self::parse_color(&self.fg)
    }
    pub fn text_correct(&self) -> Color {
        Self::parse_color(&self.text_correct)
    }
    pub fn text_incorrect(&self) -> Color {
        Self::parse_color(&self.text_incorrect)
    }
    pub fn text_pending(&self) -> Color {
        Self::parse_color(&self.text_pending)
    }
    pub fn text_cursor_bg(&self) -> Color {
        Self::parse_color(&self.text_cursor_bg)
    }
    pub fn text_cursor_fg(&self) -> Color {
        Self::parse_color(&self.text_cursor_fg)
    }
    pub fn accent(&self) -> Color {
        Self::parse_color(&self.accent)
    }
    pub fn border(&self) -> Color {
        Self::parse_color(&self.border)
    }
    pub fn error(&self) -> Color {
        Self::parse_color(&self.error)
    }
    pub fn warning(&self) -> Color {
        Self::parse_color(&self.warning)
    }
    pub fn success(&self) -> Color {
        Self::parse_color(&self.success)
    }
}
