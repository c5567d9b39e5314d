use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Practice mode selector. Stored as a string in config/profile so stale
/// values degrade to curriculum instead of failing deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeMode {
    Curriculum,
    Sentences,
    Code,
}

impl PracticeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::Curriculum => "curriculum",
            PracticeMode::Sentences => "sentences",
            PracticeMode::Code => "code",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "curriculum" => Some(PracticeMode::Curriculum),
            "sentences" => Some(PracticeMode::Sentences),
            "code" => Some(PracticeMode::Code),
            _ => None,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            PracticeMode::Curriculum => PracticeMode::Sentences,
            PracticeMode::Sentences => PracticeMode::Code,
            PracticeMode::Code => PracticeMode::Curriculum,
        }
    }
}

pub const SUPPORTED_LANGUAGES: &[&str] = &["python", "rust", "c", "cpp"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_practice_mode")]
    pub practice_mode: String,
    #[serde(default = "default_drill_duration_secs")]
    pub drill_duration_secs: u64,
    #[serde(default = "default_shuffle_after")]
    pub shuffle_after: usize,
    #[serde(default = "default_hard_mode")]
    pub hard_mode: bool,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default = "default_sentence_sources")]
    pub sentence_sources: Vec<String>,
    #[serde(default = "default_code_sources")]
    pub code_sources: Vec<String>,
    #[serde(default = "default_sentences_file")]
    pub sentences_file: String,
    #[serde(default = "default_snippets_file")]
    pub snippets_file: String,
    #[serde(default = "default_sentence_command")]
    pub sentence_command: String,
    #[serde(default = "default_code_command")]
    pub code_command: String,
    #[serde(default = "default_quote_api_url")]
    pub quote_api_url: String,
    #[serde(default = "default_ai_endpoint")]
    pub ai_endpoint: String,
    #[serde(default = "default_ai_api_type")]
    pub ai_api_type: String,
    #[serde(default = "default_ai_model")]
    pub ai_model: String,
    #[serde(default = "default_ai_api_key")]
    pub ai_api_key: String,
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,
    #[serde(default = "default_code_languages")]
    pub code_languages: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_show_keyboard")]
    pub show_keyboard: bool,
}

fn default_practice_mode() -> String {
    "curriculum".to_string()
}
fn default_drill_duration_secs() -> u64 {
    300
}
fn default_shuffle_after() -> usize {
    5
}
fn default_hard_mode() -> bool {
    true
}
fn default_keyboard_layout() -> String {
    "qwerty".to_string()
}
fn default_sentence_sources() -> Vec<String> {
    vec!["network".to_string(), "file".to_string()]
}
fn default_code_sources() -> Vec<String> {
    Vec::new()
}
fn default_sentences_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typedrill")
        .join("sentences.txt")
        .to_string_lossy()
        .to_string()
}
fn default_snippets_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typedrill")
        .join("snippets.txt")
        .to_string_lossy()
        .to_string()
}
fn default_sentence_command() -> String {
    String::new()
}
fn default_code_command() -> String {
    String::new()
}
fn default_quote_api_url() -> String {
    "https://api.quotify.top/random".to_string()
}
fn default_ai_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}
fn default_ai_api_type() -> String {
    "auto".to_string()
}
fn default_ai_model() -> String {
    "codellama".to_string()
}
fn default_ai_api_key() -> String {
    String::new()
}
fn default_source_timeout_secs() -> u64 {
    2
}
fn default_code_languages() -> String {
    "python,rust,c,cpp".to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_show_keyboard() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            practice_mode: default_practice_mode(),
            drill_duration_secs: default_drill_duration_secs(),
            shuffle_after: default_shuffle_after(),
            hard_mode: default_hard_mode(),
            keyboard_layout: default_keyboard_layout(),
            sentence_sources: default_sentence_sources(),
            code_sources: default_code_sources(),
            sentences_file: default_sentences_file(),
            snippets_file: default_snippets_file(),
            sentence_command: default_sentence_command(),
            code_command: default_code_command(),
            quote_api_url: default_quote_api_url(),
            ai_endpoint: default_ai_endpoint(),
            ai_api_type: default_ai_api_type(),
            ai_model: default_ai_model(),
            ai_api_key: default_ai_api_key(),
            source_timeout_secs: default_source_timeout_secs(),
            code_languages: default_code_languages(),
            theme: default_theme(),
            show_keyboard: default_show_keyboard(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typedrill")
            .join("config.toml")
    }

    /// Parsed practice mode; an unrecognized string is the documented
    /// curriculum default, never an error.
    pub fn mode(&self) -> PracticeMode {
        PracticeMode::from_str(&self.practice_mode).unwrap_or(PracticeMode::Curriculum)
    }

    pub fn drill_duration(&self) -> Duration {
        Duration::from_secs(self.drill_duration_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs.max(1))
    }

    /// Comma-separated language list, trimmed, lowercased, and filtered to
    /// supported languages. An empty result falls back to all supported.
    pub fn code_language_list(&self) -> Vec<String> {
        let parsed: Vec<String> = self
            .code_languages
            .split(',')
            .map(|lang| lang.trim().to_ascii_lowercase())
            .filter(|lang| SUPPORTED_LANGUAGES.contains(&lang.as_str()))
            .collect();
        if parsed.is_empty() {
            SUPPORTED_LANGUAGES.iter().map(|s| s.to_string()).collect()
        } else {
            parsed
        }
    }

    /// Apply per-profile overrides on top of this config. Precedence:
    /// override value, then config-file value (or its serde default), then
    /// the hardcoded `Default`.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Config {
        let mut merged = self.clone();
        if let Some(mode) = &overrides.practice_mode {
            merged.practice_mode = mode.clone();
        }
        if let Some(hard) = overrides.hard_mode {
            merged.hard_mode = hard;
        }
        if let Some(duration) = overrides.drill_duration_secs {
            merged.drill_duration_secs = duration;
        }
        if let Some(languages) = &overrides.code_languages {
            merged.code_languages = languages.clone();
        }
        merged
    }
}

/// Per-profile configuration overrides; `None` means "inherit".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub practice_mode: Option<String>,
    #[serde(default)]
    pub hard_mode: Option<bool>,
    #[serde(default)]
    pub drill_duration_secs: Option<u64>,
    #[serde(default)]
    pub code_languages: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        // Simulates loading an old config file with no fields at all
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.drill_duration_secs, 300);
        assert_eq!(config.shuffle_after, 5);
        assert!(config.hard_mode);
        assert_eq!(config.mode(), PracticeMode::Curriculum);
        assert_eq!(config.sentence_sources, vec!["network", "file"]);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
practice_mode = "code"
hard_mode = false
code_languages = "rust"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mode(), PracticeMode::Code);
        assert!(!config.hard_mode);
        assert_eq!(config.code_language_list(), vec!["rust"]);
        // Untouched fields keep their documented defaults
        assert_eq!(config.source_timeout_secs, 2);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.practice_mode, deserialized.practice_mode);
        assert_eq!(config.sentence_sources, deserialized.sentence_sources);
        assert_eq!(config.quote_api_url, deserialized.quote_api_url);
    }

    #[test]
    fn test_unknown_practice_mode_defaults_to_curriculum() {
        let mut config = Config::default();
        config.practice_mode = "zen".to_string();
        assert_eq!(config.mode(), PracticeMode::Curriculum);
    }

    #[test]
    fn test_code_language_list_filters_unsupported() {
        let mut config = Config::default();
        config.code_languages = "rust, haskell, C ,".to_string();
        assert_eq!(config.code_language_list(), vec!["rust", "c"]);
    }

    #[test]
    fn test_code_language_list_empty_falls_back_to_all() {
        let mut config = Config::default();
        config.code_languages = "cobol".to_string();
        assert_eq!(config.code_language_list().len(), SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn test_override_precedence() {
        let mut base = Config::default();
        base.hard_mode = true;
        base.practice_mode = "sentences".to_string();

        let overrides = ConfigOverrides {
            practice_mode: Some("code".to_string()),
            hard_mode: Some(false),
            ..Default::default()
        };
        let merged = base.with_overrides(&overrides);
        assert_eq!(merged.mode(), PracticeMode::Code);
        assert!(!merged.hard_mode);
        // Fields with no override inherit the base value
        assert_eq!(merged.drill_duration_secs, base.drill_duration_secs);
    }

    #[test]
    fn test_mode_cycle_covers_all_modes() {
        let mut mode = PracticeMode::Curriculum;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(mode);
            mode = mode.cycle();
        }
        assert_eq!(mode, PracticeMode::Curriculum);
        assert!(seen.contains(&PracticeMode::Sentences));
        assert!(seen.contains(&PracticeMode::Code));
    }
}
