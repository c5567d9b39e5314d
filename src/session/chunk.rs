use crate::keyboard::key::PhysicalKey;
use crate::keyboard::resolver::KeyMapping;

/// One generated unit of practice: target characters and, in parallel, the
/// physical key expected to produce each one. `None` is the unmapped
/// sentinel: the layout cannot produce that character, so validation falls
/// back to character matching for that position.
///
/// The two sequences are always the same length; both constructors enforce
/// it structurally.
#[derive(Clone, Debug)]
pub struct PracticeChunk {
    chars: Vec<char>,
    keys: Vec<Option<PhysicalKey>>,
    pub language: Option<String>,
}

impl PracticeChunk {
    /// Build from already-paired characters and keys (curriculum rendering).
    pub fn from_pairs(pairs: Vec<(char, Option<PhysicalKey>)>, language: Option<String>) -> Self {
        let (chars, keys) = pairs.into_iter().unzip();
        Self {
            chars,
            keys,
            language,
        }
    }

    /// Build from text by reverse-resolving every character through the
    /// process-wide mapping (sentence and code content).
    pub fn from_text(text: &str, mapping: &KeyMapping, language: Option<String>) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let keys = chars.iter().map(|&ch| mapping.key_for_char(ch)).collect();
        Self {
            chars,
            keys,
            language,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn key_at(&self, idx: usize) -> Option<Option<PhysicalKey>> {
        self.keys.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn keys(&self) -> &[Option<PhysicalKey>] {
        &self.keys
    }

    #[allow(dead_code)]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}
