use std::collections::HashMap;

use crate::keyboard::key::{ModifierState, PhysicalKey};
use crate::keyboard::model::KeyboardModel;

/// Resolves physical keys to characters under the active layout.
///
/// Resolution results are memoized per (key, modifier) pair; the cache is
/// valid for the process lifetime since the layout is fixed once chosen.
/// When no layout is available every lookup returns `None` and the engine
/// degrades to character-only validation.
pub struct LayoutResolver {
    model: Option<KeyboardModel>,
    cache: HashMap<(PhysicalKey, ModifierState), Option<char>>,
}

impl LayoutResolver {
    pub fn new(model: KeyboardModel) -> Self {
        Self {
            model: Some(model),
            cache: HashMap::new(),
        }
    }

    /// Build from the configured layout name. An unknown name falls back to
    /// qwerty, keeping physical-key validation working.
    pub fn from_layout_name(name: &str) -> Self {
        match KeyboardModel::from_name(name) {
            Some(model) => Self::new(model),
            None => {
                log::warn!("unknown keyboard layout {name:?}, using qwerty");
                Self::new(KeyboardModel::qwerty())
            }
        }
    }

    /// Resolver with no backing layout. Everything resolves to `None`.
    #[allow(dead_code)] // Degraded-mode path, exercised by tests
    pub fn unavailable() -> Self {
        Self {
            model: None,
            cache: HashMap::new(),
        }
    }

    #[allow(dead_code)]
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn resolve(&mut self, key: PhysicalKey, modifiers: ModifierState) -> Option<char> {
        if let Some(&hit) = self.cache.get(&(key, modifiers)) {
            return hit;
        }
        // None of the supported layouts define a third level.
        let resolved = if modifiers.altgr {
            None
        } else {
            self.model
                .as_ref()
                .and_then(|m| m.chars_for(key))
                .map(|kc| if modifiers.shift { kc.shifted } else { kc.base })
        };
        self.cache.insert((key, modifiers), resolved);
        resolved
    }
}

/// Immutable process-wide character↔key tables, built once from the resolver
/// across both shift states. Shared with the prefetch worker, so it must not
/// borrow the resolver after construction.
#[derive(Clone, Debug, Default)]
pub struct KeyMapping {
    char_to_key: HashMap<char, PhysicalKey>,
    key_chars: HashMap<PhysicalKey, (Option<char>, Option<char>)>,
}

impl KeyMapping {
    pub fn build(resolver: &mut LayoutResolver) -> Self {
        let mut char_to_key = HashMap::new();
        let mut key_chars = HashMap::new();

        // Iteration over ALL is the tie-breaker: when two keys produce the
        // same character the first declared key wins, deterministically.
        for &key in PhysicalKey::ALL {
            let base = resolver.resolve(key, ModifierState::NONE);
            let shifted = resolver.resolve(key, ModifierState::SHIFT);
            key_chars.insert(key, (base, shifted));

            if let Some(ch) = base {
                char_to_key.entry(ch).or_insert(key);
            }
            if let Some(ch) = shifted {
                char_to_key.entry(ch).or_insert(key);
            }
        }

        Self {
            char_to_key,
            key_chars,
        }
    }

    /// Reverse-resolve a character to the physical key that produces it.
    /// Whitespace maps to its dedicated key; characters the layout cannot
    /// produce return `None` (the "unmapped" sentinel downstream).
    pub fn key_for_char(&self, ch: char) -> Option<PhysicalKey> {
        match ch {
            ' ' => Some(PhysicalKey::Space),
            '\n' | '\r' => Some(PhysicalKey::Enter),
            '\t' => Some(PhysicalKey::Tab),
            _ => self.char_to_key.get(&ch).copied(),
        }
    }

    pub fn base_char(&self, key: PhysicalKey) -> Option<char> {
        self.key_chars.get(&key).and_then(|&(base, _)| base)
    }

    pub fn shifted_char(&self, key: PhysicalKey) -> Option<char> {
        self.key_chars.get(&key).and_then(|&(_, shifted)| shifted)
    }

    /// Whether producing `ch` on `key` requires the shift modifier.
    pub fn requires_shift(&self, key: PhysicalKey, ch: char) -> bool {
        let Some(&(base, shifted)) = self.key_chars.get(&key) else {
            return false;
        };
        shifted == Some(ch) && base != Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qwerty_mapping() -> KeyMapping {
        let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
        KeyMapping::build(&mut resolver)
    }

    #[test]
    fn test_resolve_is_memoized_and_stable() {
        let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
        let first = resolver.resolve(PhysicalKey::A, ModifierState::SHIFT);
        let second = resolver.resolve(PhysicalKey::A, ModifierState::SHIFT);
        assert_eq!(first, Some('A'));
        assert_eq!(first, second);
    }

    #[test]
    fn test_altgr_unresolved() {
        let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
        let mods = ModifierState {
            shift: false,
            altgr: true,
        };
        assert_eq!(resolver.resolve(PhysicalKey::E, mods), None);
    }

    #[test]
    fn test_unavailable_resolver_returns_none() {
        let mut resolver = LayoutResolver::unavailable();
        assert!(!resolver.is_available());
        for &key in PhysicalKey::ALL {
            assert_eq!(resolver.resolve(key, ModifierState::NONE), None);
        }
    }

    #[test]
    fn test_reverse_resolution_is_deterministic() {
        let mapping = qwerty_mapping();
        let first = mapping.key_for_char('a');
        for _ in 0..10 {
            assert_eq!(mapping.key_for_char('a'), first);
        }
        assert_eq!(first, Some(PhysicalKey::A));
        // Shifted characters resolve to the same key as their base.
        assert_eq!(mapping.key_for_char('A'), Some(PhysicalKey::A));
        assert_eq!(mapping.key_for_char('!'), Some(PhysicalKey::Num1));
    }

    #[test]
    fn test_whitespace_reverse_resolution() {
        let mapping = qwerty_mapping();
        assert_eq!(mapping.key_for_char(' '), Some(PhysicalKey::Space));
        assert_eq!(mapping.key_for_char('\n'), Some(PhysicalKey::Enter));
        assert_eq!(mapping.key_for_char('\r'), Some(PhysicalKey::Enter));
        assert_eq!(mapping.key_for_char('\t'), Some(PhysicalKey::Tab));
    }

    #[test]
    fn test_unmapped_char_is_none() {
        let mapping = qwerty_mapping();
        assert_eq!(mapping.key_for_char('é'), None);
        assert_eq!(mapping.key_for_char('€'), None);
    }

    #[test]
    fn test_requires_shift() {
        let mapping = qwerty_mapping();
        assert!(mapping.requires_shift(PhysicalKey::A, 'A'));
        assert!(!mapping.requires_shift(PhysicalKey::A, 'a'));
        assert!(mapping.requires_shift(PhysicalKey::Num1, '!'));
        // Space is identical in both shift states.
        assert!(!mapping.requires_shift(PhysicalKey::Space, ' '));
    }

    #[test]
    fn test_degraded_mapping_has_whitespace_only() {
        let mut resolver = LayoutResolver::unavailable();
        let mapping = KeyMapping::build(&mut resolver);
        assert_eq!(mapping.key_for_char('a'), None);
        // Whitespace fast paths stay usable even without a layout.
        assert_eq!(mapping.key_for_char(' '), Some(PhysicalKey::Space));
    }
}
