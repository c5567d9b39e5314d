use std::collections::HashMap;

use crate::keyboard::key::PhysicalKey;

/// Base and shifted character produced by one physical key under a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyChars {
    pub base: char,
    pub shifted: char,
}

/// Character tables for one keyboard layout. This is the process-local stand-in
/// for the host layout service: built once from the configured layout name and
/// fixed for the process lifetime.
#[derive(Clone, Debug)]
pub struct KeyboardModel {
    pub name: String,
    keys: HashMap<PhysicalKey, KeyChars>,
}

impl KeyboardModel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "qwerty" => Some(Self::qwerty()),
            "dvorak" => Some(Self::dvorak()),
            "colemak" => Some(Self::colemak()),
            _ => None,
        }
    }

    pub fn chars_for(&self, key: PhysicalKey) -> Option<KeyChars> {
        self.keys.get(&key).copied()
    }

    fn from_pairs(name: &str, pairs: &[(PhysicalKey, char, char)]) -> Self {
        let keys = pairs
            .iter()
            .map(|&(key, base, shifted)| (key, KeyChars { base, shifted }))
            .collect();
        Self {
            name: name.to_string(),
            keys,
        }
    }

    pub fn qwerty() -> Self {
        use PhysicalKey::*;
        Self::from_pairs(
            "qwerty",
            &[
                (Grave, '`', '~'),
                (Num1, '1', '!'),
                (Num2, '2', '@'),
                (Num3, '3', '#'),
                (Num4, '4', '$'),
                (Num5, '5', '%'),
                (Num6, '6', '^'),
                (Num7, '7', '&'),
                (Num8, '8', '*'),
                (Num9, '9', '('),
                (Num0, '0', ')'),
                (Minus, '-', '_'),
                (Equal, '=', '+'),
                (Tab, '\t', '\t'),
                (Q, 'q', 'Q'),
                (W, 'w', 'W'),
                (E, 'e', 'E'),
                (R, 'r', 'R'),
                (T, 't', 'T'),
                (Y, 'y', 'Y'),
                (U, 'u', 'U'),
                (I, 'i', 'I'),
                (O, 'o', 'O'),
                (P, 'p', 'P'),
                (LeftBracket, '[', '{'),
                (RightBracket, ']', '}'),
                (Backslash, '\\', '|'),
                (A, 'a', 'A'),
                (S, 's', 'S'),
                (D, 'd', 'D'),
                (F, 'f', 'F'),
                (G, 'g', 'G'),
                (H, 'h', 'H'),
                (J, 'j', 'J'),
                (K, 'k', 'K'),
                (L, 'l', 'L'),
                (Semicolon, ';', ':'),
                (Quote, '\'', '"'),
                (Enter, '\n', '\n'),
                (Z, 'z', 'Z'),
                (X, 'x', 'X'),
                (C, 'c', 'C'),
                (V, 'v', 'V'),
                (B, 'b', 'B'),
                (N, 'n', 'N'),
                (M, 'm', 'M'),
                (Comma, ',', '<'),
                (Dot, '.', '>'),
                (Slash, '/', '?'),
                (Space, ' ', ' '),
            ],
        )
    }

    pub fn dvorak() -> Self {
        use PhysicalKey::*;
        Self::from_pairs(
            "dvorak",
            &[
                (Grave, '`', '~'),
                (Num1, '1', '!'),
                (Num2, '2', '@'),
                (Num3, '3', '#'),
                (Num4, '4', '$'),
                (Num5, '5', '%'),
                (Num6, '6', '^'),
                (Num7, '7', '&'),
                (Num8, '8', '*'),
                (Num9, '9', '('),
                (Num0, '0', ')'),
                (Minus, '[', '{'),
                (Equal, ']', '}'),
                (Tab, '\t', '\t'),
                (Q, '\'', '"'),
                (W, ',', '<'),
                (E, '.', '>'),
                (R, 'p', 'P'),
                (T, 'y', 'Y'),
                (Y, 'f', 'F'),
                (U, 'g', 'G'),
                (I, 'c', 'C'),
                (O, 'r', 'R'),
                (P, 'l', 'L'),
                (LeftBracket, '/', '?'),
                (RightBracket, '=', '+'),
                (Backslash, '\\', '|'),
                (A, 'a', 'A'),
                (S, 'o', 'O'),
                (D, 'e', 'E'),
                (F, 'u', 'U'),
                (G, 'i', 'I'),
                (H, 'd', 'D'),
                (J, 'h', 'H'),
                (K, 't', 'T'),
                (L, 'n', 'N'),
                (Semicolon, 's', 'S'),
                (Quote, '-', '_'),
                (Enter, '\n', '\n'),
                (Z, ';', ':'),
                (X, 'q', 'Q'),
                (C, 'j', 'J'),
                (V, 'k', 'K'),
                (B, 'x', 'X'),
                (N, 'b', 'B'),
                (M, 'm', 'M'),
                (Comma, 'w', 'W'),
                (Dot, 'v', 'V'),
                (Slash, 'z', 'Z'),
                (Space, ' ', ' '),
            ],
        )
    }

    pub fn colemak() -> Self {
        use PhysicalKey::*;
        Self::from_pairs(
            "colemak",
            &[
                (Grave, '`', '~'),
                (Num1, '1', '!'),
                (Num2, '2', '@'),
                (Num3, '3', '#'),
                (Num4, '4', '$'),
                (Num5, '5', '%'),
                (Num6, '6', '^'),
                (Num7, '7', '&'),
                (Num8, '8', '*'),
                (Num9, '9', '('),
                (Num0, '0', ')'),
                (Minus, '-', '_'),
                (Equal, '=', '+'),
                (Tab, '\t', '\t'),
                (Q, 'q', 'Q'),
                (W, 'w', 'W'),
                (E, 'f', 'F'),
                (R, 'p', 'P'),
                (T, 'g', 'G'),
                (Y, 'j', 'J'),
                (U, 'l', 'L'),
                (I, 'u', 'U'),
                (O, 'y', 'Y'),
                (P, ';', ':'),
                (LeftBracket, '[', '{'),
                (RightBracket, ']', '}'),
                (Backslash, '\\', '|'),
                (A, 'a', 'A'),
                (S, 'r', 'R'),
                (D, 's', 'S'),
                (F, 't', 'T'),
                (G, 'd', 'D'),
                (H, 'h', 'H'),
                (J, 'n', 'N'),
                (K, 'e', 'E'),
                (L, 'i', 'I'),
                (Semicolon, 'o', 'O'),
                (Quote, '\'', '"'),
                (Enter, '\n', '\n'),
                (Z, 'z', 'Z'),
                (X, 'x', 'X'),
                (C, 'c', 'C'),
                (V, 'v', 'V'),
                (B, 'b', 'B'),
                (N, 'k', 'K'),
                (M, 'm', 'M'),
                (Comma, ',', '<'),
                (Dot, '.', '>'),
                (Slash, '/', '?'),
                (Space, ' ', ' '),
            ],
        )
    }
}

impl Default for KeyboardModel {
    fn default() -> Self {
        Self::qwerty()
    }
}
