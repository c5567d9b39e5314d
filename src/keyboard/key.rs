/// A physical keyboard position, independent of the active character layout.
///
/// Discriminants are evdev scancodes, which makes the identifiers stable
/// across layouts and gives `code()` a meaningful value for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PhysicalKey {
    // Number row
    Escape = 1,
    Grave = 41,
    Num1 = 2,
    Num2 = 3,
    Num3 = 4,
    Num4 = 5,
    Num5 = 6,
    Num6 = 7,
    Num7 = 8,
    Num8 = 9,
    Num9 = 10,
    Num0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,

    // Top row
    Tab = 15,
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    LeftBracket = 26,
    RightBracket = 27,
    Backslash = 43,

    // Home row
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    Semicolon = 39,
    Quote = 40,
    Enter = 28,

    // Bottom row
    ShiftLeft = 42,
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    Comma = 51,
    Dot = 52,
    Slash = 53,
    ShiftRight = 54,

    Space = 57,
}

impl PhysicalKey {
    /// Every key, in declaration order. Reverse-map construction iterates
    /// this slice, so its order decides which key wins when two keys produce
    /// the same character (first match wins).
    pub const ALL: &'static [PhysicalKey] = &[
        PhysicalKey::Escape,
        PhysicalKey::Grave,
        PhysicalKey::Num1,
        PhysicalKey::Num2,
        PhysicalKey::Num3,
        PhysicalKey::Num4,
        PhysicalKey::Num5,
        PhysicalKey::Num6,
        PhysicalKey::Num7,
        PhysicalKey::Num8,
        PhysicalKey::Num9,
        PhysicalKey::Num0,
        PhysicalKey::Minus,
        PhysicalKey::Equal,
        PhysicalKey::Backspace,
        PhysicalKey::Tab,
        PhysicalKey::Q,
        PhysicalKey::W,
        PhysicalKey::E,
        PhysicalKey::R,
        PhysicalKey::T,
        PhysicalKey::Y,
        PhysicalKey::U,
        PhysicalKey::I,
        PhysicalKey::O,
        PhysicalKey::P,
        PhysicalKey::LeftBracket,
        PhysicalKey::RightBracket,
        PhysicalKey::Backslash,
        PhysicalKey::A,
        PhysicalKey::S,
        PhysicalKey::D,
        PhysicalKey::F,
        PhysicalKey::G,
        PhysicalKey::H,
        PhysicalKey::J,
        PhysicalKey::K,
        PhysicalKey::L,
        PhysicalKey::Semicolon,
        PhysicalKey::Quote,
        PhysicalKey::Enter,
        PhysicalKey::ShiftLeft,
        PhysicalKey::Z,
        PhysicalKey::X,
        PhysicalKey::C,
        PhysicalKey::V,
        PhysicalKey::B,
        PhysicalKey::N,
        PhysicalKey::M,
        PhysicalKey::Comma,
        PhysicalKey::Dot,
        PhysicalKey::Slash,
        PhysicalKey::ShiftRight,
        PhysicalKey::Space,
    ];

    #[allow(dead_code)] // Diagnostics and tests
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Display label for keys whose resolved character is unprintable or
    /// absent (control keys), keyed the way the keyboard diagram wants them.
    pub fn control_label(self) -> Option<&'static str> {
        match self {
            PhysicalKey::Escape => Some("ESC"),
            PhysicalKey::Tab => Some("TAB"),
            PhysicalKey::Backspace => Some("BACK"),
            PhysicalKey::Enter => Some("ENTER"),
            PhysicalKey::ShiftLeft | PhysicalKey::ShiftRight => Some("SHIFT"),
            PhysicalKey::Space => Some("SPACE"),
            _ => None,
        }
    }
}

/// Modifiers that participate in character resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierState {
    pub shift: bool,
    pub altgr: bool,
}

impl ModifierState {
    pub const NONE: ModifierState = ModifierState {
        shift: false,
        altgr: false,
    };

    pub const SHIFT: ModifierState = ModifierState {
        shift: true,
        altgr: false,
    };
}
