/// Shift policy applied when rendering curriculum keys to characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftMode {
    Off,
    Always,
    Mixed,
}

/// One curriculum lesson. Referenced by index from the profile; the table
/// itself is static and read-only.
#[derive(Clone, Copy, Debug)]
pub struct Lesson {
    pub name: &'static str,
    pub algorithm: &'static str,
    pub row: &'static str,
    pub target_accuracy: u32,
    pub target_wpm: u32,
    pub shift_mode: ShiftMode,
}

const fn lesson(
    name: &'static str,
    algorithm: &'static str,
    row: &'static str,
    target_accuracy: u32,
    target_wpm: u32,
    shift_mode: ShiftMode,
) -> Lesson {
    Lesson {
        name,
        algorithm,
        row,
        target_accuracy,
        target_wpm,
        shift_mode,
    }
}

/// The full progression: home row drills, per-key-pair foundation lessons,
/// numbers, symbols, then sentence practice.
pub const LESSONS: &[Lesson] = &[
    // Home row
    lesson("1.1: Isolation", "repeat", "home", 95, 10, ShiftMode::Off),
    lesson("1.2: Adjacency", "adjacent", "home", 95, 10, ShiftMode::Off),
    lesson("1.3: Alternating", "alternating", "home", 92, 10, ShiftMode::Off),
    lesson("1.4: Mirroring", "mirror", "home", 92, 10, ShiftMode::Off),
    lesson("1.5: Rolling", "rolls", "home", 90, 10, ShiftMode::Off),
    lesson("1.6: Synthesis", "pseudo", "home", 95, 10, ShiftMode::Off),
    lesson("1.7: Mixed Case", "pseudo", "home", 90, 10, ShiftMode::Mixed),
    // Foundation pairs, working outward from the home position
    lesson("2.1: Isolation", "repeat", "focus_e_i", 95, 10, ShiftMode::Off),
    lesson("2.2: Variation", "pseudo", "focus_e_i", 95, 10, ShiftMode::Off),
    lesson("3.1: Isolation", "repeat", "focus_r_u", 95, 10, ShiftMode::Off),
    lesson("3.2: Variation", "pseudo", "focus_r_u", 95, 10, ShiftMode::Off),
    lesson("4.1: Isolation", "repeat", "focus_t_o", 95, 10, ShiftMode::Off),
    lesson("4.2: Variation", "pseudo", "focus_t_o", 95, 10, ShiftMode::Off),
    lesson("5.1: Isolation", "repeat", "focus_shift_period", 95, 10, ShiftMode::Mixed),
    lesson("5.2: Variation", "pseudo", "focus_shift_period", 95, 10, ShiftMode::Mixed),
    lesson("6.1: Isolation", "repeat", "focus_c_comma", 95, 10, ShiftMode::Off),
    lesson("6.2: Variation", "pseudo", "focus_c_comma", 95, 10, ShiftMode::Mixed),
    lesson("7.1: Isolation", "repeat", "focus_g_h", 95, 10, ShiftMode::Off),
    lesson("7.2: Variation", "pseudo", "focus_g_h", 95, 10, ShiftMode::Mixed),
    lesson("8.1: Isolation", "repeat", "focus_v_n_slash", 95, 10, ShiftMode::Off),
    lesson("8.2: Variation", "pseudo", "focus_v_n_slash", 95, 10, ShiftMode::Mixed),
    lesson("9.1: Isolation", "repeat", "focus_w_m", 95, 10, ShiftMode::Off),
    lesson("9.2: Variation", "pseudo", "focus_w_m", 95, 10, ShiftMode::Mixed),
    lesson("10.1: Isolation", "repeat", "focus_q_p", 95, 10, ShiftMode::Off),
    lesson("10.2: Variation", "pseudo", "focus_q_p", 95, 10, ShiftMode::Mixed),
    lesson("11.1: Isolation", "repeat", "focus_b_y", 95, 10, ShiftMode::Off),
    lesson("11.2: Variation", "pseudo", "focus_b_y", 95, 10, ShiftMode::Mixed),
    lesson("12.1: Isolation", "repeat", "focus_z_x", 95, 10, ShiftMode::Off),
    lesson("12.2: Variation", "pseudo", "focus_z_x", 95, 10, ShiftMode::Mixed),
    // Numbers
    lesson("13.1: Numbers Isolation", "repeat", "numbers", 95, 10, ShiftMode::Off),
    lesson("13.2: Numbers Variation", "pseudo", "numbers", 95, 10, ShiftMode::Off),
    // Symbols
    lesson("14.1: Special Symbols", "repeat", "symbols_basic", 90, 10, ShiftMode::Mixed),
    lesson("14.2: Symbols Adjacency", "adjacent", "symbols_basic", 90, 10, ShiftMode::Mixed),
    lesson("14.3: Symbols Synthesis", "pseudo", "symbols_basic", 90, 10, ShiftMode::Mixed),
    // Sentence practice
    lesson("15.1: Sentence Practice I", "sentence", "home", 90, 20, ShiftMode::Off),
    lesson("15.2: Sentence Practice II", "sentence", "home", 92, 25, ShiftMode::Off),
    lesson("15.3: Sentence Practice III", "sentence", "home", 95, 30, ShiftMode::Off),
];

/// Lesson at `index`, clamped to the last lesson once the table is finished.
pub fn lesson_at(index: usize) -> Lesson {
    let clamped = index.min(LESSONS.len() - 1);
    LESSONS[clamped]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::patterns::PatternAlgorithm;
    use crate::keyboard::rows::row_spec;

    #[test]
    fn test_every_lesson_row_exists() {
        for lesson in LESSONS {
            assert!(
                row_spec(lesson.row).is_some(),
                "lesson {} references unknown row {}",
                lesson.name,
                lesson.row
            );
        }
    }

    #[test]
    fn test_every_lesson_algorithm_known() {
        for lesson in LESSONS {
            let known = lesson.algorithm == "sentence"
                || PatternAlgorithm::from_id(lesson.algorithm).is_some();
            assert!(known, "lesson {} uses unknown algorithm", lesson.name);
        }
    }

    #[test]
    fn test_lesson_at_clamps() {
        let last = lesson_at(LESSONS.len() + 100);
        assert_eq!(last.name, LESSONS[LESSONS.len() - 1].name);
    }

    #[test]
    fn test_targets_in_range() {
        for lesson in LESSONS {
            assert!(lesson.target_accuracy <= 100);
        }
    }
}
