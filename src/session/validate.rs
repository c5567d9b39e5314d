use crate::keyboard::key::PhysicalKey;
use crate::session::chunk::PracticeChunk;
use crate::session::state::SessionState;

/// Outcome of one keystroke against the current chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Matched; cursor advanced.
    Accepted,
    /// Mismatched; error counted. Cursor advanced only in soft mode.
    Rejected,
    /// No active chunk or chunk already complete; nothing happened.
    Ignored,
}

/// Validate one keystroke and apply it to the session state.
///
/// Primary check is the physical key against the expected key; the
/// character comparison is the fallback, used when the primary fails, when
/// the pressed key has no known physical mapping, and always when the
/// expected key is the unmapped sentinel.
pub fn process_keystroke(
    state: &mut SessionState,
    chunk: &PracticeChunk,
    ch: char,
    pressed: Option<PhysicalKey>,
    hard_mode: bool,
) -> Verdict {
    if !state.active {
        return Verdict::Ignored;
    }
    let idx = state.cursor();
    let (Some(expected_char), Some(expected_key)) = (chunk.char_at(idx), chunk.key_at(idx)) else {
        // Chunk already complete (or no chunk content at all).
        return Verdict::Ignored;
    };

    let physical_match = matches!(
        (pressed, expected_key),
        (Some(p), Some(e)) if p == e
    );
    let correct = physical_match || chars_match(expected_char, ch);

    if correct {
        state.typed.push(ch);
        Verdict::Accepted
    } else {
        state.chunk_errors += 1;
        if !hard_mode {
            // Soft mode records the mistyped character and moves on.
            state.typed.push(ch);
        }
        Verdict::Rejected
    }
}

/// Remove the last accepted character of the current chunk. Error counters
/// are not decremented; mistakes stay counted.
pub fn process_backspace(state: &mut SessionState) {
    if state.active {
        state.typed.pop();
    }
}

/// Character equality with Enter producing either newline form.
fn chars_match(expected: char, actual: char) -> bool {
    if expected == actual {
        return true;
    }
    matches!(
        (expected, actual),
        ('\n', '\r') | ('\r', '\n')
    )
}
