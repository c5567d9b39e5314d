use std::time::{Duration, Instant};

/// Mutable per-session state, owned exclusively by the engine.
///
/// Cumulative counters only ever grow within a session: chunk counters are
/// folded in on completion and reset, never subtracted.
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Characters accepted into the current chunk so far.
    pub typed: Vec<char>,
    /// Errors made in the current chunk.
    pub chunk_errors: u32,
    /// Characters typed across all completed chunks.
    pub cumulative_chars: usize,
    /// Errors across all completed chunks.
    pub cumulative_errors: u32,
    /// Completed chunks this session (drives the shuffle threshold).
    pub chunks_completed: usize,
    /// Set on the first accepted keystroke, not at session start.
    pub started_at: Option<Instant>,
    pub active: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            typed: Vec::new(),
            chunk_errors: 0,
            cumulative_chars: 0,
            cumulative_errors: 0,
            chunks_completed: 0,
            started_at: None,
            active: false,
        }
    }

    /// Reset everything for a fresh session.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Reset counters and typed text but keep the clock running; used when
    /// the practice mode changes mid-session.
    pub fn reset_counters(&mut self) {
        self.typed.clear();
        self.chunk_errors = 0;
        self.cumulative_chars = 0;
        self.cumulative_errors = 0;
        self.chunks_completed = 0;
    }

    pub fn cursor(&self) -> usize {
        self.typed.len()
    }

    /// Fold the finished chunk's counters into the cumulative totals.
    pub fn fold_chunk(&mut self) {
        self.cumulative_chars += self.typed.len();
        self.cumulative_errors += self.chunk_errors;
        self.chunks_completed += 1;
        self.typed.clear();
        self.chunk_errors = 0;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => now.saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_chunk_accumulates_and_clears() {
        let mut state = SessionState::new();
        state.typed.extend("abcd".chars());
        state.chunk_errors = 2;
        state.fold_chunk();

        assert_eq!(state.cumulative_chars, 4);
        assert_eq!(state.cumulative_errors, 2);
        assert_eq!(state.chunks_completed, 1);
        assert!(state.typed.is_empty());
        assert_eq!(state.chunk_errors, 0);

        state.typed.extend("xy".chars());
        state.chunk_errors = 1;
        state.fold_chunk();
        // Monotonic: totals only grow
        assert_eq!(state.cumulative_chars, 6);
        assert_eq!(state.cumulative_errors, 3);
        assert_eq!(state.chunks_completed, 2);
    }

    #[test]
    fn test_elapsed_zero_before_first_keystroke() {
        let state = SessionState::new();
        assert_eq!(state.elapsed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_reset_counters_keeps_clock() {
        let mut state = SessionState::new();
        state.started_at = Some(Instant::now());
        state.cumulative_chars = 10;
        state.reset_counters();
        assert_eq!(state.cumulative_chars, 0);
        assert!(state.started_at.is_some());
    }
}
