use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{Config, PracticeMode};
use crate::curriculum::{self, Lesson};
use crate::generator::pipeline::{self, GenRequest};
use crate::generator::prefetch::Prefetcher;
use crate::keyboard::key::PhysicalKey;
use crate::keyboard::resolver::KeyMapping;
use crate::session::chunk::PracticeChunk;
use crate::session::state::SessionState;
use crate::session::stats::{self, DisplayStats, SessionResult};
use crate::session::validate::{self, Verdict};

/// The practice session façade: owns the session state, the current chunk,
/// and the prefetcher, and exposes the start/keystroke/tick/end surface the
/// front end drives.
pub struct SessionEngine {
    config: Config,
    mode: PracticeMode,
    mapping: Arc<KeyMapping>,
    lesson_index: usize,
    previous_lesson_index: usize,
    wpm_record: u32,
    state: SessionState,
    chunk: Option<PracticeChunk>,
    prefetcher: Prefetcher,
    rng: SmallRng,
}

impl SessionEngine {
    pub fn new(
        config: Config,
        mapping: Arc<KeyMapping>,
        lesson_index: usize,
        wpm_record: u32,
    ) -> Self {
        let mode = config.mode();
        Self {
            config,
            mode,
            mapping,
            lesson_index,
            previous_lesson_index: lesson_index,
            wpm_record,
            state: SessionState::new(),
            chunk: None,
            prefetcher: Prefetcher::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn start_session(&mut self) {
        self.state.reset();
        self.state.active = true;
        let chunk = self.acquire_chunk();
        self.chunk = Some(chunk);
    }

    /// Feed one keystroke into the validation state machine. Completing the
    /// chunk folds its counters and advances to the next chunk immediately.
    pub fn handle_keystroke(&mut self, ch: char, pressed: Option<PhysicalKey>) -> Verdict {
        if !self.state.active {
            return Verdict::Ignored;
        }
        let Some(chunk) = self.chunk.as_ref() else {
            return Verdict::Ignored;
        };

        if self.state.started_at.is_none() {
            self.state.started_at = Some(Instant::now());
        }

        let verdict =
            validate::process_keystroke(&mut self.state, chunk, ch, pressed, self.config.hard_mode);

        if self.state.cursor() >= chunk.len() {
            self.state.fold_chunk();
            let next = self.acquire_chunk();
            self.chunk = Some(next);
        }

        verdict
    }

    pub fn handle_backspace(&mut self) {
        validate::process_backspace(&mut self.state);
    }

    /// Per-display-tick statistics. `time_up` flags that the configured
    /// duration has elapsed and the caller should end the session.
    pub fn tick(&self, now: Instant) -> DisplayStats {
        let duration = self.config.drill_duration();
        let elapsed = self.state.elapsed(now);

        let total_chars = self.state.cumulative_chars + self.state.cursor();
        let total_errors = self.state.cumulative_errors + self.state.chunk_errors;

        DisplayStats {
            elapsed,
            remaining: duration.saturating_sub(elapsed),
            wpm: stats::wpm(total_chars, elapsed.as_secs_f64()),
            accuracy: stats::accuracy(total_chars, total_errors),
            time_up: self.state.active && self.state.started_at.is_some() && elapsed >= duration,
        }
    }

    /// End the session and evaluate it. Final numbers come from completed
    /// chunks only (the chunk in progress at cutoff is excluded) and WPM
    /// normalizes over the full configured duration.
    pub fn end_session(&mut self) -> SessionResult {
        self.state.active = false;
        self.prefetcher.discard();
        self.chunk = None;

        let duration_secs = self.config.drill_duration().as_secs_f64();
        let wpm = stats::wpm(self.state.cumulative_chars, duration_secs);
        let accuracy = stats::accuracy(self.state.cumulative_chars, self.state.cumulative_errors);

        let lesson = self.current_lesson();
        let passed = stats::evaluate_lesson(wpm, accuracy, lesson.as_ref());

        self.previous_lesson_index = self.lesson_index;
        let lesson_advanced = passed == Some(true) && self.advance_lesson();

        let new_record = wpm > self.wpm_record;
        if new_record {
            self.wpm_record = wpm;
        }

        SessionResult {
            wpm,
            accuracy,
            chars_typed: self.state.cumulative_chars,
            errors: self.state.cumulative_errors,
            passed,
            lesson_advanced,
            new_record,
        }
    }

    /// Switch practice mode. Any prefetch result is discarded before the
    /// new mode's content is requested. Mid-session the counters reset but
    /// the clock keeps running.
    pub fn set_mode(&mut self, mode: PracticeMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.config.practice_mode = mode.as_str().to_string();
        self.prefetcher.discard();

        if self.state.active {
            self.state.reset_counters();
            let chunk = self.acquire_chunk();
            self.chunk = Some(chunk);
        }
    }

    pub fn cycle_mode(&mut self) -> PracticeMode {
        let next = self.mode.cycle();
        self.set_mode(next);
        next
    }

    /// Undo the advance from the last passed drill so the lesson repeats.
    pub fn repeat_previous_lesson(&mut self) {
        if self.lesson_index > self.previous_lesson_index {
            self.lesson_index = self.previous_lesson_index;
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn chunk(&self) -> Option<&PracticeChunk> {
        self.chunk.as_ref()
    }

    pub fn typed(&self) -> &[char] {
        &self.state.typed
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor()
    }

    pub fn lesson_index(&self) -> usize {
        self.lesson_index
    }

    pub fn wpm_record(&self) -> u32 {
        self.wpm_record
    }

    pub fn hard_mode(&self) -> bool {
        self.config.hard_mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The lesson gating this session, when in curriculum mode.
    pub fn current_lesson(&self) -> Option<Lesson> {
        match self.mode {
            PracticeMode::Curriculum => Some(curriculum::lesson_at(self.lesson_index)),
            _ => None,
        }
    }

    /// Language tag of the chunk being typed (code mode).
    pub fn current_language(&self) -> Option<&str> {
        self.chunk.as_ref().and_then(|c| c.language.as_deref())
    }

    /// Physical key expected next, for the keyboard diagram.
    pub fn expected_key(&self) -> Option<PhysicalKey> {
        self.chunk
            .as_ref()
            .and_then(|c| c.key_at(self.state.cursor()))
            .flatten()
    }

    /// Character expected next.
    pub fn expected_char(&self) -> Option<char> {
        self.chunk
            .as_ref()
            .and_then(|c| c.char_at(self.state.cursor()))
    }

    /// Move to the next lesson, clamped at the end of the table. Returns
    /// whether the index actually moved.
    fn advance_lesson(&mut self) -> bool {
        let next = (self.lesson_index + 1).min(curriculum::LESSONS.len() - 1);
        let advanced = next != self.lesson_index;
        self.lesson_index = next;
        advanced
    }

    /// Take the prefetched chunk when its tag matches the active mode, or
    /// generate synchronously; either way a trailing prefetch is started
    /// for the chunk after this one.
    fn acquire_chunk(&mut self) -> PracticeChunk {
        let chunk = match self.prefetcher.take(self.mode) {
            Some(chunk) if !chunk.is_empty() => chunk,
            _ => pipeline::generate(&self.gen_request(0), &self.mapping, &mut self.rng),
        };
        self.prefetcher
            .start(self.gen_request(1), Arc::clone(&self.mapping));
        chunk
    }

    fn gen_request(&self, chunks_ahead: usize) -> GenRequest {
        GenRequest {
            mode: self.mode,
            config: self.config.clone(),
            lesson: Some(curriculum::lesson_at(self.lesson_index)),
            chunks_completed: self.state.chunks_completed + chunks_ahead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::keyboard::model::KeyboardModel;
    use crate::keyboard::resolver::LayoutResolver;

    fn mapping() -> Arc<KeyMapping> {
        let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
        Arc::new(KeyMapping::build(&mut resolver))
    }

    fn engine_with(mode: &str, duration_secs: u64) -> SessionEngine {
        let mut config = Config::default();
        config.practice_mode = mode.to_string();
        config.drill_duration_secs = duration_secs;
        config.sentence_sources = vec!["local".to_string()];
        config.code_sources = Vec::new();
        SessionEngine::new(config, mapping(), 0, 0)
    }

    fn type_current_chunk_correctly(engine: &mut SessionEngine) -> usize {
        let chunk = engine.chunk().expect("active chunk").clone();
        for idx in 0..chunk.len() {
            let ch = chunk.char_at(idx).unwrap();
            let key = chunk.key_at(idx).unwrap();
            let verdict = engine.handle_keystroke(ch, key);
            assert_eq!(verdict, Verdict::Accepted, "at position {idx}");
        }
        chunk.len()
    }

    #[test]
    fn test_session_starts_with_chunk() {
        let mut engine = engine_with("curriculum", 60);
        engine.start_session();
        assert!(engine.is_active());
        let chunk = engine.chunk().unwrap();
        assert!(!chunk.is_empty());
        assert_eq!(chunk.keys().len(), chunk.chars().len());
    }

    #[test]
    fn test_completing_chunk_folds_and_advances() {
        let mut engine = engine_with("curriculum", 60);
        engine.start_session();
        let typed = type_current_chunk_correctly(&mut engine);

        // A fresh chunk replaced the finished one; counters folded.
        assert!(engine.chunk().is_some());
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.state.cumulative_chars, typed);
        assert_eq!(engine.state.chunks_completed, 1);
    }

    #[test]
    fn test_passing_session_advances_lesson_by_one() {
        let mut engine = engine_with("curriculum", 1);
        engine.start_session();
        // One clean chunk in a 1-second drill: accuracy 100, wpm well above 10.
        type_current_chunk_correctly(&mut engine);
        let result = engine.end_session();

        assert_eq!(result.passed, Some(true));
        assert!(result.lesson_advanced);
        assert_eq!(engine.lesson_index(), 1);
    }

    #[test]
    fn test_failing_session_repeats_lesson() {
        let mut engine = engine_with("curriculum", 1);
        engine.start_session();
        // Miss once at every position before hitting it: accuracy 50 < 95.
        let chunk = engine.chunk().unwrap().clone();
        for idx in 0..chunk.len() {
            let ch = chunk.char_at(idx).unwrap();
            let key = chunk.key_at(idx).unwrap();
            let wrong = if ch == '~' { '!' } else { '~' };
            engine.handle_keystroke(wrong, None);
            engine.handle_keystroke(ch, key);
        }
        let result = engine.end_session();

        assert_eq!(result.passed, Some(false));
        assert!(!result.lesson_advanced);
        assert_eq!(engine.lesson_index(), 0);
    }

    #[test]
    fn test_final_stats_exclude_partial_chunk() {
        let mut engine = engine_with("curriculum", 60);
        engine.start_session();
        let folded = type_current_chunk_correctly(&mut engine);

        // Start the next chunk but leave it unfinished.
        let chunk = engine.chunk().unwrap().clone();
        let ch = chunk.char_at(0).unwrap();
        let key = chunk.key_at(0).unwrap();
        engine.handle_keystroke(ch, key);

        let result = engine.end_session();
        assert_eq!(result.chars_typed, folded);
    }

    #[test]
    fn test_new_record_recognized() {
        let mut engine = engine_with("curriculum", 1);
        engine.start_session();
        type_current_chunk_correctly(&mut engine);
        let result = engine.end_session();
        assert!(result.wpm > 0);
        assert!(result.new_record);
        assert_eq!(engine.wpm_record(), result.wpm);
    }

    #[test]
    fn test_mode_switch_mid_session_regenerates_content() {
        let mut engine = engine_with("sentences", 60);
        engine.start_session();
        assert_eq!(engine.mode(), PracticeMode::Sentences);

        engine.set_mode(PracticeMode::Code);
        assert_eq!(engine.mode(), PracticeMode::Code);
        assert!(engine.is_active());
        // New chunk is for the new mode (code chunks carry a language tag).
        assert!(engine.current_language().is_some());
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.state.cumulative_chars, 0);
    }

    #[test]
    fn test_tick_reports_time_up_after_duration() {
        let mut engine = engine_with("curriculum", 1);
        engine.start_session();
        let chunk = engine.chunk().unwrap().clone();
        engine.handle_keystroke(chunk.char_at(0).unwrap(), chunk.key_at(0).unwrap());

        let before = engine.tick(Instant::now());
        assert!(!before.time_up || before.elapsed >= Duration::from_secs(1));

        let later = Instant::now() + Duration::from_secs(2);
        assert!(engine.tick(later).time_up);
    }

    #[test]
    fn test_tick_before_first_keystroke() {
        let mut engine = engine_with("curriculum", 60);
        engine.start_session();
        let stats = engine.tick(Instant::now());
        assert_eq!(stats.elapsed, Duration::ZERO);
        assert_eq!(stats.wpm, 0);
        assert!(!stats.time_up);
    }

    #[test]
    fn test_repeat_previous_lesson_after_pass() {
        let mut engine = engine_with("curriculum", 1);
        engine.start_session();
        type_current_chunk_correctly(&mut engine);
        let result = engine.end_session();
        assert!(result.lesson_advanced);
        assert_eq!(engine.lesson_index(), 1);

        engine.repeat_previous_lesson();
        assert_eq!(engine.lesson_index(), 0);
    }

    #[test]
    fn test_keystrokes_ignored_when_inactive() {
        let mut engine = engine_with("curriculum", 60);
        assert_eq!(engine.handle_keystroke('a', None), Verdict::Ignored);
    }
}
