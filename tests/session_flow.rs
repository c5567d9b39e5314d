//! End-to-end session flows driven through the library surface: generation,
//! validation, stats, mode switching, and persistence working together.

use std::sync::Arc;
use std::time::{Duration, Instant};

use typedrill::config::{Config, PracticeMode};
use typedrill::curriculum;
use typedrill::generator::pipeline::{self, GenRequest};
use typedrill::keyboard::model::KeyboardModel;
use typedrill::keyboard::resolver::{KeyMapping, LayoutResolver};
use typedrill::session::engine::SessionEngine;
use typedrill::session::validate::Verdict;
use typedrill::store::{JsonStore, ProfileData};

use rand::SeedableRng;
use rand::rngs::SmallRng;

fn mapping() -> Arc<KeyMapping> {
    let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
    Arc::new(KeyMapping::build(&mut resolver))
}

fn offline_config(mode: &str, duration_secs: u64) -> Config {
    let mut config = Config::default();
    config.practice_mode = mode.to_string();
    config.drill_duration_secs = duration_secs;
    config.sentence_sources = vec!["local".to_string()];
    config.code_sources = Vec::new();
    config
}

fn type_chunk(engine: &mut SessionEngine) -> usize {
    let chunk = engine.chunk().expect("active chunk").clone();
    for idx in 0..chunk.len() {
        let ch = chunk.char_at(idx).unwrap();
        let key = chunk.key_at(idx).unwrap();
        assert_eq!(engine.handle_keystroke(ch, key), Verdict::Accepted);
    }
    chunk.len()
}

#[test]
fn full_curriculum_session_pass_and_persist() {
    let config = offline_config("curriculum", 1);
    let mut engine = SessionEngine::new(config, mapping(), 0, 0);
    engine.start_session();

    let typed = type_chunk(&mut engine);
    let result = engine.end_session();

    assert_eq!(result.chars_typed, typed);
    assert_eq!(result.passed, Some(true));
    assert!(result.lesson_advanced);
    assert!(result.new_record);

    // Persist the outcome the way the app layer does, then read it back.
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut profile = ProfileData::default();
    profile.lesson_index = engine.lesson_index();
    profile.wpm_record = engine.wpm_record();
    profile.total_drills += 1;
    store.save_profile(&profile).unwrap();

    let loaded = store.load_profile();
    assert_eq!(loaded.lesson_index, 1);
    assert_eq!(loaded.wpm_record, result.wpm);
    assert_eq!(loaded.total_drills, 1);
}

#[test]
fn hard_mode_blocks_until_correct_key() {
    let config = offline_config("curriculum", 60);
    let mut engine = SessionEngine::new(config, mapping(), 0, 0);
    engine.start_session();

    let expected = engine.expected_char().unwrap();
    let wrong = if expected == '`' { '1' } else { '`' };

    assert_eq!(engine.handle_keystroke(wrong, None), Verdict::Rejected);
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.handle_keystroke(wrong, None), Verdict::Rejected);
    assert_eq!(engine.cursor(), 0);

    let key = engine.chunk().unwrap().key_at(0).unwrap();
    assert_eq!(engine.handle_keystroke(expected, key), Verdict::Accepted);
    assert_eq!(engine.cursor(), 1);
}

#[test]
fn soft_mode_advances_through_mistakes() {
    let mut config = offline_config("curriculum", 60);
    config.hard_mode = false;
    let mut engine = SessionEngine::new(config, mapping(), 0, 0);
    engine.start_session();

    let expected = engine.expected_char().unwrap();
    let wrong = if expected == '`' { '1' } else { '`' };
    assert_eq!(engine.handle_keystroke(wrong, None), Verdict::Rejected);
    assert_eq!(engine.cursor(), 1, "soft mode records the miss and moves on");
}

#[test]
fn mode_switch_discards_prefetched_content() {
    let config = offline_config("sentences", 60);
    let mut engine = SessionEngine::new(config, mapping(), 0, 0);
    engine.start_session();

    // A prefetch for the sentences mode is in flight or done. Switching to
    // code must never serve it: the replacement chunk is code-tagged.
    engine.set_mode(PracticeMode::Code);
    let chunk = engine.chunk().expect("chunk after mode switch");
    assert!(chunk.language.is_some(), "served a non-code chunk after switch");

    // And chunk advance in the new mode keeps producing code content.
    type_chunk(&mut engine);
    assert!(engine.chunk().unwrap().language.is_some());
}

#[test]
fn session_clock_runs_across_mode_switch() {
    let config = offline_config("sentences", 60);
    let mut engine = SessionEngine::new(config, mapping(), 0, 0);
    engine.start_session();

    let chunk = engine.chunk().unwrap().clone();
    engine.handle_keystroke(chunk.char_at(0).unwrap(), chunk.key_at(0).unwrap());
    let before = engine.tick(Instant::now());

    engine.set_mode(PracticeMode::Curriculum);
    let after = engine.tick(Instant::now() + Duration::from_millis(10));
    assert!(after.elapsed >= before.elapsed, "mode switch reset the clock");
    assert!(engine.is_active());
}

#[test]
fn every_generated_chunk_keeps_sequences_parallel() {
    let mapping = mapping();
    let mut rng = SmallRng::seed_from_u64(1234);
    let config = offline_config("curriculum", 60);

    for mode in [PracticeMode::Curriculum, PracticeMode::Sentences, PracticeMode::Code] {
        for chunks_completed in [0, 10] {
            let request = GenRequest {
                mode,
                config: config.clone(),
                lesson: Some(curriculum::lesson_at(3)),
                chunks_completed,
            };
            let chunk = pipeline::generate(&request, &mapping, &mut rng);
            assert!(!chunk.is_empty());
            assert_eq!(chunk.keys().len(), chunk.chars().len());
        }
    }
}

#[test]
fn curriculum_progression_across_sessions() {
    let config = offline_config("curriculum", 1);
    let mut engine = SessionEngine::new(config, mapping(), 0, 0);

    for expected_index in 0..3 {
        assert_eq!(engine.lesson_index(), expected_index);
        engine.start_session();
        type_chunk(&mut engine);
        let result = engine.end_session();
        assert_eq!(result.passed, Some(true));
    }
    assert_eq!(engine.lesson_index(), 3);

    // Repeating undoes exactly the last advance.
    engine.repeat_previous_lesson();
    assert_eq!(engine.lesson_index(), 2);
}

#[test]
fn dvorak_layout_validates_by_position() {
    let mut resolver = LayoutResolver::new(KeyboardModel::dvorak());
    let mapping = Arc::new(KeyMapping::build(&mut resolver));

    let config = offline_config("sentences", 60);
    let mut engine = SessionEngine::new(config, mapping.clone(), 0, 0);
    engine.start_session();

    // Whatever sentence came up, reverse-resolution and validation agree.
    let chunk = engine.chunk().unwrap().clone();
    for idx in 0..chunk.len() {
        let ch = chunk.char_at(idx).unwrap();
        let key = chunk.key_at(idx).unwrap();
        if let Some(key) = key {
            assert_eq!(mapping.key_for_char(ch), Some(key), "char {ch:?}");
        }
        assert_eq!(engine.handle_keystroke(ch, key), Verdict::Accepted);
    }
}
