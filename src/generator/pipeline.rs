use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::config::{Config, PracticeMode};
use crate::curriculum::{Lesson, ShiftMode};
use crate::generator::patterns;
use crate::generator::sources::SourceChain;
use crate::keyboard::key::PhysicalKey;
use crate::keyboard::resolver::KeyMapping;
use crate::keyboard::rows::row_spec;
use crate::session::chunk::PracticeChunk;

/// Everything one chunk generation needs, captured up front. The prefetch
/// worker gets a clone, so a config change mid-session never alters a
/// generation already in flight.
#[derive(Clone, Debug)]
pub struct GenRequest {
    pub mode: PracticeMode,
    pub config: Config,
    pub lesson: Option<Lesson>,
    pub chunks_completed: usize,
}

/// Generate one practice chunk for the requested mode. Infallible: every
/// failure path inside degrades to a content source that cannot fail.
pub fn generate(request: &GenRequest, mapping: &KeyMapping, rng: &mut SmallRng) -> PracticeChunk {
    match request.mode {
        PracticeMode::Curriculum => generate_curriculum(request, mapping, rng),
        PracticeMode::Sentences => generate_sentence(request, mapping, rng),
        PracticeMode::Code => generate_code(request, mapping, rng),
    }
}

fn generate_curriculum(
    request: &GenRequest,
    mapping: &KeyMapping,
    rng: &mut SmallRng,
) -> PracticeChunk {
    let Some(lesson) = request.lesson else {
        // No curriculum position (misconfigured caller): sentences still work.
        return generate_sentence(request, mapping, rng);
    };

    // Sentence-practice lessons delegate to the sentence chain.
    if lesson.algorithm == "sentence" {
        return generate_sentence(request, mapping, rng);
    }

    let row = row_spec(lesson.row).unwrap_or_else(|| {
        log::warn!("lesson {} references unknown row {:?}", lesson.name, lesson.row);
        row_spec("home").unwrap_or_default()
    });

    let shuffle = request.chunks_completed >= request.config.shuffle_after;
    let keys = patterns::generate(lesson.algorithm, &row, shuffle, rng);
    let chunk = render_keys(&keys, lesson.shift_mode, mapping, rng);

    if chunk.is_empty() {
        // Layout resolution produced nothing (degraded resolver); fall back
        // to sentence content, which validates character-only.
        return generate_sentence(request, mapping, rng);
    }
    chunk
}

/// Render physical keys to characters under the lesson's shift policy.
/// Space renders as a literal space regardless of policy. Keys the layout
/// cannot resolve are dropped from both sequences, keeping them parallel.
fn render_keys(
    keys: &[PhysicalKey],
    shift_mode: ShiftMode,
    mapping: &KeyMapping,
    rng: &mut SmallRng,
) -> PracticeChunk {
    let mut pairs = Vec::with_capacity(keys.len());
    for &key in keys {
        if key == PhysicalKey::Space {
            pairs.push((' ', Some(key)));
            continue;
        }

        let use_shift = match shift_mode {
            ShiftMode::Always => true,
            ShiftMode::Mixed => rng.gen_bool(0.5),
            ShiftMode::Off => false,
        };

        let ch = if use_shift {
            // Shift produced nothing: fall back to the base character.
            mapping.shifted_char(key).or_else(|| mapping.base_char(key))
        } else {
            mapping.base_char(key)
        };

        if let Some(ch) = ch {
            pairs.push((ch, Some(key)));
        }
    }
    PracticeChunk::from_pairs(pairs, None)
}

fn generate_sentence(
    request: &GenRequest,
    mapping: &KeyMapping,
    rng: &mut SmallRng,
) -> PracticeChunk {
    let chain = SourceChain::sentences(&request.config);
    let text = chain.fetch(rng);
    PracticeChunk::from_text(&text, mapping, None)
}

fn generate_code(request: &GenRequest, mapping: &KeyMapping, rng: &mut SmallRng) -> PracticeChunk {
    let languages = request.config.code_language_list();
    let language = languages
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "python".to_string());

    let chain = SourceChain::code(&request.config, &language);
    let text = chain.fetch(rng);
    PracticeChunk::from_text(&text, mapping, Some(language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::curriculum;
    use crate::keyboard::model::KeyboardModel;
    use crate::keyboard::resolver::LayoutResolver;

    fn mapping() -> KeyMapping {
        let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
        KeyMapping::build(&mut resolver)
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(99)
    }

    fn local_only_config() -> Config {
        let mut config = Config::default();
        config.sentence_sources = vec!["local".to_string()];
        config.code_sources = Vec::new();
        config
    }

    fn request(mode: PracticeMode, lesson: Option<Lesson>) -> GenRequest {
        GenRequest {
            mode,
            config: local_only_config(),
            lesson,
            chunks_completed: 0,
        }
    }

    #[test]
    fn test_keys_and_text_parallel_in_all_modes() {
        let mapping = mapping();
        let mut rng = rng();
        for mode in [PracticeMode::Curriculum, PracticeMode::Sentences, PracticeMode::Code] {
            let lesson = Some(curriculum::lesson_at(0));
            let chunk = generate(&request(mode, lesson), &mapping, &mut rng);
            assert!(!chunk.is_empty());
            assert_eq!(chunk.keys().len(), chunk.chars().len(), "{mode:?}");
        }
    }

    #[test]
    fn test_parallel_invariant_across_whole_curriculum() {
        let mapping = mapping();
        let mut rng = rng();
        for (idx, _) in curriculum::LESSONS.iter().enumerate() {
            let lesson = Some(curriculum::lesson_at(idx));
            let chunk = generate(&request(PracticeMode::Curriculum, lesson), &mapping, &mut rng);
            assert!(!chunk.is_empty(), "lesson {idx} produced empty chunk");
            assert_eq!(chunk.keys().len(), chunk.chars().len(), "lesson {idx}");
        }
    }

    #[test]
    fn test_shift_mode_off_renders_base_chars() {
        let mapping = mapping();
        let keys = vec![PhysicalKey::A, PhysicalKey::Space, PhysicalKey::Semicolon];
        let chunk = render_keys(&keys, ShiftMode::Off, &mapping, &mut rng());
        assert_eq!(chunk.text(), "a ;");
    }

    #[test]
    fn test_shift_mode_always_renders_shifted_chars() {
        let mapping = mapping();
        let keys = vec![PhysicalKey::A, PhysicalKey::Num1, PhysicalKey::Space];
        let chunk = render_keys(&keys, ShiftMode::Always, &mapping, &mut rng());
        // Space stays a literal space even under forced shift.
        assert_eq!(chunk.text(), "A! ");
    }

    #[test]
    fn test_shift_mode_mixed_uses_both_cases() {
        let mapping = mapping();
        let keys = vec![PhysicalKey::A; 200];
        let chunk = render_keys(&keys, ShiftMode::Mixed, &mapping, &mut rng());
        let text = chunk.text();
        assert!(text.contains('a'));
        assert!(text.contains('A'));
    }

    #[test]
    fn test_code_mode_tags_language() {
        let mapping = mapping();
        let mut req = request(PracticeMode::Code, None);
        req.config.code_languages = "rust".to_string();
        let chunk = generate(&req, &mapping, &mut rng());
        assert_eq!(chunk.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_sentence_mode_has_no_language_tag() {
        let mapping = mapping();
        let chunk = generate(&request(PracticeMode::Sentences, None), &mapping, &mut rng());
        assert_eq!(chunk.language, None);
    }

    #[test]
    fn test_degraded_resolver_still_produces_content() {
        // No layout: curriculum rendering yields nothing, so the pipeline
        // falls back to sentence content with sentinel keys throughout.
        let mut resolver = LayoutResolver::unavailable();
        let degraded = KeyMapping::build(&mut resolver);
        let lesson = Some(curriculum::lesson_at(0));
        let chunk = generate(
            &request(PracticeMode::Curriculum, lesson),
            &degraded,
            &mut rng(),
        );
        assert!(!chunk.is_empty());
        assert_eq!(chunk.keys().len(), chunk.chars().len());
    }

    #[test]
    fn test_unknown_lesson_algorithm_uses_fallback_length() {
        let mapping = mapping();
        let mut req = request(PracticeMode::Curriculum, Some(curriculum::lesson_at(0)));
        let lesson = Lesson {
            algorithm: "mystery",
            ..curriculum::lesson_at(0)
        };
        req.lesson = Some(lesson);
        let chunk = generate(&req, &mapping, &mut rng());
        assert_eq!(chunk.len(), patterns::FALLBACK_LEN);
    }
}
