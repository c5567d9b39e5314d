use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use typedrill::config::{Config, PracticeMode};
use typedrill::curriculum;
use typedrill::generator::patterns;
use typedrill::generator::pipeline::{self, GenRequest};
use typedrill::keyboard::model::KeyboardModel;
use typedrill::keyboard::resolver::{KeyMapping, LayoutResolver};
use typedrill::keyboard::rows::row_spec;

fn bench_pattern_algorithms(c: &mut Criterion) {
    let row = row_spec("home").unwrap();
    let mut group = c.benchmark_group("patterns");

    for id in ["repeat", "adjacent", "alternating", "mirror", "rolls", "pseudo"] {
        group.bench_function(id, |b| {
            let mut rng = SmallRng::seed_from_u64(42);
            b.iter(|| patterns::generate(black_box(id), black_box(&row), true, &mut rng));
        });
    }
    group.finish();
}

fn bench_curriculum_pipeline(c: &mut Criterion) {
    let mut resolver = LayoutResolver::new(KeyboardModel::qwerty());
    let mapping = KeyMapping::build(&mut resolver);
    let mut config = Config::default();
    config.sentence_sources = vec!["local".to_string()];

    c.bench_function("pipeline_curriculum_chunk", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        let request = GenRequest {
            mode: PracticeMode::Curriculum,
            config: config.clone(),
            lesson: Some(curriculum::lesson_at(0)),
            chunks_completed: 0,
        };
        b.iter(|| pipeline::generate(black_box(&request), &mapping, &mut rng));
    });
}

criterion_group!(benches, bench_pattern_algorithms, bench_curriculum_pipeline);
criterion_main!(benches);
