// Criterion benchmarks for Cofounder Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cofounder_algo::core::{normalize, score, Matcher, RankOptions};
use cofounder_algo::models::{Profile, RawProfile, WeightConfig};
use serde_json::json;

const SKILLS: [&str; 8] = ["Python", "Rust", "Marketing", "Sales", "Design", "Finance", "Legal", "Ops"];
const INTERESTS: [&str; 5] = ["AI", "VR", "Climate", "Health", "Crypto"];
const INDUSTRIES: [&str; 4] = ["FinTech", "SaaS", "EdTech", "Gaming"];
const GOALS: [&str; 3] = ["Secure Series A Funding", "Achieve $1M ARR", "Build a remote team"];
const LEVELS: [&str; 4] = ["Junior", "Mid-level", "Senior", ""];

fn create_raw(id: usize) -> RawProfile {
    RawProfile {
        id: id.to_string(),
        name: Some(format!("Founder {}", id)),
        skills: json!(format!("{}, {}", SKILLS[id % 8], SKILLS[(id / 8) % 8])),
        skill_categories: json!(r#"{"Technical": ["Python"], "Business": ["Sales"]}"#),
        interests: json!([INTERESTS[id % 5], INTERESTS[(id + 2) % 5]]),
        startup_industries: json!(INDUSTRIES[id % 4]),
        startup_goals: json!(format!("{}, {}", GOALS[id % 3], GOALS[(id + 1) % 3])),
        experience_level: Some(LEVELS[id % 4].to_string()),
    }
}

fn create_population(count: usize) -> Vec<Profile> {
    (0..count).map(|i| normalize(&create_raw(i))).collect()
}

fn bench_normalize(c: &mut Criterion) {
    let raw = create_raw(7);
    c.bench_function("normalize_profile", |b| {
        b.iter(|| normalize(black_box(&raw)));
    });
}

fn bench_pairwise_score(c: &mut Criterion) {
    let population = create_population(2);
    let weights = WeightConfig::default();
    c.bench_function("pairwise_score", |b| {
        b.iter(|| score(black_box(&population[0]), black_box(&population[1]), &weights));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let weights = WeightConfig::default();
    let sequential = Matcher::new(RankOptions {
        parallel_threshold: None,
        time_budget: None,
    });
    let parallel = Matcher::new(RankOptions {
        parallel_threshold: Some(0),
        time_budget: None,
    });

    let mut group = c.benchmark_group("ranking");

    for population_size in [10, 100, 1_000, 5_000].iter() {
        let population = create_population(*population_size);

        group.bench_with_input(
            BenchmarkId::new("sequential", population_size),
            population_size,
            |b, _| {
                b.iter(|| sequential.rank(black_box("0"), black_box(&population), &weights, black_box(10)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", population_size),
            population_size,
            |b, _| {
                b.iter(|| parallel.rank(black_box("0"), black_box(&population), &weights, black_box(10)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_pairwise_score, bench_ranking);

criterion_main!(benches);
