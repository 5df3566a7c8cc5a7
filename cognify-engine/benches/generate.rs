use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use cognify_engine::{SessionConfig, TrialScheduler, aggregate, sequence};
use cognify_engine::{SessionEvent, session_result};
use cognify_core::TrialPhase;
use cognify_timing::{ManualTimer, Timer};

/// Sequence generation for each task preset.
pub fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group
        .sample_size(100)
        .warm_up_time(Duration::from_secs(1));

    let presets = [
        ("nback2", SessionConfig::nback(2)),
        ("nback3", SessionConfig::nback(3)),
        ("flanker", SessionConfig::flanker()),
        ("stroop", SessionConfig::stroop()),
    ];
    for (name, config) in presets {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(sequence::generate(black_box(config), &mut rng)));
        });
    }

    // Longer n-back runs stress the anchor placement and letter filtering.
    for trials in [100usize, 1000] {
        let config = SessionConfig {
            total_trials: trials,
            ..SessionConfig::nback(3)
        };
        group.bench_with_input(BenchmarkId::new("nback3_long", trials), &config, |b, config| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(sequence::generate(config, &mut rng)));
        });
    }
    group.finish();
}

/// A full flanker session on a manual clock, from generation to metrics.
pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    group.sample_size(60);

    group.bench_function("flanker_all_correct", |b| {
        b.iter_batched(
            || {
                let timer = ManualTimer::new();
                let mut rng = StdRng::seed_from_u64(3);
                let s = TrialScheduler::generate(
                    SessionConfig::flanker(),
                    &mut rng,
                    timer.clone(),
                    Vec::<SessionEvent>::new(),
                )
                .unwrap();
                (s, timer)
            },
            |(mut s, timer)| {
                s.start();
                while !s.phase().is_terminal() {
                    if let TrialPhase::StimulusVisible { trial, .. } = s.phase() {
                        let expected = s.sequence()[trial].expected_response();
                        if let Some(value) = expected {
                            timer.advance_ms(400);
                            s.submit_response(value);
                            continue;
                        }
                    }
                    if let Some(deadline) = s.next_deadline() {
                        timer.set_ns(deadline.max(timer.now()));
                    }
                    s.poll();
                }
                let events = s.into_observer();
                black_box(session_result(&events).map(aggregate))
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_generate, bench_session);
criterion_main!(benches);
