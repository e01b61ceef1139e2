use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use glide_animation::{
    AnimationCurve, AnimationEngine, Callbacks, Curve, ManualHost, OutputId,
};

const EASE_OUT: [f64; 4] = [0.215, 0.61, 0.355, 1.0];
const QUARTIC: [f64; 6] = [0.2, 0.0, 0.4, 1.4, 0.7, 1.1];

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_arc_length_cubic", |b| {
        b.iter(|| Curve::variable(3, black_box(&EASE_OUT), false))
    });
    c.bench_function("build_arc_length_quartic", |b| {
        b.iter(|| Curve::variable(4, black_box(&QUARTIC), false))
    });
    c.bench_function("build_simple_cubic", |b| {
        b.iter(|| Curve::variable(3, black_box(&[0.42, 0.0, 0.58, 1.0]), true))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let phase = match AnimationCurve::from_points(300, 3, &EASE_OUT, false, 0.2, 2, &[0.5, 1.0]) {
        Ok(phase) => phase,
        Err(err) => panic!("bench curve rejected: {err}"),
    };
    c.bench_function("phase_values_sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..=100 {
                acc += phase.values(black_box(i as f64 / 100.0)).t;
            }
            acc
        })
    });
}

fn bench_engine(c: &mut Criterion) {
    c.bench_function("engine_full_transition_4_outputs", |b| {
        b.iter(|| {
            let outputs = (0..4).map(OutputId);
            let mut host = ManualHost::with_outputs(outputs);
            let mut engine = AnimationEngine::default();
            engine.add_all_outputs(&host);
            engine.set_callbacks(Callbacks::new().on_step(|v| {
                black_box(v);
            }));
            engine.begin(&mut host);
            while engine.is_running() {
                host.tick(&mut engine, Duration::from_millis(16));
            }
        })
    });
}

criterion_group!(benches, bench_build, bench_evaluate, bench_engine);
criterion_main!(benches);
