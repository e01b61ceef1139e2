use std::cell::RefCell;
use std::rc::Rc;

use glide_animation::{
    AnimationConfig, AnimationCurve, AnimationEngine, AnimationPath, Callbacks, FrameValues,
    ManualHost, OutputId, TransitionKind,
};

const OUT: OutputId = OutputId(9);

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn mk_engine(phases_ms: &[u32]) -> (AnimationEngine, ManualHost, Rc<RefCell<Vec<FrameValues>>>) {
    let phases = phases_ms
        .iter()
        .map(|ms| AnimationCurve::linear(*ms).unwrap())
        .collect();
    let mut config = AnimationConfig::default();
    config.set_path(TransitionKind::WindowMove, AnimationPath::with_phases(phases));

    let seen: Rc<RefCell<Vec<FrameValues>>> = Rc::default();
    let s = seen.clone();
    let mut host = ManualHost::with_outputs([OUT]);
    let mut engine = AnimationEngine::new(config);
    engine.add_all_outputs(&host);
    engine.set_type(TransitionKind::WindowMove);
    engine.set_callbacks(Callbacks::new().on_step(move |v| s.borrow_mut().push(*v)));
    engine.begin(&mut host);
    (engine, host, seen)
}

fn frame_at(engine: &mut AnimationEngine, host: &mut ManualHost, advance_ms: u64) -> f64 {
    host.advance_ms(advance_ms);
    engine.animate(OUT, host);
    engine.elapsed()
}

#[test]
fn phase_boundaries_carry_time_exactly() {
    let (mut engine, mut host, seen) = mk_engine(&[100, 200]);

    approx(frame_at(&mut engine, &mut host, 50), 0.5, 1e-12);
    // 150 ms in: 50 ms into the 200 ms second phase
    approx(frame_at(&mut engine, &mut host, 100), 0.25, 1e-12);
    // exactly at the end of the last phase the path has not yet ended
    approx(frame_at(&mut engine, &mut host, 150), 1.0, 1e-12);
    assert!(engine.is_running());
    assert!(engine.values().is_terminal());

    approx(frame_at(&mut engine, &mut host, 1), 1.0, 1e-12);
    assert!(!engine.is_running());

    let ts: Vec<f64> = seen.borrow().iter().map(|v| v.t).collect();
    assert_eq!(ts.len(), 4);
    approx(ts[0], 0.5, 1e-12);
    approx(ts[1], 0.25, 1e-12);
    assert_eq!(ts[2], 1.0);
    assert_eq!(ts[3], 1.0);
}

#[test]
fn a_late_frame_skips_whole_phases() {
    let (mut engine, mut host, _) = mk_engine(&[40, 40, 100]);
    // 130 ms: past the first two phases, 50 ms into the third
    approx(frame_at(&mut engine, &mut host, 130), 0.5, 1e-12);
    assert!(engine.is_running());
}

#[test]
fn a_very_late_frame_ends_immediately() {
    let (mut engine, mut host, seen) = mk_engine(&[40, 40]);
    frame_at(&mut engine, &mut host, 10_000);
    assert!(!engine.is_running());
    assert_eq!(seen.borrow().as_slice(), &[FrameValues::TERMINAL]);
}

#[test]
fn replaying_a_path_starts_from_the_first_phase() {
    let (mut engine, mut host, seen) = mk_engine(&[50, 50]);
    frame_at(&mut engine, &mut host, 500);
    assert!(!engine.is_running());

    engine.add_output(OUT);
    engine.set_type(TransitionKind::WindowMove);
    engine.set_callbacks(Callbacks::new().on_step({
        let s = seen.clone();
        move |v| s.borrow_mut().push(*v)
    }));
    engine.begin(&mut host);
    approx(frame_at(&mut engine, &mut host, 10), 0.2, 1e-12);
    assert_eq!(
        engine
            .config()
            .resolve(TransitionKind::WindowMove)
            .cursor(),
        0
    );
}
