// Host-side tests for mode selection, filtering, auto-cycling and settings.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use instant::Instant;
use viz_core::*;

#[test]
fn random_pick_never_repeats_and_covers_the_others() {
    let mut c = ModeController::new(42);
    c.set_mode_filter([RenderMode::Bars, RenderMode::Wave, RenderMode::Circle]);
    assert_eq!(c.mode(), RenderMode::Bars);

    let mut seen = BTreeSet::new();
    for _ in 0..200 {
        assert!(c.set_mode(RenderMode::Bars));
        let picked = c.pick_random_mode();
        assert_ne!(picked, RenderMode::Bars);
        seen.insert(picked);
    }
    assert_eq!(
        seen.into_iter().collect::<Vec<_>>(),
        vec![RenderMode::Wave, RenderMode::Circle]
    );
}

#[test]
fn random_pick_walk_touches_every_mode() {
    let mut c = ModeController::new(3);
    let mut seen = BTreeSet::new();
    let mut prev = c.mode();
    for _ in 0..1000 {
        let next = c.pick_random_mode();
        assert_ne!(next, prev);
        seen.insert(next);
        prev = next;
    }
    assert_eq!(seen.len(), RenderMode::ALL.len());
}

#[test]
fn single_candidate_is_selected() {
    let mut c = ModeController::new(1);
    c.set_mode_filter([RenderMode::Lissajous]);
    assert_eq!(c.mode(), RenderMode::Lissajous);
    assert_eq!(c.pick_random_mode(), RenderMode::Lissajous);
}

#[test]
fn empty_filter_keeps_the_active_mode() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::Tunnel));
    c.set_mode_filter(std::iter::empty());
    assert_eq!(c.mode(), RenderMode::Tunnel);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Tunnel]);

    // "None" button behaves the same way
    c.set_mode_filter_all(false);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Tunnel]);

    // unchecking the last box too
    c.set_mode_enabled(RenderMode::Tunnel, false);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Tunnel]);

    c.set_mode_filter_all(true);
    assert_eq!(c.filtered_modes().len(), RenderMode::ALL.len());
}

#[test]
fn excluding_the_active_mode_switches_to_first_filtered() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::Spiral));
    c.set_mode_filter([RenderMode::Tunnel, RenderMode::Wave]);
    assert_eq!(c.mode(), RenderMode::Wave);
    // wave's defaults were applied
    assert_eq!(c.state().analysis.fft_size, 2048);
    assert!(!c.state().particles);
}

#[test]
fn set_mode_outside_filter_is_ignored() {
    let mut c = ModeController::new(1);
    c.set_mode_filter([RenderMode::Bars, RenderMode::Wave]);
    assert!(!c.set_mode(RenderMode::Tunnel));
    assert_eq!(c.mode(), RenderMode::Bars);
}

#[test]
fn set_mode_applies_defaults() {
    let mut c = ModeController::new(1);
    c.set_sensitivity(2.5);
    assert!(c.set_mode(RenderMode::Tunnel));
    let s = c.state();
    assert_eq!(s.sensitivity, 1.3);
    assert!(s.particles);
    assert_eq!(s.analysis.fft_size, 256);
    assert!((s.analysis.smoothing - 0.7).abs() < 1e-6);
}

#[test]
fn unknown_id_is_an_error_not_a_fallback() {
    let mut c = ModeController::new(1);
    let err = c.set_mode_by_id("warp").unwrap_err();
    assert_eq!(err, VizError::UnknownMode("warp".into()));
    assert_eq!(c.mode(), RenderMode::Bars);
    assert_eq!(c.set_mode_by_id("spectrogram"), Ok(true));
    assert_eq!(c.mode(), RenderMode::Spectrogram);
}

#[test]
fn ordered_cycle_wraps_in_registry_order() {
    let mut c = ModeController::new(1);
    c.set_mode_filter([RenderMode::Tunnel, RenderMode::Circle, RenderMode::Wave]);
    assert_eq!(c.mode(), RenderMode::Wave);
    let seq: Vec<_> = (0..4).map(|_| c.advance_ordered_mode()).collect();
    assert_eq!(
        seq,
        vec![
            RenderMode::Circle,
            RenderMode::Tunnel,
            RenderMode::Wave,
            RenderMode::Circle
        ]
    );
}

#[test]
fn auto_cycle_ignores_stale_timers() {
    let mut c = ModeController::new(1);
    c.set_mode_filter([RenderMode::Bars, RenderMode::Wave, RenderMode::Circle]);
    c.set_cycle_order(CycleOrder::Ordered);

    // starting advances immediately
    let first = c.start_auto_cycle(1);
    assert_eq!(first.period, Duration::from_secs(2));
    assert_eq!(c.mode(), RenderMode::Wave);

    assert!(c.on_cycle_timer(first.generation));
    assert_eq!(c.mode(), RenderMode::Circle);

    // restart replaces the live timer
    let second = c.start_auto_cycle(90);
    assert_ne!(first.generation, second.generation);
    assert_eq!(second.period, Duration::from_secs(60));
    assert_eq!(c.mode(), RenderMode::Bars);
    assert!(!c.on_cycle_timer(first.generation));
    assert_eq!(c.mode(), RenderMode::Bars);

    c.stop_auto_cycle();
    assert_eq!(c.cycle_schedule(), None);
    assert!(!c.on_cycle_timer(second.generation));
    // stopping twice is harmless
    c.stop_auto_cycle();
}

#[test]
fn filter_change_restarts_running_cycle() {
    let mut c = ModeController::new(1);
    c.set_cycle_order(CycleOrder::Ordered);
    let before = c.start_auto_cycle(10);
    c.set_mode_filter([RenderMode::Bars, RenderMode::Spiral]);
    let after = c.cycle_schedule().map(|s| s.generation);
    assert!(after.is_some_and(|g| g > before.generation));
}

#[test]
fn gpu_mode_requests_init_once() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::Ring));
    assert_eq!(c.state().gpu, GpuStatus::Pending);
    assert!(c.take_gpu_request());
    assert!(!c.take_gpu_request());

    c.gpu_ready();
    assert!(c.set_mode(RenderMode::PulseGrid));
    assert_eq!(c.state().gpu, GpuStatus::Ready);
    assert!(!c.take_gpu_request());
}

#[test]
fn gpu_unsupported_falls_back_to_bars() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::FlowField));
    c.gpu_unavailable(&VizError::GpuUnavailable("no adapter".into()));
    assert_eq!(c.mode(), RenderMode::Bars);
    assert_eq!(c.state().gpu, GpuStatus::Unsupported);
    assert!(c.filtered_modes().iter().all(|m| !m.is_gpu()));

    // GPU modes cannot come back through the filter
    c.set_mode_filter([RenderMode::Ring, RenderMode::Wave]);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Wave]);
    assert_eq!(c.mode(), RenderMode::Wave);

    // and a direct selection lands on bars
    assert_eq!(c.set_mode_by_id("centerFlow"), Ok(true));
    assert_eq!(c.mode(), RenderMode::Bars);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Bars, RenderMode::Wave]);
}

#[test]
fn gpu_selection_after_failure_ends_in_bars() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::Ring));
    assert!(c.take_gpu_request());
    c.gpu_unavailable(&VizError::GpuUnavailable("no adapter".into()));
    assert!(c.set_mode(RenderMode::Tunnel));
    assert_eq!(c.mode(), RenderMode::Tunnel);

    assert!(c.set_mode(RenderMode::Ring));
    assert_eq!(c.mode(), RenderMode::Bars);
    assert_eq!(c.state().gpu, GpuStatus::Unsupported);
    assert!(!c.take_gpu_request());
    let defaults = RenderMode::Bars.tuning();
    assert_eq!(c.state().sensitivity, defaults.sensitivity);
}

#[test]
fn gpu_unsupported_with_only_gpu_modes_filtered() {
    let mut c = ModeController::new(1);
    c.set_mode_filter([RenderMode::Ring, RenderMode::PulseGrid]);
    assert_eq!(c.mode(), RenderMode::Ring);
    c.gpu_unavailable(&VizError::GpuUnavailable("adapter lost".into()));
    assert_eq!(c.mode(), RenderMode::Bars);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Bars]);
}

#[test]
fn sensitivity_is_clamped() {
    let mut c = ModeController::new(1);
    c.set_sensitivity(10.0);
    assert_eq!(c.state().sensitivity, 3.0);
    c.set_sensitivity(0.0);
    assert!((c.state().sensitivity - 0.1).abs() < 1e-6);
    c.adjust_sensitivity(-1.0);
    assert!((c.state().sensitivity - 0.1).abs() < 1e-6);
    c.reset_mode_defaults();
    assert_eq!(c.state().sensitivity, 1.2);
}

#[test]
fn changes_are_debounced_into_one_event() {
    let mut c = ModeController::new(1);
    let calls = Rc::new(Cell::new(0u32));
    let seen_mode = Rc::new(Cell::new(RenderMode::Bars));
    {
        let calls = calls.clone();
        let seen_mode = seen_mode.clone();
        c.subscribe(move |s| {
            calls.set(calls.get() + 1);
            seen_mode.set(s.mode);
        });
    }
    let rev = c.revision();
    c.set_sensitivity(2.0);
    c.set_particles_enabled(false);
    c.set_mode(RenderMode::Spiral);
    assert!(c.revision() > rev);
    assert!(c.has_pending_change());

    let later = Instant::now() + Duration::from_millis(400);
    assert!(c.flush_changes(later));
    assert!(!c.flush_changes(later));
    assert_eq!(calls.get(), 1);
    assert_eq!(seen_mode.get(), RenderMode::Spiral);
}

#[test]
fn settings_apply_and_export() {
    let s = Settings::from_json_lenient(
        r#"{"mode":"spiral","sensitivity":2.0,"particles":false,"autoCycleSeconds":99,
            "cycleOrder":"ordered","modeFilter":["spiral","wave","nope"]}"#,
    );
    let mut c = ModeController::new(1);
    c.apply_settings(&s);
    let st = c.state();
    assert_eq!(st.mode, RenderMode::Spiral);
    assert_eq!(st.sensitivity, 2.0);
    assert!(!st.particles);
    assert_eq!(st.cycle_interval_sec, 60);
    assert_eq!(st.cycle_order, CycleOrder::Ordered);
    assert!(!st.auto_cycle);
    assert_eq!(c.filtered_modes(), vec![RenderMode::Wave, RenderMode::Spiral]);

    let out = c.to_settings();
    assert_eq!(out.mode.as_deref(), Some("spiral"));
    assert_eq!(
        out.mode_filter,
        Some(vec!["wave".to_string(), "spiral".to_string()])
    );
    assert_eq!(out.auto_cycle_seconds, Some(60));
}

#[test]
fn settings_with_unknown_mode_keep_defaults() {
    let s = Settings::from_json_lenient(r#"{"mode":"warp","autoCycle":true}"#);
    let mut c = ModeController::new(1);
    c.apply_settings(&s);
    assert!(c.state().auto_cycle);
    assert!(c.cycle_schedule().is_some());
}

#[test]
fn parse_mode_ids_rejects_unknown() {
    assert_eq!(
        parse_mode_ids(["bars", "ring"]),
        Ok(vec![RenderMode::Bars, RenderMode::Ring])
    );
    assert!(parse_mode_ids(["bars", "ghost"]).is_err());
}

#[test]
fn key_bindings() {
    assert_eq!(action_for_key("f", false), Some(KeyAction::ToggleFullscreen));
    assert_eq!(action_for_key("f", true), None);
    assert_eq!(action_for_key("F11", true), Some(KeyAction::ToggleFullscreen));
    assert_eq!(action_for_key("Escape", true), Some(KeyAction::ExitFullscreen));
    assert_eq!(action_for_key("Escape", false), None);
    assert_eq!(action_for_key("x", false), None);

    let mut c = ModeController::new(1);
    assert!(!apply_key_action(&mut c, KeyAction::ToggleFullscreen));

    let plus = action_for_key("+", false).unwrap();
    assert!(apply_key_action(&mut c, plus));
    assert!((c.state().sensitivity - 1.3).abs() < 1e-5);

    let p = action_for_key("p", false).unwrap();
    apply_key_action(&mut c, p);
    assert!(!c.state().particles);

    let cycle = action_for_key("c", false).unwrap();
    apply_key_action(&mut c, cycle);
    assert!(c.state().auto_cycle);
    apply_key_action(&mut c, cycle);
    assert!(!c.state().auto_cycle);

    let before = c.mode();
    apply_key_action(&mut c, KeyAction::RandomMode);
    assert_ne!(c.mode(), before);
}
