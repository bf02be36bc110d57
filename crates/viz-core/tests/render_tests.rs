// Host-side tests for the 2D renderers and the frame scheduler, drawn onto a
// PixelSurface with a scripted sample source.

use glam::Vec2;
use instant::Instant;
use std::time::Duration;
use viz_core::render2d::*;
use viz_core::*;

/// Source that returns a constant level for every bin.
struct ConstSource {
    level: u8,
    fft_size: u32,
    configured: Vec<AnalysisSettings>,
}

impl ConstSource {
    fn new(level: u8) -> Self {
        Self {
            level,
            fft_size: 2048,
            configured: Vec::new(),
        }
    }
}

impl SampleSource for ConstSource {
    fn configure(&mut self, settings: AnalysisSettings) {
        self.fft_size = settings.fft_size;
        self.configured.push(settings);
    }

    fn frequency_data(&mut self, out: &mut Vec<u8>) {
        out.clear();
        out.resize((self.fft_size / 2) as usize, self.level);
    }

    fn time_domain_data(&mut self, out: &mut Vec<u8>) {
        out.clear();
        out.resize(self.fft_size as usize, 128);
    }
}

#[derive(Default)]
struct RecordingRenderer {
    sizes: Vec<(SurfaceSlot, u32, u32)>,
    frames: Vec<GpuUniforms>,
}

impl ShaderRenderer for RecordingRenderer {
    fn resize(&mut self, slot: SurfaceSlot, width: u32, height: u32) {
        self.sizes.push((slot, width, height));
    }

    fn render(&mut self, _slot: SurfaceSlot, uniforms: &GpuUniforms) -> viz_core::error::Result<()> {
        self.frames.push(*uniforms);
        Ok(())
    }
}

fn tick(
    scheduler: &mut FrameScheduler,
    state: &EngineState,
    source: &mut ConstSource,
    surface: &mut PixelSurface,
) -> FrameOutcome {
    scheduler
        .tick(
            Instant::now(),
            state,
            FrameTargets {
                source: Some(source),
                surface,
                gpu: None,
                slot: SurfaceSlot::Primary,
            },
        )
        .unwrap()
}

fn distance(a: [u8; 4], b: [u8; 3]) -> u32 {
    (0..3).map(|i| (a[i] as i32 - b[i] as i32).unsigned_abs()).sum()
}

#[test]
fn bar_heights_are_bounded_and_monotone() {
    let freq: Vec<u8> = (0..=255u8).rev().collect();
    let sens = 1.5;
    let (w, h) = (400.0, 200.0);
    let bars = bar_layout(&freq, w, h, sens);
    assert_eq!(bars.len(), freq.len());
    for (bar, &m) in bars.iter().zip(&freq) {
        assert!(bar.height >= 0.0 && bar.height <= h * sens);
        if m == 255 {
            assert!((bar.height - h * sens).abs() < 1e-3);
        }
    }
    // louder bin never gets a shorter bar
    for pair in bars.windows(2) {
        assert!(pair[0].height >= pair[1].height);
    }
    assert!(bar_layout(&[], w, h, sens).is_empty());
}

#[test]
fn silent_spectrogram_darkens_but_never_reaches_black() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::Spectrogram));
    let mut surface = PixelSurface::new(16, 40).unwrap();
    let mut source = ConstSource::new(0);
    let mut scheduler = FrameScheduler::new(9);
    scheduler.start(&surface);
    for _ in 0..30 {
        assert_eq!(
            tick(&mut scheduler, c.state(), &mut source, &mut surface),
            FrameOutcome::Drawn(RenderMode::Spectrogram)
        );
    }

    let bg = constants::SPECTROGRAM_DIM_RGB;
    for x in 0..16 {
        let mut prev = u32::MAX;
        // newest row at the bottom, older rows above it
        for y in (0..40).rev() {
            let px = surface.pixel(x, y).unwrap();
            assert_ne!([px[0], px[1], px[2]], [0, 0, 0], "black at {x},{y}");
            let d = distance(px, bg);
            assert!(d <= prev, "row {y} brighter than the row below");
            prev = d;
        }
    }
}

#[test]
fn particle_pool_stays_capped() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::Particles));
    let mut surface = PixelSurface::new(64, 64).unwrap();
    let mut source = ConstSource::new(255);
    let mut scheduler = FrameScheduler::new(5);
    scheduler.start(&surface);
    assert_eq!(scheduler.particles().len(), constants::PARTICLE_SEED_COUNT);
    for _ in 0..120 {
        tick(&mut scheduler, c.state(), &mut source, &mut surface);
        assert!(scheduler.particles().len() <= constants::PARTICLE_CAP);
    }
}

#[test]
fn resize_then_render_fills_exactly_the_new_size() {
    let c = ModeController::new(1);
    let mut surface = PixelSurface::new(8, 8).unwrap();
    let mut source = ConstSource::new(90);
    let mut scheduler = FrameScheduler::new(5);
    scheduler.start(&surface);
    tick(&mut scheduler, c.state(), &mut source, &mut surface);

    surface.resize(20, 10).unwrap();
    tick(&mut scheduler, c.state(), &mut source, &mut surface);
    assert_eq!(surface.as_rgba().len(), 20 * 10 * 4);
    for y in 0..10 {
        for x in 0..20 {
            let px = surface.pixel(x, y).unwrap();
            assert!(px[3] > 0, "unpainted pixel at {x},{y}");
        }
    }
    assert!(surface.pixel(20, 0).is_none());
}

#[test]
fn analysis_settings_are_forwarded_only_on_change() {
    let mut c = ModeController::new(1);
    let mut surface = PixelSurface::new(32, 16).unwrap();
    let mut source = ConstSource::new(10);
    let mut scheduler = FrameScheduler::new(5);
    scheduler.start(&surface);
    for _ in 0..3 {
        tick(&mut scheduler, c.state(), &mut source, &mut surface);
    }
    assert_eq!(source.configured.len(), 1);
    assert_eq!(source.configured[0].fft_size, 256);

    assert!(c.set_mode(RenderMode::Wave));
    tick(&mut scheduler, c.state(), &mut source, &mut surface);
    assert_eq!(source.configured.len(), 2);
    assert_eq!(source.configured[1].fft_size, 2048);
}

#[test]
fn no_source_or_stopped_is_idle() {
    let c = ModeController::new(1);
    let mut surface = PixelSurface::new(4, 4).unwrap();
    let mut scheduler = FrameScheduler::new(5);
    let mut source = ConstSource::new(200);
    assert_eq!(
        tick(&mut scheduler, c.state(), &mut source, &mut surface),
        FrameOutcome::Idle
    );

    scheduler.start(&surface);
    let outcome = scheduler
        .tick(
            Instant::now(),
            c.state(),
            FrameTargets {
                source: None,
                surface: &mut surface,
                gpu: None,
                slot: SurfaceSlot::Primary,
            },
        )
        .unwrap();
    assert_eq!(outcome, FrameOutcome::Idle);
    assert!(surface.as_rgba().iter().all(|&b| b == 0));
}

#[test]
fn stop_leaves_one_fade_and_is_idempotent() {
    let c = ModeController::new(1);
    let mut surface = PixelSurface::new(4, 4).unwrap();
    let mut scheduler = FrameScheduler::new(5);
    scheduler.start(&surface);
    scheduler.stop(&mut surface);
    assert!(!scheduler.is_running());
    let once = surface.as_rgba().to_vec();
    assert!(once.iter().skip(3).step_by(4).all(|&a| a > 0));
    scheduler.stop(&mut surface);
    assert_eq!(surface.as_rgba(), once.as_slice());

    let mut source = ConstSource::new(200);
    assert_eq!(
        tick(&mut scheduler, c.state(), &mut source, &mut surface),
        FrameOutcome::Idle
    );
}

#[test]
fn gpu_mode_waits_for_device_then_shades() {
    let mut c = ModeController::new(1);
    assert!(c.set_mode(RenderMode::PulseGrid));
    let mut surface = PixelSurface::new(30, 20).unwrap();
    let mut source = ConstSource::new(255);
    let mut renderer = RecordingRenderer::default();
    let mut scheduler = FrameScheduler::new(5);
    scheduler.start(&surface);

    let t0 = Instant::now();
    let pending = scheduler
        .tick(
            t0,
            c.state(),
            FrameTargets {
                source: Some(&mut source),
                surface: &mut surface,
                gpu: Some(&mut renderer),
                slot: SurfaceSlot::Fullscreen,
            },
        )
        .unwrap();
    assert_eq!(pending, FrameOutcome::GpuPending(RenderMode::PulseGrid));
    assert!(renderer.frames.is_empty());
    // 2D overlay was hard-cleared and pulse grid has no particles
    assert!(surface.as_rgba().iter().all(|&b| b == 0));

    c.gpu_ready();
    let shaded = scheduler
        .tick(
            t0 + Duration::from_millis(500),
            c.state(),
            FrameTargets {
                source: Some(&mut source),
                surface: &mut surface,
                gpu: Some(&mut renderer),
                slot: SurfaceSlot::Fullscreen,
            },
        )
        .unwrap();
    assert_eq!(shaded, FrameOutcome::Shaded(RenderMode::PulseGrid));
    assert_eq!(renderer.sizes, vec![(SurfaceSlot::Fullscreen, 30, 20)]);
    let u = renderer.frames[0];
    assert_eq!(u.mode, 2);
    assert!((u.time - 0.5).abs() < 1e-3);
    assert!((u.amplitude - 1.1).abs() < 1e-5);
}

#[test]
fn every_2d_mode_paints_something() {
    for mode in RenderMode::ALL.into_iter().filter(|m| !m.is_gpu()) {
        let mut c = ModeController::new(1);
        assert!(c.set_mode(mode));
        c.set_particles_enabled(false);
        let mut surface = PixelSurface::new(48, 32).unwrap();
        let mut source = ConstSource::new(180);
        let mut scheduler = FrameScheduler::new(5);
        scheduler.start(&surface);
        let before = surface.as_rgba().to_vec();
        tick(&mut scheduler, c.state(), &mut source, &mut surface);
        assert_ne!(surface.as_rgba(), before.as_slice(), "{mode}");
    }
}

#[test]
fn stripe_spans_the_width() {
    let stripe = spectrogram_stripe(&[0, 255], 10, 1.0);
    assert_eq!(stripe.len(), 10);
    assert!(spectrogram_lightness(0, 1.0) >= constants::SPECTROGRAM_LIGHTNESS_MIN);
    assert!(spectrogram_lightness(255, 3.0) <= constants::SPECTROGRAM_LIGHTNESS_MAX);
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn close_vec(a: Vec2, b: Vec2) -> bool {
    close(a.x, b.x) && close(a.y, b.y)
}

#[test]
fn dual_bars_use_scaled_half_height() {
    let bars = dual_bar_layout(&[255, 128, 0], 300.0, 200.0, 2.0);
    assert_eq!(bars.len(), 3);
    assert!(close(bars[0].height, 200.0 * 0.45 * 2.0));
    assert!(close(bars[1].height, 128.0 / 255.0 * 200.0 * 0.45 * 2.0));
    assert_eq!(bars[2].height, 0.0);
    assert!(close(bars[0].width, 300.0 / 3.0 * 2.2));
}

#[test]
fn dual_bars_mirror_around_the_centreline() {
    let mut surface = PixelSurface::new(40, 40).unwrap();
    draw_dual_bars(&mut surface, &[255; 4], 1.0);
    // 0.45 * 40 = 18px above and below row 20
    for y in 2..38 {
        assert!(surface.pixel(1, y).unwrap()[3] > 0, "row {y} empty");
    }
    for y in [0, 1, 38, 39] {
        assert_eq!(surface.pixel(1, y).unwrap()[3], 0, "row {y} painted");
    }
}

#[test]
fn radial_spokes_start_at_base_radius() {
    let center = Vec2::new(100.0, 50.0);
    let spokes = radial_bar_spokes(&[255, 0, 0, 0], center, 1.0);
    assert_eq!(spokes.len(), 4);
    // min(cx, cy) = 50: base 15, full extra 30
    assert!(close_vec(spokes[0].inner, Vec2::new(115.0, 50.0)));
    assert!(close_vec(spokes[0].outer, Vec2::new(145.0, 50.0)));
    assert!(close_vec(spokes[1].inner, Vec2::new(100.0, 65.0)));
    assert!(close_vec(spokes[1].outer, spokes[1].inner));
    assert!(close(spokes[2].hue, 180.0));
}

#[test]
fn radial_disc_pulses_with_the_mean_level() {
    let center = Vec2::new(100.0, 50.0);
    let (quiet_r, quiet_a) = radial_disc(&[0; 4], center);
    assert!(close(quiet_r, 0.6 * 15.0));
    assert!(close(quiet_a, 0.2));
    let (loud_r, loud_a) = radial_disc(&[255; 4], center);
    assert!(close(loud_r, 0.6 * 15.0 + 20.0));
    assert!(close(loud_a, 0.7));
}

#[test]
fn circular_ticks_grow_from_the_ring() {
    let center = Vec2::new(50.0, 50.0);
    let ticks = circular_ticks(&[255, 0], center, 0.5);
    assert!(close_vec(ticks[0].inner, Vec2::new(90.0, 50.0)));
    assert!(close(ticks[0].outer.distance(ticks[0].inner), 40.0 * 0.5));
    assert!(close_vec(ticks[1].inner, Vec2::new(10.0, 50.0)));
    assert!(close_vec(ticks[1].outer, ticks[1].inner));
}

#[test]
fn waveform_centre_value_sits_on_the_mid_line() {
    let points = waveform_points(&[128, 0, 255, 128], 100.0, 50.0);
    assert_eq!(points.len(), 4);
    assert!(close_vec(points[0], Vec2::new(0.0, 25.0)));
    assert!(close_vec(points[1], Vec2::new(25.0, 0.0)));
    assert!(close(points[2].y, 255.0 / 128.0 * 25.0));
    assert!(close(points[3].x, 75.0));
    assert!(waveform_points(&[], 100.0, 50.0).is_empty());
}

#[test]
fn spiral_sweeps_four_turns_and_widens() {
    let center = Vec2::new(100.0, 100.0);
    let quiet = spiral_points(&[0; 64], center, 1.0);
    assert_eq!(quiet.len(), 64);
    // max radius 0.8 * 100; a quarter of the bins is a full turn
    assert!(close_vec(quiet[8], Vec2::new(90.0, 100.0)));
    assert!(close_vec(quiet[16], Vec2::new(120.0, 100.0)));
    assert!(close_vec(quiet[48], Vec2::new(160.0, 100.0)));
    for pair in quiet.windows(2) {
        assert!(pair[1].distance(center) > pair[0].distance(center));
    }
    let loud = spiral_points(&[255; 64], center, 1.0);
    assert!(close(loud[16].distance(center), 20.0 + 50.0));
}

#[test]
fn lissajous_pairs_samples_a_quarter_buffer_apart() {
    let time = [128, 0, 255, 128, 128, 128, 128, 128];
    let points = lissajous_points(&time, 100.0, 100.0);
    assert_eq!(points.len(), time.len() - time.len() / 4);
    assert!(close(points[0].x, 50.0));
    assert!(close(points[0].y, 50.0 + 127.0 / 128.0 * 45.0));
    assert!(close(points[1].x, 50.0 - 45.0));
    assert!(lissajous_points(&[], 100.0, 100.0).is_empty());
}

#[test]
fn tunnel_rings_shrink_inward_and_fade() {
    let center = Vec2::new(400.0, 320.0);
    let rings = tunnel_rings(center, 0.0, 0.0, 0.0);
    assert_eq!(rings.len(), 20);
    let mean_radius = |ring: &TunnelRing| {
        ring.points.iter().map(|p| p.distance(center)).sum::<f32>() / ring.points.len() as f32
    };
    for (i, ring) in rings.iter().enumerate() {
        let t = i as f32 / 20.0;
        assert_eq!(ring.points.len(), 24);
        assert!(close(ring.alpha, 0.6 - 0.5 * t));
        assert!(close(ring.hue, t * 360.0));
        assert!((mean_radius(ring) - (1.0 - t) * 320.0).abs() < 1e-2);
    }
    for pair in rings.windows(2) {
        assert!(mean_radius(&pair[1]) < mean_radius(&pair[0]));
    }
    let later = tunnel_rings(center, 0.0, 1.0, 0.0);
    assert!(close(later[0].hue, 20.0));
}

#[test]
fn particles_survive_pause_and_resume() {
    let mut c = ModeController::new(1);
    c.set_particles_enabled(true);
    let mut surface = PixelSurface::new(64, 64).unwrap();
    let mut source = ConstSource::new(0);
    let mut scheduler = FrameScheduler::new(5);
    scheduler.start(&surface);
    for _ in 0..10 {
        tick(&mut scheduler, c.state(), &mut source, &mut surface);
    }
    let before: Vec<Vec2> = scheduler.particles().iter().map(|p| p.pos).collect();

    scheduler.stop(&mut surface);
    scheduler.start(&surface);
    let after: Vec<Vec2> = scheduler.particles().iter().map(|p| p.pos).collect();
    assert_eq!(before, after);

    // a new size still reseeds
    surface.resize(32, 32).unwrap();
    scheduler.stop(&mut surface);
    scheduler.start(&surface);
    assert_eq!(scheduler.particles().len(), constants::PARTICLE_SEED_COUNT);
}
