//! Per-refresh frame driver.
//!
//! The host calls [`FrameScheduler::tick`] from its animation callback. A tick
//! pulls samples, washes the surface, dispatches to the active mode's renderer
//! and finally overlays particles.

use crate::error::Result;
use crate::gpu::{GpuUniforms, ShaderRenderer, SurfaceSlot};
use crate::modes::RenderMode;
use crate::particles::ParticleSystem;
use crate::render2d::*;
use crate::state::{AnalysisSettings, EngineState, GpuStatus};
use crate::surface::Surface;
use instant::Instant;

/// Analyser the scheduler pulls from. Buffers are resized by the source.
pub trait SampleSource {
    /// Takes effect on the next pull.
    fn configure(&mut self, settings: AnalysisSettings);
    /// `fft_size / 2` magnitudes in 0..=255.
    fn frequency_data(&mut self, out: &mut Vec<u8>);
    /// `fft_size` samples centred at 128.
    fn time_domain_data(&mut self, out: &mut Vec<u8>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Stopped, or no source attached.
    Idle,
    Drawn(RenderMode),
    Shaded(RenderMode),
    /// GPU mode selected but the device is not ready yet.
    GpuPending(RenderMode),
}

/// Everything one tick touches besides the scheduler itself.
pub struct FrameTargets<'a> {
    pub source: Option<&'a mut dyn SampleSource>,
    pub surface: &'a mut dyn Surface,
    pub gpu: Option<&'a mut dyn ShaderRenderer>,
    pub slot: SurfaceSlot,
}

pub struct FrameScheduler {
    running: bool,
    applied: Option<AnalysisSettings>,
    freq: Vec<u8>,
    time: Vec<u8>,
    particles: ParticleSystem,
    surface_size: (u32, u32),
    last_instant: Option<Instant>,
    elapsed_sec: f32,
}

impl FrameScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            running: false,
            applied: None,
            freq: Vec::new(),
            time: Vec::new(),
            particles: ParticleSystem::new(seed),
            surface_size: (0, 0),
            last_instant: None,
            elapsed_sec: 0.0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    #[inline]
    pub fn elapsed_sec(&self) -> f32 {
        self.elapsed_sec
    }

    pub fn start(&mut self, surface: &dyn Surface) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_instant = None;
        // pool survives pause/resume; only a new size reseeds it
        self.reseed_on_resize(surface.size());
        log::info!("[frame] start {}x{}", self.surface_size.0, self.surface_size.1);
    }

    /// Stop ticking and leave one fade wash on the surface. Idempotent.
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        if !self.running {
            return;
        }
        self.running = false;
        fade(surface);
        log::info!("[frame] stop");
    }

    /// Forget the applied analysis settings so the next tick re-sends them,
    /// e.g. after the host swaps its source.
    pub fn invalidate_source(&mut self) {
        self.applied = None;
    }

    fn reseed_on_resize(&mut self, size: (u32, u32)) {
        if size != self.surface_size {
            self.surface_size = size;
            self.particles.reseed(size.0 as f32, size.1 as f32);
        }
    }

    fn advance_clock(&mut self, now: Instant) {
        if let Some(last) = self.last_instant {
            if now > last {
                self.elapsed_sec += (now - last).as_secs_f32();
            }
        }
        self.last_instant = Some(now);
    }

    pub fn tick(
        &mut self,
        now: Instant,
        state: &EngineState,
        targets: FrameTargets<'_>,
    ) -> Result<FrameOutcome> {
        if !self.running {
            return Ok(FrameOutcome::Idle);
        }
        let FrameTargets {
            source,
            surface,
            gpu,
            slot,
        } = targets;
        let Some(source) = source else {
            return Ok(FrameOutcome::Idle);
        };
        self.advance_clock(now);

        if self.applied != Some(state.analysis) {
            source.configure(state.analysis);
            self.applied = Some(state.analysis);
        }
        source.frequency_data(&mut self.freq);

        let size = surface.size();
        self.reseed_on_resize(size);

        let mode = state.mode;
        if mode.is_gpu() {
            surface.clear();
        } else if !mode.owns_persistence() {
            fade(surface);
        }

        let sens = state.sensitivity;
        let freq = self.freq.as_slice();
        let outcome = match mode {
            RenderMode::Bars => {
                draw_bars(surface, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Wave => {
                source.time_domain_data(&mut self.time);
                draw_waveform(surface, &self.time);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Circle => {
                draw_circular(surface, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Spiral => {
                draw_spiral(surface, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Particles => {
                draw_particle_burst(surface, &mut self.particles, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::DualBars => {
                draw_dual_bars(surface, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::RadialBars => {
                draw_radial_bars(surface, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Spectrogram => {
                draw_spectrogram(surface, freq, sens);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Lissajous => {
                source.time_domain_data(&mut self.time);
                draw_lissajous(surface, &self.time);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Tunnel => {
                draw_tunnel(surface, freq, sens, self.elapsed_sec);
                FrameOutcome::Drawn(mode)
            }
            RenderMode::Ring
            | RenderMode::FlowField
            | RenderMode::PulseGrid
            | RenderMode::CenterFlow => match (gpu, mode.gpu_program()) {
                (Some(renderer), Some(program)) if state.gpu == GpuStatus::Ready => {
                    let (w, h) = size;
                    renderer.resize(slot, w, h);
                    let uniforms = GpuUniforms::new(self.elapsed_sec, freq, sens, w, h, program);
                    renderer.render(slot, &uniforms)?;
                    FrameOutcome::Shaded(mode)
                }
                _ => FrameOutcome::GpuPending(mode),
            },
        };

        if state.particles && mode != RenderMode::Particles {
            self.particles.step(surface, &self.freq, sens);
        }
        Ok(outcome)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(0x00C0_FFEE)
    }
}
