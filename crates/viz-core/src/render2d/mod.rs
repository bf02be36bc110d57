//! Procedural canvas-2D renderers, one per 2D mode.
//!
//! Each renderer splits into a pure geometry function (tested on the host) and
//! a `draw_*` function that issues the strokes and fills on a [`Surface`].
//! All of them except the spectrogram expect the frame to have been washed
//! with [`fade`] first, which leaves motion trails instead of a hard clear.

mod bars;
mod radial;
mod spectrogram;
mod traces;
mod tunnel;

pub use bars::*;
pub use radial::*;
pub use spectrogram::*;
pub use traces::*;
pub use tunnel::*;

use crate::constants::{FADE_FILL_ALPHA, FADE_FILL_RGB};
use crate::particles::ParticleSystem;
use crate::surface::Surface;

/// Per-frame fade-trail wash.
#[inline]
pub fn fade(surface: &mut dyn Surface) {
    surface.wash(FADE_FILL_RGB, FADE_FILL_ALPHA);
}

#[inline]
pub(crate) fn hue_for(index: usize, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        index as f32 / count as f32 * 360.0
    }
}

/// Particles mode: burst from the centre on loud bins, then the shared step.
pub fn draw_particle_burst(
    surface: &mut dyn Surface,
    particles: &mut ParticleSystem,
    freq: &[u8],
    sensitivity: f32,
) {
    let center = surface.center();
    particles.spawn_from_spectrum(freq, sensitivity, center);
    particles.step(surface, freq, sensitivity);
}
