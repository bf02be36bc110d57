use super::hue_for;
use crate::constants::*;
use crate::particles::mean_level;
use crate::surface::{Color, Stroke, Surface};
use glam::Vec2;
use std::f32::consts::TAU;

/// A radial line segment from `inner` to `outer`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spoke {
    pub inner: Vec2,
    pub outer: Vec2,
    pub hue: f32,
}

fn spokes(freq: &[u8], center: Vec2, base: f32, max_extra: f32) -> Vec<Spoke> {
    let n = freq.len();
    freq.iter()
        .enumerate()
        .map(|(i, &m)| {
            let angle = i as f32 / n as f32 * TAU;
            let dir = Vec2::new(angle.cos(), angle.sin());
            let len = (m as f32 / 255.0) * max_extra;
            Spoke {
                inner: center + dir * base,
                outer: center + dir * (base + len),
                hue: hue_for(i, n),
            }
        })
        .collect()
}

pub fn radial_bar_spokes(freq: &[u8], center: Vec2, sensitivity: f32) -> Vec<Spoke> {
    let min = center.x.min(center.y);
    spokes(
        freq,
        center,
        min * RADIAL_BASE_RADIUS,
        min * RADIAL_MAX_EXTRA * sensitivity,
    )
}

/// Pulsing centre disc of the radial bars: (radius, alpha).
pub fn radial_disc(freq: &[u8], center: Vec2) -> (f32, f32) {
    let avg = mean_level(freq);
    let base = center.x.min(center.y) * RADIAL_BASE_RADIUS;
    (base * RADIAL_DISC_SCALE + avg * RADIAL_DISC_PULSE_PX, 0.2 + avg * 0.5)
}

pub fn circular_ticks(freq: &[u8], center: Vec2, sensitivity: f32) -> Vec<Spoke> {
    let radius = center.x.min(center.y) * CIRCLE_RING_RADIUS;
    spokes(freq, center, radius, radius * sensitivity)
}

pub fn draw_radial_bars(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
    let center = surface.center();
    for s in radial_bar_spokes(freq, center, sensitivity) {
        surface.stroke_path(
            &[s.inner, s.outer],
            false,
            Stroke::new(Color::hsl(s.hue, 100.0, 60.0), 2.0),
        );
    }
    let (radius, alpha) = radial_disc(freq, center);
    surface.fill_circle(center, radius, Color::rgba(0, 255, 65, alpha));
}

pub fn draw_circular(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
    let center = surface.center();
    for s in circular_ticks(freq, center, sensitivity) {
        surface.stroke_path(
            &[s.inner, s.outer],
            false,
            Stroke::new(Color::hsl(s.hue, 100.0, 50.0), 2.0),
        );
    }
}
