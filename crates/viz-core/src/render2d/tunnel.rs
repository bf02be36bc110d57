use crate::constants::*;
use crate::particles::mean_level;
use crate::surface::{Color, Stroke, Surface};
use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::TAU;

#[derive(Clone, Debug)]
pub struct TunnelRing {
    pub points: SmallVec<[Vec2; TUNNEL_SIDES]>,
    pub hue: f32,
    pub alpha: f32,
}

/// Concentric wobbling polygons, outermost first.
pub fn tunnel_rings(
    center: Vec2,
    avg: f32,
    elapsed_sec: f32,
    sensitivity: f32,
) -> Vec<TunnelRing> {
    let min = center.x.min(center.y);
    (0..TUNNEL_LAYERS)
        .map(|i| {
            let layer = i as f32;
            let t = layer / TUNNEL_LAYERS as f32;
            let size = (1.0 - t) * min;
            let wobble = (elapsed_sec / TUNNEL_WOBBLE_PERIOD_SEC + layer + avg * 10.0).sin()
                * TUNNEL_WOBBLE_PX
                * sensitivity;
            let ripple = 5.0 + avg * 30.0;
            let points = (0..TUNNEL_SIDES)
                .map(|k| {
                    let a = k as f32 / TUNNEL_SIDES as f32 * TAU;
                    let r = size + (a * 6.0 + layer).sin() * ripple + wobble;
                    center + Vec2::new(a.cos(), a.sin()) * r
                })
                .collect();
            TunnelRing {
                points,
                hue: (t * 360.0 + elapsed_sec * TUNNEL_HUE_DEG_PER_SEC).rem_euclid(360.0),
                alpha: 0.6 - t * 0.5,
            }
        })
        .collect()
}

pub fn draw_tunnel(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32, elapsed_sec: f32) {
    let avg = mean_level(freq);
    for ring in tunnel_rings(surface.center(), avg, elapsed_sec, sensitivity) {
        surface.stroke_path(
            &ring.points,
            true,
            Stroke::new(Color::hsla(ring.hue, 100.0, 60.0, ring.alpha), 2.0),
        );
    }
}
