use super::hue_for;
use crate::constants::*;
use crate::surface::{Color, Stroke, Surface};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub height: f32,
    pub width: f32,
    pub hue: f32,
}

fn layout(freq: &[u8], surface_width: f32, width_factor: f32, full_height: f32) -> Vec<Bar> {
    let n = freq.len();
    if n == 0 {
        return Vec::new();
    }
    let width = surface_width / n as f32 * width_factor;
    let mut x = 0.0;
    freq.iter()
        .enumerate()
        .map(|(i, &m)| {
            let bar = Bar {
                x,
                height: (m as f32 / 255.0) * full_height,
                width,
                hue: hue_for(i, n),
            };
            x += width + BAR_GAP_PX;
            bar
        })
        .collect()
}

/// One bar per bin, rising from the bottom edge.
pub fn bar_layout(freq: &[u8], width: f32, height: f32, sensitivity: f32) -> Vec<Bar> {
    layout(freq, width, BAR_WIDTH_FACTOR, height * sensitivity)
}

/// Half-height bars mirrored about the horizontal centreline.
pub fn dual_bar_layout(freq: &[u8], width: f32, height: f32, sensitivity: f32) -> Vec<Bar> {
    layout(freq, width, DUAL_BAR_WIDTH_FACTOR, height * DUAL_BAR_SCALE * sensitivity)
}

pub fn draw_bars(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    for bar in bar_layout(freq, w, h, sensitivity) {
        let color = Color::hsl(bar.hue, 100.0, 50.0);
        let top = h - bar.height;
        surface.fill_rect(bar.x, top, bar.width, bar.height, color);
        surface.set_glow(BAR_GLOW, color);
        surface.fill_rect(bar.x, top, bar.width, bar.height, color);
        surface.clear_glow();
    }
}

pub fn draw_dual_bars(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let mid = h / 2.0;
    for bar in dual_bar_layout(freq, w, h, sensitivity) {
        let color = Color::hsl(bar.hue, 100.0, 50.0);
        surface.fill_rect(bar.x, mid - bar.height, bar.width, bar.height, color);
        surface.fill_rect(bar.x, mid, bar.width, bar.height, color);
        surface.set_glow(DUAL_BAR_GLOW, color);
        surface.fill_rect(bar.x, mid - bar.height, bar.width, bar.height, color);
        surface.fill_rect(bar.x, mid, bar.width, bar.height, color);
        surface.clear_glow();
    }
    surface.stroke_path(
        &[Vec2::new(0.0, mid), Vec2::new(w, mid)],
        false,
        Stroke::new(Color::rgba(255, 255, 255, 0.2), 1.0),
    );
}
