use crate::constants::*;
use crate::surface::{Color, Stroke, Surface};
use glam::Vec2;
use std::f32::consts::TAU;

const WAVE_COLOR: Color = Color::rgb(0, 255, 0);
const SPIRAL_COLOR: Color = Color::rgb(255, 0, 255);
const LISSAJOUS_COLOR: Color = Color::rgba(0, 255, 255, 0.9);
const LISSAJOUS_GLOW_COLOR: Color = Color::rgb(0, 255, 255);

/// Time-domain samples as a left-to-right polyline; 128 sits on the mid-line.
pub fn waveform_points(time: &[u8], width: f32, height: f32) -> Vec<Vec2> {
    let slice = width / time.len().max(1) as f32;
    time.iter()
        .enumerate()
        .map(|(i, &s)| Vec2::new(i as f32 * slice, s as f32 / 128.0 * height / 2.0))
        .collect()
}

/// Four turns outward from the centre, each bin pushing the radius out.
pub fn spiral_points(freq: &[u8], center: Vec2, sensitivity: f32) -> Vec<Vec2> {
    let n = freq.len() as f32;
    let max_radius = center.x.min(center.y) * SPIRAL_MAX_RADIUS;
    freq.iter()
        .enumerate()
        .map(|(i, &m)| {
            let t = i as f32 / n;
            let wobble = (m as f32 / 255.0) * SPIRAL_WOBBLE_PX * sensitivity;
            let angle = t * TAU * SPIRAL_TURNS;
            let radius = t * max_radius + wobble;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// X/Y phase plot of the signal against itself delayed by a quarter buffer.
pub fn lissajous_points(time: &[u8], width: f32, height: f32) -> Vec<Vec2> {
    let delay = (time.len() as f32 * LISSAJOUS_DELAY_FRACTION) as usize;
    if time.len() <= delay {
        return Vec::new();
    }
    let norm = |s: u8| (s as f32 - 128.0) / 128.0;
    time.iter()
        .zip(time.iter().skip(delay))
        .map(|(&a, &b)| {
            Vec2::new(
                width * (0.5 + norm(a) * LISSAJOUS_EXTENT),
                height * (0.5 + norm(b) * LISSAJOUS_EXTENT),
            )
        })
        .collect()
}

fn glow_stroke(
    surface: &mut dyn Surface,
    points: &[Vec2],
    stroke: Stroke,
    glow: f32,
    glow_color: Color,
) {
    surface.stroke_path(points, false, stroke);
    surface.set_glow(glow, glow_color);
    surface.stroke_path(points, false, stroke);
    surface.clear_glow();
}

pub fn draw_waveform(surface: &mut dyn Surface, time: &[u8]) {
    let (w, h) = surface.size();
    let points = waveform_points(time, w as f32, h as f32);
    glow_stroke(
        surface,
        &points,
        Stroke::new(WAVE_COLOR, WAVE_LINE_WIDTH),
        WAVE_GLOW,
        WAVE_COLOR,
    );
}

pub fn draw_spiral(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
    let points = spiral_points(freq, surface.center(), sensitivity);
    glow_stroke(
        surface,
        &points,
        Stroke::new(SPIRAL_COLOR, WAVE_LINE_WIDTH),
        WAVE_GLOW,
        SPIRAL_COLOR,
    );
}

pub fn draw_lissajous(surface: &mut dyn Surface, time: &[u8]) {
    let (w, h) = surface.size();
    let points = lissajous_points(time, w as f32, h as f32);
    glow_stroke(
        surface,
        &points,
        Stroke::new(LISSAJOUS_COLOR, 2.0),
        LISSAJOUS_GLOW,
        LISSAJOUS_GLOW_COLOR,
    );
}
