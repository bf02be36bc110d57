use super::hue_for;
use crate::constants::*;
use crate::surface::{Color, Surface};

/// Lightness (percent) for one bin magnitude.
pub fn spectrogram_lightness(magnitude: u8, sensitivity: f32) -> f32 {
    let level = (magnitude as f32 / 255.0 * sensitivity).clamp(0.0, 1.0);
    SPECTROGRAM_LIGHTNESS_MIN
        + (SPECTROGRAM_LIGHTNESS_MAX - SPECTROGRAM_LIGHTNESS_MIN) * level.powf(SPECTROGRAM_GAMMA)
}

/// Colour of each column of the newest stripe, one per pixel column.
pub fn spectrogram_stripe(freq: &[u8], width: u32, sensitivity: f32) -> Vec<Color> {
    let n = freq.len();
    if n == 0 {
        return Vec::new();
    }
    (0..width)
        .map(|x| {
            let idx = ((x as f32 / width as f32) * n as f32) as usize;
            let idx = idx.min(n - 1);
            Color::hsl(hue_for(idx, n), 100.0, spectrogram_lightness(freq[idx], sensitivity))
        })
        .collect()
}

/// Scroll the history up, paint the newest stripe along the bottom, then dim
/// everything slightly so old rows sink toward the background.
pub fn draw_spectrogram(surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
    let (w, h) = surface.size();
    let row = SPECTROGRAM_ROW_PX.min(h);
    surface.shift_up(row);
    let y = (h - row) as f32;
    for (x, color) in spectrogram_stripe(freq, w, sensitivity).into_iter().enumerate() {
        surface.fill_rect(x as f32, y, 1.0, row as f32, color);
    }
    surface.wash(SPECTROGRAM_DIM_RGB, SPECTROGRAM_DIM_ALPHA);
}
