//! Drawing surface abstraction shared by the procedural renderers.
//!
//! The browser implements [`Surface`] over `CanvasRenderingContext2d`; the
//! software [`PixelSurface`] implements it over an RGBA buffer for headless
//! rendering and host-side tests.

use crate::error::{Result, VizError};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    /// Hue in degrees, saturation and lightness in percent.
    Hsla { h: f32, s: f32, l: f32, a: f32 },
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color::Rgba { r, g, b, a }
    }

    #[inline]
    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Color::Hsla { h, s, l, a: 1.0 }
    }

    #[inline]
    pub const fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla { h, s, l, a }
    }

    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Rgba { a, .. } | Color::Hsla { a, .. } => a.clamp(0.0, 1.0),
        }
    }

    /// CSS color string accepted by canvas `fillStyle`/`strokeStyle`.
    pub fn to_css(&self) -> String {
        match *self {
            Color::Rgba { r, g, b, a } => format!("rgba({},{},{},{})", r, g, b, a),
            Color::Hsla { h, s, l, a } => format!("hsla({},{}%,{}%,{})", h, s, l, a),
        }
    }

    /// Resolve to 8-bit RGB plus alpha in [0, 1].
    pub fn to_rgb8(&self) -> ([u8; 3], f32) {
        match *self {
            Color::Rgba { r, g, b, a } => ([r, g, b], a.clamp(0.0, 1.0)),
            Color::Hsla { h, s, l, a } => (hsl_to_rgb8(h, s, l), a.clamp(0.0, 1.0)),
        }
    }
}

/// CSS Color 4 hsl() conversion.
pub fn hsl_to_rgb8(h: f32, s: f32, l: f32) -> [u8; 3] {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);
    let a = s * l.min(1.0 - l);
    let f = |n: f32| {
        let k = (n + h / 30.0) % 12.0;
        let v = l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    [f(0.0), f(8.0), f(4.0)]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    #[inline]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn stroke_path(&mut self, points: &[Vec2], closed: bool, stroke: Stroke);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Shadow blur applied to subsequent draws; a blur of 0 disables it.
    fn set_glow(&mut self, blur: f32, color: Color);

    /// Hard clear to transparent.
    fn clear(&mut self);

    /// Move the whole pixel block up by `rows`, leaving the bottom rows as they were.
    fn shift_up(&mut self, rows: u32);

    #[inline]
    fn clear_glow(&mut self) {
        self.set_glow(0.0, Color::TRANSPARENT);
    }

    #[inline]
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[inline]
    fn center(&self) -> Vec2 {
        Vec2::new(self.width() as f32 * 0.5, self.height() as f32 * 0.5)
    }

    /// Translucent full-surface fill.
    fn wash(&mut self, rgb: [u8; 3], alpha: f32) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.fill_rect(0.0, 0.0, w, h, Color::rgba(rgb[0], rgb[1], rgb[2], alpha));
    }
}

/// RGBA pixel surface with source-over blending. Glow is not rasterized.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(VizError::InvalidSurface { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        })
    }

    /// Reallocate at a new size. Like a canvas, the content is discarded.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([
            self.pixels[o],
            self.pixels[o + 1],
            self.pixels[o + 2],
            self.pixels[o + 3],
        ])
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    fn blend(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || alpha <= 0.0 {
            return;
        }
        let o = self.offset(x as u32, y as u32);
        let dst_a = self.pixels[o + 3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        if out_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let src = rgb[c] as f32;
            let dst = self.pixels[o + c] as f32;
            let v = (src * alpha + dst * dst_a * (1.0 - alpha)) / out_a;
            self.pixels[o + c] = v.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[o + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    fn stamp(&mut self, p: Vec2, half: f32, rgb: [u8; 3], alpha: f32) {
        let x0 = (p.x - half).floor() as i64;
        let x1 = (p.x + half).ceil() as i64;
        let y0 = (p.y - half).floor() as i64;
        let y1 = (p.y + half).ceil() as i64;
        for y in y0..y1.max(y0 + 1) {
            for x in x0..x1.max(x0 + 1) {
                self.blend(x, y, rgb, alpha);
            }
        }
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (rgb, alpha) = color.to_rgb8();
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
        let x0 = x0.round().max(0.0) as i64;
        let y0 = y0.round().max(0.0) as i64;
        let x1 = (x1.round() as i64).min(self.width as i64);
        let y1 = (y1.round() as i64).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, rgb, alpha);
            }
        }
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, stroke: Stroke) {
        let (rgb, alpha) = stroke.color.to_rgb8();
        let half = (stroke.width * 0.5).max(0.5);
        let mut segment = |a: Vec2, b: Vec2| {
            let steps = (a.distance(b) * 2.0).ceil().max(1.0) as usize;
            for s in 0..=steps {
                let p = a.lerp(b, s as f32 / steps as f32);
                self.stamp(p, half, rgb, alpha);
            }
        };
        for pair in points.windows(2) {
            segment(pair[0], pair[1]);
        }
        if closed && points.len() > 2 {
            segment(points[points.len() - 1], points[0]);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let (rgb, alpha) = color.to_rgb8();
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let y1 = (center.y + radius).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.blend(x, y, rgb, alpha);
                }
            }
        }
    }

    fn set_glow(&mut self, _blur: f32, _color: Color) {}

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn shift_up(&mut self, rows: u32) {
        let rows = rows.min(self.height);
        let stride = (self.width * 4) as usize;
        let start = rows as usize * stride;
        self.pixels.copy_within(start.., 0);
    }
}
