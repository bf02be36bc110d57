use glam::Vec2;
use std::f64::consts::TAU;
use viz_core::{Color, Stroke, Surface};
use wasm_bindgen::JsCast;
use web_sys as web;

/// [`Surface`] over a canvas 2D context. Glow maps to the shadow blur.
pub struct Canvas2dSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext error: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self { canvas, ctx })
    }

    #[inline]
    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    fn trace(&self, points: &[Vec2], closed: bool) {
        self.ctx.begin_path();
        let mut it = points.iter();
        if let Some(p) = it.next() {
            self.ctx.move_to(p.x as f64, p.y as f64);
        }
        for p in it {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        if closed {
            self.ctx.close_path();
        }
    }
}

impl Surface for Canvas2dSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.trace(points, closed);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn set_glow(&mut self, blur: f32, color: Color) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.to_css());
    }

    fn clear_glow(&mut self) {
        self.ctx.set_shadow_blur(0.0);
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
    }

    fn shift_up(&mut self, rows: u32) {
        let (w, h) = (self.width(), self.height());
        if rows == 0 || rows >= h {
            return;
        }
        match self
            .ctx
            .get_image_data(0.0, rows as f64, w as f64, (h - rows) as f64)
        {
            Ok(img) => {
                let _ = self.ctx.put_image_data(&img, 0.0, 0.0);
            }
            Err(e) => log::warn!("[frame] getImageData failed: {:?}", e),
        }
    }
}
