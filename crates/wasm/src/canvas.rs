use skyhop_core::{Color, Rect, Surface, Viewport};
use web_sys::CanvasRenderingContext2d;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.ctx.clear_rect(0.0, 0.0, viewport.w as f64, viewport.h as f64);
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }
}
