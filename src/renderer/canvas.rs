//! Browser canvas surface (CanvasRenderingContext2d)

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Font, Surface, TextAlign};
use crate::Rect;

/// 2D canvas context plus the element it draws into
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Device pixel ratio folded into every transform
    dpr: f64,
    detached: bool,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            dpr,
            detached: false,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store for a logical size in CSS pixels
    pub fn resize(&mut self, css_width: f32, css_height: f32) {
        self.canvas.set_width((css_width as f64 * self.dpr) as u32);
        self.canvas.set_height((css_height as f64 * self.dpr) as u32);
    }

    /// Host teardown; later draws are skipped
    pub fn detach(&mut self) {
        self.detached = true;
    }
}

impl Surface for CanvasSurface {
    fn is_ready(&self) -> bool {
        !self.detached && self.canvas.is_connected()
    }

    fn clear(&mut self, color: &str) {
        if let Err(e) = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0) {
            log::warn!("set_transform failed: {e:?}");
        }
        self.ctx.set_fill_style(&JsValue::from_str(color));
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn set_scale(&mut self, scale: f32) {
        let s = scale as f64 * self.dpr;
        if let Err(e) = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
            log::warn!("set_transform failed: {e:?}");
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(color));
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: Font, align: TextAlign, color: &str) {
        self.ctx.set_font(&font.css());
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_fill_style(&JsValue::from_str(color));
        self.ctx.fill_text(text, x as f64, y as f64).ok();
    }
}
