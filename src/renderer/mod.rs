//! Rendering module
//!
//! The simulation never draws. Each frame is drawn from an immutable
//! `GameState` onto anything implementing [`Surface`]: the browser canvas on
//! wasm, a recorder in tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::{render, viewport_scale};

use crate::Rect;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Font request (CSS-style)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub const fn new(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }

    pub fn css(&self) -> String {
        if self.bold {
            format!("bold {}px sans-serif", self.size)
        } else {
            format!("{}px sans-serif", self.size)
        }
    }
}

/// Immediate-mode 2D drawing target
pub trait Surface {
    /// False once the host surface is gone (teardown); drawing is then skipped
    fn is_ready(&self) -> bool {
        true
    }

    /// Reset the transform and fill the whole surface
    fn clear(&mut self, color: &str);

    /// Uniform scale applied to subsequent draws
    fn set_scale(&mut self, scale: f32);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: Font, align: TextAlign, color: &str);
}

/// Palette
pub mod colors {
    pub const BACKGROUND: &str = "#111827";
    pub const GRID: &str = "rgba(148,163,184,0.08)";
    pub const CANDLE_GREEN: &str = "#22c55e";
    pub const CANDLE_RED: &str = "#ef4444";
    pub const CANDLE_CHECKPOINT: &str = "#facc15";
    pub const DRONE: &str = "#64748b";
    pub const PROJECTILE: &str = "#f97316";
    pub const GOAL: &str = "#a855f7";
    pub const FINISH_LINE: &str = "#ffffff";
    pub const PROGRESS: &str = "#38bdf8";
    pub const PLAYER: &str = "#3b82f6";
    pub const PLAYER_EYE: &str = "#ffffff";
    pub const TEXT: &str = "#ffffff";
    pub const TEXT_DIM: &str = "#94a3b8";
    pub const OVERLAY: &str = "rgba(15,14,36,0.75)";
}
