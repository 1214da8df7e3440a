//! Full Margin - a side-scrolling candle-hopping survival platformer
//!
//! Core modules:
//! - `sim`: Simulation (generation, physics, collisions, session state)
//! - `renderer`: Back-to-front drawing onto an immediate-mode 2D surface
//! - `driver`: Frame loop that ticks, renders and samples the HUD
//! - `settings`: Host-supplied preferences
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{FrameLoop, FrameReport};
pub use settings::{ConfigError, Settings, SpeedPreset};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size (world units)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults - the trader holds a fixed column while the world scrolls
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const JUMP_STRENGTH: f32 = 12.0;
    pub const GRAVITY: f32 = 0.6;
    /// Ground jump plus one double jump
    pub const MAX_JUMPS: u8 = 2;

    /// Drone and projectile sizes
    pub const DRONE_SIZE: f32 = 40.0;
    pub const PROJECTILE_WIDTH: f32 = 12.0;
    pub const PROJECTILE_HEIGHT: f32 = 6.0;

    /// Ticks of protection after a hit or a respawn
    pub const HIT_INVULNERABILITY: u32 = 120;

    /// Ticks between coarse HUD refreshes
    pub const HUD_SAMPLE_INTERVAL: u64 = 10;
}

/// Axis-aligned rectangle in world units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    #[inline]
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}
