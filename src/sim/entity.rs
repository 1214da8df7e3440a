//! Entity records: the trader, candles, drones, SL projectiles and the goal

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;

/// Candle colour. Purely cosmetic except `Checkpoint`, which marks the
/// mid-level checkpoint candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformColor {
    Green,
    Red,
    Checkpoint,
}

/// Closed set of scrolling entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A candle: solid, landable, extends below the playfield
    Platform { color: PlatformColor },
    /// A drone bobbing around `start_y`
    Enemy {
        start_y: f32,
        /// Phase offset for the sinusoidal bob
        offset: f32,
        /// Ticks until the next shot
        fire_timer: u32,
    },
    /// A single-use SL projectile; `vel` is relative to the scrolling world
    Projectile { vel: Vec2 },
    /// The level's take-profit platform; `finish_offset` is measured from its left edge
    Goal { finish_offset: f32 },
}

/// A scrolling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub rect: Rect,
    pub kind: EntityKind,
}

impl Entity {
    pub fn platform(id: u32, x: f32, y: f32, width: f32, color: PlatformColor) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, width, PLAYFIELD_HEIGHT),
            kind: EntityKind::Platform { color },
        }
    }

    pub fn goal(id: u32, x: f32, y: f32, width: f32, finish_offset: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, width, PLAYFIELD_HEIGHT),
            kind: EntityKind::Goal { finish_offset },
        }
    }

    pub fn drone(id: u32, x: f32, start_y: f32, offset: f32, fire_timer: u32) -> Self {
        Self {
            id,
            rect: Rect::new(x, start_y, DRONE_SIZE, DRONE_SIZE),
            kind: EntityKind::Enemy {
                start_y,
                offset,
                fire_timer,
            },
        }
    }

    pub fn projectile(id: u32, x: f32, y: f32, vel: Vec2) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            kind: EntityKind::Projectile { vel },
        }
    }

    pub fn is_platform(&self) -> bool {
        matches!(self.kind, EntityKind::Platform { .. })
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.kind, EntityKind::Goal { .. })
    }

    /// Landable surfaces: candles and the goal
    pub fn is_solid(&self) -> bool {
        self.is_platform() || self.is_goal()
    }

    /// Drones and projectiles
    pub fn is_hazard(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Enemy { .. } | EntityKind::Projectile { .. }
        )
    }

    pub fn is_checkpoint(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Platform {
                color: PlatformColor::Checkpoint
            }
        )
    }

    /// World x of the finish line (goal only)
    pub fn finish_line(&self) -> Option<f32> {
        match self.kind {
            EntityKind::Goal { finish_offset } => Some(self.rect.x + finish_offset),
            _ => None,
        }
    }
}

/// The trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Vertical velocity (positive = falling)
    pub dy: f32,
    pub grounded: bool,
    /// Jumps used since last landing (0..=MAX_JUMPS)
    pub jump_count: u8,
    /// Ticks of damage immunity left
    pub invulnerable: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_X, 200.0)
    }
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, PLAYER_SIZE, PLAYER_SIZE),
            dy: 0.0,
            grounded: false,
            jump_count: 0,
            invulnerable: 0,
        }
    }

    /// Snap onto the top of a surface and reset jump state
    pub fn land_on(&mut self, top: f32) {
        self.dy = 0.0;
        self.rect.y = top - self.rect.h;
        self.grounded = true;
        self.jump_count = 0;
    }

    /// Jump if the ground or a remaining air jump allows it.
    /// Returns false (leaving velocity untouched) otherwise.
    pub fn try_jump(&mut self, strength: f32) -> bool {
        if !(self.grounded || self.jump_count < MAX_JUMPS) {
            return false;
        }
        // A ground jump always counts as the first of the pair
        if self.grounded {
            self.jump_count = 0;
        }
        self.dy = -strength;
        self.grounded = false;
        self.jump_count = (self.jump_count + 1).min(MAX_JUMPS);
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0
    }
}
