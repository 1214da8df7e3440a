//! Events emitted by ticks and input actions.
//! The host pushes the HUD immediately whenever one of these occurs.
use serde::Serialize;

use super::state::GamePhase;

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifeLossCause {
    Drone,
    Projectile,
    Fell,
    FellBehind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Jumped { jump_count: u8 },
    Landed { checkpoint: bool },
    ScoreChanged { score: u64 },
    LifeLost { cause: LifeLossCause, lives: u8 },
    Respawned { distance: f32 },
    CheckpointClaimed,
    GoalSpawned,
    LevelComplete { level: u32 },
    GameOver { score: u64, level: u32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

impl GameEvent {
    /// Events frequent enough that they should not force a HUD push
    pub fn is_cosmetic(&self) -> bool {
        matches!(self, GameEvent::Jumped { .. } | GameEvent::Landed { .. })
    }
}
