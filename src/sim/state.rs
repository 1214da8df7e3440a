//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: the frame loop owns it
//! and hands it to every component, so a tick can be replayed in isolation.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Player};
use crate::settings::SpeedPreset;
use crate::tuning::Tuning;

/// Difficulty mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Three lives, checkpoint-aware respawns
    #[default]
    Standard,
    /// One life, no checkpoint
    Hardcore,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Standard => "Standard",
            GameMode::Hardcore => "Hardcore",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "normal" => Some(GameMode::Standard),
            "hardcore" => Some(GameMode::Hardcore),
            _ => None,
        }
    }

    /// Only standard runs benefit from the mid-level checkpoint
    pub fn has_checkpoint(&self) -> bool {
        matches!(self, GameMode::Standard)
    }
}

/// Coarse state-machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Mode and speed selection; nothing simulates
    Menu,
    /// Paused on the confirmation screen
    Start,
    /// Active gameplay
    Playing,
    /// Attempt over; score and level frozen
    GameOver,
    /// Finish line crossed; waiting to advance
    LevelComplete,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameover",
            GamePhase::LevelComplete => "levelcomplete",
        }
    }
}

/// Progression owned by the state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Chosen mode (cleared when returning to the menu)
    pub mode: Option<GameMode>,
    /// Chosen base speed
    pub speed: SpeedPreset,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    /// Scroll distance covered this level
    pub distance: f32,
    pub checkpoint_reached: bool,
    pub phase: GamePhase,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: None,
            speed: SpeedPreset::Normal,
            level: 1,
            score: 0,
            lives: 0,
            distance: 0.0,
            checkpoint_reached: false,
            phase: GamePhase::Menu,
        }
    }
}

impl Session {
    /// Active mode; standard when none has been picked yet
    pub fn mode(&self) -> GameMode {
        self.mode.unwrap_or_default()
    }
}

/// Scrolling world: the player plus every live entity in spawn order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    /// Live entities, appended at the tail only
    pub entities: Vec<Entity>,
    /// Current horizontal scroll (world units per tick)
    pub scroll_speed: f32,
    /// Ticks simulated this level
    pub frame: u64,
    /// Goal already generated this level
    pub goal_spawned: bool,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            player: Player::default(),
            entities: Vec::new(),
            scroll_speed: 0.0,
            frame: 0,
            goal_spawned: false,
            next_id: 1,
        }
    }
}

impl World {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rightmost (most recently spawned) candle
    pub fn tail_platform(&self) -> Option<&Entity> {
        self.entities.iter().rev().find(|e| e.is_platform())
    }

    /// The live goal platform, if any
    pub fn goal(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_goal())
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_platform())
    }

    /// Drop every entity (respawn / level change)
    pub fn clear(&mut self) {
        self.entities.clear();
        self.goal_spawned = false;
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub session: Session,
    pub world: World,
    pub tuning: Tuning,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    /// Fresh state sitting in the menu
    pub fn new(tuning: Tuning) -> Self {
        Self {
            session: Session::default(),
            world: World::default(),
            tuning,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn mode(&self) -> GameMode {
        self.session.mode()
    }

    /// Distance needed to spawn this level's goal
    pub fn target_distance(&self) -> f32 {
        self.tuning.target_distance(self.session.level)
    }

    /// Distance at which the checkpoint sits
    pub fn checkpoint_distance(&self) -> f32 {
        self.target_distance() * 0.5
    }

    /// Level progress in [0, 1]
    pub fn progress(&self) -> f32 {
        let target = self.target_distance();
        if target <= 0.0 {
            return 1.0;
        }
        (self.session.distance / target).clamp(0.0, 1.0)
    }

    /// UI-facing values
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.session.phase,
            mode: self.session.mode,
            level: self.session.level,
            score: self.session.score,
            lives: self.session.lives,
            progress: self.progress(),
            checkpoint: self.session.checkpoint_reached,
        }
    }
}

/// Discrete values pushed to the host UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub mode: Option<GameMode>,
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub progress: f32,
    pub checkpoint: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::PlatformColor;

    #[test]
    fn test_new_state_in_menu() {
        let state = GameState::default();
        assert_eq!(state.phase(), GamePhase::Menu);
        assert_eq!(state.session.mode, None);
        assert_eq!(state.session.level, 1);
        assert!(state.world.entities.is_empty());
    }

    #[test]
    fn test_tail_platform_skips_drones() {
        let mut world = World::default();
        let a = world.next_entity_id();
        world.entities.push(Entity::platform(a, 0.0, 400.0, 100.0, PlatformColor::Green));
        let b = world.next_entity_id();
        world.entities.push(Entity::drone(b, 30.0, 300.0, 0.0, 60));
        assert_eq!(world.tail_platform().map(|p| p.id), Some(a));
        assert_ne!(a, b);
    }

    #[test]
    fn test_progress_clamped() {
        let mut state = GameState::default();
        state.session.distance = 1000.0;
        assert!((state.progress() - 0.5).abs() < 1e-6);
        state.session.distance = 99_999.0;
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(GameMode::from_str("HARDCORE"), Some(GameMode::Hardcore));
        assert_eq!(GameMode::from_str("casual"), None);
        assert!(!GameMode::Hardcore.has_checkpoint());
    }
}
