//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so hosts can
//! override any subset of them from JSON. Missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::ConfigError;
use crate::sim::GameMode;

/// Per-mode generation and lives parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeTuning {
    /// Lives granted on a fresh run (and restored per level where applicable)
    pub lives: u8,
    /// Horizontal gap between consecutive platforms, sampled in [min, max)
    pub gap_min: f32,
    pub gap_max: f32,
    /// Maximum vertical offset of a new platform top from the tail's top
    pub vertical_offset: f32,
}

impl ModeTuning {
    pub const STANDARD: Self = Self {
        lives: 3,
        gap_min: 60.0,
        gap_max: 180.0,
        vertical_offset: 120.0,
    };

    pub const HARDCORE: Self = Self {
        lives: 1,
        gap_min: 50.0,
        gap_max: 130.0,
        vertical_offset: 80.0,
    };
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub gravity: f32,
    pub jump_strength: f32,
    /// How far above the platform top the player's previous bottom may be
    /// and still count as a landing
    pub landing_tolerance: f32,
    /// Walk-back speed toward the anchor column after a lateral push
    pub catch_up_speed: f32,

    // === Generation ===
    pub spawn_margin: f32,
    pub cull_margin: f32,
    pub platform_width_min: f32,
    pub platform_width_max: f32,
    pub green_chance: f32,
    /// Reachability band for platform tops, as fractions of playfield height
    pub band_top: f32,
    pub band_bottom: f32,
    /// Distance window around the level midpoint that produces checkpoint markers
    pub checkpoint_window: f32,
    pub standard: ModeTuning,
    pub hardcore: ModeTuning,

    // === Drones ===
    pub enemy_chance_base: f32,
    pub enemy_chance_per_level: f32,
    pub enemy_chance_max: f32,
    pub drone_hover: f32,
    pub drone_bob_amplitude: f32,
    pub drone_bob_rate: f32,
    pub drone_fire_interval: u32,
    pub drone_first_shot_min: u32,
    pub projectile_speed: f32,
    pub projectile_homing: f32,

    // === Damage & recovery ===
    pub invulnerability_ticks: u32,
    pub respawn_invulnerability_ticks: u32,

    // === Progression ===
    pub score_per_platform: u64,
    pub speed_ramp_per_platform: f32,
    pub speed_ramp_per_level: f32,
    pub base_target_distance: f32,
    pub target_distance_step: f32,

    // === Goal ===
    pub goal_gap: f32,
    pub goal_width: f32,
    pub goal_finish_offset: f32,

    // === Respawn platform ===
    pub safe_platform_x: f32,
    pub safe_platform_y: f32,
    pub safe_platform_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            landing_tolerance: 15.0,
            catch_up_speed: 1.0,

            spawn_margin: 100.0,
            cull_margin: 100.0,
            platform_width_min: 50.0,
            platform_width_max: 150.0,
            green_chance: 0.6,
            band_top: 0.25,
            band_bottom: 0.85,
            checkpoint_window: 150.0,
            standard: ModeTuning::STANDARD,
            hardcore: ModeTuning::HARDCORE,

            enemy_chance_base: 0.15,
            enemy_chance_per_level: 0.05,
            enemy_chance_max: 0.6,
            drone_hover: 100.0,
            drone_bob_amplitude: 30.0,
            drone_bob_rate: 0.05,
            drone_fire_interval: 150,
            drone_first_shot_min: 30,
            projectile_speed: 4.0,
            projectile_homing: 0.01,

            invulnerability_ticks: HIT_INVULNERABILITY,
            respawn_invulnerability_ticks: HIT_INVULNERABILITY,

            score_per_platform: 10,
            speed_ramp_per_platform: 0.005,
            speed_ramp_per_level: 0.5,
            base_target_distance: 2000.0,
            target_distance_step: 1000.0,

            goal_gap: 150.0,
            goal_width: 400.0,
            goal_finish_offset: 100.0,

            safe_platform_x: 50.0,
            safe_platform_y: 400.0,
            safe_platform_width: 300.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()
    }

    /// Reject values that would make sampling unsatisfiable
    pub fn validate(self) -> Result<Self, ConfigError> {
        let ranges = [
            ("platform_width", self.platform_width_min, self.platform_width_max),
            ("standard.gap", self.standard.gap_min, self.standard.gap_max),
            ("hardcore.gap", self.hardcore.gap_min, self.hardcore.gap_max),
            ("band", self.band_top, self.band_bottom),
        ];
        for (name, lo, hi) in ranges {
            if !(lo <= hi) {
                return Err(ConfigError::InvalidRange {
                    field: name,
                    min: lo,
                    max: hi,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.band_top) || !(0.0..=1.0).contains(&self.band_bottom) {
            return Err(ConfigError::InvalidRange {
                field: "band",
                min: self.band_top,
                max: self.band_bottom,
            });
        }
        // Candles must always land strictly right of the tail with a real width
        let positive = [
            ("standard.gap_min", self.standard.gap_min),
            ("hardcore.gap_min", self.hardcore.gap_min),
            ("platform_width_min", self.platform_width_min),
            ("drone_fire_interval", self.drone_fire_interval as f32),
        ];
        let non_negative = [
            ("standard.vertical_offset", self.standard.vertical_offset),
            ("hardcore.vertical_offset", self.hardcore.vertical_offset),
            ("spawn_margin", self.spawn_margin),
            ("cull_margin", self.cull_margin),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfBounds { field, value });
            }
        }
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfBounds { field, value });
            }
        }
        if self.standard.lives == 0 || self.hardcore.lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        Ok(self)
    }

    /// Mode-specific parameters
    pub fn mode(&self, mode: GameMode) -> &ModeTuning {
        match mode {
            GameMode::Standard => &self.standard,
            GameMode::Hardcore => &self.hardcore,
        }
    }

    /// Scroll distance required to reach the goal on a level (1-based)
    pub fn target_distance(&self, level: u32) -> f32 {
        self.base_target_distance + level.saturating_sub(1) as f32 * self.target_distance_step
    }

    /// Per-platform drone spawn probability, rising linearly with level
    pub fn enemy_chance(&self, level: u32) -> f32 {
        (self.enemy_chance_base + level.saturating_sub(1) as f32 * self.enemy_chance_per_level)
            .min(self.enemy_chance_max)
    }

    /// Allowed platform-top band in world units
    pub fn y_band(&self) -> (f32, f32) {
        (
            PLAYFIELD_HEIGHT * self.band_top,
            PLAYFIELD_HEIGHT * self.band_bottom,
        )
    }

    /// Scroll speed at the start of a level
    pub fn level_speed(&self, base_speed: f32, level: u32) -> f32 {
        base_speed + level.saturating_sub(1) as f32 * self.speed_ramp_per_level
    }
}
