//! Procedural level generation
//!
//! At most one candle (plus an optional drone riding above it) is appended
//! per tick, and only once the tail candle has scrolled into the spawn
//! margin. Every sampled range is bounded, so a sample is never rejected.

use std::f32::consts::TAU;

use super::entity::{Entity, PlatformColor};
use super::event::GameEvent;
use super::random::RandomSource;
use super::state::GameState;
use crate::consts::*;

/// What a generation pass produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    /// Gate closed (tail still off to the right, or goal already out)
    Nothing,
    Platform { with_drone: bool },
    Goal,
}

/// Whether the tail has entered the spawn margin and generation is open
pub fn spawn_gate_open(state: &GameState) -> bool {
    if state.world.goal_spawned {
        return false;
    }
    match state.world.tail_platform() {
        Some(tail) => tail.rect.right() < PLAYFIELD_WIDTH + state.tuning.spawn_margin,
        None => false,
    }
}

/// Run one generation decision for this tick
pub fn generate<R: RandomSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Spawn {
    if !spawn_gate_open(state) {
        return Spawn::Nothing;
    }
    let Some(tail) = state.world.tail_platform() else {
        return Spawn::Nothing;
    };
    let tail_right = tail.rect.right();
    let tail_top = tail.rect.y;

    let tuning = &state.tuning;
    let (band_lo, band_hi) = tuning.y_band();
    let distance = state.session.distance;
    let target = state.target_distance();

    if distance >= target {
        let x = tail_right + tuning.goal_gap;
        let y = tail_top.clamp(band_lo, band_hi);
        let (width, finish) = (tuning.goal_width, tuning.goal_finish_offset);
        let id = state.world.next_entity_id();
        state.world.entities.push(Entity::goal(id, x, y, width, finish));
        state.world.goal_spawned = true;
        events.push(GameEvent::GoalSpawned);
        log::info!(
            "Level {}: goal spawned at x={:.0} (distance {:.0}/{:.0})",
            state.session.level,
            x,
            distance,
            target
        );
        return Spawn::Goal;
    }

    let mode = state.mode();
    let mode_tuning = *tuning.mode(mode);

    let gap = rng.range(mode_tuning.gap_min, mode_tuning.gap_max);
    let offset = rng.range(-mode_tuning.vertical_offset, mode_tuning.vertical_offset);
    let y = (tail_top + offset).clamp(band_lo, band_hi);
    let width = rng.range(tuning.platform_width_min, tuning.platform_width_max);
    let x = tail_right + gap;

    let in_checkpoint_window = (distance - target * 0.5).abs() <= tuning.checkpoint_window;
    let color = if mode.has_checkpoint() && !state.session.checkpoint_reached && in_checkpoint_window
    {
        PlatformColor::Checkpoint
    } else if rng.chance(tuning.green_chance) {
        PlatformColor::Green
    } else {
        PlatformColor::Red
    };

    let drone = if rng.chance(tuning.enemy_chance(state.session.level)) {
        let phase = rng.range(0.0, TAU);
        let first_shot = rng.range(
            tuning.drone_first_shot_min as f32,
            tuning.drone_fire_interval.max(tuning.drone_first_shot_min) as f32,
        ) as u32;
        Some((
            x + width * 0.5 - DRONE_SIZE * 0.5,
            y - tuning.drone_hover,
            phase,
            first_shot,
        ))
    } else {
        None
    };

    let id = state.world.next_entity_id();
    state
        .world
        .entities
        .push(Entity::platform(id, x, y, width, color));
    log::debug!("Candle #{id} at x={x:.0} y={y:.0} w={width:.0} {color:?}");

    if let Some((dx, start_y, phase, first_shot)) = drone {
        let id = state.world.next_entity_id();
        state
            .world
            .entities
            .push(Entity::drone(id, dx, start_y, phase, first_shot));
        log::debug!("Drone #{id} above candle at x={dx:.0}");
    }

    Spawn::Platform {
        with_drone: drone.is_some(),
    }
}
