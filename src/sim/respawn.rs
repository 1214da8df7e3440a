//! Checkpoint tracking and respawn placement
//!
//! Standard runs respawn on a fresh safe candle at the level origin, or at
//! the midpoint once the checkpoint is claimed. Hardcore has a single life,
//! so the only placement it ever needs is a nudge back into bounds.

use super::entity::{Entity, PlatformColor};
use super::event::{GameEvent, LifeLossCause};
use super::session;
use super::state::{GameMode, GameState};
use crate::consts::*;

/// Clear the world and stand the trader on a safe candle at `distance`
pub fn place(state: &mut GameState, distance: f32) {
    state.world.clear();
    state.session.distance = distance;
    state.world.scroll_speed = state
        .tuning
        .level_speed(state.session.speed.base_speed(), state.session.level);

    let (x, y, w) = (
        state.tuning.safe_platform_x,
        state.tuning.safe_platform_y,
        state.tuning.safe_platform_width,
    );
    let id = state.world.next_entity_id();
    state
        .world
        .entities
        .push(Entity::platform(id, x, y, w, PlatformColor::Green));

    let player = &mut state.world.player;
    player.rect.x = PLAYER_X;
    player.land_on(y);
}

/// Place at the start of the level
pub fn place_at_origin(state: &mut GameState) {
    place(state, 0.0);
}

/// Distance a respawn resumes from
pub fn respawn_distance(state: &GameState) -> f32 {
    if state.mode().has_checkpoint() && state.session.checkpoint_reached {
        state.checkpoint_distance()
    } else {
        0.0
    }
}

/// Checkpoint-aware placement with a protective invulnerability window
pub fn respawn(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let distance = respawn_distance(state);
    place(state, distance);
    state.world.player.invulnerable = state.tuning.respawn_invulnerability_ticks;
    events.push(GameEvent::Respawned { distance });
    log::info!(
        "Respawned on level {} at distance {:.0} ({} lives)",
        state.session.level,
        distance,
        state.session.lives
    );
}

/// Put the trader back in the playfield without touching the world
pub fn nudge_into_bounds(state: &mut GameState) {
    let (band_top, _) = state.tuning.y_band();
    let player = &mut state.world.player;
    if player.rect.y > PLAYFIELD_HEIGHT || player.rect.y < 0.0 {
        player.rect.y = band_top - player.rect.h;
        player.dy = 0.0;
    }
    if player.rect.x < PLAYER_X {
        player.rect.x = PLAYER_X;
    }
    // Airborne with no surface below: keep both jumps available
    player.grounded = false;
    player.jump_count = 0;
    player.invulnerable = state.tuning.invulnerability_ticks;
}

/// Handle a life-loss event. Returns true when it ended the run.
pub fn lose_life(state: &mut GameState, cause: LifeLossCause, events: &mut Vec<GameEvent>) -> bool {
    state.session.lives = state.session.lives.saturating_sub(1);
    events.push(GameEvent::LifeLost {
        cause,
        lives: state.session.lives,
    });
    log::info!("Life lost ({cause:?}), {} left", state.session.lives);

    if state.session.lives == 0 {
        session::game_over(state, events);
        return true;
    }

    match state.mode() {
        GameMode::Standard => respawn(state, events),
        GameMode::Hardcore => nudge_into_bounds(state),
    }
    false
}

/// Claim the checkpoint by distance alone once the midpoint is passed
pub fn check_passive_claim(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.mode().has_checkpoint() || state.session.checkpoint_reached {
        return;
    }
    if state.session.distance >= state.checkpoint_distance() {
        state.session.checkpoint_reached = true;
        events.push(GameEvent::CheckpointClaimed);
        log::info!("Checkpoint claimed at distance {:.0}", state.session.distance);
    }
}
