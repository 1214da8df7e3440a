//! Collision detection and response
//!
//! Axis-aligned overlap tests between the trader and every live entity,
//! dispatched on the entity kind: candles and the goal are landed on or push
//! the trader back, drones and SL projectiles deal damage.

use super::entity::EntityKind;
use super::event::{GameEvent, LifeLossCause};
use super::physics::PreStep;
use super::state::GameState;
use crate::consts::PLAYFIELD_HEIGHT;

/// Outcome of resolving one tick of contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    /// A life-loss event the respawn controller must handle
    LifeLost(LifeLossCause),
    /// The finish line was crossed
    LevelComplete,
}

/// Resolve the player against every entity, then check bounds and the finish line
pub fn resolve(state: &mut GameState, pre: PreStep, events: &mut Vec<GameEvent>) -> Resolution {
    let tolerance = state.tuning.landing_tolerance;
    let mut hit: Option<LifeLossCause> = None;
    let mut spent_projectiles: Vec<u32> = Vec::new();
    let mut landed_on_marker = false;
    let mut landed = false;

    let player = &mut state.world.player;
    for entity in &state.world.entities {
        if !player.rect.overlaps(&entity.rect) {
            continue;
        }

        match entity.kind {
            EntityKind::Platform { .. } | EntityKind::Goal { .. } => {
                let top = entity.rect.y;
                if player.dy > 0.0 && pre.bottom <= top + tolerance {
                    player.land_on(top);
                    landed = true;
                    landed_on_marker |= entity.is_checkpoint();
                } else {
                    // Side contact: shove back out through the left face
                    player.rect.x = entity.rect.x - player.rect.w;
                }
            }
            _ if entity.is_hazard() => {
                if player.invulnerable > 0 || hit.is_some() {
                    continue;
                }
                player.invulnerable = state.tuning.invulnerability_ticks;
                if matches!(entity.kind, EntityKind::Projectile { .. }) {
                    spent_projectiles.push(entity.id);
                    hit = Some(LifeLossCause::Projectile);
                } else {
                    hit = Some(LifeLossCause::Drone);
                }
            }
            _ => {}
        }
    }

    if !spent_projectiles.is_empty() {
        state
            .world
            .entities
            .retain(|e| !spent_projectiles.contains(&e.id));
    }

    if landed && !pre.grounded {
        events.push(GameEvent::Landed {
            checkpoint: landed_on_marker,
        });
    }
    if landed_on_marker && state.mode().has_checkpoint() && !state.session.checkpoint_reached {
        state.session.checkpoint_reached = true;
        events.push(GameEvent::CheckpointClaimed);
        log::info!("Checkpoint claimed on marker candle");
    }

    if let Some(cause) = hit {
        return Resolution::LifeLost(cause);
    }

    let player = &state.world.player;
    if player.rect.y > PLAYFIELD_HEIGHT {
        return Resolution::LifeLost(LifeLossCause::Fell);
    }
    if player.rect.right() < 0.0 {
        return Resolution::LifeLost(LifeLossCause::FellBehind);
    }

    let crossed = state
        .world
        .goal()
        .and_then(|goal| goal.finish_line())
        .is_some_and(|line| player.rect.x >= line);
    if crossed {
        return Resolution::LevelComplete;
    }

    Resolution::Continue
}
