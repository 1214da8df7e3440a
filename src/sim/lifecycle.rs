//! Entity lifecycle: drone behaviour, scrolling and culling
//!
//! Entities only ever enter at the tail (see `generator`) and leave here,
//! once their right edge is a full cull margin behind the viewport.

use glam::Vec2;

use super::entity::{Entity, EntityKind};
use super::event::GameEvent;
use super::state::GameState;
use crate::consts::*;

/// Bob drones on their sine track and let them fire at the trader
pub fn animate_hazards(state: &mut GameState) {
    let tuning = &state.tuning;
    let t = state.world.frame as f32 * tuning.drone_bob_rate;
    let target = state.world.player.rect.center();
    let mut shots: Vec<(f32, f32)> = Vec::new();

    for entity in &mut state.world.entities {
        let EntityKind::Enemy {
            start_y,
            offset,
            fire_timer,
        } = &mut entity.kind
        else {
            continue;
        };
        entity.rect.y = *start_y + (t + *offset).sin() * tuning.drone_bob_amplitude;

        *fire_timer = fire_timer.saturating_sub(1);
        if *fire_timer > 0 {
            continue;
        }
        *fire_timer = tuning.drone_fire_interval.max(1);

        let on_screen = entity.rect.x < PLAYFIELD_WIDTH && entity.rect.right() > 0.0;
        if on_screen && entity.rect.x > target.x {
            let muzzle = entity.rect.center();
            shots.push((entity.rect.x - PROJECTILE_WIDTH, muzzle.y - PROJECTILE_HEIGHT * 0.5));
        }
    }

    for (x, y) in shots {
        // Aim is fixed at fire time: a bias toward the trader, not tracking
        let vel = Vec2::new(
            -state.tuning.projectile_speed,
            (target.y - y) * state.tuning.projectile_homing,
        );
        let id = state.world.next_entity_id();
        state.world.entities.push(Entity::projectile(id, x, y, vel));
        log::debug!("SL #{id} fired from x={x:.0} (dy {:.2})", vel.y);
    }
}

/// Scroll every entity left by the world speed and cull what has left the
/// viewport. Culled candles pay out score and nudge the speed up.
pub fn scroll_and_cull(state: &mut GameState, events: &mut Vec<GameEvent>) -> usize {
    let speed = state.world.scroll_speed;
    let cull_x = -state.tuning.cull_margin;

    for entity in &mut state.world.entities {
        entity.rect.x -= speed;
        if let EntityKind::Projectile { vel } = entity.kind {
            entity.rect.x += vel.x;
            entity.rect.y += vel.y;
        }
    }

    let mut culled_platforms = 0usize;
    state.world.entities.retain(|e| {
        let off_left = e.rect.right() < cull_x;
        let off_vertical = matches!(e.kind, EntityKind::Projectile { .. })
            && (e.rect.y > PLAYFIELD_HEIGHT || e.rect.bottom() < 0.0);
        let keep = !(off_left || off_vertical);
        if !keep && e.is_platform() {
            culled_platforms += 1;
        }
        keep
    });

    if culled_platforms > 0 {
        let tuning = &state.tuning;
        state.session.score += tuning.score_per_platform * culled_platforms as u64;
        state.world.scroll_speed += tuning.speed_ramp_per_platform * culled_platforms as f32;
        events.push(GameEvent::ScoreChanged {
            score: state.session.score,
        });
    }

    culled_platforms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::PlatformColor;

    fn state_with(entities: Vec<Entity>) -> GameState {
        let mut state = GameState::default();
        state.world.scroll_speed = 5.0;
        state.world.entities = entities;
        state
    }

    #[test]
    fn test_scroll_moves_everything_left() {
        let mut state = state_with(vec![
            Entity::platform(1, 300.0, 400.0, 100.0, PlatformColor::Green),
            Entity::drone(2, 320.0, 300.0, 0.0, 50),
        ]);
        scroll_and_cull(&mut state, &mut Vec::new());
        assert_eq!(state.world.entities[0].rect.x, 295.0);
        assert_eq!(state.world.entities[1].rect.x, 315.0);
    }

    #[test]
    fn test_cull_uses_margin_and_scores() {
        let mut state = state_with(vec![
            // right edge at -96 after scrolling: still inside the margin
            Entity::platform(1, -191.0, 400.0, 100.0, PlatformColor::Green),
            // right edge at -101 after scrolling: culled
            Entity::platform(2, -196.0, 400.0, 100.0, PlatformColor::Red),
            Entity::platform(3, 100.0, 400.0, 100.0, PlatformColor::Green),
        ]);
        let mut events = Vec::new();
        assert_eq!(scroll_and_cull(&mut state, &mut events), 1);
        let ids: Vec<u32> = state.world.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(state.session.score, 10);
        assert!((state.world.scroll_speed - 5.005).abs() < 1e-5);
        assert_eq!(events, vec![GameEvent::ScoreChanged { score: 10 }]);
    }

    #[test]
    fn test_culled_drone_scores_nothing() {
        let mut state = state_with(vec![Entity::drone(1, -200.0, 300.0, 0.0, 50)]);
        let mut events = Vec::new();
        assert_eq!(scroll_and_cull(&mut state, &mut events), 0);
        assert!(state.world.entities.is_empty());
        assert_eq!(state.session.score, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_projectile_moves_with_velocity() {
        let mut state = state_with(vec![Entity::projectile(
            1,
            400.0,
            300.0,
            Vec2::new(-4.0, 1.0),
        )]);
        scroll_and_cull(&mut state, &mut Vec::new());
        let shot = &state.world.entities[0];
        assert_eq!(shot.rect.x, 391.0);
        assert_eq!(shot.rect.y, 301.0);
    }

    #[test]
    fn test_drone_fires_homing_shot() {
        let mut state = state_with(vec![Entity::drone(1, 600.0, 300.0, 0.0, 1)]);
        state.world.player.rect.y = 400.0;
        animate_hazards(&mut state);

        assert_eq!(state.world.entities.len(), 2);
        let drone = &state.world.entities[0];
        match drone.kind {
            EntityKind::Enemy { fire_timer, .. } => {
                assert_eq!(fire_timer, state.tuning.drone_fire_interval)
            }
            _ => unreachable!(),
        }
        let shot = &state.world.entities[1];
        match shot.kind {
            EntityKind::Projectile { vel } => {
                assert_eq!(vel.x, -state.tuning.projectile_speed);
                // Trader below the drone: shot drifts downward
                assert!(vel.y > 0.0);
            }
            other => panic!("expected projectile, got {other:?}"),
        }
    }

    #[test]
    fn test_drone_behind_player_holds_fire() {
        let mut state = state_with(vec![Entity::drone(1, 20.0, 300.0, 0.0, 1)]);
        animate_hazards(&mut state);
        assert_eq!(state.world.entities.len(), 1);
    }

    #[test]
    fn test_drone_bobs_within_amplitude() {
        let mut state = state_with(vec![Entity::drone(1, 600.0, 300.0, 1.3, 1000)]);
        for frame in 0..200 {
            state.world.frame = frame;
            animate_hazards(&mut state);
            let y = state.world.entities[0].rect.y;
            assert!((y - 300.0).abs() <= state.tuning.drone_bob_amplitude + 1e-3);
        }
    }
}
