//! Fixed-cadence simulation tick
//!
//! One call per display refresh while playing. Order within a tick:
//! generate -> integrate -> drones -> collide/resolve -> scroll/cull -> distance.

use super::collision::{self, Resolution};
use super::event::GameEvent;
use super::generator;
use super::lifecycle;
use super::physics;
use super::random::RandomSource;
use super::respawn;
use super::session;
use super::state::{GamePhase, GameState};

/// Advance the game state by one tick. Does nothing outside `playing`.
pub fn tick<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) -> Vec<GameEvent> {
    if state.phase() != GamePhase::Playing {
        return Vec::new();
    }

    let mut events = Vec::new();
    state.world.frame += 1;

    generator::generate(state, rng, &mut events);
    let pre = physics::integrate(&mut state.world.player, &state.tuning);
    lifecycle::animate_hazards(state);

    match collision::resolve(state, pre, &mut events) {
        Resolution::Continue => {}
        Resolution::LifeLost(cause) => {
            respawn::lose_life(state, cause, &mut events);
            return events;
        }
        Resolution::LevelComplete => {
            session::complete_level(state, &mut events);
            return events;
        }
    }

    lifecycle::scroll_and_cull(state, &mut events);
    state.session.distance += state.world.scroll_speed;
    respawn::check_passive_claim(state, &mut events);

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{Entity, EntityKind};
    use crate::sim::event::LifeLossCause;
    use crate::sim::random::ScriptedRandom;
    use crate::sim::session::{InputAction, apply};
    use crate::sim::state::GameMode;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// A run in `playing` on level 1 (target distance 2000)
    fn playing(mode: GameMode) -> GameState {
        let mut state = GameState::default();
        apply(&mut state, InputAction::SelectMode(mode));
        apply(&mut state, InputAction::Jump);
        assert_eq!(state.phase(), GamePhase::Playing);
        state.world.player.invulnerable = 0;
        state
    }

    /// Never spawns drones; candles red and far below
    fn calm_rng() -> ScriptedRandom {
        ScriptedRandom::constant(0.99)
    }

    fn drop_player(state: &mut GameState) {
        state.world.player.rect.y = PLAYFIELD_HEIGHT + 10.0;
        state.world.player.grounded = false;
    }

    #[test]
    fn test_no_tick_outside_playing() {
        let mut state = GameState::default();
        let before = state.clone();
        assert!(tick(&mut state, &mut calm_rng()).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_standing_player_scrolls_and_counts_distance() {
        let mut state = playing(GameMode::Standard);
        let mut rng = calm_rng();
        for _ in 0..10 {
            tick(&mut state, &mut rng);
        }
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.world.player.rect.bottom(), state.tuning.safe_platform_y);
        assert!((state.session.distance - 50.0).abs() < 1e-3);
        assert!(state.world.platforms().count() > 1);
    }

    #[test]
    fn scenario_a_fall_before_checkpoint_respawns_at_origin() {
        let mut state = playing(GameMode::Standard);
        state.session.distance = 600.0;
        drop_player(&mut state);

        let events = tick(&mut state, &mut calm_rng());
        assert!(events.contains(&GameEvent::LifeLost {
            cause: LifeLossCause::Fell,
            lives: 2
        }));
        assert_eq!(state.session.lives, 2);
        assert_eq!(state.session.distance, 0.0);
        assert!(!state.session.checkpoint_reached);
        assert_eq!(state.phase(), GamePhase::Playing);
    }

    #[test]
    fn scenario_b_fall_after_checkpoint_respawns_at_midpoint() {
        let mut state = playing(GameMode::Standard);
        let mut rng = calm_rng();
        state.session.distance = 1001.0;
        let events = tick(&mut state, &mut rng);
        assert!(events.contains(&GameEvent::CheckpointClaimed));
        assert!(state.session.checkpoint_reached);

        drop_player(&mut state);
        let events = tick(&mut state, &mut rng);
        assert!(events.contains(&GameEvent::Respawned { distance: 1000.0 }));
        assert_eq!(state.session.distance, 1000.0);
        assert_eq!(state.session.lives, 2);

        // Crossing the midpoint again does not re-claim
        let events = tick(&mut state, &mut rng);
        assert!(!events.contains(&GameEvent::CheckpointClaimed));
    }

    #[test]
    fn scenario_c_hardcore_hit_is_game_over() {
        let mut state = playing(GameMode::Hardcore);
        assert_eq!(state.session.lives, 1);
        let id = state.world.next_entity_id();
        let p = state.world.player.rect;
        state
            .world
            .entities
            .push(Entity::drone(id, p.x, p.y, 0.0, 1000));

        let events = tick(&mut state, &mut calm_rng());
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.session.lives, 0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Respawned { .. })));
        assert!(tick(&mut state, &mut calm_rng()).is_empty());
    }

    #[test]
    fn scenario_d_goal_once_and_level_complete_once() {
        let mut state = playing(GameMode::Standard);
        let mut rng = calm_rng();
        state.session.distance = state.target_distance();

        let mut all = tick(&mut state, &mut rng);
        let goal_y = state.world.goal().expect("goal spawned").rect.y;

        // Stand the trader on the goal just before its finish line
        let goal = state
            .world
            .entities
            .iter_mut()
            .find(|e| e.is_goal())
            .unwrap();
        goal.rect.x = PLAYER_X - state.tuning.goal_finish_offset + 3.0;
        state.world.player.rect.y = goal_y - PLAYER_SIZE;
        state.world.player.dy = 0.0;

        for _ in 0..20 {
            all.extend(tick(&mut state, &mut rng));
        }
        let goals = all.iter().filter(|e| **e == GameEvent::GoalSpawned).count();
        let completes = all
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
            .count();
        assert_eq!(goals, 1);
        assert_eq!(completes, 1);
        assert_eq!(state.phase(), GamePhase::LevelComplete);
    }

    #[test]
    fn scenario_e_invulnerability_blocks_then_expires() {
        let mut state = playing(GameMode::Standard);
        let mut rng = calm_rng();
        state.world.player.invulnerable = 2;
        let p = state.world.player.rect;
        let id = state.world.next_entity_id();
        state
            .world
            .entities
            .push(Entity::drone(id, p.x + 10.0, p.y, 0.0, 1000));

        tick(&mut state, &mut rng);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.world.player.invulnerable, 1);

        let events = tick(&mut state, &mut rng);
        assert_eq!(state.session.lives, 2);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LifeLost {
                cause: LifeLossCause::Drone,
                ..
            }
        )));
    }

    #[test]
    fn test_spent_projectile_removed_and_life_lost() {
        let mut state = playing(GameMode::Standard);
        state.world.player.invulnerable = 0;
        let p = state.world.player.rect;
        let id = state.world.next_entity_id();
        state.world.entities.push(Entity::projectile(
            id,
            p.x + 5.0,
            p.y + 10.0,
            glam::Vec2::new(-4.0, 0.0),
        ));
        tick(&mut state, &mut calm_rng());
        assert_eq!(state.session.lives, 2);
        assert!(
            !state
                .world
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Projectile { .. }))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_run_invariants(
            seed in any::<u64>(),
            hardcore in any::<bool>(),
            presses in proptest::collection::vec(0u8..12, 1..400),
        ) {
            let mode = if hardcore { GameMode::Hardcore } else { GameMode::Standard };
            let max_lives = if hardcore { 1 } else { 3 };
            let mut state = playing(mode);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut last_distance = state.session.distance;
            let mut last_level = state.session.level;

            for press in presses {
                if press == 0 {
                    apply(&mut state, InputAction::Jump);
                }
                let events = tick(&mut state, &mut rng);

                prop_assert!(state.session.lives <= max_lives);
                prop_assert!(state.world.player.jump_count <= MAX_JUMPS);
                prop_assert_eq!(state.session.lives == 0, state.phase() == GamePhase::GameOver);
                prop_assert!(state.world.entities.iter().filter(|e| e.is_goal()).count() <= 1);

                let xs: Vec<f32> = state.world.platforms().map(|p| p.rect.x).collect();
                prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));

                // Distance only moves backward through a respawn or a new level
                let respawned = events.iter().any(|e| matches!(e, GameEvent::Respawned { .. }));
                if !respawned && state.session.level == last_level {
                    prop_assert!(state.session.distance >= last_distance);
                }
                last_distance = state.session.distance;
                last_level = state.session.level;

                if state.phase() != GamePhase::Playing {
                    apply(&mut state, InputAction::Jump);
                    state.world.player.invulnerable = 0;
                    last_distance = state.session.distance;
                    last_level = state.session.level;
                }
            }
        }
    }
}
