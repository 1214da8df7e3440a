//! Player integration
//!
//! Gravity, vertical motion and timers. Jumps are edge-triggered input and
//! applied through [`jump`] the moment they arrive, not inside [`integrate`].

use super::entity::Player;
use super::event::GameEvent;
use crate::consts::PLAYER_X;
use crate::tuning::Tuning;

/// Player state captured before a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreStep {
    /// Bottom edge before moving; tells landings from side contacts
    pub bottom: f32,
    pub grounded: bool,
}

/// Advance the player by one tick
pub fn integrate(player: &mut Player, tuning: &Tuning) -> PreStep {
    let prev_bottom = player.rect.bottom();
    let was_grounded = player.grounded;

    player.dy += tuning.gravity;
    player.rect.y += player.dy;
    player.grounded = false;

    if player.invulnerable > 0 {
        player.invulnerable -= 1;
    }

    // Walk back to the anchor column after being shoved by a candle face
    if was_grounded && player.rect.x < PLAYER_X {
        player.rect.x = (player.rect.x + tuning.catch_up_speed).min(PLAYER_X);
    }

    PreStep {
        bottom: prev_bottom,
        grounded: was_grounded,
    }
}

/// Apply a jump request immediately
pub fn jump(player: &mut Player, tuning: &Tuning) -> Option<GameEvent> {
    player.try_jump(tuning.jump_strength).then(|| GameEvent::Jumped {
        jump_count: player.jump_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_JUMPS;
    use proptest::prelude::*;

    #[test]
    fn test_gravity_accumulates() {
        let tuning = Tuning::default();
        let mut player = Player::new(PLAYER_X, 100.0);
        let prev = integrate(&mut player, &tuning);
        assert_eq!(prev.bottom, 140.0);
        assert!(!prev.grounded);
        assert!((player.dy - tuning.gravity).abs() < 1e-6);
        integrate(&mut player, &tuning);
        assert!((player.dy - 2.0 * tuning.gravity).abs() < 1e-6);
        assert!((player.rect.y - (100.0 + 3.0 * tuning.gravity)).abs() < 1e-4);
        assert!(!player.grounded);
    }

    #[test]
    fn test_invulnerability_floors_at_zero() {
        let tuning = Tuning::default();
        let mut player = Player::new(PLAYER_X, 100.0);
        player.invulnerable = 2;
        for _ in 0..5 {
            integrate(&mut player, &tuning);
        }
        assert_eq!(player.invulnerable, 0);
    }

    #[test]
    fn test_catch_up_only_when_grounded() {
        let tuning = Tuning::default();
        let mut player = Player::new(PLAYER_X - 10.0, 100.0);
        integrate(&mut player, &tuning);
        assert_eq!(player.rect.x, PLAYER_X - 10.0);

        player.grounded = true;
        integrate(&mut player, &tuning);
        assert_eq!(player.rect.x, PLAYER_X - 10.0 + tuning.catch_up_speed);

        player.rect.x = PLAYER_X - 0.5;
        player.grounded = true;
        integrate(&mut player, &tuning);
        assert_eq!(player.rect.x, PLAYER_X);
    }

    #[test]
    fn test_third_jump_is_noop() {
        let tuning = Tuning::default();
        let mut player = Player::new(PLAYER_X, 300.0);
        player.grounded = true;
        assert_eq!(jump(&mut player, &tuning), Some(GameEvent::Jumped { jump_count: 1 }));
        integrate(&mut player, &tuning);
        assert_eq!(jump(&mut player, &tuning), Some(GameEvent::Jumped { jump_count: 2 }));
        integrate(&mut player, &tuning);
        let dy = player.dy;
        assert_eq!(jump(&mut player, &tuning), None);
        assert_eq!(player.dy, dy);
    }

    proptest! {
        #[test]
        fn prop_jump_count_bounded(presses in proptest::collection::vec(any::<bool>(), 0..200)) {
            let tuning = Tuning::default();
            let mut player = Player::new(PLAYER_X, 300.0);
            player.grounded = true;
            for press in presses {
                if press {
                    jump(&mut player, &tuning);
                }
                integrate(&mut player, &tuning);
                prop_assert!(player.jump_count <= MAX_JUMPS);
            }
        }
    }
}
