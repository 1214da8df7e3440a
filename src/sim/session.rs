//! Session state machine
//!
//! ```text
//! menu -> start -> playing -> gameover      -> playing (retry) | menu
//!                          -> levelcomplete -> playing (next level)
//! ```

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::physics;
use super::respawn;
use super::state::{GameMode, GamePhase, GameState};
use crate::settings::SpeedPreset;

/// Discrete input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    /// Jump while playing; confirm / retry / next level elsewhere
    Jump,
    SelectMode(GameMode),
    SelectSpeed(SpeedPreset),
    Retry,
    NextLevel,
    Menu,
}

/// Apply an input action immediately, returning the events it caused
pub fn apply(state: &mut GameState, action: InputAction) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match (state.phase(), action) {
        (GamePhase::Playing, InputAction::Jump) => {
            events.extend(physics::jump(&mut state.world.player, &state.tuning));
        }
        (GamePhase::Start, InputAction::Jump) => confirm(state, &mut events),
        (GamePhase::GameOver, InputAction::Jump | InputAction::Retry) => retry(state, &mut events),
        (GamePhase::LevelComplete, InputAction::Jump | InputAction::NextLevel) => {
            advance_level(state, &mut events)
        }
        (GamePhase::Menu, InputAction::SelectMode(mode)) => choose_mode(state, mode, &mut events),
        (GamePhase::Menu, InputAction::SelectSpeed(speed)) => {
            state.session.speed = speed;
            log::info!("Speed preference: {}", speed.as_str());
        }
        (GamePhase::GameOver | GamePhase::Start, InputAction::Menu) => {
            return_to_menu(state, &mut events)
        }
        (phase, action) => log::debug!("Ignoring {action:?} in {}", phase.as_str()),
    }
    events
}

fn set_phase(state: &mut GameState, to: GamePhase, events: &mut Vec<GameEvent>) {
    let from = state.session.phase;
    if from == to {
        return;
    }
    state.session.phase = to;
    events.push(GameEvent::PhaseChanged { from, to });
    log::info!("Phase {} -> {}", from.as_str(), to.as_str());
}

/// Reset progression for a fresh run in the current mode
fn reset_run(state: &mut GameState) {
    let lives = state.tuning.mode(state.mode()).lives;
    let session = &mut state.session;
    session.level = 1;
    session.score = 0;
    session.lives = lives;
    session.distance = 0.0;
    session.checkpoint_reached = false;
    state.world.clear();
    state.world.frame = 0;
}

/// Menu: pick a mode, which sets starting lives and moves to the start screen
pub fn choose_mode(state: &mut GameState, mode: GameMode, events: &mut Vec<GameEvent>) {
    state.session.mode = Some(mode);
    reset_run(state);
    log::info!(
        "Mode {} selected ({} lives, speed {})",
        mode.as_str(),
        state.session.lives,
        state.session.speed.as_str()
    );
    set_phase(state, GamePhase::Start, events);
}

/// Start screen confirmed: place the trader and begin
pub fn confirm(state: &mut GameState, events: &mut Vec<GameEvent>) {
    respawn::respawn(state, events);
    set_phase(state, GamePhase::Playing, events);
}

/// Lives exhausted
pub fn game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::GameOver {
        score: state.session.score,
        level: state.session.level,
    });
    log::info!(
        "Liquidated on level {} with P&L ${}",
        state.session.level,
        state.session.score
    );
    set_phase(state, GamePhase::GameOver, events);
}

/// Finish line crossed
pub fn complete_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase() != GamePhase::Playing {
        return;
    }
    events.push(GameEvent::LevelComplete {
        level: state.session.level,
    });
    log::info!(
        "Level {} complete (P&L ${})",
        state.session.level,
        state.session.score
    );
    set_phase(state, GamePhase::LevelComplete, events);
}

/// Next level: longer target, checkpoint cleared, lives restored in standard
pub fn advance_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.session.level += 1;
    state.session.checkpoint_reached = false;
    if state.mode() == GameMode::Standard {
        state.session.lives = state.tuning.standard.lives;
    }
    state.world.frame = 0;
    respawn::place_at_origin(state);
    state.world.player.invulnerable = state.tuning.respawn_invulnerability_ticks;
    log::info!(
        "Level {} (target distance {:.0})",
        state.session.level,
        state.target_distance()
    );
    set_phase(state, GamePhase::Playing, events);
}

/// Full reset in the same mode, straight back into play
pub fn retry(state: &mut GameState, events: &mut Vec<GameEvent>) {
    reset_run(state);
    events.push(GameEvent::ScoreChanged { score: 0 });
    confirm(state, events);
}

/// Back to mode selection; clears mode and level
pub fn return_to_menu(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.session.mode = None;
    reset_run(state);
    state.session.lives = 0;
    set_phase(state, GamePhase::Menu, events);
}
