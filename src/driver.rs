//! Frame loop driver
//!
//! The host calls [`FrameLoop::frame`] once per display refresh and keeps
//! scheduling only while the returned report asks for it. Input arrives
//! between frames through [`FrameLoop::handle_input`].

use rand_pcg::Pcg32;

use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, HudSnapshot, InputAction, RandomSource};

/// Outcome of one display-refresh callback
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// Request another frame (still playing, not cancelled)
    pub reschedule: bool,
    /// HUD values to push, on discrete events or every `hud_interval` ticks
    pub hud: Option<HudSnapshot>,
    /// Everything the tick emitted
    pub events: Vec<GameEvent>,
}

/// Owns the game state and drives it one tick per frame
pub struct FrameLoop<R: RandomSource = Pcg32> {
    state: GameState,
    rng: R,
    settings: Settings,
    scale: f32,
    cancelled: bool,
}

impl<R: RandomSource> FrameLoop<R> {
    pub fn new(settings: Settings, rng: R) -> Self {
        let mut state = GameState::new(settings.tuning.clone());
        state.session.speed = settings.speed;
        Self {
            state,
            rng,
            settings,
            scale: 1.0,
            cancelled: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Recompute the responsive scale for a host viewport width
    pub fn set_viewport_width(&mut self, client_width: f32) {
        self.scale = renderer::viewport_scale(client_width, &self.settings);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// True while frames should keep being scheduled
    pub fn is_running(&self) -> bool {
        !self.cancelled && self.state.phase() == GamePhase::Playing
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Host teardown: no further mutation or rescheduling
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::info!("Frame loop cancelled");
        }
        self.cancelled = true;
    }

    /// Apply host input immediately
    pub fn handle_input(&mut self, action: InputAction) -> Vec<GameEvent> {
        if self.cancelled {
            return Vec::new();
        }
        crate::sim::apply(&mut self.state, action)
    }

    /// One display refresh: tick (when playing), then draw the result
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: Option<&mut S>) -> FrameReport {
        if self.cancelled {
            return FrameReport::default();
        }
        let Some(surface) = surface.filter(|s| s.is_ready()) else {
            log::debug!("No drawing surface, skipping frame");
            return FrameReport::default();
        };

        let ticked = self.state.phase() == GamePhase::Playing;
        let events = crate::sim::tick(&mut self.state, &mut self.rng);
        renderer::render(surface, &self.state, &self.settings, self.scale);

        let sampled = ticked && self.state.world.frame % self.settings.hud_interval.max(1) == 0;
        let discrete = events.iter().any(|e| !e.is_cosmetic());
        FrameReport {
            reschedule: self.is_running(),
            hud: (sampled || discrete).then(|| self.state.hud()),
            events,
        }
    }

    /// Draw the current state without advancing it (static screens)
    pub fn redraw<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.cancelled {
            return;
        }
        renderer::render(surface, &self.state, &self.settings, self.scale);
    }
}
