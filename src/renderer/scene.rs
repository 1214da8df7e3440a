//! Back-to-front scene drawing
//!
//! Playing frames go background, grid, candles, drones, projectiles, goal,
//! trader, HUD. The other phases draw a static screen (over the frozen world
//! where there is one).

use super::colors;
use super::{Font, Surface, TextAlign};
use crate::Rect;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{EntityKind, GameMode, GamePhase, GameState, PlatformColor};

const GRID_SPACING: f32 = 50.0;
const WICK_WIDTH: f32 = 4.0;
const WICK_HEIGHT: f32 = 15.0;

/// Responsive scale for a host viewport of `client_width` CSS pixels
pub fn viewport_scale(client_width: f32, settings: &Settings) -> f32 {
    if !settings.responsive_scale || client_width <= 0.0 {
        return 1.0;
    }
    (client_width / PLAYFIELD_WIDTH).min(1.0)
}

/// Draw one frame of `state`
pub fn render<S: Surface + ?Sized>(surface: &mut S, state: &GameState, settings: &Settings, scale: f32) {
    if !surface.is_ready() {
        return;
    }
    surface.clear(colors::BACKGROUND);
    surface.set_scale(scale);

    match state.phase() {
        GamePhase::Menu => draw_menu(surface, state),
        GamePhase::Start => {
            draw_world(surface, state, settings);
            draw_overlay(surface);
            draw_title(surface, "FullMargin Trader", "Press Space or Click to Start");
            let mode = state.mode();
            centered(
                surface,
                &format!("{} mode - {} lives", mode.as_str(), state.session.lives),
                PLAYFIELD_HEIGHT * 0.5 + 60.0,
                Font::new(16.0),
                colors::TEXT_DIM,
            );
        }
        GamePhase::Playing => {
            draw_world(surface, state, settings);
            draw_hud(surface, state);
        }
        GamePhase::GameOver => {
            draw_world(surface, state, settings);
            draw_overlay(surface);
            draw_title(
                surface,
                "LIQUIDATED",
                &format!("Final P&L: ${}", state.session.score),
            );
            centered(
                surface,
                &format!("Level {} - Space to trade again", state.session.level),
                PLAYFIELD_HEIGHT * 0.5 + 60.0,
                Font::new(16.0),
                colors::TEXT_DIM,
            );
        }
        GamePhase::LevelComplete => {
            draw_world(surface, state, settings);
            draw_overlay(surface);
            draw_title(
                surface,
                "TAKE PROFIT!",
                &format!("Level {} closed at ${}", state.session.level, state.session.score),
            );
            centered(
                surface,
                "Space for the next level",
                PLAYFIELD_HEIGHT * 0.5 + 60.0,
                Font::new(16.0),
                colors::TEXT_DIM,
            );
        }
    }
}

fn draw_world<S: Surface + ?Sized>(surface: &mut S, state: &GameState, settings: &Settings) {
    if settings.show_grid {
        draw_grid(surface, state.world.frame as f32 * state.world.scroll_speed);
    }

    let entities = &state.world.entities;
    for e in entities {
        if let EntityKind::Platform { color } = e.kind {
            let fill = match color {
                PlatformColor::Green => colors::CANDLE_GREEN,
                PlatformColor::Red => colors::CANDLE_RED,
                PlatformColor::Checkpoint => colors::CANDLE_CHECKPOINT,
            };
            surface.fill_rect(e.rect, fill);
            let wick_x = e.rect.x + e.rect.w * 0.5 - WICK_WIDTH * 0.5;
            surface.fill_rect(
                Rect::new(wick_x, e.rect.y - WICK_HEIGHT, WICK_WIDTH, WICK_HEIGHT),
                fill,
            );
        }
    }

    for e in entities.iter().filter(|e| matches!(e.kind, EntityKind::Enemy { .. })) {
        surface.fill_rect(e.rect, colors::DRONE);
        surface.fill_text(
            "BANK",
            e.rect.x + e.rect.w * 0.5,
            e.rect.y + e.rect.h * 0.6,
            Font::new(10.0),
            TextAlign::Center,
            colors::TEXT,
        );
    }

    for e in entities
        .iter()
        .filter(|e| matches!(e.kind, EntityKind::Projectile { .. }))
    {
        surface.fill_rect(e.rect, colors::PROJECTILE);
    }

    if let Some(goal) = state.world.goal() {
        surface.fill_rect(goal.rect, colors::GOAL);
        if let Some(line) = goal.finish_line() {
            surface.fill_rect(
                Rect::new(line - 2.0, goal.rect.y - 60.0, 4.0, 60.0),
                colors::FINISH_LINE,
            );
            surface.fill_text(
                "TP",
                line,
                goal.rect.y - 66.0,
                Font::bold(16.0),
                TextAlign::Center,
                colors::TEXT,
            );
        }
    }

    let player = &state.world.player;
    // Blink while invulnerable
    let visible = !player.is_invulnerable() || (player.invulnerable / 8) % 2 == 0;
    if visible {
        surface.fill_rect(player.rect, colors::PLAYER);
        surface.fill_rect(
            Rect::new(player.rect.x + 25.0, player.rect.y + 10.0, 8.0, 8.0),
            colors::PLAYER_EYE,
        );
    }
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, scrolled: f32) {
    let shift = scrolled % GRID_SPACING;
    let mut x = -shift;
    while x < PLAYFIELD_WIDTH {
        surface.fill_rect(Rect::new(x, 0.0, 1.0, PLAYFIELD_HEIGHT), colors::GRID);
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < PLAYFIELD_HEIGHT {
        surface.fill_rect(Rect::new(0.0, y, PLAYFIELD_WIDTH, 1.0), colors::GRID);
        y += GRID_SPACING;
    }
}

fn draw_hud<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    let session = &state.session;
    let hud = Font::new(20.0);
    surface.fill_text(
        &format!("P&L: ${}", session.score),
        PLAYFIELD_WIDTH - 20.0,
        40.0,
        hud,
        TextAlign::Right,
        colors::TEXT,
    );
    surface.fill_text(
        &format!("Level {}  Lives {}", session.level, session.lives),
        20.0,
        40.0,
        hud,
        TextAlign::Left,
        colors::TEXT,
    );

    // Progress bar toward the goal
    let bar = Rect::new(20.0, 56.0, 200.0, 6.0);
    surface.fill_rect(bar, colors::TEXT_DIM);
    surface.fill_rect(
        Rect::new(bar.x, bar.y, bar.w * state.progress(), bar.h),
        colors::PROGRESS,
    );
    if state.mode() == GameMode::Standard {
        let marker = if session.checkpoint_reached {
            colors::CANDLE_CHECKPOINT
        } else {
            colors::TEXT_DIM
        };
        surface.fill_rect(Rect::new(bar.x + bar.w * 0.5 - 1.0, bar.y - 3.0, 2.0, 12.0), marker);
    }
}

fn draw_menu<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    draw_title(surface, "FullMargin Trader", "Avoid the banks, ride the candles");
    let lines = [
        "[S] Standard - 3 lives, checkpoint".to_string(),
        "[H] Hardcore - 1 life".to_string(),
        format!("[1/2/3] Speed: {}", state.session.speed.as_str()),
    ];
    for (i, line) in lines.iter().enumerate() {
        centered(
            surface,
            line,
            PLAYFIELD_HEIGHT * 0.5 + 60.0 + i as f32 * 26.0,
            Font::new(16.0),
            colors::TEXT_DIM,
        );
    }
}

fn draw_overlay<S: Surface + ?Sized>(surface: &mut S) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
        colors::OVERLAY,
    );
}

fn draw_title<S: Surface + ?Sized>(surface: &mut S, title: &str, subtitle: &str) {
    let mid = PLAYFIELD_HEIGHT * 0.5;
    centered(surface, title, mid - 20.0, Font::bold(30.0), colors::TEXT);
    centered(surface, subtitle, mid + 20.0, Font::new(20.0), colors::TEXT);
}

fn centered<S: Surface + ?Sized>(surface: &mut S, text: &str, y: f32, font: Font, color: &str) {
    surface.fill_text(text, PLAYFIELD_WIDTH * 0.5, y, font, TextAlign::Center, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Entity, InputAction, apply};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Scale(f32),
        Rect(String),
        Text(String),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        torn_down: bool,
    }

    impl Surface for Recorder {
        fn is_ready(&self) -> bool {
            !self.torn_down
        }
        fn clear(&mut self, _color: &str) {
            self.ops.push(Op::Clear);
        }
        fn set_scale(&mut self, scale: f32) {
            self.ops.push(Op::Scale(scale));
        }
        fn fill_rect(&mut self, _rect: Rect, color: &str) {
            self.ops.push(Op::Rect(color.to_string()));
        }
        fn fill_text(&mut self, text: &str, _x: f32, _y: f32, _f: Font, _a: TextAlign, _c: &str) {
            self.ops.push(Op::Text(text.to_string()));
        }
    }

    impl Recorder {
        fn first(&self, color: &str) -> usize {
            self.ops
                .iter()
                .position(|op| *op == Op::Rect(color.to_string()))
                .unwrap_or_else(|| panic!("{color} never drawn"))
        }
        fn last(&self, color: &str) -> usize {
            self.ops
                .iter()
                .rposition(|op| *op == Op::Rect(color.to_string()))
                .unwrap_or_else(|| panic!("{color} never drawn"))
        }
    }

    fn busy_state() -> GameState {
        let mut state = GameState::default();
        apply(&mut state, InputAction::SelectMode(GameMode::Standard));
        apply(&mut state, InputAction::Jump);
        state.world.player.invulnerable = 0;
        let world = &mut state.world;
        let id = world.next_entity_id();
        world.entities.push(Entity::drone(id, 400.0, 200.0, 0.0, 50));
        let id = world.next_entity_id();
        world.entities.push(Entity::projectile(id, 380.0, 220.0, glam::Vec2::new(-4.0, 0.0)));
        let id = world.next_entity_id();
        world.entities.push(Entity::goal(id, 500.0, 400.0, 400.0, 100.0));
        let id = world.next_entity_id();
        world.entities.push(Entity::platform(id, 950.0, 300.0, 80.0, PlatformColor::Red));
        state
    }

    #[test]
    fn test_back_to_front_order() {
        let state = busy_state();
        let mut rec = Recorder::default();
        render(&mut rec, &state, &Settings::default(), 1.0);

        assert_eq!(rec.ops[0], Op::Clear);
        assert_eq!(rec.ops[1], Op::Scale(1.0));
        assert!(rec.last(colors::GRID) < rec.first(colors::CANDLE_GREEN));
        assert!(rec.last(colors::CANDLE_RED) < rec.first(colors::DRONE));
        assert!(rec.last(colors::DRONE) < rec.first(colors::PROJECTILE));
        assert!(rec.last(colors::PROJECTILE) < rec.first(colors::GOAL));
        assert!(rec.last(colors::GOAL) < rec.first(colors::PLAYER));
        let hud = rec
            .ops
            .iter()
            .position(|op| matches!(op, Op::Text(t) if t.starts_with("P&L")))
            .unwrap();
        assert!(rec.first(colors::PLAYER) < hud);
    }

    #[test]
    fn test_grid_toggle() {
        let state = busy_state();
        let settings = Settings {
            show_grid: false,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        render(&mut rec, &state, &settings, 1.0);
        assert!(!rec.ops.contains(&Op::Rect(colors::GRID.to_string())));
    }

    #[test]
    fn test_torn_down_surface_is_noop() {
        let state = busy_state();
        let mut rec = Recorder {
            torn_down: true,
            ..Default::default()
        };
        render(&mut rec, &state, &Settings::default(), 1.0);
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn test_game_over_screen() {
        let mut state = busy_state();
        state.session.score = 420;
        let mut events = Vec::new();
        crate::sim::session::game_over(&mut state, &mut events);
        let mut rec = Recorder::default();
        render(&mut rec, &state, &Settings::default(), 1.0);
        assert!(rec.ops.contains(&Op::Text("LIQUIDATED".into())));
        assert!(rec.ops.contains(&Op::Text("Final P&L: $420".into())));
    }

    #[test]
    fn test_menu_draws_no_world() {
        let state = GameState::default();
        let mut rec = Recorder::default();
        render(&mut rec, &state, &Settings::default(), 1.0);
        assert!(!rec.ops.iter().any(|op| matches!(op, Op::Rect(_))));
        assert!(rec.ops.contains(&Op::Text("FullMargin Trader".into())));
    }

    #[test]
    fn test_viewport_scale() {
        let settings = Settings::default();
        assert_eq!(viewport_scale(1200.0, &settings), 1.0);
        assert_eq!(viewport_scale(400.0, &settings), 0.5);
        let fixed = Settings {
            responsive_scale: false,
            ..Default::default()
        };
        assert_eq!(viewport_scale(400.0, &fixed), 1.0);
    }
}
