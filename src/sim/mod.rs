//! Simulation module
//!
//! All gameplay logic lives here and none of it touches a drawing surface:
//! - One tick per display refresh, only while playing
//! - Randomness is injected through `RandomSource`
//! - Entities are appended at the tail and culled from anywhere

pub mod collision;
pub mod entity;
pub mod event;
pub mod generator;
pub mod lifecycle;
pub mod physics;
pub mod random;
pub mod respawn;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::Resolution;
pub use entity::{Entity, EntityKind, PlatformColor, Player};
pub use event::{GameEvent, LifeLossCause};
pub use generator::{Spawn, generate};
pub use random::{RandomSource, ScriptedRandom};
pub use session::{InputAction, apply};
pub use state::{GameMode, GamePhase, GameState, HudSnapshot, Session, World};
pub use tick::tick;
