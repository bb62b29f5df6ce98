//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time only from the injected `Clock`
//! - Seeded RNG only
//! - Fixed system order per frame: Input → Movement → Collision
//! - No rendering, audio or storage dependencies

pub mod clock;
pub mod collision;
pub mod component;
pub mod engine;
pub mod entities;
pub mod entity;
pub mod events;
pub mod input;
pub mod movement;
pub mod placement;
pub mod state;

pub use clock::{Clock, FrameHandle, FrameQueue, FrameScheduler, ManualClock, SystemClock};
pub use collision::{CollisionReport, resolve_collisions};
pub use component::{
    Body, Collidable, Component, ComponentKind, Direction, Edible, Footprint, Layer, Lifetime,
    Position, Velocity,
};
pub use engine::Engine;
pub use entity::{Entity, EntityId};
pub use events::{EventBus, GameEvent, GameOverCause};
pub use input::{InputSystem, Key};
pub use movement::{MoveOutcome, MovementSystem};
pub use placement::{CellPicker, RandomPlacer};
pub use state::{EdgeMode, GamePhase, GameState};
