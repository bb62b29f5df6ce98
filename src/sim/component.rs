//! Data components
//!
//! Plain data attached to entities. Every component type has a matching
//! `ComponentKind` tag and `ComponentSlot` variant so an entity can store them
//! in one keyed table.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell one step along `velocity` (may be off the board)
    pub fn stepped(self, velocity: Velocity) -> Self {
        let v = IVec2::new(self.x, self.y) + velocity.delta();
        Self::new(v.x, v.y)
    }

    /// True if both coordinates lie in [0, board_size)
    pub fn in_bounds(self, board_size: i32) -> bool {
        (0..board_size).contains(&self.x) && (0..board_size).contains(&self.y)
    }

    /// Fold out-of-range coordinates onto the opposite edge
    pub fn wrapped(self, board_size: i32) -> Self {
        Self::new(self.x.rem_euclid(board_size), self.y.rem_euclid(board_size))
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Cardinal direction requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn velocity(self) -> Velocity {
        match self {
            Direction::Up => Velocity::UP,
            Direction::Down => Velocity::DOWN,
            Direction::Left => Velocity::LEFT,
            Direction::Right => Velocity::RIGHT,
        }
    }
}

/// Unit grid direction. Screen convention: negative y is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Velocity(IVec2);

impl Velocity {
    pub const UP: Velocity = Velocity(IVec2::NEG_Y);
    pub const DOWN: Velocity = Velocity(IVec2::Y);
    pub const LEFT: Velocity = Velocity(IVec2::NEG_X);
    pub const RIGHT: Velocity = Velocity(IVec2::X);

    pub fn delta(self) -> IVec2 {
        self.0
    }

    pub fn is_reverse_of(self, other: Velocity) -> bool {
        self.0 == -other.0
    }

    /// Replace the velocity unless `next` would reverse it.
    ///
    /// Returns whether the update was accepted.
    pub fn steer(&mut self, next: Velocity) -> bool {
        if next.is_reverse_of(*self) {
            return false;
        }
        *self = next;
        true
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Velocity::RIGHT
    }
}

/// Collision classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Snake,
    Food,
    Wall,
    Obstacle,
}

/// Marks an entity as taking part in collision checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collidable {
    pub layer: Layer,
}

impl Collidable {
    pub fn new(layer: Layer) -> Self {
        Self { layer }
    }
}

/// Snake body: head at the front, tail at the back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BodyRepr")]
pub struct Body {
    segments: VecDeque<Position>,
    /// Next committed move keeps the tail
    pub growth_pending: bool,
}

/// Wire form of [`Body`], checked before it becomes one
#[derive(Deserialize)]
struct BodyRepr {
    segments: VecDeque<Position>,
    #[serde(default)]
    growth_pending: bool,
}

impl TryFrom<BodyRepr> for Body {
    type Error = String;

    fn try_from(repr: BodyRepr) -> Result<Self, Self::Error> {
        if repr.segments.is_empty() {
            return Err("snake body needs at least one segment".to_string());
        }
        Ok(Self {
            segments: repr.segments,
            growth_pending: repr.growth_pending,
        })
    }
}

impl Body {
    pub fn new(head: Position) -> Self {
        Self::from_segments([head])
    }

    /// Build a body from head-first segments.
    ///
    /// An empty iterator yields a single segment at the origin; a body is never empty.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        let mut segments: VecDeque<Position> = segments.into_iter().collect();
        if segments.is_empty() {
            segments.push_back(Position::new(0, 0));
        }
        Self {
            segments,
            growth_pending: false,
        }
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// True if `pos` matches any segment other than the head
    pub fn overlaps_trailing(&self, pos: Position) -> bool {
        self.segments.iter().skip(1).any(|&s| s == pos)
    }

    /// Prepend a new head and pop the tail unless growth is pending.
    pub fn advance(&mut self, new_head: Position) {
        self.segments.push_front(new_head);
        if self.growth_pending {
            self.growth_pending = false;
        } else {
            self.segments.pop_back();
        }
    }
}

/// Something the snake can eat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Edible {
    /// Set on the tick it was eaten; renderers use it for the bite animation
    pub consuming: bool,
}

/// Square area anchored at the entity's Position (top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub size: i32,
}

impl Footprint {
    pub fn new(size: i32) -> Self {
        Self { size: size.max(1) }
    }

    /// All covered cells, row by row
    pub fn cells(&self, anchor: Position) -> Vec<Position> {
        (0..self.size)
            .flat_map(|dy| (0..self.size).map(move |dx| Position::new(anchor.x + dx, anchor.y + dy)))
            .collect()
    }

    pub fn covers(&self, anchor: Position, pos: Position) -> bool {
        (anchor.x..anchor.x + self.size).contains(&pos.x)
            && (anchor.y..anchor.y + self.size).contains(&pos.y)
    }
}

/// Limited lifetime measured on the injected clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifetime {
    pub spawned_at_ms: u64,
    pub duration_ms: u64,
    pub active: bool,
}

impl Lifetime {
    pub fn new(spawned_at_ms: u64, duration_ms: u64) -> Self {
        Self {
            spawned_at_ms,
            duration_ms,
            active: true,
        }
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        (self.spawned_at_ms + self.duration_ms).saturating_sub(now_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        self.remaining_ms(now_ms) == 0
    }
}

/// Tag for each storable component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Position,
    Velocity,
    Collidable,
    Body,
    Edible,
    Footprint,
    Lifetime,
}

/// Type-erased storage for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentSlot {
    Position(Position),
    Velocity(Velocity),
    Collidable(Collidable),
    Body(Body),
    Edible(Edible),
    Footprint(Footprint),
    Lifetime(Lifetime),
}

impl ComponentSlot {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSlot::Position(_) => ComponentKind::Position,
            ComponentSlot::Velocity(_) => ComponentKind::Velocity,
            ComponentSlot::Collidable(_) => ComponentKind::Collidable,
            ComponentSlot::Body(_) => ComponentKind::Body,
            ComponentSlot::Edible(_) => ComponentKind::Edible,
            ComponentSlot::Footprint(_) => ComponentKind::Footprint,
            ComponentSlot::Lifetime(_) => ComponentKind::Lifetime,
        }
    }
}

/// A type that can live in an entity's component table
pub trait Component: Sized {
    const KIND: ComponentKind;

    fn into_slot(self) -> ComponentSlot;
    fn from_slot(slot: &ComponentSlot) -> Option<&Self>;
    fn from_slot_mut(slot: &mut ComponentSlot) -> Option<&mut Self>;
    fn take_slot(slot: ComponentSlot) -> Option<Self>;
}

macro_rules! impl_component {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$ty;

                fn into_slot(self) -> ComponentSlot {
                    ComponentSlot::$ty(self)
                }

                fn from_slot(slot: &ComponentSlot) -> Option<&Self> {
                    match slot {
                        ComponentSlot::$ty(c) => Some(c),
                        _ => None,
                    }
                }

                fn from_slot_mut(slot: &mut ComponentSlot) -> Option<&mut Self> {
                    match slot {
                        ComponentSlot::$ty(c) => Some(c),
                        _ => None,
                    }
                }

                fn take_slot(slot: ComponentSlot) -> Option<Self> {
                    match slot {
                        ComponentSlot::$ty(c) => Some(c),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_component!(Position, Velocity, Collidable, Body, Edible, Footprint, Lifetime);
