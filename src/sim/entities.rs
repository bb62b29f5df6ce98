//! Entity archetypes
//!
//! Each game object is a plain `Entity` assembled from components:
//!
//! | archetype | components                                          |
//! |-----------|-----------------------------------------------------|
//! | Snake     | Body, Velocity, Collidable(Snake)                   |
//! | Food      | Position, Edible, Collidable(Food)                  |
//! | SuperFood | Position, Footprint, Lifetime, Edible, Collidable(Food) |
//! | Obstacle  | Position, Collidable(Obstacle)                      |

use super::component::{
    Body, Collidable, Edible, Footprint, Layer, Lifetime, Position, Velocity,
};
use super::entity::{Entity, EntityId};
use crate::consts::SUPER_FOOD_SIZE;

/// Snake with a single segment at `head`, heading right
pub fn snake(id: EntityId, head: Position) -> Entity {
    Entity::new(id)
        .with(Body::new(head))
        .with(Velocity::default())
        .with(Collidable::new(Layer::Snake))
}

pub fn food(id: EntityId, at: Position) -> Entity {
    Entity::new(id)
        .with(at)
        .with(Edible::default())
        .with(Collidable::new(Layer::Food))
}

/// SuperFood whose square footprint is anchored (top-left) at `anchor`
pub fn super_food(id: EntityId, anchor: Position, spawned_at_ms: u64, lifetime_ms: u64) -> Entity {
    Entity::new(id)
        .with(anchor)
        .with(Footprint::new(SUPER_FOOD_SIZE))
        .with(Lifetime::new(spawned_at_ms, lifetime_ms))
        .with(Edible::default())
        .with(Collidable::new(Layer::Food))
}

pub fn obstacle(id: EntityId, at: Position) -> Entity {
    Entity::new(id)
        .with(at)
        .with(Collidable::new(Layer::Obstacle))
}

/// Every cell the entity occupies.
///
/// A Body yields its segments, a Footprint its square, a bare Position its
/// single cell. Entities without any of these occupy nothing.
pub fn covered_cells(entity: &Entity) -> Vec<Position> {
    if let Some(body) = entity.get_component::<Body>() {
        return body.segments().iter().copied().collect();
    }
    let Some(&anchor) = entity.get_component::<Position>() else {
        return Vec::new();
    };
    match entity.get_component::<Footprint>() {
        Some(fp) => fp.cells(anchor),
        None => vec![anchor],
    }
}

/// True if the entity occupies `pos`
pub fn covers(entity: &Entity, pos: Position) -> bool {
    if let Some(body) = entity.get_component::<Body>() {
        return body.contains(pos);
    }
    let Some(&anchor) = entity.get_component::<Position>() else {
        return false;
    };
    match entity.get_component::<Footprint>() {
        Some(fp) => fp.covers(anchor, pos),
        None => anchor == pos,
    }
}

/// Collision layer, if the entity takes part in collisions
pub fn layer(entity: &Entity) -> Option<Layer> {
    entity.get_component::<Collidable>().map(|c| c.layer)
}

/// False once a SuperFood is eaten or has expired
pub fn is_active(entity: &Entity) -> bool {
    entity
        .get_component::<Lifetime>()
        .map(|l| l.active)
        .unwrap_or(true)
}
