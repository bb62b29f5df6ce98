//! Collision resolution on the grid
//!
//! Runs after movement has committed a new head. Checks go in a fixed order:
//! food, SuperFood, self, obstacle. Self and obstacle hits are terminal and
//! skip whatever would follow. Nothing here moves an entity; checks only set
//! flags, relocate food and emit events.

use super::component::{Body, Edible, Layer, Lifetime, Position};
use super::entities;
use super::events::{EventBus, GameEvent, GameOverCause};
use super::placement::CellPicker;
use super::state::GameState;

/// Summary of one collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    pub ate_food: bool,
    pub ate_super_food: bool,
    pub game_over: Option<GameOverCause>,
}

impl CollisionReport {
    pub fn is_terminal(&self) -> bool {
        self.game_over.is_some()
    }
}

/// Resolve all collisions for the current head position
pub fn resolve_collisions(
    state: &mut GameState,
    picker: &mut dyn CellPicker,
    events: &mut EventBus,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let Some(head) = state.snake_head() else {
        return report;
    };

    // The bite animation lasts until the next step
    if let Some(edible) = state.food.as_mut().and_then(|f| f.get_component_mut::<Edible>()) {
        edible.consuming = false;
    }

    if food_hit(state, head) {
        if let Some(edible) = state.food.as_mut().and_then(|f| f.get_component_mut::<Edible>()) {
            edible.consuming = true;
        }
        grow(state);
        state.relocate_food(picker);
        events.emit(GameEvent::FoodEaten);
        report.ate_food = true;
    }

    if super_food_hit(state, head) {
        if let Some(sf) = state.super_food.as_mut() {
            if let Some(life) = sf.get_component_mut::<Lifetime>() {
                life.active = false;
            }
            if let Some(edible) = sf.get_component_mut::<Edible>() {
                edible.consuming = true;
            }
        }
        grow(state);
        events.emit(GameEvent::SuperFoodEaten);
        report.ate_super_food = true;
    }

    if self_hit(state, head) {
        events.emit(GameEvent::GameOver(GameOverCause::SelfCollision));
        report.game_over = Some(GameOverCause::SelfCollision);
        return report;
    }

    if obstacle_hit(state, head) {
        events.emit(GameEvent::GameOver(GameOverCause::Obstacle));
        report.game_over = Some(GameOverCause::Obstacle);
    }

    report
}

fn grow(state: &mut GameState) {
    if let Some(body) = state.snake_body_mut() {
        body.growth_pending = true;
    }
}

/// Head sits exactly on the food cell
pub fn food_hit(state: &GameState, head: Position) -> bool {
    state.food_position() == Some(head)
}

/// Head lies inside an active SuperFood footprint
pub fn super_food_hit(state: &GameState, head: Position) -> bool {
    state
        .super_food
        .as_ref()
        .is_some_and(|sf| entities::is_active(sf) && entities::covers(sf, head))
}

/// Head overlaps any segment behind it
pub fn self_hit(state: &GameState, head: Position) -> bool {
    state
        .snake
        .get_component::<Body>()
        .is_some_and(|body| body.overlaps_trailing(head))
}

pub fn obstacle_hit(state: &GameState, head: Position) -> bool {
    state
        .obstacles
        .iter()
        .filter(|o| entities::layer(o) == Some(Layer::Obstacle))
        .any(|o| entities::covers(o, head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::InputSystem;
    use crate::sim::movement::step;
    use crate::sim::placement::RandomPlacer;
    use crate::sim::state::EdgeMode;
    use crate::sim::{entities, EntityId};

    fn state_with_body(segments: &[(i32, i32)]) -> GameState {
        let mut state = GameState::new(20, EdgeMode::Wrap);
        if let Some(body) = state.snake_body_mut() {
            *body = Body::from_segments(segments.iter().map(|&(x, y)| Position::new(x, y)));
        }
        state
    }

    fn place_food(state: &mut GameState, x: i32, y: i32) {
        let id = state.next_entity_id();
        state.food = Some(entities::food(id, Position::new(x, y)));
    }

    #[test]
    fn test_food_eaten_then_grows_next_tick() {
        let mut state = state_with_body(&[(10, 10)]);
        place_food(&mut state, 11, 10);
        let mut placer = RandomPlacer::new(3);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        step(&mut state, &mut input, &mut events);
        let report = resolve_collisions(&mut state, &mut placer, &mut events);

        assert!(report.ate_food);
        assert_eq!(events.pending(), &[GameEvent::FoodEaten]);
        assert!(state.food_consuming());
        assert_ne!(state.food_position(), Some(Position::new(11, 10)));
        let body = state.snake_body().unwrap();
        assert!(body.growth_pending);
        assert_eq!(body.len(), 1);

        step(&mut state, &mut input, &mut events);
        resolve_collisions(&mut state, &mut placer, &mut events);
        assert_eq!(state.snake_segments(), vec![Position::new(12, 10), Position::new(11, 10)]);
        assert!(!state.snake_body().unwrap().growth_pending);
    }

    #[test]
    fn test_consuming_flag_cleared_next_pass() {
        let mut state = state_with_body(&[(10, 10)]);
        place_food(&mut state, 10, 10);
        let mut placer = RandomPlacer::new(3);
        let mut events = EventBus::new();

        resolve_collisions(&mut state, &mut placer, &mut events);
        assert!(state.food_consuming());

        // Park the food away from the head; the next pass only clears the flag
        if let Some(food) = state.food.as_mut() {
            food.add_component(Position::new(0, 0));
        }
        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert!(!report.ate_food);
        assert!(!state.food_consuming());
    }

    #[test]
    fn test_self_collision_on_second_segment() {
        // Heading down from (5,5) lands on the current second segment (5,6)
        let mut state = state_with_body(&[(5, 5), (5, 6), (5, 7)]);
        if let Some(v) = state.snake.get_component_mut::<crate::sim::Velocity>() {
            *v = crate::sim::Velocity::DOWN;
        }
        let mut placer = RandomPlacer::new(1);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        step(&mut state, &mut input, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(5, 6)));
        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert_eq!(report.game_over, Some(GameOverCause::SelfCollision));
        assert_eq!(events.pending(), &[GameEvent::GameOver(GameOverCause::SelfCollision)]);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        // A 2x2 loop: head (5,5) heading down into (5,6), the current tail
        let mut state = state_with_body(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        if let Some(v) = state.snake.get_component_mut::<crate::sim::Velocity>() {
            *v = crate::sim::Velocity::DOWN;
        }
        let mut placer = RandomPlacer::new(1);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        step(&mut state, &mut input, &mut events);
        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(5, 6)));
        assert!(!report.is_terminal());
        assert!(events.pending().is_empty());
    }

    #[test]
    fn test_tail_kept_when_growing_is_a_hit() {
        let mut state = state_with_body(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        if let Some(v) = state.snake.get_component_mut::<crate::sim::Velocity>() {
            *v = crate::sim::Velocity::DOWN;
        }
        if let Some(body) = state.snake_body_mut() {
            body.growth_pending = true;
        }
        let mut placer = RandomPlacer::new(1);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        step(&mut state, &mut input, &mut events);
        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert_eq!(report.game_over, Some(GameOverCause::SelfCollision));
    }

    #[test]
    fn test_super_food_any_cell() {
        let mut state = state_with_body(&[(7, 8)]);
        let id = state.next_entity_id();
        state.super_food = Some(entities::super_food(id, Position::new(6, 7), 0, 5_000));
        let mut placer = RandomPlacer::new(1);
        let mut events = EventBus::new();

        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert!(report.ate_super_food);
        assert_eq!(events.pending(), &[GameEvent::SuperFoodEaten]);
        assert!(state.snake_body().unwrap().growth_pending);
        assert!(state.super_food_cells().is_empty());

        // Inactive SuperFood cannot be eaten twice
        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert!(!report.ate_super_food);
    }

    #[test]
    fn test_obstacle_hit() {
        let mut state = state_with_body(&[(3, 3)]);
        state.obstacles.push(entities::obstacle(EntityId(90), Position::new(3, 3)));
        let mut placer = RandomPlacer::new(1);
        let mut events = EventBus::new();

        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert_eq!(report.game_over, Some(GameOverCause::Obstacle));
    }

    #[test]
    fn test_self_hit_short_circuits_obstacle() {
        let mut state = state_with_body(&[(3, 3), (3, 4), (3, 3)]);
        state.obstacles.push(entities::obstacle(EntityId(90), Position::new(3, 3)));
        let mut placer = RandomPlacer::new(1);
        let mut events = EventBus::new();

        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert_eq!(report.game_over, Some(GameOverCause::SelfCollision));
        assert_eq!(events.pending().len(), 1);
    }

    #[test]
    fn test_food_and_death_same_tick() {
        let mut state = state_with_body(&[(3, 3), (3, 4), (3, 3)]);
        place_food(&mut state, 3, 3);
        let mut placer = RandomPlacer::new(1);
        let mut events = EventBus::new();

        let report = resolve_collisions(&mut state, &mut placer, &mut events);
        assert!(report.ate_food);
        assert!(report.is_terminal());
        assert_eq!(
            events.pending(),
            &[GameEvent::FoodEaten, GameEvent::GameOver(GameOverCause::SelfCollision)]
        );
    }

    #[test]
    fn test_untagged_obstacle_ignored() {
        let mut state = state_with_body(&[(3, 3)]);
        let mut decoy = entities::obstacle(EntityId(91), Position::new(3, 3));
        decoy.remove_component::<crate::sim::Collidable>();
        state.obstacles.push(decoy);
        let mut placer = RandomPlacer::new(1);
        let mut events = EventBus::new();

        assert!(!resolve_collisions(&mut state, &mut placer, &mut events).is_terminal());
    }
}
