//! Movement system
//!
//! Frames arrive faster than the snake moves. Elapsed time accumulates until
//! it reaches the move interval, then exactly one grid step is committed and
//! the accumulator restarts from zero.

use super::component::{Body, Position, Velocity};
use super::events::{EventBus, GameEvent};
use super::input::InputSystem;
use super::state::{EdgeMode, GameState};
use crate::consts::INTERVAL_FLOOR_MS;

/// What a frame's movement update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Interval not reached yet (or nothing to move)
    Waiting,
    /// A step was committed; collision checks should run
    Moved { head: Position },
    /// Wall mode: the step would leave the board; nothing was mutated
    HitWall { candidate: Position },
}

#[derive(Debug, Clone)]
pub struct MovementSystem {
    accumulator_ms: u64,
    interval_ms: u64,
    min_interval_ms: u64,
}

impl MovementSystem {
    pub fn new(interval_ms: u64, min_interval_ms: u64) -> Self {
        let min_interval_ms = min_interval_ms.max(INTERVAL_FLOOR_MS);
        Self {
            accumulator_ms: 0,
            interval_ms: interval_ms.max(min_interval_ms),
            min_interval_ms,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// Change the cadence; values below the minimum are clamped
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms.max(self.min_interval_ms);
    }

    /// Shorten the interval by `step_ms`, never past the minimum
    pub fn speed_up(&mut self, step_ms: u64) {
        self.set_interval(self.interval_ms.saturating_sub(step_ms));
    }

    /// Forget partially accumulated time (new session, resume)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0;
    }

    /// Advance the accumulator by `dt_ms` and step once if the interval is reached
    pub fn update(
        &mut self,
        dt_ms: u64,
        state: &mut GameState,
        input: &mut InputSystem,
        events: &mut EventBus,
    ) -> MoveOutcome {
        self.accumulator_ms += dt_ms;
        if self.accumulator_ms < self.interval_ms {
            return MoveOutcome::Waiting;
        }
        self.accumulator_ms = 0;
        step(state, input, events)
    }
}

/// Perform one discrete move, ignoring the cadence
pub fn step(state: &mut GameState, input: &mut InputSystem, events: &mut EventBus) -> MoveOutcome {
    let board_size = state.board_size;
    let edge = state.edge;

    let Some(velocity) = state.snake.get_component_mut::<Velocity>() else {
        return MoveOutcome::Waiting;
    };
    // Commit the queued turn; a reversal is dropped
    if let Some(direction) = input.take_pending() {
        if !velocity.steer(direction.velocity()) {
            log::debug!("Dropped reversal to {:?}", direction);
        }
    }
    let velocity = *velocity;

    let Some(body) = state.snake.get_component_mut::<Body>() else {
        return MoveOutcome::Waiting;
    };
    let candidate = body.head().stepped(velocity);

    let head = match edge {
        EdgeMode::Wall if !candidate.in_bounds(board_size) => {
            events.emit(GameEvent::WallCollision);
            return MoveOutcome::HitWall { candidate };
        }
        EdgeMode::Wall => candidate,
        EdgeMode::Wrap => candidate.wrapped(board_size),
    };

    body.advance(head);
    state.time_ticks += 1;
    MoveOutcome::Moved { head }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::component::Direction;
    use crate::sim::input::Key;

    fn state_with_head(x: i32, y: i32, edge: EdgeMode) -> GameState {
        let mut state = GameState::new(20, edge);
        if let Some(body) = state.snake_body_mut() {
            *body = Body::new(Position::new(x, y));
        }
        state
    }

    #[test]
    fn test_single_step_right() {
        let mut state = state_with_head(10, 10, EdgeMode::Wrap);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        let outcome = step(&mut state, &mut input, &mut events);
        assert_eq!(outcome, MoveOutcome::Moved { head: Position::new(11, 10) });
        assert_eq!(state.snake_segments(), vec![Position::new(11, 10)]);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_wrap_right_edge() {
        let mut state = state_with_head(19, 10, EdgeMode::Wrap);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        step(&mut state, &mut input, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(0, 10)));
        assert!(events.pending().is_empty());
    }

    #[test]
    fn test_wrap_top_edge() {
        let mut state = state_with_head(4, 0, EdgeMode::Wrap);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();
        input.key_down(Key::ArrowUp);

        step(&mut state, &mut input, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(4, 19)));
    }

    #[test]
    fn test_wall_hit_leaves_state() {
        let mut state = state_with_head(19, 10, EdgeMode::Wall);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();

        let outcome = step(&mut state, &mut input, &mut events);
        assert_eq!(outcome, MoveOutcome::HitWall { candidate: Position::new(20, 10) });
        assert_eq!(events.pending(), &[GameEvent::WallCollision]);
        assert_eq!(state.snake_head(), Some(Position::new(19, 10)));
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_pending_turn_committed() {
        let mut state = state_with_head(10, 10, EdgeMode::Wrap);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();
        input.press_button(Direction::Down);

        step(&mut state, &mut input, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(10, 11)));
        assert_eq!(state.snake_velocity(), Some(Velocity::DOWN));
        assert_eq!(input.pending(), None);
    }

    #[test]
    fn test_reversal_dropped() {
        let mut state = state_with_head(10, 10, EdgeMode::Wrap);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();
        input.press_button(Direction::Left);

        step(&mut state, &mut input, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(11, 10)));
        assert_eq!(state.snake_velocity(), Some(Velocity::RIGHT));
        assert_eq!(input.pending(), None);
    }

    #[test]
    fn test_accumulator_gates_steps() {
        let mut state = state_with_head(10, 10, EdgeMode::Wrap);
        let mut input = InputSystem::new();
        let mut events = EventBus::new();
        let mut movement = MovementSystem::new(100, 10);

        assert_eq!(movement.update(40, &mut state, &mut input, &mut events), MoveOutcome::Waiting);
        assert_eq!(movement.update(40, &mut state, &mut input, &mut events), MoveOutcome::Waiting);
        assert!(matches!(
            movement.update(40, &mut state, &mut input, &mut events),
            MoveOutcome::Moved { .. }
        ));
        // Accumulator restarted from zero, not from the 20ms overshoot
        assert_eq!(movement.update(90, &mut state, &mut input, &mut events), MoveOutcome::Waiting);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_interval_clamped() {
        let mut movement = MovementSystem::new(150, 50);
        movement.set_interval(10);
        assert_eq!(movement.interval_ms(), 50);

        movement.set_interval(120);
        movement.speed_up(100);
        assert_eq!(movement.interval_ms(), 50);

        let zero = MovementSystem::new(0, 0);
        assert_eq!(zero.interval_ms(), INTERVAL_FLOOR_MS);
    }

    #[test]
    fn test_missing_velocity_is_noop() {
        let mut state = state_with_head(10, 10, EdgeMode::Wrap);
        state.snake.remove_component::<Velocity>();
        let mut input = InputSystem::new();
        let mut events = EventBus::new();
        input.press_button(Direction::Down);

        assert_eq!(step(&mut state, &mut input, &mut events), MoveOutcome::Waiting);
        assert_eq!(state.snake_head(), Some(Position::new(10, 10)));
        // The queued turn survives until a step can commit it
        assert_eq!(input.pending(), Some(Direction::Down));

        state.snake.add_component(Velocity::RIGHT);
        step(&mut state, &mut input, &mut events);
        assert_eq!(state.snake_head(), Some(Position::new(10, 11)));
        assert_eq!(input.pending(), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const BOARD: i32 = 20;

        fn direction() -> impl Strategy<Value = Direction> {
            prop::sample::select(Direction::ALL.to_vec())
        }

        fn moves() -> impl Strategy<Value = Vec<(Option<Direction>, bool)>> {
            prop::collection::vec((prop::option::of(direction()), any::<bool>()), 1..80)
        }

        proptest! {
            #[test]
            fn wrap_moves_keep_invariants(start in (0..BOARD, 0..BOARD), moves in moves()) {
                let mut state = state_with_head(start.0, start.1, EdgeMode::Wrap);
                let mut input = InputSystem::new();
                let mut events = EventBus::new();

                for (turn, grow) in moves {
                    if let Some(d) = turn {
                        input.press_button(d);
                    }
                    if grow {
                        state.snake_body_mut().unwrap().growth_pending = true;
                    }
                    let len_before = state.snake_body().unwrap().len();
                    let velocity_before = state.snake_velocity().unwrap();

                    let outcome = step(&mut state, &mut input, &mut events);
                    prop_assert!(matches!(outcome, MoveOutcome::Moved { .. }), "expected a committed move");

                    let velocity_after = state.snake_velocity().unwrap();
                    prop_assert!(!velocity_after.is_reverse_of(velocity_before));

                    let body = state.snake_body().unwrap();
                    prop_assert_eq!(body.len(), len_before + usize::from(grow));
                    prop_assert!(body.segments().iter().all(|p| p.in_bounds(BOARD)));

                    // Neighbours are one step apart, or one wrap apart
                    for pair in body.segments().iter().collect::<Vec<_>>().windows(2) {
                        let dx = (pair[0].x - pair[1].x).abs();
                        let dy = (pair[0].y - pair[1].y).abs();
                        prop_assert!(
                            dx + dy == 1 || (dx == BOARD - 1 && dy == 0) || (dx == 0 && dy == BOARD - 1)
                        );
                    }
                }
                prop_assert!(events.pending().is_empty());
            }

            #[test]
            fn wall_hit_is_single_signal_without_mutation(
                start in (0..BOARD, 0..BOARD),
                turns in prop::collection::vec(prop::option::of(direction()), 1..60),
            ) {
                let mut state = state_with_head(start.0, start.1, EdgeMode::Wall);
                let mut input = InputSystem::new();
                let mut events = EventBus::new();

                for turn in turns {
                    if let Some(d) = turn {
                        input.press_button(d);
                    }
                    let before = state.snake_segments();
                    match step(&mut state, &mut input, &mut events) {
                        MoveOutcome::HitWall { candidate } => {
                            prop_assert!(!candidate.in_bounds(BOARD));
                            prop_assert_eq!(state.snake_segments(), before);
                            prop_assert_eq!(events.drain(), vec![GameEvent::WallCollision]);
                            break;
                        }
                        MoveOutcome::Moved { head } => {
                            prop_assert!(head.in_bounds(BOARD));
                            prop_assert!(events.pending().is_empty());
                        }
                        MoveOutcome::Waiting => prop_assert!(false, "snake has all components"),
                    }
                }
            }
        }
    }
}
