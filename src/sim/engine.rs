//! Engine and game-state machine
//!
//! Owns the session, the systems and the single outstanding frame request.
//! Each delivered frame runs Input → Movement → Collision in that order;
//! rendering, sound and scoring observe the result through events.

use super::clock::{Clock, FrameHandle, FrameScheduler};
use super::collision::resolve_collisions;
use super::entities;
use super::events::{EventBus, GameEvent, GameOverCause};
use super::input::InputSystem;
use super::movement::{MoveOutcome, MovementSystem};
use super::placement::{CellPicker, RandomPlacer};
use super::state::{GamePhase, GameState};
use crate::consts::{MAX_BOARD_SIZE, MAX_FRAME_DT_MS, MIN_BOARD_SIZE};
use crate::settings::Settings;

pub struct Engine<S: FrameScheduler, C: Clock> {
    settings: Settings,
    phase: GamePhase,
    state: GameState,
    input: InputSystem,
    movement: MovementSystem,
    events: EventBus,
    placer: Box<dyn CellPicker>,
    scheduler: S,
    clock: C,
    /// The one live frame request, if any
    frame: Option<FrameHandle>,
    last_frame_ms: Option<u64>,
    foods_since_super: u32,
    game_over_cause: Option<GameOverCause>,
}

impl<S: FrameScheduler, C: Clock> Engine<S, C> {
    /// Engine with seeded random placement (`settings.seed`, or the clock)
    pub fn new(settings: Settings, scheduler: S, clock: C) -> Self {
        let seed = settings.seed.unwrap_or_else(|| clock.now_ms());
        let placer = RandomPlacer::with_attempts(seed, settings.placement_attempts);
        Self::with_placer(settings, scheduler, clock, Box::new(placer))
    }

    /// Engine with a caller-supplied placement strategy.
    ///
    /// Settings that fail validation are still accepted; the board size is
    /// clamped to a playable range.
    pub fn with_placer(
        mut settings: Settings,
        scheduler: S,
        clock: C,
        placer: Box<dyn CellPicker>,
    ) -> Self {
        if let Err(err) = settings.validate() {
            log::warn!("Using unvalidated settings: {}", err);
        }
        settings.board_size = settings.board_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);

        let state = GameState::new(settings.board_size, settings.mode.edge());
        let movement = MovementSystem::new(settings.initial_interval_ms, settings.min_interval_ms);
        Self {
            settings,
            phase: GamePhase::Idle,
            state,
            input: InputSystem::new(),
            movement,
            events: EventBus::new(),
            placer,
            scheduler,
            clock,
            frame: None,
            last_frame_ms: None,
            foods_since_super: 0,
            game_over_cause: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    /// Hosts feed key, button and swipe events here
    pub fn input_mut(&mut self) -> &mut InputSystem {
        &mut self.input
    }

    pub fn movement(&self) -> &MovementSystem {
        &self.movement
    }

    /// External speed control; clamped to the configured minimum
    pub fn set_move_interval(&mut self, interval_ms: u64) {
        self.movement.set_interval(interval_ms);
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameEvent) + 'static) {
        self.events.subscribe(subscriber);
    }

    /// Events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.game_over_cause
    }

    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Idle/GameOver → Playing with a fresh session. No-op otherwise.
    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => {}
            GamePhase::Playing | GamePhase::Paused => {
                log::debug!("start() ignored while {:?}", self.phase);
                return;
            }
        }

        self.new_session();
        self.phase = GamePhase::Playing;
        self.input.set_enabled(true);
        self.last_frame_ms = Some(self.clock.now_ms());
        self.events.emit(GameEvent::SessionStarted);
        log::info!(
            "Session started: mode {}, board {}x{}, interval {}ms",
            self.settings.mode.as_str(),
            self.state.board_size,
            self.state.board_size,
            self.movement.interval_ms()
        );
        self.arm();
    }

    /// Playing → Paused. The outstanding frame is kept; when it fires it does nothing.
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Paused;
        self.input.set_enabled(false);
        log::info!("Paused at tick {}", self.state.time_ticks);
    }

    /// Paused → Playing; time spent paused is not fed to movement
    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Playing;
        self.input.set_enabled(true);
        self.last_frame_ms = Some(self.clock.now_ms());
        log::info!("Resumed at tick {}", self.state.time_ticks);
        self.arm();
    }

    /// Any state → GameOver; cancels the outstanding frame
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            self.game_over_cause = Some(GameOverCause::Stopped);
        }
        self.phase = GamePhase::GameOver;
        self.input.set_enabled(false);
        log::info!("Stopped");
    }

    /// Consume a SuperFood despawn signal from an external timer
    pub fn despawn_super_food(&mut self) {
        if self.state.super_food.take().is_some() {
            self.events.emit(GameEvent::SuperFoodExpired);
        }
    }

    /// Host frame callback
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.frame != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return;
        }
        self.frame = None;

        if self.phase != GamePhase::Playing {
            return;
        }

        let now = self.clock.now_ms();
        let dt = self
            .last_frame_ms
            .map(|last| now.saturating_sub(last))
            .unwrap_or(0)
            .min(MAX_FRAME_DT_MS);
        self.last_frame_ms = Some(now);

        self.advance(dt, now);

        if self.phase == GamePhase::Playing {
            self.arm();
        }
    }

    fn arm(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    fn new_session(&mut self) {
        let mode = self.settings.mode;
        self.state = GameState::new(self.settings.board_size, mode.edge());
        if mode.has_obstacles() {
            self.state
                .spawn_obstacles(self.placer.as_mut(), self.settings.obstacle_count);
        }
        self.state.spawn_food(self.placer.as_mut());

        self.input = InputSystem::new();
        self.movement =
            MovementSystem::new(self.settings.initial_interval_ms, self.settings.min_interval_ms);
        self.events.drain();
        self.foods_since_super = 0;
        self.game_over_cause = None;
    }

    fn advance(&mut self, dt: u64, now: u64) {
        // Input has already been collected into `self.input`; movement consumes it
        match self
            .movement
            .update(dt, &mut self.state, &mut self.input, &mut self.events)
        {
            MoveOutcome::Waiting => {}
            MoveOutcome::HitWall { .. } => {
                self.finish(GameOverCause::Wall);
                return;
            }
            MoveOutcome::Moved { .. } => {
                self.clear_eaten_super_food();
                let report =
                    resolve_collisions(&mut self.state, self.placer.as_mut(), &mut self.events);
                if let Some(cause) = report.game_over {
                    self.finish(cause);
                    return;
                }
                if report.ate_food {
                    self.on_food_eaten(now);
                }
            }
        }

        self.expire_super_food(now);
    }

    fn on_food_eaten(&mut self, now: u64) {
        let mode = self.settings.mode;
        if mode.speeds_up() {
            self.movement.speed_up(self.settings.speed_step_ms);
            log::debug!("Move interval now {}ms", self.movement.interval_ms());
        }

        if !mode.allows_super_food() {
            return;
        }
        self.foods_since_super += 1;
        if self.foods_since_super >= self.settings.super_food_every && self.state.super_food.is_none() {
            self.foods_since_super = 0;
            self.state.spawn_super_food(
                self.placer.as_mut(),
                now,
                self.settings.super_food_lifetime_ms,
            );
            self.events.emit(GameEvent::SuperFoodSpawned);
        }
    }

    /// An eaten SuperFood stays visible until the next step
    fn clear_eaten_super_food(&mut self) {
        if self
            .state
            .super_food
            .as_ref()
            .is_some_and(|sf| !entities::is_active(sf))
        {
            self.state.super_food = None;
        }
    }

    fn expire_super_food(&mut self, now: u64) {
        let expired = self.state.super_food.as_ref().is_some_and(|sf| {
            entities::is_active(sf)
                && self
                    .state
                    .super_food_lifetime()
                    .is_some_and(|life| life.expired(now))
        });
        if expired {
            log::debug!("SuperFood expired at {}ms", now);
            self.despawn_super_food();
        }
    }

    fn finish(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        self.game_over_cause = Some(cause);
        self.input.set_enabled(false);
        log::info!(
            "Game over ({:?}) after {} ticks, length {}",
            cause,
            self.state.time_ticks,
            self.state.snake_segments().len()
        );
    }
}
