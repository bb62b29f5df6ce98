//! Outcome signals
//!
//! Systems emit `GameEvent`s into an `EventBus`. Collaborators (scoring, sound,
//! persistence) subscribe without the systems knowing about them.

use serde::{Deserialize, Serialize};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    SelfCollision,
    Obstacle,
    Wall,
    /// `Engine::stop` was called
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `Engine::start` began a fresh session
    SessionStarted,
    FoodEaten,
    SuperFoodEaten,
    /// Self or obstacle hit
    GameOver(GameOverCause),
    /// Wall mode: the snake tried to leave the board
    WallCollision,
    SuperFoodSpawned,
    SuperFoodExpired,
}

impl GameEvent {
    /// True for events that end the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameOver(_) | GameEvent::WallCollision)
    }
}

pub type Subscriber = Box<dyn FnMut(&GameEvent)>;

/// Subscriber list plus a log of events emitted since the last drain
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Notify every subscriber, then record the event
    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
        self.pending.push(event);
    }

    /// Events emitted since the last drain
    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .finish()
    }
}
