//! Input system
//!
//! Collapses keyboard, on-screen button and swipe intents into a single
//! pending direction (latest wins). Reversals are not filtered here; the
//! velocity update drops them.

use super::component::Direction;
use crate::consts::SWIPE_THRESHOLD;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Other,
}

impl Key {
    /// Parse a host key name (DOM `code`/`key` style or a bare letter)
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "KeyW" | "w" | "W" => Key::W,
            "KeyA" | "a" | "A" => Key::A,
            "KeyS" | "s" | "S" => Key::S,
            "KeyD" | "d" | "D" => Key::D,
            _ => Key::Other,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::ArrowUp | Key::W => Some(Direction::Up),
            Key::ArrowDown | Key::S => Some(Direction::Down),
            Key::ArrowLeft | Key::A => Some(Direction::Left),
            Key::ArrowRight | Key::D => Some(Direction::Right),
            Key::Other => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputSystem {
    pending: Option<Direction>,
    enabled: bool,
    touch_origin: Option<(f32, f32)>,
    swipe_threshold: f32,
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSystem {
    pub fn new() -> Self {
        Self {
            pending: None,
            enabled: true,
            touch_origin: None,
            swipe_threshold: SWIPE_THRESHOLD,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling also drops any unconsumed direction and an in-progress swipe
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending = None;
            self.touch_origin = None;
        }
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    fn propose(&mut self, direction: Direction) -> bool {
        if !self.enabled {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Returns true if the key was mapped to a direction
    pub fn key_down(&mut self, key: Key) -> bool {
        match key.direction() {
            Some(direction) => self.propose(direction),
            None => false,
        }
    }

    /// On-screen directional button
    pub fn press_button(&mut self, direction: Direction) -> bool {
        self.propose(direction)
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        if self.enabled {
            self.touch_origin = Some((x, y));
        }
    }

    /// Finish a swipe; screen coordinates, y grows downward
    pub fn touch_end(&mut self, x: f32, y: f32) -> bool {
        let Some((x0, y0)) = self.touch_origin.take() else {
            return false;
        };
        match swipe_direction(x - x0, y - y0, self.swipe_threshold) {
            Some(direction) => self.propose(direction),
            None => false,
        }
    }
}

/// Direction of a swipe along its dominant axis, if it passes the threshold
pub fn swipe_direction(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx.abs() <= threshold {
            return None;
        }
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        if dy.abs() <= threshold {
            return None;
        }
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}
