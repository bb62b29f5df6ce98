//! Session scoring
//!
//! A plain event subscriber: the simulation never calls into it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::settings::Settings;
use crate::sim::{GameEvent, GameOverCause};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreKeeper {
    pub score: u64,
    pub foods: u32,
    pub super_foods: u32,
    pub game_over: Option<GameOverCause>,
    food_points: u64,
    super_food_points: u64,
}

impl ScoreKeeper {
    pub fn new(food_points: u64, super_food_points: u64) -> Self {
        Self {
            food_points,
            super_food_points,
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.food_points, settings.super_food_points)
    }

    /// Wrap for sharing with an event subscriber
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Subscriber closure that feeds events into a shared keeper
    pub fn subscriber(keeper: &Rc<RefCell<Self>>) -> impl FnMut(&GameEvent) + 'static {
        let keeper = Rc::clone(keeper);
        move |event| keeper.borrow_mut().record(event)
    }

    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SessionStarted => self.reset(),
            GameEvent::FoodEaten => {
                self.foods += 1;
                self.score += self.food_points;
            }
            GameEvent::SuperFoodEaten => {
                self.super_foods += 1;
                self.score += self.super_food_points;
            }
            GameEvent::GameOver(cause) => self.game_over = Some(*cause),
            GameEvent::WallCollision => self.game_over = Some(GameOverCause::Wall),
            GameEvent::SuperFoodSpawned | GameEvent::SuperFoodExpired => {}
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.foods = 0;
        self.super_foods = 0;
        self.game_over = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points() {
        let mut keeper = ScoreKeeper::new(10, 50);
        keeper.record(&GameEvent::FoodEaten);
        keeper.record(&GameEvent::FoodEaten);
        keeper.record(&GameEvent::SuperFoodEaten);
        keeper.record(&GameEvent::SuperFoodExpired);
        assert_eq!(keeper.score, 70);
        assert_eq!(keeper.foods, 2);
        assert_eq!(keeper.super_foods, 1);
    }

    #[test]
    fn test_session_start_resets() {
        let mut keeper = ScoreKeeper::new(10, 50);
        keeper.record(&GameEvent::FoodEaten);
        keeper.record(&GameEvent::WallCollision);
        assert_eq!(keeper.game_over, Some(GameOverCause::Wall));

        keeper.record(&GameEvent::SessionStarted);
        assert_eq!(keeper.score, 0);
        assert_eq!(keeper.game_over, None);
    }

    #[test]
    fn test_shared_subscriber() {
        let keeper = ScoreKeeper::from_settings(&Settings::default()).shared();
        let mut sub = ScoreKeeper::subscriber(&keeper);
        sub(&GameEvent::FoodEaten);
        sub(&GameEvent::GameOver(GameOverCause::Obstacle));
        assert_eq!(keeper.borrow().score, crate::consts::FOOD_POINTS);
        assert_eq!(keeper.borrow().game_over, Some(GameOverCause::Obstacle));
    }
}
