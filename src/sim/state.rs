//! Game state and session entities
//!
//! Everything the systems read or mutate during a session lives in
//! `GameState`. It is rebuilt from scratch on every `Engine::start`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::component::{Body, Edible, Lifetime, Position, Velocity};
use super::entities;
use super::entity::{Entity, EntityId};
use super::placement::CellPicker;
use crate::consts::SUPER_FOOD_SIZE;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session has been started yet
    #[default]
    Idle,
    /// Frames advance the simulation
    Playing,
    /// Frames are ignored until resumed
    Paused,
    /// Session ended
    GameOver,
}

/// Edge behavior of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Leaving one side re-enters from the opposite side
    #[default]
    Wrap,
    /// Leaving the board ends the game
    Wall,
}

/// Complete session state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board_size: i32,
    pub edge: EdgeMode,
    pub snake: Entity,
    pub food: Option<Entity>,
    pub super_food: Option<Entity>,
    pub obstacles: Vec<Entity>,
    /// Committed grid steps this session
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Fresh session: a one-segment snake at the board center heading right
    pub fn new(board_size: i32, edge: EdgeMode) -> Self {
        let center = Position::new(board_size / 2, board_size / 2);
        let mut state = Self {
            board_size,
            edge,
            snake: entities::snake(EntityId(0), center),
            food: None,
            super_food: None,
            obstacles: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        };
        let id = state.next_entity_id();
        state.snake.id = id;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn snake_body(&self) -> Option<&Body> {
        self.snake.get_component::<Body>()
    }

    pub fn snake_body_mut(&mut self) -> Option<&mut Body> {
        self.snake.get_component_mut::<Body>()
    }

    pub fn snake_head(&self) -> Option<Position> {
        self.snake_body().map(Body::head)
    }

    /// Body segments, head first
    pub fn snake_segments(&self) -> Vec<Position> {
        self.snake_body()
            .map(|b| b.segments().iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn snake_velocity(&self) -> Option<Velocity> {
        self.snake.get_component::<Velocity>().copied()
    }

    pub fn food_position(&self) -> Option<Position> {
        self.food
            .as_ref()
            .and_then(|f| f.get_component::<Position>().copied())
    }

    /// True while the food is playing its bite animation
    pub fn food_consuming(&self) -> bool {
        self.food
            .as_ref()
            .and_then(|f| f.get_component::<Edible>())
            .map(|e| e.consuming)
            .unwrap_or(false)
    }

    /// Covered cells of an active SuperFood
    pub fn super_food_cells(&self) -> Vec<Position> {
        match &self.super_food {
            Some(sf) if entities::is_active(sf) => entities::covered_cells(sf),
            _ => Vec::new(),
        }
    }

    pub fn super_food_lifetime(&self) -> Option<Lifetime> {
        self.super_food
            .as_ref()
            .and_then(|sf| sf.get_component::<Lifetime>().copied())
    }

    pub fn obstacle_positions(&self) -> Vec<Position> {
        self.obstacles
            .iter()
            .filter_map(|o| o.get_component::<Position>().copied())
            .collect()
    }

    /// Cells a spawn must avoid
    pub fn occupied(&self) -> HashSet<Position> {
        let mut cells: HashSet<Position> = self.snake_segments().into_iter().collect();
        cells.extend(self.obstacle_positions());
        cells.extend(self.food_position());
        cells.extend(self.super_food_cells());
        cells
    }

    /// Place the session's food, avoiding everything on the board
    pub fn spawn_food(&mut self, picker: &mut dyn CellPicker) {
        let at = picker.pick(self.board_size, 1, &self.occupied());
        let id = self.next_entity_id();
        self.food = Some(entities::food(id, at));
    }

    /// Move the existing food to a fresh cell off the current snake body.
    ///
    /// No-op when the session has no food entity.
    pub fn relocate_food(&mut self, picker: &mut dyn CellPicker) {
        let mut avoid: HashSet<Position> = self.snake_segments().into_iter().collect();
        avoid.extend(self.obstacle_positions());
        avoid.extend(self.super_food_cells());
        let board_size = self.board_size;
        if let Some(food) = self.food.as_mut() {
            let at = picker.pick(board_size, 1, &avoid);
            food.add_component(at);
        }
    }

    pub fn spawn_super_food(&mut self, picker: &mut dyn CellPicker, now_ms: u64, lifetime_ms: u64) {
        let anchor = picker.pick(self.board_size, SUPER_FOOD_SIZE, &self.occupied());
        let id = self.next_entity_id();
        self.super_food = Some(entities::super_food(id, anchor, now_ms, lifetime_ms));
    }

    /// Scatter static obstacles, keeping the snake's starting row clear
    pub fn spawn_obstacles(&mut self, picker: &mut dyn CellPicker, count: usize) {
        let mut avoid = self.occupied();
        if let Some(head) = self.snake_head() {
            avoid.extend((0..self.board_size).map(|x| Position::new(x, head.y)));
        }
        for _ in 0..count {
            let at = picker.pick(self.board_size, 1, &avoid);
            avoid.insert(at);
            let id = self.next_entity_id();
            self.obstacles.push(entities::obstacle(id, at));
        }
    }
}
