//! Grid Snake headless runner
//!
//! Plays a few sessions with a greedy autopilot on a manual clock and logs the
//! outcomes and the run's leaderboard. Usage: `gridsnake [settings.json]`

use std::collections::HashSet;

use gridsnake::sim::{
    Clock, Direction, EdgeMode, Engine, FrameQueue, GamePhase, GameState, ManualClock, Position,
};
use gridsnake::{HighScores, ScoreKeeper, Settings, SettingsError};

/// Simulated display refresh (~60 Hz)
const FRAME_MS: u64 = 16;
/// Stop runaway sessions
const MAX_TICKS: u64 = 5_000;
/// Sessions played per run; the leaderboard lives for one run
const SESSIONS: usize = 5;

fn main() -> Result<(), SettingsError> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    log::info!("Grid Snake (headless) starting, mode {}", settings.mode.as_str());

    let clock = ManualClock::new();
    let frames = FrameQueue::new();
    let mut engine = Engine::new(settings.clone(), frames.clone(), clock.clone());

    let score = ScoreKeeper::from_settings(&settings).shared();
    engine.subscribe(ScoreKeeper::subscriber(&score));

    let mut high_scores = HighScores::new();
    for session in 1..=SESSIONS {
        engine.start();
        play(&mut engine, &frames, &clock);

        let points = score.borrow().score;
        let length = engine.state().snake_segments().len();
        log::info!(
            "Session {} over: {:?}, score {}, length {}, {} ticks",
            session,
            engine.game_over_cause(),
            points,
            length,
            engine.state().time_ticks
        );
        if let Some(rank) = high_scores.add_score(points, settings.mode, length, clock.now_ms()) {
            log::info!("Session {} placed #{} of {} this run", session, rank, high_scores.entries.len());
        }
    }

    for (i, entry) in high_scores.entries.iter().enumerate() {
        log::info!("#{}: {} (length {})", i + 1, entry.score, entry.length);
    }
    log::info!("{}ms simulated", clock.now_ms());
    Ok(())
}

/// Deliver frames until the session ends
fn play(engine: &mut Engine<FrameQueue, ManualClock>, frames: &FrameQueue, clock: &ManualClock) {
    while let Some(handle) = frames.next_due() {
        if engine.state().time_ticks >= MAX_TICKS {
            engine.stop();
            break;
        }
        if engine.phase() == GamePhase::Playing {
            if let Some(direction) = autopilot(engine.state()) {
                engine.input_mut().press_button(direction);
            }
        }
        clock.advance(FRAME_MS);
        engine.on_frame(handle);
    }
}

/// Pick the safe direction that gets closest to the nearest food cell
fn autopilot(state: &GameState) -> Option<Direction> {
    let head = state.snake_head()?;
    let velocity = state.snake_velocity()?;
    let segments = state.snake_segments();

    // The tail moves out of the way this tick unless the snake is growing
    let growing = state.snake_body().is_some_and(|b| b.growth_pending);
    let keep = if growing { segments.len() } else { segments.len() - 1 };
    let mut blocked: HashSet<Position> = segments.iter().take(keep).copied().collect();
    blocked.extend(state.obstacle_positions());

    let mut targets = state.super_food_cells();
    targets.extend(state.food_position());

    Direction::ALL
        .into_iter()
        .filter(|d| !d.velocity().is_reverse_of(velocity))
        .filter_map(|d| {
            let next = head.stepped(d.velocity());
            let next = match state.edge {
                EdgeMode::Wrap => next.wrapped(state.board_size),
                EdgeMode::Wall if next.in_bounds(state.board_size) => next,
                EdgeMode::Wall => return None,
            };
            if blocked.contains(&next) {
                return None;
            }
            let distance = targets
                .iter()
                .map(|&t| grid_distance(next, t, state))
                .min()
                .unwrap_or(0);
            Some((distance, d))
        })
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, d)| d)
}

/// Manhattan distance, taking the short way around on a wrapping board
fn grid_distance(a: Position, b: Position, state: &GameState) -> i32 {
    match state.edge {
        EdgeMode::Wall => a.manhattan(b),
        EdgeMode::Wrap => {
            let n = state.board_size;
            let dx = (a.x - b.x).abs();
            let dy = (a.y - b.y).abs();
            dx.min(n - dx) + dy.min(n - dy)
        }
    }
}
