use iced::keyboard::{key::Named, Key};
use log::debug;

use crate::{
    app::Message,
    models::{
        best_score::{BestScoreStore, FileScoreStore},
        game::{Direction, RunState, SnakeGame, TickOutcome, GRID_HEIGHT, GRID_WIDTH, TICK_MILLIS},
    },
    view_model::ViewModel,
};

/// Owns the [`SnakeGame`] and turns view [`Message`]s into model
/// operations. Arrow keys and WASD steer; Space restarts once the session
/// is over; anything else is ignored.
#[derive(Debug)]
pub struct GameViewModel {
    game: SnakeGame,
}

impl GameViewModel {
    /// Creates the view model with the file-backed best-score store.
    ///
    /// # Panics
    ///
    /// Panics if the built-in grid dimensions are rejected. This is never
    /// expected to happen.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Box::new(FileScoreStore::new()))
    }

    /// Same as [`new`](Self::new) with the best-score store injected.
    ///
    /// # Panics
    ///
    /// Panics if the built-in grid dimensions are rejected. This is never
    /// expected to happen.
    #[must_use]
    pub fn with_store(store: Box<dyn BestScoreStore>) -> Self {
        Self {
            game: SnakeGame::new(GRID_WIDTH, GRID_HEIGHT, store).unwrap(),
        }
    }

    #[must_use]
    pub fn get_game(&self) -> &SnakeGame {
        &self.game
    }

    #[must_use]
    pub fn get_time_between_frames(&self) -> u64 {
        TICK_MILLIS
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.game.get_run_state() == RunState::Running
    }

    fn direction_for_key(key: &Key) -> Option<Direction> {
        match key {
            Key::Named(named) => match named {
                Named::ArrowUp => Some(Direction::Up),
                Named::ArrowDown => Some(Direction::Down),
                Named::ArrowLeft => Some(Direction::Left),
                Named::ArrowRight => Some(Direction::Right),
                _ => None,
            },
            Key::Character(c) => match c.as_str() {
                "w" | "W" => Some(Direction::Up),
                "s" | "S" => Some(Direction::Down),
                "a" | "A" => Some(Direction::Left),
                "d" | "D" => Some(Direction::Right),
                _ => None,
            },
            Key::Unidentified => None,
        }
    }
}

impl Default for GameViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModel for GameViewModel {
    fn update(&mut self, message: Message) -> Option<Message> {
        match message {
            Message::Key(key) => {
                if self.game.get_run_state() == RunState::Over
                    && matches!(key, Key::Named(Named::Space))
                {
                    return Some(Message::Restart);
                }
                if let Some(direction) = Self::direction_for_key(&key) {
                    self.game.request_direction(direction);
                }
                None
            }
            Message::Tick(_) => {
                if self.game.tick() == TickOutcome::Over {
                    debug!("Final score {}", self.game.get_score());
                }
                None
            }
            Message::Start => {
                self.game.start();
                None
            }
            Message::Restart => {
                self.game.restart();
                None
            }
        }
    }
}
