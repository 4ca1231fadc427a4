//! Core snake state machine.
//!
//! Advanced one [`tick`](SnakeGame::tick) at a time by whatever scheduler
//! owns it. The module is free of timer and windowing APIs so the whole game
//! can be driven and inspected headlessly.

use std::collections::VecDeque;

use log::{debug, info, warn};
use rand::{seq::SliceRandom, Rng};

use super::best_score::BestScoreStore;

/// Amount of time between scheduled ticks.
pub const TICK_MILLIS: u64 = 150;
/// Default grid width in cells.
pub const GRID_WIDTH: usize = 20;
/// Default grid height in cells.
pub const GRID_HEIGHT: usize = 15;
/// Points awarded per food eaten.
pub const FOOD_REWARD: u32 = 10;
/// Number of segments the snake starts with.
pub const START_LENGTH: usize = 3;
/// Min grid side length.
pub const MIN_GRID_SIZE: usize = 8;
/// Max grid side length.
pub const MAX_GRID_SIZE: usize = 64;

/// Random samples tried before food placement falls back to a full scan.
const FOOD_SAMPLE_ATTEMPTS: usize = 128;

type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Clone)]
pub enum GameError {
    InvalidGridSize,
}

/// One grid square as (column, row). Rows grow downward.
pub type Cell = (usize, usize);

/// Heading the snake moves in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[must_use]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Lifecycle phase of the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Over,
}

/// What a single [`SnakeGame::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Head moved into an empty cell; length and score unchanged.
    Moved,
    /// Head landed on food; the snake grew and the score went up.
    Ate,
    /// Head hit a wall or the snake itself; the session is over.
    Over,
    /// Tick arrived while the game was not running and was ignored.
    Idle,
}

/// Model of the snake game.
///
/// Owns the snake body (head-first), the food cell, both direction values,
/// the score and the run state. Input between ticks only ever touches
/// `pending_direction`; everything else changes inside [`tick`](Self::tick),
/// [`start`](Self::start) and [`restart`](Self::restart).
#[derive(Debug)]
pub struct SnakeGame {
    snake: VecDeque<Cell>,
    food: Cell,
    direction: Direction,
    pending_direction: Direction,
    score: u32,
    best_score: u32,
    run_state: RunState,
    grid_width: usize,
    grid_height: usize,
    store: Box<dyn BestScoreStore>,
}

impl SnakeGame {
    /// Creates a new game in the [`RunState::NotStarted`] state with the
    /// board already laid out, so there is something to draw before the
    /// first start. The best score is loaded from `store` once, here.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError`] if either grid dimension is outside
    /// [`MIN_GRID_SIZE`]..=[`MAX_GRID_SIZE`].
    pub fn new(
        grid_width: usize,
        grid_height: usize,
        store: Box<dyn BestScoreStore>,
    ) -> Result<Self> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_width)
            || !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_height)
        {
            return Err(GameError::InvalidGridSize);
        }
        let best_score = store.load();
        let mut game = Self {
            snake: VecDeque::new(),
            food: (0, 0),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 0,
            best_score,
            run_state: RunState::NotStarted,
            grid_width,
            grid_height,
            store,
        };
        game.reset_board();
        Ok(game)
    }

    /// Puts the board back into the fixed starting configuration: a
    /// horizontal three-segment snake heading right, score zero, fresh food.
    fn reset_board(&mut self) {
        let head = (self.grid_width / 4, self.grid_height / 2);
        self.snake.clear();
        for i in 0..START_LENGTH {
            self.snake.push_back((head.0 - i, head.1));
        }
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.place_food();
    }

    /// Starts a session. A no-op while one is already running, so a second
    /// start can never race the first one's tick source.
    pub fn start(&mut self) {
        if self.run_state == RunState::Running {
            debug!("Start requested while already running. Ignoring");
            return;
        }
        info!("Starting game");
        self.reset_board();
        self.run_state = RunState::Running;
    }

    /// Resets and starts a fresh session regardless of the current state.
    pub fn restart(&mut self) {
        info!("Restarting game");
        self.reset_board();
        self.run_state = RunState::Running;
    }

    /// Buffers `direction` to take effect at the next tick. The exact
    /// opposite of the current heading is dropped, an instant turn-around
    /// would run the head straight into the second segment.
    pub fn request_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.pending_direction = direction;
    }

    /// Advances the game one step and reports what happened.
    ///
    /// Promotes the pending direction, then checks the candidate head cell:
    /// out of bounds or on the snake ends the session with the board left as
    /// it was for display. Otherwise the head advances; on food the snake
    /// keeps its tail (grows), the score goes up and a new best score is
    /// persisted the moment it is exceeded.
    ///
    /// # Panics
    ///
    /// Panics if the snake is empty or a coordinate does not fit in `i64`.
    /// Neither is expected to happen.
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state != RunState::Running {
            debug!("Tick received while not running. Ignoring");
            return TickOutcome::Idle;
        }
        self.direction = self.pending_direction;
        let head = *self.snake.front().unwrap();
        let delta = self.direction.delta();
        let new_x = i64::try_from(head.0).unwrap() + i64::from(delta.0);
        let new_y = i64::try_from(head.1).unwrap() + i64::from(delta.1);
        let width = i64::try_from(self.grid_width).unwrap();
        let height = i64::try_from(self.grid_height).unwrap();
        if new_x < 0 || new_x >= width || new_y < 0 || new_y >= height {
            info!("Snake went out of bounds. Game over with score {}", self.score);
            self.run_state = RunState::Over;
            return TickOutcome::Over;
        }
        let new_head = (
            usize::try_from(new_x).unwrap(),
            usize::try_from(new_y).unwrap(),
        );
        // The tail cell still counts here: it only frees up after the move
        // resolves.
        if self.snake.contains(&new_head) {
            info!("Snake ran into itself. Game over with score {}", self.score);
            self.run_state = RunState::Over;
            return TickOutcome::Over;
        }
        self.snake.push_front(new_head);
        if new_head == self.food {
            self.score += FOOD_REWARD;
            debug!("Food eaten. Score is now {}", self.score);
            if self.score > self.best_score {
                self.best_score = self.score;
                self.store.save(self.best_score);
            }
            self.place_food();
            return TickOutcome::Ate;
        }
        if self.snake.pop_back().is_none() {
            debug!("Removed from back but got none");
        }
        TickOutcome::Moved
    }

    /// Places food on a uniformly random cell not occupied by the snake.
    /// Rejection sampling is bounded; past the bound the free cells are
    /// collected outright and one is chosen, so placement always terminates.
    fn place_food(&mut self) {
        let mut rng = rand::thread_rng();
        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let candidate = (
                rng.gen_range(0..self.grid_width),
                rng.gen_range(0..self.grid_height),
            );
            if !self.snake.contains(&candidate) {
                self.food = candidate;
                return;
            }
        }
        debug!("Sampling found no free cell in {FOOD_SAMPLE_ATTEMPTS} tries. Scanning");
        let mut available = Vec::new();
        for x in 0..self.grid_width {
            for y in 0..self.grid_height {
                if !self.snake.contains(&(x, y)) {
                    available.push((x, y));
                }
            }
        }
        if let Some(cell) = available.choose(&mut rng) {
            self.food = *cell;
        } else {
            warn!("Nowhere left to place food");
        }
    }

    #[must_use]
    pub fn get_snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    #[must_use]
    pub fn get_food(&self) -> Cell {
        self.food
    }

    #[must_use]
    pub fn get_score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn get_best_score(&self) -> u32 {
        self.best_score
    }

    #[must_use]
    pub fn get_run_state(&self) -> RunState {
        self.run_state
    }

    #[must_use]
    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn get_grid_width(&self) -> usize {
        self.grid_width
    }

    #[must_use]
    pub fn get_grid_height(&self) -> usize {
        self.grid_height
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::models::best_score::MemoryScoreStore;

    use super::*;

    /// Store whose contents stay observable after the game takes ownership.
    #[derive(Debug, Default)]
    struct SharedStore {
        best: Rc<RefCell<u32>>,
        saves: Rc<RefCell<u32>>,
    }

    impl BestScoreStore for SharedStore {
        fn load(&self) -> u32 {
            *self.best.borrow()
        }

        fn save(&mut self, best: u32) {
            *self.best.borrow_mut() = best;
            *self.saves.borrow_mut() += 1;
        }
    }

    fn running_game() -> SnakeGame {
        let mut game = SnakeGame::new(20, 15, Box::new(MemoryScoreStore::default())).unwrap();
        game.start();
        game
    }

    fn set_snake(game: &mut SnakeGame, cells: &[Cell], direction: Direction) {
        game.snake = cells.iter().copied().collect();
        game.direction = direction;
        game.pending_direction = direction;
    }

    fn snake_cells(game: &SnakeGame) -> Vec<Cell> {
        game.get_snake().iter().copied().collect()
    }

    #[test]
    fn test_move_into_empty_cell_keeps_length_and_score() {
        let mut game = running_game();
        set_snake(&mut game, &[(5, 10), (4, 10), (3, 10)], Direction::Right);
        game.food = (0, 0);

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(snake_cells(&game), vec![(6, 10), (5, 10), (4, 10)]);
        assert_eq!(game.get_score(), 0);
        assert_eq!(game.get_run_state(), RunState::Running);
    }

    #[test]
    fn test_eating_grows_scores_and_replaces_food() {
        let mut game = running_game();
        set_snake(&mut game, &[(5, 10), (4, 10), (3, 10)], Direction::Right);
        game.food = (6, 10);

        assert_eq!(game.tick(), TickOutcome::Ate);
        assert_eq!(snake_cells(&game), vec![(6, 10), (5, 10), (4, 10), (3, 10)]);
        assert_eq!(game.get_score(), 10);
        assert!(!game.get_snake().contains(&game.get_food()));
    }

    #[test]
    fn test_wall_collision_ends_game_and_leaves_snake_alone() {
        let mut game = running_game();
        set_snake(&mut game, &[(0, 10), (1, 10), (2, 10)], Direction::Left);
        let before = snake_cells(&game);

        assert_eq!(game.tick(), TickOutcome::Over);
        assert_eq!(game.get_run_state(), RunState::Over);
        assert_eq!(snake_cells(&game), before);
        assert_eq!(game.get_score(), 0);
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut game = running_game();
        set_snake(
            &mut game,
            &[(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)],
            Direction::Down,
        );
        game.food = (0, 0);
        let before = snake_cells(&game);

        assert_eq!(game.tick(), TickOutcome::Over);
        assert_eq!(game.get_run_state(), RunState::Over);
        assert_eq!(snake_cells(&game), before);
    }

    #[test]
    fn test_moving_onto_own_tail_counts_as_collision() {
        // The tail would move out of the way this tick, but a candidate head
        // on any current cell ends the session.
        let mut game = running_game();
        set_snake(
            &mut game,
            &[(5, 5), (6, 5), (6, 6), (5, 6)],
            Direction::Down,
        );

        assert_eq!(game.tick(), TickOutcome::Over);
    }

    #[test]
    fn test_reversal_request_is_dropped() {
        let mut game = running_game();
        set_snake(&mut game, &[(5, 10), (4, 10), (3, 10)], Direction::Right);
        game.food = (0, 0);

        game.request_direction(Direction::Left);
        assert_eq!(game.pending_direction, Direction::Right);

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(*game.get_snake().front().unwrap(), (6, 10));
    }

    #[test]
    fn test_perpendicular_request_applies_on_next_tick() {
        let mut game = running_game();
        set_snake(&mut game, &[(5, 10), (4, 10), (3, 10)], Direction::Right);
        game.food = (0, 0);

        game.request_direction(Direction::Up);
        // buffered, not applied mid-tick
        assert_eq!(game.get_direction(), Direction::Right);

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(game.get_direction(), Direction::Up);
        assert_eq!(*game.get_snake().front().unwrap(), (5, 9));
    }

    #[test]
    fn test_latest_request_wins_within_one_tick() {
        let mut game = running_game();
        set_snake(&mut game, &[(5, 10), (4, 10), (3, 10)], Direction::Right);
        game.food = (0, 0);

        game.request_direction(Direction::Up);
        game.request_direction(Direction::Down);
        game.tick();
        assert_eq!(game.get_direction(), Direction::Down);
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let mut game = running_game();
        game.food = (0, 0);
        game.tick();
        game.tick();
        let snake = snake_cells(&game);

        game.start();
        assert_eq!(snake_cells(&game), snake);
        assert_eq!(game.get_run_state(), RunState::Running);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = running_game();
        set_snake(&mut game, &[(0, 10), (1, 10), (2, 10)], Direction::Left);
        game.score = 30;
        game.tick();
        assert_eq!(game.get_run_state(), RunState::Over);

        game.restart();
        assert_eq!(game.get_run_state(), RunState::Running);
        assert_eq!(game.get_score(), 0);
        assert_eq!(snake_cells(&game), vec![(5, 7), (4, 7), (3, 7)]);
        assert_eq!(game.get_direction(), Direction::Right);
        assert!(!game.get_snake().contains(&game.get_food()));
    }

    #[test]
    fn test_start_after_game_over_begins_a_fresh_session() {
        let mut game = running_game();
        set_snake(&mut game, &[(0, 10), (1, 10), (2, 10)], Direction::Left);
        game.tick();

        game.start();
        assert_eq!(game.get_run_state(), RunState::Running);
        assert_eq!(game.get_score(), 0);
        assert_eq!(game.get_snake().len(), START_LENGTH);
    }

    #[test]
    fn test_tick_before_start_is_idle() {
        let mut game = SnakeGame::new(20, 15, Box::new(MemoryScoreStore::default())).unwrap();
        let before = snake_cells(&game);

        assert_eq!(game.tick(), TickOutcome::Idle);
        assert_eq!(snake_cells(&game), before);
        assert_eq!(game.get_run_state(), RunState::NotStarted);
    }

    #[test]
    fn test_tick_after_game_over_is_idle() {
        let mut game = running_game();
        set_snake(&mut game, &[(0, 10), (1, 10), (2, 10)], Direction::Left);
        game.tick();

        assert_eq!(game.tick(), TickOutcome::Idle);
        assert_eq!(game.get_run_state(), RunState::Over);
    }

    #[test]
    fn test_new_best_score_is_persisted() {
        let store = SharedStore::default();
        *store.best.borrow_mut() = 5;
        let best = Rc::clone(&store.best);
        let saves = Rc::clone(&store.saves);

        let mut game = SnakeGame::new(20, 15, Box::new(store)).unwrap();
        game.start();
        let head = *game.get_snake().front().unwrap();
        game.food = (head.0 + 1, head.1);

        assert_eq!(game.tick(), TickOutcome::Ate);
        assert_eq!(game.get_best_score(), 10);
        assert_eq!(*best.borrow(), 10);
        assert_eq!(*saves.borrow(), 1);
    }

    #[test]
    fn test_best_score_is_monotonic() {
        let store = SharedStore::default();
        *store.best.borrow_mut() = 50;
        let saves = Rc::clone(&store.saves);

        let mut game = SnakeGame::new(20, 15, Box::new(store)).unwrap();
        game.start();
        let head = *game.get_snake().front().unwrap();
        game.food = (head.0 + 1, head.1);

        assert_eq!(game.tick(), TickOutcome::Ate);
        assert_eq!(game.get_best_score(), 50);
        assert_eq!(*saves.borrow(), 0);
    }

    #[test]
    fn test_food_placement_terminates_on_nearly_full_board() {
        let mut game = SnakeGame::new(8, 8, Box::new(MemoryScoreStore::default())).unwrap();
        game.snake = (0..8)
            .flat_map(|x| (0..8).map(move |y| (x, y)))
            .filter(|&cell| cell != (7, 7))
            .collect();

        game.place_food();
        assert_eq!(game.get_food(), (7, 7));
    }

    #[test]
    fn test_full_board_leaves_food_unchanged() {
        let mut game = SnakeGame::new(8, 8, Box::new(MemoryScoreStore::default())).unwrap();
        game.snake = (0..8).flat_map(|x| (0..8).map(move |y| (x, y))).collect();
        game.food = (3, 3);

        game.place_food();
        assert_eq!(game.get_food(), (3, 3));
    }

    #[test]
    fn test_food_is_never_placed_on_the_snake() {
        let mut game = running_game();
        set_snake(&mut game, &[(5, 10), (4, 10), (3, 10)], Direction::Right);
        for _ in 0..100 {
            game.place_food();
            assert!(!game.get_snake().contains(&game.get_food()));
        }
    }

    #[test]
    fn test_invalid_grid_sizes_are_rejected() {
        let too_small = SnakeGame::new(4, 15, Box::new(MemoryScoreStore::default()));
        assert!(matches!(too_small, Err(GameError::InvalidGridSize)));
        let too_big = SnakeGame::new(20, 100, Box::new(MemoryScoreStore::default()));
        assert!(matches!(too_big, Err(GameError::InvalidGridSize)));
    }

    #[test]
    fn test_direction_opposites() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite().opposite(), Direction::Right);
    }
}
