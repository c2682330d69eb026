use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use super::{
    action::Direction,
    config::GameConfig,
    food::Food,
    state::{Advance, Grid, Snake},
};
use crate::storage::RecordStore;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// The snake moved onto an empty cell
    Moved,
    /// The snake ate the food this tick
    AteFood {
        score: u32,
        /// Speed went up along with this point
        speed_up: bool,
    },
    /// The snake ran into itself; the session is over
    GameOver {
        score: u32,
        record: u32,
        /// The record was beaten by this game
        new_record: bool,
    },
    /// The session was already over; nothing changed
    Idle,
}

/// One game of snake: the snake, its food and the score around them.
///
/// Holds no terminal or timing state. The caller decides when to `tick`
/// (see [`GameSession::tick_interval`]) and what to draw from the accessors.
pub struct GameSession<S: RecordStore> {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Food,
    score: u32,
    speed: u32,
    record: u32,
    pending_direction: Option<Direction>,
    over: bool,
    store: S,
    rng: StdRng,
}

impl<S: RecordStore> GameSession<S> {
    /// Start a session, loading the record from `store`
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Start a session with a caller-supplied random source
    pub fn with_rng(config: GameConfig, store: S, mut rng: StdRng) -> Self {
        let grid = config.grid();
        let record = store.load();
        let snake = Snake::new(grid.center(), Direction::Up, grid);
        let food = Food::spawn(&snake, grid, &mut rng);

        info!(
            "new session on {}x{} board, record {}",
            grid.width(),
            grid.height(),
            record
        );

        Self {
            speed: config.initial_speed,
            config,
            grid,
            snake,
            food,
            score: 0,
            record,
            pending_direction: None,
            over: false,
            store,
            rng,
        }
    }

    /// Queue a turn for the next tick.
    ///
    /// Only the first direction of a tick counts, even if the snake later
    /// refuses it as a reversal. Returns whether `direction` was queued.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.over || self.pending_direction.is_some() {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickEvent {
        if self.over {
            return TickEvent::Idle;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.snake.change_direction(direction);
        }

        match self.snake.advance() {
            Advance::Collided(_) => self.finish(),
            Advance::Moved(head) if head == self.food.position() => self.eat(),
            Advance::Moved(_) => TickEvent::Moved,
        }
    }

    fn eat(&mut self) -> TickEvent {
        self.snake.grow();
        let placed = self.food.relocate(&self.snake, self.grid, &mut self.rng);
        self.score += 1;

        if !placed {
            // Food stays under the head; the next move cannot avoid the body.
            warn!("no free cell for food at score {}", self.score);
        }

        let speed_up = self.score.is_multiple_of(self.config.speed_step);
        if speed_up {
            self.speed += 1;
        }

        TickEvent::AteFood {
            score: self.score,
            speed_up,
        }
    }

    fn finish(&mut self) -> TickEvent {
        self.over = true;
        self.pending_direction = None;

        let new_record = self.score > self.record;
        if new_record {
            self.record = self.score;
            if let Err(err) = self.store.save(self.record) {
                warn!("could not save record {}: {:#}", self.record, err);
            }
        }

        info!(
            "game over: score {}, record {}{}",
            self.score,
            self.record,
            if new_record { " (new)" } else { "" }
        );

        TickEvent::GameOver {
            score: self.score,
            record: self.record,
            new_record,
        }
    }

    /// Fresh snake, food, score and speed; the record carries over
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.grid.center(), Direction::Up, self.grid);
        self.food = Food::spawn(&self.snake, self.grid, &mut self.rng);
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.pending_direction = None;
        self.over = false;
        info!("session restarted, record {}", self.record);
    }

    /// Time between ticks at the current speed
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.speed.max(1)))
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn record(&self) -> u32 {
        self.record
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Put the food right in front of the head
    #[cfg(test)]
    pub(crate) fn place_food_ahead(&mut self) {
        let ahead = self.grid.step(self.snake.head(), self.snake.heading());
        self.food.place_at(ahead);
    }

    /// Swap in a four-cell loop whose next move up bites its own tail
    #[cfg(test)]
    pub(crate) fn coil_snake(&mut self) {
        use super::state::Position;

        let cells = [
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ];
        self.snake = Snake::from_cells(cells, Direction::Up, self.grid);
        self.pending_direction = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Position;
    use crate::storage::MemoryRecordStore;

    fn session(record: u32) -> GameSession<MemoryRecordStore> {
        GameSession::with_rng(
            GameConfig::default(),
            MemoryRecordStore::new(record),
            StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn test_new_session() {
        let session = session(7);
        assert_eq!(session.score(), 0);
        assert_eq!(session.speed(), 10);
        assert_eq!(session.record(), 7);
        assert!(!session.is_over());
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.snake().head(), Position::new(15, 15));
        assert_eq!(session.snake().heading(), Direction::Up);
        assert!(!session.snake().contains(session.food().position()));
        assert_eq!(session.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_plain_ticks_move_up() {
        let mut session = session(0);
        session.food.place_at(Position::new(0, 0));

        for y in [14, 13, 12] {
            assert_eq!(session.tick(), TickEvent::Moved);
            assert_eq!(session.snake().head(), Position::new(15, y));
            assert_eq!(session.snake().len(), 1);
        }
    }

    #[test]
    fn test_only_first_direction_per_tick() {
        let mut session = session(0);
        session.food.place_at(Position::new(0, 0));

        assert!(session.steer(Direction::Left));
        assert!(!session.steer(Direction::Down));
        session.tick();
        assert_eq!(session.snake().heading(), Direction::Left);
        assert_eq!(session.snake().head(), Position::new(14, 15));

        // A refused reversal still uses up the tick's turn
        assert!(session.steer(Direction::Right));
        assert!(!session.steer(Direction::Up));
        session.tick();
        assert_eq!(session.snake().heading(), Direction::Left);
        assert_eq!(session.snake().head(), Position::new(13, 15));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut session = session(0);
        session.place_food_ahead();

        let event = session.tick();
        assert_eq!(
            event,
            TickEvent::AteFood {
                score: 1,
                speed_up: false
            }
        );
        assert_eq!(session.score(), 1);
        assert!(!session.snake().contains(session.food().position()));

        // Growth lands on the following move
        assert_eq!(session.snake().len(), 1);
        session.food.place_at(Position::new(0, 0));
        session.tick();
        assert_eq!(session.snake().len(), 2);
        session.tick();
        assert_eq!(session.snake().len(), 2);
    }

    #[test]
    fn test_speed_steps_every_fifth_point() {
        let mut session = session(0);
        let mut speeds = Vec::new();

        for _ in 0..10 {
            session.place_food_ahead();
            match session.tick() {
                TickEvent::AteFood { score, speed_up } => {
                    assert_eq!(speed_up, score % 5 == 0);
                }
                other => panic!("expected to eat, got {other:?}"),
            }
            speeds.push(session.speed());
        }

        assert_eq!(speeds, vec![10, 10, 10, 10, 11, 11, 11, 11, 11, 12]);
    }

    #[test]
    fn test_game_over_sets_new_record() {
        let mut session = session(2);
        session.coil_snake();
        session.score = 5;

        let event = session.tick();
        assert_eq!(
            event,
            TickEvent::GameOver {
                score: 5,
                record: 5,
                new_record: true
            }
        );
        assert!(session.is_over());
        assert_eq!(session.record(), 5);
        assert_eq!(session.store().record(), 5);
        assert_eq!(session.store().saves(), 1);
    }

    #[test]
    fn test_game_over_keeps_higher_or_equal_record() {
        for score in [0, 3, 8] {
            let mut session = session(8);
            session.coil_snake();
            session.score = score;

            assert_eq!(
                session.tick(),
                TickEvent::GameOver {
                    score,
                    record: 8,
                    new_record: false
                }
            );
            assert_eq!(session.store().saves(), 0);
        }
    }

    #[test]
    fn test_failed_save_is_not_fatal() {
        let mut session = GameSession::with_rng(
            GameConfig::default(),
            MemoryRecordStore::failing(1),
            StdRng::seed_from_u64(9),
        );
        session.coil_snake();
        session.score = 4;

        assert_eq!(
            session.tick(),
            TickEvent::GameOver {
                score: 4,
                record: 4,
                new_record: true
            }
        );
        assert_eq!(session.record(), 4);
        assert_eq!(session.store().record(), 1);
    }

    #[test]
    fn test_finished_session_is_idle() {
        let mut session = session(0);
        session.coil_snake();
        session.tick();

        let snake = session.snake().clone();
        assert_eq!(session.tick(), TickEvent::Idle);
        assert!(!session.steer(Direction::Left));
        assert_eq!(session.snake(), &snake);
    }

    #[test]
    fn test_restart_resets_everything_but_record() {
        let mut session = session(0);
        for _ in 0..5 {
            session.place_food_ahead();
            session.tick();
        }
        assert_eq!(session.speed(), 11);

        session.coil_snake();
        session.tick();
        assert_eq!(session.record(), 5);

        session.restart();
        assert!(!session.is_over());
        assert_eq!(session.score(), 0);
        assert_eq!(session.speed(), 10);
        assert_eq!(session.record(), 5);
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.snake().head(), Position::new(15, 15));
        assert_eq!(session.snake().heading(), Direction::Up);
        assert!(!session.snake().contains(session.food().position()));
    }

    #[test]
    fn test_eating_on_a_full_board_ends_next_tick() {
        let mut session = GameSession::with_rng(
            GameConfig::tiny(3, 1),
            MemoryRecordStore::new(0),
            StdRng::seed_from_u64(5),
        );
        let cells = [Position::new(0, 0), Position::new(1, 0)];
        session.snake = Snake::from_cells(cells, Direction::Right, session.grid);
        // Growth from an earlier meal lands together with this one
        session.snake.grow();
        session.food.place_at(Position::new(2, 0));

        assert_eq!(
            session.tick(),
            TickEvent::AteFood {
                score: 1,
                speed_up: false
            }
        );
        assert_eq!(session.snake().len(), 3);
        assert_eq!(session.food().position(), Position::new(2, 0));

        assert_eq!(
            session.tick(),
            TickEvent::GameOver {
                score: 1,
                record: 1,
                new_record: true
            }
        );
    }

    #[test]
    fn test_tick_interval_follows_speed() {
        let mut session = session(0);
        session.speed = 20;
        assert_eq!(session.tick_interval(), Duration::from_millis(50));
    }
}
