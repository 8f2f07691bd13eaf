mod food;
mod geometry;
mod levels;
mod snake;
mod timers;
pub use self::food::{place_food, Food, FoodId, FoodKind};
pub use self::geometry::{self_collision, wall_collision, Direction, Position};
pub use self::levels::{Goal, Level, LevelConfig, SpeedRamp};
pub use self::snake::Snake;
pub use self::timers::{TimerHandle, TimerQueue};
use crate::consts;
use crate::error_chain;
use crate::sound::{SoundEvent, SoundSink};
use crate::store::KeyValueStore;
use rand::Rng;
use std::time::Duration;

/// Where a session is in its lifecycle
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Status {
    /// No level is loaded
    #[default]
    Menu,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

/// The things a session schedules on its timer queue
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimerEvent {
    /// Move the snake one step
    Tick,

    /// Decrement the level's countdown by one second
    Countdown,

    /// A timed food item has reached the end of its lifetime
    FoodExpiry(FoodId),
}

/// A game session: the one piece of mutable state in the engine.
///
/// All changes happen either through the command methods
/// ([`start_game()`][Session::start_game],
/// [`change_direction()`][Session::change_direction], etc.) or through timer
/// events, which fire when the session is advanced in time with
/// [`advance_to()`][Session::advance_to].  Each command and each timer event
/// runs to completion before the next one is looked at.
///
/// The session is generic over its random number source `R`, the persistent
/// store `K` that the high score lives in, and the sink `S` that sound
/// effects are sent to.
#[derive(Debug)]
pub struct Session<R = rand::rngs::ThreadRng, K = Box<dyn KeyValueStore>, S = crate::sound::LogSink>
{
    rng: R,
    store: K,
    sound: S,
    status: Status,
    level: Level,
    score: u32,
    high_score: u32,

    /// `None` while in the menu
    config: Option<LevelConfig>,

    /// `None` while in the menu
    snake: Option<Snake>,

    /// The direction the snake moved in on the last tick
    direction: Direction,

    /// The direction the snake will move in on the next tick
    next_direction: Direction,

    food: Vec<Food>,
    next_food_id: u64,
    timers: TimerQueue<TimerEvent>,
    tick_timer: Option<TimerHandle>,
    countdown_timer: Option<TimerHandle>,
    food_timers: Vec<TimerHandle>,

    /// Seconds left on the level's countdown
    time_remaining: Option<u32>,

    /// Current time between ticks.  Shrinks over time in infinite mode.
    tick_interval: Duration,
}

impl<K: KeyValueStore, S: SoundSink> Session<rand::rngs::ThreadRng, K, S> {
    pub fn new(store: K, sound: S) -> Self {
        Session::with_rng(rand::rng(), store, sound)
    }
}

impl<R: Rng, K: KeyValueStore, S: SoundSink> Session<R, K, S> {
    /// Create a new session in the menu.  The high score is read from `store`
    /// here and never again.
    pub fn with_rng(rng: R, store: K, sound: S) -> Session<R, K, S> {
        let high_score = load_high_score(&store);
        Session {
            rng,
            store,
            sound,
            status: Status::Menu,
            level: Level::default(),
            score: 0,
            high_score,
            config: None,
            snake: None,
            direction: consts::START_DIRECTION,
            next_direction: consts::START_DIRECTION,
            food: Vec::new(),
            next_food_id: 0,
            timers: TimerQueue::default(),
            tick_timer: None,
            countdown_timer: None,
            food_timers: Vec::new(),
            time_remaining: None,
            tick_interval: Duration::ZERO,
        }
    }

    /// Start (or restart) `level` from scratch
    pub fn start_game(&mut self, level: Level) {
        self.cancel_timers();
        let config = level.config();
        log::info!("Starting {level}");
        self.level = level;
        self.config = Some(config);
        self.score = 0;
        self.snake = Some(Snake::centered(config.snake_length, config.grid_size));
        self.food.clear();
        self.direction = consts::START_DIRECTION;
        self.next_direction = consts::START_DIRECTION;
        self.tick_interval = config.tick_interval;
        self.time_remaining = config.time_limit;
        if !config.has_timed_food() {
            for _ in 0..config.food_count {
                if self.place_new_food(None).is_none() {
                    log::debug!("No room for initial food");
                }
            }
        }
        self.status = Status::Playing;
        if config.time_limit.is_some() {
            self.countdown_timer = Some(
                self.timers
                    .schedule_repeating(consts::COUNTDOWN_PERIOD, TimerEvent::Countdown),
            );
        }
        if let Some(lifetime) = config.food_lifetime {
            for _ in 0..config.food_count {
                self.spawn_timed_food(lifetime);
            }
        }
        self.start_tick_timer();
    }

    /// Turn the snake on its next move.  Attempts to turn it back the way it
    /// just came are ignored.
    pub fn change_direction(&mut self, direction: Direction) {
        if direction != self.direction.reverse() {
            self.next_direction = direction;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            Status::Playing => {
                log::debug!("Pausing");
                self.status = Status::Paused;
            }
            Status::Paused => {
                log::debug!("Resuming");
                self.status = Status::Playing;
            }
            _ => (),
        }
    }

    pub fn return_to_menu(&mut self) {
        log::debug!("Returning to menu");
        self.cancel_timers();
        self.status = Status::Menu;
        self.config = None;
        self.snake = None;
        self.food.clear();
        self.score = 0;
        self.time_remaining = None;
    }

    /// Move on from a completed level to the next one.  Completing the last
    /// level and continuing replays it.  Does nothing unless a level has just
    /// been completed.
    pub fn continue_to_next_level(&mut self) {
        if self.status == Status::LevelComplete {
            let level = self.level.next().unwrap_or(Level::MAXIMUM);
            self.start_game(level);
        }
    }

    /// Move the session's clock forwards to `now`, firing every timer that
    /// comes due along the way in order
    pub fn advance_to(&mut self, now: Duration) {
        while let Some((handle, event)) = self.timers.pop_due(now) {
            self.handle_timer(handle, event);
        }
    }

    /// Move the session's clock forwards by `delta`
    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.timers.now().saturating_add(delta));
    }

    fn handle_timer(&mut self, handle: TimerHandle, event: TimerEvent) {
        match event {
            TimerEvent::Tick => {
                if self.status == Status::Playing {
                    self.step();
                }
            }
            TimerEvent::Countdown => self.count_down(),
            TimerEvent::FoodExpiry(id) => {
                self.food_timers.retain(|&h| h != handle);
                self.expire_food(id);
            }
        }
    }

    /// Advance the game by one tick
    fn step(&mut self) {
        let (Some(config), Some(snake)) = (self.config, self.snake.take()) else {
            return;
        };
        self.direction = self.next_direction;
        // Food is eaten on the tick that moves the head onto it
        let target = snake.head().step(self.direction);
        let eaten = self.food.iter().position(|f| f.position == target);
        let snake = snake.advance(self.direction, eaten.is_some());
        let crashed = wall_collision(snake.head(), config.grid_size) || self_collision(&snake);
        self.snake = Some(snake);
        if crashed {
            log::debug!("Snake crashed at {target}");
            self.end_game();
            return;
        }
        let Some(index) = eaten else {
            return;
        };
        let meal = self.food.remove(index);
        self.score = self.score.saturating_add(config.points_per_food);
        log::debug!("Ate {} at {}; score is now {}", meal.id, meal.position, self.score);
        self.sound.play(SoundEvent::Eat);
        if let Some(lifetime) = config.food_lifetime {
            self.spawn_timed_food(lifetime);
        } else if self.place_new_food(None).is_none() {
            log::info!("No room left for food");
            self.food.clear();
            self.complete_level();
            return;
        }
        if let Some(ramp) = config.speed_ramp() {
            if ramp.every_points > 0 && self.score % ramp.every_points == 0 {
                self.speed_up(ramp);
            }
        } else if config
            .points_to_complete()
            .is_some_and(|target| self.score >= target)
        {
            self.complete_level();
        }
    }

    fn count_down(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        let Some(remaining) = self.time_remaining else {
            return;
        };
        let remaining = remaining.saturating_sub(1);
        self.time_remaining = Some(remaining);
        if remaining == 0 {
            log::info!("Out of time");
            self.end_game();
        }
    }

    fn expire_food(&mut self, id: FoodId) {
        let Some(index) = self.food.iter().position(|f| f.id == id) else {
            // Already eaten
            return;
        };
        let expired = self.food.remove(index);
        log::debug!("{} at {} expired", expired.id, expired.position);
        if self.status == Status::Playing {
            if let Some(lifetime) = self.config.and_then(|c| c.food_lifetime) {
                self.spawn_timed_food(lifetime);
            }
        }
    }

    fn speed_up(&mut self, ramp: SpeedRamp) {
        let interval = ramp.next_interval(self.tick_interval, consts::SPEED_RAMP_STEP);
        log::debug!(
            "Speeding up from {:?} to {:?} per tick",
            self.tick_interval,
            interval
        );
        self.tick_interval = interval;
        self.start_tick_timer();
    }

    fn end_game(&mut self) {
        if self.status == Status::GameOver {
            return;
        }
        self.cancel_timers();
        self.commit_high_score();
        self.status = Status::GameOver;
        log::info!("Game over on {} with {} points", self.level, self.score);
        self.sound.play(SoundEvent::GameOver);
    }

    fn complete_level(&mut self) {
        self.cancel_timers();
        self.commit_high_score();
        self.status = Status::LevelComplete;
        log::info!("Completed {} with {} points", self.level, self.score);
        if self.is_infinite_mode() {
            self.sound.play(SoundEvent::EpicVictory);
        } else {
            self.sound.play(SoundEvent::LevelUp);
        }
    }

    /// Place a new food item at a random free cell.  Returns `None` if there
    /// was no room.
    fn place_new_food(&mut self, spawned_at: Option<Duration>) -> Option<FoodId> {
        let grid_size = self.config?.grid_size;
        let snake = self.snake.as_ref()?;
        let position = place_food(grid_size, snake, &self.food, &mut self.rng)?;
        let id = FoodId(self.next_food_id);
        self.next_food_id += 1;
        self.food.push(Food {
            id,
            position,
            kind: FoodKind::random(&mut self.rng),
            spawned_at,
        });
        Some(id)
    }

    fn spawn_timed_food(&mut self, lifetime: Duration) {
        let now = self.timers.now();
        if let Some(id) = self.place_new_food(Some(now)) {
            let handle = self
                .timers
                .schedule_once(lifetime, TimerEvent::FoodExpiry(id));
            self.food_timers.push(handle);
        } else {
            log::debug!("No room for timed food");
        }
    }

    fn commit_high_score(&mut self) {
        if self.score > self.high_score {
            log::info!("New high score: {}", self.score);
            self.high_score = self.score;
            if let Err(e) = self
                .store
                .set(consts::HIGH_SCORE_KEY, &self.score.to_string())
            {
                log::warn!("Could not save high score: {}", error_chain(&e));
            }
        }
    }
}

impl<R, K, S> Session<R, K, S> {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn is_in_menu(&self) -> bool {
        self.status == Status::Menu
    }

    pub fn is_level_complete(&self) -> bool {
        self.status == Status::LevelComplete
    }

    pub fn is_infinite_mode(&self) -> bool {
        self.config.is_some_and(|c| c.is_infinite())
    }

    pub fn has_time_limit(&self) -> bool {
        self.config.is_some_and(|c| c.time_limit.is_some())
    }

    pub fn has_next_level(&self) -> bool {
        self.level.next().is_some()
    }

    /// The most recently started level.  In the menu, this is the level that
    /// was last played (or level 1).
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn config(&self) -> Option<&LevelConfig> {
        self.config.as_ref()
    }

    pub fn grid_size(&self) -> Option<u16> {
        self.config.map(|c| c.grid_size)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn snake(&self) -> Option<&Snake> {
        self.snake.as_ref()
    }

    pub fn snake_head(&self) -> Option<Position> {
        self.snake.as_ref().map(Snake::head)
    }

    pub fn snake_len(&self) -> usize {
        self.snake.as_ref().map_or(0, Snake::len)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Percentage of the way to completing the current level, in `[0, 100]`.
    /// Always 0 in the menu and in infinite mode.
    pub fn level_progress(&self) -> f64 {
        match self.config.and_then(|c| c.points_to_complete()) {
            Some(target) if target > 0 => {
                (f64::from(self.score) / f64::from(target) * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// The time on the session's clock
    pub fn clock(&self) -> Duration {
        self.timers.now()
    }

    /// When the next timer is due to fire, on the session's clock
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn timers(&self) -> &TimerQueue<TimerEvent> {
        &self.timers
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    fn cancel_timers(&mut self) {
        let handles = self
            .tick_timer
            .take()
            .into_iter()
            .chain(self.countdown_timer.take())
            .chain(std::mem::take(&mut self.food_timers));
        for handle in handles {
            let _ = self.timers.cancel(handle);
        }
    }

    fn start_tick_timer(&mut self) {
        if let Some(handle) = self.tick_timer.take() {
            let _ = self.timers.cancel(handle);
        }
        self.tick_timer = Some(
            self.timers
                .schedule_repeating(self.tick_interval, TimerEvent::Tick),
        );
    }
}

fn load_high_score<K: KeyValueStore>(store: &K) -> u32 {
    match store.get(consts::HIGH_SCORE_KEY) {
        Ok(Some(value)) => value.trim().parse::<u32>().unwrap_or_else(|e| {
            log::warn!("Ignoring invalid stored high score {value:?}: {e}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not load high score: {}", error_chain(&e));
            0
        }
    }
}
