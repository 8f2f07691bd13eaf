//! Assorted constants & hard-coded configuration
use crate::game::Direction;
use std::time::Duration;

/// Maximum number of random cells sampled when looking for a free spot for a
/// new food item before giving up and declaring the grid full
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Key under which the high score is kept in the persistent store
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Time between decrements of a level's countdown
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// How much faster the snake gets at each speed-ramp step in infinite mode
pub const SPEED_RAMP_STEP: Duration = Duration::from_millis(5);

/// Direction the snake faces at the start of every level
pub const START_DIRECTION: Direction = Direction::Right;
