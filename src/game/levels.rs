use enum_map::Enum;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// One of the game's fixed levels
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[serde(from = "u8")]
pub enum Level {
    #[default]
    One,
    Two,
    Three,
    /// Surprise level: a countdown and food that disappears
    Four,
    /// Infinite mode: no score ceiling, and the snake speeds up over time
    Five,
}

impl Level {
    pub const MINIMUM: Level = Level::One;
    pub const MAXIMUM: Level = Level::Five;

    /// Look up a level by its number.  Unknown numbers resolve to level 1.
    pub fn from_number(n: u8) -> Level {
        match n {
            2 => Level::Two,
            3 => Level::Three,
            4 => Level::Four,
            5 => Level::Five,
            _ => Level::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
            Level::Four => 4,
            Level::Five => 5,
        }
    }

    pub fn iter() -> impl Iterator<Item = Level> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    /// Return the following level, or `None` if this is the last one
    pub fn next(self) -> Option<Level> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    /// Return the preceding level, or `None` if this is the first one
    pub fn prev(self) -> Option<Level> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::One => "Warm-up",
            Level::Two => "Getting Serious",
            Level::Three => "Expert",
            Level::Four => "Surprise",
            Level::Five => "Infinite",
        }
    }

    pub fn config(self) -> LevelConfig {
        match self {
            Level::One => LevelConfig {
                grid_size: 20,
                tick_interval: Duration::from_millis(150),
                snake_length: 3,
                food_count: 1,
                points_per_food: 10,
                goal: Goal::Points(100),
                time_limit: None,
                food_lifetime: None,
            },
            Level::Two => LevelConfig {
                grid_size: 25,
                tick_interval: Duration::from_millis(100),
                snake_length: 5,
                food_count: 2,
                points_per_food: 20,
                goal: Goal::Points(200),
                time_limit: None,
                food_lifetime: None,
            },
            Level::Three => LevelConfig {
                grid_size: 30,
                tick_interval: Duration::from_millis(70),
                snake_length: 7,
                food_count: 3,
                points_per_food: 30,
                goal: Goal::Points(300),
                time_limit: None,
                food_lifetime: None,
            },
            Level::Four => LevelConfig {
                grid_size: 30,
                tick_interval: Duration::from_millis(60),
                snake_length: 7,
                food_count: 3,
                points_per_food: 30,
                goal: Goal::Points(300),
                time_limit: Some(120),
                food_lifetime: Some(Duration::from_millis(8000)),
            },
            Level::Five => LevelConfig {
                grid_size: 20,
                tick_interval: Duration::from_millis(150),
                snake_length: 3,
                food_count: 1,
                points_per_food: 10,
                goal: Goal::Endless(SpeedRamp {
                    every_points: 100,
                    min_tick_interval: Duration::from_millis(30),
                }),
                time_limit: None,
                food_lifetime: None,
            },
        }
    }
}

impl From<u8> for Level {
    fn from(n: u8) -> Level {
        Level::from_number(n)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}: {}", self.number(), self.name())
    }
}

/// Tunables for a single level
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LevelConfig {
    /// Width and height of the square grid, in cells
    pub grid_size: u16,

    /// Initial time between snake movements
    pub tick_interval: Duration,

    /// Number of segments the snake starts with
    pub snake_length: usize,

    /// Number of food items kept on the grid at once
    pub food_count: usize,

    pub points_per_food: u32,

    pub goal: Goal,

    /// Seconds the player has to finish the level
    pub time_limit: Option<u32>,

    /// How long each food item stays on the grid before it expires and is
    /// replaced
    pub food_lifetime: Option<Duration>,
}

impl LevelConfig {
    pub fn is_infinite(&self) -> bool {
        matches!(self.goal, Goal::Endless(_))
    }

    /// Score at which the level is complete, or `None` in infinite mode
    pub fn points_to_complete(&self) -> Option<u32> {
        match self.goal {
            Goal::Points(p) => Some(p),
            Goal::Endless(_) => None,
        }
    }

    pub fn speed_ramp(&self) -> Option<SpeedRamp> {
        match self.goal {
            Goal::Points(_) => None,
            Goal::Endless(ramp) => Some(ramp),
        }
    }

    pub fn has_timed_food(&self) -> bool {
        self.food_lifetime.is_some()
    }
}

/// How a level ends
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Goal {
    /// The level is complete once the score reaches this many points
    Points(u32),

    /// The level never completes on points; instead the snake speeds up
    Endless(SpeedRamp),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpeedRamp {
    /// Speed up each time the score reaches a multiple of this
    pub every_points: u32,

    /// The tick interval never drops below this
    pub min_tick_interval: Duration,
}

impl SpeedRamp {
    /// The tick interval that follows `current` after one ramp step
    pub fn next_interval(&self, current: Duration, step: Duration) -> Duration {
        current.saturating_sub(step).max(self.min_tick_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Level::One)]
    #[case(1, Level::One)]
    #[case(2, Level::Two)]
    #[case(3, Level::Three)]
    #[case(4, Level::Four)]
    #[case(5, Level::Five)]
    #[case(6, Level::One)]
    #[case(255, Level::One)]
    fn test_from_number(#[case] n: u8, #[case] level: Level) {
        assert_eq!(Level::from_number(n), level);
    }

    #[test]
    fn numbers_round_trip() {
        for level in Level::iter() {
            assert_eq!(Level::from_number(level.number()), level);
        }
    }

    #[test]
    fn next_and_prev() {
        assert_eq!(Level::One.prev(), None);
        assert_eq!(Level::One.next(), Some(Level::Two));
        assert_eq!(Level::Four.next(), Some(Level::Five));
        assert_eq!(Level::Five.next(), None);
        assert_eq!(Level::Five.prev(), Some(Level::Four));
    }

    #[test]
    fn only_level_four_has_time_limit_and_timed_food() {
        for level in Level::iter() {
            let config = level.config();
            let surprise = level == Level::Four;
            assert_eq!(config.time_limit.is_some(), surprise, "{level}");
            assert_eq!(config.has_timed_food(), surprise, "{level}");
        }
    }

    #[test]
    fn only_level_five_is_infinite() {
        for level in Level::iter() {
            let config = level.config();
            let infinite = level == Level::Five;
            assert_eq!(config.is_infinite(), infinite, "{level}");
            assert_eq!(config.points_to_complete().is_none(), infinite, "{level}");
            assert_eq!(config.speed_ramp().is_some(), infinite, "{level}");
        }
    }

    #[test]
    fn snake_fits_on_grid() {
        for level in Level::iter() {
            let config = level.config();
            assert!(config.snake_length <= usize::from(config.grid_size / 2) + 1);
        }
    }

    #[rstest]
    #[case(150, 145)]
    #[case(35, 30)]
    #[case(33, 30)]
    #[case(30, 30)]
    fn ramp_is_floor_clamped(#[case] current: u64, #[case] next: u64) {
        let ramp = Level::Five.config().speed_ramp().unwrap();
        assert_eq!(
            ramp.next_interval(Duration::from_millis(current), Duration::from_millis(5)),
            Duration::from_millis(next)
        );
    }
}
