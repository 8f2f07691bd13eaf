use super::geometry::Position;
use super::snake::Snake;
use crate::consts;
use enum_map::Enum;
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Identifies a single food item for the lifetime of a session
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FoodId(pub(crate) u64);

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "food#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Food {
    pub id: FoodId,
    pub position: Position,
    pub kind: FoodKind,

    /// When the food was placed, on the session's timer clock.  Only set on
    /// levels where food expires.
    pub spawned_at: Option<Duration>,
}

/// Decorative variety of a food item
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub enum FoodKind {
    Apple,
    Banana,
    Grapes,
    Strawberry,
    Orange,
    Watermelon,
    Cherries,
    Peach,
}

impl FoodKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> FoodKind {
        FoodKind::from_usize(rng.random_range(0..FoodKind::LENGTH))
    }

    pub fn emoji(self) -> &'static str {
        match self {
            FoodKind::Apple => "🍎",
            FoodKind::Banana => "🍌",
            FoodKind::Grapes => "🍇",
            FoodKind::Strawberry => "🍓",
            FoodKind::Orange => "🍊",
            FoodKind::Watermelon => "🍉",
            FoodKind::Cherries => "🍒",
            FoodKind::Peach => "🍑",
        }
    }
}

/// Pick a random free cell for a new food item.
///
/// Returns `None` if the snake fills the entire grid, or if no free cell was
/// found within [`MAX_PLACEMENT_ATTEMPTS`][consts::MAX_PLACEMENT_ATTEMPTS]
/// random samples.  Callers treat both cases as "no room left".
pub fn place_food<R: Rng + ?Sized>(
    grid_size: u16,
    snake: &Snake,
    existing: &[Food],
    rng: &mut R,
) -> Option<Position> {
    let cells = usize::from(grid_size) * usize::from(grid_size);
    if snake.len() >= cells {
        return None;
    }
    let size = i32::from(grid_size);
    (0..consts::MAX_PLACEMENT_ATTEMPTS)
        .map(|_| Position::new(rng.random_range(0..size), rng.random_range(0..size)))
        .find(|&pos| !snake.contains(pos) && !existing.iter().any(|f| f.position == pos))
}
