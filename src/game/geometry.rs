use super::snake::Snake;
use std::fmt;

/// A cell on the playing grid, relative to the top-left corner.
///
/// Coordinates are signed so that a head which has just left the grid can
/// still be represented (and then detected by [`wall_collision()`]).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// Return the neighboring cell one step away in `direction`
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Position {
        Position { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The unit vector for this direction.  `y` grows downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Returns `true` iff `pos` lies outside of a `grid_size` × `grid_size` grid
pub fn wall_collision(pos: Position, grid_size: u16) -> bool {
    let size = i32::from(grid_size);
    !(0..size).contains(&pos.x) || !(0..size).contains(&pos.y)
}

/// Returns `true` iff the snake's head occupies the same cell as any other
/// segment
pub fn self_collision(snake: &Snake) -> bool {
    let head = snake.head();
    snake.segments().skip(1).any(|&p| p == head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Position::new(2, 7), Position::new(2, 6))]
    #[case(Direction::Down, Position::new(2, 7), Position::new(2, 8))]
    #[case(Direction::Left, Position::new(2, 7), Position::new(1, 7))]
    #[case(Direction::Right, Position::new(2, 7), Position::new(3, 7))]
    #[case(Direction::Left, Position::new(0, 7), Position::new(-1, 7))]
    #[case(Direction::Up, Position::new(4, 0), Position::new(4, -1))]
    fn test_step(#[case] d: Direction, #[case] pos: Position, #[case] r: Position) {
        assert_eq!(pos.step(d), r);
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    #[case(Direction::Left)]
    #[case(Direction::Right)]
    fn reverse_is_involution(#[case] d: Direction) {
        assert_ne!(d.reverse(), d);
        assert_eq!(d.reverse().reverse(), d);
        let (dx, dy) = d.offset();
        assert_eq!(d.reverse().offset(), (-dx, -dy));
    }

    #[rstest]
    fn wall_collision_at_edges(#[values(20, 25, 30)] grid_size: u16) {
        let g = i32::from(grid_size);
        for x in -2..g + 2 {
            for y in -2..g + 2 {
                let outside = x < 0 || y < 0 || x >= g || y >= g;
                assert_eq!(
                    wall_collision(Position::new(x, y), grid_size),
                    outside,
                    "({x}, {y}) on a {grid_size}x{grid_size} grid"
                );
            }
        }
    }

    #[test]
    fn detects_self_collision() {
        let snake = Snake::from_segments([(6, 5), (5, 5), (6, 5), (6, 6), (5, 6)]);
        assert!(self_collision(&snake));
    }

    #[test]
    fn straight_snake_does_not_collide() {
        let snake = Snake::from_segments([(10, 10), (9, 10), (8, 10)]);
        assert!(!self_collision(&snake));
    }
}
