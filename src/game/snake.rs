use super::geometry::{Direction, Position};
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// The head is the first segment and the tail is the last.  All positions are
/// relative to the top-left corner of the grid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snake {
    segments: VecDeque<Position>,
}

impl Snake {
    /// Create a snake of `length` segments lying horizontally in the middle
    /// of a `grid_size` × `grid_size` grid, with its head at the center and
    /// its body trailing off to the left.
    pub fn centered(length: usize, grid_size: u16) -> Snake {
        let center = i32::from(grid_size / 2);
        Snake {
            segments: (0..)
                .take(length)
                .map(|i| Position::new(center - i, center))
                .collect(),
        }
    }

    /// Create a snake from its segment positions, head first.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments<I, P>(segments: I) -> Snake
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        let segments = segments
            .into_iter()
            .map(Into::into)
            .collect::<VecDeque<_>>();
        assert!(!segments.is_empty(), "a snake must have at least one segment");
        Snake { segments }
    }

    /// Return the position of the snake's head
    pub fn head(&self) -> Position {
        self.segments.front().copied().unwrap_or_default()
    }

    // A snake always has a head, so it is never empty.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Iterate over the snake's segments, head first
    pub fn segments(&self) -> std::collections::vec_deque::Iter<'_, Position> {
        self.segments.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Move the snake one cell in `direction`.
    ///
    /// A new head is added in front of the old one.  If `grow` is `false`,
    /// the tail is dropped so the length stays the same; otherwise the tail
    /// is retained and the snake ends up one segment longer.  No collision
    /// checks are performed.
    #[must_use]
    pub fn advance(mut self, direction: Direction, grow: bool) -> Snake {
        let head = self.head().step(direction);
        self.segments.push_front(head);
        if !grow {
            let _ = self.segments.pop_back();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn centered_snake() {
        let snake = Snake::centered(3, 20);
        assert_eq!(
            snake.segments().copied().collect::<Vec<_>>(),
            [
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
    }

    #[test]
    fn centered_odd_grid() {
        let snake = Snake::centered(5, 25);
        assert_eq!(snake.head(), Position::new(12, 12));
        assert_eq!(snake.segments().last(), Some(&Position::new(8, 12)));
        assert_eq!(snake.len(), 5);
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    #[case(Direction::Right)]
    fn advance_without_growth_keeps_length(#[case] d: Direction) {
        let snake = Snake::from_segments([(10, 10), (9, 10), (8, 10), (8, 11)]);
        let moved = snake.clone().advance(d, false);
        assert_eq!(moved.len(), snake.len());
        assert_eq!(moved.head(), snake.head().step(d));
        let expected_body = snake.segments().take(3).copied().collect::<Vec<_>>();
        assert_eq!(moved.segments().skip(1).copied().collect::<Vec<_>>(), expected_body);
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    #[case(Direction::Right)]
    fn advance_with_growth_retains_tail(#[case] d: Direction) {
        let snake = Snake::from_segments([(10, 10), (9, 10), (8, 10), (8, 11)]);
        let moved = snake.clone().advance(d, true);
        assert_eq!(moved.len(), snake.len() + 1);
        assert_eq!(moved.head(), snake.head().step(d));
        assert!(moved.segments().skip(1).eq(snake.segments()));
    }

    #[test]
    fn advance_does_not_check_walls() {
        let snake = Snake::from_segments([(0, 10), (1, 10), (2, 10)]);
        let moved = snake.advance(Direction::Left, false);
        assert_eq!(moved.head(), Position::new(-1, 10));
        assert_eq!(moved.segments().last(), Some(&Position::new(1, 10)));
    }
}
