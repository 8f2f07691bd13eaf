use super::consts;
use super::util::{center_rect, format_time};
use levelsnake::game::{Food, Goal, Level, Position, Session, Status};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Gauge, Widget,
    },
};
use std::fmt::Write;

/// Build a line of key hints of the form "Label (key) · Label (key)"
fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut line = Line::from(" ");
    for (i, &(label, key)) in hints.iter().enumerate() {
        if i > 0 {
            line.push_span(" · ");
        }
        line.push_span(label);
        line.push_span(" (");
        line.push_span(Span::styled(key, consts::KEY_STYLE));
        line.push_span(")");
    }
    line
}

/// One-line summary of a level's rules for the menu
pub(super) fn describe(level: Level) -> String {
    let config = level.config();
    let g = config.grid_size;
    let mut s = match config.goal {
        Goal::Points(target) => format!("{g}×{g}, {target} to win"),
        Goal::Endless(ramp) => format!("{g}×{g}, endless, faster every {} pts", ramp.every_points),
    };
    if let Some(limit) = config.time_limit {
        let _ = write!(s, ", {} limit", format_time(limit));
    }
    if let Some(lifetime) = config.food_lifetime {
        let _ = write!(s, ", food lasts {}s", lifetime.as_secs());
    }
    s
}

/// The level picker shown while the session is in the menu
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct MenuScreen {
    pub(super) selection: Level,
    pub(super) high_score: u32,
}

static INSTRUCTIONS: &[&str] = &[
    "Move the snake with ← ↓ ↑ →, h j k l, or a s w d.",
    "Eat the food, but don't hit the walls or yourself!",
];

impl MenuScreen {
    const WIDTH: u16 = 72;
    const HEIGHT: u16 = 16;
}

impl Widget for MenuScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = center_rect(area, Size::new(Self::WIDTH, Self::HEIGHT));
        let [title_area, score_area, _, levels_area, _, instructions_area, _, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .areas(display);
        Line::styled("L E V E L S N A K E", consts::TITLE_STYLE)
            .centered()
            .render(title_area, buf);
        Line::from(format!("High score: {}", self.high_score))
            .centered()
            .render(score_area, buf);
        for (level, row) in Level::iter().zip(levels_area.rows()) {
            let selected = level == self.selection;
            let mut line = Line::from(if selected { " » " } else { "   " });
            line.push_span(Span::styled(level.number().to_string(), consts::KEY_STYLE));
            line.push_span(format!("  {:<16}", level.name()));
            line.push_span(describe(level));
            if selected {
                line = line.style(consts::MENU_SELECTION_STYLE);
            }
            line.render(row, buf);
        }
        for (text, row) in INSTRUCTIONS.iter().zip(instructions_area.rows()) {
            Line::from(*text).centered().render(row, buf);
        }
        let [hints1, hints2] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(hints_area);
        key_hints(&[("Play", "Enter"), ("Choose", "↑/↓"), ("Jump to level", "1-5")])
            .centered()
            .render(hints1, buf);
        key_hints(&[("Quit", "q")]).centered().render(hints2, buf);
    }
}

/// The game screen: status bar, progress, grid & messages
#[derive(Debug)]
pub(super) struct GameScreen<'a, R> {
    pub(super) session: &'a Session<R>,
}

impl<R> GameScreen<'_, R> {
    fn status_line(&self) -> String {
        let mut s = format!(
            " {}   Score: {}   High Score: {}",
            self.session.level(),
            self.session.score(),
            self.session.high_score()
        );
        if let Some(secs) = self.session.time_remaining() {
            s.push_str("   Time: ");
            s.push_str(&format_time(secs));
        }
        s
    }

    fn render_progress(&self, area: Rect, buf: &mut Buffer) {
        if self.session.is_infinite_mode() {
            Line::from(format!(
                " Speed: {} ms per move",
                self.session.tick_interval().as_millis()
            ))
            .render(area, buf);
        } else {
            let percent = self.session.level_progress();
            Gauge::default()
                .ratio(percent / 100.0)
                .label(format!("{percent:.0}%"))
                .gauge_style(consts::GAUGE_STYLE)
                .render(area, buf);
        }
    }

    fn food_style(&self, food: &Food) -> Style {
        let expiring = food
            .spawned_at
            .zip(self.session.config().and_then(|c| c.food_lifetime))
            .is_some_and(|(spawned, lifetime)| {
                spawned.saturating_add(lifetime).saturating_sub(self.session.clock())
                    <= consts::FOOD_WARNING
            });
        if expiring {
            consts::FOOD_EXPIRING_STYLE
        } else {
            Style::new()
        }
    }

    fn render_messages(&self, msg1: Rect, msg2: Rect, buf: &mut Buffer) {
        match self.session.status() {
            Status::Playing | Status::Paused | Status::Menu => {
                key_hints(&[("Pause", "p"), ("Restart", "r"), ("Menu", "m"), ("Quit", "q")])
                    .render(msg2, buf);
            }
            Status::GameOver => {
                let mut banner = String::from(" GAME OVER");
                if self.session.time_remaining() == Some(0) {
                    banner.push_str(": out of time!");
                } else {
                    banner.push('!');
                }
                if self.session.score() > 0 && self.session.score() == self.session.high_score()
                {
                    banner.push_str("  New high score!");
                }
                Line::styled(banner, consts::BANNER_STYLE).render(msg1, buf);
                key_hints(&[("Restart", "r"), ("Menu", "m"), ("Quit", "q")]).render(msg2, buf);
            }
            Status::LevelComplete => {
                let banner = if self.session.is_infinite_mode() {
                    " YOU FILLED THE WHOLE GRID!"
                } else {
                    " LEVEL COMPLETE!"
                };
                Line::styled(banner, consts::BANNER_STYLE).render(msg1, buf);
                let next = if self.session.has_next_level() {
                    ("Next level", "n")
                } else {
                    ("Play again", "n")
                };
                key_hints(&[next, ("Restart", "r"), ("Menu", "m"), ("Quit", "q")])
                    .render(msg2, buf);
            }
        }
    }
}

impl<R> Widget for GameScreen<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(grid_size) = self.session.grid_size() else {
            return;
        };
        let grid_width = grid_size
            .saturating_mul(consts::CELL_WIDTH)
            .saturating_add(2);
        let grid_height = grid_size.saturating_add(2);
        let display = center_rect(
            area,
            Size::new(
                grid_width.max(consts::MIN_DISPLAY_WIDTH),
                grid_height.saturating_add(4),
            ),
        );
        let [status_area, progress_area, grid_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(self.status_line(), consts::STATUS_BAR_STYLE).render(status_area, buf);
        self.render_progress(progress_area, buf);

        let block_area = center_rect(grid_area, Size::new(grid_width, grid_height));
        Block::bordered().render(block_area, buf);
        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for food in self.session.food() {
            canvas.draw_cell(food.position, food.kind.emoji(), self.food_style(food));
        }
        if let Some(snake) = self.session.snake() {
            for &p in snake.segments().skip(1) {
                canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
            }
            // Draw the head last so that, if it's a collision, we overwrite
            // whatever it's colliding with
            if self.session.is_over() {
                canvas.draw_cell(
                    snake.head(),
                    consts::COLLISION_SYMBOL,
                    consts::COLLISION_STYLE,
                );
            } else {
                canvas.draw_cell(snake.head(), consts::SNAKE_HEAD_SYMBOL, consts::SNAKE_STYLE);
            }
        }

        self.render_messages(msg1_area, msg2_area, buf);
        if self.session.is_paused() {
            Paused.render(
                center_rect(display, Size::new(Paused::WIDTH, Paused::HEIGHT)),
                buf,
            );
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw `symbol` in the grid cell at `pos`.  Cells outside the canvas
    /// (such as a head that has gone through a wall) are not drawn.
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let (Ok(col), Ok(row)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        let Some(x) = col
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|c| self.area.x.checked_add(c))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(row) else {
            return;
        };
        if x >= self.area.right() || y >= self.area.bottom() {
            return;
        }
        let _ = self
            .buf
            .set_stringn(x, y, symbol, usize::from(consts::CELL_WIDTH), Style::reset().patch(style));
    }
}

/// The pop-up shown over the grid while the game is paused
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Paused;

impl Paused {
    const HEIGHT: u16 = 6;
    const WIDTH: u16 = 19;
}

impl Widget for Paused {
    /*
     * ┌──── PAUSED ─────┐
     * │ Resume (p)      │
     * │ Restart (r)     │
     * │ Main Menu (m)   │
     * │ Quit (q)        │
     * └─────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        let options = [
            ("Resume", "p"),
            ("Restart", "r"),
            ("Main Menu", "m"),
            ("Quit", "q"),
        ];
        for ((label, key), row) in options.into_iter().zip(inner.rows()) {
            Line::from_iter([
                Span::raw(label),
                Span::raw(" ("),
                Span::styled(key, consts::KEY_STYLE),
                Span::raw(")"),
            ])
            .render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row_text(buf: &Buffer, y: u16) -> String {
        let area = buf.area;
        (area.left()..area.right())
            .filter_map(|x| buf.cell((x, y)).map(ratatui::buffer::Cell::symbol))
            .collect()
    }

    #[rstest]
    #[case(Level::One, "20×20, 100 to win")]
    #[case(Level::Four, "30×30, 300 to win, 2:00 limit, food lasts 8s")]
    #[case(Level::Five, "20×20, endless, faster every 100 pts")]
    fn test_describe(#[case] level: Level, #[case] s: &str) {
        assert_eq!(describe(level), s);
    }

    #[test]
    fn menu_marks_selection() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        MenuScreen {
            selection: Level::Three,
            high_score: 42,
        }
        .render(area, &mut buffer);
        let rows = (0..24).map(|y| row_text(&buffer, y)).collect::<Vec<_>>();
        assert!(rows.iter().any(|r| r.contains("High score: 42")));
        let selected = rows.iter().filter(|r| r.contains('»')).collect::<Vec<_>>();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].contains("Expert"));
    }

    #[test]
    fn pause_popup() {
        let area = Rect::new(0, 0, Paused::WIDTH, Paused::HEIGHT);
        let mut buffer = Buffer::empty(area);
        Paused.render(area, &mut buffer);
        assert_eq!(row_text(&buffer, 0), "┌──── PAUSED ─────┐");
        assert_eq!(row_text(&buffer, 1), "│ Resume (p)      │");
        assert_eq!(row_text(&buffer, 4), "│ Quit (q)        │");
        assert_eq!(row_text(&buffer, 5), "└─────────────────┘");
    }
}
