//! Styles, glyphs & timing for the terminal front end
use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Longest time to wait for input before redrawing when no timer is pending
pub(crate) const IDLE_POLL: Duration = Duration::from_millis(250);

/// Width in terminal columns of one grid cell.  Two columns make the cells
/// roughly square and leave room for emoji food.
pub(crate) const CELL_WIDTH: u16 = 2;

/// Minimum width of the area the game screen is drawn in, so that the status
/// bar and key hints fit even on small grids
pub(crate) const MIN_DISPLAY_WIDTH: u16 = 64;

/// Glyph for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "██";

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "▓▓";

/// Glyph for the snake's head when it has run into itself
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Timed food starts blinking once it has this long left to live
pub(crate) const FOOD_WARNING: Duration = Duration::from_secs(2);

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for food that is about to expire
pub(crate) const FOOD_EXPIRING_STYLE: Style = Style::new().add_modifier(Modifier::SLOW_BLINK);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the status bar at the top of the game screen
pub(crate) const STATUS_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the level progress gauge
pub(crate) const GAUGE_STYLE: Style = Style::new().fg(Color::Green);

/// Style for game over & level complete announcements
pub(crate) const BANNER_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for the title on the menu screen
pub(crate) const TITLE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
