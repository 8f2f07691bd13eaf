//! Terminal front end: draws a [`Session`][levelsnake::game::Session] with
//! ratatui and feeds it keyboard input
mod app;
mod command;
mod consts;
mod util;
mod widgets;
pub(crate) use self::app::App;
