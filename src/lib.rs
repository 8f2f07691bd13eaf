//! Grid-based snake with five levels: the simulation engine and its session
//! state machine, plus the narrow interfaces it uses to reach the outside
//! world (a persistent store for the high score and a sink for sound
//! effects).
//!
//! Everything that changes during play lives in a single
//! [`Session`][game::Session].  Time only passes when the owner of the session
//! advances its clock, so the engine runs just as well under a terminal
//! front end as it does under a test that steps it by hand.
pub mod config;
pub mod consts;
pub mod game;
pub mod sound;
pub mod store;
use std::error::Error;

/// Render an error and all of its sources as a single line
pub(crate) fn error_chain(e: &(dyn Error + 'static)) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        s.push_str(": ");
        s.push_str(&inner.to_string());
        source = inner.source();
    }
    s
}
