//! Sound effects emitted by a session
//!
//! The engine only announces that something happened; turning that into
//! audio (or not) is up to the [`SoundSink`] it was given.  Sinks are
//! fire-and-forget: they return nothing, and whatever goes wrong inside one
//! is theirs to deal with.
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SoundEvent {
    /// The snake ate a food item
    Eat,
    GameOver,
    /// A finite level was completed
    LevelUp,
    /// The infinite level was "completed" by filling the grid
    EpicVictory,
}

impl SoundEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundEvent::Eat => "eat",
            SoundEvent::GameOver => "gameOver",
            SoundEvent::LevelUp => "levelUp",
            SoundEvent::EpicVictory => "epicVictory",
        }
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub trait SoundSink: fmt::Debug {
    fn play(&mut self, event: SoundEvent);
}

/// A sink that reports every event to the log at `debug` level
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, event: SoundEvent) {
        log::debug!("sound: {event}");
    }
}

/// A sink that remembers every event it receives, in order
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Recorder(Vec<SoundEvent>);

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }

    pub fn events(&self) -> &[SoundEvent] {
        &self.0
    }
}

impl SoundSink for Recorder {
    fn play(&mut self, event: SoundEvent) {
        self.0.push(event);
    }
}
