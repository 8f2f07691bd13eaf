use super::command::Command;
use super::consts;
use super::widgets::{GameScreen, MenuScreen};
use crossterm::event::{poll, read, Event};
use levelsnake::game::{Direction, Level, Session, Status};
use ratatui::{backend::Backend, buffer::Buffer, layout::Rect, widgets::Widget, Frame, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// The terminal application: a game session plus the bits of state only the
/// front end cares about
#[derive(Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng> {
    session: Session<R>,

    /// Origin of the session's clock
    started: Instant,

    /// The level highlighted in the menu
    selection: Level,

    quitting: bool,
}

impl<R: rand::Rng> App<R> {
    pub(crate) fn new(session: Session<R>, selection: Level) -> App<R> {
        App {
            session,
            started: Instant::now(),
            selection,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            self.session.advance_to(self.started.elapsed());
            terminal.draw(|frame| self.draw(frame))?;
            if poll(self.poll_timeout())? {
                self.handle_event(read()?);
            }
        }
        Ok(())
    }

    /// How long to wait for input before the session next needs attention
    fn poll_timeout(&self) -> Duration {
        self.session
            .next_deadline()
            .map_or(consts::IDLE_POLL, |due| {
                due.saturating_sub(self.started.elapsed())
            })
            .min(consts::IDLE_POLL)
    }

    fn handle_event(&mut self, event: Event) {
        if event == Event::FocusLost {
            if self.session.is_active() {
                self.session.toggle_pause();
            }
            return;
        }
        let Some(cmd) = event.as_key_press_event().and_then(Command::from_key_event) else {
            return;
        };
        if cmd == Command::Quit {
            self.quitting = true;
            return;
        }
        match self.session.status() {
            Status::Menu => match cmd {
                Command::Move(Direction::Up) => {
                    self.selection = self.selection.prev().unwrap_or(Level::MAXIMUM);
                }
                Command::Move(Direction::Down) => {
                    self.selection = self.selection.next().unwrap_or(Level::MINIMUM);
                }
                Command::Pick(level) => {
                    self.selection = level;
                    self.start(level);
                }
                Command::Enter => self.start(self.selection),
                _ => (),
            },
            Status::Playing => match cmd {
                Command::Move(d) => self.session.change_direction(d),
                Command::Pause => self.session.toggle_pause(),
                Command::Restart => self.start(self.session.level()),
                Command::Menu => self.to_menu(),
                _ => (),
            },
            Status::Paused => match cmd {
                Command::Pause | Command::Enter => self.session.toggle_pause(),
                Command::Restart => self.start(self.session.level()),
                Command::Menu => self.to_menu(),
                _ => (),
            },
            Status::LevelComplete => match cmd {
                Command::Next | Command::Enter => {
                    self.session.continue_to_next_level();
                    self.selection = self.session.level();
                }
                Command::Restart => self.start(self.session.level()),
                Command::Menu => self.to_menu(),
                _ => (),
            },
            Status::GameOver => match cmd {
                Command::Restart | Command::Enter => self.start(self.session.level()),
                Command::Menu => self.to_menu(),
                _ => (),
            },
        }
    }

    fn start(&mut self, level: Level) {
        self.session.start_game(level);
    }

    fn to_menu(&mut self) {
        self.selection = self.session.level();
        self.session.return_to_menu();
    }
}

impl<R> App<R> {
    fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}

impl<R> Widget for &App<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.session.is_in_menu() {
            MenuScreen {
                selection: self.selection,
                high_score: self.session.high_score(),
            }
            .render(area, buf);
        } else {
            GameScreen {
                session: &self.session,
            }
            .render(area, buf);
        }
    }
}
