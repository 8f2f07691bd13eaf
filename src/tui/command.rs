use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use levelsnake::game::{Direction, Level};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Move(Direction),
    Enter,
    Pause,
    Menu,
    Restart,
    Next,
    Pick(Level),
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k') | KeyCode::Up) => {
                Some(Command::Move(Direction::Up))
            }
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j') | KeyCode::Down) => {
                Some(Command::Move(Direction::Down))
            }
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h') | KeyCode::Left) => {
                Some(Command::Move(Direction::Left))
            }
            (KeyModifiers::NONE, KeyCode::Char('d' | 'l') | KeyCode::Right) => {
                Some(Command::Move(Direction::Right))
            }
            (_, KeyCode::Enter) => Some(Command::Enter),
            (KeyModifiers::NONE, KeyCode::Char('p' | ' ') | KeyCode::Esc) => Some(Command::Pause),
            (KeyModifiers::NONE, KeyCode::Char('m')) => Some(Command::Menu),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::Restart),
            (KeyModifiers::NONE, KeyCode::Char('n')) => Some(Command::Next),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => c
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .map(|n| Command::Pick(Level::from_number(n))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyCode::Up, Some(Command::Move(Direction::Up)))]
    #[case(KeyCode::Char('k'), Some(Command::Move(Direction::Up)))]
    #[case(KeyCode::Char('s'), Some(Command::Move(Direction::Down)))]
    #[case(KeyCode::Char('h'), Some(Command::Move(Direction::Left)))]
    #[case(KeyCode::Right, Some(Command::Move(Direction::Right)))]
    #[case(KeyCode::Char(' '), Some(Command::Pause))]
    #[case(KeyCode::Esc, Some(Command::Pause))]
    #[case(KeyCode::Char('p'), Some(Command::Pause))]
    #[case(KeyCode::Enter, Some(Command::Enter))]
    #[case(KeyCode::Char('n'), Some(Command::Next))]
    #[case(KeyCode::Char('1'), Some(Command::Pick(Level::One)))]
    #[case(KeyCode::Char('4'), Some(Command::Pick(Level::Four)))]
    #[case(KeyCode::Char('6'), None)]
    #[case(KeyCode::Char('q'), Some(Command::Quit))]
    #[case(KeyCode::Tab, None)]
    fn plain_keys(#[case] code: KeyCode, #[case] cmd: Option<Command>) {
        assert_eq!(Command::from_key_event(code.into()), cmd);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key_event(ev), Some(Command::Quit));
    }

    #[test]
    fn modified_letters_are_ignored() {
        let ev = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT);
        assert_eq!(Command::from_key_event(ev), None);
    }
}
