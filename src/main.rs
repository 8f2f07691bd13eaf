mod tui;
use crate::tui::App;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use levelsnake::config::Config;
use levelsnake::game::{Level, Session};
use levelsnake::sound::LogSink;
use simplelog::{LevelFilter, WriteLogger};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

static USAGE: &str = "\
Usage: levelsnake [<options>]

Play snake across five levels in the terminal

Options:
  -c, --config <PATH>     Read configuration from the given file
  -l, --level <N>         Select level N (1-5) in the menu at startup
      --log-file <PATH>   Write log messages to the given file
  -h, --help              Display this help message and exit
  -V, --version           Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Arguments),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('l') | Arg::Long("level") => {
                    let n = parser.value()?.parse::<u8>()?;
                    if !(Level::MINIMUM.number()..=Level::MAXIMUM.number()).contains(&n) {
                        return Err(lexopt::Error::Custom(
                            format!("no such level: {n}").into(),
                        ));
                    }
                    args.level = Some(Level::from_number(n));
                }
                Arg::Long("log-file") => args.log_file = Some(PathBuf::from(parser.value()?)),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }

    fn run(self) -> ExitCode {
        match self {
            Command::Run(args) => match args.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("levelsnake: {e:#}");
                    ExitCode::from(2)
                }
            },
            Command::Help => {
                print!("{USAGE}");
                ExitCode::SUCCESS
            }
            Command::Version => {
                println!("levelsnake {}", env!("CARGO_PKG_VERSION"));
                ExitCode::SUCCESS
            }
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    level: Option<Level>,
    log_file: Option<PathBuf>,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        if let Some(path) = self.log_file.as_ref().or(config.files.log_file.as_ref()) {
            let file = fs_err::File::create(path).context("failed to open log file")?;
            WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), file)
                .context("failed to install logger")?;
        }
        let level = self.level.unwrap_or(config.game.start_level);
        let session = Session::new(config.high_score_store(), LogSink);
        log::info!("Starting up; high score is {}", session.high_score());
        let terminal = ratatui::init();
        let r = App::new(session, level).run(terminal);
        ratatui::restore();
        io_exit(r).context("terminal I/O failed")
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match self.config {
            Some(ref path) => Config::load(path, false)
                .with_context(|| format!("failed to load configuration from {}", path.display())),
            None => match Config::default_path() {
                Ok(path) => Config::load(&path, true).with_context(|| {
                    format!("failed to load configuration from {}", path.display())
                }),
                Err(_) => Ok(Config::default()),
            },
        }
    }
}

fn io_exit(r: io::Result<()>) -> io::Result<()> {
    match r {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        r => r,
    }
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(cmd) => cmd.run(),
        Err(e) => {
            eprintln!("levelsnake: {e}");
            eprint!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args))
    }

    #[test]
    fn no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Arguments::default()));
    }

    #[test]
    fn all_args() {
        assert_eq!(
            parse(&["--config", "cfg.toml", "-l", "4", "--log-file", "snake.log"]).unwrap(),
            Command::Run(Arguments {
                config: Some(PathBuf::from("cfg.toml")),
                level: Some(Level::Four),
                log_file: Some(PathBuf::from("snake.log")),
            })
        );
    }

    #[rstest]
    #[case(&["-h"], Command::Help)]
    #[case(&["--level", "2", "--help"], Command::Help)]
    #[case(&["-V"], Command::Version)]
    fn info_flags(#[case] args: &[&str], #[case] cmd: Command) {
        assert_eq!(parse(args).unwrap(), cmd);
    }

    #[rstest]
    #[case(&["--level", "0"])]
    #[case(&["--level", "6"])]
    #[case(&["--level", "two"])]
    #[case(&["--level"])]
    #[case(&["--speed", "fast"])]
    #[case(&["extra"])]
    fn bad_args(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn broken_pipe_is_success() {
        assert!(io_exit(Err(io::Error::from(ErrorKind::BrokenPipe))).is_ok());
        assert!(io_exit(Err(io::Error::from(ErrorKind::Other))).is_err());
    }
}
