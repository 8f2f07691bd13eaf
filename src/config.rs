use crate::game::Level;
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Gameplay defaults
    #[serde(default)]
    pub game: GameConfig,

    /// Settings about data files
    #[serde(default)]
    pub files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    ///
    /// # Errors
    ///
    /// Returns `Err` if the local configuration directory could not be
    /// determined.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("levelsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Construct the store the high score should be kept in: a
    /// [`JsonFileStore`] at the configured (or default) path, or a
    /// [`MemoryStore`] if saving is disabled or no path could be determined.
    pub fn high_score_store(&self) -> Box<dyn KeyValueStore> {
        if !self.files.save_high_score {
            return Box::new(MemoryStore::new());
        }
        match self
            .files
            .high_score_file
            .clone()
            .or_else(JsonFileStore::default_path)
        {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => {
                log::warn!("Could not determine high score file path; high score will not be saved");
                Box::new(MemoryStore::new())
            }
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct GameConfig {
    /// Level number preselected in the menu.  Unknown numbers mean level 1.
    pub start_level: Level,
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub struct FileConfig {
    /// Path at which the high score should be stored
    pub high_score_file: Option<PathBuf>,

    /// Whether to load & save the high score in a file
    pub save_high_score: bool,

    /// File to write log messages to.  Nothing is logged if unset.
    pub log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_score_file: None,
            save_high_score: true,
            log_file: None,
        }
    }
}

/// `FileConfig` as written in the file, before `~` is expanded in paths
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    high_score_file: Option<String>,
    save_high_score: bool,
    log_file: Option<String>,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            high_score_file: None,
            save_high_score: true,
            log_file: None,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            high_score_file: value
                .high_score_file
                .map(expanduser::expanduser)
                .transpose()?,
            save_high_score: value.save_high_score,
            log_file: value.log_file.map(expanduser::expanduser).transpose()?,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config() {
        let config = toml::from_str::<Config>("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.game.start_level, Level::One);
        assert!(config.files.save_high_score);
    }

    #[test]
    fn full_config() {
        let config = toml::from_str::<Config>(concat!(
            "[game]\n",
            "start-level = 4\n",
            "\n",
            "[files]\n",
            "high-score-file = \"/tmp/hs.json\"\n",
            "save-high-score = false\n",
            "log-file = \"/tmp/levelsnake.log\"\n",
        ))
        .unwrap();
        assert_eq!(
            config,
            Config {
                game: GameConfig {
                    start_level: Level::Four,
                },
                files: FileConfig {
                    high_score_file: Some(PathBuf::from("/tmp/hs.json")),
                    save_high_score: false,
                    log_file: Some(PathBuf::from("/tmp/levelsnake.log")),
                },
            }
        );
    }

    #[test]
    fn tilde_paths_are_expanded() {
        let config = toml::from_str::<Config>(concat!(
            "[files]\n",
            "high-score-file = \"~/hs.json\"\n",
            "log-file = \"~/logs/levelsnake.log\"\n",
        ))
        .unwrap();
        let hs = config.files.high_score_file.unwrap();
        assert!(!hs.starts_with("~"));
        assert!(hs.is_absolute());
        assert!(hs.ends_with("hs.json"));
        let log = config.files.log_file.unwrap();
        assert!(!log.starts_with("~"));
        assert!(log.ends_with("logs/levelsnake.log"));
        assert!(config.files.save_high_score);
    }

    #[test]
    fn tilde_free_paths_are_kept() {
        let config =
            toml::from_str::<Config>("[files]\nhigh-score-file = \"data/hs.json\"\n").unwrap();
        assert_eq!(
            config.files.high_score_file,
            Some(PathBuf::from("data/hs.json"))
        );
    }

    #[test]
    fn unknown_level_falls_back() {
        let config = toml::from_str::<Config>("[game]\nstart-level = 9\n").unwrap();
        assert_eq!(config.game.start_level, Level::One);
    }

    #[test]
    fn missing_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn bad_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        fs_err::write(&path, "[game]\nstart-level = \"two\"\n").unwrap();
        assert!(matches!(
            Config::load(&path, true),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn disabled_saving_uses_memory() {
        let mut config = Config::default();
        config.files.save_high_score = false;
        config.files.high_score_file = Some(PathBuf::from("/nonexistent/dir/hs.json"));
        let mut store = config.high_score_store();
        store.set("snakeHighScore", "10").unwrap();
        assert_eq!(store.get("snakeHighScore").unwrap().as_deref(), Some("10"));
    }
}
