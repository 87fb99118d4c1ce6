//! Engine configuration persisted as TOML
//!
//! Stores settings in ~/.config/tetrs-engine/settings.toml (or platform equivalent).
//! Every field is optional in the file; missing ones fall back to the
//! classic rules.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Smallest board that can hold every piece in every orientation
const MIN_BOARD_SIDE: usize = 4;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Field dimensions
    pub board: BoardSettings,
    /// Line rewards and level progression
    pub scoring: ScoringSettings,
    /// Descent cadence
    pub timing: TimingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Points for clearing 0, 1, 2, 3 and 4 rows at once, before the level multiplier
    pub line_scores: Vec<u64>,
    /// Lines needed to advance one level
    pub lines_per_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Tick interval at level 1
    pub base_drop_ms: u64,
    /// How much faster each level gets
    pub level_step_ms: u64,
    /// Floor for the level-derived interval
    pub min_drop_ms: u64,
    /// Tick interval while soft drop is held
    pub soft_drop_ms: u64,
    /// Pause between a hard drop landing and the lock; 0 locks immediately
    pub hard_drop_lock_delay_ms: u64,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            line_scores: vec![0, 40, 100, 300, 1200],
            lines_per_level: 10,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            base_drop_ms: 800,
            level_step_ms: 80,
            min_drop_ms: 100,
            soft_drop_ms: 50,
            hard_drop_lock_delay_ms: 0,
        }
    }
}

impl GameConfig {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-engine")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the config dir, or fall back to defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`; a missing or broken file yields defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::settings_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject configurations no session can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.board.width < MIN_BOARD_SIDE || self.board.height < MIN_BOARD_SIDE {
            return invalid(format!(
                "board must be at least {MIN_BOARD_SIDE}x{MIN_BOARD_SIDE}, got {}x{}",
                self.board.width, self.board.height
            ));
        }
        if self.scoring.line_scores.len() != 5 {
            return invalid(format!(
                "line_scores needs 5 entries (0 to 4 lines), got {}",
                self.scoring.line_scores.len()
            ));
        }
        if self.scoring.line_scores[0] != 0 {
            return invalid("line_scores[0] must be 0".to_string());
        }
        if self.scoring.lines_per_level == 0 {
            return invalid("lines_per_level must be positive".to_string());
        }
        if self.timing.min_drop_ms == 0 || self.timing.soft_drop_ms == 0 {
            return invalid("drop intervals must be positive".to_string());
        }
        if self.timing.base_drop_ms < self.timing.min_drop_ms {
            return invalid(format!(
                "base_drop_ms ({}) is below min_drop_ms ({})",
                self.timing.base_drop_ms, self.timing.min_drop_ms
            ));
        }
        Ok(())
    }

    /// Level for a running line total; level 1 until the first threshold
    pub fn level_for(&self, lines: u32) -> u32 {
        lines / self.scoring.lines_per_level + 1
    }

    /// Points for clearing `lines` rows at once at `level`
    pub fn line_score(&self, lines: usize, level: u32) -> u64 {
        let base = self.scoring.line_scores.get(lines).copied().unwrap_or(0);
        base.saturating_mul(level as u64)
    }

    /// Automatic descent interval for `level`
    pub fn drop_interval(&self, level: u32) -> Duration {
        let TimingSettings {
            base_drop_ms,
            level_step_ms,
            min_drop_ms,
            ..
        } = self.timing;
        let speedup = level_step_ms.saturating_mul(level.saturating_sub(1) as u64);
        Duration::from_millis(base_drop_ms.saturating_sub(speedup).max(min_drop_ms))
    }

    /// Descent interval while soft drop is held
    pub fn soft_drop_interval(&self) -> Duration {
        Duration::from_millis(self.timing.soft_drop_ms)
    }

    /// Delay before a hard-dropped piece locks, if one is configured
    pub fn hard_drop_lock_delay(&self) -> Option<Duration> {
        (self.timing.hard_drop_lock_delay_ms > 0)
            .then(|| Duration::from_millis(self.timing.hard_drop_lock_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.width, 10);
        assert_eq!(config.board.height, 20);
        assert_eq!(config.scoring.line_scores, vec![0, 40, 100, 300, 1200]);
        assert_eq!(config.hard_drop_lock_delay(), None);
    }

    #[test]
    fn test_drop_interval_curve() {
        let config = GameConfig::default();
        assert_eq!(config.drop_interval(1), Duration::from_millis(800));
        assert_eq!(config.drop_interval(2), Duration::from_millis(720));
        assert_eq!(config.drop_interval(9), Duration::from_millis(160));
        assert_eq!(config.drop_interval(10), Duration::from_millis(100));
        assert_eq!(config.drop_interval(11), Duration::from_millis(100));
        assert_eq!(config.drop_interval(500), Duration::from_millis(100));
        assert_eq!(config.soft_drop_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_level_for_lines() {
        let config = GameConfig::default();
        for lines in 0..100 {
            assert_eq!(config.level_for(lines), lines / 10 + 1);
        }
    }

    #[test]
    fn test_line_score_table() {
        let config = GameConfig::default();
        let table = [0, 40, 100, 300, 1200];
        for level in 1..=5 {
            for (lines, base) in table.iter().enumerate() {
                assert_eq!(config.line_score(lines, level), base * level as u64);
            }
        }
    }

    #[test]
    fn test_partial_toml_overlays_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [board]
            width = 12

            [timing]
            soft_drop_ms = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.board.width, 12);
        assert_eq!(config.board.height, 20);
        assert_eq!(config.timing.soft_drop_ms, 30);
        assert_eq!(config.timing.base_drop_ms, 800);
    }

    #[test]
    fn test_rejects_malformed_settings() {
        for text in [
            "[board]\nwidth = 0",
            "[board]\nheight = 3",
            "[scoring]\nline_scores = [0, 40, 100]",
            "[scoring]\nline_scores = [5, 40, 100, 300, 1200]",
            "[scoring]\nlines_per_level = 0",
            "[timing]\nsoft_drop_ms = 0",
            "[timing]\nbase_drop_ms = 50",
        ] {
            assert!(
                matches!(GameConfig::from_toml_str(text), Err(ConfigError::Invalid(_))),
                "{text}"
            );
        }
        assert!(matches!(
            GameConfig::from_toml_str("[board]\nwidth = -3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("tetrs-engine-{:08x}", rand::random::<u32>()));
        let path = dir.join("settings.toml");
        let mut config = GameConfig::default();
        config.timing.hard_drop_lock_delay_ms = 50;

        config.save_to(&path).unwrap();
        let loaded = GameConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.hard_drop_lock_delay(), Some(Duration::from_millis(50)));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("tetrs-engine-{:08x}", rand::random::<u32>()));
        fs::create_dir_all(&dir).unwrap();

        let garbled = dir.join("garbled.toml");
        fs::write(&garbled, "[board\nwidth = ").unwrap();
        assert!(matches!(GameConfig::load_from(&garbled), Err(ConfigError::Parse(_))));
        assert_eq!(GameConfig::load_or_default(&garbled), GameConfig::default());

        let invalid = dir.join("invalid.toml");
        fs::write(&invalid, "[scoring]\nlines_per_level = 0").unwrap();
        assert_eq!(GameConfig::load_or_default(&invalid), GameConfig::default());

        let missing = dir.join("missing.toml");
        assert_eq!(GameConfig::load_or_default(&missing), GameConfig::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_settings_path_is_named_settings_toml() {
        if let Some(path) = GameConfig::settings_path() {
            assert_eq!(path.file_name().and_then(|name| name.to_str()), Some("settings.toml"));
            assert_eq!(path.parent().map(Path::to_path_buf), GameConfig::config_dir());
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tetrs-engine-does-not-exist/settings.toml");
        assert!(matches!(
            GameConfig::load_from(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
