//! Battle configuration.
//!
//! Frame timing, log filter, stage layout and the roster of archetypes and
//! bosses. Loaded from and saved to TOML.

use duel_common::Side;
use duel_gameplay::{BattleSetup, BattleVariant, Roster, SkillEffect, StageLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::sprite::TraceSprite;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "duel.toml";

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "duel=info";

/// Errors raised while loading, saving or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("config io error: {0}")]
    Io(#[from] io::Error),

    /// File contents are not valid configuration
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Named archetype is missing from the roster
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    /// Named boss is missing from the roster
    #[error("unknown boss: {0}")]
    UnknownBoss(String),
}

/// Battle configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === Timing ===
    /// Simulated frames per second
    pub target_fps: u32,
    /// Largest frame delta passed to a battle, in seconds
    pub max_dt: f32,
    /// Frames after which the demo gives up on a battle
    pub max_frames: u32,

    // === Logging ===
    /// `tracing` filter directive
    pub log_filter: String,

    // === Matchup ===
    /// Player archetype name
    pub player: String,
    /// Opponent archetype name
    pub opponent: String,
    /// Boss name; when set the opponent is replaced by this boss
    pub boss: Option<String>,

    // === Content ===
    /// Stage geometry and pacing
    pub layout: StageLayout,
    /// Archetype stats and boss profiles
    pub roster: Roster,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_dt: 0.25,
            max_frames: 36_000,

            log_filter: DEFAULT_LOG_FILTER.to_string(),

            player: "knight".to_string(),
            opponent: "goblin".to_string(),
            boss: None,

            layout: StageLayout::default(),
            roster: Roster::default(),
        }
    }
}

impl BattleConfig {
    /// Load configuration from `path`.
    /// Returns defaults if the file is missing or invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration from `path`, reporting why it could not be read.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.validate();
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 240);
        self.max_dt = if self.max_dt.is_finite() {
            self.max_dt.clamp(0.001, 1.0)
        } else {
            0.25
        };
        self.max_frames = self.max_frames.max(1);

        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }

        self.layout.validate();
    }

    /// Seconds per simulated frame.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Battle variant for the configured matchup.
    pub fn variant(&self) -> Result<BattleVariant, ConfigError> {
        match &self.boss {
            None => Ok(BattleVariant::Skirmish),
            Some(name) => self
                .roster
                .boss_variant(name)
                .ok_or_else(|| ConfigError::UnknownBoss(name.clone())),
        }
    }

    /// Build the configured battle from the roster, with tracing sprites.
    pub fn battle_setup(&self) -> Result<BattleSetup, ConfigError> {
        let player = self
            .roster
            .combatant(Side::Player, &self.player)
            .ok_or_else(|| ConfigError::UnknownArchetype(self.player.clone()))?
            .with_sprite(TraceSprite::boxed(Side::Player.to_string()));
        let opponent = self
            .roster
            .combatant(Side::Opponent, &self.opponent)
            .ok_or_else(|| ConfigError::UnknownArchetype(self.opponent.clone()))?
            .with_sprite(TraceSprite::boxed(Side::Opponent.to_string()));
        let effect = SkillEffect::new(self.layout.effect_parking).with_sprite(TraceSprite::boxed("effect"));

        Ok(BattleSetup::new(player, opponent, effect, self.variant()?).with_layout(self.layout.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BattleConfig::default();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.boss.is_none());
        assert!((config.frame_dt() - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_validation() {
        let mut config = BattleConfig {
            target_fps: 0,
            max_dt: f32::NAN,
            log_filter: "  ".to_string(),
            ..BattleConfig::default()
        };
        config.layout.strike_step = -1.0;

        config.validate();

        assert_eq!(config.target_fps, 1);
        assert!((config.max_dt - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.layout.strike_step > 0.0);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("duel.toml");

        let mut config = BattleConfig {
            target_fps: 30,
            boss: Some("storm_witch".to_string()),
            player: "ranger".to_string(),
            ..BattleConfig::default()
        };
        config.layout.turn_interval = 1.5;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = BattleConfig::load_from(&config_path);
        assert_eq!(loaded.target_fps, 30);
        assert_eq!(loaded.boss.as_deref(), Some("storm_witch"));
        assert_eq!(loaded.player, "ranger");
        assert!((loaded.layout.turn_interval - 1.5).abs() < f32::EPSILON);
        assert_eq!(loaded.roster, config.roster);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = BattleConfig::load_from("/nonexistent/path/duel.toml");
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "target_fps = \"fast\"").expect("write");

        assert!(matches!(
            BattleConfig::try_load_from(&config_path),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(BattleConfig::load_from(&config_path).target_fps, 60);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "target_fps = 120\n\n[layout]\nturn_interval = 3.0\n").expect("write");

        let config = BattleConfig::load_from(&config_path);
        assert_eq!(config.target_fps, 120);
        assert!((config.layout.turn_interval - 3.0).abs() < f32::EPSILON);
        assert!((config.layout.feedback_short - 0.5).abs() < f32::EPSILON);
        assert!(config.roster.archetype("knight").is_some());
    }

    #[test]
    fn test_battle_setup_from_roster() {
        let config = BattleConfig {
            boss: Some("ogre_king".to_string()),
            ..BattleConfig::default()
        };
        let setup = config.battle_setup().expect("default matchup exists");
        assert_eq!(setup.player.archetype(), "knight");
        assert!(setup.variant.boss().is_some());
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let config = BattleConfig {
            opponent: "dragon".to_string(),
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.battle_setup(),
            Err(ConfigError::UnknownArchetype(name)) if name == "dragon"
        ));

        let config = BattleConfig {
            boss: Some("lich".to_string()),
            ..BattleConfig::default()
        };
        assert!(matches!(config.variant(), Err(ConfigError::UnknownBoss(_))));
    }

    #[test]
    fn test_config_toml_serialization() {
        let config = BattleConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("target_fps"));
        assert!(toml_str.contains("turn_interval"));
        assert!(toml_str.contains("ogre_king"));
    }
}
