use futevolei_shared::config::GameConfig;
use std::path::Path;

/// Which team serves after a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServeRule {
    /// The team that won the last point serves next
    #[default]
    WinnerServes,
    /// The team that lost the last point serves next
    LoserServes,
}

/// Simulation runtime configuration (not gameplay tuning).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    pub tick_rate_hz: u32,
    /// Upper bound on ticks run for one rendered frame
    pub max_steps_per_frame: u32,
    pub rng_seed: u64,
    pub serve_rule: ServeRule,
    /// Headless runs stop after this much simulated time
    pub max_match_seconds: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_steps_per_frame: 5,
            rng_seed: 42,
            serve_rule: ServeRule::WinnerServes,
            max_match_seconds: 900.0,
        }
    }
}

impl SimConfig {
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 || self.tick_rate_hz > 1000 {
            return Err("tick_rate_hz must be between 1 and 1000".to_string());
        }
        if self.max_steps_per_frame == 0 {
            return Err("max_steps_per_frame must be > 0".to_string());
        }
        if !self.max_match_seconds.is_finite() || self.max_match_seconds <= 0.0 {
            return Err("max_match_seconds must be finite and > 0".to_string());
        }
        Ok(())
    }
}

/// Everything a headless run needs, as stored in a JSON config file.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub game: GameConfig,
    pub sim: SimConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate().map_err(ConfigError::Invalid)?;
        self.sim.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Load and validate a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: FileConfig = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sim_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_rate_invalid() {
        let config = SimConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn tick_dt_matches_rate() {
        let config = SimConfig::default();
        assert!((config.tick_dt() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn file_config_reads_nested_sections() {
        let config: FileConfig = serde_json::from_str(
            r#"{"game": {"pointsToWin": 7}, "sim": {"rngSeed": 9, "serveRule": "loser_serves"}}"#,
        )
        .unwrap();
        assert_eq!(config.game.points_to_win, 7);
        assert_eq!(config.sim.rng_seed, 9);
        assert_eq!(config.sim.serve_rule, ServeRule::LoserServes);
        assert_eq!(config.sim.tick_rate_hz, 60);
    }

    #[test]
    fn invalid_game_section_is_rejected() {
        let mut config = FileConfig::default();
        config.game.max_touches = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
