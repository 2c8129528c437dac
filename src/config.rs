//! Application configuration
//!
//! Settings come from a TOML file (explicit path, `$RECEPTIONIST_CONFIG`, or the
//! user config directory), then environment overrides, then defaults.

use crate::{ReceptionistError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hosted voice agent session-start endpoint
pub const DEFAULT_SESSION_URL: &str = "https://voice-sip.studio.lyzr.ai/session/start";

/// Agent that answers as the cafe receptionist
pub const DEFAULT_AGENT_ID: &str = "698ddc6d48eff0badfdf1a8f";

/// Rate of every transmitted frame
pub const CAPTURE_SAMPLE_RATE: u32 = 16000;

/// Samples per transmitted frame
pub const FRAME_SIZE: usize = 4096;

/// Playback rate assumed when the session response omits one
pub const DEFAULT_PLAYBACK_SAMPLE_RATE: u32 = 24000;

pub const CONFIG_ENV: &str = "RECEPTIONIST_CONFIG";
pub const SESSION_URL_ENV: &str = "RECEPTIONIST_SESSION_URL";
pub const AGENT_ID_ENV: &str = "RECEPTIONIST_AGENT_ID";

/// Voice call settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Session negotiation endpoint
    pub session_url: String,

    /// Remote agent identifier sent on session start
    pub agent_id: String,

    /// Sample rate of outbound audio frames
    pub capture_sample_rate: u32,

    /// Samples per outbound frame
    pub frame_size: usize,

    /// Fallback playback rate
    pub default_playback_sample_rate: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            session_url: DEFAULT_SESSION_URL.to_string(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            capture_sample_rate: CAPTURE_SAMPLE_RATE,
            frame_size: FRAME_SIZE,
            default_playback_sample_rate: DEFAULT_PLAYBACK_SAMPLE_RATE,
        }
    }
}

/// Dashboard settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Populate the record browser with sample data on launch
    pub use_sample_data: bool,
}

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub voice: VoiceConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file exists
    pub fn load(path: Option<&str>) -> Result<Self> {
        let explicit = path
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReceptionistError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ReceptionistError::Config(msg) => {
                ReceptionistError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ReceptionistError::Config(e.to_string()))
    }

    /// `<config_dir>/receptionist/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("receptionist").join("config.toml"))
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SESSION_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.voice.session_url = url.trim().to_string();
        }
        if let Some(agent) = lookup(AGENT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.voice.agent_id = agent.trim().to_string();
        }
    }

    /// Set the session endpoint
    pub fn with_session_url(mut self, url: impl Into<String>) -> Self {
        self.voice.session_url = url.into();
        self
    }

    /// Set the agent identifier
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.voice.agent_id = agent_id.into();
        self
    }

    /// Start the dashboard with sample records
    pub fn with_sample_data(mut self) -> Self {
        self.dashboard.use_sample_data = true;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.voice.session_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ReceptionistError::Config(format!(
                "Session URL must be http(s): {:?}",
                self.voice.session_url
            )));
        }
        if self.voice.agent_id.trim().is_empty() {
            return Err(ReceptionistError::Config("Agent id is required".into()));
        }
        if self.voice.capture_sample_rate == 0 || self.voice.default_playback_sample_rate == 0 {
            return Err(ReceptionistError::Config(
                "Sample rates must be greater than 0".into(),
            ));
        }
        if self.voice.frame_size == 0 {
            return Err(ReceptionistError::Config(
                "Frame size must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.voice.capture_sample_rate, 16000);
        assert_eq!(config.voice.frame_size, 4096);
        assert_eq!(config.voice.default_playback_sample_rate, 24000);
        assert!(!config.dashboard.use_sample_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [voice]
            agent_id = "front-desk"

            [dashboard]
            use_sample_data = true
            "#,
        )
        .unwrap();

        assert_eq!(config.voice.agent_id, "front-desk");
        assert_eq!(config.voice.session_url, DEFAULT_SESSION_URL);
        assert!(config.dashboard.use_sample_data);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[voice\nagent_id = 1").unwrap_err();
        assert!(matches!(err, ReceptionistError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            SESSION_URL_ENV => Some("http://127.0.0.1:9000/session/start".to_string()),
            AGENT_ID_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.voice.session_url, "http://127.0.0.1:9000/session/start");
        assert_eq!(config.voice.agent_id, DEFAULT_AGENT_ID);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(AppConfig::default().with_session_url("ftp://x").validate().is_err());
        assert!(AppConfig::default().with_agent_id("").validate().is_err());

        let mut config = AppConfig::default();
        config.voice.frame_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::default()
            .with_agent_id("agent-7")
            .with_sample_data();
        assert_eq!(config.voice.agent_id, "agent-7");
        assert!(config.dashboard.use_sample_data);
    }
}
