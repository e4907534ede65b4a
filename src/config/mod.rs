//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::capture::SourceKind;
use crate::chat::mock::DEFAULT_INTERVAL;
use crate::integrations::youtube::Privacy;
use crate::layout::LayoutMode;
use crate::overlay::{OverlayTemplate, ThemeColor};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Capture settings
    pub capture: CaptureSettings,
    /// Mock chat settings
    pub chat: ChatSettings,
    /// Initial branding and layout
    pub branding: BrandingSettings,
    /// AI assistant settings
    pub ai: AiSettings,
    /// YouTube Live settings
    pub youtube: YouTubeSettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Acquire the camera as soon as the studio opens
    pub start_camera_on_launch: bool,
    /// Start with the microphone muted
    pub start_muted: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_camera_on_launch: true,
            start_muted: false,
        }
    }
}

/// Capture-related settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Source kinds the capture backend refuses, as if permission was denied
    pub denied_kinds: Vec<SourceKind>,
    /// Source kinds the capture backend reports as missing hardware
    pub unavailable_kinds: Vec<SourceKind>,
}

/// Mock chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Generate synthetic viewer messages
    pub mock_enabled: bool,
    /// Seconds between generated messages
    pub interval_secs: f32,
    /// Number of messages retained
    pub max_messages: usize,
}

impl ChatSettings {
    /// Interval between generated messages. Zero, negative, non-finite or
    /// unrepresentable values fall back to the default interval.
    pub fn interval(&self) -> Duration {
        match Duration::try_from_secs_f32(self.interval_secs) {
            Ok(interval) if !interval.is_zero() => interval,
            _ => {
                warn!(
                    "chat.interval_secs = {} is not usable; using {}s",
                    self.interval_secs,
                    DEFAULT_INTERVAL.as_secs()
                );
                DEFAULT_INTERVAL
            }
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            mock_enabled: true,
            interval_secs: DEFAULT_INTERVAL.as_secs_f32(),
            max_messages: crate::chat::DEFAULT_MAX_MESSAGES,
        }
    }
}

/// Initial branding and layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingSettings {
    /// Theme color as #rrggbb
    pub theme_color: ThemeColor,
    /// Banner text shown at start-up
    pub banner_text: String,
    /// Overlay template
    pub template: OverlayTemplate,
    /// Layout mode
    pub layout: LayoutMode,
}

/// AI assistant settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// API base URL
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl AiSettings {
    /// Resolve the API key from config, then environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// YouTube Live settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeSettings {
    /// OAuth 2.0 client id, pre-filled in the YouTube panel
    pub client_id: String,
    /// OAuth client secret for installed-app clients
    pub client_secret: Option<String>,
    /// Loopback port used as the OAuth redirect target
    pub redirect_port: u16,
    /// Privacy preselected for new broadcasts
    pub default_privacy: Privacy,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            redirect_port: 8765,
            default_privacy: Privacy::Public,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
