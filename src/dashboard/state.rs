//! Dashboard view state management

use std::collections::HashMap;
use std::time::Instant;

use crate::capture::SourceId;
use crate::config::AppConfig;
use crate::integrations::{AccessToken, IngestInfo};
use crate::overlay::widgets::OverlayStyles;

/// Tab shown in the side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Sources,
    Chat,
    Branding,
    YouTube,
    Assistant,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::Sources,
        DashboardTab::Chat,
        DashboardTab::Branding,
        DashboardTab::YouTube,
        DashboardTab::Assistant,
    ];

    /// Get the display name for this tab
    pub fn name(&self) -> &'static str {
        match self {
            DashboardTab::Sources => "Sources",
            DashboardTab::Chat => "Chat",
            DashboardTab::Branding => "Branding",
            DashboardTab::YouTube => "YouTube",
            DashboardTab::Assistant => "AI",
        }
    }
}

/// State for the composited preview
pub struct PreviewViewState {
    /// One texture per staged source, keyed by id
    pub source_textures: HashMap<SourceId, egui::TextureHandle>,
    /// Logo texture and the display URL it was built from
    pub logo_texture: Option<(String, egui::TextureHandle)>,
    /// Animation clock origin for the ticker
    pub started: Instant,
    pub styles: OverlayStyles,
}

impl Default for PreviewViewState {
    fn default() -> Self {
        Self {
            source_textures: HashMap::new(),
            logo_texture: None,
            started: Instant::now(),
            styles: OverlayStyles::default(),
        }
    }
}

/// State for the branding tab
#[derive(Debug, Clone, Default)]
pub struct BrandingViewState {
    /// Path typed into the logo field
    pub logo_path: String,
    /// Last logo load failure
    pub logo_error: Option<String>,
    /// Result of the last "save as default"
    pub save_status: Option<String>,
}

/// State for the YouTube tab
#[derive(Debug, Clone, Default)]
pub struct YouTubeViewState {
    pub client_id: String,
    /// Consent page URL, once generated
    pub auth_url: Option<String>,
    /// `state` value sent with the consent URL
    pub auth_state: Option<String>,
    /// Code or redirected URL pasted back by the operator
    pub auth_code: String,
    pub access_token: Option<AccessToken>,
    pub ingest: Option<IngestInfo>,
    pub show_stream_key: bool,
}

impl YouTubeViewState {
    pub fn is_signed_in(&self) -> bool {
        self.access_token.as_ref().is_some_and(|t| !t.is_expired())
    }

    pub fn sign_out(&mut self) {
        self.access_token = None;
        self.auth_url = None;
        self.auth_state = None;
        self.auth_code.clear();
    }
}

/// State for the AI tab
#[derive(Debug, Clone, Default)]
pub struct AssistantViewState {
    pub topic: String,
    pub question: String,
    /// Last generated text
    pub response: Option<String>,
}

/// Complete dashboard state
#[derive(Default)]
pub struct DashboardState {
    pub current_tab: DashboardTab,
    pub preview: PreviewViewState,
    pub branding: BrandingViewState,
    pub youtube: YouTubeViewState,
    pub assistant: AssistantViewState,
}

impl DashboardState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            youtube: YouTubeViewState {
                client_id: config.youtube.client_id.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_id_prefilled_from_config() {
        let mut config = AppConfig::default();
        config.youtube.client_id = "abc.apps.googleusercontent.com".to_string();
        let state = DashboardState::new(&config);
        assert_eq!(state.youtube.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(state.current_tab, DashboardTab::Sources);
    }

    #[test]
    fn test_sign_out_drops_token() {
        let mut youtube = YouTubeViewState {
            access_token: Some(AccessToken {
                token: "t".to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(60)),
            }),
            auth_code: "4/abc".to_string(),
            auth_state: Some("s".to_string()),
            ..Default::default()
        };
        assert!(youtube.is_signed_in());
        youtube.sign_out();
        assert!(!youtube.is_signed_in());
        assert!(youtube.auth_code.is_empty());
        assert!(youtube.auth_state.is_none());
    }

    #[test]
    fn test_tab_names() {
        let names: Vec<&str> = DashboardTab::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["Sources", "Chat", "Branding", "YouTube", "AI"]);
    }
}
