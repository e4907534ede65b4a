//! Studio Coordinator
//!
//! The single application-state value. Owns capture sources, the stage,
//! branding, chat and broadcast draft, and exposes every mutation as a
//! named operation. The dashboard drives it; nothing else holds a
//! reference to its parts.

use std::time::Duration;
use tracing::{info, warn};

use crate::capture::{CaptureBackend, CaptureError, CaptureRequest, SourceId, SourceKind, SourceRegistry};
use crate::chat::{ChatFeed, ChatMessage, MessageId, MockChatSource, Ticker};
use crate::config::AppConfig;
use crate::integrations::{AssistantAction, BroadcastSettings};
use crate::layout::{self, LayoutMode};
use crate::overlay::{
    compose, BrandingError, BrandingState, Composition, Logo, OverlayInputs, OverlayTemplate,
    ThemeColor, UrlStore,
};
use crate::stage::StageSelection;

/// Main application state
pub struct StreamStudio {
    backend: Box<dyn CaptureBackend>,
    registry: SourceRegistry,
    stage: StageSelection,
    layout: LayoutMode,
    template: OverlayTemplate,
    branding: BrandingState,
    urls: UrlStore,
    chat: ChatFeed,
    mock_chat: Option<MockChatSource>,
    chat_ticker: Ticker,
    live: bool,
    mic_muted: bool,
    broadcast: BroadcastSettings,
    /// Blocking message for the operator
    notice: Option<String>,
    shut_down: bool,
}

impl StreamStudio {
    /// Build the studio from configuration. Does not touch any device.
    pub fn new(config: &AppConfig, backend: Box<dyn CaptureBackend>) -> Self {
        let max_fires = u32::try_from(config.chat.max_messages.max(1)).unwrap_or(u32::MAX);

        Self {
            backend,
            registry: SourceRegistry::new(),
            stage: StageSelection::new(),
            layout: config.branding.layout,
            template: config.branding.template,
            branding: BrandingState {
                banner_text: config.branding.banner_text.clone(),
                logo: None,
                theme_color: config.branding.theme_color,
            },
            urls: UrlStore::new(),
            chat: ChatFeed::new(config.chat.max_messages),
            mock_chat: config.chat.mock_enabled.then(MockChatSource::from_entropy),
            chat_ticker: Ticker::new(config.chat.interval()).with_max_fires(max_fires),
            live: false,
            mic_muted: config.general.start_muted,
            broadcast: BroadcastSettings {
                privacy: config.youtube.default_privacy,
                ..Default::default()
            },
            notice: None,
            shut_down: false,
        }
    }

    // ---- capture ----

    /// Acquire the camera with the current mute flag applied.
    ///
    /// Returns false and raises a notice when acquisition fails.
    pub fn start_camera(&mut self) -> bool {
        let request = CaptureRequest::for_kind(SourceKind::Camera, self.mic_muted);
        match self.registry.acquire(self.backend.as_ref(), SourceKind::Camera, request) {
            Ok(source) => {
                let id = source.id.clone();
                if self.stage.is_empty() {
                    self.stage.toggle(id);
                }
                true
            }
            Err(e) => {
                self.notice = Some(capture_notice(&e));
                false
            }
        }
    }

    /// Release the camera and take it off stage
    pub fn stop_camera(&mut self) {
        let id = SourceKind::Camera.id();
        self.registry.release(&id);
        self.stage.remove(&id);
    }

    pub fn toggle_camera(&mut self) {
        if self.is_camera_on() {
            self.stop_camera();
        } else {
            self.start_camera();
        }
    }

    /// Flip the mute flag and apply it to the camera's audio tracks
    pub fn toggle_mic(&mut self) {
        self.mic_muted = !self.mic_muted;
        if let Some(camera) = self.registry.get_kind(SourceKind::Camera) {
            for track in camera.stream.audio_tracks() {
                track.set_enabled(!self.mic_muted);
            }
        }
        info!("Microphone {}", if self.mic_muted { "muted" } else { "unmuted" });
    }

    /// Stop sharing, or acquire the screen. A new screen source is not
    /// staged automatically.
    pub fn toggle_screen_share(&mut self) {
        let id = SourceKind::Screen.id();
        if self.registry.contains(&id) {
            self.registry.release(&id);
            self.stage.remove(&id);
            return;
        }

        let request = CaptureRequest::for_kind(SourceKind::Screen, self.mic_muted);
        if let Err(e) = self.registry.acquire(self.backend.as_ref(), SourceKind::Screen, request) {
            warn!("Screen share failed: {}", e);
            self.notice = Some(capture_notice(&e));
        }
    }

    pub fn toggle_on_stage(&mut self, id: SourceId) {
        self.stage.toggle(id);
    }

    // ---- layout & branding ----

    pub fn set_layout(&mut self, mode: LayoutMode) {
        self.layout = mode;
    }

    pub fn set_overlay_template(&mut self, template: OverlayTemplate) {
        self.template = template;
    }

    pub fn set_banner_text(&mut self, text: impl Into<String>) {
        self.branding.banner_text = text.into();
    }

    pub fn set_theme_color(&mut self, color: ThemeColor) {
        self.branding.theme_color = color;
    }

    /// Decode and install a new logo. The previous logo's URL is revoked;
    /// on a decode failure the previous logo stays.
    pub fn set_logo(&mut self, bytes: Vec<u8>) -> Result<(), BrandingError> {
        let logo = Logo::decode(bytes, &self.urls)?;
        info!("Logo set ({}x{}) at {}", logo.width, logo.height, logo.url());
        self.branding.logo = Some(logo);
        Ok(())
    }

    pub fn clear_logo(&mut self) {
        if self.branding.logo.take().is_some() {
            info!("Logo cleared");
        }
    }

    // ---- chat ----

    pub fn toggle_highlight(&mut self, id: MessageId) {
        self.chat.toggle_highlight(id);
    }

    pub fn clear_highlight(&mut self) {
        self.chat.clear_highlight();
    }

    /// Step the chat ticker; one mock message per elapsed period
    pub fn advance_chat(&mut self, elapsed: Duration) -> u32 {
        let Some(source) = self.mock_chat.as_mut() else {
            return 0;
        };
        let fired = self.chat_ticker.advance(elapsed);
        for _ in 0..fired {
            self.chat.push(source.next_message());
        }
        fired
    }

    // ---- live ----

    pub fn toggle_live(&mut self) {
        self.live = !self.live;
        info!("Studio is {}", if self.live { "LIVE" } else { "off air" });
    }

    // ---- broadcast draft ----

    pub fn broadcast(&self) -> &BroadcastSettings {
        &self.broadcast
    }

    pub fn broadcast_mut(&mut self) -> &mut BroadcastSettings {
        &mut self.broadcast
    }

    /// Put assistant output into the matching draft field
    pub fn apply_generated(&mut self, action: AssistantAction, text: String) {
        match action {
            AssistantAction::Title => self.broadcast.title = text,
            AssistantAction::Description => self.broadcast.description = text,
        }
    }

    // ---- composition ----

    /// Evaluate the layout and overlay for the current state
    pub fn composition(&self) -> Composition {
        let sources = layout::resolve_stage(&self.stage, &self.registry);
        let assignment = layout::render(&sources, self.layout);
        compose(
            assignment,
            OverlayInputs {
                live: self.live,
                template: self.template,
                branding: &self.branding,
                highlighted: self.chat.highlighted(),
            },
        )
    }

    // ---- notices ----

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ---- read access ----

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn stage(&self) -> &StageSelection {
        &self.stage
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn template(&self) -> OverlayTemplate {
        self.template
    }

    pub fn branding(&self) -> &BrandingState {
        &self.branding
    }

    pub fn chat(&self) -> &ChatFeed {
        &self.chat
    }

    pub fn highlighted_message(&self) -> Option<&ChatMessage> {
        self.chat.highlighted()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_mic_muted(&self) -> bool {
        self.mic_muted
    }

    pub fn is_camera_on(&self) -> bool {
        self.registry.contains(&SourceKind::Camera.id())
    }

    pub fn is_screen_sharing(&self) -> bool {
        self.registry.contains(&SourceKind::Screen.id())
    }

    // ---- lifecycle ----

    /// Release every source and revoke every display URL. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.registry.release_all();
        for id in self.stage.ids().to_vec() {
            self.stage.remove(&id);
        }
        self.branding.logo = None;
        self.live = false;
        self.shut_down = true;
        info!("Studio shut down ({} display URLs outstanding)", self.urls.live_count());
    }
}

/// Operator-facing text for a failed acquisition
fn capture_notice(error: &CaptureError) -> String {
    let device = match error.kind() {
        SourceKind::Camera => "the camera and microphone",
        SourceKind::Screen => "the screen",
    };
    let hint = match error {
        CaptureError::PermissionDenied { .. } => "Check the device permissions.",
        CaptureError::DeviceUnavailable { .. } => "Check that the device is connected.",
    };
    format!("Could not access {}: {}. {}", device, error, hint)
}

impl Drop for StreamStudio {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::tests::FakeBackend;
    use crate::capture::stream::{MediaTrack, TrackKind};
    use crate::layout::RegionContent;
    use crate::overlay::branding::tests::png_bytes;
    use crate::overlay::{BannerStyle, OverlayLayer};

    fn studio_with(backend: FakeBackend) -> StreamStudio {
        studio_with_backend(Box::new(backend))
    }

    fn studio_with_backend(backend: Box<dyn CaptureBackend>) -> StreamStudio {
        let mut config = AppConfig::default();
        config.chat.mock_enabled = false;
        StreamStudio::new(&config, backend)
    }

    fn studio() -> StreamStudio {
        studio_with(FakeBackend::default())
    }

    fn camera_tracks(studio: &StreamStudio) -> Vec<MediaTrack> {
        studio
            .registry()
            .get_kind(SourceKind::Camera)
            .map(|s| s.stream.tracks().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_start_camera_stages_when_empty() {
        let mut studio = studio();
        assert!(studio.start_camera());
        assert!(studio.is_camera_on());
        assert_eq!(studio.stage().ids(), [SourceId::from("camera")]);
        assert!(studio.notice().is_none());
    }

    #[test]
    fn test_start_camera_does_not_restage_over_existing_selection() {
        let mut studio = studio();
        studio.toggle_screen_share();
        studio.toggle_on_stage(SourceId::from("screen"));
        studio.start_camera();
        assert_eq!(studio.stage().ids(), [SourceId::from("screen")]);
    }

    #[test]
    fn test_camera_denied_raises_notice() {
        let mut studio = studio_with(FakeBackend {
            denied: vec![SourceKind::Camera],
            ..Default::default()
        });
        assert!(!studio.start_camera());
        assert!(!studio.is_camera_on());
        assert!(studio.stage().is_empty());
        assert!(studio.notice().unwrap().contains("camera"));

        studio.dismiss_notice();
        assert!(studio.notice().is_none());
    }

    #[test]
    fn test_muted_camera_acquired_with_audio_disabled() {
        let mut studio = studio();
        studio.toggle_mic();
        assert!(studio.is_mic_muted());
        studio.start_camera();

        let tracks = camera_tracks(&studio);
        let audio: Vec<_> = tracks.iter().filter(|t| t.kind() == TrackKind::Audio).collect();
        assert_eq!(audio.len(), 1);
        assert!(!audio[0].is_enabled());
        // Never observed enabled: created muted, not muted afterwards
        assert_eq!(audio[0].enable_changes(), 0);
    }

    #[test]
    fn test_toggle_mic_applies_to_live_camera() {
        let mut studio = studio();
        studio.start_camera();
        studio.toggle_mic();
        for track in camera_tracks(&studio).iter().filter(|t| t.kind() == TrackKind::Audio) {
            assert!(!track.is_enabled());
        }
        studio.toggle_mic();
        for track in camera_tracks(&studio).iter().filter(|t| t.kind() == TrackKind::Audio) {
            assert!(track.is_enabled());
        }
    }

    #[test]
    fn test_toggle_mic_without_camera_only_flips_flag() {
        let mut studio = studio();
        studio.toggle_mic();
        assert!(studio.is_mic_muted());
        assert!(studio.registry().is_empty());
    }

    #[test]
    fn test_stop_camera_unstages_and_stops_tracks() {
        let mut studio = studio();
        studio.start_camera();
        let tracks = camera_tracks(&studio);

        studio.stop_camera();
        assert!(!studio.is_camera_on());
        assert!(studio.stage().is_empty());
        assert!(tracks.iter().all(MediaTrack::is_stopped));
        assert!(studio.composition().layout().unwrap().is_placeholder());
    }

    #[test]
    fn test_toggle_camera_round_trip() {
        let mut studio = studio();
        studio.toggle_camera();
        assert!(studio.is_camera_on());
        studio.toggle_camera();
        assert!(!studio.is_camera_on());
    }

    #[test]
    fn test_screen_share_not_auto_staged_and_unstaged_on_stop() {
        let mut studio = studio();
        studio.start_camera();
        studio.toggle_screen_share();
        assert!(studio.is_screen_sharing());
        assert_eq!(studio.stage().ids(), [SourceId::from("camera")]);

        studio.toggle_on_stage(SourceId::from("screen"));
        assert_eq!(studio.stage().len(), 2);

        studio.toggle_screen_share();
        assert!(!studio.is_screen_sharing());
        assert_eq!(studio.stage().ids(), [SourceId::from("camera")]);
    }

    #[test]
    fn test_screen_share_denied_keeps_state() {
        let mut studio = studio_with(FakeBackend {
            denied: vec![SourceKind::Screen],
            ..Default::default()
        });
        studio.start_camera();
        studio.toggle_screen_share();
        assert!(!studio.is_screen_sharing());
        assert!(studio.is_camera_on());
        assert!(studio.notice().unwrap().contains("permissions"));
    }

    #[test]
    fn test_unavailable_screen_notice_names_device() {
        let backend = crate::capture::SyntheticBackend::new().with_unavailable([SourceKind::Screen]);
        let mut studio = studio_with_backend(Box::new(backend));
        studio.toggle_screen_share();
        assert!(!studio.is_screen_sharing());
        let notice = studio.notice().unwrap();
        assert!(notice.contains("the screen"));
        assert!(notice.contains("connected"));
    }

    #[test]
    fn test_split_layout_with_two_sources() {
        let mut studio = studio();
        studio.start_camera();
        studio.toggle_screen_share();
        studio.toggle_on_stage(SourceId::from("screen"));
        studio.set_layout(LayoutMode::Split);

        let composition = studio.composition();
        let layout = composition.layout().unwrap();
        let ids: Vec<&str> = layout.visible_sources().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["camera", "screen"]);
    }

    #[test]
    fn test_stage_selection_with_missing_source_shows_placeholder() {
        let mut studio = studio();
        studio.toggle_on_stage(SourceId::from("screen"));
        let composition = studio.composition();
        let layout = composition.layout().unwrap();
        assert!(layout.is_placeholder());
        assert!(matches!(layout.regions[0].content, RegionContent::Placeholder));
    }

    #[test]
    fn test_logo_replace_revokes_previous_url() {
        let mut studio = studio();
        studio.set_logo(png_bytes()).unwrap();
        let first = studio.branding().logo_url().unwrap().to_string();
        assert_eq!(studio.urls.live_count(), 1);

        studio.set_logo(png_bytes()).unwrap();
        let second = studio.branding().logo_url().unwrap().to_string();
        assert_ne!(first, second);
        assert_eq!(studio.urls.live_count(), 1);

        studio.clear_logo();
        assert_eq!(studio.urls.live_count(), 0);
        assert!(!studio.composition().has_logo());
    }

    #[test]
    fn test_invalid_logo_keeps_previous() {
        let mut studio = studio();
        studio.set_logo(png_bytes()).unwrap();
        let url = studio.branding().logo_url().unwrap().to_string();

        let result = studio.set_logo(b"not an image".to_vec());
        assert!(matches!(result, Err(BrandingError::InvalidLogo(_))));
        assert_eq!(studio.branding().logo_url(), Some(url.as_str()));
        assert_eq!(studio.urls.live_count(), 1);
    }

    #[test]
    fn test_ticker_template_hides_logo() {
        let mut studio = studio();
        studio.set_logo(png_bytes()).unwrap();
        studio.set_banner_text("Welcome");
        assert!(studio.composition().has_logo());

        studio.set_overlay_template(OverlayTemplate::Ticker);
        let composition = studio.composition();
        assert!(!composition.has_logo());
        assert!(matches!(composition.banner(), Some(("Welcome", BannerStyle::Ticker { .. }))));
    }

    #[test]
    fn test_banner_uses_theme_color() {
        let mut studio = studio();
        studio.set_banner_text("Hello");
        studio.set_theme_color(ThemeColor::PURPLE);
        let composition = studio.composition();
        let color = composition.layers.iter().find_map(|l| match l {
            OverlayLayer::Banner { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(color, Some(ThemeColor::PURPLE));
    }

    #[test]
    fn test_live_badge_follows_live_flag() {
        let mut studio = studio();
        assert!(!studio.composition().has_live_badge());
        studio.toggle_live();
        assert!(studio.is_live());
        assert!(studio.composition().has_live_badge());
        studio.toggle_live();
        assert!(!studio.composition().has_live_badge());
    }

    #[test]
    fn test_advance_chat_generates_one_message_per_period() {
        let mut studio = studio();
        studio.mock_chat = Some(MockChatSource::seeded(7));

        assert_eq!(studio.advance_chat(Duration::from_secs(4)), 0);
        assert_eq!(studio.advance_chat(Duration::from_secs(1)), 1);
        assert_eq!(studio.advance_chat(Duration::from_secs(10)), 2);
        assert_eq!(studio.chat().len(), 3);
        assert_eq!(studio.chat().latest().unwrap().id, MessageId(3));
    }

    #[test]
    fn test_advance_chat_after_long_stall_is_capped() {
        let mut config = AppConfig::default();
        config.chat.mock_enabled = false;
        config.chat.interval_secs = 0.001;
        let mut studio = StreamStudio::new(&config, Box::new(FakeBackend::default()));
        studio.mock_chat = Some(MockChatSource::seeded(9));

        let fired = studio.advance_chat(Duration::from_secs(3600));
        assert!(fired <= config.chat.max_messages as u32);
        assert_eq!(studio.chat().len(), config.chat.max_messages);
    }

    #[test]
    fn test_unusable_chat_interval_uses_default() {
        for raw in ["inf", "1e30"] {
            let mut config: AppConfig = toml::from_str(&format!("[chat]\ninterval_secs = {}\n", raw)).unwrap();
            config.chat.mock_enabled = false;
            let mut studio = StreamStudio::new(&config, Box::new(FakeBackend::default()));
            studio.mock_chat = Some(MockChatSource::seeded(2));

            assert_eq!(studio.advance_chat(Duration::from_secs(4)), 0);
            assert_eq!(studio.advance_chat(Duration::from_secs(1)), 1);
        }
    }

    #[test]
    fn test_advance_chat_disabled() {
        let mut studio = studio();
        assert_eq!(studio.advance_chat(Duration::from_secs(60)), 0);
        assert!(studio.chat().is_empty());
    }

    #[test]
    fn test_highlight_appears_in_composition() {
        let mut studio = studio();
        studio.mock_chat = Some(MockChatSource::seeded(1));
        studio.advance_chat(Duration::from_secs(5));
        let id = studio.chat().latest().unwrap().id;

        studio.toggle_highlight(id);
        assert_eq!(studio.highlighted_message().map(|m| m.id), Some(id));
        assert!(studio
            .composition()
            .layers
            .iter()
            .any(|l| matches!(l, OverlayLayer::HighlightedChat { .. })));

        studio.toggle_highlight(id);
        assert!(studio.highlighted_message().is_none());

        studio.toggle_highlight(MessageId(999));
        assert!(studio.highlighted_message().is_none());
    }

    #[test]
    fn test_apply_generated_fills_draft() {
        let mut studio = studio();
        studio.apply_generated(AssistantAction::Title, "Bread Live".to_string());
        studio.apply_generated(AssistantAction::Description, "We bake.".to_string());
        assert_eq!(studio.broadcast().title, "Bread Live");
        assert_eq!(studio.broadcast().description, "We bake.");
    }

    #[test]
    fn test_shutdown_releases_everything_and_is_idempotent() {
        let mut studio = studio();
        studio.start_camera();
        studio.toggle_screen_share();
        studio.set_logo(png_bytes()).unwrap();
        let tracks = camera_tracks(&studio);

        studio.shutdown();
        assert!(studio.registry().is_empty());
        assert!(studio.stage().is_empty());
        assert_eq!(studio.urls.live_count(), 0);
        assert!(tracks.iter().all(MediaTrack::is_stopped));

        studio.shutdown();
        assert!(studio.registry().is_empty());
    }

    #[test]
    fn test_drop_releases_sources() {
        let mut studio = studio();
        studio.start_camera();
        let tracks = camera_tracks(&studio);
        drop(studio);
        assert!(tracks.iter().all(MediaTrack::is_stopped));
    }

    #[test]
    fn test_new_applies_config() {
        let mut config = AppConfig::default();
        config.general.start_muted = true;
        config.branding.banner_text = "Hi".to_string();
        config.branding.layout = LayoutMode::PictureInPicture;
        config.youtube.default_privacy = crate::integrations::Privacy::Private;

        let studio = StreamStudio::new(&config, Box::new(FakeBackend::default()));
        assert!(studio.is_mic_muted());
        assert_eq!(studio.branding().banner_text, "Hi");
        assert_eq!(studio.layout(), LayoutMode::PictureInPicture);
        assert_eq!(studio.broadcast().privacy, crate::integrations::Privacy::Private);
        assert!(studio.registry().is_empty());
    }
}
