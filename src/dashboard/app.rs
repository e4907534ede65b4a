//! Dashboard application entry point

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::app::StreamStudio;
use crate::dashboard::components::render_tab_bar;
use crate::dashboard::state::{DashboardState, DashboardTab};
use crate::dashboard::theme::{self, ThemeColors};
use crate::dashboard::views::{
    branding::load_logo_file, render_assistant_view, render_branding_view, render_chat_view,
    render_controls, render_preview, render_sources_view, render_status_cards, render_youtube_view,
};
use crate::integrations::ai::run_action;
use crate::integrations::{provision, GeminiClient, OAuthClient, TextGenerator, YouTubeClient};
use crate::overlay::OverlayTemplate;
use crate::shared::{AiRequest, IntegrationCommand, IntegrationEvent, SharedAppState};

/// Repaint interval while nothing animates; keeps the mock chat flowing
const IDLE_REPAINT: Duration = Duration::from_millis(250);
/// Repaint interval while the ticker scrolls or a spinner shows
const ANIMATION_REPAINT: Duration = Duration::from_millis(33);

/// The main dashboard application
pub struct StudioDashboard {
    studio: StreamStudio,
    /// Shared application state
    shared_state: Arc<RwLock<SharedAppState>>,
    /// Dashboard-specific state
    dashboard_state: DashboardState,
    /// Whether theme has been applied
    theme_applied: bool,
    /// Runs network integrations off the UI thread
    runtime: tokio::runtime::Runtime,
    events_tx: Sender<IntegrationEvent>,
    events_rx: Receiver<IntegrationEvent>,
    last_frame: Instant,
}

impl StudioDashboard {
    pub fn new(studio: StreamStudio, shared_state: Arc<RwLock<SharedAppState>>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("studio-integrations")
            .enable_all()
            .build()?;
        let (events_tx, events_rx) = unbounded();
        let dashboard_state = DashboardState::new(&shared_state.read().config);

        Ok(Self {
            studio,
            shared_state,
            dashboard_state,
            theme_applied: false,
            runtime,
            events_tx,
            events_rx,
            last_frame: Instant::now(),
        })
    }

    /// Create eframe options for the dashboard window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 780.0])
                .with_min_inner_size([960.0, 600.0])
                .with_drag_and_drop(true)
                .with_title("Stream Studio"),
            ..Default::default()
        }
    }

    /// Apply results that came back from background tasks
    fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            let mut state = self.shared_state.write();
            match event {
                IntegrationEvent::AiFinished { request, result } => {
                    state.runtime.ai_pending = false;
                    match result {
                        Ok(text) => {
                            if let AiRequest::Action(action) = request {
                                self.studio.apply_generated(action, text.clone());
                            }
                            self.dashboard_state.assistant.response = Some(text);
                        }
                        Err(e) => state.runtime.ai_error = Some(e),
                    }
                }
                IntegrationEvent::AuthFinished(result) => {
                    state.runtime.auth_pending = false;
                    match result {
                        Ok(token) => {
                            self.dashboard_state.youtube.access_token = Some(token);
                            self.dashboard_state.youtube.auth_code.clear();
                        }
                        Err(e) => state.runtime.youtube_error = Some(e),
                    }
                }
                IntegrationEvent::ProvisionFinished(result) => {
                    state.runtime.provision_pending = false;
                    match result {
                        Ok(ingest) => self.dashboard_state.youtube.ingest = Some(ingest),
                        Err(e) => state.runtime.youtube_error = Some(e),
                    }
                }
            }
        }
    }

    /// Start background work the views queued
    fn process_commands(&mut self, ctx: &egui::Context) {
        let (commands, config) = {
            let mut state = self.shared_state.write();
            let commands = state.runtime.take_commands();
            (commands, state.config.clone())
        };

        for command in commands {
            let tx = self.events_tx.clone();
            let repaint = ctx.clone();

            match command {
                IntegrationCommand::Assist { request, input } => {
                    let client = GeminiClient::new(&config.ai);
                    self.runtime.spawn(async move {
                        let result = match client {
                            Ok(client) => match request {
                                AiRequest::Action(action) => run_action(&client, action, &input).await,
                                AiRequest::Freeform => client.generate(&input).await.map(|t| t.trim().to_string()),
                            },
                            Err(e) => Err(e),
                        };
                        if let Err(e) = &result {
                            warn!("Assistant request failed: {}", e);
                        }
                        let _ = tx.send(IntegrationEvent::AiFinished {
                            request,
                            result: result.map_err(|e| e.to_string()),
                        });
                        repaint.request_repaint();
                    });
                }
                IntegrationCommand::ExchangeCode { client_id, code, state } => {
                    let client = OAuthClient::new(
                        client_id,
                        config.youtube.client_secret.clone(),
                        config.youtube.redirect_port,
                    );
                    self.runtime.spawn(async move {
                        let result = match client {
                            Ok(client) => client.exchange_code(&code, state.as_deref()).await,
                            Err(e) => Err(e),
                        };
                        if let Err(e) = &result {
                            warn!("YouTube sign-in failed: {}", e);
                        }
                        let _ = tx.send(IntegrationEvent::AuthFinished(result.map_err(|e| e.to_string())));
                        repaint.request_repaint();
                    });
                }
                IntegrationCommand::Provision(settings) => {
                    let token = self
                        .dashboard_state
                        .youtube
                        .access_token
                        .clone()
                        .filter(|t| !t.is_expired());
                    let Some(token) = token else {
                        let _ = tx.send(IntegrationEvent::ProvisionFinished(Err(
                            "Sign in to YouTube first".to_string(),
                        )));
                        continue;
                    };
                    self.runtime.spawn(async move {
                        let client = YouTubeClient::new(token);
                        let result = provision(&client, &settings).await;
                        if let Err(e) = &result {
                            warn!("Broadcast provisioning failed: {}", e);
                        }
                        let _ = tx.send(IntegrationEvent::ProvisionFinished(result.map_err(|e| e.to_string())));
                        repaint.request_repaint();
                    });
                }
            }
        }
    }

    /// Load the first image dropped onto the window as the logo
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let branding = &mut self.dashboard_state.branding;
        if let Some(bytes) = file.bytes {
            match self.studio.set_logo(bytes.to_vec()) {
                Ok(()) => branding.logo_error = None,
                Err(e) => branding.logo_error = Some(e.to_string()),
            }
        } else if let Some(path) = file.path {
            branding.logo_path = path.display().to_string();
            load_logo_file(branding, &mut self.studio, Path::new(&path));
        }
        self.dashboard_state.current_tab = DashboardTab::Branding;
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.studio.notice().map(str::to_string) else {
            return;
        };

        // Dim everything behind the notice
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("notice_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.allocate_response(screen.size(), egui::Sense::click());
                ui.painter().rect_filled(screen, egui::Rounding::ZERO, egui::Color32::from_black_alpha(160));
            });

        let mut dismissed = false;
        egui::Window::new("Notice")
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.label(&notice);
                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.studio.dismiss_notice();
        }
    }
}

impl eframe::App for StudioDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        let now = Instant::now();
        self.studio.advance_chat(now - self.last_frame);
        self.last_frame = now;

        self.process_events();
        self.process_commands(ctx);
        self.handle_dropped_files(ctx);

        let animating = self.studio.template() == OverlayTemplate::Ticker && self.studio.branding().has_banner();
        let busy = self.shared_state.read().runtime.is_busy();
        ctx.request_repaint_after(if animating || busy { ANIMATION_REPAINT } else { IDLE_REPAINT });

        let last_error = self.shared_state.read().runtime.last_error.clone();
        if let Some(error) = last_error {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(error).color(ThemeColors::ACCENT_ERROR).size(12.0));
                    if ui.small_button("Dismiss").clicked() {
                        self.shared_state.write().runtime.clear_error();
                    }
                });
            });
        }

        egui::SidePanel::right("studio_panel")
            .resizable(true)
            .default_width(380.0)
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                render_tab_bar(ui, &mut self.dashboard_state.current_tab);
                ui.add_space(6.0);

                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    match self.dashboard_state.current_tab {
                        DashboardTab::Sources => render_sources_view(ui, &mut self.studio),
                        DashboardTab::Chat => render_chat_view(ui, &mut self.studio),
                        DashboardTab::Branding => render_branding_view(
                            ui,
                            &mut self.dashboard_state.branding,
                            &mut self.studio,
                            &self.shared_state,
                        ),
                        DashboardTab::YouTube => render_youtube_view(
                            ui,
                            &mut self.dashboard_state.youtube,
                            &mut self.studio,
                            &self.shared_state,
                        ),
                        DashboardTab::Assistant => render_assistant_view(
                            ui,
                            &mut self.dashboard_state.assistant,
                            &self.shared_state,
                        ),
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(16.0).show(ui, |ui| {
                render_preview(ui, &mut self.dashboard_state.preview, &self.studio);
                ui.add_space(12.0);
                render_controls(ui, &mut self.studio);
                ui.add_space(12.0);
                render_status_cards(ui, &self.studio);
            });
        });

        self.render_notice(ctx);
        self.shared_state.write().runtime.frames_rendered += 1;
    }
}

impl Drop for StudioDashboard {
    fn drop(&mut self) {
        let frames = self.shared_state.read().runtime.frames_rendered;
        info!("Closing studio after {} frames", frames);
        self.studio.shutdown();
    }
}

/// Run the dashboard application
pub fn run_dashboard(studio: StreamStudio, shared_state: Arc<RwLock<SharedAppState>>) -> anyhow::Result<()> {
    let app = StudioDashboard::new(studio, shared_state)?;
    eframe::run_native(
        "Stream Studio",
        StudioDashboard::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
