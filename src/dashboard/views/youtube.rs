//! YouTube tab - sign in, draft the broadcast, create it and show ingest details

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::app::StreamStudio;
use crate::dashboard::state::YouTubeViewState;
use crate::dashboard::theme::{filled_button, ThemeColors};
use crate::integrations::{OAuthClient, Privacy};
use crate::shared::{IntegrationCommand, SharedAppState};

/// Render the YouTube tab
pub fn render_youtube_view(
    ui: &mut egui::Ui,
    view_state: &mut YouTubeViewState,
    studio: &mut StreamStudio,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("YouTube Live").strong());
    ui.add_space(8.0);

    let (auth_pending, provision_pending, error) = {
        let state = shared_state.read();
        (
            state.runtime.auth_pending,
            state.runtime.provision_pending,
            state.runtime.youtube_error.clone(),
        )
    };

    if view_state.is_signed_in() {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Signed in").color(ThemeColors::ACCENT_SUCCESS));
            if ui.small_button("Sign out").clicked() {
                view_state.sign_out();
            }
        });
    } else {
        render_sign_in(ui, view_state, shared_state, auth_pending);
    }

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("Broadcast").size(12.0).color(ThemeColors::TEXT_MUTED));
    let draft = studio.broadcast_mut();
    ui.add(
        egui::TextEdit::singleline(&mut draft.title)
            .hint_text("Title")
            .desired_width(f32::INFINITY),
    );
    ui.add(
        egui::TextEdit::multiline(&mut draft.description)
            .hint_text("Description")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    egui::ComboBox::from_label("Privacy")
        .selected_text(draft.privacy.label())
        .show_ui(ui, |ui| {
            for privacy in Privacy::ALL {
                ui.selectable_value(&mut draft.privacy, privacy, privacy.label());
            }
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let enabled = view_state.is_signed_in() && !provision_pending;
        let button = filled_button("Create broadcast", ThemeColors::LIVE);
        if ui.add_enabled(enabled, button).clicked() {
            let settings = studio.broadcast().clone();
            let mut state = shared_state.write();
            state.runtime.youtube_error = None;
            state.runtime.provision_pending = true;
            state.runtime.request(IntegrationCommand::Provision(settings));
        }
        if provision_pending {
            ui.spinner();
            ui.label("Creating broadcast...");
        }
    });

    if let Some(error) = error {
        ui.add_space(6.0);
        ui.label(RichText::new(error).color(ThemeColors::ACCENT_ERROR));
    }

    if let Some(ingest) = view_state.ingest.clone() {
        ui.add_space(12.0);
        ui.separator();
        ui.label(RichText::new("Ingest").size(12.0).color(ThemeColors::TEXT_MUTED));
        copy_row(ui, "Server URL", &ingest.server_url, &ingest.server_url);

        let shown = if view_state.show_stream_key {
            ingest.stream_key.clone()
        } else {
            mask(&ingest.stream_key)
        };
        copy_row(ui, "Stream key", &shown, &ingest.stream_key);
        ui.checkbox(&mut view_state.show_stream_key, "Show stream key");
        ui.label(
            RichText::new(format!("Broadcast {}", ingest.broadcast_id))
                .size(11.0)
                .color(ThemeColors::TEXT_MUTED),
        );
    }
}

fn render_sign_in(
    ui: &mut egui::Ui,
    view_state: &mut YouTubeViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
    auth_pending: bool,
) {
    ui.label(RichText::new("OAuth client id").size(12.0).color(ThemeColors::TEXT_MUTED));
    ui.add(
        egui::TextEdit::singleline(&mut view_state.client_id)
            .hint_text("xxxx.apps.googleusercontent.com")
            .desired_width(f32::INFINITY),
    );

    if ui.button("Open sign-in page").clicked() {
        let (secret, port) = {
            let state = shared_state.read();
            (state.config.youtube.client_secret.clone(), state.config.youtube.redirect_port)
        };
        match OAuthClient::new(view_state.client_id.clone(), secret, port) {
            Ok(client) => {
                let state = uuid::Uuid::new_v4().to_string();
                let url = client.authorization_url(&state);
                ui.ctx().open_url(egui::OpenUrl::new_tab(&url));
                view_state.auth_url = Some(url);
                view_state.auth_state = Some(state);
                shared_state.write().runtime.youtube_error = None;
            }
            Err(e) => shared_state.write().runtime.youtube_error = Some(e.to_string()),
        }
    }

    if let Some(url) = view_state.auth_url.clone() {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Consent page opened in your browser.").size(11.0));
            if ui.small_button("Copy link").clicked() {
                ui.output_mut(|o| o.copied_text = url);
            }
        });
        ui.label(
            RichText::new("After approving, paste the code or the page address you were sent to:")
                .size(11.0)
                .color(ThemeColors::TEXT_SECONDARY),
        );
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut view_state.auth_code).desired_width(ui.available_width() - 90.0));
            let enabled = !auth_pending && !view_state.auth_code.trim().is_empty();
            if ui.add_enabled(enabled, egui::Button::new("Sign in")).clicked() {
                let mut state = shared_state.write();
                state.runtime.auth_pending = true;
                state.runtime.youtube_error = None;
                state.runtime.request(IntegrationCommand::ExchangeCode {
                    client_id: view_state.client_id.clone(),
                    code: view_state.auth_code.clone(),
                    state: view_state.auth_state.clone(),
                });
            }
            if auth_pending {
                ui.spinner();
            }
        });
    }
}

fn copy_row(ui: &mut egui::Ui, label: &str, shown: &str, copied: &str) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(12.0).color(ThemeColors::TEXT_SECONDARY));
        ui.label(RichText::new(shown).monospace());
        if ui.small_button("Copy").clicked() {
            ui.output_mut(|o| o.copied_text = copied.to_string());
        }
    });
}

/// Hide all but the tail: at most four characters, never more than half
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    let visible = count.saturating_sub(count.saturating_sub(4).max(count / 2));
    secret
        .chars()
        .enumerate()
        .map(|(i, c)| if i < count - visible { '•' } else { c })
        .collect()
}
