//! AI tab - generate titles and descriptions, or ask anything

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::dashboard::state::AssistantViewState;
use crate::dashboard::theme::ThemeColors;
use crate::integrations::AssistantAction;
use crate::shared::{AiRequest, IntegrationCommand, SharedAppState};

/// Render the assistant tab
pub fn render_assistant_view(
    ui: &mut egui::Ui,
    view_state: &mut AssistantViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("AI Assistant").strong());
    ui.add_space(8.0);

    let (pending, error, has_key, key_env) = {
        let state = shared_state.read();
        (
            state.runtime.ai_pending,
            state.runtime.ai_error.clone(),
            state.config.ai.resolve_api_key().is_some(),
            state.config.ai.api_key_env.clone(),
        )
    };

    if !has_key {
        ui.label(
            RichText::new(format!("No API key configured. Set {} or ai.api_key in config.toml.", key_env))
                .size(11.0)
                .color(ThemeColors::ACCENT_WARNING),
        );
        ui.add_space(6.0);
    }

    ui.label(RichText::new("What is your stream about?").size(12.0).color(ThemeColors::TEXT_MUTED));
    ui.add(
        egui::TextEdit::singleline(&mut view_state.topic)
            .hint_text("e.g. baking sourdough bread")
            .desired_width(f32::INFINITY),
    );

    let mut request: Option<(AiRequest, String)> = None;
    ui.horizontal(|ui| {
        let enabled = !pending && !view_state.topic.trim().is_empty();
        for (action, label) in [
            (AssistantAction::Title, "Generate title"),
            (AssistantAction::Description, "Generate description"),
        ] {
            if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                request = Some((AiRequest::Action(action), view_state.topic.clone()));
            }
        }
    });
    ui.label(
        RichText::new("Generated text goes straight into the YouTube broadcast draft.")
            .size(11.0)
            .color(ThemeColors::TEXT_MUTED),
    );

    ui.add_space(12.0);
    ui.label(RichText::new("Ask anything").size(12.0).color(ThemeColors::TEXT_MUTED));
    ui.add(
        egui::TextEdit::multiline(&mut view_state.question)
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        let enabled = !pending && !view_state.question.trim().is_empty();
        if ui.add_enabled(enabled, egui::Button::new("Ask")).clicked() {
            request = Some((AiRequest::Freeform, view_state.question.clone()));
        }
        if pending {
            ui.spinner();
            ui.label("Thinking...");
        }
    });

    if let Some((request, input)) = request {
        queue_request(view_state, shared_state, request, input);
    }

    if let Some(error) = error {
        ui.add_space(6.0);
        ui.label(RichText::new(error).color(ThemeColors::ACCENT_ERROR));
    }

    if let Some(response) = &view_state.response {
        ui.add_space(12.0);
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(response);
                if ui.small_button("Copy").clicked() {
                    ui.output_mut(|o| o.copied_text = response.clone());
                }
            });
    }
}

/// Queue an assistant request, dropping the previous answer and error
fn queue_request(
    view_state: &mut AssistantViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
    request: AiRequest,
    input: String,
) {
    view_state.response = None;
    let mut state = shared_state.write();
    state.runtime.ai_pending = true;
    state.runtime.ai_error = None;
    state.runtime.request(IntegrationCommand::Assist { request, input });
}
