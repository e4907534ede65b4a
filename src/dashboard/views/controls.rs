//! Studio controls under the preview

use egui::RichText;

use crate::app::StreamStudio;
use crate::dashboard::components::status_card::CardStatus;
use crate::dashboard::components::StatusCard;
use crate::dashboard::theme::{filled_button, ThemeColors};
use crate::overlay::BannerStyle;
use crate::stage::STAGE_CAPACITY;

/// Mic / camera / screen buttons and the Go Live toggle
pub fn render_controls(ui: &mut egui::Ui, studio: &mut StreamStudio) {
    ui.horizontal(|ui| {
        let (mic_label, mic_fill) = if studio.is_mic_muted() {
            ("Unmute", ThemeColors::ACCENT_ERROR)
        } else {
            ("Mute", ThemeColors::BG_LIGHT)
        };
        if ui.add(filled_button(mic_label, mic_fill)).clicked() {
            studio.toggle_mic();
        }

        let (camera_label, camera_fill) = if studio.is_camera_on() {
            ("Stop camera", ThemeColors::BG_LIGHT)
        } else {
            ("Start camera", ThemeColors::ACCENT_ERROR)
        };
        if ui.add(filled_button(camera_label, camera_fill)).clicked() {
            studio.toggle_camera();
        }

        let (screen_label, screen_fill) = if studio.is_screen_sharing() {
            ("Stop sharing", ThemeColors::ACCENT_PRIMARY)
        } else {
            ("Share screen", ThemeColors::BG_LIGHT)
        };
        if ui.add(filled_button(screen_label, screen_fill)).clicked() {
            studio.toggle_screen_share();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let (live_label, live_fill) = if studio.is_live() {
                ("End stream", ThemeColors::BG_HOVER)
            } else {
                ("Go Live", ThemeColors::LIVE)
            };
            if ui.add(filled_button(live_label, live_fill)).clicked() {
                studio.toggle_live();
            }
        });
    });
}

/// Row of status cards
pub fn render_status_cards(ui: &mut egui::Ui, studio: &StreamStudio) {
    ui.horizontal_wrapped(|ui| {
        let (live_value, live_status) = if studio.is_live() {
            ("On air", CardStatus::Live)
        } else {
            ("Off air", CardStatus::Inactive)
        };
        StatusCard::new("Stream", live_value, live_status).show(ui);

        let camera_status = match (studio.is_camera_on(), studio.is_mic_muted()) {
            (true, true) => CardStatus::Warning,
            (on, _) => CardStatus::from_flag(on),
        };
        let camera_value = match (studio.is_camera_on(), studio.is_mic_muted()) {
            (false, _) => "Off",
            (true, true) => "On (muted)",
            (true, false) => "On",
        };
        StatusCard::new("Camera", camera_value, camera_status).show(ui);

        StatusCard::new(
            "Screen",
            if studio.is_screen_sharing() { "Sharing" } else { "Off" },
            CardStatus::from_flag(studio.is_screen_sharing()),
        )
        .show(ui);

        let composition = studio.composition();
        let nothing_shown = composition.layout().map_or(true, |l| l.is_placeholder());
        let stage_value = if nothing_shown {
            "Empty".to_string()
        } else {
            format!("{}/{}", studio.stage().len(), STAGE_CAPACITY)
        };
        StatusCard::new("On stage", stage_value, CardStatus::from_flag(!nothing_shown)).show(ui);

        let mut overlay = Vec::new();
        if composition.has_live_badge() {
            overlay.push("badge");
        }
        if composition.has_logo() {
            overlay.push("logo");
        }
        match composition.banner() {
            Some((_, BannerStyle::Boxed)) => overlay.push("banner"),
            Some((_, BannerStyle::Ticker { .. })) => overlay.push("ticker"),
            None => {}
        }
        let overlay_value = if overlay.is_empty() {
            "Clean".to_string()
        } else {
            overlay.join(" + ")
        };
        StatusCard::new("Overlay", overlay_value, CardStatus::from_flag(!overlay.is_empty())).show(ui);

        let chat_value = match studio.chat().latest() {
            Some(message) => format!("{} messages, last from {}", studio.chat().len(), message.author),
            None => "Quiet".to_string(),
        };
        StatusCard::new("Chat", chat_value, CardStatus::from_flag(!studio.chat().is_empty())).show(ui);
    });

    if let Some(message) = studio.highlighted_message() {
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("On screen: {}: {}", message.author, message.text))
                .size(12.0)
                .color(ThemeColors::TEXT_SECONDARY),
        );
    }
}
