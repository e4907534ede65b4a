//! Branding tab - theme color, overlay template, banner, logo and layout

use egui::{RichText, Vec2};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::StreamStudio;
use crate::config::save_config;
use crate::dashboard::state::BrandingViewState;
use crate::dashboard::theme::{theme_color32, ThemeColors};
use crate::layout::LayoutMode;
use crate::overlay::{OverlayTemplate, ThemeColor};
use crate::shared::SharedAppState;

/// Render the branding tab
pub fn render_branding_view(
    ui: &mut egui::Ui,
    view_state: &mut BrandingViewState,
    studio: &mut StreamStudio,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("Branding").strong());
    ui.add_space(8.0);

    section(ui, "Layout", |ui| {
        ui.horizontal(|ui| {
            for mode in LayoutMode::ALL {
                if ui.selectable_label(studio.layout() == mode, mode.label()).clicked() {
                    studio.set_layout(mode);
                }
            }
        });
    });

    section(ui, "Theme color", |ui| {
        ui.horizontal(|ui| {
            let current = studio.branding().theme_color;
            for preset in ThemeColor::PRESETS {
                let (rect, response) = ui.allocate_exact_size(Vec2::splat(26.0), egui::Sense::click());
                ui.painter().circle_filled(rect.center(), 11.0, theme_color32(preset));
                if preset == current {
                    ui.painter().circle_stroke(rect.center(), 12.5, egui::Stroke::new(2.0, egui::Color32::WHITE));
                }
                if response.on_hover_text(preset.to_string()).clicked() {
                    studio.set_theme_color(preset);
                }
            }

            ui.add_space(8.0);
            let mut rgb = current.to_array();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                studio.set_theme_color(ThemeColor::from_array(rgb));
            }
            ui.label(RichText::new(current.to_string()).monospace().color(ThemeColors::TEXT_SECONDARY));
        });
    });

    section(ui, "Overlay template", |ui| {
        ui.horizontal(|ui| {
            for template in OverlayTemplate::ALL {
                if ui.selectable_label(studio.template() == template, template.label()).clicked() {
                    studio.set_overlay_template(template);
                }
            }
        });
        if studio.template() == OverlayTemplate::Ticker {
            ui.label(
                RichText::new("The ticker scrolls the banner text and hides the logo.")
                    .size(11.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        }
    });

    section(ui, "Banner", |ui| {
        let mut text = studio.branding().banner_text.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text("Banner text (empty hides the banner)")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            studio.set_banner_text(text);
        }
    });

    section(ui, "Logo", |ui| {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut view_state.logo_path)
                    .hint_text("Path to a PNG, JPEG or GIF")
                    .desired_width(ui.available_width() - 120.0),
            );
            if ui.button("Load").clicked() {
                let path = view_state.logo_path.trim().to_string();
                load_logo_file(view_state, studio, Path::new(&path));
            }
        });

        ui.horizontal(|ui| {
            match studio.branding().logo.as_ref() {
                Some(logo) => {
                    ui.label(
                        RichText::new(format!("{}x{}", logo.width, logo.height))
                            .color(ThemeColors::TEXT_SECONDARY),
                    );
                    if ui.button("Remove logo").clicked() {
                        studio.clear_logo();
                    }
                }
                None => {
                    ui.label(
                        RichText::new("No logo. You can also drop an image onto the window.")
                            .size(11.0)
                            .color(ThemeColors::TEXT_MUTED),
                    );
                }
            }
        });

        if let Some(error) = &view_state.logo_error {
            ui.label(RichText::new(error).color(ThemeColors::ACCENT_ERROR));
        }
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Save as default").on_hover_text("Write these settings to config.toml").clicked() {
            view_state.save_status = Some(save_branding_defaults(studio, shared_state));
        }
        if let Some(status) = &view_state.save_status {
            ui.label(RichText::new(status).size(11.0).color(ThemeColors::TEXT_SECONDARY));
        }
    });
}

/// Read an image file and install it as the logo
pub fn load_logo_file(view_state: &mut BrandingViewState, studio: &mut StreamStudio, path: &Path) {
    let result = std::fs::read(path)
        .map_err(|e| format!("Could not read {}: {}", path.display(), e))
        .and_then(|bytes| studio.set_logo(bytes).map_err(|e| e.to_string()));
    match result {
        Ok(()) => {
            info!("Loaded logo from {}", path.display());
            view_state.logo_error = None;
        }
        Err(e) => {
            warn!("{}", e);
            view_state.logo_error = Some(e);
        }
    }
}

fn save_branding_defaults(studio: &StreamStudio, shared_state: &Arc<RwLock<SharedAppState>>) -> String {
    let mut state = shared_state.write();
    state.config.branding.theme_color = studio.branding().theme_color;
    state.config.branding.banner_text = studio.branding().banner_text.clone();
    state.config.branding.template = studio.template();
    state.config.branding.layout = studio.layout();

    let Some(path) = state.config_path.clone() else {
        return "No config location available".to_string();
    };
    match save_config(&state.config, &path) {
        Ok(()) => {
            info!("Saved branding defaults to {:?}", path);
            format!("Saved to {}", path.display())
        }
        Err(e) => {
            let message = format!("Save failed: {:#}", e);
            state.runtime.set_error(message.clone());
            message
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(6.0))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).size(12.0).color(ThemeColors::TEXT_MUTED));
            ui.add_space(4.0);
            add_contents(ui);
        });
    ui.add_space(8.0);
}
