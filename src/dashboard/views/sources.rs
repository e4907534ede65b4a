//! Sources tab - live capture sources and their stage membership

use egui::RichText;

use crate::app::StreamStudio;
use crate::capture::SourceId;
use crate::dashboard::theme::ThemeColors;
use crate::stage::STAGE_CAPACITY;

/// Render the sources tab
pub fn render_sources_view(ui: &mut egui::Ui, studio: &mut StreamStudio) {
    ui.heading(RichText::new("Sources").strong());
    ui.label(
        RichText::new(format!(
            "Up to {} sources can be on stage. Adding a third replaces the oldest.",
            STAGE_CAPACITY
        ))
        .size(12.0)
        .color(ThemeColors::TEXT_SECONDARY),
    );
    ui.add_space(12.0);

    let mut toggled: Option<SourceId> = None;

    if studio.registry().is_empty() {
        ui.label(RichText::new("No active sources").color(ThemeColors::TEXT_MUTED));
    }

    for source in studio.registry().iter() {
        let position = studio.stage().ids().iter().position(|id| id == &source.id);
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&source.name).strong());
                        let audio: Vec<_> = source.stream.audio_tracks().collect();
                        let detail = match audio.first() {
                            Some(track) if track.is_enabled() => "video + audio",
                            Some(_) => "video + audio (muted)",
                            None => "video",
                        };
                        let labels: Vec<&str> = source.stream.tracks().iter().map(|t| t.label()).collect();
                        ui.label(RichText::new(detail).size(11.0).color(ThemeColors::TEXT_MUTED))
                            .on_hover_text(labels.join("\n"));
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let label = match position {
                            Some(_) => "Remove from stage",
                            None => "Add to stage",
                        };
                        if ui.button(label).clicked() {
                            toggled = Some(source.id.clone());
                        }
                        if let Some(index) = position {
                            ui.label(
                                RichText::new(format!("#{}", index + 1))
                                    .color(ThemeColors::ACCENT_SUCCESS)
                                    .strong(),
                            );
                        }
                    });
                });
            });
        ui.add_space(6.0);
    }

    if let Some(id) = toggled {
        studio.toggle_on_stage(id);
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if !studio.is_camera_on() && ui.button("Start camera").clicked() {
            studio.start_camera();
        }
        if !studio.is_screen_sharing() && ui.button("Share screen").clicked() {
            studio.toggle_screen_share();
        }
    });
}
