//! Chat tab - mock viewer chat with on-screen highlighting

use egui::RichText;

use crate::app::StreamStudio;
use crate::chat::MessageId;
use crate::dashboard::theme::{color_with_alpha, theme_color32, ThemeColors};

/// Render the chat tab. Messages are listed oldest first.
pub fn render_chat_view(ui: &mut egui::Ui, studio: &mut StreamStudio) {
    ui.heading(RichText::new("Chat").strong());
    ui.label(
        RichText::new(format!(
            "{} of {} messages kept",
            studio.chat().len(),
            studio.chat().max_messages()
        ))
        .size(12.0)
        .color(ThemeColors::TEXT_SECONDARY),
    );
    if studio.chat().highlighted_id().is_some() && ui.small_button("Clear on-screen message").clicked() {
        studio.clear_highlight();
    }
    ui.add_space(8.0);

    if studio.chat().is_empty() {
        ui.label(RichText::new("Waiting for viewers...").color(ThemeColors::TEXT_MUTED));
        return;
    }

    let accent = theme_color32(studio.branding().theme_color);
    let highlighted = studio.chat().highlighted_id();
    let mut toggled: Option<MessageId> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in studio.chat().messages().rev() {
                let is_highlighted = highlighted == Some(message.id);
                let fill = if is_highlighted {
                    color_with_alpha(accent, 70)
                } else {
                    ThemeColors::BG_MEDIUM
                };

                egui::Frame::none()
                    .fill(fill)
                    .rounding(egui::Rounding::same(5.0))
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(&message.author).strong().size(12.0));
                                ui.label(&message.text);
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let label = if is_highlighted { "Hide" } else { "Show" };
                                if ui.small_button(label).on_hover_text("Show on screen").clicked() {
                                    toggled = Some(message.id);
                                }
                            });
                        });
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(id) = toggled {
        studio.toggle_highlight(id);
    }
}
