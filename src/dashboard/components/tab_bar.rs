//! Tab strip for the side panel

use egui::{Color32, Rounding, Sense, Vec2};

use crate::dashboard::state::DashboardTab;
use crate::dashboard::theme::{color_with_alpha, ThemeColors};

/// Render the tab strip; switches `current` on click
pub fn render_tab_bar(ui: &mut egui::Ui, current: &mut DashboardTab) {
    let tab_width = (ui.available_width() / DashboardTab::ALL.len() as f32).max(48.0);

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for tab in DashboardTab::ALL {
            if tab_button(ui, tab.name(), *current == tab, tab_width) {
                *current = tab;
            }
        }
    });
    ui.separator();
}

fn tab_button(ui: &mut egui::Ui, label: &str, is_selected: bool, width: f32) -> bool {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(width, 32.0), Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if is_selected {
            color_with_alpha(ThemeColors::ACCENT_PRIMARY, 40)
        } else if response.hovered() {
            ThemeColors::BG_HOVER
        } else {
            Color32::TRANSPARENT
        };
        let text_color = if is_selected {
            ThemeColors::ACCENT_PRIMARY
        } else if response.hovered() {
            ThemeColors::TEXT_PRIMARY
        } else {
            ThemeColors::TEXT_SECONDARY
        };

        ui.painter().rect_filled(rect.shrink2(Vec2::new(2.0, 0.0)), Rounding::same(4.0), bg_color);

        // Underline on the active tab
        if is_selected {
            let indicator = egui::Rect::from_min_size(
                rect.left_bottom() + Vec2::new(6.0, -3.0),
                Vec2::new(rect.width() - 12.0, 3.0),
            );
            ui.painter().rect_filled(indicator, Rounding::same(1.5), ThemeColors::ACCENT_PRIMARY);
        }

        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(13.0),
            text_color,
        );
    }

    response.clicked()
}
