//! Compact status card shown under the preview

use egui::{Color32, RichText, Rounding, Vec2};

use crate::dashboard::theme::{color_with_alpha, ThemeColors};

/// Status types for cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Active,
    Inactive,
    Live,
    Warning,
}

impl CardStatus {
    pub fn color(&self) -> Color32 {
        match self {
            CardStatus::Active => ThemeColors::STATUS_RUNNING,
            CardStatus::Inactive => ThemeColors::STATUS_STOPPED,
            CardStatus::Live => ThemeColors::LIVE,
            CardStatus::Warning => ThemeColors::ACCENT_WARNING,
        }
    }

    pub fn from_flag(on: bool) -> Self {
        if on {
            CardStatus::Active
        } else {
            CardStatus::Inactive
        }
    }
}

/// A card with a title, a value and a colored status dot
pub struct StatusCard {
    pub title: String,
    pub value: String,
    pub status: CardStatus,
}

impl StatusCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, status: CardStatus) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            status,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let fill = if self.status == CardStatus::Live {
            color_with_alpha(ThemeColors::LIVE, 48)
        } else {
            ThemeColors::BG_MEDIUM
        };

        egui::Frame::none()
            .fill(fill)
            .rounding(Rounding::same(6.0))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_min_width(110.0);
                ui.horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
                    ui.painter().circle_filled(dot.center(), 4.0, self.status.color());

                    ui.vertical(|ui| {
                        ui.label(RichText::new(&self.title).size(11.0).color(ThemeColors::TEXT_MUTED));
                        ui.label(
                            RichText::new(&self.value)
                                .size(15.0)
                                .color(ThemeColors::TEXT_PRIMARY)
                                .strong(),
                        );
                    });
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_flag() {
        assert_eq!(CardStatus::from_flag(true), CardStatus::Active);
        assert_eq!(CardStatus::from_flag(false), CardStatus::Inactive);
    }
}
