//! Dashboard theme and styling
//!
//! Neutral slate theme so the branded preview stands out.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

use crate::overlay::ThemeColor;

/// Studio color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG_DARK: Color32 = Color32::from_rgb(15, 17, 21);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(24, 27, 33);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(34, 38, 46);
    pub const BG_HOVER: Color32 = Color32::from_rgb(46, 51, 61);

    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(96, 165, 250);
    pub const ACCENT_SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(250, 204, 21);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    /// Go Live button and on-air indicators
    pub const LIVE: Color32 = Color32::from_rgb(220, 38, 38);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(241, 245, 249);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(148, 163, 184);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);

    pub const BORDER: Color32 = Color32::from_rgb(51, 65, 85);

    // Status colors
    pub const STATUS_RUNNING: Color32 = Color32::from_rgb(34, 197, 94);
    pub const STATUS_STOPPED: Color32 = Color32::from_rgb(148, 163, 184);
}

/// Apply the studio theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_MEDIUM;
    visuals.panel_fill = ThemeColors::BG_DARK;
    visuals.faint_bg_color = ThemeColors::BG_LIGHT;
    visuals.extreme_bg_color = ThemeColors::BG_DARK;

    let rounding = Rounding::same(5.0);
    for (widget, fill) in [
        (&mut visuals.widgets.noninteractive, ThemeColors::BG_MEDIUM),
        (&mut visuals.widgets.inactive, ThemeColors::BG_LIGHT),
        (&mut visuals.widgets.hovered, ThemeColors::BG_HOVER),
        (&mut visuals.widgets.active, ThemeColors::ACCENT_PRIMARY),
        (&mut visuals.widgets.open, ThemeColors::BG_HOVER),
    ] {
        widget.bg_fill = fill;
        widget.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_PRIMARY);
        widget.rounding = rounding;
    }
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_SECONDARY);

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    visuals.hyperlink_color = ThemeColors::ACCENT_PRIMARY;

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_shadow.blur = 12.0;
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);
    visuals.popup_shadow.blur = 4.0;
    visuals.menu_rounding = rounding;

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.window_margin = egui::Margin::same(14.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Branding color as an egui color
pub fn theme_color32(color: ThemeColor) -> Color32 {
    let [r, g, b] = color.to_array();
    Color32::from_rgb(r, g, b)
}

/// Float RGBA (overlay styles) as an egui color
pub fn rgba_color32(rgba: [f32; 4]) -> Color32 {
    let [r, g, b, a] = crate::overlay::widgets::rgba8(rgba, 1.0);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Filled button with white text
pub fn filled_button(text: &str, fill: Color32) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(Color32::WHITE))
        .fill(fill)
        .min_size(egui::vec2(110.0, 34.0))
}
