//! Composited preview
//!
//! Paints a [`Composition`] into a 16:9 frame: stage regions first, then
//! the overlay layers in order.

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::app::StreamStudio;
use crate::capture::SourceId;
use crate::dashboard::state::PreviewViewState;
use crate::dashboard::theme::{rgba_color32, theme_color32, ThemeColors};
use crate::layout::{NormRect, RegionAssignment, RegionContent};
use crate::overlay::widgets::ElementStyle;
use crate::overlay::{ticker_offset, BannerStyle, Composition, OverlayLayer};

const ASPECT: f32 = 16.0 / 9.0;

/// Render the preview into the available width
pub fn render_preview(ui: &mut egui::Ui, state: &mut PreviewViewState, studio: &StreamStudio) {
    let width = ui.available_width();
    let height = (width / ASPECT).min(ui.available_height().max(120.0));
    let (frame, _) = ui.allocate_exact_size(Vec2::new(height * ASPECT, height), egui::Sense::hover());

    if !ui.is_rect_visible(frame) {
        return;
    }

    let composition = studio.composition();
    sync_textures(ui.ctx(), state, studio, &composition);

    let painter = ui.painter_at(frame);
    painter.rect_filled(frame, Rounding::ZERO, Color32::BLACK);

    let t = state.started.elapsed().as_secs_f64();
    for layer in &composition.layers {
        match layer {
            OverlayLayer::Layout(assignment) => paint_layout(&painter, frame, state, assignment),
            OverlayLayer::LiveBadge { rect, text } => {
                paint_box(&painter, to_screen(frame, *rect), &state.styles.live_badge, None, frame);
                paint_text(&painter, to_screen(frame, *rect).center(), text, &state.styles.live_badge, frame, true);
            }
            OverlayLayer::Logo { rect, url } => {
                if let Some((_, texture)) = state.logo_texture.as_ref().filter(|(u, _)| u == url) {
                    let target = fit_inside(to_screen(frame, *rect), texture.size_vec2());
                    painter.image(texture.id(), target, full_uv(), Color32::WHITE);
                }
            }
            OverlayLayer::Banner { rect, text, color, style } => {
                let area = to_screen(frame, *rect);
                match style {
                    BannerStyle::Boxed => {
                        let element = &state.styles.banner;
                        paint_box(&painter, area, element, Some(theme_color32(*color)), frame);
                        paint_text(&painter, area.center(), text, element, frame, true);
                    }
                    BannerStyle::Ticker { speed } => {
                        let element = &state.styles.ticker;
                        paint_box(&painter, area, element, Some(theme_color32(*color)), frame);
                        paint_ticker(&painter, area, frame, text, element, *speed, t);
                    }
                }
            }
            OverlayLayer::HighlightedChat { rect, author, text, accent } => {
                let area = to_screen(frame, *rect);
                let element = &state.styles.chat_card;
                paint_box(&painter, area, element, None, frame);
                let stripe = Rect::from_min_size(area.min, Vec2::new(area.width() * 0.02, area.height()));
                painter.rect_filled(stripe, Rounding::ZERO, theme_color32(*accent));

                let font = font_size(element, frame);
                let left = area.left() + area.width() * 0.05;
                painter.text(
                    Pos2::new(left, area.top() + area.height() * 0.3),
                    Align2::LEFT_CENTER,
                    author,
                    FontId::proportional(font * 0.85),
                    lighten(theme_color32(*accent), 0.55),
                );
                painter.text(
                    Pos2::new(left, area.top() + area.height() * 0.68),
                    Align2::LEFT_CENTER,
                    text,
                    FontId::proportional(font),
                    rgba_color32(element.text_color),
                );
            }
        }
    }

    painter.rect_stroke(frame, Rounding::ZERO, Stroke::new(1.0, ThemeColors::BORDER));
}

/// Keep textures in step with staged sources and the current logo
fn sync_textures(ctx: &egui::Context, state: &mut PreviewViewState, studio: &StreamStudio, composition: &Composition) {
    let visible: Vec<SourceId> = composition
        .layout()
        .map(|l| l.visible_sources().into_iter().cloned().collect())
        .unwrap_or_default();

    state.source_textures.retain(|id, _| visible.contains(id));
    for id in visible {
        if state.source_textures.contains_key(&id) {
            continue;
        }
        let Some(frame) = studio.registry().get(&id).and_then(|s| s.stream.latest_frame()) else {
            continue;
        };
        let image = egui::ColorImage::from_rgba_unmultiplied([frame.width as usize, frame.height as usize], &frame.data);
        let texture = ctx.load_texture(format!("source_{}", id), image, egui::TextureOptions::LINEAR);
        state.source_textures.insert(id, texture);
    }

    match studio.branding().logo.as_ref() {
        Some(logo) => {
            let stale = state.logo_texture.as_ref().map_or(true, |(url, _)| url != logo.url());
            if stale {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [logo.width as usize, logo.height as usize],
                    &logo.pixels,
                );
                let texture = ctx.load_texture("logo", image, egui::TextureOptions::LINEAR);
                state.logo_texture = Some((logo.url().to_string(), texture));
            }
        }
        None => state.logo_texture = None,
    }
}

fn paint_layout(painter: &egui::Painter, frame: Rect, state: &PreviewViewState, assignment: &RegionAssignment) {
    let mut regions: Vec<_> = assignment.regions.iter().collect();
    regions.sort_by_key(|r| r.z);

    for region in regions {
        let area = to_screen(frame, region.rect);
        match &region.content {
            RegionContent::Placeholder => {
                let element = &state.styles.placeholder;
                paint_box(painter, area, element, None, frame);
                paint_text(painter, area.center(), "No source on stage", element, frame, false);
            }
            RegionContent::Source { id, name } => {
                match state.source_textures.get(id) {
                    Some(texture) => {
                        painter.image(texture.id(), area, full_uv(), Color32::WHITE);
                    }
                    None => {
                        painter.rect_filled(area, Rounding::ZERO, ThemeColors::BG_LIGHT);
                    }
                }
                if region.z > 0 {
                    painter.rect_stroke(area, Rounding::ZERO, Stroke::new(2.0, Color32::WHITE));
                }

                let element = &state.styles.source_label;
                let font = font_size(element, frame);
                let label = Rect::from_min_size(
                    Pos2::new(area.left(), area.bottom() - font * 1.6),
                    Vec2::new((name.chars().count() as f32 * font * 0.6 + font).min(area.width()), font * 1.6),
                );
                paint_box(painter, label, element, None, frame);
                painter.text(
                    label.left_center() + Vec2::new(font * 0.5, 0.0),
                    Align2::LEFT_CENTER,
                    name,
                    FontId::proportional(font),
                    rgba_color32(element.text_color),
                );
            }
        }
    }
}

fn paint_ticker(
    painter: &egui::Painter,
    area: Rect,
    frame: Rect,
    text: &str,
    element: &ElementStyle,
    speed: f32,
    t: f64,
) {
    let font = FontId::proportional(font_size(element, frame));
    let galley = painter.layout_no_wrap(text.to_string(), font, rgba_color32(element.text_color));
    let text_width = galley.size().x / frame.width();
    let offset = ticker_offset(t, speed, text_width);
    let pos = Pos2::new(
        frame.left() + offset * frame.width(),
        area.center().y - galley.size().y / 2.0,
    );
    painter.with_clip_rect(area).galley(pos, galley, Color32::WHITE);
}

fn paint_box(painter: &egui::Painter, area: Rect, element: &ElementStyle, fill: Option<Color32>, frame: Rect) {
    let color = element.background.map(rgba_color32).or(fill).unwrap_or(Color32::TRANSPARENT);
    let scale = frame.height() / 720.0;
    painter.rect_filled(area, Rounding::same(element.corner_radius * scale), color);
}

fn paint_text(painter: &egui::Painter, center: Pos2, text: &str, element: &ElementStyle, frame: Rect, strong: bool) {
    let size = font_size(element, frame);
    let font = if strong { FontId::proportional(size * 1.05) } else { FontId::proportional(size) };
    painter.text(center, Align2::CENTER_CENTER, text, font, rgba_color32(element.text_color));
}

/// Blend toward white so dark theme colors stay readable on the card
fn lighten(color: Color32, amount: f32) -> Color32 {
    let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount.clamp(0.0, 1.0)) as u8;
    Color32::from_rgb(mix(color.r()), mix(color.g()), mix(color.b()))
}

fn font_size(element: &ElementStyle, frame: Rect) -> f32 {
    (frame.height() * element.font_scale).max(8.0)
}

/// Map a normalized rect into screen space
fn to_screen(frame: Rect, rect: NormRect) -> Rect {
    Rect::from_min_size(
        Pos2::new(frame.left() + rect.x * frame.width(), frame.top() + rect.y * frame.height()),
        Vec2::new(rect.w * frame.width(), rect.h * frame.height()),
    )
}

/// Largest rect with the image's aspect ratio inside `area`, centered
fn fit_inside(area: Rect, image: Vec2) -> Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return area;
    }
    let scale = (area.width() / image.x).min(area.height() / image.y);
    Rect::from_center_size(area.center(), image * scale)
}

fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_screen_maps_normalized_rect() {
        let frame = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(1600.0, 900.0));
        let rect = to_screen(frame, NormRect::new(0.5, 0.0, 0.5, 1.0));
        assert_eq!(rect.min, Pos2::new(810.0, 20.0));
        assert_eq!(rect.size(), Vec2::new(800.0, 900.0));
    }

    #[test]
    fn test_fit_inside_keeps_aspect() {
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 100.0));
        let fitted = fit_inside(area, Vec2::new(50.0, 50.0));
        assert_eq!(fitted.size(), Vec2::new(100.0, 100.0));
        assert_eq!(fitted.center(), area.center());
    }
}
