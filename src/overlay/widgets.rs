//! Paint styles for overlay elements

/// Style for a boxed overlay element (badge, card, banner)
#[derive(Debug, Clone)]
pub struct ElementStyle {
    /// Background color (RGBA); `None` uses the theme color
    pub background: Option<[f32; 4]>,
    /// Text color (RGBA)
    pub text_color: [f32; 4],
    /// Border radius
    pub corner_radius: f32,
    /// Font size relative to frame height
    pub font_scale: f32,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            background: None,
            text_color: [1.0, 1.0, 1.0, 1.0],
            corner_radius: 8.0,
            font_scale: 0.04,
        }
    }
}

/// Styles for every overlay element the preview draws
#[derive(Debug, Clone)]
pub struct OverlayStyles {
    pub live_badge: ElementStyle,
    pub banner: ElementStyle,
    pub ticker: ElementStyle,
    pub chat_card: ElementStyle,
    pub source_label: ElementStyle,
    pub placeholder: ElementStyle,
}

impl Default for OverlayStyles {
    fn default() -> Self {
        Self {
            live_badge: ElementStyle {
                background: Some([0.86, 0.15, 0.15, 1.0]),
                corner_radius: 6.0,
                font_scale: 0.035,
                ..Default::default()
            },
            banner: ElementStyle {
                font_scale: 0.045,
                ..Default::default()
            },
            ticker: ElementStyle {
                corner_radius: 0.0,
                font_scale: 0.045,
                ..Default::default()
            },
            chat_card: ElementStyle {
                background: Some([0.07, 0.07, 0.09, 0.8]),
                font_scale: 0.035,
                ..Default::default()
            },
            source_label: ElementStyle {
                background: Some([0.0, 0.0, 0.0, 0.5]),
                corner_radius: 0.0,
                font_scale: 0.03,
                ..Default::default()
            },
            placeholder: ElementStyle {
                background: Some([0.0, 0.0, 0.0, 1.0]),
                text_color: [0.63, 0.63, 0.69, 1.0],
                corner_radius: 0.0,
                font_scale: 0.035,
            },
        }
    }
}

/// Convert a float RGBA quadruple to 8-bit channels with an extra opacity factor
pub fn rgba8(color: [f32; 4], opacity: f32) -> [u8; 4] {
    [
        (color[0].clamp(0.0, 1.0) * 255.0) as u8,
        (color[1].clamp(0.0, 1.0) * 255.0) as u8,
        (color[2].clamp(0.0, 1.0) * 255.0) as u8,
        ((color[3] * opacity).clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_clamps() {
        assert_eq!(rgba8([1.0, 0.0, 2.0, 1.0], 1.0), [255, 0, 255, 255]);
        assert_eq!(rgba8([1.0, 1.0, 1.0, 1.0], 0.0)[3], 0);
    }
}
