//! Overlay Compositor
//!
//! Layers branding elements over a rendered layout. The result is a flat,
//! back-to-front list of layers that the preview paints in order:
//! layout regions, live badge, logo, banner, highlighted chat card.

pub mod branding;
pub mod display_url;
pub mod widgets;

use crate::chat::ChatMessage;
use crate::layout::{NormRect, RegionAssignment};

pub use branding::{BrandingError, BrandingState, Logo, OverlayTemplate, ThemeColor};
pub use display_url::UrlStore;

/// Text shown in the live badge
pub const LIVE_BADGE_TEXT: &str = "LIVE";

/// Ticker scroll speed, in frame widths per second
pub const TICKER_SPEED: f32 = 0.12;

const LIVE_BADGE_RECT: NormRect = NormRect::new(0.02, 0.035, 0.09, 0.065);
const LOGO_RECT: NormRect = NormRect::new(0.86, 0.035, 0.12, 0.2);
const CLASSIC_BANNER_RECT: NormRect = NormRect::new(0.125, 0.80, 0.75, 0.11);
const TICKER_RECT: NormRect = NormRect::new(0.0, 0.89, 1.0, 0.11);
const HIGHLIGHT_RECT: NormRect = NormRect::new(0.02, 0.58, 0.45, 0.18);

/// How the banner text is presented
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerStyle {
    /// Fixed-width box centred at the bottom
    Boxed,
    /// Full-width strip, text scrolling right-to-left
    Ticker { speed: f32 },
}

/// One drawable overlay element
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayLayer {
    Layout(RegionAssignment),
    LiveBadge {
        rect: NormRect,
        text: &'static str,
    },
    Logo {
        rect: NormRect,
        url: String,
    },
    Banner {
        rect: NormRect,
        text: String,
        color: ThemeColor,
        style: BannerStyle,
    },
    HighlightedChat {
        rect: NormRect,
        author: String,
        text: String,
        accent: ThemeColor,
    },
}

/// State the compositor reads, borrowed from the studio
#[derive(Debug, Clone, Copy)]
pub struct OverlayInputs<'a> {
    pub live: bool,
    pub template: OverlayTemplate,
    pub branding: &'a BrandingState,
    pub highlighted: Option<&'a ChatMessage>,
}

/// Composed frame description, layers back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub layers: Vec<OverlayLayer>,
}

impl Composition {
    pub fn layout(&self) -> Option<&RegionAssignment> {
        self.layers.iter().find_map(|l| match l {
            OverlayLayer::Layout(assignment) => Some(assignment),
            _ => None,
        })
    }

    pub fn banner(&self) -> Option<(&str, BannerStyle)> {
        self.layers.iter().find_map(|l| match l {
            OverlayLayer::Banner { text, style, .. } => Some((text.as_str(), *style)),
            _ => None,
        })
    }

    pub fn has_logo(&self) -> bool {
        self.layers.iter().any(|l| matches!(l, OverlayLayer::Logo { .. }))
    }

    pub fn has_live_badge(&self) -> bool {
        self.layers.iter().any(|l| matches!(l, OverlayLayer::LiveBadge { .. }))
    }
}

/// Stack the overlay elements above a layout
pub fn compose(layout: RegionAssignment, inputs: OverlayInputs<'_>) -> Composition {
    let mut layers = vec![OverlayLayer::Layout(layout)];
    let color = inputs.branding.theme_color;

    if inputs.live {
        layers.push(OverlayLayer::LiveBadge {
            rect: LIVE_BADGE_RECT,
            text: LIVE_BADGE_TEXT,
        });
    }

    if let (OverlayTemplate::Classic, Some(url)) = (inputs.template, inputs.branding.logo_url()) {
        layers.push(OverlayLayer::Logo {
            rect: LOGO_RECT,
            url: url.to_string(),
        });
    }

    if inputs.branding.has_banner() {
        let (rect, style) = match inputs.template {
            OverlayTemplate::Classic => (CLASSIC_BANNER_RECT, BannerStyle::Boxed),
            OverlayTemplate::Ticker => (TICKER_RECT, BannerStyle::Ticker { speed: TICKER_SPEED }),
        };
        layers.push(OverlayLayer::Banner {
            rect,
            text: inputs.branding.banner_text.clone(),
            color,
            style,
        });
    }

    if let Some(message) = inputs.highlighted {
        layers.push(OverlayLayer::HighlightedChat {
            rect: HIGHLIGHT_RECT,
            author: message.author.clone(),
            text: message.text.clone(),
            accent: color,
        });
    }

    Composition { layers }
}

/// Horizontal offset of ticker text at time `t`, in frame widths.
///
/// Text enters from the right edge and scrolls left until it has fully left
/// the frame, then restarts. `text_width` is also in frame widths.
pub fn ticker_offset(t_secs: f64, speed: f32, text_width: f32) -> f32 {
    let cycle = 1.0 + text_width.max(0.0);
    let travelled = (t_secs as f32 * speed).rem_euclid(cycle);
    1.0 - travelled
}
