//! Branding state: banner text, logo and theme color

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::display_url::{DisplayUrl, UrlStore};

/// Branding input failures
#[derive(Debug, Error)]
pub enum BrandingError {
    #[error("invalid theme color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("logo could not be decoded: {0}")]
    InvalidLogo(#[from] image::ImageError),
}

/// Presentation style for the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayTemplate {
    /// Static centered box, with logo
    #[default]
    Classic,
    /// Full-width scrolling strip, no logo
    Ticker,
}

impl OverlayTemplate {
    pub const ALL: [OverlayTemplate; 2] = [OverlayTemplate::Classic, OverlayTemplate::Ticker];

    pub fn label(&self) -> &'static str {
        match self {
            OverlayTemplate::Classic => "Classic",
            OverlayTemplate::Ticker => "Ticker",
        }
    }
}

/// RGB theme color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ThemeColor {
    pub const BLUE: ThemeColor = ThemeColor::rgb(0x1e, 0x40, 0xaf);
    pub const RED: ThemeColor = ThemeColor::rgb(0xbe, 0x12, 0x3c);
    pub const GREEN: ThemeColor = ThemeColor::rgb(0x04, 0x78, 0x57);
    pub const PURPLE: ThemeColor = ThemeColor::rgb(0x7e, 0x22, 0xce);

    /// Swatches offered in the branding panel
    pub const PRESETS: [ThemeColor; 4] = [Self::BLUE, Self::RED, Self::GREEN, Self::PURPLE];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self::BLUE
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for ThemeColor {
    type Err = BrandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BrandingError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for ThemeColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ThemeColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A decoded logo and the display URL it is served under
#[derive(Debug)]
pub struct Logo {
    url: DisplayUrl,
    pub width: u32,
    pub height: u32,
    /// RGBA pixels
    pub pixels: Vec<u8>,
}

impl Logo {
    /// Decode an image blob (PNG, JPEG, GIF) and mint its display URL
    pub fn decode(bytes: Vec<u8>, urls: &UrlStore) -> Result<Self, BrandingError> {
        let image = image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            url: urls.create(bytes),
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Visual identity parameters
#[derive(Debug, Default)]
pub struct BrandingState {
    pub banner_text: String,
    pub logo: Option<Logo>,
    pub theme_color: ThemeColor,
}

impl BrandingState {
    pub fn has_banner(&self) -> bool {
        !self.banner_text.is_empty()
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.logo.as_ref().map(Logo::url)
    }
}
