//! Layout Renderer
//!
//! Maps the ordered on-stage sources onto regions of the preview frame.
//! Geometry is normalized: (0,0) is the top-left corner of the frame and
//! (1,1) the bottom-right.

use serde::{Deserialize, Serialize};

use crate::capture::{Source, SourceId, SourceRegistry};
use crate::stage::StageSelection;

/// Picture-in-picture inset size as a fraction of the frame
pub const PIP_INSET_SIZE: f32 = 0.25;
/// Gap between the inset and the frame's bottom/right edges
pub const PIP_INSET_MARGIN: f32 = 0.025;

/// Composition strategy for the staged sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Solo,
    Split,
    #[serde(rename = "pip")]
    PictureInPicture,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 3] = [LayoutMode::Solo, LayoutMode::Split, LayoutMode::PictureInPicture];

    pub fn label(&self) -> &'static str {
        match self {
            LayoutMode::Solo => "Solo",
            LayoutMode::Split => "Split",
            LayoutMode::PictureInPicture => "PiP",
        }
    }
}

/// Axis-aligned rectangle in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl NormRect {
    pub const FULL: NormRect = NormRect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// What a region displays
#[derive(Debug, Clone, PartialEq)]
pub enum RegionContent {
    /// "Add a source" placeholder shown when nothing is staged
    Placeholder,
    /// A live source
    Source { id: SourceId, name: String },
}

/// A rectangle of the frame assigned to one piece of content
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub content: RegionContent,
    pub rect: NormRect,
    /// Stacking order within the layout; higher draws above lower
    pub z: u8,
}

/// Result of rendering a layout, regions in back-to-front order
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAssignment {
    pub mode: LayoutMode,
    pub regions: Vec<Region>,
}

impl RegionAssignment {
    /// Ids of the sources actually visible, in draw order
    pub fn visible_sources(&self) -> Vec<&SourceId> {
        self.regions
            .iter()
            .filter_map(|r| match &r.content {
                RegionContent::Source { id, .. } => Some(id),
                RegionContent::Placeholder => None,
            })
            .collect()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.regions.as_slice(),
            [Region { content: RegionContent::Placeholder, .. }]
        )
    }
}

/// Look up the staged ids in the registry, in stage order.
///
/// Ids with no matching source (e.g. released after being staged) are
/// treated as absent and skipped.
pub fn resolve_stage<'a>(selection: &StageSelection, registry: &'a SourceRegistry) -> Vec<&'a Source> {
    selection
        .ids()
        .iter()
        .filter_map(|id| registry.get(id))
        .collect()
}

/// Map up to two ordered sources onto frame regions
pub fn render(sources: &[&Source], mode: LayoutMode) -> RegionAssignment {
    // Anything past the stage capacity is ignored by the `..` arm
    let regions = match sources {
        [] => vec![Region {
            content: RegionContent::Placeholder,
            rect: NormRect::FULL,
            z: 0,
        }],
        [only] => vec![source_region(only, NormRect::FULL, 0)],
        [first, second, ..] => match mode {
            LayoutMode::Solo => vec![source_region(first, NormRect::FULL, 0)],
            LayoutMode::Split => vec![
                source_region(first, NormRect::new(0.0, 0.0, 0.5, 1.0), 0),
                source_region(second, NormRect::new(0.5, 0.0, 0.5, 1.0), 0),
            ],
            LayoutMode::PictureInPicture => vec![
                source_region(first, NormRect::FULL, 0),
                source_region(second, pip_inset_rect(), 1),
            ],
        },
    };

    RegionAssignment { mode, regions }
}

/// The inset anchored to the bottom-right corner
pub fn pip_inset_rect() -> NormRect {
    NormRect::new(
        1.0 - PIP_INSET_MARGIN - PIP_INSET_SIZE,
        1.0 - PIP_INSET_MARGIN - PIP_INSET_SIZE,
        PIP_INSET_SIZE,
        PIP_INSET_SIZE,
    )
}

fn source_region(source: &Source, rect: NormRect, z: u8) -> Region {
    Region {
        content: RegionContent::Source {
            id: source.id.clone(),
            name: source.name.clone(),
        },
        rect,
        z,
    }
}
