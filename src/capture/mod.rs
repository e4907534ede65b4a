//! Capture Source Registry
//!
//! Tracks the live local capture handles (camera, screen) keyed by a stable
//! identifier, and owns their acquisition/release lifecycle. The actual
//! device access sits behind [`CaptureBackend`].

pub mod frame;
pub mod stream;
pub mod synthetic;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

pub use stream::MediaStream;
pub use synthetic::SyntheticBackend;

/// Kind of capture device feeding a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Camera,
    Screen,
}

impl SourceKind {
    /// The fixed identifier a source of this kind is registered under
    pub fn id(&self) -> SourceId {
        match self {
            SourceKind::Camera => SourceId::from("camera"),
            SourceKind::Screen => SourceId::from("screen"),
        }
    }

    /// Display name shown on the source tile
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Camera => "Camera",
            SourceKind::Screen => "Screen",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Camera => f.write_str("camera"),
            SourceKind::Screen => f.write_str("screen"),
        }
    }
}

/// Stable source identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One local capture feed
#[derive(Debug)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
    pub kind: SourceKind,
    pub stream: MediaStream,
}

/// Parameters passed to the backend when acquiring a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Include an audio track
    pub audio: bool,
    /// Enabled state the audio track must be created with
    pub audio_enabled: bool,
}

impl CaptureRequest {
    /// Request for the given kind, with the microphone mute flag applied
    pub fn for_kind(kind: SourceKind, muted: bool) -> Self {
        match kind {
            SourceKind::Camera => Self {
                audio: true,
                audio_enabled: !muted,
            },
            SourceKind::Screen => Self {
                audio: false,
                audio_enabled: false,
            },
        }
    }
}

/// Capture acquisition failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission to access the {kind} was denied")]
    PermissionDenied { kind: SourceKind },

    #[error("{kind} is unavailable: {reason}")]
    DeviceUnavailable { kind: SourceKind, reason: String },
}

impl CaptureError {
    pub fn kind(&self) -> SourceKind {
        match self {
            CaptureError::PermissionDenied { kind } => *kind,
            CaptureError::DeviceUnavailable { kind, .. } => *kind,
        }
    }
}

/// Environment access to capture devices
pub trait CaptureBackend: Send {
    /// Request a capture handle. Tracks must be created in the state the
    /// request asks for, never toggled after the fact.
    fn acquire(&self, kind: SourceKind, request: CaptureRequest) -> Result<MediaStream, CaptureError>;
}

/// Registry of live sources, at most one per kind
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a source of `kind` from the backend and register it.
    ///
    /// Re-acquiring a kind replaces (and stops) the previous entry. On
    /// failure nothing is registered and any prior entry is left alone.
    pub fn acquire(
        &mut self,
        backend: &dyn CaptureBackend,
        kind: SourceKind,
        request: CaptureRequest,
    ) -> Result<&Source, CaptureError> {
        let stream = match backend.acquire(kind, request) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to acquire {}: {}", kind, e);
                return Err(e);
            }
        };

        let id = kind.id();
        if self.release(&id) {
            info!("Replaced existing {} source", kind);
        }

        let index = self.sources.len();
        self.sources.push(Source {
            id,
            name: kind.display_name().to_string(),
            kind,
            stream,
        });
        info!("Acquired {} source", kind);

        Ok(&self.sources[index])
    }

    /// Stop and remove a source. Returns false if it was already absent.
    pub fn release(&mut self, id: &SourceId) -> bool {
        if let Some(pos) = self.sources.iter().position(|s| &s.id == id) {
            let source = self.sources.remove(pos);
            source.stream.stop();
            info!("Released {} source", source.kind);
            true
        } else {
            false
        }
    }

    /// Release every source
    pub fn release_all(&mut self) {
        for source in self.sources.drain(..) {
            source.stream.stop();
            info!("Released {} source", source.kind);
        }
    }

    pub fn get(&self, id: &SourceId) -> Option<&Source> {
        self.sources.iter().find(|s| &s.id == id)
    }

    pub fn get_kind(&self, kind: SourceKind) -> Option<&Source> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.get(id).is_some()
    }

    /// Sources in acquisition order
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Drop for SourceRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}
