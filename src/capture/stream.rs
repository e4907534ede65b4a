//! Media stream handles and their tracks
//!
//! A [`MediaStream`] is the live handle returned by a capture backend. It
//! owns one or more tracks; dropping the stream stops every track.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::frame::CapturedFrame;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug)]
struct TrackState {
    enabled: AtomicBool,
    stopped: AtomicBool,
    enable_changes: AtomicUsize,
}

/// A single audio or video track
///
/// Cloning yields another handle to the same underlying track.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    kind: TrackKind,
    label: String,
    state: Arc<TrackState>,
}

impl MediaTrack {
    /// Create a track in the given enabled state
    pub fn new(kind: TrackKind, label: impl Into<String>, enabled: bool) -> Self {
        Self {
            kind,
            label: label.into(),
            state: Arc::new(TrackState {
                enabled: AtomicBool::new(enabled),
                stopped: AtomicBool::new(false),
                enable_changes: AtomicUsize::new(0),
            }),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the track. Setting the current value is a no-op.
    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.state.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            self.state.enable_changes.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Number of times the enabled flag actually changed since creation
    pub fn enable_changes(&self) -> usize {
        self.state.enable_changes.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped.load(Ordering::SeqCst)
    }

    /// Stop the track. Idempotent.
    pub fn stop(&self) {
        self.state.stopped.store(true, Ordering::SeqCst);
    }
}

/// A live capture handle
#[derive(Debug)]
pub struct MediaStream {
    tracks: Vec<MediaTrack>,
    frame: Option<CapturedFrame>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks, frame: None }
    }

    /// Attach the most recent frame produced for this stream
    pub fn with_frame(mut self, frame: CapturedFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Audio)
    }

    pub fn latest_frame(&self) -> Option<&CapturedFrame> {
        self.frame.as_ref()
    }

    /// Stop every track that is still running
    pub fn stop(&self) {
        for track in self.tracks.iter().filter(|t| !t.is_stopped()) {
            track.stop();
            debug!("Stopped track {}", track.label());
        }
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        self.stop();
    }
}
