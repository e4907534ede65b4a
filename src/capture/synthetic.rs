//! Test-pattern capture backend
//!
//! Stands in for real camera/screen devices. Every acquisition yields a
//! stream with a generated frame so the preview has something to draw.

use image::{Rgba, RgbaImage};
use tracing::debug;

use super::frame::CapturedFrame;
use super::stream::{MediaStream, MediaTrack, TrackKind};
use super::{CaptureBackend, CaptureError, CaptureRequest, SourceKind};

const PATTERN_WIDTH: u32 = 320;
const PATTERN_HEIGHT: u32 = 180;

/// Backend producing synthetic test-pattern sources
#[derive(Debug, Clone, Default)]
pub struct SyntheticBackend {
    denied: Vec<SourceKind>,
    unavailable: Vec<SourceKind>,
}

impl SyntheticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kinds that report a permission failure when acquired
    pub fn with_denied(mut self, denied: impl IntoIterator<Item = SourceKind>) -> Self {
        self.denied = denied.into_iter().collect();
        self
    }

    /// Kinds that report no device present
    pub fn with_unavailable(mut self, unavailable: impl IntoIterator<Item = SourceKind>) -> Self {
        self.unavailable = unavailable.into_iter().collect();
        self
    }
}

impl CaptureBackend for SyntheticBackend {
    fn acquire(&self, kind: SourceKind, request: CaptureRequest) -> Result<MediaStream, CaptureError> {
        if self.denied.contains(&kind) {
            return Err(CaptureError::PermissionDenied { kind });
        }
        if self.unavailable.contains(&kind) {
            return Err(CaptureError::DeviceUnavailable {
                kind,
                reason: "no device found".to_string(),
            });
        }

        let mut tracks = vec![MediaTrack::new(
            TrackKind::Video,
            format!("synthetic {}", kind),
            true,
        )];
        if request.audio {
            tracks.push(MediaTrack::new(
                TrackKind::Audio,
                "synthetic microphone",
                request.audio_enabled,
            ));
        }

        debug!("Synthetic {} stream with {} track(s)", kind, tracks.len());
        Ok(MediaStream::new(tracks).with_frame(test_pattern(kind)))
    }
}

/// Generate the still frame for a kind: a diagonal gradient for the camera,
/// a checkerboard for the screen.
pub fn test_pattern(kind: SourceKind) -> CapturedFrame {
    let image = match kind {
        SourceKind::Camera => RgbaImage::from_fn(PATTERN_WIDTH, PATTERN_HEIGHT, |x, y| {
            let r = (x * 255 / PATTERN_WIDTH) as u8;
            let g = (y * 255 / PATTERN_HEIGHT) as u8;
            Rgba([r / 2 + 40, g / 2 + 60, 140, 255])
        }),
        SourceKind::Screen => RgbaImage::from_fn(PATTERN_WIDTH, PATTERN_HEIGHT, |x, y| {
            if ((x / 20) + (y / 20)) % 2 == 0 {
                Rgba([52, 58, 70, 255])
            } else {
                Rgba([30, 34, 44, 255])
            }
        }),
    };
    CapturedFrame::from_rgba_image(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_stream_has_audio_in_requested_state() {
        let backend = SyntheticBackend::new();
        let stream = backend
            .acquire(SourceKind::Camera, CaptureRequest::for_kind(SourceKind::Camera, true))
            .unwrap();
        let audio: Vec<_> = stream.audio_tracks().collect();
        assert_eq!(audio.len(), 1);
        assert!(!audio[0].is_enabled());
        assert!(stream.latest_frame().is_some());
    }

    #[test]
    fn test_screen_stream_is_video_only() {
        let backend = SyntheticBackend::new();
        let stream = backend
            .acquire(SourceKind::Screen, CaptureRequest::for_kind(SourceKind::Screen, false))
            .unwrap();
        assert_eq!(stream.audio_tracks().count(), 0);
        assert_eq!(stream.tracks().len(), 1);
    }

    #[test]
    fn test_denied_kind_fails() {
        let backend = SyntheticBackend::new().with_denied([SourceKind::Camera]);
        let result = backend.acquire(SourceKind::Camera, CaptureRequest::for_kind(SourceKind::Camera, false));
        assert!(matches!(result, Err(CaptureError::PermissionDenied { kind: SourceKind::Camera })));
    }

    #[test]
    fn test_unavailable_kind_fails() {
        let backend = SyntheticBackend::new().with_unavailable([SourceKind::Screen]);
        let err = backend
            .acquire(SourceKind::Screen, CaptureRequest::for_kind(SourceKind::Screen, false))
            .unwrap_err();
        assert!(matches!(err, CaptureError::DeviceUnavailable { .. }));
        assert_eq!(err.kind(), SourceKind::Screen);
        assert!(backend
            .acquire(SourceKind::Camera, CaptureRequest::for_kind(SourceKind::Camera, false))
            .is_ok());
    }

    #[test]
    fn test_pattern_dimensions() {
        let frame = test_pattern(SourceKind::Screen);
        assert_eq!(frame.dimensions(), (PATTERN_WIDTH, PATTERN_HEIGHT));
    }
}
