use std::collections::VecDeque;

use tokio::sync::Mutex;

/// A single sampled video frame.
///
/// The scan loop never interprets frame contents itself; decoding is
/// delegated to a [`QrDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels (0 for sources that deliver pre-decoded data)
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw frame bytes, layout defined by the source
    pub data: Vec<u8>,
}

impl Frame {
    /// Frame wrapping already-decoded payload bytes, as delivered by
    /// keyboard-wedge scanner hardware.
    pub fn from_wedge(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            width: 0,
            height: 0,
            data: payload.into(),
        }
    }
}

/// Custom error type for frame capture
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// Camera access denied by the user or the OS
    #[error("Camera access denied")]
    PermissionDenied,

    /// Device-level failure while the stream was live
    #[error("Capture device error: {0}")]
    Device(String),

    /// The stream ended and no further frames will arrive
    #[error("Capture stream closed")]
    Closed,
}

/// Source of live frames: a camera stream, a capture card, or a
/// keyboard-wedge adapter.
///
/// The controller exclusively owns its source for the duration of a
/// session and releases it on stop or teardown.
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    /// Acquire the underlying stream. Permission denial surfaces as
    /// [`CaptureError::PermissionDenied`].
    async fn open(&self) -> Result<(), CaptureError>;

    /// Sample the next frame. `Ok(None)` means no frame was ready this
    /// tick; [`CaptureError::Closed`] means the stream ended.
    async fn grab(&self) -> Result<Option<Frame>, CaptureError>;

    /// Release all acquired tracks. Must be safe to call repeatedly
    /// and when nothing is open.
    async fn release(&self);
}

/// Decoder that extracts a machine-readable payload from a frame
pub trait QrDecoder: Send + Sync {
    /// Attempt to decode a payload; `None` when the frame holds no code.
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// Decoder for keyboard-wedge sources whose frames already carry the
/// decoded token bytes. Blank frames decode to `None`.
pub struct WedgeDecoder;

impl QrDecoder for WedgeDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        let token = std::str::from_utf8(&frame.data).ok()?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

/// In-memory frame source fed from a fixed script.
///
/// Used for wiring demos and controller tests; once the script is
/// exhausted the source reports [`CaptureError::Closed`].
pub struct ScriptedFrameSource {
    frames: Mutex<VecDeque<Option<Frame>>>,
    deny_permission: bool,
}

impl ScriptedFrameSource {
    /// Source that will replay the given frames in order. `None`
    /// entries model ticks where the camera produced no usable frame.
    pub fn new(frames: Vec<Option<Frame>>) -> Self {
        Self {
            frames: Mutex::new(frames.into()),
            deny_permission: false,
        }
    }

    /// Source whose `open` call fails with a permission error.
    pub fn denied() -> Self {
        Self {
            frames: Mutex::new(VecDeque::new()),
            deny_permission: true,
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for ScriptedFrameSource {
    async fn open(&self) -> Result<(), CaptureError> {
        if self.deny_permission {
            Err(CaptureError::PermissionDenied)
        } else {
            Ok(())
        }
    }

    async fn grab(&self) -> Result<Option<Frame>, CaptureError> {
        match self.frames.lock().await.pop_front() {
            Some(frame) => Ok(frame),
            None => Err(CaptureError::Closed),
        }
    }

    async fn release(&self) {
        self.frames.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedge_decoder_trims_token() {
        let decoder = WedgeDecoder;
        let frame = Frame::from_wedge("  abc123xyz \n");
        assert_eq!(decoder.decode(&frame), Some("abc123xyz".to_string()));
    }

    #[test]
    fn test_wedge_decoder_rejects_blank_frames() {
        let decoder = WedgeDecoder;
        assert_eq!(decoder.decode(&Frame::from_wedge("   ")), None);
        assert_eq!(decoder.decode(&Frame::from_wedge(vec![0xff, 0xfe])), None);
    }

    #[tokio::test]
    async fn test_scripted_source_replays_then_closes() {
        let source = ScriptedFrameSource::new(vec![Some(Frame::from_wedge("t1")), None]);

        source.open().await.unwrap();
        assert!(source.grab().await.unwrap().is_some());
        assert!(source.grab().await.unwrap().is_none());
        assert!(matches!(source.grab().await, Err(CaptureError::Closed)));
    }

    #[tokio::test]
    async fn test_denied_source_fails_open() {
        let source = ScriptedFrameSource::denied();
        assert!(matches!(
            source.open().await,
            Err(CaptureError::PermissionDenied)
        ));
    }
}
