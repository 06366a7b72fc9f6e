use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use checkin_scan::{CaptureError, Frame, FrameSource};

/// Frame source backed by a keyboard-wedge reader on stdin.
///
/// USB wedge scanners type the decoded payload followed by a newline,
/// so each stdin line becomes one pre-decoded frame. `grab` waits for
/// the next line; EOF closes the stream.
pub struct StdinWedgeSource {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinWedgeSource {
    /// Attach to the process stdin.
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for StdinWedgeSource {
    async fn open(&self) -> Result<(), CaptureError> {
        // stdin needs no acquisition; permission handling belongs to
        // camera-backed sources.
        Ok(())
    }

    async fn grab(&self) -> Result<Option<Frame>, CaptureError> {
        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) => Ok(Some(Frame::from_wedge(line))),
            Ok(None) => Err(CaptureError::Closed),
            Err(e) => Err(CaptureError::Device(e.to_string())),
        }
    }

    async fn release(&self) {
        // Nothing to release for stdin.
    }
}
