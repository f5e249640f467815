use std::io::Write as _;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::display::DisplaySink;
use crate::error::{MirrorError, MirrorResult};
use crate::frame::Frame;

pub fn is_ffplay_on_path() -> bool {
    Command::new("ffplay")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Presents canvases by piping raw RGB24 video into an `ffplay` window.
///
/// ffplay's rawvideo input is fixed-size, so the viewer process is
/// (re)spawned whenever the canvas dimensions change; in steady state that
/// happens once. Closing the window ends the child, which surfaces as a
/// quit request on the next poll.
pub struct FfplaySink {
    fps: u32,
    title: String,
    viewer: Option<Viewer>,
    closed: bool,
}

struct Viewer {
    child: Child,
    stdin: ChildStdin,
    width: u32,
    height: u32,
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl FfplaySink {
    pub fn new(fps: u32, title: impl Into<String>) -> MirrorResult<Self> {
        if !is_ffplay_on_path() {
            return Err(MirrorError::display(
                "ffplay is required for the viewer window, but was not found on PATH",
            ));
        }
        Ok(Self {
            fps: fps.max(1),
            title: title.into(),
            viewer: None,
            closed: false,
        })
    }

    fn spawn_viewer(&self, width: u32, height: u32) -> MirrorResult<Viewer> {
        let mut cmd = Command::new("ffplay");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pixel_format",
            "rgb24",
            "-video_size",
            &format!("{width}x{height}"),
            "-framerate",
            &self.fps.to_string(),
            "-window_title",
            &self.title,
            "-i",
            "pipe:0",
        ]);

        let mut child = cmd.spawn().map_err(|e| {
            MirrorError::display(format!(
                "failed to spawn ffplay (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MirrorError::display("failed to open ffplay stdin (unexpected)"))?;

        Ok(Viewer {
            child,
            stdin,
            width,
            height,
        })
    }
}

impl DisplaySink for FfplaySink {
    fn render(&mut self, canvas: &Frame) -> MirrorResult<()> {
        if self.closed {
            return Ok(());
        }

        let needs_spawn = match &self.viewer {
            Some(v) => (v.width, v.height) != (canvas.width, canvas.height),
            None => true,
        };
        if needs_spawn {
            if let Some(old) = self.viewer.take() {
                tracing::info!(
                    from_w = old.width,
                    from_h = old.height,
                    to_w = canvas.width,
                    to_h = canvas.height,
                    "canvas size changed, restarting viewer"
                );
            }
            self.viewer = Some(self.spawn_viewer(canvas.width, canvas.height)?);
        }

        if let Some(viewer) = self.viewer.as_mut()
            && let Err(e) = viewer.stdin.write_all(&canvas.data)
        {
            // The user closed the window; report quit on the next poll.
            tracing::debug!(error = %e, "viewer pipe closed");
            self.closed = true;
        }
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        if self.closed {
            return true;
        }
        let Some(viewer) = self.viewer.as_mut() else {
            return false;
        };
        match viewer.child.try_wait() {
            Ok(None) => false,
            Ok(Some(_)) | Err(_) => {
                self.closed = true;
                true
            }
        }
    }
}
