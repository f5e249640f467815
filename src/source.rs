use std::process::{Command, Stdio};

use crate::error::{MirrorError, MirrorResult};

/// Produces encoded still images for one source, on demand.
///
/// `capture` may block for as long as the underlying transport needs (the
/// transport owns its own timeout) but must eventually return. Failures are
/// opaque to the caller; the capture worker treats them all the same way.
pub trait FrameSource: Send {
    /// Stable name used in logs and diagnostics.
    fn label(&self) -> &str;

    /// One encoded frame, or a capture failure.
    fn capture(&mut self) -> MirrorResult<Vec<u8>>;
}

/// Captures PNG frames from an Android device via `adb exec-out screencap`.
#[derive(Clone, Debug)]
pub struct AdbFrameSource {
    adb_path: String,
    serial: String,
}

impl AdbFrameSource {
    pub fn new(adb_path: impl Into<String>, serial: impl Into<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
            serial: serial.into(),
        }
    }
}

impl FrameSource for AdbFrameSource {
    fn label(&self) -> &str {
        &self.serial
    }

    fn capture(&mut self) -> MirrorResult<Vec<u8>> {
        let output = Command::new(&self.adb_path)
            .args(["-s", &self.serial, "exec-out", "screencap", "-p"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                MirrorError::capture(format!(
                    "failed to run '{}' for {}: {e}",
                    self.adb_path, self.serial
                ))
            })?;

        if !output.status.success() {
            return Err(MirrorError::capture(format!(
                "screencap on {} exited with {}",
                self.serial, output.status
            )));
        }
        if output.stdout.is_empty() {
            return Err(MirrorError::capture(format!(
                "screencap on {} returned no bytes",
                self.serial
            )));
        }
        Ok(output.stdout)
    }
}
