use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::decode::decode_frame;
use crate::error::MirrorResult;
use crate::shutdown::ShutdownSignal;
use crate::slot::{LatestSlot, SlotValue};
use crate::source::FrameSource;

/// Pacing for one capture worker.
#[derive(Clone, Copy, Debug)]
pub struct CaptureOptions {
    /// Target capture rate; the worker never exceeds it.
    pub fps: u32,
    /// Recovery delay after a failed capture, independent of pacing.
    pub backoff: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            fps: 5,
            backoff: Duration::from_millis(400),
        }
    }
}

/// Spawns the capture thread for one source. The thread runs until
/// `shutdown` is signaled; it owns the source and publishes into `slot`.
pub fn spawn_capture_worker(
    source: Box<dyn FrameSource>,
    slot: Arc<LatestSlot>,
    shutdown: ShutdownSignal,
    opts: CaptureOptions,
) -> MirrorResult<JoinHandle<()>> {
    let name = format!("capture-{}", source.label());
    let handle = std::thread::Builder::new()
        .name(name)
        .spawn(move || run_capture_loop(source, &slot, &shutdown, opts))
        .context("spawn capture worker thread")?;
    Ok(handle)
}

/// The worker body: capture, decode, publish, pace; on failure publish the
/// unavailable marker and back off. Capture failures are never fatal — a
/// permanently broken source just keeps showing its placeholder.
pub fn run_capture_loop(
    mut source: Box<dyn FrameSource>,
    slot: &LatestSlot,
    shutdown: &ShutdownSignal,
    opts: CaptureOptions,
) {
    let interval = Duration::from_secs_f64(1.0 / opts.fps.max(1) as f64);
    tracing::info!(source = source.label(), "capture worker started");

    while !shutdown.is_stopped() {
        let start = Instant::now();
        let captured = source.capture().and_then(|bytes| decode_frame(&bytes));
        match captured {
            Ok(frame) => {
                slot.publish(SlotValue::Live(Arc::new(frame)));
                let elapsed = start.elapsed();
                if elapsed < interval {
                    shutdown.sleep_observing(interval - elapsed);
                }
            }
            Err(err) => {
                tracing::debug!(source = source.label(), error = %err, "capture failed");
                slot.publish(SlotValue::Unavailable);
                shutdown.sleep_observing(opts.backoff);
            }
        }
    }

    tracing::info!(source = source.label(), "capture worker stopped");
}
