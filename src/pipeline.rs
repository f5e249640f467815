use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::capture::{CaptureOptions, spawn_capture_worker};
use crate::display::{DisplaySink, run_display_loop};
use crate::error::{MirrorError, MirrorResult};
use crate::grid::GridLayout;
use crate::shutdown::ShutdownSignal;
use crate::slot::LatestSlot;
use crate::source::FrameSource;

#[derive(Clone, Copy, Debug)]
pub struct PipelineOptions {
    /// Capture pacing and display tick rate.
    pub fps: u32,
    pub layout: GridLayout,
    /// Worker recovery delay after a failed capture.
    pub backoff: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let capture = CaptureOptions::default();
        Self {
            fps: capture.fps,
            layout: GridLayout {
                columns: 2,
                max_tile_width: 540,
            },
            backoff: capture.backoff,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(cfg: &crate::config::MirrorConfig) -> Self {
        Self {
            fps: cfg.fps,
            layout: cfg.layout(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> MirrorResult<()> {
        if self.fps == 0 {
            return Err(MirrorError::config("fps must be >= 1"));
        }
        self.layout.validate()
    }
}

/// Wires the whole pipeline together and runs it to completion: one latest
/// slot and one capture thread per source, the display loop on the calling
/// thread. Returns once the sink requests quit (or the loop fails), after
/// broadcasting shutdown and giving workers a bounded window to exit.
pub fn run_pipeline(
    sources: Vec<Box<dyn FrameSource>>,
    sink: &mut dyn DisplaySink,
    opts: &PipelineOptions,
) -> MirrorResult<()> {
    opts.validate()?;
    if sources.is_empty() {
        return Err(MirrorError::config("no sources to mirror"));
    }

    let shutdown = ShutdownSignal::new();
    let slots: Vec<Arc<LatestSlot>> = sources.iter().map(|_| Arc::new(LatestSlot::new())).collect();
    let capture_opts = CaptureOptions {
        fps: opts.fps,
        backoff: opts.backoff,
    };

    let mut workers = Vec::with_capacity(sources.len());
    for (source, slot) in sources.into_iter().zip(&slots) {
        match spawn_capture_worker(source, Arc::clone(slot), shutdown.clone(), capture_opts) {
            Ok(handle) => workers.push(handle),
            Err(e) => {
                shutdown.request_stop();
                join_bounded(workers, worker_exit_window(opts));
                return Err(e);
            }
        }
    }

    let result = run_display_loop(&slots, &opts.layout, sink, &shutdown, opts.fps);

    shutdown.request_stop();
    join_bounded(workers, worker_exit_window(opts));
    result
}

/// How long to wait for workers after broadcasting shutdown. A worker's stop
/// latency is bounded by its pacing/backoff sleep plus one in-flight capture
/// call, so a short grace on top of the larger of the two suffices.
fn worker_exit_window(opts: &PipelineOptions) -> Duration {
    let interval = Duration::from_secs_f64(1.0 / opts.fps.max(1) as f64);
    opts.backoff.max(interval) + Duration::from_secs(1)
}

/// Best-effort join: never blocks past `window`. Workers are process-lifetime
/// daemons; one stuck in a blocking capture call is abandoned, not awaited.
fn join_bounded(workers: Vec<JoinHandle<()>>, window: Duration) {
    let deadline = Instant::now() + window;
    for handle in workers {
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        if handle.is_finished() {
            if handle.join().is_err() {
                tracing::warn!("capture worker panicked");
            }
        } else {
            tracing::warn!("capture worker did not exit in time, abandoning it");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::Frame;

    use super::*;

    struct NeverSink;

    impl DisplaySink for NeverSink {
        fn render(&mut self, _canvas: &Frame) -> MirrorResult<()> {
            panic!("pipeline must fail before rendering anything");
        }
        fn poll_quit(&mut self) -> bool {
            true
        }
    }

    #[test]
    fn empty_source_list_is_a_config_error() {
        let err = run_pipeline(Vec::new(), &mut NeverSink, &PipelineOptions::default());
        assert!(matches!(err, Err(MirrorError::Config(_))));
    }

    #[test]
    fn invalid_layout_is_rejected_before_spawning() {
        let opts = PipelineOptions {
            layout: GridLayout {
                columns: 0,
                max_tile_width: 540,
            },
            ..PipelineOptions::default()
        };
        let err = run_pipeline(Vec::new(), &mut NeverSink, &opts);
        assert!(matches!(err, Err(MirrorError::Config(_))));
    }
}
