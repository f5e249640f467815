use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::MirrorResult;
use crate::frame::Frame;
use crate::grid::{GridLayout, compose_grid};
use crate::shutdown::ShutdownSignal;
use crate::slot::LatestSlot;

/// Where composed canvases go, one per display tick.
pub trait DisplaySink {
    /// Presents one canvas; may block until displayed.
    fn render(&mut self, canvas: &Frame) -> MirrorResult<()>;

    /// Non-blocking quit check, polled once per tick.
    fn poll_quit(&mut self) -> bool;
}

/// Drives display ticks at roughly `fps`, decoupled from every source's own
/// capture rate. Each tick samples all slots, substitutes placeholders for
/// absent or unavailable sources, composes the grid and hands it to the
/// sink. Returns when the sink requests quit or `shutdown` is signaled;
/// broadcasting the shutdown to workers is the caller's job.
pub fn run_display_loop(
    slots: &[Arc<LatestSlot>],
    layout: &GridLayout,
    sink: &mut dyn DisplaySink,
    shutdown: &ShutdownSignal,
    fps: u32,
) -> MirrorResult<()> {
    let interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    tracing::info!(sources = slots.len(), fps, "display loop started");

    loop {
        let start = Instant::now();

        let sampled: Vec<_> = slots.iter().map(|slot| slot.latest()).collect();
        let tiles: Vec<Option<&Frame>> = sampled
            .iter()
            .map(|value| value.as_ref().and_then(|v| v.frame()))
            .collect();
        let canvas = compose_grid(&tiles, layout);
        sink.render(&canvas)?;

        if sink.poll_quit() {
            tracing::info!("sink requested quit");
            return Ok(());
        }
        if shutdown.is_stopped() {
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed < interval {
            shutdown.sleep_observing(interval - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::slot::SlotValue;

    use super::*;

    /// Records every canvas it is handed and quits after a fixed number of
    /// ticks.
    struct CountingSink {
        rendered: Vec<(u32, u32)>,
        quit_after: usize,
    }

    impl DisplaySink for CountingSink {
        fn render(&mut self, canvas: &Frame) -> MirrorResult<()> {
            self.rendered.push((canvas.width, canvas.height));
            Ok(())
        }

        fn poll_quit(&mut self) -> bool {
            self.rendered.len() >= self.quit_after
        }
    }

    fn layout() -> GridLayout {
        GridLayout {
            columns: 2,
            max_tile_width: 100,
        }
    }

    #[test]
    fn quit_request_ends_the_loop() {
        let slots = vec![Arc::new(LatestSlot::new())];
        let mut sink = CountingSink {
            rendered: Vec::new(),
            quit_after: 3,
        };
        let shutdown = ShutdownSignal::new();
        run_display_loop(&slots, &layout(), &mut sink, &shutdown, 1000).unwrap();
        assert_eq!(sink.rendered.len(), 3);
    }

    #[test]
    fn unchanged_slots_redraw_the_same_canvas_each_tick() {
        let slot = Arc::new(LatestSlot::new());
        slot.publish(SlotValue::Live(Arc::new(Frame::black(40, 20))));
        let slots = vec![slot];
        let mut sink = CountingSink {
            rendered: Vec::new(),
            quit_after: 4,
        };
        let shutdown = ShutdownSignal::new();
        run_display_loop(&slots, &layout(), &mut sink, &shutdown, 1000).unwrap();
        assert_eq!(sink.rendered.len(), 4);
        assert!(sink.rendered.iter().all(|&dims| dims == (40, 20)));
    }

    #[test]
    fn external_shutdown_ends_the_loop() {
        let slots = vec![Arc::new(LatestSlot::new())];
        let mut sink = CountingSink {
            rendered: Vec::new(),
            quit_after: usize::MAX,
        };
        let shutdown = ShutdownSignal::new();
        shutdown.request_stop();
        run_display_loop(&slots, &layout(), &mut sink, &shutdown, 1000).unwrap();
        assert_eq!(sink.rendered.len(), 1);
    }

    #[test]
    fn render_errors_propagate() {
        struct BrokenSink;
        impl DisplaySink for BrokenSink {
            fn render(&mut self, _canvas: &Frame) -> MirrorResult<()> {
                Err(crate::error::MirrorError::display("gone"))
            }
            fn poll_quit(&mut self) -> bool {
                false
            }
        }

        let slots = vec![Arc::new(LatestSlot::new())];
        let shutdown = ShutdownSignal::new();
        let err = run_display_loop(&slots, &layout(), &mut BrokenSink, &shutdown, 1000);
        assert!(err.is_err());
    }
}
