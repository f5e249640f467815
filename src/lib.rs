#![forbid(unsafe_code)]

pub mod capture;
pub mod config;
pub mod decode;
pub mod display;
pub mod display_ffplay;
pub mod error;
pub mod frame;
pub mod grid;
pub mod pipeline;
pub mod shutdown;
pub mod slot;
pub mod source;

pub use capture::{CaptureOptions, run_capture_loop, spawn_capture_worker};
pub use config::MirrorConfig;
pub use decode::{decode_frame, scale_to_width};
pub use display::{DisplaySink, run_display_loop};
pub use display_ffplay::{FfplaySink, is_ffplay_on_path};
pub use error::{MirrorError, MirrorResult};
pub use frame::{CHANNELS, Frame};
pub use grid::{GridLayout, PLACEHOLDER_TILE_HEIGHT, compose_grid};
pub use pipeline::{PipelineOptions, run_pipeline};
pub use shutdown::ShutdownSignal;
pub use slot::{LatestSlot, SlotValue};
pub use source::{AdbFrameSource, FrameSource};
