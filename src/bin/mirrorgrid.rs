use std::path::PathBuf;

use clap::Parser;
use mirrorgrid::{AdbFrameSource, FfplaySink, FrameSource, MirrorConfig, PipelineOptions};

#[derive(Parser, Debug)]
#[command(name = "mirrorgrid", version)]
struct Cli {
    /// JSON config listing device serials (or ip:port from `adb connect`).
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Override the configured display/capture rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Override the configured grid width in tiles.
    #[arg(long)]
    columns: Option<u32>,

    /// Override the configured per-tile width cap (0 disables scaling).
    #[arg(long)]
    max_tile_width: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut cfg = MirrorConfig::load(&cli.config)?;
    if let Some(fps) = cli.fps {
        cfg.fps = fps;
    }
    if let Some(columns) = cli.columns {
        cfg.columns = columns;
    }
    if let Some(max_tile_width) = cli.max_tile_width {
        cfg.max_tile_width = max_tile_width;
    }
    cfg.validate()?;

    let sources: Vec<Box<dyn FrameSource>> = cfg
        .sources
        .iter()
        .map(|serial| {
            Box::new(AdbFrameSource::new(&cfg.adb_path, serial)) as Box<dyn FrameSource>
        })
        .collect();

    let mut sink = FfplaySink::new(cfg.fps, "mirrorgrid")?;
    let opts = PipelineOptions::from_config(&cfg);
    mirrorgrid::run_pipeline(sources, &mut sink, &opts)?;
    Ok(())
}
