use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::error::{MirrorError, MirrorResult};
use crate::grid::GridLayout;

/// Runtime configuration, loaded from a JSON file.
///
/// `sources` is the ordered list of device serials (or `ip:port` entries from
/// `adb connect`); its order fixes each device's position in the grid.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MirrorConfig {
    pub sources: Vec<String>,

    /// Capture pacing and display tick rate.
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Grid width in tiles.
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Shrink-only per-tile width cap; 0 disables scaling.
    #[serde(default = "default_max_tile_width")]
    pub max_tile_width: u32,

    /// Path to the adb binary.
    #[serde(default = "default_adb_path")]
    pub adb_path: String,
}

fn default_fps() -> u32 {
    5
}

fn default_columns() -> u32 {
    2
}

fn default_max_tile_width() -> u32 {
    540
}

fn default_adb_path() -> String {
    "adb".to_string()
}

impl MirrorConfig {
    pub fn load(path: &Path) -> MirrorResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self =
            serde_json::from_reader(BufReader::new(f)).context("parse config JSON")?;
        Ok(cfg)
    }

    pub fn validate(&self) -> MirrorResult<()> {
        if self.sources.is_empty() {
            return Err(MirrorError::config(
                "no sources configured; add device serials or ip:port entries under 'sources'",
            ));
        }
        if self.fps == 0 {
            return Err(MirrorError::config("fps must be >= 1"));
        }
        self.layout().validate()
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout {
            columns: self.columns,
            max_tile_width: self.max_tile_width,
        }
    }
}
