use crate::decode::scale_to_width;
use crate::error::{MirrorError, MirrorResult};
use crate::frame::{CHANNELS, Frame};

/// Height of the black tile substituted for a source with no displayable
/// frame. Width follows the configured tile width.
pub const PLACEHOLDER_TILE_HEIGHT: u32 = 400;

#[derive(Clone, Copy, Debug)]
pub struct GridLayout {
    /// Tiles per row, left-to-right in source order.
    pub columns: u32,
    /// Shrink-only width cap per tile; 0 disables scaling.
    pub max_tile_width: u32,
}

impl GridLayout {
    pub fn validate(&self) -> MirrorResult<()> {
        if self.columns == 0 {
            return Err(MirrorError::config("grid columns must be >= 1"));
        }
        Ok(())
    }

    fn placeholder(&self) -> Frame {
        Frame::black(self.max_tile_width.max(1), PLACEHOLDER_TILE_HEIGHT)
    }
}

/// Assembles one canvas from per-source tiles, in source order.
///
/// `None` entries (sources that never produced, or whose last capture
/// failed) become black placeholder tiles. Real frames are shrunk to the
/// layout's width cap, grouped into rows of `columns`, then normalized:
/// within a row every tile is padded with black below to the row's tallest
/// tile and on the right to the row's widest tile. Rows stack top-to-bottom.
/// A short final row leaves the remainder of the canvas width black.
///
/// Total: any tile list, including the empty one, yields a non-degenerate
/// canvas.
pub fn compose_grid(tiles: &[Option<&Frame>], layout: &GridLayout) -> Frame {
    let prepared: Vec<Frame> = tiles
        .iter()
        .map(|tile| match tile {
            Some(frame) => scale_to_width(frame, layout.max_tile_width),
            None => layout.placeholder(),
        })
        .collect();

    if prepared.is_empty() {
        return layout.placeholder();
    }

    let columns = layout.columns.max(1) as usize;

    struct Row {
        start: usize,
        len: usize,
        height: u32,
        cell_width: u32,
    }

    let mut rows = Vec::new();
    let mut start = 0;
    while start < prepared.len() {
        let len = columns.min(prepared.len() - start);
        let row = &prepared[start..start + len];
        rows.push(Row {
            start,
            len,
            height: row.iter().map(|t| t.height).max().unwrap_or(1),
            cell_width: row.iter().map(|t| t.width).max().unwrap_or(1),
        });
        start += len;
    }

    let canvas_width = rows
        .iter()
        .map(|r| r.cell_width * r.len as u32)
        .max()
        .unwrap_or(1);
    let canvas_height = rows.iter().map(|r| r.height).sum::<u32>();

    let mut canvas = Frame::black(canvas_width, canvas_height);
    let mut y_off = 0u32;
    for row in &rows {
        for col in 0..row.len {
            let tile = &prepared[row.start + col];
            blit(&mut canvas, tile, col as u32 * row.cell_width, y_off);
        }
        y_off += row.height;
    }
    canvas
}

/// Copies `src` into `dst` with its top-left corner at (x, y). The caller
/// guarantees the tile fits; the grid math above always does.
fn blit(dst: &mut Frame, src: &Frame, x: u32, y: u32) {
    debug_assert!(x + src.width <= dst.width && y + src.height <= dst.height);
    let dst_stride = dst.stride();
    let src_stride = src.stride();
    for row in 0..src.height as usize {
        let dst_start = (y as usize + row) * dst_stride + x as usize * CHANNELS;
        let src_start = row * src_stride;
        dst.data[dst_start..dst_start + src_stride]
            .copy_from_slice(&src.data[src_start..src_start + src_stride]);
    }
}
