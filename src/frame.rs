/// Number of interleaved channels in a decoded frame (RGB, no alpha).
pub const CHANNELS: usize = 3;

/// A decoded rectangular pixel buffer, row-major RGB8.
///
/// Frames are immutable once published: workers hand them to their slot
/// behind an `Arc` and never touch them again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert!(width > 0 && height > 0, "frame dimensions must be nonzero");
        debug_assert_eq!(data.len(), width as usize * height as usize * CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }

    /// An all-zero (black) frame.
    pub fn black(width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            vec![0u8; width as usize * height as usize * CHANNELS],
        )
    }

    /// Byte length of one pixel row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }
}
