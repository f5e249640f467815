use image::RgbImage;
use image::imageops::FilterType;

use crate::error::{MirrorError, MirrorResult};
use crate::frame::Frame;

/// Decodes an encoded still image (PNG from `screencap -p`, but any format
/// the `image` crate recognizes) into an RGB frame.
pub fn decode_frame(bytes: &[u8]) -> MirrorResult<Frame> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MirrorError::capture(format!("decode frame: {e}")))?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(MirrorError::capture("decoded frame has zero dimensions"));
    }
    Ok(Frame::new(width, height, rgb.into_raw()))
}

/// Shrinks `frame` so its width does not exceed `max_width`, preserving
/// aspect ratio. Never enlarges; `max_width == 0` disables scaling entirely.
pub fn scale_to_width(frame: &Frame, max_width: u32) -> Frame {
    if max_width == 0 || frame.width <= max_width {
        return frame.clone();
    }

    let scale = max_width as f64 / frame.width as f64;
    let new_w = ((frame.width as f64 * scale).round() as u32).max(1);
    let new_h = ((frame.height as f64 * scale).round() as u32).max(1);

    let Some(img) = RgbImage::from_raw(frame.width, frame.height, frame.data.clone()) else {
        // Unreachable for a well-formed frame; scaling is shrink-only and
        // optional, so fall back to the original rather than fail.
        return frame.clone();
    };
    // Triangle filtering is the quality-preserving choice for pure
    // downscales here; every resize in this pipeline only ever shrinks.
    let resized = image::imageops::resize(&img, new_w, new_h, FilterType::Triangle);
    Frame::new(new_w, new_h, resized.into_raw())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_png_dimensions_and_pixels() {
        let bytes = png_bytes(2, 3, [10, 200, 30]);
        let frame = decode_frame(&bytes).unwrap();
        assert_eq!((frame.width, frame.height), (2, 3));
        assert_eq!(&frame.data[..3], &[10, 200, 30]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_frame(b"not an image").is_err());
        assert!(decode_frame(b"").is_err());
    }

    #[test]
    fn scale_shrinks_wide_frames_preserving_aspect() {
        let frame = Frame::black(1000, 500);
        let scaled = scale_to_width(&frame, 540);
        assert_eq!(scaled.width, 540);
        assert_eq!(scaled.height, 270);
    }

    #[test]
    fn scale_never_enlarges() {
        let frame = Frame::black(100, 200);
        let scaled = scale_to_width(&frame, 300);
        assert_eq!((scaled.width, scaled.height), (100, 200));
    }

    #[test]
    fn scale_zero_max_width_is_identity() {
        let frame = Frame::black(1234, 56);
        let scaled = scale_to_width(&frame, 0);
        assert_eq!((scaled.width, scaled.height), (1234, 56));
    }

    #[test]
    fn scale_output_dims_are_at_least_one() {
        let frame = Frame::black(1000, 1);
        let scaled = scale_to_width(&frame, 10);
        assert_eq!(scaled.width, 10);
        assert_eq!(scaled.height, 1);
    }
}
