//! Display-side traits for the video chip
//!
//! Two traits live here:
//!
//! - [`VideoSink`] is the chip's output contract. The chip produces one raw
//!   color byte per visible color clock and a frame-boundary notification
//!   on every vertical sync; it never sees RGB values.
//! - [`Renderer`] is the framebuffer view a frontend uses to fetch the last
//!   completed picture.
//!
//! ```text
//! Tia::clock() -> VideoSink::put_pixel -> (palette) -> Renderer::get_frame
//! ```
//!
//! A software sink usually implements both traits.
//!
//! ```rust,ignore
//! use emu_core::renderer::{Renderer, VideoSink};
//! use emu_core::types::Frame;
//!
//! struct Gray {
//!     frame: Frame,
//!     cursor: usize,
//! }
//!
//! impl VideoSink for Gray {
//!     fn begin_drawing(&mut self) {}
//!     fn present(&mut self) {
//!         self.cursor = 0;
//!     }
//!     fn put_pixel(&mut self, color: u8) {
//!         let lum = (color & 0x0E) as u32 * 16;
//!         self.frame.pixels[self.cursor] = 0xFF000000 | lum << 16 | lum << 8 | lum;
//!         self.cursor += 1;
//!     }
//! }
//! ```

use crate::types::Frame;

/// Consumer of the pixel stream produced by a scanline-synchronous video chip
pub trait VideoSink {
    /// First vertical sync seen: start accepting pixels.
    fn begin_drawing(&mut self);

    /// A frame boundary: the pixels received since the previous boundary form
    /// a complete picture.
    fn present(&mut self);

    /// One raw palette byte for the current visible color clock.
    fn put_pixel(&mut self, color: u8);
}

/// Framebuffer access for frontends
pub trait Renderer: Send {
    /// Get the current framebuffer (read-only)
    fn get_frame(&self) -> &Frame;

    /// Clear the framebuffer with a solid color
    ///
    /// # Arguments
    /// * `color` - ARGB8888 color value (0xAARRGGBB)
    fn clear(&mut self, color: u32);

    /// Reset the renderer to its initial state
    fn reset(&mut self);

    /// Get the name of this renderer (for debugging/UI)
    fn name(&self) -> &str;

    /// Returns `true` for GPU-backed renderers
    fn is_hardware_accelerated(&self) -> bool {
        false
    }

    /// Resize the renderer to new dimensions
    ///
    /// # Arguments
    /// * `width` - New width in pixels
    /// * `height` - New height in pixels
    fn resize(&mut self, width: u32, height: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineSink {
        frame: Frame,
        cursor: usize,
        drawing: bool,
        presented: u32,
    }

    impl LineSink {
        fn new(width: u32, height: u32) -> Self {
            Self {
                frame: Frame::new(width, height),
                cursor: 0,
                drawing: false,
                presented: 0,
            }
        }
    }

    impl VideoSink for LineSink {
        fn begin_drawing(&mut self) {
            self.drawing = true;
        }

        fn present(&mut self) {
            self.cursor = 0;
            self.presented += 1;
        }

        fn put_pixel(&mut self, color: u8) {
            if self.drawing && self.cursor < self.frame.pixels.len() {
                self.frame.pixels[self.cursor] = 0xFF000000 | color as u32;
                self.cursor += 1;
            }
        }
    }

    impl Renderer for LineSink {
        fn get_frame(&self) -> &Frame {
            &self.frame
        }

        fn clear(&mut self, color: u32) {
            for pixel in &mut self.frame.pixels {
                *pixel = color;
            }
        }

        fn reset(&mut self) {
            self.clear(0xFF000000);
            self.cursor = 0;
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.frame = Frame::new(width, height);
            self.cursor = 0;
        }

        fn name(&self) -> &str {
            "Line Sink"
        }
    }

    #[test]
    fn test_sink_ignores_pixels_before_drawing() {
        let mut sink = LineSink::new(4, 1);
        sink.put_pixel(0x42);
        assert_eq!(sink.cursor, 0);

        sink.begin_drawing();
        sink.put_pixel(0x42);
        assert_eq!(sink.get_frame().pixels[0], 0xFF000042);
    }

    #[test]
    fn test_sink_present_rewinds() {
        let mut sink = LineSink::new(2, 1);
        sink.begin_drawing();
        sink.put_pixel(1);
        sink.put_pixel(2);
        sink.put_pixel(3); // past the end, dropped
        sink.present();
        assert_eq!(sink.presented, 1);
        sink.put_pixel(9);
        assert_eq!(sink.get_frame().pixels, vec![0xFF000009, 0xFF000002]);
    }

    #[test]
    fn test_renderer_clear_and_reset() {
        let mut renderer = LineSink::new(16, 8);
        renderer.clear(0xFFFF0000);
        assert!(renderer.get_frame().pixels.iter().all(|&p| p == 0xFFFF0000));

        renderer.reset();
        assert!(renderer.get_frame().pixels.iter().all(|&p| p == 0xFF000000));
        assert!(!renderer.is_hardware_accelerated());
        assert_eq!(renderer.name(), "Line Sink");
    }

    #[test]
    fn test_renderer_resize() {
        let mut renderer = LineSink::new(160, 192);
        renderer.resize(320, 384);

        let frame = renderer.get_frame();
        assert_eq!(frame.width, 320);
        assert_eq!(frame.height, 384);
        assert_eq!(frame.pixels.len(), 320 * 384);
    }
}
