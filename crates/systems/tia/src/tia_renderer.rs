//! Software display sink for the TIA
//!
//! The chip streams one palette byte per visible color clock and never says
//! which row it is on, so the sink just fills a back buffer in order and
//! trusts the frame boundaries:
//!
//! ```text
//! Tia::clock -> put_pixel -> back buffer (160 x frame_height)
//! VSYNC      -> present   -> palette -> Frame (ARGB8888)
//! ```
//!
//! Pixels arriving before the first vertical sync are dropped, as are pixels
//! past the end of the back buffer (programs that draw more lines than the
//! buffer holds).

use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::renderer::{Renderer, VideoSink};
use emu_core::types::Frame;

use crate::config::TiaConfig;
use crate::timing::LINE_WIDTH;

/// Software TIA renderer
pub struct SoftwareTiaRenderer {
    back_buffer: Vec<u8>,
    cursor: usize,
    drawing: bool,
    frame_count: u64,
    monochrome: bool,
    framebuffer: Frame,
}

impl SoftwareTiaRenderer {
    pub fn new() -> Self {
        Self::with_config(&TiaConfig::default())
    }

    pub fn with_config(config: &TiaConfig) -> Self {
        let mut renderer = Self {
            back_buffer: Vec::new(),
            cursor: 0,
            drawing: false,
            frame_count: 0,
            monochrome: config.monochrome,
            framebuffer: Frame::new(LINE_WIDTH, config.frame_height),
        };
        renderer.resize(LINE_WIDTH, config.frame_height);
        renderer
    }

    /// Frames presented so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn set_monochrome(&mut self, on: bool) {
        self.monochrome = on;
    }

    /// Raw palette bytes received since the last present
    pub fn back_buffer(&self) -> &[u8] {
        &self.back_buffer[..self.cursor]
    }
}

impl Default for SoftwareTiaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSink for SoftwareTiaRenderer {
    fn begin_drawing(&mut self) {
        log(LogCategory::Video, LogLevel::Info, || {
            "TIA renderer: first VSYNC, drawing enabled".to_string()
        });
        self.drawing = true;
        self.cursor = 0;
    }

    /// Converts the whole back buffer. Rows the current frame never reached
    /// keep the previous frame's pixels.
    fn present(&mut self) {
        let monochrome = self.monochrome;
        for (pixel, &color) in self.framebuffer.pixels.iter_mut().zip(&self.back_buffer) {
            *pixel = palette_rgb(color, monochrome);
        }

        log(LogCategory::Video, LogLevel::Debug, || {
            format!(
                "TIA renderer: frame {} presented ({} pixels)",
                self.frame_count, self.cursor
            )
        });
        self.cursor = 0;
        self.frame_count += 1;
    }

    fn put_pixel(&mut self, color: u8) {
        if !self.drawing {
            return;
        }
        if let Some(slot) = self.back_buffer.get_mut(self.cursor) {
            *slot = color;
            self.cursor += 1;
        }
    }
}

impl Renderer for SoftwareTiaRenderer {
    fn get_frame(&self) -> &Frame {
        &self.framebuffer
    }

    fn clear(&mut self, color: u32) {
        for pixel in &mut self.framebuffer.pixels {
            *pixel = color;
        }
    }

    fn reset(&mut self) {
        self.clear(0xFF000000); // Black
        self.back_buffer.fill(0);
        self.cursor = 0;
        self.drawing = false;
        self.frame_count = 0;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer = Frame::new(width, height);
        self.back_buffer = vec![0; (width * height) as usize];
        self.cursor = 0;
    }

    fn name(&self) -> &str {
        "Atari 2600 Software Renderer"
    }
}

/// Map a TIA color byte to ARGB8888.
///
/// Bits 4-7 select the hue and bits 1-3 the luminance; bit 0 is unused. This
/// is an approximation of the NTSC palette, not a measured one.
fn palette_rgb(color: u8, monochrome: bool) -> u32 {
    let index = (color >> 1) as u32;
    let luminance = index & 0x07;
    let hue = index >> 3;

    let base = luminance * 32 + 16 * (luminance != 0) as u32;
    let r = (base + hue * 8).min(0xFF);
    let g = (base + hue * 4).min(0xFF);
    let b = (base + hue * 2).min(0xFF);

    if monochrome {
        let lum = (r + g + b) / 3;
        0xFF000000 | (lum << 16) | (lum << 8) | lum
    } else {
        0xFF000000 | (r << 16) | (g << 8) | b
    }
}
