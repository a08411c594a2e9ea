//! Horizontal/vertical scan timing
//!
//! A scanline is `LINE_START + LINE_WIDTH` = 228 color clocks. The first 68
//! are horizontal blank; objects only move and pixels only exist during the
//! trailing 160.
//!
//! Two handshakes live here:
//!
//! - **VSYNC**: the rising edge of the sync level is a frame boundary. The
//!   very first one only arms the display sink; every later one presents
//!   the frame drawn since the previous boundary.
//! - **WSYNC**: the CPU halts on write. When the line wraps while the CPU is
//!   halted a resume is armed, and it fires at a fixed horizontal count
//!   (6 by default) of that new line.

use emu_core::logging::{log, LogCategory, LogLevel};

use crate::config::TiaConfig;

/// Visible color clocks per scanline
pub const LINE_WIDTH: u32 = 160;
/// Horizontal blank color clocks at the start of each scanline
pub const LINE_START: u32 = 68;
/// Total color clocks per scanline
pub const LINE_LENGTH: u32 = LINE_WIDTH + LINE_START;

/// Side effects of a register write that the caller must route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipEvent {
    /// First vertical sync: the display sink may start accepting pixels
    BeginDrawing,
    /// Vertical sync: the previously drawn frame is complete
    PresentFrame,
    /// WSYNC: stop advancing the CPU until the chip signals resume
    HaltCpu,
}

#[derive(Debug, Clone)]
pub struct ScanTiming {
    hor_cnt: u32,
    ver_cnt: u32,
    vsyncing: bool,
    wsync_next_line: bool,
    cpu_halted: bool,
    drawing_started: bool,
    vblank_lines: u32,
    wsync_resume_clock: u32,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self::new(&TiaConfig::default())
    }
}

impl ScanTiming {
    pub fn new(config: &TiaConfig) -> Self {
        Self {
            hor_cnt: 0,
            ver_cnt: 0,
            vsyncing: false,
            wsync_next_line: false,
            cpu_halted: false,
            drawing_started: false,
            vblank_lines: config.vblank_lines,
            wsync_resume_clock: config.wsync_resume_clock,
        }
    }

    /// Power-on state; configuration is kept
    pub fn init(&mut self) {
        self.hor_cnt = 0;
        self.ver_cnt = 0;
        self.vsyncing = false;
        self.wsync_next_line = false;
        self.cpu_halted = false;
        self.drawing_started = false;
    }

    pub fn hor_cnt(&self) -> u32 {
        self.hor_cnt
    }

    pub fn ver_cnt(&self) -> u32 {
        self.ver_cnt
    }

    pub fn is_vsyncing(&self) -> bool {
        self.vsyncing
    }

    pub fn is_cpu_halted(&self) -> bool {
        self.cpu_halted
    }

    pub fn resume_pending(&self) -> bool {
        self.wsync_next_line
    }

    /// Inside the trailing 160 clocks of the line
    pub fn in_visible_window(&self) -> bool {
        self.hor_cnt >= LINE_START
    }

    /// Past vertical blank: pixels go to the display sink
    pub fn in_output_lines(&self) -> bool {
        self.ver_cnt >= self.vblank_lines
    }

    /// VSYNC level change. Only a rising edge produces an event.
    pub fn set_vsync(&mut self, on: bool) -> Option<ChipEvent> {
        if on && !self.vsyncing {
            let event = if self.drawing_started {
                ChipEvent::PresentFrame
            } else {
                self.drawing_started = true;
                ChipEvent::BeginDrawing
            };
            log(LogCategory::Sync, LogLevel::Debug, || {
                format!("VSYNC: {:?} after {} lines", event, self.ver_cnt)
            });
            self.ver_cnt = 0;
            self.vsyncing = true;
            Some(event)
        } else {
            if !on {
                self.vsyncing = false;
            }
            None
        }
    }

    pub fn halt_cpu(&mut self) -> ChipEvent {
        log(LogCategory::Sync, LogLevel::Trace, || {
            format!("WSYNC: halt at line {} clock {}", self.ver_cnt, self.hor_cnt)
        });
        self.cpu_halted = true;
        ChipEvent::HaltCpu
    }

    /// RSYNC
    pub fn reset_horizontal(&mut self) {
        self.hor_cnt = 0;
    }

    /// Advance one color clock. Returns true when a pending WSYNC resume
    /// fires on this clock.
    pub fn advance(&mut self) -> bool {
        self.hor_cnt += 1;
        if self.hor_cnt == LINE_LENGTH {
            self.hor_cnt = 0;
            if self.cpu_halted {
                self.wsync_next_line = true;
            }
            // Programs that never write VSYNC keep counting lines
            self.ver_cnt = self.ver_cnt.wrapping_add(1);
        }

        if self.hor_cnt == self.wsync_resume_clock && self.wsync_next_line {
            self.wsync_next_line = false;
            self.cpu_halted = false;
            log(LogCategory::Sync, LogLevel::Trace, || {
                format!("WSYNC: resume at line {}", self.ver_cnt)
            });
            return true;
        }
        false
    }
}
