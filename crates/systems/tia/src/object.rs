//! Movable graphics objects
//!
//! Players, missiles, the ball and the playfield all share one state machine:
//! a position counter that walks the 160 visible clocks of every line, a set
//! of decoder positions where the object's width countdown reloads, and a
//! graphics byte that is double-buffered through a delay latch. Objects only
//! differ in how they turn the countdown into a color, which is what
//! [`ColorLookup`] captures:
//!
//! | Kind      | Lookup                                                     |
//! |-----------|------------------------------------------------------------|
//! | Missile   | solid color while enabled                                   |
//! | Ball      | solid color while enabled (delayable)                       |
//! | Player    | one bit of an 8-bit bitmap, stretched over `width` clocks   |
//! | Playfield | 20-bit pattern, 4 clocks per bit (see `playfield.rs`)       |

use crate::timing::{LINE_START, LINE_WIDTH};

/// Missile and ball widths selected by bits 4-5 of NUSIZx/CTRLPF
pub const MISSILE_WIDTHS: [u32; 4] = [1, 2, 4, 8];

const ONE_COPY: &[u32] = &[0];
const TWO_CLOSE: &[u32] = &[0, 16];
const TWO_MEDIUM: &[u32] = &[0, 32];
const THREE_CLOSE: &[u32] = &[0, 16, 32];
const TWO_WIDE: &[u32] = &[0, 64];
const THREE_MEDIUM: &[u32] = &[0, 32, 64];

/// Decoder set and player width for the number/size field (NUSIZx bits 0-2).
///
/// Codes 5 and 7 only stretch the player, so they keep a single copy.
pub fn number_size(code: u8) -> (&'static [u32], u32) {
    match code & 0x07 {
        0 => (ONE_COPY, 8),
        1 => (TWO_CLOSE, 8),
        2 => (TWO_MEDIUM, 8),
        3 => (THREE_CLOSE, 8),
        4 => (TWO_WIDE, 8),
        5 => (ONE_COPY, 16),
        6 => (THREE_MEDIUM, 32),
        _ => (ONE_COPY, 8),
    }
}

/// Counters and registers common to every object
#[derive(Debug, Clone)]
pub struct ObjectState {
    pub(crate) decoders: &'static [u32],
    pub(crate) width: u32,
    pub(crate) width_cnt: u32,
    pub(crate) pos_cnt: u32,
    pub(crate) graphics: u8,
    pub(crate) delayed_graphics: u8,
    pub(crate) delay_cnt: u32,
    pub(crate) delayed: bool,
    pub(crate) offset: u8,
    pub(crate) color: u8,
    pub(crate) reflected: bool,
}

impl Default for ObjectState {
    fn default() -> Self {
        Self {
            decoders: ONE_COPY,
            width: 0,
            width_cnt: 0,
            pos_cnt: 0,
            graphics: 0,
            delayed_graphics: 0,
            delay_cnt: 0,
            delayed: false,
            offset: 0,
            color: 0,
            reflected: false,
        }
    }
}

impl ObjectState {
    pub fn pos_cnt(&self) -> u32 {
        self.pos_cnt
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn width_cnt(&self) -> u32 {
        self.width_cnt
    }

    pub fn decoders(&self) -> &'static [u32] {
        self.decoders
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn is_reflected(&self) -> bool {
        self.reflected
    }

    pub fn is_delayed(&self) -> bool {
        self.delayed
    }

    /// The graphics byte color lookup reads: the latched copy in delayed mode
    pub fn visible_graphics(&self) -> u8 {
        if self.delayed {
            self.delayed_graphics
        } else {
            self.graphics
        }
    }
}

/// Per-kind color lookup for the clock currently inside the active span.
///
/// Only called while `width_cnt > 0`, before the countdown decrements.
pub trait ColorLookup {
    fn color(&self, obj: &ObjectState) -> Option<u8>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Missile;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ball;

#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Missiles and the ball are either fully on or fully off
fn solid_color(obj: &ObjectState) -> Option<u8> {
    (obj.visible_graphics() != 0).then_some(obj.color)
}

impl ColorLookup for Missile {
    fn color(&self, obj: &ObjectState) -> Option<u8> {
        solid_color(obj)
    }
}

impl ColorLookup for Ball {
    fn color(&self, obj: &ObjectState) -> Option<u8> {
        solid_color(obj)
    }
}

impl ColorLookup for Player {
    fn color(&self, obj: &ObjectState) -> Option<u8> {
        // Countdown width..1 maps onto bits 7..0, two or four clocks per bit
        // for stretched players.
        let mut idx = 8 * (obj.width_cnt - 1) / obj.width;
        if obj.reflected {
            idx = 7 - idx;
        }
        (obj.visible_graphics() & (1 << idx) != 0).then_some(obj.color)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphicsObject<K> {
    state: ObjectState,
    kind: K,
}

impl<K: ColorLookup> GraphicsObject<K> {
    pub fn new(kind: K) -> Self {
        Self {
            state: ObjectState::default(),
            kind,
        }
    }

    /// Zero every counter and register
    pub fn init(&mut self) {
        self.state = ObjectState::default();
    }

    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    pub fn set_decoders(&mut self, decoders: &'static [u32]) {
        self.state.decoders = decoders;
    }

    /// A span already in progress is cut down to the new width, so the
    /// countdown never exceeds `width`.
    pub fn set_width(&mut self, width: u32) {
        self.state.width = width;
        self.state.width_cnt = self.state.width_cnt.min(width);
    }

    /// New graphics take one full line to reach the delay latch
    pub fn set_graphics(&mut self, val: u8) {
        self.state.graphics = val;
        self.state.delay_cnt = LINE_WIDTH;
    }

    pub fn set_enabled(&mut self, on: bool) {
        self.set_graphics(if on { 0xFF } else { 0x00 });
    }

    pub fn set_offset(&mut self, val: u8) {
        self.state.offset = val;
    }

    pub fn set_color(&mut self, val: u8) {
        self.state.color = val;
    }

    pub fn set_delayed(&mut self, on: bool) {
        self.state.delayed = on;
    }

    pub fn set_reflected(&mut self, on: bool) {
        self.state.reflected = on;
    }

    /// Position reset strobe (RESxx).
    ///
    /// The object lands `3 * cpu_cycles - 1` clocks left of the right edge.
    /// A strobe whose delay carries it across the end of horizontal blank is
    /// pulled back by the clocks still left in the blank.
    pub fn reset(&mut self, cpu_cycles: u64, hor_cnt: u32) {
        let line_width = LINE_WIDTH as i64;
        let line_start = LINE_START as i64;
        let hor_cnt = hor_cnt as i64;

        let mut pos = (cpu_cycles as i64).wrapping_mul(3).wrapping_sub(1);
        if hor_cnt + pos >= line_start && hor_cnt < line_start {
            pos += hor_cnt - line_start;
        }
        self.state.pos_cnt = (line_width - pos).rem_euclid(line_width) as u32;
    }

    /// Apply the motion register (HMOVE). The high nibble is a signed
    /// 4-bit clock count.
    pub fn apply_motion(&mut self) {
        let motion = (self.state.offset >> 4) as u32;
        let pos = self.state.pos_cnt;
        self.state.pos_cnt = if motion < 8 {
            (pos + motion) % LINE_WIDTH
        } else {
            (pos + LINE_WIDTH - (16 - motion)) % LINE_WIDTH
        };
    }

    /// One visible color clock
    pub fn tick(&mut self) -> Option<u8> {
        let state = &mut self.state;
        if state.delay_cnt != 0 {
            state.delay_cnt -= 1;
            if state.delay_cnt == 0 {
                state.delayed_graphics = state.graphics;
            }
        }

        if state.decoders.contains(&state.pos_cnt) {
            state.width_cnt = state.width;
        }

        let color = if self.state.width_cnt > 0 {
            let color = self.kind.color(&self.state);
            self.state.width_cnt -= 1;
            color
        } else {
            None
        };

        self.state.pos_cnt = (self.state.pos_cnt + 1) % LINE_WIDTH;
        color
    }
}
