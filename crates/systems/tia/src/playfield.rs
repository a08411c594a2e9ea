//! Playfield: the 20-bit background pattern
//!
//! PF0 (bits 4-7), PF1 (bits 7-0) and PF2 (bits 0-7) form 20 dots, each four
//! color clocks wide. The right half of the line repeats the left half, or
//! mirrors it when reflection is on. In score mode each half takes its
//! player's color instead of the playfield color.
//!
//! The playfield reuses the generic object machinery with a fixed 160-clock
//! width and a single decoder at 0, so its span covers the whole line.

use crate::object::{ColorLookup, GraphicsObject, ObjectState};
use crate::timing::LINE_WIDTH;

#[derive(Debug, Clone, Default)]
pub struct PlayfieldPattern {
    reg: [u8; 3],
    score_mode: bool,
    score_left_color: u8,
    score_right_color: u8,
    priority: bool,
}

pub type Playfield = GraphicsObject<PlayfieldPattern>;

impl PlayfieldPattern {
    pub fn registers(&self) -> [u8; 3] {
        self.reg
    }

    pub fn score_mode(&self) -> bool {
        self.score_mode
    }

    /// Read by the compositor; the playfield itself ignores it
    pub fn priority(&self) -> bool {
        self.priority
    }

    /// Whether dot `j` (0..20) of the left half is set
    fn dot(&self, j: u32) -> bool {
        match j {
            0..=3 => self.reg[0] & (0x10 << j) != 0,
            4..=11 => self.reg[1] & (0x80 >> (j - 4)) != 0,
            _ => self.reg[2] & (0x01 << (j - 12)) != 0,
        }
    }
}

impl ColorLookup for PlayfieldPattern {
    fn color(&self, obj: &ObjectState) -> Option<u8> {
        let mut j = obj.pos_cnt / 4;
        if j >= 20 {
            j -= 20;
            if obj.reflected {
                j = 19 - j;
            }
        }

        if !self.dot(j) {
            return None;
        }
        Some(if !self.score_mode {
            obj.color
        } else if obj.pos_cnt < LINE_WIDTH / 2 {
            self.score_left_color
        } else {
            self.score_right_color
        })
    }
}

impl Playfield {
    /// Power-on playfield: full-line span, empty pattern
    pub fn playfield() -> Self {
        let mut pf = Self::new(PlayfieldPattern::default());
        pf.set_width(LINE_WIDTH);
        pf
    }

    /// Zero the pattern and the shared object state, keeping the line width
    pub fn init_playfield(&mut self) {
        self.init();
        *self.kind_mut() = PlayfieldPattern::default();
        self.set_width(LINE_WIDTH);
    }

    /// PF0/PF1/PF2; out-of-range indices are ignored
    pub fn set_register(&mut self, idx: usize, val: u8) {
        if let Some(reg) = self.kind_mut().reg.get_mut(idx) {
            *reg = val;
        }
    }

    pub fn set_score_mode(&mut self, on: bool) {
        self.kind_mut().score_mode = on;
    }

    pub fn set_score_left_color(&mut self, val: u8) {
        self.kind_mut().score_left_color = val;
    }

    pub fn set_score_right_color(&mut self, val: u8) {
        self.kind_mut().score_right_color = val;
    }

    pub fn set_priority(&mut self, on: bool) {
        self.kind_mut().priority = on;
    }
}
