//! Collision latches
//!
//! Fifteen pairwise overlap flags. A flag is set on any visible color clock
//! where both objects of its pair produce a color, and stays set until
//! CXCLR. Reads expose two flags per register in bits 7 and 6:
//!
//! ```text
//! addr  bit 7   bit 6
//! $00   M0-P1   M0-P0
//! $01   M1-P0   M1-P1
//! $02   P0-PF   P0-BL
//! $03   P1-PF   P1-BL
//! $04   M0-PF   M0-BL
//! $05   M1-PF   M1-BL
//! $06   BL-PF   -
//! $07   P0-P1   M0-M1
//! ```

use bitflags::bitflags;
use emu_core::logging::{log, LogCategory, LogLevel};

use crate::compositor::ObjectColors;

bitflags! {
    #[derive(Default)]
    pub struct Collisions: u16 {
        const M0_P1 = 1 << 0;
        const M0_P0 = 1 << 1;
        const M1_P0 = 1 << 2;
        const M1_P1 = 1 << 3;
        const P0_PF = 1 << 4;
        const P0_BL = 1 << 5;
        const P1_PF = 1 << 6;
        const P1_BL = 1 << 7;
        const M0_PF = 1 << 8;
        const M0_BL = 1 << 9;
        const M1_PF = 1 << 10;
        const M1_BL = 1 << 11;
        const BL_PF = 1 << 12;
        const P0_P1 = 1 << 13;
        const M0_M1 = 1 << 14;
    }
}

/// (bit 7, bit 6) for read addresses $00-$07
const READ_MAP: [(Collisions, Collisions); 8] = [
    (Collisions::M0_P1, Collisions::M0_P0),
    (Collisions::M1_P0, Collisions::M1_P1),
    (Collisions::P0_PF, Collisions::P0_BL),
    (Collisions::P1_PF, Collisions::P1_BL),
    (Collisions::M0_PF, Collisions::M0_BL),
    (Collisions::M1_PF, Collisions::M1_BL),
    (Collisions::BL_PF, Collisions::empty()),
    (Collisions::P0_P1, Collisions::M0_M1),
];

#[derive(Debug, Clone, Default)]
pub struct CollisionMatrix {
    latches: Collisions,
}

impl CollisionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latches(&self) -> Collisions {
        self.latches
    }

    /// CXCLR
    pub fn clear(&mut self) {
        log(LogCategory::Collision, LogLevel::Trace, || {
            format!("CXCLR: clearing {:?}", self.latches)
        });
        self.latches = Collisions::empty();
    }

    /// Latch every pair that overlaps on this clock. Never clears.
    pub fn update(&mut self, c: &ObjectColors) {
        let hit = |a: Option<u8>, b: Option<u8>| a.is_some() && b.is_some();

        let mut now = Collisions::empty();
        now.set(Collisions::M0_P1, hit(c.missile0, c.player1));
        now.set(Collisions::M0_P0, hit(c.missile0, c.player0));
        now.set(Collisions::M1_P0, hit(c.missile1, c.player0));
        now.set(Collisions::M1_P1, hit(c.missile1, c.player1));
        now.set(Collisions::P0_PF, hit(c.player0, c.playfield));
        now.set(Collisions::P0_BL, hit(c.player0, c.ball));
        now.set(Collisions::P1_PF, hit(c.player1, c.playfield));
        now.set(Collisions::P1_BL, hit(c.player1, c.ball));
        now.set(Collisions::M0_PF, hit(c.missile0, c.playfield));
        now.set(Collisions::M0_BL, hit(c.missile0, c.ball));
        now.set(Collisions::M1_PF, hit(c.missile1, c.playfield));
        now.set(Collisions::M1_BL, hit(c.missile1, c.ball));
        now.set(Collisions::BL_PF, hit(c.ball, c.playfield));
        now.set(Collisions::P0_P1, hit(c.player0, c.player1));
        now.set(Collisions::M0_M1, hit(c.missile0, c.missile1));

        self.latches |= now;
    }

    /// Packed read register; addresses past $07 read as 0
    pub fn read(&self, addr: u8) -> u8 {
        READ_MAP.get(addr as usize).map_or(0, |&(d7, d6)| {
            (self.latches.intersects(d7) as u8) << 7 | (self.latches.intersects(d6) as u8) << 6
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_playfield_latch_persists() {
        let mut cx = CollisionMatrix::new();

        cx.update(&ObjectColors {
            ball: Some(0x0E),
            ..ObjectColors::default()
        });
        assert!(!cx.latches().contains(Collisions::BL_PF));

        cx.update(&ObjectColors {
            ball: Some(0x0E),
            playfield: Some(0x0E),
            ..ObjectColors::default()
        });
        assert_eq!(cx.latches(), Collisions::BL_PF);

        // No longer overlapping: still latched
        cx.update(&ObjectColors::default());
        cx.update(&ObjectColors {
            playfield: Some(0x0E),
            ..ObjectColors::default()
        });
        assert_eq!(cx.read(0x06), 0x80);

        cx.clear();
        assert!(cx.latches().is_empty());
        assert_eq!(cx.read(0x06), 0x00);
    }

    #[test]
    fn test_all_objects_overlap() {
        let mut cx = CollisionMatrix::new();
        cx.update(&ObjectColors {
            playfield: Some(1),
            ball: Some(2),
            player0: Some(3),
            player1: Some(4),
            missile0: Some(5),
            missile1: Some(6),
        });
        assert_eq!(cx.latches(), Collisions::all());

        for addr in 0x00..=0x05 {
            assert_eq!(cx.read(addr), 0xC0);
        }
        // BL-PF has no partner in bit 6
        assert_eq!(cx.read(0x06), 0x80);
        assert_eq!(cx.read(0x07), 0xC0);
        assert_eq!(cx.read(0x08), 0x00);
        assert_eq!(cx.read(0xFF), 0x00);
    }

    #[test]
    fn test_read_bit_positions() {
        let mut cx = CollisionMatrix::new();
        cx.update(&ObjectColors {
            missile0: Some(1),
            player0: Some(2),
            ..ObjectColors::default()
        });
        assert_eq!(cx.latches(), Collisions::M0_P0);
        assert_eq!(cx.read(0x00), 0x40);
        assert_eq!(cx.read(0x02), 0x00);

        cx.update(&ObjectColors {
            missile1: Some(1),
            player0: Some(2),
            ..ObjectColors::default()
        });
        assert_eq!(cx.read(0x01), 0x80);

        cx.update(&ObjectColors {
            missile0: Some(1),
            missile1: Some(2),
            ..ObjectColors::default()
        });
        assert_eq!(cx.read(0x07), 0x40);
    }
}
