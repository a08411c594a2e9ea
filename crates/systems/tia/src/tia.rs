//! TIA (Television Interface Adapter) - video chip for the Atari 2600
//!
//! The TIA has no framebuffer. It generates video one color clock at a time
//! while the CPU rewrites its registers between (and during) scanlines, so
//! the chip state here is exactly what the program sees on the bus:
//!
//! - five movable objects (2 players, 2 missiles, ball) plus the playfield,
//!   each ticked once per visible color clock
//! - 15 collision latches updated from the objects' output
//! - a priority compositor merging the six colors over the background
//! - scan timing, which owns the VSYNC and WSYNC handshakes
//!
//! # Register map (write)
//!
//! ```text
//! $00 VSYNC   $01 VBLANK  $02 WSYNC   $03 RSYNC   $04 NUSIZ0  $05 NUSIZ1
//! $06 COLUP0  $07 COLUP1  $08 COLUPF  $09 COLUBK  $0A CTRLPF  $0B REFP0
//! $0C REFP1   $0D PF0     $0E PF1     $0F PF2     $10 RESP0   $11 RESP1
//! $12 RESM0   $13 RESM1   $14 RESBL   $15-$1A audio            $1B GRP0
//! $1C GRP1    $1D ENAM0   $1E ENAM1   $1F ENABL   $20 HMP0    $21 HMP1
//! $22 HMM0    $23 HMM1    $24 HMBL    $25 VDELP0  $26 VDELP1  $27 VDELBL
//! $28 RESMP0  $29 RESMP1  $2A HMOVE   $2B HMCLR   $2C CXCLR
//! ```
//!
//! Reads at $00-$07 return the collision latches; everything else reads 0.

use emu_core::logging::{log, LogCategory, LogLevel};
use serde_json::Value;

use crate::collision::CollisionMatrix;
use crate::compositor::{Compositor, ObjectColors};
use crate::config::TiaConfig;
use crate::object::{number_size, Ball, GraphicsObject, Missile, Player, MISSILE_WIDTHS};
use crate::playfield::Playfield;
use crate::timing::{ChipEvent, ScanTiming, LINE_WIDTH};

mod reg {
    pub const VSYNC: u8 = 0x00;
    pub const VBLANK: u8 = 0x01;
    pub const WSYNC: u8 = 0x02;
    pub const RSYNC: u8 = 0x03;
    pub const NUSIZ0: u8 = 0x04;
    pub const NUSIZ1: u8 = 0x05;
    pub const COLUP0: u8 = 0x06;
    pub const COLUP1: u8 = 0x07;
    pub const COLUPF: u8 = 0x08;
    pub const COLUBK: u8 = 0x09;
    pub const CTRLPF: u8 = 0x0A;
    pub const REFP0: u8 = 0x0B;
    pub const REFP1: u8 = 0x0C;
    pub const PF0: u8 = 0x0D;
    pub const PF1: u8 = 0x0E;
    pub const PF2: u8 = 0x0F;
    pub const RESP0: u8 = 0x10;
    pub const RESP1: u8 = 0x11;
    pub const RESM0: u8 = 0x12;
    pub const RESM1: u8 = 0x13;
    pub const RESBL: u8 = 0x14;
    pub const AUDC0: u8 = 0x15;
    pub const AUDV1: u8 = 0x1A;
    pub const GRP0: u8 = 0x1B;
    pub const GRP1: u8 = 0x1C;
    pub const ENAM0: u8 = 0x1D;
    pub const ENAM1: u8 = 0x1E;
    pub const ENABL: u8 = 0x1F;
    pub const HMP0: u8 = 0x20;
    pub const HMP1: u8 = 0x21;
    pub const HMM0: u8 = 0x22;
    pub const HMM1: u8 = 0x23;
    pub const HMBL: u8 = 0x24;
    pub const VDELP0: u8 = 0x25;
    pub const VDELP1: u8 = 0x26;
    pub const VDELBL: u8 = 0x27;
    pub const RESMP0: u8 = 0x28;
    pub const RESMP1: u8 = 0x29;
    pub const HMOVE: u8 = 0x2A;
    pub const HMCLR: u8 = 0x2B;
    pub const CXCLR: u8 = 0x2C;
}

fn bit(val: u8, n: u8) -> bool {
    val & (1 << n) != 0
}

/// Output of one color clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorClock {
    /// Composited color, present only on visible clocks of output lines
    pub pixel: Option<u8>,
    /// A pending WSYNC released the CPU on this clock
    pub resume_cpu: bool,
}

/// TIA chip state
#[derive(Debug, Clone)]
pub struct Tia {
    timing: ScanTiming,
    players: [GraphicsObject<Player>; 2],
    missiles: [GraphicsObject<Missile>; 2],
    ball: GraphicsObject<Ball>,
    playfield: Playfield,
    collisions: CollisionMatrix,
    compositor: Compositor,
    resmp: [u8; 2],
}

impl Default for Tia {
    fn default() -> Self {
        Self::new()
    }
}

impl Tia {
    /// Create a new TIA chip with NTSC timing
    pub fn new() -> Self {
        Self::with_config(&TiaConfig::default())
    }

    pub fn with_config(config: &TiaConfig) -> Self {
        let mut tia = Self {
            timing: ScanTiming::new(config),
            players: [GraphicsObject::new(Player), GraphicsObject::new(Player)],
            missiles: [GraphicsObject::new(Missile), GraphicsObject::new(Missile)],
            ball: GraphicsObject::new(Ball),
            playfield: Playfield::playfield(),
            collisions: CollisionMatrix::new(),
            compositor: Compositor::new(),
            resmp: [0; 2],
        };
        tia.init();
        tia
    }

    /// Power-on state
    pub fn init(&mut self) {
        self.timing.init();
        self.playfield.init_playfield();
        for player in &mut self.players {
            player.init();
            player.set_width(8);
        }
        for missile in &mut self.missiles {
            missile.init();
            missile.set_width(1);
        }
        self.ball.init();
        self.ball.set_width(1);
        self.compositor.set_background_color(0);
        self.resmp = [0; 2];
        self.collisions.clear();
    }

    /// Write a chip register.
    ///
    /// `cpu_cycles` is the CPU cycle counter at the time of the write; only
    /// the position reset strobes read it.
    pub fn write(&mut self, addr: u8, val: u8, cpu_cycles: u64) -> Option<ChipEvent> {
        let hor_cnt = self.timing.hor_cnt();

        match addr {
            reg::VSYNC => return self.timing.set_vsync(bit(val, 1)),
            reg::VBLANK => log(LogCategory::Stubs, LogLevel::Debug, || {
                format!("TIA: VBLANK <- ${:02X} ignored", val)
            }),
            reg::WSYNC => return Some(self.timing.halt_cpu()),
            reg::RSYNC => self.timing.reset_horizontal(),

            reg::NUSIZ0 => self.set_number_size(0, val),
            reg::NUSIZ1 => self.set_number_size(1, val),

            reg::COLUP0 => {
                self.players[0].set_color(val);
                self.playfield.set_score_left_color(val);
            }
            reg::COLUP1 => {
                self.players[1].set_color(val);
                self.playfield.set_score_right_color(val);
            }
            reg::COLUPF => {
                self.playfield.set_color(val);
                self.ball.set_color(val);
            }
            reg::COLUBK => self.compositor.set_background_color(val),

            reg::CTRLPF => {
                self.playfield.set_reflected(bit(val, 0));
                self.playfield.set_score_mode(bit(val, 1));
                self.playfield.set_priority(bit(val, 2));
                self.ball.set_width(MISSILE_WIDTHS[((val >> 4) & 0x03) as usize]);
            }
            reg::REFP0 => self.players[0].set_reflected(bit(val, 3)),
            reg::REFP1 => self.players[1].set_reflected(bit(val, 3)),

            reg::PF0 => self.playfield.set_register(0, val),
            reg::PF1 => self.playfield.set_register(1, val),
            reg::PF2 => self.playfield.set_register(2, val),

            reg::RESP0 => self.players[0].reset(cpu_cycles, hor_cnt),
            reg::RESP1 => self.players[1].reset(cpu_cycles, hor_cnt),
            reg::RESM0 => self.missiles[0].reset(cpu_cycles, hor_cnt),
            reg::RESM1 => self.missiles[1].reset(cpu_cycles, hor_cnt),
            reg::RESBL => self.ball.reset(cpu_cycles, hor_cnt),

            reg::AUDC0..=reg::AUDV1 => log(LogCategory::Stubs, LogLevel::Debug, || {
                format!("TIA: audio register ${:02X} <- ${:02X} ignored", addr, val)
            }),

            reg::GRP0 => self.players[0].set_graphics(val),
            reg::GRP1 => self.players[1].set_graphics(val),
            reg::ENAM0 => self.missiles[0].set_enabled(bit(val, 1)),
            reg::ENAM1 => self.missiles[1].set_enabled(bit(val, 1)),
            reg::ENABL => self.ball.set_enabled(bit(val, 1)),

            reg::HMP0 => self.players[0].set_offset(val),
            reg::HMP1 => self.players[1].set_offset(val),
            reg::HMM0 => self.missiles[0].set_offset(val),
            reg::HMM1 => self.missiles[1].set_offset(val),
            reg::HMBL => self.ball.set_offset(val),

            reg::VDELP0 => self.players[0].set_delayed(bit(val, 0)),
            reg::VDELP1 => self.players[1].set_delayed(bit(val, 0)),
            reg::VDELBL => self.ball.set_delayed(bit(val, 0)),

            reg::RESMP0 | reg::RESMP1 => {
                log(LogCategory::Stubs, LogLevel::Debug, || {
                    format!("TIA: RESMP{} <- ${:02X} stored", addr - reg::RESMP0, val)
                });
                self.resmp[(addr - reg::RESMP0) as usize] = val;
            }

            reg::HMOVE => {
                for player in &mut self.players {
                    player.apply_motion();
                }
                for missile in &mut self.missiles {
                    missile.apply_motion();
                }
                self.ball.apply_motion();
            }
            reg::HMCLR => {
                for player in &mut self.players {
                    player.set_offset(0);
                }
                for missile in &mut self.missiles {
                    missile.set_offset(0);
                }
                self.ball.set_offset(0);
            }
            reg::CXCLR => self.collisions.clear(),

            _ => log(LogCategory::Bus, LogLevel::Trace, || {
                format!("TIA: unmapped write ${:02X} <- ${:02X}", addr, val)
            }),
        }
        None
    }

    /// NUSIZx: missile width from bits 4-5, copies and player width from bits 0-2
    fn set_number_size(&mut self, idx: usize, val: u8) {
        let (decoders, player_width) = number_size(val);
        if matches!(val & 0x07, 5 | 7) {
            log(LogCategory::Video, LogLevel::Debug, || {
                format!("TIA: NUSIZ{} code {} drawn as a single copy", idx, val & 0x07)
            });
        }

        let missile = &mut self.missiles[idx];
        missile.set_width(MISSILE_WIDTHS[((val >> 4) & 0x03) as usize]);
        missile.set_decoders(decoders);

        let player = &mut self.players[idx];
        player.set_decoders(decoders);
        player.set_width(player_width);
    }

    /// Read a chip register (collision latches)
    pub fn read(&self, addr: u8) -> u8 {
        if addr > 0x07 {
            log(LogCategory::Bus, LogLevel::Trace, || {
                format!("TIA: unmapped read ${:02X}", addr)
            });
        }
        self.collisions.read(addr)
    }

    /// Advance one color clock
    pub fn clock(&mut self) -> ColorClock {
        let mut pixel = None;

        if self.timing.in_visible_window() {
            let colors = ObjectColors {
                playfield: self.playfield.tick(),
                ball: self.ball.tick(),
                player0: self.players[0].tick(),
                player1: self.players[1].tick(),
                missile0: self.missiles[0].tick(),
                missile1: self.missiles[1].tick(),
            };
            self.collisions.update(&colors);

            let color = self
                .compositor
                .resolve(self.playfield.kind().priority(), &colors);
            if self.timing.in_output_lines() {
                pixel = Some(color);
            }
        }

        let resume_cpu = self.timing.advance();
        ColorClock { pixel, resume_cpu }
    }

    pub fn is_cpu_halted(&self) -> bool {
        self.timing.is_cpu_halted()
    }

    pub fn timing(&self) -> &ScanTiming {
        &self.timing
    }

    pub fn collisions(&self) -> &CollisionMatrix {
        &self.collisions
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn player(&self, idx: usize) -> &GraphicsObject<Player> {
        &self.players[idx]
    }

    pub fn missile(&self, idx: usize) -> &GraphicsObject<Missile> {
        &self.missiles[idx]
    }

    pub fn ball(&self) -> &GraphicsObject<Ball> {
        &self.ball
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// RESMP0/RESMP1 as last written
    pub fn resmp(&self, idx: usize) -> u8 {
        self.resmp[idx]
    }

    /// Snapshot of counters and latches for debugging frontends
    pub fn debug_state(&self) -> Value {
        let pos = |state: &crate::object::ObjectState| state.pos_cnt();
        serde_json::json!({
            "hor_cnt": self.timing.hor_cnt(),
            "ver_cnt": self.timing.ver_cnt(),
            "vsyncing": self.timing.is_vsyncing(),
            "cpu_halted": self.timing.is_cpu_halted(),
            "resume_pending": self.timing.resume_pending(),
            "background_color": self.compositor.background_color(),
            "collisions": self.collisions.latches().bits(),
            "positions": {
                "p0": pos(self.players[0].state()),
                "p1": pos(self.players[1].state()),
                "m0": pos(self.missiles[0].state()),
                "m1": pos(self.missiles[1].state()),
                "bl": pos(self.ball.state()),
            },
            "playfield": self.playfield.kind().registers(),
            "resmp": self.resmp,
            "line_width": LINE_WIDTH,
        })
    }
}
