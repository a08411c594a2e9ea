//! Atari 2600 TIA video chip
//!
//! A color-clock-accurate model of the Television Interface Adapter: the
//! chip that draws the 2600's picture while the CPU races the beam. The
//! crate provides the chip itself ([`Tia`]), a bus adapter a CPU core writes
//! through ([`TiaPort`]), a software display sink ([`SoftwareTiaRenderer`])
//! and the [`Machine`] loop that interleaves them: three color clocks per
//! CPU cycle, with the CPU held while a WSYNC is pending.
//!
//! The CPU core and the display are collaborators, supplied through the
//! [`emu_core::Cpu`] and [`emu_core::renderer::VideoSink`] traits.

mod bus;
mod collision;
mod compositor;
mod config;
mod object;
mod playfield;
mod tia;
mod tia_renderer;
mod timing;

pub use bus::TiaPort;
pub use collision::{CollisionMatrix, Collisions};
pub use compositor::{Compositor, ObjectColors};
pub use config::{ConfigError, TiaConfig};
pub use object::{
    number_size, Ball, ColorLookup, GraphicsObject, Missile, ObjectState, Player, MISSILE_WIDTHS,
};
pub use playfield::{Playfield, PlayfieldPattern};
pub use tia::{ColorClock, Tia};
pub use tia_renderer::SoftwareTiaRenderer;
pub use timing::{ChipEvent, ScanTiming, LINE_LENGTH, LINE_START, LINE_WIDTH};

use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::renderer::VideoSink;
use emu_core::Cpu;
use thiserror::Error;

/// The TIA runs at three times the CPU clock
pub const COLOR_CLOCKS_PER_CPU_CYCLE: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("No frame presented within {cycles} CPU cycles")]
    FrameTimeout { cycles: u64 },
}

/// What happened during one [`Machine::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The CPU core was stepped
    pub cpu_ran: bool,
    /// A VSYNC written during the step ended a frame
    pub frame_presented: bool,
    /// A pending WSYNC released the CPU during the step
    pub resumed: bool,
}

/// CPU core, TIA and display sink stepped in lockstep
pub struct Machine<C: Cpu, S: VideoSink> {
    cpu: C,
    tia: Tia,
    sink: S,
    /// CPU cycles still owed by the last multi-cycle step
    stall: u32,
    halted: bool,
}

impl<C: Cpu, S: VideoSink> Machine<C, S> {
    pub fn new(cpu: C, sink: S) -> Self {
        Self::with_config(cpu, sink, &TiaConfig::default())
    }

    pub fn with_config(cpu: C, sink: S, config: &TiaConfig) -> Self {
        Self {
            cpu,
            tia: Tia::with_config(config),
            sink,
            stall: 0,
            halted: false,
        }
    }

    /// Power-on both the chip and the CPU core
    pub fn reset(&mut self) {
        self.tia.init();
        self.cpu.reset();
        self.stall = 0;
        self.halted = false;
    }

    /// One CPU cycle: three color clocks, then the CPU unless it is halted.
    pub fn step(&mut self) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        for _ in 0..COLOR_CLOCKS_PER_CPU_CYCLE {
            let out = self.tia.clock();
            if let Some(color) = out.pixel {
                self.sink.put_pixel(color);
            }
            if out.resume_cpu {
                outcome.resumed = true;
            }
        }

        if self.halted && !self.tia.is_cpu_halted() {
            self.halted = false;
            self.cpu.resume();
        }

        if self.halted {
            return outcome;
        }
        if self.stall > 0 {
            self.stall -= 1;
            return outcome;
        }

        let mut port = TiaPort::new(&mut self.tia, &mut self.sink, self.cpu.cycles());
        let cycles = self.cpu.step(&mut port);
        outcome.cpu_ran = true;
        outcome.frame_presented = port.frame_presented();
        self.stall = cycles.saturating_sub(1);

        if self.tia.is_cpu_halted() {
            log(LogCategory::CPU, LogLevel::Trace, || {
                format!("CPU halted by WSYNC at cycle {}", self.cpu.cycles())
            });
            self.halted = true;
            self.stall = 0;
            self.cpu.halt();
        }

        outcome
    }

    pub fn run_cycles(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Step until the display sink is handed a complete frame. Returns the
    /// number of CPU cycles that took.
    pub fn run_frame(&mut self, max_cycles: u64) -> Result<u64, MachineError> {
        let mut cycles = 0;
        while cycles < max_cycles {
            cycles += 1;
            if self.step().frame_presented {
                return Ok(cycles);
            }
        }

        log(LogCategory::Sync, LogLevel::Warn, || {
            format!("No VSYNC within {} CPU cycles", max_cycles)
        });
        Err(MachineError::FrameTimeout { cycles })
    }

    pub fn tia(&self) -> &Tia {
        &self.tia
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// CPU currently held by WSYNC
    pub fn is_cpu_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::ChipBus;

    /// Does nothing but report `cost` cycles per step
    struct IdleCpu {
        cycles: u64,
        steps: u32,
        cost: u32,
    }

    impl Cpu for IdleCpu {
        fn reset(&mut self) {
            self.cycles = 0;
            self.steps = 0;
        }

        fn step(&mut self, _bus: &mut dyn ChipBus) -> u32 {
            self.steps += 1;
            self.cycles += self.cost as u64;
            self.cost
        }

        fn cycles(&self) -> u64 {
            self.cycles
        }
    }

    #[derive(Default)]
    struct NullSink {
        pixels: u64,
    }

    impl VideoSink for NullSink {
        fn begin_drawing(&mut self) {}
        fn present(&mut self) {}
        fn put_pixel(&mut self, _color: u8) {
            self.pixels += 1;
        }
    }

    #[test]
    fn test_machine_creation() {
        let machine = Machine::new(
            IdleCpu {
                cycles: 0,
                steps: 0,
                cost: 1,
            },
            NullSink::default(),
        );
        assert_eq!(machine.tia().timing().hor_cnt(), 0);
        assert!(!machine.is_cpu_halted());
    }

    #[test]
    fn test_step_runs_three_color_clocks() {
        let mut machine = Machine::new(
            IdleCpu {
                cycles: 0,
                steps: 0,
                cost: 1,
            },
            NullSink::default(),
        );
        let outcome = machine.step();
        assert!(outcome.cpu_ran);
        assert_eq!(machine.tia().timing().hor_cnt(), 3);

        machine.run_cycles(75);
        assert_eq!(machine.tia().timing().hor_cnt(), 0);
        assert_eq!(machine.tia().timing().ver_cnt(), 1);
        assert_eq!(machine.cpu().steps, 76);
    }

    #[test]
    fn test_multi_cycle_step_stalls() {
        let mut machine = Machine::new(
            IdleCpu {
                cycles: 0,
                steps: 0,
                cost: 4,
            },
            NullSink::default(),
        );
        assert!(machine.step().cpu_ran);
        assert!(!machine.step().cpu_ran);
        assert!(!machine.step().cpu_ran);
        assert!(!machine.step().cpu_ran);
        assert!(machine.step().cpu_ran);
        assert_eq!(machine.cpu().steps, 2);
    }

    #[test]
    fn test_pixels_reach_sink() {
        let mut machine = Machine::new(
            IdleCpu {
                cycles: 0,
                steps: 0,
                cost: 1,
            },
            NullSink::default(),
        );
        // 41 lines of 76 CPU cycles: only the last one is an output line
        machine.run_cycles(41 * 76);
        assert_eq!(machine.sink().pixels, LINE_WIDTH as u64);
    }

    #[test]
    fn test_run_frame_timeout() {
        let mut machine = Machine::new(
            IdleCpu {
                cycles: 0,
                steps: 0,
                cost: 1,
            },
            NullSink::default(),
        );
        assert_eq!(
            machine.run_frame(1000),
            Err(MachineError::FrameTimeout { cycles: 1000 })
        );
        assert_eq!(
            MachineError::FrameTimeout { cycles: 1000 }.to_string(),
            "No frame presented within 1000 CPU cycles"
        );
    }

    #[test]
    fn test_reset() {
        let mut machine = Machine::new(
            IdleCpu {
                cycles: 0,
                steps: 0,
                cost: 2,
            },
            NullSink::default(),
        );
        machine.run_cycles(500);
        machine.reset();
        assert_eq!(machine.tia().timing().hor_cnt(), 0);
        assert_eq!(machine.tia().timing().ver_cnt(), 0);
        assert_eq!(machine.cpu().cycles(), 0);
        assert!(machine.step().cpu_ran);
    }
}
