//! Core emulator primitives and traits shared by the video chip and its host.

pub mod logging;
pub mod renderer;
pub mod types {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }
    }
}

/// Register window of a memory-mapped chip, as seen by a CPU core.
///
/// Addresses are chip-local offsets; the CPU core is responsible for decoding
/// its own address space down to this window.
pub trait ChipBus {
    fn write(&mut self, addr: u8, val: u8);
    fn read(&mut self, addr: u8) -> u8;
}

/// A CPU core driven one cycle at a time by an external stepping loop.
pub trait Cpu {
    fn reset(&mut self);

    /// Advance the core by one cycle, routing chip register traffic through
    /// `bus`. Returns the number of cycles consumed.
    fn step(&mut self, bus: &mut dyn ChipBus) -> u32;

    /// Monotonically increasing cycle counter.
    fn cycles(&self) -> u64;

    /// Called when a chip halts the core (e.g. a horizontal-sync wait).
    fn halt(&mut self) {}

    /// Called when a halted core is allowed to run again.
    fn resume(&mut self) {}
}
