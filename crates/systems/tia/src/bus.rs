//! Chip-side bus adapter
//!
//! A CPU core only sees the TIA's register window, addressed by chip-local
//! offset:
//! $00-$2C: write registers
//! $00-$07: collision read registers
//!
//! `TiaPort` is built fresh for every CPU step. It carries the cycle counter
//! sampled before the step (position resets depend on it) and routes the
//! frame events a write may produce to the display sink.

use emu_core::renderer::VideoSink;
use emu_core::ChipBus;

use crate::tia::Tia;
use crate::timing::ChipEvent;

pub struct TiaPort<'a, S: VideoSink> {
    tia: &'a mut Tia,
    sink: &'a mut S,
    cpu_cycles: u64,
    frame_presented: bool,
}

impl<'a, S: VideoSink> TiaPort<'a, S> {
    pub fn new(tia: &'a mut Tia, sink: &'a mut S, cpu_cycles: u64) -> Self {
        Self {
            tia,
            sink,
            cpu_cycles,
            frame_presented: false,
        }
    }

    /// A write during this step ended a frame
    pub fn frame_presented(&self) -> bool {
        self.frame_presented
    }

    fn route(&mut self, event: ChipEvent) {
        match event {
            ChipEvent::BeginDrawing => self.sink.begin_drawing(),
            ChipEvent::PresentFrame => {
                self.sink.present();
                self.frame_presented = true;
            }
            // The stepping loop polls the halted level after the step
            ChipEvent::HaltCpu => {}
        }
    }
}

impl<S: VideoSink> ChipBus for TiaPort<'_, S> {
    fn write(&mut self, addr: u8, val: u8) {
        if let Some(event) = self.tia.write(addr, val, self.cpu_cycles) {
            self.route(event);
        }
    }

    fn read(&mut self, addr: u8) -> u8 {
        self.tia.read(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        begun: u32,
        presented: u32,
        pixels: u32,
    }

    impl VideoSink for CountingSink {
        fn begin_drawing(&mut self) {
            self.begun += 1;
        }

        fn present(&mut self) {
            self.presented += 1;
        }

        fn put_pixel(&mut self, _color: u8) {
            self.pixels += 1;
        }
    }

    #[test]
    fn test_vsync_routes_to_sink() {
        let mut tia = Tia::new();
        let mut sink = CountingSink::default();

        let mut port = TiaPort::new(&mut tia, &mut sink, 0);
        port.write(0x00, 0x02);
        port.write(0x00, 0x00);
        assert!(!port.frame_presented());

        port.write(0x00, 0x02);
        assert!(port.frame_presented());
        assert_eq!(sink.begun, 1);
        assert_eq!(sink.presented, 1);
        assert_eq!(sink.pixels, 0);
    }

    #[test]
    fn test_wsync_halts_chip_only() {
        let mut tia = Tia::new();
        let mut sink = CountingSink::default();

        TiaPort::new(&mut tia, &mut sink, 0).write(0x02, 0x00);
        assert!(tia.is_cpu_halted());
        assert_eq!(sink.begun + sink.presented, 0);
    }

    #[test]
    fn test_reset_strobe_uses_port_cycles() {
        let mut tia = Tia::new();
        let mut sink = CountingSink::default();
        for _ in 0..100 {
            tia.clock();
        }

        TiaPort::new(&mut tia, &mut sink, 10).write(0x11, 0x00);
        assert_eq!(tia.player(1).state().pos_cnt(), 131);
    }

    #[test]
    fn test_read_collision_register() {
        let mut tia = Tia::new();
        let mut sink = CountingSink::default();
        let mut port = TiaPort::new(&mut tia, &mut sink, 0);
        assert_eq!(port.read(0x00), 0);
        assert_eq!(port.read(0x2F), 0);
    }
}
