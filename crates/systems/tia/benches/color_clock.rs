use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emu_core::renderer::VideoSink;
use emu_core::{ChipBus, Cpu};
use emu_tia::{Machine, SoftwareTiaRenderer, Tia, LINE_LENGTH};

/// Busy scene: playfield, both players in three copies, missiles and ball on
fn busy_tia() -> Tia {
    let mut tia = Tia::new();
    for (addr, val) in [
        (0x04, 0x03), // NUSIZ0
        (0x05, 0x36), // NUSIZ1
        (0x06, 0x1E),
        (0x07, 0x86),
        (0x08, 0x44),
        (0x09, 0x02),
        (0x0D, 0xA0),
        (0x0E, 0x5A),
        (0x0F, 0xC3),
        (0x1B, 0xAA),
        (0x1C, 0x55),
        (0x1D, 0x02),
        (0x1E, 0x02),
        (0x1F, 0x02),
    ] {
        tia.write(addr, val, 0);
    }
    tia
}

/// Rewrites the background every cycle so the bus path is exercised too
struct ColorCycler {
    cycles: u64,
}

impl Cpu for ColorCycler {
    fn reset(&mut self) {
        self.cycles = 0;
    }

    fn step(&mut self, bus: &mut dyn ChipBus) -> u32 {
        bus.write(0x09, self.cycles as u8);
        self.cycles += 1;
        1
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }
}

fn bench_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("tia_clock");

    group.bench_function("idle_line", |b| {
        let mut tia = Tia::new();
        b.iter(|| {
            for _ in 0..LINE_LENGTH {
                black_box(tia.clock());
            }
        });
    });

    group.bench_function("busy_line", |b| {
        let mut tia = busy_tia();
        b.iter(|| {
            for _ in 0..LINE_LENGTH {
                black_box(tia.clock());
            }
        });
    });

    group.finish();
}

fn bench_machine_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("machine_lines");

    for lines in [1u64, 10, 262].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(lines), lines, |b, &count| {
            b.iter(|| {
                let mut renderer = SoftwareTiaRenderer::new();
                renderer.begin_drawing();
                let mut machine = Machine::new(ColorCycler { cycles: 0 }, renderer);
                machine.run_cycles(count * 76);
                black_box(machine.sink().frame_count());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clock, bench_machine_lines);
criterion_main!(benches);
