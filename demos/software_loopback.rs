//! Verifies a single-precision software FFT standing in for a hardware
//! pipeline: the golden engine widened, transformed, and rounded back to
//! device precision, emitting bit-reversed order. Runs one forward and one
//! inverse pass, like a hardware bring-up session would.
//!
//! ```bash
//! RUST_LOG=info cargo run --release --example software_loopback
//! ```

use std::time::Instant;

use fftcheck::harness::DeviceError;
use fftcheck::{Complex32, Complex64, Direction, FftDevice, GoldenFft, VerifyConfig, VerifyHarness};

struct SoftwareDevice {
    engine: GoldenFft,
}

impl FftDevice for SoftwareDevice {
    fn execute(
        &mut self,
        direction: Direction,
        log_len: u32,
        input: &[Complex32],
        output: &mut [Complex32],
    ) -> Result<(), DeviceError> {
        let n = 1usize << log_len;
        for (inp, out) in input.chunks(n).zip(output.chunks_mut(n)) {
            let mut block: Vec<Complex64> = inp.iter().map(|c| c.widen()).collect();
            self.engine.transform_device_order(direction, &mut block)?;
            for (o, b) in out.iter_mut().zip(block.iter()) {
                *o = b.narrow();
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = VerifyConfig::new(12, 200)?.with_seed(0xF0F7);
    println!(
        "verifying {} iterations of {}-point transforms",
        config.iterations,
        config.block_len()
    );

    for direction in [Direction::Forward, Direction::Inverse] {
        let mut harness = VerifyHarness::new(config);
        let mut device = SoftwareDevice {
            engine: GoldenFft::new(),
        };
        let start = Instant::now();
        let report = harness.run(&mut device, direction)?;
        let elapsed = start.elapsed();
        println!(
            "{:?}: min snr {:.3} dB over {} sampled trials in {:.1?} --> {}",
            direction,
            report.min_snr_db,
            report.trials_checked,
            elapsed,
            if report.passed { "PASSED" } else { "FAILED" }
        );
    }
    Ok(())
}
