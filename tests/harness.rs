use fftcheck::harness::DeviceError;
use fftcheck::{
    snr_db, Complex32, Complex64, Direction, FftDevice, GoldenFft, VerifyConfig, VerifyHarness,
};

/// Software stand-in for the hardware pipeline: the golden engine rounded to
/// device precision, emitting bit-reversed order.
struct SoftwareDevice {
    engine: GoldenFft,
}

impl SoftwareDevice {
    fn new() -> Self {
        Self {
            engine: GoldenFft::new(),
        }
    }
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

/// Wraps another device and zeroes the candidate output of one trial.
struct CorruptOneTrial<D> {
    inner: D,
    trial: usize,
}

impl<D: FftDevice> FftDevice for CorruptOneTrial<D> {
    fn execute(
        &mut self,
        direction: Direction,
        log_len: u32,
        input: &[Complex32],
        output: &mut [Complex32],
    ) -> Result<(), DeviceError> {
        self.inner.execute(direction, log_len, input, output)?;
        let n = 1usize << log_len;
        for sample in &mut output[self.trial * n..(self.trial + 1) * n] {
            *sample = Complex32::zero();
        }
        Ok(())
    }
}

struct FailingDevice;

impl FftDevice for FailingDevice {
    fn execute(
        &mut self,
        _direction: Direction,
        _log_len: u32,
        _input: &[Complex32],
        _output: &mut [Complex32],
    ) -> Result<(), DeviceError> {
        Err("link lost".into())
    }
}

#[test]
fn faithful_device_passes_forward_and_inverse() {
    let config = VerifyConfig::new(8, 100).unwrap().with_seed(11);
    for direction in [Direction::Forward, Direction::Inverse] {
        let mut harness = VerifyHarness::new(config);
        let report = harness
            .run(&mut SoftwareDevice::new(), direction)
            .unwrap();
        assert!(
            report.passed,
            "{direction:?}: min snr {} dB",
            report.min_snr_db
        );
        assert!(report.min_snr_db > 125.0);
        assert!(report.trials_checked >= 1);
    }
}

#[test]
fn corrupted_trial_zero_fails_the_run() {
    // Trial zero is always sampled, so corrupting it must surface.
    let config = VerifyConfig::new(6, 30).unwrap().with_seed(5);
    let mut harness = VerifyHarness::new(config);
    let mut device = CorruptOneTrial {
        inner: SoftwareDevice::new(),
        trial: 0,
    };
    let report = harness.run(&mut device, Direction::Forward).unwrap();
    assert!(!report.passed, "min snr {} dB", report.min_snr_db);
}

#[test]
fn stride_of_one_samples_every_trial() {
    let config = VerifyConfig::new(4, 25)
        .unwrap()
        .with_sample_stride_max(1)
        .unwrap()
        .with_seed(3);
    let mut harness = VerifyHarness::new(config);
    let report = harness
        .run(&mut SoftwareDevice::new(), Direction::Forward)
        .unwrap();
    assert_eq!(report.trials_checked, 25);

    // With every trial sampled, a corruption anywhere in the corpus fails.
    let mut harness = VerifyHarness::new(config);
    let mut device = CorruptOneTrial {
        inner: SoftwareDevice::new(),
        trial: 17,
    };
    let report = harness.run(&mut device, Direction::Forward).unwrap();
    assert!(!report.passed);
}

#[test]
fn device_failure_fails_the_whole_run() {
    let config = VerifyConfig::new(4, 10).unwrap();
    let mut harness = VerifyHarness::new(config);
    let err = harness.run(&mut FailingDevice, Direction::Forward);
    assert!(matches!(err, Err(fftcheck::VerifyError::Device(_))));
}

#[test]
fn snr_decreases_as_noise_grows() {
    let fft = GoldenFft::new();
    let mut golden: Vec<Complex64> = (0..32)
        .map(|i| Complex64::new((i as f64 * 0.37).sin(), (i as f64 * 0.11).cos()))
        .collect();
    fft.transform_device_order(Direction::Forward, &mut golden)
        .unwrap();

    let mut last = f64::INFINITY;
    for magnitude in [1e-6f32, 1e-4, 1e-2, 1.0] {
        let candidate: Vec<Complex32> = golden
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let offset = if i % 2 == 0 { magnitude } else { -magnitude };
                Complex32::new(g.re as f32 + offset, g.im as f32 - offset)
            })
            .collect();
        let db = snr_db(&golden, &candidate);
        assert!(db < last, "snr {db} dB did not drop below {last} dB");
        last = db;
    }
}

#[test]
fn run_is_deterministic_for_a_seed() {
    let config = VerifyConfig::new(5, 40).unwrap().with_seed(99);
    let mut first = VerifyHarness::new(config);
    let mut second = VerifyHarness::new(config);
    let a = first
        .run(&mut SoftwareDevice::new(), Direction::Forward)
        .unwrap();
    let b = second
        .run(&mut SoftwareDevice::new(), Direction::Forward)
        .unwrap();
    assert_eq!(a, b);
}
