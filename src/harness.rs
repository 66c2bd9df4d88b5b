//! Verification harness.
//!
//! Drives repeated transform trials against a device under test: generates
//! random input blocks, hands the whole corpus to the device, recomputes a
//! sparse subset of trials with [`GoldenFft`], scores each sampled trial with
//! a signal-to-noise ratio, and reduces the run to a worst-case verdict.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fft::{Direction, FftError, GoldenFft};
use crate::num::{Complex32, Complex64};

/// Boxed error type devices may fail with.
pub type DeviceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum VerifyError {
    /// Iteration count must be at least one.
    InvalidIterations,
    /// Block length exponent must be at least one.
    InvalidLogLen,
    /// Sampling stride bound must be at least one.
    InvalidStrideBound,
    /// The reference engine rejected a block.
    Fft(FftError),
    /// The device under test failed to produce a candidate corpus.
    Device(DeviceError),
}

impl core::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidIterations => "iteration count must be at least one".fmt(f),
            Self::InvalidLogLen => "block length exponent must be at least one".fmt(f),
            Self::InvalidStrideBound => "sampling stride bound must be at least one".fmt(f),
            Self::Fft(e) => write!(f, "reference transform failed: {e}"),
            Self::Device(e) => write!(f, "device transform failed: {e}"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fft(e) => Some(e),
            Self::Device(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<FftError> for VerifyError {
    fn from(e: FftError) -> Self {
        Self::Fft(e)
    }
}

/// The transform under test.
///
/// The harness treats this as an opaque synchronous call: the full corpus of
/// input blocks goes in, the full corpus of candidate output blocks comes
/// back in bit-reversed emission order, or the whole run fails.
pub trait FftDevice {
    fn execute(
        &mut self,
        direction: Direction,
        log_len: u32,
        input: &[Complex32],
        output: &mut [Complex32],
    ) -> Result<(), DeviceError>;
}

/// One verification run's configuration, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyConfig {
    /// Block length exponent; every block holds `2^log_len` samples.
    pub log_len: u32,
    /// Number of transform trials in the corpus.
    pub iterations: usize,
    /// A run passes only if the minimum sampled SNR exceeds this, in dB.
    pub snr_threshold_db: f64,
    /// Upper bound (inclusive) on the random trial-sampling stride.
    pub sample_stride_max: usize,
    /// Seed for corpus generation and stride sampling.
    pub seed: u64,
}

impl VerifyConfig {
    pub const DEFAULT_SNR_THRESHOLD_DB: f64 = 125.0;
    pub const DEFAULT_SAMPLE_STRIDE_MAX: usize = 20;

    pub fn new(log_len: u32, iterations: usize) -> Result<Self, VerifyError> {
        Self {
            log_len,
            iterations,
            snr_threshold_db: Self::DEFAULT_SNR_THRESHOLD_DB,
            sample_stride_max: Self::DEFAULT_SAMPLE_STRIDE_MAX,
            seed: 0,
        }
        .validated()
    }

    pub fn with_snr_threshold_db(mut self, threshold: f64) -> Self {
        self.snr_threshold_db = threshold;
        self
    }

    pub fn with_sample_stride_max(mut self, bound: usize) -> Result<Self, VerifyError> {
        self.sample_stride_max = bound;
        self.validated()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validated(self) -> Result<Self, VerifyError> {
        if self.iterations == 0 {
            return Err(VerifyError::InvalidIterations);
        }
        if self.log_len == 0 {
            return Err(VerifyError::InvalidLogLen);
        }
        if self.sample_stride_max == 0 {
            return Err(VerifyError::InvalidStrideBound);
        }
        Ok(self)
    }

    /// Samples per block, `2^log_len`.
    pub fn block_len(&self) -> usize {
        1 << self.log_len
    }
}

/// Outcome of one verification run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Whether the minimum sampled SNR exceeded the configured threshold.
    pub passed: bool,
    /// Worst SNR observed across sampled trials, in dB.
    pub min_snr_db: f64,
    /// How many trials were recomputed and scored.
    pub trials_checked: usize,
}

/// Score a candidate block against its golden block, in dB.
///
/// Signal power is the golden block's, noise power is that of the
/// element-wise difference. A zero-noise candidate scores positive infinity
/// (a perfect match never lowers a run's minimum); a zero-signal golden
/// block with any noise scores negative infinity, the worst possible score.
pub fn snr_db(golden: &[Complex64], candidate: &[Complex32]) -> f64 {
    let mut signal = 0.0;
    let mut noise = 0.0;
    for (g, c) in golden.iter().zip(candidate.iter()) {
        signal += g.norm_sqr();
        noise += (*g - c.widen()).norm_sqr();
    }
    if noise == 0.0 {
        f64::INFINITY
    } else if signal == 0.0 {
        f64::NEG_INFINITY
    } else {
        10.0 * (signal / noise).log10()
    }
}

/// One verification session: configuration, reference engine, and RNG.
///
/// Owns every buffer for the lifetime of one run; nothing persists across
/// runs except the engine's scratch allocation.
pub struct VerifyHarness {
    config: VerifyConfig,
    engine: GoldenFft,
    rng: StdRng,
}

impl VerifyHarness {
    pub fn new(config: VerifyConfig) -> Self {
        Self {
            config,
            engine: GoldenFft::new(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Run one full verification pass in the given direction.
    ///
    /// Generates the corpus, invokes the device over all of it, then walks
    /// the trial indices from zero with a random stride in
    /// `[1, sample_stride_max]`, recomputing and scoring each visited trial.
    /// Trial zero is always sampled.
    pub fn run<D: FftDevice>(
        &mut self,
        device: &mut D,
        direction: Direction,
    ) -> Result<RunReport, VerifyError> {
        let n = self.config.block_len();
        let iterations = self.config.iterations;
        info!(
            "launching {:?} transform verification: {} iterations of {} points",
            direction, iterations, n
        );

        // The verify corpus holds the same f32-rounded values the device
        // sees, widened, so the golden transform starts from the device's
        // exact input.
        let mut input = vec![Complex32::zero(); n * iterations];
        let mut verify = vec![Complex64::zero(); n * iterations];
        for (inp, ver) in input.iter_mut().zip(verify.iter_mut()) {
            *inp = Complex32::new(self.rng.gen(), self.rng.gen());
            *ver = inp.widen();
        }

        let mut candidate = vec![Complex32::zero(); n * iterations];
        device
            .execute(direction, self.config.log_len, &input, &mut candidate)
            .map_err(VerifyError::Device)?;

        let mut min_snr_db = f64::INFINITY;
        let mut trials_checked = 0;
        let mut trial = 0;
        while trial < iterations {
            let block = &mut verify[trial * n..(trial + 1) * n];
            self.engine.transform_device_order(direction, block)?;
            let db = snr_db(block, &candidate[trial * n..(trial + 1) * n]);
            debug!("trial {trial}: snr {db:.3} dB");
            if db < min_snr_db {
                min_snr_db = db;
            }
            trials_checked += 1;
            trial += self.rng.gen_range(1..=self.config.sample_stride_max);
        }

        let passed = min_snr_db > self.config.snr_threshold_db;
        if passed {
            info!(
                "{:?} run passed: min snr {:.3} dB over {} sampled trials",
                direction, min_snr_db, trials_checked
            );
        } else {
            warn!(
                "{:?} run failed: min snr {:.3} dB over {} sampled trials (threshold {:.1} dB)",
                direction, min_snr_db, trials_checked, self.config.snr_threshold_db
            );
        }
        Ok(RunReport {
            passed,
            min_snr_db,
            trials_checked,
        })
    }
}
