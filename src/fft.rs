//! Golden-model Fourier transform.
//!
//! This module implements the double-precision reference transform the
//! verification harness scores hardware output against: a recursive
//! [decimation-in-time](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm)
//! stage, a bit-reversal permuter, and the [`GoldenFft`] engine that wraps
//! both with forward/inverse handling.

use core::cell::RefCell;

use crate::num::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    EmptyInput,
    NonPowerOfTwo,
}

impl core::fmt::Display for FftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyInput => "input block is empty".fmt(f),
            Self::NonPowerOfTwo => "input block length is not a power of two".fmt(f),
        }
    }
}

impl std::error::Error for FftError {}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Reverse the low `log_n` bits of `index`.
///
/// Total over `[0, 2^log_n)`; an involution, so applying it twice returns
/// the original index.
#[inline]
pub fn bit_reverse(index: usize, log_n: u32) -> usize {
    let mut fwd = index;
    let mut rev = 0;
    for _ in 0..log_n {
        rev = (rev << 1) | (fwd & 1);
        fwd >>= 1;
    }
    rev
}

/// One recursive decimation-in-time stage over `data`, in place.
///
/// `scratch` must be the same length as `data`; its halves hold the even/odd
/// split for the duration of this call only. The recursion reuses `data` as
/// the sub-calls' scratch, so one buffer serves the whole transform.
fn fourier_stage(data: &mut [Complex64], scratch: &mut [Complex64]) {
    let n = data.len();
    if n == 1 {
        return;
    }
    let half = n / 2;
    let (half1, half2) = scratch.split_at_mut(half);
    for i in 0..half {
        half1[i] = data[2 * i];
        half2[i] = data[2 * i + 1];
    }
    {
        let (sub1, sub2) = data.split_at_mut(half);
        fourier_stage(half1, sub1);
        fourier_stage(half2, sub2);
    }
    for i in 0..half {
        let theta = 2.0 * core::f64::consts::PI * i as f64 / n as f64;
        let twiddle = Complex64::expi(-theta);
        let even = half1[i];
        let odd = twiddle * half2[i];
        data[i] = even + odd;
        data[i + half] = even - odd;
    }
}

/// Reference transform engine.
///
/// Computes the authoritative ("golden") transform of a block entirely in
/// `f64`, regardless of the precision of the device under test. The engine
/// holds a scratch buffer behind a [`RefCell`] so repeated trials through a
/// shared reference reuse one allocation.
pub struct GoldenFft {
    scratch: RefCell<Vec<Complex64>>,
}

impl Default for GoldenFft {
    fn default() -> Self {
        Self::new()
    }
}

impl GoldenFft {
    pub fn new() -> Self {
        Self {
            scratch: RefCell::new(Vec::new()),
        }
    }

    fn check(data: &[Complex64]) -> Result<(), FftError> {
        if data.is_empty() {
            return Err(FftError::EmptyInput);
        }
        if !data.len().is_power_of_two() {
            return Err(FftError::NonPowerOfTwo);
        }
        Ok(())
    }

    /// Transform `data` in place, producing natural-order output.
    ///
    /// The inverse direction swaps the real and imaginary component of every
    /// sample before and after the forward stage, which yields the unscaled
    /// inverse transform: `transform(Inverse, transform(Forward, b))` equals
    /// `n · b`.
    pub fn transform(&self, direction: Direction, data: &mut [Complex64]) -> Result<(), FftError> {
        Self::check(data)?;
        let n = data.len();
        let mut scratch = self.scratch.borrow_mut();
        if scratch.len() < n {
            scratch.resize(n, Complex64::zero());
        }
        if direction == Direction::Inverse {
            for sample in data.iter_mut() {
                *sample = sample.swapped();
            }
        }
        fourier_stage(data, &mut scratch[..n]);
        if direction == Direction::Inverse {
            for sample in data.iter_mut() {
                *sample = sample.swapped();
            }
        }
        Ok(())
    }

    /// Transform `data` in place and reorder the result into the bit-reversed
    /// index order that streaming hardware pipelines emit.
    ///
    /// Output index `i` receives the natural-order value at `bit_reverse(i)`.
    /// Use [`GoldenFft::transform`] when natural order is wanted; the reorder
    /// here exists to match the device emission convention, not because the
    /// recursive stage requires it.
    pub fn transform_device_order(
        &self,
        direction: Direction,
        data: &mut [Complex64],
    ) -> Result<(), FftError> {
        self.transform(direction, data)?;
        let n = data.len();
        let log_n = n.trailing_zeros();
        let mut scratch = self.scratch.borrow_mut();
        scratch[..n].copy_from_slice(data);
        for (i, sample) in data.iter_mut().enumerate() {
            *sample = scratch[bit_reverse(i, log_n)];
        }
        Ok(())
    }
}
