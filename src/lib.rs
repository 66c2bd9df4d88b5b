//! # fftcheck - Golden-model FFT verification
//!
//! Validates a hardware-accelerated Fourier transform against an
//! independently computed double-precision reference, scoring the two with a
//! signal-to-noise ratio instead of exact equality, since hardware pipelines
//! use finite-precision arithmetic.
//!
//! ## Components
//!
//! - [`fft::GoldenFft`]: the reference transform engine, a recursive
//!   decimation-in-time FFT computed entirely in `f64`, with natural-order
//!   and bit-reversed (device emission order) output.
//! - [`harness::VerifyHarness`]: generates random trial corpora, invokes the
//!   device under test through the [`harness::FftDevice`] boundary, samples a
//!   sparse subset of trials, and reduces per-trial SNR to a single
//!   worst-case pass/fail verdict.
//!
//! ## Example
//!
//! ```bash
//! RUST_LOG=info cargo run --example software_loopback
//! ```
//!
//! The device under test is anything implementing [`harness::FftDevice`];
//! the example verifies a single-precision software FFT standing in for a
//! hardware pipeline.
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

pub mod fft;

/// Trial orchestration, SNR scoring, and the device-under-test boundary.
pub mod harness;

/// Complex sample primitives shared by the device- and reference-precision
/// sides of the harness.
pub mod num;

pub use fft::{bit_reverse, Direction, FftError, GoldenFft};
pub use harness::{snr_db, FftDevice, RunReport, VerifyConfig, VerifyError, VerifyHarness};
pub use num::{Complex, Complex32, Complex64, Float};
