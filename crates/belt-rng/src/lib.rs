#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! STB 34.101.47 deterministic random bit generators: [`ctr::BrngCtr`]
//! (hash-chained counter mode) and [`hmac::BrngHmac`] (HMAC-chained mode),
//! the [`health`] FIPS-140-1 statistical tests used to qualify an entropy
//! source before it seeds either generator, and — with the `std` feature —
//! [`entropy`] source harvesting and the process-wide [`singleton`] built on
//! top of it.
//!
//! `brng-ctr` and `brng-hmac` are usable in `no_std` (they only need a key
//! and an `iv` handed to them); everything downstream of a live entropy
//! source needs a thread, a clock, or an OS RNG backend, so it sits behind
//! `std`.

extern crate alloc;

pub mod ctr;
#[cfg(feature = "std")]
pub mod entropy;
pub mod health;
pub mod hmac;
#[cfg(feature = "std")]
pub mod singleton;

pub use belt_error::{Error, Result};
pub use ctr::BrngCtr;
pub use hmac::BrngHmac;
#[cfg(feature = "std")]
pub use singleton::{rng_close, rng_create, rng_step_r, rng_step_r2};
