#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! Authenticated belt (STB 34.101.31) modes: `belt-DWP` and `belt-CHE`, both
//! combining CTR-family confidentiality with a `GF(2^128)` polynomial-hash
//! MAC over associated data and ciphertext, as incremental
//! `Start`/`StepI`/`StepE`/`StepD`/`StepA`/`StepG`/`StepV` state machines
//! plus one-shot `wrap`/`unwrap` convenience wrappers.
//!
//! The two modes share everything but the keystream counter's advance rule
//! (see [`che`]'s module docs): [`dwp`] increments it like `belt-CTR`,
//! [`che`] doubles it in `GF(2^128)`.

pub mod che;
pub mod dwp;

mod poly;

pub use belt_error::{Error, Result};
