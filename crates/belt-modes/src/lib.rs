#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! Streaming belt (STB 34.101.31) block-cipher modes: ECB, CBC, CFB, CTR and
//! MAC, each as a `Start`/`Step*`/`Finish` state machine plus a one-shot
//! convenience wrapper, matching the reference source's incremental API.
//!
//! Every mode owns its own [`belt_block::BeltBlock`] key schedule; there is
//! no shared mutable state between mode instances (per `spec.md` §3's
//! ownership rules).

pub mod cbc;
pub mod cfb;
pub mod ctr;
pub mod ecb;
pub mod mac;

mod cts;

pub use belt_error::{Error, Result};
