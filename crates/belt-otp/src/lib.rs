#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! HOTP (RFC 4226), TOTP (RFC 6238) and OCRA (RFC 6287) one-time password
//! algorithms, keyed with whatever `hmac::Mac` implementation the caller
//! provides — `hmac::Hmac<belt_hash::BeltHash>` is STB 34.101.47's botp
//! profile, but every algorithm here is generic over the MAC so the RFC's
//! own known-answer vectors (computed with HMAC-SHA-1/256) stay checkable
//! against this crate's truncation and suite-parsing logic.

mod hotp;
mod ocra;
mod totp;

pub use belt_error::{Error, Result};
pub use hotp::hotp;
pub use ocra::{generate as ocra_generate, DataInputSpec, OcraInputs, OcraSuite, QuestionFormat};
pub use totp::totp;
