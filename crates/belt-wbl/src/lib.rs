#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! `belt-wbl`: the wide-block length-preserving cipher from STB 34.101.31
//! §6.2, plus the key-management primitives the rest of the suite builds on
//! it — `belt-KWP` key wrap, `belt-KRP` key diversification, and the
//! `belt-BDE`/`belt-SDE` disk-sector modes.
//!
//! `belt-wbl` itself only requires buffers of `>= 32` octets; lengths that
//! are not a multiple of 16 (e.g. KWP over a 24-octet key, 24 + 16 = 40
//! octets) carry a short final pseudo-block handled by [`wbl`]'s per-round
//! tail mask — see that module's docs for the construction.

extern crate alloc;

mod disk;
mod krp;
mod kwp;
mod wbl;

pub use belt_error::{Error, Result};
pub use disk::{bde_decrypt_sector, bde_encrypt_sector, sde_decrypt_sector, sde_encrypt_sector};
pub use krp::{KeyLevel, Krp};
pub use kwp::{unwrap, wrap};
pub use wbl::{decrypt, encrypt};
