#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! `btok-sm`: the STB 34.101.79 (btok) Secure Messaging layer, ISO/IEC
//! 7816-4 APDU command/response wrapping built on `belt-CFB` confidentiality
//! and `belt-MAC` integrity (`spec.md` §4.J).
//!
//! A session derives two subkeys from one master key via `belt-KRP`
//! (`key_mac` from level `<1>`, `key_enc` from level `<2>`) and tracks a
//! 16-octet little-endian counter that increments before every wrap or
//! unwrap; the counter's parity encodes direction (odd for commands, even
//! for responses) so a peer can detect both replay and direction confusion.
//!
//! ```
//! use btok_sm::{CommandApdu, Sm};
//!
//! let key = [0x11u8; 32];
//! let mut card = Sm::new(&key).unwrap();
//! let mut reader = Sm::new(&key).unwrap();
//!
//! let select = CommandApdu {
//!     cla: 0x00,
//!     ins: 0xA4,
//!     p1: 0x04,
//!     p2: 0x0C,
//!     data: vec![0x3F, 0x00],
//!     le: None,
//! };
//! let wrapped = reader.cmd_wrap(&select).unwrap();
//! let recovered = card.cmd_unwrap(&wrapped).unwrap();
//! assert_eq!(recovered, select);
//! ```

extern crate alloc;

mod apdu;
mod counter;
mod sm;
mod tlv;

pub use apdu::CommandApdu;
pub use belt_error::{Error, Result};
pub use counter::Direction;
pub use sm::Sm;
