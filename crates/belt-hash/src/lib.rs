#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! Pure Rust implementation of belt-hash (STB 34.101.31): a 256-bit
//! Merkle-Damgard hash built from the [`belt-compr`](compr) double
//! pseudo-random permutation.
//!
//! HMAC is obtained for free by applying the generic [`hmac`](https://docs.rs/hmac)
//! crate to [`BeltHash`] (`hmac::Hmac<BeltHash>`) — `BeltHash`'s 32-octet
//! block size drives the standard ipad/opad construction, so no separate
//! `belt-hmac` crate is needed.

pub mod compr;

pub use digest::{self, Digest};

use compr::compr;
use digest::{
    FixedOutput, HashMarker, Output, OutputSizeUser, Reset, Update,
    core_api::BlockSizeUser,
    typenum::U32,
};

/// `belt-hash` running state: `(len, s, h, buf, filled)` from STB 34.101.31 §2.4.
#[derive(Clone)]
pub struct BeltHash {
    /// Running bit-length, capped at 2^128 - 1 per the reference ceiling.
    len: u128,
    /// Running sigma1 accumulator.
    s: [u8; 16],
    /// 256-bit chaining value, split `h_lo || h_hi`.
    h: [u8; 32],
    /// Up to 32 pending octets not yet folded into `s`/`h`.
    buf: [u8; 32],
    /// Number of valid octets in `buf`.
    filled: usize,
}

/// Initial chaining value, STB 34.101.31 §2.4 (Table A.2): all-zero.
const H0: [u8; 32] = [0u8; 32];

impl Default for BeltHash {
    fn default() -> Self {
        Self {
            len: 0,
            s: [0u8; 16],
            h: H0,
            buf: [0u8; 32],
            filled: 0,
        }
    }
}

impl BeltHash {
    /// Start a fresh hash state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb `data`, folding in full 32-octet blocks as they accumulate.
    pub fn update(&mut self, data: &[u8]) {
        let mut data = data;

        if self.filled > 0 {
            let need = 32 - self.filled;
            let take = need.min(data.len());
            self.buf[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];

            if self.filled == 32 {
                self.absorb_block();
                self.filled = 0;
            }
        }

        while data.len() >= 32 {
            self.buf.copy_from_slice(&data[..32]);
            self.absorb_block();
            data = &data[32..];
        }

        if !data.is_empty() {
            self.buf[..data.len()].copy_from_slice(data);
            self.filled = data.len();
        }
    }

    fn absorb_block(&mut self) {
        let x_lo: [u8; 16] = self.buf[..16].try_into().unwrap();
        let x_hi: [u8; 16] = self.buf[16..].try_into().unwrap();
        let h_lo: [u8; 16] = self.h[..16].try_into().unwrap();
        let h_hi: [u8; 16] = self.h[16..].try_into().unwrap();

        let out = compr(&h_lo, &h_hi, &x_lo, &x_hi);
        for (s, x) in self.s.iter_mut().zip(out.sigma1.iter()) {
            *s ^= x;
        }
        self.h[..16].copy_from_slice(&out.h_lo);
        self.h[16..].copy_from_slice(&out.h_hi);

        self.len += 256;
    }

    /// Finalize into a 32-octet digest without disturbing `self`, so
    /// absorption can continue afterward (STB 34.101.31 allows repeated
    /// `StepG` calls interleaved with further `StepH`).
    pub fn finalize(&self) -> [u8; 32] {
        let mut h = self.h;
        let mut s = self.s;
        let len_bits = self.len + (self.filled as u128) * 8;

        if self.filled > 0 {
            let mut padded = self.buf;
            for b in padded[self.filled..].iter_mut() {
                *b = 0;
            }
            let x_lo: [u8; 16] = padded[..16].try_into().unwrap();
            let x_hi: [u8; 16] = padded[16..].try_into().unwrap();
            let h_lo: [u8; 16] = h[..16].try_into().unwrap();
            let h_hi: [u8; 16] = h[16..].try_into().unwrap();

            let out = compr(&h_lo, &h_hi, &x_lo, &x_hi);
            for (sb, xb) in s.iter_mut().zip(out.sigma1.iter()) {
                *sb ^= xb;
            }
            h[..16].copy_from_slice(&out.h_lo);
            h[16..].copy_from_slice(&out.h_hi);
        }

        // Final block: <len>_128 || s, compressed with the running h.
        let mut final_block = [0u8; 32];
        final_block[..16].copy_from_slice(&len_bits.to_le_bytes());
        final_block[16..].copy_from_slice(&s);

        let h_lo: [u8; 16] = h[..16].try_into().unwrap();
        let h_hi: [u8; 16] = h[16..].try_into().unwrap();
        let x_lo: [u8; 16] = final_block[..16].try_into().unwrap();
        let x_hi: [u8; 16] = final_block[16..].try_into().unwrap();

        let out = compr(&h_lo, &h_hi, &x_lo, &x_hi);
        let mut digest = [0u8; 32];
        digest[..16].copy_from_slice(&out.h_lo);
        digest[16..].copy_from_slice(&out.h_hi);
        digest
    }

    /// Finalize and reset to a fresh state.
    pub fn finalize_reset(&mut self) -> [u8; 32] {
        let out = self.finalize();
        *self = Self::new();
        out
    }
}

// --- `digest` crate trait plumbing, so `BeltHash` interoperates with
// `hmac::Hmac<BeltHash>` and any other generic `Digest` consumer. ---

impl HashMarker for BeltHash {}

impl OutputSizeUser for BeltHash {
    type OutputSize = U32;
}

impl BlockSizeUser for BeltHash {
    type BlockSize = U32;
}

impl Update for BeltHash {
    fn update(&mut self, data: &[u8]) {
        BeltHash::update(self, data)
    }
}

impl FixedOutput for BeltHash {
    fn finalize_into(self, out: &mut Output<Self>) {
        out.copy_from_slice(&BeltHash::finalize(&self));
    }
}

impl Reset for BeltHash {
    fn reset(&mut self) {
        *self = Self::new();
    }
}
