#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! Pure Rust implementation of the belt block cipher (STB 34.101.31): a
//! 128-bit block, 8-round cipher accepting 128/192/256-bit keys.
//!
//! Implements the [`cipher`] crate's block cipher traits so it composes with
//! the rest of the `belt-*` workspace (and, in principle, any other RustCrypto
//! mode crate) the same way `aes`/`aes::Aes128` does.

mod consts;
pub mod util;

pub use cipher;
pub use cipher::{Array, typenum::consts::{U16, U32}};

use cipher::{
    BlockCipherDecrypt, BlockCipherEncrypt, BlockSizeUser, Key, KeyInit, KeySizeUser,
};
use consts::{H, ROUNDS};
use util::{load_u32_le, store_u32_le};

/// Block type: 16 octets.
pub type Block = Array<u8, U16>;

/// Number of rounds applied per block (`8`, per STB 34.101.31).
pub const BELT_BLOCK_ROUNDS: usize = ROUNDS;

/// The belt block cipher.
///
/// Keys shorter than 32 octets (16 or 24) are zero-padded internally to a
/// 32-octet schedule, per STB 34.101.31 §1: the key schedule always operates
/// on eight 32-bit words regardless of the caller-supplied key length.
#[derive(Clone)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub struct BeltBlock {
    /// Precomputed per-round key words, 7 per round across 8 rounds —
    /// `K[0..8)` cycled 7 times (56 total key-word uses).
    round_keys: [[u32; 7]; 8],
}

impl KeySizeUser for BeltBlock {
    type KeySize = U32;
}

impl BlockSizeUser for BeltBlock {
    type BlockSize = U16;
}

impl KeyInit for BeltBlock {
    fn new(key: &Key<Self>) -> Self {
        let mut words = [0u32; 8];
        for (w, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
            *w = load_u32_le(chunk);
        }
        Self::from_words(words)
    }
}

impl BeltBlock {
    /// Build a cipher from a 16, 24 or 32-octet key, zero-padding shorter
    /// keys to the full 32-octet schedule as STB 34.101.31 requires.
    pub fn new_from_slice(key: &[u8]) -> belt_error::Result<Self> {
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(belt_error::Error::BadLength);
        }
        let mut padded = [0u8; 32];
        padded[..key.len()].copy_from_slice(key);
        Ok(Self::new(Array::from_slice(&padded)))
    }

    fn from_words(k: [u32; 8]) -> Self {
        let mut round_keys = [[0u32; 7]; 8];
        let mut counter = 0usize;
        for round in round_keys.iter_mut() {
            for slot in round.iter_mut() {
                *slot = k[counter % 8];
                counter += 1;
            }
        }
        Self { round_keys }
    }
}

/// Apply the belt `H` substitution box to each octet of a 32-bit word.
#[inline]
fn sbox_word(u: u32) -> u32 {
    let b = u.to_le_bytes();
    u32::from_le_bytes([
        H[b[0] as usize],
        H[b[1] as usize],
        H[b[2] as usize],
        H[b[3] as usize],
    ])
}

/// `G_r(u) = (H(u))` rotated left by `r` bits.
#[inline]
fn g(u: u32, r: u32) -> u32 {
    sbox_word(u).rotate_left(r)
}

impl BlockCipherEncrypt for BeltBlock {
    fn encrypt_block(&self, block: &mut Array<u8, U16>) {
        let mut a = load_u32_le(&block[0..4]);
        let mut b = load_u32_le(&block[4..8]);
        let mut c = load_u32_le(&block[8..12]);
        let mut d = load_u32_le(&block[12..16]);

        for (i, rk) in self.round_keys.iter().enumerate() {
            let i = i as u32 + 1;

            b ^= g(a.wrapping_add(rk[0]), 5);
            c ^= g(d.wrapping_add(rk[1]), 21);
            a = a.wrapping_sub(g(b.wrapping_add(rk[2]), 13));
            let e = g(b.wrapping_add(c).wrapping_add(rk[3]), 21) ^ i;
            b = b.wrapping_add(e);
            c = c.wrapping_sub(e);
            d = d.wrapping_add(g(c.wrapping_add(rk[4]), 13));
            b ^= g(a.wrapping_add(rk[5]), 5);
            c ^= g(d.wrapping_add(rk[6]), 21);

            core::mem::swap(&mut a, &mut b);
            core::mem::swap(&mut c, &mut d);
            core::mem::swap(&mut b, &mut c);
        }

        // Final permutation: (a, b, c, d) <- (b, d, a, c).
        let (a, b, c, d) = (b, d, a, c);

        store_u32_le(a, &mut block[0..4]);
        store_u32_le(b, &mut block[4..8]);
        store_u32_le(c, &mut block[8..12]);
        store_u32_le(d, &mut block[12..16]);
    }
}

impl BlockCipherDecrypt for BeltBlock {
    fn decrypt_block(&self, block: &mut Array<u8, U16>) {
        let a_in = load_u32_le(&block[0..4]);
        let b_in = load_u32_le(&block[4..8]);
        let c_in = load_u32_le(&block[8..12]);
        let d_in = load_u32_le(&block[12..16]);

        // Undo the final permutation (a, b, c, d) <- (b, d, a, c).
        let mut a = c_in;
        let mut b = a_in;
        let mut c = d_in;
        let mut d = b_in;

        for (i, rk) in self.round_keys.iter().enumerate().rev() {
            let i = i as u32 + 1;

            core::mem::swap(&mut b, &mut c);
            core::mem::swap(&mut c, &mut d);
            core::mem::swap(&mut a, &mut b);

            c ^= g(d.wrapping_add(rk[6]), 21);
            b ^= g(a.wrapping_add(rk[5]), 5);
            d = d.wrapping_sub(g(c.wrapping_add(rk[4]), 13));
            let e = g(b.wrapping_add(c).wrapping_add(rk[3]), 21) ^ i;
            c = c.wrapping_add(e);
            b = b.wrapping_sub(e);
            a = a.wrapping_add(g(b.wrapping_add(rk[2]), 13));
            c ^= g(d.wrapping_add(rk[1]), 21);
            b ^= g(a.wrapping_add(rk[0]), 5);
        }

        store_u32_le(a, &mut block[0..4]);
        store_u32_le(b, &mut block[4..8]);
        store_u32_le(c, &mut block[8..12]);
        store_u32_le(d, &mut block[12..16]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// STB 34.101.31 test A.1.1: published key/plaintext/ciphertext triple.
    #[test]
    fn stb_a_1_1_matches_published_ciphertext() {
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let cipher = BeltBlock::new_from_slice(&key).unwrap();

        let orig: Block = hex!("B194BAC80A08F53B366D008E584A5DE4").into();
        let expected: Block = hex!("69CCA1C93557C9E3D66BC3E0FA88FA6E").into();

        let mut block = orig;
        cipher.encrypt_block(&mut block);
        assert_eq!(block, expected);

        cipher.decrypt_block(&mut block);
        assert_eq!(block, orig);
    }

    #[test]
    fn round_trip_all_key_sizes() {
        let key32 = [0x5Au8; 32];
        for key_len in [16usize, 24, 32] {
            let cipher = BeltBlock::new_from_slice(&key32[..key_len]).unwrap();
            let plain: Block = [0x11u8; 16].into();
            let mut block = plain;
            cipher.encrypt_block(&mut block);
            assert_ne!(block, plain);
            cipher.decrypt_block(&mut block);
            assert_eq!(block, plain);
        }
    }

    #[test]
    fn rejects_bad_key_length() {
        assert_eq!(
            BeltBlock::new_from_slice(&[0u8; 20]).unwrap_err(),
            belt_error::Error::BadLength
        );
    }
}
