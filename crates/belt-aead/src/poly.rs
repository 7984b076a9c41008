//! Shared GF(2^128) polynomial-hash tag machinery for belt-DWP and belt-CHE:
//! both fold complete 16-octet blocks into a running value `t` via
//! `t <- (t XOR block) * r`, buffering partial blocks until either more data
//! arrives or finalization zero-pads them.

use belt_block::cipher::BlockCipherEncrypt;
use belt_block::util::gf128_mul;
use belt_block::{BeltBlock, Block};

/// One absorbed stream's buffering state: associated data and ciphertext
/// each get an independent [`Absorber`] but fold into the same shared `t`.
#[derive(Clone, Copy)]
pub(crate) struct Absorber {
    buf: [u8; 16],
    filled: usize,
    bits: u64,
}

impl Absorber {
    pub(crate) fn new() -> Self {
        Self {
            buf: [0u8; 16],
            filled: 0,
            bits: 0,
        }
    }

    /// `bits` processed so far, for the finalization length block.
    pub(crate) fn bits(&self) -> u64 {
        self.bits
    }

    pub(crate) fn absorb(&mut self, data: &[u8], t: &mut [u8; 16], r: &[u8; 16]) {
        self.bits = self.bits.wrapping_add(data.len() as u64 * 8);
        let mut data = data;
        while !data.is_empty() {
            let take = (16 - self.filled).min(data.len());
            self.buf[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled == 16 {
                fold(t, &self.buf, r);
                self.filled = 0;
            }
        }
    }

    /// Fold a zero-padded copy of any pending partial block into `t`
    /// without mutating `self` — finalization must not disturb
    /// in-progress absorption, so that `StepG`/`StepV` can be followed by
    /// more `StepI`/`StepA` calls (the "get-then-continue" pattern every
    /// streaming state in this workspace supports).
    fn peek_final_fold(&self, t: &mut [u8; 16], r: &[u8; 16]) {
        if self.filled > 0 {
            let mut block = self.buf;
            for b in block[self.filled..].iter_mut() {
                *b = 0;
            }
            fold(t, &block, r);
        }
    }
}

pub(crate) fn fold(t: &mut [u8; 16], block: &[u8; 16], r: &[u8; 16]) {
    let mut x = *t;
    for i in 0..16 {
        x[i] ^= block[i];
    }
    *t = gf128_mul(&x, r);
}

/// Finalize the running tag: fold the pending associated-data and
/// ciphertext partial blocks, XOR in the 128-bit length block (ciphertext
/// bit-length in the low 64 bits, associated-data bit-length in the high
/// 64, both little-endian), multiply by `r` once more, and encipher the
/// result under `cipher`. Only the first 8 octets of the enciphered block
/// are kept as the tag.
pub(crate) fn finalize_tag(
    cipher: &BeltBlock,
    t: [u8; 16],
    r: &[u8; 16],
    ad: &Absorber,
    ct: &Absorber,
) -> [u8; 8] {
    let mut t = t;
    ad.peek_final_fold(&mut t, r);
    ct.peek_final_fold(&mut t, r);

    let mut len_block = [0u8; 16];
    len_block[..8].copy_from_slice(&ct.bits().to_le_bytes());
    len_block[8..].copy_from_slice(&ad.bits().to_le_bytes());
    fold(&mut t, &len_block, r);

    let mut block: Block = t.into();
    cipher.encrypt_block(&mut block);
    let full: [u8; 16] = block.into();
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&full[..8]);
    tag
}
