//! `belt-compr`: the double pseudo-random permutation STB 34.101.31 builds
//! `belt-hash` from.

use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
use belt_block::{Array, BeltBlock, Block};

/// Output of [`compr`]: the updated chaining value `h` and the independent
/// 128-bit absorber `sigma1`.
pub struct ComprOutput {
    /// Updated low half of the 256-bit chaining value.
    pub h_lo: [u8; 16],
    /// Updated high half of the 256-bit chaining value.
    pub h_hi: [u8; 16],
    /// Independent 128-bit absorber output.
    pub sigma1: [u8; 16],
}

fn xor16(a: &[u8; 16], b: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for i in 0..16 {
        out[i] = a[i] ^ b[i];
    }
    out
}

fn key32(lo: &[u8; 16], hi: &[u8; 16]) -> Array<u8, belt_block::U32> {
    let mut k = [0u8; 32];
    k[..16].copy_from_slice(lo);
    k[16..].copy_from_slice(hi);
    k.into()
}

/// `belt-compr(h_lo, h_hi, X_lo, X_hi)`.
///
/// Exposed beyond `belt-hash` itself because `belt-wbl`'s key-diversification
/// primitive (KRP, STB 34.101.31 §4.E) is specified as a single `belt-compr`
/// application rather than a full hash absorb — it is the same collaborator,
/// just invoked directly instead of through [`crate::BeltHash`].
pub fn compr(h_lo: &[u8; 16], h_hi: &[u8; 16], x_lo: &[u8; 16], x_hi: &[u8; 16]) -> ComprOutput {
    // sigma1 = E_{h_lo||h_hi}(X_lo ^ X_hi) ^ X_lo ^ X_hi
    let x_xor = xor16(x_lo, x_hi);
    let k_h = BeltBlock::new(&key32(h_lo, h_hi));
    let mut sigma1_block: Block = x_xor.into();
    k_h.encrypt_block(&mut sigma1_block);
    let sigma1_arr: [u8; 16] = sigma1_block.into();
    let sigma1 = xor16(&sigma1_arr, &x_xor);

    // K1 = (h_lo ^ h_hi) || h_hi
    let k1_lo = xor16(h_lo, h_hi);
    let k1 = key32(&k1_lo, h_hi);
    // K2 = !(K1_lo) || h_lo = !(h_lo ^ h_hi) || h_lo
    let mut k2_lo = k1_lo;
    for b in k2_lo.iter_mut() {
        *b = !*b;
    }
    let k2 = key32(&k2_lo, h_lo);

    let cipher_k1 = BeltBlock::new(&k1);
    let mut h_lo_block: Block = (*x_lo).into();
    cipher_k1.encrypt_block(&mut h_lo_block);
    let h_lo_arr: [u8; 16] = h_lo_block.into();
    let h_lo_new = xor16(&h_lo_arr, x_lo);

    let cipher_k2 = BeltBlock::new(&k2);
    let mut h_hi_block: Block = (*x_hi).into();
    cipher_k2.encrypt_block(&mut h_hi_block);
    let h_hi_arr: [u8; 16] = h_hi_block.into();
    let h_hi_new = xor16(&h_hi_arr, x_hi);

    ComprOutput {
        h_lo: h_lo_new,
        h_hi: h_hi_new,
        sigma1,
    }
}
