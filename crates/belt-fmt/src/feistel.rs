//! The three-round unbalanced Feistel network belt-FMT drives: one round
//! per call to [`round_function`], alternating which half of the digit
//! string it updates.

use alloc::vec::Vec;

use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
use belt_block::{BeltBlock, Block};
use belt_error::Result;
use belt_hash::{BeltHash, Digest};

use crate::digits::{blocks_needed, bytes_to_digits, digits_to_bytes};

/// `belt-H`-derived round constant: 4 octets taken from `belt-hash` of a
/// short label unique to the round number, standing in for bee2's
/// table-driven round constants (not reproduced here, since the workspace
/// has no reference for its exact values).
fn round_constant(round: u8) -> [u8; 4] {
    let mut h = BeltHash::new();
    h.update(b"belt-fmt-round");
    h.update(&[round]);
    let digest = h.finalize();
    [digest[0], digest[1], digest[2], digest[3]]
}

/// One belt-FMT Feistel round: derive a pseudorandom value from `source`
/// (a base-`m` digit string) and a per-round tweak, long enough to
/// componentwise-add into a digit string of `target_len` digits.
///
/// `key` is the raw key octets (16/24/32), threaded through so the `b >= 2`
/// path can re-key belt-WBL independently of the single-block ECB path.
pub(crate) fn round_function(
    key: &[u8],
    m: u32,
    iv: &[u8; 4],
    round: u8,
    source: &[u16],
    target_len: usize,
) -> Result<Vec<u16>> {
    let cipher = BeltBlock::new_from_slice(key)?;

    let cap_digits = source.len().max(target_len);
    let num_bytes = blocks_needed(m, cap_digits) * 8;

    let mut combined = digits_to_bytes(source, m, num_bytes);
    combined.extend_from_slice(&round_constant(round));
    combined.extend_from_slice(iv);

    if combined.len() <= 16 {
        combined.resize(16, 0);
        let mut block: Block = <[u8; 16]>::try_from(combined.as_slice()).unwrap().into();
        cipher.encrypt_block(&mut block);
        let out: [u8; 16] = block.into();
        combined = out.to_vec();
    } else {
        let padded_len = combined.len().div_ceil(16).max(2) * 16;
        combined.resize(padded_len, 0);
        belt_wbl::encrypt(key, &mut combined)?;
    }

    combined.truncate(num_bytes);
    Ok(bytes_to_digits(&combined, m, target_len))
}

/// Componentwise `(a + b) mod m`.
pub(crate) fn add_digits_mod_m(a: &mut [u16], b: &[u16], m: u32) {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        let sum = (*x as u32 + *y as u32) % m;
        *x = sum as u16;
    }
}

/// Componentwise `(a - b) mod m`.
pub(crate) fn sub_digits_mod_m(a: &mut [u16], b: &[u16], m: u32) {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        let diff = (*x as u32 + m - (*y as u32 % m)) % m;
        *x = diff as u16;
    }
}
