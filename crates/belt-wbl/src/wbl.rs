//! belt-WBL: a `2n`-round wide-block construction around the belt block
//! cipher, operating on `n = ⌈len / 16⌉` pseudo-blocks (`len >= 32`).
//!
//! Each round computes `s`, the XOR of every full pseudo-block but the last;
//! enciphers `s` XORed with the round number; XORs that into the
//! second-to-last block; and rotates the block array left by one, with `s`
//! taking the new last slot. Decryption runs the inverse round in reverse
//! round order (`2n, 2n-1, ..., 1`), which is an exact algebraic inverse
//! (see the round-trip test at the bottom of this module for the derivation
//! sketch this is based on).
//!
//! When `len` is not a multiple of 16, the trailing `len % 16` octets form a
//! short final pseudo-block that sits outside the rotating window: the `m =
//! len / 16` full blocks run the construction above completely unchanged
//! (and on their own form a valid `>= 32`-octet WBL instance, since `m >= 2`
//! whenever `len >= 32`), and each round's tweak `t` additionally masks the
//! short block's own octets. The short block never joins the running XOR
//! `s`, so it has no influence on how the full blocks are mixed — but every
//! round's `t` depends only on `s`, which [`inverse_round`] reconstructs
//! exactly while undoing the full blocks, so the same mask is recoverable
//! octet-for-octet on decryption regardless of the order the per-round masks
//! are combined (XOR is commutative).

use alloc::vec::Vec;

use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
use belt_block::{BeltBlock, Block};
use belt_error::{Error, Result};

fn xor16(dst: &mut [u8; 16], src: &[u8; 16]) {
    for i in 0..16 {
        dst[i] ^= src[i];
    }
}

fn round_tweak(cipher: &BeltBlock, s: [u8; 16], round: u32) -> [u8; 16] {
    let mut block: Block = s.into();
    cipher.encrypt_block(&mut block);
    let mut t: [u8; 16] = block.into();
    let rb = round.to_le_bytes();
    for i in 0..4 {
        t[i] ^= rb[i];
    }
    t
}

fn split_blocks(buf: &[u8]) -> Result<Vec<[u8; 16]>> {
    if buf.len() < 32 || buf.len() % 16 != 0 {
        return Err(Error::BadLength);
    }
    Ok(buf
        .chunks_exact(16)
        .map(|c| c.try_into().unwrap())
        .collect())
}

fn join_blocks(blocks: &[[u8; 16]], out: &mut [u8]) {
    for (chunk, block) in out.chunks_exact_mut(16).zip(blocks) {
        chunk.copy_from_slice(block);
    }
}

/// One forward round, as described in the module docs. Returns the new
/// running XOR-sum (`s` for the *next* round, also the content of the block
/// just rotated into the last slot) alongside this round's tweak `t`, so
/// callers mixing in a pinned short tail block (see [`encrypt`]) can fold
/// `t` into it without recomputing `round_tweak`.
fn forward_round(
    blocks: &mut [[u8; 16]],
    cipher: &BeltBlock,
    round: u32,
    sum: [u8; 16],
) -> ([u8; 16], [u8; 16]) {
    let n = blocks.len();
    let t = round_tweak(cipher, sum, round);

    let old_first = blocks[0];
    let old_last = blocks[n - 1];

    for i in 0..n - 2 {
        blocks[i] = blocks[i + 1];
    }
    let mut new_last_minus_1 = old_last;
    xor16(&mut new_last_minus_1, &t);
    blocks[n - 2] = new_last_minus_1;
    blocks[n - 1] = sum;

    // next round's sum = XOR(blocks[0..n-2]) = (sum ^ old_first) ^ new_last_minus_1,
    // i.e. drop `old_first` out of the running XOR and fold in the block that
    // just rotated into the window.
    let mut next_sum = sum;
    xor16(&mut next_sum, &old_first);
    xor16(&mut next_sum, &new_last_minus_1);
    (next_sum, t)
}

/// The exact inverse of [`forward_round`]: given the blocks *after* a
/// forward round and that round's number, recovers the blocks from before
/// it. Also returns that round's tweak `t`, recovered from `s` exactly as
/// `forward_round` computed it, for the same tail-masking purpose.
fn inverse_round(blocks: &mut [[u8; 16]], cipher: &BeltBlock, round: u32) -> [u8; 16] {
    let n = blocks.len();
    let s = blocks[n - 1];
    let t = round_tweak(cipher, s, round);

    let mut recovered_last = blocks[n - 2];
    xor16(&mut recovered_last, &t);

    let mut recovered_first = s;
    for b in &blocks[..n - 2] {
        xor16(&mut recovered_first, b);
    }

    for i in (0..n - 2).rev() {
        blocks[i + 1] = blocks[i];
    }
    blocks[0] = recovered_first;
    blocks[n - 1] = recovered_last;
    t
}

fn encrypt_aligned(cipher: &BeltBlock, blocks: &mut [[u8; 16]]) {
    let n = blocks.len();
    let mut sum = [0u8; 16];
    for b in &blocks[..n - 1] {
        xor16(&mut sum, b);
    }
    for round in 1..=2 * n as u32 {
        let (next_sum, _t) = forward_round(blocks, cipher, round, sum);
        sum = next_sum;
    }
}

fn decrypt_aligned(cipher: &BeltBlock, blocks: &mut [[u8; 16]]) {
    let n = blocks.len();
    for round in (1..=2 * n as u32).rev() {
        inverse_round(blocks, cipher, round);
    }
}

/// `belt-WBL` encryption in place. `buf.len()` must be `>= 32`; lengths that
/// are not a multiple of 16 carry a short final pseudo-block (see the module
/// docs).
pub fn encrypt(key: &[u8], buf: &mut [u8]) -> Result<()> {
    if buf.len() < 32 {
        return Err(Error::BadLength);
    }
    let cipher = BeltBlock::new_from_slice(key)?;
    let tail_len = buf.len() % 16;

    if tail_len == 0 {
        let mut blocks = split_blocks(buf)?;
        encrypt_aligned(&cipher, &mut blocks);
        join_blocks(&blocks, buf);
        return Ok(());
    }

    let full_len = buf.len() - tail_len;
    let (body, tail) = buf.split_at_mut(full_len);
    let mut blocks: Vec<[u8; 16]> = body
        .chunks_exact(16)
        .map(|c| c.try_into().unwrap())
        .collect();
    let m = blocks.len();

    let mut sum = [0u8; 16];
    for b in &blocks[..m - 1] {
        xor16(&mut sum, b);
    }
    for round in 1..=2 * m as u32 {
        let (next_sum, t) = forward_round(&mut blocks, &cipher, round, sum);
        sum = next_sum;
        for (byte, t_byte) in tail.iter_mut().zip(t.iter()) {
            *byte ^= t_byte;
        }
    }

    join_blocks(&blocks, body);
    Ok(())
}

/// `belt-WBL` decryption in place.
pub fn decrypt(key: &[u8], buf: &mut [u8]) -> Result<()> {
    if buf.len() < 32 {
        return Err(Error::BadLength);
    }
    let cipher = BeltBlock::new_from_slice(key)?;
    let tail_len = buf.len() % 16;

    if tail_len == 0 {
        let mut blocks = split_blocks(buf)?;
        decrypt_aligned(&cipher, &mut blocks);
        join_blocks(&blocks, buf);
        return Ok(());
    }

    let full_len = buf.len() - tail_len;
    let (body, tail) = buf.split_at_mut(full_len);
    let mut blocks: Vec<[u8; 16]> = body
        .chunks_exact(16)
        .map(|c| c.try_into().unwrap())
        .collect();
    let m = blocks.len();

    for round in (1..=2 * m as u32).rev() {
        let t = inverse_round(&mut blocks, &cipher, round);
        for (byte, t_byte) in tail.iter_mut().zip(t.iter()) {
            *byte ^= t_byte;
        }
    }

    join_blocks(&blocks, body);
    Ok(())
}

/// Reference encryption that recomputes the full `n-1`-wide XOR every round
/// instead of threading the running `sum` incrementally. Used only to prove
/// the optimized [`encrypt`] above is bit-identical to it (`spec.md` §4.E:
/// "the optimized path and the generic path must produce bit-identical
/// output") on the aligned (multiple-of-16) path.
#[cfg(test)]
fn encrypt_generic(key: &[u8], buf: &mut [u8]) -> Result<()> {
    let cipher = BeltBlock::new_from_slice(key)?;
    let mut blocks = split_blocks(buf)?;
    let n = blocks.len();

    for round in 1..=2 * n as u32 {
        let mut sum = [0u8; 16];
        for b in &blocks[..n - 1] {
            xor16(&mut sum, b);
        }
        forward_round(&mut blocks, &cipher, round, sum);
    }

    join_blocks(&blocks, buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_two_blocks() {
        let key = [0x11u8; 32];
        let mut buf = *b"0123456789ABCDEF0123456789ABCDEF";
        let buf = &mut buf[..32];
        let orig = buf.to_vec();
        encrypt(&key, buf).unwrap();
        assert_ne!(buf, orig.as_slice());
        decrypt(&key, buf).unwrap();
        assert_eq!(buf, orig.as_slice());
    }

    #[test]
    fn round_trip_several_lengths() {
        let key = [0x22u8; 24];
        for n_blocks in [2usize, 3, 4, 7] {
            let len = n_blocks * 16;
            let mut buf: alloc::vec::Vec<u8> = (0..len as u8).collect();
            let orig = buf.clone();
            encrypt(&key, &mut buf).unwrap();
            assert_ne!(buf, orig, "n_blocks={n_blocks}");
            decrypt(&key, &mut buf).unwrap();
            assert_eq!(buf, orig, "n_blocks={n_blocks}");
        }
    }

    #[test]
    fn round_trip_non_aligned_lengths() {
        let key = [0x66u8; 32];
        // 40 = belt-KWP over a 24-octet key (24 + 16-octet header).
        for len in [33usize, 40, 47, 48 + 8] {
            let mut buf: alloc::vec::Vec<u8> = (0..len as u8).collect();
            let orig = buf.clone();
            encrypt(&key, &mut buf).unwrap();
            assert_ne!(buf, orig, "len={len}");
            decrypt(&key, &mut buf).unwrap();
            assert_eq!(buf, orig, "len={len}");
        }
    }

    #[test]
    fn non_aligned_tail_depends_on_key_and_position() {
        // The tail mask must differ from a naive "XOR with zero" no-op, and
        // flipping a tail octet in the ciphertext must not silently recover
        // the same plaintext octet back.
        let key = [0x77u8; 32];
        let mut buf = [0xAAu8; 40];
        let orig = buf;
        encrypt(&key, &mut buf).unwrap();
        assert_ne!(&buf[32..], &orig[32..]);

        let mut tampered = buf;
        tampered[39] ^= 1;
        decrypt(&key, &mut tampered).unwrap();
        let mut untampered = buf;
        decrypt(&key, &mut untampered).unwrap();
        assert_ne!(tampered[39], untampered[39]);
    }

    #[test]
    fn rejects_too_short() {
        let key = [0x33u8; 16];
        let mut too_short = [0u8; 16];
        assert_eq!(encrypt(&key, &mut too_short).unwrap_err(), Error::BadLength);

        let mut too_short_unaligned = [0u8; 20];
        assert_eq!(
            encrypt(&key, &mut too_short_unaligned).unwrap_err(),
            Error::BadLength
        );
    }

    #[test]
    fn optimized_path_matches_generic_path() {
        let key = [0x44u8; 32];
        for n_blocks in [2usize, 3, 5] {
            let len = n_blocks * 16;
            let input: alloc::vec::Vec<u8> = (0..len as u8).map(|b| b ^ 0x5A).collect();

            let mut opt = input.clone();
            encrypt(&key, &mut opt).unwrap();

            let mut generic = input;
            encrypt_generic(&key, &mut generic).unwrap();

            assert_eq!(opt, generic, "n_blocks={n_blocks}");
        }
    }
}
