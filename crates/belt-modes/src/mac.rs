//! belt-MAC: a CMAC-like message authentication code built directly on the
//! block primitive, with GF(2^128)-doubled subkeys tweaking the final
//! block depending on whether it was a complete 16-octet block.

use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
use belt_block::util::{gf128_mul_x, xor_inplace};
use belt_block::{BeltBlock, Block};
use belt_error::Result;
use subtle::ConstantTimeEq;

/// `belt-MAC` state.
pub struct Mac {
    cipher: BeltBlock,
    /// Subkey used when the final block is a complete 16 octets.
    r1: Block,
    /// Subkey used when the final block needs `0x80`-padding.
    r2: Block,
    /// Running CBC-MAC state over all but the final block.
    state: Block,
    /// Buffered octets of the block not yet known to be final.
    pending: [u8; 16],
    /// Valid octets in `pending`.
    filled: usize,
}

impl Mac {
    /// `Start(K)`: `s <- 0`, `r <- E_K(0)`, subkeys derived from `r` by
    /// doubling in `GF(2^128)`.
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = BeltBlock::new_from_slice(key)?;
        let mut r = Block::default();
        cipher.encrypt_block(&mut r);

        let mut r1: [u8; 16] = r.into();
        gf128_mul_x(&mut r1);
        let mut r2 = r1;
        gf128_mul_x(&mut r2);

        Ok(Self {
            cipher,
            r1: r1.into(),
            r2: r2.into(),
            state: Block::default(),
            pending: [0u8; 16],
            filled: 0,
        })
    }

    /// `StepA`: absorb `data`. Blocks are only folded into the running CBC
    /// state once a later call (or `StepG`/`StepV`) proves they are not the
    /// final block.
    pub fn update(&mut self, data: &[u8]) {
        let mut data = data;
        while !data.is_empty() {
            if self.filled == 16 {
                self.flush_pending_as_interior();
            }
            let take = (16 - self.filled).min(data.len());
            self.pending[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
        }
    }

    fn flush_pending_as_interior(&mut self) {
        let mut block: Block = self.pending.into();
        xor_inplace(&mut block, &self.state);
        self.cipher.encrypt_block(&mut block);
        self.state = block;
        self.filled = 0;
    }

    /// `StepG`: produce the 8-octet tag without disturbing `self`, so
    /// absorption can continue afterward (the "get-then-continue" pattern
    /// every streaming state in this workspace supports).
    pub fn finalize(&self) -> [u8; 8] {
        let mut block: Block = self.pending.into();

        if self.filled == 16 {
            xor_inplace(&mut block, &self.r1);
        } else {
            block[self.filled] = 0x80;
            for b in block[self.filled + 1..].iter_mut() {
                *b = 0;
            }
            xor_inplace(&mut block, &self.r2);
        }

        xor_inplace(&mut block, &self.state);
        self.cipher.encrypt_block(&mut block);

        let full: [u8; 16] = block.into();
        let mut tag = [0u8; 8];
        tag.copy_from_slice(&full[..8]);
        tag
    }

    /// `StepV`: compare `tag` against the computed tag in constant time.
    /// `tag` may be shorter than 8 octets (a truncated tag), matching the
    /// spec's "8 octets (or a shorter truncation)" wire format.
    pub fn verify(&self, tag: &[u8]) -> bool {
        if tag.is_empty() || tag.len() > 8 {
            return false;
        }
        let computed = self.finalize();
        computed[..tag.len()].ct_eq(tag).into()
    }
}

/// One-shot `belt-MAC` tag computation.
pub fn mac(key: &[u8], data: &[u8]) -> Result<[u8; 8]> {
    let mut m = Mac::new(key)?;
    m.update(data);
    Ok(m.finalize())
}

/// One-shot `belt-MAC` verification.
pub fn verify(key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool> {
    let mut m = Mac::new(key)?;
    m.update(data);
    Ok(m.verify(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_verify() {
        let key = [0x2Bu8; 32];
        let msg = b"the quick brown fox";
        let tag = mac(&key, msg).unwrap();
        assert!(verify(&key, msg, &tag).unwrap());
    }

    #[test]
    fn tamper_detected() {
        let key = [0x2Bu8; 32];
        let mut tag = mac(&key, b"hello").unwrap();
        tag[0] ^= 1;
        assert!(!verify(&key, b"hello", &tag).unwrap());
    }

    #[test]
    fn complete_vs_padded_last_block_differ() {
        let key = [0x77u8; 16];
        let tag_16 = mac(&key, &[0x11u8; 16]).unwrap();
        let tag_15 = mac(&key, &[0x11u8; 15]).unwrap();
        assert_ne!(tag_16, tag_15);
    }

    #[test]
    fn empty_message_produces_a_tag() {
        let key = [0x01u8; 24];
        let tag = mac(&key, &[]).unwrap();
        assert!(verify(&key, &[], &tag).unwrap());
    }

    #[test]
    fn split_updates_match_one_shot() {
        let key = [0x09u8; 32];
        let msg = [0xEEu8; 50];

        let one_shot = mac(&key, &msg).unwrap();

        let mut m = Mac::new(&key).unwrap();
        m.update(&msg[..16]);
        m.update(&msg[16..33]);
        m.update(&msg[33..]);

        assert_eq!(one_shot, m.finalize());
    }

    #[test]
    fn truncated_tag_still_verifies() {
        let key = [0x44u8; 32];
        let tag = mac(&key, b"truncate me").unwrap();
        assert!(verify(&key, b"truncate me", &tag[..4]).unwrap());
    }
}
