//! belt-ECB: plain block substitution, with ciphertext stealing for inputs
//! that are not a multiple of 16 octets.

use belt_block::{BeltBlock, Block};
use belt_error::Result;

use crate::cts::{decrypt_cts, encrypt_cts};

/// `belt-ECB` state: just the expanded key, per STB 34.101.31 §4.C.
pub struct Ecb {
    cipher: BeltBlock,
}

impl Ecb {
    /// `Start(K)`.
    pub fn new(key: &[u8]) -> Result<Self> {
        Ok(Self {
            cipher: BeltBlock::new_from_slice(key)?,
        })
    }

    /// `StepE`: encrypt `buf` in place. Requires `buf.len() >= 16`; lengths
    /// that are not a multiple of 16 use ciphertext stealing.
    pub fn encrypt(&self, buf: &mut [u8]) -> Result<()> {
        let mut unused_chain = Block::default();
        encrypt_cts(&self.cipher, buf, &mut unused_chain, false)
    }

    /// `StepD`: decrypt `buf` in place.
    pub fn decrypt(&self, buf: &mut [u8]) -> Result<()> {
        let mut unused_chain = Block::default();
        decrypt_cts(&self.cipher, buf, &mut unused_chain, false)
    }
}

/// One-shot `belt-ECB` encryption.
pub fn encrypt(key: &[u8], buf: &mut [u8]) -> Result<()> {
    Ecb::new(key)?.encrypt(buf)
}

/// One-shot `belt-ECB` decryption.
pub fn decrypt(key: &[u8], buf: &mut [u8]) -> Result<()> {
    Ecb::new(key)?.decrypt(buf)
}
