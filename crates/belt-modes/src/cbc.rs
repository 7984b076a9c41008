//! belt-CBC: cipher block chaining, with ciphertext stealing for inputs
//! that are not a multiple of 16 octets.

use belt_block::{BeltBlock, Block};
use belt_error::Result;

use crate::cts::{decrypt_cts, encrypt_cts};

/// `belt-CBC` state: the expanded key and the running chaining block.
#[derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct Cbc {
    cipher: BeltBlock,
    iv: Block,
}

impl Cbc {
    /// `Start(K, IV)`.
    pub fn new(key: &[u8], iv: &[u8; 16]) -> Result<Self> {
        Ok(Self {
            cipher: BeltBlock::new_from_slice(key)?,
            iv: (*iv).into(),
        })
    }

    /// `StepE`: encrypt `buf` in place, chaining from the current `IV`/state.
    /// Requires `buf.len() >= 16`.
    pub fn encrypt(&mut self, buf: &mut [u8]) -> Result<()> {
        encrypt_cts(&self.cipher, buf, &mut self.iv, true)
    }

    /// `StepD`: decrypt `buf` in place.
    pub fn decrypt(&mut self, buf: &mut [u8]) -> Result<()> {
        decrypt_cts(&self.cipher, buf, &mut self.iv, true)
    }
}

/// One-shot `belt-CBC` encryption.
pub fn encrypt(key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
    Cbc::new(key, iv)?.encrypt(buf)
}

/// One-shot `belt-CBC` decryption.
pub fn decrypt(key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
    Cbc::new(key, iv)?.decrypt(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let key = [0x24u8; 32];
        let iv = [0x01u8; 16];
        for len in [16usize, 17, 30, 32, 47] {
            let mut buf: [u8; 64] = [0; 64];
            for (i, b) in buf.iter_mut().enumerate().take(len) {
                *b = i as u8;
            }
            let orig = buf;
            encrypt(&key, &iv, &mut buf[..len]).unwrap();
            assert_ne!(&buf[..len], &orig[..len]);
            decrypt(&key, &iv, &mut buf[..len]).unwrap();
            assert_eq!(&buf[..len], &orig[..len]);
        }
    }

    #[test]
    fn differs_from_ecb() {
        let key = [0x24u8; 32];
        let iv = [0x00u8; 16];
        let mut cbc_buf = [0x55u8; 32];
        encrypt(&key, &iv, &mut cbc_buf).unwrap();

        let mut ecb_buf = [0x55u8; 32];
        crate::ecb::encrypt(&key, &mut ecb_buf).unwrap();

        assert_ne!(cbc_buf, ecb_buf);
    }
}
