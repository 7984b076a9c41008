//! belt-CFB: a true stream cipher mode — arbitrary-length segments are
//! supported across repeated calls, tracked via `reserved` gamma octets.

use belt_block::cipher::BlockCipherEncrypt;
use belt_block::{BeltBlock, Block};
use belt_error::Result;

/// `belt-CFB` state.
#[derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct Cfb {
    cipher: BeltBlock,
    /// Running gamma register; encryption overwrites it with ciphertext,
    /// decryption overwrites it with the ciphertext it just consumed.
    gamma: Block,
    /// Keystream octets already produced from `gamma` but not yet consumed.
    used: usize,
}

impl Cfb {
    /// `Start(K, IV)`.
    pub fn new(key: &[u8], iv: &[u8; 16]) -> Result<Self> {
        Ok(Self {
            cipher: BeltBlock::new_from_slice(key)?,
            gamma: (*iv).into(),
            used: 16,
        })
    }

    /// Number of buffered keystream octets not yet consumed (`16 - used`),
    /// i.e. the `reserved` field from STB 34.101.31 §3.
    pub fn reserved(&self) -> usize {
        16 - self.used
    }

    fn next_keystream_octet(&mut self) -> u8 {
        if self.used == 16 {
            self.cipher.encrypt_block(&mut self.gamma);
            self.used = 0;
        }
        let b = self.gamma[self.used];
        self.used += 1;
        b
    }

    /// `StepE`: encrypt `buf` in place.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            let ks = self.next_keystream_octet();
            *byte ^= ks;
            // Gamma chaining depends on the ciphertext we just produced:
            // overwrite the consumed gamma octet once the whole block has
            // been used, or immediately for the byte just finished.
            self.gamma[self.used - 1] = *byte;
        }
    }

    /// `StepD`: decrypt `buf` in place.
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            let ks = self.next_keystream_octet();
            let c = *byte;
            *byte ^= ks;
            self.gamma[self.used - 1] = c;
        }
    }
}

/// One-shot `belt-CFB` encryption.
pub fn encrypt(key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
    Cfb::new(key, iv)?.encrypt(buf);
    Ok(())
}

/// One-shot `belt-CFB` decryption.
pub fn decrypt(key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
    Cfb::new(key, iv)?.decrypt(buf);
    Ok(())
}
