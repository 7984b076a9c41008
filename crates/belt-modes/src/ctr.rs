//! belt-CTR: counter mode, a true stream cipher — the IV is pre-encrypted
//! once at `Start` to seed the counter register, and that register is
//! incremented before *every* gamma block (including the first), so the
//! first keystream block is `E_K(E_K(IV) + 1)`, never `E_K(IV)` or
//! `E_K(E_K(IV))`.

use belt_block::cipher::BlockCipherEncrypt;
use belt_block::util::counter_add1_le;
use belt_block::{BeltBlock, Block};
use belt_error::Result;

/// `belt-CTR` state.
pub struct Ctr {
    cipher: BeltBlock,
    /// Counter register: `E_K(IV)` at `Start`, incremented before every
    /// gamma block is derived from it.
    counter: Block,
    /// Keystream block most recently derived from `counter`.
    keystream: Block,
    /// Keystream octets produced in `keystream` but not yet consumed.
    used: usize,
}

impl Ctr {
    /// `Start(K, IV)`: `counter <- E_K(IV)`.
    pub fn new(key: &[u8], iv: &[u8; 16]) -> Result<Self> {
        let cipher = BeltBlock::new_from_slice(key)?;
        let mut counter: Block = (*iv).into();
        cipher.encrypt_block(&mut counter);
        Ok(Self {
            cipher,
            counter,
            keystream: Block::default(),
            used: 16,
        })
    }

    /// Number of buffered keystream octets not yet consumed, i.e. the
    /// `reserved` field from STB 34.101.31 §3.
    pub fn reserved(&self) -> usize {
        16 - self.used
    }

    fn next_keystream_octet(&mut self) -> u8 {
        if self.used == 16 {
            let mut raw: [u8; 16] = self.counter.into();
            counter_add1_le(&mut raw);
            self.counter = raw.into();
            self.keystream = self.counter;
            self.cipher.encrypt_block(&mut self.keystream);
            self.used = 0;
        }
        let b = self.keystream[self.used];
        self.used += 1;
        b
    }

    /// CTR is an involution: `StepE` and `StepD` are the same keystream XOR.
    pub fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte ^= self.next_keystream_octet();
        }
    }

    /// `StepE`.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        self.apply(buf)
    }

    /// `StepD`.
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        self.apply(buf)
    }
}

/// One-shot `belt-CTR` encryption (identical to decryption).
pub fn encrypt(key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
    Ctr::new(key, iv)?.apply(buf);
    Ok(())
}

/// One-shot `belt-CTR` decryption (identical to encryption).
pub fn decrypt(key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
    Ctr::new(key, iv)?.apply(buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_arbitrary_lengths() {
        let key = [0x13u8; 32];
        let iv = [0x09u8; 16];
        for len in [0usize, 1, 15, 16, 17, 40, 100] {
            let mut buf = [0u8; 100];
            for (i, b) in buf.iter_mut().enumerate().take(len) {
                *b = i as u8;
            }
            let orig = buf;
            encrypt(&key, &iv, &mut buf[..len]).unwrap();
            if len > 0 {
                assert_ne!(&buf[..len], &orig[..len]);
            }
            decrypt(&key, &iv, &mut buf[..len]).unwrap();
            assert_eq!(&buf[..len], &orig[..len]);
        }
    }

    #[test]
    fn first_block_is_encrypt_of_incremented_counter() {
        use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
        use belt_block::util::counter_add1_le;

        let key = [0x13u8; 32];
        let iv = [0x09u8; 16];

        let cipher = BeltBlock::new_from_slice(&key).unwrap();
        let mut e_iv: Block = iv.into();
        cipher.encrypt_block(&mut e_iv);
        let mut counter: [u8; 16] = e_iv.into();
        counter_add1_le(&mut counter);
        let mut expected: Block = counter.into();
        cipher.encrypt_block(&mut expected);

        // The first keystream block is `E_K(E_K(IV) + 1)`, neither `E_K(IV)`
        // nor `E_K(E_K(IV))`.
        let mut ks = [0u8; 16];
        let mut ctr = Ctr::new(&key, &iv).unwrap();
        ctr.apply(&mut ks);

        let expected_bytes: [u8; 16] = expected.into();
        assert_eq!(ks, expected_bytes);
    }

    #[test]
    fn split_calls_match_single_call() {
        let key = [0x13u8; 32];
        let iv = [0x0Au8; 16];
        let msg = [0xCCu8; 50];

        let mut one_shot = msg;
        encrypt(&key, &iv, &mut one_shot).unwrap();

        let mut split = msg;
        let mut ctr = Ctr::new(&key, &iv).unwrap();
        ctr.encrypt(&mut split[..5]);
        ctr.encrypt(&mut split[5..33]);
        ctr.encrypt(&mut split[33..]);

        assert_eq!(one_shot, split);
    }
}
