//! belt-CHE: the counter-hash-encrypt sibling of belt-DWP. Identical tag
//! machinery, but the keystream counter advances by multiplication by the
//! field element `C = x` in `GF(2^128)` rather than by integer increment —
//! a cheaper tweak for callers that already keep the counter as a field
//! element (e.g. a polynomial-hash key schedule shared with an outer
//! protocol).

use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
use belt_block::util::gf128_mul_x;
use belt_block::{BeltBlock, Block};
use belt_error::{Error, Result};
use subtle::ConstantTimeEq;

use crate::poly::{finalize_tag, Absorber};

/// `belt-CHE` incremental state.
pub struct Che {
    cipher: BeltBlock,
    /// Counter register, advanced by `C = x` multiplication in `GF(2^128)`
    /// rather than `belt-CTR`'s integer increment, before every gamma block
    /// (including the first) is derived from it.
    counter: [u8; 16],
    keystream: [u8; 16],
    used: usize,
    r: [u8; 16],
    t: [u8; 16],
    ad: Absorber,
    ct: Absorber,
    ciphertext_started: bool,
}

impl Che {
    /// `Start(K, IV)`: `counter <- E_K(IV)`; `r <- E_K(x * counter)` — the
    /// same block that would be the first keystream block, exactly as in
    /// belt-DWP, just with the subsequent advance rule replaced.
    pub fn new(key: &[u8], iv: &[u8; 16]) -> Result<Self> {
        let cipher = BeltBlock::new_from_slice(key)?;
        let mut block: Block = (*iv).into();
        cipher.encrypt_block(&mut block);
        let counter: [u8; 16] = block.into();

        let mut first = counter;
        gf128_mul_x(&mut first);
        let mut r_block: Block = first.into();
        cipher.encrypt_block(&mut r_block);
        let r: [u8; 16] = r_block.into();

        Ok(Self {
            cipher,
            counter,
            keystream: [0u8; 16],
            used: 16,
            r,
            t: [0u8; 16],
            ad: Absorber::new(),
            ct: Absorber::new(),
            ciphertext_started: false,
        })
    }

    fn next_keystream_octet(&mut self) -> u8 {
        if self.used == 16 {
            gf128_mul_x(&mut self.counter);
            let mut block: Block = self.counter.into();
            self.cipher.encrypt_block(&mut block);
            self.keystream = block.into();
            self.used = 0;
        }
        let b = self.keystream[self.used];
        self.used += 1;
        b
    }

    fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte ^= self.next_keystream_octet();
        }
    }

    /// `StepI`: absorb associated data into the running tag. Rejected once
    /// ciphertext has started being absorbed.
    pub fn update_header(&mut self, data: &[u8]) -> Result<()> {
        if self.ciphertext_started {
            return Err(Error::BadLogic);
        }
        self.ad.absorb(data, &mut self.t, &self.r);
        Ok(())
    }

    /// `StepE`: encrypt `buf` in place.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        self.apply(buf)
    }

    /// `StepD`: decrypt `buf` in place (the same keystream application as
    /// [`Self::encrypt`]).
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        self.apply(buf)
    }

    /// `StepA`: absorb ciphertext octets into the running tag.
    pub fn update_ciphertext(&mut self, data: &[u8]) {
        self.ciphertext_started = true;
        self.ct.absorb(data, &mut self.t, &self.r);
    }

    /// `StepG`: produce the 8-octet tag without disturbing `self`.
    pub fn finalize(&self) -> [u8; 8] {
        finalize_tag(&self.cipher, self.t, &self.r, &self.ad, &self.ct)
    }

    /// `StepV`: compare `tag` against the computed tag in constant time.
    pub fn verify(&self, tag: &[u8]) -> bool {
        if tag.is_empty() || tag.len() > 8 {
            return false;
        }
        let computed = self.finalize();
        computed[..tag.len()].ct_eq(tag).into()
    }
}

/// One-shot `belt-CHE` wrap.
pub fn wrap(key: &[u8], iv: &[u8; 16], header: &[u8], buf: &mut [u8]) -> Result<[u8; 8]> {
    let mut che = Che::new(key, iv)?;
    che.update_header(header)?;
    che.encrypt(buf);
    che.update_ciphertext(buf);
    Ok(che.finalize())
}

/// One-shot `belt-CHE` unwrap: `StepV` before decrypting — reject-then-decrypt.
/// Returns `Ok(false)` on a failed tag, leaving `buf` as ciphertext.
pub fn unwrap(
    key: &[u8],
    iv: &[u8; 16],
    header: &[u8],
    buf: &mut [u8],
    tag: &[u8],
) -> Result<bool> {
    let mut che = Che::new(key, iv)?;
    che.update_header(header)?;
    che.update_ciphertext(buf);
    if !che.verify(tag) {
        return Ok(false);
    }
    che.decrypt(buf);
    Ok(true)
}
