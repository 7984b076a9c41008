//! belt-DWP: data wrap, combining belt-CTR (confidentiality over the
//! plaintext) with a GF(2^128) polynomial-hash MAC (integrity over the
//! associated data and the resulting ciphertext).

use belt_block::cipher::{BlockCipherEncrypt, KeyInit};
use belt_block::util::counter_add1_le;
use belt_block::{BeltBlock, Block};
use belt_error::{Error, Result};
use belt_modes::ctr::Ctr;
use subtle::ConstantTimeEq;

use crate::poly::{finalize_tag, Absorber};

/// `belt-DWP` incremental state.
pub struct Dwp {
    cipher: BeltBlock,
    ctr: Ctr,
    r: [u8; 16],
    t: [u8; 16],
    ad: Absorber,
    ct: Absorber,
    ciphertext_started: bool,
}

impl Dwp {
    /// `Start(K, IV)`. The polynomial-hash key `r` is the same block that
    /// would be belt-CTR's first keystream block, `E_K(E_K(IV) + 1)`:
    /// computed once here and cached, while the embedded [`Ctr`]
    /// independently produces the actual keystream starting from that same
    /// first block.
    pub fn new(key: &[u8], iv: &[u8; 16]) -> Result<Self> {
        let cipher = BeltBlock::new_from_slice(key)?;
        let mut block: Block = (*iv).into();
        cipher.encrypt_block(&mut block); // E_K(IV)
        let mut counter: [u8; 16] = block.into();
        counter_add1_le(&mut counter);
        let mut block: Block = counter.into();
        cipher.encrypt_block(&mut block); // E_K(E_K(IV) + 1) = r
        let r: [u8; 16] = block.into();

        let ctr = Ctr::new(key, iv)?;

        Ok(Self {
            cipher,
            ctr,
            r,
            t: [0u8; 16],
            ad: Absorber::new(),
            ct: Absorber::new(),
            ciphertext_started: false,
        })
    }

    /// `StepI`: absorb associated data into the running tag. Rejected once
    /// ciphertext has started being absorbed via
    /// [`Self::update_ciphertext`].
    pub fn update_header(&mut self, data: &[u8]) -> Result<()> {
        if self.ciphertext_started {
            return Err(Error::BadLogic);
        }
        self.ad.absorb(data, &mut self.t, &self.r);
        Ok(())
    }

    /// `StepE`: encrypt `buf` in place under belt-CTR. Does not itself
    /// touch the tag; the resulting ciphertext must still be passed to
    /// [`Self::update_ciphertext`].
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        self.ctr.encrypt(buf);
    }

    /// `StepD`: decrypt `buf` in place (the same keystream application as
    /// [`Self::encrypt`]).
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        self.ctr.decrypt(buf);
    }

    /// `StepA`: absorb ciphertext octets into the running tag.
    pub fn update_ciphertext(&mut self, data: &[u8]) {
        self.ciphertext_started = true;
        self.ct.absorb(data, &mut self.t, &self.r);
    }

    /// `StepG`: produce the 8-octet tag without disturbing `self`, so
    /// absorption can continue afterward.
    pub fn finalize(&self) -> [u8; 8] {
        finalize_tag(&self.cipher, self.t, &self.r, &self.ad, &self.ct)
    }

    /// `StepV`: compare `tag` against the computed tag in constant time.
    /// `tag` may be a truncation of the full 8 octets.
    pub fn verify(&self, tag: &[u8]) -> bool {
        if tag.is_empty() || tag.len() > 8 {
            return false;
        }
        let computed = self.finalize();
        computed[..tag.len()].ct_eq(tag).into()
    }
}

/// One-shot `belt-DWP` wrap: encrypts `buf` in place and returns the
/// 8-octet tag over `header` and the resulting ciphertext
/// (`StepI`, `StepE`, `StepA`, `StepG`, in that order).
pub fn wrap(key: &[u8], iv: &[u8; 16], header: &[u8], buf: &mut [u8]) -> Result<[u8; 8]> {
    let mut dwp = Dwp::new(key, iv)?;
    dwp.update_header(header)?;
    dwp.encrypt(buf);
    dwp.update_ciphertext(buf);
    Ok(dwp.finalize())
}

/// One-shot `belt-DWP` unwrap: verifies `tag` over `header` and `buf` (the
/// ciphertext) before decrypting `buf` in place — reject before decrypting.
/// Returns `Ok(false)` on a failed tag, leaving `buf` as ciphertext.
pub fn unwrap(
    key: &[u8],
    iv: &[u8; 16],
    header: &[u8],
    buf: &mut [u8],
    tag: &[u8],
) -> Result<bool> {
    let mut dwp = Dwp::new(key, iv)?;
    dwp.update_header(header)?;
    dwp.update_ciphertext(buf);
    if !dwp.verify(tag) {
        return Ok(false);
    }
    dwp.decrypt(buf);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let key = [0x5Au8; 32];
        let iv = [0x01u8; 16];
        let header = b"associated data";
        let mut buf = *b"the quick brown fox jumps";
        let plain = buf;

        let tag = wrap(&key, &iv, header, &mut buf).unwrap();
        assert_ne!(&buf[..], &plain[..]);

        let ok = unwrap(&key, &iv, header, &mut buf, &tag).unwrap();
        assert!(ok);
        assert_eq!(&buf[..], &plain[..]);
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let key = [0x5Au8; 32];
        let iv = [0x01u8; 16];
        let header = b"hdr";
        let mut buf = *b"0123456789ABCDEF";
        let tag = wrap(&key, &iv, header, &mut buf).unwrap();

        buf[0] ^= 1;
        let ok = unwrap(&key, &iv, header, &mut buf, &tag).unwrap();
        assert!(!ok);
    }

    #[test]
    fn tampered_header_rejected() {
        let key = [0x5Au8; 32];
        let iv = [0x01u8; 16];
        let mut buf = *b"some plaintext here!";
        let tag = wrap(&key, &iv, b"header-a", &mut buf).unwrap();

        let ok = unwrap(&key, &iv, b"header-b", &mut buf, &tag).unwrap();
        assert!(!ok);
    }

    #[test]
    fn step_i_rejected_after_step_a() {
        let key = [0x12u8; 32];
        let iv = [0x34u8; 16];
        let mut dwp = Dwp::new(&key, &iv).unwrap();
        dwp.update_ciphertext(b"ciphertext-ish");
        assert_eq!(
            dwp.update_header(b"too late").unwrap_err(),
            Error::BadLogic
        );
    }

    #[test]
    fn get_then_continue_is_permitted() {
        let key = [0x77u8; 24];
        let iv = [0x03u8; 16];
        let mut dwp = Dwp::new(&key, &iv).unwrap();
        dwp.update_header(b"partial-header").unwrap();
        let tag_1 = dwp.finalize();
        dwp.update_header(b"-more").unwrap();
        let tag_2 = dwp.finalize();
        assert_ne!(tag_1, tag_2);
    }

    #[test]
    fn empty_buffers_still_produce_a_tag() {
        let key = [0x44u8; 16];
        let iv = [0x55u8; 16];
        let mut buf: [u8; 0] = [];
        let tag = wrap(&key, &iv, &[], &mut buf).unwrap();
        assert!(unwrap(&key, &iv, &[], &mut buf, &tag).unwrap());
    }
}
