//! belt-KWP: key wrap with an implicit or caller-supplied 128-bit header,
//! built directly on [`crate::wbl`].

use alloc::vec::Vec;

use belt_error::{Error, Result};
use subtle::ConstantTimeEq;

use crate::wbl;

/// `beltKWPWrap`: append `header` (or an all-zero header if `None`) to
/// `src` and apply belt-WBL. `src.len()` must be `>= 16`; a 24-octet `src`
/// (the key-wrap case STB 34.101.31 §8 calls out) yields a 40-octet,
/// non-16-aligned buffer, which [`wbl::encrypt`] handles directly.
pub fn wrap(key: &[u8], header: Option<&[u8; 16]>, src: &[u8]) -> Result<Vec<u8>> {
    if src.len() < 16 {
        return Err(Error::BadLength);
    }
    let mut buf = Vec::with_capacity(src.len() + 16);
    buf.extend_from_slice(src);
    buf.extend_from_slice(header.unwrap_or(&[0u8; 16]));

    wbl::encrypt(key, &mut buf)?;
    Ok(buf)
}

/// `beltKWPUnwrap`: inverse of [`wrap`]. Returns [`Error::BadKeyToken`] if
/// the trailing 16 octets, once decrypted, do not match `header` (or an
/// all-zero header if `None`). `wrapped.len()` must be `>= 32`.
pub fn unwrap(key: &[u8], header: Option<&[u8; 16]>, wrapped: &[u8]) -> Result<Vec<u8>> {
    if wrapped.len() < 32 {
        return Err(Error::BadLength);
    }
    let mut buf = wrapped.to_vec();
    wbl::decrypt(key, &mut buf)?;

    let trailer_start = buf.len() - 16;
    let expected = header.copied().unwrap_or([0u8; 16]);
    let ok: bool = buf[trailer_start..].ct_eq(&expected).into();
    if !ok {
        return Err(Error::BadKeyToken);
    }

    buf.truncate(trailer_start);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn round_trip_default_header() {
        let key = hex!("000102030405060708090A0B0C0D0E0F");
        let src = hex!("FEFDFCFBFAF9F8F7F6F5F4F3F2F1F0EFEEEDECEBEAE9E8E7E6E5E4E3E2E1E001");
        assert_eq!(src.len(), 32);

        let wrapped = wrap(&key, None, &src).unwrap();
        assert_eq!(wrapped.len(), 48);

        let recovered = unwrap(&key, None, &wrapped).unwrap();
        assert_eq!(recovered, src);
    }

    #[test]
    fn round_trip_24_octet_key() {
        // 24 + 16 = 40 octets, not a multiple of 16 — the case STB
        // 34.101.31 §8 requires (key-wrap over all three AES-equivalent
        // key lengths) that exercises belt-WBL's non-aligned tail.
        let key = [0x9Cu8; 32];
        let src = [0x5Bu8; 24];

        let wrapped = wrap(&key, None, &src).unwrap();
        assert_eq!(wrapped.len(), 40);

        let recovered = unwrap(&key, None, &wrapped).unwrap();
        assert_eq!(recovered, src);
    }

    #[test]
    fn explicit_header_round_trips_and_mismatched_header_fails() {
        let key = [0x5Au8; 32];
        let src = [0x11u8; 32];
        let header = [0xAAu8; 16];

        let wrapped = wrap(&key, Some(&header), &src).unwrap();
        assert_eq!(unwrap(&key, Some(&header), &wrapped).unwrap(), src);

        let other_header = [0xBBu8; 16];
        assert_eq!(
            unwrap(&key, Some(&other_header), &wrapped).unwrap_err(),
            Error::BadKeyToken
        );
    }

    #[test]
    fn tampering_any_byte_breaks_the_trailer_check() {
        let key = [0x77u8; 16];
        let src = [0x22u8; 16];

        let mut wrapped = wrap(&key, None, &src).unwrap();
        let last = wrapped.len() - 1;
        wrapped[last] ^= 1;

        assert_eq!(unwrap(&key, None, &wrapped).unwrap_err(), Error::BadKeyToken);
    }

    #[test]
    fn rejects_undersized_input() {
        let key = [0u8; 16];
        assert_eq!(wrap(&key, None, &[0u8; 8]).unwrap_err(), Error::BadLength);
        assert_eq!(unwrap(&key, None, &[0u8; 16]).unwrap_err(), Error::BadLength);
    }
}
