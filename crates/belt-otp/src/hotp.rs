//! HOTP: HMAC-based one-time password (RFC 4226), generic over the MAC
//! algorithm so the RFC's own dynamic-truncation mapping can be
//! cross-checked against the original HMAC-SHA-1 vector while every other
//! caller in this workspace drives it with belt-HMAC (STB 34.101.47's botp
//! profile).

use hmac::Mac;

use belt_error::{Error, Result};

/// Digit counts HOTP/TOTP accept. RFC 4226 recommends 6 and permits 7–8;
/// anything else is not an OTP a verifier would reasonably display.
const DIGITS_RANGE: core::ops::RangeInclusive<u32> = 6..=8;

/// `HOTP(K, C)`: run `mac` (already keyed, otherwise unkeyed) over the
/// 8-octet big-endian counter `counter`, then apply RFC 4226 §5.3 dynamic
/// truncation and reduce mod `10^digits`.
///
/// `digits` must be in [`DIGITS_RANGE`].
pub fn hotp<M: Mac>(mut mac: M, counter: u64, digits: u32) -> Result<u32> {
    if !DIGITS_RANGE.contains(&digits) {
        return Err(Error::BadParams);
    }
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();

    Ok(dynamic_truncate(&hash) % 10u32.pow(digits))
}

/// RFC 4226 §5.3 dynamic truncation: take the low nibble of the last octet
/// as a byte offset into `hash`, then read the 4 octets there as a
/// big-endian integer with the top bit cleared.
fn dynamic_truncate(hash: &[u8]) -> u32 {
    let offset = (hash[hash.len() - 1] & 0x0F) as usize;
    let bytes = [
        hash[offset] & 0x7F,
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ];
    u32::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use belt_hash::BeltHash;
    use hex_literal::hex;

    type BeltHmac = hmac::Hmac<BeltHash>;
    type Sha1Hmac = hmac::Hmac<sha1::Sha1>;

    #[test]
    fn rfc4226_vector_reproduces_through_sha1_truncation() {
        // RFC 4226 Appendix D, count = 0: belt-HMAC is STB 34.101.47's
        // substitution for SHA-1, so the published 755224 is only
        // reproducible through the original HMAC-SHA-1 pairing; it
        // exercises the same `dynamic_truncate` this crate uses for belt.
        let key = b"12345678901234567890";
        let mac = Sha1Hmac::new_from_slice(key).unwrap();
        let code = hotp(mac, 0, 6).unwrap();
        assert_eq!(code, 755224);
    }

    #[test]
    fn belt_hotp_is_deterministic_and_in_range() {
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let a = hotp(BeltHmac::new_from_slice(&key).unwrap(), 42, 6).unwrap();
        let b = hotp(BeltHmac::new_from_slice(&key).unwrap(), 42, 6).unwrap();
        assert_eq!(a, b);
        assert!(a < 1_000_000);
    }

    #[test]
    fn belt_hotp_changes_with_counter() {
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let a = hotp(BeltHmac::new_from_slice(&key).unwrap(), 0, 6).unwrap();
        let b = hotp(BeltHmac::new_from_slice(&key).unwrap(), 1, 6).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_out_of_range_digits() {
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        assert_eq!(
            hotp(BeltHmac::new_from_slice(&key).unwrap(), 0, 5).unwrap_err(),
            Error::BadParams
        );
        assert_eq!(
            hotp(BeltHmac::new_from_slice(&key).unwrap(), 0, 9).unwrap_err(),
            Error::BadParams
        );
    }
}
