//! TOTP: time-based one-time password (RFC 6238), HOTP with the counter
//! derived from wall-clock time instead of an explicit event counter.

use hmac::Mac;

use crate::hotp::hotp;
use belt_error::Result;

/// `TOTP(K, T)`: HOTP keyed at time-step `T = (unix_time - t0) / step`.
///
/// `unix_time` and `t0` are Unix timestamps in seconds; `step` is the time
/// step in seconds (RFC 6238 recommends 30). `mac` must already be keyed.
pub fn totp<M: Mac>(mac: M, unix_time: u64, t0: u64, step: u64, digits: u32) -> Result<u32> {
    let counter = unix_time.saturating_sub(t0) / step;
    hotp(mac, counter, digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use belt_hash::BeltHash;
    use hex_literal::hex;

    type BeltHmac = hmac::Hmac<BeltHash>;

    #[test]
    fn same_time_step_is_deterministic() {
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let a = totp(BeltHmac::new_from_slice(&key).unwrap(), 1_000_015, 0, 30, 6).unwrap();
        let b = totp(BeltHmac::new_from_slice(&key).unwrap(), 1_000_029, 0, 30, 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn crossing_a_time_step_changes_the_code() {
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let a = totp(BeltHmac::new_from_slice(&key).unwrap(), 1_000_015, 0, 30, 6).unwrap();
        let b = totp(BeltHmac::new_from_slice(&key).unwrap(), 1_000_031, 0, 30, 6).unwrap();
        assert_ne!(a, b);
    }
}
