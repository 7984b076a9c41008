#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
//! belt-FMT: a format-preserving Feistel cipher over base-`m` digit strings
//! (STB 34.101.31 §6.3), for encrypting fixed-alphabet fields — card
//! numbers, account identifiers, PAN-like strings — without changing their
//! shape.
//!
//! A message is `count` digits in `0..m`, `count` in `2..=600` and `m` in
//! `2..=65536`. The cipher splits the digit string into two halves of
//! `n1 = ceil(count / 2)` and `n2 = floor(count / 2)` digits and runs a
//! three-round unbalanced Feistel network over them, each round's
//! round-function keyed by [`belt_block::BeltBlock`] (small `m`/`count`) or
//! [`belt_wbl`] (larger ones) — see [`feistel::round_function`] for the
//! exact block-size selection.

extern crate alloc;

mod digits;
mod feistel;

use alloc::vec::Vec;

use belt_error::{Error, Result};
use feistel::{add_digits_mod_m, round_function, sub_digits_mod_m};

/// Inclusive bounds on the digit-string length belt-FMT supports.
pub const COUNT_RANGE: core::ops::RangeInclusive<usize> = 2..=600;

/// Inclusive bounds on the modulus `m`.
pub const MODULUS_RANGE: core::ops::RangeInclusive<u32> = 2..=65536;

fn validate(m: u32, iv_key_len: usize, digits: &[u16]) -> Result<()> {
    if !MODULUS_RANGE.contains(&m) {
        return Err(Error::BadParams);
    }
    if !COUNT_RANGE.contains(&digits.len()) {
        return Err(Error::BadLength);
    }
    if !matches!(iv_key_len, 16 | 24 | 32) {
        return Err(Error::BadLength);
    }
    if digits.iter().any(|&d| d as u32 >= m) {
        return Err(Error::BadInput);
    }
    Ok(())
}

fn halves(digits: &[u16]) -> (usize, usize) {
    let count = digits.len();
    let n1 = count.div_ceil(2);
    let n2 = count - n1;
    (n1, n2)
}

/// Encrypt `digits` (each in `0..m`) in place under `key` and `iv`.
///
/// `digits.len()` must be in [`COUNT_RANGE`] and `m` in [`MODULUS_RANGE`];
/// `key` is 16/24/32 octets as every other belt primitive accepts.
pub fn encrypt(key: &[u8], m: u32, iv: &[u8; 4], digits: &mut [u16]) -> Result<()> {
    validate(m, key.len(), digits)?;
    let (n1, n2) = halves(digits);

    let mut left: Vec<u16> = digits[..n1].to_vec();
    let mut right: Vec<u16> = digits[n1..].to_vec();

    let t1 = round_function(key, m, iv, 1, &right, n1)?;
    add_digits_mod_m(&mut left, &t1, m);

    let t2 = round_function(key, m, iv, 2, &left, n2)?;
    add_digits_mod_m(&mut right, &t2, m);

    let t3 = round_function(key, m, iv, 3, &right, n1)?;
    add_digits_mod_m(&mut left, &t3, m);

    digits[..n1].copy_from_slice(&left);
    digits[n1..].copy_from_slice(&right);
    Ok(())
}

/// Inverse of [`encrypt`].
pub fn decrypt(key: &[u8], m: u32, iv: &[u8; 4], digits: &mut [u16]) -> Result<()> {
    validate(m, key.len(), digits)?;
    let (n1, n2) = halves(digits);

    let mut left: Vec<u16> = digits[..n1].to_vec();
    let mut right: Vec<u16> = digits[n1..].to_vec();

    let t3 = round_function(key, m, iv, 3, &right, n1)?;
    sub_digits_mod_m(&mut left, &t3, m);

    let t2 = round_function(key, m, iv, 2, &left, n2)?;
    sub_digits_mod_m(&mut right, &t2, m);

    let t1 = round_function(key, m, iv, 1, &right, n1)?;
    sub_digits_mod_m(&mut left, &t1, m);

    digits[..n1].copy_from_slice(&left);
    digits[n1..].copy_from_slice(&right);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_small_base() {
        let key = [0x5Au8; 32];
        let iv = [0u8; 4];
        let mut digits = [1u16, 2, 3, 4, 5, 6];
        let orig = digits;
        encrypt(&key, 10, &iv, &mut digits).unwrap();
        assert_ne!(digits, orig);
        assert!(digits.iter().all(|&d| d < 10));
        decrypt(&key, 10, &iv, &mut digits).unwrap();
        assert_eq!(digits, orig);
    }

    #[test]
    fn round_trip_large_modulus_and_long_string() {
        let key = [0x11u8; 24];
        let iv = [0x7Fu8; 4];
        let m = 65536u32;
        let mut digits: alloc::vec::Vec<u16> = (0..40).map(|i| (i * 1237) as u16).collect();
        let orig = digits.clone();
        encrypt(&key, m, &iv, &mut digits).unwrap();
        assert_ne!(digits, orig);
        decrypt(&key, m, &iv, &mut digits).unwrap();
        assert_eq!(digits, orig);
    }

    #[test]
    fn round_trip_odd_length() {
        let key = [0x22u8; 16];
        let iv = [0x03u8; 4];
        let mut digits = [4u16, 0, 2, 9, 1];
        let orig = digits;
        encrypt(&key, 10, &iv, &mut digits).unwrap();
        decrypt(&key, 10, &iv, &mut digits).unwrap();
        assert_eq!(digits, orig);
    }

    #[test]
    fn different_iv_changes_ciphertext() {
        let key = [0x33u8; 32];
        let mut a = [1u16, 2, 3, 4];
        let mut b = a;
        encrypt(&key, 10, &[0u8; 4], &mut a).unwrap();
        encrypt(&key, 10, &[1u8; 4], &mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_out_of_range_count() {
        let key = [0u8; 16];
        let mut one_digit = [5u16];
        assert_eq!(
            encrypt(&key, 10, &[0u8; 4], &mut one_digit).unwrap_err(),
            Error::BadLength
        );
    }

    #[test]
    fn rejects_out_of_range_modulus() {
        let key = [0u8; 16];
        let mut digits = [0u16, 0];
        assert_eq!(
            encrypt(&key, 1, &[0u8; 4], &mut digits).unwrap_err(),
            Error::BadParams
        );
        assert_eq!(
            encrypt(&key, 70000, &[0u8; 4], &mut digits).unwrap_err(),
            Error::BadParams
        );
    }

    #[test]
    fn rejects_digit_not_below_modulus() {
        let key = [0u8; 16];
        let mut digits = [5u16, 1];
        assert_eq!(
            encrypt(&key, 5, &[0u8; 4], &mut digits).unwrap_err(),
            Error::BadInput
        );
    }

    #[test]
    fn rejects_bad_key_length() {
        let key = [0u8; 20];
        let mut digits = [1u16, 2];
        assert_eq!(
            encrypt(&key, 10, &[0u8; 4], &mut digits).unwrap_err(),
            Error::BadLength
        );
    }
}
