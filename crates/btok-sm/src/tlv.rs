//! Minimal BER-TLV encode/decode for the ISO/IEC 7816-4 Secure Messaging
//! data objects `spec.md` §6 "Wire formats" names: `DO87` (encrypted data
//! field), `DO97` (original `Le`), `DO8E` (cryptographic checksum).

use alloc::vec::Vec;
use belt_error::{Error, Result};

/// Encrypted command/response data field, its value prefixed with a
/// padding-indicator octet.
pub const TAG_DO87: u8 = 0x87;
/// The original `Le`.
pub const TAG_DO97: u8 = 0x97;
/// The cryptographic checksum (MAC).
pub const TAG_DO8E: u8 = 0x8E;

/// Encode one BER-TLV object: short form for `value.len() < 0x80`,
/// `0x81 LL` below `0x100`, `0x82 LL LL` (big-endian) beyond that.
pub fn encode(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 4);
    out.push(tag);
    match value.len() {
        n if n < 0x80 => out.push(n as u8),
        n if n < 0x100 => {
            out.push(0x81);
            out.push(n as u8);
        }
        n => {
            out.push(0x82);
            out.extend_from_slice(&(n as u16).to_be_bytes());
        }
    }
    out.extend_from_slice(value);
    out
}

/// Decode one BER-TLV object from the front of `buf`, returning
/// `(tag, value, total octets consumed)`.
pub fn decode_next(buf: &[u8]) -> Result<(u8, &[u8], usize)> {
    if buf.len() < 2 {
        return Err(Error::BadApdu);
    }
    let tag = buf[0];
    let (len, len_octets) = match buf[1] {
        0x81 => {
            if buf.len() < 3 {
                return Err(Error::BadApdu);
            }
            (buf[2] as usize, 2)
        }
        0x82 => {
            if buf.len() < 4 {
                return Err(Error::BadApdu);
            }
            (u16::from_be_bytes([buf[2], buf[3]]) as usize, 3)
        }
        n if n < 0x80 => (n as usize, 1),
        _ => return Err(Error::BadApdu),
    };
    let header = 1 + len_octets;
    if buf.len() < header + len {
        return Err(Error::BadApdu);
    }
    Ok((tag, &buf[header..header + len], header + len))
}
