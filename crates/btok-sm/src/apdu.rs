//! ISO/IEC 7816-4 command APDU framing: the `Lc*`/`Le*` short (1-octet) or
//! extended (3-octet / 2-octet) length encoding `spec.md` §4.J and §6
//! describe for both the plain command a caller hands to [`crate::Sm`] and
//! the wrapped command it produces.

use alloc::vec::Vec;
use belt_error::{Error, Result};

/// A plain (or, once wrapped, SM-protected) command APDU: header plus an
/// optional command data field and an optional expected response length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandApdu {
    /// Class byte. [`crate::Sm::cmd_wrap`] sets bit `0x04` on the wrapped
    /// copy; it must be clear on a plain command.
    pub cla: u8,
    /// Instruction byte.
    pub ins: u8,
    /// Parameter 1.
    pub p1: u8,
    /// Parameter 2.
    pub p2: u8,
    /// Command data field (may be empty).
    pub data: Vec<u8>,
    /// Expected response length, `1..=65536` (`65536` represents the
    /// extended-form "no limit" encoding `Le = 0000`, `256` the
    /// short-form `Le = 00`). `None` if the command carries no `Le`.
    pub le: Option<usize>,
}

impl CommandApdu {
    /// Serialize using the shortest form ISO 7816-4 permits: short form
    /// unless `data` exceeds 255 octets or `le` exceeds 256.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.data.len() > 65535 {
            return Err(Error::BadLength);
        }
        if let Some(le) = self.le {
            if le == 0 || le > 65536 {
                return Err(Error::BadLength);
            }
        }

        let extended = self.data.len() > 255 || self.le.is_some_and(|le| le > 256);

        let mut out = Vec::with_capacity(4 + self.data.len() + 3);
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);

        if !self.data.is_empty() {
            if extended {
                out.push(0x00);
                out.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
            } else {
                out.push(self.data.len() as u8);
            }
            out.extend_from_slice(&self.data);
        }

        if let Some(le) = self.le {
            if extended {
                if self.data.is_empty() {
                    // No Lc already marked extended form; Le alone needs
                    // the leading 0x00 to distinguish it from short form.
                    out.push(0x00);
                }
                let raw: u16 = if le == 65536 { 0 } else { le as u16 };
                out.extend_from_slice(&raw.to_be_bytes());
            } else {
                let raw: u8 = if le == 256 { 0 } else { le as u8 };
                out.push(raw);
            }
        }

        Ok(out)
    }

    /// Parse a command APDU serialized by [`Self::to_bytes`] (or any
    /// ISO 7816-4-conformant peer).
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < 4 {
            return Err(Error::BadApdu);
        }
        let (cla, ins, p1, p2) = (buf[0], buf[1], buf[2], buf[3]);
        let rest = &buf[4..];

        if rest.is_empty() {
            return Ok(Self {
                cla,
                ins,
                p1,
                p2,
                data: Vec::new(),
                le: None,
            });
        }

        if rest[0] == 0x00 && rest.len() >= 3 {
            let lc = u16::from_be_bytes([rest[1], rest[2]]) as usize;
            if rest.len() == 3 {
                // Extended Le-only form: 00 LL LL, no data field.
                let le = if lc == 0 { 65536 } else { lc };
                return Ok(Self {
                    cla,
                    ins,
                    p1,
                    p2,
                    data: Vec::new(),
                    le: Some(le),
                });
            }
            let body = &rest[3..];
            if body.len() < lc {
                return Err(Error::BadApdu);
            }
            let data = body[..lc].to_vec();
            let tail = &body[lc..];
            let le = match tail.len() {
                0 => None,
                2 => {
                    let raw = u16::from_be_bytes([tail[0], tail[1]]);
                    Some(if raw == 0 { 65536 } else { raw as usize })
                }
                _ => return Err(Error::BadApdu),
            };
            return Ok(Self {
                cla,
                ins,
                p1,
                p2,
                data,
                le,
            });
        }

        if rest.len() == 1 {
            let raw = rest[0] as usize;
            let le = if raw == 0 { 256 } else { raw };
            return Ok(Self {
                cla,
                ins,
                p1,
                p2,
                data: Vec::new(),
                le: Some(le),
            });
        }

        let lc = rest[0] as usize;
        if rest.len() < 1 + lc {
            return Err(Error::BadApdu);
        }
        let data = rest[1..1 + lc].to_vec();
        let tail = &rest[1 + lc..];
        let le = match tail.len() {
            0 => None,
            1 => {
                let raw = tail[0] as usize;
                Some(if raw == 0 { 256 } else { raw })
            }
            _ => return Err(Error::BadApdu),
        };
        Ok(Self {
            cla,
            ins,
            p1,
            p2,
            data,
            le,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case1_header_only() {
        let cmd = CommandApdu {
            cla: 0x00,
            ins: 0xA4,
            p1: 0x04,
            p2: 0x0C,
            data: Vec::new(),
            le: None,
        };
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(bytes, [0x00, 0xA4, 0x04, 0x0C]);
        assert_eq!(CommandApdu::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn case3_short_with_data_no_le() {
        let cmd = CommandApdu {
            cla: 0x00,
            ins: 0xA4,
            p1: 0x04,
            p2: 0x0C,
            data: vec![0x3F, 0x00],
            le: None,
        };
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(bytes, [0x00, 0xA4, 0x04, 0x0C, 0x02, 0x3F, 0x00]);
        assert_eq!(CommandApdu::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn case4_short_with_data_and_le() {
        let cmd = CommandApdu {
            cla: 0x00,
            ins: 0xB0,
            p1: 0x00,
            p2: 0x00,
            data: vec![1, 2, 3],
            le: Some(256),
        };
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(
            bytes,
            [0x00, 0xB0, 0x00, 0x00, 0x03, 1, 2, 3, 0x00]
        );
        assert_eq!(CommandApdu::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn case2_short_le_only() {
        let cmd = CommandApdu {
            cla: 0x00,
            ins: 0xC0,
            p1: 0x00,
            p2: 0x00,
            data: Vec::new(),
            le: Some(16),
        };
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(bytes, [0x00, 0xC0, 0x00, 0x00, 16]);
        assert_eq!(CommandApdu::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn extended_form_round_trips_for_large_data() {
        let cmd = CommandApdu {
            cla: 0x00,
            ins: 0xDA,
            p1: 0x00,
            p2: 0x00,
            data: vec![0x42u8; 300],
            le: Some(65536),
        };
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(&bytes[4..5], &[0x00]);
        assert_eq!(CommandApdu::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn extended_le_only_round_trips() {
        let cmd = CommandApdu {
            cla: 0x00,
            ins: 0xC0,
            p1: 0x00,
            p2: 0x00,
            data: Vec::new(),
            le: Some(300),
        };
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(bytes.len(), 4 + 3);
        assert_eq!(CommandApdu::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn rejects_le_zero_and_oversized_data() {
        let mut cmd = CommandApdu {
            cla: 0,
            ins: 0,
            p1: 0,
            p2: 0,
            data: Vec::new(),
            le: Some(0),
        };
        assert_eq!(cmd.to_bytes().unwrap_err(), Error::BadLength);
        cmd.le = None;
        cmd.data = vec![0u8; 65536];
        assert_eq!(cmd.to_bytes().unwrap_err(), Error::BadLength);
    }

    #[test]
    fn truncated_apdu_rejected() {
        assert_eq!(
            CommandApdu::from_bytes(&[0x00, 0xA4, 0x00]).unwrap_err(),
            Error::BadApdu
        );
    }
}
