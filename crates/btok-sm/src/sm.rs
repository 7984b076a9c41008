//! `btok-sm`: ISO/IEC 7816-4 Secure Messaging over belt, as `spec.md` §4.J
//! specifies — belt-CFB confidentiality for the data field, belt-MAC
//! integrity over the header (or, for responses, the trailing status
//! words) plus the resulting data objects, and a monotonically increasing
//! session counter whose parity encodes direction.

use alloc::vec::Vec;

use belt_error::{Error, Result};
use belt_wbl::{KeyLevel, Krp};

use crate::apdu::CommandApdu;
use crate::counter::{Counter, Direction};
use crate::tlv::{self, TAG_DO87, TAG_DO8E, TAG_DO97};

/// Padding-indicator octet every `DO87` value is prefixed with. Always
/// `0x02` ("no padding") here: belt-CFB is a stream cipher, so the
/// encrypted data field is always exactly as long as the plaintext.
const DO87_NO_PADDING: u8 = 0x02;

/// Sentinel outer `Le*` requested on a wrapped command: "return as much as
/// you have" rather than a second length constraint — the original `Le`,
/// if any, travels inside `DO97` instead.
const MAX_SHORT_LE: usize = 256;
const MAX_EXTENDED_LE: usize = 65536;

/// A Secure Messaging session: `key_mac`/`key_enc` derived from one master
/// key via belt-KRP, plus the running counter.
pub struct Sm {
    key_mac: [u8; 32],
    key_enc: [u8; 32],
    ctr: Counter,
}

impl Drop for Sm {
    fn drop(&mut self) {
        self.key_mac.iter_mut().for_each(|b| *b = 0);
        self.key_enc.iter_mut().for_each(|b| *b = 0);
    }
}

impl Sm {
    /// `Start(K)`: `key_mac <- KRP(K, <1>)`, `key_enc <- KRP(K, <2>)`,
    /// `ctr <- 0^128`.
    pub fn new(master_key: &[u8]) -> Result<Self> {
        let header = [0u8; 16];
        let key_mac = Krp::new(master_key, KeyLevel::Level1)?.derive(32, &header)?;
        let key_enc = Krp::new(master_key, KeyLevel::Level2)?.derive(32, &header)?;
        Ok(Self {
            key_mac,
            key_enc,
            ctr: Counter::zero(),
        })
    }

    /// The current raw 16-octet session counter. Mirroring this value onto
    /// a peer session keeps both sides' counters in lockstep, matching
    /// `spec.md` §8's "one session counter on each side" property.
    pub fn counter(&self) -> &[u8; 16] {
        self.ctr.as_bytes()
    }

    /// `CmdWrap`: protect a plain command APDU for transmission.
    /// Rejects with [`Error::BadLogic`] if `cmd.cla` is already
    /// SM-marked (bit `0x04` set) or if the counter's advanced parity
    /// does not encode the command direction.
    pub fn cmd_wrap(&mut self, cmd: &CommandApdu) -> Result<Vec<u8>> {
        if cmd.cla & 0x04 != 0 {
            return Err(Error::BadLogic);
        }
        let iv = self.ctr.advance(Direction::Command)?;

        let mut enc_cdf = cmd.data.clone();
        belt_modes::cfb::encrypt(&self.key_enc, &iv, &mut enc_cdf)?;

        let do87 = if cmd.data.is_empty() {
            Vec::new()
        } else {
            let mut payload = Vec::with_capacity(enc_cdf.len() + 1);
            payload.push(DO87_NO_PADDING);
            payload.extend_from_slice(&enc_cdf);
            tlv::encode(TAG_DO87, &payload)
        };

        let do97 = match cmd.le {
            Some(le) => tlv::encode(TAG_DO97, &encode_le_octets(le)),
            None => Vec::new(),
        };

        let header = [cmd.cla | 0x04, cmd.ins, cmd.p1, cmd.p2];
        let mut mac_input = Vec::with_capacity(4 + do87.len() + do97.len());
        mac_input.extend_from_slice(&header);
        mac_input.extend_from_slice(&do87);
        mac_input.extend_from_slice(&do97);
        let tag = belt_modes::mac::mac(&self.key_mac, &mac_input)?;
        let do8e = tlv::encode(TAG_DO8E, &tag);

        let mut body = Vec::with_capacity(do87.len() + do97.len() + do8e.len());
        body.extend_from_slice(&do87);
        body.extend_from_slice(&do97);
        body.extend_from_slice(&do8e);

        let outer_le = Some(if body.len() > 255 {
            MAX_EXTENDED_LE
        } else {
            MAX_SHORT_LE
        });

        CommandApdu {
            cla: cmd.cla | 0x04,
            ins: cmd.ins,
            p1: cmd.p1,
            p2: cmd.p2,
            data: body,
            le: outer_le,
        }
        .to_bytes()
    }

    /// `CmdUnwrap`: recover the plain command APDU from a wrapped one.
    /// Rejects with [`Error::BadApdu`] on framing errors, [`Error::BadMac`]
    /// on a tag mismatch, [`Error::BadLogic`] on counter-parity mismatch.
    pub fn cmd_unwrap(&mut self, wrapped: &[u8]) -> Result<CommandApdu> {
        let outer = CommandApdu::from_bytes(wrapped)?;
        if outer.cla & 0x04 == 0 {
            return Err(Error::BadApdu);
        }
        match outer.le {
            Some(MAX_SHORT_LE) | Some(MAX_EXTENDED_LE) => {}
            _ => return Err(Error::BadApdu),
        }

        let mut rest = outer.data.as_slice();

        let mut do87_raw: &[u8] = &[];
        let mut do87_value: &[u8] = &[];
        if rest.first() == Some(&TAG_DO87) {
            let (_, value, consumed) = tlv::decode_next(rest)?;
            do87_raw = &rest[..consumed];
            do87_value = value;
            rest = &rest[consumed..];
        }

        let mut do97_raw: &[u8] = &[];
        let mut do97_value: &[u8] = &[];
        if rest.first() == Some(&TAG_DO97) {
            let (_, value, consumed) = tlv::decode_next(rest)?;
            do97_raw = &rest[..consumed];
            do97_value = value;
            rest = &rest[consumed..];
        }

        let (tag, do8e_value, consumed) = tlv::decode_next(rest)?;
        if tag != TAG_DO8E || consumed != rest.len() {
            return Err(Error::BadApdu);
        }

        let iv = self.ctr.advance(Direction::Command)?;

        let cla_plain = outer.cla & !0x04;
        let header = [outer.cla, outer.ins, outer.p1, outer.p2];
        let mut mac_input = Vec::with_capacity(4 + do87_raw.len() + do97_raw.len());
        mac_input.extend_from_slice(&header);
        mac_input.extend_from_slice(do87_raw);
        mac_input.extend_from_slice(do97_raw);
        if !belt_modes::mac::verify(&self.key_mac, &mac_input, do8e_value)? {
            return Err(Error::BadMac);
        }

        let mut cdf = if do87_value.is_empty() {
            Vec::new()
        } else {
            if do87_value[0] != DO87_NO_PADDING {
                return Err(Error::BadApdu);
            }
            do87_value[1..].to_vec()
        };
        belt_modes::cfb::decrypt(&self.key_enc, &iv, &mut cdf)?;

        let le = if do97_value.is_empty() {
            None
        } else {
            Some(decode_le_octets(do97_value)?)
        };

        Ok(CommandApdu {
            cla: cla_plain,
            ins: outer.ins,
            p1: outer.p1,
            p2: outer.p2,
            data: cdf,
            le,
        })
    }

    /// `RespWrap`: protect a plain response `(rdf, sw1, sw2)`.
    pub fn resp_wrap(&mut self, rdf: &[u8], sw1: u8, sw2: u8) -> Result<Vec<u8>> {
        let iv = self.ctr.advance(Direction::Response)?;

        let mut enc_rdf = rdf.to_vec();
        belt_modes::cfb::encrypt(&self.key_enc, &iv, &mut enc_rdf)?;

        let do87 = if rdf.is_empty() {
            Vec::new()
        } else {
            let mut payload = Vec::with_capacity(enc_rdf.len() + 1);
            payload.push(DO87_NO_PADDING);
            payload.extend_from_slice(&enc_rdf);
            tlv::encode(TAG_DO87, &payload)
        };

        let mut mac_input = Vec::with_capacity(do87.len() + 2);
        mac_input.extend_from_slice(&do87);
        mac_input.push(sw1);
        mac_input.push(sw2);
        let tag = belt_modes::mac::mac(&self.key_mac, &mac_input)?;
        let do8e = tlv::encode(TAG_DO8E, &tag);

        let mut out = Vec::with_capacity(do87.len() + do8e.len() + 2);
        out.extend_from_slice(&do87);
        out.extend_from_slice(&do8e);
        out.push(sw1);
        out.push(sw2);
        Ok(out)
    }

    /// `RespUnwrap`: recover the plain response `(rdf, sw1, sw2)`.
    pub fn resp_unwrap(&mut self, wrapped: &[u8]) -> Result<(Vec<u8>, u8, u8)> {
        if wrapped.len() < 2 {
            return Err(Error::BadApdu);
        }
        let (body, trailer) = wrapped.split_at(wrapped.len() - 2);
        let (sw1, sw2) = (trailer[0], trailer[1]);

        let mut rest = body;
        let mut do87_raw: &[u8] = &[];
        let mut do87_value: &[u8] = &[];
        if rest.first() == Some(&TAG_DO87) {
            let (_, value, consumed) = tlv::decode_next(rest)?;
            do87_raw = &rest[..consumed];
            do87_value = value;
            rest = &rest[consumed..];
        }

        let (tag, do8e_value, consumed) = tlv::decode_next(rest)?;
        if tag != TAG_DO8E || consumed != rest.len() {
            return Err(Error::BadApdu);
        }

        let iv = self.ctr.advance(Direction::Response)?;

        let mut mac_input = Vec::with_capacity(do87_raw.len() + 2);
        mac_input.extend_from_slice(do87_raw);
        mac_input.push(sw1);
        mac_input.push(sw2);
        if !belt_modes::mac::verify(&self.key_mac, &mac_input, do8e_value)? {
            return Err(Error::BadMac);
        }

        let mut rdf = if do87_value.is_empty() {
            Vec::new()
        } else {
            if do87_value[0] != DO87_NO_PADDING {
                return Err(Error::BadApdu);
            }
            do87_value[1..].to_vec()
        };
        belt_modes::cfb::decrypt(&self.key_enc, &iv, &mut rdf)?;

        Ok((rdf, sw1, sw2))
    }
}

fn encode_le_octets(le: usize) -> Vec<u8> {
    if le <= 256 {
        let raw: u8 = if le == 256 { 0 } else { le as u8 };
        vec![raw]
    } else {
        let raw: u16 = if le == 65536 { 0 } else { le as u16 };
        raw.to_be_bytes().to_vec()
    }
}

fn decode_le_octets(bytes: &[u8]) -> Result<usize> {
    match bytes.len() {
        1 => Ok(if bytes[0] == 0 { 256 } else { bytes[0] as usize }),
        2 => {
            let raw = u16::from_be_bytes([bytes[0], bytes[1]]);
            Ok(if raw == 0 { 65536 } else { raw as usize })
        }
        _ => Err(Error::BadApdu),
    }
}
