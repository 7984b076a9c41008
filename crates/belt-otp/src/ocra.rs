//! OCRA: the challenge-response OTP algorithm (RFC 6287), including its
//! full suite-string grammar (`OCRA-1:HOTP-<CryptoFunction>-<Digits>:<DataInput>`)
//! rather than one hard-coded profile.
//!
//! A parsed [`OcraSuite`] describes which of `C` (counter), `Q` (challenge
//! question), `P` (hashed PIN), `S` (session info) and `T` (timestamp)
//! components the suite's `DataInput` spec requires, plus the question's
//! length/format and the OTP digit count. [`generate`] then assembles the
//! exact RFC 6287 §4.2 `DataInput` byte string and HMACs it.
//!
//! STB practice substitutes belt-HMAC for the RFC's SHA-1/256/512 crypto
//! functions; the suite string's `<CryptoFunction>` component still has to
//! parse (so conformance suites carrying `HOTP-SHA1-6` round-trip through
//! this parser), but the caller always supplies an already-keyed `Mac` —
//! this crate never picks the hash algorithm itself.

use hmac::Mac;

use belt_error::{Error, Result};

/// How the challenge question `Q` is encoded before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFormat {
    /// Decimal digits, converted to a big-endian byte string.
    Numeric,
    /// ASCII text, used as-is.
    Alphanumeric,
    /// Hexadecimal digits, decoded to bytes.
    Hex,
}

/// `DataInput` component spec parsed out of an OCRA suite string's third
/// colon-separated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataInputSpec {
    /// `C`: an 8-octet big-endian counter is included.
    pub counter: bool,
    /// `Q<len><fmt>`: present iff `question_format` is `Some`.
    pub question_format: Option<QuestionFormat>,
    /// Significant question length in characters (4..=64), as advertised
    /// by the suite string. The encoded question is always padded to 128
    /// octets regardless of this value, per RFC 6287 §4.2.
    pub question_len: u8,
    /// `P<hash>`: octet length of the pre-hashed PIN/password the caller
    /// must supply, if present.
    pub pin_hash_len: Option<u8>,
    /// `S<NNN>`: octet length of the session-information block, if present.
    pub session_len: Option<u16>,
    /// `T<G>`: timestamp step, in seconds, if present.
    pub timestep_secs: Option<u64>,
}

/// A fully parsed OCRA suite string.
#[derive(Debug, Clone, Copy)]
pub struct OcraSuite<'a> {
    /// The suite string verbatim, as fed into `DataInput`'s first field.
    pub raw: &'a str,
    /// `<Digits>` from the suite string; OCRA's zero-digit "raw digest"
    /// mode is out of scope (not a displayable OTP), so this is 4..=10.
    pub digits: u32,
    /// The parsed `DataInput` component spec.
    pub data_input: DataInputSpec,
}

const DIGITS_RANGE: core::ops::RangeInclusive<u32> = 4..=10;
const QUESTION_PAD_LEN: usize = 128;
const MAX_SESSION_LEN: u16 = 256;

impl<'a> OcraSuite<'a> {
    /// Parse an RFC 6287 suite string: `OCRA-1:HOTP-<CryptoFunction>-<Digits>:<DataInput>`.
    pub fn parse(suite: &'a str) -> Result<Self> {
        let mut fields = suite.split(':');
        let algorithm = fields.next().ok_or(Error::BadFormat)?;
        let crypto_function = fields.next().ok_or(Error::BadFormat)?;
        let data_input = fields.next().ok_or(Error::BadFormat)?;
        if fields.next().is_some() {
            return Err(Error::BadFormat);
        }
        if algorithm != "OCRA-1" {
            return Err(Error::BadFormat);
        }

        let mut cf = crypto_function.split('-');
        if cf.next() != Some("HOTP") {
            return Err(Error::BadFormat);
        }
        let _hash_name = cf.next().ok_or(Error::BadFormat)?;
        let digits: u32 = cf
            .next()
            .ok_or(Error::BadFormat)?
            .parse()
            .map_err(|_| Error::BadFormat)?;
        if cf.next().is_some() {
            return Err(Error::BadFormat);
        }
        if !DIGITS_RANGE.contains(&digits) {
            return Err(Error::BadParams);
        }

        let spec = parse_data_input(data_input)?;
        Ok(Self {
            raw: suite,
            digits,
            data_input: spec,
        })
    }
}

fn parse_data_input(data_input: &str) -> Result<DataInputSpec> {
    let mut spec = DataInputSpec {
        counter: false,
        question_format: None,
        question_len: 0,
        pin_hash_len: None,
        session_len: None,
        timestep_secs: None,
    };

    for component in data_input.split('-') {
        let mut chars = component.chars();
        let tag = chars.next().ok_or(Error::BadFormat)?;
        let rest: &str = &component[tag.len_utf8()..];
        match tag {
            'C' => {
                if !rest.is_empty() || spec.counter {
                    return Err(Error::BadFormat);
                }
                spec.counter = true;
            }
            'Q' => {
                if spec.question_format.is_some() {
                    return Err(Error::BadFormat);
                }
                // "Q" alone means QN08 (the RFC 6287 default). Otherwise the
                // format letter comes first (e.g. "QN08": N, then length 08).
                let (len, fmt) = if rest.is_empty() {
                    (8u8, QuestionFormat::Numeric)
                } else {
                    let mut chars = rest.chars();
                    let fmt_char = chars.next().ok_or(Error::BadFormat)?;
                    let len_digits = chars.as_str();
                    let fmt = match fmt_char {
                        'N' => QuestionFormat::Numeric,
                        'A' => QuestionFormat::Alphanumeric,
                        'H' => QuestionFormat::Hex,
                        _ => return Err(Error::BadFormat),
                    };
                    let len: u8 = len_digits.parse().map_err(|_| Error::BadFormat)?;
                    (len, fmt)
                };
                if !(4..=64).contains(&len) {
                    return Err(Error::BadParams);
                }
                spec.question_len = len;
                spec.question_format = Some(fmt);
            }
            'P' => {
                if spec.pin_hash_len.is_some() {
                    return Err(Error::BadFormat);
                }
                let hash_len = match rest {
                    "SHA1" => 20,
                    "SHA256" => 32,
                    "SHA512" => 64,
                    "BELT" => 32,
                    _ => return Err(Error::BadFormat),
                };
                spec.pin_hash_len = Some(hash_len);
            }
            'S' => {
                if spec.session_len.is_some() {
                    return Err(Error::BadFormat);
                }
                let len: u16 = rest.parse().map_err(|_| Error::BadFormat)?;
                if len == 0 || len > MAX_SESSION_LEN {
                    return Err(Error::BadParams);
                }
                spec.session_len = Some(len);
            }
            'T' => {
                if spec.timestep_secs.is_some() {
                    return Err(Error::BadFormat);
                }
                if rest.is_empty() {
                    return Err(Error::BadFormat);
                }
                let unit = rest.chars().last().unwrap();
                let count: u64 = rest[..rest.len() - 1]
                    .parse()
                    .map_err(|_| Error::BadFormat)?;
                let secs = match unit {
                    'S' => count,
                    'M' => count.checked_mul(60).ok_or(Error::Overflow)?,
                    'H' => count.checked_mul(3600).ok_or(Error::Overflow)?,
                    _ => return Err(Error::BadFormat),
                };
                if secs == 0 {
                    return Err(Error::BadParams);
                }
                spec.timestep_secs = Some(secs);
            }
            _ => return Err(Error::BadFormat),
        }
    }

    if spec.question_format.is_none() {
        // RFC 6287 requires at least the Q component in every suite.
        return Err(Error::BadFormat);
    }
    Ok(spec)
}

/// Caller-supplied values for whichever `DataInput` components `suite`
/// requires; fields the suite doesn't ask for are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcraInputs<'a> {
    /// Value for `C`.
    pub counter: Option<u64>,
    /// The challenge question, in the suite's declared format (decimal
    /// digits for [`QuestionFormat::Numeric`], hex digits for
    /// [`QuestionFormat::Hex`], raw text for
    /// [`QuestionFormat::Alphanumeric`]).
    pub question: Option<&'a str>,
    /// Pre-hashed PIN/password, exactly `pin_hash_len` octets.
    pub pin_hash: Option<&'a [u8]>,
    /// Session information, exactly `session_len` octets.
    pub session_info: Option<&'a [u8]>,
    /// Unix timestamp in seconds, for suites with a `T` component.
    pub timestamp: Option<u64>,
}

/// Assemble `suite`'s `DataInput` from `inputs` and HMAC it with `mac`
/// (already keyed), returning the truncated decimal OTP.
pub fn generate<M: Mac>(mut mac: M, suite: &OcraSuite<'_>, inputs: &OcraInputs<'_>) -> Result<u32> {
    let di = &suite.data_input;

    mac.update(suite.raw.as_bytes());
    mac.update(&[0u8]);

    if di.counter {
        let counter = inputs.counter.ok_or(Error::BadParams)?;
        mac.update(&counter.to_be_bytes());
    }

    let format = di.question_format.ok_or(Error::BadLogic)?;
    let question = inputs.question.ok_or(Error::BadParams)?;
    let mut padded = [0u8; QUESTION_PAD_LEN];
    encode_question(format, question, &mut padded)?;
    mac.update(&padded);

    if let Some(expected) = di.pin_hash_len {
        let pin_hash = inputs.pin_hash.ok_or(Error::BadParams)?;
        if pin_hash.len() != expected as usize {
            return Err(Error::BadLength);
        }
        mac.update(pin_hash);
    }

    if let Some(expected) = di.session_len {
        let session = inputs.session_info.ok_or(Error::BadParams)?;
        if session.len() != expected as usize {
            return Err(Error::BadLength);
        }
        mac.update(session);
    }

    if let Some(step) = di.timestep_secs {
        let timestamp = inputs.timestamp.ok_or(Error::BadParams)?;
        mac.update(&(timestamp / step).to_be_bytes());
    }

    let hash = mac.finalize().into_bytes();
    let offset = (hash[hash.len() - 1] & 0x0F) as usize;
    let truncated = u32::from_be_bytes([
        hash[offset] & 0x7F,
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ]);
    Ok(truncated % 10u32.pow(suite.digits))
}

/// Encode `question` per `format` into `out` (128 octets, zero-padded on
/// the right), returning the number of octets the encoding occupied.
fn encode_question(format: QuestionFormat, question: &str, out: &mut [u8; 128]) -> Result<usize> {
    match format {
        QuestionFormat::Alphanumeric => {
            let bytes = question.as_bytes();
            if bytes.len() > out.len() {
                return Err(Error::BadLength);
            }
            out[..bytes.len()].copy_from_slice(bytes);
            Ok(bytes.len())
        }
        QuestionFormat::Hex => {
            let digits = question.as_bytes();
            if digits.len() > out.len() * 2 {
                return Err(Error::BadLength);
            }
            let mut n = 0;
            for pair in digits.chunks(2) {
                let hi = hex_nibble(pair[0])?;
                let lo = if pair.len() == 2 {
                    hex_nibble(pair[1])?
                } else {
                    0
                };
                out[n] = (hi << 4) | lo;
                n += 1;
            }
            Ok(n)
        }
        QuestionFormat::Numeric => {
            // Schoolbook "multiply accumulator by 10, add digit" into a
            // big-endian byte buffer, the same technique belt-fmt's digit
            // conversion uses for arbitrary-length base conversions.
            let mut acc = [0u8; 128];
            let mut len = 1usize;
            for &ch in question.as_bytes() {
                if !ch.is_ascii_digit() {
                    return Err(Error::BadFormat);
                }
                let digit = (ch - b'0') as u16;
                let mut carry = digit;
                for byte in acc[128 - len..].iter_mut().rev() {
                    let v = (*byte as u16) * 10 + carry;
                    *byte = (v & 0xFF) as u8;
                    carry = v >> 8;
                }
                while carry > 0 {
                    if len == acc.len() {
                        return Err(Error::Overflow);
                    }
                    len += 1;
                    acc[128 - len] = (carry & 0xFF) as u8;
                    carry >>= 8;
                }
            }
            // Strip the buffer's implicit leading zero down to the
            // smallest big-endian representation, then left-pad into the
            // caller's all-zero `out` so it lands at the front.
            let start = acc.iter().position(|&b| b != 0).unwrap_or(127);
            let significant = &acc[start..];
            out[..significant.len()].copy_from_slice(significant);
            Ok(significant.len())
        }
    }
}

fn hex_nibble(c: u8) -> Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(Error::BadFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use belt_hash::BeltHash;
    use hex_literal::hex;

    type BeltHmac = hmac::Hmac<BeltHash>;

    #[test]
    fn parses_counter_question_suite() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:C-QN08").unwrap();
        assert_eq!(suite.digits, 6);
        assert!(suite.data_input.counter);
        assert_eq!(suite.data_input.question_format, Some(QuestionFormat::Numeric));
        assert_eq!(suite.data_input.question_len, 8);
    }

    #[test]
    fn parses_pin_and_session_suite() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA256-8:QA10-PSHA1-S064").unwrap();
        assert_eq!(suite.digits, 8);
        assert_eq!(
            suite.data_input.question_format,
            Some(QuestionFormat::Alphanumeric)
        );
        assert_eq!(suite.data_input.pin_hash_len, Some(20));
        assert_eq!(suite.data_input.session_len, Some(64));
    }

    #[test]
    fn parses_timestamp_suite() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QH40-T1M").unwrap();
        assert_eq!(suite.data_input.timestep_secs, Some(60));
    }

    #[test]
    fn rejects_missing_question_component() {
        assert_eq!(
            OcraSuite::parse("OCRA-1:HOTP-SHA1-6:C").unwrap_err(),
            Error::BadFormat
        );
    }

    #[test]
    fn rejects_wrong_prefix() {
        assert_eq!(
            OcraSuite::parse("TOTP-1:HOTP-SHA1-6:QN08").unwrap_err(),
            Error::BadFormat
        );
    }

    #[test]
    fn generate_is_deterministic_for_counter_question_suite() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:C-QN08").unwrap();
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let inputs = OcraInputs {
            counter: Some(7),
            question: Some("00000000"),
            ..Default::default()
        };
        let a = generate(BeltHmac::new_from_slice(&key).unwrap(), &suite, &inputs).unwrap();
        let b = generate(BeltHmac::new_from_slice(&key).unwrap(), &suite, &inputs).unwrap();
        assert_eq!(a, b);
        assert!(a < 1_000_000);
    }

    #[test]
    fn generate_changes_with_the_question() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let a = generate(
            BeltHmac::new_from_slice(&key).unwrap(),
            &suite,
            &OcraInputs {
                question: Some("12345678"),
                ..Default::default()
            },
        )
        .unwrap();
        let b = generate(
            BeltHmac::new_from_slice(&key).unwrap(),
            &suite,
            &OcraInputs {
                question: Some("87654321"),
                ..Default::default()
            },
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn generate_rejects_wrong_length_pin_hash() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08-PSHA1").unwrap();
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let inputs = OcraInputs {
            question: Some("00000000"),
            pin_hash: Some(&[0u8; 10]),
            ..Default::default()
        };
        assert_eq!(
            generate(BeltHmac::new_from_slice(&key).unwrap(), &suite, &inputs).unwrap_err(),
            Error::BadLength
        );
    }

    #[test]
    fn hex_question_round_trips_through_encoding() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QH08").unwrap();
        let key = hex!("E9DEE72C8F0C0FA62DDB49F46F73964706075316ED247A3739CBA38303A98BF6");
        let inputs = OcraInputs {
            question: Some("deadbeef"),
            ..Default::default()
        };
        assert!(generate(BeltHmac::new_from_slice(&key).unwrap(), &suite, &inputs).is_ok());
    }
}
