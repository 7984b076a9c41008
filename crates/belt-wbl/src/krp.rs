//! belt-KRP: key diversification. Derives a subkey from a master key, a
//! 96-bit "level" tag and a 128-bit header, by feeding `(level || header ||
//! key-length constant)` as the `X` input to a single `belt-compr`
//! application keyed by the (zero-padded) master key.

use belt_error::{Error, Result};
use belt_hash::compr::compr;

/// The two standard diversification levels bee2 defines and that this
/// workspace's Secure Messaging layer (`btok-sm`) uses to derive its MAC and
/// encryption subkeys from one master key (`spec.md` §4.J's `<1>`/`<2>`
/// tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLevel {
    /// `<1>`: used to derive `key_mac`.
    Level1,
    /// `<2>`: used to derive `key_enc`.
    Level2,
}

impl KeyLevel {
    fn as_bytes(self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0] = match self {
            KeyLevel::Level1 => 1,
            KeyLevel::Level2 => 2,
        };
        out
    }
}

/// `belt-KRP` state: `Start(K, level)` plus the stored original key length.
pub struct Krp {
    h: [u8; 32],
    level: [u8; 12],
}

impl Krp {
    /// `Start(K, level)`: `K` is 16/24/32 octets and is zero-padded to the
    /// 32-octet chaining value belt-compr expects, exactly as
    /// [`belt_block::BeltBlock`] pads its key schedule.
    pub fn new(key: &[u8], level: KeyLevel) -> Result<Self> {
        Self::new_with_raw_level(key, level.as_bytes())
    }

    /// `Start(K, level12)` with a caller-supplied raw 96-bit level tag,
    /// rather than one of the two named [`KeyLevel`]s.
    pub fn new_with_raw_level(key: &[u8], level12: [u8; 12]) -> Result<Self> {
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(Error::BadLength);
        }
        let mut h = [0u8; 32];
        h[..key.len()].copy_from_slice(key);
        Ok(Self { h, level: level12 })
    }

    /// `StepG(key_out, key_len, header16)`: derive a subkey of `key_len`
    /// octets. `key_len` must be 16, 24 or 32; the result is always computed
    /// over the full 32-octet belt-compr output and then truncated, so a
    /// 16-octet derivation is a prefix of the corresponding 32-octet one.
    pub fn derive(&self, key_len: usize, header: &[u8; 16]) -> Result<[u8; 32]> {
        if !matches!(key_len, 16 | 24 | 32) {
            return Err(Error::BadLength);
        }

        // X = level(12) || header(16) || key-length constant(4), one 32-octet
        // belt-compr input block.
        let mut x = [0u8; 32];
        x[..12].copy_from_slice(&self.level);
        x[12..28].copy_from_slice(header);
        x[28..32].copy_from_slice(&(key_len as u32).to_le_bytes());

        let h_lo: [u8; 16] = self.h[..16].try_into().unwrap();
        let h_hi: [u8; 16] = self.h[16..].try_into().unwrap();
        let x_lo: [u8; 16] = x[..16].try_into().unwrap();
        let x_hi: [u8; 16] = x[16..].try_into().unwrap();

        let out = compr(&h_lo, &h_hi, &x_lo, &x_hi);
        let mut derived = [0u8; 32];
        derived[..16].copy_from_slice(&out.h_lo);
        derived[16..].copy_from_slice(&out.h_hi);
        Ok(derived)
    }
}
