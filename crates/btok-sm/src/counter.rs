//! The 16-octet little-endian session counter: incremented before every
//! wrap/unwrap, its parity encoding the direction (odd = command, even =
//! response) per `spec.md` §3/§4.J.

use belt_block::util::counter_add1_le;
use belt_error::{Error, Result};

/// Which direction a counter value is expected to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Command APDUs: the counter's low bit must be 1.
    Command,
    /// Response APDUs: the counter's low bit must be 0.
    Response,
}

/// The Secure Messaging session counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter(pub(crate) [u8; 16]);

impl Counter {
    /// `ctr <- 0^128`, the value `Start` initializes the session to.
    pub fn zero() -> Self {
        Self([0u8; 16])
    }

    /// Advance the counter by one and check that its new parity matches
    /// `direction`, returning the advanced value as a belt-CFB IV. Used by
    /// every wrap/unwrap entry point: "the session counter is incremented
    /// before every wrap/unwrap" (`spec.md` §4.J).
    pub fn advance(&mut self, direction: Direction) -> Result<[u8; 16]> {
        counter_add1_le(&mut self.0);
        self.check_parity(direction)?;
        tracing::debug!(direction = ?direction, "secure messaging counter advanced");
        Ok(self.0)
    }

    fn check_parity(&self, direction: Direction) -> Result<()> {
        let odd = self.0[0] & 1 == 1;
        let ok = match direction {
            Direction::Command => odd,
            Direction::Response => !odd,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::BadLogic)
        }
    }

    /// The raw 16-octet little-endian counter value, usable as a belt-CFB
    /// IV by a peer replaying the same sequence of wraps.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}
