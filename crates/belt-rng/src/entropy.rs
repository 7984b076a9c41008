//! Multi-source entropy harvesting (`std` only): the handful of raw sources
//! the reference suite enumerates, each producing octets that [`health`] can
//! then qualify before they seed a [`crate::ctr::BrngCtr`] or
//! [`crate::hmac::BrngHmac`].
//!
//! `Trng`/`Trng2` stand for a true hardware RNG instruction (e.g. `RDRAND`
//! read through inline assembly in the reference implementation); this
//! workspace forbids `unsafe_code` crate-wide, so those two sources are
//! wired up but report [`Error::NotImplemented`] rather than reaching for
//! `unsafe` to read a CPU intrinsic directly. `Sys`/`Sys2` draw from the
//! operating system's own CSPRNG via `getrandom`, which is the
//! already-`unsafe`-audited equivalent. `Timer` harvests jitter from a
//! free-running high-resolution clock sampled across many short busy-loops,
//! the one source with no platform-API equivalent.

use std::time::Instant;

use crate::health;
use belt_error::{Error, Result};

/// An entropy source the reference suite enumerates by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// First hardware TRNG instruction source. Not implemented (`unsafe`).
    Trng,
    /// Second hardware TRNG instruction source. Not implemented (`unsafe`).
    Trng2,
    /// The OS CSPRNG, first draw.
    Sys,
    /// The OS CSPRNG, second independent draw.
    Sys2,
    /// Timing-jitter harvester.
    Timer,
}

/// Fill `out` with raw octets from `source`. The octets are *not* qualified
/// against [`health::run_all`] by this call; callers combine this with
/// [`source_health`] or run the health test themselves.
pub fn harvest(source: Source, out: &mut [u8]) -> Result<()> {
    match source {
        Source::Trng | Source::Trng2 => Err(Error::NotImplemented),
        Source::Sys | Source::Sys2 => {
            getrandom::getrandom(out).map_err(|_| Error::BadEntropy)
        }
        Source::Timer => {
            harvest_timer_jitter(out);
            Ok(())
        }
    }
}

/// Harvest one [`health::SAMPLE_LEN`]-octet sample from `source` and run the
/// FIPS-140-1 battery over it (`rngESHealth`). Returns [`Error::StatTest`]
/// if the source fails, [`Error::NotImplemented`] for the TRNG sources.
pub fn source_health(source: Source) -> Result<()> {
    let mut sample = [0u8; health::SAMPLE_LEN];
    harvest(source, &mut sample)?;
    health::run_all(&sample)
}

/// Harvest `out.len()` octets of low-order timing jitter: for each output
/// bit, busy-loop a small fixed number of iterations and fold the
/// least-significant bit of the elapsed-nanosecond count into an
/// accumulator, emitting one bit every 8 samples. Biased and
/// autocorrelated, like every timer source; [`health::run_all`] is what
/// decides whether a given draw is usable, not this function.
fn harvest_timer_jitter(out: &mut [u8]) {
    for byte in out.iter_mut() {
        let mut acc = 0u8;
        for _ in 0..8 {
            let start = Instant::now();
            let mut spin = 0u64;
            for i in 0..64u64 {
                spin = spin.wrapping_add(i).wrapping_mul(2654435761);
            }
            core::hint::black_box(spin);
            let elapsed = start.elapsed().subsec_nanos();
            acc = (acc << 1) | ((elapsed as u8) & 1);
        }
        *byte = acc;
    }
}
