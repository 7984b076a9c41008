//! Process-wide RNG singleton (`std` only): a [`crate::ctr::BrngCtr`] seeded
//! once from multiple entropy sources, shared by refcount and serialized
//! behind a mutex, as the reference suite's `rngCreate`/`rngClose`/
//! `rngStepR`/`rngStepR2` quartet describes.

use std::sync::Mutex;
use std::vec::Vec;

use belt_error::{Error, Result};
use belt_hash::BeltHash;

use crate::ctr::BrngCtr;
use crate::entropy::{self, Source};

/// Sources polled at creation time and consulted again, in this same
/// priority order, by [`rng_step_r`].
const SOURCES: [Source; 5] = [
    Source::Trng,
    Source::Trng2,
    Source::Sys,
    Source::Sys2,
    Source::Timer,
];

struct State {
    gen: Option<BrngCtr>,
    refcount: u32,
}

static STATE: Mutex<State> = Mutex::new(State {
    gen: None,
    refcount: 0,
});

/// `rngCreate`: open (or join) the process-wide generator.
///
/// On the first call, each source in [`SOURCES`] is polled for 32 octets
/// and, if available, absorbed into a `belt-hash` context; `user_source`
/// (if given) is absorbed too. If at least 32 octets were absorbed overall
/// the hash is finalized into a 256-bit key and a fresh [`BrngCtr`] is
/// started from it; otherwise [`Error::NotEnoughEntropy`]. Every call
/// beyond the first only stirs `user_source` into the already-running
/// generator (as per-call context, not a reseed) and bumps the refcount.
pub fn rng_create(user_source: Option<&[u8]>) -> Result<()> {
    let mut state = STATE.lock().expect("belt-rng singleton mutex poisoned");

    if let Some(gen) = state.gen.as_mut() {
        state.refcount += 1;
        if let Some(seed) = user_source {
            let mut discard = [0u8; 0];
            gen.step_r(&mut discard, seed);
            tracing::debug!("stirred user-supplied entropy into the running rng singleton");
        }
        return Ok(());
    }

    let mut hash = BeltHash::new();
    let mut absorbed = 0usize;
    for source in SOURCES {
        let mut buf = [0u8; 32];
        match entropy::harvest(source, &mut buf) {
            Ok(()) => {
                hash.update(&buf);
                absorbed += buf.len();
            }
            Err(err) => {
                tracing::warn!(?source, %err, "entropy source unavailable for rng singleton seeding");
            }
        }
    }
    if let Some(seed) = user_source {
        hash.update(seed);
        absorbed += seed.len();
    }
    if absorbed < 32 {
        return Err(Error::NotEnoughEntropy);
    }

    let key: [u8; 32] = hash.finalize();
    let gen = BrngCtr::new(&key, &[0u8; 32])?;
    state.gen = Some(gen);
    state.refcount = 1;
    Ok(())
}

/// `rngClose`: decrement the refcount; at zero, drop (and so wipe, via
/// [`BrngCtr`]'s owned key material going out of scope) the generator.
pub fn rng_close() {
    let mut state = STATE.lock().expect("belt-rng singleton mutex poisoned");
    if state.refcount == 0 {
        return;
    }
    state.refcount -= 1;
    if state.refcount == 0 {
        state.gen = None;
    }
}

/// `rngStepR`: fill `out` with generator output, first mixing in as much
/// fresh octets as the available sources (in [`SOURCES`] priority order)
/// will supply as per-call context — the delivered stream is always
/// `brng-ctr` output, never raw source data, matching the reference
/// "reseed-then-extract" semantics.
pub fn rng_step_r(out: &mut [u8]) -> Result<()> {
    let mut state = STATE.lock().expect("belt-rng singleton mutex poisoned");
    let gen = state.gen.as_mut().ok_or(Error::BadRng)?;

    let mut context: Vec<u8> = Vec::with_capacity(out.len());
    for source in SOURCES {
        if context.len() >= out.len() {
            break;
        }
        let remaining = out.len() - context.len();
        let mut buf = vec![0u8; remaining];
        if entropy::harvest(source, &mut buf).is_ok() {
            context.extend_from_slice(&buf);
        }
    }
    gen.step_r(out, &context);
    Ok(())
}

/// `rngStepR2`: the `rngStepR` extraction step without the reseed — no
/// source is polled, `out` is filled purely from the running generator.
pub fn rng_step_r2(out: &mut [u8]) -> Result<()> {
    let mut state = STATE.lock().expect("belt-rng singleton mutex poisoned");
    let gen = state.gen.as_mut().ok_or(Error::BadRng)?;
    gen.step_r(out, &[]);
    Ok(())
}
