//! brng-ctr: a hash-chained counter DRBG (STB 34.101.47 §3.1), built from
//! `belt-hash` rather than a block cipher. State is `(s, r)`, both 32
//! octets; each output block folds `s`, a per-call context and `r` through
//! a fresh clone of a key-seeded `belt-hash` context, then advances `s` as
//! a little-endian counter and XORs the emitted block into `r`.

use belt_error::{Error, Result};
use belt_hash::BeltHash;
use rand_core::{CryptoRng, Error as RandError, RngCore};

/// `brng-ctr` state: a pre-chained hash context (`key` already absorbed),
/// the 256-bit counter `s`, the 256-bit running XOR accumulator `r`, and a
/// 32-octet output buffer with `reserved` octets still unused.
#[derive(Clone)]
pub struct BrngCtr {
    base: BeltHash,
    s: [u8; 32],
    r: [u8; 32],
    block: [u8; 32],
    used: usize,
}

fn counter_add1_256(block: &mut [u8; 32]) {
    let mut carry = 1u16;
    for byte in block.iter_mut() {
        let sum = *byte as u16 + carry;
        *byte = sum as u8;
        carry = sum >> 8;
        if carry == 0 {
            break;
        }
    }
}

impl BrngCtr {
    /// `Start(key, iv)`: `key` seeds a `belt-hash` context kept around (and
    /// cloned fresh per block, never mutated directly) as `H_k`; `iv`
    /// becomes the initial value of the running accumulator `r`.
    pub fn new(key: &[u8], iv: &[u8; 32]) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::BadLength);
        }
        let mut base = BeltHash::new();
        base.update(key);
        Ok(Self {
            base,
            s: [0u8; 32],
            r: *iv,
            block: [0u8; 32],
            used: 32,
        })
    }

    /// One 32-octet output block: `Y <- belt-hash(H_k; s || X || r)`, then
    /// `s <- s + 1` (256-bit LE) and `r <- r XOR Y`. `context` is
    /// zero-padded or truncated to 32 octets.
    fn derive_block(&mut self, context: &[u8]) -> [u8; 32] {
        let mut x = [0u8; 32];
        let n = context.len().min(32);
        x[..n].copy_from_slice(&context[..n]);

        let mut h = self.base.clone();
        h.update(&self.s);
        h.update(&x);
        h.update(&self.r);
        let y: [u8; 32] = h.finalize();

        counter_add1_256(&mut self.s);
        for (r, y) in self.r.iter_mut().zip(y.iter()) {
            *r ^= y;
        }
        y
    }

    /// `StepR`: extract `out.len()` pseudorandom octets, optionally mixing
    /// in `context` as the request's associated data (STB 34.101.47's "X"
    /// input). Buffers any octets generated past what `out` needed so the
    /// next call picks up mid-block (`reserved`), exactly like every
    /// streaming belt mode.
    pub fn step_r(&mut self, out: &mut [u8], context: &[u8]) {
        let mut offset = 0;
        if self.used < 32 && !out.is_empty() {
            let take = (32 - self.used).min(out.len());
            out[..take].copy_from_slice(&self.block[self.used..self.used + take]);
            self.used += take;
            offset += take;
        }
        while offset < out.len() {
            let remaining = out.len() - offset;
            if remaining >= 32 {
                let y = self.derive_block(context);
                out[offset..offset + 32].copy_from_slice(&y);
                offset += 32;
            } else {
                self.block = self.derive_block(context);
                out[offset..].copy_from_slice(&self.block[..remaining]);
                self.used = remaining;
                offset = out.len();
            }
        }
    }

    /// `reserved`: buffered keystream octets left over from the last call.
    pub fn reserved(&self) -> usize {
        32 - self.used
    }

    /// `StepG`: export `(s, r)` so generation can continue from a fresh
    /// [`BrngCtr`] built with the same key (used to hand a generator off
    /// across a process boundary or to checkpoint it).
    pub fn export_state(&self) -> ([u8; 32], [u8; 32]) {
        (self.s, self.r)
    }

    /// Restore a previously [`Self::export_state`]-exported `(s, r)` pair
    /// onto a freshly `Start`-ed generator using the same key.
    pub fn import_state(&mut self, s: [u8; 32], r: [u8; 32]) {
        self.s = s;
        self.r = r;
        self.used = 32;
    }
}

impl RngCore for BrngCtr {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.step_r(&mut buf, &[]);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.step_r(&mut buf, &[]);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.step_r(dest, &[]);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), RandError> {
        self.step_r(dest, &[]);
        Ok(())
    }
}

/// A `brng-ctr` state seeded from at least 32 octets of absorbed entropy
/// (the [`crate::entropy`]/[`crate::singleton`] machinery's job to
/// guarantee) is a cryptographically secure generator.
impl CryptoRng for BrngCtr {}
