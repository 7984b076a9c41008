//! Shared error taxonomy for the belt/bign STB 34.101 cryptographic suite.
//!
//! Every crate in the workspace returns [`Error`] from its fallible entry
//! points rather than panicking or exposing crate-private error types: this
//! mirrors the surface-code taxonomy used throughout the STB 34.101 family
//! (belt, bign, btok) rather than inventing a per-crate hierarchy.
#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use core::fmt;

/// Surface error code.
///
/// Variants are grouped the way the reference taxonomy groups them: input
/// validation, cryptographic failures, RNG/entropy failures, and APDU
/// framing failures. There is deliberately no "miscellaneous" catch-all —
/// every fallible operation in this workspace maps to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // --- Input ---
    /// A generic input validation failure not covered by a more specific code.
    BadInput,
    /// A buffer or key had a length outside the operation's accepted set.
    BadLength,
    /// A computation would overflow its destination representation.
    Overflow,
    /// A heap allocation could not be satisfied.
    OutOfMemory,
    /// A wire-format or text encoding did not parse.
    BadFormat,

    // --- Crypto ---
    /// A parameter (IV, modulus, level tag, ...) was malformed.
    BadParams,
    /// A public key failed validation.
    BadPubKey,
    /// A private key failed validation.
    BadPrivKey,
    /// A key pair failed a consistency check.
    BadKeyPair,
    /// A shared/derived key failed validation.
    BadSharedKey,
    /// A hash value was inconsistent with its input.
    BadHash,
    /// A signature failed verification.
    BadSig,
    /// A MAC or authentication tag failed verification.
    BadMac,
    /// A checksum failed verification.
    BadCrc,
    /// A key-wrap token's authentication trailer did not match.
    BadKeyToken,
    /// A certificate failed validation.
    BadCert,
    /// A trust anchor was invalid or unknown.
    BadAnchor,
    /// A certificate chain/ring failed validation.
    BadCertRing,
    /// An operation was invoked out of its required sequence.
    BadLogic,
    /// A password or PIN failed verification.
    BadPwd,

    // --- RNG ---
    /// The configured RNG is unusable.
    BadRng,
    /// An externally supplied PRNG collaborator failed to produce output.
    BadAng,
    /// An entropy source returned data that failed validation.
    BadEntropy,
    /// Insufficient entropy was available to seed a generator.
    NotEnoughEntropy,
    /// A statistical health test (FIPS-140-1) rejected a sample.
    StatTest,
    /// A seed value was invalid.
    BadSeed,

    // --- APDU ---
    /// An APDU failed structural validation.
    BadApdu,

    // --- IO (surfaced from collaborators) ---
    /// A file could not be created.
    FileCreate,
    /// A file was not found.
    FileNotFound,
    /// A file could not be opened.
    FileOpen,
    /// A file read failed.
    FileRead,
    /// A file write failed.
    FileWrite,
    /// End of file was reached unexpectedly.
    FileEof,

    // --- Other ---
    /// An operation timed out.
    Timeout,
    /// A resource was busy.
    Busy,
    /// A requested item was not found.
    NotFound,
    /// An item already exists.
    AlreadyExists,
    /// Access to a resource was denied.
    AccessDenied,
    /// The requested operation is not implemented.
    NotImplemented,
    /// Authentication failed.
    AuthFail,
}

impl Error {
    /// Short machine-readable name, matching the surface code identifiers
    /// used across the STB 34.101 reference (e.g. for logging without
    /// leaking any secret material).
    pub const fn as_str(self) -> &'static str {
        use Error::*;
        match self {
            BadInput => "BadInput",
            BadLength => "BadLength",
            Overflow => "Overflow",
            OutOfMemory => "OutOfMemory",
            BadFormat => "BadFormat",
            BadParams => "BadParams",
            BadPubKey => "BadPubKey",
            BadPrivKey => "BadPrivKey",
            BadKeyPair => "BadKeyPair",
            BadSharedKey => "BadSharedKey",
            BadHash => "BadHash",
            BadSig => "BadSig",
            BadMac => "BadMac",
            BadCrc => "BadCrc",
            BadKeyToken => "BadKeyToken",
            BadCert => "BadCert",
            BadAnchor => "BadAnchor",
            BadCertRing => "BadCertRing",
            BadLogic => "BadLogic",
            BadPwd => "BadPwd",
            BadRng => "BadRng",
            BadAng => "BadAng",
            BadEntropy => "BadEntropy",
            NotEnoughEntropy => "NotEnoughEntropy",
            StatTest => "StatTest",
            BadSeed => "BadSeed",
            BadApdu => "BadApdu",
            FileCreate => "FileCreate",
            FileNotFound => "FileNotFound",
            FileOpen => "FileOpen",
            FileRead => "FileRead",
            FileWrite => "FileWrite",
            FileEof => "FileEof",
            Timeout => "Timeout",
            Busy => "Busy",
            NotFound => "NotFound",
            AlreadyExists => "AlreadyExists",
            AccessDenied => "AccessDenied",
            NotImplemented => "NotImplemented",
            AuthFail => "AuthFail",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Convenience alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, Error>;
