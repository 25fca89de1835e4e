//! Error taxonomy (spec §7), one [`thiserror`] enum per failure class.
//!
//! Grounded on the teacher's own `ProtocolError`/`InvalidProof` enums in
//! `group_element_vs_paillier_encryption_in_range.rs`
//! (`EncryptionFailed`, `HashFailed`, `EqualityCheckFailed(u8)`,
//! `RangeCheckFailed(u8)`), generalized to cover HE, VP, RS and ORCH.
//!
//! `VerifyReject` from §7 is deliberately *not* a variant here: verification
//! outcomes are modeled as `bool` (or, in ORCH, folded into [`OrchError`]),
//! never as a thrown error, per "VerifyReject is returned as a boolean, never
//! as an exception."

use thiserror::Error;

/// A value was outside the domain the protocol requires it to be in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputDomainError {
    #[error("message {0} is not in Z_N for the given public key")]
    MessageOutOfRange(String),
    #[error("vote choice must be 0 or 1")]
    NonBinaryVote,
    #[error("ring index {index} out of range for ring of size {ring_size}")]
    RingIndexOutOfRange { index: usize, ring_size: usize },
    #[error("ring must contain at least {min} members, got {got}")]
    RingTooSmall { min: usize, got: usize },
}

/// Key generation could not produce a usable keypair.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyGenError {
    #[error("failed to find two distinct primes of the requested bit length after {attempts} attempts")]
    PrimeSelectionFailed { attempts: usize },
    #[error("L(g^lambda mod N^2) is not invertible mod N (gcd != 1); retry key generation")]
    MuNotInvertible,
}

/// The prover could not construct a proof for algebraic reasons that should
/// not occur for well-formed inputs (e.g. an expected modular inverse did not
/// exist). Never silently swallowed; see spec §9 "Exception swallowing".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofGenError {
    #[error("g^-1 mod N^2 does not exist for this public key (gcd(g, N^2) != 1)")]
    GeneratorNotInvertible,
    #[error("a required modular inverse does not exist: {0}")]
    ModularInverseFailed(String),
}

/// A submitted ballot's key image was already recorded by the committee.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("key image already used; ballot rejected as a double vote")]
pub struct DoubleVote;

/// The harness was asked to perform an operation inconsistent with its
/// current lifecycle phase (register → submit* → tally).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("registration has not been performed yet")]
    NotRegistered,
    #[error("registration has already been performed; the ring is immutable")]
    AlreadyRegistered,
    #[error("tally was requested before any ballot was ingested")]
    TallyBeforeIngestion,
    #[error("submit was called after tally; ingestion is closed")]
    SubmitAfterTally,
}

/// Top-level error returned by the ORCH harness, unifying the taxonomy above
/// with the two verification outcomes it must distinguish from an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchError {
    #[error(transparent)]
    InputDomain(#[from] InputDomainError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    DoubleVote(#[from] DoubleVote),
    #[error(transparent)]
    ProofGen(#[from] ProofGenError),
    /// The voter's own driver refuses to cast a second ballot. Distinct from
    /// [`DoubleVote`], which guards the harness-side key-image set even if a
    /// caller bypasses the per-voter driver.
    #[error("this voter has already cast a ballot")]
    AlreadyVoted,
    #[error("ballot failed validity-proof verification")]
    InvalidProof,
    #[error("ballot failed ring-signature verification")]
    InvalidSignature,
}
