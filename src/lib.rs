//! Cryptographic core of a privacy-preserving electronic voting system.
//!
//! Three independent subsystems compose into a ballot pipeline:
//!
//! - [`he`], an additively homomorphic (Paillier) public-key cryptosystem
//!   used to encrypt individual votes and tally them without decrypting any
//!   single ballot.
//! - [`vp`], a non-interactive zero-knowledge proof that an [`he`] ciphertext
//!   encrypts 0 or 1, so the committee can reject malformed ballots before
//!   tallying.
//! - [`rs`], a linkable ring signature authenticating a ballot as coming
//!   from some member of the registered voter ring, without revealing which,
//!   while still detecting double votes via a per-signer key image.
//!
//! [`orch`] wires the three together into a minimal committee/voter harness;
//! it is the only module that holds mutable state.

mod common;
pub mod error;
pub mod he;
pub mod orch;
pub mod rs;
pub mod vp;

/// Underlying paillier library. Use this to get the matching version of the
/// `unknown_order` big-integer type used throughout this crate's public API.
pub use libpaillier;
/// Arbitrary-precision integer type backing [`he`] and [`vp`].
pub use libpaillier::unknown_order;

/// Challenge space for Fiat-Shamir in [`vp`]: Q = 2^256, independent of the
/// Paillier modulus size.
pub const CHALLENGE_BITS: usize = 256;

/// Default Paillier modulus bit length for production key generation.
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// Reduced modulus bit length for test fixtures only; never use for a real
/// election.
pub const TEST_MODULUS_BITS: usize = 1024;

/// Minimum ring size accepted at registration. A ring of one voter provides
/// no anonymity.
pub const MIN_RING_SIZE: usize = 2;

/// Curve the linkable ring signature operates over.
pub type RingCurve = generic_ec_curves::Secp256k1;
