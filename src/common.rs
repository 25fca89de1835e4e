//! Shared big-integer helpers used by [`crate::he`] and [`crate::vp`].
//!
//! Mirrors the `common` module the teacher crate (`paillier-zk`) calls into
//! from its proof modules (`combine`, `gen_inversible`) but whose source was
//! not part of this retrieval; reconstructed here from the call sites.

use generic_ec::{Curve, Scalar};
use rand_core::RngCore;

use crate::unknown_order::BigNumber;

/// Computes `base1^exp1 * base2^exp2 mod modulus`.
///
/// This is the `s^alpha * t^gamma mod N^` combinator the teacher's proof
/// modules use to build Ring-Pedersen commitments, generalized here to the
/// two-exponentiation pattern VP needs for its OR-branches (`a_i = z_i^N *
/// c_i^{-e_i} mod N^2`, expressed as `combine(z_i, N, c_i, -e_i, N^2)`).
pub fn combine(
    base1: &BigNumber,
    exp1: &BigNumber,
    base2: &BigNumber,
    exp2: &BigNumber,
    modulus: &BigNumber,
) -> BigNumber {
    let a = base1.modpow(exp1, modulus);
    let b = base2.modpow(exp2, modulus);
    (a * b) % modulus
}

/// Samples a uniformly random element of `[1, modulus)` that is invertible
/// modulo `modulus`, i.e. `gcd(result, modulus) == 1`.
///
/// Used for Paillier encryption randomness and proof blinding nonces, both of
/// which must live in `Z*_N` rather than merely `Z_N`.
pub fn gen_inversible<R: RngCore>(modulus: &BigNumber, mut rng: R) -> BigNumber {
    loop {
        let candidate = BigNumber::from_rng(modulus, &mut rng);
        if candidate == BigNumber::zero() {
            continue;
        }
        if candidate.gcd(modulus) == BigNumber::one() {
            return candidate;
        }
    }
}

/// Samples a uniformly random element of `[1, bound)`, rejecting zero.
///
/// Used wherever the spec calls for sampling from `[1, N-1]` or `[0, Q)`
/// without the additional invertibility constraint `gen_inversible` enforces.
pub fn sample_nonzero_below<R: RngCore>(bound: &BigNumber, mut rng: R) -> BigNumber {
    loop {
        let candidate = BigNumber::from_rng(bound, &mut rng);
        if candidate != BigNumber::zero() {
            return candidate;
        }
    }
}

/// Encodes `value` as its minimum-length big-endian byte string: no leading
/// zero byte unless the value itself is zero, in which case the encoding is
/// the empty byte string.
///
/// Fiat-Shamir transcripts are brittle to any deviation from this rule;
/// prover and verifier must agree on it bit-for-bit (see spec §4.2 "Edge
/// policies" / §9 "Transcript encoding").
pub fn encode_minimal_be(value: &BigNumber) -> Vec<u8> {
    if *value == BigNumber::zero() {
        Vec::new()
    } else {
        value.to_bytes()
    }
}

/// Converts a [`BigNumber`] into a scalar of curve `C`'s field, by folding
/// its big-endian bytes through the field with Horner's method.
///
/// Mirrors the teacher's `common::convert_scalar` (re-exported by
/// `group_element_vs_paillier_encryption_in_range.rs`, whose own body was not
/// part of this retrieval). Folding through the field rather than converting
/// via a fixed-width byte constructor means no assumption is needed about
/// `Scalar`'s exact from-bytes API or the curve's order as a separate
/// constant, since the field's own arithmetic performs the reduction mod n.
pub fn convert_scalar<C: Curve>(value: &BigNumber) -> Scalar<C> {
    let byte = |b: u8| Scalar::<C>::from(u64::from(b));
    value
        .to_bytes()
        .into_iter()
        .fold(Scalar::<C>::zero(), |acc, b| acc * Scalar::<C>::from(256u64) + byte(b))
}
