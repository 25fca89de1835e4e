//! VP, NIZK proof that an [`crate::he`] ciphertext encrypts 0 or 1 (spec §4.2).
//!
//! A Σ-protocol OR-composition, collapsed to non-interactive via Fiat-Shamir:
//! the prover shows knowledge of randomness `r` such that either
//! `c ≡ g^0 r^N` or `c * g^-1 ≡ r^N` (mod N^2), without revealing which.
//!
//! Grounded on the commit/challenge/prove/verify decomposition of the
//! teacher's `paillier_affine_operation_in_range.rs` (the `fail_if`
//! verification idiom in particular), specialized from that file's general
//! affine-operation-in-range statement down to the `m in {0, 1}` OR-proof
//! `original_source/PHE.py`'s (absent from the retrieval, but named)
//! `prove_01`/`verify_01` implement.
//!
//! ## Example
//!
//! ```no_run
//! use vote_core::{he, vp};
//! use vote_core::unknown_order::BigNumber;
//!
//! let (pk, _sk) = he::keygen(vote_core::TEST_MODULUS_BITS).unwrap();
//! let (ciphertext, randomness) = he::encrypt(&pk, &BigNumber::from(1u64), rand_core::OsRng::default());
//!
//! let proof = vp::prove(&pk, &ciphertext, &randomness, 1, rand_core::OsRng::default()).unwrap();
//! assert!(vp::verify(&pk, &ciphertext, &proof));
//! ```

use rand_core::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::common::{combine, encode_minimal_be, gen_inversible};
use crate::error::{InputDomainError, ProofGenError};
use crate::he::{Ciphertext, PublicKey, Randomness};
use crate::unknown_order::BigNumber;
use crate::CHALLENGE_BITS;

/// The six-integer OR-proof of spec §3 ("Validity proof").
///
/// Serialized, under the `serde` feature, as six decimal-string integers
/// (spec §6 "Validity-proof encoding: six named big-integer fields"), via
/// `serde_with::DisplayFromStr`, matching [`crate::he::PublicKey`]'s scheme.
#[cfg_attr(feature = "serde", serde_with::serde_as)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    pub a0: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    pub a1: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    pub e0: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    pub e1: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    pub z0: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    pub z1: BigNumber,
}

/// Errors [`prove`] can return. Verification never errors, see
/// [`verify`]'s doc comment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProveError {
    #[error(transparent)]
    InputDomain(#[from] InputDomainError),
    #[error(transparent)]
    ProofGen(#[from] ProofGenError),
}

fn challenge_space() -> BigNumber {
    BigNumber::one() << CHALLENGE_BITS
}

/// Computes `c_0 = c` and `c_1 = c * g^-1 mod N^2`, the two OR-branches'
/// public statements.
fn branch_ciphertexts(pk: &PublicKey, c: &Ciphertext) -> Result<[Ciphertext; 2], ProofGenError> {
    let g_inv = pk
        .g()
        .invert(pk.nn())
        .ok_or(ProofGenError::GeneratorNotInvertible)?;
    let c1 = (c * &g_inv) % pk.nn();
    Ok([c.clone(), c1])
}

/// Recomputes the Fiat-Shamir challenge `e* = H(c, a0, a1) mod Q` (spec §4.2
/// step 3). Both [`prove`] and [`verify`] call this so the transcript order
/// (ciphertext, then a0, then a1) and encoding (minimum-length big-endian)
/// can never drift between them.
fn challenge(c: &Ciphertext, a: &[Ciphertext; 2]) -> BigNumber {
    let mut hasher = Sha256::new();
    hasher.update(encode_minimal_be(c));
    hasher.update(encode_minimal_be(&a[0]));
    hasher.update(encode_minimal_be(&a[1]));
    let digest = hasher.finalize();
    BigNumber::from_slice(digest) % challenge_space()
}

/// Proves that `ciphertext` (produced with `randomness`) encrypts `vote`,
/// without revealing `vote` (spec §4.2 "Prove").
///
/// `vote` must be 0 or 1; any other value is an [`InputDomainError`] since
/// there is no real branch to close honestly.
pub fn prove<R: RngCore>(
    pk: &PublicKey,
    ciphertext: &Ciphertext,
    randomness: &Randomness,
    vote: u8,
    mut rng: R,
) -> Result<Proof, ProveError> {
    if vote > 1 {
        return Err(InputDomainError::NonBinaryVote.into());
    }
    let real = vote as usize;
    let simulated = 1 - real;

    let c = branch_ciphertexts(pk, ciphertext)?;
    let q = challenge_space();

    // Real branch: honest Σ-protocol commitment.
    let s_real = gen_inversible(pk.n(), &mut rng);
    let a_real = s_real.modpow(pk.n(), pk.nn());

    // Simulated branch: pick the response and challenge first, derive a
    // matching commitment (spec §4.2 step 2).
    let e_simulated = BigNumber::from_rng(&q, &mut rng);
    let z_simulated = gen_inversible(pk.n(), &mut rng);
    let c_sim_pow_e = c[simulated].modpow(&e_simulated, pk.nn());
    let c_sim_pow_e_inv = c_sim_pow_e
        .invert(pk.nn())
        .ok_or_else(|| ProofGenError::ModularInverseFailed(format!("c_{simulated}^e_{simulated}")))?;
    let a_simulated = (z_simulated.modpow(pk.n(), pk.nn()) * c_sim_pow_e_inv) % pk.nn();

    let mut a = [BigNumber::zero(), BigNumber::zero()];
    a[real] = a_real;
    a[simulated] = a_simulated;

    let e_star = challenge(ciphertext, &a);

    let e_real = reduce_mod(&(&e_star - &e_simulated), &q);
    let z_real = (s_real * randomness.expose().modpow(&e_real, pk.n())) % pk.n();

    let mut e = [BigNumber::zero(), BigNumber::zero()];
    e[real] = e_real;
    e[simulated] = e_simulated;

    let mut z = [BigNumber::zero(), BigNumber::zero()];
    z[real] = z_real;
    z[simulated] = z_simulated;

    Ok(Proof {
        a0: a[0].clone(),
        a1: a[1].clone(),
        e0: e[0].clone(),
        e1: e[1].clone(),
        z0: z[0].clone(),
        z1: z[1].clone(),
    })
}

/// Verifies `proof` against `ciphertext` (spec §4.2 "Verify"). Returns a
/// plain `bool`: a failed verification is a decision, not an error (spec §7
/// "VerifyReject is returned as a boolean, never as an exception").
pub fn verify(pk: &PublicKey, ciphertext: &Ciphertext, proof: &Proof) -> bool {
    let c = match branch_ciphertexts(pk, ciphertext) {
        Ok(c) => c,
        Err(_) => return false,
    };
    let a = [proof.a0.clone(), proof.a1.clone()];
    let e = [proof.e0.clone(), proof.e1.clone()];
    let z = [proof.z0.clone(), proof.z1.clone()];
    let q = challenge_space();

    let e_star = challenge(ciphertext, &a);
    if reduce_mod(&(&e[0] + &e[1]), &q) != e_star {
        return false;
    }

    for i in 0..2 {
        let lhs = z[i].modpow(pk.n(), pk.nn());
        let rhs = combine(&a[i], &BigNumber::one(), &c[i], &e[i], pk.nn());
        if lhs != rhs {
            return false;
        }
    }

    true
}

fn reduce_mod(value: &BigNumber, modulus: &BigNumber) -> BigNumber {
    let r = value % modulus;
    if r < BigNumber::zero() {
        r + modulus
    } else {
        r
    }
}
