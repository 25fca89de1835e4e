//! HE, additively homomorphic (Paillier) encryption (spec §4.1).
//!
//! Grounded on the teacher's `Data`/`PrivateData`/`Aux` struct-literal style
//! (`paillier_affine_operation_in_range.rs`) and on `original_source/PHE.py`'s
//! `keygen` for the exact formulas: `g = N + 1`, `lambda = lcm(p-1, q-1)`,
//! `mu = L(g^lambda mod N^2)^-1 mod N` with `L(x) = (x - 1) / N`.
//!
//! ## Example
//!
//! ```no_run
//! use vote_core::he;
//! use vote_core::unknown_order::BigNumber;
//!
//! let (pk, sk) = he::keygen(vote_core::TEST_MODULUS_BITS).unwrap();
//!
//! let (ciphertext, _randomness) = he::encrypt(&pk, &BigNumber::from(1u64), rand_core::OsRng::default());
//! let tally = he::decrypt(&pk, &sk, &ciphertext);
//! assert_eq!(tally, BigNumber::from(1u64));
//! ```

use rand_core::RngCore;

use crate::common::gen_inversible;
use crate::error::KeyGenError;
use crate::unknown_order::BigNumber;

/// How many distinct (p, q, mu) candidates [`keygen`] will try before giving
/// up. `mu` failing to exist requires `gcd(L, N) != 1`, which is vanishingly
/// rare for randomly chosen safe-sized primes; this bound only guards against
/// pathological RNGs.
const KEYGEN_MAX_ATTEMPTS: usize = 16;

/// The Paillier public key: `(N, g, N^2)` with the invariant `g = N + 1` and
/// `gcd(g, N^2) == 1`.
///
/// Serialized, under the `serde` feature, as its three decimal-string
/// integers (spec §6 "Ciphertext encoding: decimal ... big-integer"), via
/// `serde_with::DisplayFromStr` rather than a derive on `BigNumber` itself,
/// since `unknown_order` does not implement `serde::Serialize` directly.
#[cfg_attr(feature = "serde", serde_with::serde_as)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    n: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    g: BigNumber,
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::DisplayFromStr"))]
    nn: BigNumber,
}

impl PublicKey {
    /// `N`, the composite modulus.
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// `g = N + 1`, the canonical Paillier generator.
    pub fn g(&self) -> &BigNumber {
        &self.g
    }

    /// `N^2`, the ciphertext modulus.
    pub fn nn(&self) -> &BigNumber {
        &self.nn
    }

    /// The identity element of the ciphertext group under multiplication,
    /// i.e. the encryption of 0 with an implicit randomness of 1. The
    /// harness accumulator starts here.
    pub fn accumulator_identity(&self) -> BigNumber {
        BigNumber::one()
    }

    /// Folds `c2` into `c1` via the additively homomorphic ciphertext
    /// product: `Decrypt(combine(c1, c2)) = Decrypt(c1) + Decrypt(c2) mod N`.
    pub fn combine_ciphertexts(&self, c1: &BigNumber, c2: &BigNumber) -> BigNumber {
        (c1 * c2) % &self.nn
    }
}

/// The Paillier private key: `(lambda, mu)`. Held solely by the committee
/// component (spec §9 "Ownership").
///
/// `lambda` and `mu` are zeroed out on drop on a best-effort basis; the
/// underlying `unknown_order::BigNumber` does not itself guarantee in-place
/// zeroing of its heap buffer, so this is not a substitute for a
/// `zeroize`-aware bignum type.
pub struct PrivateKey {
    lambda: BigNumber,
    mu: BigNumber,
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.lambda = BigNumber::zero();
        self.mu = BigNumber::zero();
    }
}

/// Ciphertext: an element of `Z*_{N^2}`.
pub type Ciphertext = BigNumber;

/// Encryption randomness `r`, required by [`crate::vp`] to construct the
/// validity proof and never otherwise disclosed. Zeroed on drop
/// (best-effort; see [`PrivateKey`]'s caveat).
pub struct Randomness(BigNumber);

impl Randomness {
    /// The raw randomness value, for use by the validity prover only.
    pub fn expose(&self) -> &BigNumber {
        &self.0
    }
}

impl Drop for Randomness {
    fn drop(&mut self) {
        self.0 = BigNumber::zero();
    }
}

/// Generates a fresh Paillier keypair with an `N` of the requested bit
/// length (spec §4.1 "Key generation").
///
/// Chooses two distinct primes `p`, `q` of bit length `ceil(bits / 2)` from
/// `unknown_order`'s own cryptographically strong prime source (the same one
/// `BigNumber::prime` draws from in the teacher crate), and retries the
/// whole candidate (primes included) if `mu` turns out not to be invertible.
/// This does not happen in practice for random primes of cryptographic
/// size, but the spec requires the retry path to exist rather than panic.
pub fn keygen(bits: usize) -> Result<(PublicKey, PrivateKey), KeyGenError> {
    let half = bits.div_ceil(2);

    for _ in 0..KEYGEN_MAX_ATTEMPTS {
        let p = BigNumber::prime(half);
        let mut q = BigNumber::prime(half);
        while q == p {
            q = BigNumber::prime(half);
        }

        let n = &p * &q;
        let g = &n + BigNumber::one();
        let nn = &n * &n;

        let p_minus_1 = &p - BigNumber::one();
        let q_minus_1 = &q - BigNumber::one();
        let gcd = p_minus_1.gcd(&q_minus_1);
        let lambda = (&p_minus_1 * &q_minus_1) / &gcd;

        let u = g.modpow(&lambda, &nn);
        let l = (&u - BigNumber::one()) / &n;

        match l.invert(&n) {
            Some(mu) => {
                return Ok((PublicKey { n, g, nn }, PrivateKey { lambda, mu }));
            }
            None => continue,
        }
    }

    Err(KeyGenError::PrimeSelectionFailed {
        attempts: KEYGEN_MAX_ATTEMPTS,
    })
}

/// Encrypts `m` under `pk` with freshly sampled randomness, returning both
/// the ciphertext and the randomness (spec §4.1 "Encryption").
///
/// `m` is reduced modulo `N` before encryption, so negative or
/// out-of-range inputs wrap per spec §4.1 "Negative-message semantics"
/// rather than erroring; range-confinement to `{0, 1}` is [`crate::vp`]'s
/// job, not this function's.
pub fn encrypt<R: RngCore>(pk: &PublicKey, m: &BigNumber, rng: R) -> (Ciphertext, Randomness) {
    let m_mod = reduce_mod(m, &pk.n);
    let r = gen_inversible(&pk.n, rng);

    let c = (pk.g.modpow(&m_mod, &pk.nn) * r.modpow(&pk.n, &pk.nn)) % &pk.nn;
    (c, Randomness(r))
}

/// Decrypts `c` under `sk`, recovering `m mod N` (spec §4.1 "Decryption").
/// No error conditions arise for a ciphertext that is actually in `Z*_{N^2}`.
pub fn decrypt(pk: &PublicKey, sk: &PrivateKey, c: &Ciphertext) -> BigNumber {
    let u = c.modpow(&sk.lambda, &pk.nn);
    let l = (&u - BigNumber::one()) / &pk.n;
    (l * &sk.mu) % &pk.n
}

fn reduce_mod(value: &BigNumber, modulus: &BigNumber) -> BigNumber {
    let r = value % modulus;
    if r < BigNumber::zero() {
        r + modulus
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let (pk, sk) = keygen(crate::TEST_MODULUS_BITS).unwrap();

        for m in [0u64, 1, 2, 1234] {
            let (c, _r) = encrypt(&pk, &BigNumber::from(m), rand_core::OsRng::default());
            let decrypted = decrypt(&pk, &sk, &c);
            assert_eq!(decrypted, BigNumber::from(m));
        }
    }

    #[test]
    fn homomorphic_sum() {
        let (pk, sk) = keygen(crate::TEST_MODULUS_BITS).unwrap();

        let (c1, _) = encrypt(&pk, &BigNumber::from(7u64), rand_core::OsRng::default());
        let (c2, _) = encrypt(&pk, &BigNumber::from(35u64), rand_core::OsRng::default());
        let combined = pk.combine_ciphertexts(&c1, &c2);

        assert_eq!(decrypt(&pk, &sk, &combined), BigNumber::from(42u64));
    }

    #[test]
    fn accumulator_identity_decrypts_to_zero() {
        let (pk, sk) = keygen(crate::TEST_MODULUS_BITS).unwrap();
        let identity = pk.accumulator_identity();
        assert_eq!(decrypt(&pk, &sk, &identity), BigNumber::zero());
    }

    #[test]
    fn public_key_invariants_hold() {
        let (pk, _sk) = keygen(crate::TEST_MODULUS_BITS).unwrap();
        assert_eq!(pk.g(), &(pk.n() + BigNumber::one()));
        assert_eq!(pk.g().gcd(pk.nn()), BigNumber::one());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn public_key_serde_round_trips() {
        let (pk, _sk) = keygen(crate::TEST_MODULUS_BITS).unwrap();
        let json = serde_json::to_string(&pk).unwrap();
        let restored: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(pk, restored);
    }
}
