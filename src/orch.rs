//! ORCH, the thin harness surface a ballot-collection committee and its
//! per-voter drivers are built against (spec §4.4).
//!
//! Grounded on `original_source/Simulation.py`'s `VotingCommittee`/`Voter`
//! classes (`register_voters`, `receive_vote`, `tally_votes`, `cast_vote`,
//! `has_voted`): this module keeps that same shape, one stateful committee
//! object plus a small per-voter guard against casting twice, but replaces
//! the Python's ad hoc `bool`/`print` returns with the `thiserror` taxonomy
//! of [`crate::error`] and `tracing` events (spec §10.4), since the teacher
//! crate's own modules are pure functions and carry no harness of their own.
//!
//! [`Committee`] is the only piece of this crate holding mutable state (spec
//! §5): its ingestion lifecycle is `Registering -> Open -> Closed`, matching
//! register/submit/tally's ordering constraints in [`crate::error::StateError`].

use std::collections::HashSet;

use rand_core::RngCore;
use tracing::{debug, info, warn};

use crate::error::{InputDomainError, OrchError, StateError};
use crate::he::{self, Ciphertext, PublicKey as HePublicKey};
use crate::rs::{self, KeyImage, PublicKey as VoterPublicKey, Signature, SigningKey};
use crate::unknown_order::BigNumber;
use crate::vp::{self, Proof};
use crate::MIN_RING_SIZE;

/// Paillier key-generation configuration (spec §6 "Configuration").
#[derive(Clone, Copy, Debug)]
pub struct HeConfig {
    pub modulus_bits: usize,
}

impl Default for HeConfig {
    fn default() -> Self {
        Self {
            modulus_bits: crate::DEFAULT_MODULUS_BITS,
        }
    }
}

/// Ring-size configuration (spec §6 "Configuration": `m >= 2`).
#[derive(Clone, Copy, Debug)]
pub struct RingConfig {
    pub min_size: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_RING_SIZE,
        }
    }
}

/// The committee's view of ingestion progress. Submissions are only accepted
/// in `Open`; `tally` is only valid once `Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Registering,
    Open,
    Closed,
}

/// The result of [`Committee::tally`] (spec §4.4 "tally()").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TallyResult {
    pub yes_votes: u64,
    pub no_votes: u64,
    pub total_ballots: u64,
}

/// Canonically encodes `ciphertext` as the message the ring signature signs
/// (spec §4.4: `"vote:" + decimal(ciphertext)`, resolved as a hard
/// requirement from `original_source/Simulation.py`'s
/// `f"vote:{encrypted_vote}"`).
pub fn signed_message(ciphertext: &Ciphertext) -> Vec<u8> {
    format!("vote:{ciphertext}").into_bytes()
}

/// The election committee: holds the Paillier keypair, the registered ring,
/// the used-image set, and the running encrypted tally (spec §4.4).
///
/// Ballot ingestion is not internally synchronized. Per spec §5, a
/// multi-threaded caller MUST serialize calls to [`Committee::submit`]
/// itself (e.g. behind a mutex taken for the whole call), since this type
/// has no interior locking of its own.
pub struct Committee {
    ring_config: RingConfig,
    public_key: HePublicKey,
    private_key: he::PrivateKey,
    ring: Vec<VoterPublicKey>,
    used_key_images: HashSet<KeyImageHandle>,
    accumulator: Ciphertext,
    accepted_ballots: u64,
    phase: Phase,
}

/// `KeyImage` doesn't derive a blanket `Hash`/`Eq` pair usable directly as a
/// `HashSet` key type without naming it, so this thin wrapper just forwards
/// to the manual `Hash`/`Eq` impls [`crate::rs::KeyImage`] already provides
/// over its normalized point encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct KeyImageHandle(KeyImage);

impl Committee {
    /// Generates the committee's Paillier keypair (spec §4.4, implicitly
    /// spec §4.1's key generation). The ring starts empty and unregistered.
    pub fn new(he_config: HeConfig, ring_config: RingConfig) -> Result<Self, crate::error::KeyGenError> {
        let (public_key, private_key) = he::keygen(he_config.modulus_bits)?;
        info!(bits = he_config.modulus_bits, "committee Paillier keypair generated");
        Ok(Self {
            ring_config,
            public_key,
            private_key,
            ring: Vec::new(),
            used_key_images: HashSet::new(),
            accumulator: BigNumber::one(),
            accepted_ballots: 0,
            phase: Phase::Registering,
        })
    }

    /// The committee's Paillier public key, to be distributed to voters.
    pub fn public_key(&self) -> &HePublicKey {
        &self.public_key
    }

    /// The registered ring, in canonical (registration) order. Empty before
    /// [`Committee::register`].
    pub fn ring(&self) -> &[VoterPublicKey] {
        &self.ring
    }

    /// Fixes the ring of voter public keys (spec §4.4 "register(cohort_size)").
    /// From this point the ring order is immutable; calling this twice is a
    /// [`StateError::AlreadyRegistered`].
    pub fn register(&mut self, ring: Vec<VoterPublicKey>) -> Result<(), OrchError> {
        if self.phase != Phase::Registering {
            return Err(StateError::AlreadyRegistered.into());
        }
        if ring.len() < self.ring_config.min_size {
            return Err(InputDomainError::RingTooSmall {
                min: self.ring_config.min_size,
                got: ring.len(),
            }
            .into());
        }
        info!(ring_size = ring.len(), "voters registered");
        self.ring = ring;
        self.phase = Phase::Open;
        Ok(())
    }

    /// Submits a ballot (spec §4.4 "submit(...)").
    ///
    /// Accepts iff the validity proof verifies, the ring signature verifies
    /// over the canonical encoding of `ciphertext`, and the signature's key
    /// image has not previously been accepted. On acceptance, folds
    /// `ciphertext` into the running accumulator and records the key image;
    /// on rejection, state is left completely unchanged.
    pub fn submit(
        &mut self,
        ciphertext: &Ciphertext,
        proof: &Proof,
        signature: &Signature,
        voter_label: &str,
    ) -> Result<(), OrchError> {
        match self.phase {
            Phase::Registering => return Err(StateError::NotRegistered.into()),
            Phase::Closed => return Err(StateError::SubmitAfterTally.into()),
            Phase::Open => {}
        }

        if !vp::verify(&self.public_key, ciphertext, proof) {
            warn!(voter = voter_label, "validity proof rejected");
            return Err(OrchError::InvalidProof);
        }

        let message = signed_message(ciphertext);
        if !rs::verify(&message, signature) {
            warn!(voter = voter_label, "ring signature rejected");
            return Err(OrchError::InvalidSignature);
        }

        let handle = KeyImageHandle(signature.key_image);
        if self.used_key_images.contains(&handle) {
            warn!(voter = voter_label, "double vote detected, key image already used");
            return Err(crate::error::DoubleVote.into());
        }

        self.accumulator = self.public_key.combine_ciphertexts(&self.accumulator, ciphertext);
        self.used_key_images.insert(handle);
        self.accepted_ballots += 1;
        debug!(voter = voter_label, accepted = self.accepted_ballots, "vote accepted");
        Ok(())
    }

    /// Closes ingestion: after this call, [`Committee::submit`] always fails
    /// with [`StateError::SubmitAfterTally`] and [`Committee::tally`]
    /// becomes available.
    pub fn close_ingestion(&mut self) -> Result<(), OrchError> {
        match self.phase {
            Phase::Registering => Err(StateError::NotRegistered.into()),
            Phase::Open => {
                self.phase = Phase::Closed;
                info!(accepted = self.accepted_ballots, "ingestion closed");
                Ok(())
            }
            Phase::Closed => Ok(()),
        }
    }

    /// Decrypts the accumulator and returns the tally (spec §4.4 "tally()").
    /// Requires ingestion to be closed ([`Committee::close_ingestion`]).
    pub fn tally(&self) -> Result<TallyResult, OrchError> {
        if self.phase != Phase::Closed {
            return Err(StateError::TallyBeforeIngestion.into());
        }

        let decrypted = he::decrypt(&self.public_key, &self.private_key, &self.accumulator);
        let yes_votes: u64 = decrypted
            .to_string()
            .parse()
            .expect("tally fits u64 for elections up to a few thousand voters (spec §1 Non-goals)");
        let no_votes = self.accepted_ballots - yes_votes;

        info!(yes_votes, no_votes, "tally complete");
        Ok(TallyResult {
            yes_votes,
            no_votes,
            total_ballots: self.accepted_ballots,
        })
    }
}

/// A single voter's driver: holds the signing key and guards against
/// casting twice client-side (spec §11, `original_source/Simulation.py`'s
/// `Voter.has_voted`). This is distinct from the committee-side
/// [`crate::error::DoubleVote`] guard, which protects the key-image set
/// even if a caller bypasses this driver entirely.
pub struct Voter {
    label: String,
    signing_key: SigningKey,
    ring_index: usize,
    has_voted: bool,
}

impl Voter {
    /// Builds a driver for a voter already present in `ring` at
    /// `ring_index`, using the committee's Paillier public key to encrypt
    /// future ballots.
    pub fn new(label: impl Into<String>, signing_key: SigningKey, ring_index: usize) -> Self {
        Self {
            label: label.into(),
            signing_key,
            ring_index,
            has_voted: false,
        }
    }

    /// This voter's public key, for inclusion in the registered ring.
    pub fn public_key(&self) -> VoterPublicKey {
        self.signing_key.public_key()
    }

    /// The label this voter was constructed with, for logging/display.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Encrypts `vote`, proves its validity, and signs it as this voter
    /// (spec §4.4 data flow: "encrypts the choice -> proves validity ->
    /// signs"). Refuses a second call with [`OrchError::AlreadyVoted`],
    /// mirroring `original_source/Simulation.py`'s `self.has_voted` guard.
    pub fn cast_vote<R: RngCore>(
        &mut self,
        vote: u8,
        he_public_key: &HePublicKey,
        ring: &[VoterPublicKey],
        mut rng: R,
    ) -> Result<(Ciphertext, Proof, Signature), OrchError> {
        if self.has_voted {
            return Err(OrchError::AlreadyVoted);
        }
        if vote > 1 {
            return Err(InputDomainError::NonBinaryVote.into());
        }

        let (ciphertext, randomness) = he::encrypt(he_public_key, &BigNumber::from(vote as u64), &mut rng);
        let proof = vp::prove(he_public_key, &ciphertext, &randomness, vote, &mut rng).map_err(|e| match e {
            vp::ProveError::InputDomain(d) => OrchError::InputDomain(d),
            vp::ProveError::ProofGen(p) => OrchError::ProofGen(p),
        })?;

        let message = signed_message(&ciphertext);
        let signature = rs::sign(&message, self.ring_index, ring, &self.signing_key, &mut rng)?;

        self.has_voted = true;
        debug!(voter = %self.label, "vote cast");
        Ok((ciphertext, proof, signature))
    }

    /// Whether this voter has already cast a ballot.
    pub fn has_voted(&self) -> bool {
        self.has_voted
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fresh_committee(ring_size: usize) -> Committee {
        let mut committee = Committee::new(
            HeConfig {
                modulus_bits: crate::TEST_MODULUS_BITS,
            },
            RingConfig::default(),
        )
        .unwrap();

        let ring: Vec<VoterPublicKey> = (0..ring_size)
            .map(|i| Voter::new(format!("V{i:02}"), SigningKey::random(rand_core::OsRng::default()), i).public_key())
            .collect();
        committee.register(ring).unwrap();
        committee
    }

    #[test]
    fn register_twice_is_rejected() {
        let mut committee = fresh_committee(2);
        let extra_ring: Vec<VoterPublicKey> = (0..2)
            .map(|_| SigningKey::random(rand_core::OsRng::default()).public_key())
            .collect();
        let err = committee.register(extra_ring).unwrap_err();
        assert_eq!(err, OrchError::State(StateError::AlreadyRegistered));
    }

    #[test]
    fn ring_below_minimum_is_rejected_at_registration() {
        let mut committee = Committee::new(
            HeConfig {
                modulus_bits: crate::TEST_MODULUS_BITS,
            },
            RingConfig::default(),
        )
        .unwrap();
        let ring = vec![SigningKey::random(rand_core::OsRng::default()).public_key()];
        let err = committee.register(ring).unwrap_err();
        assert_eq!(
            err,
            OrchError::InputDomain(InputDomainError::RingTooSmall { min: MIN_RING_SIZE, got: 1 })
        );
    }

    #[test]
    fn submit_before_registration_is_rejected() {
        let mut committee = Committee::new(
            HeConfig {
                modulus_bits: crate::TEST_MODULUS_BITS,
            },
            RingConfig::default(),
        )
        .unwrap();
        let signing_key = SigningKey::random(rand_core::OsRng::default());
        let ring = vec![signing_key.public_key(), SigningKey::random(rand_core::OsRng::default()).public_key()];
        let (ciphertext, randomness) =
            he::encrypt(committee.public_key(), &BigNumber::from(1u64), rand_core::OsRng::default());
        let proof = vp::prove(committee.public_key(), &ciphertext, &randomness, 1, rand_core::OsRng::default()).unwrap();
        let message = signed_message(&ciphertext);
        let signature = rs::sign(&message, 0, &ring, &signing_key, rand_core::OsRng::default()).unwrap();

        let err = committee.submit(&ciphertext, &proof, &signature, "V00").unwrap_err();
        assert_eq!(err, OrchError::State(StateError::NotRegistered));
    }

    #[test]
    fn tally_before_closing_ingestion_is_rejected() {
        let committee = fresh_committee(2);
        let err = committee.tally().unwrap_err();
        assert_eq!(err, OrchError::State(StateError::TallyBeforeIngestion));
    }

    #[test]
    fn submit_after_tally_is_rejected() {
        let mut committee = fresh_committee(2);
        committee.close_ingestion().unwrap();
        let _ = committee.tally().unwrap();

        let signing_key = SigningKey::random(rand_core::OsRng::default());
        let ring = committee.ring().to_vec();
        let (ciphertext, randomness) =
            he::encrypt(committee.public_key(), &BigNumber::from(1u64), rand_core::OsRng::default());
        let proof = vp::prove(committee.public_key(), &ciphertext, &randomness, 1, rand_core::OsRng::default()).unwrap();
        let message = signed_message(&ciphertext);
        let signature = rs::sign(&message, 0, &ring, &signing_key, rand_core::OsRng::default()).unwrap();

        let err = committee.submit(&ciphertext, &proof, &signature, "late").unwrap_err();
        assert_eq!(err, OrchError::State(StateError::SubmitAfterTally));
    }

    #[test]
    fn voter_cannot_cast_twice() {
        let mut committee = Committee::new(
            HeConfig {
                modulus_bits: crate::TEST_MODULUS_BITS,
            },
            RingConfig::default(),
        )
        .unwrap();
        let mut voter = Voter::new("V00", SigningKey::random(rand_core::OsRng::default()), 0);
        let ring = vec![voter.public_key(), SigningKey::random(rand_core::OsRng::default()).public_key()];
        committee.register(ring.clone()).unwrap();

        let _ = voter
            .cast_vote(1, committee.public_key(), &ring, rand_core::OsRng::default())
            .unwrap();
        let err = voter
            .cast_vote(0, committee.public_key(), &ring, rand_core::OsRng::default())
            .unwrap_err();
        assert_eq!(err, OrchError::AlreadyVoted);
    }

    #[test]
    fn end_to_end_tally_small_ring() {
        let mut committee = Committee::new(
            HeConfig {
                modulus_bits: crate::TEST_MODULUS_BITS,
            },
            RingConfig::default(),
        )
        .unwrap();

        let mut voters: Vec<Voter> = (0..3)
            .map(|i| Voter::new(format!("V{i:02}"), SigningKey::random(rand_core::OsRng::default()), i))
            .collect();
        let ring: Vec<VoterPublicKey> = voters.iter().map(Voter::public_key).collect();
        committee.register(ring.clone()).unwrap();

        let choices = [1u8, 0, 1];
        for (voter, &choice) in voters.iter_mut().zip(choices.iter()) {
            let (c, p, s) = voter
                .cast_vote(choice, committee.public_key(), &ring, rand_core::OsRng::default())
                .unwrap();
            committee.submit(&c, &p, &s, voter.label()).unwrap();
        }

        committee.close_ingestion().unwrap();
        let result = committee.tally().unwrap();
        assert_eq!(result.yes_votes, 2);
        assert_eq!(result.no_votes, 1);
        assert_eq!(result.total_ballots, 3);
    }
}
