//! Runs the seven-voter election described in `original_source/Simulation.py`'s
//! `run_voting_simulation`, then reproduces its `test_invalid_vote` check,
//! narrating both over `tracing` instead of the source's `print` calls.
//!
//! Not part of the public API (spec §6: "No CLI ... are normative;
//! implementations may add them").

use rand_core::OsRng;
use tracing::info;

use vote_core::error::OrchError;
use vote_core::orch::{Committee, HeConfig, RingConfig, Voter};
use vote_core::rs::SigningKey;
use vote_core::unknown_order::BigNumber;
use vote_core::{he, vp};

fn main() {
    tracing_subscriber::fmt::init();

    info!("Secure e-voting simulation starting");

    let mut committee = Committee::new(
        HeConfig {
            modulus_bits: vote_core::TEST_MODULUS_BITS,
        },
        RingConfig::default(),
    )
    .expect("committee key generation failed");

    let ring_size = 8;
    let mut voters: Vec<Voter> = (0..ring_size)
        .map(|i| Voter::new(format!("V{:02}", i + 1), SigningKey::random(OsRng), i))
        .collect();
    let ring: Vec<_> = voters.iter().map(Voter::public_key).collect();
    committee.register(ring.clone()).expect("registration failed");

    // Only the first 7 of the 8 registered keys actually vote, matching the
    // source's `num_voters=8` ring with 7 active voters.
    let vote_choices = [1u8, 0, 1, 1, 0, 1, 0];
    let mut accepted = 0;
    for (voter, &choice) in voters.iter_mut().zip(vote_choices.iter()).take(7) {
        let label = voter.label().to_string();
        match voter.cast_vote(choice, committee.public_key(), &ring, OsRng) {
            Ok((ciphertext, proof, signature)) => match committee.submit(&ciphertext, &proof, &signature, &label) {
                Ok(()) => accepted += 1,
                Err(err) => info!(%err, "ballot rejected"),
            },
            Err(err) => info!(%err, "voter could not cast ballot"),
        }
    }
    info!(accepted, attempted = 7, "voting phase complete");

    info!("attempting double vote with the first registered voter");
    match voters[0].cast_vote(1, committee.public_key(), &ring, OsRng) {
        Ok((ciphertext, proof, signature)) => {
            match committee.submit(&ciphertext, &proof, &signature, "V01-double") {
                Ok(()) => unreachable!("double vote must not be accepted"),
                Err(OrchError::DoubleVote(_)) => info!("double vote correctly rejected"),
                Err(other) => info!(%other, "double vote rejected for an unexpected reason"),
            }
        }
        Err(OrchError::AlreadyVoted) => info!("voter driver refused the second ballot before it reached the committee"),
        Err(other) => info!(%other, "unexpected error casting the double vote"),
    }

    committee.close_ingestion().expect("closing ingestion failed");
    let result = committee.tally().expect("tally failed");
    let expected_yes: u64 = vote_choices.iter().map(|&v| v as u64).sum();
    info!(
        expected_yes,
        computed_yes = result.yes_votes,
        computed_no = result.no_votes,
        "tally complete"
    );

    info!("testing invalid vote rejection");
    let (ciphertext, randomness) = he::encrypt(committee.public_key(), &BigNumber::from(2u64), OsRng);
    match vp::prove(committee.public_key(), &ciphertext, &randomness, 2, OsRng) {
        Ok(proof) => {
            let valid = vp::verify(committee.public_key(), &ciphertext, &proof);
            info!(valid, "NIZK proof for vote=2 (should be false)");
        }
        Err(err) => info!(%err, "prove() correctly refused a non-binary vote"),
    }
}
