//! Deterministic challenge scalars for Schnorr-style signing layers.
//!
//! Signature protocols built on the group key derive their challenge as
//! `H(R ‖ pk ‖ msg)` reduced into the scalar field, where `R` is the signing
//! commitment and both points use their compressed encodings. The two
//! derivers differ only in which curve's reduction is applied to the
//! SHA-512 output.

// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{curve::CurveTrait, ed25519::Ed25519, k256::Secp256k1};
use sha2::{Digest, Sha512};

/// Derivation of the per-signature challenge scalar from the message, the
/// group public key, and the signing commitment.
pub trait ChallengeDeriver<C: CurveTrait> {
    /// Compute the challenge scalar for `(msg, pub_key, r)`.
    fn derive_challenge(&self, msg: &[u8], pub_key: &C, r: &C) -> C::Scalar;
}

fn hash_challenge<C: CurveTrait>(msg: &[u8], pub_key: &C, r: &C) -> C::Scalar {
    let mut hasher = Sha512::new();
    hasher.update(r.to_bytes());
    hasher.update(pub_key.to_bytes());
    hasher.update(msg);
    let digest: [u8; 64] = hasher.finalize().into();
    C::scalar_from_wide_bytes(&digest)
}

/// Ed25519-style challenge derivation: SHA-512 reduced mod the ed25519
/// group order, matching the standard `H(R ‖ A ‖ M)` computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519ChallengeDeriver;

impl ChallengeDeriver<Ed25519> for Ed25519ChallengeDeriver {
    fn derive_challenge(&self, msg: &[u8], pub_key: &Ed25519, r: &Ed25519) -> <Ed25519 as CurveTrait>::Scalar {
        hash_challenge(msg, pub_key, r)
    }
}

/// secp256k1-style challenge derivation: the same SHA-512 concatenation
/// reduced mod the secp256k1 group order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1ChallengeDeriver;

impl ChallengeDeriver<Secp256k1> for Secp256k1ChallengeDeriver {
    fn derive_challenge(
        &self,
        msg: &[u8],
        pub_key: &Secp256k1,
        r: &Secp256k1,
    ) -> <Secp256k1 as CurveTrait>::Scalar {
        hash_challenge(msg, pub_key, r)
    }
}
