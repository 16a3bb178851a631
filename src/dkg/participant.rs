// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::CurveTrait,
    errors::{Error, Result},
    sharing::{Feldman, FeldmanVerifier, ShamirShare},
};
use std::collections::BTreeMap;
use tracing::error;

/// A share and commitment vector received from one peer, recorded as round
/// two verifies them.
#[derive(Debug, Clone)]
pub(crate) struct PeerDealing<C: CurveTrait> {
    pub(crate) share: Option<ShamirShare>,
    pub(crate) verifier: Option<FeldmanVerifier<C>>,
}

/// Per-party state machine for the two-round distributed key generation
/// protocol.
///
/// A participant is created in round 1, advances to round 2 after dealing
/// its own secret, and becomes terminal once round 2 has aggregated the
/// joint key material. After completion the caller reads the output through
/// [`sk_share`](Self::sk_share), [`verification_key`](Self::verification_key),
/// [`commitments`](Self::commitments), and [`vk_share`](Self::vk_share).
///
/// The joint commitment vector is the public polynomial
/// `F(x) = f(x) · G` where `f` is the (unknown) joint secret polynomial:
/// `commitments[0]` is the group verification key, and
/// `g · sk_share = Σ_k commitments[k] · id^k` for every participant.
pub struct DkgParticipant<C: CurveTrait> {
    pub(crate) id: u32,
    pub(crate) threshold: u32,
    pub(crate) round: u8,
    pub(crate) feldman: Feldman<C>,
    pub(crate) other_participant_shares: BTreeMap<u32, PeerDealing<C>>,
    pub(crate) verifier: Option<FeldmanVerifier<C>>,
    pub(crate) secret_shares: Option<BTreeMap<u32, ShamirShare>>,
    pub(crate) sk_share: Option<C::Scalar>,
    pub(crate) commitments: Vec<C>,
    pub(crate) verification_key: Option<C>,
    pub(crate) vk_share: Option<C>,
}

impl<C: CurveTrait> DkgParticipant<C> {
    /// Create a participant with its own identifier, the reconstruction
    /// threshold, and the identifiers of every other participant.
    ///
    /// All identifiers (own and peers) must be distinct and non-zero, and
    /// the committee size `|peers| + 1` must lie in `[threshold, 255]`.
    pub fn new(id: u32, threshold: u32, other_participants: &[u32]) -> Result<Self> {
        if other_participants.is_empty() {
            error!("A key generation committee needs at least two members");
            return Err(Error::EmptyCommittee);
        }

        let limit = other_participants.len() as u32 + 1;
        let mut ids = other_participants.to_vec();
        ids.push(id);
        let feldman = Feldman::new(threshold, limit, Some(ids))?;

        let other_participant_shares = other_participants
            .iter()
            .map(|&peer| {
                (
                    peer,
                    PeerDealing {
                        share: None,
                        verifier: None,
                    },
                )
            })
            .collect();

        Ok(Self {
            id,
            threshold,
            round: 1,
            feldman,
            other_participant_shares,
            verifier: None,
            secret_shares: None,
            sk_share: None,
            commitments: Vec::new(),
            verification_key: None,
            vk_share: None,
        })
    }

    /// This participant's identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The number of participants needed to reconstruct the joint secret.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The round this participant is in. Rounds 1 and 2 are awaiting the
    /// corresponding calls; round 3 is terminal.
    pub fn round(&self) -> u8 {
        self.round
    }

    /// The total number of participants, this one included.
    pub fn limit(&self) -> u32 {
        self.other_participant_shares.len() as u32 + 1
    }

    /// All participant identifiers, this one first.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids = Vec::with_capacity(self.other_participant_shares.len() + 1);
        ids.push(self.id);
        ids.extend(self.other_participant_shares.keys());
        ids
    }

    /// This participant's share of the joint secret, available once the
    /// protocol has completed.
    pub fn sk_share(&self) -> Option<&C::Scalar> {
        self.sk_share.as_ref()
    }

    /// The joint commitment vector, empty until the protocol has completed.
    pub fn commitments(&self) -> &[C] {
        &self.commitments
    }

    /// The group verification key `g · x`, available once the protocol has
    /// completed.
    pub fn verification_key(&self) -> Option<&C> {
        self.verification_key.as_ref()
    }

    /// The public image `g · sk_share` of this participant's share.
    pub fn vk_share(&self) -> Option<&C> {
        self.vk_share.as_ref()
    }

    /// Install final key material, used both by key generation round two and
    /// by resharing when this participant joins a new committee. Marks the
    /// participant terminal.
    pub(crate) fn install_key_material(&mut self, sk_share: C::Scalar, commitments: Vec<C>) {
        self.vk_share = Some(C::scale_generator(&sk_share));
        self.verification_key = Some(commitments[0]);
        self.sk_share = Some(sk_share);
        self.commitments = commitments;
        self.round = 3;
    }
}

impl<C: CurveTrait> std::fmt::Debug for DkgParticipant<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DkgParticipant")
            .field("id", &self.id)
            .field("threshold", &self.threshold)
            .field("round", &self.round)
            .field("sk_share", &"[redacted]")
            .finish_non_exhaustive()
    }
}
