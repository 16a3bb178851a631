// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    dkg::{participant::DkgParticipant, round1::Round1Bcast},
    errors::{Error, Result},
    sharing::{eval_commitment_poly, FeldmanVerifier, ShamirShare},
};
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

impl<C: CurveTrait> DkgParticipant<C> {
    /// Run round two: verify every peer's dealing and aggregate the joint
    /// key material.
    ///
    /// `bcast` and `p2p` must be keyed by exactly the peer set. This
    /// participant's own dealing is taken from its round-one state, so a
    /// peer can never substitute it. On success the participant is terminal
    /// and the caller reads the output through the accessors.
    #[instrument(skip_all, err(Debug), fields(id = self.id))]
    pub fn round2(
        &mut self,
        bcast: &BTreeMap<u32, Round1Bcast<C>>,
        p2p: &BTreeMap<u32, ShamirShare>,
    ) -> Result<()> {
        if self.round != 2 {
            return Err(Error::InvalidRound {
                current: self.round,
                attempted: 2,
            });
        }
        info!("Verifying DKG round one dealings from all peers.");

        let peer_count = self.other_participant_shares.len();
        if bcast.len() != peer_count {
            error!("Expected broadcasts from {peer_count} peers, got {}", bcast.len());
            return Err(Error::InputLengthMismatch {
                expected: peer_count,
                actual: bcast.len(),
            });
        }
        if p2p.len() != peer_count {
            error!("Expected shares from {peer_count} peers, got {}", p2p.len());
            return Err(Error::InputLengthMismatch {
                expected: peer_count,
                actual: p2p.len(),
            });
        }
        let peers: Vec<u32> = self.other_participant_shares.keys().copied().collect();
        for &peer in &peers {
            if !bcast.contains_key(&peer) || !p2p.contains_key(&peer) {
                return Err(Error::MissingPeerInput(peer));
            }
        }

        // Verify every peer's dealing before touching any aggregate.
        for &peer in &peers {
            let payload = &bcast[&peer];
            if payload.commitments.len() != self.threshold as usize {
                error!(
                    "Peer {peer} broadcast {} commitments; expected {}",
                    payload.commitments.len(),
                    self.threshold
                );
                return Err(Error::InputLengthMismatch {
                    expected: self.threshold as usize,
                    actual: payload.commitments.len(),
                });
            }

            let share = &p2p[&peer];
            if share.id != self.id {
                error!("Peer {peer} sent a share addressed to participant {}", share.id);
                return Err(Error::InvalidShare("share is not addressed to this participant"));
            }

            let verifier = FeldmanVerifier {
                commitments: payload.commitments.clone(),
            };
            verifier.verify(share).map_err(|err| match err {
                Error::CommitmentMismatch => {
                    error!("Dealing from participant {peer} failed verification");
                    Error::PeerCommitmentMismatch { sender: peer }
                }
                other => other,
            })?;

            if let Some(dealing) = self.other_participant_shares.get_mut(&peer) {
                dealing.share = Some(share.clone());
                dealing.verifier = Some(verifier);
            }
        }

        // Sum the self-share and every verified incoming share into this
        // participant's share of the joint secret, and the commitment
        // vectors point-wise into the joint commitments.
        let own_shares = self
            .secret_shares
            .as_ref()
            .ok_or(Error::IncompleteParticipant)?;
        let own_share = own_shares
            .get(&self.id)
            .ok_or(Error::MissingPeerInput(self.id))?;
        let mut sk_share = own_share.to_scalar::<C>()?;
        let mut commitments = self
            .verifier
            .as_ref()
            .ok_or(Error::IncompleteParticipant)?
            .commitments
            .clone();
        for (&peer, dealing) in &self.other_participant_shares {
            let share = dealing.share.as_ref().ok_or(Error::MissingPeerInput(peer))?;
            sk_share = sk_share.add(&share.to_scalar::<C>()?);

            let verifier = dealing
                .verifier
                .as_ref()
                .ok_or(Error::MissingPeerInput(peer))?;
            for (sum, commitment) in commitments.iter_mut().zip(verifier.commitments.iter()) {
                *sum = *sum + *commitment;
            }
        }

        // The aggregated share must lie on the aggregated polynomial.
        let expected = eval_commitment_poly(&commitments, &C::Scalar::from_u32(self.id));
        if C::scale_generator(&sk_share) != expected {
            error!("Aggregated share does not match the aggregated commitments");
            return Err(Error::AggregateMismatch);
        }

        self.install_key_material(sk_share, commitments);
        Ok(())
    }
}
