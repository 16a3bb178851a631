// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::CurveTrait,
    dkg::DkgParticipant,
    errors::{Error, Result},
    resharing::Resharing,
    sharing::ShamirShare,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

/// Broadcast payload of resharing round one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "C: serde::Serialize + serde::de::DeserializeOwned")]
pub struct ResharingBcast<C: CurveTrait> {
    /// Commitments `A_{i,k} = g · a_{i,k}` to the dealer's fresh polynomial,
    /// length `t′`. `share_commitments[0]` commits to the dealer's existing
    /// key share.
    pub share_commitments: Vec<C>,
    /// The joint commitment vector of the key being reshared, as produced by
    /// the prior key generation. Recipients rederive every dealer's
    /// constant-term commitment from this vector.
    pub group_commitments: Vec<C>,
}

/// Point-to-point payload of resharing round one: one sub-share per new
/// participant, keyed by the recipient's identifier.
pub type ResharingP2pSend = BTreeMap<u32, ShamirShare>;

impl<C: CurveTrait> Resharing<C> {
    /// Run resharing round one for one member of the old committee.
    ///
    /// The participant must hold key material from a completed key
    /// generation (or earlier resharing) and must be a member of the
    /// resharing committee. Its key share is dealt across the new committee
    /// with the new threshold.
    #[instrument(skip_all, err(Debug), fields(id = participant.id()))]
    pub fn round1<R: RngCore + CryptoRng>(
        &self,
        participant: &DkgParticipant<C>,
        rng: &mut R,
    ) -> Result<(ResharingBcast<C>, ResharingP2pSend)> {
        let sk_share = participant.sk_share().ok_or_else(|| {
            error!("Participant {} holds no key share to reshare", participant.id());
            Error::IncompleteParticipant
        })?;
        if participant.commitments().is_empty() {
            error!("Participant {} holds no joint commitments", participant.id());
            return Err(Error::IncompleteParticipant);
        }
        if !self.resharing_participant_ids.contains(&participant.id()) {
            error!(
                "Participant {} is not in the resharing committee",
                participant.id()
            );
            return Err(Error::NotAParticipant(participant.id()));
        }
        info!("Dealing key share across the new committee.");

        let (verifier, shares) = self.feldman.split(sk_share, rng)?;

        let bcast = ResharingBcast {
            share_commitments: verifier.commitments,
            group_commitments: participant.commitments().to_vec(),
        };
        Ok((bcast, shares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dkg::tests::run_dkg, k256::Secp256k1, sharing::FeldmanVerifier,
        utils::testing::init_testing,
    };

    #[test]
    fn round1_deals_the_existing_share() {
        let rng = &mut init_testing();
        let participants = run_dkg::<Secp256k1, _>(2, &[1, 2, 3], rng);
        let resharing = Resharing::<Secp256k1>::new(2, &[1, 2], &[10, 20, 30]).unwrap();

        let dealer = &participants[&1];
        let (bcast, p2p) = resharing.round1(dealer, rng).unwrap();

        assert_eq!(bcast.share_commitments.len(), 2);
        assert_eq!(bcast.group_commitments, dealer.commitments());
        assert_eq!(p2p.keys().copied().collect::<Vec<_>>(), vec![10, 20, 30]);

        // The constant term commits to the dealer's existing key share.
        assert_eq!(
            bcast.share_commitments[0],
            Secp256k1::scale_generator(dealer.sk_share().unwrap())
        );

        // Every sub-share lies on the fresh polynomial.
        let verifier = FeldmanVerifier {
            commitments: bcast.share_commitments,
        };
        for share in p2p.values() {
            verifier.verify(share).unwrap();
        }
    }

    #[test]
    fn round1_requires_a_completed_participant() {
        let rng = &mut init_testing();
        let resharing = Resharing::<Secp256k1>::new(2, &[1, 2], &[10, 20, 30]).unwrap();
        let fresh = DkgParticipant::<Secp256k1>::new(1, 2, &[2, 3]).unwrap();
        assert_eq!(
            resharing.round1(&fresh, rng).unwrap_err(),
            Error::IncompleteParticipant
        );
    }

    #[test]
    fn round1_requires_committee_membership() {
        let rng = &mut init_testing();
        let participants = run_dkg::<Secp256k1, _>(2, &[1, 2, 3], rng);
        let resharing = Resharing::<Secp256k1>::new(2, &[1, 2], &[10, 20, 30]).unwrap();
        assert_eq!(
            resharing.round1(&participants[&3], rng).unwrap_err(),
            Error::NotAParticipant(3)
        );
    }
}
