// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    dkg::DkgParticipant,
    errors::{Error, Result},
    resharing::{round1::ResharingBcast, Resharing},
    sharing::{eval_commitment_poly, ShamirShare, Shamir},
};
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

impl<C: CurveTrait> Resharing<C> {
    /// Run resharing round two for one member of the new committee.
    ///
    /// Verifies every dealer's sub-share against a dealing whose constant
    /// term is rederived from the old joint commitments, overriding whatever
    /// constant-term commitment the dealer broadcast, so that a dealer
    /// cannot reshare anything other than the key share it already holds.
    /// The verified sub-shares are then Lagrange-combined at zero into the
    /// participant's share of the unchanged group key, and the participant
    /// becomes terminal with the interpolated joint commitments installed.
    #[instrument(skip_all, err(Debug), fields(id = participant.id()))]
    pub fn round2(
        &self,
        participant: &mut DkgParticipant<C>,
        bcast: &BTreeMap<u32, ResharingBcast<C>>,
        p2p: &BTreeMap<u32, ShamirShare>,
    ) -> Result<()> {
        let j = participant.id();
        if !self.new_participant_ids.contains(&j) {
            error!("Participant {j} is not in the new committee");
            return Err(Error::NotAParticipant(j));
        }

        let old = &self.resharing_participant_ids;
        if bcast.len() != old.len() {
            error!("Expected broadcasts from {} dealers, got {}", old.len(), bcast.len());
            return Err(Error::InputLengthMismatch {
                expected: old.len(),
                actual: bcast.len(),
            });
        }
        if p2p.len() != old.len() {
            error!("Expected sub-shares from {} dealers, got {}", old.len(), p2p.len());
            return Err(Error::InputLengthMismatch {
                expected: old.len(),
                actual: p2p.len(),
            });
        }
        for &dealer in old {
            if !bcast.contains_key(&dealer) || !p2p.contains_key(&dealer) {
                return Err(Error::MissingPeerInput(dealer));
            }
        }
        for (&dealer, payload) in bcast {
            if payload.share_commitments.len() != self.threshold as usize {
                error!(
                    "Dealer {dealer} broadcast {} share commitments; expected {}",
                    payload.share_commitments.len(),
                    self.threshold
                );
                return Err(Error::InputLengthMismatch {
                    expected: self.threshold as usize,
                    actual: payload.share_commitments.len(),
                });
            }
            // The old joint commitment vector carries the old threshold,
            // which can never exceed the dealing committee.
            if payload.group_commitments.is_empty() || payload.group_commitments.len() > bcast.len()
            {
                error!("Dealer {dealer} broadcast a malformed group commitment vector");
                return Err(Error::InputLengthMismatch {
                    expected: bcast.len(),
                    actual: payload.group_commitments.len(),
                });
            }
        }

        // All dealers must be resharing the same group key.
        let group_key = bcast[&old[0]].group_commitments[0];
        for &dealer in old {
            if bcast[&dealer].group_commitments[0] != group_key {
                error!("Dealer {dealer} broadcast a diverging group commitment");
                return Err(Error::InconsistentCommitments { sender: dealer });
            }
        }
        info!("Verifying sub-shares from the old committee.");

        let x_j = C::Scalar::from_u32(j);
        let mut sub_shares: BTreeMap<u32, C::Scalar> = BTreeMap::new();
        for &dealer in old {
            let share = &p2p[&dealer];
            if share.id != j {
                error!("Dealer {dealer} sent a sub-share addressed to participant {}", share.id);
                return Err(Error::InvalidShare("share is not addressed to this participant"));
            }
            let value = share.to_scalar::<C>()?;

            // Rederive the dealer's constant-term commitment from the old
            // joint commitments: g · f(dealer) = Σ Φ_k · dealer^k. Using
            // this value instead of the broadcast one binds the dealing to
            // the old group key.
            let payload = &bcast[&dealer];
            let derived = eval_commitment_poly(
                &payload.group_commitments,
                &C::Scalar::from_u32(dealer),
            );
            let mut dealing = payload.share_commitments.clone();
            dealing[0] = derived;

            if C::scale_generator(&value) != eval_commitment_poly(&dealing, &x_j) {
                error!("Sub-share from dealer {dealer} for participant {j} failed verification");
                return Err(Error::PeerCommitmentMismatch { sender: dealer });
            }
            sub_shares.insert(dealer, value);
        }

        // Interpolate at zero over the full old committee. The stated
        // threshold is immaterial here: every supplied point participates.
        let scheme = Shamir::<C>::new(old.len() as u32, old.len() as u32, Some(old.clone()))?;
        let lambdas = scheme.lagrange_coeffs(old)?;

        let mut sk_share = C::Scalar::zero();
        for &dealer in old {
            sk_share = sk_share.add(&lambdas[&dealer].mul(&sub_shares[&dealer]));
        }

        // The new joint commitments: the unchanged group key, then the
        // interpolation of the dealers' higher-order commitments.
        let mut commitments = Vec::with_capacity(self.threshold as usize);
        commitments.push(group_key);
        for k in 1..self.threshold as usize {
            let mut sum = C::identity();
            for &dealer in old {
                sum = sum + bcast[&dealer].share_commitments[k].mul(&lambdas[&dealer]);
            }
            commitments.push(sum);
        }

        // The combined share must lie on the combined polynomial.
        if C::scale_generator(&sk_share) != eval_commitment_poly(&commitments, &x_j) {
            error!("Aggregated share does not match the aggregated commitments");
            return Err(Error::AggregateMismatch);
        }

        participant.install_key_material(sk_share, commitments);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dkg::tests::{run_dkg, verify_dkg},
        ed25519::Ed25519,
        k256::Secp256k1,
        resharing::ResharingP2pSend,
        utils::{sample_unique_u32s, testing::init_testing},
    };
    use rand::{CryptoRng, RngCore};

    /// Drive a complete resharing run and return the new participants.
    fn run_resharing<C: CurveTrait, R: RngCore + CryptoRng>(
        resharing: &Resharing<C>,
        old_participants: &BTreeMap<u32, DkgParticipant<C>>,
        tamper: impl Fn(u32, &mut ResharingBcast<C>),
        rng: &mut R,
    ) -> BTreeMap<u32, DkgParticipant<C>> {
        let mut bcasts: BTreeMap<u32, ResharingBcast<C>> = BTreeMap::new();
        let mut p2ps: BTreeMap<u32, ResharingP2pSend> = BTreeMap::new();
        for &dealer in resharing.resharing_participant_ids() {
            let (mut bcast, p2p) = resharing.round1(&old_participants[&dealer], rng).unwrap();
            tamper(dealer, &mut bcast);
            bcasts.insert(dealer, bcast);
            p2ps.insert(dealer, p2p);
        }

        let new_ids = resharing.new_participant_ids().to_vec();
        let mut new_participants: BTreeMap<u32, DkgParticipant<C>> = new_ids
            .iter()
            .map(|&id| {
                let others: Vec<u32> = new_ids.iter().copied().filter(|&o| o != id).collect();
                (
                    id,
                    DkgParticipant::new(id, resharing.threshold(), &others).unwrap(),
                )
            })
            .collect();

        for (&id, participant) in new_participants.iter_mut() {
            let p2p_in: BTreeMap<u32, ShamirShare> = p2ps
                .iter()
                .map(|(&dealer, sent)| (dealer, sent[&id].clone()))
                .collect();
            resharing.round2(participant, &bcasts, &p2p_in).unwrap();
        }

        new_participants
    }

    fn joint_secret<C: CurveTrait>(
        participants: &BTreeMap<u32, DkgParticipant<C>>,
        threshold: u32,
    ) -> C::Scalar {
        let ids: Vec<u32> = participants.keys().copied().collect();
        let scheme =
            Shamir::<C>::new(threshold, ids.len() as u32, Some(ids)).unwrap();
        let shares: Vec<ShamirShare> = participants
            .values()
            .map(|p| ShamirShare::new(p.id(), p.sk_share().unwrap().to_bytes()))
            .collect();
        scheme.combine(&shares).unwrap()
    }

    #[test]
    fn resharing_three_of_five_to_four_of_seven() {
        let rng = &mut init_testing();
        let old_ids = [1, 2, 3, 4, 5];
        let old_participants = run_dkg::<Secp256k1, _>(3, &old_ids, rng);
        let group_key = *old_participants[&1].verification_key().unwrap();
        let old_secret = joint_secret(&old_participants, 3);

        let new_ids = sample_unique_u32s(7, 100, 10_000, rng).unwrap();
        let resharing = Resharing::<Secp256k1>::new(4, &[1, 2, 3], &new_ids).unwrap();
        let new_participants =
            run_resharing(&resharing, &old_participants, |_, _| {}, rng);

        verify_dkg(&new_participants);

        // The group key is preserved.
        for participant in new_participants.values() {
            assert_eq!(participant.verification_key().unwrap(), &group_key);
        }

        // Any four of the new committee reconstruct the original secret.
        let scheme = Shamir::<Secp256k1>::new(4, 7, Some(new_ids.clone())).unwrap();
        let share_of = |id: u32| {
            let p = &new_participants[&id];
            ShamirShare::new(id, p.sk_share().unwrap().to_bytes().to_vec())
        };
        let subset = [
            share_of(new_ids[0]),
            share_of(new_ids[2]),
            share_of(new_ids[4]),
            share_of(new_ids[6]),
        ];
        assert_eq!(scheme.combine(&subset).unwrap(), old_secret);
    }

    #[test]
    fn resharing_to_the_same_committee_refreshes_shares() {
        let rng = &mut init_testing();
        let ids = [1, 2, 3];
        let old_participants = run_dkg::<Ed25519, _>(2, &ids, rng);
        let group_key = *old_participants[&1].verification_key().unwrap();

        let resharing = Resharing::<Ed25519>::new(2, &ids, &ids).unwrap();
        let new_participants =
            run_resharing(&resharing, &old_participants, |_, _| {}, rng);

        verify_dkg(&new_participants);

        for &id in &ids {
            let old = &old_participants[&id];
            let new = &new_participants[&id];

            // The group key is unchanged but every share was refreshed.
            assert_eq!(new.verification_key().unwrap(), &group_key);
            assert_ne!(old.sk_share().unwrap(), new.sk_share().unwrap());

            // New shares lie on the new commitments, old shares still lie on
            // the old (untouched) commitments.
            let x = <Ed25519 as CurveTrait>::Scalar::from_u32(id);
            assert_eq!(
                eval_commitment_poly(new.commitments(), &x),
                Ed25519::scale_generator(new.sk_share().unwrap())
            );
            assert_eq!(
                eval_commitment_poly(old.commitments(), &x),
                Ed25519::scale_generator(old.sk_share().unwrap())
            );
        }
    }

    #[test]
    fn tampered_constant_term_commitment_is_overridden() {
        let rng = &mut init_testing();
        let ids = [1, 2, 3, 4, 5];
        let old_participants = run_dkg::<Secp256k1, _>(3, &ids, rng);
        let group_key = *old_participants[&1].verification_key().unwrap();
        let old_secret = joint_secret(&old_participants, 3);

        let resharing = Resharing::<Secp256k1>::new(3, &[1, 2, 3], &ids).unwrap();

        // Dealer 2 replaces its constant-term commitment with garbage.
        // Recipients rederive it from the old joint commitments, so
        // verification still succeeds and the key is unaffected.
        let new_participants = run_resharing(
            &resharing,
            &old_participants,
            |dealer, bcast| {
                if dealer == 2 {
                    bcast.share_commitments[0] = Secp256k1::random(&mut rand::rngs::OsRng);
                }
            },
            rng,
        );

        for participant in new_participants.values() {
            assert_eq!(participant.verification_key().unwrap(), &group_key);
        }
        assert_eq!(joint_secret(&new_participants, 3), old_secret);
    }

    #[test]
    fn tampered_higher_order_dealing_names_the_dealer() {
        let rng = &mut init_testing();
        let ids = [1, 2, 3];
        let old_participants = run_dkg::<Secp256k1, _>(2, &ids, rng);
        let resharing = Resharing::<Secp256k1>::new(2, &ids, &ids).unwrap();

        let mut bcasts = BTreeMap::new();
        let mut p2ps = BTreeMap::new();
        for &dealer in resharing.resharing_participant_ids() {
            let (mut bcast, p2p) = resharing.round1(&old_participants[&dealer], rng).unwrap();
            if dealer == 3 {
                // Corrupting a non-constant commitment cannot be papered
                // over by the recipient's rederivation.
                bcast.share_commitments[1] = Secp256k1::random(&mut rand::rngs::OsRng);
            }
            bcasts.insert(dealer, bcast);
            p2ps.insert(dealer, p2p);
        }

        let mut newcomer = DkgParticipant::<Secp256k1>::new(1, 2, &[2, 3]).unwrap();
        let p2p_in: BTreeMap<u32, ShamirShare> = p2ps
            .iter()
            .map(|(&dealer, sent)| (dealer, sent[&1].clone()))
            .collect();
        assert_eq!(
            resharing.round2(&mut newcomer, &bcasts, &p2p_in).unwrap_err(),
            Error::PeerCommitmentMismatch { sender: 3 }
        );
    }

    #[test]
    fn diverging_group_commitments_name_the_dealer() {
        let rng = &mut init_testing();
        let ids = [1, 2, 3];
        let old_participants = run_dkg::<Secp256k1, _>(2, &ids, rng);
        let resharing = Resharing::<Secp256k1>::new(2, &ids, &ids).unwrap();

        let mut bcasts = BTreeMap::new();
        let mut p2ps = BTreeMap::new();
        for &dealer in resharing.resharing_participant_ids() {
            let (mut bcast, p2p) = resharing.round1(&old_participants[&dealer], rng).unwrap();
            if dealer == 2 {
                bcast.group_commitments[0] = Secp256k1::random(&mut rand::rngs::OsRng);
            }
            bcasts.insert(dealer, bcast);
            p2ps.insert(dealer, p2p);
        }

        let mut newcomer = DkgParticipant::<Secp256k1>::new(1, 2, &[2, 3]).unwrap();
        let p2p_in: BTreeMap<u32, ShamirShare> = p2ps
            .iter()
            .map(|(&dealer, sent)| (dealer, sent[&1].clone()))
            .collect();
        assert_eq!(
            resharing.round2(&mut newcomer, &bcasts, &p2p_in).unwrap_err(),
            Error::InconsistentCommitments { sender: 2 }
        );
    }

    #[test]
    fn round2_requires_new_committee_membership() {
        let resharing = Resharing::<Secp256k1>::new(2, &[1, 2, 3], &[10, 20, 30]).unwrap();

        let mut outsider = DkgParticipant::<Secp256k1>::new(7, 2, &[10, 20]).unwrap();
        assert_eq!(
            resharing
                .round2(&mut outsider, &BTreeMap::new(), &BTreeMap::new())
                .unwrap_err(),
            Error::NotAParticipant(7)
        );
    }

    #[test]
    fn round2_rejects_incomplete_inputs() {
        let rng = &mut init_testing();
        let ids = [1, 2, 3];
        let old_participants = run_dkg::<Secp256k1, _>(2, &ids, rng);
        let resharing = Resharing::<Secp256k1>::new(2, &ids, &ids).unwrap();

        let mut bcasts = BTreeMap::new();
        let mut p2ps = BTreeMap::new();
        for &dealer in resharing.resharing_participant_ids() {
            let (bcast, p2p) = resharing.round1(&old_participants[&dealer], rng).unwrap();
            bcasts.insert(dealer, bcast);
            p2ps.insert(dealer, p2p);
        }

        let mut newcomer = DkgParticipant::<Secp256k1>::new(1, 2, &[2, 3]).unwrap();
        let p2p_in: BTreeMap<u32, ShamirShare> = p2ps
            .iter()
            .map(|(&dealer, sent)| (dealer, sent[&1].clone()))
            .collect();

        let mut missing = bcasts.clone();
        missing.remove(&2);
        assert_eq!(
            resharing
                .round2(&mut newcomer, &missing, &p2p_in)
                .unwrap_err(),
            Error::InputLengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }
}
