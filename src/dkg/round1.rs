// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    dkg::participant::DkgParticipant,
    errors::{Error, Result},
    sharing::ShamirShare,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};
use zeroize::Zeroize;

/// Broadcast payload of round one: the commitment vector of this
/// participant's Feldman dealing, one point per polynomial coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "C: serde::Serialize + serde::de::DeserializeOwned")]
pub struct Round1Bcast<C: CurveTrait> {
    /// Commitments `C_k = g · a_k` to the dealt polynomial, length
    /// `threshold`.
    pub commitments: Vec<C>,
}

/// Point-to-point payload of round one: one private share per peer, keyed by
/// the recipient's identifier.
pub type Round1P2pSend = BTreeMap<u32, ShamirShare>;

impl<C: CurveTrait> DkgParticipant<C> {
    /// Run round one: deal a fresh random secret across the committee.
    ///
    /// Returns the broadcast commitment vector and the private share for
    /// each peer. The self-addressed share stays inside the participant and
    /// is folded into the final key share during round two.
    #[instrument(skip_all, err(Debug), fields(id = self.id))]
    pub fn round1<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
    ) -> Result<(Round1Bcast<C>, Round1P2pSend)> {
        if self.round != 1 {
            return Err(Error::InvalidRound {
                current: self.round,
                attempted: 1,
            });
        }
        info!("Generating DKG round one dealing.");

        let mut secret = C::Scalar::random(rng);
        while secret.is_zero() {
            secret = C::Scalar::random(rng);
        }
        let (verifier, shares) = self.feldman.split(&secret, rng)?;
        secret.zeroize();

        let bcast = Round1Bcast {
            commitments: verifier.commitments.clone(),
        };
        let p2p: Round1P2pSend = shares
            .iter()
            .filter(|(&recipient, _)| recipient != self.id)
            .map(|(&recipient, share)| (recipient, share.clone()))
            .collect();

        self.verifier = Some(verifier);
        self.secret_shares = Some(shares);
        self.round = 2;

        Ok((bcast, p2p))
    }
}
