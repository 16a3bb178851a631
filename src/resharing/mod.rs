//! Proactive resharing of an existing group key.
//!
//! Resharing moves a secret `x`, held as Shamir shares by an old committee
//! `S` with threshold `t`, to a new committee `S′` with a new threshold
//! `t′`, without ever reconstructing `x` and without changing the group
//! verification key `Y = g · x`.
//!
//! # High-level protocol description
//! The protocol runs in two rounds:
//! - In the first round, each old-committee member treats its own key share
//!   as a secret and Feldman-shares it across the new committee with
//!   threshold `t′`. It broadcasts the commitment vector of that fresh
//!   dealing together with the joint commitment vector of the key being
//!   reshared, and sends each new participant its private sub-share.
//! - In the second round, each new participant rederives every dealer's
//!   constant-term commitment from the *old* joint commitments (so a dealer
//!   cannot deal anything other than its existing share), verifies each
//!   sub-share against the patched dealing, and then Lagrange-combines the
//!   sub-shares at zero into its share of the same secret under the new
//!   polynomial. The new joint commitments are interpolated the same way,
//!   keeping `commitments[0]`, and therefore the group key, unchanged.
//!
//! The old committee must contain at least `t` members for the
//! interpolation to recover `x`; supplying a qualifying committee is the
//! caller's responsibility and is deliberately not checked here.

// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

mod round1;
mod round2;

pub use round1::{ResharingBcast, ResharingP2pSend};

use crate::{
    curve::CurveTrait,
    errors::{Error, Result},
    sharing::Feldman,
};
use std::collections::HashSet;
use tracing::error;

/// Coordinator state for one resharing run: the new threshold, both
/// committees, and the sharing configuration used by every dealer. Holds no
/// secrets.
#[derive(Debug, Clone)]
pub struct Resharing<C: CurveTrait> {
    pub(crate) threshold: u32,
    pub(crate) resharing_participant_ids: Vec<u32>,
    pub(crate) new_participant_ids: Vec<u32>,
    pub(crate) feldman: Feldman<C>,
}

impl<C: CurveTrait> Resharing<C> {
    /// Create a resharing run that moves the key held by
    /// `resharing_participant_ids` to `new_participant_ids` with the given
    /// new threshold.
    pub fn new(
        threshold: u32,
        resharing_participant_ids: &[u32],
        new_participant_ids: &[u32],
    ) -> Result<Self> {
        if resharing_participant_ids.is_empty() || new_participant_ids.is_empty() {
            error!("Both resharing committees must be non-empty");
            return Err(Error::EmptyCommittee);
        }

        let mut seen = HashSet::with_capacity(resharing_participant_ids.len());
        for &id in resharing_participant_ids {
            if !seen.insert(id) {
                error!("Duplicate member {id} in the resharing committee");
                return Err(Error::DuplicateId(id));
            }
        }

        // The new committee's identifiers are validated by the sharing
        // configuration used for every dealing.
        let feldman = Feldman::new(
            threshold,
            new_participant_ids.len() as u32,
            Some(new_participant_ids.to_vec()),
        )?;

        Ok(Self {
            threshold,
            resharing_participant_ids: resharing_participant_ids.to_vec(),
            new_participant_ids: new_participant_ids.to_vec(),
            feldman,
        })
    }

    /// The threshold of the reshared secret.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Members of the old committee performing the resharing.
    pub fn resharing_participant_ids(&self) -> &[u32] {
        &self.resharing_participant_ids
    }

    /// Members of the new committee receiving the reshared key.
    pub fn new_participant_ids(&self) -> &[u32] {
        &self.new_participant_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k256::Secp256k1;

    #[test]
    fn committees_must_be_non_empty() {
        assert_eq!(
            Resharing::<Secp256k1>::new(3, &[], &[4, 5, 6]).unwrap_err(),
            Error::EmptyCommittee
        );
        assert_eq!(
            Resharing::<Secp256k1>::new(3, &[1, 2, 3], &[]).unwrap_err(),
            Error::EmptyCommittee
        );
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        assert_eq!(
            Resharing::<Secp256k1>::new(3, &[1, 2, 3, 2], &[4, 5, 6]).unwrap_err(),
            Error::DuplicateId(2)
        );
        assert_eq!(
            Resharing::<Secp256k1>::new(3, &[1, 2, 3], &[4, 5, 6, 6]).unwrap_err(),
            Error::DuplicateId(6)
        );
    }

    #[test]
    fn new_committee_must_support_the_new_threshold() {
        assert_eq!(
            Resharing::<Secp256k1>::new(4, &[1, 2, 3], &[4, 5, 6]).unwrap_err(),
            Error::InvalidThreshold {
                threshold: 4,
                limit: 3
            }
        );
    }
}
