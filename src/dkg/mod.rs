//! Dealer-less distributed key generation.
//!
//! N parties jointly generate a group signing key such that no party (and no
//! dealer) ever learns the joint secret. The protocol is Pedersen-style:
//! every party runs one Feldman dealing of a fresh random secret, and the
//! joint key is the sum of all dealt secrets.
//!
//! # High-level protocol description
//! The protocol runs in two rounds:
//! - In the first round, each participant samples a fresh non-zero secret,
//!   Feldman-shares it across the whole committee, broadcasts the commitment
//!   vector of its dealing, and sends each peer its private share of the
//!   dealing.
//! - In the second round, each participant checks every incoming share
//!   against the sender's broadcast commitments, rejecting (and naming) any
//!   sender whose dealing does not verify. It then sums its own self-share
//!   with all verified incoming shares into its share of the joint secret,
//!   and sums the commitment vectors point-wise into the joint commitment
//!   polynomial. The first entry of that polynomial is the group
//!   verification key; a final local check confirms the aggregated share
//!   lies on the aggregated polynomial.
//!
//! The result is held privately; there is no second broadcast. Afterwards
//! any `threshold` participants can reconstruct the joint secret, and
//! signing layers can look up any participant's public share by evaluating
//! the joint commitments at its identifier.
//!
//! This variant carries no proof of knowledge of the dealt secret in round
//! one (the broadcast is the bare commitment vector). A rushing adversary
//! who waits for all other commitments before publishing its own can
//! therefore bias its *own* contribution, but never learn the joint secret
//! nor break the share/commitment consistency checked in round two.

// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

mod participant;
mod round1;
mod round2;

pub use participant::DkgParticipant;
pub use round1::{Round1Bcast, Round1P2pSend};

#[cfg(test)]
pub(crate) use participant::tests;
