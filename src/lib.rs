//! A threshold signature toolkit: verifiable secret sharing, dealer-less
//! distributed key generation, and proactive resharing over prime-order
//! elliptic-curve groups.
//!
//! The crate has two tightly coupled layers:
//! - [`sharing`] implements Shamir secret sharing with Feldman commitments:
//!   share construction, per-share verification against broadcast
//!   commitments, Lagrange interpolation, and secret/point reconstruction.
//! - [`dkg`] and [`resharing`] build the multi-round protocols on top: N
//!   parties jointly generate a group signing key no single party knows,
//!   and later redistribute the same key to a possibly different committee
//!   with a possibly different threshold, leaving the group verification
//!   key unchanged.
//!
//! Both protocols produce the same per-party output (an identifier, a
//! secret key share, the joint commitment vector, the group verification
//! key, and the public image of the share), which is the entire contract
//! between this crate and a signing layer. [`challenge`] supplies the
//! deterministic challenge scalars such signing layers need.
//!
//! Everything is generic over a prime-order group via
//! [`CurveTrait`](curve::CurveTrait); [`Secp256k1`] and [`Ed25519`] are the
//! provided instantiations. All randomness is drawn from caller-injected
//! sources, no operation blocks or performs I/O, and each participant is
//! a plain state machine driven by delivering the other parties' round
//! payloads.
//!
//! ```
//! use rand::rngs::OsRng;
//! use tss_frost::{DkgParticipant, Secp256k1};
//!
//! # fn main() -> tss_frost::Result<()> {
//! let mut rng = OsRng;
//! let mut alice = DkgParticipant::<Secp256k1>::new(1, 2, &[2, 3])?;
//! let (bcast, p2p) = alice.round1(&mut rng)?;
//! // ... deliver `bcast` to everyone and `p2p[&id]` to each peer, collect
//! // their payloads, then run `alice.round2(...)` to obtain key material.
//! # let _ = (bcast, p2p);
//! # Ok(())
//! # }
//! ```

// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

#![warn(missing_docs)]

pub mod challenge;
pub mod curve;
pub mod dkg;
pub mod ed25519;
pub mod errors;
pub mod k256;
pub mod resharing;
pub mod sharing;
pub mod utils;

pub use crate::{
    curve::{CurveTrait, ScalarTrait},
    dkg::DkgParticipant,
    ed25519::Ed25519,
    errors::{Error, Result},
    k256::Secp256k1,
    resharing::Resharing,
    sharing::{Feldman, FeldmanVerifier, Shamir, ShamirShare},
};
