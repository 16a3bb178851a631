//! Verifiable secret sharing over a prime-order group.
//!
//! [`Shamir`] implements plain Shamir secret sharing: a secret becomes the
//! constant term of a random polynomial of degree `threshold - 1`, and each
//! participant receives the evaluation at its own non-zero identifier. Any
//! `threshold` shares recover the secret through Lagrange interpolation at
//! zero; fewer reveal nothing.
//!
//! [`Feldman`] wraps Shamir sharing with public commitments to the
//! polynomial coefficients. Holders of a share can check it against the
//! broadcast commitment vector with [`FeldmanVerifier::verify`] without
//! learning anything about the secret, which is what makes the sharing
//! *verifiable* and lets the distributed key generation protocol reject a
//! misbehaving dealer.

// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

mod feldman;
mod polynomial;
mod shamir;

pub use feldman::{eval_commitment_poly, Feldman, FeldmanVerifier};
pub use polynomial::Polynomial;
pub use shamir::{Shamir, ShamirShare};
