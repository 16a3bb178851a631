// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    errors::{Error, Result},
    sharing::{polynomial::Polynomial, shamir::Shamir, ShamirShare},
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

/// Evaluate a commitment polynomial at `x`: `Σ coefficients[k] · x^k`.
///
/// This is the same Horner scheme as scalar polynomial evaluation, lifted to
/// the group. Share verification, key generation, and resharing all evaluate
/// commitment vectors through this single function.
pub fn eval_commitment_poly<C: CurveTrait>(coefficients: &[C], x: &C::Scalar) -> C {
    let mut sum = C::identity();
    for coefficient in coefficients.iter().rev() {
        sum = sum.mul(x) + *coefficient;
    }
    sum
}

/// The public side of a Feldman dealing: commitments `C_k = g · a_k` to the
/// coefficients of the dealer's secret polynomial.
///
/// `commitments[0]` commits to the secret itself and becomes the group
/// verification key when the constant term is the joint secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "C: serde::Serialize + serde::de::DeserializeOwned")]
pub struct FeldmanVerifier<C: CurveTrait> {
    /// The broadcast commitment vector, one point per coefficient.
    pub commitments: Vec<C>,
}

impl<C: CurveTrait> FeldmanVerifier<C> {
    /// Check a share against the commitment vector: accepts iff
    /// `g · value = Σ C_k · id^k`.
    ///
    /// Any failure is a hard rejection; the verifier cannot distinguish a
    /// malformed share from a malicious one, so no blame is assigned here.
    pub fn verify(&self, share: &ShamirShare) -> Result<()> {
        let value = share.to_scalar::<C>()?;
        let x = C::Scalar::from_u32(share.id);
        let rhs = eval_commitment_poly(&self.commitments, &x);
        let lhs = C::scale_generator(&value);
        if lhs == rhs {
            Ok(())
        } else {
            error!("Share {} does not lie on the committed polynomial", share.id);
            Err(Error::CommitmentMismatch)
        }
    }
}

/// Feldman verifiable secret sharing: Shamir sharing plus a broadcast
/// commitment vector that lets every shareholder validate its own share.
#[derive(Debug, Clone)]
pub struct Feldman<C: CurveTrait> {
    shamir: Shamir<C>,
}

impl<C: CurveTrait> Feldman<C> {
    /// Create a sharing configuration; parameters are validated exactly as
    /// for [`Shamir::new`].
    pub fn new(threshold: u32, limit: u32, ids: Option<Vec<u32>>) -> Result<Self> {
        Ok(Self {
            shamir: Shamir::new(threshold, limit, ids)?,
        })
    }

    /// The number of shares needed to reconstruct the secret.
    pub fn threshold(&self) -> u32 {
        self.shamir.threshold()
    }

    /// The number of shares issued.
    pub fn limit(&self) -> u32 {
        self.shamir.limit()
    }

    /// The identifiers shares are issued to.
    pub fn ids(&self) -> &[u32] {
        self.shamir.ids()
    }

    /// Split a non-zero secret, returning both the shares and the public
    /// commitment vector that verifies them.
    pub fn split<R: RngCore + CryptoRng>(
        &self,
        secret: &C::Scalar,
        rng: &mut R,
    ) -> Result<(FeldmanVerifier<C>, BTreeMap<u32, ShamirShare>)> {
        if secret.is_zero() {
            error!("Refusing to share the zero scalar");
            return Err(Error::ZeroSecret);
        }

        let polynomial = Polynomial::<C>::new(secret, self.threshold(), rng);
        let shares = self.shamir.evaluate_shares(&polynomial);
        let verifier = FeldmanVerifier {
            commitments: polynomial.commit(),
        };
        Ok((verifier, shares))
    }

    /// Lagrange coefficients at zero for the given evaluation points.
    pub fn lagrange_coeffs(&self, ids: &[u32]) -> Result<BTreeMap<u32, C::Scalar>> {
        self.shamir.lagrange_coeffs(ids)
    }

    /// Reconstruct the secret from at least `threshold` shares.
    pub fn combine(&self, shares: &[ShamirShare]) -> Result<C::Scalar> {
        self.shamir.combine(shares)
    }

    /// Interpolate point-valued shares; see [`Shamir::combine_points`].
    pub fn combine_points(&self, shares: &[ShamirShare]) -> Result<C> {
        self.shamir.combine_points(shares)
    }
}
