// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    curve::{CurveTrait, ScalarTrait},
    errors::{Error, Result},
    sharing::polynomial::Polynomial,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    marker::PhantomData,
};
use tracing::error;

/// One participant's share of a secret: the evaluation of a secret
/// polynomial at the participant's identifier.
///
/// This is exactly the point-to-point wire shape: the identifier and the
/// canonical byte encoding of the evaluation. The value bytes normally
/// encode a scalar; [`Shamir::combine_points`] reinterprets them as a
/// compressed point when interpolating public commitments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShamirShare {
    /// The participant identifier the polynomial was evaluated at. Never 0;
    /// 0 is the secret itself.
    pub id: u32,
    /// Canonical encoding of the evaluation.
    pub value: Vec<u8>,
}

impl ShamirShare {
    /// Wrap an identifier and an encoded evaluation as a share.
    pub fn new(id: u32, value: Vec<u8>) -> Self {
        Self { id, value }
    }

    /// Decode the share value as a scalar of curve `C`.
    pub fn to_scalar<C: CurveTrait>(&self) -> Result<C::Scalar> {
        if self.id == 0 {
            error!("Rejecting share with the reserved identifier 0");
            return Err(Error::InvalidShare("identifier 0 is reserved for the secret"));
        }
        if self.value.len() != C::SCALAR_LENGTH {
            error!(
                "Rejecting share with a {}-byte value; {} expects {} bytes",
                self.value.len(),
                C::CURVE_NAME,
                C::SCALAR_LENGTH
            );
            return Err(Error::InvalidShare("value has the wrong length for a scalar"));
        }
        C::Scalar::from_bytes(&self.value)
            .ok_or(Error::InvalidShare("value is not a canonical scalar"))
    }

    /// Decode the share value as a compressed point of curve `C`.
    pub fn to_point<C: CurveTrait>(&self) -> Result<C> {
        if self.id == 0 {
            error!("Rejecting share with the reserved identifier 0");
            return Err(Error::InvalidShare("identifier 0 is reserved for the secret"));
        }
        if self.value.len() != C::POINT_LENGTH {
            error!(
                "Rejecting share with a {}-byte value; {} expects {}-byte points",
                self.value.len(),
                C::CURVE_NAME,
                C::POINT_LENGTH
            );
            return Err(Error::InvalidShare("value has the wrong length for a point"));
        }
        C::try_from_bytes(&self.value)
    }
}

/// Shamir secret sharing configuration: a threshold, a share limit, and one
/// non-zero identifier per share.
#[derive(Debug, Clone)]
pub struct Shamir<C: CurveTrait> {
    threshold: u32,
    limit: u32,
    ids: Vec<u32>,
    _curve: PhantomData<C>,
}

impl<C: CurveTrait> Shamir<C> {
    /// Create a sharing configuration.
    ///
    /// Requires `2 <= threshold <= limit <= 255`. When `ids` is `None` the
    /// identifiers default to `1..=limit`; otherwise they must be exactly
    /// `limit` distinct non-zero values.
    pub fn new(threshold: u32, limit: u32, ids: Option<Vec<u32>>) -> Result<Self> {
        if limit < threshold || threshold < 2 || limit > 255 {
            error!("Unsupported sharing parameters: threshold {threshold}, limit {limit}");
            return Err(Error::InvalidThreshold { threshold, limit });
        }

        let ids = match ids {
            Some(ids) => {
                if ids.len() != limit as usize {
                    error!("Got {} identifiers for {limit} shares", ids.len());
                    return Err(Error::IdCountMismatch {
                        expected: limit as usize,
                        actual: ids.len(),
                    });
                }
                let mut seen = HashSet::with_capacity(ids.len());
                for &id in &ids {
                    if id == 0 {
                        return Err(Error::ZeroId);
                    }
                    if !seen.insert(id) {
                        return Err(Error::DuplicateId(id));
                    }
                }
                ids
            }
            None => (1..=limit).collect(),
        };

        Ok(Self {
            threshold,
            limit,
            ids,
            _curve: PhantomData,
        })
    }

    /// The number of shares needed to reconstruct the secret.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The number of shares issued.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The identifiers shares are issued to.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Split a non-zero secret into `limit` shares, `threshold` of which
    /// suffice to reconstruct it.
    pub fn split<R: RngCore + CryptoRng>(
        &self,
        secret: &C::Scalar,
        rng: &mut R,
    ) -> Result<BTreeMap<u32, ShamirShare>> {
        if secret.is_zero() {
            error!("Refusing to share the zero scalar");
            return Err(Error::ZeroSecret);
        }
        let polynomial = Polynomial::<C>::new(secret, self.threshold, rng);
        Ok(self.evaluate_shares(&polynomial))
    }

    /// Evaluate an existing polynomial at every configured identifier.
    pub(crate) fn evaluate_shares(&self, polynomial: &Polynomial<C>) -> BTreeMap<u32, ShamirShare> {
        self.ids
            .iter()
            .map(|&id| {
                let x = C::Scalar::from_u32(id);
                (id, ShamirShare::new(id, polynomial.evaluate(&x).to_bytes()))
            })
            .collect()
    }

    /// Compute the Lagrange coefficients interpolating at zero over the
    /// given evaluation points: `λ_j = Π_{k ≠ j} (−k) · (j − k)^{−1}`.
    ///
    /// Fails if fewer than `threshold` points are supplied, if any point is
    /// 0, or if a point repeats.
    pub fn lagrange_coeffs(&self, ids: &[u32]) -> Result<BTreeMap<u32, C::Scalar>> {
        if ids.len() < self.threshold as usize {
            error!(
                "Cannot interpolate from {} points with threshold {}",
                ids.len(),
                self.threshold
            );
            return Err(Error::InputLengthMismatch {
                expected: self.threshold as usize,
                actual: ids.len(),
            });
        }
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in ids {
            if id == 0 {
                return Err(Error::ZeroId);
            }
            if !seen.insert(id) {
                return Err(Error::DuplicateId(id));
            }
        }

        let mut coefficients = BTreeMap::new();
        for &j in ids {
            let xj = C::Scalar::from_u32(j);
            let mut numerator = C::Scalar::one();
            let mut denominator = C::Scalar::one();
            for &k in ids {
                if k == j {
                    continue;
                }
                let xk = C::Scalar::from_u32(k);
                numerator = numerator.mul(&xk.negate());
                denominator = denominator.mul(&xj.sub(&xk));
            }
            let inverse = denominator
                .invert()
                .ok_or(Error::InvalidShare("identifiers coincide in the scalar field"))?;
            coefficients.insert(j, numerator.mul(&inverse));
        }
        Ok(coefficients)
    }

    /// Reconstruct the secret from at least `threshold` shares.
    pub fn combine(&self, shares: &[ShamirShare]) -> Result<C::Scalar> {
        let ids = shares.iter().map(|share| share.id).collect::<Vec<_>>();
        let lambdas = self.lagrange_coeffs(&ids)?;

        let mut secret = C::Scalar::zero();
        for share in shares {
            let value = share.to_scalar::<C>()?;
            secret = secret.add(&lambdas[&share.id].mul(&value));
        }
        Ok(secret)
    }

    /// Interpolate shares whose values encode compressed points, returning
    /// the point commitment to the secret. Used by signing protocols that
    /// Lagrange-interpolate public material.
    pub fn combine_points(&self, shares: &[ShamirShare]) -> Result<C> {
        let ids = shares.iter().map(|share| share.id).collect::<Vec<_>>();
        let lambdas = self.lagrange_coeffs(&ids)?;

        let mut secret = C::identity();
        for share in shares {
            let value = share.to_point::<C>()?;
            secret = secret + value.mul(&lambdas[&share.id]);
        }
        Ok(secret)
    }
}
