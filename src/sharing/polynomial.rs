// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::curve::{CurveTrait, ScalarTrait};
use rand::{CryptoRng, RngCore};
use std::fmt::Debug;
use zeroize::Zeroize;

/// A secret polynomial over the scalar field.
///
/// The constant term is the shared secret; the remaining coefficients are
/// drawn uniformly at random from the injected source. The polynomial is the
/// most sensitive value in the system: it is never serialized, its `Debug`
/// output is redacted, and its coefficients are zeroized on drop.
pub struct Polynomial<C: CurveTrait> {
    coefficients: Vec<C::Scalar>,
}

impl<C: CurveTrait> Polynomial<C> {
    /// Build a polynomial of degree `threshold - 1` whose constant term is
    /// `intercept`.
    pub fn new<R: RngCore + CryptoRng>(
        intercept: &C::Scalar,
        threshold: u32,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold as usize);
        coefficients.push(*intercept);
        for _ in 1..threshold {
            coefficients.push(C::Scalar::random(rng));
        }
        Self { coefficients }
    }

    /// Evaluate the polynomial at `x` using Horner's method.
    pub fn evaluate(&self, x: &C::Scalar) -> C::Scalar {
        let mut sum = C::Scalar::zero();
        for coefficient in self.coefficients.iter().rev() {
            sum = sum.mul(x).add(coefficient);
        }
        sum
    }

    /// Commit to every coefficient in the exponent: `C_k = g · a_k`.
    ///
    /// The commitment vector is public; the coefficients themselves never
    /// leave this type.
    pub fn commit(&self) -> Vec<C> {
        self.coefficients
            .iter()
            .map(|coefficient| C::scale_generator(coefficient))
            .collect()
    }
}

impl<C: CurveTrait> Debug for Polynomial<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Polynomial([redacted])")
    }
}

impl<C: CurveTrait> Drop for Polynomial<C> {
    fn drop(&mut self) {
        for coefficient in self.coefficients.iter_mut() {
            coefficient.zeroize();
        }
    }
}
