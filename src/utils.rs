// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Small helpers shared across the protocols.

use crate::errors::{Error, Result};
use rand::{CryptoRng, Rng, RngCore};
use std::collections::HashSet;

/// Sample `count` distinct identifiers uniformly at random from the range
/// `[min, max)`.
///
/// Identifier 0 is reserved for the shared secret, so `min` must be at least
/// 1. The order of the returned identifiers is arbitrary.
pub fn sample_unique_u32s<R: RngCore + CryptoRng>(
    count: usize,
    min: u32,
    max: u32,
    rng: &mut R,
) -> Result<Vec<u32>> {
    if min < 1 {
        return Err(Error::ZeroId);
    }
    let range = max.saturating_sub(min) as usize;
    if count > range {
        return Err(Error::SampleRangeTooSmall { count, range });
    }

    let mut seen = HashSet::with_capacity(count);
    let mut ids = Vec::with_capacity(count);
    while ids.len() < count {
        let candidate = rng.gen_range(min..max);
        if seen.insert(candidate) {
            ids.push(candidate);
        }
    }
    Ok(ids)
}

////////////////////////////
// Test Utility Functions //
////////////////////////////
