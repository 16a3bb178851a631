//! Error types for the toolkit.
//!
//! Every failure surfaces as a distinct [`Error`] variant so that callers can
//! react to the exact condition; verification failures caused by another
//! participant carry the offending identifier so that upper layers can
//! implement identifiable abort. The library never retries on its own.

// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use thiserror::Error;

/// The default Result type used in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the secret sharing, key generation, and resharing
/// protocols.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Sharing parameters are outside the supported range. The threshold must
    /// lie in `[2, limit]` and the limit must not exceed 255.
    #[error("invalid sharing parameters: threshold {threshold}, limit {limit}")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: u32,
        /// The rejected share limit.
        limit: u32,
    },

    /// The supplied identifier list does not contain one identifier per share.
    #[error("expected {expected} participant identifiers, got {actual}")]
    IdCountMismatch {
        /// Number of identifiers required by the configuration.
        expected: usize,
        /// Number of identifiers supplied.
        actual: usize,
    },

    /// The same identifier appears more than once in a committee or
    /// reconstruction set.
    #[error("duplicate participant identifier {0}")]
    DuplicateId(u32),

    /// Identifier 0 is reserved for the secret itself and can never name a
    /// participant.
    #[error("participant identifier 0 is reserved for the secret")]
    ZeroId,

    /// A committee must contain at least one participant.
    #[error("a committee must contain at least one participant")]
    EmptyCommittee,

    /// The zero scalar cannot be shared.
    #[error("cannot share the zero scalar")]
    ZeroSecret,

    /// A share failed structural validation before any cryptographic check.
    #[error("invalid share: {0}")]
    InvalidShare(&'static str),

    /// A share does not lie on the polynomial described by the published
    /// commitments. The verifier alone cannot tell a malformed share from a
    /// malicious one, so no sender is named here.
    #[error("share does not match the published commitments")]
    CommitmentMismatch,

    /// A share received from a specific peer failed commitment verification.
    #[error("share from participant {sender} does not match its commitments")]
    PeerCommitmentMismatch {
        /// The participant whose dealing failed verification.
        sender: u32,
    },

    /// A resharing sender broadcast a group commitment vector that disagrees
    /// with the rest of the committee.
    #[error("participant {sender} broadcast a group commitment that disagrees with the committee")]
    InconsistentCommitments {
        /// The participant whose broadcast disagrees.
        sender: u32,
    },

    /// The aggregated secret share does not match the aggregated commitment
    /// vector. This indicates an implementation bug or group-wide malfeasance
    /// and is unrecoverable for this participant.
    #[error("aggregated share does not match the aggregated commitments")]
    AggregateMismatch,

    /// A protocol round was invoked out of order.
    #[error("round {attempted} called while the participant is in round {current}")]
    InvalidRound {
        /// The round the participant is currently in.
        current: u8,
        /// The round that was invoked.
        attempted: u8,
    },

    /// A required round input from the named participant is missing.
    #[error("missing round input from participant {0}")]
    MissingPeerInput(u32),

    /// A round input collection has the wrong cardinality.
    #[error("expected inputs from {expected} participants, got {actual}")]
    InputLengthMismatch {
        /// Number of entries required.
        expected: usize,
        /// Number of entries supplied.
        actual: usize,
    },

    /// The participant has not completed key generation, so it holds no key
    /// material to operate on.
    #[error("participant has not completed key generation")]
    IncompleteParticipant,

    /// The named participant is not a member of the relevant committee.
    #[error("participant {0} is not a member of this committee")]
    NotAParticipant(u32),

    /// Distinct identifiers cannot be sampled because the range is too small.
    #[error("cannot sample {count} distinct identifiers from a range of {range}")]
    SampleRangeTooSmall {
        /// Number of identifiers requested.
        count: usize,
        /// Size of the sampling range.
        range: usize,
    },
}
