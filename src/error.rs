//! Error taxonomy for the auction layer.
//!
//! Every failure is reported synchronously through [`AuctionError`].  The
//! variants fall into four families, exposed through [`AuctionError::kind`]:
//! bad parameters, operations invoked out of order, exhausted preprocessing
//! capacity, and revealed values that break the identifier encoding.  None of
//! them is retried; a failed round is discarded and restarted from
//! preprocessing.

use crate::{Identifier, PriceIndex};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AuctionError>;

/// Family an [`AuctionError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid `nodes`/`bids`/`prices`, out-of-range price or identifier, or
    /// malformed input vectors.
    Configuration,
    /// An operation was invoked before its prerequisites were met.
    ProtocolSequence,
    /// More requests than the preprocessed capacity, or a replayed request.
    ResourceExhaustion,
    /// A revealed value is not a pure power of two of the expected shape.
    DecodeAmbiguity,
}

/// Errors raised by nodes, bidders and the reveal step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("invalid auction parameters (nodes={nodes}, bids={bids}, prices={prices})")]
    /// One of the round parameters is zero.
    InvalidParameters {
        /// Number of computation nodes.
        nodes: usize,
        /// Number of bids the round is preprocessed for.
        bids: usize,
        /// Number of distinct permitted prices.
        prices: usize,
    },
    #[error("{bids} bidders exceed the {capacity} identifiers the field can encode")]
    /// The field is too small to hold every identifier encoding at once.
    FieldTooSmall {
        /// Requested number of bids.
        bids: usize,
        /// Largest supported number of identifiers.
        capacity: usize,
    },
    #[error("expected {expected} nodes, got {actual}")]
    /// Node slice length disagrees with the configuration.
    NodeCountMismatch {
        /// Configured node count.
        expected: usize,
        /// Supplied node count.
        actual: usize,
    },
    #[error("identifier {identifier} outside [0, {limit})")]
    /// Identifier is not admissible for this round.
    IdentifierOutOfRange {
        /// Offending identifier.
        identifier: Identifier,
        /// Exclusive upper bound.
        limit: usize,
    },
    #[error("price {price} outside [0, {prices})")]
    /// Bid price is not one of the permitted prices.
    PriceOutOfRange {
        /// Offending price.
        price: PriceIndex,
        /// Number of permitted prices.
        prices: usize,
    },
    #[error("expected masks from {expected} nodes, got {actual}")]
    /// The bidder did not collect exactly one mask per node.
    MaskCountMismatch {
        /// Configured node count.
        expected: usize,
        /// Number of masks supplied.
        actual: usize,
    },
    #[error("mask issued to identifier {found}, expected {expected}")]
    /// A mask belongs to a different request.
    ForeignMask {
        /// Identifier of the bidder building the bid.
        expected: Identifier,
        /// Identifier the mask was issued to.
        found: Identifier,
    },
    #[error("malformed {what}: expected {expected} components, got {actual}")]
    /// A vector does not have one component per price.
    LengthMismatch {
        /// Which value was malformed.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
    #[error("config io error: {0}")]
    /// The configuration file could not be read.
    ConfigIo(String),
    #[error("config decode error: {0}")]
    /// The configuration file could not be parsed.
    ConfigDecode(String),

    #[error("node has not been preprocessed")]
    /// Masks or shares were requested before preprocessing.
    NotPreprocessed,
    #[error("node has already been preprocessed")]
    /// Preprocessing was invoked twice on the same node.
    AlreadyPreprocessed,
    #[error("round is closed")]
    /// The node already produced its share or was aborted.
    RoundClosed,
    #[error("round incomplete: {served} of {expected} requests served")]
    /// Shares were requested before every preprocessed slot was consumed.
    RoundIncomplete {
        /// Requests served so far.
        served: usize,
        /// Preprocessed capacity.
        expected: usize,
    },
    #[error("expected {expected} bids, got {actual}")]
    /// The bid set does not have one bid per served request.
    UnexpectedBidCount {
        /// Number of served requests.
        expected: usize,
        /// Number of bids supplied.
        actual: usize,
    },
    #[error("bid from identifier {identifier} that never requested masks")]
    /// A bid comes from a bidder this node never served.
    UnknownBidder {
        /// Offending identifier.
        identifier: Identifier,
    },
    #[error("duplicate bid from identifier {identifier}")]
    /// Two bids carry the same identifier.
    DuplicateBid {
        /// Offending identifier.
        identifier: Identifier,
    },
    #[error("no outcome shares supplied")]
    /// Reveal was invoked without any share.
    NoShares,

    #[error("preprocessed capacity of {capacity} requests exhausted")]
    /// Every preprocessed slot has been consumed.
    CapacityExhausted {
        /// Preprocessed capacity.
        capacity: usize,
    },
    #[error("identifier {identifier} already received masks")]
    /// A request was replayed.
    DuplicateRequest {
        /// Replayed identifier.
        identifier: Identifier,
    },

    #[error("revealed value at price {column} cannot be decoded: {detail}")]
    /// The revealed winning column is not a valid identifier product.
    DecodeAmbiguity {
        /// Column that failed to decode.
        column: PriceIndex,
        /// What was wrong with the value.
        detail: &'static str,
    },
}

impl AuctionError {
    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        use AuctionError::*;
        match self {
            InvalidParameters { .. }
            | FieldTooSmall { .. }
            | NodeCountMismatch { .. }
            | IdentifierOutOfRange { .. }
            | PriceOutOfRange { .. }
            | MaskCountMismatch { .. }
            | ForeignMask { .. }
            | LengthMismatch { .. }
            | ConfigIo(_)
            | ConfigDecode(_) => ErrorKind::Configuration,
            NotPreprocessed
            | AlreadyPreprocessed
            | RoundClosed
            | RoundIncomplete { .. }
            | UnexpectedBidCount { .. }
            | UnknownBidder { .. }
            | DuplicateBid { .. }
            | NoShares => ErrorKind::ProtocolSequence,
            CapacityExhausted { .. } | DuplicateRequest { .. } => ErrorKind::ResourceExhaustion,
            DecodeAmbiguity { .. } => ErrorKind::DecodeAmbiguity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_each_family() {
        assert_eq!(
            AuctionError::PriceOutOfRange { price: 4, prices: 4 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(AuctionError::NoShares.kind(), ErrorKind::ProtocolSequence);
        assert_eq!(
            AuctionError::DuplicateRequest { identifier: 1 }.kind(),
            ErrorKind::ResourceExhaustion
        );
        assert_eq!(
            AuctionError::DecodeAmbiguity {
                column: 2,
                detail: "odd exponent"
            }
            .kind(),
            ErrorKind::DecodeAmbiguity
        );
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = AuctionError::RoundIncomplete {
            served: 2,
            expected: 4,
        };
        assert_eq!(err.to_string(), "round incomplete: 2 of 4 requests served");
    }
}
