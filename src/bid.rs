//! Bidder-side values: requests, masks and the masked bid.
//!
//! A bidder sends a [`Request`] to every node, receives one [`Mask`] from each,
//! and folds them together with its price into a single [`Bid`] that is
//! broadcast to all nodes.  The bid is a one-hot style vector: below the
//! bidder's price every column carries fresh random filler, at the price it
//! carries the identifier encoding, and above it carries the identity.  Once
//! the nodes' masking cancels, each column of the product over all bidders is
//! random below the highest price, exactly `1` above it, and the product of
//! the tied winners' encodings at it.

use crate::config::AuctionConfig;
use crate::encoding::encode_identifier;
use crate::error::{AuctionError, Result};
use crate::field::random_nonzero;
use crate::{Identifier, PriceIndex};
use ark_ff::PrimeField;
use rand::{CryptoRng, RngCore};
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Request for the opportunity to submit a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    identifier: Identifier,
}

impl Request {
    /// Creates a request on behalf of `identifier`.
    pub fn new(identifier: Identifier) -> Self {
        Self { identifier }
    }

    /// Identifier of the requesting bidder.
    pub fn identifier(&self) -> Identifier {
        self.identifier
    }
}

/// Masks issued by one node for one request, one element per price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask<F> {
    identifier: Identifier,
    values: Vec<F>,
}

impl<F: PrimeField> Mask<F> {
    /// Reassembles a mask received over an external transport.
    pub fn from_parts(identifier: Identifier, values: Vec<F>) -> Self {
        Self { identifier, values }
    }

    /// Identifier of the bidder the mask was issued to.
    pub fn identifier(&self) -> Identifier {
        self.identifier
    }

    /// Mask elements indexed by price.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Number of prices covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the mask covers no price.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A masked bid, the only value a bidder ever reveals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bid<F> {
    identifier: Identifier,
    values: Vec<F>,
}

impl<F: PrimeField> Bid<F> {
    /// Builds the bid of `request`'s bidder at `price` from every node's mask.
    ///
    /// `masks` must hold exactly one mask per configured node, each issued for
    /// `request` and covering every price.
    #[instrument(skip_all, fields(identifier = request.identifier()), err(Debug))]
    pub fn new<R>(
        config: &AuctionConfig,
        request: &Request,
        masks: &[Mask<F>],
        price: PriceIndex,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let identifier = request.identifier();
        if masks.len() != config.nodes {
            return Err(AuctionError::MaskCountMismatch {
                expected: config.nodes,
                actual: masks.len(),
            });
        }
        if price >= config.prices {
            return Err(AuctionError::PriceOutOfRange {
                price,
                prices: config.prices,
            });
        }
        if identifier >= config.bids {
            return Err(AuctionError::IdentifierOutOfRange {
                identifier,
                limit: config.bids,
            });
        }
        for mask in masks {
            if mask.identifier != identifier {
                return Err(AuctionError::ForeignMask {
                    expected: identifier,
                    found: mask.identifier,
                });
            }
            if mask.len() != config.prices {
                return Err(AuctionError::LengthMismatch {
                    what: "mask",
                    expected: config.prices,
                    actual: mask.len(),
                });
            }
        }
        let encoded = encode_identifier::<F>(identifier)?;

        let values = (0..config.prices)
            .map(|column| {
                let combined: F = masks.iter().map(|mask| mask.values[column]).product();
                let factor = match column.cmp(&price) {
                    Ordering::Less => random_nonzero::<F, R>(rng),
                    Ordering::Equal => encoded,
                    Ordering::Greater => F::one(),
                };
                combined * factor
            })
            .collect();
        debug!(nodes = masks.len(), "assembled bid");
        Ok(Self { identifier, values })
    }

    /// Reassembles a bid received over an external transport.
    pub fn from_parts(identifier: Identifier, values: Vec<F>) -> Self {
        Self { identifier, values }
    }

    /// Identifier of the bidder.
    pub fn identifier(&self) -> Identifier {
        self.identifier
    }

    /// Masked components indexed by price.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Number of prices covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bid covers no price.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
