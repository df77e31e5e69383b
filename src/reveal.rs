//! Reconstruction of the auction outcome.
//!
//! The operator collects one [`OutcomeShare`] per node, reconstructs the
//! plaintext [`Outcome`] column by column and decodes the winner set from the
//! highest column that is not the identity.  Every column above it reveals
//! exactly `1` and every column below it is indistinguishable from a random
//! element, so nothing beyond the winning price and the tied winners leaks.

use crate::column::{ColumnProtocol, ProductColumn};
use crate::encoding::decode_identifiers;
use crate::error::{AuctionError, Result};
use crate::{PriceIndex, WinnerSet};
use ark_ff::PrimeField;
use tracing::{info, instrument};

/// One node's share of the outcome, one element per price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeShare<F> {
    values: Vec<F>,
}

impl<F: PrimeField> OutcomeShare<F> {
    /// Wraps share components, e.g. after receiving them from a node.
    pub fn from_values(values: Vec<F>) -> Self {
        Self { values }
    }

    /// Share components indexed by price.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Number of prices covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the share covers no price.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The revealed plaintext outcome vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<F> {
    values: Vec<F>,
}

impl<F: PrimeField> Outcome<F> {
    /// Reconstructs the outcome from every node's share using `C`'s sharing.
    pub fn combine<C: ColumnProtocol<F>>(shares: &[OutcomeShare<F>]) -> Result<Self> {
        let first = shares.first().ok_or(AuctionError::NoShares)?;
        let prices = first.len();
        if let Some(bad) = shares.iter().find(|share| share.len() != prices) {
            return Err(AuctionError::LengthMismatch {
                what: "outcome share",
                expected: prices,
                actual: bad.len(),
            });
        }
        let values = (0..prices)
            .map(|price| {
                let column: Vec<F> = shares.iter().map(|share| share.values[price]).collect();
                C::reconstruct(&column)
            })
            .collect();
        Ok(Self { values })
    }

    /// Plaintext components indexed by price.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Highest price whose column is not the identity, i.e. the winning price.
    pub fn winning_price(&self) -> Option<PriceIndex> {
        self.values.iter().rposition(|value| !value.is_one())
    }

    /// Decodes the set of bidders tied at the winning price.
    ///
    /// Returns the empty set when every column is the identity.
    pub fn winners(&self) -> Result<WinnerSet> {
        match self.winning_price() {
            Some(price) => decode_identifiers(&self.values[price], price),
            None => Ok(WinnerSet::new()),
        }
    }
}

/// Reveals the winner set from shares produced with [`ProductColumn`].
pub fn reveal<F: PrimeField>(shares: &[OutcomeShare<F>]) -> Result<WinnerSet> {
    reveal_with::<F, ProductColumn<F>>(shares)
}

/// Reveals the winner set from shares produced with column protocol `C`.
#[instrument(skip_all, fields(shares = shares.len()), err(Debug))]
pub fn reveal_with<F, C>(shares: &[OutcomeShare<F>]) -> Result<WinnerSet>
where
    F: PrimeField,
    C: ColumnProtocol<F>,
{
    let outcome = Outcome::combine::<C>(shares)?;
    let winners = outcome.winners()?;
    info!(price = ?outcome.winning_price(), winners = winners.len(), "outcome revealed");
    Ok(winners)
}
