//! Per-price secure product evaluation.
//!
//! Each permitted price is served by one independent instance of a secure
//! sum-of-products primitive.  The auction only relies on its boundary, the
//! [`ColumnProtocol`] trait: after preprocessing, a party hands out one mask
//! per request slot, and once every slot has been used the parties' shares of
//! the masked factors reconstruct to the plain product of the bidders' inputs.
//!
//! [`ProductColumn`] is the bundled instance.  Party `i` draws a unit `r_ij`
//! for every slot `j`, issues `r_ij⁻¹` as the mask, and holds an additive
//! share `s_i` of `M = Π r_ij`.  A bidder multiplies its input by the masks of
//! every party, so the product of all bids is `Π v_j / M`, and
//! `Σ s_i · Π bids = Π v_j`.

use crate::field::random_unit;
use ark_ff::PrimeField;
use rand::{CryptoRng, RngCore};
use std::fmt;

/// Boundary of the secure product primitive run once per price.
pub trait ColumnProtocol<F: PrimeField>: Sized + Send + Sync {
    /// Simulates the offline phase for `parties` parties and `bids` slots,
    /// returning one instance per party, ordered by party index.
    fn preprocess<R>(parties: usize, bids: usize, rng: &mut R) -> Vec<Self>
    where
        R: RngCore + CryptoRng + ?Sized;

    /// Mask for the request occupying `slot`, or `None` past capacity.
    fn issue_mask(&self, slot: usize) -> Option<F>;

    /// This party's share of the product of the masked `factors`.
    fn combine(&self, factors: &[F]) -> F;

    /// Reconstructs a value from every party's share.
    fn reconstruct(shares: &[F]) -> F;
}

/// Multiplicative masks with an additive sharing of the mask product.
#[derive(Clone)]
pub struct ProductColumn<F> {
    masks: Vec<F>,
    share: F,
}

impl<F> fmt::Debug for ProductColumn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductColumn")
            .field("slots", &self.masks.len())
            .finish_non_exhaustive()
    }
}

impl<F: PrimeField> ColumnProtocol<F> for ProductColumn<F> {
    fn preprocess<R>(parties: usize, bids: usize, rng: &mut R) -> Vec<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut product = F::one();
        let masks: Vec<Vec<F>> = (0..parties)
            .map(|_| {
                (0..bids)
                    .map(|_| {
                        let (blind, inverse) = random_unit::<F, R>(rng);
                        product *= blind;
                        inverse
                    })
                    .collect()
            })
            .collect();

        let mut shares: Vec<F> = (1..parties).map(|_| F::rand(rng)).collect();
        let partial: F = shares.iter().copied().sum();
        shares.push(product - partial);

        masks
            .into_iter()
            .zip(shares)
            .map(|(masks, share)| ProductColumn { masks, share })
            .collect()
    }

    fn issue_mask(&self, slot: usize) -> Option<F> {
        self.masks.get(slot).copied()
    }

    fn combine(&self, factors: &[F]) -> F {
        factors.iter().fold(self.share, |acc, factor| acc * factor)
    }

    fn reconstruct(shares: &[F]) -> F {
        shares.iter().copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DefaultField;
    use crate::testing::init_testing;

    fn masked(
        value: DefaultField,
        columns: &[ProductColumn<DefaultField>],
        slot: usize,
    ) -> DefaultField {
        columns
            .iter()
            .map(|column| column.issue_mask(slot).unwrap())
            .fold(value, |acc, mask| acc * mask)
    }

    #[test]
    fn shares_reconstruct_the_plain_product() {
        let mut rng = init_testing();
        let columns = ProductColumn::<DefaultField>::preprocess(3, 4, &mut rng);
        assert_eq!(columns.len(), 3);
        let inputs: Vec<DefaultField> = [5u64, 7, 11, 13].iter().map(|&v| v.into()).collect();
        let factors: Vec<DefaultField> = inputs
            .iter()
            .enumerate()
            .map(|(slot, &value)| masked(value, &columns, slot))
            .collect();
        let shares: Vec<DefaultField> = columns.iter().map(|c| c.combine(&factors)).collect();
        assert_eq!(
            ProductColumn::<DefaultField>::reconstruct(&shares),
            DefaultField::from(5u64 * 7 * 11 * 13)
        );
    }

    #[test]
    fn single_party_holds_the_whole_product() {
        let mut rng = init_testing();
        let columns = ProductColumn::<DefaultField>::preprocess(1, 1, &mut rng);
        let factor = masked(DefaultField::from(9u64), &columns, 0);
        let share = columns[0].combine(&[factor]);
        assert_eq!(ProductColumn::<DefaultField>::reconstruct(&[share]), DefaultField::from(9u64));
    }

    #[test]
    fn masks_stop_at_capacity() {
        let mut rng = init_testing();
        let columns = ProductColumn::<DefaultField>::preprocess(2, 2, &mut rng);
        assert!(columns[0].issue_mask(1).is_some());
        assert!(columns[0].issue_mask(2).is_none());
    }

    #[test]
    fn debug_does_not_print_secrets() {
        let mut rng = init_testing();
        let columns = ProductColumn::<DefaultField>::preprocess(2, 2, &mut rng);
        let rendered = format!("{:?}", columns[0]);
        assert!(rendered.contains("slots: 2"));
        assert!(!rendered.contains("share"));
    }
}
