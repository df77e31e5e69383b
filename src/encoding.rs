//! Identifier encoding.
//!
//! Identifier `i` is encoded as `2^(2^(i+1))`.  Multiplying the encodings of a
//! subset `S` adds the exponents, giving `2^(Σ 2^(k+1))` over `k ∈ S`; since
//! each identifier owns a distinct bit of the exponent, no two subsets collide.
//! Decoding reads the exponent back from the bit length of the revealed value
//! and maps every set bit `k+1` to identifier `k`.
//!
//! The exponent grows doubly exponentially, so only a handful of identifiers
//! fit below the modulus; [`identifier_capacity`] gives the exact bound.

use crate::error::{AuctionError, Result};
use crate::field::{log2_exact, max_exact_exponent, pow2};
use crate::{Identifier, PriceIndex, WinnerSet};
use ark_ff::PrimeField;

/// Number of identifiers `n` such that `[0, n)` can all tie without the
/// product of their encodings wrapping around the modulus.
pub fn identifier_capacity<F: PrimeField>() -> usize {
    let limit = u64::from(max_exact_exponent::<F>());
    let mut capacity = 0usize;
    // All of [0, n) tied contribute 2^(n+1) - 2 to the exponent.
    while capacity < 62 && (1u64 << (capacity + 2)) - 2 <= limit {
        capacity += 1;
    }
    capacity
}

/// Encodes `identifier` as `2^(2^(identifier+1))`.
pub fn encode_identifier<F: PrimeField>(identifier: Identifier) -> Result<F> {
    let capacity = identifier_capacity::<F>();
    if identifier >= capacity {
        return Err(AuctionError::IdentifierOutOfRange {
            identifier,
            limit: capacity,
        });
    }
    Ok(pow2(1u64 << (identifier + 1)))
}

/// Recovers the set of identifiers whose encodings multiply to `value`.
///
/// `column` is only used for error reporting.  The multiplicative identity
/// decodes to the empty set.  A set exponent bit naming an identifier at or
/// beyond [`identifier_capacity`] is reported as ambiguous.
pub fn decode_identifiers<F: PrimeField>(value: &F, column: PriceIndex) -> Result<WinnerSet> {
    let exponent = log2_exact(value).ok_or(AuctionError::DecodeAmbiguity {
        column,
        detail: "value is not a power of two",
    })?;
    if exponent & 1 == 1 {
        return Err(AuctionError::DecodeAmbiguity {
            column,
            detail: "exponent has its reserved low bit set",
        });
    }
    // Identifier k owns exponent bit k+1, so bits above `capacity` are foreign.
    let capacity = identifier_capacity::<F>() as u32;
    if exponent.checked_shr(capacity + 1).unwrap_or(0) != 0 {
        return Err(AuctionError::DecodeAmbiguity {
            column,
            detail: "identifier beyond field capacity",
        });
    }
    Ok((1..u32::BITS)
        .filter(|bit| (exponent >> bit) & 1 == 1)
        .map(|bit| bit as Identifier - 1)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::field::DefaultField;
    use ark_ff::One;

    #[test]
    fn bn254_holds_six_identifiers() {
        assert_eq!(identifier_capacity::<DefaultField>(), 6);
    }

    #[test]
    fn encodings_are_distinct_powers() {
        for id in 0..identifier_capacity::<DefaultField>() {
            let value: DefaultField = encode_identifier(id).unwrap();
            assert_eq!(log2_exact(&value), Some(1u32 << (id + 1)));
        }
    }

    #[test]
    fn product_of_subset_decodes_to_subset() {
        let product = [0usize, 2, 5]
            .iter()
            .map(|&id| encode_identifier::<DefaultField>(id).unwrap())
            .product::<DefaultField>();
        let winners = decode_identifiers(&product, 3).unwrap();
        assert_eq!(winners.into_iter().collect::<Vec<_>>(), vec![0, 2, 5]);
    }

    #[test]
    fn every_identifier_tied_still_fits() {
        let capacity = identifier_capacity::<DefaultField>();
        let product = (0..capacity)
            .map(|id| encode_identifier::<DefaultField>(id).unwrap())
            .product::<DefaultField>();
        let winners = decode_identifiers(&product, 0).unwrap();
        assert_eq!(winners.len(), capacity);
    }

    #[test]
    fn identity_decodes_to_nobody() {
        assert!(decode_identifiers(&DefaultField::one(), 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn identifiers_beyond_capacity_are_rejected() {
        let err = encode_identifier::<DefaultField>(6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn malformed_values_are_ambiguous() {
        let not_power = DefaultField::from(12u64);
        let odd_exponent = pow2::<DefaultField>(3);
        for value in [not_power, odd_exponent] {
            let err = decode_identifiers(&value, 7).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DecodeAmbiguity);
        }
    }

    #[test]
    fn identifiers_past_capacity_are_ambiguous() {
        // Exponent 2^7 would name identifier 6, one past the BN254 capacity.
        let err = decode_identifiers(&pow2::<DefaultField>(128), 0).unwrap_err();
        assert_eq!(
            err,
            AuctionError::DecodeAmbiguity {
                column: 0,
                detail: "identifier beyond field capacity"
            }
        );
        let mixed = pow2::<DefaultField>(128 + 2);
        let err = decode_identifiers(&mixed, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeAmbiguity);
        let highest = encode_identifier::<DefaultField>(5).unwrap();
        assert_eq!(decode_identifiers(&highest, 0).unwrap(), WinnerSet::from([5]));
    }
}
