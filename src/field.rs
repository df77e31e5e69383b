//! Prime-field helpers.
//!
//! The auction is generic over any [`PrimeField`]; the modulus is fixed by the
//! chosen type and never configured here.  This module supplies the few
//! operations the protocol needs beyond the arkworks traits: sampling non-zero
//! elements, extracting bit lengths and working with exact powers of two.

use ark_ff::{BigInteger, PrimeField};
use rand::{CryptoRng, RngCore};

/// Field used when the caller has no reason to pick another one.
///
/// The BN254 scalar field has a 254-bit modulus, enough for six bidders.
pub type DefaultField = ark_bn254::Fr;

/// Samples a uniformly random non-zero element.
pub fn random_nonzero<F, R>(rng: &mut R) -> F
where
    F: PrimeField,
    R: RngCore + CryptoRng + ?Sized,
{
    loop {
        let candidate = F::rand(rng);
        if !candidate.is_zero() {
            return candidate;
        }
    }
}

/// Samples a uniformly random unit together with its inverse.
pub fn random_unit<F, R>(rng: &mut R) -> (F, F)
where
    F: PrimeField,
    R: RngCore + CryptoRng + ?Sized,
{
    loop {
        let candidate = F::rand(rng);
        if let Some(inverse) = candidate.inverse() {
            return (candidate, inverse);
        }
    }
}

/// Bit length of the canonical integer representative of `value`.
#[inline]
pub fn bit_length<F: PrimeField>(value: &F) -> u32 {
    value.into_bigint().num_bits()
}

/// Returns `Some(e)` when the canonical representative of `value` is `2^e`.
pub fn log2_exact<F: PrimeField>(value: &F) -> Option<u32> {
    let repr = value.into_bigint();
    let bits = repr.num_bits();
    if bits == 0 {
        return None;
    }
    let exponent = bits - 1;
    (0..exponent as usize)
        .all(|i| !repr.get_bit(i))
        .then_some(exponent)
}

/// Computes `2^exponent` in the field.
#[inline]
pub fn pow2<F: PrimeField>(exponent: u64) -> F {
    F::from(2u64).pow([exponent])
}

/// Largest `e` such that `2^e` is strictly below the modulus.
#[inline]
pub fn max_exact_exponent<F: PrimeField>() -> u32 {
    F::MODULUS_BIT_SIZE - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::init_testing;
    use ark_ff::{One, Zero};

    #[test]
    fn random_nonzero_never_returns_zero() {
        let mut rng = init_testing();
        for _ in 0..256 {
            let value: DefaultField = random_nonzero(&mut rng);
            assert!(!value.is_zero());
        }
    }

    #[test]
    fn random_unit_pairs_with_inverse() {
        let mut rng = init_testing();
        let (value, inverse): (DefaultField, DefaultField) = random_unit(&mut rng);
        assert!((value * inverse).is_one());
    }

    #[test]
    fn powers_of_two_round_trip_through_log2() {
        for exponent in [0u64, 1, 2, 30, 63, 64, 200, 253] {
            let value: DefaultField = pow2(exponent);
            assert_eq!(log2_exact(&value), Some(exponent as u32));
            assert_eq!(bit_length(&value), exponent as u32 + 1);
        }
    }

    #[test]
    fn non_powers_are_rejected() {
        assert_eq!(log2_exact(&DefaultField::zero()), None);
        assert_eq!(log2_exact(&DefaultField::from(3u64)), None);
        assert_eq!(log2_exact(&DefaultField::from(12u64)), None);
        // 2^254 wraps around the BN254 modulus.
        assert_eq!(log2_exact(&pow2::<DefaultField>(254)), None);
    }

    #[test]
    fn bn254_exact_exponent_bound() {
        assert_eq!(max_exact_exponent::<DefaultField>(), 253);
    }
}
