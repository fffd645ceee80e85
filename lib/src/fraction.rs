use crate::error::BalanceError;
use malachite::num::arithmetic::traits::{Gcd, Lcm, UnsignedAbs};
use malachite::num::basic::traits::{One, Zero};
use malachite::{Integer, Natural, Rational};





/// Creates an exact fraction in lowest terms
/// # Arguments
/// * `numerator` - numerator
/// * `denominator` - denominator, must not be zero
/// # Returns
/// * `Ok` - normalized fraction (the sign is carried by the numerator)
/// * `Err` - `BalanceError::DivideByZero` if the denominator is zero
/// # Example
/// ```
/// use chembalance::fraction::fraction;
/// use malachite::Rational;
/// use std::str::FromStr;
///
/// assert_eq!(fraction(6, -4).unwrap(), Rational::from_str("-3/2").unwrap());
/// assert!(fraction(1, 0).is_err());
/// ```
pub fn fraction(numerator: impl Into<Integer>, denominator: impl Into<Integer>) -> Result<Rational, BalanceError> {
    let denominator = denominator.into();
    if denominator == Integer::ZERO { return Err(BalanceError::DivideByZero); }

    Ok(Rational::from_integers(numerator.into(), denominator))
}

/// Divides two fractions, reporting a zero divisor instead of panicking
pub fn divide(dividend: &Rational, divisor: &Rational) -> Result<Rational, BalanceError> {
    if *divisor == Rational::ZERO { return Err(BalanceError::DivideByZero); }

    Ok(dividend / divisor)
}

/// Returns the least common multiple of all denominators (1 for an empty slice)
pub fn lcm_of_denominators(values: &[Rational]) -> Natural {
    let mut lcm = Natural::ONE;
    for value in values {
        lcm = lcm.lcm(value.denominator_ref());
    }
    lcm
}

/// Turns a solution vector into the smallest integer vector pointing the same way.
/// Entries are multiplied by the least common multiple of the denominators,
/// the whole vector is negated if no entry is positive,
/// and finally everything is divided by the greatest common divisor.
/// # Arguments
/// * `values` - exact solution vector
/// # Returns
/// * `Ok` - integer vector with no common factor (all zeros stay zeros)
/// * `Err` - scaling did not produce integers, which means the arithmetic is broken
/// # Example
/// ```
/// use chembalance::fraction::{fraction, minimal_integers};
/// use malachite::Integer;
///
/// let values = vec![fraction(2, 1).unwrap(), fraction(3, 2).unwrap(), fraction(1, 1).unwrap()];
///
/// assert_eq!(minimal_integers(&values).unwrap(), vec![Integer::from(4), Integer::from(3), Integer::from(2)]);
/// ```
pub fn minimal_integers(values: &[Rational]) -> Result<Vec<Integer>, BalanceError> {
    let lcm = Rational::from(&lcm_of_denominators(values));

    let mut integers = values
        .iter()
        .map(|value| Integer::try_from(&(value * &lcm)).map_err(|_| BalanceError::InvalidSolution))
        .collect::<Result<Vec<Integer>, BalanceError>>()?;

    if integers.iter().all(|x| *x <= Integer::ZERO) {
        integers = integers.into_iter().map(|x| -x).collect();
    }

    // gcd(0, x) = x, so zeros don't disturb the reduction
    let gcd = integers.iter().fold(Natural::ZERO, |acc, x| acc.gcd(x.unsigned_abs()));
    if gcd > Natural::ONE {
        let gcd = Integer::from(&gcd);
        integers = integers.iter().map(|x| x / &gcd).collect();
    }

    Ok(integers)
}
