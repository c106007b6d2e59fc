//! Number-theory primitives behind the Diffie-Hellman demonstrator.
//!
//! Everything here works on [`BigUint`], so secrets of any size can be used as exponents
//! without overflowing. These are total functions: none of them panic or fail for any
//! non-negative input. A zero modulus is a caller error and yields a meaningless value.

use log::warn;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Deterministic trial-division primality test.
///
/// Returns `false` for `0` and `1`, `true` for `2`, `false` for every other even number, and
/// otherwise checks every odd divisor up to `floor(sqrt(n))`. Intended for classroom-sized
/// inputs: the cost grows with the square root of `n`.
///
/// # Examples
/// ```
/// use dhello::math::number_theory::is_prime;
/// use num_bigint::BigUint;
///
/// assert!(is_prime(&BigUint::from(23u32)));
/// assert!(!is_prime(&BigUint::from(21u32)));
/// ```
pub fn is_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let limit = n.sqrt();
    let mut divisor = BigUint::from(3u32);
    while divisor <= limit {
        if (n % &divisor).is_zero() {
            return false;
        }
        divisor += 2u32;
    }
    true
}

/// Euler-criterion generator check: `g^((p-1)/2) mod p == p - 1`.
///
/// `(p-1)/2` truncates, so for an even `p` the exponent is not an exact half. Callers are
/// expected to pass an odd prime `p`; no further check on `p` is made.
///
/// This accepts exactly the quadratic non-residues modulo a prime, which include but are not
/// limited to the primitive roots (`6` passes modulo `7` with order 2). Use [`is_generator`]
/// for the full-order definition.
///
/// `g == 0` and `g >= p` are always rejected, as is `p == 0`.
pub fn is_primitive_root(g: &BigUint, p: &BigUint) -> bool {
    if p.is_zero() || g.is_zero() || g >= p {
        return false;
    }
    let p_minus_one = p - BigUint::one();
    let half = &p_minus_one / BigUint::from(2u32);
    mod_pow(g, &half, p) == p_minus_one
}

/// Computes `base^exponent mod modulus` by left-to-right square-and-multiply.
///
/// Every intermediate value is reduced, so nothing larger than `modulus^2` is ever
/// materialized regardless of the exponent size.
///
/// # Edge cases
/// - `exponent == 0` gives `1 mod modulus` (so `0` when `modulus == 1`).
/// - `modulus == 0` is a precondition violation; `0` is returned and a warning logged.
///
/// # Examples
/// ```
/// use dhello::math::number_theory::mod_pow;
/// use num_bigint::BigUint;
///
/// let r = mod_pow(&BigUint::from(5u32), &BigUint::from(6u32), &BigUint::from(23u32));
/// assert_eq!(r, BigUint::from(8u32));
/// ```
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_zero() {
        warn!("mod_pow called with a zero modulus, returning 0");
        return BigUint::zero();
    }

    let base = base % modulus;
    let mut result = BigUint::one() % modulus;
    for i in (0..exponent.bits()).rev() {
        result = &result * &result % modulus;
        if exponent.bit(i) {
            result = result * &base % modulus;
        }
    }
    result
}

/// Distinct prime factors of `n` in ascending order, by trial division.
pub fn prime_factors(n: &BigUint) -> Vec<BigUint> {
    let mut factors = Vec::new();
    if n.is_zero() {
        return factors;
    }

    let mut rest = n.clone();
    let mut divisor = BigUint::from(2u32);
    while &divisor * &divisor <= rest {
        if (&rest % &divisor).is_zero() {
            while (&rest % &divisor).is_zero() {
                rest /= &divisor;
            }
            factors.push(divisor.clone());
        }
        divisor += if divisor == BigUint::from(2u32) { 1u32 } else { 2u32 };
    }
    if rest > BigUint::one() {
        factors.push(rest);
    }
    factors
}

/// Euler's totient `φ(n)`, the order of the unit group modulo `n`.
pub fn euler_phi(n: &BigUint) -> BigUint {
    prime_factors(n)
        .iter()
        .fold(n.clone(), |phi, q| &phi / q * (q - BigUint::one()))
}

/// Smallest `k >= 1` with `g^k ≡ 1 (mod p)`.
///
/// Starts from `φ(p)` and divides out each prime factor while the reduced exponent still maps
/// `g` to `1`. Returns `None` when `p < 2` or `g` shares a factor with `p` (no such `k`).
pub fn multiplicative_order(g: &BigUint, p: &BigUint) -> Option<BigUint> {
    if *p < BigUint::from(2u32) {
        return None;
    }
    let g = g % p;
    if g.is_zero() || !g.gcd(p).is_one() {
        return None;
    }

    let one = BigUint::one();
    let mut order = euler_phi(p);
    for q in prime_factors(&order) {
        while (&order % &q).is_zero() {
            let reduced = &order / &q;
            if mod_pow(&g, &reduced, p) != one {
                break;
            }
            order = reduced;
        }
    }
    Some(order)
}

/// Textbook primitive-root check: `0 < g < p` and `g` has order `p - 1` modulo `p`.
pub fn is_generator(g: &BigUint, p: &BigUint) -> bool {
    if g.is_zero() || g >= p {
        return false;
    }
    multiplicative_order(g, p) == Some(p - BigUint::one())
}
