//! Implements all the functionalities for modular residues.
//!
//! In multi-party computation protocols, it is common to use an underlying
//! algebraic structure in which all the secure computations are performed.
//! This module defines the basic functionalities to manipulate residues in
//! $\mathbb{Z}_m$ for an arbitrary modulus $m$. The protocol uses two such
//! structures: the field $\mathbb{Z}_p$ for input values, masks, and result
//! shares, and the ring $\mathbb{Z}_{2q}$ for the exponents from which the
//! masks are derived.
//!
//! Every residue carries its modulus, and all reductions produce the
//! non-negative representative in $[0, m)$. Mixing residues of different
//! moduli in one operation is a programming error and asserts.

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::utils::prg::Prg;

/// Defines an element in $\mathbb{Z}_m$ for the modulus $m$ it was created
/// with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    value: BigUint,
    modulus: BigUint,
}

impl Element {
    /// Creates an element from a non-negative integer, reducing it modulo
    /// the provided modulus.
    pub fn new(value: BigUint, modulus: &BigUint) -> Self {
        assert!(!modulus.is_zero(), "modulus must be positive");

        Self {
            value: value % modulus,
            modulus: modulus.clone(),
        }
    }

    /// Creates an element from a signed integer.
    ///
    /// Negative integers reduce to their non-negative representative, so
    /// `from_integer(-1, m)` is the element $m - 1$.
    pub fn from_integer(value: &BigInt, modulus: &BigUint) -> Self {
        assert!(!modulus.is_zero(), "modulus must be positive");

        let signed_modulus = BigInt::from(modulus.clone());
        let reduced = value.mod_floor(&signed_modulus);

        Self {
            value: reduced
                .to_biguint()
                .expect("floor reduction yields a non-negative residue"),
            modulus: modulus.clone(),
        }
    }

    /// Returns the value of the element.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Returns the modulus the element lives under.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Computes the sum of two elements under the same modulus.
    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(
            self.modulus, other.modulus,
            "cannot operate on elements of different moduli"
        );

        Self {
            value: (&self.value + &other.value) % &self.modulus,
            modulus: self.modulus.clone(),
        }
    }

    /// Computes the subtraction between two elements under the same modulus.
    pub fn subtract(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Given an element $a \in \mathbb{Z}_m$, returns $-a$.
    pub fn negate(&self) -> Self {
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            &self.modulus - &self.value
        };

        Self {
            value,
            modulus: self.modulus.clone(),
        }
    }

    /// Computes the product of two elements under the same modulus.
    pub fn multiply(&self, other: &Self) -> Self {
        assert_eq!(
            self.modulus, other.modulus,
            "cannot operate on elements of different moduli"
        );

        Self {
            value: (&self.value * &other.value) % &self.modulus,
            modulus: self.modulus.clone(),
        }
    }

    /// Raises the element to a non-negative integer power.
    pub fn pow(&self, exponent: &BigUint) -> Self {
        Self {
            value: self.value.modpow(exponent, &self.modulus),
            modulus: self.modulus.clone(),
        }
    }

    /// Generates a uniformly random element of $\mathbb{Z}_m$ from the
    /// provided pseudo-random generator.
    pub fn random(modulus: &BigUint, prg: &mut Prg) -> Self {
        assert!(!modulus.is_zero(), "modulus must be positive");

        Self {
            value: prg.gen_biguint_below(modulus),
            modulus: modulus.clone(),
        }
    }
}

/// Miller–Rabin primality test over the witness bases 2 through 37.
///
/// Deterministic for every integer below $3.3 \cdot 10^{24}$ and
/// probabilistic beyond that, with error probability at most $4^{-12}$
/// per tested integer.
pub fn is_probable_prime(n: &BigUint) -> bool {
    const BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    let one = BigUint::one();
    let two = BigUint::from(2u32);

    if n < &two {
        return false;
    }
    if BASES.iter().any(|&b| *n == BigUint::from(b)) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n - 1 = d * 2^s with d odd.
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for b in BASES {
        let mut x = BigUint::from(b).modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}
