//! Public parameters of a protocol instance.
//!
//! A protocol instance is fixed by the triple $(p, q, g)$: a safe prime $p$,
//! the prime $q$ with $p = 2q + 1$, and a generator $g$ of the order-$q$
//! subgroup of quadratic residues of $\mathbb{Z}_p^*$. Input values, masks,
//! and result shares live in $\mathbb{Z}_p$; the exponents the masks are
//! derived from are shared additively modulo $2q$. All parties of an
//! instance must hold the identical triple.

use num_bigint::BigUint;
use num_traits::One;

use crate::error::{Error, Result};
use crate::math::modular::{is_probable_prime, Element};

/// Public parameters $(p, q, g)$ shared by the dealer, every node, and
/// every contributor of a protocol instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    /// Field modulus; a safe prime.
    pub p: BigUint,

    /// Prime subgroup order, with $p = 2q + 1$.
    pub q: BigUint,

    /// Generator of the order-$q$ subgroup of $\mathbb{Z}_p^*$.
    pub g: BigUint,
}

impl Params {
    /// Creates a validated parameter set.
    ///
    /// Rejects triples where $p \ne 2q + 1$, where $p$ or $q$ fails a
    /// Miller–Rabin primality test, or where $g$ is outside $[2, p)$ or
    /// does not satisfy $g^q \equiv 1 \pmod{p}$.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Params> {
        let two = BigUint::from(2u32);

        if p != &two * &q + BigUint::one() {
            return Err(Error::Parameter(String::from(
                "field modulus must satisfy p = 2q + 1",
            )));
        }
        if !is_probable_prime(&p) {
            return Err(Error::Parameter(String::from(
                "field modulus p must be prime",
            )));
        }
        if !is_probable_prime(&q) {
            return Err(Error::Parameter(String::from(
                "subgroup order q must be prime",
            )));
        }
        if g < two || g >= p {
            return Err(Error::Parameter(String::from(
                "generator must lie in [2, p)",
            )));
        }
        if !Element::new(g.clone(), &p).pow(&q).value().is_one() {
            return Err(Error::Parameter(String::from(
                "generator must have order q modulo p",
            )));
        }

        Ok(Params { p, q, g })
    }

    /// Returns the modulus $2q$ under which mask exponents are shared.
    ///
    /// The generator has order $q$, so exponents are only meaningful modulo
    /// $q$; shares are nevertheless taken modulo $2q$ so that the negated
    /// exponent used during correlation keeps a uniform non-negative
    /// representation. $g^{x \bmod 2q} = g^{x \bmod q}$ holds because $2q$
    /// is a multiple of the order.
    pub fn exponent_modulus(&self) -> BigUint {
        &self.q * BigUint::from(2u32)
    }

    /// Returns the generator as an element of $\mathbb{Z}_p$.
    pub fn generator(&self) -> Element {
        Element::new(self.g.clone(), &self.p)
    }
}

impl Default for Params {
    /// The 128-bit default parameter set.
    ///
    /// The triple is fixed bit-exact so that independent implementations
    /// interoperate on the same instances.
    fn default() -> Self {
        Params {
            p: BigUint::parse_bytes(b"340282366920938463463374607431768196007", 10).unwrap(),
            q: BigUint::parse_bytes(b"170141183460469231731687303715884098003", 10).unwrap(),
            g: BigUint::parse_bytes(b"205482397601703717038466705921080247554", 10).unwrap(),
        }
    }
}
