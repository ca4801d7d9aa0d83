//! Implements the computing party of the protocol.
//!
//! In the context of this library, a node represents a participant that
//! performs the computation. In a real-world execution, a node would
//! receive its correlated randomness from an external dealer over an
//! authenticated channel and serve contributors over a broadcast medium;
//! here all of that communication is simulated by calling the node's
//! methods directly, so a full protocol instance can run inside one
//! process.
//!
//! A node is created empty and becomes ready when
//! [`correlate`](Node::correlate) installs its share of the correlated
//! randomness: one additive share of every term exponent, one additive
//! share of every term's output mask, and the per-factor multiplicative
//! masks derived from the exponent share. After that single mutation the
//! node only ever reads its state: [`masks`](Node::masks) and
//! [`compute`](Node::compute) take `&self` and may run concurrently from
//! any number of callers.

use std::collections::HashMap;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::math::modular::Element;
use crate::params::Params;
use crate::protocol;
use crate::utils::prg::Prg;

/// A `(term_index, factor_index)` pair identifying one factor slot of the
/// expression.
pub type Coord = (usize, usize);

/// State installed by [`Node::correlate`], read-only afterwards.
struct Correlated {
    signature: Vec<usize>,
    factor_masks: HashMap<Coord, Element>,
    term_masks: Vec<Element>,
    output_shares: Vec<Element>,
}

/// Data structure maintaining the information associated with a node in a
/// protocol instantiation.
///
/// The node's lifecycle has exactly two states. A fresh node only accepts
/// [`correlate`](Node::correlate); a correlated node serves
/// [`masks`](Node::masks) and [`compute`](Node::compute) any number of
/// times and can never be mutated again.
pub struct Node {
    params: Params,
    correlated: Option<Correlated>,
}

impl Node {
    /// Creates a fresh node holding the default public parameters.
    pub fn new() -> Node {
        Self::with_params(Params::default())
    }

    /// Creates a fresh node holding the provided parameters.
    pub fn with_params(params: Params) -> Node {
        Node {
            params,
            correlated: None,
        }
    }

    /// Returns the node's public parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Reports whether the node has received its correlated randomness.
    pub fn is_ready(&self) -> bool {
        self.correlated.is_some()
    }

    fn ready(&self) -> Result<&Correlated> {
        self.correlated
            .as_ref()
            .ok_or_else(|| Error::State(String::from("node has not been correlated")))
    }

    /// Installs this node's correlated randomness for the given signature.
    ///
    /// `exponent_shares` holds one additive share modulo $2q$ of each term
    /// exponent $e_t$; `output_shares` holds one additive share modulo $p$
    /// of each $g^{e_t}$. For every term the node re-shares the *negated*
    /// exponent share across the term's factor slots and exponentiates, so
    /// that its per-factor masks satisfy
    /// $$\prod_{j} m_{t,j} \equiv g^{-e_t^{(n)}} \pmod{p}.$$
    /// The node also retains $g^{e_t^{(n)}}$ per term for audits (see
    /// [`term_mask`](Node::term_mask)).
    ///
    /// Runs exactly once per instance: a second call is a protocol
    /// violation. On any failure the node state is left untouched.
    pub fn correlate(
        &mut self,
        signature: &[usize],
        exponent_shares: Vec<Element>,
        output_shares: Vec<Element>,
        prg: &mut Prg,
    ) -> Result<()> {
        if self.correlated.is_some() {
            return Err(Error::Protocol(String::from(
                "node is already correlated",
            )));
        }
        protocol::validate_signature(signature)?;
        if exponent_shares.len() != signature.len() || output_shares.len() != signature.len() {
            return Err(Error::Protocol(format!(
                "expected one exponent share and one output share per term, got {} and {} for {} terms",
                exponent_shares.len(),
                output_shares.len(),
                signature.len()
            )));
        }

        let exponent_modulus = self.params.exponent_modulus();
        if exponent_shares
            .iter()
            .any(|share| share.modulus() != &exponent_modulus)
        {
            return Err(Error::Protocol(String::from(
                "exponent shares must be residues modulo 2q",
            )));
        }
        if output_shares
            .iter()
            .any(|share| share.modulus() != &self.params.p)
        {
            return Err(Error::Protocol(String::from(
                "output shares must be residues modulo p",
            )));
        }

        let generator = self.params.generator();
        let mut factor_masks = HashMap::new();
        let mut term_masks = Vec::with_capacity(signature.len());

        for (term_index, &factor_count) in signature.iter().enumerate() {
            let negated = exponent_shares[term_index].negate();
            let factor_exponents = protocol::split(
                &BigInt::from(negated.value().clone()),
                &exponent_modulus,
                factor_count,
                prg,
            )?;

            for (factor_index, factor_exponent) in factor_exponents.iter().enumerate() {
                factor_masks.insert(
                    (term_index, factor_index),
                    generator.pow(factor_exponent.value()),
                );
            }
            term_masks.push(generator.pow(exponent_shares[term_index].value()));
        }

        self.correlated = Some(Correlated {
            signature: signature.to_vec(),
            factor_masks,
            term_masks,
            output_shares,
        });

        Ok(())
    }

    /// Returns the node's mask at every requested coordinate.
    ///
    /// A coordinate outside the correlated signature means the caller and
    /// the node disagree about the expression shape, and is reported as a
    /// protocol violation rather than silently skipped. No side effects.
    pub fn masks(&self, coords: &[Coord]) -> Result<HashMap<Coord, Element>> {
        let correlated = self.ready()?;

        let mut out = HashMap::with_capacity(coords.len());
        for &coord in coords {
            let mask = correlated.factor_masks.get(&coord).ok_or_else(|| {
                Error::Protocol(format!(
                    "no mask at coordinate ({}, {})",
                    coord.0, coord.1
                ))
            })?;
            out.insert(coord, mask.clone());
        }

        Ok(out)
    }

    /// Returns the node's diagnostic mask $g^{e_t^{(n)}}$ for a term.
    ///
    /// Not consumed by the online phase; it exists so that audits and tests
    /// can check the mask-table invariant
    /// $\prod_j m_{t,j} \cdot g^{e_t^{(n)}} \equiv 1 \pmod p$ without access
    /// to the dealer's secrets.
    pub fn term_mask(&self, term_index: usize) -> Result<&Element> {
        let correlated = self.ready()?;
        correlated.term_masks.get(term_index).ok_or_else(|| {
            Error::Protocol(format!("no term {term_index} in the signature"))
        })
    }

    /// Returns the node's additive share of $g^{e_t}$ for a term.
    pub fn output_share(&self, term_index: usize) -> Result<&Element> {
        let correlated = self.ready()?;
        correlated.output_shares.get(term_index).ok_or_else(|| {
            Error::Protocol(format!("no term {term_index} in the signature"))
        })
    }

    /// Computes this node's additive share of the expression value from the
    /// contributors' broadcasts.
    ///
    /// The broadcasts' disjoint union must assign one masked factor to
    /// every coordinate of the signature. For each term the node multiplies
    /// the masked factors together and weights the product with its output
    /// share:
    /// $$\sum_{t} M_t^{(n)} \cdot \prod_{j} \tilde{v}_{t,j} \bmod p.$$
    /// Summing the returned shares of all nodes reconstructs
    /// $\sum_t \prod_j v_{t,j}$.
    pub fn compute(
        &self,
        signature: &[usize],
        broadcasts: &[HashMap<Coord, Element>],
    ) -> Result<Element> {
        let correlated = self.ready()?;
        if signature != correlated.signature.as_slice() {
            return Err(Error::Protocol(String::from(
                "signature disagrees with the correlated instance",
            )));
        }

        let mut factors: HashMap<Coord, Element> = HashMap::new();
        for broadcast in broadcasts {
            for (coord, factor) in broadcast {
                if coord.0 >= signature.len() || coord.1 >= signature[coord.0] {
                    return Err(Error::Protocol(format!(
                        "coordinate ({}, {}) lies outside the signature",
                        coord.0, coord.1
                    )));
                }
                if factor.modulus() != &self.params.p {
                    return Err(Error::Protocol(String::from(
                        "masked factors must be residues modulo p",
                    )));
                }
                if factors.insert(*coord, factor.clone()).is_some() {
                    return Err(Error::Protocol(format!(
                        "coordinate ({}, {}) was broadcast by more than one contributor",
                        coord.0, coord.1
                    )));
                }
            }
        }

        for (term_index, &factor_count) in signature.iter().enumerate() {
            for factor_index in 0..factor_count {
                if !factors.contains_key(&(term_index, factor_index)) {
                    return Err(Error::Protocol(format!(
                        "the broadcasts omit coordinate ({term_index}, {factor_index})"
                    )));
                }
            }
        }

        let mut result = Element::new(BigUint::zero(), &self.params.p);
        for (term_index, &factor_count) in signature.iter().enumerate() {
            let mut term_product = factors[&(term_index, 0)].clone();
            for factor_index in 1..factor_count {
                term_product = term_product.multiply(&factors[&(term_index, factor_index)]);
            }
            result = result.add(&correlated.output_shares[term_index].multiply(&term_product));
        }

        Ok(result)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
