//! Implements the protocol phases that surround the nodes: the additive
//! sharing primitive, the dealer's preprocessing, and the contributor-side
//! masking of inputs.
//!
//! The protocol evaluates a sum-of-products expression
//! $$\sum_{t} \prod_{j} v_{t,j}$$
//! without any node learning an individual input. The interactive cost is
//! paid once, up front: [`preprocess`] simulates a dealer of correlated
//! randomness that, for every term $t$, samples an exponent $e_t$ and hands
//! each node an additive share of $e_t$ and an additive share of
//! $g^{e_t} \bmod p$. The online phase is a single broadcast of masked
//! factors followed by purely local arithmetic inside
//! [`Node::compute`](crate::node::Node::compute).
//!
//! Exponent shares are taken modulo $2q$ rather than modulo the generator
//! order $q$. During correlation each node re-shares the *negated* exponent
//! share, and representing that negation as a non-negative residue needs a
//! modulus strictly larger than $q$; since $2q$ is a multiple of the order,
//! $g^{x \bmod 2q} = g^{x \bmod q}$ and the masks are unaffected.

use std::collections::HashMap;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::math::modular::Element;
use crate::node::{Coord, Node};
use crate::utils::prg::Prg;

pub(crate) fn validate_signature(signature: &[usize]) -> Result<()> {
    if signature.is_empty() {
        return Err(Error::Parameter(String::from(
            "signature must contain at least one term",
        )));
    }
    if let Some(term_index) = signature.iter().position(|&factor_count| factor_count == 0) {
        return Err(Error::Parameter(format!(
            "term {term_index} of the signature has no factors"
        )));
    }

    Ok(())
}

/// Produces `quantity` additive shares of `secret` modulo `modulus`.
///
/// All but the first share are sampled uniformly from $[0, m)$; the first
/// share is the difference that closes the sum, so
/// $$\sum_i r_i \equiv s \pmod{m}.$$
/// Any strict subset of the output is uniformly distributed and carries no
/// information about the secret.
///
/// Negative secrets are accepted and reduce to their non-negative
/// representative, which is what the correlation step relies on when it
/// shares a negated exponent.
pub fn split(
    secret: &BigInt,
    modulus: &BigUint,
    quantity: usize,
    prg: &mut Prg,
) -> Result<Vec<Element>> {
    if modulus.is_zero() {
        return Err(Error::Parameter(String::from(
            "sharing modulus must be positive",
        )));
    }
    if quantity == 0 {
        return Err(Error::Parameter(String::from(
            "share quantity must be at least one",
        )));
    }

    let mut shares = Vec::with_capacity(quantity);
    let mut sum = Element::new(BigUint::zero(), modulus);
    for _ in 0..quantity - 1 {
        let share = Element::random(modulus, prg);
        sum = sum.add(&share);
        shares.push(share);
    }

    let closing = Element::from_integer(secret, modulus).subtract(&sum);
    shares.insert(0, closing);

    Ok(shares)
}

/// Simulates the dealer of the preprocessing phase for the supplied
/// signature and collection of nodes.
///
/// For every term $t$ the dealer samples an exponent $e_t$ uniformly from
/// $[0, 2q)$, splits $e_t$ additively modulo $2q$, splits the mask
/// $g^{e_t} \bmod p$ additively modulo $p$, and delivers one share of each
/// kind per term to every node via
/// [`Node::correlate`](crate::node::Node::correlate). After it returns,
/// every node is ready to issue masks and to compute result shares; the
/// dealer itself keeps no state and plays no role in the online phase.
///
/// All nodes must hold the same public parameters. A single node is
/// accepted: the instance degenerates to a local evaluation but follows the
/// identical code path.
pub fn preprocess(signature: &[usize], nodes: &mut [Node], prg: &mut Prg) -> Result<()> {
    validate_signature(signature)?;
    if nodes.is_empty() {
        return Err(Error::Parameter(String::from(
            "preprocessing requires at least one node",
        )));
    }

    let params = nodes[0].params().clone();
    if nodes.iter().any(|node| node.params() != &params) {
        return Err(Error::Parameter(String::from(
            "all nodes of an instance must hold the same parameters",
        )));
    }

    let exponent_modulus = params.exponent_modulus();
    let generator = params.generator();

    let mut exponent_shares: Vec<Vec<Element>> = vec![Vec::new(); nodes.len()];
    let mut output_shares: Vec<Vec<Element>> = vec![Vec::new(); nodes.len()];

    for _ in signature {
        let exponent = Element::random(&exponent_modulus, prg);
        let mask = generator.pow(exponent.value());

        let per_node_exponents = split(
            &BigInt::from(exponent.value().clone()),
            &exponent_modulus,
            nodes.len(),
            prg,
        )?;
        let per_node_outputs = split(
            &BigInt::from(mask.value().clone()),
            &params.p,
            nodes.len(),
            prg,
        )?;

        for (node_index, share) in per_node_exponents.into_iter().enumerate() {
            exponent_shares[node_index].push(share);
        }
        for (node_index, share) in per_node_outputs.into_iter().enumerate() {
            output_shares[node_index].push(share);
        }
    }

    for ((node, exponents), outputs) in nodes
        .iter_mut()
        .zip(exponent_shares)
        .zip(output_shares)
    {
        node.correlate(signature, exponents, outputs, prg)?;
    }

    Ok(())
}

/// Masks a contributor's plaintext inputs with the masks collected from
/// every node.
///
/// For each owned coordinate the masks from all nodes are combined
/// multiplicatively and applied to the plaintext:
/// $$\tilde{v}_{t,j} = v_{t,j} \cdot \prod_{n} m^{(n)}_{t,j} \bmod p.$$
/// The result is the broadcast the contributor sends to every node. Each
/// per-node map must cover exactly the contributor's coordinate set; a
/// missing entry means the contributor and that node disagree about
/// ownership and is reported as a protocol violation.
pub fn mask_inputs(
    coords_to_values: &HashMap<Coord, Element>,
    masks_from_nodes: &[HashMap<Coord, Element>],
) -> Result<HashMap<Coord, Element>> {
    let mut masked = HashMap::with_capacity(coords_to_values.len());

    for (coord, value) in coords_to_values {
        let mut factor = value.clone();
        for node_masks in masks_from_nodes {
            let mask = node_masks.get(coord).ok_or_else(|| {
                Error::Protocol(format!(
                    "a node supplied no mask for coordinate ({}, {})",
                    coord.0, coord.1
                ))
            })?;
            factor = factor.multiply(mask);
        }
        masked.insert(*coord, factor);
    }

    Ok(masked)
}
