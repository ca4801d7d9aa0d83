//! Nimc is a small library implementing the cryptographic core of a
//! non-interactive secure multi-party computation (MPC) protocol that
//! evaluates sum-of-products expressions over a prime field. The purpose of
//! this library **is not** to implement the networking and communication
//! required for a real-world deployment of the protocol. Instead, we aim
//! for a simpler representation in which all of these tasks are done
//! locally and the communication is simulated by passing values between
//! the parties of a protocol instance.
//!
//! An instance involves three roles:
//!
//! - A **dealer** that simulates the preprocessing phase: for every term of
//!   the expression it samples a random exponent $e_t$, hands each node an
//!   additive share of $e_t$ modulo $2q$, and an additive share of
//!   $g^{e_t} \bmod p$ (see [`protocol::preprocess`]).
//! - A set of **nodes** that perform the computation. Each
//!   [`Node`](node::Node) derives a table of multiplicative masks from its
//!   exponent shares, issues masks to contributors, and later computes one
//!   additive share of the result.
//! - A set of **contributors** that hold the plaintext inputs. Each
//!   contributor owns a disjoint subset of the `(term, factor)` coordinates
//!   of the expression, multiplies every owned input by the combined mask
//!   of all nodes at that coordinate (see [`protocol::mask_inputs`]), and
//!   broadcasts the masked factors.
//!
//! The online phase is non-interactive: after the single broadcast round,
//! every node computes its result share locally and the plaintext result is
//! the sum of all shares modulo $p$. No node ever sees an unmasked input,
//! and no strict subset of nodes can remove a mask on its own.
//!
//! # Examples
//!
//! ## Evaluating a two-term expression
//!
//! Here, three contributors supply the inputs of the expression
//! $x \cdot y \cdot z + u \cdot v$ and three nodes compute it. The shape of
//! the expression is public and written as the signature `[3, 2]`: two
//! terms, with three and two factors.
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use nimc::error::Error;
//! use nimc::math::modular::Element;
//! use nimc::node::Node;
//! use nimc::protocol;
//! use nimc::utils::prg::Prg;
//! use num_bigint::BigUint;
//!
//! fn main() -> Result<(), Error> {
//!     // Seed the generator from the operating system entropy source.
//!     let mut prg = Prg::from_entropy()?;
//!
//!     // Create the three nodes that will perform the computation. All of
//!     // them hold the default public parameters.
//!     let mut nodes = vec![Node::new(), Node::new(), Node::new()];
//!     let p = nodes[0].params().p.clone();
//!
//!     // Simulate the preprocessing phase: the dealer distributes the
//!     // correlated randomness for the signature to every node.
//!     let signature = [3, 2];
//!     protocol::preprocess(&signature, &mut nodes, &mut prg)?;
//!
//!     // The first contributor owns the coordinates (0, 0) and (1, 0) and
//!     // holds the plaintext inputs 1 and 4. It requests the masks for its
//!     // coordinates from every node and masks its inputs with them.
//!     let mut inputs_a = HashMap::new();
//!     inputs_a.insert((0, 0), Element::new(BigUint::from(1u32), &p));
//!     inputs_a.insert((1, 0), Element::new(BigUint::from(4u32), &p));
//!     let coords_a: Vec<_> = inputs_a.keys().copied().collect();
//!     let masks_for_a = nodes
//!         .iter()
//!         .map(|node| node.masks(&coords_a))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     let masked_a = protocol::mask_inputs(&inputs_a, &masks_for_a)?;
//!
//!     // The second contributor owns (0, 1) and (1, 1) with inputs 2 and 5.
//!     let mut inputs_b = HashMap::new();
//!     inputs_b.insert((0, 1), Element::new(BigUint::from(2u32), &p));
//!     inputs_b.insert((1, 1), Element::new(BigUint::from(5u32), &p));
//!     let coords_b: Vec<_> = inputs_b.keys().copied().collect();
//!     let masks_for_b = nodes
//!         .iter()
//!         .map(|node| node.masks(&coords_b))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     let masked_b = protocol::mask_inputs(&inputs_b, &masks_for_b)?;
//!
//!     // The third contributor owns the remaining coordinate (0, 2) with
//!     // input 3.
//!     let mut inputs_c = HashMap::new();
//!     inputs_c.insert((0, 2), Element::new(BigUint::from(3u32), &p));
//!     let coords_c: Vec<_> = inputs_c.keys().copied().collect();
//!     let masks_for_c = nodes
//!         .iter()
//!         .map(|node| node.masks(&coords_c))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     let masked_c = protocol::mask_inputs(&inputs_c, &masks_for_c)?;
//!
//!     // Every contributor broadcasts its masked factors to every node, and
//!     // each node locally computes one additive share of the result.
//!     let broadcast = vec![masked_a, masked_b, masked_c];
//!     let mut result = nodes[0].compute(&signature, &broadcast)?;
//!     for node in &nodes[1..] {
//!         result = result.add(&node.compute(&signature, &broadcast)?);
//!     }
//!
//!     // The sum of the shares reconstructs 1*2*3 + 4*5.
//!     assert_eq!(result.value(), &BigUint::from(26u32));
//!     Ok(())
//! }
//! ```
//!
//! ## A reproducible single-term instance
//!
//! Protocol functions take the pseudo-random generator as an explicit
//! parameter, so a run can be made deterministic by seeding it. Here a
//! single contributor supplies the only input of the one-factor expression
//! and two nodes compute it.
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use nimc::error::Error;
//! use nimc::math::modular::Element;
//! use nimc::node::Node;
//! use nimc::protocol;
//! use nimc::utils::prg::Prg;
//! use num_bigint::BigUint;
//!
//! fn main() -> Result<(), Error> {
//!     // A fixed seed reproduces the same masks on every run.
//!     let mut prg = Prg::new(&[1, 2]);
//!
//!     let mut nodes = vec![Node::new(), Node::new()];
//!     let p = nodes[0].params().p.clone();
//!
//!     let signature = [1];
//!     protocol::preprocess(&signature, &mut nodes, &mut prg)?;
//!
//!     let mut inputs = HashMap::new();
//!     inputs.insert((0, 0), Element::new(BigUint::from(7u32), &p));
//!     let coords: Vec<_> = inputs.keys().copied().collect();
//!     let masks = nodes
//!         .iter()
//!         .map(|node| node.masks(&coords))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     let broadcast = vec![protocol::mask_inputs(&inputs, &masks)?];
//!
//!     let share_0 = nodes[0].compute(&signature, &broadcast)?;
//!     let share_1 = nodes[1].compute(&signature, &broadcast)?;
//!
//!     assert_eq!(share_0.add(&share_1).value(), &BigUint::from(7u32));
//!     Ok(())
//! }
//! ```
//!
//! # Disclaimer
//!
//! The protocol assumes honest-but-curious parties that follow it
//! faithfully: there is no protection against a node or contributor that
//! deviates, and reconstruction needs the result share of every node. The library simulates the dealer and the broadcast channel
//! locally and does not authenticate parties; those concerns belong to the
//! transport layer of a deployment.

pub mod error;
pub mod math;
pub mod node;
pub mod params;
pub mod protocol;
pub mod utils;
