//! Defines all the math tools and functionalities needed for the
//! library.
//!
//! This module contains the implementation of the modular-arithmetic
//! structures that the library uses to compute the protocol: residues
//! modulo the field prime $p$ for values and masks, and residues modulo
//! $2q$ for mask exponents.

pub mod modular;
