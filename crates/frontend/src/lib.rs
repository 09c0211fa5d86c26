// Copyright 2025 Irreducible Inc.

//! Circuit construction frontend for gate tables over the BN254 scalar field.
//!
//! This crate provides the [`CircuitBuilder`] API for constructing arithmetic circuits that
//! compile to a frozen [`ConstraintSystem`]: a list of generic gates with five coefficients each,
//! plus the copy-constraint permutation tying together cells that hold the same variable.
//!
//! # Usage Flow
//!
//! Use [`CircuitBuilder`] to construct your circuit. Declare public inputs with
//! `add_public_input()` first, then introduce private values with `exists()`. Both return
//! [`Cvar`]s, linear combinations of variables that can be added, subtracted and scaled for
//! free. Methods like `mul()`, `inv()` and `assert_equal()` emit the gates.
//!
//! When you call `build()`, the builder closes every permutation cycle and freezes the gate
//! table into a [`Circuit`]. The circuit exposes the canonical binary and JSON encodings of the
//! constraint system, its digest, and hands it to a [`ProvingBackend`] for verification key
//! generation.
//!
//! Building with [`CircuitBuilder::with_witness`] evaluates every value along the way and
//! produces a [`Witness`] table that [`Circuit::verify`] checks against the gates.
//!
//! Use [`CircuitStat`] to inspect gate counts and the circuit shape.
//!
//! [`ConstraintSystem`]: tessera_core::ConstraintSystem
//! [`ProvingBackend`]: tessera_core::ProvingBackend

#![warn(missing_docs)]

mod compiler;
mod error;
pub mod stat;

pub use compiler::{
	CircuitBuilder, LINEAR_ARITY, Options, Term, Var, VarCounts, Witness,
	circuit::Circuit,
	cvar::Cvar,
};
pub use error::Error;
pub use stat::CircuitStat;
