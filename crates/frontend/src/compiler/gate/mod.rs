// Copyright 2025 Irreducible Inc.
//! Gate emitters.
//!
//! Each emitter reduces its operands, appends exactly one gate to the assembler and binds the
//! gate's cells to variables. Constant operands are folded before anything is emitted, so gates
//! are never rewritten after the fact.

use ark_ff::AdditiveGroup;
use tessera_core::consts::PERMUTS;
use tessera_field::Fp;

use super::{
	cvar::{Cvar, Var},
	reduce::LINEAR_ARITY,
};

mod assert_eq;
mod boolean;
mod custom;
mod generic;

pub(crate) use assert_eq::assert_equal;
pub(crate) use boolean::assert_boolean;
pub(crate) use custom::custom;
pub(crate) use generic::{assert_mul, generic, mul, seal};

/// Places the three generic cells at the start of a full row of wired cells.
pub(crate) fn generic_cells(cells: [Option<Var>; 3]) -> [Option<Var>; PERMUTS] {
	let mut row = [None; PERMUTS];
	row[..3].copy_from_slice(&cells);
	row
}

/// Splits a reduced combination into its variable cells and their coefficients.
fn linear_slots(lc: &Cvar) -> ([Option<Var>; LINEAR_ARITY], [Fp; LINEAR_ARITY]) {
	debug_assert!(lc.terms().len() <= LINEAR_ARITY);
	let mut cells = [None; LINEAR_ARITY];
	let mut coeffs = [Fp::ZERO; LINEAR_ARITY];
	for (i, &(coeff, var)) in lc.terms().iter().enumerate() {
		cells[i] = Some(var);
		coeffs[i] = coeff;
	}
	(cells, coeffs)
}
