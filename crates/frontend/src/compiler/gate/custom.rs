// Copyright 2025 Irreducible Inc.
//! Gates of any kind with caller-provided coefficients.
//!
//! Operands are sealed to variables and occupy the wired cells in order. The relation a
//! non-generic kind encodes belongs to the backend; the front end only wires it.

use tessera_core::{
	ConstraintSystemError, GateKind,
	consts::{GENERIC_COEFFS, PERMUTS},
};
use tessera_field::Fp;

use super::generic::seal;
use crate::{
	compiler::{assembler::Assembler, cvar::Cvar},
	error::Error,
};

pub(crate) fn custom(
	asm: &mut Assembler,
	kind: GateKind,
	operands: &[Cvar],
	coeffs: Vec<Fp>,
) -> Result<usize, Error> {
	if operands.len() > PERMUTS {
		return Err(Error::TooManyOperands {
			count: operands.len(),
		});
	}
	if kind == GateKind::Generic && coeffs.len() != GENERIC_COEFFS {
		return Err(ConstraintSystemError::CoefficientCount {
			gate_index: asm.n_gates(),
			expected: GENERIC_COEFFS,
			actual: coeffs.len(),
		}
		.into());
	}
	let mut cells = [None; PERMUTS];
	for (cell, operand) in cells.iter_mut().zip(operands) {
		*cell = Some(seal(asm, operand)?);
	}
	asm.append_gate(kind, cells, coeffs, None)
}
