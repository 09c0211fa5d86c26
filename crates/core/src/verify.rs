// Copyright 2025 Irreducible Inc.
//! Routines for checking whether the
//! [constraint system][`crate::constraint_system::ConstraintSystem`] is satisfied by a witness
//! table.
//!
//! Generic gates are checked against their equation, every gate is checked against the copy
//! constraints of the permutation. Other gate kinds carry backend-defined relations and are only
//! copy-checked here.

use ark_ff::AdditiveGroup;

use crate::{
	Fp,
	constraint_system::{CircuitGate, ConstraintSystem, GateKind, Wire},
	consts::{COLUMNS, GENERIC_COEFFS, PERMUTS},
};

/// Evaluates `sl*w0 + sr*w1 + so*w2 + sm*w0*w1 + sc` for a generic gate row.
pub fn eval_generic(coeffs: &[Fp], row: &[Fp; COLUMNS]) -> Fp {
	let [sl, sr, so, sm, sc] = match <[Fp; GENERIC_COEFFS]>::try_from(coeffs) {
		Ok(coeffs) => coeffs,
		Err(_) => return Fp::ZERO,
	};
	sl * row[0] + sr * row[1] + so * row[2] + sm * row[0] * row[1] + sc
}

/// Verifies that a generic gate is satisfied. `public_input` is subtracted on public rows.
pub fn verify_generic_gate(
	gate: &CircuitGate,
	row: &[Fp; COLUMNS],
	public_input: Option<Fp>,
) -> Result<(), String> {
	if gate.coeffs.len() != GENERIC_COEFFS {
		return Err(format!(
			"generic gate has {} coefficients, expected {GENERIC_COEFFS}",
			gate.coeffs.len()
		));
	}
	let result = eval_generic(&gate.coeffs, row) - public_input.unwrap_or(Fp::ZERO);
	if result != Fp::ZERO {
		Err(format!(
			"generic gate failed: w = ({}, {}, {}) evaluates to {result} (expected 0)",
			row[0], row[1], row[2]
		))
	} else {
		Ok(())
	}
}

/// Verifies all gates and copy constraints of a constraint system against a witness table.
///
/// The witness must have one row per gate; padding rows are not part of the table.
pub fn verify_witness(
	cs: &ConstraintSystem,
	public_inputs: &[Fp],
	witness: &[[Fp; COLUMNS]],
) -> Result<(), String> {
	cs.validate()
		.map_err(|e| format!("constraint system validation failed: {e}"))?;

	if public_inputs.len() != cs.public_input_size {
		return Err(format!(
			"expected {} public inputs, got {}",
			cs.public_input_size,
			public_inputs.len()
		));
	}
	if witness.len() != cs.gates.len() {
		return Err(format!(
			"witness has {} rows but the constraint system has {} gates",
			witness.len(),
			cs.gates.len()
		));
	}

	for (i, (gate, row)) in cs.gates.iter().zip(witness).enumerate() {
		if gate.typ == GateKind::Generic {
			let public_input = public_inputs.get(i).copied();
			verify_generic_gate(gate, row, public_input)
				.map_err(|e| format!("gate {i} failed: {e}"))?;
		}
	}

	for (i, gate) in cs.gates.iter().enumerate() {
		for col in 0..PERMUTS {
			let Wire { row, col: next_col } = gate.wires[col];
			if witness[i][col] != witness[row][next_col] {
				return Err(format!(
					"copy constraint failed: cell ({i}, {col}) holds {} but its successor ({row}, {next_col}) holds {}",
					witness[i][col], witness[row][next_col]
				));
			}
		}
	}
	Ok(())
}
