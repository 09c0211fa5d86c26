// Copyright 2025 Irreducible Inc.
//! Hosts error definitions for the core crate.

use crate::consts::PERMUTS;

/// Constraint system related error.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintSystemError {
	#[error("domain size must be {expected} for {n_gates} gates and {zk_rows} zk rows, got {actual}")]
	DomainSizeMismatch {
		n_gates: usize,
		zk_rows: usize,
		expected: usize,
		actual: usize,
	},
	#[error("domain size for {n_gates} gates and {zk_rows} zk rows overflows usize")]
	DomainSizeOverflow { n_gates: usize, zk_rows: usize },
	#[error("public input size {public_input_size} exceeds gate count {n_gates}")]
	PublicInputOutOfRange {
		public_input_size: usize,
		n_gates: usize,
	},
	#[error("public input row {gate_index} is not a generic gate with coefficients [1, 0, 0, 0, 0]")]
	MalformedPublicInputRow { gate_index: usize },
	#[error("gate #{gate_index} wire {col} points to ({row}, {target_col}), outside {n_gates} rows x {PERMUTS} columns")]
	WireOutOfRange {
		gate_index: usize,
		col: usize,
		row: usize,
		target_col: usize,
		n_gates: usize,
	},
	#[error("cell ({row}, {col}) is the permutation successor of more than one cell")]
	SigmaNotBijection { row: usize, col: usize },
	#[error("generic gate #{gate_index} has {actual} coefficients, expected {expected}")]
	CoefficientCount {
		gate_index: usize,
		expected: usize,
		actual: usize,
	},
}
