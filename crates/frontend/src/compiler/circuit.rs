// Copyright 2025 Irreducible Inc.
use tessera_core::{ConstraintSystem, ProvingBackend, VerificationKey, Wire, verify::verify_witness};

use super::witness::Witness;
use crate::error::Error;

/// Number of variables of each origin allocated while building.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VarCounts {
	/// Variables declared as public inputs.
	pub public_inputs: usize,
	/// Free variables introduced by the circuit author.
	pub witnesses: usize,
	/// Variables introduced by the compiler, each defined by exactly one gate.
	pub intermediates: usize,
}

/// An artifact that represents a built circuit.
///
/// The difference from [`ConstraintSystem`] is that a circuit also retains the witness table
/// when it was built in witness mode, along with a few statistics of the building phase.
pub struct Circuit {
	constraint_system: ConstraintSystem,
	witness: Option<Witness>,
	var_counts: VarCounts,
	n_cycles: usize,
}

impl Circuit {
	/// Only used by the assembler when freezing.
	pub(crate) fn new(
		constraint_system: ConstraintSystem,
		witness: Option<Witness>,
		var_counts: VarCounts,
		n_cycles: usize,
	) -> Self {
		Self {
			constraint_system,
			witness,
			var_counts,
			n_cycles,
		}
	}

	/// Returns the constraint system for this circuit.
	pub fn constraint_system(&self) -> &ConstraintSystem {
		&self.constraint_system
	}

	/// Consumes the circuit, returning the frozen constraint system.
	pub fn into_constraint_system(self) -> ConstraintSystem {
		self.constraint_system
	}

	/// The witness table, present when the circuit was built in witness mode.
	pub fn witness(&self) -> Option<&Witness> {
		self.witness.as_ref()
	}

	/// Returns the number of gates in this circuit, public input rows included.
	pub fn n_gates(&self) -> usize {
		self.constraint_system.n_gates()
	}

	/// Variable counts by origin.
	pub fn var_counts(&self) -> VarCounts {
		self.var_counts
	}

	/// Number of permutation cycles spanning more than one cell.
	pub fn n_cycles(&self) -> usize {
		self.n_cycles
	}

	/// Checks the witness table against every gate equation and copy constraint.
	pub fn verify(&self) -> Result<(), Error> {
		let witness = self.witness.as_ref().ok_or(Error::NotInProver)?;
		verify_witness(&self.constraint_system, &witness.public_inputs, &witness.rows)
			.map_err(Error::Verification)
	}

	/// Canonical binary encoding of the constraint system.
	pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
		Ok(self.constraint_system.to_bytes()?)
	}

	/// Canonical JSON encoding of the constraint system.
	pub fn to_json(&self) -> Result<String, Error> {
		Ok(self.constraint_system.to_json()?)
	}

	/// SHA-256 of [`Self::to_bytes`].
	pub fn digest(&self) -> Result<[u8; 32], Error> {
		Ok(self.constraint_system.digest()?)
	}

	/// Lowercase hex of [`Self::digest`].
	pub fn digest_hex(&self) -> Result<String, Error> {
		Ok(self.constraint_system.digest_hex()?)
	}

	/// See [`ConstraintSystem::permutation_cycles`].
	pub fn permutation_cycles(&self) -> Vec<Vec<Wire>> {
		self.constraint_system.permutation_cycles()
	}

	/// Hands the frozen constraint system to `backend` for verification key generation.
	pub fn compile_with(&self, backend: &dyn ProvingBackend) -> Result<VerificationKey, Error> {
		let _span = tracing::debug_span!("compile_with", backend = backend.name()).entered();
		Ok(backend.compile(&self.constraint_system)?)
	}
}
