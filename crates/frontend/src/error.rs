// Copyright 2025 Irreducible Inc.
//! Errors surfaced while building a circuit.

use tessera_core::{BackendError, ConstraintSystemError, consts::PERMUTS};
use tessera_field::{EncodingError, FieldError, Fp};
use tessera_utils::SerializationError;

use crate::compiler::Var;

/// Circuit construction error.
///
/// Errors raised after some gates of an emission were appended abort the build: the builder
/// then answers every call with [`Error::Aborted`] and no partial constraint system is produced.
/// Messages name the gate index and variable involved.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("gate #{gate_index} references {var} before the gate that defines it")]
	PermutationConsistency { gate_index: usize, var: Var },
	#[error("{var} has no defining gate or witness value (at gate #{gate_index})")]
	IncompleteWitness { var: Var, gate_index: usize },
	#[error("division by zero")]
	DivisionByZero,
	#[error("constant assertion failed at gate #{gate_index}: {left} != {right}")]
	ConstantMismatch {
		gate_index: usize,
		left: Fp,
		right: Fp,
	},
	#[error("gate #{gate_index} is not satisfied by the witness")]
	Unsatisfied { gate_index: usize },
	#[error("witness values are only available when building with a witness")]
	NotInProver,
	#[error("public inputs must be declared before any other gate, {n_gates} gates already emitted")]
	PublicInputAfterGates { n_gates: usize },
	#[error("a gate has {PERMUTS} wired cells, got {count} operands")]
	TooManyOperands { count: usize },
	#[error("circuit builder was already built")]
	AlreadyBuilt,
	#[error("circuit building was aborted by an earlier error: {0}")]
	Aborted(String),
	#[error("witness verification failed: {0}")]
	Verification(String),
	#[error("encoding error: {0}")]
	Encoding(#[from] EncodingError),
	#[error("serialization error: {0}")]
	Serialization(#[from] SerializationError),
	#[error("invalid constraint system: {0}")]
	ConstraintSystem(#[from] ConstraintSystemError),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("backend error: {0}")]
	Backend(#[from] BackendError),
}

impl Error {
	/// Whether the error may leave a partially appended gate sequence behind.
	pub(crate) fn aborts_build(&self) -> bool {
		matches!(
			self,
			Error::PermutationConsistency { .. }
				| Error::Unsatisfied { .. }
				| Error::IncompleteWitness { .. }
		)
	}
}

impl From<FieldError> for Error {
	fn from(err: FieldError) -> Self {
		match err {
			FieldError::DivisionByZero => Error::DivisionByZero,
		}
	}
}
