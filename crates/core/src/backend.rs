// Copyright 2025 Irreducible Inc.
//! The seam between the front end and proving backends.
//!
//! A backend is selected per call: the same frozen [`ConstraintSystem`] can be handed to several
//! implementations side by side and their verification keys compared.

use sha2::{Digest, Sha256};
use tessera_utils::{
	SerializationError, SerializeBytes, impl_record_serialization,
	serialization::{deserialize_versioned, serialize_versioned},
};

use crate::{constraint_system::ConstraintSystem, error::ConstraintSystemError};

/// Error returned by a [`ProvingBackend`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
	#[error("invalid constraint system: {0}")]
	InvalidConstraintSystem(#[from] ConstraintSystemError),
	#[error("serialization error: {0}")]
	Serialization(#[from] SerializationError),
	#[error("backend {backend} rejected the constraint system: {reason}")]
	Rejected { backend: String, reason: String },
}

/// The backend-derived artifact committing to a constraint system's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
	/// Name of the backend that produced the key.
	pub backend: String,
	/// Number of public inputs the key expects.
	pub public_input_size: usize,
	/// Evaluation domain size.
	pub domain_size: usize,
	/// Commitment to the gate table and permutation.
	pub commitment: [u8; 32],
}

impl_record_serialization!(VerificationKey {
	backend,
	public_input_size,
	domain_size,
	commitment,
});

impl VerificationKey {
	/// Serialization format version for compatibility checking
	pub const SERIALIZATION_VERSION: u8 = 1;

	/// Version-prefixed binary encoding.
	pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
		let mut buf = Vec::new();
		serialize_versioned(Self::SERIALIZATION_VERSION, self, &mut buf)?;
		Ok(buf)
	}

	/// Decodes the output of [`Self::to_bytes`].
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
		let mut read_buf = bytes;
		let vk = deserialize_versioned(Self::SERIALIZATION_VERSION, "VerificationKey", &mut read_buf)?;
		if !read_buf.is_empty() {
			return Err(SerializationError::TrailingBytes {
				remaining: read_buf.len(),
			});
		}
		Ok(vk)
	}
}

/// A proving backend that derives verification keys from frozen constraint systems.
///
/// Calls are synchronous and non-cancellable from the front end's point of view.
pub trait ProvingBackend {
	/// Short identifier of the backend, recorded in the keys it produces.
	fn name(&self) -> &str;

	/// Derives a verification key for `cs`.
	fn compile(&self, cs: &ConstraintSystem) -> Result<VerificationKey, BackendError>;
}

/// Reference backend whose commitment is a SHA-256 over the constraint system shape.
///
/// The hash covers the canonical bytes and the permutation cycles, each cycle prefixed with
/// its length.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeCommitmentBackend;

impl ShapeCommitmentBackend {
	const DOMAIN_SEPARATOR: &'static [u8] = b"tessera.shape-commitment.v1";
}

impl ProvingBackend for ShapeCommitmentBackend {
	fn name(&self) -> &str {
		"shape-commitment"
	}

	fn compile(&self, cs: &ConstraintSystem) -> Result<VerificationKey, BackendError> {
		cs.validate()?;

		let mut hasher = Sha256::new();
		hasher.update(Self::DOMAIN_SEPARATOR);
		hasher.update(cs.to_bytes()?);
		let mut cycles = Vec::new();
		for cycle in cs.permutation_cycles() {
			cycle.serialize(&mut cycles)?;
		}
		hasher.update(&cycles);

		Ok(VerificationKey {
			backend: self.name().to_string(),
			public_input_size: cs.public_input_size,
			domain_size: cs.domain_size,
			commitment: hasher.finalize().into(),
		})
	}
}

#[cfg(test)]
mod tests {
	use ark_ff::Field;

	use super::*;
	use crate::{
		Fp,
		constraint_system::{CircuitGate, GateKind, Wire},
	};

	fn square_gate(row: usize) -> CircuitGate {
		// w0 * w1 - w2 = 0
		CircuitGate::new(
			GateKind::Generic,
			row,
			vec![Fp::from(0u64), Fp::from(0u64), -Fp::ONE, Fp::ONE, Fp::from(0u64)],
		)
	}

	fn sample(wired: bool) -> ConstraintSystem {
		let mut gate = square_gate(0);
		if wired {
			gate.wires[0] = Wire::new(0, 1);
			gate.wires[1] = Wire::new(0, 0);
		}
		ConstraintSystem::new(0, 3, vec![gate]).unwrap()
	}

	#[test]
	fn test_compile_is_deterministic() {
		let backend = ShapeCommitmentBackend;
		let a = backend.compile(&sample(true)).unwrap();
		let b = backend.compile(&sample(true)).unwrap();
		assert_eq!(a, b);
		assert_eq!(a.backend, "shape-commitment");
		assert_eq!(a.domain_size, 4);
	}

	#[test]
	fn test_permutation_changes_commitment() {
		let backend = ShapeCommitmentBackend;
		let wired = backend.compile(&sample(true)).unwrap();
		let unwired = backend.compile(&sample(false)).unwrap();
		assert_ne!(wired.commitment, unwired.commitment);
	}

	#[test]
	fn test_invalid_system_is_rejected() {
		let mut cs = sample(true);
		cs.domain_size = 2;
		assert!(matches!(
			ShapeCommitmentBackend.compile(&cs),
			Err(BackendError::InvalidConstraintSystem(_))
		));
	}

	#[test]
	fn test_verification_key_bytes() {
		let vk = ShapeCommitmentBackend.compile(&sample(true)).unwrap();
		let bytes = vk.to_bytes().unwrap();
		assert_eq!(bytes[0], VerificationKey::SERIALIZATION_VERSION);
		assert_eq!(VerificationKey::from_bytes(&bytes).unwrap(), vk);
		assert!(VerificationKey::from_bytes(&bytes[..bytes.len() - 1]).is_err());
	}
}
