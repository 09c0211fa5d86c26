// Copyright 2025 Irreducible Inc.
//! The frozen constraint system and its canonical encodings.
//!
//! A constraint system is an ordered table of gates. Row `r` of the table is `gates[r]`. Every
//! gate has [`PERMUTS`] wires; `gates[r].wires[c]` is the permutation successor (sigma) of the cell
//! `(r, c)`. Cells that hold the same variable form one cycle, every other cell points to itself.

use std::collections::HashSet;

use ark_ff::{AdditiveGroup, Field};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use tessera_field::{Fp, fp_from_hex, fp_to_hex};
use tessera_utils::{
	DeserializeBytes, SerializationError, SerializeBytes,
	bytes::{Buf, BufMut},
	impl_record_serialization,
	serialization::{deserialize_tag, deserialize_versioned, serialize_tag, serialize_versioned},
};

use crate::{
	consts::{GENERIC_COEFFS, PERMUTS},
	error::ConstraintSystemError,
};

/// A cell of the gate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wire {
	/// Gate index.
	pub row: usize,
	/// Column within the gate, less than [`PERMUTS`].
	pub col: usize,
}

impl Wire {
	/// Creates a wire pointing at `(row, col)`.
	pub const fn new(row: usize, col: usize) -> Self {
		Self { row, col }
	}

	/// The `PERMUTS` wires of `row` that each point to themselves.
	pub fn identity_row(row: usize) -> [Wire; PERMUTS] {
		std::array::from_fn(|col| Wire::new(row, col))
	}
}

impl_record_serialization!(Wire { row, col });

/// The kind of relation a gate encodes.
///
/// The declaration order is the binary tag assignment and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum GateKind {
	Zero,
	Generic,
	Poseidon,
	CompleteAdd,
	VarBaseMul,
	EndoMul,
	EndoMulScalar,
	Lookup,
	RangeCheck0,
	RangeCheck1,
	ForeignFieldAdd,
	ForeignFieldMul,
	Xor16,
	Rot64,
}

impl GateKind {
	/// All kinds in tag order.
	pub const ALL: [GateKind; 14] = [
		GateKind::Zero,
		GateKind::Generic,
		GateKind::Poseidon,
		GateKind::CompleteAdd,
		GateKind::VarBaseMul,
		GateKind::EndoMul,
		GateKind::EndoMulScalar,
		GateKind::Lookup,
		GateKind::RangeCheck0,
		GateKind::RangeCheck1,
		GateKind::ForeignFieldAdd,
		GateKind::ForeignFieldMul,
		GateKind::Xor16,
		GateKind::Rot64,
	];
}

impl SerializeBytes for GateKind {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		serialize_tag(self, &Self::ALL, "GateKind", write_buf)
	}
}

impl DeserializeBytes for GateKind {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		deserialize_tag(read_buf, &Self::ALL, "GateKind")
	}
}

/// One row of the gate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitGate {
	/// The relation this row encodes.
	#[serde(rename = "type")]
	pub typ: GateKind,
	/// Permutation successor of each of the first [`PERMUTS`] cells of this row.
	pub wires: [Wire; PERMUTS],
	/// Gate coefficients, written to JSON as hex of their canonical little-endian bytes.
	#[serde(serialize_with = "serialize_coeffs", deserialize_with = "deserialize_coeffs")]
	pub coeffs: Vec<Fp>,
}

impl CircuitGate {
	/// Creates a gate whose wires all point to themselves.
	pub fn new(typ: GateKind, row: usize, coeffs: Vec<Fp>) -> Self {
		Self {
			typ,
			wires: Wire::identity_row(row),
			coeffs,
		}
	}
}

impl_record_serialization!(CircuitGate { typ, wires, coeffs });

fn serialize_coeffs<S: Serializer>(coeffs: &[Fp], serializer: S) -> Result<S::Ok, S::Error> {
	serializer.collect_seq(coeffs.iter().map(fp_to_hex))
}

fn deserialize_coeffs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Fp>, D::Error> {
	<Vec<String> as Deserialize>::deserialize(deserializer)?
		.iter()
		.map(|s| fp_from_hex(s).map_err(serde::de::Error::custom))
		.collect()
}

/// The frozen constraint system handed to proving backends.
///
/// Two constraint systems are equivalent iff their [canonical bytes][Self::to_bytes] are equal.
///
/// # Clone
///
/// While this type is cloneable it may be expensive to do so since the constraint systems can
/// have many gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSystem {
	/// Number of leading gates that bind public inputs.
	pub public_input_size: usize,
	/// Rows reserved for zero-knowledge padding.
	pub zk_rows: usize,
	/// Least power of two `>= gates.len() + zk_rows`.
	pub domain_size: usize,
	/// The gate table in emission order.
	pub gates: Vec<CircuitGate>,
}

impl_record_serialization!(ConstraintSystem {
	public_input_size,
	zk_rows,
	domain_size,
	gates,
});

impl ConstraintSystem {
	/// Serialization format version for compatibility checking
	pub const SERIALIZATION_VERSION: u8 = 1;

	/// Creates a constraint system, deriving the domain size from the gate count.
	pub fn new(
		public_input_size: usize,
		zk_rows: usize,
		gates: Vec<CircuitGate>,
	) -> Result<Self, ConstraintSystemError> {
		let domain_size = Self::domain_size_for(gates.len(), zk_rows)?;
		Ok(Self {
			public_input_size,
			zk_rows,
			domain_size,
			gates,
		})
	}

	/// The least power of two that fits `n_gates` rows plus `zk_rows` padding rows.
	pub fn domain_size_for(n_gates: usize, zk_rows: usize) -> Result<usize, ConstraintSystemError> {
		n_gates
			.checked_add(zk_rows)
			.and_then(usize::checked_next_power_of_two)
			.ok_or(ConstraintSystemError::DomainSizeOverflow { n_gates, zk_rows })
	}

	/// Number of gates in the table.
	pub fn n_gates(&self) -> usize {
		self.gates.len()
	}

	/// Ensures that this constraint system is well-formed.
	///
	/// Specifically checks that:
	///
	/// - the domain size matches the gate count and zk rows.
	/// - public input rows are plain generic gates.
	/// - generic gates carry [`GENERIC_COEFFS`] coefficients.
	/// - every wire points inside the table and the wires form a permutation.
	pub fn validate(&self) -> Result<(), ConstraintSystemError> {
		let n_gates = self.gates.len();
		let expected = Self::domain_size_for(n_gates, self.zk_rows)?;
		if self.domain_size != expected {
			return Err(ConstraintSystemError::DomainSizeMismatch {
				n_gates,
				zk_rows: self.zk_rows,
				expected,
				actual: self.domain_size,
			});
		}

		if self.public_input_size > n_gates {
			return Err(ConstraintSystemError::PublicInputOutOfRange {
				public_input_size: self.public_input_size,
				n_gates,
			});
		}
		for (gate_index, gate) in self.gates[..self.public_input_size].iter().enumerate() {
			if gate.typ != GateKind::Generic || gate.coeffs != public_input_coeffs() {
				return Err(ConstraintSystemError::MalformedPublicInputRow { gate_index });
			}
		}

		let mut seen = HashSet::with_capacity(n_gates * PERMUTS);
		for (gate_index, gate) in self.gates.iter().enumerate() {
			if gate.typ == GateKind::Generic && gate.coeffs.len() != GENERIC_COEFFS {
				return Err(ConstraintSystemError::CoefficientCount {
					gate_index,
					expected: GENERIC_COEFFS,
					actual: gate.coeffs.len(),
				});
			}
			for (col, wire) in gate.wires.iter().enumerate() {
				if wire.row >= n_gates || wire.col >= PERMUTS {
					return Err(ConstraintSystemError::WireOutOfRange {
						gate_index,
						col,
						row: wire.row,
						target_col: wire.col,
						n_gates,
					});
				}
				// With every target in range, n*PERMUTS distinct targets make sigma a bijection.
				if !seen.insert(*wire) {
					return Err(ConstraintSystemError::SigmaNotBijection {
						row: wire.row,
						col: wire.col,
					});
				}
			}
		}
		Ok(())
	}

	/// The permutation successor of `wire`.
	pub fn sigma(&self, wire: Wire) -> Wire {
		self.gates[wire.row].wires[wire.col]
	}

	/// Returns every permutation cycle of length at least two.
	///
	/// Cycles are listed in row-major order of their first cell, and each cycle starts at its
	/// first cell in row-major order. The system must be [valid][Self::validate].
	pub fn permutation_cycles(&self) -> Vec<Vec<Wire>> {
		let mut visited = HashSet::new();
		let mut cycles = Vec::new();
		for row in 0..self.gates.len() {
			for col in 0..PERMUTS {
				let start = Wire::new(row, col);
				if visited.contains(&start) {
					continue;
				}
				let mut cycle = vec![start];
				visited.insert(start);
				let mut next = self.sigma(start);
				while next != start && visited.insert(next) {
					cycle.push(next);
					next = self.sigma(next);
				}
				if cycle.len() > 1 {
					cycles.push(cycle);
				}
			}
		}
		cycles
	}

	/// Canonical binary encoding, prefixed with [`Self::SERIALIZATION_VERSION`].
	pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
		let mut buf = Vec::new();
		serialize_versioned(Self::SERIALIZATION_VERSION, self, &mut buf)?;
		Ok(buf)
	}

	/// Decodes the output of [`Self::to_bytes`]. The whole input must be consumed.
	///
	/// The result is not [validated][Self::validate].
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
		let mut read_buf = bytes;
		let cs = deserialize_versioned(Self::SERIALIZATION_VERSION, "ConstraintSystem", &mut read_buf)?;
		if !read_buf.is_empty() {
			return Err(SerializationError::TrailingBytes {
				remaining: read_buf.len(),
			});
		}
		Ok(cs)
	}

	/// Canonical JSON encoding.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Decodes the output of [`Self::to_json`]. The result is not [validated][Self::validate].
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// SHA-256 of the canonical bytes.
	pub fn digest(&self) -> Result<[u8; 32], SerializationError> {
		Ok(Sha256::digest(self.to_bytes()?).into())
	}

	/// Lowercase hex of [`Self::digest`].
	pub fn digest_hex(&self) -> Result<String, SerializationError> {
		Ok(hex::encode(self.digest()?))
	}
}

/// Coefficients of a public input row: `1 * w0 = public_input`.
pub fn public_input_coeffs() -> Vec<Fp> {
	vec![Fp::ONE, Fp::ZERO, Fp::ZERO, Fp::ZERO, Fp::ZERO]
}
