// Copyright 2025 Irreducible Inc.
//! Concrete values, available when a circuit is built with a witness.

use cranelift_entity::SecondaryMap;
use tessera_core::consts::COLUMNS;
use tessera_field::Fp;

use super::cvar::Var;

/// Values of the variables assigned so far.
#[derive(Default)]
pub(crate) struct WitnessStore {
	values: SecondaryMap<Var, Option<Fp>>,
}

impl WitnessStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&mut self, var: Var, value: Fp) {
		self.values[var] = Some(value);
	}

	pub fn get(&self, var: Var) -> Option<Fp> {
		self.values[var]
	}
}

/// The assignment produced by a witness-mode build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
	/// Values of the public inputs, in declaration order.
	pub public_inputs: Vec<Fp>,
	/// One row of cell values per gate. Cells that are not bound to a variable hold zero.
	pub rows: Vec<[Fp; COLUMNS]>,
}
