// Copyright 2025 Irreducible Inc.
//! Permutation builder.
//!
//! Records, per variable, every cell it was bound to in binding order. Binding order is the
//! row-major order of gate emission, so each variable's cells form one cycle in that order. A
//! variable bound once, and every unbound cell, maps to itself.

use cranelift_entity::SecondaryMap;
use tessera_core::{Wire, consts::PERMUTS};

use super::cvar::Var;

#[derive(Default)]
pub(crate) struct Wiring {
	cells: SecondaryMap<Var, Vec<Wire>>,
}

impl Wiring {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bind(&mut self, var: Var, wire: Wire) {
		self.cells[var].push(wire);
	}

	/// Cells bound to `var`, in binding order.
	pub fn cells(&self, var: Var) -> &[Wire] {
		&self.cells[var]
	}

	/// Number of cycles that span more than one cell.
	pub fn n_cycles(&self) -> usize {
		self.cells.values().filter(|cells| cells.len() > 1).count()
	}

	/// The successor of every cell of an `n_rows` table.
	pub fn sigma(&self, n_rows: usize) -> Vec<[Wire; PERMUTS]> {
		let mut sigma: Vec<[Wire; PERMUTS]> = (0..n_rows).map(Wire::identity_row).collect();
		for cells in self.cells.values() {
			for (i, cell) in cells.iter().enumerate() {
				sigma[cell.row][cell.col] = cells[(i + 1) % cells.len()];
			}
		}
		sigma
	}
}

#[cfg(test)]
mod tests {
	use cranelift_entity::EntityRef;

	use super::*;

	#[test]
	fn test_cycles_follow_binding_order() {
		let mut wiring = Wiring::new();
		let x = Var::new(0);
		let y = Var::new(1);
		wiring.bind(x, Wire::new(0, 0));
		wiring.bind(y, Wire::new(0, 1));
		wiring.bind(x, Wire::new(1, 2));
		wiring.bind(x, Wire::new(2, 0));

		let sigma = wiring.sigma(3);
		assert_eq!(sigma[0][0], Wire::new(1, 2));
		assert_eq!(sigma[1][2], Wire::new(2, 0));
		assert_eq!(sigma[2][0], Wire::new(0, 0));
		// Bound once.
		assert_eq!(sigma[0][1], Wire::new(0, 1));
		// Unbound.
		assert_eq!(sigma[1][6], Wire::new(1, 6));
		assert_eq!(wiring.n_cycles(), 1);
		assert_eq!(wiring.cells(x).len(), 3);
	}
}
