// Copyright 2025 Irreducible Inc.

//! Circuit statistics module for analyzing gate counts and circuit shape.

use std::fmt;

use tessera_core::GateKind;

use crate::compiler::Circuit;

/// Various stats of a built circuit.
pub struct CircuitStat {
	/// Number of gates in the circuit, public input rows included.
	pub n_gates: usize,
	/// Number of gates of each kind, in tag order. Kinds that do not occur are omitted.
	pub gates_by_kind: Vec<(GateKind, usize)>,
	/// Number of public input values in the circuit.
	pub n_public_inputs: usize,
	/// Number of private witness values in the circuit.
	pub n_witness: usize,
	/// Number of intermediate values in the circuit.
	///
	/// Intermediates are introduced by the compiler and defined by exactly one gate.
	pub n_intermediate: usize,
	/// Number of permutation cycles spanning more than one cell.
	///
	/// Every variable used by more than one cell forms one cycle.
	pub n_cycles: usize,
	/// Rows reserved for zero-knowledge blinding.
	pub zk_rows: usize,
	/// Evaluation domain size (power of 2).
	pub domain_size: usize,
}

impl CircuitStat {
	/// Creates a new `CircuitStat` instance by collecting statistics from the given circuit.
	pub fn collect(circuit: &Circuit) -> Self {
		let cs = circuit.constraint_system();
		let gates_by_kind = GateKind::ALL
			.iter()
			.map(|&kind| (kind, cs.gates.iter().filter(|gate| gate.typ == kind).count()))
			.filter(|&(_, count)| count > 0)
			.collect();
		let var_counts = circuit.var_counts();

		Self {
			n_gates: cs.n_gates(),
			gates_by_kind,
			n_public_inputs: var_counts.public_inputs,
			n_witness: var_counts.witnesses,
			n_intermediate: var_counts.intermediates,
			n_cycles: circuit.n_cycles(),
			zk_rows: cs.zk_rows,
			domain_size: cs.domain_size,
		}
	}
}

impl fmt::Display for CircuitStat {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Helper to format numbers with commas
		fn fmt_num(n: usize) -> String {
			let s = n.to_string();
			let mut result = String::new();
			for (i, c) in s.chars().rev().enumerate() {
				if i > 0 && i % 3 == 0 {
					result.push(',');
				}
				result.push(c);
			}
			result.chars().rev().collect()
		}

		writeln!(f, "Gates")?;
		writeln!(f, "├─ Number of gates: {}", fmt_num(self.n_gates))?;
		for (i, (kind, count)) in self.gates_by_kind.iter().enumerate() {
			let branch = if i + 1 == self.gates_by_kind.len() { "└─" } else { "├─" };
			writeln!(f, "│  {branch} {kind:?}: {}", fmt_num(*count))?;
		}
		let used = self.n_gates + self.zk_rows;
		writeln!(
			f,
			"└─ Domain: {} used ({:.1}% of 2^{}), {} zk rows",
			fmt_num(used),
			used as f64 / self.domain_size as f64 * 100.0,
			self.domain_size.trailing_zeros(),
			self.zk_rows
		)?;
		writeln!(f)?;

		writeln!(f, "Variables")?;
		writeln!(f, "├─ Public inputs: {}", fmt_num(self.n_public_inputs))?;
		writeln!(f, "├─ Witness: {}", fmt_num(self.n_witness))?;
		writeln!(f, "└─ Intermediate: {}", fmt_num(self.n_intermediate))?;
		writeln!(f)?;

		writeln!(f, "Permutation")?;
		writeln!(f, "└─ Cycles: {}", fmt_num(self.n_cycles))?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use ark_ff::Field;
	use tessera_field::Fp;

	use super::*;
	use crate::{CircuitBuilder, Options};

	#[test]
	fn test_collect() {
		let builder = CircuitBuilder::with_opts(Options::default());
		let x = builder.add_public_input(|| Ok(Fp::ONE)).unwrap();
		let y = builder.exists(|| Ok(Fp::ONE)).unwrap();
		let z = builder.mul(&x, &y).unwrap();
		builder.assert_equal(&z, &x).unwrap();
		let circuit = builder.build().unwrap();

		let stat = CircuitStat::collect(&circuit);
		assert_eq!(stat.n_gates, 3);
		assert_eq!(stat.gates_by_kind, vec![(GateKind::Generic, 3)]);
		assert_eq!(stat.n_public_inputs, 1);
		assert_eq!(stat.n_witness, 1);
		assert_eq!(stat.n_intermediate, 1);
		assert_eq!(stat.domain_size, 8);

		let text = stat.to_string();
		assert!(text.contains("Number of gates: 3"));
		assert!(text.contains("Generic: 3"));
	}
}
