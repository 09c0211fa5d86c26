// Copyright 2025 Irreducible Inc.
//! The building phase of a constraint system.
//!
//! The assembler owns the variable table, the append-only gate list and the permutation
//! builder. Gates are only ever appended; a gate's index is its row in the final table.
//!
//! Every intermediate variable has exactly one defining gate. A gate may only reference an
//! intermediate whose defining gate has already been appended (or is the gate itself), which is
//! checked on every append.

use ark_ff::AdditiveGroup;
use cranelift_entity::PrimaryMap;
use tessera_core::{
	CircuitGate, ConstraintSystem, GateKind, Wire,
	consts::{COLUMNS, PERMUTS},
	public_input_coeffs,
	verify::eval_generic,
};
use tessera_field::Fp;

use super::{
	Options,
	circuit::{Circuit, VarCounts},
	cvar::{Cvar, Var},
	wiring::Wiring,
	witness::{Witness, WitnessStore},
};
use crate::error::Error;

/// Where a variable comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum VarOrigin {
	/// Declared with a leading public input row.
	PublicInput,
	/// Introduced by the circuit author, unconstrained until used.
	Witness,
	/// Introduced by the compiler and defined by exactly one gate.
	Intermediate,
}

struct VarData {
	origin: VarOrigin,
	defined_by: Option<usize>,
}

/// A gate whose cells still refer to variables.
pub(crate) struct PendingGate {
	pub typ: GateKind,
	pub cells: [Option<Var>; PERMUTS],
	pub coeffs: Vec<Fp>,
}

pub(crate) struct Assembler {
	vars: PrimaryMap<Var, VarData>,
	gates: Vec<PendingGate>,
	wiring: Wiring,
	public_input_size: usize,
	public_inputs: Vec<Var>,
	witness: Option<WitnessStore>,
	zk_rows: usize,
}

impl Assembler {
	pub fn new(opts: &Options) -> Self {
		Self {
			vars: PrimaryMap::new(),
			gates: Vec::new(),
			wiring: Wiring::new(),
			public_input_size: 0,
			public_inputs: Vec::new(),
			witness: opts.witness.then(WitnessStore::new),
			zk_rows: opts.zk_rows,
		}
	}

	/// Whether concrete values are tracked.
	pub fn is_prover(&self) -> bool {
		self.witness.is_some()
	}

	pub fn n_gates(&self) -> usize {
		self.gates.len()
	}

	/// The witness value of `var`.
	pub fn value(&self, var: Var) -> Result<Fp, Error> {
		let witness = self.witness.as_ref().ok_or(Error::NotInProver)?;
		witness.get(var).ok_or(Error::IncompleteWitness {
			var,
			gate_index: self.gates.len(),
		})
	}

	/// Evaluates `lc` in witness mode. Returns `None` when building without a witness.
	pub fn eval(&self, lc: &Cvar) -> Result<Option<Fp>, Error> {
		if !self.is_prover() {
			return Ok(None);
		}
		lc.evaluate(|var| self.value(var)).map(Some)
	}

	fn alloc(&mut self, origin: VarOrigin, value: Option<Fp>) -> Var {
		let var = self.vars.push(VarData {
			origin,
			defined_by: None,
		});
		if let (Some(witness), Some(value)) = (self.witness.as_mut(), value) {
			witness.set(var, value);
		}
		var
	}

	/// Declares a public input and emits its row `1 * w0 = input`.
	pub fn alloc_public_input(&mut self, value: Option<Fp>) -> Result<Var, Error> {
		if self.gates.len() != self.public_input_size {
			return Err(Error::PublicInputAfterGates {
				n_gates: self.gates.len(),
			});
		}
		let var = self.alloc(VarOrigin::PublicInput, value);
		let mut cells = [None; PERMUTS];
		cells[0] = Some(var);
		// The row relation involves the public input polynomial, so it is not checked here.
		self.push_gate(GateKind::Generic, cells, public_input_coeffs(), Some(var))?;
		self.public_input_size += 1;
		self.public_inputs.push(var);
		Ok(var)
	}

	/// Introduces a free variable chosen by the circuit author.
	pub fn alloc_witness(&mut self, value: Option<Fp>) -> Var {
		self.alloc(VarOrigin::Witness, value)
	}

	/// Introduces a compiler variable. Its defining gate must be the next one appended that
	/// names it in `defines`.
	pub fn alloc_intermediate(&mut self, value: Option<Fp>) -> Var {
		self.alloc(VarOrigin::Intermediate, value)
	}

	/// Appends one gate, binding each occupied cell to its variable.
	///
	/// `defines` names the intermediate this gate defines, if any. In witness mode generic gates
	/// are checked immediately.
	pub fn append_gate(
		&mut self,
		typ: GateKind,
		cells: [Option<Var>; PERMUTS],
		coeffs: Vec<Fp>,
		defines: Option<Var>,
	) -> Result<usize, Error> {
		let gate_index = self.gates.len();
		if typ == GateKind::Generic && self.is_prover() {
			let mut row = [Fp::ZERO; COLUMNS];
			for (value, cell) in row.iter_mut().zip(&cells[..3]) {
				if let Some(var) = cell {
					*value = self.value(*var).map_err(|_| Error::IncompleteWitness {
						var: *var,
						gate_index,
					})?;
				}
			}
			if eval_generic(&coeffs, &row) != Fp::ZERO {
				return Err(Error::Unsatisfied { gate_index });
			}
		}
		self.push_gate(typ, cells, coeffs, defines)
	}

	fn push_gate(
		&mut self,
		typ: GateKind,
		cells: [Option<Var>; PERMUTS],
		coeffs: Vec<Fp>,
		defines: Option<Var>,
	) -> Result<usize, Error> {
		let gate_index = self.gates.len();
		if let Some(var) = defines {
			let data = &mut self.vars[var];
			if data.defined_by.is_some() || data.origin == VarOrigin::Witness {
				return Err(Error::PermutationConsistency { gate_index, var });
			}
			data.defined_by = Some(gate_index);
		}
		for var in cells.iter().flatten() {
			let data = &self.vars[*var];
			if data.origin == VarOrigin::Intermediate
				&& data.defined_by.is_none_or(|def| def > gate_index)
			{
				return Err(Error::PermutationConsistency {
					gate_index,
					var: *var,
				});
			}
		}

		for (col, var) in cells.iter().enumerate() {
			if let Some(var) = var {
				self.wiring.bind(*var, Wire::new(gate_index, col));
			}
		}
		tracing::trace!(gate_index, ?typ, n_coeffs = coeffs.len(), "append gate");
		self.gates.push(PendingGate { typ, cells, coeffs });
		Ok(gate_index)
	}

	/// Closes every permutation cycle and freezes the gate table.
	pub fn finalize(self) -> Result<Circuit, Error> {
		let _span = tracing::debug_span!("finalize", n_gates = self.gates.len()).entered();

		let n_gates = self.gates.len();
		for (var, data) in self.vars.iter() {
			if data.origin == VarOrigin::Intermediate && data.defined_by.is_none() {
				return Err(Error::IncompleteWitness {
					var,
					gate_index: self.wiring.cells(var).first().map_or(n_gates, |wire| wire.row),
				});
			}
		}

		let witness = match &self.witness {
			Some(store) => Some(self.witness_table(store)?),
			None => None,
		};

		let sigma = self.wiring.sigma(n_gates);
		let gates = self
			.gates
			.into_iter()
			.zip(sigma)
			.map(|(gate, wires)| CircuitGate {
				typ: gate.typ,
				wires,
				coeffs: gate.coeffs,
			})
			.collect();
		let cs = ConstraintSystem::new(self.public_input_size, self.zk_rows, gates)?;
		if cfg!(debug_assertions) {
			cs.validate()?;
		}
		tracing::debug!(
			n_gates,
			domain_size = cs.domain_size,
			public_input_size = cs.public_input_size,
			"constraint system frozen"
		);

		let mut var_counts = VarCounts::default();
		for data in self.vars.values() {
			match data.origin {
				VarOrigin::PublicInput => var_counts.public_inputs += 1,
				VarOrigin::Witness => var_counts.witnesses += 1,
				VarOrigin::Intermediate => var_counts.intermediates += 1,
			}
		}
		Ok(Circuit::new(cs, witness, var_counts, self.wiring.n_cycles()))
	}

	fn witness_table(&self, store: &WitnessStore) -> Result<Witness, Error> {
		let missing = |var: Var, gate_index: usize| Error::IncompleteWitness { var, gate_index };

		let public_inputs = self
			.public_inputs
			.iter()
			.enumerate()
			.map(|(row, &var)| store.get(var).ok_or_else(|| missing(var, row)))
			.collect::<Result<_, _>>()?;

		let rows = self
			.gates
			.iter()
			.enumerate()
			.map(|(gate_index, gate)| {
				let mut row = [Fp::ZERO; COLUMNS];
				for (value, cell) in row.iter_mut().zip(&gate.cells) {
					if let Some(var) = cell {
						*value = store.get(*var).ok_or_else(|| missing(*var, gate_index))?;
					}
				}
				Ok(row)
			})
			.collect::<Result<_, Error>>()?;

		Ok(Witness {
			public_inputs,
			rows,
		})
	}
}
