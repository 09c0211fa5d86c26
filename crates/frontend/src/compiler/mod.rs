// Copyright 2025 Irreducible Inc.
use std::{cell::RefCell, rc::Rc};

use ark_ff::Field;
use tessera_core::{
	GateKind,
	consts::{DEFAULT_ZK_ROWS, GENERIC_COEFFS},
};
use tessera_field::{Fp, inverse};

use crate::{compiler::assembler::Assembler, error::Error};

mod assembler;
pub mod circuit;
pub mod cvar;
mod gate;
mod reduce;
mod wiring;
mod witness;

pub use circuit::{Circuit, VarCounts};
pub use cvar::{Cvar, Term, Var};
pub use reduce::LINEAR_ARITY;
pub use witness::Witness;

/// Options for the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
	/// Rows reserved after the gates for zero-knowledge blinding.
	pub zk_rows: usize,
	/// Track concrete values while building and produce a witness table.
	pub witness: bool,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			zk_rows: DEFAULT_ZK_ROWS,
			witness: false,
		}
	}
}

impl Options {
	/// Default options, with `zk_rows` overridden by `TESSERA_ZK_ROWS` when set.
	pub fn from_env() -> Self {
		let mut opts = Self::default();
		if let Ok(value) = std::env::var("TESSERA_ZK_ROWS") {
			match value.parse() {
				Ok(zk_rows) => opts.zk_rows = zk_rows,
				Err(_) => tracing::warn!(%value, "ignoring invalid TESSERA_ZK_ROWS"),
			}
		}
		opts
	}
}

pub(crate) struct Shared {
	asm: Option<Assembler>,
	/// Set once an error left the gate table in an unusable state.
	aborted: Option<String>,
}

impl Shared {
	fn assembler(&mut self) -> Result<&mut Assembler, Error> {
		if let Some(reason) = &self.aborted {
			return Err(Error::Aborted(reason.clone()));
		}
		self.asm.as_mut().ok_or(Error::AlreadyBuilt)
	}
}

/// Circuit builder for constructing constraint systems over the BN254 scalar field.
///
/// # Circuit Model
///
/// Circuit values are [`Cvar`]s, linear combinations of variables plus a constant. Adding,
/// subtracting and scaling them is free: no variable is allocated and no gate is emitted. Gates
/// are emitted only by the methods of this builder that introduce a nonlinear relation or an
/// assertion, such as [`mul`] or [`assert_equal`]. Each emission appends exactly one generic
/// gate after first reducing its operands to the two linear slots a gate has.
///
/// # Variables
///
/// **Public inputs** - Declared with [`add_public_input`] before any other gate. Each occupies
/// one leading row of the gate table.
///
/// **Witnesses** - Free variables introduced with [`exists`]. They are only constrained by the
/// gates that use them.
///
/// **Intermediates** - Introduced by the compiler and defined by exactly one gate, which always
/// precedes every other gate using them.
///
/// # Witness Mode
///
/// A builder created with [`with_witness`] evaluates every value as it goes. The closures given
/// to [`exists`] and [`add_public_input`] are only called in this mode, every generic gate is
/// checked when appended and [`build`] produces a witness table alongside the constraint system.
/// Without a witness only the shape of the circuit is computed and the closures are never run.
///
/// # Compilation
///
/// The builder uses reference-counted sharing internally, cloning it is a shallow copy.
/// [`build`] consumes the internal state and can only be called once per builder instance.
///
/// An error raised while gates were being appended (an unsatisfied gate in witness mode, a
/// missing witness value, a forward reference) aborts the build: every later call, [`build`]
/// included, fails with [`Error::Aborted`].
///
/// [`add_public_input`]: Self::add_public_input
/// [`assert_equal`]: Self::assert_equal
/// [`build`]: Self::build
/// [`exists`]: Self::exists
/// [`mul`]: Self::mul
/// [`with_witness`]: Self::with_witness
#[derive(Clone)]
pub struct CircuitBuilder {
	shared: Rc<RefCell<Shared>>,
}

impl Default for CircuitBuilder {
	fn default() -> Self {
		CircuitBuilder::new()
	}
}

impl CircuitBuilder {
	/// Create a new circuit builder with options taken from the environment.
	pub fn new() -> Self {
		Self::with_opts(Options::from_env())
	}

	/// Create a new circuit builder with explicit options.
	pub fn with_opts(opts: Options) -> Self {
		CircuitBuilder {
			shared: Rc::new(RefCell::new(Shared {
				asm: Some(Assembler::new(&opts)),
				aborted: None,
			})),
		}
	}

	/// Create a new circuit builder that computes a witness while building.
	pub fn with_witness() -> Self {
		Self::with_opts(Options {
			witness: true,
			..Options::from_env()
		})
	}

	fn with_asm<R>(&self, f: impl FnOnce(&mut Assembler) -> Result<R, Error>) -> Result<R, Error> {
		let mut shared = self.shared.borrow_mut();
		let result = f(shared.assembler()?);
		if let Err(err) = &result {
			if err.aborts_build() {
				tracing::debug!(%err, "build aborted");
				shared.asm = None;
				shared.aborted = Some(err.to_string());
			}
		}
		result
	}

	/// Returns the circuit built by this builder.
	///
	/// Note that cloning the circuit builder only clones the reference and as such is treated
	/// as a shallow copy.
	///
	/// # Errors
	///
	/// [`Error::AlreadyBuilt`] on a second call, [`Error::Aborted`] after an earlier fatal error,
	/// [`Error::IncompleteWitness`] if a compiler variable was never defined or, in witness mode,
	/// a bound variable has no value.
	pub fn build(&self) -> Result<Circuit, Error> {
		let _span = tracing::debug_span!("build").entered();
		let asm = {
			let mut shared = self.shared.borrow_mut();
			shared.assembler()?;
			shared.asm.take().ok_or(Error::AlreadyBuilt)?
		};
		asm.finalize()
	}

	/// Whether this builder computes a witness.
	pub fn is_prover(&self) -> bool {
		self.with_asm(|asm| Ok(asm.is_prover())).unwrap_or(false)
	}

	/// Number of gates appended so far, public input rows included.
	pub fn n_gates(&self) -> Result<usize, Error> {
		self.with_asm(|asm| Ok(asm.n_gates()))
	}

	/// A constant. Constants cost nothing: they are folded into the gates that use them.
	pub fn constant(&self, value: Fp) -> Cvar {
		Cvar::constant(value)
	}

	/// Declares a public input. Must precede every other gate.
	///
	/// `compute` supplies the value and is only called in witness mode.
	pub fn add_public_input(
		&self,
		compute: impl FnOnce() -> Result<Fp, Error>,
	) -> Result<Cvar, Error> {
		let value = self.compute_if_prover(compute)?;
		self.with_asm(|asm| asm.alloc_public_input(value).map(Cvar::var))
	}

	/// Introduces a free witness variable.
	///
	/// `compute` supplies the value and is only called in witness mode. It may read other values
	/// through [`read_var`](Self::read_var).
	pub fn exists(&self, compute: impl FnOnce() -> Result<Fp, Error>) -> Result<Cvar, Error> {
		let value = self.compute_if_prover(compute)?;
		self.with_asm(|asm| Ok(Cvar::var(asm.alloc_witness(value))))
	}

	fn compute_if_prover(
		&self,
		compute: impl FnOnce() -> Result<Fp, Error>,
	) -> Result<Option<Fp>, Error> {
		if self.with_asm(|asm| Ok(asm.is_prover()))? {
			compute().map(Some)
		} else {
			Ok(None)
		}
	}

	/// The value of `lc` in witness mode.
	///
	/// # Errors
	///
	/// [`Error::NotInProver`] when building without a witness.
	pub fn read_var(&self, lc: &Cvar) -> Result<Fp, Error> {
		self.with_asm(|asm| asm.eval(lc)?.ok_or(Error::NotInProver))
	}

	/// Returns a single variable equal to `lc`, emitting a gate unless it already is one.
	pub fn seal(&self, lc: &Cvar) -> Result<Cvar, Error> {
		self.with_asm(|asm| gate::seal(asm, lc).map(Cvar::var))
	}

	/// Returns `a * b`.
	///
	/// Emits at most one gate for the product, plus the reductions of operands with more than
	/// one term. A constant operand emits nothing.
	pub fn mul(&self, a: &Cvar, b: &Cvar) -> Result<Cvar, Error> {
		self.with_asm(|asm| gate::mul(asm, a, b))
	}

	/// Returns `a * a`.
	pub fn square(&self, a: &Cvar) -> Result<Cvar, Error> {
		self.mul(a, a)
	}

	/// Returns `a⁻¹`, constrained by `a * a⁻¹ = 1`.
	///
	/// # Errors
	///
	/// [`Error::DivisionByZero`] if `a` is the constant zero, or evaluates to zero in witness
	/// mode.
	pub fn inv(&self, a: &Cvar) -> Result<Cvar, Error> {
		if let Some(k) = a.to_constant() {
			return Ok(Cvar::constant(inverse(&k)?));
		}
		let y = self.exists(|| Ok(inverse(&self.read_var(a)?)?))?;
		self.assert_mul(a, &y, &Cvar::constant(Fp::ONE))?;
		Ok(y)
	}

	/// Returns `a / b`, constrained by `b * (a / b) = a`.
	pub fn div(&self, a: &Cvar, b: &Cvar) -> Result<Cvar, Error> {
		if let Some(k) = b.to_constant() {
			return Ok(a.scale(inverse(&k)?));
		}
		let z = self.exists(|| Ok(self.read_var(a)? * inverse(&self.read_var(b)?)?))?;
		self.assert_mul(b, &z, a)?;
		Ok(z)
	}

	/// Asserts `a = b`. Emits no gate when the two sides are definitionally equal.
	///
	/// # Errors
	///
	/// [`Error::ConstantMismatch`] if the sides differ by a nonzero constant.
	pub fn assert_equal(&self, a: &Cvar, b: &Cvar) -> Result<(), Error> {
		self.with_asm(|asm| gate::assert_equal(asm, a, b))
	}

	/// Asserts `a * b = c`.
	pub fn assert_mul(&self, a: &Cvar, b: &Cvar, c: &Cvar) -> Result<(), Error> {
		self.with_asm(|asm| gate::assert_mul(asm, a, b, c))
	}

	/// Asserts `a * a = b`.
	pub fn assert_square(&self, a: &Cvar, b: &Cvar) -> Result<(), Error> {
		self.assert_mul(a, a, b)
	}

	/// Asserts `a ∈ {0, 1}`.
	pub fn assert_boolean(&self, a: &Cvar) -> Result<(), Error> {
		self.with_asm(|asm| gate::assert_boolean(asm, a))
	}

	/// Appends a generic gate `sl*w0 + sr*w1 + so*w2 + sm*w0*w1 + sc = 0` over the given
	/// operands, each sealed to a single variable. Returns the gate's row.
	pub fn generic(&self, coeffs: [Fp; GENERIC_COEFFS], operands: [&Cvar; 3]) -> Result<usize, Error> {
		self.with_asm(|asm| {
			let [l, r, o] = operands;
			let cells = [
				Some(gate::seal(asm, l)?),
				Some(gate::seal(asm, r)?),
				Some(gate::seal(asm, o)?),
			];
			gate::generic(asm, cells, coeffs, None)
		})
	}

	/// Appends one gate of `kind` over `operands`, each sealed to a single variable and placed
	/// in the wired cells in order. Returns the gate's row.
	///
	/// # Errors
	///
	/// [`Error::TooManyOperands`] beyond the number of wired cells.
	pub fn custom(&self, kind: GateKind, operands: &[Cvar], coeffs: Vec<Fp>) -> Result<usize, Error> {
		self.with_asm(|asm| gate::custom(asm, kind, operands, coeffs))
	}
}
