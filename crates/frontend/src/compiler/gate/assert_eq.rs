// Copyright 2025 Irreducible Inc.
//! Equality assertion.
//!
//! Enforces `a = b` on the difference `a - b`.
//!
//! # Algorithm
//!
//! The difference is formed first. When it is a constant no gate is needed: zero means the two
//! sides are definitionally equal (identical constants, the same variable), anything else is a
//! failed assertion. Otherwise the difference is reduced to two terms.
//!
//! # Constraints
//!
//! The gate generates 1 row:
//! - `c1*x1 + c2*x2 + k = 0`

use ark_ff::{AdditiveGroup, Zero};
use tessera_field::Fp;

use super::{generic, linear_slots};
use crate::{
	compiler::{assembler::Assembler, cvar::Cvar, reduce::reduce},
	error::Error,
};

pub(crate) fn assert_equal(asm: &mut Assembler, a: &Cvar, b: &Cvar) -> Result<(), Error> {
	let diff = a.sub(b);
	if let Some(k) = diff.to_constant() {
		if k.is_zero() {
			return Ok(());
		}
		return Err(Error::ConstantMismatch {
			gate_index: asm.n_gates(),
			left: a.constant_term(),
			right: b.constant_term(),
		});
	}
	let reduced = reduce(asm, &diff)?;
	let ([l, r], [sl, sr]) = linear_slots(&reduced);
	generic(asm, [l, r, None], [sl, sr, Fp::ZERO, Fp::ZERO, reduced.constant_term()], None)?;
	Ok(())
}
