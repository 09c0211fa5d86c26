// Copyright 2025 Irreducible Inc.
//! Boolean assertion.
//!
//! Enforces `a ∈ {0, 1}` for `a = c*x + k`.
//!
//! # Constraints
//!
//! The gate generates 1 row with `w0 = w1 = x`:
//! - `(c x + k)^2 - (c x + k) = c² x x + (2ck - c) x + k² - k = 0`

use ark_ff::{AdditiveGroup, Field, Zero};
use tessera_field::Fp;

use super::generic::{affine, generic};
use crate::{
	compiler::{assembler::Assembler, cvar::Cvar},
	error::Error,
};

pub(crate) fn assert_boolean(asm: &mut Assembler, a: &Cvar) -> Result<(), Error> {
	if let Some(k) = a.to_constant() {
		if k.is_zero() || k == Fp::ONE {
			return Ok(());
		}
		return Err(Error::ConstantMismatch {
			gate_index: asm.n_gates(),
			left: k.square(),
			right: k,
		});
	}
	let (c, x, k) = affine(asm, a)?;
	generic(
		asm,
		[Some(x), Some(x), None],
		[c.double() * k - c, Fp::ZERO, Fp::ZERO, c.square(), k.square() - k],
		None,
	)?;
	Ok(())
}
