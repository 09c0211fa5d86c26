// Copyright 2025 Irreducible Inc.
//! Generic gate.
//!
//! The only gate with a fixed meaning in the front end. It relates the first three cells of its
//! row through five coefficients `[sl, sr, so, sm, sc]`.
//!
//! # Constraints
//!
//! The gate generates 1 row:
//! - `sl*w0 + sr*w1 + so*w2 + sm*w0*w1 + sc = 0`
//!
//! Products are expressed on affine forms: with `a = c1*x + k1` and `b = c2*y + k2`,
//! `a * b - z = (c1 k2) x + (k1 c2) y - z + (c1 c2) x y + k1 k2`.

use ark_ff::{AdditiveGroup, Field};
use tessera_core::{GateKind, consts::GENERIC_COEFFS};
use tessera_field::Fp;

use super::{assert_equal, generic_cells, linear_slots};
use crate::{
	compiler::{
		assembler::Assembler,
		cvar::{Cvar, Var},
		reduce::reduce,
	},
	error::Error,
};

/// Appends a generic gate over `cells` with explicit coefficients.
pub(crate) fn generic(
	asm: &mut Assembler,
	cells: [Option<Var>; 3],
	coeffs: [Fp; GENERIC_COEFFS],
	defines: Option<Var>,
) -> Result<usize, Error> {
	asm.append_gate(GateKind::Generic, generic_cells(cells), coeffs.to_vec(), defines)
}

/// Returns a variable equal to `lc`.
///
/// A single unscaled variable is returned as is. Anything else gets a fresh intermediate `t`
/// defined by `Σ ci*xi + k - t = 0` over the reduced combination.
pub(crate) fn seal(asm: &mut Assembler, lc: &Cvar) -> Result<Var, Error> {
	if let Some(var) = lc.as_single_var() {
		return Ok(var);
	}
	let value = asm.eval(lc)?;
	let reduced = reduce(asm, lc)?;
	let ([l, r], [sl, sr]) = linear_slots(&reduced);
	let t = asm.alloc_intermediate(value);
	generic(asm, [l, r, Some(t)], [sl, sr, -Fp::ONE, Fp::ZERO, reduced.constant_term()], Some(t))?;
	Ok(t)
}

/// The `(c, x, k)` with `lc = c*x + k`, sealing `lc` first when it has several terms.
pub(crate) fn affine(asm: &mut Assembler, lc: &Cvar) -> Result<(Fp, Var, Fp), Error> {
	match lc.as_affine() {
		Some(affine) => Ok(affine),
		None => Ok((Fp::ONE, seal(asm, lc)?, Fp::ZERO)),
	}
}

/// Affine forms of two operands, sharing the sealed variable when both are the same.
fn affine_pair(
	asm: &mut Assembler,
	a: &Cvar,
	b: &Cvar,
) -> Result<((Fp, Var, Fp), (Fp, Var, Fp)), Error> {
	let fa = affine(asm, a)?;
	let fb = if a == b { fa } else { affine(asm, b)? };
	Ok((fa, fb))
}

/// Returns `a * b`. A constant operand scales the other one and emits nothing.
pub(crate) fn mul(asm: &mut Assembler, a: &Cvar, b: &Cvar) -> Result<Cvar, Error> {
	if let Some(c) = a.to_constant() {
		return Ok(b.scale(c));
	}
	if let Some(c) = b.to_constant() {
		return Ok(a.scale(c));
	}
	let ((c1, x, k1), (c2, y, k2)) = affine_pair(asm, a, b)?;
	let value = match (asm.eval(a)?, asm.eval(b)?) {
		(Some(va), Some(vb)) => Some(va * vb),
		_ => None,
	};
	let z = asm.alloc_intermediate(value);
	generic(
		asm,
		[Some(x), Some(y), Some(z)],
		[c1 * k2, k1 * c2, -Fp::ONE, c1 * c2, k1 * k2],
		Some(z),
	)?;
	Ok(Cvar::var(z))
}

/// Asserts `a * b = c` with a single gate.
pub(crate) fn assert_mul(asm: &mut Assembler, a: &Cvar, b: &Cvar, c: &Cvar) -> Result<(), Error> {
	if let Some(k) = a.to_constant() {
		return assert_equal(asm, &b.scale(k), c);
	}
	if let Some(k) = b.to_constant() {
		return assert_equal(asm, &a.scale(k), c);
	}
	let ((c1, x, k1), (c2, y, k2)) = affine_pair(asm, a, b)?;
	let (z, c3, k3) = match c.to_constant() {
		Some(k3) => (None, Fp::ZERO, k3),
		None => {
			let (c3, z, k3) = affine(asm, c)?;
			(Some(z), c3, k3)
		}
	};
	generic(
		asm,
		[Some(x), Some(y), z],
		[c1 * k2, k1 * c2, -c3, c1 * c2, k1 * k2 - k3],
		None,
	)?;
	Ok(())
}
