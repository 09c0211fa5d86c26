// Copyright 2025 Irreducible Inc.
//! Linear combination reduction.
//!
//! A generic gate has [`LINEAR_ARITY`] linear slots for operands, the third column being taken
//! by the result. A longer combination is split at the midpoint of its term list (the left half
//! takes the extra term), each half is reduced to one representative term, and the two
//! representatives are returned for the consuming gate.
//!
//! Reducing a half to a representative:
//!
//! - one term is its own representative,
//! - two terms `c1*x1 + c2*x2` are fused by a gate `c1*x1 + c2*x2 - t = 0`,
//! - more terms are split again and the representatives of both halves fused the same way.
//!
//! The tree is walked in post-order (left, right, fuse) with an explicit work stack. Every
//! intermediate `t` is allocated right before the gate that defines it, so no gate ever
//! references an intermediate defined later.

use std::ops::Range;

use ark_ff::{AdditiveGroup, Field};
use tessera_field::Fp;

use super::{
	assembler::Assembler,
	cvar::{Cvar, Term},
	gate,
};
use crate::error::Error;

/// Linear operand slots of a generic gate whose output column is in use.
pub const LINEAR_ARITY: usize = 2;

/// Reduces `lc` to at most [`LINEAR_ARITY`] terms, emitting the gates that define the
/// intermediate representatives. The constant is carried over unchanged.
pub(crate) fn reduce(asm: &mut Assembler, lc: &Cvar) -> Result<Cvar, Error> {
	let terms = lc.terms();
	if terms.len() <= LINEAR_ARITY {
		return Ok(lc.clone());
	}
	let mid = terms.len().div_ceil(2);
	let left = reduce_to_term(asm, &terms[..mid])?;
	let right = reduce_to_term(asm, &terms[mid..])?;
	Ok(Cvar::from_terms(lc.constant_term(), [left, right]))
}

enum Task {
	Reduce(Range<usize>),
	Fuse,
}

/// Reduces a non-empty term list to a single term.
fn reduce_to_term(asm: &mut Assembler, terms: &[Term]) -> Result<Term, Error> {
	let mut tasks = vec![Task::Reduce(0..terms.len())];
	let mut reduced: Vec<Term> = Vec::new();
	while let Some(task) = tasks.pop() {
		match task {
			Task::Reduce(range) => match range.len() {
				0 => unreachable!("halves of a split are never empty"),
				1 => reduced.push(terms[range.start]),
				2 => reduced.push(fuse(asm, terms[range.start], terms[range.start + 1])?),
				len => {
					let mid = range.start + len.div_ceil(2);
					tasks.push(Task::Fuse);
					tasks.push(Task::Reduce(mid..range.end));
					tasks.push(Task::Reduce(range.start..mid));
				}
			},
			Task::Fuse => {
				let (Some(right), Some(left)) = (reduced.pop(), reduced.pop()) else {
					unreachable!("a fuse task follows both of its halves")
				};
				reduced.push(fuse(asm, left, right)?);
			}
		}
	}
	let [term] = reduced[..] else {
		unreachable!("the root task leaves exactly one term")
	};
	Ok(term)
}

/// Emits `c1*x1 + c2*x2 - t = 0` and returns `1 * t`.
fn fuse(asm: &mut Assembler, (c1, x1): Term, (c2, x2): Term) -> Result<Term, Error> {
	let value = asm.eval(&Cvar::from_terms(Fp::ZERO, [(c1, x1), (c2, x2)]))?;
	let t = asm.alloc_intermediate(value);
	gate::generic(
		asm,
		[Some(x1), Some(x2), Some(t)],
		[c1, c2, -Fp::ONE, Fp::ZERO, Fp::ZERO],
		Some(t),
	)?;
	Ok((Fp::ONE, t))
}
