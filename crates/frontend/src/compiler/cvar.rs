// Copyright 2025 Irreducible Inc.
//! Circuit values as linear combinations of variables.
//!
//! A [`Cvar`] is `constant + Σ coeff_i * var_i`. It is kept in canonical form: every variable
//! appears at most once, in the order it first appeared, and no coefficient is zero. Building
//! and combining `Cvar`s is pure data manipulation. Variables are allocated and gates emitted
//! only when a constraint is requested through the [`CircuitBuilder`](super::CircuitBuilder).

use std::{
	collections::{HashMap, hash_map::Entry},
	ops::{Add, Mul, Neg, Sub},
};

use ark_ff::{AdditiveGroup, Field, Zero};
use cranelift_entity::entity_impl;
use smallvec::SmallVec;
use tessera_field::Fp;

/// An opaque circuit unknown, numbered in allocation order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Var(u32);
entity_impl!(Var, "v");

/// A `(coefficient, variable)` pair.
pub type Term = (Fp, Var);

/// A linear combination of variables plus a constant.
///
/// The arithmetic operators are implemented on references, `&a + &b`. The named methods take
/// `&self` and are equivalent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cvar {
	constant: Fp,
	terms: SmallVec<[Term; 4]>,
}

impl Cvar {
	/// A pure constant.
	pub fn constant(value: Fp) -> Self {
		Self {
			constant: value,
			terms: SmallVec::new(),
		}
	}

	/// The constant zero.
	pub fn zero() -> Self {
		Self::constant(Fp::ZERO)
	}

	/// `1 * var`.
	pub fn var(var: Var) -> Self {
		Self {
			constant: Fp::ZERO,
			terms: SmallVec::from_slice(&[(Fp::ONE, var)]),
		}
	}

	/// Builds a canonical combination from arbitrary terms, merging repeated variables.
	pub fn from_terms(constant: Fp, terms: impl IntoIterator<Item = Term>) -> Self {
		let mut merged: SmallVec<[Term; 4]> = SmallVec::new();
		let mut position = HashMap::new();
		for (coeff, var) in terms {
			match position.entry(var) {
				Entry::Occupied(entry) => merged[*entry.get()].0 += coeff,
				Entry::Vacant(entry) => {
					entry.insert(merged.len());
					merged.push((coeff, var));
				}
			}
		}
		merged.retain(|(coeff, _)| !coeff.is_zero());
		Self {
			constant,
			terms: merged,
		}
	}

	/// Sum of two combinations. Terms of `self` come first, new variables of `other` follow.
	pub fn add(&self, other: &Cvar) -> Cvar {
		Self::from_terms(
			self.constant + other.constant,
			self.terms.iter().chain(other.terms.iter()).copied(),
		)
	}

	/// `self - other`.
	pub fn sub(&self, other: &Cvar) -> Cvar {
		self.add(&other.negate())
	}

	/// Multiplies every coefficient and the constant by `c`. Scaling by zero yields constant `0`.
	pub fn scale(&self, c: Fp) -> Cvar {
		if c.is_zero() {
			return Self::zero();
		}
		Self {
			constant: self.constant * c,
			terms: self
				.terms
				.iter()
				.map(|&(coeff, var)| (coeff * c, var))
				.collect(),
		}
	}

	/// `-self`.
	pub fn negate(&self) -> Cvar {
		self.scale(-Fp::ONE)
	}

	/// Whether no variable is involved.
	pub fn is_constant(&self) -> bool {
		self.terms.is_empty()
	}

	/// The value of a pure constant, `None` if any variable is involved.
	pub fn to_constant(&self) -> Option<Fp> {
		self.is_constant().then_some(self.constant)
	}

	/// The variable terms, in first-occurrence order.
	pub fn terms(&self) -> &[Term] {
		&self.terms
	}

	/// The constant part.
	pub fn constant_term(&self) -> Fp {
		self.constant
	}

	/// Returns `x` iff the combination is exactly `1 * x + 0`.
	pub fn as_single_var(&self) -> Option<Var> {
		match self.terms.as_slice() {
			[(coeff, var)] if *coeff == Fp::ONE && self.constant.is_zero() => Some(*var),
			_ => None,
		}
	}

	/// Returns `(c, x, k)` iff the combination is `c * x + k`.
	pub fn as_affine(&self) -> Option<(Fp, Var, Fp)> {
		match self.terms.as_slice() {
			[(coeff, var)] => Some((*coeff, *var, self.constant)),
			_ => None,
		}
	}

	/// Evaluates the combination, resolving variables through `value`.
	pub fn evaluate<E>(&self, mut value: impl FnMut(Var) -> Result<Fp, E>) -> Result<Fp, E> {
		self.terms
			.iter()
			.try_fold(self.constant, |acc, &(coeff, var)| Ok(acc + coeff * value(var)?))
	}
}

impl From<Fp> for Cvar {
	fn from(value: Fp) -> Self {
		Cvar::constant(value)
	}
}

impl From<Var> for Cvar {
	fn from(var: Var) -> Self {
		Cvar::var(var)
	}
}

impl Add for &Cvar {
	type Output = Cvar;

	fn add(self, rhs: &Cvar) -> Cvar {
		Cvar::add(self, rhs)
	}
}

impl Sub for &Cvar {
	type Output = Cvar;

	fn sub(self, rhs: &Cvar) -> Cvar {
		Cvar::sub(self, rhs)
	}
}

impl Neg for Cvar {
	type Output = Cvar;

	fn neg(self) -> Cvar {
		self.negate()
	}
}

impl Neg for &Cvar {
	type Output = Cvar;

	fn neg(self) -> Cvar {
		self.negate()
	}
}

impl Mul<Fp> for Cvar {
	type Output = Cvar;

	fn mul(self, rhs: Fp) -> Cvar {
		self.scale(rhs)
	}
}

impl Mul<Fp> for &Cvar {
	type Output = Cvar;

	fn mul(self, rhs: Fp) -> Cvar {
		self.scale(rhs)
	}
}
