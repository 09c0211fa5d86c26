// Copyright 2025 Irreducible Inc.

use ark_ff::{BigInt as Limbs, Field, PrimeField};
use num_bigint::BigUint;

use crate::{EncodingError, FIELD_BYTES, FieldError, Fp};

/// The field modulus `p` as an arbitrary-precision integer.
pub fn modulus() -> BigUint {
	Fp::MODULUS.into()
}

/// Canonical 32-byte little-endian encoding of a field element.
pub fn fp_to_bytes(x: &Fp) -> [u8; FIELD_BYTES] {
	let mut out = [0u8; FIELD_BYTES];
	for (chunk, limb) in out.chunks_exact_mut(8).zip(x.into_bigint().0) {
		chunk.copy_from_slice(&limb.to_le_bytes());
	}
	out
}

/// Decodes a canonical 32-byte little-endian field element.
///
/// Fails on any other length and on representatives `>= p`.
pub fn fp_from_bytes(bytes: &[u8]) -> Result<Fp, EncodingError> {
	if bytes.len() != FIELD_BYTES {
		return Err(EncodingError::WrongLength {
			expected: FIELD_BYTES,
			actual: bytes.len(),
		});
	}
	let mut limbs = [0u64; 4];
	for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
		let mut word = [0u8; 8];
		word.copy_from_slice(chunk);
		*limb = u64::from_le_bytes(word);
	}
	Fp::from_bigint(Limbs::new(limbs)).ok_or(EncodingError::NonCanonical)
}

/// Lowercase hex of the canonical little-endian bytes (64 characters).
pub fn fp_to_hex(x: &Fp) -> String {
	hex::encode(fp_to_bytes(x))
}

pub fn fp_from_hex(s: &str) -> Result<Fp, EncodingError> {
	fp_from_bytes(&hex::decode(s)?)
}

pub fn fp_to_biguint(x: &Fp) -> BigUint {
	x.into_bigint().into()
}

/// Converts an integer into the field without reduction.
pub fn fp_from_biguint(n: &BigUint) -> Result<Fp, EncodingError> {
	if *n >= modulus() {
		return Err(EncodingError::NonCanonical);
	}
	Ok(Fp::from(n.clone()))
}

/// Multiplicative inverse, failing on zero.
pub fn inverse(x: &Fp) -> Result<Fp, FieldError> {
	x.inverse().ok_or(FieldError::DivisionByZero)
}
