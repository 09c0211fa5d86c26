// Copyright 2025 Irreducible Inc.
//! Fixed-width little-endian integer encoding and base conversion.
//!
//! Base conversion uses binary splitting in both directions: digits are combined pairwise with
//! a squared base on the way up, and split by precomputed powers `base^(2^j)` on the way down.
//! This keeps the cost dominated by a handful of large multiplications and divisions.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
pub use tessera_utils::bits::{bits_to_bytes, bytes_to_bits};

use crate::EncodingError;

/// Encodes a non-negative integer as exactly `length` little-endian bytes.
pub fn to_bytes(n: &BigInt, length: usize) -> Result<Vec<u8>, EncodingError> {
	let n = n.to_biguint().ok_or(EncodingError::Negative)?;
	biguint_to_bytes(&n, length)
}

/// Encodes an unsigned integer as exactly `length` little-endian bytes.
pub fn biguint_to_bytes(n: &BigUint, length: usize) -> Result<Vec<u8>, EncodingError> {
	let mut bytes = if n.is_zero() {
		Vec::new()
	} else {
		n.to_bytes_le()
	};
	if bytes.len() > length {
		return Err(EncodingError::ValueTooLarge {
			bytes: bytes.len(),
			length,
		});
	}
	bytes.resize(length, 0);
	Ok(bytes)
}

/// Decodes little-endian bytes of any length. The empty slice is zero.
pub fn from_bytes(bytes: &[u8]) -> BigUint {
	BigUint::from_bytes_le(bytes)
}

/// Converts little-endian `digits` in `from_base` into little-endian digits in `to_base`.
///
/// The result has no most-significant zero digits; zero has the empty digit list.
pub fn change_base(digits: &[u64], from_base: u64, to_base: u64) -> Result<Vec<u64>, EncodingError> {
	let value = digits_to_biguint(digits, from_base)?;
	biguint_to_digits(&value, to_base)
}

/// Evaluates little-endian `digits` in `base`.
pub fn digits_to_biguint(digits: &[u64], base: u64) -> Result<BigUint, EncodingError> {
	check_base(base)?;
	if let Some(&digit) = digits.iter().find(|&&digit| digit >= base) {
		return Err(EncodingError::DigitOutOfRange { digit, base });
	}

	let mut level: Vec<BigUint> = digits.iter().copied().map(BigUint::from).collect();
	let mut base = BigUint::from(base);
	while level.len() > 1 {
		level = level
			.chunks(2)
			.map(|pair| match pair {
				[lo, hi] => lo + hi * &base,
				[lo] => lo.clone(),
				_ => unreachable!("chunks(2) yields one or two elements"),
			})
			.collect();
		base = &base * &base;
	}
	Ok(level.pop().unwrap_or_default())
}

/// Splits `value` into little-endian digits in `base`.
pub fn biguint_to_digits(value: &BigUint, base: u64) -> Result<Vec<u64>, EncodingError> {
	check_base(base)?;
	if value.is_zero() {
		return Ok(Vec::new());
	}

	// powers[j] = base^(2^j), stopping at the first power whose square exceeds the value.
	let mut powers = vec![BigUint::from(base)];
	loop {
		let last = &powers[powers.len() - 1];
		let next = last * last;
		if &next > value {
			break;
		}
		powers.push(next);
	}

	let mut level = vec![value.clone()];
	for power in powers.iter().rev() {
		level = level
			.iter()
			.flat_map(|digit| {
				let (hi, lo) = (digit / power, digit % power);
				[lo, hi]
			})
			.collect();
	}

	let mut digits: Vec<u64> = level
		.iter()
		.map(|digit| digit.iter_u64_digits().next().unwrap_or(0))
		.collect();
	while digits.last() == Some(&0) {
		digits.pop();
	}
	Ok(digits)
}

fn check_base(base: u64) -> Result<(), EncodingError> {
	if base < 2 {
		return Err(EncodingError::InvalidBase { base });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::{Rng, SeedableRng, rngs::StdRng};

	use super::*;

	#[test]
	fn test_to_bytes_fixed_width() {
		assert_eq!(to_bytes(&BigInt::from(0x0102), 4).unwrap(), vec![0x02, 0x01, 0, 0]);
		assert_eq!(to_bytes(&BigInt::from(0), 0).unwrap(), Vec::<u8>::new());
		assert_eq!(to_bytes(&BigInt::from(0), 3).unwrap(), vec![0, 0, 0]);
	}

	#[test]
	fn test_to_bytes_rejects_negative_and_oversized() {
		assert_eq!(to_bytes(&BigInt::from(-1), 8), Err(EncodingError::Negative));
		assert_eq!(
			to_bytes(&BigInt::from(0x10000), 2),
			Err(EncodingError::ValueTooLarge {
				bytes: 3,
				length: 2
			})
		);
	}

	#[test]
	fn test_change_base() {
		// 25 = 0b11001
		assert_eq!(change_base(&[5, 2], 10, 2).unwrap(), vec![1, 0, 0, 1, 1]);
		assert_eq!(change_base(&[1, 0, 0, 1, 1], 2, 10).unwrap(), vec![5, 2]);
		assert_eq!(change_base(&[], 10, 2).unwrap(), Vec::<u64>::new());
		assert_eq!(change_base(&[0, 0, 0], 7, 3).unwrap(), Vec::<u64>::new());
	}

	#[test]
	fn test_change_base_errors() {
		assert_eq!(change_base(&[1], 1, 10), Err(EncodingError::InvalidBase { base: 1 }));
		assert_eq!(change_base(&[1], 10, 0), Err(EncodingError::InvalidBase { base: 0 }));
		assert_eq!(
			change_base(&[3, 10], 10, 2),
			Err(EncodingError::DigitOutOfRange { digit: 10, base: 10 })
		);
	}

	#[test]
	fn test_digits_match_num_bigint() {
		let value = BigUint::parse_bytes(b"123456789012345678901234567890123456789", 10).unwrap();
		let digits = biguint_to_digits(&value, 1 << 32).unwrap();
		let expected: Vec<u64> = value.to_u32_digits().into_iter().map(u64::from).collect();
		assert_eq!(digits, expected);
	}

	#[test]
	fn test_change_base_many_digits() {
		let mut rng = StdRng::seed_from_u64(0);
		let mut decimal: Vec<u64> = (0..3000).map(|_| rng.random_range(0..10)).collect();
		decimal.push(rng.random_range(1..10));

		let limbs = change_base(&decimal, 10, 1 << 32).unwrap();
		let text: String = decimal
			.iter()
			.rev()
			.map(|&d| char::from(b'0' + d as u8))
			.collect();
		let value = BigUint::parse_bytes(text.as_bytes(), 10).unwrap();
		let expected: Vec<u64> = value.to_u32_digits().into_iter().map(u64::from).collect();
		assert_eq!(limbs, expected);

		assert_eq!(change_base(&limbs, 1 << 32, 10).unwrap(), decimal);
	}

	proptest! {
		#[test]
		fn prop_bytes_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..48)) {
			let n = from_bytes(&bytes);
			prop_assert_eq!(biguint_to_bytes(&n, bytes.len()).unwrap(), bytes);
		}

		#[test]
		fn prop_change_base_round_trip(
			value in proptest::collection::vec(any::<u8>(), 0..40),
			base in 2u64..1000,
		) {
			let n = from_bytes(&value);
			let digits = biguint_to_digits(&n, base).unwrap();
			prop_assert!(digits.iter().all(|&d| d < base));
			prop_assert_eq!(digits_to_biguint(&digits, base).unwrap(), n);
		}
	}
}
