// Copyright 2025 Irreducible Inc.

/// Failure to encode or decode an integer or field element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
	#[error("cannot encode a negative integer")]
	Negative,
	#[error("integer needs {bytes} bytes but only {length} are available")]
	ValueTooLarge { bytes: usize, length: usize },
	#[error("expected {expected} bytes, got {actual}")]
	WrongLength { expected: usize, actual: usize },
	#[error("value is not a canonical field element")]
	NonCanonical,
	#[error("base must be at least 2, got {base}")]
	InvalidBase { base: u64 },
	#[error("digit {digit} is out of range for base {base}")]
	DigitOutOfRange { digit: u64, base: u64 },
	#[error("invalid hex: {0}")]
	InvalidHex(#[from] hex::FromHexError),
}

/// Field arithmetic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("division by zero")]
	DivisionByZero,
}
