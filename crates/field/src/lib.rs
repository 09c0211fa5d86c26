// Copyright 2025 Irreducible Inc.
//! The prime field the constraint system is defined over, and its canonical byte codec.
//!
//! The field is the BN254 scalar field. Elements are always encoded as 32 little-endian bytes
//! holding the canonical representative in `[0, p)`.

pub mod codec;
mod element;
mod error;

pub use element::*;
pub use error::{EncodingError, FieldError};

/// The scalar field of the constraint system.
pub type Fp = ark_bn254::Fr;

/// Number of bytes in the canonical encoding of an [`Fp`] element.
pub const FIELD_BYTES: usize = 32;
