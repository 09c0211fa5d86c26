// Copyright 2024-2025 Irreducible Inc.

//! Byte-level encoding utilities shared by the circuit crates.

pub mod bits;
pub mod serialization;

pub use bytes;
pub use serialization::{DeserializeBytes, SerializationError, SerializeBytes};
