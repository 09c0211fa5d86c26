// Copyright 2025 Irreducible Inc.
//! Layout constants of the gate table.

/// Number of witness columns in every row.
pub const COLUMNS: usize = 15;

/// Number of leading columns that take part in the permutation argument.
///
/// Every gate carries exactly this many wires.
pub const PERMUTS: usize = 7;

/// Coefficients of a single generic gate: `[sl, sr, so, sm, sc]`.
pub const GENERIC_COEFFS: usize = 5;

/// Rows reserved at the end of the domain for zero-knowledge padding.
pub const DEFAULT_ZK_ROWS: usize = 3;

pub use tessera_field::FIELD_BYTES;

const _: () = assert!(PERMUTS <= COLUMNS);
