// Copyright 2025 Irreducible Inc.
//! Core datatypes shared by the circuit front end and proving backends.
//!
//! Most importantly it hosts the definition of a frozen [`ConstraintSystem`], its canonical
//! binary and JSON encodings, and the [`ProvingBackend`] seam backends plug into.

#![warn(missing_docs)]

pub mod backend;
pub mod constraint_system;
pub mod consts;
pub mod error;
pub mod verify;

pub use backend::{BackendError, ProvingBackend, ShapeCommitmentBackend, VerificationKey};
pub use constraint_system::*;
pub use error::ConstraintSystemError;
pub use tessera_field::Fp;
