// -*- mode: rust; -*-
//
// This file is part of curve25519-cortado.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// See LICENSE for licensing information.

#![no_std]
#![doc = include_str!("../README.md")]
//------------------------------------------------------------------------
// Linting:
//------------------------------------------------------------------------
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//------------------------------------------------------------------------
// External dependencies:
//------------------------------------------------------------------------

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

//------------------------------------------------------------------------
// Public modules
//------------------------------------------------------------------------

// Internal macros for defining operator overload variants.
#[macro_use]
mod macros;

// Point operations on the Edwards form of Curve25519.
pub mod edwards;

// The prime-order ristretto255 group.
pub mod ristretto;

// Arithmetic on scalars mod the group order.
pub mod scalar;

// Useful constants, like the Ed25519 basepoint.
pub mod constants;

// Errors for the decoding entry points.
pub mod errors;

// Traits for identity elements.
pub mod traits;

//------------------------------------------------------------------------
// Internal modules
//------------------------------------------------------------------------

// Finite field arithmetic mod p = 2^255 - 19.
pub(crate) mod field;

// The internal curve models (projective, completed, Niels).
pub(crate) mod curve_models;

// Generic code for window lookups.
pub(crate) mod window;
