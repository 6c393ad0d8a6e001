// -*- mode: rust; -*-
//
// This file is part of curve25519-cortado.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// See LICENSE for licensing information.

//! Various constants, such as the Ristretto and Ed25519 basepoints.
//!
//! The field element constants are stored as ten-limb signed
//! radix-\\(2\^{25.5}\\) arrays; each is checked against its canonical
//! byte encoding or its defining equation in the tests below.

#![allow(non_snake_case)]

#[cfg(feature = "precomputed-tables")]
use alloc::boxed::Box;

#[cfg(feature = "precomputed-tables")]
use once_cell::race::OnceBox;

#[cfg(feature = "precomputed-tables")]
use crate::curve_models::AffineNielsPoint;
#[cfg(feature = "precomputed-tables")]
use crate::edwards::EdwardsBasepointTable;
use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::field::FieldElement;
#[cfg(feature = "precomputed-tables")]
use crate::ristretto::RistrettoBasepointTable;
use crate::ristretto::{CompressedRistretto, RistrettoPoint};
use crate::scalar::Scalar;
use crate::scalar::UnpackedScalar;
#[cfg(feature = "precomputed-tables")]
use crate::window::NafLookupTable5;

/// Edwards `d` value, equal to \\( -121665/121666 \bmod p \\).
pub(crate) const EDWARDS_D: FieldElement = FieldElement::from_limbs([
    -10913610, 13857413, -15372611, 6949391, 114729,
    -8787816, -6275908, -3247719, -18696448, -12055116,
]);

/// Edwards `2*d` value, equal to \\( 2 \cdot (-121665/121666) \bmod p \\).
pub(crate) const EDWARDS_D2: FieldElement = FieldElement::from_limbs([
    -21827239, -5839606, -30745221, 13898782, 229458,
    15978800, -12551817, -6495438, 29715968, 9444199,
]);

/// One of the square roots of -1 (mod p); the nonnegative one.
pub(crate) const SQRT_M1: FieldElement = FieldElement::from_limbs([
    -32595792, -7943725, 9377950, 3500415, 12389472,
    -272473, -25146209, -2005654, 326686, 11406482,
]);

/// `= sqrt(a*d - 1)`, where `a = -1 (mod p)`, `d` is the Edwards curve
/// parameter.
pub(crate) const SQRT_AD_MINUS_ONE: FieldElement = FieldElement::from_limbs([
    24849947, -153582, -23613485, 6347715, -21072328,
    -667138, -25271143, -15367704, -870347, 14525639,
]);

/// `= 1/sqrt(a - d)`, where `a = -1 (mod p)`, `d` is the Edwards curve
/// parameter.
pub(crate) const INVSQRT_A_MINUS_D: FieldElement = FieldElement::from_limbs([
    6111485, 4156064, -27798727, 12243468, -25904040,
    120897, 20826367, -7060776, 6093568, -1986012,
]);

/// `= 1 - d^2`, where `d` is the Edwards curve parameter.
pub(crate) const ONE_MINUS_EDWARDS_D_SQUARED: FieldElement = FieldElement::from_limbs([
    6275446, -16617371, -22938544, -3773710, 11667077,
    7397348, -27922721, 1766195, -24433858, 672203,
]);

/// `= (d - 1)^2`, where `d` is the Edwards curve parameter.
pub(crate) const EDWARDS_D_MINUS_ONE_SQUARED: FieldElement = FieldElement::from_limbs([
    15551795, -11097455, -13425098, -10125071, -11896535,
    10178284, -26634327, 4729244, -5282110, -10116402,
]);

/// The Ed25519 basepoint, as a `CompressedEdwardsY`.
pub const ED25519_BASEPOINT_COMPRESSED: CompressedEdwardsY = CompressedEdwardsY([
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66,
]);

/// The Ed25519 basepoint, as an `EdwardsPoint`.
pub const ED25519_BASEPOINT_POINT: EdwardsPoint = EdwardsPoint {
    X: FieldElement::from_limbs([
        -14297830, -7645148, 16144683, -16471763, 27570974,
        -2696100, -26142465, 8378389, 20764389, 8758491,
    ]),
    Y: FieldElement::from_limbs([
        -26843541, -6710886, 13421773, -13421773, 26843546,
        6710886, -13421773, 13421773, -26843546, -6710886,
    ]),
    Z: FieldElement::from_limbs([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    T: FieldElement::from_limbs([
        28827062, -6116119, -27349572, 244363, 8635006,
        11264893, 19351346, 13413597, 16611511, -6414980,
    ]),
};

/// The ristretto255 basepoint, as a `CompressedRistretto`.
pub const RISTRETTO_BASEPOINT_COMPRESSED: CompressedRistretto = CompressedRistretto([
    0xe2, 0xf2, 0xae, 0x0a, 0x6a, 0xbc, 0x4e, 0x71, 0xa8, 0x84, 0xa9, 0x61, 0xc5, 0x00, 0x51,
    0x5f, 0x58, 0xe3, 0x0b, 0x6a, 0xa5, 0x82, 0xdd, 0x8d, 0xb6, 0xa6, 0x59, 0x45, 0xe0, 0x8d,
    0x2d, 0x76,
]);

/// The ristretto255 basepoint, as a `RistrettoPoint`.
///
/// The Ristretto group shares its basepoint with the Ed25519 curve: the
/// generator is the coset of the Ed25519 basepoint.
pub const RISTRETTO_BASEPOINT_POINT: RistrettoPoint = RistrettoPoint(ED25519_BASEPOINT_POINT);

/// `BASEPOINT_ORDER` is the order of the Ed25519 basepoint and of the
/// ristretto255 group, \\( \ell = 2\^{252} +
/// 27742317777372353535851937790883648493 \\), as a `Scalar`.
pub const BASEPOINT_ORDER: Scalar = Scalar {
    bytes: [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
        0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x10,
    ],
};

/// `L` is the order of basepoint, i.e. \\( 2\^{252} +
/// 27742317777372353535851937790883648493 \\), in radix-\\(2\^{29}\\)
/// limb form.
pub(crate) const L: UnpackedScalar = UnpackedScalar([
    0x1cf5d3ed, 0x009318d2, 0x1de73596, 0x1df3bd45, 0x0000014d, 0x00000000, 0x00000000,
    0x00000000, 0x00100000,
]);

/// `L` * `LFACTOR` = -1 (mod 2^29)
pub(crate) const LFACTOR: u32 = 0x12547e1b;

/// `R` = R % L where R = 2^261
pub(crate) const R: UnpackedScalar = UnpackedScalar([
    0x114df9ed, 0x1a617303, 0x0f7c098c, 0x16793167, 0x1ffd656e, 0x1fffffff, 0x1fffffff,
    0x1fffffff, 0x000fffff,
]);

/// `RR` = (R^2) % L where R = 2^261
pub(crate) const RR: UnpackedScalar = UnpackedScalar([
    0x0b5f9d12, 0x1e141b17, 0x158d7f3d, 0x143f3757, 0x1972d781, 0x042feb7c, 0x1ceec73d,
    0x1e184d1e, 0x0005046d,
]);

/// A precomputed table of multiples of the Ed25519 basepoint, for
/// accelerating fixed-base scalar multiplication.
///
/// The table is computed once, behind a guaranteed-once initialization,
/// the first time it is requested; afterwards it is a process-wide
/// read-only value.
#[cfg(feature = "precomputed-tables")]
pub fn ed25519_basepoint_table() -> &'static EdwardsBasepointTable {
    static TABLE: OnceBox<EdwardsBasepointTable> = OnceBox::new();
    TABLE.get_or_init(|| Box::new(EdwardsBasepointTable::create(&ED25519_BASEPOINT_POINT)))
}

/// A precomputed table of multiples of the ristretto255 basepoint, for
/// accelerating fixed-base scalar multiplication.
///
/// The table is computed once, behind a guaranteed-once initialization,
/// the first time it is requested; afterwards it is a process-wide
/// read-only value.
#[cfg(feature = "precomputed-tables")]
pub fn ristretto_basepoint_table() -> &'static RistrettoBasepointTable {
    static TABLE: OnceBox<RistrettoBasepointTable> = OnceBox::new();
    TABLE.get_or_init(|| Box::new(RistrettoBasepointTable::create(&RISTRETTO_BASEPOINT_POINT)))
}

/// Odd multiples `[B, 3B, 5B, 7B, 9B, 11B, 13B, 15B]` of the Ed25519
/// basepoint, in affine Niels form, for the variable-time double-base
/// scalar multiplication.
#[cfg(feature = "precomputed-tables")]
pub(crate) fn affine_odd_multiples_of_basepoint() -> &'static NafLookupTable5<AffineNielsPoint> {
    static TABLE: OnceBox<NafLookupTable5<AffineNielsPoint>> = OnceBox::new();
    TABLE.get_or_init(|| Box::new(NafLookupTable5::from(&ED25519_BASEPOINT_POINT)))
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
