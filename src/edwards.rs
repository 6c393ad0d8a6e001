// -*- mode: rust; -*-
//
// This file is part of curve25519-cortado.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2020 Henry de Valence
// See LICENSE for licensing information.

//! Group operations for Curve25519, in Edwards form.
//!
//! ## Encoding and Decoding
//!
//! Encoding is done by converting to and from a `CompressedEdwardsY`
//! struct, which is a typed wrapper around `[u8; 32]`.
//!
//! ## Equality Testing
//!
//! The `EdwardsPoint` struct implements the [`subtle::ConstantTimeEq`]
//! trait for constant-time equality checking, and the Rust `Eq` trait
//! for variable-time equality checking.
//!
//! ## Cofactor-related functions
//!
//! The order of the group of points on the curve \\(\mathcal E\\)
//! is \\(|\mathcal E| = 8\ell \\), so its structure is \\( \mathcal
//! E = \mathcal E\[8\] \times \mathcal E[\ell]\\).  The torsion
//! subgroup \\( \mathcal E\[8\] \\) consists of eight points of small
//! order.  Technically, all of \\(\mathcal E\\) is torsion, but we
//! use the word only to refer to the small \\(\mathcal E\[8\]\\) part, not
//! the large prime-order \\(\mathcal E[\ell]\\) part.
//!
//! To test if a point is in \\( \mathcal E\[8\] \\), use
//! [`EdwardsPoint::is_small_order`].
//!
//! To test if a point is in \\( \mathcal E[\ell] \\), use
//! [`EdwardsPoint::is_torsion_free`].
//!
//! To multiply by the cofactor, use [`EdwardsPoint::mul_by_cofactor`].
//!
//! To avoid dealing with cofactors entirely, consider using Ristretto.
//!
//! ## Scalar Multiplication
//!
//! Scalar multiplication on Edwards points is provided by:
//!
//! * the `*` operator between a [`Scalar`] and a `EdwardsPoint`, which
//!   performs constant-time variable-base scalar multiplication;
//!
//! * the `*` operator between a [`Scalar`] and an
//!   [`EdwardsBasepointTable`], which performs constant-time fixed-base
//!   scalar multiplication;
//!
//! * [`EdwardsPoint::vartime_double_scalar_mul_basepoint`], which
//!   computes \\( aA + bB \\) in variable time and must only be used
//!   with public inputs.
//!
//! ## Implementation
//!
//! The Edwards arithmetic is implemented using the “extended twisted
//! coordinates” of Hisil, Wong, Carter, and Dawson, and the
//! corresponding complete formulas.  For more details, see the
//! [`curve_models` submodule][crate::curve_models] documentation.
//!
//! ## Validity Checking
//!
//! There is no function for checking whether a point is valid.
//! Instead, the `EdwardsPoint` struct is guaranteed to hold a valid
//! point on the curve.
//!
//! We use the Rust type system to make invalid points
//! unrepresentable: `EdwardsPoint` objects can only be created via
//! successful decompression of a compressed point, or else by
//! operations on other (valid) `EdwardsPoint`s.

// We allow non snake_case names because coordinates in projective space are
// traditionally denoted by the capitalisation of their respective
// counterparts in affine space.  Yeah, you heard me, rustc, I'm gonna have my
// affine and projective cakes and eat both of them too.
#![allow(non_snake_case)]

use core::borrow::Borrow;
use core::fmt::Debug;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Neg, Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallyNegatable;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::constants;
use crate::curve_models::AffineNielsPoint;
use crate::curve_models::CompletedPoint;
use crate::curve_models::ProjectiveNielsPoint;
use crate::curve_models::ProjectivePoint;
use crate::errors::DecodingError;
use crate::field::FieldElement;
use crate::scalar::Scalar;
use crate::traits::Identity;
use crate::window::LookupTable;
use crate::window::NafLookupTable5;

// ------------------------------------------------------------------------
// Compressed points
// ------------------------------------------------------------------------

/// In "Edwards y" / "Ed25519" format, the curve point \\((x,y)\\) is
/// determined by the \\(y\\)-coordinate and the sign of \\(x\\).
///
/// The first 255 bits of a `CompressedEdwardsY` represent the
/// \\(y\\)-coordinate.  The high bit of the 32nd byte gives the sign of
/// \\(x\\).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct CompressedEdwardsY(pub [u8; 32]);

impl ConstantTimeEq for CompressedEdwardsY {
    fn ct_eq(&self, other: &CompressedEdwardsY) -> Choice {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

impl Debug for CompressedEdwardsY {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "CompressedEdwardsY: {:?}", self.as_bytes())
    }
}

impl Identity for CompressedEdwardsY {
    fn identity() -> CompressedEdwardsY {
        CompressedEdwardsY([
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ])
    }
}

impl Default for CompressedEdwardsY {
    fn default() -> CompressedEdwardsY {
        CompressedEdwardsY::identity()
    }
}

impl CompressedEdwardsY {
    /// View this `CompressedEdwardsY` as an array of bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy this `CompressedEdwardsY` to an array of bytes.
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Construct a `CompressedEdwardsY` from a slice of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError::InvalidRepresentation`] if the input
    /// `bytes` slice does not have a length of 32.
    pub fn from_slice(bytes: &[u8]) -> Result<CompressedEdwardsY, DecodingError> {
        bytes
            .try_into()
            .map(CompressedEdwardsY)
            .map_err(|_| DecodingError::InvalidRepresentation)
    }

    /// Attempt to decompress to an `EdwardsPoint`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError::InvalidEncoding`] if the input is not
    /// the \\(y\\)-coordinate of a curve point.
    pub fn decompress(&self) -> Result<EdwardsPoint, DecodingError> {
        let Y = FieldElement::from_bytes(self.as_bytes());
        let Z = FieldElement::ONE;
        let YY = Y.square();
        let u = &YY - &Z; //  u =  y²-1
        let v = &(&YY * &constants::EDWARDS_D) + &Z; //  v = dy²+1
        let (is_valid_y_coord, mut X) = FieldElement::sqrt_ratio_i(&u, &v);

        if !bool::from(is_valid_y_coord) {
            return Err(DecodingError::InvalidEncoding);
        }

        // sqrt_ratio_i always returns the nonnegative square root, so we
        // negate according to the supplied sign bit.
        let compressed_sign_bit = Choice::from(self.as_bytes()[31] >> 7);
        X.conditional_negate(compressed_sign_bit);

        Ok(EdwardsPoint {
            X,
            Y,
            Z,
            T: &X * &Y,
        })
    }
}

impl TryFrom<&[u8]> for CompressedEdwardsY {
    type Error = DecodingError;

    fn try_from(slice: &[u8]) -> Result<CompressedEdwardsY, DecodingError> {
        Self::from_slice(slice)
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for CompressedEdwardsY {
    /// Reset this `CompressedEdwardsY` to the compressed form of the
    /// identity element.
    fn zeroize(&mut self) {
        self.0.zeroize();
        self.0[0] = 1;
    }
}

// ------------------------------------------------------------------------
// Internal point representations
// ------------------------------------------------------------------------

/// An `EdwardsPoint` represents a point on the Edwards form of
/// Curve25519, in extended twisted Edwards coordinates \\((X:Y:Z:T)\\)
/// with \\(XY = ZT\\).
#[derive(Copy, Clone)]
#[allow(missing_docs)]
pub struct EdwardsPoint {
    pub(crate) X: FieldElement,
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
    pub(crate) T: FieldElement,
}

impl Identity for EdwardsPoint {
    fn identity() -> EdwardsPoint {
        EdwardsPoint {
            X: FieldElement::ZERO,
            Y: FieldElement::ONE,
            Z: FieldElement::ONE,
            T: FieldElement::ZERO,
        }
    }
}

impl Default for EdwardsPoint {
    fn default() -> EdwardsPoint {
        EdwardsPoint::identity()
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for EdwardsPoint {
    /// Reset this `EdwardsPoint` to the identity element.
    fn zeroize(&mut self) {
        self.X.zeroize();
        self.Y = FieldElement::ONE;
        self.Z = FieldElement::ONE;
        self.T.zeroize();
    }
}

// ------------------------------------------------------------------------
// Equality
// ------------------------------------------------------------------------

impl ConstantTimeEq for EdwardsPoint {
    fn ct_eq(&self, other: &EdwardsPoint) -> Choice {
        // We would like to check that the point (X/Z, Y/Z) is equal to
        // the point (X'/Z', Y'/Z') without converting into affine
        // coordinates (x, y) and (x', y'), which requires two inversions.
        // We have that X = xZ and X' = x'Z'. Thus, x = x' is equivalent to
        // (xZ)Z' = (x'Z')Z, and similarly for the y-coordinate.

        (&self.X * &other.Z).ct_eq(&(&other.X * &self.Z))
            & (&self.Y * &other.Z).ct_eq(&(&other.Y * &self.Z))
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &EdwardsPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for EdwardsPoint {}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &EdwardsPoint, b: &EdwardsPoint, choice: Choice) -> EdwardsPoint {
        EdwardsPoint {
            X: FieldElement::conditional_select(&a.X, &b.X, choice),
            Y: FieldElement::conditional_select(&a.Y, &b.Y, choice),
            Z: FieldElement::conditional_select(&a.Z, &b.Z, choice),
            T: FieldElement::conditional_select(&a.T, &b.T, choice),
        }
    }
}

// ------------------------------------------------------------------------
// Point conversions
// ------------------------------------------------------------------------

impl EdwardsPoint {
    /// Convert the representation of this point from extended
    /// coordinates to projective coordinates.
    ///
    /// Free.
    pub(crate) const fn as_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            X: self.X,
            Y: self.Y,
            Z: self.Z,
        }
    }

    /// Convert to a ProjectiveNielsPoint.
    pub(crate) fn as_projective_niels(&self) -> ProjectiveNielsPoint {
        ProjectiveNielsPoint {
            Y_plus_X: &self.Y + &self.X,
            Y_minus_X: &self.Y - &self.X,
            Z: self.Z,
            T2d: &self.T * &constants::EDWARDS_D2,
        }
    }

    /// Dehomogenize to an AffineNielsPoint.
    pub(crate) fn as_affine_niels(&self) -> AffineNielsPoint {
        let recip = self.Z.invert();
        let x = &self.X * &recip;
        let y = &self.Y * &recip;
        let xy2d = &(&x * &y) * &constants::EDWARDS_D2;
        AffineNielsPoint {
            y_plus_x: &y + &x,
            y_minus_x: &y - &x,
            xy2d,
        }
    }

    /// Compress this point to `CompressedEdwardsY` format.
    pub fn compress(&self) -> CompressedEdwardsY {
        let recip = self.Z.invert();
        let x = &self.X * &recip;
        let y = &self.Y * &recip;
        let mut s: [u8; 32] = y.as_bytes();
        s[31] ^= x.is_negative().unwrap_u8() << 7;
        CompressedEdwardsY(s)
    }
}

// ------------------------------------------------------------------------
// Doubling
// ------------------------------------------------------------------------

impl EdwardsPoint {
    /// Add this point to itself.
    pub fn double(&self) -> EdwardsPoint {
        self.as_projective().double().as_extended()
    }

    /// Compute \\([2\^k] P \\) by successive doublings.  Requires \\( k > 0 \\).
    pub(crate) fn mul_by_pow_2(&self, k: u32) -> EdwardsPoint {
        debug_assert!(k > 0);
        let mut r: CompletedPoint;
        let mut s = self.as_projective();
        for _ in 0..(k - 1) {
            r = s.double();
            s = r.as_projective();
        }
        // Unroll last iteration so we can go directly as_extended()
        s.double().as_extended()
    }

    /// Multiply by the cofactor: return \\([8]P\\).
    pub fn mul_by_cofactor(&self) -> EdwardsPoint {
        self.mul_by_pow_2(3)
    }
}

// ------------------------------------------------------------------------
// Addition and Subtraction
// ------------------------------------------------------------------------

impl<'a, 'b> Add<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;
    fn add(self, other: &'b EdwardsPoint) -> EdwardsPoint {
        (self + &other.as_projective_niels()).as_extended()
    }
}

define_add_variants!(
    LHS = EdwardsPoint,
    RHS = EdwardsPoint,
    Output = EdwardsPoint
);

impl<'b> AddAssign<&'b EdwardsPoint> for EdwardsPoint {
    fn add_assign(&mut self, rhs: &'b EdwardsPoint) {
        *self = (self as &EdwardsPoint) + rhs;
    }
}

define_add_assign_variants!(LHS = EdwardsPoint, RHS = EdwardsPoint);

impl<'a, 'b> Sub<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;
    fn sub(self, other: &'b EdwardsPoint) -> EdwardsPoint {
        (self - &other.as_projective_niels()).as_extended()
    }
}

define_sub_variants!(
    LHS = EdwardsPoint,
    RHS = EdwardsPoint,
    Output = EdwardsPoint
);

impl<'b> SubAssign<&'b EdwardsPoint> for EdwardsPoint {
    fn sub_assign(&mut self, rhs: &'b EdwardsPoint) {
        *self = (self as &EdwardsPoint) - rhs;
    }
}

define_sub_assign_variants!(LHS = EdwardsPoint, RHS = EdwardsPoint);

impl<T> Sum<T> for EdwardsPoint
where
    T: Borrow<EdwardsPoint>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(EdwardsPoint::identity(), |acc, item| acc + item.borrow())
    }
}

// ------------------------------------------------------------------------
// Negation
// ------------------------------------------------------------------------

impl<'a> Neg for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    fn neg(self) -> EdwardsPoint {
        EdwardsPoint {
            X: -(&self.X),
            Y: self.Y,
            Z: self.Z,
            T: -(&self.T),
        }
    }
}

impl Neg for EdwardsPoint {
    type Output = EdwardsPoint;

    fn neg(self) -> EdwardsPoint {
        -&self
    }
}

// ------------------------------------------------------------------------
// Scalar multiplication
// ------------------------------------------------------------------------

/// Constant-time variable-base scalar multiplication.
fn variable_base_mul(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
    // Construct a lookup table of [P, 2P, 3P, 4P, 5P, 6P, 7P, 8P].
    let lookup_table = LookupTable::<ProjectiveNielsPoint>::from(point);
    // Setting s = scalar, compute
    //
    //    s = s_0 + s_1*16^1 + ... + s_63*16^63,
    //
    // with -8 ≤ s_i < 8 for 0 ≤ i < 63 and -8 ≤ s_63 ≤ 8, and compute
    //
    //    s*P = P*(s_0 + 16*(s_1 + 16*(s_2 + ... + 16*s_63)))
    //
    // by evaluating right-to-left.  Every table select scans all eight
    // entries, so the running time does not depend on the digits.
    let scalar_digits = scalar.as_radix_16();

    let mut Q = EdwardsPoint::identity();
    for i in (0..64).rev() {
        Q = Q.mul_by_pow_2(4);
        Q = (&Q + &lookup_table.select(scalar_digits[i])).as_extended();
    }
    Q
}

impl<'a, 'b> Mul<&'b Scalar> for &'a EdwardsPoint {
    type Output = EdwardsPoint;
    /// Scalar multiplication: compute `scalar * self`.
    ///
    /// For scalar multiplication of a basepoint,
    /// `EdwardsBasepointTable` is approximately 4x faster.
    fn mul(self, scalar: &'b Scalar) -> EdwardsPoint {
        variable_base_mul(self, scalar)
    }
}

impl<'a, 'b> Mul<&'b EdwardsPoint> for &'a Scalar {
    type Output = EdwardsPoint;

    /// Scalar multiplication: compute `self * point`.
    ///
    /// For scalar multiplication of a basepoint,
    /// `EdwardsBasepointTable` is approximately 4x faster.
    fn mul(self, point: &'b EdwardsPoint) -> EdwardsPoint {
        point * self
    }
}

define_mul_variants!(LHS = EdwardsPoint, RHS = Scalar, Output = EdwardsPoint);
define_mul_variants!(LHS = Scalar, RHS = EdwardsPoint, Output = EdwardsPoint);

impl<'b> MulAssign<&'b Scalar> for EdwardsPoint {
    fn mul_assign(&mut self, scalar: &'b Scalar) {
        let result = (self as &EdwardsPoint) * scalar;
        *self = result;
    }
}

define_mul_assign_variants!(LHS = EdwardsPoint, RHS = Scalar);

impl EdwardsPoint {
    /// Compute \\( aA + bB \\) in variable time, where \\(B\\) is the
    /// Ed25519 basepoint.
    ///
    /// This is **not** a constant-time operation: the sequence of
    /// additions depends on the digits of both scalars.  Use it only
    /// when `a`, `A`, and `b` are public, as in signature verification.
    pub fn vartime_double_scalar_mul_basepoint(
        a: &Scalar,
        A: &EdwardsPoint,
        b: &Scalar,
    ) -> EdwardsPoint {
        let a_naf = a.non_adjacent_form();
        let b_naf = b.non_adjacent_form();

        // Find the starting index: the highest position where either
        // NAF has a nonzero digit.
        let mut i: usize = 255;
        for j in (0..256).rev() {
            i = j;
            if a_naf[i] != 0 || b_naf[i] != 0 {
                break;
            }
        }

        let table_A = NafLookupTable5::<ProjectiveNielsPoint>::from(A);
        #[cfg(feature = "precomputed-tables")]
        let table_B = constants::affine_odd_multiples_of_basepoint();
        #[cfg(not(feature = "precomputed-tables"))]
        let table_B =
            &NafLookupTable5::<AffineNielsPoint>::from(&constants::ED25519_BASEPOINT_POINT);

        let mut r = ProjectivePoint::identity();
        loop {
            let mut t = r.double();

            if a_naf[i] > 0 {
                t = &t.as_extended() + &table_A.select(a_naf[i] as usize);
            } else if a_naf[i] < 0 {
                t = &t.as_extended() - &table_A.select(-a_naf[i] as usize);
            }

            if b_naf[i] > 0 {
                t = &t.as_extended() + &table_B.select(b_naf[i] as usize);
            } else if b_naf[i] < 0 {
                t = &t.as_extended() - &table_B.select(-b_naf[i] as usize);
            }

            r = t.as_projective();

            if i == 0 {
                break;
            }
            i -= 1;
        }

        r.as_extended()
    }
}

// ------------------------------------------------------------------------
// Fixed-base tables
// ------------------------------------------------------------------------

/// A precomputed table of multiples of a basepoint, for accelerating
/// fixed-base scalar multiplication.  One table, for the Ed25519
/// basepoint, is available via
/// [`constants::ed25519_basepoint_table`][crate::constants::ed25519_basepoint_table].
///
/// The table stores, for each \\( i = 0 \ldots 31 \\), the lookup table
/// of multiples \\( \[1 \cdot 256\^i B, \ldots, 8 \cdot 256\^i B\] \\)
/// in affine Niels form, which is what the 64-digit radix-16 ladder in
/// [`EdwardsBasepointTable::mul_base`] consumes.
///
/// Basepoint tables are reasonably large, so they should probably be
/// created once and shared.
#[cfg(feature = "precomputed-tables")]
#[derive(Clone)]
pub struct EdwardsBasepointTable(pub(crate) [LookupTable<AffineNielsPoint>; 32]);

#[cfg(feature = "precomputed-tables")]
impl EdwardsBasepointTable {
    /// Create a table of precomputed multiples of `basepoint`.
    pub fn create(basepoint: &EdwardsPoint) -> EdwardsBasepointTable {
        let mut tables = [LookupTable::from(basepoint); 32];
        let mut Bi = *basepoint;
        for table in tables.iter_mut().skip(1) {
            // Only every second summand is precomputed (16^2 = 256).
            Bi = Bi.mul_by_pow_2(8);
            *table = LookupTable::from(&Bi);
        }
        EdwardsBasepointTable(tables)
    }

    /// Get the basepoint of this table as an `EdwardsPoint`.
    pub fn basepoint(&self) -> EdwardsPoint {
        // self.0[0].select(1) = 1*(16^2)^0*B
        // but as an `AffineNielsPoint`, so add identity to convert to extended.
        (&EdwardsPoint::identity() + &self.0[0].select(1)).as_extended()
    }

    /// Constant-time fixed-base scalar multiplication: compute
    /// \\( sB \\) where \\(B\\) is this table's basepoint.
    ///
    /// Write the scalar in radix 16 with coefficients in \\([-8, 8]\\),
    /// $$
    ///     s = s\_0 + s\_1 16\^1 + \cdots + s\_{63} 16\^{63},
    /// $$
    /// and group the even and odd coefficients:
    /// $$
    ///     sB = (s\_0 B + s\_2 16\^2 B + \cdots + s\_{62} 16\^{62} B)
    ///        + 16 (s\_1 B + s\_3 16\^2 B + \cdots + s\_{63} 16\^{62} B).
    /// $$
    /// Both sums draw only on multiples of \\( 256\^i B \\), so 32
    /// stored tables cover all 64 digits: accumulate the odd-position
    /// contributions, multiply by 16, then accumulate the even-position
    /// contributions.
    pub fn mul_base(&self, scalar: &Scalar) -> EdwardsPoint {
        let e = scalar.as_radix_16();

        let mut h = EdwardsPoint::identity();

        for i in (0..64).filter(|x| x % 2 == 1) {
            h = (&h + &self.0[i / 2].select(e[i])).as_extended();
        }

        h = h.mul_by_pow_2(4);

        for i in (0..64).filter(|x| x % 2 == 0) {
            h = (&h + &self.0[i / 2].select(e[i])).as_extended();
        }

        h
    }
}

#[cfg(feature = "precomputed-tables")]
impl<'a, 'b> Mul<&'b Scalar> for &'a EdwardsBasepointTable {
    type Output = EdwardsPoint;

    /// Construct an `EdwardsPoint` from a `Scalar` \\(a\\) by computing
    /// the multiple \\(aB\\) of this basepoint \\(B\\).
    fn mul(self, scalar: &'b Scalar) -> EdwardsPoint {
        self.mul_base(scalar)
    }
}

#[cfg(feature = "precomputed-tables")]
impl<'a, 'b> Mul<&'a EdwardsBasepointTable> for &'b Scalar {
    type Output = EdwardsPoint;

    /// Construct an `EdwardsPoint` from a `Scalar` \\(a\\) by computing
    /// the multiple \\(aB\\) of this basepoint \\(B\\).
    fn mul(self, basepoint_table: &'a EdwardsBasepointTable) -> EdwardsPoint {
        basepoint_table * self
    }
}

#[cfg(feature = "precomputed-tables")]
impl Debug for EdwardsBasepointTable {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "EdwardsBasepointTable([\n")?;
        for table in self.0.iter() {
            write!(f, "\t{:?},\n", table)?;
        }
        write!(f, "])")
    }
}

// ------------------------------------------------------------------------
// Membership predicates
// ------------------------------------------------------------------------

impl EdwardsPoint {
    /// Determine if this point is of small order.
    ///
    /// # Return
    ///
    /// * `true` if `self` is in the torsion subgroup \\( \mathcal E\[8\] \\);
    /// * `false` if `self` is not in the torsion subgroup \\( \mathcal E\[8\] \\).
    pub fn is_small_order(&self) -> bool {
        use crate::traits::IsIdentity;
        self.mul_by_cofactor().is_identity()
    }

    /// Determine if this point is “torsion-free”, i.e., is contained in
    /// the prime-order subgroup.
    ///
    /// # Return
    ///
    /// * `true` if `self` has zero torsion component and is in the
    ///   prime-order subgroup;
    /// * `false` if `self` has a nonzero torsion component and is not
    ///   in the prime-order subgroup.
    pub fn is_torsion_free(&self) -> bool {
        use crate::traits::IsIdentity;
        (self * &constants::BASEPOINT_ORDER).is_identity()
    }
}

// ------------------------------------------------------------------------
// Serde support
// ------------------------------------------------------------------------

#[cfg(feature = "serde")]
use serde::de::Visitor;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "serde")]
impl Serialize for EdwardsPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tup = serializer.serialize_tuple(32)?;
        for byte in self.compress().as_bytes().iter() {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }
}

#[cfg(feature = "serde")]
impl Serialize for CompressedEdwardsY {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tup = serializer.serialize_tuple(32)?;
        for byte in self.as_bytes().iter() {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for EdwardsPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EdwardsPointVisitor;

        impl<'de> Visitor<'de> for EdwardsPointVisitor {
            type Value = EdwardsPoint;

            fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                formatter.write_str("a valid point in Edwards y + sign format")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<EdwardsPoint, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = [0u8; 32];
                #[allow(clippy::needless_range_loop)]
                for i in 0..32 {
                    bytes[i] = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &"expected 32 bytes"))?;
                }
                CompressedEdwardsY(bytes)
                    .decompress()
                    .map_err(|_| serde::de::Error::custom("decompression failed"))
            }
        }

        deserializer.deserialize_tuple(32, EdwardsPointVisitor)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CompressedEdwardsY {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CompressedEdwardsYVisitor;

        impl<'de> Visitor<'de> for CompressedEdwardsYVisitor {
            type Value = CompressedEdwardsY;

            fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                formatter.write_str("32 bytes of data")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<CompressedEdwardsY, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = [0u8; 32];
                #[allow(clippy::needless_range_loop)]
                for i in 0..32 {
                    bytes[i] = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &"expected 32 bytes"))?;
                }
                Ok(CompressedEdwardsY(bytes))
            }
        }

        deserializer.deserialize_tuple(32, CompressedEdwardsYVisitor)
    }
}

// ------------------------------------------------------------------------
// Debug traits
// ------------------------------------------------------------------------

impl Debug for EdwardsPoint {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(
            f,
            "EdwardsPoint{{\n\tX: {:?},\n\tY: {:?},\n\tZ: {:?},\n\tT: {:?}\n}}",
            &self.X, &self.Y, &self.Z, &self.T
        )
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    /// Compressed Edwards Y form of 2*basepoint.
    fn base2_compressed() -> CompressedEdwardsY {
        CompressedEdwardsY(hex32(
            "c9a3f86aae465f0e56513864510f3997561fa2c9e85ea21dc2292309f3cd6022",
        ))
    }

    /// Compressed Edwards Y form of 16*basepoint.
    fn base16_compressed() -> CompressedEdwardsY {
        CompressedEdwardsY(hex32(
            "eb2767c137ab7ad8279c078eff116ab0786ead3a2e0f989f72c37f82f2969670",
        ))
    }

    /// 4493907448824000747700850167940867464579944529806937181821189941592931634714
    fn a_scalar() -> Scalar {
        Scalar::from_canonical_bytes(hex32(
            "1a0e978a90f6622d3747023f8ad8264da758aa1b88e040d1589e7b7f2376ef09",
        ))
        .unwrap()
    }

    /// 2506056684125797857694181776241676200180934651973138769173342316833279714961
    fn b_scalar() -> Scalar {
        Scalar::from_canonical_bytes(hex32(
            "91267acf25c2091ba217747b66f0b32e9df2a56741cfdac456a7d4aab8608a05",
        ))
        .unwrap()
    }

    /// A_SCALAR * basepoint, computed with ed25519.py
    fn a_times_basepoint() -> CompressedEdwardsY {
        CompressedEdwardsY(hex32(
            "ea27e26053df1b5956f14d5dec3c34c384a269b74cc3803ea8e2e7c9425e40a5",
        ))
    }

    /// A_SCALAR * (A_TIMES_BASEPOINT) + B_SCALAR * BASEPOINT
    /// computed with ed25519.py
    fn double_scalar_mult_result() -> CompressedEdwardsY {
        CompressedEdwardsY(hex32(
            "7dfd6c45af6d6e0eba20371a236459c4c0468343de704b85096ffe354f132b42",
        ))
    }

    /// The 8-torsion subgroup \\(\mathcal E \[8\]\\).
    ///
    /// In the case of Curve25519, it is cyclic; the \\(i\\)-th element of
    /// the array is \\(\[i\]P\\), where \\(P\\) is a point of order \\(8\\)
    /// generating \\(\mathcal E\[8\]\\).  Thus \\(\mathcal E\[8\]\\) is
    /// the points indexed by `0,2,4,6`, and \\(\mathcal E\[2\]\\) is the
    /// points indexed by `0,4`.
    const EIGHT_TORSION_COMPRESSED: [&str; 8] = [
        "0100000000000000000000000000000000000000000000000000000000000000",
        "c7176a703d4dd84fba3c0b760d10670f2a2053fa2c39ccc64ec7fd7792ac037a",
        "0000000000000000000000000000000000000000000000000000000000000080",
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc05",
        "ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc85",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "c7176a703d4dd84fba3c0b760d10670f2a2053fa2c39ccc64ec7fd7792ac03fa",
    ];

    #[test]
    fn basepoint_decompression_compression() {
        let B = constants::ED25519_BASEPOINT_COMPRESSED.decompress().unwrap();
        assert_eq!(B.compress(), constants::ED25519_BASEPOINT_COMPRESSED);
        assert_eq!(B, constants::ED25519_BASEPOINT_POINT);
    }

    #[test]
    fn decompression_sign_handling() {
        // Manually set the high bit of the last byte to flip the sign
        let mut minus_basepoint_bytes = constants::ED25519_BASEPOINT_COMPRESSED.to_bytes();
        minus_basepoint_bytes[31] |= 1 << 7;
        let minus_B = CompressedEdwardsY(minus_basepoint_bytes)
            .decompress()
            .unwrap();
        // Test projective coordinates exactly since we know they should
        // only differ by a flipped sign.
        assert_eq!(minus_B.X, -(&constants::ED25519_BASEPOINT_POINT.X));
        assert_eq!(minus_B.Y, constants::ED25519_BASEPOINT_POINT.Y);
        assert_eq!(minus_B.Z, constants::ED25519_BASEPOINT_POINT.Z);
        assert_eq!(minus_B.T, -(&constants::ED25519_BASEPOINT_POINT.T));
    }

    #[test]
    fn decompression_rejects_invalid_y() {
        // 2 is a nonsquare candidate x², so y = 2 has no corresponding
        // curve point.
        let mut two_bytes = [0u8; 32];
        two_bytes[0] = 2;
        assert_eq!(
            CompressedEdwardsY(two_bytes).decompress().unwrap_err(),
            DecodingError::InvalidEncoding
        );
    }

    #[test]
    fn from_slice_length_check() {
        assert_eq!(
            CompressedEdwardsY::from_slice(&[0u8; 31]).unwrap_err(),
            DecodingError::InvalidRepresentation
        );
        assert!(CompressedEdwardsY::from_slice(&[0u8; 32]).is_ok());
    }

    #[test]
    fn basepoint_plus_basepoint_vs_basepoint2() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let B2 = &B + &B;
        assert_eq!(B2.compress(), base2_compressed());
    }

    #[test]
    fn basepoint_plus_basepoint_projective_niels_vs_basepoint2() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let B2 = (&B + &B.as_projective_niels()).as_extended();
        assert_eq!(B2.compress(), base2_compressed());
    }

    #[test]
    fn basepoint_plus_basepoint_affine_niels_vs_basepoint2() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let B2 = (&B + &B.as_affine_niels()).as_extended();
        assert_eq!(B2.compress(), base2_compressed());
    }

    #[test]
    fn basepoint_double_vs_basepoint2() {
        let B2 = constants::ED25519_BASEPOINT_POINT.double();
        assert_eq!(B2.compress(), base2_compressed());
    }

    #[test]
    fn basepoint_double_minus_basepoint() {
        let B = constants::ED25519_BASEPOINT_POINT;
        assert_eq!(&B.double() - &B, B);
    }

    #[test]
    fn addition_commutes_and_associates() {
        use crate::traits::IsIdentity;
        let B = constants::ED25519_BASEPOINT_POINT;
        let P = B.double();
        let Q = B.mul_by_pow_2(4);
        assert_eq!(&B + &P, &P + &B);
        assert_eq!(&(&B + &P) + &Q, &B + &(&P + &Q));
        assert!((&B - &B).is_identity());
    }

    #[test]
    fn basepoint_negate_vs_zero_minus_basepoint() {
        let B = constants::ED25519_BASEPOINT_POINT;
        assert_eq!(-&B, &EdwardsPoint::identity() - &B);
    }

    #[test]
    fn basepoint_mul_vs_ed25519py() {
        let aB = &constants::ED25519_BASEPOINT_POINT * &a_scalar();
        assert_eq!(aB.compress(), a_times_basepoint());
    }

    #[test]
    fn scalar_mul_commutes_with_point() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let a = a_scalar();
        assert_eq!(&B * &a, &a * &B);
    }

    #[test]
    fn scalar_mul_is_associative_with_scalar_mul() {
        // a*(b*P) == (a*b)*P
        let B = constants::ED25519_BASEPOINT_POINT;
        let a = a_scalar();
        let b = b_scalar();
        assert_eq!(&a * &(&b * &B), &(&a * &b) * &B);
    }

    #[test]
    fn basepoint_mul_by_pow_2_4_vs_basepoint16() {
        let B16 = constants::ED25519_BASEPOINT_POINT.mul_by_pow_2(4);
        assert_eq!(B16.compress(), base16_compressed());
    }

    #[test]
    fn identity_checks() {
        use crate::traits::IsIdentity;
        assert!(EdwardsPoint::identity().is_identity());
        assert!(!constants::ED25519_BASEPOINT_POINT.is_identity());
        assert_eq!(
            EdwardsPoint::identity().compress(),
            CompressedEdwardsY::identity()
        );
    }

    #[test]
    fn vartime_double_scalar_mul_basepoint_identities() {
        let zero = Scalar::ZERO;
        let one = Scalar::ONE;
        let two = Scalar::from(2u8);
        let B = constants::ED25519_BASEPOINT_POINT;
        let I = EdwardsPoint::identity();

        // 0 * I + 0 * B = I
        assert_eq!(
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&zero, &I, &zero),
            I
        );
        // 1 * I + 0 * B = I
        assert_eq!(
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&one, &I, &zero),
            I
        );
        // 1 * I + 1 * B = B
        assert_eq!(
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&one, &I, &one),
            B
        );
        // 1 * B + 1 * B = 2 * B
        assert_eq!(
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&one, &B, &one),
            B.double()
        );
        // 1 * B + 2 * B = 3 * B
        assert_eq!(
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&one, &B, &two),
            &B.double() + &B
        );
        // 2 * B + 2 * B = 4 * B
        assert_eq!(
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&two, &B, &two),
            B.double().double()
        );
    }

    #[test]
    fn vartime_double_scalar_mul_basepoint_vs_ed25519py() {
        let A = a_times_basepoint().decompress().unwrap();
        let result =
            EdwardsPoint::vartime_double_scalar_mul_basepoint(&a_scalar(), &A, &b_scalar());
        assert_eq!(result.compress(), double_scalar_mult_result());
    }

    #[cfg(feature = "precomputed-tables")]
    #[test]
    fn basepoint_table_mul_vs_ed25519py() {
        let table = constants::ed25519_basepoint_table();
        let aB = table * &a_scalar();
        assert_eq!(aB.compress(), a_times_basepoint());
    }

    #[cfg(feature = "precomputed-tables")]
    #[test]
    fn basepoint_table_basepoint_vs_constant() {
        let table = constants::ed25519_basepoint_table();
        assert_eq!(table.basepoint(), constants::ED25519_BASEPOINT_POINT);
    }

    #[cfg(feature = "precomputed-tables")]
    #[test]
    fn basepoint_table_mul_vs_variable_base_mul() {
        // the fixed-base ladder and the variable-base ladder agree on
        // every scalar we throw at them
        let table = constants::ed25519_basepoint_table();
        let B = constants::ED25519_BASEPOINT_POINT;
        let mut s = Scalar::ONE;
        for i in 0..32 {
            s = &s * &Scalar::from((i + 41) as u64);
            s = &s + &b_scalar();
            assert_eq!((table * &s).compress(), (&B * &s).compress());
        }
    }

    #[cfg(feature = "precomputed-tables")]
    #[test]
    fn basepoint_table_mul_zero_is_identity() {
        use crate::traits::IsIdentity;
        let table = constants::ed25519_basepoint_table();
        assert!((table * &Scalar::ZERO).is_identity());
    }

    #[test]
    fn is_small_order() {
        // The basepoint has large prime order
        assert!(!constants::ED25519_BASEPOINT_POINT.is_small_order());
        // The 8-torsion points are all of small order.
        for torsion_compressed in &EIGHT_TORSION_COMPRESSED {
            let point = CompressedEdwardsY(hex32(torsion_compressed))
                .decompress()
                .unwrap();
            assert!(point.is_small_order());
        }
    }

    #[test]
    fn is_torsion_free() {
        // The basepoint is torsion-free.
        assert!(constants::ED25519_BASEPOINT_POINT.is_torsion_free());

        // Adding the identity leaves it torsion-free.
        let B = constants::ED25519_BASEPOINT_POINT;
        assert!((&B + &EdwardsPoint::identity()).is_torsion_free());

        // Adding any of the 8-torsion points (except the identity)
        // gives a point with a torsion component.
        assert_eq!(
            EdwardsPoint::identity().compress().to_bytes(),
            hex32(EIGHT_TORSION_COMPRESSED[0])
        );
        for torsion_compressed in &EIGHT_TORSION_COMPRESSED[1..] {
            let torsion = CompressedEdwardsY(hex32(torsion_compressed))
                .decompress()
                .unwrap();
            assert!(!(&B + &torsion).is_torsion_free());
        }
    }

    #[test]
    fn conditional_select_and_sum() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let I = EdwardsPoint::identity();
        assert_eq!(EdwardsPoint::conditional_select(&B, &I, Choice::from(0)), B);
        assert_eq!(EdwardsPoint::conditional_select(&B, &I, Choice::from(1)), I);

        let points = [B, B.double()];
        let sum: EdwardsPoint = points.iter().sum();
        assert_eq!(sum, &B.double() + &B);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_bincode_edwards_roundtrip() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let encoded = bincode::serialize(&B).unwrap();
        assert_eq!(encoded.len(), 32);
        let decoded: EdwardsPoint = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, B);

        let compressed = constants::ED25519_BASEPOINT_COMPRESSED;
        let encoded = bincode::serialize(&compressed).unwrap();
        let decoded: CompressedEdwardsY = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, compressed);

        // An encoding of a non-point is rejected when deserializing an
        // `EdwardsPoint`.
        let mut two_bytes = [0u8; 32];
        two_bytes[0] = 2;
        assert!(bincode::deserialize::<EdwardsPoint>(&two_bytes).is_err());
    }
}
