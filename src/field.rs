// -*- mode: rust; -*-
//
// This file is part of curve25519-cortado.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\), using signed
//! \\(32\\)-bit limbs with \\(64\\)-bit products.
//!
//! Operations defined in terms of machine arithmetic (multiplication,
//! squaring, carrying) live in the first half of this module; operations
//! defined in terms of other field operations (inversion, square roots)
//! live in the second half.

use core::fmt::Debug;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallyNegatable;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::constants;

/// A `FieldElement` represents an element of the field
/// \\( \mathbb Z / (2\^{255} - 19)\\).
///
/// A `FieldElement` is represented in radix \\(2\^{25.5}\\) as ten `i32`s,
/// so that an element \\(t\\) with entries `t[0], ..., t[9]` represents the
/// integer
/// $$
/// t\[0\] + 2\^{26} t\[1\] + 2\^{51} t\[2\] + 2\^{77} t\[3\] + 2\^{102} t\[4\]
///        + 2\^{128} t\[5\] + 2\^{153} t\[6\] + 2\^{179} t\[7\]
///        + 2\^{204} t\[8\] + 2\^{230} t\[9\].
/// $$
/// Between reductions the limbs may grow; after a multiplication,
/// squaring, or reduction the even-index limbs are bounded in magnitude by
/// \\(1.01 \cdot 2\^{25}\\) and the odd-index limbs by
/// \\(1.01 \cdot 2\^{24}\\).
///
/// The representation is not canonical in memory: equality must compare
/// canonical encodings, never limbs.
#[derive(Copy, Clone)]
pub(crate) struct FieldElement(pub(crate) [i32; 10]);

impl Debug for FieldElement {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "FieldElement({:?})", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<'b> AddAssign<&'b FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &'b FieldElement) {
        for i in 0..10 {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut output = *self;
        output += rhs;
        output
    }
}

impl<'b> SubAssign<&'b FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &'b FieldElement) {
        for i in 0..10 {
            self.0[i] -= rhs.0[i];
        }
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        let mut output = *self;
        output -= rhs;
        output
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        let mut limbs = self.0;
        for limb in &mut limbs {
            *limb = -*limb;
        }
        FieldElement(limbs)
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        let mut limbs = [0i32; 10];
        for i in 0..10 {
            limbs[i] = i32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        FieldElement(limbs)
    }

    fn conditional_assign(&mut self, other: &FieldElement, choice: Choice) {
        for i in 0..10 {
            self.0[i].conditional_assign(&other.0[i], choice);
        }
    }
}

impl ConstantTimeEq for FieldElement {
    /// Test equality between two `FieldElement`s.  Since the internal
    /// representation is not canonical, the field elements are normalized
    /// to wire format before comparison.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.as_bytes().ct_eq(&other.as_bytes())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl<'b> MulAssign<&'b FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &'b FieldElement) {
        let result = (self as &FieldElement) * rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    #[rustfmt::skip] // keep alignment of h* calculations
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        // Preconditions: |f[i]|, |g[i]| bounded by
        // 1.65*2^26, 1.65*2^25, 1.65*2^26, 1.65*2^25, etc.
        //
        // The off-diagonal products whose limb indices sum past ten wrap
        // around with a factor of 19, since 2^255 = 19 mod p; products of
        // two odd-index limbs pick up an extra factor of 2 from the
        // radix-2^25.5 layout.  Doubling the odd limbs of f and scaling
        // the limbs of g by 19 ahead of time keeps every interior
        // multiplication a single 32x32 -> 64-bit product.
        let f = &self.0;
        let g = &rhs.0;

        let f0 = f[0] as i64;
        let f1 = f[1] as i64;
        let f2 = f[2] as i64;
        let f3 = f[3] as i64;
        let f4 = f[4] as i64;
        let f5 = f[5] as i64;
        let f6 = f[6] as i64;
        let f7 = f[7] as i64;
        let f8 = f[8] as i64;
        let f9 = f[9] as i64;

        let f1_2 = (2 * f[1]) as i64;
        let f3_2 = (2 * f[3]) as i64;
        let f5_2 = (2 * f[5]) as i64;
        let f7_2 = (2 * f[7]) as i64;
        let f9_2 = (2 * f[9]) as i64;

        let g0 = g[0] as i64;
        let g1 = g[1] as i64;
        let g2 = g[2] as i64;
        let g3 = g[3] as i64;
        let g4 = g[4] as i64;
        let g5 = g[5] as i64;
        let g6 = g[6] as i64;
        let g7 = g[7] as i64;
        let g8 = g[8] as i64;
        let g9 = g[9] as i64;

        let g1_19 = 19 * g1; // 1.4*2^30
        let g2_19 = 19 * g2; // 1.4*2^31; still ok
        let g3_19 = 19 * g3;
        let g4_19 = 19 * g4;
        let g5_19 = 19 * g5;
        let g6_19 = 19 * g6;
        let g7_19 = 19 * g7;
        let g8_19 = 19 * g8;
        let g9_19 = 19 * g9;

        let h0 = f0*g0 + f1_2*g9_19 + f2*g8_19 + f3_2*g7_19 + f4*g6_19 + f5_2*g5_19 + f6*g4_19 + f7_2*g3_19 + f8*g2_19 + f9_2*g1_19;
        let h1 = f0*g1 + f1*g0      + f2*g9_19 + f3*g8_19   + f4*g7_19 + f5*g6_19   + f6*g5_19 + f7*g4_19   + f8*g3_19 + f9*g2_19;
        let h2 = f0*g2 + f1_2*g1    + f2*g0    + f3_2*g9_19 + f4*g8_19 + f5_2*g7_19 + f6*g6_19 + f7_2*g5_19 + f8*g4_19 + f9_2*g3_19;
        let h3 = f0*g3 + f1*g2      + f2*g1    + f3*g0      + f4*g9_19 + f5*g8_19   + f6*g7_19 + f7*g6_19   + f8*g5_19 + f9*g4_19;
        let h4 = f0*g4 + f1_2*g3    + f2*g2    + f3_2*g1    + f4*g0    + f5_2*g9_19 + f6*g8_19 + f7_2*g7_19 + f8*g6_19 + f9_2*g5_19;
        let h5 = f0*g5 + f1*g4      + f2*g3    + f3*g2      + f4*g1    + f5*g0      + f6*g9_19 + f7*g8_19   + f8*g7_19 + f9*g6_19;
        let h6 = f0*g6 + f1_2*g5    + f2*g4    + f3_2*g3    + f4*g2    + f5_2*g1    + f6*g0    + f7_2*g9_19 + f8*g8_19 + f9_2*g7_19;
        let h7 = f0*g7 + f1*g6      + f2*g5    + f3*g4      + f4*g3    + f5*g2      + f6*g1    + f7*g0      + f8*g9_19 + f9*g8_19;
        let h8 = f0*g8 + f1_2*g7    + f2*g6    + f3_2*g5    + f4*g4    + f5_2*g3    + f6*g2    + f7_2*g1    + f8*g0    + f9_2*g9_19;
        let h9 = f0*g9 + f1*g8      + f2*g7    + f3*g6      + f4*g5    + f5*g4      + f6*g3    + f7*g2      + f8*g1    + f9*g0;

        FieldElement::reduce([h0, h1, h2, h3, h4, h5, h6, h7, h8, h9])
    }
}

impl FieldElement {
    pub(crate) const fn from_limbs(limbs: [i32; 10]) -> FieldElement {
        FieldElement(limbs)
    }

    /// The field element \\( 0 \\).
    pub(crate) const ZERO: FieldElement =
        FieldElement::from_limbs([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// The field element \\( 1 \\).
    pub(crate) const ONE: FieldElement =
        FieldElement::from_limbs([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// The field element \\( -1 \\).
    pub(crate) const MINUS_ONE: FieldElement =
        FieldElement::from_limbs([-1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Given `k > 0`, return `self^(2^k)`.
    pub(crate) fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut z = self.square();
        for _ in 1..k {
            z = z.square();
        }
        z
    }

    /// Given unreduced coefficients `h[0], ..., h[9]` of any size, carry
    /// and reduce them mod p to obtain a `FieldElement` whose limbs have
    /// excess `b < 0.007`.
    ///
    /// In other words, the even limbs of the result are bounded in
    /// magnitude by `2^(25 + 0.007)` and the odd limbs by `2^(24 + 0.007)`.
    #[rustfmt::skip] // keep alignment of carry chain
    fn reduce(mut h: [i64; 10]) -> FieldElement {
        /// Carry the value from limb i = 0..8 to limb i+1, rounding the
        /// remainder into the signed range of the source limb.
        #[inline(always)]
        fn carry(h: &mut [i64; 10], i: usize) {
            debug_assert!(i < 9);
            let bits = if i % 2 == 0 { 26 } else { 25 };
            let c = (h[i] + (1 << (bits - 1))) >> bits;
            h[i + 1] += c;
            h[i] -= c << bits;
        }

        // Perform two halves of the carry chain in parallel.
        carry(&mut h, 0); carry(&mut h, 4);
        carry(&mut h, 1); carry(&mut h, 5);
        carry(&mut h, 2); carry(&mut h, 6);
        carry(&mut h, 3); carry(&mut h, 7);
        // Since |h[3]| < 2^63, the carry c3 satisfies |c3| < 2^38, so
        // |h[4]| < 2^25 + 2^38 going into the second carry.
        carry(&mut h, 4); carry(&mut h, 8);
        // Now |h[4]| <= 2^25 and |h[5]| < 1.01*2^24.

        // The carry out of limb 9 wraps around with a factor of 19:
        let c9 = (h[9] + (1 << 24)) >> 25;
        h[0] += c9 * 19;
        h[9] -= c9 << 25;
        // Since |h[9]| < 2^63, |c9| < 2^38, so |h[0]| < 2^25 + 19*2^38.
        carry(&mut h, 0);
        // Now |h[0]| <= 2^25 and |h[1]| < 1.01*2^24, and we're done.

        FieldElement([
            h[0] as i32,
            h[1] as i32,
            h[2] as i32,
            h[3] as i32,
            h[4] as i32,
            h[5] as i32,
            h[6] as i32,
            h[7] as i32,
            h[8] as i32,
            h[9] as i32,
        ])
    }

    /// Load a `FieldElement` from the low 255 bits of a 256-bit input.
    ///
    /// # Warning
    ///
    /// This function does not check that the input used the canonical
    /// representative.  It masks the high bit, but it will happily decode
    /// 2^255 - 18 to 1.  Applications that require a canonical encoding of
    /// every field element should decode, re-encode to the canonical
    /// encoding, and check that the input was canonical.
    #[rustfmt::skip] // keep alignment of h[*] values
    pub(crate) fn from_bytes(data: &[u8; 32]) -> FieldElement {
        #[inline]
        fn load3(b: &[u8]) -> i64 {
            (b[0] as i64) | ((b[1] as i64) << 8) | ((b[2] as i64) << 16)
        }

        #[inline]
        fn load4(b: &[u8]) -> i64 {
            (b[0] as i64) | ((b[1] as i64) << 8) | ((b[2] as i64) << 16) | ((b[3] as i64) << 24)
        }

        const LOW_23_BITS: i64 = (1 << 23) - 1;

        let mut h = [0i64; 10];
        h[0] =  load4(&data[ 0..]);
        h[1] =  load3(&data[ 4..]) << 6;
        h[2] =  load3(&data[ 7..]) << 5;
        h[3] =  load3(&data[10..]) << 3;
        h[4] =  load3(&data[13..]) << 2;
        h[5] =  load4(&data[16..]);
        h[6] =  load3(&data[20..]) << 7;
        h[7] =  load3(&data[23..]) << 5;
        h[8] =  load3(&data[26..]) << 4;
        h[9] = (load3(&data[29..]) & LOW_23_BITS) << 2;

        FieldElement::reduce(h)
    }

    /// Serialize this `FieldElement` to a 32-byte array.  The encoding is
    /// canonical.
    #[rustfmt::skip] // keep alignment of the carry chain and packing
    pub(crate) fn as_bytes(&self) -> [u8; 32] {
        // First bring the limbs within their standard bounds, so that the
        // quotient estimate below is valid even for inputs whose limbs
        // have grown through additions.
        let mut h: [i32; 10] = FieldElement::reduce([
            self.0[0] as i64,
            self.0[1] as i64,
            self.0[2] as i64,
            self.0[3] as i64,
            self.0[4] as i64,
            self.0[5] as i64,
            self.0[6] as i64,
            self.0[7] as i64,
            self.0[8] as i64,
            self.0[9] as i64,
        ]).0;

        // Write h = pq + r with 0 <= r < p; the output is r.
        //
        // For reduced limbs, q = floor(2^(-255) (h + 19 2^(-25) h9 + 1/2)),
        // evaluated as a chained shift accumulation.
        let mut q: i32 = (19 * h[9] + (1 << 24)) >> 25;
        q = (h[0] + q) >> 26;
        q = (h[1] + q) >> 25;
        q = (h[2] + q) >> 26;
        q = (h[3] + q) >> 25;
        q = (h[4] + q) >> 26;
        q = (h[5] + q) >> 25;
        q = (h[6] + q) >> 26;
        q = (h[7] + q) >> 25;
        q = (h[8] + q) >> 26;
        q = (h[9] + q) >> 25;

        // r = h - pq = h + 19q - 2^255 q
        h[0] += 19 * q;

        // Carry the result to compute r + 19q...
        let carry0 = h[0] >> 26; h[1] += carry0; h[0] -= carry0 << 26;
        let carry1 = h[1] >> 25; h[2] += carry1; h[1] -= carry1 << 25;
        let carry2 = h[2] >> 26; h[3] += carry2; h[2] -= carry2 << 26;
        let carry3 = h[3] >> 25; h[4] += carry3; h[3] -= carry3 << 25;
        let carry4 = h[4] >> 26; h[5] += carry4; h[4] -= carry4 << 26;
        let carry5 = h[5] >> 25; h[6] += carry5; h[5] -= carry5 << 25;
        let carry6 = h[6] >> 26; h[7] += carry6; h[6] -= carry6 << 26;
        let carry7 = h[7] >> 25; h[8] += carry7; h[7] -= carry7 << 25;
        let carry8 = h[8] >> 26; h[9] += carry8; h[8] -= carry8 << 26;
        // ... but instead of carrying (h[9] >> 25) = q*2^255 into another
        // limb, discard it, subtracting the value from h.
        let carry9 = h[9] >> 25;                 h[9] -= carry9 << 25;

        let mut s = [0u8; 32];
        s[ 0] =   h[0]                          as u8;
        s[ 1] =  (h[0] >>  8)                   as u8;
        s[ 2] =  (h[0] >> 16)                   as u8;
        s[ 3] = ((h[0] >> 24) | (h[1] << 2))    as u8;
        s[ 4] =  (h[1] >>  6)                   as u8;
        s[ 5] =  (h[1] >> 14)                   as u8;
        s[ 6] = ((h[1] >> 22) | (h[2] << 3))    as u8;
        s[ 7] =  (h[2] >>  5)                   as u8;
        s[ 8] =  (h[2] >> 13)                   as u8;
        s[ 9] = ((h[2] >> 21) | (h[3] << 5))    as u8;
        s[10] =  (h[3] >>  3)                   as u8;
        s[11] =  (h[3] >> 11)                   as u8;
        s[12] = ((h[3] >> 19) | (h[4] << 6))    as u8;
        s[13] =  (h[4] >>  2)                   as u8;
        s[14] =  (h[4] >> 10)                   as u8;
        s[15] =  (h[4] >> 18)                   as u8;
        s[16] =   h[5]                          as u8;
        s[17] =  (h[5] >>  8)                   as u8;
        s[18] =  (h[5] >> 16)                   as u8;
        s[19] = ((h[5] >> 24) | (h[6] << 1))    as u8;
        s[20] =  (h[6] >>  7)                   as u8;
        s[21] =  (h[6] >> 15)                   as u8;
        s[22] = ((h[6] >> 23) | (h[7] << 3))    as u8;
        s[23] =  (h[7] >>  5)                   as u8;
        s[24] =  (h[7] >> 13)                   as u8;
        s[25] = ((h[7] >> 21) | (h[8] << 4))    as u8;
        s[26] =  (h[8] >>  4)                   as u8;
        s[27] =  (h[8] >> 12)                   as u8;
        s[28] = ((h[8] >> 20) | (h[9] << 6))    as u8;
        s[29] =  (h[9] >>  2)                   as u8;
        s[30] =  (h[9] >> 10)                   as u8;
        s[31] =  (h[9] >> 18)                   as u8;

        // High bit is always cleared in the canonical encoding.
        debug_assert!((s[31] & 0b1000_0000u8) == 0u8);

        s
    }

    #[rustfmt::skip] // keep alignment of h* calculations
    fn square_inner(&self) -> [i64; 10] {
        // Squaring is multiplication with the cross terms collapsed by
        // symmetry.  Pre- and post-conditions are identical to those of
        // multiplication.
        let f = &self.0;

        let f0 = f[0] as i64;
        let f1 = f[1] as i64;
        let f2 = f[2] as i64;
        let f3 = f[3] as i64;
        let f4 = f[4] as i64;
        let f5 = f[5] as i64;
        let f6 = f[6] as i64;
        let f7 = f[7] as i64;
        let f8 = f[8] as i64;
        let f9 = f[9] as i64;

        let f0_2 = (2 * f[0]) as i64;
        let f1_2 = (2 * f[1]) as i64;
        let f2_2 = (2 * f[2]) as i64;
        let f3_2 = (2 * f[3]) as i64;
        let f4_2 = (2 * f[4]) as i64;
        let f5_2 = (2 * f[5]) as i64;
        let f6_2 = (2 * f[6]) as i64;
        let f7_2 = (2 * f[7]) as i64;

        let f5_38 = 38 * f5; // 1.31*2^30
        let f6_19 = 19 * f6; // 1.31*2^30
        let f7_38 = 38 * f7; // 1.31*2^30
        let f8_19 = 19 * f8; // 1.31*2^30
        let f9_38 = 38 * f9; // 1.31*2^30

        let mut h = [0i64; 10];
        h[0] =   f0*f0 + f1_2*f9_38 + f2_2*f8_19 + f3_2*f7_38 + f4_2*f6_19 +   f5*f5_38;
        h[1] = f0_2*f1 +   f2*f9_38 + f3_2*f8_19 +   f4*f7_38 + f5_2*f6_19;
        h[2] = f0_2*f2 + f1_2*f1    + f3_2*f9_38 + f4_2*f8_19 + f5_2*f7_38 +   f6*f6_19;
        h[3] = f0_2*f3 + f1_2*f2    +   f4*f9_38 + f5_2*f8_19 +   f6*f7_38;
        h[4] = f0_2*f4 + f1_2*f3_2  +   f2*f2    + f5_2*f9_38 + f6_2*f8_19 +   f7*f7_38;
        h[5] = f0_2*f5 + f1_2*f4    + f2_2*f3    +   f6*f9_38 + f7_2*f8_19;
        h[6] = f0_2*f6 + f1_2*f5_2  + f2_2*f4    + f3_2*f3    + f7_2*f9_38 +   f8*f8_19;
        h[7] = f0_2*f7 + f1_2*f6    + f2_2*f5    + f3_2*f4    +   f8*f9_38;
        h[8] = f0_2*f8 + f1_2*f7_2  + f2_2*f6    + f3_2*f5_2  +   f4*f4    +   f9*f9_38;
        h[9] = f0_2*f9 + f1_2*f8    + f2_2*f7    + f3_2*f6    + f4_2*f5;

        h
    }

    /// Compute `self^2`.
    pub(crate) fn square(&self) -> FieldElement {
        FieldElement::reduce(self.square_inner())
    }

    /// Compute `2*self^2`.
    pub(crate) fn square2(&self) -> FieldElement {
        let mut coeffs = self.square_inner();
        for coeff in &mut coeffs {
            *coeff += *coeff;
        }
        FieldElement::reduce(coeffs)
    }

    /// Determine if this `FieldElement` is negative, in the sense used in
    /// the ed25519 paper: `x` is negative if the low bit of its canonical
    /// encoding is set.
    pub(crate) fn is_negative(&self) -> Choice {
        let bytes = self.as_bytes();
        (bytes[0] & 1).into()
    }

    /// Determine if this `FieldElement` is zero.
    pub(crate) fn is_zero(&self) -> Choice {
        let zero = [0u8; 32];
        let bytes = self.as_bytes();
        bytes.ct_eq(&zero)
    }

    /// Compute (self^(2^250-1), self^11), used as a helper function within
    /// invert() and pow_p58().
    #[rustfmt::skip] // keep alignment of explanatory comments
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        // Each temporary variable t_i is of the form (self)^e_i.
        // Squaring t_i corresponds to multiplying e_i by 2, so the pow2k
        // function shifts e_i left by k places.  Multiplying t_i and t_j
        // corresponds to adding e_i + e_j.
        //
        // Temporary t_i                      Nonzero bits of e_i
        //
        let t0  = self.square();           // 1         e_0 = 2^1
        let t1  = t0.square().square();    // 3         e_1 = 2^3
        let t2  = self * &t1;              // 3,0       e_2 = 2^3 + 2^0
        let t3  = &t0 * &t2;               // 3,1,0
        let t4  = t3.square();             // 4,2,1
        let t5  = &t2 * &t4;               // 4,3,2,1,0
        let t6  = t5.pow2k(5);             // 9,8,7,6,5
        let t7  = &t6 * &t5;               // 9,8,7,6,5,4,3,2,1,0
        let t8  = t7.pow2k(10);            // 19..10
        let t9  = &t8 * &t7;               // 19..0
        let t10 = t9.pow2k(20);            // 39..20
        let t11 = &t10 * &t9;              // 39..0
        let t12 = t11.pow2k(10);           // 49..10
        let t13 = &t12 * &t7;              // 49..0
        let t14 = t13.pow2k(50);           // 99..50
        let t15 = &t14 * &t13;             // 99..0
        let t16 = t15.pow2k(100);          // 199..100
        let t17 = &t16 * &t15;             // 199..0
        let t18 = t17.pow2k(50);           // 249..50
        let t19 = &t18 * &t13;             // 249..0

        (t19, t3)
    }

    /// Given a nonzero field element, compute its inverse.
    ///
    /// The inverse is computed as self^(p-2), since x^(p-2)x = x^(p-1) = 1
    /// (mod p).
    ///
    /// This function returns zero on input zero.
    #[rustfmt::skip] // keep alignment of explanatory comments
    pub(crate) fn invert(&self) -> FieldElement {
        // The bits of p-2 = 2^255 -19 -2 are 11010111111...11.
        //
        //                                 nonzero bits of exponent
        let (t19, t3) = self.pow22501();   // t19: 249..0 ; t3: 3,1,0
        let t20 = t19.pow2k(5);            // 254..5
        let t21 = &t20 * &t3;              // 254..5,3,1,0

        t21
    }

    /// Raise this field element to the power (p-5)/8 = 2^252 -3.
    #[rustfmt::skip] // keep alignment of explanatory comments
    fn pow_p58(&self) -> FieldElement {
        // The bits of (p-5)/8 are 101111.....11.
        //
        //                                 nonzero bits of exponent
        let (t19, _) = self.pow22501();    // 249..0
        let t20 = t19.pow2k(2);            // 251..2
        let t21 = self * &t20;             // 251..2,0

        t21
    }

    /// Given `FieldElements` `u` and `v`, compute either `sqrt(u/v)` or
    /// `sqrt(i*u/v)` in constant time.
    ///
    /// This function always returns the nonnegative square root.
    ///
    /// # Return
    ///
    /// - `(Choice(1), +sqrt(u/v))  ` if `v` is nonzero and `u/v` is square;
    /// - `(Choice(1), zero)        ` if `u` is zero;
    /// - `(Choice(0), zero)        ` if `v` is zero and `u` is nonzero;
    /// - `(Choice(0), +sqrt(i*u/v))` if `u/v` is nonsquare (so `i*u/v` is square).
    pub(crate) fn sqrt_ratio_i(u: &FieldElement, v: &FieldElement) -> (Choice, FieldElement) {
        // Using the same trick as in ed25519 decoding, we merge the
        // inversion, the square root, and the square test as follows.
        //
        // To compute sqrt(α), we can compute β = α^((p+3)/8).
        // Then β^2 = ±α, so multiplying β by sqrt(-1) if necessary
        // gives sqrt(α).
        //
        // To compute 1/sqrt(α), we observe that
        //    1/β = α^(p-1 - (p+3)/8) = α^((7p-11)/8)
        //                            = α^3 * (α^7)^((p-5)/8).
        //
        // We can therefore compute sqrt(u/v) = sqrt(u)/sqrt(v)
        // by first computing
        //    r = u^((p+3)/8) v^(p-1-(p+3)/8)
        //      = u u^((p-5)/8) v^3 (v^7)^((p-5)/8)
        //      = (uv^3) (uv^7)^((p-5)/8).
        //
        // If v is nonzero and u/v is square, then r^2 = ±u/v,
        //                                     so vr^2 = ±u.
        // If vr^2 =  u, then sqrt(u/v) = r.
        // If vr^2 = -u, then sqrt(u/v) = r*sqrt(-1).
        //
        // If v is zero, r is also zero.

        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let i = &constants::SQRT_M1;

        let correct_sign_sqrt = check.ct_eq(u);
        let flipped_sign_sqrt = check.ct_eq(&(-u));
        let flipped_sign_sqrt_i = check.ct_eq(&(&(-u) * i));

        let r_prime = &constants::SQRT_M1 * &r;
        r.conditional_assign(&r_prime, flipped_sign_sqrt | flipped_sign_sqrt_i);

        // Choose the nonnegative square root.
        let r_is_negative = r.is_negative();
        r.conditional_negate(r_is_negative);

        let was_nonzero_square = correct_sign_sqrt | flipped_sign_sqrt;

        (was_nonzero_square, r)
    }

    /// Attempt to compute `sqrt(1/self)` in constant time.
    ///
    /// This function always returns the nonnegative square root.
    ///
    /// # Return
    ///
    /// - `(Choice(1), +sqrt(1/self))` if `self` is a nonzero square;
    /// - `(Choice(0), zero)         ` if `self` is zero;
    /// - `(Choice(0), +sqrt(i/self))` if `self` is a nonzero nonsquare.
    pub(crate) fn invsqrt(&self) -> (Choice, FieldElement) {
        FieldElement::sqrt_ratio_i(&FieldElement::ONE, self)
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Random element a of GF(2^255-19), from Sage:
    /// a = 1070314506888354081329385823235218444233221\
    ///     2228051251926706380353716438957572
    static A_BYTES: [u8; 32] = [
        0x04, 0xfe, 0xdf, 0x98, 0xa7, 0xfa, 0x0a, 0x68,
        0x84, 0x92, 0xbd, 0x59, 0x08, 0x07, 0xa7, 0x03,
        0x9e, 0xd1, 0xf6, 0xf2, 0xe1, 0xd9, 0xe2, 0xa4,
        0xa4, 0x51, 0x47, 0x36, 0xf3, 0xc3, 0xa9, 0x17,
    ];
    /// Byte representation of a**2
    static ASQ_BYTES: [u8; 32] = [
        0x75, 0x97, 0x24, 0x9e, 0xe6, 0x06, 0xfe, 0xab,
        0x24, 0x04, 0x56, 0x68, 0x07, 0x91, 0x2d, 0x5d,
        0x0b, 0x0f, 0x3f, 0x1c, 0xb2, 0x6e, 0xf2, 0xe2,
        0x63, 0x9c, 0x12, 0xba, 0x73, 0x0b, 0xe3, 0x62,
    ];
    /// Byte representation of 1/a
    static AINV_BYTES: [u8; 32] = [
        0x96, 0x1b, 0xcd, 0x8d, 0x4d, 0x5e, 0xa2, 0x3a,
        0xe9, 0x36, 0x37, 0x93, 0xdb, 0x7b, 0x4d, 0x70,
        0xb8, 0x0d, 0xc0, 0x55, 0xd0, 0x4c, 0x1d, 0x7b,
        0x90, 0x71, 0xd8, 0xe9, 0xb6, 0x18, 0xe6, 0x30,
    ];
    /// Byte representation of a^((p-5)/8)
    static AP58_BYTES: [u8; 32] = [
        0x6a, 0x4f, 0x24, 0x89, 0x1f, 0x57, 0x60, 0x36,
        0xd0, 0xbe, 0x12, 0x3c, 0x8f, 0xf5, 0xb1, 0x59,
        0xe0, 0xf0, 0xb8, 0x1b, 0x20, 0xd2, 0xb5, 0x1f,
        0x15, 0x21, 0xf9, 0xe3, 0xe1, 0x61, 0x21, 0x55,
    ];

    #[test]
    fn a_mul_a_vs_a_squared_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let asq = FieldElement::from_bytes(&ASQ_BYTES);
        assert_eq!(asq, &a * &a);
    }

    #[test]
    fn a_square_vs_a_squared_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let asq = FieldElement::from_bytes(&ASQ_BYTES);
        assert_eq!(asq, a.square());
    }

    #[test]
    fn a_square2_vs_a_squared_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let asq = FieldElement::from_bytes(&ASQ_BYTES);
        assert_eq!(a.square2(), &asq + &asq);
    }

    #[test]
    fn a_invert_vs_inverse_of_a_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let ainv = FieldElement::from_bytes(&AINV_BYTES);
        let should_be_inverse = a.invert();
        assert_eq!(ainv, should_be_inverse);
        assert_eq!(FieldElement::ONE, &a * &should_be_inverse);
    }

    #[test]
    fn a_p58_vs_ap58_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let ap58 = FieldElement::from_bytes(&AP58_BYTES);
        assert_eq!(ap58, a.pow_p58());
    }

    #[test]
    fn equality() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let ainv = FieldElement::from_bytes(&AINV_BYTES);
        assert!(a == a);
        assert!(a != ainv);
    }

    #[test]
    fn mul_distributes_over_add() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let b = FieldElement::from_bytes(&ASQ_BYTES);
        let c = FieldElement::from_bytes(&AINV_BYTES);
        assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
    }

    #[test]
    fn sqrt_ratio_behavior() {
        let zero = FieldElement::ZERO;
        let one = FieldElement::ONE;
        let i = constants::SQRT_M1;
        let two = &one + &one; // 2 is nonsquare mod p.
        let four = &two + &two; // 4 is square mod p.

        // 0/0 should return (1, 0) since u is 0
        let (choice, sqrt) = FieldElement::sqrt_ratio_i(&zero, &zero);
        assert!(bool::from(choice));
        assert_eq!(sqrt, zero);
        assert!(!bool::from(sqrt.is_negative()));

        // 1/0 should return (0, 0) since v is 0, u is nonzero
        let (choice, sqrt) = FieldElement::sqrt_ratio_i(&one, &zero);
        assert!(!bool::from(choice));
        assert_eq!(sqrt, zero);
        assert!(!bool::from(sqrt.is_negative()));

        // 2/1 is nonsquare, so we expect (0, sqrt(i*2))
        let (choice, sqrt) = FieldElement::sqrt_ratio_i(&two, &one);
        assert!(!bool::from(choice));
        assert_eq!(sqrt.square(), &two * &i);
        assert!(!bool::from(sqrt.is_negative()));

        // 4/1 is square, so we expect (1, sqrt(4))
        let (choice, sqrt) = FieldElement::sqrt_ratio_i(&four, &one);
        assert!(bool::from(choice));
        assert_eq!(sqrt.square(), four);
        assert!(!bool::from(sqrt.is_negative()));

        // 1/4 is square, so we expect (1, 1/sqrt(4))
        let (choice, sqrt) = FieldElement::sqrt_ratio_i(&one, &four);
        assert!(bool::from(choice));
        assert_eq!(&sqrt.square() * &four, one);
        assert!(!bool::from(sqrt.is_negative()));
    }

    #[test]
    fn from_bytes_highbit_is_ignored() {
        let mut highbit_set = A_BYTES;
        highbit_set[31] |= 0x80;
        let with_highbit_set = FieldElement::from_bytes(&highbit_set);
        let without_highbit_set = FieldElement::from_bytes(&A_BYTES);
        assert_eq!(without_highbit_set, with_highbit_set);
    }

    #[test]
    fn encoding_is_canonical() {
        // Encode 1 wrongly as 1 + (2^255 - 19) = 2^255 - 18
        let one_encoded_wrongly_bytes: [u8; 32] = [
            0xee, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
        ];
        // Decode to a field element
        let one = FieldElement::from_bytes(&one_encoded_wrongly_bytes);
        // then check that the encoding is correct
        let one_bytes = one.as_bytes();
        assert_eq!(one_bytes[0], 1);
        for byte in &one_bytes[1..] {
            assert_eq!(*byte, 0);
        }
    }

    #[test]
    fn encode_and_decode_on_zero() {
        let zero = [0u8; 32];
        let a = FieldElement::from_bytes(&zero);
        assert_eq!(a, FieldElement::ZERO);
        assert_eq!(a.as_bytes(), zero);
        assert!(bool::from(a.is_zero()));
    }

    #[test]
    fn conditional_negate() {
        let one = FieldElement::ONE;
        let minus_one = FieldElement::MINUS_ONE;
        let mut x = one;
        x.conditional_negate(Choice::from(1));
        assert_eq!(x, minus_one);
        x.conditional_negate(Choice::from(0));
        assert_eq!(x, minus_one);
        x.conditional_negate(Choice::from(1));
        assert_eq!(x, one);
    }

    #[test]
    fn conditional_select() {
        let a = FieldElement::from_limbs([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let b = FieldElement::from_limbs([10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(a, FieldElement::conditional_select(&a, &b, Choice::from(0)));
        assert_eq!(b, FieldElement::conditional_select(&a, &b, Choice::from(1)));
        let mut x = a;
        x.conditional_assign(&b, Choice::from(1));
        assert_eq!(x, b);
    }

    #[test]
    fn minus_one_vs_encoded_p_minus_one() {
        let mut p_minus_one = [0xffu8; 32];
        p_minus_one[0] = 0xec;
        p_minus_one[31] = 0x7f;
        assert_eq!(FieldElement::MINUS_ONE.as_bytes(), p_minus_one);
        assert!(bool::from(FieldElement::MINUS_ONE.is_negative()));
    }
}
