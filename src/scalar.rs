// -*- mode: rust; -*-
//
// This file is part of curve25519-cortado.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// Portions Copyright 2017 Brian Smith
// See LICENSE for licensing information.

//! Arithmetic on scalars (integers mod the group order).
//!
//! Both the ristretto255 group and the Ed25519 basepoint have prime
//! order \\( \ell = 2\^{252} + 27742317777372353535851937790883648493 \\).
//!
//! A [`Scalar`] is stored as its canonical 32-byte little-endian
//! encoding; arithmetic unpacks into an internal nine-limb
//! radix-\\(2\^{29}\\) form, which does its modular multiplications in
//! Montgomery form.
//!
//! To create a [`Scalar`] from a supposedly canonical encoding, use
//! [`Scalar::from_canonical_bytes`], which checks the input against
//! \\( \ell \\) in constant time.  To reduce a 256- or 512-bit integer
//! modulo \\( \ell \\), use [`Scalar::from_bytes_mod_order`] or
//! [`Scalar::from_bytes_mod_order_wide`].

use core::fmt::Debug;
use core::iter::{Product, Sum};
use core::ops::Index;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;
use subtle::CtOption;

#[cfg(feature = "digest")]
use digest::generic_array::typenum::U64;
#[cfg(feature = "digest")]
use digest::Digest;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::constants;
use crate::errors::DecodingError;

/// The `Scalar` struct holds an element of \\(\mathbb Z / \ell\mathbb Z \\).
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Copy, Clone, Hash)]
pub struct Scalar {
    /// `bytes` is a little-endian byte encoding of an integer representing
    /// a scalar modulo the group order.
    ///
    /// # Invariant
    ///
    /// The integer representing this scalar is less than \\(2\^{255}\\),
    /// i.e. the most significant bit of `bytes[31]` is 0.  This is
    /// required by the radix-16 signed-digit expansion used for scalar
    /// multiplication.  The raw constructors do *not* guarantee the
    /// stronger property that the integer is below \\( \ell \\); callers
    /// obtain that from the reduction entry points.
    pub(crate) bytes: [u8; 32],
}

impl Scalar {
    /// The scalar \\( 0 \\).
    pub const ZERO: Scalar = Scalar { bytes: [0u8; 32] };

    /// The scalar \\( 1 \\).
    pub const ONE: Scalar = Scalar {
        bytes: [
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ],
    };

    /// Construct a `Scalar` by reducing a 256-bit little-endian integer
    /// modulo the group order \\( \ell \\).
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Scalar {
        // Temporarily allow s_unreduced.bytes > 2^255 ...
        let s_unreduced = Scalar { bytes };

        // Then reduce mod the group order and return the reduced scalar.
        let s = s_unreduced.reduce();
        debug_assert_eq!(s.bytes[31] >> 7, 0u8);
        s
    }

    /// Construct a `Scalar` by reducing a 512-bit little-endian integer
    /// modulo the group order \\( \ell \\).
    pub fn from_bytes_mod_order_wide(input: &[u8; 64]) -> Scalar {
        UnpackedScalar::from_bytes_wide(input).pack()
    }

    /// Attempt to construct a `Scalar` from a canonical byte
    /// representation.
    ///
    /// # Return
    ///
    /// - `Some(s)`, where `s` is the `Scalar` corresponding to `bytes`,
    ///   if `bytes` is a canonical byte representation below \\( \ell \\);
    /// - `None` if `bytes` is not a canonical byte representation.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> CtOption<Scalar> {
        let high_bit_unset = (bytes[31] >> 7).ct_eq(&0);
        let candidate = Scalar { bytes };
        CtOption::new(candidate, high_bit_unset & candidate.is_canonical())
    }

    /// Construct a `Scalar` from the low 255 bits of a 256-bit integer,
    /// without checking that the result is canonical.
    pub fn from_bits(bytes: [u8; 32]) -> Scalar {
        let mut s = Scalar { bytes };
        // Ensure invariant #1 holds.  That is, ensure that the highest
        // bit is unset, so that the scalar is at most 255 bits.
        s.bytes[31] &= 0b0111_1111;
        s
    }

    /// Convert this `Scalar` to its underlying sequence of bytes.
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// View the little-endian byte encoding of this `Scalar`.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Compute \\( ab + c \bmod \ell \\).
    ///
    /// The result is bit-exact with `&(a * b) + c`.
    pub fn multiply_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Scalar {
        let ab = UnpackedScalar::mul(&a.unpack(), &b.unpack());
        UnpackedScalar::add(&ab, &c.unpack()).pack()
    }

    /// Check whether this `Scalar` is the canonical representative mod
    /// \\( \ell \\).
    pub fn is_canonical(&self) -> Choice {
        self.ct_eq(&self.reduce())
    }

    /// Reduce this `Scalar` modulo \\( \ell \\).
    fn reduce(&self) -> Scalar {
        let x = self.unpack();
        let x_times_r = UnpackedScalar::mul_internal(&x, &constants::R);
        let x_mod_l = UnpackedScalar::montgomery_reduce(&x_times_r);
        x_mod_l.pack()
    }

    /// Unpack this `Scalar` to an `UnpackedScalar` for faster arithmetic.
    pub(crate) fn unpack(&self) -> UnpackedScalar {
        UnpackedScalar::from_bytes(&self.bytes)
    }

    #[cfg(feature = "digest")]
    /// Hash a slice of bytes into a scalar.
    ///
    /// Takes a type parameter `D`, which is any `Digest` producing 64
    /// bytes (512 bits) of output.
    pub fn hash_from_bytes<D>(input: &[u8]) -> Scalar
    where
        D: Digest<OutputSize = U64> + Default,
    {
        let mut hash = D::default();
        hash.update(input);
        Scalar::from_hash(hash)
    }

    #[cfg(feature = "digest")]
    /// Construct a scalar from an existing `Digest` instance.
    ///
    /// Use this instead of `hash_from_bytes` if it is more convenient to
    /// stream data into the `Digest` than to pass a single byte slice.
    pub fn from_hash<D>(hash: D) -> Scalar
    where
        D: Digest<OutputSize = U64>,
    {
        let mut output = [0u8; 64];
        output.copy_from_slice(hash.finalize().as_slice());
        Scalar::from_bytes_mod_order_wide(&output)
    }

    /// Write this scalar in radix 16, with coefficients in \\([-8,8)\\),
    /// i.e., compute \\(a\_i\\) such that
    /// $$
    ///    a = a\_0 + a\_1 16\^1 + \cdots + a\_{63} 16\^{63},
    /// $$
    /// with \\(-8 \leq a\_i < 8\\) for \\(0 \leq i < 63\\) and
    /// \\(-8 \leq a\_{63} \leq 8\\).
    pub(crate) fn as_radix_16(&self) -> [i8; 64] {
        debug_assert!(self.bytes[31] <= 127);
        let mut output = [0i8; 64];

        // Step 1: change radix.
        // Convert from radix 256 (bytes) to radix 16 (nibbles)
        #[inline(always)]
        fn bot_half(x: u8) -> u8 {
            x & 15
        }
        #[inline(always)]
        fn top_half(x: u8) -> u8 {
            (x >> 4) & 15
        }

        for i in 0..32 {
            output[2 * i] = bot_half(self.bytes[i]) as i8;
            output[2 * i + 1] = top_half(self.bytes[i]) as i8;
        }
        // Precondition note: since self.bytes[31] <= 127, output[63] <= 7

        // Step 2: recenter coefficients from [0,16) to [-8,8)
        for i in 0..63 {
            let carry = (output[i] + 8) >> 4;
            output[i] -= carry << 4;
            output[i + 1] += carry;
        }
        // Precondition note: output[63] is not recentered.  It increases
        // by carry <= 1.  Thus output[63] <= 8.

        output
    }

    /// Compute a width-5 "Non-Adjacent Form" of this scalar.
    ///
    /// A width-5 NAF is a signed-digit expansion
    /// $$
    ///    k = \sum_{i=0}\^{255} n\_i 2\^i,
    /// $$
    /// where each nonzero digit \\(n\_i\\) is odd and bounded by
    /// \\(|n\_i| < 16\\), and at least four zero digits separate any two
    /// nonzero digits.
    ///
    /// The length of the NAF is at most one more than the length of the
    /// binary representation of \\(k\\), which is why the scalar
    /// invariant bounding it below \\(2\^{255}\\) matters.
    ///
    /// Intended for use with public scalars only: NAF processing is not
    /// constant-time.
    pub(crate) fn non_adjacent_form(&self) -> [i8; 256] {
        debug_assert!(self.bytes[31] <= 127);
        let mut naf = [0i8; 256];

        // The top word stays zero so windows straddling bit 255 read
        // zeros past the end of the scalar.
        let mut x_u64 = [0u64; 5];
        for (word, chunk) in x_u64.iter_mut().zip(self.bytes.chunks(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }

        const WIDTH: u64 = 1 << 5;
        const WINDOW_MASK: u64 = WIDTH - 1;

        let mut pos = 0;
        let mut carry = 0;
        while pos < 256 {
            // Construct a buffer of bits of the scalar, starting at bit `pos`
            let u64_idx = pos / 64;
            let bit_idx = pos % 64;
            let bit_buf: u64 = if bit_idx < 64 - 5 {
                // This window's bits are contained in a single u64
                x_u64[u64_idx] >> bit_idx
            } else {
                // Combine the current u64's bits with the bits from the next u64
                (x_u64[u64_idx] >> bit_idx) | (x_u64[1 + u64_idx] << (64 - bit_idx))
            };

            // Add the carry into the current window
            let window = carry + (bit_buf & WINDOW_MASK);

            if window & 1 == 0 {
                // If the window value is even, preserve the carry and continue.
                // Why is the carry preserved?
                // If carry == 0 and window & 1 == 0, then the next carry should be 0
                // If carry == 1 and window & 1 == 0, then bit_buf & 1 == 1 so the next carry should be 1
                pos += 1;
                continue;
            }

            if window < WIDTH / 2 {
                carry = 0;
                naf[pos] = window as i8;
            } else {
                carry = 1;
                naf[pos] = (window as i8).wrapping_sub(WIDTH as i8);
            }

            pos += 5;
        }

        naf
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "Scalar{{\n\tbytes: {:?},\n}}", &self.bytes)
    }
}

impl Eq for Scalar {}
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.bytes.ct_eq(&other.bytes)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut bytes = [0u8; 32];
        for i in 0..32 {
            bytes[i] = u8::conditional_select(&a.bytes[i], &b.bytes[i], choice);
        }
        Scalar { bytes }
    }
}

impl Index<usize> for Scalar {
    type Output = u8;

    /// Index the bytes of the representative for this `Scalar`.
    /// Mutation is not permitted.
    fn index(&self, index: usize) -> &u8 {
        &(self.bytes[index])
    }
}

impl Default for Scalar {
    fn default() -> Scalar {
        Scalar::ZERO
    }
}

impl From<u8> for Scalar {
    fn from(x: u8) -> Scalar {
        let mut s_bytes = [0u8; 32];
        s_bytes[0] = x;
        Scalar { bytes: s_bytes }
    }
}

impl From<u64> for Scalar {
    fn from(x: u64) -> Scalar {
        let mut s_bytes = [0u8; 32];
        s_bytes[0..8].copy_from_slice(&x.to_le_bytes());
        Scalar { bytes: s_bytes }
    }
}

impl TryFrom<&[u8]> for Scalar {
    type Error = DecodingError;

    /// Construct a `Scalar` from 32 bytes, rejecting inputs of the wrong
    /// length or with the reserved high bit set.  This does not check
    /// that the value is below \\( \ell \\); use
    /// [`Scalar::from_canonical_bytes`] for that.
    fn try_from(slice: &[u8]) -> Result<Scalar, DecodingError> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| DecodingError::InvalidRepresentation)?;
        if bytes[31] > 127 {
            return Err(DecodingError::InvalidRepresentation);
        }
        Ok(Scalar { bytes })
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn add(self, rhs: &'b Scalar) -> Scalar {
        // UnpackedScalar::add produces reduced outputs when fed reduced
        // inputs, which the Scalar invariant guarantees.
        UnpackedScalar::add(&self.unpack(), &rhs.unpack()).pack()
    }
}

define_add_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> AddAssign<&'b Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &'b Scalar) {
        *self = &*self + rhs;
    }
}

define_add_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn sub(self, rhs: &'b Scalar) -> Scalar {
        UnpackedScalar::sub(&self.unpack(), &rhs.unpack()).pack()
    }
}

define_sub_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> SubAssign<&'b Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &'b Scalar) {
        *self = &*self - rhs;
    }
}

define_sub_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &'b Scalar) -> Scalar {
        UnpackedScalar::mul(&self.unpack(), &rhs.unpack()).pack()
    }
}

define_mul_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> MulAssign<&'b Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &'b Scalar) {
        *self = &*self * rhs;
    }
}

define_mul_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        &Scalar::ZERO - self
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        -&self
    }
}

impl<T> Sum<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Scalar::ZERO, |acc, item| &acc + item.borrow())
    }
}

impl<T> Product<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Scalar::ONE, |acc, item| &acc * item.borrow())
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
impl Serialize for Scalar {
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
impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                formatter.write_str("a canonical 32-byte scalar")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Scalar, A::Error>
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
                Option::from(Scalar::from_canonical_bytes(bytes))
                    .ok_or_else(|| serde::de::Error::custom("scalar was not canonically encoded"))
            }
        }

        deserializer.deserialize_tuple(32, ScalarVisitor)
    }
}

// ------------------------------------------------------------------------
// Unpacked (limbed) scalars
// ------------------------------------------------------------------------

/// The `UnpackedScalar` struct represents an element in
/// \\(\mathbb{Z} / \ell \mathbb{Z}\\) as 9 29-bit limbs.
///
/// The limb size is chosen so that a 9-by-9 product of 29-bit limbs,
/// accumulated into `u64` lanes, cannot overflow: the largest lane of
/// the schoolbook product is bounded by `(2^29 - 1)^2 * 9`, which is 62
/// bits.  The one-level Karatsuba decomposition used below stays within
/// 63 bits plus a sign, which is still safe in two's complement.
#[derive(Copy, Clone)]
pub(crate) struct UnpackedScalar(pub(crate) [u32; 9]);

/// u32 * u32 = u64 multiply helper
#[inline(always)]
fn m(x: u32, y: u32) -> u64 {
    (x as u64) * (y as u64)
}

impl UnpackedScalar {
    /// The scalar \\( 0 \\).
    pub(crate) const ZERO: UnpackedScalar = UnpackedScalar([0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Pack the limbs of this `UnpackedScalar` into a `Scalar`.
    fn pack(&self) -> Scalar {
        Scalar {
            bytes: self.as_bytes(),
        }
    }

    /// Unpack a 32 byte / 256 bit scalar into 9 29-bit limbs.
    #[rustfmt::skip] // keep alignment of s[*] calculations
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> UnpackedScalar {
        let mut words = [0u32; 8];
        for i in 0..8 {
            for j in 0..4 {
                words[i] |= (bytes[(i * 4) + j] as u32) << (j * 8);
            }
        }

        let mask = (1u32 << 29) - 1;
        let top_mask = (1u32 << 24) - 1;
        let mut s = UnpackedScalar::ZERO;

        s.0[0] =   words[0]                            & mask;
        s.0[1] = ((words[0] >> 29) | (words[1] <<  3)) & mask;
        s.0[2] = ((words[1] >> 26) | (words[2] <<  6)) & mask;
        s.0[3] = ((words[2] >> 23) | (words[3] <<  9)) & mask;
        s.0[4] = ((words[3] >> 20) | (words[4] << 12)) & mask;
        s.0[5] = ((words[4] >> 17) | (words[5] << 15)) & mask;
        s.0[6] = ((words[5] >> 14) | (words[6] << 18)) & mask;
        s.0[7] = ((words[6] >> 11) | (words[7] << 21)) & mask;
        s.0[8] =  (words[7] >>  8)                     & top_mask;

        s
    }

    /// Reduce a 64 byte / 512 bit scalar mod \\( \ell \\).
    #[rustfmt::skip] // keep alignment of lo[*] and hi[*] calculations
    pub(crate) fn from_bytes_wide(bytes: &[u8; 64]) -> UnpackedScalar {
        let mut words = [0u32; 16];
        for i in 0..16 {
            for j in 0..4 {
                words[i] |= (bytes[(i * 4) + j] as u32) << (j * 8);
            }
        }

        let mask = (1u32 << 29) - 1;
        let mut lo = UnpackedScalar::ZERO;
        let mut hi = UnpackedScalar::ZERO;

        lo.0[0] =   words[ 0]                             & mask;
        lo.0[1] = ((words[ 0] >> 29) | (words[ 1] <<  3)) & mask;
        lo.0[2] = ((words[ 1] >> 26) | (words[ 2] <<  6)) & mask;
        lo.0[3] = ((words[ 2] >> 23) | (words[ 3] <<  9)) & mask;
        lo.0[4] = ((words[ 3] >> 20) | (words[ 4] << 12)) & mask;
        lo.0[5] = ((words[ 4] >> 17) | (words[ 5] << 15)) & mask;
        lo.0[6] = ((words[ 5] >> 14) | (words[ 6] << 18)) & mask;
        lo.0[7] = ((words[ 6] >> 11) | (words[ 7] << 21)) & mask;
        lo.0[8] = ((words[ 7] >>  8) | (words[ 8] << 24)) & mask;
        hi.0[0] = ((words[ 8] >>  5) | (words[ 9] << 27)) & mask;
        hi.0[1] =  (words[ 9] >>  2)                      & mask;
        hi.0[2] = ((words[ 9] >> 31) | (words[10] <<  1)) & mask;
        hi.0[3] = ((words[10] >> 28) | (words[11] <<  4)) & mask;
        hi.0[4] = ((words[11] >> 25) | (words[12] <<  7)) & mask;
        hi.0[5] = ((words[12] >> 22) | (words[13] << 10)) & mask;
        hi.0[6] = ((words[13] >> 19) | (words[14] << 13)) & mask;
        hi.0[7] = ((words[14] >> 16) | (words[15] << 16)) & mask;
        hi.0[8] =   words[15] >> 13                             ;

        lo = UnpackedScalar::montgomery_mul(&lo, &constants::R);  // (lo * R) / R = lo
        hi = UnpackedScalar::montgomery_mul(&hi, &constants::RR); // (hi * R^2) / R = hi * R

        UnpackedScalar::add(&hi, &lo) // (hi * R) + lo
    }

    /// Pack the limbs of this `UnpackedScalar` into 32 bytes.
    #[rustfmt::skip] // keep alignment of s[*] calculations
    #[allow(clippy::identity_op)]
    pub(crate) fn as_bytes(&self) -> [u8; 32] {
        let mut s = [0u8; 32];

        s[ 0] =  (self.0[0] >>  0)                      as u8;
        s[ 1] =  (self.0[0] >>  8)                      as u8;
        s[ 2] =  (self.0[0] >> 16)                      as u8;
        s[ 3] = ((self.0[0] >> 24) | (self.0[1] << 5))  as u8;
        s[ 4] =  (self.0[1] >>  3)                      as u8;
        s[ 5] =  (self.0[1] >> 11)                      as u8;
        s[ 6] =  (self.0[1] >> 19)                      as u8;
        s[ 7] = ((self.0[1] >> 27) | (self.0[2] << 2))  as u8;
        s[ 8] =  (self.0[2] >>  6)                      as u8;
        s[ 9] =  (self.0[2] >> 14)                      as u8;
        s[10] = ((self.0[2] >> 22) | (self.0[3] << 7))  as u8;
        s[11] =  (self.0[3] >>  1)                      as u8;
        s[12] =  (self.0[3] >>  9)                      as u8;
        s[13] =  (self.0[3] >> 17)                      as u8;
        s[14] = ((self.0[3] >> 25) | (self.0[4] << 4))  as u8;
        s[15] =  (self.0[4] >>  4)                      as u8;
        s[16] =  (self.0[4] >> 12)                      as u8;
        s[17] =  (self.0[4] >> 20)                      as u8;
        s[18] = ((self.0[4] >> 28) | (self.0[5] << 1))  as u8;
        s[19] =  (self.0[5] >>  7)                      as u8;
        s[20] =  (self.0[5] >> 15)                      as u8;
        s[21] = ((self.0[5] >> 23) | (self.0[6] << 6))  as u8;
        s[22] =  (self.0[6] >>  2)                      as u8;
        s[23] =  (self.0[6] >> 10)                      as u8;
        s[24] =  (self.0[6] >> 18)                      as u8;
        s[25] = ((self.0[6] >> 26) | (self.0[7] << 3))  as u8;
        s[26] =  (self.0[7] >>  5)                      as u8;
        s[27] =  (self.0[7] >> 13)                      as u8;
        s[28] =  (self.0[7] >> 21)                      as u8;
        s[29] =  (self.0[8] >>  0)                      as u8;
        s[30] =  (self.0[8] >>  8)                      as u8;
        s[31] =  (self.0[8] >> 16)                      as u8;

        s
    }

    /// Compute `a + b` (mod \\( \ell \\)).
    pub(crate) fn add(a: &UnpackedScalar, b: &UnpackedScalar) -> UnpackedScalar {
        let mut sum = UnpackedScalar::ZERO;
        let mask = (1u32 << 29) - 1;

        // a + b
        let mut carry: u32 = 0;
        for i in 0..9 {
            carry = a.0[i] + b.0[i] + (carry >> 29);
            sum.0[i] = carry & mask;
        }

        // subtract l if the sum is >= l
        UnpackedScalar::sub(&sum, &constants::L)
    }

    /// Compute `a - b` (mod \\( \ell \\)).
    pub(crate) fn sub(a: &UnpackedScalar, b: &UnpackedScalar) -> UnpackedScalar {
        let mut difference = UnpackedScalar::ZERO;
        let mask = (1u32 << 29) - 1;

        // a - b
        let mut borrow: u32 = 0;
        for i in 0..9 {
            borrow = a.0[i].wrapping_sub(b.0[i] + (borrow >> 31));
            difference.0[i] = borrow & mask;
        }

        // conditionally add l if the difference is negative
        let underflow_mask = ((borrow >> 31) ^ 1).wrapping_sub(1);
        let mut carry: u32 = 0;
        for i in 0..9 {
            carry = (carry >> 29) + difference.0[i] + (constants::L.0[i] & underflow_mask);
            difference.0[i] = carry & mask;
        }

        difference
    }

    /// Compute `a * b`, returning the seventeen 64-bit lanes of the
    /// product.
    ///
    /// This is implemented with a one-level refined Karatsuba
    /// decomposition: the middle lanes are recovered from
    /// `(a_lo + a_hi) * (b_lo + b_hi)`, so lanes 5 through 12 are held as
    /// differences that may wrap in two's complement; `montgomery_reduce`
    /// recombines them exactly.
    #[inline(always)]
    #[rustfmt::skip] // keep alignment of z[*] calculations
    pub(crate) fn mul_internal(a: &UnpackedScalar, b: &UnpackedScalar) -> [u64; 17] {
        let a = &a.0;
        let b = &b.0;
        let mut z = [0u64; 17];

        z[0] = m(a[0], b[0]);                                                                 // c00
        z[1] = m(a[0], b[1]) + m(a[1], b[0]);                                                 // c01
        z[2] = m(a[0], b[2]) + m(a[1], b[1]) + m(a[2], b[0]);                                 // c02
        z[3] = m(a[0], b[3]) + m(a[1], b[2]) + m(a[2], b[1]) + m(a[3], b[0]);                 // c03
        z[4] = m(a[0], b[4]) + m(a[1], b[3]) + m(a[2], b[2]) + m(a[3], b[1]) + m(a[4], b[0]); // c04
        z[5] =                 m(a[1], b[4]) + m(a[2], b[3]) + m(a[3], b[2]) + m(a[4], b[1]); // c05
        z[6] =                                 m(a[2], b[4]) + m(a[3], b[3]) + m(a[4], b[2]); // c06
        z[7] =                                                 m(a[3], b[4]) + m(a[4], b[3]); // c07
        z[8] =                                                 (m(a[4], b[4])).wrapping_sub(z[3]); // c08 - c03

        z[10] = z[5].wrapping_sub(m(a[5], b[5]));                                                // c05mc10
        z[11] = z[6].wrapping_sub(m(a[5], b[6]) + m(a[6], b[5]));                                // c06mc11
        z[12] = z[7].wrapping_sub(m(a[5], b[7]) + m(a[6], b[6]) + m(a[7], b[5]));                // c07mc12
        z[13] =                   m(a[5], b[8]) + m(a[6], b[7]) + m(a[7], b[6]) + m(a[8], b[5]); // c13
        z[14] =                                   m(a[6], b[8]) + m(a[7], b[7]) + m(a[8], b[6]); // c14
        z[15] =                                                   m(a[7], b[8]) + m(a[8], b[7]); // c15
        z[16] =                                                                   m(a[8], b[8]); // c16

        z[ 5] = z[10].wrapping_sub(z[ 0]); // c05mc10 - c00
        z[ 6] = z[11].wrapping_sub(z[ 1]); // c06mc11 - c01
        z[ 7] = z[12].wrapping_sub(z[ 2]); // c07mc12 - c02
        z[ 8] = z[ 8].wrapping_sub(z[13]); // c08mc13 - c03
        z[ 9] = z[14].wrapping_add(z[ 4]); // c14 + c04
        z[10] = z[15].wrapping_add(z[10]); // c15 + c05mc10
        z[11] = z[16].wrapping_add(z[11]); // c16 + c06mc11

        let aa = [
            a[0] + a[5],
            a[1] + a[6],
            a[2] + a[7],
            a[3] + a[8],
        ];

        let bb = [
            b[0] + b[5],
            b[1] + b[6],
            b[2] + b[7],
            b[3] + b[8],
        ];

        z[ 5] = (m(aa[0], bb[0]))                                                                       .wrapping_add(z[ 5]); // c20 + c05mc10 - c00
        z[ 6] = (m(aa[0], bb[1]) + m(aa[1], bb[0]))                                                     .wrapping_add(z[ 6]); // c21 + c06mc11 - c01
        z[ 7] = (m(aa[0], bb[2]) + m(aa[1], bb[1]) + m(aa[2], bb[0]))                                   .wrapping_add(z[ 7]); // c22 + c07mc12 - c02
        z[ 8] = (m(aa[0], bb[3]) + m(aa[1], bb[2]) + m(aa[2], bb[1]) + m(aa[3], bb[0]))                 .wrapping_add(z[ 8]); // c23 + c08mc13 - c03
        z[ 9] = (m(aa[0],  b[4]) + m(aa[1], bb[3]) + m(aa[2], bb[2]) + m(aa[3], bb[1]) + m(a[4], bb[0])).wrapping_sub(z[ 9]); // c24 - c14 - c04
        z[10] = (                  m(aa[1],  b[4]) + m(aa[2], bb[3]) + m(aa[3], bb[2]) + m(a[4], bb[1])).wrapping_sub(z[10]); // c25 - c15 - c05mc10
        z[11] = (                                    m(aa[2],  b[4]) + m(aa[3], bb[3]) + m(a[4], bb[2])).wrapping_sub(z[11]); // c26 - c16 - c06mc11
        z[12] = (                                                      m(aa[3],  b[4]) + m(a[4], bb[3])).wrapping_sub(z[12]); // c27 - c07mc12

        z
    }

    /// Compute `limbs/R` (mod \\( \ell \\)), where R is the Montgomery
    /// modulus 2^261.
    #[inline(always)]
    #[rustfmt::skip] // keep alignment of part1() and part2() computations
    pub(crate) fn montgomery_reduce(limbs: &[u64; 17]) -> UnpackedScalar {
        #[inline(always)]
        fn part1(sum: u64) -> (u64, u32) {
            let p = (sum as u32).wrapping_mul(constants::LFACTOR) & ((1u32 << 29) - 1);
            ((sum + m(p, constants::L.0[0])) >> 29, p)
        }

        #[inline(always)]
        fn part2(sum: u64) -> (u64, u32) {
            let w = (sum as u32) & ((1u32 << 29) - 1);
            (sum >> 29, w)
        }

        // note: l[5], l[6], l[7] are zero, so their multiplies can be skipped
        let l = &constants::L.0;

        // the first half computes the Montgomery adjustment factor n, and
        // begins adding n*l to make the limbs divisible by R
        let (carry, n0) = part1(        limbs[ 0]);
        let (carry, n1) = part1(carry + limbs[ 1] + m(n0, l[1]));
        let (carry, n2) = part1(carry + limbs[ 2] + m(n0, l[2]) + m(n1, l[1]));
        let (carry, n3) = part1(carry + limbs[ 3] + m(n0, l[3]) + m(n1, l[2]) + m(n2, l[1]));
        let (carry, n4) = part1(carry + limbs[ 4] + m(n0, l[4]) + m(n1, l[3]) + m(n2, l[2]) + m(n3, l[1]));
        let (carry, n5) = part1(carry + limbs[ 5]               + m(n1, l[4]) + m(n2, l[3]) + m(n3, l[2]) + m(n4, l[1]));
        let (carry, n6) = part1(carry + limbs[ 6]                             + m(n2, l[4]) + m(n3, l[3]) + m(n4, l[2]) + m(n5, l[1]));
        let (carry, n7) = part1(carry + limbs[ 7]                                           + m(n3, l[4]) + m(n4, l[3]) + m(n5, l[2]) + m(n6, l[1]));
        let (carry, n8) = part1(carry + limbs[ 8] + m(n0, l[8])                                           + m(n4, l[4]) + m(n5, l[3]) + m(n6, l[2]) + m(n7, l[1]));

        // limbs is divisible by R now, so we can divide by R by simply
        // storing the upper half as the result
        let (carry, r0) = part2(carry + limbs[ 9]               + m(n1, l[8])                                           + m(n5, l[4]) + m(n6, l[3]) + m(n7, l[2]) + m(n8, l[1]));
        let (carry, r1) = part2(carry + limbs[10]                             + m(n2, l[8])                                           + m(n6, l[4]) + m(n7, l[3]) + m(n8, l[2]));
        let (carry, r2) = part2(carry + limbs[11]                                           + m(n3, l[8])                                           + m(n7, l[4]) + m(n8, l[3]));
        let (carry, r3) = part2(carry + limbs[12]                                                         + m(n4, l[8])                                           + m(n8, l[4]));
        let (carry, r4) = part2(carry + limbs[13]                                                                       + m(n5, l[8]));
        let (carry, r5) = part2(carry + limbs[14]                                                                                     + m(n6, l[8]));
        let (carry, r6) = part2(carry + limbs[15]                                                                                                   + m(n7, l[8]));
        let (carry, r7) = part2(carry + limbs[16]                                                                                                                 + m(n8, l[8]));
        let         r8 = carry as u32;

        // result may be >= l, so attempt to subtract l
        UnpackedScalar::sub(&UnpackedScalar([r0, r1, r2, r3, r4, r5, r6, r7, r8]), &constants::L)
    }

    /// Compute `a * b` (mod \\( \ell \\)).
    #[inline(never)]
    pub(crate) fn mul(a: &UnpackedScalar, b: &UnpackedScalar) -> UnpackedScalar {
        let ab = UnpackedScalar::montgomery_reduce(&UnpackedScalar::mul_internal(a, b));
        UnpackedScalar::montgomery_reduce(&UnpackedScalar::mul_internal(&ab, &constants::RR))
    }

    /// Compute `(a * b) / R` (mod \\( \ell \\)), where R is the
    /// Montgomery modulus 2^261.
    #[inline(never)]
    pub(crate) fn montgomery_mul(a: &UnpackedScalar, b: &UnpackedScalar) -> UnpackedScalar {
        UnpackedScalar::montgomery_reduce(&UnpackedScalar::mul_internal(a, b))
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
