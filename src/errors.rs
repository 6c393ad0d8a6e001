// -*- mode: rust; -*-
//
// This file is part of curve25519-cortado.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// See LICENSE for licensing information.

//! Errors which may occur when parsing wire-format byte strings into
//! curve or group elements.

use core::fmt;
use core::fmt::Display;

/// An error occurred while decoding a byte representation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DecodingError {
    /// The byte array has the wrong length for the type it was handed
    /// to, or violates a structural invariant of that type (such as a
    /// scalar encoding with the high bit set).
    InvalidRepresentation,
    /// The bytes are well-formed but do not decode to a point on the
    /// curve or an element of the group: the field encoding is
    /// non-canonical, the candidate x-coordinate is non-square, or one
    /// of the ristretto255 negativity and zero checks failed.
    InvalidEncoding,
}

impl Display for DecodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DecodingError::InvalidRepresentation => {
                write!(f, "Byte string is not a well-formed representation")
            }
            DecodingError::InvalidEncoding => {
                write!(f, "Byte string does not encode a group element")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {}
