// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::string::String;

use thiserror::Error;

/// Defines errors which can occur when a field element is decoded from its fixed-width byte
/// encoding or from its textual representation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ElementDecodingError {
    #[error("not enough bytes for a full field element; expected {0} bytes, but was {1} bytes")]
    NotEnoughBytes(usize, usize),

    #[error("too many bytes for a field element; expected {0} bytes, but was {1} bytes")]
    TooManyBytes(usize, usize),

    #[error("invalid field element: value {0} is greater than or equal to the field modulus")]
    ValueTooLarge(String),

    #[error("invalid field element: '{0}' is not a valid digit")]
    InvalidDigit(char),

    #[error("invalid field element: no digits were provided")]
    EmptyString,
}
