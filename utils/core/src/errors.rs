// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::string::String;

use thiserror::Error;

// DESERIALIZATION ERROR
// ================================================================================================

/// Defines errors which can occur while reading values from a byte stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeserializationError {
    /// Bytes in the input do not represent a valid value.
    #[error("{0}")]
    InvalidValue(String),
    /// The input ended before a value could be read; holds the number of requested and the
    /// number of remaining bytes.
    #[error("unexpected end of input: {0} bytes requested, but only {1} remain")]
    UnexpectedEOF(usize, usize),
    /// Reading has finished but some bytes were left unread.
    #[error("{0} bytes remain after the last value")]
    UnconsumedBytes(usize),
}
