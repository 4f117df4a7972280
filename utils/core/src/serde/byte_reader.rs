// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::vec::Vec;

use super::{Deserializable, DeserializationError, WORD_SIZE};

// BYTE READER TRAIT
// ================================================================================================

/// Defines how fixed-size chunks of bytes are read from `Self`.
///
/// A successful read advances the reader past the returned bytes. A failed read of a single
/// chunk leaves the reader where it was; a failure in the middle of [read_many()](Self::read_many)
/// leaves the values read so far consumed.
pub trait ByteReader {
    /// Returns the number of bytes which are yet to be read from `self`.
    fn remaining(&self) -> usize;

    /// Returns a byte array of length `N` read from `self`.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnexpectedEOF] if fewer than `N` bytes remain.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError>;

    /// Returns true if there are more bytes left to be read from `self`.
    fn has_more_bytes(&self) -> bool {
        self.remaining() > 0
    }

    /// Returns the next [WORD_SIZE] bytes of `self`.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnexpectedEOF] if less than a full word remains.
    fn read_word(&mut self) -> Result<[u8; WORD_SIZE], DeserializationError> {
        self.read_array()
    }

    /// Reads a deserializable value from `self`.
    fn read<D>(&mut self) -> Result<D, DeserializationError>
    where
        Self: Sized,
        D: Deserializable,
    {
        D::read_from(self)
    }

    /// Reads exactly `num_elements` values of type `D` from `self`.
    ///
    /// # Errors
    /// Returns an error as soon as one of the values could not be read.
    fn read_many<D>(&mut self, num_elements: usize) -> Result<Vec<D>, DeserializationError>
    where
        Self: Sized,
        D: Deserializable,
    {
        (0..num_elements).map(|_| D::read_from(self)).collect()
    }
}

// SLICE READER
// ================================================================================================

/// Reads chunks of bytes from a borrowed slice.
pub struct SliceReader<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Returns a reader positioned at the start of `source`.
    pub fn new(source: &'a [u8]) -> Self {
        SliceReader { source, pos: 0 }
    }

    /// Returns the number of bytes read so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ByteReader for SliceReader<'_> {
    fn remaining(&self) -> usize {
        self.source.len() - self.pos
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        let chunk = self
            .source
            .get(self.pos..)
            .and_then(|rest| rest.get(..N))
            .ok_or(DeserializationError::UnexpectedEOF(N, self.remaining()))?;

        let mut result = [0u8; N];
        result.copy_from_slice(chunk);
        self.pos += N;
        Ok(result)
    }
}
