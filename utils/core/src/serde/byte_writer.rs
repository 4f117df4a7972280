// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::vec::Vec;

use super::{Serializable, WORD_SIZE};

// BYTE WRITER TRAIT
// ================================================================================================

/// Defines how bytes are appended to `Self`. Writers are infallible.
pub trait ByteWriter: Sized {
    /// Appends `values` to `self`.
    fn write_bytes(&mut self, values: &[u8]);

    /// Appends a single [WORD_SIZE]-byte word to `self`.
    fn write_word(&mut self, word: &[u8; WORD_SIZE]) {
        self.write_bytes(word);
    }

    /// Writes a serializable value into `self`.
    fn write<S: Serializable>(&mut self, value: S) {
        value.write_into(self)
    }

    /// Writes all `elements` back to back. No length prefix is written, so the reader must know
    /// the number of elements up front.
    fn write_many<S, T>(&mut self, elements: T)
    where
        T: IntoIterator<Item = S>,
        S: Serializable,
    {
        elements.into_iter().for_each(|element| element.write_into(self));
    }
}

impl ByteWriter for Vec<u8> {
    fn write_bytes(&mut self, values: &[u8]) {
        self.extend_from_slice(values);
    }
}
