use std::{iter::FusedIterator, marker::PhantomData};

use super::Table;
use crate::{
    io::{read_scalar, Scalar},
    types::{UOffset, SIZE_UOFFSET},
};

/// A typed view of a vector of scalars inside a buffer.
#[derive(Debug, Clone, Copy)]
pub struct Vector<'a, T> {
    bytes: &'a [u8],
    start: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Scalar> Vector<'a, T> {
    /// Creates a view of `len` elements starting at absolute position `start`.
    pub fn new(bytes: &'a [u8], start: UOffset, len: usize) -> Self {
        Vector {
            bytes,
            start: start as usize,
            len,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len {
            Some(read_scalar(&self.bytes[self.start + index * T::SIZE..]))
        } else {
            None
        }
    }

    /// Returns the raw little-endian bytes of all elements.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.bytes[self.start..self.start + self.len * T::SIZE]
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> VectorIter<'a, T> {
        VectorIter {
            vector: *self,
            index: 0,
        }
    }
}

impl<'a, T: Scalar> IntoIterator for Vector<'a, T> {
    type Item = T;
    type IntoIter = VectorIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`Vector`].
#[derive(Debug, Clone)]
pub struct VectorIter<'a, T> {
    vector: Vector<'a, T>,
    index: usize,
}

impl<T: Scalar> Iterator for VectorIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.vector.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T: Scalar> ExactSizeIterator for VectorIter<'_, T> {}

impl<T: Scalar> FusedIterator for VectorIter<'_, T> {}

/// A view of a vector of table references.
#[derive(Debug, Clone, Copy)]
pub struct TableVector<'a> {
    bytes: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> TableVector<'a> {
    /// Creates a view of `len` references starting at absolute position `start`.
    pub fn new(bytes: &'a [u8], start: UOffset, len: usize) -> Self {
        TableVector {
            bytes,
            start: start as usize,
            len,
        }
    }

    /// Returns the number of tables.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the table at `index`, or `None` past the end.
    #[allow(clippy::cast_possible_truncation)]
    pub fn get(&self, index: usize) -> Option<Table<&'a [u8]>> {
        if index >= self.len {
            return None;
        }

        let slot = self.start + index * SIZE_UOFFSET;
        let pos = slot as UOffset + read_scalar::<UOffset>(&self.bytes[slot..]);
        Some(Table::new(self.bytes, pos))
    }

    /// Returns an iterator over the tables.
    pub fn iter(&self) -> TableVectorIter<'a> {
        TableVectorIter {
            vector: *self,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for TableVector<'a> {
    type Item = Table<&'a [u8]>;
    type IntoIter = TableVectorIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tables of a [`TableVector`].
#[derive(Debug, Clone)]
pub struct TableVectorIter<'a> {
    vector: TableVector<'a>,
    index: usize,
}

impl<'a> Iterator for TableVectorIter<'a> {
    type Item = Table<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.vector.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TableVectorIter<'_> {}

impl FusedIterator for TableVectorIter<'_> {}
