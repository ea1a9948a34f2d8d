//! Backing storage for vectors and matrices: dense arrays or sparse index/value pairs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::QuantityError;
use crate::real::Real;

/// Storage discriminator passed to vector and matrix constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Dense,
    Sparse,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Dense => f.write_str("dense"),
            StorageType::Sparse => f.write_str("sparse"),
        }
    }
}

/// Shape of a container, reported in shape and index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Vector(usize),
    Matrix { rows: usize, cols: usize },
}

impl Shape {
    /// Number of cells, saturating at `usize::MAX`
    pub fn len(&self) -> usize {
        match *self {
            Shape::Vector(len) => len,
            Shape::Matrix { rows, cols } => rows.saturating_mul(cols),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Vector(len) => write!(f, "[{len}]"),
            Shape::Matrix { rows, cols } => write!(f, "[{rows}x{cols}]"),
        }
    }
}

/// SI values of a vector or a row-major matrix.
///
/// Sparse entries are sorted by index with no duplicates; every unlisted index
/// holds exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage<T> {
    Dense(Vec<T>),
    Sparse { len: usize, entries: Vec<(usize, T)> },
}

impl<T: Real> Storage<T> {
    /// Sparse storage from index/value pairs; a repeated index keeps the last value.
    pub fn sparse(
        len: usize,
        entries: impl IntoIterator<Item = (usize, T)>,
    ) -> Result<Self, QuantityError> {
        let mut sorted = BTreeMap::new();
        for (index, value) in entries {
            if index >= len {
                return Err(QuantityError::IndexOutOfBounds {
                    index: index.to_string(),
                    shape: Shape::Vector(len),
                });
            }
            sorted.insert(index, value);
        }
        Ok(Storage::Sparse {
            len,
            entries: sorted.into_iter().collect(),
        })
    }

    /// Build storage of the requested type from dense values
    pub fn from_values(values: Vec<T>, storage_type: StorageType) -> Self {
        let dense = Storage::Dense(values);
        match storage_type {
            StorageType::Dense => dense,
            StorageType::Sparse => dense.into_sparse(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Storage::Dense(values) => values.len(),
            Storage::Sparse { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Storage::Dense(_) => StorageType::Dense,
            Storage::Sparse { .. } => StorageType::Sparse,
        }
    }

    /// Value at an index, `None` past the end
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Storage::Dense(values) => values.get(index).copied(),
            Storage::Sparse { len, entries } => {
                if index >= *len {
                    return None;
                }
                Some(
                    entries
                        .binary_search_by_key(&index, |(i, _)| *i)
                        .map(|position| entries[position].1)
                        .unwrap_or_else(|_| T::zero()),
                )
            }
        }
    }

    /// All values in index order, zeros filled in
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Storage::Dense(values) => values.clone(),
            Storage::Sparse { len, entries } => {
                let mut values = vec![T::zero(); *len];
                for &(index, value) in entries {
                    values[index] = value;
                }
                values
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |index| self.get(index).unwrap_or_else(T::zero))
    }

    pub fn into_dense(self) -> Self {
        match self {
            Storage::Dense(_) => self,
            sparse => Storage::Dense(sparse.to_vec()),
        }
    }

    /// Zero values become implicit; every other value is kept
    pub fn into_sparse(self) -> Self {
        match self {
            Storage::Dense(values) => Storage::Sparse {
                len: values.len(),
                entries: values
                    .into_iter()
                    .enumerate()
                    .filter(|(_, value)| !value.is_zero())
                    .collect(),
            },
            sparse => sparse,
        }
    }

    pub fn into_type(self, storage_type: StorageType) -> Self {
        match storage_type {
            StorageType::Dense => self.into_dense(),
            StorageType::Sparse => self.into_sparse(),
        }
    }

    /// Number of non-zero values
    pub fn cardinality(&self) -> usize {
        match self {
            Storage::Dense(values) => values.iter().filter(|v| !v.is_zero()).count(),
            Storage::Sparse { entries, .. } => entries.iter().filter(|(_, v)| !v.is_zero()).count(),
        }
    }

    pub fn sum(&self) -> T {
        match self {
            Storage::Dense(values) => values.iter().fold(T::zero(), |acc, &v| acc + v),
            Storage::Sparse { entries, .. } => {
                entries.iter().fold(T::zero(), |acc, &(_, v)| acc + v)
            }
        }
    }

    /// Apply `f` to every value. Sparse storage stays sparse when `f(0) == 0`.
    pub fn map(&self, f: impl Fn(T) -> T) -> Self {
        match self {
            Storage::Sparse { len, entries } if f(T::zero()).is_zero() => Storage::Sparse {
                len: *len,
                entries: entries.iter().map(|&(i, v)| (i, f(v))).collect(),
            },
            _ => Storage::Dense(self.iter().map(f).collect()),
        }
    }

    /// Combine two stores of equal length element-wise.
    ///
    /// Two sparse stores stay sparse when `f(0, 0) == 0`; anything else is dense.
    pub(crate) fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        match (self, other) {
            (
                Storage::Sparse { len, entries: left },
                Storage::Sparse { entries: right, .. },
            ) if f(T::zero(), T::zero()).is_zero() => {
                let mut merged = BTreeMap::new();
                for &(i, v) in left {
                    merged.insert(i, (v, T::zero()));
                }
                for &(i, v) in right {
                    merged.entry(i).or_insert((T::zero(), T::zero())).1 = v;
                }
                Storage::Sparse {
                    len: *len,
                    entries: merged
                        .into_iter()
                        .map(|(i, (l, r))| (i, f(l, r)))
                        .collect(),
                }
            }
            _ => Storage::Dense(self.iter().zip(other.iter()).map(|(l, r)| f(l, r)).collect()),
        }
    }
}

/// Element-wise combination after checking both shapes agree
pub(crate) fn zip_checked<T: Real>(
    left: (&Storage<T>, Shape),
    right: (&Storage<T>, Shape),
    f: impl Fn(T, T) -> T,
) -> Result<Storage<T>, QuantityError> {
    if left.1 != right.1 {
        return Err(QuantityError::ShapeMismatch {
            left: left.1,
            right: right.1,
        });
    }
    Ok(left.0.zip_with(right.0, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sparse_unlisted_is_zero() {
        let storage = Storage::sparse(5, [(1, 2.0), (3, 4.0)]).unwrap();
        assert_eq!(storage.get(0), Some(0.0));
        assert_eq!(storage.get(3), Some(4.0));
        assert_eq!(storage.get(5), None);
        assert_eq!(storage.to_vec(), vec![0.0, 2.0, 0.0, 4.0, 0.0]);
    }

    #[test]
    fn test_sparse_rejects_out_of_range() {
        let err = Storage::<f64>::sparse(2, [(2, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            QuantityError::IndexOutOfBounds {
                index: "2".to_string(),
                shape: Shape::Vector(2),
            }
        );
    }

    #[test]
    fn test_dense_sparse_conversion_preserves_values() {
        let dense = Storage::Dense(vec![0.0, 1.5, 0.0, -2.0]);
        let sparse = dense.clone().into_sparse();
        assert_eq!(sparse.storage_type(), StorageType::Sparse);
        assert_eq!(sparse.cardinality(), 2);
        assert_eq!(sparse.clone().into_dense(), dense);
        assert_eq!(sparse.sum(), -0.5);
    }

    #[test]
    fn test_zip_keeps_sparse() {
        let a = Storage::sparse(4, [(0, 1.0)]).unwrap();
        let b = Storage::sparse(4, [(3, 2.0)]).unwrap();
        let sum = a.zip_with(&b, |l, r| l + r);
        assert_eq!(sum.storage_type(), StorageType::Sparse);
        assert_eq!(sum.to_vec(), vec![1.0, 0.0, 0.0, 2.0]);

        let dense = Storage::Dense(vec![1.0; 4]);
        assert_eq!(a.zip_with(&dense, |l, r| l + r).storage_type(), StorageType::Dense);
    }

    #[test]
    fn test_map_densifies_when_zero_moves() {
        let a = Storage::sparse(3, [(1, 1.0)]).unwrap();
        assert_eq!(a.map(|v| v * 2.0).storage_type(), StorageType::Sparse);
        let shifted = a.map(|v| v + 1.0);
        assert_eq!(shifted, Storage::Dense(vec![1.0, 2.0, 1.0]));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Storage::Dense(vec![1.0, 2.0]);
        let b = Storage::Dense(vec![1.0, 2.0, 3.0]);
        let err = zip_checked((&a, Shape::Vector(2)), (&b, Shape::Vector(3)), |l, r| l + r)
            .unwrap_err();
        assert!(matches!(err, QuantityError::ShapeMismatch { .. }));
        assert_eq!(Shape::Matrix { rows: 2, cols: 3 }.to_string(), "[2x3]");
    }
}
