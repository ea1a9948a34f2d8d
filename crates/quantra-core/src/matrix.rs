//! Row-major matrices of one quantity sharing a display unit

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Neg, Sub};
use std::sync::Arc;

use crate::dimension::DimensionVector;
use crate::error::QuantityError;
use crate::generic::{ClassifiedMatrix, SiMatrix};
use crate::real::Real;
use crate::registry::UnitRegistry;
use crate::scalar::{
    check_kind, check_pairing, check_quantity, paired_relative, Absolute, Kind, Relative, Scalar,
};
use crate::storage::{zip_checked, Shape, Storage, StorageType};
use crate::types::{Quantity, Unit};
use crate::vector::Vector;

/// One explicit cell of a sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SparseEntry<K: Kind = Relative, T: Real = f64> {
    pub row: usize,
    pub col: usize,
    pub value: Scalar<K, T>,
}

impl<K: Kind, T: Real> SparseEntry<K, T> {
    pub fn new(row: usize, col: usize, value: Scalar<K, T>) -> Self {
        Self { row, col, value }
    }
}

/// Row-major SI values of one quantity, dense or sparse
#[derive(Clone)]
pub struct Matrix<K: Kind = Relative, T: Real = f64> {
    rows: usize,
    cols: usize,
    storage: Storage<T>,
    unit: Unit,
    kind: PhantomData<K>,
}

pub type RelMatrix<T = f64> = Matrix<Relative, T>;
pub type AbsMatrix<T = f64> = Matrix<Absolute, T>;
pub type FloatRelMatrix = Matrix<Relative, f32>;
pub type FloatAbsMatrix = Matrix<Absolute, f32>;

/// Column count shared by every row; ragged input is a shape mismatch
fn column_count<V>(rows: &[Vec<V>]) -> Result<usize, QuantityError> {
    let cols = rows.first().map_or(0, Vec::len);
    for row in rows {
        if row.len() != cols {
            return Err(QuantityError::ShapeMismatch {
                left: Shape::Vector(cols),
                right: Shape::Vector(row.len()),
            });
        }
    }
    Ok(cols)
}

impl<K: Kind, T: Real> Matrix<K, T> {
    /// Rows of values expressed in `unit`
    pub fn new(values: &[Vec<T>], unit: &Unit, storage_type: StorageType) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        let cols = column_count(values)?;
        let si = values
            .iter()
            .flatten()
            .map(|&v| T::of_f64(unit.to_standard(v.as_f64())))
            .collect();
        Ok(Self::with_storage(
            values.len(),
            cols,
            Storage::from_values(si, storage_type),
            unit.clone(),
        ))
    }

    /// Rows of SI values, displayed in `unit`
    pub fn from_si(values: &[Vec<T>], unit: &Unit, storage_type: StorageType) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        let cols = column_count(values)?;
        let si = values.iter().flatten().copied().collect();
        Ok(Self::with_storage(
            values.len(),
            cols,
            Storage::from_values(si, storage_type),
            unit.clone(),
        ))
    }

    /// Rows of scalars stored by their SI values.
    ///
    /// `unit` defaults to the first scalar's unit and is required when there are
    /// no scalars.
    pub fn from_scalars(
        scalars: &[Vec<Scalar<K, T>>],
        unit: Option<&Unit>,
        storage_type: StorageType,
    ) -> Result<Self, QuantityError> {
        let unit = match (unit, scalars.iter().flatten().next()) {
            (Some(unit), _) => unit,
            (None, Some(first)) => first.unit(),
            (None, None) => return Err(QuantityError::MissingArgument("unit")),
        };
        check_kind::<K>(unit)?;
        let cols = column_count(scalars)?;
        for scalar in scalars.iter().flatten() {
            check_quantity(unit, scalar.unit())?;
        }
        let si = scalars.iter().flatten().map(Scalar::si).collect();
        Ok(Self::with_storage(
            scalars.len(),
            cols,
            Storage::from_values(si, storage_type),
            unit.clone(),
        ))
    }

    /// Sparse matrix holding only the given cells; every other cell is zero.
    ///
    /// A repeated cell keeps the last entry.
    pub fn from_sparse(
        rows: usize,
        cols: usize,
        entries: &[SparseEntry<K, T>],
        unit: Option<&Unit>,
    ) -> Result<Self, QuantityError> {
        let unit = match (unit, entries.first()) {
            (Some(unit), _) => unit,
            (None, Some(first)) => first.value.unit(),
            (None, None) => return Err(QuantityError::MissingArgument("unit")),
        };
        check_kind::<K>(unit)?;
        let shape = Shape::Matrix { rows, cols };
        let len = rows.checked_mul(cols).ok_or(QuantityError::ShapeMismatch {
            left: shape,
            right: Shape::Vector(usize::MAX),
        })?;
        for entry in entries {
            if entry.row >= rows || entry.col >= cols {
                return Err(QuantityError::IndexOutOfBounds {
                    index: format!("({}, {})", entry.row, entry.col),
                    shape,
                });
            }
            check_quantity(unit, entry.value.unit())?;
        }
        let storage = Storage::sparse(
            len,
            entries
                .iter()
                .map(|entry| (entry.row * cols + entry.col, entry.value.si())),
        )?;
        Ok(Self::with_storage(rows, cols, storage, unit.clone()))
    }

    pub(crate) fn with_storage(rows: usize, cols: usize, storage: Storage<T>, unit: Unit) -> Self {
        Self {
            rows,
            cols,
            storage,
            unit,
            kind: PhantomData,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::Matrix {
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn quantity(&self) -> &Arc<Quantity> {
        self.unit.quantity()
    }

    pub fn dimension(&self) -> DimensionVector {
        self.unit.dimension()
    }

    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage.storage_type()
    }

    /// Number of non-zero cells
    pub fn cardinality(&self) -> usize {
        self.storage.cardinality()
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize, QuantityError> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(QuantityError::IndexOutOfBounds {
                index: format!("({row}, {col})"),
                shape: self.shape(),
            })
        }
    }

    pub fn get_si(&self, row: usize, col: usize) -> Result<T, QuantityError> {
        let offset = self.offset(row, col)?;
        Ok(self.storage.get(offset).unwrap_or_else(T::zero))
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Scalar<K, T>, QuantityError> {
        Ok(Scalar::with_si(self.get_si(row, col)?, self.unit.clone()))
    }

    pub fn row(&self, row: usize) -> Result<Vector<K, T>, QuantityError> {
        if row >= self.rows {
            return Err(QuantityError::IndexOutOfBounds {
                index: format!("({row}, _)"),
                shape: self.shape(),
            });
        }
        let values = (0..self.cols)
            .map(|col| self.storage.get(row * self.cols + col).unwrap_or_else(T::zero))
            .collect();
        Ok(Vector::with_storage(
            Storage::from_values(values, self.storage_type()),
            self.unit.clone(),
        ))
    }

    pub fn column(&self, col: usize) -> Result<Vector<K, T>, QuantityError> {
        if col >= self.cols {
            return Err(QuantityError::IndexOutOfBounds {
                index: format!("(_, {col})"),
                shape: self.shape(),
            });
        }
        let values = (0..self.rows)
            .map(|row| self.storage.get(row * self.cols + col).unwrap_or_else(T::zero))
            .collect();
        Ok(Vector::with_storage(
            Storage::from_values(values, self.storage_type()),
            self.unit.clone(),
        ))
    }

    pub fn transpose(&self) -> Self {
        let storage = match &self.storage {
            Storage::Sparse { len, entries } => {
                let mut moved: Vec<(usize, T)> = entries
                    .iter()
                    .map(|&(offset, v)| {
                        let (row, col) = (offset / self.cols, offset % self.cols);
                        (col * self.rows + row, v)
                    })
                    .collect();
                moved.sort_by_key(|&(offset, _)| offset);
                Storage::Sparse {
                    len: *len,
                    entries: moved,
                }
            }
            Storage::Dense(values) => {
                let mut transposed = Vec::with_capacity(values.len());
                for col in 0..self.cols {
                    for row in 0..self.rows {
                        transposed.push(values[row * self.cols + col]);
                    }
                }
                Storage::Dense(transposed)
            }
        };
        Self::with_storage(self.cols, self.rows, storage, self.unit.clone())
    }

    /// SI values, one `Vec` per row
    pub fn values_si(&self) -> Vec<Vec<T>> {
        let flat = self.storage.to_vec();
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        flat.chunks(self.cols).map(<[T]>::to_vec).collect()
    }

    /// Values in the display unit, one `Vec` per row
    pub fn values(&self) -> Vec<Vec<T>> {
        self.values_si()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|si| T::of_f64(self.unit.from_standard(si.as_f64())))
                    .collect()
            })
            .collect()
    }

    pub fn to_dense(&self) -> Self {
        Self::with_storage(self.rows, self.cols, self.storage.clone().into_dense(), self.unit.clone())
    }

    pub fn to_sparse(&self) -> Self {
        Self::with_storage(self.rows, self.cols, self.storage.clone().into_sparse(), self.unit.clone())
    }

    pub fn to_unit(&self, unit: &Unit) -> Result<Self, QuantityError> {
        check_quantity(&self.unit, unit)?;
        Ok(Self::with_storage(self.rows, self.cols, self.storage.clone(), unit.clone()))
    }

    pub fn to_generic(&self) -> SiMatrix<T> {
        SiMatrix::new(self.rows, self.cols, self.storage.clone(), self.dimension())
    }
}

fn zip<L: Kind, R: Kind, T: Real>(
    left: &Matrix<L, T>,
    right: &Matrix<R, T>,
    f: impl Fn(T, T) -> T,
) -> Result<Storage<T>, QuantityError> {
    zip_checked((&left.storage, left.shape()), (&right.storage, right.shape()), f)
}

impl<T: Real> Matrix<Relative, T> {
    pub fn sum(&self) -> Scalar<Relative, T> {
        Scalar::with_si(self.storage.sum(), self.unit.clone())
    }

    pub fn scaled(&self, factor: T) -> Self {
        Self::with_storage(self.rows, self.cols, self.storage.map(|v| v * factor), self.unit.clone())
    }

    pub fn abs(&self) -> Self {
        Self::with_storage(self.rows, self.cols, self.storage.map(|v| v.abs()), self.unit.clone())
    }

    /// Cell-wise product; dimensions add
    pub fn times_elements(&self, other: &Self) -> Result<SiMatrix<T>, QuantityError> {
        let storage = zip(self, other, |l, r| l * r)?;
        Ok(SiMatrix::new(
            self.rows,
            self.cols,
            storage,
            self.dimension() + other.dimension(),
        ))
    }

    /// Cell-wise quotient; dimensions subtract
    pub fn divide_elements(&self, other: &Self) -> Result<SiMatrix<T>, QuantityError> {
        let storage = zip(self, other, |l, r| l / r)?;
        Ok(SiMatrix::new(
            self.rows,
            self.cols,
            storage,
            self.dimension() - other.dimension(),
        ))
    }

    pub fn times(&self, other: &Self, registry: &UnitRegistry) -> Result<ClassifiedMatrix<T>, QuantityError> {
        Ok(self.times_elements(other)?.classify(registry))
    }

    pub fn divided_by(&self, other: &Self, registry: &UnitRegistry) -> Result<ClassifiedMatrix<T>, QuantityError> {
        Ok(self.divide_elements(other)?.classify(registry))
    }
}

impl<K: Kind, T: Real> PartialEq for Matrix<K, T> {
    /// Same quantity, shape and SI values; display unit and storage type are ignored
    fn eq(&self, other: &Self) -> bool {
        self.quantity() == other.quantity()
            && self.shape() == other.shape()
            && self.storage.iter().eq(other.storage.iter())
    }
}

impl<K: Kind, T: Real> fmt::Display for Matrix<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (r, row) in self.values().into_iter().enumerate() {
            if r > 0 {
                f.write_str("; ")?;
            }
            for (c, value) in row.into_iter().enumerate() {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{value}")?;
            }
        }
        write!(f, "] {}", self.unit)
    }
}

impl<K: Kind, T: Real> fmt::Debug for Matrix<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("kind", &K::NAME)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("storage", &self.storage)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<'a, 'b, T: Real> Add<&'b Matrix<Relative, T>> for &'a Matrix<Relative, T> {
    type Output = Result<Matrix<Relative, T>, QuantityError>;

    fn add(self, rhs: &'b Matrix<Relative, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        let storage = zip(self, rhs, |l, r| l + r)?;
        Ok(Matrix::with_storage(self.rows, self.cols, storage, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Matrix<Relative, T>> for &'a Matrix<Relative, T> {
    type Output = Result<Matrix<Relative, T>, QuantityError>;

    fn sub(self, rhs: &'b Matrix<Relative, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        let storage = zip(self, rhs, |l, r| l - r)?;
        Ok(Matrix::with_storage(self.rows, self.cols, storage, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Matrix<Absolute, T>> for &'a Matrix<Absolute, T> {
    type Output = Result<Matrix<Relative, T>, QuantityError>;

    fn sub(self, rhs: &'b Matrix<Absolute, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        let unit = paired_relative(&self.unit)?;
        let storage = zip(self, rhs, |l, r| l - r)?;
        Ok(Matrix::with_storage(self.rows, self.cols, storage, unit))
    }
}

impl<'a, 'b, T: Real> Add<&'b Matrix<Relative, T>> for &'a Matrix<Absolute, T> {
    type Output = Result<Matrix<Absolute, T>, QuantityError>;

    fn add(self, rhs: &'b Matrix<Relative, T>) -> Self::Output {
        check_pairing(&self.unit, &rhs.unit)?;
        let storage = zip(self, rhs, |l, r| l + r)?;
        Ok(Matrix::with_storage(self.rows, self.cols, storage, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Matrix<Relative, T>> for &'a Matrix<Absolute, T> {
    type Output = Result<Matrix<Absolute, T>, QuantityError>;

    fn sub(self, rhs: &'b Matrix<Relative, T>) -> Self::Output {
        check_pairing(&self.unit, &rhs.unit)?;
        let storage = zip(self, rhs, |l, r| l - r)?;
        Ok(Matrix::with_storage(self.rows, self.cols, storage, self.unit.clone()))
    }
}

forward_binop!(impl Add, add for Matrix<Relative, T>, Matrix<Relative, T> => Result<Matrix<Relative, T>, QuantityError>);
forward_binop!(impl Sub, sub for Matrix<Relative, T>, Matrix<Relative, T> => Result<Matrix<Relative, T>, QuantityError>);
forward_binop!(impl Sub, sub for Matrix<Absolute, T>, Matrix<Absolute, T> => Result<Matrix<Relative, T>, QuantityError>);
forward_binop!(impl Add, add for Matrix<Absolute, T>, Matrix<Relative, T> => Result<Matrix<Absolute, T>, QuantityError>);
forward_binop!(impl Sub, sub for Matrix<Absolute, T>, Matrix<Relative, T> => Result<Matrix<Absolute, T>, QuantityError>);

impl<'a, T: Real> Neg for &'a Matrix<Relative, T> {
    type Output = Matrix<Relative, T>;

    fn neg(self) -> Self::Output {
        Matrix::with_storage(self.rows, self.cols, self.storage.map(|v| -v), self.unit.clone())
    }
}

impl<T: Real> Neg for Matrix<Relative, T> {
    type Output = Matrix<Relative, T>;

    fn neg(self) -> Self::Output {
        -&self
    }
}
