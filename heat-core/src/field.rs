//! The temperature field and its row-major mapping to flat buffers.
//!
//! Cell `(i, j)` of a `rows × cols` field lives at flat index `i * cols + j`.
//! [`flatten`] and [`unflatten`] are the only way values cross the interface
//! boundary; callers never hold a mutable alias of model storage.

use std::ops::{Index, IndexMut};
use std::slice::ChunksExact;

use crate::error::BmiError;

/// A dense 2D array of `f64`, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Field {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Field {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a field from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, BmiError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            BmiError::check_len(cols, row.len())?;
            data.extend_from_slice(row);
        }
        Ok(Field {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> ChunksExact<'_, f64> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1))
    }

    /// `true` for cells on the outer ring of the grid.
    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.rows || j + 1 == self.cols
    }

    /// Read-only view of the row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub(crate) fn copy_from(&mut self, other: &Field) {
        debug_assert_eq!(self.shape(), other.shape());
        self.data.copy_from_slice(&other.data);
    }
}

impl Index<(usize, usize)> for Field {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of bounds");
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Field {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of bounds");
        &mut self.data[i * self.cols + j]
    }
}

/// Row-major copy of `field`: `buffer[i * cols + j] = field[(i, j)]`.
pub fn flatten(field: &Field) -> Vec<f64> {
    let mut buffer = vec![0.0; field.len()];
    copy_rows_out(field, &mut buffer);
    buffer
}

/// [`flatten`] into a caller-owned buffer of exactly `rows * cols` items.
pub fn flatten_into(field: &Field, dest: &mut [f64]) -> Result<(), BmiError> {
    BmiError::check_len(field.len(), dest.len())?;
    copy_rows_out(field, dest);
    Ok(())
}

/// Inverse of [`flatten`]: `field[(i, j)] = buffer[i * cols + j]`.
pub fn unflatten(buffer: &[f64], rows: usize, cols: usize) -> Result<Field, BmiError> {
    let mut field = Field::zeros(rows, cols);
    unflatten_into(buffer, &mut field)?;
    Ok(field)
}

/// [`unflatten`] into an existing field, overwriting every cell.
pub fn unflatten_into(buffer: &[f64], field: &mut Field) -> Result<(), BmiError> {
    BmiError::check_len(field.len(), buffer.len())?;
    let cols = field.cols.max(1);
    for (dst, src) in field
        .data
        .chunks_exact_mut(cols)
        .zip(buffer.chunks_exact(cols))
    {
        dst.copy_from_slice(src);
    }
    Ok(())
}

fn copy_rows_out(field: &Field, dest: &mut [f64]) {
    let cols = field.cols.max(1);
    for (src, dst) in field.iter_rows().zip(dest.chunks_exact_mut(cols)) {
        dst.copy_from_slice(src);
    }
}

/// Owns the model's field plus the scratch buffer the kernel writes into.
#[derive(Clone, Debug)]
pub struct FieldStore {
    current: Field,
    next: Field,
}

impl FieldStore {
    pub fn new(rows: usize, cols: usize) -> Self {
        FieldStore {
            current: Field::zeros(rows, cols),
            next: Field::zeros(rows, cols),
        }
    }

    pub fn field(&self) -> &Field {
        &self.current
    }

    pub fn shape(&self) -> [usize; 2] {
        self.current.shape()
    }

    pub fn copy_out(&self, dest: &mut [f64]) -> Result<(), BmiError> {
        flatten_into(&self.current, dest)
    }

    /// Full overwrite from a row-major buffer.
    pub fn copy_in(&mut self, src: &[f64]) -> Result<(), BmiError> {
        unflatten_into(src, &mut self.current)
    }

    pub fn replace(&mut self, field: Field) -> Result<(), BmiError> {
        if field.shape() != self.current.shape() {
            return Err(BmiError::BufferSize {
                expected: self.current.len(),
                actual: field.len(),
            });
        }
        self.current = field;
        Ok(())
    }

    /// Let `compute` fill the scratch buffer from the current field, then
    /// make the result current.
    pub fn advance(&mut self, compute: impl FnOnce(&Field, &mut Field)) {
        compute(&self.current, &mut self.next);
        self.swap_buffers();
    }

    fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp(rows: usize, cols: usize) -> Field {
        let mut f = Field::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                f[(i, j)] = (10 * i + j) as f64;
            }
        }
        f
    }

    #[test]
    fn flatten_is_row_major() {
        let f = ramp(3, 4);
        let flat = flatten(&f);
        assert_eq!(flat.len(), 12);
        assert_eq!(flat[0], 0.0);
        assert_eq!(flat[4 + 2], 12.0);
        assert_eq!(flat[2 * 4 + 3], 23.0);
    }

    #[test]
    fn unflatten_checks_length() {
        let err = unflatten(&[0.0; 5], 2, 3).unwrap_err();
        assert!(matches!(err, BmiError::BufferSize { expected: 6, actual: 5 }));
    }

    #[test]
    fn flatten_into_rejects_short_buffer() {
        let f = ramp(2, 2);
        let mut dest = [0.0; 3];
        assert!(flatten_into(&f, &mut dest).is_err());
    }

    #[test]
    fn nested_rows_round_trip() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let f = Field::from_rows(&rows).unwrap();
        assert_eq!(f.shape(), [3, 2]);
        assert_eq!(f[(2, 0)], 5.0);
        assert_eq!(f.to_rows(), rows);
        assert!(Field::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn boundary_ring() {
        let f = Field::zeros(4, 5);
        assert!(f.is_boundary(0, 2));
        assert!(f.is_boundary(3, 2));
        assert!(f.is_boundary(2, 0));
        assert!(f.is_boundary(2, 4));
        assert!(!f.is_boundary(1, 1));
        assert!(!f.is_boundary(2, 3));
    }

    #[test]
    fn get_is_bounds_checked() {
        let f = ramp(2, 3);
        assert_eq!(f.get(1, 2), Some(12.0));
        assert_eq!(f.get(2, 0), None);
        assert_eq!(f.get(0, 3), None);
    }

    #[test]
    fn store_copies_in_and_out() {
        let mut store = FieldStore::new(2, 3);
        let src = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        store.copy_in(&src).unwrap();
        assert_eq!(store.field()[(1, 0)], 4.0);

        let mut out = [0.0; 6];
        store.copy_out(&mut out).unwrap();
        assert_eq!(out, src);
        assert!(store.copy_in(&src[..4]).is_err());
    }

    #[test]
    fn advance_swaps_in_the_computed_field() {
        let mut store = FieldStore::new(2, 2);
        store.advance(|cur, next| {
            next.copy_from(cur);
            next[(0, 1)] = 7.0;
        });
        assert_eq!(store.field().as_slice(), &[0.0, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn replace_requires_matching_shape() {
        let mut store = FieldStore::new(2, 3);
        assert!(store.replace(Field::zeros(3, 2)).is_err());
        assert!(store.replace(ramp(2, 3)).is_ok());
        assert_eq!(store.field()[(1, 2)], 12.0);
    }

    proptest! {
        #[test]
        fn unflatten_inverts_flatten(
            (rows, cols, values) in (1usize..12, 1usize..12).prop_flat_map(|(r, c)| {
                (Just(r), Just(c), prop::collection::vec(-1e6f64..1e6, r * c))
            })
        ) {
            let field = unflatten(&values, rows, cols).unwrap();
            prop_assert_eq!(flatten(&field), values.clone());
            prop_assert_eq!(unflatten(&flatten(&field), rows, cols).unwrap(), field);
        }
    }
}
