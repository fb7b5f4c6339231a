use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]


/**
 * A fixed-shape, two-dimensional array stored contiguously in row-major
 * order. Every `<element>s_at_<element>` adjacency array on a grid is one of
 * these: row `i` lists the elements associated with element `i`, padded
 * with a sentinel where an element has fewer associations than the table
 * has columns.
 */
pub struct Table<T> {
    shape: (usize, usize),
    data: Vec<T>,
}




// ============================================================================
impl<T> Table<T> {


    /**
     * Create a table from a row-major data buffer. The buffer length must be
     * equal to `rows * cols`.
     */
    pub fn new(shape: (usize, usize), data: Vec<T>) -> Result<Self> {
        if data.len() != shape.0 * shape.1 {
            return Err(Error::shape_mismatch("table data", shape.0 * shape.1, data.len()));
        }
        Ok(Self { shape, data })
    }


    /**
     * Create a table with every entry equal to the given value.
     */
    pub fn filled(shape: (usize, usize), value: T) -> Self where T: Clone {
        Self { shape, data: vec![value; shape.0 * shape.1] }
    }


    /**
     * Create a table from fixed-width rows.
     */
    pub fn from_rows<const COLS: usize>(rows: Vec<[T; COLS]>) -> Self {
        let shape = (rows.len(), COLS);
        Self { shape, data: rows.into_iter().flat_map(IntoIterator::into_iter).collect() }
    }


    /**
     * Return the number of rows and columns.
     */
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn num_rows(&self) -> usize {
        self.shape.0
    }

    pub fn num_cols(&self) -> usize {
        self.shape.1
    }


    /**
     * Return the total number of entries.
     */
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }


    /**
     * Return the linear offset of the given entry in the row-major buffer.
     */
    pub fn row_major_offset(&self, row: usize, col: usize) -> usize {
        row * self.shape.1 + col
    }


    /**
     * Return the entry at the given row and column, if it is in bounds.
     */
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.shape.0 && col < self.shape.1 {
            self.data.get(self.row_major_offset(row, col))
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        let n = self.shape.1;
        &self.data[row * n .. (row + 1) * n]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let n = self.shape.1;
        &mut self.data[row * n .. (row + 1) * n]
    }


    /**
     * Return an iterator over the rows, in order.
     */
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // zero-width tables still have rows
        let n = self.shape.1.max(1);
        self.data.chunks(n).chain(std::iter::repeat(&[][..])).take(self.shape.0)
    }


    /**
     * Return an iterator over the entries of one column, if it is in bounds.
     */
    pub fn column(&self, col: usize) -> Option<impl Iterator<Item = &T> + '_> {
        if col < self.shape.1 {
            Some(self.data.iter().skip(col).step_by(self.shape.1))
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}
