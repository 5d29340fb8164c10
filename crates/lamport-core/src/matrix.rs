//! Rectangular matrices of events and timestamps
//!
//! Rows are processes, columns are time slots. Every row has the same
//! number of slots; shorter timelines are padded with NULL (or zero).

use std::borrow::Borrow;
use std::fmt;

use crate::{Event, EventLookup, LamportTime, MatrixError, MatrixResult, Position};

/// Fixed-shape grid stored row-major
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

/// Matrix of labelled events
pub type EventMatrix = Matrix<Event>;

/// Matrix of Lamport timestamps (zero = no event)
pub type ClockMatrix = Matrix<LamportTime>;

impl<T: Clone + Default> Matrix<T> {
    /// Matrix of the given shape filled with `T::default()`
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            cells: vec![T::default(); rows * cols],
        }
    }
}

impl<T> Matrix<T> {
    /// Build from nested rows, checking the declared shape
    pub fn from_rows(rows: usize, cols: usize, data: Vec<Vec<T>>) -> MatrixResult<Self> {
        if data.len() != rows {
            return Err(MatrixError::ShapeMismatch {
                expected: rows,
                actual: data.len(),
            });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, values) in data.into_iter().enumerate() {
            if values.len() != cols {
                return Err(MatrixError::RaggedRow {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Matrix { rows, cols, cells })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        (pos.process < self.rows && pos.slot < self.cols)
            .then(|| pos.process * self.cols + pos.slot)
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Overwrite a cell; returns false when out of bounds
    pub fn set(&mut self, pos: Position, value: T) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// One process timeline
    pub fn row(&self, process: usize) -> &[T] {
        let start = (process * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        &self.cells[start..end]
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |process| self.row(process))
    }

    /// All positions, row outer, slot inner
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows)
            .flat_map(move |process| (0..cols).map(move |slot| Position::new(process, slot)))
    }

    /// All positions, slot outer, row inner
    pub fn column_major(&self) -> impl Iterator<Item = Position> {
        let rows = self.rows;
        (0..self.cols)
            .flat_map(move |slot| (0..rows).map(move |process| Position::new(process, slot)))
    }

    /// Cells with their positions in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.positions().zip(self.cells.iter())
    }

    /// Apply `f` to every cell, keeping the shape
    pub fn map<U>(&self, mut f: impl FnMut(Position, &T) -> U) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells().map(|(pos, cell)| f(pos, cell)).collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell)?;
            }
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows_iter()).finish()
    }
}

impl Matrix<Event> {
    /// Build from string labels
    pub fn parse<I, R, S>(rows: usize, cols: usize, labels: I) -> MatrixResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let data = labels
            .into_iter()
            .enumerate()
            .map(|(process, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(slot, label)| {
                        Event::parse_at(label.as_ref(), Position::new(process, slot))
                    })
                    .collect::<MatrixResult<Vec<_>>>()
            })
            .collect::<MatrixResult<Vec<_>>>()?;
        Matrix::from_rows(rows, cols, data)
    }

    /// Check the preconditions of a clock run and build the lookup
    ///
    /// - no event follows a NULL in the same process
    /// - labels are unique
    /// - sends and receives pair up one-to-one
    pub fn validate(&self) -> MatrixResult<EventLookup> {
        for process in 0..self.rows {
            let row = self.row(process);
            if let Some(first_null) = row.iter().position(Event::is_null) {
                if let Some(offset) = row[first_null..].iter().position(|e| !e.is_null()) {
                    let slot = first_null + offset;
                    return Err(MatrixError::EventAfterNull {
                        event: row[slot].clone(),
                        position: Position::new(process, slot),
                    });
                }
            }
        }

        let lookup = EventLookup::build(self)?;
        for (_, event) in self.cells() {
            let Some(peer) = event.peer() else {
                continue;
            };
            if !lookup.contains(&peer) {
                return Err(match event {
                    Event::Send(_) => MatrixError::UnmatchedSend(event.clone()),
                    _ => MatrixError::UnmatchedReceive(event.clone()),
                });
            }
        }

        Ok(lookup)
    }
}

impl Matrix<LamportTime> {
    /// Build from raw integers
    pub fn from_values<I, R, V>(rows: usize, cols: usize, values: I) -> MatrixResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Borrow<u64>,
    {
        let data = values
            .into_iter()
            .map(|row| row.into_iter().map(|v| LamportTime(*v.borrow())).collect())
            .collect();
        Matrix::from_rows(rows, cols, data)
    }

    pub fn to_values(&self) -> Vec<Vec<u64>> {
        self.rows_iter()
            .map(|row| row.iter().map(|t| t.value()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EventMatrix {
        EventMatrix::parse(
            3,
            4,
            &[
                ["a", "s1", "r3", "b"],
                ["c", "r2", "s3", "NULL"],
                ["r1", "d", "s2", "e"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_shape() {
        let m = sample();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 4);
        assert_eq!(m.get(Position::new(1, 3)), Some(&Event::Null));
        assert_eq!(m.get(Position::new(2, 0)), Some(&Event::Receive(1)));
        assert_eq!(m.get(Position::new(3, 0)), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = EventMatrix::parse(2, 2, &[vec!["a", "b"], vec!["c"]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );

        let err = ClockMatrix::from_values(3, 1, &[[1u64], [1]]).unwrap_err();
        assert_eq!(err, MatrixError::ShapeMismatch { expected: 3, actual: 2 });
    }

    #[test]
    fn test_traversal_orders() {
        let m = ClockMatrix::new(2, 3);
        let row_major: Vec<_> = m.positions().collect();
        let col_major: Vec<_> = m.column_major().collect();
        assert_eq!(row_major[1], Position::new(0, 1));
        assert_eq!(col_major[1], Position::new(1, 0));
        assert_eq!(row_major.len(), 6);
        assert_eq!(col_major.len(), 6);
    }

    #[test]
    fn test_display_rows() {
        let m = ClockMatrix::from_values(2, 2, &[[1u64, 2], [3, 0]]).unwrap();
        assert_eq!(m.to_string(), "1 2\n3 0");
        assert_eq!(sample().to_string().lines().next(), Some("a s1 r3 b"));
    }

    #[test]
    fn test_validate_accepts_sample() {
        let lookup = sample().validate().unwrap();
        assert_eq!(lookup.len(), 11);
        assert_eq!(lookup.position(&Event::Send(3)), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_validate_rejects_unmatched() {
        let m = EventMatrix::parse(2, 2, &[["s1", "a"], ["b", "c"]]).unwrap();
        assert_eq!(m.validate().unwrap_err(), MatrixError::UnmatchedSend(Event::Send(1)));

        let m = EventMatrix::parse(2, 2, &[["a", "r7"], ["b", "c"]]).unwrap();
        assert_eq!(
            m.validate().unwrap_err(),
            MatrixError::UnmatchedReceive(Event::Receive(7))
        );
    }

    #[test]
    fn test_validate_rejects_event_after_null() {
        let m = EventMatrix::parse(1, 3, &[["a", "NULL", "b"]]).unwrap();
        assert!(matches!(
            m.validate(),
            Err(MatrixError::EventAfterNull { position, .. }) if position == Position::new(0, 2)
        ));
    }

    #[test]
    fn test_map_keeps_shape() {
        let clocks = sample().map(|pos, _| LamportTime(pos.slot as u64));
        assert_eq!(clocks.rows(), 3);
        assert_eq!(clocks.to_values()[2], vec![0, 1, 2, 3]);
    }
}
