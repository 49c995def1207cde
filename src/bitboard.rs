//! A fixed-size occupancy grid using const generics.
//!
//! The type is `no_std` friendly and avoids heap allocations. A `W×H` grid is
//! stored as `H` rows, each packed into an unsigned integer `T` whose low `W`
//! bits are the cells of that row (bit `x` is column `x`).

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};
use num_traits::{PrimInt, Unsigned, Zero};

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBoardError {
    /// Requested width exceeds the bit capacity of the row type.
    WidthTooLarge { width: usize, capacity: usize },
    /// Column or row index is out of bounds.
    IndexOutOfBounds { x: usize, y: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::WidthTooLarge { width, capacity } => {
                write!(f, "WidthTooLarge: width={} exceeds row capacity={}", width, capacity)
            }
            BitBoardError::IndexOutOfBounds { x, y } => {
                write!(f, "IndexOutOfBounds: x={}, y={}", x, y)
            }
        }
    }
}

/// A fixed-size `W×H` bitboard stored as `H` rows of `T`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T, const W: usize, const H: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    rows: [T; H],
}

impl<T, const W: usize, const H: usize> BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn row_mask() -> T {
        if W >= Self::capacity() {
            !T::zero()
        } else {
            (T::one() << W) - T::one()
        }
    }

    #[inline]
    fn capacity() -> usize {
        T::zero().count_zeros() as usize
    }

    /// Create a new empty bitboard without size check.
    #[inline]
    pub fn new() -> Self {
        BitBoard { rows: [T::zero(); H] }
    }

    /// Fallible constructor: returns `Err(WidthTooLarge)` if `W` does not fit in `T`.
    pub fn try_new() -> Result<Self, BitBoardError> {
        let capacity = Self::capacity();
        if W > capacity {
            Err(BitBoardError::WidthTooLarge { width: W, capacity })
        } else {
            Ok(Self::new())
        }
    }

    /// Returns `true` when `(x, y)` lies on the grid.
    #[inline]
    pub fn in_bounds(x: usize, y: usize) -> bool {
        x < W && y < H
    }

    #[inline]
    fn check_bounds(&self, x: usize, y: usize) -> Result<(), BitBoardError> {
        if Self::in_bounds(x, y) {
            Ok(())
        } else {
            Err(BitBoardError::IndexOutOfBounds { x, y })
        }
    }

    /// Returns the number of set cells.
    pub fn count_ones(&self) -> usize {
        self.rows.iter().map(|r| r.count_ones() as usize).sum()
    }

    /// Returns true if no cells are set.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_zero())
    }

    /// Returns true if any cell is set in both boards.
    pub fn intersects(&self, other: &Self) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .any(|(a, b)| !(*a & *b).is_zero())
    }

    /// Returns true if every cell set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| (*a & !*b).is_zero())
    }

    /// Gets the cell at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<bool, BitBoardError> {
        self.check_bounds(x, y)?;
        Ok(((self.rows[y] >> x) & T::one()) != T::zero())
    }

    /// Sets the cell at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize) -> Result<(), BitBoardError> {
        self.check_bounds(x, y)?;
        self.rows[y] = self.rows[y] | (T::one() << x);
        Ok(())
    }

    /// Clears the cell at `(x, y)`.
    pub fn clear(&mut self, x: usize, y: usize) -> Result<(), BitBoardError> {
        self.check_bounds(x, y)?;
        self.rows[y] = self.rows[y] & !(T::one() << x);
        Ok(())
    }

    /// Clears every cell.
    pub fn clear_all(&mut self) {
        self.rows = [T::zero(); H];
    }

    /// Iterates over the coordinates of all set cells, row by row.
    pub fn iter_ones(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..H).flat_map(move |y| {
            (0..W).filter_map(move |x| {
                if ((self.rows[y] >> x) & T::one()) != T::zero() {
                    Some((x, y))
                } else {
                    None
                }
            })
        })
    }
}

impl<T, const W: usize, const H: usize> Default for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const W: usize, const H: usize> BitAnd for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        let mut rows = self.rows;
        for (r, o) in rows.iter_mut().zip(rhs.rows.iter()) {
            *r = *r & *o;
        }
        BitBoard { rows }
    }
}

impl<T, const W: usize, const H: usize> BitOr for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        let mut rows = self.rows;
        for (r, o) in rows.iter_mut().zip(rhs.rows.iter()) {
            *r = *r | *o;
        }
        BitBoard { rows }
    }
}

impl<T, const W: usize, const H: usize> Not for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;

    /// Complements every cell on the grid; bits beyond `W` stay clear.
    fn not(self) -> Self {
        let mask = Self::row_mask();
        let mut rows = self.rows;
        for r in rows.iter_mut() {
            *r = !*r & mask;
        }
        BitBoard { rows }
    }
}

impl<T, const W: usize, const H: usize> fmt::Debug for BitBoard<T, W, H>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}x{}> [", W, H)?;
        for y in 0..H {
            f.write_str("  ")?;
            for x in 0..W {
                let set = ((self.rows[y] >> x) & T::one()) != T::zero();
                f.write_str(if set { "1" } else { "." })?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
