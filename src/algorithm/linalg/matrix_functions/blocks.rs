//! Block partitions and the wavefront driver for block recurrences
//!
//! Both the Parlett recurrence and the blocked square root fill a block upper
//! triangular matrix where block (i, j) depends only on blocks (i, k) and
//! (k, j) with i < k < j. All blocks on one block superdiagonal are therefore
//! independent once the previous superdiagonals are known; the driver solves
//! them together (in parallel with the `rayon` feature) and writes them back
//! before moving on.

use crate::dtype::Complex128;
use crate::error::Result;
use crate::matrix::Mat;
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Contiguous partition of `0..n` into diagonal blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockPartition {
    bounds: Vec<(usize, usize)>,
}

impl BlockPartition {
    /// Partition from explicit `(start, stop)` pairs
    pub fn from_bounds(bounds: Vec<(usize, usize)>) -> Self {
        Self { bounds }
    }

    /// Near-uniform partition with blocks of about `block_size`
    ///
    /// `nblocks = max(n / block_size, 1)`; the first blocks get
    /// `n / nblocks` rows and the remaining `n % nblocks` blocks one more.
    pub fn uniform(n: usize, block_size: usize) -> Self {
        let nblocks = (n / block_size.max(1)).max(1);
        let small = n / nblocks;
        let nlarge = n % nblocks;
        let nsmall = nblocks - nlarge;

        let mut bounds = Vec::with_capacity(nblocks);
        let mut start = 0;
        for (count, size) in [(nsmall, small), (nlarge, small + 1)] {
            for _ in 0..count {
                if size > 0 {
                    bounds.push((start, start + size));
                }
                start += size;
            }
        }
        Self { bounds }
    }

    /// Number of blocks
    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Index range of block `i`
    #[inline]
    pub fn range(&self, i: usize) -> Range<usize> {
        let (start, stop) = self.bounds[i];
        start..stop
    }

    /// Index range spanned by blocks `i+1..j` (between blocks i and j)
    #[inline]
    pub fn between(&self, i: usize, j: usize) -> Range<usize> {
        self.bounds[i].1..self.bounds[j].0
    }
}

/// Fill the strictly upper block triangle of `table` wavefront by wavefront
///
/// `solve(i, j, table)` returns block (i, j) together with a scalar
/// diagnostic; diagnostics are folded with `f64::min`.
pub(crate) fn solve_wavefront<F>(
    partition: &BlockPartition,
    table: &mut Mat<Complex128>,
    solve: F,
) -> Result<f64>
where
    F: Fn(usize, usize, &Mat<Complex128>) -> Result<(Mat<Complex128>, f64)> + Sync,
{
    let nb = partition.len();
    let mut diagnostic = f64::INFINITY;

    for d in 1..nb {
        let front: Vec<(usize, Mat<Complex128>, f64)> = {
            let snapshot = &*table;
            let solve_one = |i: usize| -> Result<(usize, Mat<Complex128>, f64)> {
                let (block, diag) = solve(i, i + d, snapshot)?;
                Ok((i, block, diag))
            };

            #[cfg(feature = "rayon")]
            let solved = (0..nb - d)
                .into_par_iter()
                .map(solve_one)
                .collect::<Result<Vec<_>>>()?;

            #[cfg(not(feature = "rayon"))]
            let solved = (0..nb - d).map(solve_one).collect::<Result<Vec<_>>>()?;

            solved
        };

        for (i, block, diag) in front {
            let rows = partition.range(i);
            let cols = partition.range(i + d);
            table.set_block(rows.start, cols.start, &block);
            diagnostic = diagnostic.min(diag);
        }
    }

    Ok(diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_partition() {
        let p = BlockPartition::uniform(10, 3);
        // nblocks = 3, sizes 3, 3, 4
        assert_eq!(p.len(), 3);
        assert_eq!(p.range(0), 0..3);
        assert_eq!(p.range(1), 3..6);
        assert_eq!(p.range(2), 6..10);
        assert_eq!(p.between(0, 2), 3..6);

        let p = BlockPartition::uniform(5, 64);
        assert_eq!(p.len(), 1);
        assert_eq!(p.range(0), 0..5);

        let p = BlockPartition::uniform(4, 1);
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn test_wavefront_order() {
        // Each block records 1 + the number of earlier blocks it could see
        let partition = BlockPartition::uniform(4, 1);
        let mut table = Mat::<Complex128>::zeros(4, 4);
        let diag = solve_wavefront(&partition, &mut table, |i, j, t| {
            let mut seen = 0.0;
            for k in (i + 1)..j {
                if t[(i, k)] != Complex128::ZERO && t[(k, j)] != Complex128::ZERO {
                    seen += 1.0;
                }
            }
            Ok((
                Mat::from_vec(1, 1, vec![Complex128::new(1.0 + seen, 0.0)]),
                (j - i) as f64,
            ))
        })
        .unwrap();
        assert_eq!(diag, 1.0);
        assert_eq!(table[(0, 1)].re, 1.0);
        assert_eq!(table[(0, 2)].re, 2.0);
        assert_eq!(table[(0, 3)].re, 3.0);
    }
}
