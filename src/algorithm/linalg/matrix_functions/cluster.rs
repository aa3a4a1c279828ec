//! Eigenvalue clustering and Schur reordering
//!
//! Close eigenvalues make the Parlett divided differences ill-conditioned, so
//! the block evaluator groups them: a union-find pass joins every pair within
//! the separation tolerance, then adjacent unitary swaps make each group a
//! contiguous diagonal block of T.

use super::scalar::ScalarFunction;
use crate::algorithm::linalg::{ComplexSchurDecomposition, GivensRotation};
use crate::dtype::Complex128;
use crate::error::{Error, Result};

/// Separation below which two eigenvalues share a cluster
///
/// Absolute for |λ| ≥ 1, relative below.
pub const CLUSTER_TOLERANCE: f64 = 0.1;

/// Whether `a` and `b` are close enough to be expanded about one centre
#[inline]
pub(crate) fn within_tolerance(a: Complex128, b: Complex128, delta: f64) -> bool {
    let scale = a.magnitude().max(b.magnitude()).min(1.0);
    (a - b).magnitude() <= delta * scale
}

/// Union-find over eigenvalue indices
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let (px, py) = (self.find(x), self.find(y));
        if px == py {
            return;
        }
        if self.rank[px] < self.rank[py] {
            self.parent[px] = py;
        } else if self.rank[px] > self.rank[py] {
            self.parent[py] = px;
        } else {
            self.parent[py] = px;
            self.rank[px] += 1;
        }
    }
}

/// Assign each eigenvalue a cluster label
///
/// Labels are dense and numbered by first appearance, so label order is the
/// order the clusters will take along the reordered diagonal.
pub fn cluster_eigenvalues<F: ScalarFunction + ?Sized>(
    eigenvalues: &[Complex128],
    f: &F,
    delta: f64,
) -> Vec<usize> {
    let n = eigenvalues.len();
    let mut sets = DisjointSet::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (eigenvalues[i], eigenvalues[j]);
            if within_tolerance(a, b, delta) && f.shares_cluster(a, b) {
                sets.union(i, j);
            }
        }
    }

    let mut label_of_root = vec![usize::MAX; n];
    let mut next = 0;
    (0..n)
        .map(|i| {
            let root = sets.find(i);
            if label_of_root[root] == usize::MAX {
                label_of_root[root] = next;
                next += 1;
            }
            label_of_root[root]
        })
        .collect()
}

/// Swap the adjacent diagonal entries `k` and `k+1` of T by a unitary
/// similarity, updating Z so that A = Z T Zᴴ still holds.
pub(crate) fn swap_adjacent(schur: &mut ComplexSchurDecomposition, k: usize) {
    let n = schur.order();
    let t11 = schur.t[(k, k)];
    let t22 = schur.t[(k + 1, k + 1)];
    let (rot, _) = GivensRotation::new(schur.t[(k, k + 1)], t22 - t11);

    if k + 2 < n {
        rot.apply_rows(&mut schur.t, k, (k + 2)..n);
    }
    rot.apply_cols_adjoint(&mut schur.t, k, 0..k);
    schur.t[(k, k)] = t22;
    schur.t[(k + 1, k + 1)] = t11;
    rot.apply_cols_adjoint(&mut schur.z, k, 0..n);
}

/// Reorder the Schur form so every cluster occupies a contiguous block
///
/// Bubble sort by label using adjacent swaps; `labels` is permuted alongside
/// the diagonal. Returns the contiguous block boundaries.
pub(crate) fn reorder_by_cluster(
    schur: &mut ComplexSchurDecomposition,
    labels: &mut [usize],
) -> Result<Vec<(usize, usize)>> {
    let n = labels.len();
    let max_sweeps = n + 1;
    let mut sweeps = 0;
    loop {
        let mut swapped = false;
        for k in 0..n.saturating_sub(1) {
            if labels[k] > labels[k + 1] {
                swap_adjacent(schur, k);
                labels.swap(k, k + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
        sweeps += 1;
        if sweeps > max_sweeps {
            return Err(Error::no_convergence("schur reordering", max_sweeps));
        }
    }

    let mut blocks = Vec::new();
    let mut start = 0;
    for k in 1..=n {
        if k == n || labels[k] != labels[start] {
            blocks.push((start, k));
            start = k;
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::linalg::max_abs_diff;
    use crate::matrix::Mat;

    fn c(re: f64) -> Complex128 {
        Complex128::new(re, 0.0)
    }

    #[test]
    fn test_cluster_labels_by_first_appearance() {
        let eig = [c(1.0), c(5.0), c(1.05), c(5.02), c(9.0)];
        let labels = cluster_eigenvalues(&eig, &|z: Complex128| z, CLUSTER_TOLERANCE);
        assert_eq!(labels, vec![0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_cluster_chains() {
        // 1.0 ~ 1.08 ~ 1.16 chain into one cluster though 1.0 and 1.16 are apart
        let eig = [c(1.0), c(1.08), c(1.16)];
        let labels = cluster_eigenvalues(&eig, &|z: Complex128| z, CLUSTER_TOLERANCE);
        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_relative_tolerance_for_small_eigenvalues() {
        let eig = [c(1e-3), c(2e-3)];
        let labels = cluster_eigenvalues(&eig, &|z: Complex128| z, CLUSTER_TOLERANCE);
        assert_eq!(labels, vec![0, 1]);
        let eig = [c(0.0), c(0.0)];
        let labels = cluster_eigenvalues(&eig, &|z: Complex128| z, CLUSTER_TOLERANCE);
        assert_eq!(labels, vec![0, 0]);
    }

    #[test]
    fn test_reorder_preserves_similarity() {
        let t = Mat::from_vec(
            3,
            3,
            vec![1.0, 2.0, 3.0, 0.0, 5.0, 4.0, 0.0, 0.0, 1.02],
        )
        .to_complex();
        let mut schur = ComplexSchurDecomposition {
            z: Mat::identity(3),
            t: t.clone(),
        };
        let mut labels = cluster_eigenvalues(&schur.eigenvalues(), &|z: Complex128| z, 0.1);
        assert_eq!(labels, vec![0, 1, 0]);

        let blocks = reorder_by_cluster(&mut schur, &mut labels).unwrap();
        assert_eq!(blocks, vec![(0, 2), (2, 3)]);
        assert!(schur.t.is_upper_triangular());
        assert!((schur.t[(2, 2)] - c(5.0)).magnitude() < 1e-14);
        assert!(max_abs_diff(&schur.back_transform(&schur.t), &t) < 1e-13);
    }
}
