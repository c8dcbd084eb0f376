// src/model/cell.rs

use crate::error::{Result, SymmetryError};
use crate::utils::linalg;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// A periodic structure in fractional coordinates.
///
/// `lattice` is stored row-major with the basis vectors a, b, c as its
/// *columns*: `lattice[i][j]` is Cartesian component `i` of basis vector `j`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub lattice: [[f64; 3]; 3],
    pub positions: Vec<[f64; 3]>,
    /// Species tags; only equality matters
    pub types: Vec<i32>,
    /// Collinear magnetic moments, one per atom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spins: Option<Vec<f64>>,
}

/// Relative volume below which a lattice counts as degenerate
const DEGENERATE_VOLUME_RATIO: f64 = 1e-8;

impl Cell {
    pub fn new(lattice: [[f64; 3]; 3], positions: Vec<[f64; 3]>, types: Vec<i32>) -> Self {
        Self {
            lattice,
            positions,
            types,
            spins: None,
        }
    }

    /// Builds a cell from basis vectors given as rows `[a, b, c]`
    pub fn from_row_vectors(rows: [[f64; 3]; 3], positions: Vec<[f64; 3]>, types: Vec<i32>) -> Self {
        let lattice = [
            [rows[0][0], rows[1][0], rows[2][0]],
            [rows[0][1], rows[1][1], rows[2][1]],
            [rows[0][2], rows[1][2], rows[2][2]],
        ];
        Self::new(lattice, positions, types)
    }

    pub fn with_spins(mut self, spins: Vec<f64>) -> Self {
        self.spins = Some(spins);
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn lattice_matrix(&self) -> Matrix3<f64> {
        linalg::to_matrix(&self.lattice)
    }

    pub fn volume(&self) -> f64 {
        self.lattice_matrix().determinant().abs()
    }

    /// Basis vector `j` in Cartesian coordinates
    pub fn basis_vector(&self, j: usize) -> [f64; 3] {
        [self.lattice[0][j], self.lattice[1][j], self.lattice[2][j]]
    }

    pub fn spin(&self, i: usize) -> Option<f64> {
        self.spins.as_ref().and_then(|s| s.get(i).copied())
    }

    /// Rejects inputs that would poison the tolerance search with NaNs
    pub fn validate(&self) -> Result<()> {
        let n = self.positions.len();
        let n_spins = self.spins.as_ref().map_or(n, |s| s.len());
        if self.types.len() != n || n_spins != n {
            return Err(SymmetryError::LengthMismatch {
                positions: n,
                types: self.types.len(),
                spins: n_spins,
            });
        }
        if n == 0 {
            return Err(SymmetryError::EmptyCell);
        }

        let m = self.lattice_matrix();
        let det = m.determinant();
        let lengths: f64 = (0..3).map(|j| m.column(j).norm()).product();
        if !det.is_finite() || lengths <= 0.0 || det.abs() < DEGENERATE_VOLUME_RATIO * lengths {
            return Err(SymmetryError::DegenerateLattice { det });
        }
        if self.positions.iter().flatten().any(|x| !x.is_finite()) {
            return Err(SymmetryError::DegenerateLattice { det });
        }
        Ok(())
    }

    /// Index of the first atom of the least populated species
    pub fn reference_atom(&self) -> usize {
        let mut best = 0;
        let mut best_count = usize::MAX;
        for (i, t) in self.types.iter().enumerate() {
            let count = self.types.iter().filter(|u| *u == t).count();
            if count < best_count {
                best_count = count;
                best = i;
            }
        }
        best
    }

    /// Atom `j` can stand in for atom `i` under a symmetry operation
    pub fn same_site_kind(&self, i: usize, j: usize, symprec: f64) -> bool {
        if self.types[i] != self.types[j] {
            return false;
        }
        match (self.spin(i), self.spin(j)) {
            (Some(a), Some(b)) => (a - b).abs() < symprec,
            _ => true,
        }
    }

    /// Copy with every position reduced into [0, 1)
    pub fn wrapped(&self) -> Self {
        let mut out = self.clone();
        for p in out.positions.iter_mut() {
            *p = linalg::wrap_unit(*p);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> [[f64; 3]; 3] {
        [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
    }

    #[test]
    fn test_valid_cell() {
        let cell = Cell::new(cubic(4.0), vec![[0.0; 3], [0.5; 3]], vec![1, 2]);
        assert!(cell.validate().is_ok());
        assert!((cell.volume() - 64.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_lattice_rejected() {
        let lattice = [[1.0, 2.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let cell = Cell::new(lattice, vec![[0.0; 3]], vec![1]);
        assert!(matches!(cell.validate(), Err(SymmetryError::DegenerateLattice { .. })));

        let flat = [[1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1e-12]];
        let cell = Cell::new(flat, vec![[0.0; 3]], vec![1]);
        assert!(cell.validate().is_err());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let cell = Cell::new(cubic(3.0), vec![[0.0; 3], [0.5; 3]], vec![1]);
        assert!(matches!(cell.validate(), Err(SymmetryError::LengthMismatch { .. })));

        let cell = Cell::new(cubic(3.0), vec![[0.0; 3]], vec![1]).with_spins(vec![1.0, -1.0]);
        assert!(cell.validate().is_err());

        let cell = Cell::new(cubic(3.0), vec![], vec![]);
        assert_eq!(cell.validate(), Err(SymmetryError::EmptyCell));
    }

    #[test]
    fn test_reference_atom_is_minority_species() {
        let cell = Cell::new(
            cubic(3.0),
            vec![[0.0; 3], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.5; 3]],
            vec![8, 8, 8, 22],
        );
        assert_eq!(cell.reference_atom(), 3);
    }

    #[test]
    fn test_row_vectors_become_columns() {
        let rows = [[1.0, 2.0, 3.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
        let cell = Cell::from_row_vectors(rows, vec![[0.0; 3]], vec![1]);
        assert_eq!(cell.basis_vector(0), [1.0, 2.0, 3.0]);
        assert_eq!(cell.basis_vector(2), [0.0, 0.0, 5.0]);
    }
}
