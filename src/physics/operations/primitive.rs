// src/physics/operations/primitive.rs

use crate::config::SymmetryConfig;
use crate::error::PrimitiveError;
use crate::model::cell::Cell;
use crate::physics::analysis::symmetry;
use crate::physics::operations::reduction;
use crate::utils::linalg;
use log::debug;
use nalgebra::{Matrix3, Vector3};

/// Primitive cell found inside a (possibly non-primitive) input cell
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveCell {
    pub cell: Cell,
    /// Primitive atom index for every input atom
    pub mapping_table: Vec<usize>,
    /// Pure translations of the input cell, zero first
    pub translations: Vec<[f64; 3]>,
    /// `L_primitive = L_input * transformation`
    pub transformation: [[f64; 3]; 3],
    /// Tolerance the finder converged at
    pub tolerance: f64,
    /// The input had no non-trivial pure translation
    pub is_primitive: bool,
}

impl PrimitiveCell {
    pub fn multiplicity(&self) -> usize {
        self.translations.len()
    }
}

/// Finds the primitive cell, shrinking the tolerance by `config.reduce_rate`
/// after every failed attempt.
pub fn find_primitive(cell: &Cell, symprec: f64, config: &SymmetryConfig) -> Result<PrimitiveCell, PrimitiveError> {
    let mut tolerance = symprec;
    let mut last_error = PrimitiveError::NoPrimitiveBasis { multiplicity: 0 };
    for attempt in 0..config.max_attempts {
        match primitive_at(cell, tolerance) {
            Ok(found) => return Ok(found),
            Err(e) => {
                debug!("primitive attempt {} at tolerance {:.3e} failed: {}", attempt, tolerance, e);
                last_error = e;
                tolerance *= config.reduce_rate;
            }
        }
    }
    Err(last_error)
}

/// One attempt at a fixed tolerance
fn primitive_at(cell: &Cell, tolerance: f64) -> Result<PrimitiveCell, PrimitiveError> {
    let translations = symmetry::pure_translations(cell, tolerance);
    let multiplicity = translations.len();

    if multiplicity == 1 {
        return Ok(PrimitiveCell {
            cell: cell.wrapped(),
            mapping_table: (0..cell.len()).collect(),
            translations,
            transformation: linalg::from_matrix(&Matrix3::identity()),
            tolerance,
            is_primitive: true,
        });
    }
    if cell.len() % multiplicity != 0 {
        return Err(PrimitiveError::IndivisibleMultiplicity {
            atoms: cell.len(),
            multiplicity,
        });
    }

    let lattice = cell.lattice_matrix();
    let basis = primitive_basis(&translations, multiplicity).ok_or(PrimitiveError::NoPrimitiveBasis { multiplicity })?;
    let candidate = linalg::from_matrix(&(lattice * basis));
    let reduced =
        reduction::delaunay_reduce(&candidate, tolerance).ok_or(PrimitiveError::NoPrimitiveBasis { multiplicity })?;

    // integer map from input to primitive fractional coordinates
    let reduced_inv = linalg::to_matrix(&reduced.lattice)
        .try_inverse()
        .ok_or(PrimitiveError::NoPrimitiveBasis { multiplicity })?;
    let to_primitive = (reduced_inv * lattice).map(|x| x.round());
    if (to_primitive.determinant().round().abs() as usize) != multiplicity {
        return Err(PrimitiveError::NoPrimitiveBasis { multiplicity });
    }
    let transformation = to_primitive
        .try_inverse()
        .ok_or(PrimitiveError::NoPrimitiveBasis { multiplicity })?;
    let prim_lattice = lattice * transformation;

    let projected: Vec<[f64; 3]> = cell
        .positions
        .iter()
        .map(|x| linalg::wrap_unit(linalg::mat_fvec(&to_primitive, *x)))
        .collect();

    let (classes, mapping_table) = group_atoms(cell, &projected, &prim_lattice, tolerance);
    if classes.iter().any(|members| members.len() != multiplicity) {
        return Err(PrimitiveError::InconsistentClasses { multiplicity });
    }

    let mut positions = Vec::with_capacity(classes.len());
    let mut types = Vec::with_capacity(classes.len());
    let mut spins = cell.spins.as_ref().map(|_| Vec::with_capacity(classes.len()));
    for members in &classes {
        let first = members[0];
        let origin = projected[first];
        let mut acc = [0.0; 3];
        for &i in members {
            let d = linalg::minimum_image(linalg::sub3(projected[i], origin));
            acc = linalg::add3(acc, linalg::add3(origin, d));
        }
        let n = members.len() as f64;
        positions.push(linalg::wrap_unit([acc[0] / n, acc[1] / n, acc[2] / n]));
        types.push(cell.types[first]);
        if let (Some(out), Some(s)) = (spins.as_mut(), cell.spin(first)) {
            out.push(s);
        }
    }

    let mut prim = Cell::new(linalg::from_matrix(&prim_lattice), positions, types);
    prim.spins = spins;
    debug!("primitive cell: {} -> {} atoms", cell.len(), prim.len());

    Ok(PrimitiveCell {
        cell: prim,
        mapping_table,
        translations,
        transformation: linalg::from_matrix(&transformation),
        tolerance,
        is_primitive: false,
    })
}

/// First triple from the translations and the unit vectors spanning
/// `1 / multiplicity` of the cell, right-handed
fn primitive_basis(translations: &[[f64; 3]], multiplicity: usize) -> Option<Matrix3<f64>> {
    let mut vectors: Vec<Vector3<f64>> = translations
        .iter()
        .skip(1)
        .map(|t| Vector3::from(linalg::minimum_image(*t)))
        .collect();
    vectors.extend([Vector3::x(), Vector3::y(), Vector3::z()]);

    let n = vectors.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let m = Matrix3::from_columns(&[vectors[i], vectors[j], vectors[k]]);
                let det = m.determinant();
                if det.abs() < 1e-3 {
                    continue;
                }
                let ratio = 1.0 / det.abs();
                if ratio.round() as usize == multiplicity && (ratio - multiplicity as f64).abs() < 0.1 {
                    if det < 0.0 {
                        return Some(Matrix3::from_columns(&[vectors[i], vectors[j], -vectors[k]]));
                    }
                    return Some(m);
                }
            }
        }
    }
    None
}

/// Groups atoms that coincide in the primitive cell. Returns the member lists
/// and the class index of every atom.
fn group_atoms(
    cell: &Cell,
    projected: &[[f64; 3]],
    prim_lattice: &Matrix3<f64>,
    tolerance: f64,
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut classes: Vec<Vec<usize>> = Vec::new();
    let mut mapping = Vec::with_capacity(projected.len());
    for (i, x) in projected.iter().enumerate() {
        let found = classes.iter().position(|members| {
            let rep = members[0];
            cell.same_site_kind(rep, i, tolerance)
                && linalg::periodic_distance(prim_lattice, linalg::sub3(*x, projected[rep])) < tolerance
        });
        match found {
            Some(c) => {
                classes[c].push(i);
                mapping.push(c);
            }
            None => {
                mapping.push(classes.len());
                classes.push(vec![i]);
            }
        }
    }
    (classes, mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fcc_conventional() -> Cell {
        Cell::new(
            [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]],
            vec![[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]],
            vec![1; 4],
        )
    }

    #[test]
    fn test_fcc_reduces_to_one_atom() {
        let prim = find_primitive(&fcc_conventional(), 1e-5, &SymmetryConfig::default()).unwrap();
        assert!(!prim.is_primitive);
        assert_eq!(prim.cell.len(), 1);
        assert_eq!(prim.multiplicity(), 4);
        assert_eq!(prim.mapping_table, vec![0, 0, 0, 0]);
        assert!((prim.cell.volume() - 16.0).abs() < 1e-8);

        let expected = 8.0f64.sqrt();
        for j in 0..3 {
            let v = prim.cell.basis_vector(j);
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - expected).abs() < 1e-8);
        }
    }

    #[test]
    fn test_primitive_is_idempotent() {
        let cfg = SymmetryConfig::default();
        let first = find_primitive(&fcc_conventional(), 1e-5, &cfg).unwrap();
        let second = find_primitive(&first.cell, 1e-5, &cfg).unwrap();
        assert!(second.is_primitive);
        assert_eq!(second.cell.len(), first.cell.len());
        assert_eq!(second.cell.lattice, first.cell.lattice);
    }

    #[test]
    fn test_rock_salt_keeps_species() {
        let mut positions = vec![[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]];
        let shifted: Vec<[f64; 3]> = positions.iter().map(|p| linalg::wrap_unit(linalg::add3(*p, [0.5; 3]))).collect();
        positions.extend(shifted);
        let cell = Cell::new(
            [[5.6, 0.0, 0.0], [0.0, 5.6, 0.0], [0.0, 0.0, 5.6]],
            positions,
            vec![11, 11, 11, 11, 17, 17, 17, 17],
        );
        let prim = find_primitive(&cell, 1e-5, &SymmetryConfig::default()).unwrap();
        assert_eq!(prim.cell.len(), 2);
        let mut types = prim.cell.types.clone();
        types.sort();
        assert_eq!(types, vec![11, 17]);
        assert_eq!(prim.mapping_table[0], prim.mapping_table[3]);
        assert_ne!(prim.mapping_table[0], prim.mapping_table[4]);
    }

    #[test]
    fn test_primitive_input_is_returned_wrapped() {
        let cell = Cell::new(
            [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]],
            vec![[-0.25, 1.0, 0.0], [0.5, 0.5, 0.5]],
            vec![1, 2],
        );
        let prim = find_primitive(&cell, 1e-5, &SymmetryConfig::default()).unwrap();
        assert!(prim.is_primitive);
        assert_eq!(prim.cell.lattice, cell.lattice);
        assert!((prim.cell.positions[0][0] - 0.75).abs() < 1e-12);
        assert!(prim.cell.positions[0][1].abs() < 1e-12);
    }

    #[test]
    fn test_noisy_supercell_averages_positions() {
        let cell = Cell::new(
            [[6.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]],
            vec![[0.0, 0.0, 0.0], [0.5 + 1e-4, 0.0, 0.0]],
            vec![1, 1],
        );
        let prim = find_primitive(&cell, 1e-2, &SymmetryConfig::default()).unwrap();
        assert_eq!(prim.cell.len(), 1);
        assert!((prim.cell.volume() - 27.0).abs() < 1e-8);
    }
}
