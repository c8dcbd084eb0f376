// src/physics/analysis/symmetry.rs

use crate::config::AngleTolerance;
use crate::model::cell::Cell;
use crate::model::symmetry::{Operation, RotationSet, Symmetry};
use crate::physics::operations::reduction;
use crate::utils::linalg::{self, IMat3, IDENTITY};
use log::{debug, warn};
use nalgebra::Matrix3;
use rayon::prelude::*;
use std::sync::OnceLock;

/// Squared sine below which two angles count as identical
const ANGLE_EPS: f64 = 1e-12;

// =========================================================================
// 1. LATTICE POINT GROUP
// =========================================================================

static UNIMODULAR: OnceLock<Vec<IMat3>> = OnceLock::new();

/// All matrices with entries in {-1, 0, 1} and determinant +-1
fn unimodular_candidates() -> &'static [IMat3] {
    UNIMODULAR.get_or_init(|| {
        let mut out = Vec::new();
        for code in 0..19683usize {
            let mut m = [[0i32; 3]; 3];
            let mut c = code;
            for entry in m.iter_mut().flatten() {
                *entry = (c % 3) as i32 - 1;
                c /= 3;
            }
            if linalg::imat_det(&m).abs() == 1 {
                out.push(m);
            }
        }
        out
    })
}

/// Rotations of the lattice (holohedry), expressed in the input basis.
///
/// The lattice is Delaunay reduced first so that every symmetry of the
/// lattice has entries in {-1, 0, 1}. Identity comes first.
pub fn lattice_point_group(lattice: &[[f64; 3]; 3], symprec: f64, angle_tolerance: AngleTolerance) -> RotationSet {
    let Some(reduced) = reduction::delaunay_reduce(lattice, symprec) else {
        warn!("lattice point group: Delaunay reduction failed, using identity only");
        return RotationSet::from_vec(vec![IDENTITY]);
    };
    let p = reduced.transformation;
    let Some(p_inv) = linalg::imat_inverse(&p) else {
        return RotationSet::from_vec(vec![IDENTITY]);
    };

    let r = linalg::to_matrix(&reduced.lattice);
    let g0 = r.transpose() * r;
    let angle = angle_tolerance.resolve();

    let mut rotations: Vec<IMat3> = unimodular_candidates()
        .par_iter()
        .filter(|w| {
            let wm = linalg::imat_to_matrix(w);
            let g1 = wm.transpose() * g0 * wm;
            metric_is_preserved(&g0, &g1, symprec, angle)
        })
        .map(|w| linalg::imat_mul(&linalg::imat_mul(&p, w), &p_inv))
        .collect();

    if let Some(pos) = rotations.iter().position(|w| *w == IDENTITY) {
        rotations[..=pos].rotate_right(1);
    }
    debug!("lattice point group order {}", rotations.len());
    RotationSet::from_vec(rotations)
}

/// Compares basis lengths and inter-axial angles of two metric tensors
fn metric_is_preserved(g0: &Matrix3<f64>, g1: &Matrix3<f64>, symprec: f64, angle_tolerance: Option<f64>) -> bool {
    let len0: [f64; 3] = [g0[(0, 0)].sqrt(), g0[(1, 1)].sqrt(), g0[(2, 2)].sqrt()];
    let len1: [f64; 3] = [g1[(0, 0)].sqrt(), g1[(1, 1)].sqrt(), g1[(2, 2)].sqrt()];
    if (0..3).any(|i| (len1[i] - len0[i]).abs() > symprec) {
        return false;
    }

    for (j, k) in [(0, 1), (0, 2), (1, 2)] {
        let cos0 = g0[(j, k)] / len0[j] / len0[k];
        let cos1 = g1[(j, k)] / len1[j] / len1[k];
        match angle_tolerance {
            Some(degrees) => {
                let a0 = cos0.clamp(-1.0, 1.0).acos().to_degrees();
                let a1 = cos1.clamp(-1.0, 1.0).acos().to_degrees();
                if (a1 - a0).abs() > degrees {
                    return false;
                }
            }
            None => {
                // sin^2 of the angle difference, scaled to a displacement
                let x = cos0 * cos1 + (1.0 - cos0 * cos0).max(0.0).sqrt() * (1.0 - cos1 * cos1).max(0.0).sqrt();
                let sin2 = 1.0 - x * x;
                let scale = (len0[j] + len1[j]) * (len0[k] + len1[k]) / 4.0;
                if sin2 > ANGLE_EPS && sin2 * scale > symprec * symprec {
                    return false;
                }
            }
        }
    }
    true
}

// =========================================================================
// 2. SPACE-GROUP OPERATIONS
// =========================================================================

/// True when `op` maps the atom set onto itself: every atom lands within
/// `symprec` of a distinct atom of the same kind.
pub fn is_invariant_under(cell: &Cell, lattice: &Matrix3<f64>, op: &Operation, symprec: f64) -> bool {
    let n = cell.len();
    let mut used = vec![false; n];
    for i in 0..n {
        let image = op.apply(cell.positions[i]);
        let hit = (0..n).find(|&k| {
            !used[k]
                && cell.same_site_kind(i, k, symprec)
                && linalg::periodic_distance(lattice, linalg::sub3(image, cell.positions[k])) < symprec
        });
        match hit {
            Some(k) => used[k] = true,
            None => return false,
        }
    }
    true
}

/// Finds all operations that leave the cell invariant.
///
/// Candidate translations come from mapping the reference atom (first atom of
/// the least populated species) onto every atom of its kind; spins, when
/// present, must agree within `symprec`. Identity is first.
pub fn find_operations(cell: &Cell, symprec: f64, angle_tolerance: AngleTolerance) -> Symmetry {
    let lattice = cell.lattice_matrix();
    let rotations = lattice_point_group(&cell.lattice, symprec, angle_tolerance);
    let r = cell.reference_atom();
    let x_ref = cell.positions[r];

    let mut operations: Vec<Operation> = rotations
        .as_slice()
        .par_iter()
        .flat_map_iter(|w| {
            let wx = linalg::imat_fvec(w, x_ref);
            (0..cell.len())
                .filter(|&j| cell.same_site_kind(r, j, symprec))
                .map(|j| Operation::new(*w, linalg::wrap_unit(linalg::sub3(cell.positions[j], wx))))
                .filter(|op| is_invariant_under(cell, &lattice, op, symprec))
                .collect::<Vec<_>>()
        })
        .collect();

    if let Some(pos) = operations.iter().position(|op| op.is_identity(symprec)) {
        operations[..=pos].rotate_right(1);
        operations[0] = Operation::identity();
    }
    debug!(
        "found {} operations from {} lattice rotations",
        operations.len(),
        rotations.len()
    );
    Symmetry::new(operations)
}

/// Translations `t` for which `x -> x + t` is a symmetry, zero first
pub fn pure_translations(cell: &Cell, symprec: f64) -> Vec<[f64; 3]> {
    let lattice = cell.lattice_matrix();
    let r = cell.reference_atom();
    let mut out = vec![[0.0; 3]];
    for j in 0..cell.len() {
        if j == r || !cell.same_site_kind(r, j, symprec) {
            continue;
        }
        let t = linalg::wrap_unit(linalg::sub3(cell.positions[j], cell.positions[r]));
        if linalg::periodic_distance(&lattice, t) < symprec {
            continue;
        }
        let op = Operation::new(IDENTITY, t);
        if is_invariant_under(cell, &lattice, &op, symprec) {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> [[f64; 3]; 3] {
        [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
    }

    fn fcc_conventional() -> Cell {
        Cell::new(
            cubic(4.0),
            vec![[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]],
            vec![1; 4],
        )
    }

    #[test]
    fn test_unimodular_candidates() {
        let all = unimodular_candidates();
        assert!(all.contains(&IDENTITY));
        assert!(all.iter().all(|m| linalg::imat_det(m).abs() == 1));
    }

    #[test]
    fn test_cubic_lattice_holohedry() {
        let rots = lattice_point_group(&cubic(3.0), 1e-5, AngleTolerance::Default);
        assert_eq!(rots.len(), 48);
        assert_eq!(rots.as_slice()[0], IDENTITY);
    }

    #[test]
    fn test_hexagonal_and_orthorhombic_holohedry() {
        let s3 = 3.0f64.sqrt();
        let hex = [[3.0, -1.5, 0.0], [0.0, 1.5 * s3, 0.0], [0.0, 0.0, 5.0]];
        assert_eq!(lattice_point_group(&hex, 1e-5, AngleTolerance::Default).len(), 24);

        let ortho = [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
        assert_eq!(lattice_point_group(&ortho, 1e-5, AngleTolerance::Default).len(), 8);
    }

    #[test]
    fn test_angle_tolerance_in_degrees() {
        // 90.3 degree angle passes a 1 degree tolerance only
        let beta = 90.3f64.to_radians();
        let lattice = [[3.0, 0.0, 3.0 * beta.cos()], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0 * beta.sin()]];
        let strict = lattice_point_group(&lattice, 1e-5, AngleTolerance::Degrees(0.1));
        let loose = lattice_point_group(&lattice, 1e-1, AngleTolerance::Degrees(1.0));
        assert!(strict.len() < loose.len());
        assert_eq!(loose.len(), 48);
    }

    #[test]
    fn test_fcc_conventional_has_192_operations() {
        let cell = fcc_conventional();
        let sym = find_operations(&cell, 1e-5, AngleTolerance::Default);
        assert_eq!(sym.len(), 192);
        assert_eq!(sym.point_group().len(), 48);
        assert!(sym.operations[0].is_identity(1e-12));
        assert_eq!(sym.pure_translations().len(), 4);
    }

    #[test]
    fn test_operations_reproduce_atoms() {
        let x = 0.305;
        let cell = Cell::new(
            [[4.6, 0.0, 0.0], [0.0, 4.6, 0.0], [0.0, 0.0, 2.96]],
            vec![
                [0.0, 0.0, 0.0],
                [0.5, 0.5, 0.5],
                [x, x, 0.0],
                [1.0 - x, 1.0 - x, 0.0],
                [0.5 + x, 0.5 - x, 0.5],
                [0.5 - x, 0.5 + x, 0.5],
            ],
            vec![22, 22, 8, 8, 8, 8],
        );
        let sym = find_operations(&cell, 1e-5, AngleTolerance::Default);
        assert_eq!(sym.len(), 16);
        let lattice = cell.lattice_matrix();
        for op in &sym.operations {
            assert!(is_invariant_under(&cell, &lattice, op, 1e-5));
            assert!(op.translation.iter().all(|t| (0.0..1.0).contains(t)));
        }
    }

    #[test]
    fn test_spins_reduce_operations() {
        // CsCl-like positions with antiparallel spins on identical species
        let cell = Cell::new(cubic(3.0), vec![[0.0; 3], [0.5; 3]], vec![1, 1]);
        let plain = find_operations(&cell, 1e-5, AngleTolerance::Default);
        assert_eq!(plain.len(), 96);

        let magnetic = cell.clone().with_spins(vec![1.0, -1.0]);
        let sym = find_operations(&magnetic, 1e-5, AngleTolerance::Default);
        assert_eq!(sym.len(), 48);
        assert!(sym.pure_translations().len() == 1);
    }

    #[test]
    fn test_pure_translations_zero_first() {
        let cell = fcc_conventional();
        let t = pure_translations(&cell, 1e-5);
        assert_eq!(t.len(), 4);
        assert_eq!(t[0], [0.0; 3]);
    }
}
