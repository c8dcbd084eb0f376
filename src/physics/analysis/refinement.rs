// src/physics/analysis/refinement.rs

use crate::database::{HallEntry, SpacegroupDatabase, WyckoffPosition};
use crate::model::cell::Cell;
use crate::model::dataset::Spacegroup;
use crate::model::symmetry::{Operation, Symmetry};
use crate::physics::analysis::spacegroup::{Setting, SpacegroupMatch};
use crate::physics::operations::primitive::PrimitiveCell;
use crate::utils::linalg::{self, IDENTITY};
use log::{debug, warn};
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Site-symmetry and Wyckoff matching slack, in units of the tolerance
const SITE_SLACK: f64 = 4.0;

/// Everything derived from a successful match, expressed for the input cell
#[derive(Debug, Clone)]
pub struct Refinement {
    pub spacegroup: Spacegroup,
    /// Idealized conventional cell
    pub standardized_cell: Cell,
    /// Idealized operations of the input cell, identity first
    pub operations: Symmetry,
    /// Per input atom. All `None` when the database has no Wyckoff table
    /// for the group.
    pub wyckoffs: Vec<Option<char>>,
    pub equivalent_atoms: Vec<usize>,
}

/// Primitive atom placed in the standard setting
struct Site {
    position: [f64; 3],
    multiplicity: usize,
    wyckoff: Option<char>,
}

/// The primitive cell expressed in one matched setting
struct Placement {
    /// `M = T P`, input basis to conventional basis
    m: Matrix3<f64>,
    /// Origin shift in conventional coordinates
    origin: [f64; 3],
    conv_lattice: Matrix3<f64>,
    sites: Vec<Site>,
    /// Wyckoff letter of every input atom, unassigned last
    letters: Vec<u32>,
    /// Distance of `M` from the identity
    distortion: f64,
    /// Cartesian length of the origin shift
    shift: f64,
}

const RANK_EPS: f64 = 1e-8;

// =========================================================================
// 1. ENTRY
// =========================================================================

/// Builds the standardized description of `cell` from its primitive cell
/// and the matched entry.
///
/// Every setting of the match is placed and the one with the
/// lexicographically smallest Wyckoff letters wins. Ties go to the basis
/// closest to the input basis, then to the shortest origin shift.
pub fn refine(
    cell: &Cell,
    primitive: &PrimitiveCell,
    matched: &SpacegroupMatch<'_>,
    database: &dyn SpacegroupDatabase,
    symprec: f64,
) -> Option<Refinement> {
    let entry = matched.entry;
    let t = linalg::to_matrix(&primitive.transformation);
    let hall_ops = entry.symmetry();
    let wyckoff_table = database.wyckoff_positions(entry.number);
    let tolerance = SITE_SLACK * symprec;

    let placements: Vec<Option<Placement>> = matched
        .settings
        .par_iter()
        .map(|setting| place(setting, primitive, &t, &hall_ops, wyckoff_table, tolerance))
        .collect();
    let placement = placements.into_iter().flatten().min_by(rank)?;

    if wyckoff_table.is_some() {
        for site in placement.sites.iter().filter(|s| s.wyckoff.is_none()) {
            warn!(
                "no Wyckoff position of multiplicity {} contains {:?}",
                site.multiplicity, site.position
            );
        }
    }

    let m = placement.m;
    let m_inv = m.try_inverse()?;
    let conv_lattice = placement.conv_lattice;
    let origin = placement.origin;

    let ideal_lattice = idealize_lattice(&conv_lattice, entry)?;
    let standardized_cell =
        standardized_cell(primitive, &placement.sites, &hall_ops, &conv_lattice, ideal_lattice, symprec);

    let operations = input_operations(&hall_ops, &m, &m_inv, &origin, primitive);
    let equivalent_atoms = equivalent_atoms(cell, &operations, symprec);
    let wyckoffs = primitive.mapping_table.iter().map(|&k| placement.sites[k].wyckoff).collect();

    debug!(
        "refined {} with {} operations on the input cell, chosen from {} settings",
        entry.international,
        operations.len(),
        matched.settings.len()
    );

    Some(Refinement {
        spacegroup: Spacegroup {
            kind: entry.spacegroup_type(),
            transformation_matrix: linalg::from_matrix(&m),
            origin_shift: linalg::wrap_unit(origin),
            bravais_lattice: linalg::from_matrix(&conv_lattice),
        },
        standardized_cell,
        operations,
        wyckoffs,
        equivalent_atoms,
    })
}

fn place(
    setting: &Setting,
    primitive: &PrimitiveCell,
    t: &Matrix3<f64>,
    hall_ops: &Symmetry,
    wyckoff_table: Option<&[WyckoffPosition]>,
    tolerance: f64,
) -> Option<Placement> {
    let p = linalg::imat_to_matrix(&setting.transformation);
    let p_inv = p.try_inverse()?;
    let m = t * p;
    let conv_lattice = primitive.cell.lattice_matrix() * p;
    let origin = linalg::mat_fvec(&p_inv, setting.origin_shift);

    let sites: Vec<Site> = primitive
        .cell
        .positions
        .iter()
        .map(|x| {
            let xs = linalg::wrap_unit(linalg::add3(linalg::mat_fvec(&p_inv, *x), origin));
            standard_site(xs, hall_ops, &conv_lattice, wyckoff_table, tolerance)
        })
        .collect();
    let letters = primitive
        .mapping_table
        .iter()
        .map(|&k| sites[k].wyckoff.map_or(u32::MAX, u32::from))
        .collect();

    Some(Placement {
        distortion: (m - Matrix3::identity()).norm(),
        shift: (conv_lattice * Vector3::from(linalg::minimum_image(origin))).norm(),
        m,
        origin,
        conv_lattice,
        sites,
        letters,
    })
}

fn rank(a: &Placement, b: &Placement) -> Ordering {
    a.letters
        .cmp(&b.letters)
        .then_with(|| approx_cmp(a.distortion, b.distortion))
        .then_with(|| approx_cmp(a.shift, b.shift))
}

fn approx_cmp(a: f64, b: f64) -> Ordering {
    if (a - b).abs() < RANK_EPS {
        Ordering::Equal
    } else {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

// =========================================================================
// 2. SITES
// =========================================================================

/// Projects `xs` onto its site-symmetry fixed space and assigns a Wyckoff
/// letter by multiplicity and coordinate pattern
fn standard_site(
    xs: [f64; 3],
    ops: &Symmetry,
    lattice: &Matrix3<f64>,
    wyckoff_table: Option<&[WyckoffPosition]>,
    tolerance: f64,
) -> Site {
    let mut site_count = 0usize;
    let mut acc = [0.0; 3];
    for op in &ops.operations {
        let y = op.apply(xs);
        let d = linalg::sub3(y, xs);
        if linalg::periodic_distance(lattice, d) < tolerance {
            site_count += 1;
            let nearest = [y[0] - d[0].round(), y[1] - d[1].round(), y[2] - d[2].round()];
            acc = linalg::add3(acc, nearest);
        }
    }
    // the identity always fixes the site
    let site_count = site_count.max(1);
    let n = site_count as f64;
    let position = [acc[0] / n, acc[1] / n, acc[2] / n];
    let multiplicity = ops.len() / site_count;

    let images: Vec<[f64; 3]> = ops.operations.iter().map(|op| linalg::wrap_unit(op.apply(position))).collect();
    let wyckoff = wyckoff_table.and_then(|table| {
        table
            .iter()
            .find(|w| w.multiplicity == multiplicity && w.contains_any(&images, lattice, tolerance))
            .map(|w| w.letter)
    });

    Site {
        position: linalg::wrap_unit(position),
        multiplicity,
        wyckoff,
    }
}

/// Orbit images of every symmetry-distinct site in the conventional cell
fn standardized_cell(
    primitive: &PrimitiveCell,
    sites: &[Site],
    ops: &Symmetry,
    conv_lattice: &Matrix3<f64>,
    ideal_lattice: Matrix3<f64>,
    symprec: f64,
) -> Cell {
    let prim = &primitive.cell;
    let mut positions: Vec<[f64; 3]> = Vec::new();
    let mut types: Vec<i32> = Vec::new();
    let mut spins: Option<Vec<f64>> = prim.spins.as_ref().map(|_| Vec::new());
    let mut owner: Vec<usize> = Vec::new();

    let overlaps = |positions: &[[f64; 3]], owner: &[usize], k: usize, q: [f64; 3]| {
        positions
            .iter()
            .zip(owner)
            .any(|(x, &o)| prim.same_site_kind(o, k, symprec) && linalg::periodic_distance(conv_lattice, linalg::sub3(*x, q)) < symprec)
    };

    for (k, site) in sites.iter().enumerate() {
        if overlaps(&positions, &owner, k, site.position) {
            continue;
        }
        let start = positions.len();
        for op in &ops.operations {
            let q = linalg::wrap_unit(op.apply(site.position));
            if overlaps(&positions[start..], &owner[start..], k, q) {
                continue;
            }
            positions.push(q);
            owner.push(k);
            types.push(prim.types[k]);
            if let (Some(out), Some(s)) = (spins.as_mut(), prim.spin(k)) {
                out.push(s);
            }
        }
        if positions.len() - start != site.multiplicity {
            debug!(
                "orbit of site {} has {} images, expected {}",
                k,
                positions.len() - start,
                site.multiplicity
            );
        }
    }

    Cell {
        lattice: linalg::from_matrix(&ideal_lattice),
        positions,
        types,
        spins,
    }
}

// =========================================================================
// 3. LATTICE
// =========================================================================

/// Conventional lattice with its metric symmetrized over the point group.
/// The orientation of `lattice` is kept through a polar decomposition.
pub fn idealize_lattice(lattice: &Matrix3<f64>, entry: &HallEntry) -> Option<Matrix3<f64>> {
    let metric = lattice.transpose() * lattice;
    let mut sym = Matrix3::zeros();
    for r in &entry.rotations {
        let rm = linalg::imat_to_matrix(r);
        sym += rm.transpose() * metric * rm;
    }
    sym /= entry.rotations.len().max(1) as f64;

    let eigen = SymmetricEigen::new(sym);
    if eigen.eigenvalues.iter().any(|v| *v <= 0.0) {
        return None;
    }
    let sqrt_diag = Matrix3::from_diagonal(&eigen.eigenvalues.map(f64::sqrt));
    let b = eigen.eigenvectors * sqrt_diag * eigen.eigenvectors.transpose();

    let svd = (lattice * b.try_inverse()?).svd(true, true);
    let rotation = svd.u? * svd.v_t?;
    Some(rotation * b)
}

// =========================================================================
// 4. OPERATIONS AND ORBITS OF THE INPUT CELL
// =========================================================================

/// Database operations in the input basis, `W = M R M^-1` and
/// `w = M (s + (R - I) o)`, combined with the idealized pure translations
fn input_operations(
    hall_ops: &Symmetry,
    m: &Matrix3<f64>,
    m_inv: &Matrix3<f64>,
    origin: &[f64; 3],
    primitive: &PrimitiveCell,
) -> Symmetry {
    let t = linalg::to_matrix(&primitive.transformation);
    let lattice_translations: Vec<[f64; 3]> = match t.try_inverse() {
        Some(t_inv) => primitive
            .translations
            .iter()
            .map(|v| {
                let integral = (t_inv * nalgebra::Vector3::from(*v)).map(f64::round);
                linalg::wrap_unit(linalg::mat_fvec(&t, [integral.x, integral.y, integral.z]))
            })
            .collect(),
        None => vec![[0.0; 3]],
    };

    let mut operations: Vec<Operation> = Vec::new();
    for op in &hall_ops.operations {
        let r = linalg::imat_to_matrix(&op.rotation);
        let Some(w) = linalg::round_to_imat(&(m * r * m_inv), 1e-5) else {
            warn!("operation {:?} is not integral in the input basis", op.rotation);
            continue;
        };
        let ro = linalg::imat_fvec(&op.rotation, *origin);
        let inner = [
            op.translation[0] + ro[0] - origin[0],
            op.translation[1] + ro[1] - origin[1],
            op.translation[2] + ro[2] - origin[2],
        ];
        let base = linalg::mat_fvec(m, inner);
        for lt in &lattice_translations {
            let candidate = Operation::new(w, linalg::wrap_unit(linalg::add3(base, *lt)));
            if !operations.iter().any(|o| same_operation(o, &candidate)) {
                operations.push(candidate);
            }
        }
    }
    if operations.first().map_or(true, |o| o.rotation != IDENTITY) {
        operations.insert(0, Operation::identity());
    }
    Symmetry::new(operations)
}

fn same_operation(a: &Operation, b: &Operation) -> bool {
    a.rotation == b.rotation
        && linalg::minimum_image(linalg::sub3(a.translation, b.translation))
            .iter()
            .all(|x| x.abs() < 1e-6)
}

/// Lowest atom index in the orbit of every atom
pub fn equivalent_atoms(cell: &Cell, operations: &Symmetry, symprec: f64) -> Vec<usize> {
    let lattice = cell.lattice_matrix();
    (0..cell.len())
        .map(|i| {
            operations
                .operations
                .iter()
                .filter_map(|op| nearest_atom(cell, &lattice, i, op.apply(cell.positions[i]), symprec))
                .min()
                .unwrap_or(i)
        })
        .collect()
}

fn nearest_atom(cell: &Cell, lattice: &Matrix3<f64>, source: usize, y: [f64; 3], symprec: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for j in 0..cell.len() {
        if !cell.same_site_kind(source, j, symprec) {
            continue;
        }
        let d = linalg::periodic_distance(lattice, linalg::sub3(y, cell.positions[j]));
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((j, d));
        }
    }
    best.map(|(j, _)| j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AngleTolerance, SymmetryConfig};
    use crate::database::StandardDatabase;
    use crate::physics::analysis::spacegroup::match_spacegroup;
    use crate::physics::operations::primitive::find_primitive;

    fn refined(cell: &Cell) -> Refinement {
        let db = StandardDatabase::new();
        let config = SymmetryConfig::default();
        let prim = find_primitive(cell, 1e-5, &config).unwrap();
        let m = match_spacegroup(&prim.cell, prim.tolerance, AngleTolerance::Default, &db).unwrap();
        refine(cell, &prim, &m, &db, prim.tolerance).unwrap()
    }

    fn cubic(a: f64) -> [[f64; 3]; 3] {
        [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
    }

    fn fcc_sites() -> Vec<[f64; 3]> {
        vec![[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]]
    }

    #[test]
    fn test_fcc_conventional_cell() {
        let cell = Cell::new(cubic(4.0), fcc_sites(), vec![1; 4]);
        let r = refined(&cell);
        assert_eq!(r.spacegroup.kind.number, 225);
        assert_eq!(r.operations.len(), 192);
        assert_eq!(r.wyckoffs, vec![Some('a'); 4]);
        assert_eq!(r.equivalent_atoms, vec![0; 4]);
        assert_eq!(r.standardized_cell.len(), 4);
        assert!((r.standardized_cell.volume() - 64.0).abs() < 1e-8);
        for op in &r.operations.operations {
            assert!((0..4).all(|i| {
                let y = op.apply(cell.positions[i]);
                cell.positions.iter().any(|x| linalg::periodic_distance(&cell.lattice_matrix(), linalg::sub3(y, *x)) < 1e-6)
            }));
        }
    }

    #[test]
    fn test_rock_salt_sites() {
        let mut positions = fcc_sites();
        positions.extend(fcc_sites().iter().map(|p| [p[0] + 0.5, p[1], p[2]]));
        let cell = Cell::new(cubic(5.6), positions, vec![11, 11, 11, 11, 17, 17, 17, 17]);
        let r = refined(&cell);
        assert_eq!(r.spacegroup.kind.number, 225);
        let letters: Vec<char> = r.wyckoffs.iter().map(|w| w.unwrap()).collect();
        assert_eq!(letters[0], letters[3]);
        assert_eq!(letters[4], letters[7]);
        assert_ne!(letters[0], letters[4]);
        assert!(letters.iter().all(|c| *c == 'a' || *c == 'b'));
        assert_eq!(r.equivalent_atoms, vec![0, 0, 0, 0, 4, 4, 4, 4]);
        assert_eq!(r.standardized_cell.len(), 8);
    }

    #[test]
    fn test_cesium_chloride_and_bcc() {
        let cscl = Cell::new(cubic(4.1), vec![[0.0; 3], [0.5, 0.5, 0.5]], vec![55, 17]);
        let r = refined(&cscl);
        assert_eq!(r.spacegroup.kind.number, 221);
        assert_eq!(r.wyckoffs, vec![Some('a'), Some('b')]);
        assert_eq!(r.equivalent_atoms, vec![0, 1]);

        let bcc = Cell::new(cubic(3.3), vec![[0.0; 3], [0.5, 0.5, 0.5]], vec![26, 26]);
        let r = refined(&bcc);
        assert_eq!(r.spacegroup.kind.number, 229);
        assert_eq!(r.wyckoffs, vec![Some('a'), Some('a')]);
        assert_eq!(r.equivalent_atoms, vec![0, 0]);
        assert_eq!(r.operations.len(), 96);
    }

    #[test]
    fn test_diamond_single_orbit() {
        let mut positions = fcc_sites();
        positions.extend(fcc_sites().iter().map(|p| [p[0] + 0.25, p[1] + 0.25, p[2] + 0.25]));
        let cell = Cell::new(cubic(5.43), positions, vec![14; 8]);
        let r = refined(&cell);
        assert_eq!(r.spacegroup.kind.number, 227);
        assert_eq!(r.wyckoffs, vec![Some('a'); 8]);
        assert_eq!(r.equivalent_atoms, vec![0; 8]);
        assert_eq!(r.standardized_cell.len(), 8);
    }

    #[test]
    fn test_hexagonal_close_packed() {
        let s3 = 3.0f64.sqrt();
        let cell = Cell::new(
            [[3.0, -1.5, 0.0], [0.0, 1.5 * s3, 0.0], [0.0, 0.0, 5.0]],
            vec![[1.0 / 3.0, 2.0 / 3.0, 0.25], [2.0 / 3.0, 1.0 / 3.0, 0.75]],
            vec![12, 12],
        );
        let r = refined(&cell);
        assert_eq!(r.spacegroup.kind.number, 194);
        assert_eq!(r.wyckoffs, vec![Some('c'), Some('c')]);
        assert_eq!(r.equivalent_atoms, vec![0, 0]);
        assert_eq!(r.operations.len(), 24);
    }

    const RUTILE_X: f64 = 0.305;

    fn rutile_positions() -> Vec<[f64; 3]> {
        let x = RUTILE_X;
        vec![
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.5],
            [x, x, 0.0],
            [-x, -x, 0.0],
            [0.5 + x, 0.5 - x, 0.5],
            [0.5 - x, 0.5 + x, 0.5],
        ]
    }

    fn rutile(positions: Vec<[f64; 3]>) -> Cell {
        Cell::new([[4.6, 0.0, 0.0], [0.0, 4.6, 0.0], [0.0, 0.0, 2.96]], positions, vec![22, 22, 8, 8, 8, 8])
    }

    fn rutile_letters() -> Vec<Option<char>> {
        vec![Some('a'), Some('a'), Some('f'), Some('f'), Some('f'), Some('f')]
    }

    fn is_identity(m: &[[f64; 3]; 3]) -> bool {
        (linalg::to_matrix(m) - Matrix3::identity()).norm() < 1e-8
    }

    fn same_origin(a: [f64; 3], b: [f64; 3]) -> bool {
        linalg::minimum_image(linalg::sub3(a, b)).iter().all(|x| x.abs() < 1e-6)
    }

    #[test]
    fn test_rutile_sites() {
        let cell = rutile(rutile_positions());
        let r = refined(&cell);
        assert_eq!(r.spacegroup.kind.number, 136);
        assert_eq!(r.wyckoffs[0], Some('a'));
        assert!(r.wyckoffs[2..].iter().all(|w| *w == Some('f')));
        assert_eq!(r.equivalent_atoms, vec![0, 0, 2, 2, 2, 2]);
        assert_eq!(r.standardized_cell.len(), 6);
    }

    #[test]
    fn test_origin_shift_keeps_wyckoff_letters() {
        let shift = [0.1, 0.2, 0.3];
        let shifted: Vec<[f64; 3]> = rutile_positions().iter().map(|x| linalg::add3(*x, shift)).collect();
        let r = refined(&rutile(shifted));
        assert_eq!(r.spacegroup.kind.number, 136);
        assert_eq!(r.wyckoffs, rutile_letters());
        assert!(is_identity(&r.spacegroup.transformation_matrix));
        assert!(same_origin(r.spacegroup.origin_shift, [0.9, 0.8, 0.7]));
    }

    #[test]
    fn test_rotated_rutile_keeps_input_axes() {
        // (x, y, z) -> (-y, x, z) equals the original shifted by (1/2, 1/2, 1/2)
        let rotated: Vec<[f64; 3]> = rutile_positions().iter().map(|x| [-x[1], x[0], x[2]]).collect();
        let r = refined(&rutile(rotated));
        assert_eq!(r.spacegroup.kind.number, 136);
        assert_eq!(r.wyckoffs, rutile_letters());
        assert!(is_identity(&r.spacegroup.transformation_matrix));
        assert!(same_origin(r.spacegroup.origin_shift, [0.5, 0.5, 0.5]));
    }

    #[test]
    fn test_standard_cells_keep_their_axes() {
        let lattices = [
            [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]],
            [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 5.0]],
            cubic(3.0),
        ];
        for lattice in lattices {
            let r = refined(&Cell::new(lattice, vec![[0.0; 3]], vec![1]));
            assert!(is_identity(&r.spacegroup.transformation_matrix));
            assert!(same_origin(r.spacegroup.origin_shift, [0.0; 3]));
            let diff = r.standardized_cell.lattice_matrix() - linalg::to_matrix(&lattice);
            assert!(diff.norm() < 1e-8);

            // a shifted atom moves back onto an inversion centre without relabelling axes
            let shifted = refined(&Cell::new(lattice, vec![[0.2, 0.3, 0.4]], vec![1]));
            assert_eq!(shifted.spacegroup.kind.number, r.spacegroup.kind.number);
            assert!(is_identity(&shifted.spacegroup.transformation_matrix));
            let x = shifted.standardized_cell.positions[0];
            assert!(x.iter().all(|c| same_origin([2.0 * c, 0.0, 0.0], [0.0; 3])));
        }
    }

    #[test]
    fn test_uncovered_group_has_no_letters() {
        let lattice = [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
        let r = refined(&Cell::new(lattice, vec![[0.0; 3]], vec![1]));
        assert_eq!(r.spacegroup.kind.number, 47);
        assert_eq!(r.wyckoffs, vec![None]);
        // the atom still sits on a site of the standardized cell
        assert_eq!(r.standardized_cell.len(), 1);
        assert_eq!(r.equivalent_atoms, vec![0]);
    }

    #[test]
    fn test_unique_axis_moves_to_c() {
        let lattice = [[5.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]];
        let r = refined(&Cell::new(lattice, vec![[0.0; 3]], vec![1]));
        assert_eq!(r.spacegroup.kind.number, 123);
        let ideal = r.standardized_cell.lattice_matrix();
        let norms: Vec<f64> = (0..3).map(|j| ideal.column(j).norm()).collect();
        assert!((norms[0] - 3.0).abs() < 1e-8);
        assert!((norms[1] - 3.0).abs() < 1e-8);
        assert!((norms[2] - 5.0).abs() < 1e-8);
        assert!((linalg::to_matrix(&r.spacegroup.transformation_matrix).determinant() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_wurtzite_sites() {
        let s3 = 3.0f64.sqrt();
        let u = 0.375;
        let cell = Cell::new(
            [[3.0, -1.5, 0.0], [0.0, 1.5 * s3, 0.0], [0.0, 0.0, 5.0]],
            vec![
                [1.0 / 3.0, 2.0 / 3.0, 0.0],
                [2.0 / 3.0, 1.0 / 3.0, 0.5],
                [1.0 / 3.0, 2.0 / 3.0, u],
                [2.0 / 3.0, 1.0 / 3.0, 0.5 + u],
            ],
            vec![30, 30, 16, 16],
        );
        let r = refined(&cell);
        assert_eq!(r.spacegroup.kind.number, 186);
        assert_eq!(r.wyckoffs, vec![Some('b'); 4]);
        assert_eq!(r.equivalent_atoms, vec![0, 0, 2, 2]);
    }

    #[test]
    fn test_idealized_lattice_removes_noise() {
        let noisy = [[4.0 + 1e-4, 0.0, 0.0], [0.0, 4.0, 1e-4], [0.0, 0.0, 4.0 - 1e-4]];
        let cell = Cell::new(noisy, fcc_sites(), vec![1; 4]);
        let db = StandardDatabase::new();
        let prim = find_primitive(&cell, 1e-2, &SymmetryConfig::default()).unwrap();
        let m = match_spacegroup(&prim.cell, prim.tolerance, AngleTolerance::Default, &db).unwrap();
        assert_eq!(m.entry.number, 225);
        let r = refine(&cell, &prim, &m, &db, prim.tolerance).unwrap();
        let g = r.standardized_cell.lattice_matrix().transpose() * r.standardized_cell.lattice_matrix();
        assert!((g[(0, 0)] - g[(1, 1)]).abs() < 1e-10);
        assert!((g[(1, 1)] - g[(2, 2)]).abs() < 1e-10);
        assert!(g[(0, 1)].abs() < 1e-10 && g[(0, 2)].abs() < 1e-10 && g[(1, 2)].abs() < 1e-10);
    }
}
