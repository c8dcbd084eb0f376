// src/physics/analysis/spacegroup.rs

use crate::config::AngleTolerance;
use crate::database::{HallEntry, SpacegroupDatabase};
use crate::model::cell::Cell;
use crate::model::symmetry::{RotationSet, Symmetry};
use crate::physics::analysis::{pointgroup, symmetry};
use crate::utils::linalg::{self, IMat3, IDENTITY};
use log::debug;
use nalgebra::{Matrix3, Vector3};

/// Displacement (in units of the tolerance) accepted when verifying an origin
const ORIGIN_SLACK: f64 = 4.0;

/// One placement of a primitive cell in a database setting.
///
/// Conventional and primitive coordinates relate through
/// `x_conv = P^-1 (x_prim + origin_shift)` where `P = transformation`
/// (its columns are the conventional basis vectors in primitive coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setting {
    pub transformation: IMat3,
    /// Origin shift in primitive coordinates
    pub origin_shift: [f64; 3],
}

/// A primitive cell matched to a database entry
#[derive(Debug, Clone)]
pub struct SpacegroupMatch<'a> {
    pub entry: &'a HallEntry,
    /// Every basis and origin under which the cell fits `entry`. Bases
    /// nearest the primitive basis come first, and within one basis the
    /// shortest origin shifts.
    pub settings: Vec<Setting>,
    /// Operations found on the primitive cell
    pub operations: Symmetry,
}

impl SpacegroupMatch<'_> {
    pub fn preferred(&self) -> Option<&Setting> {
        self.settings.first()
    }
}

// =========================================================================
// 1. MATCHING
// =========================================================================

/// Identifies the space-group type of a primitive cell.
///
/// Database entries are tried in their canonical order. The first entry
/// that fits under some candidate conventional basis wins, and all of its
/// fitting bases and origins are returned.
pub fn match_spacegroup<'a>(
    primitive: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
    database: &'a dyn SpacegroupDatabase,
) -> Option<SpacegroupMatch<'a>> {
    let operations = symmetry::find_operations(primitive, symprec, angle_tolerance);

    let mut rotations = RotationSet::new();
    let mut translations: Vec<[f64; 3]> = Vec::new();
    for op in &operations.operations {
        if rotations.push_unique(op.rotation) {
            translations.push(op.translation);
        }
    }

    let Some(pg) = pointgroup::classify(&rotations) else {
        debug!("{} rotations do not form a crystallographic point group", rotations.len());
        return None;
    };

    let lattice = primitive.lattice_matrix();
    let metric = lattice.transpose() * lattice;
    let candidates = pointgroup::candidate_bases(&rotations, pg, &metric);

    let primitive_ops = PrimitiveOperations {
        rotations: &rotations,
        translations: &translations,
        lattice: &lattice,
        tolerance: ORIGIN_SLACK * symprec,
    };

    for entry in database.entries().iter().filter(|e| e.pointgroup.symbol == pg.symbol) {
        let mut settings: Vec<Setting> = Vec::new();
        for p in &candidates {
            for origin_shift in primitive_ops.fit_setting(entry, p) {
                settings.push(Setting {
                    transformation: *p,
                    origin_shift,
                });
            }
        }
        if !settings.is_empty() {
            debug!(
                "matched {} ({}) in {} settings, first P = {:?}",
                entry.number,
                entry.hall_symbol,
                settings.len(),
                settings[0].transformation
            );
            return Some(SpacegroupMatch {
                entry,
                settings,
                operations,
            });
        }
    }
    debug!("no database setting matches point group {}", pg.symbol);
    None
}

/// One representative operation per rotation of the primitive cell
struct PrimitiveOperations<'s> {
    rotations: &'s RotationSet,
    translations: &'s [[f64; 3]],
    lattice: &'s Matrix3<f64>,
    tolerance: f64,
}

impl PrimitiveOperations<'_> {
    /// Origin shifts under which `entry` fits in basis `p`, shortest first.
    /// Empty when the basis does not fit.
    fn fit_setting(&self, entry: &HallEntry, p: &IMat3) -> Vec<[f64; 3]> {
        let det = linalg::imat_det(p);
        if det != entry.centering.multiplicity() {
            return Vec::new();
        }
        let adj = linalg::imat_adjugate(p);
        if !centering_is_consistent(&adj, det, entry) {
            return Vec::new();
        }

        // conventional rotation for every primitive rotation
        let mut pairs: Vec<(IMat3, usize)> = Vec::with_capacity(self.rotations.len());
        let mut conventional = RotationSet::new();
        for (idx, w) in self.rotations.iter().enumerate() {
            let n = linalg::imat_mul(&linalg::imat_mul(&adj, w), p);
            if n.iter().flatten().any(|x| x % det != 0) {
                return Vec::new();
            }
            let mut rc = n;
            rc.iter_mut().flatten().for_each(|x| *x /= det);
            conventional.push(rc);
            pairs.push((rc, idx));
        }
        if !conventional.same_elements(&entry.rotations) {
            return Vec::new();
        }

        self.solve_origins(entry, p, &pairs)
    }

    fn hall_translation(&self, entry: &HallEntry, p: &IMat3, rc: &IMat3) -> Option<[f64; 3]> {
        let s = entry.translation_for(rc)?;
        let frac = [s[0] as f64 / 12.0, s[1] as f64 / 12.0, s[2] as f64 / 12.0];
        Some(linalg::imat_fvec(p, frac))
    }

    /// Solves `(W - I) o = t - P s (mod 1)` over a generating set and keeps
    /// every solution, modulo the lattice, that satisfies all operations
    fn solve_origins(&self, entry: &HallEntry, p: &IMat3, pairs: &[(IMat3, usize)]) -> Vec<[f64; 3]> {
        let generators = generating_subset(pairs);

        let mut rows: Vec<Vec<i64>> = Vec::new();
        let mut rhs: Vec<f64> = Vec::new();
        for &(rc, idx) in &generators {
            let w = self.rotations.as_slice()[idx];
            let Some(s_p) = self.hall_translation(entry, p, &rc) else {
                return Vec::new();
            };
            let t_p = self.translations[idx];
            for i in 0..3 {
                rows.push((0..3).map(|j| (w[i][j] - IDENTITY[i][j]) as i64).collect());
                rhs.push(t_p[i] - s_p[i]);
            }
        }

        let mut solutions: Vec<[f64; 3]> = Vec::new();
        if rows.is_empty() {
            solutions.push([0.0; 3]);
        } else {
            let snf = linalg::smith_normal_form(&rows);
            let ub: Vec<f64> = snf
                .u
                .iter()
                .map(|row| row.iter().zip(&rhs).map(|(u, b)| *u as f64 * b).sum())
                .collect();
            let d = [snf.diagonal(0), snf.diagonal(1), snf.diagonal(2)];
            let range = |i: usize| 0..d[i].max(1);
            for m0 in range(0) {
                for m1 in range(1) {
                    for m2 in range(2) {
                        let m = [m0, m1, m2];
                        let y: Vec<f64> = (0..3)
                            .map(|i| if d[i] == 0 { 0.0 } else { (ub[i] + m[i] as f64) / d[i] as f64 })
                            .collect();
                        let o: Vec<f64> = (0..3)
                            .map(|i| (0..3).map(|k| snf.v[i][k] as f64 * y[k]).sum())
                            .collect();
                        solutions.push(linalg::minimum_image([o[0], o[1], o[2]]));
                    }
                }
            }
        }

        solutions.sort_by(|a, b| {
            let na = (self.lattice * Vector3::from(*a)).norm();
            let nb = (self.lattice * Vector3::from(*b)).norm();
            na.partial_cmp(&nb).unwrap_or(std::cmp::Ordering::Equal)
        });
        solutions.retain(|o| self.origin_fits(entry, p, pairs, *o));
        solutions
    }

    fn origin_fits(&self, entry: &HallEntry, p: &IMat3, pairs: &[(IMat3, usize)], o: [f64; 3]) -> bool {
        pairs.iter().all(|(rc, idx)| {
            let Some(s_p) = self.hall_translation(entry, p, rc) else {
                return false;
            };
            let w = self.rotations.as_slice()[*idx];
            let t_p = self.translations[*idx];
            let wo = linalg::imat_fvec(&w, o);
            let diff = [
                t_p[0] - (wo[0] - o[0]) - s_p[0],
                t_p[1] - (wo[1] - o[1]) - s_p[1],
                t_p[2] - (wo[2] - o[2]) - s_p[2],
            ];
            linalg::periodic_distance(self.lattice, diff) <= self.tolerance
        })
    }
}

/// The primitive basis expressed in the conventional cell must consist of
/// exactly the centering vectors of the entry
fn centering_is_consistent(adj: &IMat3, det: i32, entry: &HallEntry) -> bool {
    let allowed = entry.centering.vectors();
    (0..3).all(|j| {
        let mut v = [0i32; 3];
        for i in 0..3 {
            let scaled = adj[i][j] * 12;
            if scaled % det != 0 {
                return false;
            }
            v[i] = (scaled / det).rem_euclid(12);
        }
        v == [0, 0, 0] || allowed.contains(&v)
    })
}

/// Greedy subset of `pairs` whose rotations generate the whole point group
fn generating_subset(pairs: &[(IMat3, usize)]) -> Vec<(IMat3, usize)> {
    let mut generators: Vec<(IMat3, usize)> = Vec::new();
    let mut group = RotationSet::from_vec(vec![IDENTITY]);
    for &(rc, idx) in pairs {
        if group.contains(&rc) {
            continue;
        }
        generators.push((rc, idx));
        group = rotation_closure(generators.iter().map(|(r, _)| *r));
        if group.len() == pairs.len() {
            break;
        }
    }
    generators
}

fn rotation_closure(generators: impl Iterator<Item = IMat3>) -> RotationSet {
    let mut group = RotationSet::from_vec(vec![IDENTITY]);
    for g in generators {
        group.push_unique(g);
    }
    loop {
        let current: Vec<IMat3> = group.iter().copied().collect();
        let mut grew = false;
        for a in &current {
            for b in &current {
                grew |= group.push_unique(linalg::imat_mul(a, b));
            }
        }
        if !grew {
            return group;
        }
    }
}
