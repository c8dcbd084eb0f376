// src/physics/analysis/pointgroup.rs

use crate::model::symmetry::RotationSet;
use crate::physics::operations::reduction;
use crate::utils::linalg::{self, IMat3, IDENTITY};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Holohedry {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

/// Crystallographic rotation type, identified by determinant and trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationType {
    RotoInversion6,
    RotoInversion4,
    RotoInversion3,
    Mirror,
    Inversion,
    Identity,
    Rotation2,
    Rotation3,
    Rotation4,
    Rotation6,
}

impl RotationType {
    fn index(self) -> usize {
        self as usize
    }

    /// Order of the proper part
    pub fn order(self) -> usize {
        match self {
            RotationType::Identity | RotationType::Inversion => 1,
            RotationType::Rotation2 | RotationType::Mirror => 2,
            RotationType::Rotation3 | RotationType::RotoInversion3 => 3,
            RotationType::Rotation4 | RotationType::RotoInversion4 => 4,
            RotationType::Rotation6 | RotationType::RotoInversion6 => 6,
        }
    }
}

pub fn rotation_type(w: &IMat3) -> Option<RotationType> {
    let det = linalg::imat_det(w);
    let trace = linalg::imat_trace(w);
    let t = match (det, trace) {
        (1, 3) => RotationType::Identity,
        (1, -1) => RotationType::Rotation2,
        (1, 0) => RotationType::Rotation3,
        (1, 1) => RotationType::Rotation4,
        (1, 2) => RotationType::Rotation6,
        (-1, -3) => RotationType::Inversion,
        (-1, 1) => RotationType::Mirror,
        (-1, 0) => RotationType::RotoInversion3,
        (-1, -1) => RotationType::RotoInversion4,
        (-1, -2) => RotationType::RotoInversion6,
        _ => return None,
    };
    Some(t)
}

/// One of the 32 crystallographic point groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointGroup {
    pub symbol: &'static str,
    pub schoenflies: &'static str,
    pub holohedry: Holohedry,
    pub laue: &'static str,
    /// Counts in `RotationType` declaration order
    counts: [u8; 10],
}

impl PointGroup {
    pub fn order(&self) -> usize {
        self.counts.iter().map(|c| *c as usize).sum()
    }
}

macro_rules! pg {
    ($sym:expr, $sch:expr, $holo:ident, $laue:expr, [$($c:expr),*]) => {
        PointGroup { symbol: $sym, schoenflies: $sch, holohedry: Holohedry::$holo, laue: $laue, counts: [$($c),*] }
    };
}

/// Counts per type, ordered -6 -4 -3 m -1 1 2 3 4 6
pub static POINT_GROUPS: [PointGroup; 32] = [
    pg!("1", "C1", Triclinic, "-1", [0, 0, 0, 0, 0, 1, 0, 0, 0, 0]),
    pg!("-1", "Ci", Triclinic, "-1", [0, 0, 0, 0, 1, 1, 0, 0, 0, 0]),
    pg!("2", "C2", Monoclinic, "2/m", [0, 0, 0, 0, 0, 1, 1, 0, 0, 0]),
    pg!("m", "Cs", Monoclinic, "2/m", [0, 0, 0, 1, 0, 1, 0, 0, 0, 0]),
    pg!("2/m", "C2h", Monoclinic, "2/m", [0, 0, 0, 1, 1, 1, 1, 0, 0, 0]),
    pg!("222", "D2", Orthorhombic, "mmm", [0, 0, 0, 0, 0, 1, 3, 0, 0, 0]),
    pg!("mm2", "C2v", Orthorhombic, "mmm", [0, 0, 0, 2, 0, 1, 1, 0, 0, 0]),
    pg!("mmm", "D2h", Orthorhombic, "mmm", [0, 0, 0, 3, 1, 1, 3, 0, 0, 0]),
    pg!("4", "C4", Tetragonal, "4/m", [0, 0, 0, 0, 0, 1, 1, 0, 2, 0]),
    pg!("-4", "S4", Tetragonal, "4/m", [0, 2, 0, 0, 0, 1, 1, 0, 0, 0]),
    pg!("4/m", "C4h", Tetragonal, "4/m", [0, 2, 0, 1, 1, 1, 1, 0, 2, 0]),
    pg!("422", "D4", Tetragonal, "4/mmm", [0, 0, 0, 0, 0, 1, 5, 0, 2, 0]),
    pg!("4mm", "C4v", Tetragonal, "4/mmm", [0, 0, 0, 4, 0, 1, 1, 0, 2, 0]),
    pg!("-42m", "D2d", Tetragonal, "4/mmm", [0, 2, 0, 2, 0, 1, 3, 0, 0, 0]),
    pg!("4/mmm", "D4h", Tetragonal, "4/mmm", [0, 2, 0, 5, 1, 1, 5, 0, 2, 0]),
    pg!("3", "C3", Trigonal, "-3", [0, 0, 0, 0, 0, 1, 0, 2, 0, 0]),
    pg!("-3", "C3i", Trigonal, "-3", [0, 0, 2, 0, 1, 1, 0, 2, 0, 0]),
    pg!("32", "D3", Trigonal, "-3m", [0, 0, 0, 0, 0, 1, 3, 2, 0, 0]),
    pg!("3m", "C3v", Trigonal, "-3m", [0, 0, 0, 3, 0, 1, 0, 2, 0, 0]),
    pg!("-3m", "D3d", Trigonal, "-3m", [0, 0, 2, 3, 1, 1, 3, 2, 0, 0]),
    pg!("6", "C6", Hexagonal, "6/m", [0, 0, 0, 0, 0, 1, 1, 2, 0, 2]),
    pg!("-6", "C3h", Hexagonal, "6/m", [2, 0, 0, 1, 0, 1, 0, 2, 0, 0]),
    pg!("6/m", "C6h", Hexagonal, "6/m", [2, 0, 2, 1, 1, 1, 1, 2, 0, 2]),
    pg!("622", "D6", Hexagonal, "6/mmm", [0, 0, 0, 0, 0, 1, 7, 2, 0, 2]),
    pg!("6mm", "C6v", Hexagonal, "6/mmm", [0, 0, 0, 6, 0, 1, 1, 2, 0, 2]),
    pg!("-6m2", "D3h", Hexagonal, "6/mmm", [2, 0, 0, 4, 0, 1, 3, 2, 0, 0]),
    pg!("6/mmm", "D6h", Hexagonal, "6/mmm", [2, 0, 2, 7, 1, 1, 7, 2, 0, 2]),
    pg!("23", "T", Cubic, "m-3", [0, 0, 0, 0, 0, 1, 3, 8, 0, 0]),
    pg!("m-3", "Th", Cubic, "m-3", [0, 0, 8, 3, 1, 1, 3, 8, 0, 0]),
    pg!("432", "O", Cubic, "m-3m", [0, 0, 0, 0, 0, 1, 9, 8, 6, 0]),
    pg!("-43m", "Td", Cubic, "m-3m", [0, 6, 0, 6, 0, 1, 3, 8, 0, 0]),
    pg!("m-3m", "Oh", Cubic, "m-3m", [0, 6, 8, 9, 1, 1, 9, 8, 6, 0]),
];

pub fn by_symbol(symbol: &str) -> Option<&'static PointGroup> {
    POINT_GROUPS.iter().find(|pg| pg.symbol == symbol)
}

/// Classifies a set of distinct rotations. `None` when the set is not a
/// crystallographic point group.
pub fn classify(rotations: &RotationSet) -> Option<&'static PointGroup> {
    let mut counts = [0u8; 10];
    for w in rotations {
        let t = rotation_type(w)?;
        counts[t.index()] = counts[t.index()].checked_add(1)?;
    }
    POINT_GROUPS.iter().find(|pg| pg.counts == counts)
}

// =========================================================================
// AXES
// =========================================================================

/// `W` or `-W`, whichever has determinant +1
pub fn proper_part(w: &IMat3) -> IMat3 {
    if linalg::imat_det(w) == 1 {
        *w
    } else {
        linalg::imat_neg(w)
    }
}

/// Rotation axis of a proper rotation as a primitive integer vector whose
/// first nonzero component is positive. `None` for the identity.
pub fn rotation_axis(w: &IMat3) -> Option<[i32; 3]> {
    let mut a = *w;
    for (i, row) in a.iter_mut().enumerate() {
        row[i] -= 1;
    }
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        let v = linalg::icross(a[i], a[j]);
        if v != [0, 0, 0] {
            return Some(canonical_direction(linalg::primitive_direction(v)));
        }
    }
    None
}

fn canonical_direction(v: [i32; 3]) -> [i32; 3] {
    match v.iter().find(|x| **x != 0) {
        Some(x) if *x < 0 => negated(v),
        _ => v,
    }
}

fn rotation_sum(w: &IMat3, order: usize) -> IMat3 {
    let mut sum = [[0i32; 3]; 3];
    let mut power = IDENTITY;
    for _ in 0..order {
        for i in 0..3 {
            for j in 0..3 {
                sum[i][j] += power[i][j];
            }
        }
        power = linalg::imat_mul(&power, w);
    }
    sum
}

fn metric_norm(metric: &Matrix3<f64>, v: [i32; 3]) -> f64 {
    let x = Vector3::new(v[0] as f64, v[1] as f64, v[2] as f64);
    (x.transpose() * metric * x)[(0, 0)].max(0.0).sqrt()
}

fn metric_dot(metric: &Matrix3<f64>, u: [i32; 3], v: [i32; 3]) -> f64 {
    let x = Vector3::new(u[0] as f64, u[1] as f64, u[2] as f64);
    let y = Vector3::new(v[0] as f64, v[1] as f64, v[2] as f64);
    (x.transpose() * metric * y)[(0, 0)]
}

/// Reduced basis of the lattice plane perpendicular to the axis of `w`.
///
/// The plane is the kernel of `sum_k W^k`, which has rank one for a proper
/// rotation of order `order`.
pub fn perpendicular_plane(w: &IMat3, order: usize, metric: &Matrix3<f64>) -> Option<([i32; 3], [i32; 3])> {
    let s = rotation_sum(w, order);
    let row = s.iter().find(|r| **r != [0, 0, 0])?;
    let snf = linalg::smith_normal_form(&[row.iter().map(|x| *x as i64).collect()]);
    let col = |j: usize| [snf.v[0][j] as i32, snf.v[1][j] as i32, snf.v[2][j] as i32];
    let (mut u, mut v) = (col(1), col(2));

    // Lagrange reduction in the given metric
    for _ in 0..100 {
        if metric_norm(metric, v) < metric_norm(metric, u) {
            std::mem::swap(&mut u, &mut v);
        }
        let uu = metric_dot(metric, u, u);
        if uu <= 0.0 {
            return None;
        }
        let m = (metric_dot(metric, u, v) / uu).round() as i32;
        if m == 0 {
            break;
        }
        v = [v[0] - m * u[0], v[1] - m * u[1], v[2] - m * u[2]];
    }
    Some((u, v))
}

fn unique_axes<'a>(rotations: impl Iterator<Item = &'a IMat3>) -> Vec<[i32; 3]> {
    let mut axes: Vec<[i32; 3]> = Vec::new();
    for w in rotations {
        if let Some(a) = rotation_axis(&proper_part(w)) {
            if !axes.contains(&a) {
                axes.push(a);
            }
        }
    }
    axes
}

fn columns_det(c: &[[i32; 3]; 3]) -> i32 {
    linalg::imat_det(&linalg::imat_from_columns(*c))
}

fn negated(v: [i32; 3]) -> [i32; 3] {
    [-v[0], -v[1], -v[2]]
}

/// Every sign choice of the three vectors that gives a right-handed basis
fn signed_bases(c: [[i32; 3]; 3]) -> impl Iterator<Item = IMat3> {
    (0..8u8).filter_map(move |mask| {
        let mut m = c;
        for (k, v) in m.iter_mut().enumerate() {
            if mask & (1 << k) != 0 {
                *v = negated(*v);
            }
        }
        (columns_det(&m) > 0).then(|| linalg::imat_from_columns(m))
    })
}

/// Entrywise distance from the identity
fn identity_distance(p: &IMat3) -> i32 {
    let mut d = 0;
    for i in 0..3 {
        for j in 0..3 {
            d += (p[i][j] - IDENTITY[i][j]).abs();
        }
    }
    d
}

/// Rotation by `w` or by its inverse, whichever turns `a` positively about `c`
fn positive_turn(w: &IMat3, w_inv: &IMat3, a: [i32; 3], c: [i32; 3]) -> [i32; 3] {
    let wa = linalg::imat_vec(w, a);
    if columns_det(&[a, wa, c]) > 0 {
        wa
    } else {
        linalg::imat_vec(w_inv, a)
    }
}

fn first_of_type(rotations: &RotationSet, kinds: &[RotationType]) -> Option<IMat3> {
    rotations
        .iter()
        .find(|w| rotation_type(w).is_some_and(|t| kinds.contains(&t)))
        .copied()
}

/// Candidate conventional bases (columns, in the rotations' basis) for a
/// point group, right-handed, with every axis sign and labelling the
/// holohedry allows. The bases nearest the rotations' own basis come first,
/// so the identity leads whenever it qualifies. `metric` is the metric
/// tensor of the rotations' basis and decides which lattice vectors count
/// as short.
pub fn candidate_bases(rotations: &RotationSet, pg: &PointGroup, metric: &Matrix3<f64>) -> Vec<IMat3> {
    let bases = match pg.holohedry {
        Holohedry::Triclinic => triclinic_bases(metric),
        Holohedry::Monoclinic => monoclinic_bases(rotations, metric).unwrap_or_default(),
        Holohedry::Orthorhombic => orthorhombic_bases(rotations, metric).unwrap_or_default(),
        Holohedry::Tetragonal => tetragonal_bases(rotations, metric).unwrap_or_default(),
        Holohedry::Trigonal | Holohedry::Hexagonal => hexagonal_bases(rotations, metric).unwrap_or_default(),
        Holohedry::Cubic => cubic_bases(rotations, pg).unwrap_or_default(),
    };
    let mut unique: Vec<IMat3> = Vec::with_capacity(bases.len());
    for p in bases {
        if !unique.contains(&p) {
            unique.push(p);
        }
    }
    unique.sort_by_key(identity_distance);
    unique
}

fn triclinic_bases(metric: &Matrix3<f64>) -> Vec<IMat3> {
    // any basis fits; prefer the Niggli cell of the metric's lattice
    let lattice = metric.cholesky().map(|c| c.l().transpose());
    let niggli = lattice.and_then(|l| reduction::niggli_reduce(&linalg::from_matrix(&l), 1e-5));
    match niggli {
        Some(red) => vec![red.transformation],
        None => vec![IDENTITY],
    }
}

fn monoclinic_bases(rotations: &RotationSet, metric: &Matrix3<f64>) -> Option<Vec<IMat3>> {
    let w = proper_part(&first_of_type(rotations, &[RotationType::Rotation2, RotationType::Mirror])?);
    let b = rotation_axis(&w)?;
    let (u, v) = perpendicular_plane(&w, 2, metric)?;
    let s = [-u[0] - v[0], -u[1] - v[1], -u[2] - v[2]];

    let mut out = Vec::new();
    for (x, y) in [(u, v), (v, s), (s, u)] {
        out.extend(signed_bases([x, b, y]));
        out.extend(signed_bases([y, b, x]));
    }
    Some(out)
}

/// All labellings of three mutually perpendicular axes
fn axis_permutations(a: [i32; 3], b: [i32; 3], c: [i32; 3]) -> Vec<IMat3> {
    [[a, b, c], [b, a, c], [c, a, b], [c, b, a], [b, c, a], [a, c, b]]
        .into_iter()
        .flat_map(signed_bases)
        .collect()
}

fn orthorhombic_bases(rotations: &RotationSet, metric: &Matrix3<f64>) -> Option<Vec<IMat3>> {
    let twofolds = rotations
        .iter()
        .filter(|w| matches!(rotation_type(w), Some(RotationType::Rotation2 | RotationType::Mirror)));
    let mut axes = unique_axes(twofolds);
    if axes.len() != 3 {
        return None;
    }
    axes.sort_by(|x, y| {
        metric_norm(metric, *x)
            .partial_cmp(&metric_norm(metric, *y))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Some(axis_permutations(axes[0], axes[1], axes[2]))
}

fn tetragonal_bases(rotations: &RotationSet, metric: &Matrix3<f64>) -> Option<Vec<IMat3>> {
    let w = proper_part(&first_of_type(rotations, &[RotationType::Rotation4, RotationType::RotoInversion4])?);
    let w_inv = linalg::imat_inverse(&w)?;
    let c = rotation_axis(&w)?;
    let (mut a, _) = perpendicular_plane(&w, 4, metric)?;

    // a runs over the four shortest in-plane vectors; c may point either way
    let mut out = Vec::with_capacity(8);
    for _ in 0..4 {
        let b = positive_turn(&w, &w_inv, a, c);
        out.push(linalg::imat_from_columns([a, b, c]));
        out.push(linalg::imat_from_columns([b, a, negated(c)]));
        a = linalg::imat_vec(&w, a);
    }
    Some(out)
}

fn hexagonal_bases(rotations: &RotationSet, metric: &Matrix3<f64>) -> Option<Vec<IMat3>> {
    let w = first_of_type(rotations, &[RotationType::Rotation3])?;
    let w_inv = linalg::imat_inverse(&w)?;
    let c = rotation_axis(&w)?;
    let (u, _) = perpendicular_plane(&w, 3, metric)?;

    let mut out = Vec::with_capacity(12);
    for start in [u, negated(u)] {
        let mut a = start;
        for _ in 0..3 {
            let b = positive_turn(&w, &w_inv, a, c);
            out.push(linalg::imat_from_columns([a, b, c]));
            out.push(linalg::imat_from_columns([b, a, negated(c)]));
            a = linalg::imat_vec(&w, a);
        }
    }
    Some(out)
}

fn cubic_bases(rotations: &RotationSet, pg: &PointGroup) -> Option<Vec<IMat3>> {
    let kind = match pg.symbol {
        "432" | "m-3m" => RotationType::Rotation4,
        "-43m" => RotationType::RotoInversion4,
        _ => RotationType::Rotation2,
    };
    let axes = unique_axes(rotations.iter().filter(|w| rotation_type(w) == Some(kind)));
    if axes.len() != 3 {
        return None;
    }
    Some(axis_permutations(axes[0], axes[1], axes[2]))
}

/// Point-group symbol and the transformation to its conventional axes, for
/// an arbitrary list of rotations (duplicates allowed).
pub fn get_pointgroup(rotations: &[IMat3]) -> Option<(&'static PointGroup, IMat3)> {
    let mut set = RotationSet::new();
    for w in rotations {
        set.push_unique(*w);
    }
    let pg = classify(&set)?;
    let transformation = match pg.holohedry {
        Holohedry::Triclinic => IDENTITY,
        _ => candidate_bases(&set, pg, &Matrix3::identity()).first().copied().unwrap_or(IDENTITY),
    };
    Some((pg, transformation))
}

#[cfg(test)]
mod tests {
    use super::*;

    const C4Z: IMat3 = [[0, -1, 0], [1, 0, 0], [0, 0, 1]];
    const C3Z: IMat3 = [[0, -1, 0], [1, -1, 0], [0, 0, 1]];

    fn generate(gens: &[IMat3]) -> RotationSet {
        let mut set = RotationSet::from_vec(vec![IDENTITY]);
        loop {
            let current: Vec<IMat3> = set.iter().copied().collect();
            let mut grew = false;
            for a in &current {
                for g in gens {
                    grew |= set.push_unique(linalg::imat_mul(a, g));
                }
            }
            if !grew {
                return set;
            }
        }
    }

    #[test]
    fn test_counts_sum_to_orders() {
        let orders: Vec<usize> = POINT_GROUPS.iter().map(|pg| pg.order()).collect();
        assert_eq!(orders[0], 1);
        assert_eq!(by_symbol("m-3m").unwrap().order(), 48);
        assert_eq!(by_symbol("6/mmm").unwrap().order(), 24);
        assert_eq!(by_symbol("-42m").unwrap().order(), 8);
    }

    #[test]
    fn test_rotation_types() {
        assert_eq!(rotation_type(&IDENTITY), Some(RotationType::Identity));
        assert_eq!(rotation_type(&C4Z), Some(RotationType::Rotation4));
        assert_eq!(rotation_type(&linalg::imat_neg(&C4Z)), Some(RotationType::RotoInversion4));
        assert_eq!(rotation_type(&[[1, 0, 0], [0, 1, 0], [0, 0, -1]]), Some(RotationType::Mirror));
        assert_eq!(rotation_type(&[[2, 0, 0], [0, 1, 0], [0, 0, 1]]), None);
    }

    #[test]
    fn test_classify_generated_groups() {
        let inv = linalg::imat_neg(&IDENTITY);
        let c2x: IMat3 = [[1, 0, 0], [0, -1, 0], [0, 0, -1]];
        assert_eq!(classify(&generate(&[C4Z])).unwrap().symbol, "4");
        assert_eq!(classify(&generate(&[C4Z, c2x, inv])).unwrap().symbol, "4/mmm");
        assert_eq!(classify(&generate(&[C3Z, inv])).unwrap().symbol, "-3");
        let c2_prime: IMat3 = [[0, -1, 0], [-1, 0, 0], [0, 0, -1]];
        assert_eq!(classify(&generate(&[C3Z, c2_prime])).unwrap().symbol, "32");
    }

    #[test]
    fn test_axis_and_plane() {
        assert_eq!(rotation_axis(&C4Z), Some([0, 0, 1]));
        assert_eq!(rotation_axis(&IDENTITY), None);

        let (u, v) = perpendicular_plane(&C4Z, 4, &Matrix3::identity()).unwrap();
        assert_eq!(u[2], 0);
        assert_eq!(v[2], 0);
        assert_eq!(linalg::icross(u, v)[2].abs(), 1);
    }

    #[test]
    fn test_get_pointgroup_tetragonal_axes() {
        let set = generate(&[C4Z]);
        let (pg, p) = get_pointgroup(set.as_slice()).unwrap();
        assert_eq!(pg.symbol, "4");
        assert_eq!(linalg::imat_column(&p, 2), [0, 0, 1]);
        assert_eq!(linalg::imat_det(&p), 1);
    }

    #[test]
    fn test_orthorhombic_candidates_are_permutations() {
        let c2x: IMat3 = [[1, 0, 0], [0, -1, 0], [0, 0, -1]];
        let c2y: IMat3 = [[-1, 0, 0], [0, 1, 0], [0, 0, -1]];
        let set = generate(&[c2x, c2y]);
        let pg = classify(&set).unwrap();
        let metric = Matrix3::from_diagonal(&Vector3::new(9.0, 16.0, 25.0));
        let bases = candidate_bases(&set, pg, &metric);
        assert_eq!(bases.len(), 24);
        assert!(bases.iter().all(|p| linalg::imat_det(p) == 1));
        assert_eq!(bases[0], IDENTITY);
    }

    #[test]
    fn test_axes_have_fixed_sign() {
        let c2y: IMat3 = [[-1, 0, 0], [0, 1, 0], [0, 0, -1]];
        assert_eq!(rotation_axis(&c2y), Some([0, 1, 0]));
        let c2_diag: IMat3 = [[0, -1, 0], [-1, 0, 0], [0, 0, -1]];
        assert_eq!(rotation_axis(&c2_diag), Some([1, -1, 0]));
    }

    #[test]
    fn test_standard_axes_lead_the_candidates() {
        let inv = linalg::imat_neg(&IDENTITY);
        let c2x: IMat3 = [[1, 0, 0], [0, -1, 0], [0, 0, -1]];

        let tetragonal = generate(&[C4Z, c2x, inv]);
        let metric = Matrix3::from_diagonal(&Vector3::new(9.0, 9.0, 25.0));
        let bases = candidate_bases(&tetragonal, classify(&tetragonal).unwrap(), &metric);
        assert_eq!(bases.len(), 8);
        assert_eq!(bases[0], IDENTITY);
        assert!(bases.iter().all(|p| linalg::imat_det(p) == 1));

        let c3_111: IMat3 = [[0, 0, 1], [1, 0, 0], [0, 1, 0]];
        let cubic = generate(&[C4Z, c3_111, inv]);
        let bases = candidate_bases(&cubic, classify(&cubic).unwrap(), &Matrix3::identity());
        assert_eq!(bases.len(), 24);
        assert_eq!(bases[0], IDENTITY);
    }
}
