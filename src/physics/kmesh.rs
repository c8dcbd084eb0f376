// src/physics/kmesh.rs
//
// Regular reciprocal-space meshes and their reduction by point-group
// rotations. Grid points are numbered x-fastest, `gp = a0 + a1*m0 + a2*m0*m1`,
// and addresses are kept in (-m/2, m/2]. A half-grid shift is carried by
// doubled addresses `d = 2a + s`.

use crate::config::SymmetryConfig;
use crate::database::SpacegroupDatabase;
use crate::error::{Result, SymmetryError};
use crate::model::cell::Cell;
use crate::model::symmetry::RotationSet;
use crate::physics::analysis::search;
use crate::utils::linalg::{self, IMat3, IDENTITY};
use log::{debug, warn};
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Tolerance for `R q = q (mod 1)` on stabilizer q-points
const QPOINT_TOLERANCE: f64 = 1e-5;

/// Folded mesh: every grid point and the grid index of its orbit
/// representative (the smallest index in the orbit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshReduction {
    pub grid_address: Vec<[i32; 3]>,
    pub map: Vec<usize>,
    pub num_ir: usize,
}

impl MeshReduction {
    /// Grid indices of the orbit representatives, ascending
    pub fn irreducible_points(&self) -> Vec<usize> {
        self.map.iter().enumerate().filter(|(i, m)| *i == **m).map(|(i, _)| i).collect()
    }

    /// Orbit size per representative, in the order of `irreducible_points`
    pub fn weights(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.map.len()];
        for &m in &self.map {
            counts[m] += 1;
        }
        self.irreducible_points().into_iter().map(|i| counts[i]).collect()
    }
}

/// Grid addresses relocated into the first Brillouin zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BzGrid {
    /// The first `N` entries follow grid order; extra images of points on the
    /// zone boundary are appended after them
    pub bz_grid_address: Vec<[i32; 3]>,
    /// Index into `bz_grid_address` for every point of the doubled mesh
    /// (size `(2 m0) (2 m1) (2 m2)`), `None` where no image lands
    pub bz_map: Vec<Option<usize>>,
}

impl BzGrid {
    pub fn len(&self) -> usize {
        self.bz_grid_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bz_grid_address.is_empty()
    }
}

/// Triplets `(q0, q1, q2)` with `q0 + q1 + q2 = G` at a fixed `q0`.
///
/// `q1` is folded by the rotations that fix `q0`; `map_q` holds that
/// folding. `map_triplets` additionally identifies `q1` with its partner
/// `q2 = -(q0 + q1)`, since swapping them gives the same triplet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripletReduction {
    pub grid_point: usize,
    pub mesh: [i32; 3],
    pub grid_address: Vec<[i32; 3]>,
    pub map_q: Vec<usize>,
    pub map_triplets: Vec<usize>,
    pub num_ir: usize,
}

impl TripletReduction {
    /// Grid indices of the `q1` representatives, ascending
    pub fn irreducible_points(&self) -> Vec<usize> {
        self.map_triplets.iter().enumerate().filter(|(i, m)| *i == **m).map(|(i, _)| i).collect()
    }

    /// Number of `q1` points per representative
    pub fn weights(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.map_triplets.len()];
        for &m in &self.map_triplets {
            counts[m] += 1;
        }
        self.irreducible_points().into_iter().map(|i| counts[i]).collect()
    }

    /// Irreducible triplets as grid indices
    pub fn triplets(&self) -> Vec<[usize; 3]> {
        let a0 = self.grid_address[self.grid_point];
        self.irreducible_points()
            .into_iter()
            .map(|i| [self.grid_point, i, third_point(a0, self.grid_address[i], self.mesh)])
            .collect()
    }
}

// =========================================================================
// 1. ADDRESSING
// =========================================================================

fn validate_mesh(mesh: [i32; 3], shift: [i32; 3]) -> Result<()> {
    if mesh.iter().any(|m| *m <= 0) {
        return Err(SymmetryError::InvalidMesh(mesh));
    }
    if shift.iter().any(|s| *s != 0 && *s != 1) {
        return Err(SymmetryError::InvalidShift(shift));
    }
    Ok(())
}

fn n_grid(mesh: [i32; 3]) -> usize {
    mesh.iter().map(|m| *m as usize).product()
}

/// Index of a grid address; the address is taken modulo the mesh
pub fn grid_point_index(address: [i32; 3], mesh: [i32; 3]) -> usize {
    let a: Vec<usize> = (0..3).map(|i| address[i].rem_euclid(mesh[i]) as usize).collect();
    a[0] + a[1] * mesh[0] as usize + a[2] * (mesh[0] * mesh[1]) as usize
}

/// Address of grid point `gp` in (-m/2, m/2]
pub fn grid_address(gp: usize, mesh: [i32; 3]) -> [i32; 3] {
    let (m0, m1) = (mesh[0] as usize, mesh[1] as usize);
    let raw = [(gp % m0) as i32, ((gp / m0) % m1) as i32, (gp / (m0 * m1)) as i32];
    let mut out = [0i32; 3];
    for i in 0..3 {
        out[i] = if raw[i] > mesh[i] / 2 { raw[i] - mesh[i] } else { raw[i] };
    }
    out
}

fn doubled(address: [i32; 3], shift: [i32; 3]) -> [i32; 3] {
    [2 * address[0] + shift[0], 2 * address[1] + shift[1], 2 * address[2] + shift[2]]
}

/// Undoes `doubled`; `None` when the parity does not match the shift
fn undoubled(d: [i32; 3], shift: [i32; 3]) -> Option<[i32; 3]> {
    let mut out = [0i32; 3];
    for i in 0..3 {
        let v = d[i] - shift[i];
        if v.rem_euclid(2) != 0 {
            return None;
        }
        out[i] = v.div_euclid(2);
    }
    Some(out)
}

// =========================================================================
// 2. ROTATIONS ON THE GRID
// =========================================================================

/// `R` acting on doubled addresses of this mesh: `M_ij = R_ij m_i / m_j`.
/// `None` when the rotation does not map the (shifted) mesh onto itself.
fn mesh_rotation(r: &IMat3, mesh: [i32; 3], shift: [i32; 3]) -> Option<IMat3> {
    let mut m = [[0i32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let scaled = r[i][j] * mesh[i];
            if scaled % mesh[j] != 0 {
                return None;
            }
            m[i][j] = scaled / mesh[j];
        }
    }
    let ms = linalg::imat_vec(&m, shift);
    if (0..3).any(|i| (ms[i] - shift[i]).rem_euclid(2) != 0) {
        return None;
    }
    Some(m)
}

fn compatible_rotations(rotations: &RotationSet, mesh: [i32; 3], shift: [i32; 3]) -> Vec<IMat3> {
    let kept: Vec<IMat3> = rotations.iter().filter_map(|r| mesh_rotation(r, mesh, shift)).collect();
    if kept.len() < rotations.len() {
        debug!(
            "{} of {} rotations are incompatible with mesh {:?} shift {:?}",
            rotations.len() - kept.len(),
            rotations.len(),
            mesh,
            shift
        );
    }
    kept
}

/// Grid index of `address` rotated by each reciprocal rotation.
/// `None` for rotations that move the point off the mesh.
pub fn grid_points_by_rotations(
    address: [i32; 3],
    rotations: &[IMat3],
    mesh: [i32; 3],
    shift: [i32; 3],
) -> Result<Vec<Option<usize>>> {
    validate_mesh(mesh, shift)?;
    Ok(rotations
        .iter()
        .map(|r| {
            let m = mesh_rotation(r, mesh, shift)?;
            let rotated = linalg::imat_vec(&m, doubled(address, shift));
            undoubled(rotated, shift).map(|a| grid_point_index(a, mesh))
        })
        .collect())
}

/// Like [`grid_points_by_rotations`] but returns indices into a relocated
/// Brillouin-zone grid
pub fn bz_grid_points_by_rotations(
    address: [i32; 3],
    rotations: &[IMat3],
    mesh: [i32; 3],
    shift: [i32; 3],
    bz: &BzGrid,
) -> Result<Vec<Option<usize>>> {
    validate_mesh(mesh, shift)?;
    let double_mesh = [2 * mesh[0], 2 * mesh[1], 2 * mesh[2]];
    Ok(rotations
        .iter()
        .map(|r| {
            let m = mesh_rotation(r, mesh, shift)?;
            let rotated = linalg::imat_vec(&m, doubled(address, shift));
            let a = undoubled(rotated, shift)?;
            bz.bz_map.get(grid_point_index(a, double_mesh)).copied().flatten()
        })
        .collect())
}

/// Rotations whose action preserves the set of q-points (mod 1)
fn stabilizer(rotations: &RotationSet, qpoints: &[[f64; 3]]) -> RotationSet {
    let preserves = |r: &IMat3| {
        qpoints.iter().all(|q| {
            let rq = linalg::imat_fvec(r, *q);
            qpoints.iter().any(|p| {
                (0..3).all(|i| {
                    let d = rq[i] - p[i];
                    (d - d.round()).abs() < QPOINT_TOLERANCE
                })
            })
        })
    };
    rotations.iter().filter(|r| preserves(*r)).copied().collect()
}

// =========================================================================
// 3. FOLDING
// =========================================================================

fn find_root(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Folds the mesh by reciprocal rotations already filtered for compatibility
fn fold(mesh: [i32; 3], shift: [i32; 3], grid_rotations: &[IMat3]) -> MeshReduction {
    let n = n_grid(mesh);
    let grid_address: Vec<[i32; 3]> = (0..n).map(|gp| grid_address(gp, mesh)).collect();

    let images: Vec<Vec<usize>> = grid_address
        .par_iter()
        .map(|a| {
            let d = doubled(*a, shift);
            grid_rotations
                .iter()
                .filter_map(|m| undoubled(linalg::imat_vec(m, d), shift))
                .map(|b| grid_point_index(b, mesh))
                .collect()
        })
        .collect();

    // union by smaller index keeps every root at its orbit minimum
    let mut parent: Vec<usize> = (0..n).collect();
    for (gp, targets) in images.iter().enumerate() {
        for &t in targets {
            let (a, b) = (find_root(&mut parent, gp), find_root(&mut parent, t));
            if a != b {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                parent[hi] = lo;
            }
        }
    }
    let map: Vec<usize> = (0..n).map(|gp| find_root(&mut parent, gp)).collect();
    let num_ir = map.iter().enumerate().filter(|(i, m)| *i == **m).count();

    MeshReduction {
        grid_address,
        map,
        num_ir,
    }
}

/// Folds a mesh by real-space rotations. Reciprocal rotations are their
/// transposes; time reversal adds `-R`. With q-points only the rotations
/// that preserve them are used.
pub fn reduce_stabilized_mesh(
    mesh: [i32; 3],
    shift: [i32; 3],
    time_reversal: bool,
    rotations: &[IMat3],
    qpoints: &[[f64; 3]],
) -> Result<MeshReduction> {
    validate_mesh(mesh, shift)?;
    let real = RotationSet::from_vec(rotations.to_vec());
    let mut reciprocal = real.reciprocal(time_reversal);
    if reciprocal.is_empty() {
        reciprocal.push(IDENTITY);
    }
    if !qpoints.is_empty() {
        reciprocal = stabilizer(&reciprocal, qpoints);
        debug!("{} rotations stabilize {} q-points", reciprocal.len(), qpoints.len());
    }
    let grid_rotations = compatible_rotations(&reciprocal, mesh, shift);
    let reduction = fold(mesh, shift, &grid_rotations);
    debug!("mesh {:?} folded to {} points", mesh, reduction.num_ir);
    Ok(reduction)
}

/// Irreducible points of a mesh under the symmetry of `cell`. Falls back to
/// the identity when no space group is found.
pub fn reduce_irreducible_mesh(
    mesh: [i32; 3],
    shift: [i32; 3],
    time_reversal: bool,
    cell: &Cell,
    config: &SymmetryConfig,
    database: &dyn SpacegroupDatabase,
) -> Result<MeshReduction> {
    validate_mesh(mesh, shift)?;
    let dataset = search::find_dataset(cell, config, database)?;
    let rotations = if dataset.is_found() {
        dataset.rotations
    } else {
        warn!("no space group found, folding mesh {:?} by the identity only", mesh);
        vec![IDENTITY]
    };
    reduce_stabilized_mesh(mesh, shift, time_reversal, &rotations, &[])
}

// =========================================================================
// 4. TRIPLETS
// =========================================================================

fn third_point(a0: [i32; 3], a1: [i32; 3], mesh: [i32; 3]) -> usize {
    grid_point_index([-(a0[0] + a1[0]), -(a0[1] + a1[1]), -(a0[2] + a1[2])], mesh)
}

/// Irreducible q-point triplets `q0 + q1 + q2 = G` at `q0 = grid_point` on
/// an unshifted mesh, under the real-space rotations that fix `q0`
pub fn ir_triplets_at_q(
    grid_point: usize,
    mesh: [i32; 3],
    time_reversal: bool,
    rotations: &[IMat3],
) -> Result<TripletReduction> {
    validate_mesh(mesh, [0, 0, 0])?;
    let n = n_grid(mesh);
    if grid_point >= n {
        return Err(SymmetryError::InvalidGridPoint { grid_point, size: n });
    }

    let mut reciprocal = RotationSet::from_vec(rotations.to_vec()).reciprocal(time_reversal);
    if reciprocal.is_empty() {
        reciprocal.push(IDENTITY);
    }
    let a0 = grid_address(grid_point, mesh);
    let q0 = [
        a0[0] as f64 / mesh[0] as f64,
        a0[1] as f64 / mesh[1] as f64,
        a0[2] as f64 / mesh[2] as f64,
    ];
    let little_group = stabilizer(&reciprocal, &[q0]);
    let grid_rotations = compatible_rotations(&little_group, mesh, [0, 0, 0]);
    let folded = fold(mesh, [0, 0, 0], &grid_rotations);

    // roots of map_q are orbit minima, so every lookup below is already final
    let mut map_triplets = vec![0usize; n];
    for i in 0..n {
        map_triplets[i] = if folded.map[i] == i {
            let partner = folded.map[third_point(a0, folded.grid_address[i], mesh)];
            if partner < i {
                map_triplets[partner]
            } else {
                i
            }
        } else {
            map_triplets[folded.map[i]]
        };
    }
    let num_ir = map_triplets.iter().enumerate().filter(|(i, m)| *i == **m).count();
    debug!(
        "{} rotations fix grid point {}, {} of {} triplets are irreducible",
        grid_rotations.len(),
        grid_point,
        num_ir,
        n
    );

    Ok(TripletReduction {
        grid_point,
        mesh,
        grid_address: folded.grid_address,
        map_q: folded.map,
        map_triplets,
        num_ir,
    })
}

/// Irreducible triplets of `reduction` as indices into a relocated
/// Brillouin-zone grid of the same mesh. `q2` is the zone image for which `q0 + q1 + q2` is the shortest
/// reciprocal-lattice vector.
pub fn bz_triplets_at_q(bz: &BzGrid, reduction: &TripletReduction) -> Result<Vec<[usize; 3]>> {
    let mesh = reduction.mesh;
    let double_mesh = [2 * mesh[0], 2 * mesh[1], 2 * mesh[2]];
    if bz.bz_map.len() != n_grid(double_mesh) {
        return Err(SymmetryError::InvalidMesh(mesh));
    }
    let grid_point = reduction.grid_point;

    let q0 = bz.bz_grid_address[grid_point];
    reduction
        .irreducible_points()
        .into_iter()
        .map(|i| {
            let q1 = bz.bz_grid_address[i];
            let a2 = grid_address(third_point(q0, q1, mesh), mesh);
            (0..27)
                .filter_map(|k| {
                    let g = [k % 3 - 1, (k / 3) % 3 - 1, k / 9 - 1];
                    let b = [a2[0] + g[0] * mesh[0], a2[1] + g[1] * mesh[1], a2[2] + g[2] * mesh[2]];
                    let index = bz.bz_map[grid_point_index(b, double_mesh)]?;
                    let lattice_steps: i32 = (0..3).map(|j| ((q0[j] + q1[j] + b[j]) / mesh[j]).abs()).sum();
                    Some((lattice_steps, index))
                })
                .min()
                .map(|(_, q2)| [grid_point, i, q2])
                .ok_or(SymmetryError::InvalidMesh(mesh))
        })
        .collect()
}

/// Grid indices of `grid_point` displaced by each relative address. Points
/// inside the zone resolve through `bz`; others fall back to plain mesh
/// indices.
pub fn neighboring_grid_points(
    grid_point: usize,
    relative_addresses: &[[i32; 3]],
    mesh: [i32; 3],
    bz: &BzGrid,
) -> Result<Vec<usize>> {
    validate_mesh(mesh, [0, 0, 0])?;
    if grid_point >= bz.len() {
        return Err(SymmetryError::InvalidGridPoint {
            grid_point,
            size: bz.len(),
        });
    }
    let double_mesh = [2 * mesh[0], 2 * mesh[1], 2 * mesh[2]];
    let base = bz.bz_grid_address[grid_point];
    Ok(relative_addresses
        .iter()
        .map(|r| {
            let a = [base[0] + r[0], base[1] + r[1], base[2] + r[2]];
            bz.bz_map
                .get(grid_point_index(a, double_mesh))
                .copied()
                .flatten()
                .unwrap_or_else(|| grid_point_index(a, mesh))
        })
        .collect())
}

// =========================================================================
// 5. BRILLOUIN ZONE
// =========================================================================

/// Moves every grid address to its shortest image(s) under the reciprocal
/// lattice (columns are the reciprocal basis vectors). Points with several
/// images of equal length keep all of them.
pub fn relocate_bz_grid_address(
    grid_address: &[[i32; 3]],
    mesh: [i32; 3],
    rec_lattice: &[[f64; 3]; 3],
    shift: [i32; 3],
) -> Result<BzGrid> {
    validate_mesh(mesh, shift)?;
    let rec = linalg::to_matrix(rec_lattice);
    let tolerance = (0..3)
        .map(|i| rec.column(i).norm_squared() / (mesh[i] * mesh[i]) as f64)
        .fold(0.0f64, f64::max)
        * 0.01;

    let double_mesh = [2 * mesh[0], 2 * mesh[1], 2 * mesh[2]];
    let n = grid_address.len();
    let mut bz_grid_address: Vec<[i32; 3]> = vec![[0; 3]; n];
    let mut extra: Vec<[i32; 3]> = Vec::new();
    let mut bz_map: Vec<Option<usize>> = vec![None; n_grid(double_mesh)];

    let length2 = |a: [i32; 3]| {
        let d = doubled(a, shift);
        let k = Vector3::new(
            d[0] as f64 / (2 * mesh[0]) as f64,
            d[1] as f64 / (2 * mesh[1]) as f64,
            d[2] as f64 / (2 * mesh[2]) as f64,
        );
        (rec * k).norm_squared()
    };

    for (gp, a) in grid_address.iter().enumerate() {
        let images: Vec<([i32; 3], f64)> = (0..27)
            .map(|k| {
                let s = [k % 3 - 1, (k / 3) % 3 - 1, k / 9 - 1];
                let b = [a[0] + s[0] * mesh[0], a[1] + s[1] * mesh[1], a[2] + s[2] * mesh[2]];
                (b, length2(b))
            })
            .collect();
        let shortest = images.iter().map(|(_, l)| *l).fold(f64::INFINITY, f64::min);

        let mut first = true;
        for (b, l) in images {
            if l >= shortest + tolerance {
                continue;
            }
            let index = if first {
                bz_grid_address[gp] = b;
                first = false;
                gp
            } else {
                extra.push(b);
                n + extra.len() - 1
            };
            bz_map[grid_point_index(b, double_mesh)] = Some(index);
        }
    }

    bz_grid_address.extend(extra);
    Ok(BzGrid {
        bz_grid_address,
        bz_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::StandardDatabase;

    fn cubic_group() -> Vec<IMat3> {
        let mut out = Vec::new();
        for perm in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            for signs in 0..8 {
                let mut m = [[0i32; 3]; 3];
                for i in 0..3 {
                    m[i][perm[i]] = if signs & (1 << i) == 0 { 1 } else { -1 };
                }
                out.push(m);
            }
        }
        out
    }

    fn assert_partition(r: &MeshReduction) {
        assert!(r.map.iter().all(|&m| r.map[m] == m));
        assert!(r.map.iter().enumerate().all(|(i, &m)| m <= i));
        assert_eq!(r.weights().iter().sum::<usize>(), r.map.len());
        assert_eq!(r.irreducible_points().len(), r.num_ir);
    }

    #[test]
    fn test_addressing() {
        let mesh = [4, 4, 4];
        assert_eq!(grid_point_index([1, 2, 3], mesh), 57);
        assert_eq!(grid_point_index([-1, 0, 0], mesh), 3);
        assert_eq!(grid_address(3, mesh), [-1, 0, 0]);
        assert_eq!(grid_address(2, mesh), [2, 0, 0]);
        assert_eq!(grid_address(57, mesh), [1, 2, -1]);
        for gp in 0..64 {
            assert_eq!(grid_point_index(grid_address(gp, mesh), mesh), gp);
        }
    }

    #[test]
    fn test_identity_only_keeps_every_point() {
        let r = reduce_stabilized_mesh([2, 3, 4], [0, 0, 0], false, &[IDENTITY], &[]).unwrap();
        assert_eq!(r.num_ir, 24);
        assert_eq!(r.map, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_time_reversal_pairs_points() {
        let plain = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], false, &[IDENTITY], &[]).unwrap();
        let paired = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], true, &[IDENTITY], &[]).unwrap();
        assert_eq!(paired.num_ir, 36);
        assert_partition(&paired);
        // every time-reversal orbit is a union of plain orbits
        for (i, &m) in plain.map.iter().enumerate() {
            assert_eq!(paired.map[i], paired.map[m]);
        }
    }

    #[test]
    fn test_cubic_folding() {
        let rots = cubic_group();
        let r = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], true, &rots, &[]).unwrap();
        assert_eq!(r.num_ir, 10);
        assert_partition(&r);

        let shifted = reduce_stabilized_mesh([4, 4, 4], [1, 1, 1], true, &rots, &[]).unwrap();
        assert_eq!(shifted.num_ir, 4);
        assert_partition(&shifted);
    }

    #[test]
    fn test_incompatible_rotations_are_dropped() {
        let r = reduce_stabilized_mesh([4, 4, 2], [0, 0, 0], true, &cubic_group(), &[]).unwrap();
        assert_eq!(r.num_ir, 12);
        assert_partition(&r);
    }

    #[test]
    fn test_stabilizer() {
        let rots = cubic_group();
        let gamma = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], true, &rots, &[[0.0; 3]]).unwrap();
        assert_eq!(gamma.num_ir, 10);

        let x = reduce_stabilized_mesh([4, 4, 4], [0, 0, 0], true, &rots, &[[0.5, 0.0, 0.0]]).unwrap();
        assert_eq!(x.num_ir, 18);
        assert_partition(&x);
    }

    #[test]
    fn test_irreducible_mesh_of_fcc() {
        let cell = Cell::new([[0.0, 2.0, 2.0], [2.0, 0.0, 2.0], [2.0, 2.0, 0.0]], vec![[0.0; 3]], vec![1]);
        let db = StandardDatabase::new();
        let config = SymmetryConfig::default();
        let r = reduce_irreducible_mesh([8, 8, 8], [0, 0, 0], true, &cell, &config, &db).unwrap();
        assert_eq!(r.num_ir, 29);
        assert_partition(&r);
        let r = reduce_irreducible_mesh([4, 4, 4], [0, 0, 0], true, &cell, &config, &db).unwrap();
        assert_eq!(r.num_ir, 8);
    }

    #[test]
    fn test_invalid_mesh() {
        assert_eq!(
            reduce_stabilized_mesh([0, 4, 4], [0, 0, 0], true, &[IDENTITY], &[]),
            Err(SymmetryError::InvalidMesh([0, 4, 4]))
        );
        assert_eq!(
            reduce_stabilized_mesh([4, 4, 4], [0, 2, 0], true, &[IDENTITY], &[]),
            Err(SymmetryError::InvalidShift([0, 2, 0]))
        );
    }

    #[test]
    fn test_rotated_grid_points() {
        let c4z: IMat3 = [[0, -1, 0], [1, 0, 0], [0, 0, 1]];
        let points = grid_points_by_rotations([1, 0, 0], &[IDENTITY, c4z], [4, 4, 4], [0, 0, 0]).unwrap();
        assert_eq!(points, vec![Some(1), Some(4)]);

        // a four-fold about z does not map a 4x2 mesh onto itself
        let points = grid_points_by_rotations([1, 0, 0], &[c4z], [4, 2, 1], [0, 0, 0]).unwrap();
        assert_eq!(points, vec![None]);
    }

    fn identity_bz(mesh: [i32; 3]) -> BzGrid {
        let n = n_grid(mesh);
        let addresses: Vec<[i32; 3]> = (0..n).map(|gp| grid_address(gp, mesh)).collect();
        let rec = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        relocate_bz_grid_address(&addresses, mesh, &rec, [0, 0, 0]).unwrap()
    }

    fn sums_to_lattice_vector(r: &TripletReduction, t: &[usize; 3]) -> bool {
        (0..3).all(|j| {
            let s: i32 = t.iter().map(|gp| r.grid_address[*gp][j]).sum();
            s.rem_euclid(r.mesh[j]) == 0
        })
    }

    #[test]
    fn test_triplets_at_gamma() {
        let r = ir_triplets_at_q(0, [4, 4, 4], true, &cubic_group()).unwrap();
        // q1 and -q1 already share an orbit, so pairing adds nothing
        assert_eq!(r.num_ir, 10);
        assert_eq!(r.weights().iter().sum::<usize>(), 64);
        assert_eq!(r.map_q, r.map_triplets);
        let triplets = r.triplets();
        assert_eq!(triplets.len(), 10);
        assert!(triplets.iter().all(|t| t[0] == 0 && sums_to_lattice_vector(&r, t)));
    }

    #[test]
    fn test_triplets_pair_partners() {
        let r = ir_triplets_at_q(1, [4, 4, 4], false, &[IDENTITY]).unwrap();
        assert_eq!(r.num_ir, 32);
        assert!(r.weights().iter().all(|w| *w == 2));
        assert_eq!(r.map_q, (0..64).collect::<Vec<_>>());
        for t in r.triplets() {
            assert!(sums_to_lattice_vector(&r, &t));
            assert_eq!(r.map_triplets[t[2]], t[1]);
        }
    }

    #[test]
    fn test_triplets_reject_bad_grid_point() {
        assert_eq!(
            ir_triplets_at_q(64, [4, 4, 4], true, &[IDENTITY]),
            Err(SymmetryError::InvalidGridPoint { grid_point: 64, size: 64 })
        );
    }

    #[test]
    fn test_bz_triplets() {
        let mesh = [4, 4, 4];
        let bz = identity_bz(mesh);

        let r = ir_triplets_at_q(0, mesh, true, &cubic_group()).unwrap();
        let triplets = bz_triplets_at_q(&bz, &r).unwrap();
        assert_eq!(triplets.len(), r.num_ir);
        // -q1 is in the zone whenever q1 is
        for t in &triplets {
            let s: Vec<i32> = (0..3).map(|j| t.iter().map(|i| bz.bz_grid_address[*i][j]).sum()).collect();
            assert_eq!(s, vec![0, 0, 0]);
        }

        let r = ir_triplets_at_q(5, mesh, true, &cubic_group()).unwrap();
        let triplets = bz_triplets_at_q(&bz, &r).unwrap();
        assert_eq!(triplets.len(), r.num_ir);
        for t in &triplets {
            assert!(t.iter().all(|i| *i < bz.len()));
            assert!((0..3).all(|j| t.iter().map(|i| bz.bz_grid_address[*i][j]).sum::<i32>().rem_euclid(4) == 0));
        }
    }

    #[test]
    fn test_neighboring_grid_points() {
        let mesh = [4, 4, 4];
        let bz = identity_bz(mesh);
        let n = neighboring_grid_points(0, &[[1, 0, 0], [-1, 0, 0], [2, 0, 0], [3, 3, 3]], mesh, &bz).unwrap();
        assert_eq!(n[0], 1);
        assert_eq!(n[1], 3);
        // grid point 2 keeps [-2, 0, 0]; [2, 0, 0] is its appended image
        assert!(n[2] >= 64);
        assert_eq!(bz.bz_grid_address[n[2]], [2, 0, 0]);
        // outside the zone
        assert_eq!(n[3], 63);
        assert!(neighboring_grid_points(bz.len(), &[[0, 0, 0]], mesh, &bz).is_err());
    }

    #[test]
    fn test_bz_relocation() {
        let mesh = [4, 4, 4];
        let addresses: Vec<[i32; 3]> = (0..64).map(|gp| grid_address(gp, mesh)).collect();
        let rec = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let bz = relocate_bz_grid_address(&addresses, mesh, &rec, [0, 0, 0]).unwrap();
        // boundary points at +-1/2 keep both images on each such axis
        assert_eq!(bz.len(), 125);
        assert_eq!(bz.bz_map.iter().filter(|m| m.is_some()).count(), 125);
        assert_eq!(bz.bz_grid_address[1], [1, 0, 0]);

        let c4z: IMat3 = [[0, -1, 0], [1, 0, 0], [0, 0, 1]];
        let rotated = bz_grid_points_by_rotations([1, 0, 0], &[linalg::imat_transpose(&c4z)], mesh, [0, 0, 0], &bz).unwrap();
        assert_eq!(rotated[0].map(|i| bz.bz_grid_address[i]), Some([0, -1, 0]));
    }
}
