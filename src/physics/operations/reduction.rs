// src/physics/operations/reduction.rs

use crate::utils::linalg::{self, IMat3};
use log::debug;
use nalgebra::{Matrix3, Vector3};

/// A reduced basis together with the integer change of basis that produced it:
/// `lattice == input * transformation` (columns are basis vectors).
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedLattice {
    pub lattice: [[f64; 3]; 3],
    pub transformation: IMat3,
}

const DELAUNAY_MAX_ITERATIONS: usize = 100;
const NIGGLI_MAX_ITERATIONS: usize = 100;

// =========================================================================
// 1. DELAUNAY (superbase) REDUCTION
// =========================================================================

/// Reduces a lattice to its shortest-vector basis via the Delaunay superbase.
///
/// The returned basis is right-handed and spans the same lattice. `None` means
/// the lattice is degenerate.
pub fn delaunay_reduce(lattice: &[[f64; 3]; 3], symprec: f64) -> Option<ReducedLattice> {
    let l = linalg::to_matrix(lattice);
    let volume = l.determinant().abs();
    if !volume.is_finite() || volume <= 0.0 {
        return None;
    }

    let a: Vector3<f64> = l.column(0).into_owned();
    let b: Vector3<f64> = l.column(1).into_owned();
    let c: Vector3<f64> = l.column(2).into_owned();
    let mut superbase = [a, b, c, -(a + b + c)];

    for _ in 0..DELAUNAY_MAX_ITERATIONS {
        if !delaunay_step(&mut superbase, symprec) {
            break;
        }
    }

    let mut candidates = vec![
        superbase[0],
        superbase[1],
        superbase[2],
        superbase[3],
        superbase[0] + superbase[1],
        superbase[1] + superbase[2],
        superbase[2] + superbase[0],
    ];
    candidates.sort_by(|x, y| x.norm().partial_cmp(&y.norm()).unwrap_or(std::cmp::Ordering::Equal));

    let reduced = pick_shortest_basis(&candidates, volume)?;
    let inv = l.try_inverse()?;
    let transformation = linalg::round_to_imat(&(inv * reduced), 1e-4)?;
    if linalg::imat_det(&transformation) != 1 {
        debug!("delaunay: transformation is not unimodular");
        return None;
    }
    let exact = l * linalg::imat_to_matrix(&transformation);
    Some(ReducedLattice {
        lattice: linalg::from_matrix(&exact),
        transformation,
    })
}

/// One sweep: the first pair with a positive scalar product is flipped.
/// Returns false when every pair is already non-acute.
fn delaunay_step(superbase: &mut [Vector3<f64>; 4], symprec: f64) -> bool {
    for i in 0..4 {
        for j in (i + 1)..4 {
            if superbase[i].dot(&superbase[j]) > symprec {
                let bi = superbase[i];
                for (k, v) in superbase.iter_mut().enumerate() {
                    if k != i && k != j {
                        *v += bi;
                    }
                }
                superbase[i] = -bi;
                return true;
            }
        }
    }
    false
}

fn pick_shortest_basis(candidates: &[Vector3<f64>], volume: f64) -> Option<Matrix3<f64>> {
    let n = candidates.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let m = Matrix3::from_columns(&[candidates[i], candidates[j], candidates[k]]);
                let det = m.determinant();
                if det.abs() > volume * 1e-5 {
                    if (det.abs() - volume).abs() > volume * 1e-5 {
                        continue;
                    }
                    if det < 0.0 {
                        return Some(Matrix3::from_columns(&[candidates[i], candidates[j], -candidates[k]]));
                    }
                    return Some(m);
                }
            }
        }
    }
    None
}

// =========================================================================
// 2. NIGGLI (Krivy-Gruber) REDUCTION
// =========================================================================

struct NiggliState {
    lattice: Matrix3<f64>,
    total: IMat3,
    eps: f64,
    a: f64,
    b: f64,
    c: f64,
    xi: f64,
    eta: f64,
    zeta: f64,
    l: i32,
    m: i32,
    n: i32,
}

impl NiggliState {
    fn new(lattice: Matrix3<f64>, eps: f64) -> Self {
        let mut s = Self {
            lattice,
            total: linalg::IDENTITY,
            eps,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            xi: 0.0,
            eta: 0.0,
            zeta: 0.0,
            l: 0,
            m: 0,
            n: 0,
        };
        s.update_parameters();
        s
    }

    fn update_parameters(&mut self) {
        let g = self.lattice.transpose() * self.lattice;
        self.a = g[(0, 0)];
        self.b = g[(1, 1)];
        self.c = g[(2, 2)];
        self.xi = 2.0 * g[(1, 2)];
        self.eta = 2.0 * g[(0, 2)];
        self.zeta = 2.0 * g[(0, 1)];
        self.l = self.sign_of(self.xi);
        self.m = self.sign_of(self.eta);
        self.n = self.sign_of(self.zeta);
    }

    fn sign_of(&self, x: f64) -> i32 {
        if x < -self.eps {
            -1
        } else if x > self.eps {
            1
        } else {
            0
        }
    }

    fn apply(&mut self, step: IMat3) {
        self.lattice *= linalg::imat_to_matrix(&step);
        self.total = linalg::imat_mul(&self.total, &step);
        self.update_parameters();
    }

    fn equal(&self, x: f64, y: f64) -> bool {
        (x - y).abs() <= self.eps
    }

    fn step1(&self) -> Option<IMat3> {
        let swap = self.a > self.b + self.eps
            || (self.equal(self.a, self.b) && self.xi.abs() > self.eta.abs() + self.eps);
        swap.then_some([[0, -1, 0], [-1, 0, 0], [0, 0, -1]])
    }

    fn step2(&self) -> Option<IMat3> {
        let swap = self.b > self.c + self.eps
            || (self.equal(self.b, self.c) && self.eta.abs() > self.zeta.abs() + self.eps);
        swap.then_some([[-1, 0, 0], [0, 0, -1], [0, -1, 0]])
    }

    fn step3(&self) -> Option<IMat3> {
        if self.l * self.m * self.n != 1 {
            return None;
        }
        let flip = |s: i32| if s == -1 { -1 } else { 1 };
        Some([[flip(self.l), 0, 0], [0, flip(self.m), 0], [0, 0, flip(self.n)]])
    }

    fn step4(&self) -> Option<IMat3> {
        if self.l == -1 && self.m == -1 && self.n == -1 {
            return None;
        }
        let product = self.l * self.m * self.n;
        if product != 0 && product != -1 {
            return None;
        }
        let mut diag = [1, 1, 1];
        let mut free: Option<usize> = None;
        for (idx, s) in [self.l, self.m, self.n].into_iter().enumerate() {
            if s == 1 {
                diag[idx] = -1;
            } else if s == 0 {
                free = Some(idx);
            }
        }
        if diag[0] * diag[1] * diag[2] == -1 {
            if let Some(idx) = free {
                diag[idx] = -1;
            }
        }
        Some([[diag[0], 0, 0], [0, diag[1], 0], [0, 0, diag[2]]])
    }

    fn step5(&self) -> Option<IMat3> {
        let hit = self.xi.abs() > self.b + self.eps
            || (self.equal(self.b, self.xi) && 2.0 * self.eta < self.zeta - self.eps)
            || (self.equal(self.b, -self.xi) && self.zeta < -self.eps);
        hit.then(|| [[1, 0, 0], [0, 1, -sign_i(self.xi)], [0, 0, 1]])
    }

    fn step6(&self) -> Option<IMat3> {
        let hit = self.eta.abs() > self.a + self.eps
            || (self.equal(self.a, self.eta) && 2.0 * self.xi < self.zeta - self.eps)
            || (self.equal(self.a, -self.eta) && self.zeta < -self.eps);
        hit.then(|| [[1, 0, -sign_i(self.eta)], [0, 1, 0], [0, 0, 1]])
    }

    fn step7(&self) -> Option<IMat3> {
        let hit = self.zeta.abs() > self.a + self.eps
            || (self.equal(self.a, self.zeta) && 2.0 * self.xi < self.eta - self.eps)
            || (self.equal(self.a, -self.zeta) && self.eta < -self.eps);
        hit.then(|| [[1, -sign_i(self.zeta), 0], [0, 1, 0], [0, 0, 1]])
    }

    fn step8(&self) -> Option<IMat3> {
        let sum = self.xi + self.eta + self.zeta + self.a + self.b;
        let hit = sum < -self.eps || (sum.abs() <= self.eps && 2.0 * (self.a + self.eta) + self.zeta > self.eps);
        hit.then_some([[1, 0, 1], [0, 1, 1], [0, 0, 1]])
    }
}

fn sign_i(x: f64) -> i32 {
    if x < 0.0 {
        -1
    } else {
        1
    }
}

/// Niggli-reduces a lattice.
///
/// `eps` is relative: it is scaled by `volume^(2/3)` so that it compares
/// squared lengths consistently. `None` for a degenerate lattice or when the
/// reduction does not settle.
pub fn niggli_reduce(lattice: &[[f64; 3]; 3], eps: f64) -> Option<ReducedLattice> {
    let l = linalg::to_matrix(lattice);
    let volume = l.determinant().abs();
    if !volume.is_finite() || volume <= 0.0 {
        return None;
    }
    let mut state = NiggliState::new(l, eps * volume.powf(2.0 / 3.0));

    for _ in 0..NIGGLI_MAX_ITERATIONS {
        if let Some(step) = state.step1() {
            state.apply(step);
        }
        if let Some(step) = state.step2() {
            state.apply(step);
            continue;
        }
        if let Some(step) = state.step3() {
            state.apply(step);
        }
        if let Some(step) = state.step4() {
            state.apply(step);
        }
        if let Some(step) = state.step5().or_else(|| state.step6()).or_else(|| state.step7()).or_else(|| state.step8()) {
            state.apply(step);
            continue;
        }

        let exact = l * linalg::imat_to_matrix(&state.total);
        return Some(ReducedLattice {
            lattice: linalg::from_matrix(&exact),
            transformation: state.total,
        });
    }
    debug!("niggli: no convergence after {} iterations", NIGGLI_MAX_ITERATIONS);
    None
}
