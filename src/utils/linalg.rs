// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Integer 3x3 matrix, row-major. Used for rotations and basis changes.
pub type IMat3 = [[i32; 3]; 3];

pub const IDENTITY: IMat3 = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

/// Row-major array to nalgebra matrix
pub fn to_matrix(m: &[[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
  ])
}

pub fn from_matrix(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
  [
    [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
    [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
    [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
  ]
}

pub fn imat_to_matrix(m: &IMat3) -> Matrix3<f64> {
  Matrix3::from_fn(|i, j| m[i][j] as f64)
}

/// Rounds every entry to the nearest integer if all of them lie within `tol`
pub fn round_to_imat(m: &Matrix3<f64>, tol: f64) -> Option<IMat3> {
  let mut out = [[0i32; 3]; 3];
  for i in 0..3 {
    for j in 0..3 {
      let r = m[(i, j)].round();
      if (m[(i, j)] - r).abs() > tol {
        return None;
      }
      out[i][j] = r as i32;
    }
  }
  Some(out)
}

/// Convert fractional coordinates to Cartesian.
///
/// The lattice columns are the basis vectors a, b, c:
/// ```text
/// Cartesian = Lattice × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: &[[f64; 3]; 3]) -> [f64; 3] {
  let cart = to_matrix(lattice) * Vector3::from(frac);
  [cart.x, cart.y, cart.z]
}

/// Convert Cartesian coordinates to fractional, or None for a singular lattice
pub fn cart_to_frac(cart: [f64; 3], lattice: &[[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv = to_matrix(lattice).try_inverse()?;
  let frac = inv * Vector3::from(cart);
  Some([frac.x, frac.y, frac.z])
}

// --- Integer matrix helpers ---

pub fn imat_mul(a: &IMat3, b: &IMat3) -> IMat3 {
  let mut out = [[0i32; 3]; 3];
  for i in 0..3 {
    for j in 0..3 {
      out[i][j] = (0..3).map(|k| a[i][k] * b[k][j]).sum();
    }
  }
  out
}

pub fn imat_vec(a: &IMat3, v: [i32; 3]) -> [i32; 3] {
  [
    a[0][0] * v[0] + a[0][1] * v[1] + a[0][2] * v[2],
    a[1][0] * v[0] + a[1][1] * v[1] + a[1][2] * v[2],
    a[2][0] * v[0] + a[2][1] * v[1] + a[2][2] * v[2],
  ]
}

pub fn imat_fvec(a: &IMat3, v: [f64; 3]) -> [f64; 3] {
  let mut out = [0.0; 3];
  for i in 0..3 {
    out[i] = a[i][0] as f64 * v[0] + a[i][1] as f64 * v[1] + a[i][2] as f64 * v[2];
  }
  out
}

pub fn imat_det(a: &IMat3) -> i32 {
  a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1]) - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
    + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
}

pub fn imat_trace(a: &IMat3) -> i32 {
  a[0][0] + a[1][1] + a[2][2]
}

pub fn imat_transpose(a: &IMat3) -> IMat3 {
  let mut out = [[0i32; 3]; 3];
  for i in 0..3 {
    for j in 0..3 {
      out[i][j] = a[j][i];
    }
  }
  out
}

pub fn imat_neg(a: &IMat3) -> IMat3 {
  let mut out = *a;
  out.iter_mut().flatten().for_each(|x| *x = -*x);
  out
}

/// Adjugate: `a * adj(a) = det(a) * I`
pub fn imat_adjugate(a: &IMat3) -> IMat3 {
  let mut out = [[0i32; 3]; 3];
  for i in 0..3 {
    for j in 0..3 {
      let (r1, r2) = ((j + 1) % 3, (j + 2) % 3);
      let (c1, c2) = ((i + 1) % 3, (i + 2) % 3);
      out[i][j] = a[r1][c1] * a[r2][c2] - a[r1][c2] * a[r2][c1];
    }
  }
  out
}

/// Inverse of a unimodular matrix
pub fn imat_inverse(a: &IMat3) -> Option<IMat3> {
  let det = imat_det(a);
  if det.abs() != 1 {
    return None;
  }
  let mut adj = imat_adjugate(a);
  adj.iter_mut().flatten().for_each(|x| *x *= det);
  Some(adj)
}

/// Columns as vectors
pub fn imat_from_columns(c: [[i32; 3]; 3]) -> IMat3 {
  imat_transpose(&c)
}

pub fn imat_column(a: &IMat3, j: usize) -> [i32; 3] {
  [a[0][j], a[1][j], a[2][j]]
}

pub fn icross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
  [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

pub fn gcd(a: i64, b: i64) -> i64 {
  let (mut a, mut b) = (a.abs(), b.abs());
  while b != 0 {
    let t = a % b;
    a = b;
    b = t;
  }
  a
}

/// Divides out the common factor; the zero vector is returned unchanged
pub fn primitive_direction(v: [i32; 3]) -> [i32; 3] {
  let g = gcd(gcd(v[0] as i64, v[1] as i64), v[2] as i64) as i32;
  if g == 0 {
    return v;
  }
  [v[0] / g, v[1] / g, v[2] / g]
}

// --- Periodic helpers ---

/// Reduces each component into [0, 1)
pub fn wrap_unit(x: [f64; 3]) -> [f64; 3] {
  let mut out = [0.0; 3];
  for i in 0..3 {
    let w = x[i] - x[i].floor();
    out[i] = if w >= 1.0 { 0.0 } else { w };
  }
  out
}

/// Subtracts the nearest lattice point
pub fn minimum_image(d: [f64; 3]) -> [f64; 3] {
  [d[0] - d[0].round(), d[1] - d[1].round(), d[2] - d[2].round()]
}

/// Cartesian length of a fractional difference after minimum-image reduction
pub fn periodic_distance(lattice: &Matrix3<f64>, d: [f64; 3]) -> f64 {
  (lattice * Vector3::from(minimum_image(d))).norm()
}

pub fn sub3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
  [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn add3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
  [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn mat_fvec(m: &Matrix3<f64>, v: [f64; 3]) -> [f64; 3] {
  let r = m * Vector3::from(v);
  [r.x, r.y, r.z]
}

// --- Smith normal form ---

/// `u * a * v == d` with `u`, `v` unimodular and `d` diagonal (rectangular).
#[derive(Debug, Clone)]
pub struct SmithForm {
  pub d: Vec<Vec<i64>>,
  pub u: Vec<Vec<i64>>,
  pub v: Vec<Vec<i64>>,
}

impl SmithForm {
  /// Diagonal entry `i`, zero past the last row
  pub fn diagonal(&self, i: usize) -> i64 {
    self.d.get(i).and_then(|row| row.get(i)).copied().unwrap_or(0)
  }
}

fn identity_rows(n: usize) -> Vec<Vec<i64>> {
  (0..n).map(|i| (0..n).map(|j| i64::from(i == j)).collect()).collect()
}

/// Diagonalizes an integer matrix by unimodular row and column operations.
/// Divisibility of consecutive diagonal entries is not enforced.
pub fn smith_normal_form(a: &[Vec<i64>]) -> SmithForm {
  let m = a.len();
  let n = a.first().map_or(0, |r| r.len());
  let mut d: Vec<Vec<i64>> = a.to_vec();
  let mut u = identity_rows(m);
  let mut v = identity_rows(n);

  for t in 0..m.min(n) {
    loop {
      // smallest nonzero pivot in the trailing block
      let mut pivot: Option<(usize, usize)> = None;
      for i in t..m {
        for j in t..n {
          if d[i][j] != 0 && pivot.map_or(true, |(pi, pj)| d[i][j].abs() < d[pi][pj].abs()) {
            pivot = Some((i, j));
          }
        }
      }
      let Some((pi, pj)) = pivot else {
        return SmithForm { d, u, v };
      };

      d.swap(t, pi);
      u.swap(t, pi);
      for row in d.iter_mut() {
        row.swap(t, pj);
      }
      for row in v.iter_mut() {
        row.swap(t, pj);
      }

      let p = d[t][t];
      let mut clean = true;
      for i in (t + 1)..m {
        let q = d[i][t] / p;
        if q != 0 {
          for j in 0..n {
            let pivot_row = d[t][j];
            d[i][j] -= q * pivot_row;
          }
          for j in 0..m {
            let pivot_row = u[t][j];
            u[i][j] -= q * pivot_row;
          }
        }
        if d[i][t] != 0 {
          clean = false;
        }
      }
      for j in (t + 1)..n {
        let q = d[t][j] / p;
        if q != 0 {
          for row in d.iter_mut().chain(v.iter_mut()) {
            let pivot_col = row[t];
            row[j] -= q * pivot_col;
          }
        }
        if d[t][j] != 0 {
          clean = false;
        }
      }
      if clean {
        break;
      }
    }
    if d[t][t] < 0 {
      d[t].iter_mut().for_each(|x| *x = -*x);
      u[t].iter_mut().for_each(|x| *x = -*x);
    }
  }
  SmithForm { d, u, v }
}
