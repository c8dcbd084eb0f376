// src/database/wyckoff.rs

use nalgebra::{Matrix3, Vector3};

/// Wyckoff position of the standard setting: letter, multiplicity in the
/// conventional cell and a representative coordinate triplet such as
/// `x,2x,1/4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WyckoffPosition {
    pub letter: char,
    pub multiplicity: usize,
    pub coordinates: &'static str,
}

macro_rules! wy {
    ($($letter:expr, $mult:expr, $coord:expr);* $(;)?) => {
        &[$(WyckoffPosition { letter: $letter, multiplicity: $mult, coordinates: $coord }),*]
    };
}

// === TABLES ===

static SG1: &[WyckoffPosition] = wy!['a', 1, "x,y,z"];

static SG2: &[WyckoffPosition] = wy![
    'a', 1, "0,0,0";
    'b', 1, "0,0,1/2";
    'c', 1, "0,1/2,0";
    'd', 1, "1/2,0,0";
    'e', 1, "1/2,1/2,0";
    'f', 1, "1/2,0,1/2";
    'g', 1, "0,1/2,1/2";
    'h', 1, "1/2,1/2,1/2";
    'i', 2, "x,y,z";
];

static SG136: &[WyckoffPosition] = wy![
    'a', 2, "0,0,0";
    'b', 2, "0,0,1/2";
    'c', 4, "0,1/2,0";
    'd', 4, "0,1/2,1/4";
    'e', 4, "0,0,z";
    'f', 4, "x,x,0";
    'g', 4, "x,-x,0";
    'h', 8, "0,1/2,z";
    'i', 8, "x,y,0";
    'j', 8, "x,x,z";
    'k', 16, "x,y,z";
];

static SG186: &[WyckoffPosition] = wy![
    'a', 2, "0,0,z";
    'b', 2, "1/3,2/3,z";
    'c', 6, "x,-x,z";
    'd', 12, "x,y,z";
];

static SG194: &[WyckoffPosition] = wy![
    'a', 2, "0,0,0";
    'b', 2, "0,0,1/4";
    'c', 2, "1/3,2/3,1/4";
    'd', 2, "1/3,2/3,3/4";
    'e', 4, "0,0,z";
    'f', 4, "1/3,2/3,z";
    'g', 6, "1/2,0,0";
    'h', 6, "x,2x,1/4";
    'i', 12, "x,0,0";
    'j', 12, "x,y,1/4";
    'k', 12, "x,2x,z";
    'l', 24, "x,y,z";
];

static SG221: &[WyckoffPosition] = wy![
    'a', 1, "0,0,0";
    'b', 1, "1/2,1/2,1/2";
    'c', 3, "0,1/2,1/2";
    'd', 3, "1/2,0,0";
    'e', 6, "x,0,0";
    'f', 6, "x,1/2,1/2";
    'g', 8, "x,x,x";
    'h', 12, "x,1/2,0";
    'i', 12, "0,y,y";
    'j', 12, "1/2,y,y";
    'k', 24, "0,y,z";
    'l', 24, "1/2,y,z";
    'm', 24, "x,x,z";
    'n', 48, "x,y,z";
];

static SG225: &[WyckoffPosition] = wy![
    'a', 4, "0,0,0";
    'b', 4, "1/2,1/2,1/2";
    'c', 8, "1/4,1/4,1/4";
    'd', 24, "0,1/4,1/4";
    'e', 24, "x,0,0";
    'f', 32, "x,x,x";
    'g', 48, "x,1/4,1/4";
    'h', 48, "0,y,y";
    'i', 48, "1/2,y,y";
    'j', 96, "0,y,z";
    'k', 96, "x,x,z";
    'l', 192, "x,y,z";
];

static SG227: &[WyckoffPosition] = wy![
    'a', 8, "0,0,0";
    'b', 8, "1/2,1/2,1/2";
    'c', 16, "1/8,1/8,1/8";
    'd', 16, "5/8,5/8,5/8";
    'e', 32, "x,x,x";
    'f', 48, "x,0,0";
    'g', 96, "x,x,z";
    'h', 96, "0,y,-y";
    'i', 192, "x,y,z";
];

static SG229: &[WyckoffPosition] = wy![
    'a', 2, "0,0,0";
    'b', 6, "0,1/2,1/2";
    'c', 8, "1/4,1/4,1/4";
    'd', 12, "1/4,0,1/2";
    'e', 12, "x,0,0";
    'f', 16, "x,x,x";
    'g', 24, "x,0,1/2";
    'h', 24, "0,y,y";
    'i', 48, "1/4,y,-y+1/2";
    'j', 48, "0,y,z";
    'k', 48, "x,x,z";
    'l', 96, "x,y,z";
];

/// Wyckoff positions of a space-group type in its standard setting, or
/// `None` when no table is bundled
pub fn positions(number: i32) -> Option<&'static [WyckoffPosition]> {
    let table = match number {
        1 => SG1,
        2 => SG2,
        136 => SG136,
        186 => SG186,
        194 => SG194,
        221 => SG221,
        225 => SG225,
        227 => SG227,
        229 => SG229,
        _ => return None,
    };
    Some(table)
}

/// Parses `x,2x,1/4` into `(A, b)` with coordinates `A (x, y, z) + b`
pub fn parse_coordinates(text: &str) -> Option<(Matrix3<f64>, Vector3<f64>)> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return None;
    }
    let mut a = Matrix3::zeros();
    let mut b = Vector3::zeros();
    for (row, part) in parts.iter().enumerate() {
        let normalized = part.replace(' ', "").replace('-', "+-");
        for term in normalized.split('+').filter(|t| !t.is_empty()) {
            let (sign, body) = match term.strip_prefix('-') {
                Some(rest) => (-1.0, rest),
                None => (1.0, term),
            };
            match body.chars().last()? {
                var @ ('x' | 'y' | 'z') => {
                    let coef = &body[..body.len() - 1];
                    let c: f64 = if coef.is_empty() { 1.0 } else { coef.parse().ok()? };
                    let col = match var {
                        'x' => 0,
                        'y' => 1,
                        _ => 2,
                    };
                    a[(row, col)] += sign * c;
                }
                _ => {
                    let value = match body.split_once('/') {
                        Some((num, den)) => num.parse::<f64>().ok()? / den.parse::<f64>().ok()?,
                        None => body.parse::<f64>().ok()?,
                    };
                    b[row] += sign * value;
                }
            }
        }
    }
    Some((a, b))
}

impl WyckoffPosition {
    /// True when one of `images` (fractional, standard setting) lies on this
    /// position within `tolerance` (Cartesian, in `lattice`).
    pub fn contains_any(&self, images: &[[f64; 3]], lattice: &Matrix3<f64>, tolerance: f64) -> bool {
        let Some((a, b)) = parse_coordinates(self.coordinates) else {
            return false;
        };

        // orthonormal basis of the free directions
        let mut basis: Vec<Vector3<f64>> = Vec::new();
        for j in 0..3 {
            let mut v: Vector3<f64> = a.column(j).into_owned();
            for e in &basis {
                v -= e * e.dot(&v);
            }
            if v.norm() > 1e-9 {
                basis.push(v.normalize());
            }
        }
        let residual = |r: Vector3<f64>| basis.iter().fold(r, |acc, e| acc - e * e.dot(&r));

        for q in images {
            for n0 in -1..=1 {
                for n1 in -1..=1 {
                    for n2 in -1..=1 {
                        let r = Vector3::new(
                            q[0] + n0 as f64 - b[0],
                            q[1] + n1 as f64 - b[1],
                            q[2] + n2 as f64 - b[2],
                        );
                        if (lattice * residual(r)).norm() < tolerance {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates() {
        let (a, b) = parse_coordinates("1/4,y,-y+1/2").unwrap();
        assert_eq!(a[(1, 1)], 1.0);
        assert_eq!(a[(2, 1)], -1.0);
        assert!((b[0] - 0.25).abs() < 1e-12);
        assert!((b[2] - 0.5).abs() < 1e-12);

        let (a, _) = parse_coordinates("x,2x,1/4").unwrap();
        assert_eq!(a[(1, 0)], 2.0);
        assert!(parse_coordinates("x,y").is_none());
    }

    #[test]
    fn test_multiplicities_are_ordered() {
        for number in [1, 2, 136, 186, 194, 221, 225, 227, 229] {
            let table = positions(number).unwrap();
            assert!(table.windows(2).all(|w| w[0].multiplicity <= w[1].multiplicity));
            assert!(table.iter().all(|p| parse_coordinates(p.coordinates).is_some()));
        }
        assert!(positions(62).is_none());
    }

    #[test]
    fn test_contains_any() {
        let lattice = Matrix3::identity() * 4.0;
        let line = positions(225).unwrap()[4]; // e: x,0,0
        assert!(line.contains_any(&[[0.3, 0.0, 1.0]], &lattice, 1e-5));
        assert!(!line.contains_any(&[[0.3, 0.1, 0.0]], &lattice, 1e-5));
    }
}
