// src/database/hall.rs

use crate::utils::linalg::{self, IMat3, IDENTITY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Translations are stored in twelfths of a lattice vector so that group
/// generation stays exact.
pub const TWELFTHS: i32 = 12;

/// Seitz operation with translation in twelfths, reduced into [0, 12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HallOperation {
    pub rotation: IMat3,
    pub translation: [i32; 3],
}

impl HallOperation {
    pub fn new(rotation: IMat3, translation: [i32; 3]) -> Self {
        Self {
            rotation,
            translation: [
                translation[0].rem_euclid(TWELFTHS),
                translation[1].rem_euclid(TWELFTHS),
                translation[2].rem_euclid(TWELFTHS),
            ],
        }
    }

    pub fn identity() -> Self {
        Self::new(IDENTITY, [0; 3])
    }

    pub fn compose(&self, other: &HallOperation) -> HallOperation {
        let rotation = linalg::imat_mul(&self.rotation, &other.rotation);
        let t = linalg::imat_vec(&self.rotation, other.translation);
        HallOperation::new(
            rotation,
            [
                t[0] + self.translation[0],
                t[1] + self.translation[1],
                t[2] + self.translation[2],
            ],
        )
    }

    /// Translation as fractions of the lattice vectors
    pub fn fractional_translation(&self) -> [f64; 3] {
        let d = TWELFTHS as f64;
        [
            self.translation[0] as f64 / d,
            self.translation[1] as f64 / d,
            self.translation[2] as f64 / d,
        ]
    }
}

/// Lattice centering of a conventional cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Centering {
    P,
    A,
    B,
    C,
    I,
    R,
    F,
}

impl Centering {
    pub fn from_letter(c: char) -> Option<Self> {
        let centering = match c {
            'P' => Centering::P,
            'A' => Centering::A,
            'B' => Centering::B,
            'C' => Centering::C,
            'I' => Centering::I,
            'R' => Centering::R,
            'F' => Centering::F,
            _ => return None,
        };
        Some(centering)
    }

    /// Non-zero centering vectors in twelfths (rhombohedral is obverse)
    pub fn vectors(self) -> &'static [[i32; 3]] {
        match self {
            Centering::P => &[],
            Centering::A => &[[0, 6, 6]],
            Centering::B => &[[6, 0, 6]],
            Centering::C => &[[6, 6, 0]],
            Centering::I => &[[6, 6, 6]],
            Centering::R => &[[8, 4, 4], [4, 8, 8]],
            Centering::F => &[[0, 6, 6], [6, 0, 6], [6, 6, 0]],
        }
    }

    /// Lattice points per conventional cell
    pub fn multiplicity(self) -> i32 {
        self.vectors().len() as i32 + 1
    }
}

// --- Rotation matrices of the Hall notation ---

fn axis_rotation(order: char, axis: char) -> Option<IMat3> {
    let m = match (order, axis) {
        ('2', 'x') => [[1, 0, 0], [0, -1, 0], [0, 0, -1]],
        ('2', 'y') => [[-1, 0, 0], [0, 1, 0], [0, 0, -1]],
        ('2', 'z') => [[-1, 0, 0], [0, -1, 0], [0, 0, 1]],
        ('3', 'x') => [[1, 0, 0], [0, 0, -1], [0, 1, -1]],
        ('3', 'y') => [[-1, 0, 1], [0, 1, 0], [-1, 0, 0]],
        ('3', 'z') => [[0, -1, 0], [1, -1, 0], [0, 0, 1]],
        ('4', 'x') => [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
        ('4', 'y') => [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
        ('4', 'z') => [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
        ('6', 'x') => [[1, 0, 0], [0, 1, -1], [0, 1, 0]],
        ('6', 'y') => [[0, 0, 1], [0, 1, 0], [-1, 0, 1]],
        ('6', 'z') => [[1, -1, 0], [1, 0, 0], [0, 0, 1]],
        _ => return None,
    };
    Some(m)
}

/// Two-fold along a face diagonal (') or the other diagonal ("), relative to
/// the principal axis
fn diagonal_rotation(kind: char, principal: char) -> Option<IMat3> {
    let m = match (kind, principal) {
        ('\'', 'x') => [[-1, 0, 0], [0, 0, -1], [0, -1, 0]],
        ('\'', 'y') => [[0, 0, -1], [0, -1, 0], [-1, 0, 0]],
        ('\'', 'z') => [[0, -1, 0], [-1, 0, 0], [0, 0, -1]],
        ('"', 'x') => [[-1, 0, 0], [0, 0, 1], [0, 1, 0]],
        ('"', 'y') => [[0, 0, 1], [0, -1, 0], [1, 0, 0]],
        ('"', 'z') => [[0, 1, 0], [1, 0, 0], [0, 0, -1]],
        _ => return None,
    };
    Some(m)
}

/// Three-fold along the body diagonal
const BODY_DIAGONAL_3: IMat3 = [[0, 0, 1], [1, 0, 0], [0, 1, 0]];

fn translation_symbol(c: char) -> Option<[i32; 3]> {
    let t = match c {
        'a' => [6, 0, 0],
        'b' => [0, 6, 0],
        'c' => [0, 0, 6],
        'n' => [6, 6, 6],
        'u' => [3, 0, 0],
        'v' => [0, 3, 0],
        'w' => [0, 0, 3],
        'd' => [3, 3, 3],
        _ => return None,
    };
    Some(t)
}

/// Parsed Hall symbol: lattice centering plus generators (centering
/// translations and the inversion included)
#[derive(Debug, Clone, PartialEq)]
pub struct HallSymbol {
    pub centering: Centering,
    pub centrosymmetric: bool,
    pub generators: Vec<HallOperation>,
}

/// Parses a Hall symbol such as `-P 4n 2 3 -1n` or `P 31 2c (0 0 1)`.
/// The optional trailing origin shift is given in twelfths.
pub fn parse(symbol: &str) -> Option<HallSymbol> {
    let (body, shift) = match symbol.find('(') {
        Some(open) => {
            let close = symbol.find(')')?;
            let values: Vec<i32> = symbol[open + 1..close]
                .split_whitespace()
                .map(|s| s.parse().ok())
                .collect::<Option<Vec<i32>>>()?;
            if values.len() != 3 {
                return None;
            }
            (&symbol[..open], [values[0], values[1], values[2]])
        }
        None => (symbol, [0; 3]),
    };

    let mut tokens = body.split_whitespace();
    let lattice = tokens.next()?;
    let centrosymmetric = lattice.starts_with('-');
    let centering = Centering::from_letter(lattice.trim_start_matches('-').chars().next()?)?;

    let mut generators: Vec<HallOperation> =
        centering.vectors().iter().map(|t| HallOperation::new(IDENTITY, *t)).collect();
    if centrosymmetric {
        generators.push(HallOperation::new(linalg::imat_neg(&IDENTITY), [0; 3]));
    }

    let mut previous_order: Option<char> = None;
    let mut principal_axis: Option<char> = None;
    for (idx, token) in tokens.enumerate() {
        let mut chars = token.chars().peekable();
        let improper = chars.next_if_eq(&'-').is_some();
        let order = chars.next()?;
        let screw = chars.next_if(|c| c.is_ascii_digit()).and_then(|c| c.to_digit(10));
        let explicit_axis = chars.next_if(|c| matches!(c, 'x' | 'y' | 'z' | '\'' | '"' | '*'));
        let rest: Vec<char> = chars.collect();

        let axis = explicit_axis.or(match (idx, order) {
            (0, _) => Some('z'),
            (1, '2') => match previous_order {
                Some('2') | Some('4') => Some('x'),
                _ => Some('\''),
            },
            (2, '3') => Some('*'),
            _ => None,
        });

        let mut rotation = match (order, axis) {
            ('1', _) => IDENTITY,
            (_, Some('*')) => BODY_DIAGONAL_3,
            (_, Some(kind @ ('\'' | '"'))) => diagonal_rotation(kind, principal_axis?)?,
            (_, Some(a)) => axis_rotation(order, a)?,
            (_, None) => return None,
        };
        if improper {
            rotation = linalg::imat_neg(&rotation);
        }

        let mut t = [0i32; 3];
        if let (Some(k), Some(a @ ('x' | 'y' | 'z'))) = (screw, axis) {
            let n = order.to_digit(10)? as i32;
            let component = match a {
                'x' => 0,
                'y' => 1,
                _ => 2,
            };
            t[component] += TWELFTHS * k as i32 / n;
        }
        for c in rest {
            let v = translation_symbol(c)?;
            for j in 0..3 {
                t[j] += v[j];
            }
        }
        generators.push(HallOperation::new(rotation, t));

        if idx == 0 {
            principal_axis = axis;
        }
        previous_order = Some(order);
    }

    // change of origin: t' = t + v - R v
    if shift != [0; 3] {
        for g in generators.iter_mut() {
            let rv = linalg::imat_vec(&g.rotation, shift);
            *g = HallOperation::new(
                g.rotation,
                [
                    g.translation[0] + shift[0] - rv[0],
                    g.translation[1] + shift[1] - rv[1],
                    g.translation[2] + shift[2] - rv[2],
                ],
            );
        }
    }

    Some(HallSymbol {
        centering,
        centrosymmetric,
        generators,
    })
}

/// Closes a generator set under composition. Identity is first; the rest
/// follow in discovery order.
pub fn generate_group(generators: &[HallOperation]) -> Vec<HallOperation> {
    let mut ops = vec![HallOperation::identity()];
    let mut seen: HashSet<HallOperation> = ops.iter().copied().collect();
    for g in generators {
        if seen.insert(*g) {
            ops.push(*g);
        }
    }
    loop {
        let n = ops.len();
        for i in 0..n {
            for j in 0..n {
                let product = ops[i].compose(&ops[j]);
                if seen.insert(product) {
                    ops.push(product);
                }
            }
        }
        if ops.len() == n {
            return ops;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_centering_and_inversion() {
        let hall = parse("-F 4 2 3").unwrap();
        assert_eq!(hall.centering, Centering::F);
        assert!(hall.centrosymmetric);
        assert_eq!(generate_group(&hall.generators).len(), 192);
    }

    #[test]
    fn test_screw_translation() {
        let hall = parse("P 61").unwrap();
        let g = hall.generators[0];
        assert_eq!(g.translation, [0, 0, 2]);
        assert_eq!(generate_group(&hall.generators).len(), 6);
    }

    #[test]
    fn test_default_axes() {
        // second 2-fold after a 3-fold lies along the face diagonal
        let hall = parse("P 3 2").unwrap();
        assert_eq!(hall.generators[1].rotation, [[0, -1, 0], [-1, 0, 0], [0, 0, -1]]);
        let cubic = parse("P 2 2 3").unwrap();
        assert_eq!(cubic.generators[2].rotation, BODY_DIAGONAL_3);
    }

    #[test]
    fn test_origin_shift() {
        let hall = parse("P 31 2c (0 0 1)").unwrap();
        // t' = t + v - R v with v = 1/12 along c
        assert_eq!(hall.generators[0].translation, [0, 0, 4]);
        assert_eq!(hall.generators[1].rotation, [[0, -1, 0], [-1, 0, 0], [0, 0, -1]]);
        assert_eq!(hall.generators[1].translation, [0, 0, 8]);
        assert_eq!(generate_group(&hall.generators).len(), 6);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse("Q 2").is_none());
        assert!(parse("P 5").is_none());
        assert!(parse("").is_none());
    }
}
