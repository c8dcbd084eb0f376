// src/model/symmetry.rs

use crate::utils::linalg::{self, IMat3, IDENTITY};
use serde::{Deserialize, Serialize};

/// Seitz operation `x' = R x + t` in fractional coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub rotation: IMat3,
    pub translation: [f64; 3],
}

impl Operation {
    pub fn new(rotation: IMat3, translation: [f64; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(IDENTITY, [0.0; 3])
    }

    pub fn apply(&self, x: [f64; 3]) -> [f64; 3] {
        linalg::add3(linalg::imat_fvec(&self.rotation, x), self.translation)
    }

    /// `self ∘ other`, translation reduced into [0, 1)
    pub fn compose(&self, other: &Operation) -> Operation {
        let rotation = linalg::imat_mul(&self.rotation, &other.rotation);
        let translation = linalg::wrap_unit(self.apply(other.translation));
        Operation::new(rotation, translation)
    }

    pub fn is_identity(&self, eps: f64) -> bool {
        self.rotation == IDENTITY && linalg::minimum_image(self.translation).iter().all(|t| t.abs() < eps)
    }
}

/// Space-group operations of a cell, identity first
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Symmetry {
    pub operations: Vec<Operation>,
}

impl Symmetry {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn rotations(&self) -> Vec<IMat3> {
        self.operations.iter().map(|op| op.rotation).collect()
    }

    pub fn translations(&self) -> Vec<[f64; 3]> {
        self.operations.iter().map(|op| op.translation).collect()
    }

    /// Distinct rotations in first-seen order
    pub fn point_group(&self) -> RotationSet {
        let mut set = RotationSet::new();
        for op in &self.operations {
            set.push_unique(op.rotation);
        }
        set
    }

    /// Operations with identity rotation, i.e. lattice centering vectors
    pub fn pure_translations(&self) -> Vec<[f64; 3]> {
        self.operations
            .iter()
            .filter(|op| op.rotation == IDENTITY)
            .map(|op| op.translation)
            .collect()
    }

    pub fn contains_identity(&self, eps: f64) -> bool {
        self.operations.iter().any(|op| op.is_identity(eps))
    }
}

/// Ordered list of integer rotation matrices
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSet {
    mats: Vec<IMat3>,
}

impl RotationSet {
    pub fn new() -> Self {
        Self { mats: Vec::new() }
    }

    pub fn from_vec(mats: Vec<IMat3>) -> Self {
        Self { mats }
    }

    pub fn push(&mut self, m: IMat3) {
        self.mats.push(m);
    }

    /// Appends unless already present; returns whether it was added
    pub fn push_unique(&mut self, m: IMat3) -> bool {
        if self.contains(&m) {
            return false;
        }
        self.mats.push(m);
        true
    }

    pub fn contains(&self, m: &IMat3) -> bool {
        self.mats.iter().any(|x| x == m)
    }

    pub fn len(&self) -> usize {
        self.mats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mats.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IMat3> {
        self.mats.iter()
    }

    pub fn as_slice(&self) -> &[IMat3] {
        &self.mats
    }

    /// Reciprocal-space rotations: transposes, de-duplicated, with `-R`
    /// added when time reversal holds
    pub fn reciprocal(&self, time_reversal: bool) -> RotationSet {
        let mut out = RotationSet::new();
        for m in &self.mats {
            out.push_unique(linalg::imat_transpose(m));
        }
        if time_reversal {
            for m in out.mats.clone() {
                out.push_unique(linalg::imat_neg(&m));
            }
        }
        out
    }

    /// Set equality, ignoring order
    pub fn same_elements(&self, other: &RotationSet) -> bool {
        self.len() == other.len() && self.mats.iter().all(|m| other.contains(m))
    }
}

impl FromIterator<IMat3> for RotationSet {
    fn from_iter<I: IntoIterator<Item = IMat3>>(iter: I) -> Self {
        let mut set = RotationSet::new();
        for m in iter {
            set.push(m);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RotationSet {
    type Item = &'a IMat3;
    type IntoIter = std::slice::Iter<'a, IMat3>;

    fn into_iter(self) -> Self::IntoIter {
        self.mats.iter()
    }
}
