// src/model/dataset.rs

use crate::model::cell::Cell;
use crate::model::symmetry::{Operation, Symmetry};
use crate::utils::linalg::IMat3;
use serde::{Deserialize, Serialize};

/// Identification of a space-group setting, independent of any structure
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpacegroupType {
    pub number: i32,
    pub hall_number: i32,
    pub hall_symbol: String,
    pub international: String,
    pub international_full: String,
    pub schoenflies: String,
    pub setting: String,
    pub pointgroup: String,
}

/// Result of matching a primitive cell against the database.
///
/// `transformation_matrix` maps the input basis to the conventional one,
/// `L_conv = L_input * M`, and standardized coordinates are
/// `x_std = M^-1 x_input + origin_shift`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spacegroup {
    pub kind: SpacegroupType,
    pub transformation_matrix: [[f64; 3]; 3],
    pub origin_shift: [f64; 3],
    /// Conventional lattice before idealization (columns are basis vectors)
    pub bravais_lattice: [[f64; 3]; 3],
}

/// Everything known about the symmetry of one input cell.
///
/// A `spacegroup_number` of 0 means the search ran out of attempts; all
/// arrays are then empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub spacegroup_number: i32,
    pub hall_number: i32,
    pub hall_symbol: String,
    pub international_symbol: String,
    pub international_full: String,
    pub schoenflies: String,
    pub setting: String,
    pub pointgroup: String,
    pub transformation_matrix: [[f64; 3]; 3],
    pub origin_shift: [f64; 3],
    pub bravais_lattice: [[f64; 3]; 3],
    pub rotations: Vec<IMat3>,
    pub translations: Vec<[f64; 3]>,
    /// Wyckoff letter per input atom.
    ///
    /// `None` does not mean the atom lacks a site. It means the database
    /// carries no Wyckoff table for the space group; tables exist only for
    /// groups 1, 2, 136, 186, 194, 221, 225, 227 and 229. Inside a covered
    /// group every atom gets a letter unless the tolerance is too loose for
    /// its site symmetry, which is logged with `warn!`.
    pub wyckoffs: Vec<Option<char>>,
    pub equivalent_atoms: Vec<usize>,
    /// Index of the primitive-cell atom each input atom collapses onto
    pub mapping_to_primitive: Vec<usize>,
    /// Tolerance the search converged at
    pub symprec: f64,
    /// Idealized conventional cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_cell: Option<Cell>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dataset {
    /// Exhaustion result
    pub fn empty() -> Self {
        Self {
            spacegroup_number: 0,
            hall_number: 0,
            hall_symbol: String::new(),
            international_symbol: String::new(),
            international_full: String::new(),
            schoenflies: String::new(),
            setting: String::new(),
            pointgroup: String::new(),
            transformation_matrix: [[0.0; 3]; 3],
            origin_shift: [0.0; 3],
            bravais_lattice: [[0.0; 3]; 3],
            rotations: Vec::new(),
            translations: Vec::new(),
            wyckoffs: Vec::new(),
            equivalent_atoms: Vec::new(),
            mapping_to_primitive: Vec::new(),
            symprec: 0.0,
            standardized_cell: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.spacegroup_number > 0
    }

    pub fn n_operations(&self) -> usize {
        self.rotations.len()
    }

    pub fn symmetry(&self) -> Symmetry {
        Symmetry::new(
            self.rotations
                .iter()
                .zip(self.translations.iter())
                .map(|(r, t)| Operation::new(*r, *t))
                .collect(),
        )
    }

    pub fn spacegroup_type(&self) -> SpacegroupType {
        SpacegroupType {
            number: self.spacegroup_number,
            hall_number: self.hall_number,
            hall_symbol: self.hall_symbol.clone(),
            international: self.international_symbol.clone(),
            international_full: self.international_full.clone(),
            schoenflies: self.schoenflies.clone(),
            setting: self.setting.clone(),
            pointgroup: self.pointgroup.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_is_exhaustion() {
        let ds = Dataset::default();
        assert!(!ds.is_found());
        assert_eq!(ds.spacegroup_number, 0);
        assert_eq!(ds.n_operations(), 0);
        assert!(ds.wyckoffs.is_empty() && ds.equivalent_atoms.is_empty());
        assert!(ds.symmetry().is_empty());
    }

    #[test]
    fn test_dataset_serializes() {
        let ds = Dataset::empty();
        let json = serde_json::to_string(&ds).unwrap();
        assert!(json.contains("\"spacegroup_number\":0"));
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ds);
    }
}
