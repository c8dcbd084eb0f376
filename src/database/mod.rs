// src/database/mod.rs

pub mod hall;
pub mod table;
pub mod wyckoff;

pub use hall::{Centering, HallOperation};
pub use wyckoff::WyckoffPosition;

use crate::model::dataset::SpacegroupType;
use crate::model::symmetry::{Operation, RotationSet, Symmetry};
use crate::physics::analysis::pointgroup::{self, PointGroup};
use log::error;
use std::sync::OnceLock;

/// One space-group setting with its operations generated from the Hall symbol
#[derive(Debug, Clone)]
pub struct HallEntry {
    pub number: i32,
    pub hall_number: i32,
    pub hall_symbol: String,
    pub international: String,
    pub international_full: String,
    pub schoenflies: String,
    pub setting: String,
    pub pointgroup: &'static PointGroup,
    pub centering: Centering,
    /// Full group including centering translations, identity first
    pub operations: Vec<HallOperation>,
    /// Distinct rotations
    pub rotations: RotationSet,
}

impl HallEntry {
    fn from_record(record: &table::SettingRecord) -> Option<Self> {
        let parsed = hall::parse(record.hall_symbol)?;
        let operations = hall::generate_group(&parsed.generators);
        let mut rotations = RotationSet::new();
        for op in &operations {
            rotations.push_unique(op.rotation);
        }
        let pointgroup = pointgroup::classify(&rotations)?;
        Some(Self {
            number: record.number,
            hall_number: record.hall_number,
            hall_symbol: record.hall_symbol.to_string(),
            international: record.international.to_string(),
            international_full: record.international_full.to_string(),
            schoenflies: table::schoenflies(record.number).unwrap_or_default(),
            setting: record.setting.to_string(),
            pointgroup,
            centering: parsed.centering,
            operations,
            rotations,
        })
    }

    pub fn spacegroup_type(&self) -> SpacegroupType {
        SpacegroupType {
            number: self.number,
            hall_number: self.hall_number,
            hall_symbol: self.hall_symbol.clone(),
            international: self.international.clone(),
            international_full: self.international_full.clone(),
            schoenflies: self.schoenflies.clone(),
            setting: self.setting.clone(),
            pointgroup: self.pointgroup.symbol.to_string(),
        }
    }

    /// Operations with fractional translations
    pub fn symmetry(&self) -> Symmetry {
        Symmetry::new(
            self.operations
                .iter()
                .map(|op| Operation::new(op.rotation, op.fractional_translation()))
                .collect(),
        )
    }

    /// First translation paired with `rotation` in the group
    pub fn translation_for(&self, rotation: &crate::utils::linalg::IMat3) -> Option<[i32; 3]> {
        self.operations
            .iter()
            .find(|op| op.rotation == *rotation)
            .map(|op| op.translation)
    }
}

/// Source of space-group settings consulted by the matcher.
///
/// Entries are tried in the order returned by [`SpacegroupDatabase::entries`];
/// the first match wins.
pub trait SpacegroupDatabase: Sync {
    fn entries(&self) -> &[HallEntry];

    /// Wyckoff positions of the standard setting of `number`
    fn wyckoff_positions(&self, number: i32) -> Option<&[WyckoffPosition]>;

    fn entry_by_hall_number(&self, hall_number: i32) -> Option<&HallEntry> {
        self.entries().iter().find(|e| e.hall_number == hall_number)
    }

    fn spacegroup_type(&self, hall_number: i32) -> Option<SpacegroupType> {
        self.entry_by_hall_number(hall_number).map(HallEntry::spacegroup_type)
    }

    fn symmetry(&self, hall_number: i32) -> Option<Symmetry> {
        self.entry_by_hall_number(hall_number).map(HallEntry::symmetry)
    }
}

static STANDARD_ENTRIES: OnceLock<Vec<HallEntry>> = OnceLock::new();

/// The 230 standard settings (one Hall symbol per type) with bundled Wyckoff
/// tables for a subset of types.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDatabase;

impl StandardDatabase {
    pub fn new() -> Self {
        StandardDatabase
    }
}

impl SpacegroupDatabase for StandardDatabase {
    fn entries(&self) -> &[HallEntry] {
        STANDARD_ENTRIES.get_or_init(|| {
            table::SETTINGS
                .iter()
                .filter_map(|record| {
                    let entry = HallEntry::from_record(record);
                    if entry.is_none() {
                        error!("invalid Hall symbol for type {}: {}", record.number, record.hall_symbol);
                    }
                    entry
                })
                .collect()
        })
    }

    fn wyckoff_positions(&self, number: i32) -> Option<&[WyckoffPosition]> {
        wyckoff::positions(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_hall_symbols_generate() {
        let db = StandardDatabase::new();
        assert_eq!(db.entries().len(), 230);
        for entry in db.entries() {
            let expected = table::pointgroup_symbol(entry.number).unwrap();
            assert_eq!(entry.pointgroup.symbol, expected, "type {}", entry.number);
            let order = entry.pointgroup.order() * entry.centering.multiplicity() as usize;
            assert_eq!(entry.operations.len(), order, "type {}", entry.number);
            assert_eq!(entry.operations[0], HallOperation::identity());
        }
    }

    #[test]
    fn test_group_orders() {
        let db = StandardDatabase::new();
        let order = |number: i32| db.entries()[(number - 1) as usize].operations.len();
        assert_eq!(order(225), 192);
        assert_eq!(order(227), 192);
        assert_eq!(order(194), 24);
        assert_eq!(order(166), 36);
        assert_eq!(order(14), 4);
    }

    #[test]
    fn test_lookup_by_hall_number() {
        let db = StandardDatabase::new();
        let t = db.spacegroup_type(523).unwrap();
        assert_eq!(t.number, 225);
        assert_eq!(t.international, "Fm-3m");
        assert_eq!(t.schoenflies, "Oh^5");
        assert_eq!(t.pointgroup, "m-3m");
        assert!(db.spacegroup_type(0).is_none());

        let sym = db.symmetry(488).unwrap();
        assert_eq!(sym.len(), 24);
        assert!(sym.operations.iter().all(|op| op.translation.iter().all(|t| (0.0..1.0).contains(t))));
    }
}
