// src/physics/analysis/search.rs

use crate::config::SymmetryConfig;
use crate::database::SpacegroupDatabase;
use crate::error::Result;
use crate::model::cell::Cell;
use crate::model::dataset::Dataset;
use crate::physics::analysis::refinement::{self, Refinement};
use crate::physics::analysis::spacegroup::{self, SpacegroupMatch};
use crate::physics::operations::primitive::{self, PrimitiveCell};
use log::{debug, warn};

/// Primitive cell, match and refinement of one successful attempt
pub struct SearchOutcome<'a> {
    pub primitive: PrimitiveCell,
    pub matched: SpacegroupMatch<'a>,
    pub refinement: Refinement,
}

/// Runs the primitive finder, matcher and refinement, shrinking the
/// tolerance after every failed stage. `Ok(None)` when all attempts fail.
pub fn search<'a>(
    cell: &Cell,
    config: &SymmetryConfig,
    database: &'a dyn SpacegroupDatabase,
) -> Result<Option<SearchOutcome<'a>>> {
    cell.validate()?;
    config.validate()?;

    let mut tolerance = config.symprec;
    for attempt in 0..config.max_attempts {
        let prim = match primitive::find_primitive(cell, tolerance, config) {
            Ok(p) => p,
            Err(e) => {
                debug!("attempt {}: primitive search failed at {:.3e}: {}", attempt, tolerance, e);
                tolerance *= config.reduce_rate;
                continue;
            }
        };

        let converged = prim.tolerance;
        let Some(matched) = spacegroup::match_spacegroup(&prim.cell, converged, config.angle_tolerance, database)
        else {
            debug!("attempt {}: no space group at {:.3e}", attempt, converged);
            tolerance = converged * config.reduce_rate;
            continue;
        };

        match refinement::refine(cell, &prim, &matched, database, converged) {
            Some(refinement) => {
                debug!(
                    "attempt {}: {} ({}) at {:.3e}",
                    attempt, matched.entry.international, matched.entry.number, converged
                );
                return Ok(Some(SearchOutcome {
                    primitive: prim,
                    matched,
                    refinement,
                }));
            }
            None => {
                debug!("attempt {}: refinement failed at {:.3e}", attempt, converged);
                tolerance = converged * config.reduce_rate;
            }
        }
    }

    warn!(
        "symmetry search exhausted {} attempts starting from {:.3e}",
        config.max_attempts, config.symprec
    );
    Ok(None)
}

/// Symmetry dataset of `cell`; the empty dataset when the search is exhausted
pub fn find_dataset(cell: &Cell, config: &SymmetryConfig, database: &dyn SpacegroupDatabase) -> Result<Dataset> {
    let Some(outcome) = search(cell, config, database)? else {
        return Ok(Dataset::empty());
    };
    Ok(build_dataset(outcome))
}

fn build_dataset(outcome: SearchOutcome<'_>) -> Dataset {
    let SearchOutcome {
        primitive,
        refinement,
        ..
    } = outcome;
    let sg = refinement.spacegroup;
    let kind = sg.kind;
    Dataset {
        spacegroup_number: kind.number,
        hall_number: kind.hall_number,
        hall_symbol: kind.hall_symbol,
        international_symbol: kind.international,
        international_full: kind.international_full,
        schoenflies: kind.schoenflies,
        setting: kind.setting,
        pointgroup: kind.pointgroup,
        transformation_matrix: sg.transformation_matrix,
        origin_shift: sg.origin_shift,
        bravais_lattice: sg.bravais_lattice,
        rotations: refinement.operations.rotations(),
        translations: refinement.operations.translations(),
        wyckoffs: refinement.wyckoffs,
        equivalent_atoms: refinement.equivalent_atoms,
        mapping_to_primitive: primitive.mapping_table,
        symprec: primitive.tolerance,
        standardized_cell: Some(refinement.standardized_cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{HallEntry, StandardDatabase, WyckoffPosition};
    use crate::error::SymmetryError;

    /// Database without entries: every match fails
    struct EmptyDatabase;

    impl SpacegroupDatabase for EmptyDatabase {
        fn entries(&self) -> &[HallEntry] {
            &[]
        }

        fn wyckoff_positions(&self, _number: i32) -> Option<&[WyckoffPosition]> {
            None
        }
    }

    fn fcc() -> Cell {
        Cell::new(
            [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]],
            vec![[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]],
            vec![1; 4],
        )
    }

    #[test]
    fn test_fcc_dataset() {
        let ds = find_dataset(&fcc(), &SymmetryConfig::default(), &StandardDatabase::new()).unwrap();
        assert!(ds.is_found());
        assert_eq!(ds.spacegroup_number, 225);
        assert_eq!(ds.hall_number, 523);
        assert_eq!(ds.international_symbol, "Fm-3m");
        assert_eq!(ds.pointgroup, "m-3m");
        assert_eq!(ds.n_operations(), 192);
        assert_eq!(ds.rotations[0], crate::utils::linalg::IDENTITY);
        assert_eq!(ds.mapping_to_primitive, vec![0; 4]);
        assert_eq!(ds.wyckoffs.len(), 4);
        assert_eq!(ds.equivalent_atoms.len(), 4);
        assert!(ds.standardized_cell.is_some());
    }

    #[test]
    fn test_exhaustion_gives_empty_dataset() {
        let config = SymmetryConfig {
            max_attempts: 3,
            ..Default::default()
        };
        let ds = find_dataset(&fcc(), &config, &EmptyDatabase).unwrap();
        assert!(!ds.is_found());
        assert_eq!(ds.n_operations(), 0);
        assert!(ds.wyckoffs.is_empty());
    }

    #[test]
    fn test_degenerate_lattice_is_rejected() {
        let cell = Cell::new(
            [[1.0, 2.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            vec![[0.0; 3]],
            vec![1],
        );
        let err = find_dataset(&cell, &SymmetryConfig::default(), &StandardDatabase::new());
        assert!(matches!(err, Err(SymmetryError::DegenerateLattice { .. })));
    }

    #[test]
    fn test_invalid_tolerance_is_rejected() {
        let config = SymmetryConfig::with_symprec(-1.0);
        let err = find_dataset(&fcc(), &config, &StandardDatabase::new());
        assert_eq!(err.unwrap_err(), SymmetryError::InvalidTolerance(-1.0));
    }
}
