// src/lib.rs
//
// Crystal symmetry detection: space-group operations, space-group type,
// primitive and standardized cells, Wyckoff positions and irreducible
// k-point meshes.

pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod physics;
pub mod utils;

pub use config::{AngleTolerance, SymmetryConfig};
pub use database::{SpacegroupDatabase, StandardDatabase};
pub use error::{PrimitiveError, Result, SymmetryError};
pub use model::{Cell, Dataset, Operation, RotationSet, Spacegroup, SpacegroupType, Symmetry};
pub use physics::kmesh::{
    bz_grid_points_by_rotations, bz_triplets_at_q, grid_address, grid_point_index, grid_points_by_rotations,
    ir_triplets_at_q, neighboring_grid_points, relocate_bz_grid_address, BzGrid, MeshReduction, TripletReduction,
};
pub use physics::operations::reduction::ReducedLattice;
pub use utils::linalg::IMat3;

use log::{debug, error};
use physics::analysis::{pointgroup, search, symmetry};
use physics::operations::{primitive, reduction};

fn config_for(symprec: f64, angle_tolerance: AngleTolerance) -> SymmetryConfig {
    SymmetryConfig {
        symprec,
        angle_tolerance,
        ..Default::default()
    }
}

// =========================================================================
// 1. DATASET AND OPERATIONS
// =========================================================================

/// Full symmetry dataset. Exhausting the tolerance search is not an error:
/// the result then has space-group number 0.
pub fn find_symmetry_dataset(cell: &Cell, symprec: f64, angle_tolerance: AngleTolerance) -> Result<Dataset> {
    find_symmetry_dataset_with_config(cell, &config_for(symprec, angle_tolerance), &StandardDatabase::new())
}

pub fn find_symmetry_dataset_with_config(
    cell: &Cell,
    config: &SymmetryConfig,
    database: &dyn SpacegroupDatabase,
) -> Result<Dataset> {
    search::find_dataset(cell, config, database)
}

/// Space-group operations of `cell` as found, without database idealization
pub fn find_symmetry_operations(
    cell: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
    max_operations: Option<usize>,
) -> Result<Symmetry> {
    let config = SymmetryConfig {
        max_operations,
        ..config_for(symprec, angle_tolerance)
    };
    find_symmetry_operations_with_config(cell, &config)
}

pub fn find_symmetry_operations_with_config(cell: &Cell, config: &SymmetryConfig) -> Result<Symmetry> {
    cell.validate()?;
    config.validate()?;
    let found = symmetry::find_operations(cell, config.symprec, config.angle_tolerance);
    if let Some(max) = config.max_operations {
        if found.len() > max {
            error!("found {} symmetry operations, capacity is {}", found.len(), max);
            return Err(SymmetryError::CapacityExceeded { found: found.len(), max });
        }
    }
    Ok(found)
}

/// Operations that also map every atom onto one with the same collinear
/// spin. A cell without spins behaves like [`find_symmetry_operations`].
pub fn find_symmetry_operations_with_spin(
    cell: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
    max_operations: Option<usize>,
) -> Result<Symmetry> {
    if cell.spins.is_none() {
        debug!("spin-constrained search on a cell without spins");
    }
    find_symmetry_operations(cell, symprec, angle_tolerance, max_operations)
}

/// Number of symmetry operations of `cell`
pub fn get_multiplicity(cell: &Cell, symprec: f64, angle_tolerance: AngleTolerance) -> Result<usize> {
    find_symmetry_operations(cell, symprec, angle_tolerance, None).map(|s| s.len())
}

/// Copies operations into caller-provided fixed-size buffers. Returns the
/// number copied, or 0 when they do not fit.
pub fn copy_operations_into(symmetry: &Symmetry, rotations: &mut [IMat3], translations: &mut [[f64; 3]]) -> usize {
    let capacity = rotations.len().min(translations.len());
    if symmetry.len() > capacity {
        error!(
            "buffer holds {} operations, {} were found",
            capacity,
            symmetry.len()
        );
        return 0;
    }
    for (i, op) in symmetry.operations.iter().enumerate() {
        rotations[i] = op.rotation;
        translations[i] = op.translation;
    }
    symmetry.len()
}

// =========================================================================
// 2. CELLS
// =========================================================================

/// Primitive cell of `cell`; `None` when the input is already primitive.
/// A finder that fails at every tolerance gives `Err(PrimitiveNotFound)`.
pub fn reduce_to_primitive_cell(cell: &Cell, symprec: f64, angle_tolerance: AngleTolerance) -> Result<Option<Cell>> {
    reduce_to_primitive_cell_with_config(cell, &config_for(symprec, angle_tolerance))
}

pub fn reduce_to_primitive_cell_with_config(cell: &Cell, config: &SymmetryConfig) -> Result<Option<Cell>> {
    cell.validate()?;
    config.validate()?;
    let found = primitive::find_primitive(cell, config.symprec, config)?;
    debug!("primitive cell has {} of {} atoms", found.cell.len(), cell.len());
    Ok((!found.is_primitive).then_some(found.cell))
}

/// Idealized conventional cell; `None` when no space group is found
pub fn refine_cell(cell: &Cell, symprec: f64, angle_tolerance: AngleTolerance) -> Result<Option<Cell>> {
    refine_cell_with_config(cell, &config_for(symprec, angle_tolerance), &StandardDatabase::new())
}

pub fn refine_cell_with_config(
    cell: &Cell,
    config: &SymmetryConfig,
    database: &dyn SpacegroupDatabase,
) -> Result<Option<Cell>> {
    Ok(search::search(cell, config, database)?.map(|outcome| outcome.refinement.standardized_cell))
}

/// Delaunay-reduced lattice (columns are basis vectors)
pub fn smallest_lattice(lattice: &[[f64; 3]; 3], symprec: f64) -> Option<ReducedLattice> {
    reduction::delaunay_reduce(lattice, symprec)
}

/// Niggli-reduced lattice (columns are basis vectors)
pub fn niggli_reduce(lattice: &[[f64; 3]; 3], eps: f64) -> Option<ReducedLattice> {
    reduction::niggli_reduce(lattice, eps)
}

// =========================================================================
// 3. SPACE-GROUP TYPE
// =========================================================================

/// International short symbol and number
pub fn identify_spacegroup(
    cell: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
) -> Result<Option<(String, i32)>> {
    let ds = find_symmetry_dataset(cell, symprec, angle_tolerance)?;
    Ok(ds.is_found().then(|| (ds.international_symbol, ds.spacegroup_number)))
}

/// Schoenflies symbol and number
pub fn identify_spacegroup_schoenflies(
    cell: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
) -> Result<Option<(String, i32)>> {
    let ds = find_symmetry_dataset(cell, symprec, angle_tolerance)?;
    Ok(ds.is_found().then(|| (ds.schoenflies, ds.spacegroup_number)))
}

/// Point-group symbol and the transformation to its conventional axes
pub fn get_pointgroup(rotations: &[IMat3]) -> Option<(String, IMat3)> {
    pointgroup::get_pointgroup(rotations).map(|(pg, t)| (pg.symbol.to_string(), t))
}

pub fn get_symmetry_from_database(hall_number: i32) -> Option<Symmetry> {
    StandardDatabase::new().symmetry(hall_number)
}

pub fn get_spacegroup_type(hall_number: i32) -> Option<SpacegroupType> {
    StandardDatabase::new().spacegroup_type(hall_number)
}

// =========================================================================
// 4. K-POINT MESHES
// =========================================================================

/// Irreducible k-points of a mesh under the symmetry of `cell`
pub fn reduce_irreducible_mesh(
    mesh: [i32; 3],
    shift: [i32; 3],
    time_reversal: bool,
    cell: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
) -> Result<MeshReduction> {
    reduce_irreducible_mesh_with_config(
        mesh,
        shift,
        time_reversal,
        cell,
        &config_for(symprec, angle_tolerance),
        &StandardDatabase::new(),
    )
}

pub fn reduce_irreducible_mesh_with_config(
    mesh: [i32; 3],
    shift: [i32; 3],
    time_reversal: bool,
    cell: &Cell,
    config: &SymmetryConfig,
    database: &dyn SpacegroupDatabase,
) -> Result<MeshReduction> {
    physics::kmesh::reduce_irreducible_mesh(mesh, shift, time_reversal, cell, config, database)
}

/// Mesh folded by the given real-space rotations, restricted to those that
/// preserve `qpoints` when any are given
pub fn reduce_stabilized_mesh(
    mesh: [i32; 3],
    shift: [i32; 3],
    time_reversal: bool,
    rotations: &[IMat3],
    qpoints: &[[f64; 3]],
) -> Result<MeshReduction> {
    physics::kmesh::reduce_stabilized_mesh(mesh, shift, time_reversal, rotations, qpoints)
}
