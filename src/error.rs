// src/error.rs

use thiserror::Error;

/// Failures raised before or during a symmetry search.
///
/// Running out of tolerance-relaxation attempts is not an error: it produces an
/// empty [`Dataset`](crate::model::dataset::Dataset) with space-group number 0.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymmetryError {
    #[error("Cell contains no atoms")]
    EmptyCell,

    #[error("Cell arrays disagree in length: {positions} positions, {types} types, {spins} spins")]
    LengthMismatch {
        positions: usize,
        types: usize,
        spins: usize,
    },

    /// Lattice volume vanishes relative to the product of the basis lengths.
    #[error("Lattice is degenerate (determinant {det:.3e})")]
    DegenerateLattice { det: f64 },

    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("Found {found} symmetry operations, capacity is {max}")]
    CapacityExceeded { found: usize, max: usize },

    #[error("Mesh subdivisions must be positive, got {0:?}")]
    InvalidMesh([i32; 3]),

    #[error("Half-grid shift must be 0 or 1 on every axis, got {0:?}")]
    InvalidShift([i32; 3]),

    #[error("Grid point {grid_point} is outside a mesh of {size} points")]
    InvalidGridPoint { grid_point: usize, size: usize },

    /// Every tolerance attempt of the primitive-cell finder failed.
    #[error("No primitive cell found: {0}")]
    PrimitiveNotFound(#[from] PrimitiveError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Raised by the primitive-cell finder when no consistent sublattice exists at
/// the requested tolerance. The caller shrinks the tolerance and retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrimitiveError {
    #[error("Atom count {atoms} is not divisible by lattice multiplicity {multiplicity}")]
    IndivisibleMultiplicity { atoms: usize, multiplicity: usize },

    #[error("No primitive basis spans the {multiplicity} pure translations")]
    NoPrimitiveBasis { multiplicity: usize },

    #[error("Atom classes do not all have {multiplicity} members")]
    InconsistentClasses { multiplicity: usize },
}

pub type Result<T> = std::result::Result<T, SymmetryError>;
