//src/model/mod.rs
pub mod cell;
pub mod dataset;
pub mod symmetry;

// Re-exports for cleaner imports
pub use cell::Cell;
pub use dataset::{Dataset, Spacegroup, SpacegroupType};
pub use symmetry::{Operation, RotationSet, Symmetry};
