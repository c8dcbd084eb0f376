//src/physics/analysis/mod.rs
pub mod pointgroup;
pub mod refinement;
pub mod search;
pub mod spacegroup;
pub mod symmetry;
