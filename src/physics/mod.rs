//src/physics/mod.rs
pub mod analysis;
pub mod kmesh;
pub mod operations;
