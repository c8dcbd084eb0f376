//src/physics/operations/mod.rs
pub mod primitive;
pub mod reduction;
