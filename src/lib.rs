//! Simplicial topology engine: canonical (hash-consed) vertices, edges,
//! triangles and tetrahedra with explicit ownership counts and cascading
//! cleanup of unused entities.

pub mod arena;
pub mod flip;
pub mod mesh;
pub mod repository;
pub mod sign;
pub mod simplex;
pub mod topology;

mod factory;
