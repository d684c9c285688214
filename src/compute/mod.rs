//! Compute layer: geometric predicates and input validation.
//!
//! Nothing here touches the index structures; these are pure functions over
//! vertices and coordinates.

pub mod ray_cast;
pub mod validation;
