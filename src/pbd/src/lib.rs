//! Position-based particle dynamics: Verlet integration, iterative
//! distance-constraint relaxation, analytic collider resolution.

pub mod character;
pub mod cloth;
pub mod collider;
pub mod constraint;
pub mod model;
pub mod object;
pub mod particle;
pub mod rope;
pub mod solver;
pub mod world;

pub type V3 = nalgebra::Vector3<f32>;
