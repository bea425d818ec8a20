use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::V3;

/// Shared handle to one object's particle buffer. Connector constraints
/// hold clones of two different handles, so either object can be dropped
/// without dangling the other side.
pub type BufRef = Arc<RwLock<ParticleBuffer>>;

/// Parallel per-particle arrays for one simulated object. All vectors have
/// equal length, fixed at construction.
pub struct ParticleBuffer {
	pub positions: Vec<V3>,
	pub old_positions: Vec<V3>,
	pub velocities: Vec<V3>,
	pub accelerations: Vec<V3>,
	pub masses: Vec<f32>,
	pub movables: Vec<bool>,
}

impl ParticleBuffer {
	pub fn new(
		positions: Vec<V3>,
		masses: Vec<f32>,
		movables: Vec<bool>,
	) -> Self {
		debug_assert_eq!(positions.len(), masses.len());
		debug_assert_eq!(positions.len(), movables.len());
		let mut masses = masses;
		let mut movables = movables;
		for (i, m) in masses.iter_mut().enumerate() {
			if !(m.is_finite() && *m > 0f32) {
				warn!("particle {} has mass {}, pinning it", i, m);
				*m = 1f32;
				movables[i] = false;
			}
		}
		let n = positions.len();
		Self {
			old_positions: positions.clone(),
			positions,
			velocities: vec![V3::zeros(); n],
			accelerations: vec![V3::zeros(); n],
			masses,
			movables,
		}
	}

	pub fn new_ref(
		positions: Vec<V3>,
		masses: Vec<f32>,
		movables: Vec<bool>,
	) -> BufRef {
		Arc::new(RwLock::new(Self::new(positions, masses, movables)))
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Accumulate a uniform external force, scaled by each particle's mass.
	/// Accelerations are consumed by integration, so forces must be
	/// re-applied every sub-step.
	pub fn add_force(&mut self, direction: V3) {
		for i in 0..self.positions.len() {
			self.accelerations[i] += direction / self.masses[i];
		}
	}

	/// Snap every particle back to a rest layout and clear all motion
	/// state. `old_positions` follows `positions` so the next step runs
	/// the integration bootstrap cleanly.
	pub fn reset_positions(&mut self, rest: &[V3]) {
		debug_assert_eq!(rest.len(), self.positions.len());
		self.positions.copy_from_slice(rest);
		self.old_positions.copy_from_slice(rest);
		for v in self.velocities.iter_mut() {
			*v = V3::zeros();
		}
		for a in self.accelerations.iter_mut() {
			*a = V3::zeros();
		}
	}
}
