use crate::collider::ColliderRef;
use crate::model::PhysicalModel;
use crate::object::PbdObject;
use crate::particle::BufRef;
use crate::solver::IntegrationScheme;
use crate::V3;

const PARTICLES_PER_ROPE: usize = 10;

/// A row of ropes plus the proximity query that connector constraints
/// are built from.
pub struct RopeManager {
	ropes: Vec<PbdObject>,
}

impl RopeManager {
	/// `count` ropes of ten particles each, spaced `size` apart along
	/// the rope and hung in a row starting at `anchor`.
	pub fn new(
		count: usize,
		size: f32,
		anchor: V3,
		scheme: IntegrationScheme,
	) -> Self {
		let rope_gap = 12. * size;
		let ropes = (0..count)
			.map(|i| {
				let row_anchor = anchor - V3::new(i as f32 * rope_gap, 0., 0.);
				PbdObject::from_model(
					PhysicalModel::rope(PARTICLES_PER_ROPE, size, row_anchor),
					scheme,
				)
			})
			.collect();
		Self { ropes }
	}

	/// Nearest rope particle within `threshold` of `pos` across every
	/// rope, as an index into the returned buffer. `None` when nothing
	/// qualifies.
	pub fn closest_particle(
		&self,
		pos: V3,
		threshold: f32,
	) -> Option<(usize, BufRef)> {
		let mut best: Option<(usize, BufRef)> = None;
		let mut best_distance = threshold;
		for rope in self.ropes.iter() {
			let buffer = rope.buffer();
			let buf = buffer.read().unwrap();
			for (i, p) in buf.positions.iter().enumerate() {
				let dist = (pos - p).norm();
				if dist < best_distance {
					best_distance = dist;
					best = Some((i, rope.buffer()));
				}
			}
		}
		best
	}

	/// Gravity plus one sub-step for every rope.
	pub fn time_step(&mut self, gravity: V3, dt: f32) {
		for rope in self.ropes.iter_mut() {
			rope.add_force(gravity);
			rope.time_step(dt, false);
		}
	}

	pub fn reinitialize(&mut self, scheme: IntegrationScheme) {
		for rope in self.ropes.iter_mut() {
			rope.reinitialize(scheme);
		}
	}

	pub fn set_colliders(&mut self, colliders: Vec<ColliderRef>) {
		for rope in self.ropes.iter_mut() {
			rope.solver.set_colliders(colliders.clone());
		}
	}

	pub fn set_constraint_iterations(&mut self, iterations: usize) {
		for rope in self.ropes.iter_mut() {
			rope.solver.set_constraint_iterations(iterations);
		}
	}

	pub fn set_drag_constant(&mut self, drag_constant: f32) {
		for rope in self.ropes.iter_mut() {
			rope.solver.set_drag_constant(drag_constant);
		}
	}

	pub fn ropes(&self) -> &[PbdObject] {
		&self.ropes
	}
}
