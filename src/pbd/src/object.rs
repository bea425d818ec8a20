use tracing::info;

use protocol::pr_model::{PrConstraint, PrModel, PrParticle};

use crate::constraint::DistanceConstraint;
use crate::model::PhysicalModel;
use crate::particle::{BufRef, ParticleBuffer};
use crate::solver::{IntegrationScheme, Solver};
use crate::V3;

/// One particle network: owns its buffer, its constraint list, and the
/// solver that advances it. Constraints appended past the base topology
/// are connectors and can be dropped in bulk.
pub struct PbdObject {
	particles: BufRef,
	constraints: Vec<DistanceConstraint>,
	base_constraints: usize,
	rest_positions: Vec<V3>,
	pub solver: Solver,
}

impl PbdObject {
	pub fn from_model(model: PhysicalModel, scheme: IntegrationScheme) -> Self {
		info!(
			"object: {} particles, {} edges",
			model.positions.len(),
			model.edges.len()
		);
		let rest_positions = model.positions.clone();
		let particles = ParticleBuffer::new_ref(
			model.positions,
			model.masses,
			model.movables,
		);
		let constraints: Vec<_> = model
			.edges
			.into_iter()
			.map(|(p1, p2)| {
				DistanceConstraint::new(
					p1,
					particles.clone(),
					p2,
					particles.clone(),
				)
			})
			.collect();
		let base_constraints = constraints.len();
		let solver = Solver::new(scheme, particles.clone());
		Self {
			particles,
			constraints,
			base_constraints,
			rest_positions,
			solver,
		}
	}

	/// Advance one simulation sub-step.
	pub fn time_step(&mut self, dt: f32, drag_enabled: bool) {
		self.solver.step(dt, drag_enabled, &self.constraints);
	}

	/// Uniform external force (e.g. gravity), consumed by the next step.
	pub fn add_force(&mut self, direction: V3) {
		self.particles.write().unwrap().add_force(direction);
	}

	/// Back to the rest layout with cleared motion state. Constraints
	/// keep the rest distances measured at original construction.
	pub fn reinitialize(&mut self, scheme: IntegrationScheme) {
		self.solver.set_integration_scheme(scheme);
		self.solver.set_to_first_time_step();
		self.particles
			.write()
			.unwrap()
			.reset_positions(&self.rest_positions);
	}

	/// Intra-object edge, rest distance measured from current separation.
	pub fn make_constraint(&mut self, p1: usize, p2: usize) {
		self.constraints.push(DistanceConstraint::new(
			p1,
			self.particles.clone(),
			p2,
			self.particles.clone(),
		));
	}

	/// Cross-object connector with an explicit rest distance.
	pub fn connect(&mut self, p: usize, other: BufRef, q: usize, rest: f32) {
		self.constraints.push(DistanceConstraint::new_with_rest(
			p,
			self.particles.clone(),
			q,
			other,
			rest,
		));
	}

	/// Drop every constraint appended after the base topology.
	pub fn remove_connectors(&mut self) {
		self.constraints.truncate(self.base_constraints);
	}

	pub fn buffer(&self) -> BufRef {
		self.particles.clone()
	}

	pub fn len(&self) -> usize {
		self.particles.read().unwrap().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn position(&self, i: usize) -> V3 {
		self.particles.read().unwrap().positions[i]
	}

	pub fn constraint_count(&self) -> usize {
		self.constraints.len()
	}

	pub fn base_constraint_count(&self) -> usize {
		self.base_constraints
	}

	pub fn pr_particles(&self) -> Vec<PrParticle> {
		self.particles
			.read()
			.unwrap()
			.positions
			.iter()
			.map(|p| PrParticle {
				pos: [p.x, p.y, p.z],
			})
			.collect()
	}

	/// Drawable edges. Connectors reference a foreign buffer, so their
	/// second index means nothing to a per-object view and they are left
	/// out.
	pub fn pr_constraints(&self) -> Vec<PrConstraint> {
		self.constraints
			.iter()
			.filter(|c| !c.is_connector())
			.map(|c| {
				let (p1, p2) = c.endpoints();
				PrConstraint {
					particles: [p1, p2],
				}
			})
			.collect()
	}

	pub fn pr_model(&self) -> PrModel {
		PrModel {
			particles: self.pr_particles(),
			constraints: self.pr_constraints(),
		}
	}
}
