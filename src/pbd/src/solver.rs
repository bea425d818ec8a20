use tracing::warn;

use crate::collider::ColliderRef;
use crate::constraint::DistanceConstraint;
use crate::particle::BufRef;
use crate::V3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationScheme {
	Verlet,
	// declared for scheme selection, pipelines not implemented yet
	ForwardEuler,
	SemiImplicitEuler,
	Leapfrog,
}

/// Runs the per-step pipeline over one object's particle buffer:
/// integrate, relax constraints, resolve collisions, rebuild velocities.
pub struct Solver {
	particles: BufRef,
	colliders: Vec<ColliderRef>,
	scheme: IntegrationScheme,
	constraint_iterations: usize,
	drag_constant: f32,
	first_step: bool,
	scheme_warned: bool,
}

impl Solver {
	pub fn new(scheme: IntegrationScheme, particles: BufRef) -> Self {
		Self {
			particles,
			colliders: Vec::new(),
			scheme,
			constraint_iterations: 2,
			drag_constant: 0f32,
			first_step: true,
			scheme_warned: false,
		}
	}

	pub fn set_colliders(&mut self, colliders: Vec<ColliderRef>) {
		self.colliders = colliders;
	}

	pub fn set_constraint_iterations(&mut self, iterations: usize) {
		debug_assert!(iterations >= 1);
		self.constraint_iterations = iterations.max(1);
	}

	pub fn set_drag_constant(&mut self, drag_constant: f32) {
		debug_assert!(drag_constant >= 0f32);
		self.drag_constant = drag_constant.max(0f32);
	}

	pub fn set_integration_scheme(&mut self, scheme: IntegrationScheme) {
		self.scheme = scheme;
	}

	/// Re-arm the bootstrap step, used on reinitialization. Verlet needs
	/// two known positions, so the step after this one seeds the second
	/// from velocity.
	pub fn set_to_first_time_step(&mut self) {
		self.first_step = true;
	}

	pub fn step(
		&mut self,
		dt: f32,
		drag_enabled: bool,
		constraints: &[DistanceConstraint],
	) {
		debug_assert!(dt > 0f32);
		if dt <= 0f32 {
			return;
		}
		if self.scheme != IntegrationScheme::Verlet && !self.scheme_warned {
			warn!(
				"integration scheme {:?} is not implemented, running verlet",
				self.scheme
			);
			self.scheme_warned = true;
		}
		self.evaluate_verlet(dt, drag_enabled, constraints);
	}

	fn evaluate_verlet(
		&mut self,
		dt: f32,
		drag_enabled: bool,
		constraints: &[DistanceConstraint],
	) {
		self.integrate(dt, drag_enabled);

		for _ in 0..self.constraint_iterations {
			for constraint in constraints {
				constraint.solve();
			}
		}

		self.resolve_collisions();
		self.rebuild_velocities(dt);
	}

	fn integrate(&mut self, dt: f32, drag_enabled: bool) {
		let mut buf = self.particles.write().unwrap();
		let buf = &mut *buf;
		if self.first_step {
			// semi-implicit Euler bootstrap; old_positions stays put so
			// the next Verlet step sees the implied velocity
			for i in 0..buf.positions.len() {
				if !buf.movables[i] {
					continue;
				}
				buf.velocities[i] += buf.accelerations[i] * dt;
				let v = buf.velocities[i];
				buf.positions[i] += v * dt;
				buf.accelerations[i] = V3::zeros();
			}
			self.first_step = false;
		} else {
			let damp = if drag_enabled {
				1f32 - self.drag_constant
			} else {
				1f32
			};
			for i in 0..buf.positions.len() {
				if !buf.movables[i] {
					continue;
				}
				let pos = buf.positions[i];
				let new_pos = pos
					+ (pos - buf.old_positions[i]) * damp
					+ buf.accelerations[i] * dt * dt;
				buf.old_positions[i] = pos;
				buf.positions[i] = new_pos;
				buf.accelerations[i] = V3::zeros();
			}
		}
	}

	fn resolve_collisions(&self) {
		let mut buf = self.particles.write().unwrap();
		for pos in buf.positions.iter_mut() {
			for collider in self.colliders.iter() {
				let collider = collider.read().unwrap();
				// inactive colliders are skipped outright
				if collider.is_active() {
					collider.handle_collision(pos);
				}
			}
		}
	}

	/// Derive velocity from the realized displacement so it stays
	/// consistent with the constraint- and collision-corrected positions.
	fn rebuild_velocities(&self, dt: f32) {
		let mut buf = self.particles.write().unwrap();
		let buf = &mut *buf;
		for i in 0..buf.positions.len() {
			if buf.movables[i] {
				buf.velocities[i] =
					(buf.positions[i] - buf.old_positions[i]) / dt;
			}
		}
	}
}
