use fnv::FnvHashMap;

use protocol::pr_model::PrModel;

use crate::collider::ColliderRef;
use crate::object::PbdObject;
use crate::solver::IntegrationScheme;
use crate::V3;

/// Explicit simulation context: an object registry, the shared collider
/// list, and the frame-loop configuration. Drivers own one of these
/// instead of scattering scene state in globals.
pub struct World {
	pub dt: f32,
	pub steps_per_frame: usize,
	gravity: V3,
	constraint_iterations: usize,
	drag_constant: f32,
	drag_enabled: bool,

	id_alloc: usize,
	objects: FnvHashMap<usize, PbdObject>,
	colliders: Vec<ColliderRef>,
}

impl Default for World {
	fn default() -> Self {
		Self {
			dt: 0.008,
			steps_per_frame: 3,
			gravity: V3::new(0., -9.81, 0.),
			constraint_iterations: 2,
			drag_constant: 0f32,
			drag_enabled: false,
			id_alloc: 0,
			objects: FnvHashMap::default(),
			colliders: Vec::new(),
		}
	}
}

impl World {
	pub fn with_dt(mut self, dt: f32) -> Self {
		self.dt = dt;
		self
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_steps_per_frame(mut self, steps: usize) -> Self {
		self.steps_per_frame = steps;
		self
	}

	pub fn with_constraint_iterations(mut self, iterations: usize) -> Self {
		self.constraint_iterations = iterations;
		self
	}

	pub fn with_drag_constant(mut self, drag_constant: f32) -> Self {
		self.drag_constant = drag_constant;
		self.drag_enabled = drag_constant > 0f32;
		self
	}

	pub fn set_drag_enabled(&mut self, on: bool) {
		self.drag_enabled = on;
	}

	/// Register a shared collider handle; every object present and
	/// future sees it.
	pub fn add_collider(&mut self, collider: ColliderRef) {
		self.colliders.push(collider);
		for object in self.objects.values_mut() {
			object.solver.set_colliders(self.colliders.clone());
		}
	}

	/// Wire the world's colliders and solver knobs into the object and
	/// hand back its id.
	pub fn add_object(&mut self, mut object: PbdObject) -> usize {
		object.solver.set_colliders(self.colliders.clone());
		object
			.solver
			.set_constraint_iterations(self.constraint_iterations);
		object.solver.set_drag_constant(self.drag_constant);
		let id = self.id_alloc;
		self.id_alloc += 1;
		self.objects.insert(id, object);
		id
	}

	pub fn remove_object(&mut self, id: usize) -> Option<PbdObject> {
		self.objects.remove(&id)
	}

	pub fn object(&self, id: usize) -> Option<&PbdObject> {
		self.objects.get(&id)
	}

	pub fn object_mut(&mut self, id: usize) -> Option<&mut PbdObject> {
		self.objects.get_mut(&id)
	}

	pub fn len(&self) -> usize {
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}

	/// One frame: gravity plus a sub-step for every object, repeated
	/// `steps_per_frame` times.
	pub fn step(&mut self) {
		for _ in 0..self.steps_per_frame {
			for object in self.objects.values_mut() {
				object.add_force(self.gravity);
				object.time_step(self.dt, self.drag_enabled);
			}
		}
	}

	pub fn reinitialize(&mut self, scheme: IntegrationScheme) {
		for object in self.objects.values_mut() {
			object.reinitialize(scheme);
		}
	}

	/// Snapshot of every object for rendering, particle ids shifted into
	/// one shared index space, ordered by object id.
	pub fn pr_model(&self) -> PrModel {
		let mut model = PrModel::default();
		let mut ids: Vec<_> = self.objects.keys().copied().collect();
		ids.sort_unstable();
		for id in ids {
			let object = &self.objects[&id];
			let offset = model.particles.len();
			model.particles.extend(object.pr_particles());
			for mut con in object.pr_constraints() {
				con.particles[0] += offset;
				con.particles[1] += offset;
				model.constraints.push(con);
			}
		}
		model
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::collider::Collider;
	use crate::model::PhysicalModel;

	fn chain_world() -> World {
		let mut world = World::default().with_steps_per_frame(1);
		world.add_object(PbdObject::from_model(
			PhysicalModel::chain(8, 0.5, V3::zeros()),
			IntegrationScheme::Verlet,
		));
		world
	}

	#[test]
	fn ids_allocate_monotonically() {
		let mut world = World::default();
		let a = world.add_object(PbdObject::from_model(
			PhysicalModel::rope(4, 1., V3::zeros()),
			IntegrationScheme::Verlet,
		));
		let b = world.add_object(PbdObject::from_model(
			PhysicalModel::rope(4, 1., V3::zeros()),
			IntegrationScheme::Verlet,
		));
		assert_ne!(a, b);
		assert!(world.object(a).is_some());
		assert!(world.remove_object(a).is_some());
		assert!(world.object(a).is_none());
		assert!(world.object(b).is_some());
	}

	#[test]
	fn step_stretches_chain_under_load() {
		let mut world = chain_world();
		for _ in 0..100 {
			world.step();
		}
		let object = world.object(0).unwrap();
		// the loaded chain hangs at or slightly past its rest length
		assert!(object.position(7).y <= -3.4);
		// anchored head stays
		assert_eq!(object.position(0), V3::zeros());
	}

	#[test]
	fn colliders_reach_existing_objects() {
		let mut world = chain_world();
		// floor right under the anchor; added after the object
		world.add_collider(
			Collider::plane(V3::new(0., -1., 0.), V3::new(0., 1., 0.)).build(),
		);
		for _ in 0..300 {
			world.step();
		}
		let object = world.object(0).unwrap();
		let buffer = object.buffer();
		let buf = buffer.read().unwrap();
		for p in buf.positions.iter() {
			assert!(p.y >= -1. - 1e-4);
		}
	}

	#[test]
	fn pr_model_offsets_ids() {
		let mut world = World::default();
		world.add_object(PbdObject::from_model(
			PhysicalModel::rope(4, 1., V3::zeros()),
			IntegrationScheme::Verlet,
		));
		world.add_object(PbdObject::from_model(
			PhysicalModel::rope(3, 1., V3::zeros()),
			IntegrationScheme::Verlet,
		));
		let model = world.pr_model();
		assert_eq!(model.particles.len(), 7);
		assert_eq!(model.constraints.len(), 5);
		// the second object's edges index past the first object
		assert!(model
			.constraints
			.iter()
			.any(|c| c.particles[0] >= 4 || c.particles[1] >= 4));
		assert!(model
			.constraints
			.iter()
			.all(|c| c.particles[0] < 7 && c.particles[1] < 7));
	}
}
