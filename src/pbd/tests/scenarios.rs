use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pbd::character::Character;
use pbd::collider::Collider;
use pbd::model::PhysicalModel;
use pbd::object::PbdObject;
use pbd::rope::RopeManager;
use pbd::solver::IntegrationScheme;
use pbd::V3;

const DT: f32 = 0.008;

fn gravity() -> V3 {
	V3::new(0., -9.81, 0.)
}

fn adjacent_distances(rope: &PbdObject) -> Vec<f32> {
	let buffer = rope.buffer();
	let buf = buffer.read().unwrap();
	(0..buf.positions.len() - 1)
		.map(|i| (buf.positions[i] - buf.positions[i + 1]).norm())
		.collect()
}

#[test]
fn rope_under_gravity_keeps_spacing() {
	let anchor = V3::new(0., 4., 0.);
	let mut rope = PbdObject::from_model(
		PhysicalModel::rope(10, 0.25, anchor),
		IntegrationScheme::Verlet,
	);
	rope.solver.set_constraint_iterations(2);
	rope.solver.set_drag_constant(0.02);

	// construction invariant: spacing is exact before any step
	rope.reinitialize(IntegrationScheme::Verlet);
	for d in adjacent_distances(&rope) {
		assert_relative_eq!(d, 0.25, epsilon = 1e-6);
	}

	// drag bleeds the swing off so the rope settles into a hang
	for _ in 0..1000 {
		rope.add_force(gravity());
		rope.time_step(DT, true);
	}

	// the chain sags but the anchor holds and the links stay near rest
	assert_eq!(rope.position(0), anchor);
	assert!(rope.position(9).y < anchor.y - 0.5);
	for d in adjacent_distances(&rope) {
		assert!((d - 0.25).abs() < 0.05, "link length drifted to {}", d);
	}
}

#[test]
fn sphere_keeps_particles_out() {
	let sphere = Collider::sphere(V3::zeros(), 2.);
	let mut rng = StdRng::seed_from_u64(7);
	for _ in 0..200 {
		let inside = V3::new(
			rng.gen_range(-1f32..1.),
			rng.gen_range(-1f32..1.),
			rng.gen_range(-1f32..1.),
		);
		if !inside.norm().is_normal() {
			continue;
		}
		let dir = inside / inside.norm();
		let mut pos = inside;
		sphere.handle_collision(&mut pos);
		assert!(pos.norm() >= 2.);
		// pushed straight out along the pre-collision radial direction
		assert_relative_eq!(pos.normalize().dot(&dir), 1., epsilon = 1e-5);
	}
	// dead center has no direction to leave through
	let mut center = V3::zeros();
	sphere.handle_collision(&mut center);
	assert_eq!(center, V3::zeros());
}

#[test]
fn every_shape_ends_outside() {
	let colliders = [
		Collider::plane(V3::zeros(), V3::new(0., 1., 0.)),
		Collider::sphere(V3::new(1., 0., 0.), 1.5),
		Collider::capsule(V3::zeros(), 1., 4., V3::new(0., 0., 1.)),
		Collider::aabb(V3::zeros(), 3., 2.),
	];
	let mut rng = StdRng::seed_from_u64(11);
	for _ in 0..300 {
		let mut pos = V3::new(
			rng.gen_range(-2f32..2.),
			rng.gen_range(-2f32..2.),
			rng.gen_range(-2f32..2.),
		);
		for collider in colliders.iter() {
			collider.handle_collision(&mut pos);
		}
		// the last collider's constraint holds exactly
		let inside_x = pos.x.abs() < 1.5;
		let inside_y = pos.y.abs() < 1.;
		assert!(!(inside_x && inside_y));
	}
}

#[test]
fn dropped_cloth_rests_on_plane() {
	let mut world = pbd::world::World::default();
	let floor =
		Collider::plane(V3::new(0., -3., 0.), V3::new(0., 1., 0.)).build();
	world.add_collider(floor);
	// free the pinned corners so the whole sheet drops onto the floor
	let mut model = PhysicalModel::cloth(2., 2., 6, 6);
	for m in model.movables.iter_mut() {
		*m = true;
	}
	world.add_object(PbdObject::from_model(model, IntegrationScheme::Verlet));
	for _ in 0..400 {
		world.step();
	}
	let object = world.object(0).unwrap();
	let buffer = object.buffer();
	let buf = buffer.read().unwrap();
	for p in buf.positions.iter() {
		assert!(p.y >= -3. - 1e-4);
	}
}

#[test]
fn character_swings_from_rope() {
	let mut ropes = RopeManager::new(
		1,
		0.25,
		V3::new(0., 6., 0.),
		IntegrationScheme::Verlet,
	);
	ropes.set_constraint_iterations(2);
	// the rope starts horizontal at y = 6 with every particle at least
	// 2.25 away from any arm tip; once it swings down its free end
	// passes the upward arm tip at (0, 3.75, 0)
	let mut character = Character::new(
		0.5,
		3.5,
		V3::new(0., 2., 0.),
		IntegrationScheme::Verlet,
	);
	character.object.solver.set_constraint_iterations(2);

	// drop the rope onto the character
	for _ in 0..500 {
		ropes.time_step(gravity(), DT);
		character.apply_connector_constraints(&ropes, 0.3);
		if character.connected_arms() > 0 {
			break;
		}
	}
	assert!(character.connected_arms() > 0);
	let connected = character.object.constraint_count();
	assert!(connected > character.object.base_constraint_count());

	// once latched, the pair simulates as one coupled system
	for _ in 0..100 {
		ropes.time_step(gravity(), DT);
		character.object.add_force(gravity());
		character.object.time_step(DT, false);
	}
	assert_eq!(character.object.constraint_count(), connected);

	character.remove_connector_constraints();
	assert_eq!(
		character.object.constraint_count(),
		character.object.base_constraint_count()
	);
}

#[test]
fn reinitialize_after_fall_restores_exact_layout() {
	let model = PhysicalModel::ragdoll();
	let rest: Vec<V3> = model.positions.clone();
	let mut doll = PbdObject::from_model(model, IntegrationScheme::Verlet);
	for _ in 0..200 {
		doll.add_force(gravity());
		doll.time_step(DT, false);
	}
	doll.reinitialize(IntegrationScheme::Verlet);
	for (i, p) in rest.iter().enumerate() {
		assert_relative_eq!((doll.position(i) - p).norm(), 0., epsilon = 1e-6);
	}
}
