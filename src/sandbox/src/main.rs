//! Headless driver: builds a scene, runs the frame loop, animates the
//! colliders, and exercises the connector constraints. Stands in for a
//! windowed front end.

use clap::{Parser, ValueEnum};
use tracing::info;

use pbd::character::Character;
use pbd::cloth::Cloth;
use pbd::collider::{Collider, ColliderRef};
use pbd::model::PhysicalModel;
use pbd::object::PbdObject;
use pbd::rope::RopeManager;
use pbd::solver::IntegrationScheme;
use pbd::world::World;
use pbd::V3;
use protocol::Message;

const STEPS_PER_FRAME: usize = 3;
const CONSTRAINT_ITERATIONS: usize = 2;
const CONNECT_THRESHOLD: f32 = 0.4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scene {
	Cloth,
	Chain,
	Ragdoll,
	Ropes,
}

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Headless position-based dynamics scenes")]
#[command(version)]
struct Cli {
	/// Scene to simulate
	#[arg(value_enum, default_value = "cloth")]
	scene: Scene,
	/// Frames to run
	#[arg(long, default_value_t = 240)]
	frames: usize,
	/// Sub-step size in seconds
	#[arg(long, default_value_t = 0.008)]
	dt: f32,
	/// Velocity drag constant, 0 disables drag
	#[arg(long, default_value_t = 0.01)]
	drag: f32,
}

fn gravity() -> V3 {
	V3::new(0., -9.81, 0.)
}

/// The shared collider set: a ball, a long capsule, and a floor plane,
/// all placed under the cloth drop zone.
fn make_colliders() -> (ColliderRef, ColliderRef, ColliderRef) {
	let sphere = Collider::sphere(V3::new(7., -5., -0.125), 2.).build();
	let capsule =
		Collider::capsule(V3::new(7., -5., 0.), 1., 15., V3::new(0., 0., 1.))
			.build();
	let plane =
		Collider::plane(V3::new(7., -5., -0.125), V3::new(0., 1., 0.)).build();
	(sphere, capsule, plane)
}

/// Slide the colliders around the scene the way a player toying with
/// the demo would.
fn animate_colliders(
	frame: usize,
	sphere: &ColliderRef,
	capsule: &ColliderRef,
	plane: &ColliderRef,
) {
	let timer = frame as f32;
	sphere
		.write()
		.unwrap()
		.set_position(V3::new(7., -5., (timer / 50.).cos() * 7.));
	capsule
		.write()
		.unwrap()
		.set_position(V3::new(7., -5., (timer / 100.).cos() * 9. + 5.));
	plane
		.write()
		.unwrap()
		.set_position(V3::new(7., -(timer / 100.).cos() * 5. - 10.5, 0.));
}

fn run_cloth(cli: &Cli) {
	let mut cloth = Cloth::new(14., 10., 20, 15, IntegrationScheme::Verlet);
	cloth
		.object
		.solver
		.set_constraint_iterations(CONSTRAINT_ITERATIONS);
	cloth.object.solver.set_drag_constant(cli.drag);
	let (sphere, capsule, plane) = make_colliders();
	cloth.object.solver.set_colliders(vec![
		sphere.clone(),
		capsule.clone(),
		plane.clone(),
	]);

	let drag_enabled = cli.drag > 0f32;
	for frame in 0..cli.frames {
		animate_colliders(frame, &sphere, &capsule, &plane);
		for _ in 0..STEPS_PER_FRAME {
			cloth.object.add_force(gravity());
			cloth.wind_force(V3::new(0.3, 0., 0.2));
			cloth.object.time_step(cli.dt, drag_enabled);
		}
		if frame % 60 == 0 {
			let snapshot =
				Message::WorldUpdate(cloth.object.pr_model()).to_bytes();
			info!("frame {}: snapshot {} bytes", frame, snapshot.len());
		}
	}
	let low = cloth
		.object
		.pr_particles()
		.iter()
		.map(|p| p.pos[1])
		.fold(f32::INFINITY, f32::min);
	info!("cloth settled, lowest particle at y = {:.3}", low);
}

fn run_world(cli: &Cli, scene: Scene) {
	let mut world = World::default()
		.with_dt(cli.dt)
		.with_steps_per_frame(STEPS_PER_FRAME)
		.with_constraint_iterations(CONSTRAINT_ITERATIONS)
		.with_drag_constant(cli.drag);
	let (sphere, capsule, plane) = make_colliders();
	world.add_collider(sphere.clone());
	world.add_collider(capsule.clone());
	world.add_collider(plane.clone());

	let model = match scene {
		Scene::Chain => PhysicalModel::chain(16, 0.5, V3::new(7., 2., 0.)),
		_ => PhysicalModel::ragdoll(),
	};
	let id = world.add_object(PbdObject::from_model(
		model,
		IntegrationScheme::Verlet,
	));

	for frame in 0..cli.frames {
		animate_colliders(frame, &sphere, &capsule, &plane);
		world.step();
		if frame % 60 == 0 {
			let snapshot = Message::WorldUpdate(world.pr_model()).to_bytes();
			info!("frame {}: snapshot {} bytes", frame, snapshot.len());
		}
	}
	let tail = world.object(id).unwrap().pr_particles();
	let last = tail.last().unwrap();
	info!(
		"final tail particle at ({:.3}, {:.3}, {:.3})",
		last.pos[0], last.pos[1], last.pos[2]
	);
}

/// The playground scene: a row of ropes and a character that grabs the
/// nearest rope mid-run and lets go again later.
fn run_ropes(cli: &Cli) {
	let mut ropes = RopeManager::new(
		5,
		0.25,
		V3::new(2., 4., 0.),
		IntegrationScheme::Verlet,
	);
	ropes.set_constraint_iterations(CONSTRAINT_ITERATIONS);
	ropes.set_drag_constant(cli.drag);
	// the upward arm tip starts within grabbing range of the first
	// rope's anchor, so the character latches on before it falls away
	let mut character = Character::new(
		0.5,
		3.5,
		V3::new(1.75, 2.25, 0.),
		IntegrationScheme::Verlet,
	);
	character
		.object
		.solver
		.set_constraint_iterations(CONSTRAINT_ITERATIONS);

	let release_frame = cli.frames / 2;
	for frame in 0..cli.frames {
		for _ in 0..STEPS_PER_FRAME {
			ropes.time_step(gravity(), cli.dt);
			character.object.add_force(gravity());
			character.object.time_step(cli.dt, false);
		}

		let before = character.connected_arms();
		character.apply_connector_constraints(&ropes, CONNECT_THRESHOLD);
		if character.connected_arms() != before {
			info!(
				"frame {}: {} arm(s) holding on",
				frame,
				character.connected_arms()
			);
		}
		if frame == release_frame && character.connected_arms() > 0 {
			character.remove_connector_constraints();
			info!("frame {}: let go of the ropes", frame);
		}
	}
	info!(
		"done, {} connector(s) left, {} constraints",
		character.connected_arms(),
		character.object.constraint_count()
	);
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let cli = Cli::parse();
	match cli.scene {
		Scene::Cloth => run_cloth(&cli),
		Scene::Chain => run_world(&cli, Scene::Chain),
		Scene::Ragdoll => run_world(&cli, Scene::Ragdoll),
		Scene::Ropes => run_ropes(&cli),
	}
}
