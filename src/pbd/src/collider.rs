use std::sync::{Arc, RwLock};

use crate::V3;

/// Shared handle so external game logic can animate collider placement
/// while solvers read it.
pub type ColliderRef = Arc<RwLock<Collider>>;

/// Pushed-out sphere surfaces sit slightly proud of the radius to avoid
/// re-penetration jitter on the next step.
const SPHERE_OFFSET: f32 = 0.05;

/// The shape set is closed and small, so colliders are a tagged variant
/// with a single dispatch in `handle_collision`.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
	Plane {
		point: V3,
		normal: V3,
	},
	Sphere {
		center: V3,
		radius: f32,
	},
	/// Segment `[end_point, end_point - orientation * length]` swept by
	/// `radius`; the clamp in the closest-point query covers the
	/// hemispherical caps.
	Capsule {
		end_point: V3,
		orientation: V3,
		length: f32,
		radius: f32,
	},
	/// 2D footprint: x within `width / 2`, y within `height / 2`, z
	/// unconstrained.
	Aabb {
		center: V3,
		width: f32,
		height: f32,
	},
}

pub struct Collider {
	shape: Shape,
	active: bool,
}

impl Collider {
	pub fn new(shape: Shape) -> Self {
		Self {
			shape,
			active: true,
		}
	}

	pub fn plane(point: V3, normal: V3) -> Self {
		debug_assert!(normal.norm() > 0f32);
		Self::new(Shape::Plane {
			point,
			normal: normal.normalize(),
		})
	}

	pub fn sphere(center: V3, radius: f32) -> Self {
		Self::new(Shape::Sphere { center, radius })
	}

	pub fn capsule(center: V3, radius: f32, length: f32, orientation: V3) -> Self {
		debug_assert!(orientation.norm() > 0f32);
		let orientation = orientation.normalize();
		Self::new(Shape::Capsule {
			end_point: center + orientation * length * 0.5,
			orientation,
			length,
			radius,
		})
	}

	pub fn aabb(center: V3, width: f32, height: f32) -> Self {
		Self::new(Shape::Aabb {
			center,
			width,
			height,
		})
	}

	pub fn build(self) -> ColliderRef {
		Arc::new(RwLock::new(self))
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	pub fn set_active(&mut self, active: bool) {
		self.active = active;
	}

	pub fn shape(&self) -> Shape {
		self.shape
	}

	pub fn position(&self) -> V3 {
		match self.shape {
			Shape::Plane { point, .. } => point,
			Shape::Sphere { center, .. } => center,
			Shape::Capsule {
				end_point,
				orientation,
				length,
				..
			} => end_point - orientation * length * 0.5,
			Shape::Aabb { center, .. } => center,
		}
	}

	pub fn set_position(&mut self, position: V3) {
		match &mut self.shape {
			Shape::Plane { point, .. } => *point = position,
			Shape::Sphere { center, .. } => *center = position,
			Shape::Capsule {
				end_point,
				orientation,
				length,
				..
			} => *end_point = position + *orientation * *length * 0.5,
			Shape::Aabb { center, .. } => *center = position,
		}
	}

	/// Project a penetrating position onto the shape surface. Positions
	/// outside the forbidden region pass through untouched.
	pub fn handle_collision(&self, pos: &mut V3) {
		match self.shape {
			Shape::Plane { point, normal } => {
				let depth = (*pos - point).dot(&normal);
				if depth < 0f32 {
					*pos -= normal * depth;
				}
			}
			Shape::Sphere { center, radius } => {
				let delta = *pos - center;
				let dist = delta.norm();
				// a particle exactly at the center has no radial direction
				if dist < radius && dist.is_normal() {
					*pos = center + (radius + SPHERE_OFFSET) * delta / dist;
				}
			}
			Shape::Capsule {
				end_point,
				orientation,
				length,
				radius,
			} => {
				let a = end_point;
				let b = a - orientation * length;
				let ab = b - a;
				let t = ((*pos - a).dot(&ab) / ab.norm_squared())
					.clamp(0f32, 1f32);
				let c = a + t * ab;
				let delta = *pos - c;
				let dist = delta.norm();
				if dist < radius && dist.is_normal() {
					*pos = c + radius * delta / dist;
				}
			}
			Shape::Aabb {
				center,
				width,
				height,
			} => {
				let x_dist = pos.x - center.x;
				let y_dist = pos.y - center.y;
				let half_w = width * 0.5;
				let half_h = height * 0.5;
				if x_dist.abs() < half_w && y_dist.abs() < half_h {
					let to_x_edge = half_w - x_dist.abs();
					let to_y_edge = half_h - y_dist.abs();
					// push out along the nearer edge only; ties go to y,
					// and signum's positive zero sends a dead-centered
					// particle toward +
					if to_x_edge < to_y_edge {
						pos.x = center.x + x_dist.signum() * half_w;
					} else {
						pos.y = center.y + y_dist.signum() * half_h;
					}
				}
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn plane_projects_to_surface() {
		let plane = Collider::plane(V3::zeros(), V3::new(0., 1., 0.));
		let mut pos = V3::new(3., -2., 1.);
		plane.handle_collision(&mut pos);
		assert_eq!(pos, V3::new(3., 0., 1.));
		// above the plane nothing happens
		let mut above = V3::new(3., 0.5, 1.);
		plane.handle_collision(&mut above);
		assert_eq!(above, V3::new(3., 0.5, 1.));
	}

	#[test]
	fn sphere_projects_radially() {
		let sphere = Collider::sphere(V3::zeros(), 2.);
		let mut pos = V3::new(0.5, 0., 0.);
		sphere.handle_collision(&mut pos);
		assert_relative_eq!(pos.x, 2.05, epsilon = 1e-5);
		assert_eq!(pos.y, 0.);
		assert_eq!(pos.z, 0.);
	}

	#[test]
	fn sphere_center_is_guarded() {
		let sphere = Collider::sphere(V3::new(1., 1., 1.), 2.);
		let mut pos = V3::new(1., 1., 1.);
		sphere.handle_collision(&mut pos);
		assert_eq!(pos, V3::new(1., 1., 1.));
	}

	#[test]
	fn capsule_cylinder_and_cap() {
		// vertical capsule: end point (0, 1, 0), pointing up, length 2
		let capsule =
			Collider::capsule(V3::zeros(), 0.5, 2., V3::new(0., 1., 0.));
		// beside the middle of the segment
		let mut side = V3::new(0.1, 0., 0.);
		capsule.handle_collision(&mut side);
		assert_relative_eq!(side.x, 0.5, epsilon = 1e-5);
		assert_relative_eq!(side.y, 0., epsilon = 1e-5);
		// beyond the top cap, pushed radially off the end point
		let mut cap = V3::new(0., 1.2, 0.);
		capsule.handle_collision(&mut cap);
		assert_relative_eq!((cap - V3::new(0., 1., 0.)).norm(), 0.5, epsilon = 1e-5);
		assert!(cap.y > 1.);
	}

	#[test]
	fn aabb_pushes_along_nearer_edge() {
		let aabb = Collider::aabb(V3::zeros(), 4., 2.);
		// closer to the x edge
		let mut pos = V3::new(1.8, 0.1, 7.);
		aabb.handle_collision(&mut pos);
		assert_eq!(pos, V3::new(2., 0.1, 7.));
		// closer to the y edge
		let mut pos = V3::new(0.2, -0.8, 0.);
		aabb.handle_collision(&mut pos);
		assert_eq!(pos, V3::new(0.2, -1., 0.));
	}

	#[test]
	fn aabb_tie_goes_to_y() {
		let aabb = Collider::aabb(V3::zeros(), 2., 2.);
		let mut pos = V3::new(0.5, 0.5, 0.);
		aabb.handle_collision(&mut pos);
		assert_eq!(pos, V3::new(0.5, 1., 0.));
	}

	#[test]
	fn aabb_center_leaves_toward_positive_y() {
		let aabb = Collider::aabb(V3::zeros(), 2., 2.);
		let mut pos = V3::zeros();
		aabb.handle_collision(&mut pos);
		assert_eq!(pos, V3::new(0., 1., 0.));
	}

	#[test]
	fn capsule_position_round_trip() {
		let mut capsule =
			Collider::capsule(V3::new(7., -5., 0.), 1., 15., V3::new(0., 0., 1.));
		assert_relative_eq!(
			(capsule.position() - V3::new(7., -5., 0.)).norm(),
			0.,
			epsilon = 1e-4
		);
		capsule.set_position(V3::new(7., -5., 5.));
		assert_relative_eq!(
			(capsule.position() - V3::new(7., -5., 5.)).norm(),
			0.,
			epsilon = 1e-4
		);
	}
}
