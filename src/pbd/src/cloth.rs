use crate::model::PhysicalModel;
use crate::object::PbdObject;
use crate::solver::IntegrationScheme;
use crate::V3;

/// Cloth grid with wind loading on top of the plain object lifecycle.
pub struct Cloth {
	pub object: PbdObject,
	triangles: Vec<[usize; 3]>,
}

impl Cloth {
	pub fn new(
		width: f32,
		height: f32,
		nx: usize,
		ny: usize,
		scheme: IntegrationScheme,
	) -> Self {
		let mut model = PhysicalModel::cloth(width, height, nx, ny);
		let triangles = std::mem::take(&mut model.triangles);
		Self {
			object: PbdObject::from_model(model, scheme),
			triangles,
		}
	}

	/// Wind load per triangle: the force follows the triangle normal and
	/// scales with the area projected against the wind direction, so
	/// face-on cloth catches more wind than edge-on cloth.
	pub fn wind_force(&mut self, direction: V3) {
		let buffer = self.object.buffer();
		let mut buf = buffer.write().unwrap();
		let buf = &mut *buf;
		for tri in self.triangles.iter() {
			let [p1, p2, p3] = *tri;
			let normal = (buf.positions[p2] - buf.positions[p1])
				.cross(&(buf.positions[p3] - buf.positions[p1]));
			let len = normal.norm();
			if !len.is_normal() {
				continue;
			}
			let force = normal * (normal / len).dot(&direction);
			buf.accelerations[p1] += force / buf.masses[p1];
			buf.accelerations[p2] += force / buf.masses[p2];
			buf.accelerations[p3] += force / buf.masses[p3];
		}
	}

	pub fn triangles(&self) -> &[[usize; 3]] {
		&self.triangles
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn wind_pushes_along_its_direction() {
		let mut cloth = Cloth::new(4., 3., 6, 5, IntegrationScheme::Verlet);
		// the grid lies in the xy plane, so z wind loads every triangle
		cloth.wind_force(V3::new(0., 0., 1.));
		let buffer = cloth.object.buffer();
		let buf = buffer.read().unwrap();
		let loaded = buf
			.accelerations
			.iter()
			.filter(|a| a.z.abs() > 0f32)
			.count();
		assert!(loaded > 0);
		// all triangle normals face the same way, so no z pushback
		assert!(buf.accelerations.iter().all(|a| a.z >= 0f32));
	}

	#[test]
	fn wind_parallel_to_cloth_does_nothing() {
		let mut cloth = Cloth::new(4., 3., 6, 5, IntegrationScheme::Verlet);
		cloth.wind_force(V3::new(1., 0., 0.));
		let buffer = cloth.object.buffer();
		let buf = buffer.read().unwrap();
		for a in buf.accelerations.iter() {
			assert!(a.norm() < 1e-4);
		}
	}
}
