use crate::model::PhysicalModel;
use crate::object::PbdObject;
use crate::rope::RopeManager;
use crate::solver::IntegrationScheme;
use crate::V3;

/// Arm tip slots in the character model.
const ARM_TIPS: [usize; 4] = [8, 9, 10, 11];

/// Articulated character whose arms can latch onto nearby rope
/// particles via connector constraints. Each arm holds at most one
/// connector at a time.
pub struct Character {
	pub object: PbdObject,
	arm_connected: [bool; 4],
}

impl Character {
	pub fn new(
		size: f32,
		arm_length: f32,
		center: V3,
		scheme: IntegrationScheme,
	) -> Self {
		Self {
			object: PbdObject::from_model(
				PhysicalModel::character(size, arm_length, center),
				scheme,
			),
			arm_connected: [false; 4],
		}
	}

	/// Hook every free arm onto the nearest rope particle within
	/// `threshold`. Arms that are already connected are skipped, so a
	/// repeated call is a no-op until the connectors are released.
	pub fn apply_connector_constraints(
		&mut self,
		ropes: &RopeManager,
		threshold: f32,
	) {
		for (slot, arm) in ARM_TIPS.iter().enumerate() {
			if self.arm_connected[slot] {
				continue;
			}
			let arm_pos = self.object.position(*arm);
			if let Some((id, buffer)) = ropes.closest_particle(arm_pos, threshold)
			{
				// zero rest distance snaps the arm onto the particle
				self.object.connect(*arm, buffer, id, 0f32);
				self.arm_connected[slot] = true;
			}
		}
	}

	/// Let go of every rope at once.
	pub fn remove_connector_constraints(&mut self) {
		self.object.remove_connectors();
		self.arm_connected = [false; 4];
	}

	pub fn connected_arms(&self) -> usize {
		self.arm_connected.iter().filter(|c| **c).count()
	}
}
