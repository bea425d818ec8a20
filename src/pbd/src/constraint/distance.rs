use std::sync::Arc;

use tracing::warn;

use crate::particle::BufRef;
use crate::V3;

/// Distance constraint between two particle slots. The two slots usually
/// live in the same buffer; a connector references two different objects'
/// buffers. The rest distance is frozen at construction.
pub struct DistanceConstraint {
	p1: usize,
	p2: usize,
	buf1: BufRef,
	buf2: BufRef,
	rest_distance: f32,
}

impl DistanceConstraint {
	/// Freeze the rest distance from the current separation.
	pub fn new(p1: usize, buf1: BufRef, p2: usize, buf2: BufRef) -> Self {
		let rest = {
			let pos1 = buf1.read().unwrap().positions[p1];
			let pos2 = buf2.read().unwrap().positions[p2];
			(pos1 - pos2).norm()
		};
		Self::new_with_rest(p1, buf1, p2, buf2, rest)
	}

	/// Explicit rest distance, used for zero-rest connector snapping.
	pub fn new_with_rest(
		p1: usize,
		buf1: BufRef,
		p2: usize,
		buf2: BufRef,
		rest_distance: f32,
	) -> Self {
		Self {
			p1,
			p2,
			buf1,
			buf2,
			rest_distance,
		}
	}

	pub fn rest_distance(&self) -> f32 {
		self.rest_distance
	}

	pub fn endpoints(&self) -> (usize, usize) {
		(self.p1, self.p2)
	}

	pub fn is_connector(&self) -> bool {
		!Arc::ptr_eq(&self.buf1, &self.buf2)
	}

	/// One symmetric relaxation pass: each movable endpoint absorbs half
	/// the length error; unmovable endpoints act as anchors.
	pub fn solve(&self) {
		if Arc::ptr_eq(&self.buf1, &self.buf2) {
			// both endpoints live in one buffer, lock it once
			let mut buf = self.buf1.write().unwrap();
			let correction = match self
				.correction(buf.positions[self.p1], buf.positions[self.p2])
			{
				Some(c) => c,
				None => return,
			};
			if buf.movables[self.p1] {
				buf.positions[self.p1] -= correction;
			}
			if buf.movables[self.p2] {
				buf.positions[self.p2] += correction;
			}
		} else {
			let mut buf1 = self.buf1.write().unwrap();
			let mut buf2 = self.buf2.write().unwrap();
			let correction = match self
				.correction(buf1.positions[self.p1], buf2.positions[self.p2])
			{
				Some(c) => c,
				None => return,
			};
			if buf1.movables[self.p1] {
				buf1.positions[self.p1] -= correction;
			}
			if buf2.movables[self.p2] {
				buf2.positions[self.p2] += correction;
			}
		}
	}

	fn correction(&self, pos1: V3, pos2: V3) -> Option<V3> {
		let delta = pos1 - pos2;
		let len = delta.norm();
		if !len.is_normal() {
			// a zero-rest connector sitting at zero length is satisfied,
			// anything else has no usable correction direction
			if self.rest_distance > 0f32 {
				warn!("degenerate constraint length {}", len);
			}
			return None;
		}
		Some(0.5 * (len - self.rest_distance) * delta / len)
	}
}
