// pr_model: particle network snapshot for rendering

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PrParticle {
	pub pos: [f32; 3],
}

/// One drawable edge, endpoints as indices into `PrModel::particles`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PrConstraint {
	pub particles: [usize; 2],
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PrModel {
	pub particles: Vec<PrParticle>,
	pub constraints: Vec<PrConstraint>,
}
