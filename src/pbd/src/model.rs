use crate::V3;

/// Plain topology description consumed by `PbdObject::from_model`:
/// starting positions, masses, movability, constraint edges, and (for
/// cloth) the triangle list used by wind loading.
pub struct PhysicalModel {
	pub positions: Vec<V3>,
	pub masses: Vec<f32>,
	pub movables: Vec<bool>,
	pub edges: Vec<(usize, usize)>,
	pub triangles: Vec<[usize; 3]>,
}

impl PhysicalModel {
	fn from_layout(
		positions: Vec<V3>,
		movables: Vec<bool>,
		edges: Vec<(usize, usize)>,
	) -> Self {
		let n = positions.len();
		Self {
			positions,
			masses: vec![1f32; n],
			movables,
			edges,
			triangles: Vec::new(),
		}
	}

	/// A line of particles along +x from `anchor`, first particle pinned.
	pub fn rope(n: usize, spacing: f32, anchor: V3) -> Self {
		let positions = (0..n)
			.map(|i| anchor + V3::new(i as f32 * spacing, 0., 0.))
			.collect();
		let mut movables = vec![true; n];
		movables[0] = false;
		let edges = (0..n - 1).map(|i| (i, i + 1)).collect();
		Self::from_layout(positions, movables, edges)
	}

	/// A line of particles hanging down from `anchor`, top particle pinned.
	pub fn chain(n: usize, spacing: f32, anchor: V3) -> Self {
		let positions = (0..n)
			.map(|i| anchor + V3::new(0., -(i as f32) * spacing, 0.))
			.collect();
		let mut movables = vec![true; n];
		movables[0] = false;
		let edges = (0..n - 1).map(|i| (i, i + 1)).collect();
		Self::from_layout(positions, movables, edges)
	}

	/// Grid from (0, 0, 0) to (width, -height, 0): structural and shear
	/// edges between immediate neighbors, bend edges at distance two, the
	/// three leftmost and rightmost particles of the top row pinned, two
	/// triangles per cell.
	pub fn cloth(width: f32, height: f32, nx: usize, ny: usize) -> Self {
		let index = |x: usize, y: usize| y * nx + x;
		let mut positions = vec![V3::zeros(); nx * ny];
		for x in 0..nx {
			for y in 0..ny {
				positions[index(x, y)] = V3::new(
					width * (x as f32 / nx as f32),
					-height * (y as f32 / ny as f32),
					0.,
				);
			}
		}

		let mut edges = Vec::new();
		for x in 0..nx {
			for y in 0..ny {
				if x + 1 < nx {
					edges.push((index(x, y), index(x + 1, y)));
				}
				if y + 1 < ny {
					edges.push((index(x, y), index(x, y + 1)));
				}
				if x + 1 < nx && y + 1 < ny {
					edges.push((index(x, y), index(x + 1, y + 1)));
					edges.push((index(x + 1, y), index(x, y + 1)));
				}
			}
		}
		// secondary neighbors stiffen the sheet against folding
		for x in 0..nx {
			for y in 0..ny {
				if x + 2 < nx {
					edges.push((index(x, y), index(x + 2, y)));
				}
				if y + 2 < ny {
					edges.push((index(x, y), index(x, y + 2)));
				}
				if x + 2 < nx && y + 2 < ny {
					edges.push((index(x, y), index(x + 2, y + 2)));
					edges.push((index(x + 2, y), index(x, y + 2)));
				}
			}
		}

		let mut movables = vec![true; nx * ny];
		for i in 0..3usize.min(nx) {
			movables[index(i, 0)] = false;
			movables[index(nx - 1 - i, 0)] = false;
		}

		let mut triangles = Vec::new();
		for x in 0..nx - 1 {
			for y in 0..ny - 1 {
				triangles.push([index(x + 1, y), index(x, y), index(x, y + 1)]);
				triangles.push([
					index(x + 1, y + 1),
					index(x + 1, y),
					index(x, y + 1),
				]);
			}
		}

		let mut model = Self::from_layout(positions, movables, edges);
		model.triangles = triangles;
		model
	}

	/// 16-particle stick figure, left hand (particle 6) pinned.
	pub fn ragdoll() -> Self {
		let positions = vec![
			V3::new(-1., 0., 0.),    // left foot
			V3::new(-1., 1., 0.),    // left knee
			V3::new(-0.75, 2., 0.),  // left hip
			V3::new(-0.5, 2.5, 0.),  // left shoulder
			V3::new(-1., 3.5, 0.),   // left raised hand
			V3::new(-1.25, 2.75, 0.), // left elbow
			V3::new(-1.25, 2.1, 0.), // left hand
			V3::new(0., 4., 0.),     // neck
			V3::new(0., 4.5, 0.),    // head
			V3::new(1., 3.5, 0.),    // right raised hand
			V3::new(1.25, 2.75, 0.), // right elbow
			V3::new(1.25, 2.1, 0.),  // right hand
			V3::new(0.5, 2.5, 0.),   // right shoulder
			V3::new(0.75, 2., 0.),   // right hip
			V3::new(1., 1., 0.),     // right knee
			V3::new(1., 0., 0.),     // right foot
		];
		let edges = vec![
			// legs
			(0, 1),
			(1, 2),
			(15, 14),
			(14, 13),
			// torso frame with cross braces
			(2, 3),
			(13, 12),
			(2, 13),
			(3, 12),
			(2, 12),
			(13, 3),
			// neck and head
			(3, 7),
			(12, 7),
			(7, 8),
			// arms, elbow forking to the hanging and raised hands
			(3, 5),
			(5, 6),
			(5, 4),
			(12, 10),
			(10, 11),
			(10, 9),
		];
		let mut movables = vec![true; positions.len()];
		movables[6] = false;
		Self::from_layout(positions, movables, edges)
	}

	/// Articulated character: a braced body diamond of eight particles
	/// and four arm tips (slots 8..12) reaching `arm_length * size` along
	/// the axes. Fully movable; the arms are what connector constraints
	/// hook onto.
	pub fn character(size: f32, arm_length: f32, center: V3) -> Self {
		let mut positions = vec![
			V3::new(0., size, 0.),
			V3::new(size, 0., 0.),
			V3::new(0., -size, 0.),
			V3::new(-size, 0., 0.),
			V3::new(0.6 * size, 0.6 * size, 0.),
			V3::new(0.6 * size, -0.6 * size, 0.),
			V3::new(-0.6 * size, -0.6 * size, 0.),
			V3::new(-0.6 * size, 0.6 * size, 0.),
			V3::new(0., arm_length * size, 0.),
			V3::new(arm_length * size, 0., 0.),
			V3::new(0., -arm_length * size, 0.),
			V3::new(-arm_length * size, 0., 0.),
		];
		for p in positions.iter_mut() {
			*p += center;
		}
		let edges = vec![
			// outer diamond to itself and the inner ring
			(0, 1),
			(0, 2),
			(0, 3),
			(0, 4),
			(0, 7),
			(1, 2),
			(1, 3),
			(1, 4),
			(1, 5),
			(2, 3),
			(2, 5),
			(2, 6),
			(3, 6),
			(3, 7),
			// inner ring
			(4, 5),
			(4, 6),
			(4, 7),
			(5, 6),
			(5, 7),
			(6, 7),
			// arm tips onto the body
			(8, 0),
			(8, 4),
			(8, 7),
			(9, 1),
			(9, 4),
			(9, 5),
			(10, 2),
			(10, 5),
			(10, 6),
			(11, 3),
			(11, 6),
			(11, 7),
			// opposing arms brace each other
			(8, 10),
			(9, 11),
		];
		let movables = vec![true; positions.len()];
		Self::from_layout(positions, movables, edges)
	}
}
