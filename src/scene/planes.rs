use std::collections::HashMap;

use super::PlaneId;
use crate::Color;

#[rustfmt::skip]
const PLANE_PALETTE_RGBA: [u32; 16] = [
	0xFFFFFFFF, 0xF44336FF, 0xE91E63FF, 0x9C27B0FF, 0x673AB7FF, 0x3F51B5FF,
	0x2196F3FF, 0x03A9F4FF, 0x00BCD4FF, 0x009688FF, 0x4CAF50FF, 0x8BC34AFF,
	0xCDDC39FF, 0xFFEB3BFF, 0xFFC107FF, 0xFF9800FF,
];

/// Assigns each tracked plane a stable display color.
///
/// The first plane ever seen is white; later ones draw from a fixed palette.
#[derive(Clone, Debug)]
pub struct PlaneColors {
	colors: HashMap<PlaneId, Color>,
	first_plane_found: bool,
	rng: fastrand::Rng,
}

impl Default for PlaneColors {
	fn default() -> Self {
		Self::with_rng(fastrand::Rng::new())
	}
}

impl PlaneColors {
	pub fn with_rng(rng: fastrand::Rng) -> Self {
		Self {
			colors: HashMap::new(),
			first_plane_found: false,
			rng,
		}
	}

	pub fn with_seed(seed: u64) -> Self {
		Self::with_rng(fastrand::Rng::with_seed(seed))
	}

	pub fn palette() -> impl Iterator<Item = Color> {
		PLANE_PALETTE_RGBA.into_iter().map(Color::from_rgba_u32)
	}

	pub fn color_for(&mut self, plane: PlaneId) -> Color {
		if let Some(color) = self.colors.get(&plane) {
			return *color;
		}
		let color = if self.first_plane_found {
			Color::from_rgba_u32(PLANE_PALETTE_RGBA[self.rng.usize(..PLANE_PALETTE_RGBA.len())])
		} else {
			self.first_plane_found = true;
			Color::WHITE
		};
		tracing::debug!(%plane, %color, "new plane");
		self.colors.insert(plane, color);
		color
	}

	/// Forgets a plane, e.g. once it was subsumed by another.
	pub fn forget(&mut self, plane: PlaneId) -> Option<Color> {
		self.colors.remove(&plane)
	}
}
