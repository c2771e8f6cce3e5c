use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec2};

/// A 4x4 transform in column-major order.
pub type Matrix4 = glam::Mat4;

/// Builds a [`Matrix4`] from 16 column-major values.
///
/// Panics if `values` does not hold exactly 16 elements. A short or long array is a caller bug, not
/// something to truncate.
pub fn matrix4_from_slice(values: &[f32]) -> Matrix4 {
	assert_eq!(values.len(), 16, "a 4x4 matrix needs exactly 16 values");
	Matrix4::from_cols_slice(values)
}

/// A row-major 3x3 affine-projective transform, as consumed by a 2D canvas.
///
/// The rows are `[sx, kx, tx]`, `[ky, sy, ty]` and `[p0, p1, w]`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Matrix3([f32; 9]);

static_assertions::assert_eq_size!(Matrix3, [f32; 9]);

impl Default for Matrix3 {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Matrix3 {
	#[rustfmt::skip]
	pub const IDENTITY: Self = Self([
		1.0, 0.0, 0.0,
		0.0, 1.0, 0.0,
		0.0, 0.0, 1.0,
	]);

	pub const fn from_row_major(values: [f32; 9]) -> Self {
		Self(values)
	}

	/// Panics if `values` does not hold exactly 9 elements.
	pub fn from_slice(values: &[f32]) -> Self {
		assert_eq!(values.len(), 9, "a 3x3 matrix needs exactly 9 values");
		let mut array = [0.0; 9];
		array.copy_from_slice(values);
		Self(array)
	}

	pub fn as_array(&self) -> &[f32; 9] {
		bytemuck::cast_ref(self)
	}

	/// The raw row-major values, e.g. for handing to a native canvas.
	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::bytes_of(self)
	}

	pub fn row(&self, index: usize) -> [f32; 3] {
		let start = 3 * index;
		[self.0[start], self.0[start + 1], self.0[start + 2]]
	}

	pub fn to_mat3(&self) -> Mat3 {
		// `Mat3` is column-major, so reading our rows as its columns yields the transpose.
		Mat3::from_cols_array(&self.0).transpose()
	}

	/// Applies the transform to a point, including the perspective divide.
	///
	/// Returns `None` when the point maps to infinity.
	pub fn map_point(&self, point: Vec2) -> Option<Vec2> {
		let m = &self.0;
		let x = m[0] * point.x + m[1] * point.y + m[2];
		let y = m[3] * point.x + m[4] * point.y + m[5];
		let w = m[6] * point.x + m[7] * point.y + m[8];
		(w != 0.0).then(|| Vec2::new(x / w, y / w))
	}

	pub fn has_perspective(&self) -> bool {
		self.0[6] != 0.0 || self.0[7] != 0.0
	}

	/// Converts to a `kurbo` affine transform when there is no perspective component.
	pub fn to_affine(&self) -> Option<kurbo::Affine> {
		let m = &self.0;
		if self.has_perspective() || m[8] == 0.0 {
			return None;
		}
		let w = f64::from(m[8]);
		// kurbo stores [a, b, c, d, e, f] for the matrix [[a, c, e], [b, d, f]].
		Some(kurbo::Affine::new(
			[m[0], m[3], m[1], m[4], m[2], m[5]].map(|v| f64::from(v) / w),
		))
	}
}
