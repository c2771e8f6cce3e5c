//! Composition of 3D camera transforms into the 2D matrix a canvas draws with.
//!
//! Everything here follows the column-vector convention: a point `p` is transformed as `m * p`, so
//! the right-most factor of a product is applied first.

use glam::{Vec2, Vec3, Vec4};
use thiserror::Error;

use crate::{Color, Matrix3, Matrix4};

/// Homogeneous W values smaller than this are treated as points at infinity.
pub const W_EPSILON: f32 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ProjectionError {
	#[error("point projects to infinity (w = {w})")]
	PointAtInfinity { w: f32 },
}

static_assertions::assert_impl_all!(ProjectionError: std::error::Error, Send, Sync);

/// Maps normalized device coordinates onto a `width` x `height` surface whose origin is top-left.
///
/// The Y scale is negative: clip space grows upwards while the canvas grows downwards.
pub fn viewport_matrix(width: f32, height: f32) -> Matrix4 {
	let half = Vec3::new(width / 2.0, height / 2.0, 0.0);
	Matrix4::from_translation(half) * Matrix4::from_scale(Vec3::new(half.x, -half.y, 0.0))
}

/// Rotates the canvas XY plane by +90° about X so drawings lie flat on a detected plane.
pub fn plane_alignment_matrix() -> Matrix4 {
	Matrix4::from_rotation_x(std::f32::consts::FRAC_PI_2)
}

/// Concatenates `[m1, m2, ..., mn]` into `mn * ... * m2 * m1`.
///
/// The first matrix is the one applied to points first. An empty slice yields the identity.
pub fn compose(matrices: &[Matrix4]) -> Matrix4 {
	matrices
		.iter()
		.fold(Matrix4::IDENTITY, |product, m| *m * product)
}

/// Drops the Z row and column of `m`.
///
/// Columns 0, 1 and 3 of the column-major input become the rows of the output, and within each
/// only rows 0, 1 and 3 are kept.
pub fn to_matrix3(m: Matrix4) -> Matrix3 {
	let a: &[f32; 16] = bytemuck::cast_ref(&m);
	#[rustfmt::skip]
	let values = [
		a[0], a[4], a[12],
		a[1], a[5], a[13],
		a[3], a[7], a[15],
	];
	Matrix3::from_row_major(values)
}

/// The canvas matrix that draws model-space 2D content in perspective over the camera image.
pub fn perspective_projection_matrix(
	model: Matrix4,
	view: Matrix4,
	projection: Matrix4,
	viewport_width: f32,
	viewport_height: f32,
	rotate_to_plane: bool,
) -> Matrix3 {
	let viewport = viewport_matrix(viewport_width, viewport_height);
	let chain = if rotate_to_plane {
		compose(&[plane_alignment_matrix(), model, view, projection, viewport])
	} else {
		compose(&[model, view, projection, viewport])
	};
	to_matrix3(chain)
}

/// Multiplies `v` by `m`, optionally dividing through by the resulting W.
///
/// With `perspective_divide`, a W within [`W_EPSILON`] of zero is reported rather than divided by.
pub fn transform_vector4(
	m: Matrix4,
	v: Vec4,
	perspective_divide: bool,
) -> Result<Vec4, ProjectionError> {
	let result = m * v;
	if !perspective_divide {
		return Ok(result);
	}
	if result.w.abs() < W_EPSILON {
		return Err(ProjectionError::PointAtInfinity { w: result.w });
	}
	Ok((result.truncate() / result.w).extend(1.0))
}

/// Projects 3D points through `m` into 2D, dropping depth.
pub fn map_points(m: Matrix4, points: &[Vec3]) -> Vec<Option<Vec2>> {
	points
		.iter()
		.map(|p| {
			transform_vector4(m, p.extend(1.0), true)
				.map(|v| v.truncate().truncate())
				.ok()
		})
		.collect()
}

/// The projected X, Y and Z axes of a model frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxesGizmo {
	pub origin: Vec2,
	pub x: Vec2,
	pub y: Vec2,
	pub z: Vec2,
}

impl AxesGizmo {
	pub const STROKE_WIDTH: f32 = 10.0;

	/// Returns `None` if any of the four points projects to infinity.
	pub fn project(model_view_projection_viewport: Matrix4, length: f32) -> Option<Self> {
		let points = map_points(
			model_view_projection_viewport,
			&[Vec3::ZERO, Vec3::X * length, Vec3::Y * length, Vec3::Z * length],
		);
		Some(Self {
			origin: points[0]?,
			x: points[1]?,
			y: points[2]?,
			z: points[3]?,
		})
	}

	pub fn segments(&self) -> [(Vec2, Vec2, Color); 3] {
		[
			(self.origin, self.x, Color::RED),
			(self.origin, self.y, Color::GREEN),
			(self.origin, self.z, Color::BLUE),
		]
	}
}

/// Per-frame camera data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMatrices {
	pub view: Matrix4,
	pub projection: Matrix4,
	pub width: f32,
	pub height: f32,
}

impl FrameMatrices {
	pub fn new(view: Matrix4, projection: Matrix4, width: f32, height: f32) -> Self {
		Self {
			view,
			projection,
			width,
			height,
		}
	}

	pub fn viewport(&self) -> Matrix4 {
		viewport_matrix(self.width, self.height)
	}

	pub fn view_projection_viewport(&self) -> Matrix4 {
		compose(&[self.view, self.projection, self.viewport()])
	}

	pub fn canvas_matrix(&self, model: Matrix4, rotate_to_plane: bool) -> Matrix3 {
		perspective_projection_matrix(
			model,
			self.view,
			self.projection,
			self.width,
			self.height,
			rotate_to_plane,
		)
	}
}
