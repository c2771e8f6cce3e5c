//! Freehand painting on a tracked surface.
//!
//! A [`Painting`] turns the world-space hit locations of drag gestures into 2D points in a local
//! frame anchored where the first stroke began, and builds [`kurbo`] paths from them.

use glam::{Vec2, Vec3};
use itertools::Itertools;
use kurbo::BezPath;
use thiserror::Error;

use crate::{plane_alignment_matrix, Canvas, Color, FrameMatrices, Matrix4};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, derive_more::Display)]
pub enum StrokeStyle {
	/// Straight segments between recorded points.
	#[display("rough")]
	Rough,
	/// Quadratic curves through the midpoints of the recorded segments.
	#[default]
	#[display("smooth")]
	Smooth,
}

#[derive(Clone, Debug, PartialEq, bon::Builder)]
pub struct PaintingConfig {
	/// Local units per world unit of finger motion.
	#[builder(default = 1000.0)]
	pub local_distance_scale: f32,
	/// World-space motion below which a point is treated as jitter.
	#[builder(default = 0.01)]
	pub min_motion: f32,
	#[builder(default)]
	pub style: StrokeStyle,
	/// Whether the local XY plane is laid onto the surface with [`plane_alignment_matrix`].
	#[builder(default = true)]
	pub rotate_to_plane: bool,
	#[builder(default = Color::BLUE)]
	pub default_color: Color,
}

impl Default for PaintingConfig {
	fn default() -> Self {
		Self::builder().build()
	}
}

impl PaintingConfig {
	/// The distance scale must be finite and positive, the motion threshold finite and not negative.
	pub fn validate(&self) -> Result<(), PaintingError> {
		if !(self.local_distance_scale.is_finite() && self.local_distance_scale > 0.0) {
			return Err(PaintingError::InvalidConfig {
				field: "local_distance_scale",
				value: self.local_distance_scale,
			});
		}
		if !(self.min_motion.is_finite() && self.min_motion >= 0.0) {
			return Err(PaintingError::InvalidConfig {
				field: "min_motion",
				value: self.min_motion,
			});
		}
		Ok(())
	}
}

#[derive(Debug, Error)]
pub enum PaintingError {
	#[error("pose matrix is not invertible")]
	SingularPose,
	#[error("invalid painting config: {field} = {value}")]
	InvalidConfig { field: &'static str, value: f32 },
}

static_assertions::assert_impl_all!(PaintingError: std::error::Error, Send, Sync);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathPoint {
	pub position: Vec2,
	/// Starts a new sub-path.
	pub jump: bool,
	pub color: Color,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum AddOutcome {
	/// The point opened a new sub-path.
	#[display("stroke started")]
	StrokeStarted,
	#[display("appended")]
	Appended,
	/// The point moved less than the configured minimum and was dropped.
	#[display("skipped")]
	Skipped,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubPath {
	pub path: BezPath,
	pub color: Color,
}

/// The coordinate frame captured from the first point.
#[derive(Copy, Clone, Debug)]
struct LocalFrame {
	model: Matrix4,
	inverse_model: Matrix4,
	local_from_model: Matrix4,
}

#[derive(Clone, Debug)]
pub struct Painting {
	config: PaintingConfig,
	points: Vec<PathPoint>,
	frame: Option<LocalFrame>,
	last_world: Option<Vec3>,
	current_color: Color,
}

impl Default for Painting {
	fn default() -> Self {
		Self::with_checked_config(PaintingConfig::default())
	}
}

impl Painting {
	pub fn new(config: PaintingConfig) -> Result<Self, PaintingError> {
		config.validate()?;
		Ok(Self::with_checked_config(config))
	}

	fn with_checked_config(config: PaintingConfig) -> Self {
		let current_color = config.default_color;
		Self {
			config,
			points: Vec::new(),
			frame: None,
			last_world: None,
			current_color,
		}
	}

	pub fn config(&self) -> &PaintingConfig {
		&self.config
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn points(&self) -> &[PathPoint] {
		&self.points
	}

	pub fn current_color(&self) -> Color {
		self.current_color
	}

	/// Sets the color of strokes started from now on.
	pub fn set_color(&mut self, color: Color) {
		self.current_color = color;
	}

	/// The pose captured when the first point was recorded.
	pub fn model_matrix(&self) -> Option<Matrix4> {
		self.frame.map(|frame| frame.model)
	}

	pub fn inverse_model_matrix(&self) -> Option<Matrix4> {
		self.frame.map(|frame| frame.inverse_model)
	}

	/// The model matrix to draw the local points with, undoing the local distance scale.
	pub fn render_model_matrix(&self) -> Option<Matrix4> {
		let scale = self.config.local_distance_scale.recip();
		self
			.model_matrix()
			.map(|model| model * Matrix4::from_scale(Vec3::splat(scale)))
	}

	/// Records the hit location `world` of a drag gesture.
	///
	/// `pose` is only used by the first point of an empty painting, where it fixes the local frame.
	/// The first point is always the start of a stroke.
	pub fn add_point(
		&mut self,
		pose: Matrix4,
		world: Vec3,
		start_of_stroke: bool,
	) -> Result<AddOutcome, PaintingError> {
		let previous = self.points.last().map(|p| p.position);
		let (Some(frame), Some(previous), Some(last_world)) = (self.frame, previous, self.last_world)
		else {
			return self.begin(pose, world);
		};

		let displacement = world - last_world;
		if !start_of_stroke && displacement.length() < self.config.min_motion {
			tracing::trace!(?displacement, "ignoring jitter");
			return Ok(AddOutcome::Skipped);
		}

		let step = frame
			.local_from_model
			.transform_vector3(frame.inverse_model.transform_vector3(displacement))
			.truncate();
		let position = previous + step * self.config.local_distance_scale;
		self.push(position, world, start_of_stroke);
		Ok(if start_of_stroke {
			AddOutcome::StrokeStarted
		} else {
			AddOutcome::Appended
		})
	}

	fn begin(&mut self, pose: Matrix4, world: Vec3) -> Result<AddOutcome, PaintingError> {
		let determinant = pose.determinant();
		if !pose.is_finite() || !(determinant.abs() > f32::EPSILON) {
			return Err(PaintingError::SingularPose);
		}
		let local_from_model = if self.config.rotate_to_plane {
			plane_alignment_matrix().inverse()
		} else {
			Matrix4::IDENTITY
		};
		let frame = LocalFrame {
			model: pose,
			inverse_model: pose.inverse(),
			local_from_model,
		};
		let origin = frame
			.local_from_model
			.transform_point3(frame.inverse_model.transform_point3(world))
			.truncate() * self.config.local_distance_scale;

		tracing::debug!(%origin, "painting started");
		self.frame = Some(frame);
		self.push(origin, world, true);
		Ok(AddOutcome::StrokeStarted)
	}

	fn push(&mut self, position: Vec2, world: Vec3, jump: bool) {
		// A stroke keeps the color it was started with.
		let color = match self.points.last() {
			Some(previous) if !jump => previous.color,
			_ => self.current_color,
		};
		self.points.push(PathPoint {
			position,
			jump,
			color,
		});
		self.last_world = Some(world);
	}

	/// Forgets all strokes, their colors, and the captured frame.
	pub fn reset(&mut self) {
		tracing::debug!(points = self.points.len(), "painting reset");
		self.points.clear();
		self.frame = None;
		self.last_world = None;
		self.current_color = self.config.default_color;
	}

	/// The recorded points split at jump points.
	pub fn sub_paths(&self) -> impl Iterator<Item = &[PathPoint]> + '_ {
		self.points.chunk_by(|_, next| !next.jump)
	}

	pub fn build_paths(&self) -> Vec<SubPath> {
		self.build_paths_with(self.config.style)
	}

	pub fn build_paths_with(&self, style: StrokeStyle) -> Vec<SubPath> {
		self
			.sub_paths()
			.map(|points| {
				let positions = points.iter().map(|p| p.position).collect_vec();
				SubPath {
					path: match style {
						StrokeStyle::Rough => rough_path(&positions),
						StrokeStyle::Smooth => smooth_path(&positions),
					},
					color: points[0].color,
				}
			})
			.collect()
	}

	/// Draws every stroke in perspective on the surface the painting was started on.
	pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, frame: &FrameMatrices) {
		let Some(model) = self.render_model_matrix() else {
			return;
		};
		canvas.set_matrix(&frame.canvas_matrix(model, self.config.rotate_to_plane));
		for sub_path in self.build_paths() {
			canvas.draw_path(&sub_path.path, sub_path.color);
		}
	}
}

fn to_point(v: Vec2) -> kurbo::Point {
	kurbo::Point::new(v.x.into(), v.y.into())
}

fn midpoint(a: Vec2, b: Vec2) -> kurbo::Point {
	to_point(a.lerp(b, 0.5))
}

pub fn rough_path(points: &[Vec2]) -> BezPath {
	let mut path = BezPath::new();
	let Some((first, rest)) = points.split_first() else {
		return path;
	};
	path.move_to(to_point(*first));
	for point in rest {
		path.line_to(to_point(*point));
	}
	path
}

/// Builds a curve that passes through the midpoints of consecutive points, using each interior
/// point as the control point of a quadratic segment.
pub fn smooth_path(points: &[Vec2]) -> BezPath {
	let mut path = BezPath::new();
	let (first, last) = match points {
		[] => return path,
		[only] => {
			path.move_to(to_point(*only));
			return path;
		}
		[first, .., last] => (*first, *last),
	};
	path.move_to(to_point(first));
	if points.len() == 2 {
		path.line_to(to_point(last));
		return path;
	}
	path.line_to(midpoint(points[0], points[1]));
	for (&control, &next) in points[1..].iter().tuple_windows() {
		path.quad_to(to_point(control), midpoint(control, next));
	}
	path.line_to(to_point(last));
	path
}
