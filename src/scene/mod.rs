//! Bookkeeping for objects anchored to tracked planes.

use glam::Vec2;
use thiserror::Error;

use crate::{AxesGizmo, Canvas, Color, FrameMatrices};

mod alignment;
pub use alignment::*;

mod anchors;
pub use anchors::*;

mod planes;
pub use planes::*;

/// Opaque id of a plane reported by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("plane#{_0}")]
pub struct PlaneId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("anchor#{_0}")]
pub struct AnchorId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum PlaneType {
	/// Floors and table tops.
	#[display("horizontal-up")]
	HorizontalUpwardFacing,
	/// Ceilings.
	#[display("horizontal-down")]
	HorizontalDownwardFacing,
	#[display("vertical")]
	Vertical,
}

/// How anchored objects are oriented relative to their plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, derive_more::Display)]
pub enum ObjectRotation {
	#[default]
	#[display("axis-aligned")]
	AxisAligned,
	#[display("camera-aligned")]
	CameraAligned,
	#[display("snap-aligned")]
	SnapAligned,
}

#[derive(Debug, Error)]
pub enum SceneError {
	#[error("unknown object rotation {0}")]
	UnknownRotation(i32),
	#[error("{0} is not tracked")]
	UnknownAnchor(AnchorId),
}

static_assertions::assert_impl_all!(SceneError: std::error::Error, Send, Sync);

impl TryFrom<i32> for ObjectRotation {
	type Error = SceneError;
	fn try_from(value: i32) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::AxisAligned),
			1 => Ok(Self::CameraAligned),
			2 => Ok(Self::SnapAligned),
			other => Err(SceneError::UnknownRotation(other)),
		}
	}
}

#[derive(Clone, Debug, PartialEq, bon::Builder)]
pub struct AnchorDrawOptions {
	#[builder(default = 0.2)]
	pub axes_length: f32,
	#[builder(default = 0.1)]
	pub marker_radius: f32,
	#[builder(default = Color(0x8070_0000))]
	pub marker_color: Color,
	#[builder(into, default = "SkAR".to_owned())]
	pub label: String,
	/// Zero selects [`AnchorDrawOptions::DEFAULT_TEXT_SIZE`].
	#[builder(default)]
	pub text_size: f32,
	#[builder(default = Color::BLUE)]
	pub label_color: Color,
}

impl AnchorDrawOptions {
	pub const DEFAULT_TEXT_SIZE: f32 = 0.1;

	pub fn effective_text_size(&self) -> f32 {
		if self.text_size == 0.0 {
			Self::DEFAULT_TEXT_SIZE
		} else {
			self.text_size
		}
	}
}

impl Default for AnchorDrawOptions {
	fn default() -> Self {
		Self::builder().build()
	}
}

/// Draws the axes, a marker disc and a label for every tracked anchor.
///
/// The anchor models already contain the plane alignment, so none is added here.
pub fn draw_anchors<C: Canvas + ?Sized>(
	canvas: &mut C,
	frame: &FrameMatrices,
	anchors: &AnchorSet,
	rotation: ObjectRotation,
	options: &AnchorDrawOptions,
) {
	let view_projection_viewport = frame.view_projection_viewport();
	for model in anchors.models(rotation) {
		let full = view_projection_viewport * model;

		canvas.set_matrix(&crate::Matrix3::IDENTITY);
		match AxesGizmo::project(full, options.axes_length) {
			Some(axes) => {
				for (from, to, color) in axes.segments() {
					canvas.draw_line(from, to, color, AxesGizmo::STROKE_WIDTH);
				}
			}
			None => tracing::trace!("anchor axes behind the camera"),
		}

		canvas.set_matrix(&crate::to_matrix3(full));
		canvas.draw_circle(Vec2::ZERO, options.marker_radius, options.marker_color);
		if !options.label.is_empty() {
			canvas.draw_text(
				&options.label,
				Vec2::ZERO,
				options.effective_text_size(),
				options.label_color,
			);
		}
	}
}
