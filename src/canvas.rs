use glam::Vec2;
use kurbo::{BezPath, Rect};

use crate::{Color, Matrix3};

/// The 2D drawing surface the projected content is rendered onto.
pub trait Canvas {
	/// Replaces the current transform.
	fn set_matrix(&mut self, matrix: &Matrix3);
	fn draw_path(&mut self, path: &BezPath, color: Color);
	fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
	fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
	fn draw_rect(&mut self, rect: Rect, color: Color);
	/// Draws `text` with its baseline starting at `origin`.
	fn draw_text(&mut self, text: &str, origin: Vec2, size: f32, color: Color);
}

#[derive(Clone, Debug, PartialEq, derive_more::Display)]
pub enum DrawCommand {
	#[display("set_matrix {:?}", _0.as_array())]
	SetMatrix(Matrix3),
	#[display("draw_path {color} {}", path.to_svg())]
	Path { path: BezPath, color: Color },
	#[display("draw_line {color} {from} -> {to} (width {width})")]
	Line {
		from: Vec2,
		to: Vec2,
		color: Color,
		width: f32,
	},
	#[display("draw_circle {color} {center} r={radius}")]
	Circle {
		center: Vec2,
		radius: f32,
		color: Color,
	},
	#[display("draw_rect {color} ({}, {}) - ({}, {})", rect.x0, rect.y0, rect.x1, rect.y1)]
	Rect { rect: Rect, color: Color },
	#[display("draw_text {color} {text:?} at {origin} size={size}")]
	Text {
		text: String,
		origin: Vec2,
		size: f32,
		color: Color,
	},
}

/// A canvas that remembers what it was asked to draw.
#[derive(Default, Debug, Clone)]
pub struct RecordingCanvas {
	commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn commands(&self) -> &[DrawCommand] {
		&self.commands
	}

	pub fn into_commands(self) -> Vec<DrawCommand> {
		self.commands
	}

	pub fn paths(&self) -> impl Iterator<Item = (&BezPath, Color)> + '_ {
		self.commands.iter().filter_map(|command| match command {
			DrawCommand::Path { path, color } => Some((path, *color)),
			_ => None,
		})
	}

	pub fn clear(&mut self) {
		self.commands.clear();
	}
}

impl Canvas for RecordingCanvas {
	fn set_matrix(&mut self, matrix: &Matrix3) {
		self.commands.push(DrawCommand::SetMatrix(*matrix));
	}

	fn draw_path(&mut self, path: &BezPath, color: Color) {
		self.commands.push(DrawCommand::Path {
			path: path.clone(),
			color,
		});
	}

	fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
		self.commands.push(DrawCommand::Line {
			from,
			to,
			color,
			width,
		});
	}

	fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
		self.commands.push(DrawCommand::Circle {
			center,
			radius,
			color,
		});
	}

	fn draw_rect(&mut self, rect: Rect, color: Color) {
		self.commands.push(DrawCommand::Rect { rect, color });
	}

	fn draw_text(&mut self, text: &str, origin: Vec2, size: f32, color: Color) {
		self.commands.push(DrawCommand::Text {
			text: text.to_owned(),
			origin,
			size,
			color,
		});
	}
}
