use std::time::Duration;

use crate::input::DEFAULT_INPUT_CAPACITY;
use crate::painting::PaintingConfig;
use crate::scene::AnchorConfig;

/// Everything the demo needs to set up a session.
#[derive(Clone, Debug, PartialEq, bon::Builder)]
pub struct AppConfig {
	#[builder(default)]
	pub painting: PaintingConfig,
	#[builder(default)]
	pub anchors: AnchorConfig,
	#[builder(default = 1080.0)]
	pub viewport_width: f32,
	#[builder(default = 1920.0)]
	pub viewport_height: f32,
	#[builder(default = DEFAULT_INPUT_CAPACITY)]
	pub input_capacity: usize,
	#[builder(default = Duration::from_secs(1))]
	pub render_timeout: Duration,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::builder().build()
	}
}
