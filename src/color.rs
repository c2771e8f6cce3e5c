use glam::Vec4;
use thiserror::Error;

/// A packed 32-bit ARGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{_0:08x}")]
pub struct Color(pub u32);

#[derive(Debug, Error)]
#[error("invalid color {input:?}")]
pub struct ColorError {
	input: String,
	#[source]
	source: csscolorparser::ParseColorError,
}

static_assertions::assert_impl_all!(ColorError: std::error::Error, Send, Sync);

impl Color {
	pub const TRANSPARENT: Self = Self(0x0000_0000);
	pub const BLACK: Self = Self(0xff00_0000);
	pub const WHITE: Self = Self(0xffff_ffff);
	pub const RED: Self = Self(0xffff_0000);
	pub const GREEN: Self = Self(0xff00_ff00);
	pub const BLUE: Self = Self(0xff00_00ff);

	pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
		Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
	}

	/// Converts from the `0xRRGGBBAA` packing used by palette tables.
	pub const fn from_rgba_u32(rgba: u32) -> Self {
		Self(rgba.rotate_right(8))
	}

	/// Parses any CSS color string, e.g. `"tomato"` or `"#ff000080"`.
	pub fn parse(input: &str) -> Result<Self, ColorError> {
		let [r, g, b, a] = csscolorparser::parse(input)
			.map_err(|source| ColorError {
				input: input.to_owned(),
				source,
			})?
			.to_rgba8();
		Ok(Self::from_argb(a, r, g, b))
	}

	pub const fn alpha(self) -> u8 {
		(self.0 >> 24) as u8
	}

	pub const fn red(self) -> u8 {
		(self.0 >> 16) as u8
	}

	pub const fn green(self) -> u8 {
		(self.0 >> 8) as u8
	}

	pub const fn blue(self) -> u8 {
		self.0 as u8
	}

	/// Normalized `(r, g, b, a)` components.
	pub fn to_rgba(self) -> Vec4 {
		Vec4::new(
			self.red() as f32,
			self.green() as f32,
			self.blue() as f32,
			self.alpha() as f32,
		) / 255.0
	}
}
