pub(crate) mod util;
pub use util::{Promise, Resolver, ResultExt, WaitError};

mod matrix;
pub use matrix::*;

mod color;
pub use color::*;

mod projection;
pub use projection::*;

mod canvas;
pub use canvas::*;

pub mod painting;
pub use painting::{Painting, PaintingConfig, PaintingError, StrokeStyle};

pub mod scene;

pub mod input;
pub use input::{GestureEvent, InputQueue};

mod render_thread;
pub use render_thread::*;

mod handle;
pub use handle::*;

mod config;
pub use config::*;
