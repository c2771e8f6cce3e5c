use std::sync::{Arc, Mutex, PoisonError};

use arcanvas::scene::{
	draw_anchors, AlignedModels, AnchorDrawOptions, AnchorSet, CameraPose, ObjectRotation, PlaneId,
	PlaneType,
};
use arcanvas::{
	AppConfig, FrameMatrices, GestureEvent, InputQueue, Matrix4, Painting, PaintingError,
	RecordingCanvas, RenderThread, ResultExt,
};
use glam::Vec3;

#[derive(thiserror::Error, Debug)]
#[error("no global tracing subscriber set")]
struct NoTracingSubscriber;

fn configure_tracing() -> anyhow::Result<()> {
	let result: Result<(), _> = Err(NoTracingSubscriber);

	let result = result.or_else(|_| {
		let max_level = if cfg!(debug_assertions) {
			tracing::Level::TRACE
		} else {
			tracing::Level::INFO
		};
		tracing::subscriber::set_global_default(
			tracing_subscriber::FmtSubscriber::builder()
				.with_max_level(max_level)
				.finish(),
		)
	});

	Ok(result?)
}

fn configure_logging() -> anyhow::Result<()> {
	configure_tracing()?;

	// Bridge `log` records into `tracing`. If the subscriber above failed, the "log" feature of
	// `tracing` sends events the other way instead.
	#[cfg(feature = "log")]
	tracing_log::LogTracer::init()?;

	Ok(())
}

/// Everything owned by the render thread.
struct Session {
	painting: Painting,
	anchors: AnchorSet,
	frame: FrameMatrices,
	camera: CameraPose,
}

impl Session {
	fn new(config: &AppConfig) -> Result<Self, PaintingError> {
		let eye = Vec3::new(0.0, 1.2, 0.5);
		let view = Matrix4::look_at_rh(eye, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
		let projection = Matrix4::perspective_rh_gl(
			60f32.to_radians(),
			config.viewport_width / config.viewport_height,
			0.1,
			100.0,
		);
		Ok(Self {
			painting: Painting::new(config.painting.clone())?,
			anchors: AnchorSet::new(config.anchors),
			frame: FrameMatrices::new(view, projection, config.viewport_width, config.viewport_height),
			camera: CameraPose {
				position: eye,
				rotation: view.inverse(),
			},
		})
	}

	/// Stands in for a hit test against a floor at y = 0: screen pixels map linearly onto it.
	fn hit(&self, event: &GestureEvent) -> Vec3 {
		let p = event.position();
		Vec3::new(
			p.x / self.frame.width - 0.5,
			0.0,
			-1.0 - p.y / self.frame.height,
		)
	}

	fn handle(&mut self, event: GestureEvent) {
		let world = self.hit(&event);
		let floor = Matrix4::from_translation(world);
		match event {
			GestureEvent::Tap { .. } => {
				let plane = PlaneId(0);
				match self.anchors.find_nearby(plane, world) {
					Some(id) => {
						self.anchors.translate(id, world).ok_or_log();
					}
					None => {
						let models = AlignedModels::new(
							floor,
							PlaneType::HorizontalUpwardFacing,
							world,
							&self.camera,
						);
						self.anchors.insert(plane, world, models);
					}
				}
			}
			GestureEvent::Drag { start, .. } => {
				self.painting.add_point(floor, world, start).ok_or_log();
			}
		}
	}

	fn draw(&self) -> RecordingCanvas {
		let mut canvas = RecordingCanvas::new();
		self.painting.draw(&mut canvas, &self.frame);
		draw_anchors(
			&mut canvas,
			&self.frame,
			&self.anchors,
			ObjectRotation::try_from(0).unwrap_or_default(),
			&AnchorDrawOptions::default(),
		);
		canvas
	}
}

fn synthetic_gestures() -> Vec<GestureEvent> {
	let mut gestures = (0..24)
		.map(|i| {
			let t = i as f32 / 23.0;
			GestureEvent::Drag {
				x: 300.0 + 400.0 * t,
				y: 600.0 + 200.0 * (t * std::f32::consts::TAU).sin(),
				start: i == 0 || i == 12,
			}
		})
		.collect::<Vec<_>>();
	gestures.push(GestureEvent::Tap { x: 540.0, y: 960.0 });
	gestures
}

fn main() -> anyhow::Result<()> {
	if let Err(error) = configure_logging() {
		// We can technically continue without logging.
		tracing::error!(error = error.to_string());
	}

	let config = AppConfig::default();
	let timeout = config.render_timeout;
	let render_thread = RenderThread::spawn("render")?;
	let render = render_thread.handle();

	let session = {
		let config = config.clone();
		let session = render.run_sync(move || Session::new(&config), timeout)??;
		Arc::new(Mutex::new(session))
	};

	let input = InputQueue::with_capacity(config.input_capacity);
	let mut canvas = RecordingCanvas::new();
	for batch in synthetic_gestures().chunks(8) {
		// Gesture callbacks only enqueue, from their own thread.
		std::thread::scope(|scope| {
			scope.spawn(|| {
				for event in batch {
					input.push(*event);
				}
			});
		});

		let session = session.clone();
		let input = input.clone();
		let frame = render.submit(move || {
			let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
			for event in input.drain() {
				tracing::trace!(%event, "gesture");
				session.handle(event);
			}
			session.draw()
		});
		canvas = futures::executor::block_on(frame)??;
	}

	for command in canvas.commands() {
		println!("{command}");
	}

	render_thread.shutdown();
	Ok(())
}
