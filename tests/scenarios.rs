use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use arcanvas::scene::{AlignedModels, AnchorConfig, AnchorSet, CameraPose, PlaneId, PlaneType};
use arcanvas::*;
use glam::{Vec2, Vec3, Vec4};
use kurbo::{PathEl, Point};

const TIMEOUT: Duration = Duration::from_secs(5);

fn flat_painting() -> Painting {
	Painting::new(
		PaintingConfig::builder()
			.local_distance_scale(1.0)
			.rotate_to_plane(false)
			.build(),
	)
	.unwrap()
}

#[test]
fn identity_camera_reduces_to_viewport() {
	let m = perspective_projection_matrix(
		Matrix4::IDENTITY,
		Matrix4::IDENTITY,
		Matrix4::IDENTITY,
		1920.0,
		1080.0,
		false,
	);
	assert_eq!(
		m.as_array(),
		&[960.0, 0.0, 960.0, 0.0, -540.0, 540.0, 0.0, 0.0, 1.0]
	);
	assert_eq!(m, to_matrix3(viewport_matrix(1920.0, 1080.0)));
}

#[test]
fn projected_origin_matches_homogeneous_transform() {
	let model = Matrix4::from_translation(Vec3::new(0.3, 0.0, -2.0)) * Matrix4::from_rotation_y(0.4);
	let view = Matrix4::look_at_rh(Vec3::new(0.0, 1.5, 1.0), Vec3::new(0.0, 0.0, -2.0), Vec3::Y);
	let projection = Matrix4::perspective_rh_gl(1.1, 0.5625, 0.1, 50.0);
	let (w, h) = (1080.0, 1920.0);

	let flat = perspective_projection_matrix(model, view, projection, w, h, false);
	let full = compose(&[model, view, projection, viewport_matrix(w, h)]);
	let expected = transform_vector4(full, Vec4::new(0.0, 0.0, 0.0, 1.0), true).unwrap();
	let actual = flat.map_point(Vec2::ZERO).unwrap();
	assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-2);
	assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-2);
}

#[test]
fn reversed_compose_differs() {
	let a = Matrix4::from_translation(Vec3::new(1.0, 2.0, 0.0));
	let b = Matrix4::from_scale(Vec3::new(2.0, 3.0, 1.0));
	assert_ne!(compose(&[a, b]), compose(&[b, a]));
}

#[test]
fn painting_lifecycle() {
	let mut painting = flat_painting();
	assert!(painting.is_empty());
	assert!(painting.build_paths().is_empty());

	painting.set_color(Color::RED);
	painting
		.add_point(Matrix4::IDENTITY, Vec3::ZERO, true)
		.unwrap();
	assert_eq!(painting.points()[0].position, Vec2::ZERO);
	assert_eq!(painting.model_matrix(), Some(Matrix4::IDENTITY));

	let outcome = painting
		.add_point(Matrix4::IDENTITY, Vec3::new(0.001, 0.0, 0.0), false)
		.unwrap();
	assert_eq!(outcome, painting::AddOutcome::Skipped);
	assert_eq!(painting.len(), 1);

	painting
		.add_point(Matrix4::IDENTITY, Vec3::new(10.0, 0.0, 0.0), false)
		.unwrap();
	let paths = painting.build_paths();
	assert_eq!(paths.len(), 1);
	assert_eq!(paths[0].color, Color::RED);
	assert_eq!(
		paths[0].path.elements(),
		&[
			PathEl::MoveTo(Point::new(0.0, 0.0)),
			PathEl::LineTo(Point::new(10.0, 0.0)),
		]
	);

	painting.reset();
	assert!(painting.is_empty());
	assert!(painting.build_paths().is_empty());
	painting
		.add_point(Matrix4::IDENTITY, Vec3::ZERO, true)
		.unwrap();
	assert_eq!(painting.build_paths()[0].color, Color::BLUE);
}

#[test]
fn gestures_drive_a_painting_on_the_render_thread() {
	let render_thread = RenderThread::spawn("scenario").unwrap();
	let render = render_thread.handle();
	let input = InputQueue::default();

	let producer = {
		let input = input.clone();
		std::thread::spawn(move || {
			for (i, x) in [0.0, 1.0, 2.0, 5.0, 6.0].into_iter().enumerate() {
				input.push(GestureEvent::Drag {
					x,
					y: 0.0,
					start: i == 0 || i == 3,
				});
			}
		})
	};
	producer.join().unwrap();

	let paths = render
		.run_sync(
			move || {
				let mut painting = flat_painting();
				for event in input.drain() {
					if let GestureEvent::Drag { x, y, start } = event {
						painting
							.add_point(Matrix4::IDENTITY, Vec3::new(x, y, 0.0), start)
							.unwrap();
					}
				}
				let frame = FrameMatrices::new(
					Matrix4::IDENTITY,
					Matrix4::IDENTITY,
					100.0,
					100.0,
				);
				let mut canvas = RecordingCanvas::new();
				painting.draw(&mut canvas, &frame);
				canvas.into_commands()
			},
			TIMEOUT,
		)
		.unwrap();

	assert!(matches!(paths[0], DrawCommand::SetMatrix(_)));
	let strokes = paths
		.iter()
		.filter(|command| matches!(command, DrawCommand::Path { .. }))
		.count();
	assert_eq!(strokes, 2);
	render_thread.shutdown();
}

#[test]
fn tapping_near_an_anchor_moves_it() {
	let camera = CameraPose {
		position: Vec3::new(0.0, 1.5, 0.0),
		rotation: Matrix4::IDENTITY,
	};
	let mut anchors = AnchorSet::new(AnchorConfig::default());
	let plane = PlaneId(1);
	let tap = |anchors: &mut AnchorSet, position: Vec3| match anchors.find_nearby(plane, position) {
		Some(id) => anchors.translate(id, position).map(|_| id).unwrap(),
		None => {
			let floor = Matrix4::from_translation(position);
			let models = AlignedModels::new(floor, PlaneType::HorizontalUpwardFacing, position, &camera);
			anchors.insert(plane, position, models).id
		}
	};

	let first = tap(&mut anchors, Vec3::new(0.0, 0.0, -1.0));
	let moved = tap(&mut anchors, Vec3::new(0.05, 0.0, -1.0));
	assert_eq!(first, moved);
	assert_eq!(anchors.len(), 1);

	let replaced = tap(&mut anchors, Vec3::new(1.0, 0.0, -1.0));
	assert_ne!(replaced, first);
	assert_eq!(anchors.len(), 1);
}

struct Session(Arc<AtomicBool>);

impl Release for Session {
	fn release(&mut self) {
		self.0.store(true, Ordering::SeqCst);
	}
}

#[test]
fn handles_are_released_on_the_render_thread() {
	let render_thread = RenderThread::spawn("scenario").unwrap();
	let render = render_thread.handle();
	let released = Arc::new(AtomicBool::new(false));

	let mut handle = {
		let released = released.clone();
		render
			.run_sync(move || OwnedHandle::new(Session(released)), TIMEOUT)
			.unwrap()
	};
	assert_eq!(handle.owner(), render.thread_id());
	assert!(matches!(handle.release(), Err(HandleError::WrongThread { .. })));
	assert!(!released.load(Ordering::SeqCst));

	let (result, handle) = render
		.run_sync(
			move || {
				let result = handle.release().map_err(|err| err.to_string());
				(result, handle)
			},
			TIMEOUT,
		)
		.unwrap();
	assert_eq!(result, Ok(true));
	assert!(handle.is_released());
	assert!(released.load(Ordering::SeqCst));
	render_thread.shutdown();
}
