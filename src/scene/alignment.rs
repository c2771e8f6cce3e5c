//! Model matrices that place a 2D object on a tracked plane.

use glam::{Vec3, Vec4};
use std::f32::consts::PI;

use crate::{plane_alignment_matrix, Matrix4};

use super::{ObjectRotation, PlaneType};

/// Camera position and orientation in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
	pub position: Vec3,
	pub rotation: Matrix4,
}

/// The model matrices of one anchor, one per [`ObjectRotation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignedModels {
	pub axis: Matrix4,
	pub camera: Matrix4,
	pub snap: Matrix4,
}

impl AlignedModels {
	pub fn new(
		plane_model: Matrix4,
		plane_type: PlaneType,
		anchor_position: Vec3,
		camera: &CameraPose,
	) -> Self {
		Self {
			axis: axis_aligned(plane_model),
			camera: camera_aligned(anchor_position, plane_model, plane_type, camera),
			snap: snap_aligned(plane_model, anchor_position),
		}
	}

	pub fn get(&self, rotation: ObjectRotation) -> Matrix4 {
		match rotation {
			ObjectRotation::AxisAligned => self.axis,
			ObjectRotation::CameraAligned => self.camera,
			ObjectRotation::SnapAligned => self.snap,
		}
	}

	/// Premultiplies every model by `transform`.
	pub fn map(&self, transform: Matrix4) -> Self {
		Self {
			axis: transform * self.axis,
			camera: transform * self.camera,
			snap: transform * self.snap,
		}
	}
}

pub fn axis_aligned(plane_model: Matrix4) -> Matrix4 {
	plane_model * plane_alignment_matrix()
}

/// Like [`axis_aligned`], but centred on the anchor rather than on the plane.
pub fn snap_aligned(plane_model: Matrix4, anchor_position: Vec3) -> Matrix4 {
	let mut model = plane_model;
	model.w_axis = anchor_position.extend(1.0);
	model * plane_alignment_matrix()
}

fn project_onto_plane(v: Vec3, normal: Vec3) -> Vec3 {
	v - normal * (v.dot(normal) / normal.length_squared())
}

/// Unit axis of `m` applied to the homogeneous point `axis`, as in the object's own frame.
fn object_axis(m: Matrix4, axis: Vec4) -> Vec3 {
	(m * axis).truncate().normalize_or_zero()
}

/// Rotates the object so its Y axis turns towards the camera.
///
/// On walls the object follows the camera's up vector; on floors and ceilings it faces the line
/// from the camera to the hit location.
pub fn camera_aligned(
	hit: Vec3,
	plane_model: Matrix4,
	plane_type: PlaneType,
	camera: &CameraPose,
) -> Matrix4 {
	let back_to_origin = Matrix4::from_translation(-hit);
	let back_to_plane = Matrix4::from_translation(hit);
	let pre = back_to_origin * plane_model * plane_alignment_matrix();

	let object_y = object_axis(pre, Vec4::new(0.0, 1.0, 0.0, 1.0));
	let object_z = object_axis(pre, Vec4::new(0.0, 0.0, 1.0, 1.0));

	let target = match plane_type {
		// Row-vector product, i.e. the transpose applied to the up vector.
		PlaneType::Vertical => (camera.rotation.transpose() * Vec4::new(0.0, 1.0, 0.0, 1.0)).truncate(),
		PlaneType::HorizontalUpwardFacing | PlaneType::HorizontalDownwardFacing => {
			hit - camera.position
		}
	};

	let projected = -project_onto_plane(target, object_z);
	let Some(cross) = object_y.cross(projected).try_normalize() else {
		tracing::debug!(?object_y, ?projected, "degenerate camera alignment");
		return back_to_plane * pre;
	};
	let direction = cross.dot(object_z);
	let Some(axis) = (object_z * direction).try_normalize() else {
		return back_to_plane * pre;
	};
	let rotate = Matrix4::from_axis_angle(axis, object_y.angle_between(projected));

	match plane_type {
		PlaneType::HorizontalUpwardFacing => back_to_plane * rotate * pre,
		PlaneType::Vertical | PlaneType::HorizontalDownwardFacing => {
			let flip = Matrix4::from_axis_angle(axis, PI);
			back_to_plane * flip * rotate * pre
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use std::f32::consts::FRAC_PI_2;

	fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
		assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-4);
		assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-4);
		assert_abs_diff_eq!(actual.z, expected.z, epsilon = 1e-4);
	}

	#[test]
	fn axis_aligned_lays_object_flat() {
		let plane = Matrix4::from_translation(Vec3::new(1.0, 0.0, -2.0));
		let model = axis_aligned(plane);
		// The object's Y axis points along the plane's Z axis.
		assert_vec3_eq(model.transform_vector3(Vec3::Y), Vec3::Z);
		assert_vec3_eq(model.transform_point3(Vec3::ZERO), Vec3::new(1.0, 0.0, -2.0));
	}

	#[test]
	fn snap_aligned_moves_to_anchor() {
		let plane = Matrix4::from_rotation_y(0.5) * Matrix4::from_translation(Vec3::new(1.0, 0.0, -2.0));
		let anchor = Vec3::new(0.5, 0.0, -1.5);
		let model = snap_aligned(plane, anchor);
		assert_vec3_eq(model.transform_point3(Vec3::ZERO), anchor);
		assert_vec3_eq(
			model.transform_vector3(Vec3::X),
			axis_aligned(plane).transform_vector3(Vec3::X),
		);
	}

	#[test]
	fn camera_aligned_keeps_anchor_in_place() {
		let hit = Vec3::new(0.0, 0.0, -1.0);
		let plane = Matrix4::from_translation(hit);
		let camera = CameraPose {
			position: Vec3::new(1.0, 1.5, 0.5),
			rotation: Matrix4::IDENTITY,
		};
		for plane_type in [
			PlaneType::HorizontalUpwardFacing,
			PlaneType::HorizontalDownwardFacing,
			PlaneType::Vertical,
		] {
			let model = camera_aligned(hit, plane, plane_type, &camera);
			assert_vec3_eq(model.transform_point3(Vec3::ZERO), hit);
		}
	}

	#[test]
	fn camera_aligned_floor_turns_towards_hit_direction() {
		let hit = Vec3::new(0.0, 0.0, -1.0);
		let plane = Matrix4::from_translation(hit);
		let camera = CameraPose {
			position: Vec3::new(1.0, 1.5, -1.0),
			rotation: Matrix4::IDENTITY,
		};
		let model = camera_aligned(hit, plane, PlaneType::HorizontalUpwardFacing, &camera);
		// The camera looks along -X onto the hit, so the object's up direction becomes +X.
		assert_vec3_eq(model.transform_vector3(Vec3::Y), Vec3::X);
	}

	#[test]
	fn camera_aligned_ceiling_is_flipped() {
		let hit = Vec3::new(0.0, 0.0, -1.0);
		let plane = Matrix4::from_translation(hit);
		let camera = CameraPose {
			position: Vec3::new(1.0, 1.5, -1.0),
			rotation: Matrix4::IDENTITY,
		};
		let model = camera_aligned(hit, plane, PlaneType::HorizontalDownwardFacing, &camera);
		// Same turn as on a floor, then half a turn about the plane normal.
		assert_vec3_eq(model.transform_vector3(Vec3::Y), -Vec3::X);
		assert_vec3_eq(model.transform_vector3(Vec3::X), Vec3::Z);
	}

	#[test]
	fn camera_aligned_wall_follows_camera_up() {
		let hit = Vec3::new(0.0, 0.0, -1.0);
		// A wall facing +Z.
		let plane = Matrix4::from_translation(hit) * Matrix4::from_rotation_x(FRAC_PI_2);
		// Looking straight at the wall, the hit direction has no in-plane part, so only the
		// camera's roll can orient the object.
		let rolled = |roll: f32| CameraPose {
			position: Vec3::new(0.0, 0.0, 1.0),
			rotation: Matrix4::from_rotation_z(roll),
		};

		let model = camera_aligned(hit, plane, PlaneType::Vertical, &rolled(FRAC_PI_2));
		assert_vec3_eq(model.transform_point3(Vec3::ZERO), hit);
		assert_vec3_eq(model.transform_vector3(Vec3::Y), Vec3::X);

		let model = camera_aligned(hit, plane, PlaneType::Vertical, &rolled(-FRAC_PI_2));
		assert_vec3_eq(model.transform_vector3(Vec3::Y), -Vec3::X);
	}

	#[test]
	fn camera_aligned_degenerate_falls_back_to_axis_aligned() {
		let hit = Vec3::new(0.0, 0.0, -1.0);
		let plane = Matrix4::from_translation(hit);
		// Straight above the hit, the view direction has no component in the plane.
		let camera = CameraPose {
			position: Vec3::new(0.0, 2.0, -1.0),
			rotation: Matrix4::IDENTITY,
		};
		let model = camera_aligned(hit, plane, PlaneType::HorizontalUpwardFacing, &camera);
		assert!(model.abs_diff_eq(axis_aligned(plane), 1e-5));
	}

	#[test]
	fn aligned_models_select_and_map() {
		let camera = CameraPose {
			position: Vec3::new(0.0, 1.0, 1.0),
			rotation: Matrix4::IDENTITY,
		};
		let plane = Matrix4::IDENTITY;
		let models = AlignedModels::new(plane, PlaneType::HorizontalUpwardFacing, Vec3::ZERO, &camera);
		assert_eq!(models.get(ObjectRotation::AxisAligned), axis_aligned(plane));
		assert_eq!(models.get(ObjectRotation::SnapAligned), models.snap);

		let shift = Matrix4::from_translation(Vec3::X);
		let moved = models.map(shift);
		assert_eq!(moved.camera, shift * models.camera);
	}
}
