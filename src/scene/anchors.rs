use glam::Vec3;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::VecDeque;

use super::{AlignedModels, AnchorId, ObjectRotation, PlaneId, SceneError};
use crate::Matrix4;

#[derive(Clone, Copy, Debug, PartialEq, bon::Builder)]
pub struct AnchorConfig {
	/// The oldest anchor is dropped once this many are tracked. Zero means unbounded.
	#[builder(default = 1)]
	pub max_tracked: usize,
	/// A touch this close to an existing anchor on the same plane edits it instead of adding one.
	#[builder(default = 0.1)]
	pub edit_radius: f32,
}

impl Default for AnchorConfig {
	fn default() -> Self {
		Self::builder().build()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
	pub id: AnchorId,
	pub plane: PlaneId,
	pub position: Vec3,
	pub models: AlignedModels,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inserted {
	pub id: AnchorId,
	pub evicted: Option<AnchorId>,
}

/// Tracked anchors in insertion order.
#[derive(Clone, Debug, Default)]
pub struct AnchorSet {
	config: AnchorConfig,
	anchors: VecDeque<Anchor>,
	next_id: u64,
}

impl AnchorSet {
	pub fn new(config: AnchorConfig) -> Self {
		Self {
			config,
			anchors: VecDeque::new(),
			next_id: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.anchors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.anchors.is_empty()
	}

	pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
		self.anchors.iter().find(|anchor| anchor.id == id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Anchor> + '_ {
		self.anchors.iter()
	}

	pub fn anchors_on(&self, plane: PlaneId) -> impl Iterator<Item = &Anchor> + '_ {
		self.anchors.iter().filter(move |anchor| anchor.plane == plane)
	}

	/// The closest anchor on `plane` within the edit radius of `position`.
	pub fn find_nearby(&self, plane: PlaneId, position: Vec3) -> Option<AnchorId> {
		self
			.anchors_on(plane)
			.map(|anchor| (anchor.id, anchor.position.distance(position)))
			.filter(|(_, distance)| *distance < self.config.edit_radius)
			.min_by_key(|(_, distance)| OrderedFloat(*distance))
			.map(|(id, _)| id)
	}

	pub fn insert(&mut self, plane: PlaneId, position: Vec3, models: AlignedModels) -> Inserted {
		let evicted = if self.config.max_tracked > 0 && self.anchors.len() >= self.config.max_tracked {
			self.anchors.pop_front().map(|anchor| {
				tracing::info!(anchor = %anchor.id, "evicting oldest anchor");
				anchor.id
			})
		} else {
			None
		};

		let id = AnchorId(self.next_id);
		self.next_id += 1;
		tracing::info!(anchor = %id, %plane, %position, "anchor added");
		self.anchors.push_back(Anchor {
			id,
			plane,
			position,
			models,
		});
		Inserted { id, evicted }
	}

	pub fn remove(&mut self, id: AnchorId) -> Option<Anchor> {
		let index = self.anchors.iter().position(|anchor| anchor.id == id)?;
		self.anchors.remove(index)
	}

	/// Moves an anchor, carrying its models along.
	pub fn translate(&mut self, id: AnchorId, new_position: Vec3) -> Result<(), SceneError> {
		let anchor = self
			.anchors
			.iter_mut()
			.find(|anchor| anchor.id == id)
			.ok_or(SceneError::UnknownAnchor(id))?;
		let movement = new_position - anchor.position;
		anchor.models = anchor.models.map(Matrix4::from_translation(movement));
		anchor.position = new_position;
		tracing::debug!(anchor = %id, %movement, "anchor moved");
		Ok(())
	}

	/// Drops every anchor for which `is_tracking` returns false.
	pub fn retain_tracking(&mut self, mut is_tracking: impl FnMut(AnchorId) -> bool) -> Vec<AnchorId> {
		let (kept, lost): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.anchors)
			.into_iter()
			.partition(|anchor| is_tracking(anchor.id));
		self.anchors = kept;
		let lost = lost.into_iter().map(|anchor| anchor.id).collect_vec();
		if !lost.is_empty() {
			tracing::debug!(?lost, "anchors lost tracking");
		}
		lost
	}

	pub fn models(&self, rotation: ObjectRotation) -> impl Iterator<Item = Matrix4> + '_ {
		self.anchors.iter().map(move |anchor| anchor.models.get(rotation))
	}
}
