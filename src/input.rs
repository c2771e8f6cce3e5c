//! Hand-off of touch gestures from the UI thread to the render thread.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

pub const DEFAULT_INPUT_CAPACITY: usize = 16;

/// A gesture in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Display)]
pub enum GestureEvent {
	#[display("tap({x}, {y})")]
	Tap { x: f32, y: f32 },
	/// `start` marks the first sample of a drag.
	#[display("drag({x}, {y}, start={start})")]
	Drag { x: f32, y: f32, start: bool },
}

impl GestureEvent {
	pub fn position(&self) -> glam::Vec2 {
		match *self {
			GestureEvent::Tap { x, y } | GestureEvent::Drag { x, y, .. } => glam::Vec2::new(x, y),
		}
	}
}

/// A bounded multi-producer queue; pushing onto a full queue drops the oldest entry.
///
/// Clones share the same queue.
#[derive(Debug)]
pub struct InputQueue<T> {
	inner: Arc<Mutex<VecDeque<T>>>,
	capacity: usize,
}

impl<T> Clone for InputQueue<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
			capacity: self.capacity,
		}
	}
}

impl<T> Default for InputQueue<T> {
	fn default() -> Self {
		Self::with_capacity(DEFAULT_INPUT_CAPACITY)
	}
}

impl<T> InputQueue<T> {
	/// A capacity of zero is bumped to one.
	pub fn with_capacity(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
			capacity,
		}
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<T>> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	/// Returns the entry dropped to make room, if any.
	pub fn push(&self, item: T) -> Option<T> {
		let mut queue = self.lock();
		let dropped = if queue.len() >= self.capacity {
			queue.pop_front()
		} else {
			None
		};
		if dropped.is_some() {
			tracing::debug!(capacity = self.capacity, "input queue full, dropping oldest");
		}
		queue.push_back(item);
		dropped
	}

	pub fn pop(&self) -> Option<T> {
		self.lock().pop_front()
	}

	/// Takes everything queued so far, oldest first.
	pub fn drain(&self) -> Vec<T> {
		self.lock().drain(..).collect()
	}
}
