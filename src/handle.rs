//! Ownership of resources that must be released on the thread that created them.

use std::thread::ThreadId;

use thiserror::Error;

/// A resource with an explicit release step, e.g. a native session or texture.
pub trait Release {
	fn release(&mut self);
}

#[derive(Debug, Error)]
pub enum HandleError {
	#[error("handle owned by {owner:?} cannot be released from {current:?}")]
	WrongThread { owner: ThreadId, current: ThreadId },
}

static_assertions::assert_impl_all!(HandleError: std::error::Error, Send, Sync);

/// Holds a [`Release`] resource until it is released on its owning thread.
///
/// Dropping on any other thread leaks the resource.
pub struct OwnedHandle<R: Release> {
	resource: Option<R>,
	owner: ThreadId,
}

impl<R: Release> OwnedHandle<R> {
	/// Owned by the calling thread.
	pub fn new(resource: R) -> Self {
		Self {
			resource: Some(resource),
			owner: std::thread::current().id(),
		}
	}

	pub fn owner(&self) -> ThreadId {
		self.owner
	}

	pub fn is_released(&self) -> bool {
		self.resource.is_none()
	}

	pub fn get(&self) -> Option<&R> {
		self.resource.as_ref()
	}

	pub fn get_mut(&mut self) -> Option<&mut R> {
		self.resource.as_mut()
	}

	/// Returns whether this call did the release.
	pub fn release(&mut self) -> Result<bool, HandleError> {
		if self.resource.is_none() {
			return Ok(false);
		}
		let current = std::thread::current().id();
		if current != self.owner {
			return Err(HandleError::WrongThread {
				owner: self.owner,
				current,
			});
		}
		if let Some(mut resource) = self.resource.take() {
			resource.release();
		}
		Ok(true)
	}
}

impl<R: Release> Drop for OwnedHandle<R> {
	fn drop(&mut self) {
		if let Err(err) = self.release() {
			tracing::error!(%err, "leaking handle");
			std::mem::forget(self.resource.take());
		}
	}
}

impl<R: Release + std::fmt::Debug> std::fmt::Debug for OwnedHandle<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OwnedHandle")
			.field("resource", &self.resource)
			.field("owner", &self.owner)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	#[derive(Debug)]
	struct Counted {
		releases: Arc<AtomicUsize>,
		drops: Arc<AtomicUsize>,
	}

	impl Release for Counted {
		fn release(&mut self) {
			self.releases.fetch_add(1, Ordering::SeqCst);
		}
	}

	impl Drop for Counted {
		fn drop(&mut self) {
			self.drops.fetch_add(1, Ordering::SeqCst);
		}
	}

	fn counted() -> (Counted, Arc<AtomicUsize>, Arc<AtomicUsize>) {
		let releases = Arc::new(AtomicUsize::new(0));
		let drops = Arc::new(AtomicUsize::new(0));
		(
			Counted {
				releases: releases.clone(),
				drops: drops.clone(),
			},
			releases,
			drops,
		)
	}

	#[test]
	fn release_is_idempotent() {
		let (resource, releases, drops) = counted();
		let mut handle = OwnedHandle::new(resource);
		assert!(handle.get().is_some());
		assert!(handle.release().unwrap());
		assert!(!handle.release().unwrap());
		assert!(handle.is_released());
		assert!(handle.get().is_none());
		drop(handle);
		assert_eq!(releases.load(Ordering::SeqCst), 1);
		assert_eq!(drops.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn drop_releases_on_owner() {
		let (resource, releases, _) = counted();
		drop(OwnedHandle::new(resource));
		assert_eq!(releases.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn other_threads_cannot_release() {
		let (resource, releases, drops) = counted();
		let owner = std::thread::current().id();
		let mut handle = OwnedHandle::new(resource);
		std::thread::spawn(move || {
			assert!(matches!(
				handle.release(),
				Err(HandleError::WrongThread { owner: o, .. }) if o == owner
			));
			// Dropped here, on the wrong thread: leaked.
		})
		.join()
		.unwrap();
		assert_eq!(releases.load(Ordering::SeqCst), 0);
		assert_eq!(drops.load(Ordering::SeqCst), 0);
	}
}
