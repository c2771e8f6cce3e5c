//! A dedicated thread that owns rendering state and runs submitted tasks one at a time.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{JoinHandle, ThreadId};
use std::time::Duration;

use thiserror::Error;

use crate::util::{Promise, WaitError};

#[derive(Debug, Error)]
pub enum RenderThreadError {
	#[error("failed to spawn the render thread")]
	Spawn(#[from] std::io::Error),
	#[error("render thread task timed out")]
	Timeout,
	#[error("render thread is not running")]
	Disconnected,
	#[error("render thread task panicked: {0}")]
	TaskPanicked(String),
}

static_assertions::assert_impl_all!(RenderThreadError: std::error::Error, Send, Sync);

impl From<WaitError> for RenderThreadError {
	fn from(value: WaitError) -> Self {
		match value {
			WaitError::TimedOut => Self::Timeout,
			WaitError::Abandoned => Self::Disconnected,
		}
	}
}

type Task = Box<dyn FnOnce() + Send>;

/// Cheap to clone, usable from any thread.
#[derive(Clone)]
pub struct RenderThreadHandle {
	sender: Arc<Mutex<Option<Sender<Task>>>>,
	thread_id: ThreadId,
}

pub struct RenderThread {
	handle: RenderThreadHandle,
	join: Option<JoinHandle<()>>,
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
	payload
		.downcast_ref::<&str>()
		.map(|s| s.to_string())
		.or_else(|| payload.downcast_ref::<String>().cloned())
		.unwrap_or_else(|| "unknown panic".to_owned())
}

fn run_caught<T>(f: impl FnOnce() -> T) -> Result<T, RenderThreadError> {
	catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
		let message = panic_message(payload);
		tracing::error!(%message, "render thread task panicked");
		RenderThreadError::TaskPanicked(message)
	})
}

impl RenderThread {
	pub fn spawn(name: impl Into<String>) -> Result<Self, RenderThreadError> {
		let name = name.into();
		let (sender, receiver) = mpsc::channel::<Task>();
		let join = std::thread::Builder::new().name(name.clone()).spawn(move || {
			let _span = tracing::info_span!("render_thread", %name).entered();
			tracing::debug!("started");
			for task in receiver {
				task();
			}
			tracing::debug!("stopped");
		})?;
		Ok(Self {
			handle: RenderThreadHandle {
				sender: Arc::new(Mutex::new(Some(sender))),
				thread_id: join.thread().id(),
			},
			join: Some(join),
		})
	}

	pub fn handle(&self) -> RenderThreadHandle {
		self.handle.clone()
	}

	/// Lets queued tasks finish, then joins the thread.
	pub fn shutdown(mut self) {
		self.stop();
	}

	fn stop(&mut self) {
		self.handle.close();
		let Some(join) = self.join.take() else {
			return;
		};
		if std::thread::current().id() == self.handle.thread_id {
			tracing::warn!("render thread dropped from itself, detaching");
			return;
		}
		if join.join().is_err() {
			tracing::error!("render thread exited with a panic");
		}
	}
}

impl Drop for RenderThread {
	fn drop(&mut self) {
		self.stop();
	}
}

impl RenderThreadHandle {
	pub fn thread_id(&self) -> ThreadId {
		self.thread_id
	}

	pub fn is_render_thread(&self) -> bool {
		std::thread::current().id() == self.thread_id
	}

	pub fn is_running(&self) -> bool {
		self
			.sender
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.is_some()
	}

	fn close(&self) {
		self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
	}

	/// Queues `f` behind every task already submitted.
	///
	/// If the thread is gone the promise is abandoned, which waiting turns into
	/// [`RenderThreadError::Disconnected`].
	pub fn submit<T, F>(&self, f: F) -> Promise<Result<T, RenderThreadError>>
	where
		T: Send + 'static,
		F: FnOnce() -> T + Send + 'static,
	{
		let (promise, resolver) = Promise::new();
		let task: Task = Box::new(move || resolver.resolve(run_caught(f)));
		let sent = match &*self.sender.lock().unwrap_or_else(PoisonError::into_inner) {
			Some(sender) => sender.send(task).is_ok(),
			None => false,
		};
		if !sent {
			tracing::warn!("task submitted to a stopped render thread");
		}
		promise
	}

	/// Runs `f` on the render thread and waits for its result.
	///
	/// Called from the render thread itself, `f` runs inline. A timed out task still runs later.
	pub fn run_sync<T, F>(&self, f: F, timeout: Duration) -> Result<T, RenderThreadError>
	where
		T: Send + 'static,
		F: FnOnce() -> T + Send + 'static,
	{
		if self.is_render_thread() {
			return run_caught(f);
		}
		self.submit(f).wait_timeout(timeout)?
	}
}
