use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::task::{Poll, Waker};
use std::time::{Duration, Instant};

struct PromiseState<Output> {
	result: Option<Output>,
	waker: Option<Waker>,
	/// Set once the resolver is gone, whether or not it produced a value.
	settled: bool,
}

struct Shared<Output> {
	state: Mutex<PromiseState<Output>>,
	ready: Condvar,
}

/// A value produced on another thread.
///
/// It can be awaited as a [`Future`](std::future::Future) or waited on with a timeout.
pub struct Promise<Output> {
	shared: Arc<Shared<Output>>,
}

/// The producing half of a [`Promise`].
///
/// Dropping it without calling [`Resolver::resolve`] settles the promise empty.
pub struct Resolver<Output> {
	shared: Arc<Shared<Output>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
	#[error("timed out waiting for a promise")]
	TimedOut,
	/// The resolver was dropped without a value.
	#[error("promise abandoned without a value")]
	Abandoned,
}

impl<Output> Promise<Output> {
	pub fn new() -> (Self, Resolver<Output>) {
		let shared = Arc::new(Shared {
			state: Mutex::new(PromiseState {
				result: None,
				waker: None,
				settled: false,
			}),
			ready: Condvar::new(),
		});
		(
			Promise {
				shared: shared.clone(),
			},
			Resolver { shared },
		)
	}

	/// Blocks until the value is available or `timeout` elapses.
	pub fn wait_timeout(self, timeout: Duration) -> Result<Output, WaitError> {
		let deadline = Instant::now() + timeout;
		let mut state = self
			.shared
			.state
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		loop {
			if let Some(result) = state.result.take() {
				return Ok(result);
			}
			if state.settled {
				return Err(WaitError::Abandoned);
			}
			let remaining = deadline.saturating_duration_since(Instant::now());
			if remaining.is_zero() {
				return Err(WaitError::TimedOut);
			}
			state = self
				.shared
				.ready
				.wait_timeout(state, remaining)
				.unwrap_or_else(PoisonError::into_inner)
				.0;
		}
	}
}

impl<Output> Resolver<Output> {
	pub fn resolve(self, result: Output) {
		self.settle(Some(result));
	}

	fn settle(&self, result: Option<Output>) {
		let mut state = self
			.shared
			.state
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		if state.settled {
			return;
		}
		state.result = result;
		state.settled = true;
		state.waker.take().map(Waker::wake);
		self.shared.ready.notify_all();
	}
}

impl<Output> Drop for Resolver<Output> {
	fn drop(&mut self) {
		self.settle(None);
	}
}

impl<Output> std::future::Future for Promise<Output> {
	type Output = Result<Output, WaitError>;
	fn poll(
		self: std::pin::Pin<&mut Self>,
		cx: &mut std::task::Context<'_>,
	) -> Poll<Self::Output> {
		let mut state = self
			.shared
			.state
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		if let Some(result) = state.result.take() {
			Poll::Ready(Ok(result))
		} else if state.settled {
			Poll::Ready(Err(WaitError::Abandoned))
		} else {
			state.waker = Some(cx.waker().clone());
			Poll::Pending
		}
	}
}
