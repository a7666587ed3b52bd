//! Deferred work (focus restoration, delayed redirects).

use parking_lot::Mutex;
use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Runs tasks after a delay.
pub trait TaskScheduler: Send + Sync {
	fn defer(&self, delay: Duration, task: Task);
}

/// [`TaskScheduler`] backed by the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TaskScheduler for TokioScheduler {
	fn defer(&self, delay: Duration, task: Task) {
		match tokio::runtime::Handle::try_current() {
			Ok(handle) => {
				handle.spawn(async move {
					tokio::time::sleep(delay).await;
					task();
				});
			}
			Err(e) => tracing::warn!(error = %e, "no runtime, deferred task dropped"),
		}
	}
}

/// [`TaskScheduler`] that queues tasks until [`run_pending`](Self::run_pending).
#[derive(Default)]
pub struct ManualScheduler {
	queue: Mutex<Vec<(Duration, Task)>>,
}

impl std::fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ManualScheduler")
			.field("pending", &self.queue.lock().len())
			.finish()
	}
}

impl ManualScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Delays of the queued tasks, in scheduling order.
	pub fn pending_delays(&self) -> Vec<Duration> {
		self.queue.lock().iter().map(|(d, _)| *d).collect()
	}

	/// Runs every queued task in scheduling order. Tasks scheduled while
	/// running wait for the next call.
	pub fn run_pending(&self) -> usize {
		let tasks = std::mem::take(&mut *self.queue.lock());
		let count = tasks.len();
		for (_, task) in tasks {
			task();
		}
		count
	}
}

impl TaskScheduler for ManualScheduler {
	fn defer(&self, delay: Duration, task: Task) {
		self.queue.lock().push((delay, task));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	fn test_manual_scheduler_runs_in_order() {
		let scheduler = ManualScheduler::new();
		let log = Arc::new(Mutex::new(Vec::new()));
		for i in 0..3 {
			let log = log.clone();
			scheduler.defer(Duration::from_millis(100), Box::new(move || log.lock().push(i)));
		}

		assert_eq!(scheduler.pending_delays().len(), 3);
		assert_eq!(scheduler.run_pending(), 3);
		assert_eq!(*log.lock(), vec![0, 1, 2]);
		assert_eq!(scheduler.run_pending(), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_tokio_scheduler_runs_after_delay() {
		let ran = Arc::new(AtomicUsize::new(0));
		let counter = ran.clone();
		TokioScheduler.defer(
			Duration::from_millis(20),
			Box::new(move || {
				counter.fetch_add(1, Ordering::SeqCst);
			}),
		);

		assert_eq!(ran.load(Ordering::SeqCst), 0);
		tokio::time::sleep(Duration::from_millis(200)).await;
		assert_eq!(ran.load(Ordering::SeqCst), 1);
	}
}
