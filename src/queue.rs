//! Concurrency-bounded FIFO execution pipeline for arbitrary async tasks.

// std
use std::collections::VecDeque;
// crates.io
use tokio::{
	sync::{Mutex as AsyncMutex, OwnedSemaphorePermit, Semaphore},
	time::{self, Instant},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Throughput limits applied to one [`RequestQueue`]. Immutable once the queue
/// is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueConfig {
	/// Maximum number of simultaneously running tasks. Must be at least 1.
	pub concurrency: usize,
	/// Maximum number of task starts within any sliding [`interval`] window;
	/// `None` leaves starts unbounded.
	///
	/// [`interval`]: QueueConfig::interval
	pub interval_cap: Option<NonZeroU32>,
	/// Length of the sliding rate window; [`Duration::ZERO`] disables the
	/// interval cap entirely.
	pub interval: Duration,
	/// What to do with a submission the limits cannot admit right away.
	pub saturation: SaturationPolicy,
}
impl QueueConfig {
	/// Overrides the concurrency ceiling.
	pub fn with_concurrency(mut self, concurrency: usize) -> Self {
		self.concurrency = concurrency;

		self
	}

	/// Overrides the interval cap.
	pub fn with_interval_cap(mut self, cap: NonZeroU32) -> Self {
		self.interval_cap = Some(cap);

		self
	}

	/// Overrides the sliding window length.
	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = interval;

		self
	}

	/// Overrides the saturation policy.
	pub fn with_saturation(mut self, saturation: SaturationPolicy) -> Self {
		self.saturation = saturation;

		self
	}
}
impl Default for QueueConfig {
	fn default() -> Self {
		Self {
			concurrency: 1,
			interval_cap: None,
			interval: Duration::ZERO,
			saturation: SaturationPolicy::Wait,
		}
	}
}

/// Policy applied when a submission exceeds the queue's throughput limits.
///
/// The policy is explicit configuration; a queue never silently switches
/// between waiting and rejecting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaturationPolicy {
	/// Hold the submission until capacity frees up (cancellation-aware).
	#[default]
	Wait,
	/// Fail the submission with [`Error::QueueSaturated`] instead of waiting.
	Reject,
}

/// Ordered, concurrency-bounded execution pipeline.
///
/// Tasks are opaque futures; the queue only decides *when* they start. Start
/// order is FIFO: admission is a fair semaphore permit followed, when a rate
/// limit is configured, by a fair pacer mutex, so no submission overtakes an
/// earlier one. Completion order is whatever the tasks themselves produce.
///
/// The cancellation token handed to [`RequestQueue::new`] is the owning
/// client's teardown signal. Once it fires, admission stops and tasks that
/// have not finished resolve to [`Error::Cancelled`].
#[derive(Debug)]
pub struct RequestQueue {
	permits: Arc<Semaphore>,
	pacer: Option<AsyncMutex<IntervalWindow>>,
	saturation: SaturationPolicy,
	cancel: CancellationToken,
}
impl RequestQueue {
	/// Builds a queue enforcing `config` and bound to the provided teardown
	/// signal.
	pub fn new(config: QueueConfig, cancel: CancellationToken) -> Result<Self> {
		if config.concurrency == 0 {
			return Err(ConfigError::ZeroConcurrency.into());
		}

		let pacer = config
			.interval_cap
			.filter(|_| !config.interval.is_zero())
			.map(|cap| AsyncMutex::new(IntervalWindow::new(cap, config.interval)));

		Ok(Self {
			permits: Arc::new(Semaphore::new(config.concurrency)),
			pacer,
			saturation: config.saturation,
			cancel,
		})
	}

	/// Admits `task` and runs it once the limits allow, returning its result.
	///
	/// A task's own failure fails only this submission; sibling tasks are
	/// unaffected.
	pub async fn submit<T, F>(&self, task: F) -> Result<T>
	where
		T: Send,
		F: Future<Output = Result<T>> + Send,
	{
		// Held until the task resolves; dropping it frees the concurrency slot.
		let _permit = self.admit().await?;

		tokio::select! {
			() = self.cancel.cancelled() => Err(Error::Cancelled),
			result = task => result,
		}
	}

	async fn admit(&self) -> Result<OwnedSemaphorePermit> {
		if self.cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let permit = match self.saturation {
			SaturationPolicy::Reject => self
				.permits
				.clone()
				.try_acquire_owned()
				.map_err(|_| Error::QueueSaturated)?,
			SaturationPolicy::Wait => tokio::select! {
				() = self.cancel.cancelled() => return Err(Error::Cancelled),
				permit = self.permits.clone().acquire_owned() =>
					permit.map_err(|_| Error::Cancelled)?,
			},
		};

		if let Some(pacer) = &self.pacer {
			let mut window = tokio::select! {
				() = self.cancel.cancelled() => return Err(Error::Cancelled),
				guard = pacer.lock() => guard,
			};

			loop {
				match window.next_slot(Instant::now()) {
					None => break,
					Some(_) if self.saturation == SaturationPolicy::Reject =>
						return Err(Error::QueueSaturated),
					Some(at) => tokio::select! {
						() = self.cancel.cancelled() => return Err(Error::Cancelled),
						() = time::sleep_until(at) => {},
					},
				}
			}

			window.record(Instant::now());
		}

		Ok(permit)
	}
}

/// Sliding window of task start instants backing the interval cap.
///
/// Only constructed with a positive interval; the zero-interval "disabled"
/// case never builds a pacer.
#[derive(Debug)]
struct IntervalWindow {
	capacity: usize,
	interval: Duration,
	starts: VecDeque<Instant>,
}
impl IntervalWindow {
	fn new(capacity: NonZeroU32, interval: Duration) -> Self {
		Self { capacity: capacity.get() as usize, interval, starts: VecDeque::new() }
	}

	fn prune(&mut self, now: Instant) {
		while self
			.starts
			.front()
			.is_some_and(|&start| now.duration_since(start) >= self.interval)
		{
			self.starts.pop_front();
		}
	}

	/// Returns `None` when a start slot is free now, otherwise the earliest
	/// instant at which one frees up.
	fn next_slot(&mut self, now: Instant) -> Option<Instant> {
		self.prune(now);

		if self.starts.len() < self.capacity {
			None
		} else {
			self.starts.front().map(|&start| start + self.interval)
		}
	}

	fn record(&mut self, now: Instant) {
		self.starts.push_back(now);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn cap(value: u32) -> NonZeroU32 {
		NonZeroU32::new(value).expect("Interval cap fixture should be non-zero.")
	}

	#[tokio::test]
	async fn window_frees_slots_as_the_interval_slides() {
		let interval = Duration::from_millis(100);
		let mut window = IntervalWindow::new(cap(2), interval);
		let t0 = Instant::now();

		assert_eq!(window.next_slot(t0), None);
		window.record(t0);
		assert_eq!(window.next_slot(t0), None);
		window.record(t0);

		// Window is full; the earliest slot opens one interval after t0.
		assert_eq!(window.next_slot(t0), Some(t0 + interval));

		let later = t0 + interval;

		assert_eq!(window.next_slot(later), None);
		assert!(window.starts.is_empty());
	}

	#[tokio::test]
	async fn zero_concurrency_is_rejected_at_construction() {
		let config = QueueConfig::default().with_concurrency(0);
		let err = RequestQueue::new(config, CancellationToken::new())
			.expect_err("Zero concurrency should be a configuration error.");

		assert!(matches!(err, Error::Config(ConfigError::ZeroConcurrency)));
	}

	#[tokio::test]
	async fn zero_interval_disables_the_cap() {
		let config = QueueConfig::default().with_interval_cap(cap(1));
		let queue = RequestQueue::new(config, CancellationToken::new())
			.expect("Queue with a zero interval should build.");

		assert!(queue.pacer.is_none());

		for _ in 0..3 {
			queue
				.submit(async { Ok(()) })
				.await
				.expect("Uncapped submissions should all run immediately.");
		}
	}
}
