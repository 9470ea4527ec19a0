//! Request client composition: queued, authenticated, lifecycle-bound calls.

// crates.io
use reqwest::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{DEFAULT_CALL_TIMEOUT, Transport},
	obs::{self, CallOutcome, CallSpan},
	queue::{QueueConfig, RequestQueue},
	store::TokenStore,
};

/// Boxed future produced by [`ApiCall::dispatch`].
pub type CallFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// One remote operation with its arguments already bound.
///
/// Implementing this trait is the statically-typed equivalent of decorating
/// every method of a generated API surface: each operation type knows how to
/// run itself against the transport, and [`RequestClient::call`] layers
/// queuing, credential injection, and cancellation on top without knowing any
/// operation names.
pub trait ApiCall
where
	Self: Send,
{
	/// Result produced by the operation.
	type Output: Send;

	/// Stable operation label for span and metric fields.
	fn label(&self) -> &'static str {
		"call"
	}

	/// Performs the operation against an owned transport handle.
	fn dispatch(self, transport: Transport) -> CallFuture<Self::Output>;
}

/// Client configuration: one fixed base address plus timeout and queue knobs.
///
/// The base address is selected by the surrounding application (development
/// vs. production target); the client treats it as fixed for its lifetime.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL every request path resolves against.
	pub base_url: Url,
	/// Per-call timeout (defaults to [`DEFAULT_CALL_TIMEOUT`]).
	pub call_timeout: Duration,
	/// Throughput limits for the request queue.
	pub queue: QueueConfig,
}
impl ClientConfig {
	/// Creates a configuration with the default timeout and queue limits.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, call_timeout: DEFAULT_CALL_TIMEOUT, queue: QueueConfig::default() }
	}

	/// Overrides the per-call timeout.
	pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
		self.call_timeout = timeout;

		self
	}

	/// Overrides the queue limits.
	pub fn with_queue(mut self, queue: QueueConfig) -> Self {
		self.queue = queue;

		self
	}
}

/// Queued, authenticated remote API handle bound to one component lifetime.
///
/// Every dispatched call is admitted by the request queue and executed over
/// the authenticated transport. [`destroy`](RequestClient::destroy) fires the
/// shared cancellation token exactly once; afterwards queued-but-unstarted
/// work, in-flight calls, and any new call on the handle all resolve to
/// [`Error::Cancelled`] rather than silently reaching the network. A destroyed
/// client is never revived; [`ClientScope`](crate::scope::ClientScope)
/// replaces it with a fresh instance instead.
pub struct RequestClient {
	transport: Transport,
	queue: RequestQueue,
	cancel: CancellationToken,
	destroyed: AtomicBool,
}
impl RequestClient {
	/// Creates a client that provisions its own reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
		let client = ReqwestClient::builder().build().map_err(ConfigError::from)?;

		Self::with_http_client(config, store, client)
	}

	/// Creates a client reusing a caller-provided reqwest handle.
	pub fn with_http_client(
		config: ClientConfig,
		store: Arc<dyn TokenStore>,
		client: ReqwestClient,
	) -> Result<Self> {
		let cancel = CancellationToken::new();
		let transport = Transport::new(
			client,
			config.base_url,
			store,
			config.call_timeout,
			cancel.clone(),
		);
		let queue = RequestQueue::new(config.queue, cancel.clone())?;

		Ok(Self { transport, queue, cancel, destroyed: AtomicBool::new(false) })
	}

	/// True once [`destroy`](RequestClient::destroy) has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed.load(Ordering::SeqCst)
	}

	/// Tears the client down: marks it destroyed and fires the shared
	/// cancellation token. Idempotent; a second call is a no-op.
	pub fn destroy(&self) {
		if !self.destroyed.swap(true, Ordering::SeqCst) {
			self.cancel.cancel();
		}
	}

	/// Dispatches one bound operation through the queue and transport.
	pub async fn call<A>(&self, call: A) -> Result<A::Output>
	where
		A: ApiCall,
	{
		let label = call.label();
		let task = call.dispatch(self.transport.clone());

		self.run(label, task).await
	}

	/// Closure form of [`call`](RequestClient::call) for ad-hoc operations.
	pub async fn dispatch<T, F, Fut>(&self, label: &'static str, op: F) -> Result<T>
	where
		T: Send,
		F: FnOnce(Transport) -> Fut + Send,
		Fut: Future<Output = Result<T>> + Send,
	{
		let task = op(self.transport.clone());

		self.run(label, task).await
	}

	/// Queued GET returning a deserialized JSON body.
	pub async fn get_json<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned + Send,
	{
		let path = path.to_owned();

		self.dispatch("get_json", move |transport| async move {
			let request = transport.request(Method::GET, &path)?;
			let response = transport.execute(request).await?;

			transport.read_json(response).await
		})
		.await
	}

	/// Queued POST sending a JSON body and returning a deserialized one.
	pub async fn post_json<B, T>(&self, path: &str, body: B) -> Result<T>
	where
		B: Serialize + Send,
		T: DeserializeOwned + Send,
	{
		let path = path.to_owned();

		self.dispatch("post_json", move |transport| async move {
			let request = transport.request(Method::POST, &path)?.json(&body);
			let response = transport.execute(request).await?;

			transport.read_json(response).await
		})
		.await
	}

	/// Queued DELETE discarding the response body.
	pub async fn delete(&self, path: &str) -> Result<()> {
		let path = path.to_owned();

		self.dispatch("delete", move |transport| async move {
			let request = transport.request(Method::DELETE, &path)?;

			transport.execute(request).await.map(|_| ())
		})
		.await
	}

	async fn run<T, F>(&self, label: &'static str, task: F) -> Result<T>
	where
		T: Send,
		F: Future<Output = Result<T>> + Send,
	{
		let span = CallSpan::new(label, "dispatch");

		obs::record_call_outcome(label, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				// Fail fast before the queue; a destroyed handle must never
				// look like it reached the network.
				if self.is_destroyed() {
					return Err(Error::Cancelled);
				}

				self.queue.submit(task).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(label, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(label, CallOutcome::Failure),
		}

		result
	}
}
impl Debug for RequestClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestClient")
			.field("transport", &self.transport)
			.field("destroyed", &self.is_destroyed())
			.finish()
	}
}
