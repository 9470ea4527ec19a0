//! Authenticated outbound call path shared by every dispatched request.

// crates.io
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	obs,
	store::TokenStore,
};

/// Default per-call timeout applied when the client config leaves it unset.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound call path that attaches the current credential to every request.
///
/// Cheap to clone: each dispatched task takes its own handle so queue futures
/// own everything they need. All clones share the owning client's cancellation
/// token; firing it aborts any call in flight (the request future is dropped,
/// tearing down the underlying connection) and stops new calls from starting.
#[derive(Clone)]
pub struct Transport {
	client: ReqwestClient,
	base_url: Url,
	store: Arc<dyn TokenStore>,
	timeout: Duration,
	cancel: CancellationToken,
}
impl Transport {
	pub(crate) fn new(
		client: ReqwestClient,
		base_url: Url,
		store: Arc<dyn TokenStore>,
		timeout: Duration,
		cancel: CancellationToken,
	) -> Self {
		Self { client, base_url, store, timeout, cancel }
	}

	/// Starts building a request against `path` resolved on the base URL.
	pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
		let url = self
			.base_url
			.join(path)
			.map_err(|e| ConfigError::InvalidPath { path: path.into(), source: e })?;

		Ok(self.client.request(method, url))
	}

	/// Executes `request` with the current credential attached.
	///
	/// The credential is read from the store once per call, never cached, so a
	/// login or logout that happened after the client was built shapes this
	/// very call. A failing credential read degrades to an unauthenticated
	/// call. The outbound operation races the client teardown signal, and the
	/// per-call deadline covers the whole exchange, response body included:
	/// reqwest carries it past the header phase, so a stalled body read fails
	/// the call just like a stalled connect. Consume bodies through
	/// [`read_json`](Transport::read_json) to keep that mapping.
	pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
		let request = match self.store.current().await {
			Ok(Some(token)) => request.bearer_auth(token.expose()),
			Ok(None) => request,
			Err(e) => {
				obs::warn_degraded("credential_read", e.to_string());

				request
			},
		};
		let send = async {
			let response =
				request.timeout(self.timeout).send().await.map_err(|e| self.classify(e))?;

			response.error_for_status().map_err(|e| self.classify(e))
		};

		tokio::select! {
			() = self.cancel.cancelled() => Err(Error::Cancelled),
			result = send => result,
		}
	}

	/// Reads a JSON response body produced by [`execute`](Transport::execute).
	///
	/// The body stream still runs under the per-call deadline; a timeout firing
	/// mid-body surfaces as [`Error::Timeout`] rather than a decode failure.
	pub async fn read_json<T>(&self, response: Response) -> Result<T>
	where
		T: DeserializeOwned,
	{
		response.json().await.map_err(|e| self.classify(e))
	}

	fn classify(&self, e: ReqwestError) -> Error {
		if e.is_timeout() {
			Error::Timeout { limit: self.timeout }
		} else {
			TransportError::from(e).into()
		}
	}

	/// Base URL every request path resolves against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}
}
impl Debug for Transport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Transport")
			.field("base_url", &self.base_url.as_str())
			.field("timeout", &self.timeout)
			.finish()
	}
}
