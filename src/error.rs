//! Error taxonomy shared by the queue, transport, and client layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every failure of a dispatched call surfaces as exactly one of these kinds;
/// nothing is retried or swallowed inside the crate. Saturation rejections are
/// always [`Error::QueueSaturated`] and teardown rejections are always
/// [`Error::Cancelled`], so callers can tell the two apart.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure raised by a token store mutation.
	#[error(transparent)]
	Storage(#[from] crate::store::StoreError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (connection, TLS, non-2xx response).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The per-call timeout elapsed before the server responded.
	#[error("Call exceeded the per-call timeout of {limit:?}.")]
	Timeout {
		/// Configured per-call bound.
		limit: Duration,
	},
	/// Admission was rejected because throughput limits were exceeded and the
	/// queue is configured to fail fast instead of waiting.
	#[error("Request queue is saturated.")]
	QueueSaturated,
	/// Client teardown fired before the call started or while it was in flight.
	#[error("Request was cancelled by client teardown.")]
	Cancelled,
}
impl Error {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Storage(_) => "storage",
			Self::Config(_) => "config",
			Self::Transport(_) => "transport",
			Self::Timeout { .. } => "timeout",
			Self::QueueSaturated => "saturated",
			Self::Cancelled => "cancelled",
		}
	}
}

/// Configuration and validation failures raised during client construction.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Relative path cannot be joined onto the base URL.
	#[error("Path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Queue concurrency must be a positive integer.
	#[error("Queue concurrency must be at least 1.")]
	ZeroConcurrency,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures surfaced by the authenticated call path.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Remote API answered with a non-success status code.
	#[error("Remote API responded with HTTP {status}.")]
	Status {
		/// HTTP status code returned by the remote API.
		status: u16,
		/// Underlying HTTP error carrying the full response context.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		match e.status() {
			Some(status) => Self::Status { status: status.as_u16(), source: Box::new(e) },
			None => Self::network(e),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_into_client_error_transparently() {
		let store_error = StoreError::Backend { message: "token file unreachable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		// Transparent wrapper; the store error's message passes through as-is.
		assert_eq!(client_error.to_string(), store_error.to_string());
	}

	#[test]
	fn error_kinds_are_distinguishable() {
		assert_eq!(Error::QueueSaturated.kind(), "saturated");
		assert_eq!(Error::Cancelled.kind(), "cancelled");
		assert_eq!(Error::Timeout { limit: Duration::from_secs(10) }.kind(), "timeout");
	}
}
