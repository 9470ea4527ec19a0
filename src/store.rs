//! Credential source contract and built-in token store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Credential source contract read by the authenticated transport.
///
/// The transport reads [`current`](TokenStore::current) once per outbound call,
/// never at client construction, so a login or logout issued after a client was
/// built is reflected on the very next call. Implementations must be shareable
/// across concurrent calls; the core only ever reads, login/logout mutations
/// come from the surrounding application.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the credential as of now, if any.
	fn current(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Persists a new credential; subsequent reads return it.
	fn login(&self, token: TokenSecret) -> StoreFuture<'_, ()>;

	/// Clears the persisted credential; subsequent reads return `None`.
	/// Idempotent.
	fn logout(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
