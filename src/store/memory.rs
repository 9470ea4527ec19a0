//! Thread-safe in-memory [`TokenStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	store::{StoreFuture, TokenStore},
};

/// Keeps the credential in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<TokenSecret>>>);
impl MemoryStore {
	/// Creates a store preloaded with a credential.
	pub fn with_token(token: TokenSecret) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}
}
impl TokenStore for MemoryStore {
	fn current(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn login(&self, token: TokenSecret) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}

	fn logout(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = None;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn login_is_visible_to_subsequent_reads() {
		let store = MemoryStore::default();

		assert!(
			store
				.current()
				.await
				.expect("Reading an empty memory store should succeed.")
				.is_none()
		);

		store
			.login(TokenSecret::new("abc"))
			.await
			.expect("Login against the memory store should succeed.");

		let token = store
			.current()
			.await
			.expect("Reading the memory store should succeed.")
			.expect("Token should be present after login.");

		assert_eq!(token.expose(), "abc");
	}

	#[tokio::test]
	async fn logout_is_idempotent() {
		let store = MemoryStore::with_token(TokenSecret::new("abc"));

		store.logout().await.expect("First logout should succeed.");
		store.logout().await.expect("Second logout should succeed as well.");

		assert!(
			store
				.current()
				.await
				.expect("Reading the memory store should succeed.")
				.is_none()
		);
	}
}
