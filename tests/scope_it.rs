// std
use std::sync::Arc;
// crates.io
use serde_json::Value;
// self
use dredge_client::{
	client::ClientConfig,
	error::Error,
	scope::ClientScope,
	store::{MemoryStore, TokenStore},
	url::Url,
};

fn build_scope() -> ClientScope {
	let base_url =
		Url::parse("http://127.0.0.1:9/v1/").expect("Fixture base URL should parse successfully.");
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());

	ClientScope::new(ClientConfig::new(base_url), store)
}

#[test]
fn acquire_returns_the_held_client_until_release() {
	let scope = build_scope();
	let first = scope.acquire().expect("First acquire should build a client.");
	let again = scope.acquire().expect("Repeated acquire should not rebuild.");

	assert!(Arc::ptr_eq(&first, &again));

	scope.release();

	assert!(first.is_destroyed());
	assert!(
		scope
			.held()
			.expect("The destroyed client should stay held until the next acquire.")
			.is_destroyed()
	);
}

#[test]
fn destroyed_clients_are_replaced_not_revived() {
	let scope = build_scope();
	let first = scope.acquire().expect("First acquire should build a client.");

	scope.release();

	let fresh = scope.acquire().expect("Acquire after release should build a fresh client.");

	assert!(!Arc::ptr_eq(&first, &fresh));
	assert!(first.is_destroyed());
	assert!(!fresh.is_destroyed());

	// Releasing twice in a row only tears down the currently held client.
	scope.release();
	scope.release();

	assert!(fresh.is_destroyed());
}

#[test]
fn release_without_acquire_is_a_no_op() {
	let scope = build_scope();

	scope.release();

	assert!(scope.held().is_none());
}

#[tokio::test]
async fn calls_on_a_released_client_fail_fast() {
	let scope = build_scope();
	let client = scope.acquire().expect("Acquire should build a client.");

	scope.release();

	// Fails before any network activity; the base URL is unroutable on purpose.
	let err = client
		.get_json::<Value>("/widgets")
		.await
		.expect_err("A released client must not dispatch calls.");

	assert!(matches!(err, Error::Cancelled));
}
