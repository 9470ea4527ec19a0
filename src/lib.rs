//! Client-side request broker—bounded-concurrency queuing, per-call bearer
//! injection, and lifecycle-scoped cancellation in one crate sitting between a
//! UI and a remote HTTP API.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod guard;
pub mod http;
pub mod obs;
pub mod queue;
pub mod scope;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{ClientConfig, RequestClient},
		store::{MemoryStore, TokenStore},
	};

	/// Client configuration pointing at a mock server base URL.
	pub fn test_config(base_url: &str) -> ClientConfig {
		ClientConfig::new(Url::parse(base_url).expect("Test base URL should parse successfully."))
	}

	/// Constructs a [`RequestClient`] backed by an in-memory token store,
	/// returning the store handle alongside so tests can drive login/logout.
	pub fn build_test_client(config: ClientConfig) -> (Arc<RequestClient>, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = RequestClient::new(config, store)
			.expect("Failed to build request client for tests.");

		(Arc::new(client), store_backend)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroU32,
		pin::Pin,
		sync::{
			Arc,
			atomic::{AtomicBool, Ordering},
		},
		time::Duration,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
