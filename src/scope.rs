//! Lifecycle binder tying one request client to one component instance.

// self
use crate::{
	_prelude::*,
	client::{ClientConfig, RequestClient},
	store::TokenStore,
};

/// Scoped handle binding a [`RequestClient`] to a component's mount/unmount
/// lifecycle.
///
/// UI-layer lifecycle hooks call [`acquire`](ClientScope::acquire) on mount
/// and [`release`](ClientScope::release) on unmount; the scope itself carries
/// no framework coupling. A released (destroyed) client is never revived: the
/// next acquire constructs a fresh instance with the same configuration and
/// credential source.
pub struct ClientScope {
	config: ClientConfig,
	store: Arc<dyn TokenStore>,
	current: Mutex<Option<Arc<RequestClient>>>,
}
impl ClientScope {
	/// Creates a scope that will build clients from `config` + `store`.
	pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
		Self { config, store, current: Mutex::new(None) }
	}

	/// Returns the held client, constructing a fresh one when none is held or
	/// the held one was destroyed by a previous release.
	pub fn acquire(&self) -> Result<Arc<RequestClient>> {
		let mut guard = self.current.lock();

		match guard.as_ref() {
			Some(client) if !client.is_destroyed() => Ok(client.clone()),
			_ => {
				let client =
					Arc::new(RequestClient::new(self.config.clone(), self.store.clone())?);

				*guard = Some(client.clone());

				Ok(client)
			},
		}
	}

	/// Destroys the held client, if any. The destroyed instance stays held so
	/// the next acquire knows to replace it.
	pub fn release(&self) {
		if let Some(client) = self.current.lock().as_ref() {
			client.destroy();
		}
	}

	/// Client currently held between acquire and release, if any.
	pub fn held(&self) -> Option<Arc<RequestClient>> {
		self.current.lock().clone()
	}
}
impl Debug for ClientScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientScope")
			.field("config", &self.config)
			.field("held", &self.current.lock().is_some())
			.finish()
	}
}
