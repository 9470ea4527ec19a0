//! Simple file-backed [`TokenStore`] that survives process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	obs,
	store::{StoreError, StoreFuture, TokenStore},
};

/// Fixed snapshot file name used by [`FileStore::open_in`].
pub const TOKEN_FILE_NAME: &str = "dredge-token.json";

/// Persists the credential to a JSON snapshot after each mutation.
///
/// The snapshot is replaced atomically (write to a temp file, fsync, rename),
/// so a crash mid-write never leaves a half-written credential behind. A
/// corrupted snapshot degrades to "no credential" instead of failing
/// [`FileStore::open`]; the call path must keep working unauthenticated.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<TokenSecret>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading any
	/// previously persisted credential.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Opens a store at the fixed [`TOKEN_FILE_NAME`] inside `dir`.
	pub fn open_in(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
		Self::open(dir.as_ref().join(TOKEN_FILE_NAME))
	}

	fn load_snapshot(path: &Path) -> Result<Option<TokenSecret>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		match serde_json::from_slice(&bytes) {
			Ok(token) => Ok(token),
			Err(e) => {
				obs::warn_degraded(
					"token_snapshot",
					format!("Failed to parse {}: {e}", path.display()),
				);

				Ok(None)
			},
		}
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Option<TokenSecret>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized = serde_json::to_vec(contents).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize token snapshot: {e}"),
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn current(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn login(&self, token: TokenSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = Some(token);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn logout(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = None;
			self.persist_locked(&guard)?;

			Ok(())
		})
	}
}
