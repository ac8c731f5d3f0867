//! Browser session storage backend.

use storefront::storage::{SessionStorage, StorageError};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};

/// `window.sessionStorage` behind the [`SessionStorage`] trait.
///
/// Private browsing modes and sandboxed frames can refuse access to storage;
/// the handle is then absent and every call reports
/// [`StorageError::Unavailable`].
#[derive(Debug, Clone)]
pub struct BrowserSessionStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserSessionStorage {
    /// Open the current tab's session storage.
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|window| window.session_storage().ok().flatten());

        if storage.is_none() {
            warn!("sessionStorage is unavailable, the cart will not survive a reload");
        }

        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl SessionStorage for BrowserSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(storage_error)
    }
}

fn storage_error(error: JsValue) -> StorageError {
    match error.dyn_ref::<web_sys::DomException>() {
        Some(exception) if exception.name() == "QuotaExceededError" => StorageError::QuotaExceeded,
        Some(exception) => StorageError::Backend(exception.message()),
        None => StorageError::Backend(
            error
                .as_string()
                .unwrap_or_else(|| "unknown storage error".to_string()),
        ),
    }
}
