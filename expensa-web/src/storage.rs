use client::{SessionStorage, StorageError};
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

/// `window.localStorage`, holding raw strings so records written by earlier
/// releases of the web app stay readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

fn unavailable(err: JsValue) -> StorageError {
    StorageError::Unavailable(
        err.as_string()
            .unwrap_or_else(|| "localStorage rejected the operation".to_string()),
    )
}

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw().get_item(key).map_err(unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw().set_item(key, value).map_err(unavailable)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::raw().remove_item(key).map_err(unavailable)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn values_are_stored_verbatim() {
        let storage = BrowserStorage;
        storage.set("JWT_TOKEN", "abc.def.ghi").unwrap();
        assert_eq!(storage.get("JWT_TOKEN").unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(
            web_sys::window()
                .unwrap()
                .local_storage()
                .unwrap()
                .unwrap()
                .get_item("JWT_TOKEN")
                .unwrap()
                .as_deref(),
            Some("abc.def.ghi")
        );
        storage.remove("JWT_TOKEN").unwrap();
        assert!(storage.get("JWT_TOKEN").unwrap().is_none());
    }
}
