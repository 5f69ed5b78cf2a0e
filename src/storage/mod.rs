use crate::models::AccountInfo;
use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "clientdesk_token";
pub(crate) const USER_KEY: &str = "clientdesk_user";
pub(crate) const PAGE_SIZE_KEY: &str = "clientdesk_page_size";

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;
pub(crate) const PAGE_SIZE_CHOICES: [u32; 4] = [10, 25, 50, 100];

pub(crate) fn load_token_from_storage() -> Option<String> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    storage.get_item(TOKEN_KEY).ok().flatten()
}

pub(crate) fn load_user_from_storage() -> Option<AccountInfo> {
    load_json_from_storage(USER_KEY)
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

/// Preferred list page size. Falls back to the default when nothing is
/// stored or the stored value is not one of the offered choices.
pub(crate) fn load_page_size() -> u32 {
    load_json_from_storage::<u32>(PAGE_SIZE_KEY)
        .filter(|n| PAGE_SIZE_CHOICES.contains(n))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

pub(crate) fn save_page_size(per_page: u32) {
    save_json_to_storage(PAGE_SIZE_KEY, &per_page);
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_page_size_roundtrip() {
        save_page_size(25);
        assert_eq!(load_page_size(), 25);
    }

    #[wasm_bindgen_test]
    fn test_page_size_rejects_unknown_values() {
        save_json_to_storage(PAGE_SIZE_KEY, &7);
        assert_eq!(load_page_size(), DEFAULT_PAGE_SIZE);
    }

    #[wasm_bindgen_test]
    fn test_user_roundtrip() {
        let user: AccountInfo = serde_json::from_str(
            r#"{"id": 5, "name": "Ada", "permissions": ["clients:read"]}"#,
        )
        .unwrap();
        save_json_to_storage(USER_KEY, &user);

        let loaded = load_user_from_storage().unwrap();
        assert_eq!(loaded.permissions, vec!["clients:read".to_string()]);
        assert_eq!(loaded.extra.get("name").and_then(|v| v.as_str()), Some("Ada"));
    }
}
