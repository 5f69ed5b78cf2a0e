mod api;
mod app;
mod components;
mod forms;
mod models;
mod pages;
mod state;
mod storage;
mod util;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use crate::storage::TOKEN_KEY;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_client_reads_token_left_by_shell() {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .expect("localStorage should be available in the test browser");

        storage.remove_item(TOKEN_KEY).ok();
        assert!(!ApiClient::load_from_storage().is_authenticated());

        storage.set_item(TOKEN_KEY, "t1").unwrap();
        let client = ApiClient::load_from_storage();
        assert!(client.is_authenticated());
        assert_eq!(client.token.as_deref(), Some("t1"));

        storage.remove_item(TOKEN_KEY).ok();
    }
}
