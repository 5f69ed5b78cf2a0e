pub(crate) mod clients_page;

use crate::api::ApiClient;
use crate::models::AccountInfo;
use crate::storage::load_user_from_storage;
use leptos::prelude::*;

/// What the signed-in account may do on this screen. Derived once from
/// the stored account; the backend enforces the same checks server-side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Permissions {
    pub can_read: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl Permissions {
    pub(crate) fn from_account(account: Option<&AccountInfo>) -> Self {
        let Some(account) = account else {
            return Self::default();
        };

        let has = |name: &str| account.permissions.iter().any(|p| p == name);
        Self {
            can_read: has("clients:read"),
            can_create: has("clients:create"),
            can_update: has("clients:update"),
            can_delete: has("clients:delete"),
        }
    }
}

// All fields are arena handles, so the whole state is Copy and moves
// freely into event closures.
#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,
    pub permissions: RwSignal<Permissions>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();
        let stored_user = load_user_from_storage();
        let permissions = Permissions::from_account(stored_user.as_ref());

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            permissions: RwSignal::new(permissions),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;

    fn account(perms: &[&str]) -> AccountInfo {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Ada",
            "permissions": perms,
        }))
        .unwrap()
    }

    #[test]
    fn test_permissions_from_account() {
        let p = Permissions::from_account(Some(&account(&[
            "clients:read",
            "clients:update",
            "quotes:read",
        ])));
        assert!(p.can_read);
        assert!(!p.can_create);
        assert!(p.can_update);
        assert!(!p.can_delete);
    }

    #[test]
    fn test_permissions_default_to_denied_without_account() {
        let p = Permissions::from_account(None);
        assert!(!p.can_read && !p.can_create && !p.can_update && !p.can_delete);
    }
}
