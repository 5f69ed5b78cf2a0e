use crate::api::{ApiClient, ListQuery};
use crate::models::{BulkAction, Client, ClientList, ClientPayload};
use crate::state::{AppContext, Permissions};
use crate::storage;
use crate::util;
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeSet;
use wasm_bindgen::JsCast;

/// Delay before the post-create list refresh. The backend indexes new
/// records asynchronously; an immediate fetch can miss the row.
const CREATE_REFRESH_DELAY_MS: i32 = 400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PageMode {
    #[default]
    List,
    Create,
    View,
    Edit,
}

/// Derive the page mode from the current route.
///
/// Precedence: a create path wins over everything, even a stray edit
/// flag. A missing identifier falls back to the list, so an edit flag
/// or edit path only counts alongside one. A bare identifier means
/// view.
pub(crate) fn resolve_mode(path: &str, id: Option<&str>, edit_flag: bool) -> PageMode {
    let path = path.trim_end_matches('/');
    if path.ends_with("/create") {
        return PageMode::Create;
    }

    let has_id = id.map(|v| !v.trim().is_empty()).unwrap_or(false);
    if !has_id {
        return PageMode::List;
    }

    if edit_flag || path.ends_with("/edit") {
        return PageMode::Edit;
    }
    PageMode::View
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FilterChange {
    Search(String),
    Status(Option<bool>),
    City(String),
    Country(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AsyncSlice<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for AsyncSlice<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClientsPageState {
    pub mode: PageMode,
    pub query: ListQuery,
    pub list: AsyncSlice<ClientList>,
    pub record: AsyncSlice<Client>,
    /// Row ids picked for bulk operations. Deliberately NOT pruned when
    /// a new page loads; see `SelectAllToggled` for the only place the
    /// loaded page and the selection are compared.
    pub selection: BTreeSet<i64>,
    pub bulk_running: bool,
    /// Monotonic sequence of the most recently issued list fetch.
    /// Responses carrying an older sequence are dropped.
    pub list_seq: u64,
    pub list_requested: bool,
    pub record_requested_id: Option<i64>,
}

impl ClientsPageState {
    pub(crate) fn new(per_page: u32) -> Self {
        Self {
            mode: PageMode::List,
            query: ListQuery::new(per_page),
            list: AsyncSlice::default(),
            record: AsyncSlice::default(),
            selection: BTreeSet::new(),
            bulk_running: false,
            list_seq: 0,
            list_requested: false,
            record_requested_id: None,
        }
    }

    pub(crate) fn loaded_ids(&self) -> BTreeSet<i64> {
        self.list
            .data
            .as_ref()
            .map(|l| l.clients.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    pub(crate) fn all_loaded_selected(&self) -> bool {
        let loaded = self.loaded_ids();
        !loaded.is_empty() && loaded.iter().all(|id| self.selection.contains(id))
    }
}

#[derive(Clone, Debug)]
pub(crate) enum ClientsAction {
    ModeChanged(PageMode),
    /// Replace the whole query (URL-to-state sync on entry and history
    /// navigation).
    QuerySynced(ListQuery),
    FilterChanged(FilterChange),
    PageChanged(u32),
    PageSizeChanged(u32),
    ListLoadStarted { seq: u64 },
    ListLoadSucceeded { seq: u64, list: ClientList },
    ListLoadFailed { seq: u64, message: String },
    SelectionToggled(i64),
    SelectAllToggled,
    SelectionCleared,
    BulkStarted,
    BulkFinished { ok: bool },
    RecordLoadStarted { id: i64 },
    RecordLoadSucceeded(Box<Client>),
    RecordLoadFailed(String),
    /// Fold the record returned by an update into the page.
    RecordMerged(Box<Client>),
    RecordErrorSet(String),
}

pub(crate) fn reduce(s: &mut ClientsPageState, action: ClientsAction) {
    use ClientsAction::*;

    match action {
        ModeChanged(mode) => {
            if s.mode != mode {
                s.mode = mode;
                // A stale record error must not leak into the next mode.
                s.record.error = None;
            }
        }
        QuerySynced(query) => {
            s.query = query;
        }
        FilterChanged(change) => {
            match change {
                FilterChange::Search(v) => s.query.search = v,
                FilterChange::Status(v) => s.query.status = v,
                FilterChange::City(v) => s.query.city = v,
                FilterChange::Country(v) => s.query.country = v,
            }
            s.query.page = 1;
        }
        PageChanged(page) => {
            s.query.page = page.max(1);
        }
        PageSizeChanged(per_page) => {
            s.query.per_page = per_page;
            s.query.page = 1;
        }
        ListLoadStarted { seq } => {
            s.list_seq = seq;
            s.list_requested = true;
            s.list.loading = true;
            s.list.error = None;
        }
        ListLoadSucceeded { seq, list } => {
            if seq == s.list_seq {
                s.list.loading = false;
                s.list.error = None;
                s.list.data = Some(list);
            }
        }
        ListLoadFailed { seq, message } => {
            if seq == s.list_seq {
                s.list.loading = false;
                s.list.error = Some(message);
                s.list.data = None;
            }
        }
        SelectionToggled(id) => {
            if !s.selection.remove(&id) {
                s.selection.insert(id);
            }
        }
        SelectAllToggled => {
            if s.all_loaded_selected() {
                s.selection.clear();
            } else {
                s.selection = s.loaded_ids();
            }
        }
        SelectionCleared => {
            s.selection.clear();
        }
        BulkStarted => {
            s.bulk_running = true;
        }
        BulkFinished { ok } => {
            s.bulk_running = false;
            if ok {
                s.selection.clear();
            }
        }
        RecordLoadStarted { id } => {
            s.record_requested_id = Some(id);
            s.record.loading = true;
            s.record.error = None;
        }
        RecordLoadSucceeded(client) => {
            s.record.loading = false;
            s.record.error = None;
            s.record.data = Some(*client);
        }
        RecordLoadFailed(message) => {
            s.record.loading = false;
            s.record.error = Some(message);
            s.record.data = None;
        }
        RecordMerged(client) => {
            let mut next = *client;
            // Update responses skip the expensive aggregates; keep the
            // ones we already have for the same record.
            if next.stats.is_none() {
                if let Some(prev) = &s.record.data {
                    if prev.id == next.id {
                        next.stats = prev.stats.clone();
                    }
                }
            }
            s.record.data = Some(next);
        }
        RecordErrorSet(message) => {
            s.record.error = Some(message);
        }
    }
}

/// Drives the clients screen: owns the page state and issues fetches
/// and mutations, keeping the list URL in sync with the filter state.
///
/// Responsibilities:
/// - list/record loading with stale-response protection
/// - create/update/delete/bulk mutations and their confirmations
/// - mirroring filters into the URL
///
/// Non-responsibilities:
/// - form draft state (owned by the form editor)
/// - resolving the route into a mode (done by the page's tracked Effects)
///
/// Copy, like the signals it wraps, so event closures can capture it
/// without ceremony.
#[derive(Clone, Copy)]
pub(crate) struct ClientsController {
    app_state: AppContext,
    pub state: RwSignal<ClientsPageState>,
    /// `(path, replace)`; replace keeps filter mirroring out of the
    /// browser history.
    navigate: Callback<(String, bool)>,
}

impl ClientsController {
    pub fn new(app_state: AppContext, navigate: Callback<(String, bool)>) -> Self {
        let state = RwSignal::new(ClientsPageState::new(storage::load_page_size()));
        Self {
            app_state,
            state,
            navigate,
        }
    }

    pub(crate) fn dispatch(&self, action: ClientsAction) {
        self.state.update(|s| reduce(s, action));
    }

    fn perms(&self) -> Permissions {
        self.app_state.0.permissions.get_untracked()
    }

    pub(crate) fn api(&self) -> ApiClient {
        self.app_state.0.api_client.get_untracked()
    }

    /// List route carrying the current filters, so returning to the
    /// list (or sharing the URL) restores them.
    pub fn list_route(&self) -> String {
        let qs = self.state.with_untracked(|s| s.query.to_url_query());
        format!("/clients{qs}")
    }

    fn mirror_list_url(&self) {
        self.navigate.run((self.list_route(), true));
    }

    pub fn go_to_list(&self) {
        self.navigate.run((self.list_route(), false));
    }

    pub fn go_to(&self, path: String) {
        self.navigate.run((path, false));
    }

    /// Route-to-state sync for the list. Called from a tracked Effect on
    /// every URL change; also covers the initial fetch.
    pub fn ensure_list_loaded(&self, from_url: ListQuery) {
        let (current, requested) = self
            .state
            .with_untracked(|s| (s.query.clone(), s.list_requested));

        // `from_url` comes back trimmed, but the filter inputs hold raw
        // text. Comparing normalized forms keeps a trailing space the
        // user just typed from being synced away under the cursor.
        if from_url != current.normalized() {
            self.dispatch(ClientsAction::QuerySynced(from_url));
            self.load_list();
        } else if !requested {
            self.load_list();
        }
    }

    pub fn load_list(&self) {
        if !self.perms().can_read {
            return;
        }

        let seq = self.state.with_untracked(|s| s.list_seq) + 1;
        self.dispatch(ClientsAction::ListLoadStarted { seq });

        let query = self.state.with_untracked(|s| s.query.clone());
        let api = self.api();
        let s2 = *self;
        spawn_local(async move {
            let result = api.list_clients(&query).await;

            let latest = s2.state.with_untracked(|s| s.list_seq);
            if seq != latest {
                logging::warn!("dropping stale client list response ({seq} < {latest})");
                return;
            }

            match result {
                Ok(list) => s2.dispatch(ClientsAction::ListLoadSucceeded { seq, list }),
                Err(e) => s2.dispatch(ClientsAction::ListLoadFailed {
                    seq,
                    message: e.to_string(),
                }),
            }
        });
    }

    pub fn set_filter(&self, change: FilterChange) {
        self.dispatch(ClientsAction::FilterChanged(change));
        self.mirror_list_url();
        self.load_list();
    }

    pub fn set_page(&self, page: u32) {
        if self.state.with_untracked(|s| s.query.page) == page {
            return;
        }
        self.dispatch(ClientsAction::PageChanged(page));
        self.mirror_list_url();
        self.load_list();
    }

    pub fn set_page_size(&self, per_page: u32) {
        if self.state.with_untracked(|s| s.query.per_page) == per_page {
            return;
        }
        self.dispatch(ClientsAction::PageSizeChanged(per_page));
        storage::save_page_size(per_page);
        self.mirror_list_url();
        self.load_list();
    }

    pub fn toggle_selected(&self, id: i64) {
        self.dispatch(ClientsAction::SelectionToggled(id));
    }

    pub fn toggle_select_all(&self) {
        self.dispatch(ClientsAction::SelectAllToggled);
    }

    pub fn clear_selection(&self) {
        self.dispatch(ClientsAction::SelectionCleared);
    }

    /// Route-to-state sync for the record. No-op when the id is already
    /// the one we asked for, so moving from view to edit keeps the
    /// loaded record.
    pub fn ensure_record_loaded(&self, id: i64) {
        if self.state.with_untracked(|s| s.record_requested_id) != Some(id) {
            self.load_record(id);
        }
    }

    pub fn load_record(&self, id: i64) {
        if !self.perms().can_read {
            return;
        }

        self.dispatch(ClientsAction::RecordLoadStarted { id });

        let api = self.api();
        let s2 = *self;
        spawn_local(async move {
            match api.get_client(id).await {
                Ok(client) => s2.dispatch(ClientsAction::RecordLoadSucceeded(Box::new(client))),
                Err(e) => s2.dispatch(ClientsAction::RecordLoadFailed(e.to_string())),
            }
        });
    }

    pub fn set_record_error(&self, message: String) {
        self.dispatch(ClientsAction::RecordLoadFailed(message));
    }

    /// Create a record. Returns whether it stuck; the caller owns the
    /// busy flag around the await.
    pub async fn submit_create(&self, payload: ClientPayload) -> bool {
        match self.api().create_client(&payload).await {
            Ok(_) => {
                self.dispatch(ClientsAction::ModeChanged(PageMode::List));
                self.go_to_list();
                self.schedule_list_refresh(CREATE_REFRESH_DELAY_MS);
                true
            }
            Err(e) => {
                let message = e.to_string();
                util::alert(&message);
                if util::mentions_email(&message) {
                    util::alert("A client with this email address already exists.");
                }
                self.dispatch(ClientsAction::RecordErrorSet(message));
                false
            }
        }
    }

    pub async fn submit_update(&self, id: i64, payload: ClientPayload) -> bool {
        match self.api().update_client(id, &payload).await {
            Ok(client) => {
                self.dispatch(ClientsAction::RecordMerged(Box::new(client)));
                self.dispatch(ClientsAction::ModeChanged(PageMode::View));
                self.go_to(format!("/clients/{id}"));
                // Both refreshes run concurrently.
                self.load_record(id);
                self.load_list();
                true
            }
            Err(e) => {
                self.dispatch(ClientsAction::RecordErrorSet(e.to_string()));
                false
            }
        }
    }

    pub fn delete_one(&self, id: i64) {
        if !self.perms().can_delete {
            return;
        }
        if !util::confirm("Delete this client? This cannot be undone.") {
            return;
        }

        let api = self.api();
        let s2 = *self;
        spawn_local(async move {
            match api.delete_client(id).await {
                Ok(()) => s2.load_list(),
                Err(e) => util::alert(&e.to_string()),
            }
        });
    }

    pub fn run_bulk(&self, action: BulkAction) {
        if self.state.with_untracked(|s| s.bulk_running) {
            return;
        }

        let ids: Vec<i64> = self
            .state
            .with_untracked(|s| s.selection.iter().copied().collect());
        if ids.is_empty() {
            return;
        }

        let perms = self.perms();
        let allowed = match action {
            BulkAction::Delete => perms.can_delete,
            BulkAction::Activate | BulkAction::Deactivate => perms.can_update,
        };
        if !allowed {
            return;
        }

        if !util::confirm(&format!("{} {} selected client(s)?", action, ids.len())) {
            return;
        }

        self.dispatch(ClientsAction::BulkStarted);

        let api = self.api();
        let s2 = *self;
        spawn_local(async move {
            match api.bulk_update(&ids, action).await {
                Ok(()) => {
                    s2.dispatch(ClientsAction::BulkFinished { ok: true });
                    s2.load_list();
                }
                Err(e) => {
                    s2.dispatch(ClientsAction::BulkFinished { ok: false });
                    util::alert(&e.to_string());
                }
            }
        });
    }

    fn schedule_list_refresh(&self, delay_ms: i32) {
        let Some(win) = web_sys::window() else {
            return;
        };

        let s2 = *self;
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.load_list();
        });

        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay_ms,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageMeta;

    fn client(id: i64) -> Client {
        Client {
            id,
            company_name: format!("Company {id}"),
            ..Client::default()
        }
    }

    fn list_of(ids: &[i64]) -> ClientList {
        ClientList {
            clients: ids.iter().map(|id| client(*id)).collect(),
            meta: PageMeta {
                page: 1,
                per_page: 10,
                total: ids.len() as u64,
                total_pages: 1,
            },
        }
    }

    fn loaded_state(ids: &[i64]) -> ClientsPageState {
        let mut s = ClientsPageState::new(10);
        reduce(&mut s, ClientsAction::ListLoadStarted { seq: 1 });
        reduce(
            &mut s,
            ClientsAction::ListLoadSucceeded {
                seq: 1,
                list: list_of(ids),
            },
        );
        s
    }

    #[test]
    fn test_resolve_mode_create_path_wins() {
        assert_eq!(
            resolve_mode("/clients/create", Some("create"), false),
            PageMode::Create
        );
        // Even a stray edit flag cannot override the create path.
        assert_eq!(
            resolve_mode("/clients/create", Some("create"), true),
            PageMode::Create
        );
    }

    #[test]
    fn test_resolve_mode_missing_id_is_list() {
        assert_eq!(resolve_mode("/clients", None, false), PageMode::List);
        assert_eq!(resolve_mode("/clients/", None, true), PageMode::List);
        assert_eq!(resolve_mode("/clients", Some("  "), false), PageMode::List);
    }

    #[test]
    fn test_resolve_mode_edit_needs_id() {
        assert_eq!(resolve_mode("/clients/42", Some("42"), true), PageMode::Edit);
        assert_eq!(
            resolve_mode("/clients/42/edit", Some("42"), false),
            PageMode::Edit
        );
        assert_eq!(resolve_mode("/clients/42", Some("42"), false), PageMode::View);
    }

    #[test]
    fn test_filter_change_resets_page_and_merges() {
        let mut s = ClientsPageState::new(10);
        s.query.page = 3;
        s.query.status = Some(true);
        s.query.city = "Lyon".to_string();

        reduce(
            &mut s,
            ClientsAction::FilterChanged(FilterChange::Search("acme".to_string())),
        );

        assert_eq!(s.query.page, 1);
        assert_eq!(s.query.search, "acme");
        // Prior filters survive untouched.
        assert_eq!(s.query.status, Some(true));
        assert_eq!(s.query.city, "Lyon");
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut s = ClientsPageState::new(10);
        s.query.page = 4;
        reduce(&mut s, ClientsAction::PageSizeChanged(50));
        assert_eq!(s.query.per_page, 50);
        assert_eq!(s.query.page, 1);
    }

    #[test]
    fn test_stale_list_responses_are_ignored() {
        let mut s = ClientsPageState::new(10);
        reduce(&mut s, ClientsAction::ListLoadStarted { seq: 1 });
        reduce(&mut s, ClientsAction::ListLoadStarted { seq: 2 });

        reduce(
            &mut s,
            ClientsAction::ListLoadSucceeded {
                seq: 1,
                list: list_of(&[1]),
            },
        );
        assert!(s.list.loading, "stale success must not settle the fetch");
        assert!(s.list.data.is_none());

        reduce(
            &mut s,
            ClientsAction::ListLoadFailed {
                seq: 1,
                message: "boom".to_string(),
            },
        );
        assert!(s.list.error.is_none(), "stale failure must not surface");

        reduce(
            &mut s,
            ClientsAction::ListLoadSucceeded {
                seq: 2,
                list: list_of(&[1, 2]),
            },
        );
        assert!(!s.list.loading);
        assert_eq!(s.loaded_ids().len(), 2);
    }

    #[test]
    fn test_list_failure_clears_data() {
        let mut s = loaded_state(&[1, 2]);
        reduce(&mut s, ClientsAction::ListLoadStarted { seq: 2 });
        // Previous rows stay visible while the refresh is in flight.
        assert!(s.list.data.is_some());

        reduce(
            &mut s,
            ClientsAction::ListLoadFailed {
                seq: 2,
                message: "timeout".to_string(),
            },
        );
        assert_eq!(s.list.error.as_deref(), Some("timeout"));
        assert!(s.list.data.is_none());
    }

    #[test]
    fn test_selection_toggle_roundtrip() {
        let mut s = loaded_state(&[1, 2]);
        reduce(&mut s, ClientsAction::SelectionToggled(2));
        assert!(s.selection.contains(&2));
        reduce(&mut s, ClientsAction::SelectionToggled(2));
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_select_all_toggle_has_period_two() {
        let mut s = loaded_state(&[1, 2, 3]);

        reduce(&mut s, ClientsAction::SelectAllToggled);
        assert_eq!(s.selection, s.loaded_ids());

        reduce(&mut s, ClientsAction::SelectAllToggled);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_select_all_clears_when_loaded_subset_of_selection() {
        // Stale ids from a previous page linger by design; they still
        // count as "everything loaded is selected".
        let mut s = loaded_state(&[1, 2]);
        s.selection = [1, 2, 99].into_iter().collect();

        reduce(&mut s, ClientsAction::SelectAllToggled);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_select_all_replaces_partial_selection() {
        let mut s = loaded_state(&[1, 2, 3]);
        s.selection = [2, 99].into_iter().collect();

        reduce(&mut s, ClientsAction::SelectAllToggled);
        assert_eq!(s.selection, [1, 2, 3].into_iter().collect());
    }

    #[test]
    fn test_bulk_finished_clears_selection_only_on_success() {
        let mut s = loaded_state(&[1, 2]);
        s.selection = [1, 2].into_iter().collect();

        reduce(&mut s, ClientsAction::BulkStarted);
        assert!(s.bulk_running);

        reduce(&mut s, ClientsAction::BulkFinished { ok: false });
        assert!(!s.bulk_running);
        assert_eq!(s.selection.len(), 2);

        reduce(&mut s, ClientsAction::BulkStarted);
        reduce(&mut s, ClientsAction::BulkFinished { ok: true });
        assert!(!s.bulk_running);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn test_mode_change_clears_record_error() {
        let mut s = ClientsPageState::new(10);
        reduce(&mut s, ClientsAction::RecordErrorSet("nope".to_string()));
        assert!(s.record.error.is_some());

        // Re-resolving the same mode keeps the error…
        reduce(&mut s, ClientsAction::ModeChanged(PageMode::List));
        assert!(s.record.error.is_some());

        // …an actual transition clears it.
        reduce(&mut s, ClientsAction::ModeChanged(PageMode::Create));
        assert!(s.record.error.is_none());
    }

    #[test]
    fn test_record_merge_preserves_stats_for_same_record() {
        use crate::models::ClientStats;

        let mut s = ClientsPageState::new(10);
        let mut before = client(7);
        before.stats = Some(ClientStats {
            quotation_count: 3,
            ..ClientStats::default()
        });
        reduce(&mut s, ClientsAction::RecordLoadStarted { id: 7 });
        reduce(&mut s, ClientsAction::RecordLoadSucceeded(Box::new(before)));

        let mut updated = client(7);
        updated.company_name = "Renamed".to_string();
        reduce(&mut s, ClientsAction::RecordMerged(Box::new(updated)));

        let record = s.record.data.unwrap();
        assert_eq!(record.company_name, "Renamed");
        assert_eq!(record.stats.unwrap().quotation_count, 3);
    }

    #[test]
    fn test_record_merge_drops_stats_for_different_record() {
        use crate::models::ClientStats;

        let mut s = ClientsPageState::new(10);
        let mut before = client(7);
        before.stats = Some(ClientStats::default());
        reduce(&mut s, ClientsAction::RecordLoadSucceeded(Box::new(before)));

        reduce(&mut s, ClientsAction::RecordMerged(Box::new(client(8))));
        assert!(s.record.data.unwrap().stats.is_none());
    }

    #[test]
    fn test_record_failure_sets_scoped_error_without_touching_list() {
        let mut s = loaded_state(&[1]);
        reduce(&mut s, ClientsAction::RecordLoadStarted { id: 9 });
        reduce(
            &mut s,
            ClientsAction::RecordLoadFailed("not found".to_string()),
        );

        assert_eq!(s.record.error.as_deref(), Some("not found"));
        assert!(s.record.data.is_none());
        assert!(s.list.data.is_some());
        assert!(s.list.error.is_none());
    }

    #[test]
    fn test_query_synced_replaces_whole_query() {
        let mut s = ClientsPageState::new(10);
        s.query.search = "old".to_string();

        let incoming = ListQuery::from_url_parts(Some("2"), Some("inactive"), None, None, None, 10);
        reduce(&mut s, ClientsAction::QuerySynced(incoming.clone()));
        assert_eq!(s.query, incoming);
    }
}
