use crate::api::ListQuery;
use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, Badge, Button, ButtonSize, ButtonVariant, Card,
    CardAction, CardContent, CardDescription, CardHeader, CardItem, CardList, CardTitle, Checkbox,
    Input, NativeSelect, Spinner,
};
use crate::forms::ClientFormEditor;
use crate::models::{BulkAction, Client, ClientStats};
use crate::state::clients_page::{
    resolve_mode, ClientsAction, ClientsController, FilterChange, PageMode,
};
use crate::state::AppContext;
use crate::storage::PAGE_SIZE_CHOICES;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::{use_location, use_navigate, use_params, use_query_map};
use leptos_router::params::Params;
use leptos_router::NavigateOptions;
use wasm_bindgen::JsCast;

#[derive(Params, PartialEq, Clone, Debug, Default)]
pub struct ClientRouteParams {
    pub id: Option<String>,
    pub action: Option<String>,
}

/// The whole clients screen. One component stays mounted across
/// list/create/view/edit so the list state survives sub-page trips.
#[component]
pub fn ClientsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let permissions = app_state.0.permissions;

    let location = use_location();
    let query = use_query_map();
    let params = use_params::<ClientRouteParams>();

    let navigate = use_navigate();
    let navigate_cb = Callback::new(move |(path, replace): (String, bool)| {
        navigate(
            &path,
            NavigateOptions {
                replace,
                ..Default::default()
            },
        );
    });

    let ctrl = ClientsController::new(app_state, navigate_cb);
    provide_context(ctrl);
    let state = ctrl.state;

    let search_ref: NodeRef<html::Input> = NodeRef::new();

    // Resolve the URL into a page mode. Params are reactive; this
    // re-resolves on every URL change, including back/forward.
    Effect::new(move |_| {
        let path = location.pathname.get();
        let p = params.get().unwrap_or_default();
        let edit_flag = query
            .get()
            .get("edit")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        let mode = resolve_mode(&path, p.id.as_deref(), edit_flag);
        ctrl.dispatch(ClientsAction::ModeChanged(mode));
    });

    // Sync the URL into the list state. Covers entry, history
    // navigation, and the initial fetch. `ensure_list_loaded` is a no-op
    // when the query already matches, so the writes this effect causes
    // settle.
    Effect::new(move |_| {
        let _ = location.search.get();
        if state.with(|s| s.mode) != PageMode::List {
            return;
        }
        if !permissions.get().can_read {
            return;
        }

        let q = query.get();
        let per_page = state.with_untracked(|s| s.query.per_page);
        let from_url = ListQuery::from_url_parts(
            q.get("page").as_deref(),
            q.get("status").as_deref(),
            q.get("city").as_deref(),
            q.get("country").as_deref(),
            q.get("search").as_deref(),
            per_page,
        );
        ctrl.ensure_list_loaded(from_url);
    });

    // Sync the URL into the record state for view/edit.
    Effect::new(move |_| {
        if !matches!(state.with(|s| s.mode), PageMode::View | PageMode::Edit) {
            return;
        }
        if !permissions.get().can_read {
            return;
        }

        let raw = params.get().ok().and_then(|p| p.id).unwrap_or_default();
        match raw.trim().parse::<i64>() {
            Ok(id) => ctrl.ensure_record_loaded(id),
            Err(_) => {
                let message = format!("\"{raw}\" is not a valid client id");
                // Guard: this effect tracks `state`, so an unconditional
                // dispatch would loop.
                let already =
                    state.with_untracked(|s| s.record.error.as_deref() == Some(message.as_str()));
                if !already {
                    ctrl.set_record_error(message);
                }
            }
        }
    });

    // Keyboard shortcuts:
    // - Cmd/Ctrl+K: focus the list search box
    // - Esc: blur it
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let is_meta = ev.meta_key() || ev.ctrl_key();
        let key = ev.key().to_lowercase();

        // Avoid hijacking shortcuts while typing in form controls.
        let target_tag = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.tag_name().to_lowercase());

        if let Some(tag) = target_tag {
            if tag == "input" || tag == "textarea" || tag == "select" {
                if key != "escape" {
                    return;
                }
            }
        }

        if is_meta && key == "k" {
            ev.prevent_default();
            if let Some(input) = search_ref.get() {
                let _ = input.focus();
            }
            return;
        }

        if key == "escape" {
            if let Some(input) = search_ref.get() {
                let _ = input.blur();
            }
        }
    });

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-5xl flex-col gap-4 px-4 py-6">
                <header class="flex items-center justify-between">
                    <div>
                        <h1 class="text-lg font-semibold">"Clients"</h1>
                        <p class="text-sm text-muted-foreground">
                            "Customers and the billing details attached to them."
                        </p>
                    </div>
                </header>

                <Show
                    when=move || permissions.get().can_read
                    fallback=|| view! {
                        <AccessNotice message="Your account does not have access to the client list." />
                    }
                >
                    {move || match state.with(|s| s.mode) {
                        PageMode::List => view! { <ClientListView search_ref=search_ref /> }.into_any(),
                        PageMode::Create => {
                            if permissions.get().can_create {
                                view! { <ClientFormEditor /> }.into_any()
                            } else {
                                view! {
                                    <AccessNotice message="Your account cannot create clients." />
                                }
                                .into_any()
                            }
                        }
                        PageMode::View => view! { <ClientDetailView /> }.into_any(),
                        PageMode::Edit => {
                            if permissions.get().can_update {
                                view! { <ClientFormEditor /> }.into_any()
                            } else {
                                view! {
                                    <AccessNotice message="Your account cannot edit clients." />
                                }
                                .into_any()
                            }
                        }
                    }}
                </Show>
            </div>
        </div>
    }
}

#[component]
fn AccessNotice(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <Card>
            <CardContent>
                <div class="flex flex-col items-start gap-1 py-2">
                    <div class="text-sm font-medium">"Access denied"</div>
                    <p class="text-sm text-muted-foreground">{message}</p>
                </div>
            </CardContent>
        </Card>
    }
}

#[component]
fn ClientListView(search_ref: NodeRef<html::Input>) -> impl IntoView {
    let ctrl = expect_context::<ClientsController>();
    let state = ctrl.state;
    let app_state = expect_context::<AppContext>();
    let permissions = app_state.0.permissions;

    let on_search = move |v: String| ctrl.set_filter(FilterChange::Search(v));
    let on_city = move |v: String| ctrl.set_filter(FilterChange::City(v));
    let on_country = move |v: String| ctrl.set_filter(FilterChange::Country(v));
    let on_status = move |v: String| {
        let status = match v.as_str() {
            "active" => Some(true),
            "inactive" => Some(false),
            _ => None,
        };
        ctrl.set_filter(FilterChange::Status(status));
    };

    let has_filters = Signal::derive(move || {
        state.with(|s| {
            let q = &s.query;
            q.status.is_some() || !q.city.is_empty() || !q.country.is_empty() || !q.search.is_empty()
        })
    });
    // Resetting navigates to the bare list URL; the URL sync effect
    // does the rest.
    let on_reset = move |_| ctrl.go_to("/clients".to_string());
    let on_new = move |_| ctrl.go_to("/clients/create".to_string());
    let on_retry = move |_| ctrl.load_list();

    let on_toggle_all = move |_: bool| ctrl.toggle_select_all();
    let on_clear_selection = move |_| ctrl.clear_selection();
    let on_bulk_activate = move |_| ctrl.run_bulk(BulkAction::Activate);
    let on_bulk_deactivate = move |_| ctrl.run_bulk(BulkAction::Deactivate);
    let on_bulk_delete = move |_| ctrl.run_bulk(BulkAction::Delete);

    let on_prev = move |_| {
        let page = state.with_untracked(|s| s.query.page);
        if page > 1 {
            ctrl.set_page(page - 1);
        }
    };
    let on_next = move |_| {
        let (page, pages) = state.with_untracked(|s| {
            (
                s.query.page,
                s.list.data.as_ref().map(|l| l.meta.total_pages).unwrap_or(1),
            )
        });
        if page < pages {
            ctrl.set_page(page + 1);
        }
    };
    let on_page_size = move |v: String| {
        if let Ok(n) = v.parse::<u32>() {
            ctrl.set_page_size(n);
        }
    };

    let total_label = move || {
        state.with(|s| {
            s.list
                .data
                .as_ref()
                .map(|l| format!("{} client(s)", l.meta.total))
                .unwrap_or_default()
        })
    };

    let range_label = move || {
        state.with(|s| {
            s.list
                .data
                .as_ref()
                .map(|l| l.meta.range_label(l.clients.len()))
                .unwrap_or_default()
        })
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-base">"All clients"</CardTitle>
                <CardDescription>
                    <span class="inline-flex items-center gap-2">
                        {total_label}
                        <Show
                            when=move || state.with(|s| s.list.loading && s.list.data.is_some())
                            fallback=|| ().into_view()
                        >
                            <Spinner class="size-3" />
                        </Show>
                    </span>
                </CardDescription>
                <Show when=move || permissions.get().can_create fallback=|| ().into_view()>
                    <CardAction>
                        <Button size=ButtonSize::Sm on:click=on_new>"New client"</Button>
                    </CardAction>
                </Show>
            </CardHeader>

            <CardContent class="flex flex-col gap-3">
                <div class="grid grid-cols-1 gap-2 sm:grid-cols-2 lg:grid-cols-5">
                    <div class="lg:col-span-2">
                        <Input
                            id="client-search"
                            placeholder="Search company, contact or email (Ctrl+K)"
                            value=Signal::derive(move || state.with(|s| s.query.search.clone()))
                            on_input=on_search
                            node_ref=search_ref
                        />
                    </div>
                    <NativeSelect
                        id="client-status"
                        options=vec![
                            (String::new(), "All statuses".to_string()),
                            ("active".to_string(), "Active".to_string()),
                            ("inactive".to_string(), "Inactive".to_string()),
                        ]
                        value=Signal::derive(move || state.with(|s| s.query.status_str().to_string()))
                        on_change=on_status
                    />
                    <Input
                        id="client-city"
                        placeholder="City"
                        value=Signal::derive(move || state.with(|s| s.query.city.clone()))
                        on_input=on_city
                    />
                    <div class="flex items-center gap-2">
                        <Input
                            id="client-country"
                            placeholder="Country"
                            value=Signal::derive(move || state.with(|s| s.query.country.clone()))
                            on_input=on_country
                        />
                        <Show when=move || has_filters.get() fallback=|| ().into_view()>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                on:click=on_reset
                                attr:title="Clear all filters"
                            >
                                "Reset"
                            </Button>
                        </Show>
                    </div>
                </div>

                <Show
                    when=move || state.with(|s| !s.selection.is_empty())
                    fallback=|| ().into_view()
                >
                    <div class="flex flex-wrap items-center gap-2 rounded-md border bg-muted/40 px-3 py-2">
                        <span class="text-sm text-muted-foreground">
                            {move || state.with(|s| format!("{} selected", s.selection.len()))}
                        </span>
                        <Show when=move || permissions.get().can_update fallback=|| ().into_view()>
                            <Button
                                variant=ButtonVariant::Secondary
                                size=ButtonSize::Sm
                                attr:disabled=move || state.with(|s| s.bulk_running)
                                on:click=on_bulk_activate
                            >
                                "Activate"
                            </Button>
                            <Button
                                variant=ButtonVariant::Secondary
                                size=ButtonSize::Sm
                                attr:disabled=move || state.with(|s| s.bulk_running)
                                on:click=on_bulk_deactivate
                            >
                                "Deactivate"
                            </Button>
                        </Show>
                        <Show when=move || permissions.get().can_delete fallback=|| ().into_view()>
                            <Button
                                variant=ButtonVariant::Destructive
                                size=ButtonSize::Sm
                                attr:disabled=move || state.with(|s| s.bulk_running)
                                on:click=on_bulk_delete
                            >
                                "Delete"
                            </Button>
                        </Show>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=on_clear_selection
                        >
                            "Clear"
                        </Button>
                        <Show
                            when=move || state.with(|s| s.bulk_running)
                            fallback=|| ().into_view()
                        >
                            <Spinner class="size-3" />
                        </Show>
                    </div>
                </Show>

                <Show
                    when=move || state.with(|s| s.list.error.is_some())
                    fallback=|| ().into_view()
                >
                    <Alert class="border-destructive/30">
                        <AlertTitle>"Couldn't load clients"</AlertTitle>
                        <AlertDescription class="text-destructive">
                            {move || state.with(|s| s.list.error.clone().unwrap_or_default())}
                        </AlertDescription>
                        <div class="pt-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=on_retry
                            >
                                "Retry"
                            </Button>
                        </div>
                    </Alert>
                </Show>

                <Show
                    when=move || state.with(|s| s.list.loading && s.list.data.is_none() && s.list.error.is_none())
                    fallback=|| ().into_view()
                >
                    <div class="flex items-center gap-2 py-8 text-sm text-muted-foreground">
                        <Spinner />
                        "Loading clients..."
                    </div>
                </Show>

                <Show
                    when=move || state.with(|s| s.list.data.is_some())
                    fallback=|| ().into_view()
                >
                    <div class="overflow-x-auto rounded-md border">
                        <table class="w-full text-sm">
                            <thead>
                                <tr class="border-b bg-muted/40 text-left text-xs text-muted-foreground">
                                    <th class="w-10 px-3 py-2">
                                        <Checkbox
                                            id="select-all"
                                            checked=Signal::derive(move || {
                                                state.with(|s| s.all_loaded_selected())
                                            })
                                            on_change=on_toggle_all
                                        />
                                    </th>
                                    <th class="px-3 py-2 font-medium">"Company"</th>
                                    <th class="px-3 py-2 font-medium">"Contact"</th>
                                    <th class="px-3 py-2 font-medium">"Email"</th>
                                    <th class="px-3 py-2 font-medium">"City"</th>
                                    <th class="px-3 py-2 font-medium">"Country"</th>
                                    <th class="px-3 py-2 font-medium">"Status"</th>
                                    <th class="px-3 py-2 text-right font-medium">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || {
                                        state.with(|s| {
                                            s.list
                                                .data
                                                .as_ref()
                                                .map(|l| l.clients.clone())
                                                .unwrap_or_default()
                                        })
                                    }
                                    key=|c| c.id
                                    children=move |client: Client| {
                                        view! { <ClientRow client=client /> }
                                    }
                                />
                            </tbody>
                        </table>

                        <Show
                            when=move || {
                                state.with(|s| {
                                    s.list
                                        .data
                                        .as_ref()
                                        .map(|l| l.clients.is_empty())
                                        .unwrap_or(false)
                                })
                            }
                            fallback=|| ().into_view()
                        >
                            <div class="px-3 py-8 text-center text-sm text-muted-foreground">
                                "No clients match the current filters."
                            </div>
                        </Show>
                    </div>

                    <div class="flex flex-wrap items-center justify-between gap-2">
                        <div class="text-xs text-muted-foreground">{range_label}</div>
                        <div class="flex items-center gap-2">
                            <NativeSelect
                                id="page-size"
                                class="h-8 w-auto text-xs"
                                options={PAGE_SIZE_CHOICES
                                    .iter()
                                    .map(|n| (n.to_string(), format!("{n} / page")))
                                    .collect::<Vec<_>>()}
                                value=Signal::derive(move || {
                                    state.with(|s| s.query.per_page.to_string())
                                })
                                on_change=on_page_size
                            />
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:disabled=move || {
                                    state.with(|s| s.query.page <= 1 || s.list.loading)
                                }
                                on:click=on_prev
                            >
                                "Previous"
                            </Button>
                            <span class="text-xs text-muted-foreground">
                                {move || {
                                    state.with(|s| {
                                        let pages = s
                                            .list
                                            .data
                                            .as_ref()
                                            .map(|l| l.meta.total_pages.max(1))
                                            .unwrap_or(1);
                                        format!("{} / {}", s.query.page, pages)
                                    })
                                }}
                            </span>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:disabled=move || {
                                    state.with(|s| {
                                        let pages = s
                                            .list
                                            .data
                                            .as_ref()
                                            .map(|l| l.meta.total_pages)
                                            .unwrap_or(1);
                                        s.query.page >= pages || s.list.loading
                                    })
                                }
                                on:click=on_next
                            >
                                "Next"
                            </Button>
                        </div>
                    </div>
                </Show>
            </CardContent>
        </Card>
    }
}

#[component]
fn ClientRow(client: Client) -> impl IntoView {
    let ctrl = expect_context::<ClientsController>();
    let state = ctrl.state;
    let app_state = expect_context::<AppContext>();
    let permissions = app_state.0.permissions;

    let id = client.id;
    let selected = Signal::derive(move || state.with(|s| s.selection.contains(&id)));

    let on_toggle = move |_: bool| ctrl.toggle_selected(id);
    let on_view = move |_| ctrl.go_to(format!("/clients/{id}"));
    let on_edit = move |_| ctrl.go_to(format!("/clients/{id}/edit"));
    let on_delete = move |_| ctrl.delete_one(id);

    view! {
        <tr class="border-b last:border-0 hover:bg-muted/30">
            <td class="px-3 py-2">
                <Checkbox id=format!("select-{id}") checked=selected on_change=on_toggle />
            </td>
            <td class="px-3 py-2 font-medium">
                <a href=format!("/clients/{id}") class="hover:underline">
                    {client.company_name.clone()}
                </a>
            </td>
            <td class="px-3 py-2">{client.contact_name.clone()}</td>
            <td class="px-3 py-2 text-muted-foreground">{client.email.clone()}</td>
            <td class="px-3 py-2">{client.city.clone()}</td>
            <td class="px-3 py-2">{client.country.clone()}</td>
            <td class="px-3 py-2">
                <StatusBadge active=client.is_active />
            </td>
            <td class="px-3 py-2">
                <div class="flex items-center justify-end gap-1">
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_view>
                        "View"
                    </Button>
                    <Show when=move || permissions.get().can_update fallback=|| ().into_view()>
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_edit>
                            "Edit"
                        </Button>
                    </Show>
                    <Show when=move || permissions.get().can_delete fallback=|| ().into_view()>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            class="text-destructive hover:text-destructive"
                            on:click=on_delete
                        >
                            "Delete"
                        </Button>
                    </Show>
                </div>
            </td>
        </tr>
    }
}

#[component]
fn StatusBadge(active: bool) -> impl IntoView {
    view! {
        <Badge class=if active {
            "border-transparent bg-primary/10 text-primary"
        } else {
            "border-transparent bg-muted text-muted-foreground"
        }>
            {if active { "Active" } else { "Inactive" }}
        </Badge>
    }
}

#[component]
fn ClientDetailView() -> impl IntoView {
    let ctrl = expect_context::<ClientsController>();
    let state = ctrl.state;
    let app_state = expect_context::<AppContext>();
    let permissions = app_state.0.permissions;

    let on_back = move |_| ctrl.go_to_list();
    let on_edit = move |_| {
        if let Some(id) = state.with_untracked(|s| s.record.data.as_ref().map(|c| c.id)) {
            ctrl.go_to(format!("/clients/{id}/edit"));
        }
    };

    view! {
        <div class="flex flex-col gap-3">
            <Show
                when=move || state.with(|s| s.record.error.is_some())
                fallback=|| ().into_view()
            >
                <Alert class="border-destructive/30">
                    <AlertTitle>"Couldn't load this client"</AlertTitle>
                    <AlertDescription class="text-destructive">
                        {move || state.with(|s| s.record.error.clone().unwrap_or_default())}
                    </AlertDescription>
                    <div class="pt-2">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=on_back
                        >
                            "Back to clients"
                        </Button>
                    </div>
                </Alert>
            </Show>

            <Show
                when=move || state.with(|s| s.record.loading)
                fallback=|| ().into_view()
            >
                <div class="flex items-center gap-2 text-sm text-muted-foreground">
                    <Spinner />
                    "Loading client..."
                </div>
            </Show>

            {move || {
                state.with(|s| s.record.data.clone()).map(|client| {
                    let stats = client.stats.clone();
                    let fields = client.fields.clone();
                    view! {
                        <Card>
                            <CardHeader>
                                <CardTitle class="text-xl">{client.company_name.clone()}</CardTitle>
                                <CardDescription>
                                    <span class="inline-flex items-center gap-2">
                                        {client.contact_name.clone()}
                                        <StatusBadge active=client.is_active />
                                    </span>
                                </CardDescription>
                                <CardAction>
                                    <div class="flex items-center gap-2">
                                        <Show
                                            when=move || permissions.get().can_update
                                            fallback=|| ().into_view()
                                        >
                                            <Button size=ButtonSize::Sm on:click=on_edit>
                                                "Edit"
                                            </Button>
                                        </Show>
                                        <Button
                                            variant=ButtonVariant::Outline
                                            size=ButtonSize::Sm
                                            on:click=on_back
                                        >
                                            "Back"
                                        </Button>
                                    </div>
                                </CardAction>
                            </CardHeader>

                            <CardContent class="flex flex-col gap-4">
                                {stats.map(|stats| view! { <ClientStatsRow stats=stats /> })}

                                <dl class="grid grid-cols-1 gap-x-8 gap-y-2 text-sm sm:grid-cols-2">
                                    <DetailField label="Email" value=client.email.clone() />
                                    <DetailField label="Phone" value=client.phone.clone() />
                                    <DetailField label="Address" value=client.address.clone() />
                                    <DetailField label="City" value=client.city.clone() />
                                    <DetailField label="State" value=client.state.clone() />
                                    <DetailField label="Postal code" value=client.postal_code.clone() />
                                    <DetailField label="Country" value=client.country.clone() />
                                    <DetailField label="Tax ID" value=client.tax_id.clone() />
                                </dl>

                                <Show
                                    when={
                                        let has_fields = !client.fields.is_empty();
                                        move || has_fields
                                    }
                                    fallback=|| ().into_view()
                                >
                                    <div class="flex flex-col gap-2">
                                        <div class="text-sm font-medium">"Custom fields"</div>
                                        <CardList class="gap-1">
                                            {client
                                                .fields
                                                .iter()
                                                .map(|(label, value)| {
                                                    view! {
                                                        <CardItem class="justify-between gap-4 text-sm">
                                                            <span class="text-muted-foreground">
                                                                {label.clone()}
                                                            </span>
                                                            <span>{value.clone()}</span>
                                                        </CardItem>
                                                    }
                                                })
                                                .collect_view()}
                                        </CardList>
                                    </div>
                                </Show>

                                <div class="flex flex-wrap gap-x-8 gap-y-1 border-t pt-3 text-xs text-muted-foreground">
                                    <span>{format!("Created {}", client.created_at)}</span>
                                    <span>{format!("Updated {}", client.updated_at)}</span>
                                </div>
                            </CardContent>
                        </Card>
                    }
                })
            }}
        </div>
    }
}

#[component]
fn DetailField(#[prop(into)] label: String, #[prop(into)] value: String) -> impl IntoView {
    let shown = if value.trim().is_empty() {
        "-".to_string()
    } else {
        value
    };
    view! {
        <div class="flex items-baseline justify-between gap-4 border-b border-dashed py-1 last:border-0 sm:justify-start">
            <dt class="w-28 shrink-0 text-muted-foreground">{label}</dt>
            <dd class="text-right sm:text-left">{shown}</dd>
        </div>
    }
}

#[component]
fn ClientStatsRow(stats: ClientStats) -> impl IntoView {
    let money = |amount: f64| format!("{amount:.2}");
    view! {
        <div class="grid grid-cols-2 gap-2 sm:grid-cols-4">
            <StatTile label="Quotations" value=stats.quotation_count.to_string() />
            <StatTile label="Quoted total" value=money(stats.quotation_total) />
            <StatTile label="Invoices" value=stats.invoice_count.to_string() />
            <StatTile label="Invoiced total" value=money(stats.invoice_total) />
        </div>
    }
}

#[component]
fn StatTile(#[prop(into)] label: String, #[prop(into)] value: String) -> impl IntoView {
    view! {
        <div class="rounded-md border bg-muted/30 px-3 py-2">
            <div class="text-xs text-muted-foreground">{label}</div>
            <div class="text-lg font-semibold tabular-nums">{value}</div>
        </div>
    }
}
