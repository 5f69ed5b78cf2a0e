use crate::pages::ClientsPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    //
    // List, create, view and edit all resolve to the same route so the
    // page component survives navigation between them.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("clients/:id?/:action?") view=ClientsPage />
                <Route path=path!("") view=|| view! { <Redirect path="/clients" /> } />
            </Routes>
        </Router>
    }
}
