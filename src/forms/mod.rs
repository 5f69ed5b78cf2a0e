use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardFooter, CardHeader, CardTitle, Checkbox, Input, Label, NativeSelect, Spinner, Textarea,
};
use crate::models::{Client, ClientPayload};
use crate::state::clients_page::{ClientsController, PageMode};
use crate::util;
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FieldKind {
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Select,
    Checkbox,
    Date,
}

impl FieldKind {
    pub(crate) const ALL: [FieldKind; 8] = [
        FieldKind::Text,
        FieldKind::Textarea,
        FieldKind::Number,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Select,
        FieldKind::Checkbox,
        FieldKind::Date,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Textarea => "Multi-line text",
            FieldKind::Number => "Number",
            FieldKind::Email => "Email",
            FieldKind::Phone => "Phone",
            FieldKind::Select => "Dropdown",
            FieldKind::Checkbox => "Checkbox",
            FieldKind::Date => "Date",
        }
    }

    fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Email => "email",
            FieldKind::Phone => "tel",
            FieldKind::Date => "date",
            _ => "text",
        }
    }
}

/// The ten built-in columns every client record carries. Their values
/// live on the draft; only their position is part of the field layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum FixedField {
    CompanyName,
    ContactName,
    Email,
    Phone,
    Address,
    City,
    State,
    PostalCode,
    Country,
    TaxId,
}

impl FixedField {
    pub(crate) const ALL: [FixedField; 10] = [
        FixedField::CompanyName,
        FixedField::ContactName,
        FixedField::Email,
        FixedField::Phone,
        FixedField::Address,
        FixedField::City,
        FixedField::State,
        FixedField::PostalCode,
        FixedField::Country,
        FixedField::TaxId,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            FixedField::CompanyName => "Company name",
            FixedField::ContactName => "Contact name",
            FixedField::Email => "Email",
            FixedField::Phone => "Phone",
            FixedField::Address => "Address",
            FixedField::City => "City",
            FixedField::State => "State",
            FixedField::PostalCode => "Postal code",
            FixedField::Country => "Country",
            FixedField::TaxId => "Tax ID",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            FixedField::CompanyName => "company_name",
            FixedField::ContactName => "contact_name",
            FixedField::Email => "email",
            FixedField::Phone => "phone",
            FixedField::Address => "address",
            FixedField::City => "city",
            FixedField::State => "state",
            FixedField::PostalCode => "postal_code",
            FixedField::Country => "country",
            FixedField::TaxId => "tax_id",
        }
    }

    fn input_type(&self) -> &'static str {
        match self {
            FixedField::Email => "email",
            FixedField::Phone => "tel",
            _ => "text",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            FixedField::CompanyName => "Acme Corp",
            FixedField::ContactName => "Jane Smith",
            FixedField::Email => "billing@acme.example",
            FixedField::Phone => "+1 555 0100",
            _ => "",
        }
    }

    pub(crate) fn required(&self) -> bool {
        matches!(
            self,
            FixedField::CompanyName | FixedField::ContactName | FixedField::Email
        )
    }
}

/// Stable handle for a form field: fixed columns are addressed by
/// variant, dynamic ones by their generated id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum FieldKey {
    Fixed(FixedField),
    Dynamic(String),
}

impl FieldKey {
    pub(crate) fn dom_id(&self) -> String {
        match self {
            FieldKey::Fixed(f) => format!("field-{}", f.key()),
            FieldKey::Dynamic(id) => format!("field-{id}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DynamicField {
    pub id: String,
    pub kind: FieldKind,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    /// Only populated for `FieldKind::Select`; order is presentation
    /// order.
    pub options: Vec<FieldOption>,
    pub value: String,
}

impl DynamicField {
    pub(crate) fn new(
        id: String,
        kind: FieldKind,
        label: &str,
        placeholder: &str,
        required: bool,
        options: Vec<FieldOption>,
    ) -> Self {
        Self {
            id,
            kind,
            label: label.trim().to_string(),
            placeholder: placeholder.trim().to_string(),
            required,
            options,
            value: match kind {
                FieldKind::Checkbox => "false".to_string(),
                _ => String::new(),
            },
        }
    }
}

/// One reorderable row of the form.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FieldSlot {
    Fixed(FixedField),
    Dynamic(DynamicField),
}

impl FieldSlot {
    pub(crate) fn key(&self) -> FieldKey {
        match self {
            FieldSlot::Fixed(f) => FieldKey::Fixed(*f),
            FieldSlot::Dynamic(f) => FieldKey::Dynamic(f.id.clone()),
        }
    }
}

pub(crate) fn make_field_id(now_ms: u64, rand: u64) -> String {
    format!("cf-{now_ms}-{rand}")
}

/// Move `source` so it lands at `target`'s index as counted before the
/// removal. Self-drops and unknown keys are no-ops.
pub(crate) fn reorder_slots(slots: &mut Vec<FieldSlot>, source: &FieldKey, target: &FieldKey) -> bool {
    if source == target {
        return false;
    }
    let Some(src) = slots.iter().position(|s| s.key() == *source) else {
        return false;
    };
    let Some(tgt) = slots.iter().position(|s| s.key() == *target) else {
        return false;
    };

    let item = slots.remove(src);
    slots.insert(tgt.min(slots.len()), item);
    true
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !name.is_empty() && tld.len() >= 2
}

/// The single validation pass. Runs identically on every change and on
/// submit, so what the user sees inline is exactly what gates the save.
pub(crate) fn validate_draft(
    draft: &ClientDraft,
    slots: &[FieldSlot],
) -> BTreeMap<FieldKey, String> {
    let mut errors = BTreeMap::new();

    for field in FixedField::ALL {
        if field.required() && draft.get(field).trim().is_empty() {
            errors.insert(
                FieldKey::Fixed(field),
                format!("{} is required", field.label()),
            );
        }
    }

    let email = draft.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.insert(
            FieldKey::Fixed(FixedField::Email),
            "Enter a valid email address".to_string(),
        );
    }

    for slot in slots {
        if let FieldSlot::Dynamic(f) = slot {
            if f.required && f.value.trim().is_empty() {
                errors.insert(
                    FieldKey::Dynamic(f.id.clone()),
                    format!("{} is required", f.label),
                );
            }
        }
    }

    errors
}

/// Values for the fixed columns, edited in place by the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ClientDraft {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub tax_id: String,
    pub is_active: bool,
}

impl ClientDraft {
    fn from_client(c: &Client) -> Self {
        Self {
            company_name: c.company_name.clone(),
            contact_name: c.contact_name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            city: c.city.clone(),
            state: c.state.clone(),
            postal_code: c.postal_code.clone(),
            country: c.country.clone(),
            tax_id: c.tax_id.clone(),
            is_active: c.is_active,
        }
    }

    pub(crate) fn get(&self, field: FixedField) -> &str {
        match field {
            FixedField::CompanyName => &self.company_name,
            FixedField::ContactName => &self.contact_name,
            FixedField::Email => &self.email,
            FixedField::Phone => &self.phone,
            FixedField::Address => &self.address,
            FixedField::City => &self.city,
            FixedField::State => &self.state,
            FixedField::PostalCode => &self.postal_code,
            FixedField::Country => &self.country,
            FixedField::TaxId => &self.tax_id,
        }
    }

    fn set(&mut self, field: FixedField, value: String) {
        match field {
            FixedField::CompanyName => self.company_name = value,
            FixedField::ContactName => self.contact_name = value,
            FixedField::Email => self.email = value,
            FixedField::Phone => self.phone = value,
            FixedField::Address => self.address = value,
            FixedField::City => self.city = value,
            FixedField::State => self.state = value,
            FixedField::PostalCode => self.postal_code = value,
            FixedField::Country => self.country = value,
            FixedField::TaxId => self.tax_id = value,
        }
    }
}

/// Drag interaction for field reordering. Purely visual until a drop
/// lands; `reset` must leave no trace of an abandoned drag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum DragState {
    #[default]
    Idle,
    Dragging {
        source: FieldKey,
    },
    Hovering {
        source: FieldKey,
        target: FieldKey,
    },
}

impl DragState {
    pub(crate) fn begin(&mut self, source: FieldKey) {
        *self = DragState::Dragging { source };
    }

    pub(crate) fn hover(&mut self, target: FieldKey) {
        let Some(source) = self.source().cloned() else {
            return;
        };
        if source == target {
            // The row under the pointer is the one being dragged; there
            // is no drop target to highlight.
            *self = DragState::Dragging { source };
        } else {
            *self = DragState::Hovering { source, target };
        }
    }

    pub(crate) fn leave(&mut self, key: &FieldKey) {
        if let DragState::Hovering { source, target } = self {
            if target == key {
                *self = DragState::Dragging {
                    source: source.clone(),
                };
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = DragState::Idle;
    }

    pub(crate) fn source(&self) -> Option<&FieldKey> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::Hovering { source, .. } => Some(source),
        }
    }

    pub(crate) fn target(&self) -> Option<&FieldKey> {
        match self {
            DragState::Hovering { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Complete draft of the client form: field values, layout, validation
/// errors, and the in-flight drag. One value, so every transition is a
/// plain method call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FormState {
    /// Record id this form was seeded from; `None` for a create form.
    pub source_id: Option<i64>,
    pub draft: ClientDraft,
    pub slots: Vec<FieldSlot>,
    pub errors: BTreeMap<FieldKey, String>,
    pub drag: DragState,
}

impl FormState {
    pub(crate) fn for_create() -> Self {
        Self {
            source_id: None,
            draft: ClientDraft {
                is_active: true,
                ..ClientDraft::default()
            },
            slots: FixedField::ALL.iter().copied().map(FieldSlot::Fixed).collect(),
            errors: BTreeMap::new(),
            drag: DragState::Idle,
        }
    }

    /// Seed an edit form. Custom fields come back as a plain label/value
    /// map, so they re-enter the layout as plain text fields in map
    /// order, after the fixed columns.
    pub(crate) fn for_client(client: &Client) -> Self {
        let mut slots: Vec<FieldSlot> =
            FixedField::ALL.iter().copied().map(FieldSlot::Fixed).collect();

        for (i, (label, value)) in client.fields.iter().enumerate() {
            slots.push(FieldSlot::Dynamic(DynamicField {
                id: format!("cf-{i}"),
                kind: FieldKind::Text,
                label: label.clone(),
                placeholder: String::new(),
                required: false,
                options: vec![],
                value: value.clone(),
            }));
        }

        Self {
            source_id: Some(client.id),
            draft: ClientDraft::from_client(client),
            slots,
            errors: BTreeMap::new(),
            drag: DragState::Idle,
        }
    }

    pub(crate) fn refresh_errors(&mut self) {
        self.errors = validate_draft(&self.draft, &self.slots);
    }

    pub(crate) fn validate_for_submit(&mut self) -> bool {
        self.refresh_errors();
        self.errors.is_empty()
    }

    pub(crate) fn set_fixed(&mut self, field: FixedField, value: String) {
        self.draft.set(field, value);
        self.refresh_errors();
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.draft.is_active = active;
    }

    pub(crate) fn dynamic_value(&self, id: &str) -> String {
        self.slots
            .iter()
            .find_map(|s| match s {
                FieldSlot::Dynamic(f) if f.id == id => Some(f.value.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub(crate) fn set_dynamic_value(&mut self, id: &str, value: String) {
        for slot in &mut self.slots {
            if let FieldSlot::Dynamic(f) = slot {
                if f.id == id {
                    f.value = value;
                    break;
                }
            }
        }
        self.refresh_errors();
    }

    pub(crate) fn add_dynamic(&mut self, field: DynamicField) {
        self.slots.push(FieldSlot::Dynamic(field));
    }

    /// Remove a dynamic field together with its validation error, but
    /// without re-validating anything else.
    pub(crate) fn remove_dynamic(&mut self, id: &str) {
        self.slots
            .retain(|s| !matches!(s, FieldSlot::Dynamic(f) if f.id == id));
        self.errors.remove(&FieldKey::Dynamic(id.to_string()));
    }

    pub(crate) fn drag_start(&mut self, key: FieldKey) {
        self.drag.begin(key);
    }

    pub(crate) fn drag_over(&mut self, key: FieldKey) {
        self.drag.hover(key);
    }

    pub(crate) fn drag_leave(&mut self, key: &FieldKey) {
        self.drag.leave(key);
    }

    pub(crate) fn drop_on(&mut self, target: FieldKey) -> bool {
        let moved = match self.drag.source().cloned() {
            Some(source) => reorder_slots(&mut self.slots, &source, &target),
            None => false,
        };
        self.drag.reset();
        moved
    }

    pub(crate) fn drag_end(&mut self) {
        self.drag.reset();
    }

    /// Request body for create/update. Fixed values are trimmed (email
    /// also lowercased); dynamic fields flatten to a label/value map.
    pub(crate) fn payload(&self) -> ClientPayload {
        let mut fields = BTreeMap::new();
        for slot in &self.slots {
            if let FieldSlot::Dynamic(f) = slot {
                fields.insert(f.label.clone(), f.value.clone());
            }
        }

        ClientPayload {
            company_name: self.draft.company_name.trim().to_string(),
            contact_name: self.draft.contact_name.trim().to_string(),
            email: self.draft.email.trim().to_lowercase(),
            phone: self.draft.phone.trim().to_string(),
            address: self.draft.address.trim().to_string(),
            city: self.draft.city.trim().to_string(),
            state: self.draft.state.trim().to_string(),
            postal_code: self.draft.postal_code.trim().to_string(),
            country: self.draft.country.trim().to_string(),
            tax_id: self.draft.tax_id.trim().to_string(),
            is_active: self.draft.is_active,
            fields,
        }
    }
}

#[component]
pub fn ClientFormEditor() -> impl IntoView {
    let ctrl = expect_context::<ClientsController>();
    let state = ctrl.state;

    let form: RwSignal<FormState> = RwSignal::new(FormState::for_create());
    let saving: RwSignal<bool> = RwSignal::new(false);

    // "Add field" panel state.
    let panel_open: RwSignal<bool> = RwSignal::new(false);
    let new_kind: RwSignal<String> = RwSignal::new("text".to_string());
    let new_label: RwSignal<String> = RwSignal::new(String::new());
    let new_placeholder: RwSignal<String> = RwSignal::new(String::new());
    let new_required: RwSignal<bool> = RwSignal::new(false);
    let new_options: RwSignal<Vec<FieldOption>> = RwSignal::new(vec![]);
    let new_option_value: RwSignal<String> = RwSignal::new(String::new());
    let new_option_label: RwSignal<String> = RwSignal::new(String::new());
    let panel_error: RwSignal<Option<String>> = RwSignal::new(None);

    let is_edit = Signal::derive(move || state.with(|s| s.mode == PageMode::Edit));
    // Edit forms stay blank until the record arrives.
    let seed_pending =
        Signal::derive(move || is_edit.get() && form.with(|f| f.source_id.is_none()));

    // Seed / reseed the draft when the mode or the loaded record changes.
    Effect::new(move |_| {
        let mode = state.with(|s| s.mode);
        match mode {
            PageMode::Create => {
                if form.with_untracked(|f| f.source_id.is_some()) {
                    form.set(FormState::for_create());
                }
            }
            PageMode::Edit => {
                if let Some(client) = state.with(|s| s.record.data.clone()) {
                    if form.with_untracked(|f| f.source_id) != Some(client.id) {
                        form.set(FormState::for_client(&client));
                    }
                }
            }
            _ => {}
        }
    });

    let reset_panel = move || {
        new_kind.set("text".to_string());
        new_label.set(String::new());
        new_placeholder.set(String::new());
        new_required.set(false);
        new_options.set(vec![]);
        new_option_value.set(String::new());
        new_option_label.set(String::new());
        panel_error.set(None);
    };

    let on_add_option = move |_| {
        let value = new_option_value.get_untracked().trim().to_string();
        let label = new_option_label.get_untracked().trim().to_string();
        if value.is_empty() || label.is_empty() {
            panel_error.set(Some("Option needs both a value and a label".to_string()));
            return;
        }
        new_options.update(|opts| opts.push(FieldOption { value, label }));
        new_option_value.set(String::new());
        new_option_label.set(String::new());
        panel_error.set(None);
    };

    let on_confirm_field = move |_| {
        let label = new_label.get_untracked();
        if label.trim().is_empty() {
            panel_error.set(Some("Field label is required".to_string()));
            return;
        }

        let kind = new_kind
            .get_untracked()
            .parse::<FieldKind>()
            .unwrap_or(FieldKind::Text);
        let options = new_options.get_untracked();
        if kind == FieldKind::Select && options.is_empty() {
            panel_error.set(Some("Add at least one option for a dropdown field".to_string()));
            return;
        }

        let id = make_field_id(
            js_sys::Date::now() as u64,
            (js_sys::Math::random() * 1_000_000.0) as u64,
        );
        form.update(|f| {
            f.add_dynamic(DynamicField::new(
                id,
                kind,
                &label,
                &new_placeholder.get_untracked(),
                new_required.get_untracked(),
                options,
            ))
        });

        reset_panel();
        panel_open.set(false);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        if saving.get_untracked() || seed_pending.get_untracked() {
            return;
        }

        let mut valid = false;
        form.update(|f| valid = f.validate_for_submit());
        if !valid {
            return;
        }

        let payload = form.with_untracked(|f| f.payload());
        let editing_id = if is_edit.get_untracked() {
            let Some(id) = form.with_untracked(|f| f.source_id) else {
                return;
            };
            Some(id)
        } else {
            None
        };

        saving.set(true);

        spawn_local(async move {
            // Pre-flight duplicate check; the server remains the
            // authority, so a failing check never blocks the save.
            match ctrl.api().email_exists(&payload.email, editing_id).await {
                Ok(true) => {
                    util::alert("A client with this email address already exists.");
                    saving.set(false);
                    return;
                }
                Ok(false) => {}
                Err(e) => logging::warn!("email existence check failed: {e}"),
            }

            match editing_id {
                Some(id) => {
                    let _ = ctrl.submit_update(id, payload).await;
                }
                None => {
                    let _ = ctrl.submit_create(payload).await;
                }
            }
            saving.set(false);
        });
    };

    let on_cancel = move |_| {
        match form.with_untracked(|f| f.source_id) {
            Some(id) => ctrl.go_to(format!("/clients/{id}")),
            None => ctrl.go_to_list(),
        }
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-xl">
                    {move || if is_edit.get() { "Edit client" } else { "New client" }}
                </CardTitle>
                <CardDescription>
                    "Drag rows to change the field order. Custom fields are saved with the record."
                </CardDescription>
            </CardHeader>

            <CardContent>
                <Show when=move || state.with(|s| s.record.error.is_some()) fallback=|| ().into_view()>
                    <Alert class="border-destructive/30 mb-4">
                        <AlertDescription class="text-destructive">
                            {move || state.with(|s| s.record.error.clone().unwrap_or_default())}
                        </AlertDescription>
                    </Alert>
                </Show>

                <Show
                    when=move || !seed_pending.get()
                    fallback=move || view! {
                        <div class="flex items-center gap-2 py-8 text-sm text-muted-foreground">
                            <Spinner />
                            "Loading client..."
                        </div>
                    }
                >
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <For
                            each=move || form.with(|f| f.slots.clone())
                            key=|slot| slot.key().dom_id()
                            children=move |slot: FieldSlot| {
                                view! { <FieldRow form=form r#slot=slot /> }
                            }
                        />

                        <div class="flex items-center gap-2 pt-1">
                            <Checkbox
                                id="field-is-active"
                                checked=Signal::derive(move || form.with(|f| f.draft.is_active))
                                on_change=Callback::new(move |v: bool| form.update(|f| f.set_active(v)))
                            />
                            <Label html_for="field-is-active">"Active client"</Label>
                        </div>

                        <Show
                            when=move || panel_open.get()
                            fallback=move || view! {
                                <div>
                                    <Button
                                        attr:r#type="button"
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| panel_open.set(true)
                                    >
                                        "+ Add field"
                                    </Button>
                                </div>
                            }
                        >
                            <div class="flex flex-col gap-3 rounded-md border border-dashed p-4">
                                <div class="text-sm font-medium">"New custom field"</div>

                                <div class="grid grid-cols-1 gap-3 sm:grid-cols-2">
                                    <div class="flex flex-col gap-2">
                                        <Label html_for="new-field-kind">"Type"</Label>
                                        <NativeSelect
                                            id="new-field-kind"
                                            options={FieldKind::ALL
                                                .iter()
                                                .map(|k| (k.to_string(), k.label().to_string()))
                                                .collect::<Vec<_>>()}
                                            value=Signal::derive(move || new_kind.get())
                                            on_change=Callback::new(move |v: String| new_kind.set(v))
                                        />
                                    </div>

                                    <div class="flex flex-col gap-2">
                                        <Label html_for="new-field-label">"Label"</Label>
                                        <Input
                                            id="new-field-label"
                                            placeholder="Industry"
                                            value=Signal::derive(move || new_label.get())
                                            on_input=Callback::new(move |v: String| new_label.set(v))
                                        />
                                    </div>

                                    <div class="flex flex-col gap-2">
                                        <Label html_for="new-field-placeholder">"Placeholder"</Label>
                                        <Input
                                            id="new-field-placeholder"
                                            placeholder="Optional hint"
                                            value=Signal::derive(move || new_placeholder.get())
                                            on_input=Callback::new(move |v: String| new_placeholder.set(v))
                                        />
                                    </div>

                                    <div class="flex items-center gap-2 pt-6">
                                        <Checkbox
                                            id="new-field-required"
                                            checked=Signal::derive(move || new_required.get())
                                            on_change=Callback::new(move |v: bool| new_required.set(v))
                                        />
                                        <Label html_for="new-field-required">"Required"</Label>
                                    </div>
                                </div>

                                <Show
                                    when=move || new_kind.get() == "select"
                                    fallback=|| ().into_view()
                                >
                                    <div class="flex flex-col gap-2">
                                        <Label>"Options"</Label>

                                        {move || {
                                            new_options
                                                .get()
                                                .into_iter()
                                                .map(|opt| {
                                                    let value = opt.value.clone();
                                                    view! {
                                                        <div class="flex items-center gap-2 text-sm">
                                                            <span class="font-mono text-xs text-muted-foreground">{opt.value.clone()}</span>
                                                            <span class="flex-1">{opt.label.clone()}</span>
                                                            <Button
                                                                attr:r#type="button"
                                                                variant=ButtonVariant::Ghost
                                                                size=ButtonSize::Sm
                                                                on:click=move |_| {
                                                                    new_options.update(|opts| opts.retain(|o| o.value != value));
                                                                }
                                                            >
                                                                "Remove"
                                                            </Button>
                                                        </div>
                                                    }
                                                })
                                                .collect_view()
                                        }}

                                        <div class="flex items-end gap-2">
                                            <Input
                                                placeholder="value"
                                                value=Signal::derive(move || new_option_value.get())
                                                on_input=Callback::new(move |v: String| new_option_value.set(v))
                                            />
                                            <Input
                                                placeholder="Label"
                                                value=Signal::derive(move || new_option_label.get())
                                                on_input=Callback::new(move |v: String| new_option_label.set(v))
                                            />
                                            <Button
                                                attr:r#type="button"
                                                variant=ButtonVariant::Outline
                                                size=ButtonSize::Sm
                                                on:click=on_add_option
                                            >
                                                "Add option"
                                            </Button>
                                        </div>
                                    </div>
                                </Show>

                                <Show when=move || panel_error.get().is_some() fallback=|| ().into_view()>
                                    <p class="text-xs text-destructive">
                                        {move || panel_error.get().unwrap_or_default()}
                                    </p>
                                </Show>

                                <div class="flex items-center gap-2">
                                    <Button
                                        attr:r#type="button"
                                        size=ButtonSize::Sm
                                        on:click=on_confirm_field
                                    >
                                        "Add field"
                                    </Button>
                                    <Button
                                        attr:r#type="button"
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Sm
                                        on:click=move |_| {
                                            reset_panel();
                                            panel_open.set(false);
                                        }
                                    >
                                        "Cancel"
                                    </Button>
                                </div>
                            </div>
                        </Show>

                        <CardFooter class="justify-end gap-2 px-0 pt-2">
                            <Button
                                attr:r#type="button"
                                variant=ButtonVariant::Outline
                                on:click=on_cancel
                            >
                                "Cancel"
                            </Button>
                            <Button attr:disabled=move || saving.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || saving.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || {
                                        if saving.get() {
                                            "Saving..."
                                        } else if is_edit.get_untracked() {
                                            "Save changes"
                                        } else {
                                            "Create client"
                                        }
                                    }}
                                </span>
                            </Button>
                        </CardFooter>
                    </form>
                </Show>
            </CardContent>
        </Card>
    }
}

#[component]
fn FieldRow(form: RwSignal<FormState>, slot: FieldSlot) -> impl IntoView {
    let key = StoredValue::new(slot.key());
    let dom_id = slot.key().dom_id();

    let row_class = move || {
        form.with(|f| {
            let k = key.get_value();
            if f.drag.source() == Some(&k) {
                "flex flex-col gap-1 rounded-md border border-transparent px-2 py-2 opacity-50"
            } else if f.drag.target() == Some(&k) {
                "flex flex-col gap-1 rounded-md border border-transparent px-2 py-2 rounded-md bg-primary/10 ring-1 ring-primary/30"
            } else {
                "flex flex-col gap-1 rounded-md border border-transparent px-2 py-2 hover:border-border"
            }
        })
    };

    let (label, required, remove_id) = match &slot {
        FieldSlot::Fixed(f) => (f.label().to_string(), f.required(), None),
        FieldSlot::Dynamic(f) => (f.label.clone(), f.required, Some(f.id.clone())),
    };

    let input_view = match slot.clone() {
        FieldSlot::Fixed(field) => {
            let value = Signal::derive(move || form.with(|f| f.draft.get(field).to_string()));
            let on_input = Callback::new(move |v: String| form.update(|f| f.set_fixed(field, v)));
            view! {
                <Input
                    id=dom_id.clone()
                    r#type=field.input_type()
                    placeholder=field.placeholder()
                    value=value
                    on_input=on_input
                />
            }
            .into_any()
        }
        FieldSlot::Dynamic(field) => match field.kind {
            FieldKind::Select => {
                let mut options = vec![(String::new(), "-".to_string())];
                options.extend(
                    field
                        .options
                        .iter()
                        .map(|o| (o.value.clone(), o.label.clone())),
                );
                let id1 = field.id.clone();
                let id2 = field.id.clone();
                view! {
                    <NativeSelect
                        id=dom_id.clone()
                        options=options
                        value=Signal::derive(move || form.with(|f| f.dynamic_value(&id1)))
                        on_change=Callback::new(move |v: String| {
                            form.update(|f| f.set_dynamic_value(&id2, v))
                        })
                    />
                }
                .into_any()
            }
            FieldKind::Checkbox => {
                let id1 = field.id.clone();
                let id2 = field.id.clone();
                view! {
                    <Checkbox
                        id=dom_id.clone()
                        checked=Signal::derive(move || form.with(|f| f.dynamic_value(&id1) == "true"))
                        on_change=Callback::new(move |v: bool| {
                            form.update(|f| f.set_dynamic_value(&id2, v.to_string()))
                        })
                    />
                }
                .into_any()
            }
            FieldKind::Textarea => {
                let id1 = field.id.clone();
                let id2 = field.id.clone();
                view! {
                    <Textarea
                        id=dom_id.clone()
                        placeholder=field.placeholder.clone()
                        value=Signal::derive(move || form.with(|f| f.dynamic_value(&id1)))
                        on_input=Callback::new(move |v: String| {
                            form.update(|f| f.set_dynamic_value(&id2, v))
                        })
                    />
                }
                .into_any()
            }
            _ => {
                let id1 = field.id.clone();
                let id2 = field.id.clone();
                view! {
                    <Input
                        id=dom_id.clone()
                        r#type=field.kind.input_type()
                        placeholder=field.placeholder.clone()
                        value=Signal::derive(move || form.with(|f| f.dynamic_value(&id1)))
                        on_input=Callback::new(move |v: String| {
                            form.update(|f| f.set_dynamic_value(&id2, v))
                        })
                    />
                }
                .into_any()
            }
        },
    };

    view! {
        <div
            class=row_class
            draggable="true"
            on:dragstart=move |ev: web_sys::DragEvent| {
                if let Some(dt) = ev.data_transfer() {
                    let _ = dt.set_data("text/plain", &key.get_value().dom_id());
                    dt.set_drop_effect("move");
                }
                form.update(|f| f.drag_start(key.get_value()));
            }
            on:dragover=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                if let Some(dt) = ev.data_transfer() {
                    dt.set_drop_effect("move");
                }
                let k = key.get_value();
                if form.with_untracked(|f| f.drag.target() != Some(&k)) {
                    form.update(|f| f.drag_over(k));
                }
            }
            on:dragleave=move |_ev: web_sys::DragEvent| {
                let k = key.get_value();
                if form.with_untracked(|f| f.drag.target() == Some(&k)) {
                    form.update(|f| f.drag_leave(&k));
                }
            }
            on:drop=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                form.update(|f| {
                    f.drop_on(key.get_value());
                });
            }
            on:dragend=move |_ev: web_sys::DragEvent| {
                if form.with_untracked(|f| f.drag != DragState::Idle) {
                    form.update(|f| f.drag_end());
                }
            }
        >
            <div class="flex items-center gap-2">
                <span class="cursor-grab select-none text-muted-foreground" title="Drag to reorder">
                    <svg width="10" height="16" viewBox="0 0 10 16" fill="currentColor" aria-hidden="true">
                        <circle cx="2" cy="2" r="1.5"/><circle cx="8" cy="2" r="1.5"/>
                        <circle cx="2" cy="8" r="1.5"/><circle cx="8" cy="8" r="1.5"/>
                        <circle cx="2" cy="14" r="1.5"/><circle cx="8" cy="14" r="1.5"/>
                    </svg>
                </span>

                <Label class="flex-1" html_for=slot.key().dom_id()>
                    {label}
                    {required.then(|| view! { <span class="text-destructive">"*"</span> })}
                </Label>

                {remove_id.map(|id| {
                    view! {
                        <Button
                            attr:r#type="button"
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=move |_| form.update(|f| f.remove_dynamic(&id))
                        >
                            "Remove"
                        </Button>
                    }
                })}
            </div>

            <div class="pl-6">
                {input_view}

                {move || {
                    let k = key.get_value();
                    form.with(|f| f.errors.get(&k).cloned()).map(|msg| {
                        view! { <p class="pt-1 text-xs text-destructive">{msg}</p> }
                    })
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(slots: &[FieldSlot]) -> Vec<String> {
        slots.iter().map(|s| s.key().dom_id()).collect()
    }

    fn dyn_field(id: &str, label: &str, required: bool) -> DynamicField {
        DynamicField::new(
            id.to_string(),
            FieldKind::Text,
            label,
            "",
            required,
            vec![],
        )
    }

    #[test]
    fn test_reorder_inserts_at_targets_former_index() {
        // [A, B, C]: dragging A onto C puts A where C used to sit.
        let mut slots = vec![
            FieldSlot::Dynamic(dyn_field("a", "A", false)),
            FieldSlot::Dynamic(dyn_field("b", "B", false)),
            FieldSlot::Dynamic(dyn_field("c", "C", false)),
        ];

        let moved = reorder_slots(
            &mut slots,
            &FieldKey::Dynamic("a".to_string()),
            &FieldKey::Dynamic("c".to_string()),
        );
        assert!(moved);
        assert_eq!(keys(&slots), vec!["field-b", "field-c", "field-a"]);
    }

    #[test]
    fn test_reorder_moving_up_lands_before_target() {
        let mut slots = vec![
            FieldSlot::Dynamic(dyn_field("a", "A", false)),
            FieldSlot::Dynamic(dyn_field("b", "B", false)),
            FieldSlot::Dynamic(dyn_field("c", "C", false)),
        ];

        reorder_slots(
            &mut slots,
            &FieldKey::Dynamic("c".to_string()),
            &FieldKey::Dynamic("a".to_string()),
        );
        assert_eq!(keys(&slots), vec!["field-c", "field-a", "field-b"]);
    }

    #[test]
    fn test_reorder_self_and_unknown_are_noops() {
        let mut slots = vec![
            FieldSlot::Dynamic(dyn_field("a", "A", false)),
            FieldSlot::Dynamic(dyn_field("b", "B", false)),
        ];
        let before = slots.clone();

        assert!(!reorder_slots(
            &mut slots,
            &FieldKey::Dynamic("a".to_string()),
            &FieldKey::Dynamic("a".to_string()),
        ));
        assert!(!reorder_slots(
            &mut slots,
            &FieldKey::Dynamic("ghost".to_string()),
            &FieldKey::Dynamic("b".to_string()),
        ));
        assert!(!reorder_slots(
            &mut slots,
            &FieldKey::Dynamic("a".to_string()),
            &FieldKey::Dynamic("ghost".to_string()),
        ));
        assert_eq!(slots, before);
    }

    #[test]
    fn test_drag_state_transitions() {
        let a = FieldKey::Dynamic("a".to_string());
        let b = FieldKey::Dynamic("b".to_string());

        let mut drag = DragState::Idle;
        // Hovering before any drag does nothing.
        drag.hover(b.clone());
        assert_eq!(drag, DragState::Idle);

        drag.begin(a.clone());
        assert_eq!(drag.source(), Some(&a));
        assert_eq!(drag.target(), None);

        drag.hover(b.clone());
        assert_eq!(drag.target(), Some(&b));

        // Hovering the source row drops the highlight.
        drag.hover(a.clone());
        assert_eq!(drag.target(), None);
        assert_eq!(drag.source(), Some(&a));

        drag.hover(b.clone());
        drag.leave(&a); // leaving a non-target row changes nothing
        assert_eq!(drag.target(), Some(&b));
        drag.leave(&b);
        assert_eq!(drag.target(), None);

        drag.reset();
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_drop_reorders_and_always_clears_drag() {
        let mut form = FormState::for_create();
        form.add_dynamic(dyn_field("x", "X", false));

        let first = form.slots[0].key();
        form.drag_start(FieldKey::Dynamic("x".to_string()));
        form.drag_over(first.clone());
        assert!(form.drop_on(first.clone()));

        assert_eq!(form.slots[0].key(), FieldKey::Dynamic("x".to_string()));
        assert_eq!(form.drag, DragState::Idle);

        // A drop with no drag in flight is a clean no-op.
        let before = form.slots.clone();
        assert!(!form.drop_on(first));
        assert_eq!(form.slots, before);
        assert_eq!(form.drag, DragState::Idle);
    }

    #[test]
    fn test_validation_requires_company_contact_and_email() {
        let form = FormState::for_create();
        let errors = validate_draft(&form.draft, &form.slots);

        assert_eq!(
            errors.get(&FieldKey::Fixed(FixedField::CompanyName)).map(String::as_str),
            Some("Company name is required")
        );
        assert!(errors.contains_key(&FieldKey::Fixed(FixedField::ContactName)));
        assert_eq!(
            errors.get(&FieldKey::Fixed(FixedField::Email)).map(String::as_str),
            Some("Email is required")
        );
        // The other seven fixed columns are optional.
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validation_error_clears_once_field_is_filled() {
        let mut form = FormState::for_create();
        assert!(!form.validate_for_submit());
        assert!(form
            .errors
            .contains_key(&FieldKey::Fixed(FixedField::CompanyName)));

        form.set_fixed(FixedField::CompanyName, "Acme".to_string());
        assert!(!form
            .errors
            .contains_key(&FieldKey::Fixed(FixedField::CompanyName)));

        form.set_fixed(FixedField::ContactName, "Jane".to_string());
        form.set_fixed(FixedField::Email, "jane@acme.example".to_string());
        assert!(form.validate_for_submit());
    }

    #[test]
    fn test_validation_flags_malformed_email() {
        let mut form = FormState::for_create();
        form.set_fixed(FixedField::CompanyName, "Acme".to_string());
        form.set_fixed(FixedField::ContactName, "Jane".to_string());

        form.set_fixed(FixedField::Email, "bad@".to_string());
        assert!(!form.validate_for_submit());
        assert_eq!(
            form.errors.get(&FieldKey::Fixed(FixedField::Email)).map(String::as_str),
            Some("Enter a valid email address")
        );

        form.set_fixed(FixedField::Email, "ok@example.com".to_string());
        assert!(form.validate_for_submit());
    }

    #[test]
    fn test_is_valid_email_cases() {
        assert!(is_valid_email("ok@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));
        assert!(!is_valid_email("bad@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spa ce@example.com"));
        assert!(!is_valid_email("dot@example."));
    }

    #[test]
    fn test_required_dynamic_field_blocks_submit() {
        let mut form = FormState::for_create();
        form.set_fixed(FixedField::CompanyName, "Acme".to_string());
        form.set_fixed(FixedField::ContactName, "Jane".to_string());
        form.set_fixed(FixedField::Email, "jane@acme.example".to_string());
        form.add_dynamic(dyn_field("cf-1", "Industry", true));

        assert!(!form.validate_for_submit());
        assert_eq!(
            form.errors
                .get(&FieldKey::Dynamic("cf-1".to_string()))
                .map(String::as_str),
            Some("Industry is required")
        );

        form.set_dynamic_value("cf-1", "Aerospace".to_string());
        assert!(form.validate_for_submit());
    }

    #[test]
    fn test_remove_dynamic_drops_field_and_its_error() {
        let mut form = FormState::for_create();
        form.add_dynamic(dyn_field("cf-1", "Industry", true));
        form.refresh_errors();
        assert!(form.errors.contains_key(&FieldKey::Dynamic("cf-1".to_string())));

        form.remove_dynamic("cf-1");
        assert!(!form.errors.contains_key(&FieldKey::Dynamic("cf-1".to_string())));
        assert_eq!(form.slots.len(), FixedField::ALL.len());
        // Untouched errors are left alone until the next validation pass.
        assert!(!form.errors.contains_key(&FieldKey::Fixed(FixedField::CompanyName)));
    }

    #[test]
    fn test_select_field_roundtrips_chosen_option_into_payload() {
        let mut form = FormState::for_create();
        form.set_fixed(FixedField::CompanyName, "Acme".to_string());
        form.set_fixed(FixedField::ContactName, "Jane".to_string());

        form.add_dynamic(DynamicField::new(
            "cf-9".to_string(),
            FieldKind::Select,
            "Tier",
            "",
            false,
            vec![
                FieldOption {
                    value: "std".to_string(),
                    label: "Standard".to_string(),
                },
                FieldOption {
                    value: "prm".to_string(),
                    label: "Premium".to_string(),
                },
            ],
        ));
        form.set_dynamic_value("cf-9", "prm".to_string());

        let payload = form.payload();
        assert_eq!(payload.fields.get("Tier").map(String::as_str), Some("prm"));
    }

    #[test]
    fn test_checkbox_field_defaults_to_false_in_payload() {
        let mut form = FormState::for_create();
        form.add_dynamic(DynamicField::new(
            "cf-2".to_string(),
            FieldKind::Checkbox,
            "VIP",
            "",
            false,
            vec![],
        ));

        assert_eq!(form.payload().fields.get("VIP").map(String::as_str), Some("false"));
        form.set_dynamic_value("cf-2", "true".to_string());
        assert_eq!(form.payload().fields.get("VIP").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_payload_trims_and_lowercases() {
        let mut form = FormState::for_create();
        form.set_fixed(FixedField::CompanyName, "  Acme  ".to_string());
        form.set_fixed(FixedField::Email, " Sales@Acme.COM ".to_string());

        let payload = form.payload();
        assert_eq!(payload.company_name, "Acme");
        assert_eq!(payload.email, "sales@acme.com");
        assert!(payload.is_active);
    }

    #[test]
    fn test_for_client_seeds_draft_and_custom_fields() {
        let client: Client = serde_json::from_value(serde_json::json!({
            "id": 12,
            "company_name": "Globex",
            "contact_name": "Hank",
            "email": "ops@globex.example",
            "is_active": false,
            "fields": {"Industry": "Energy", "Region": "EMEA"}
        }))
        .unwrap();

        let form = FormState::for_client(&client);
        assert_eq!(form.source_id, Some(12));
        assert_eq!(form.draft.company_name, "Globex");
        assert!(!form.draft.is_active);

        // Ten fixed columns first, then the customs in map order.
        assert_eq!(form.slots.len(), 12);
        let labels: Vec<String> = form.slots[10..]
            .iter()
            .map(|s| match s {
                FieldSlot::Dynamic(f) => f.label.clone(),
                FieldSlot::Fixed(_) => unreachable!(),
            })
            .collect();
        assert_eq!(labels, vec!["Industry", "Region"]);
        assert_eq!(form.dynamic_value("cf-1"), "EMEA");
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_make_field_id_incorporates_both_parts() {
        assert_eq!(make_field_id(1000, 42), "cf-1000-42");
        assert_ne!(make_field_id(1000, 1), make_field_id(1000, 2));
    }
}
