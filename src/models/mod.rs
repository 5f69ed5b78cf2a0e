use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Backend account object stored by the host shell at login.
///
/// Only `permissions` is interpreted here; everything else is kept
/// flexible to avoid breaking when backend fields evolve.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AccountInfo {
    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct Client {
    pub id: i64,
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
    pub created_at: String,
    pub updated_at: String,

    /// Free-form custom fields, keyed by label. Ordered so the detail
    /// and edit views render deterministically.
    pub fields: BTreeMap<String, String>,

    /// Aggregates computed server-side. Single-record reads carry
    /// them; list responses omit them.
    pub stats: Option<ClientStats>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct ClientStats {
    pub quotation_count: u32,
    pub quotation_total: f64,
    pub invoice_count: u32,
    pub invoice_total: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct ClientList {
    pub clients: Vec<Client>,
    pub meta: PageMeta,
}

/// Create/update request body. The server assigns id and timestamps.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct ClientPayload {
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
    pub fields: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BulkAction {
    Activate,
    Deactivate,
    Delete,
}

impl PageMeta {
    /// "Showing 11-20 of 83" style label; `shown` is the number of rows
    /// actually on this page.
    pub(crate) fn range_label(&self, shown: usize) -> String {
        if self.total == 0 {
            return "No clients".to_string();
        }
        let start = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page) + 1;
        let end = start + shown.saturating_sub(1) as u64;
        format!("Showing {start}-{end} of {}", self.total)
    }
}

