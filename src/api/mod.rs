use crate::models::{BulkAction, Client, ClientList, ClientPayload, PageMeta};
use crate::storage::{self, DEFAULT_PAGE_SIZE};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: &str) -> Self {
        let fallback = format!("Request failed ({status})");
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(v) => extract_api_message(&v, &fallback),
            Err(_) => fallback,
        };
        Self {
            kind: ApiErrorKind::Http,
            message,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Pull a human-readable message out of an error response body.
///
/// The backend nests messages under `error.message` for validation
/// failures and uses a flat `message` elsewhere; older deployments
/// return neither.
pub(crate) fn extract_api_message(data: &serde_json::Value, default: &str) -> String {
    let nested = data
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str());
    let flat = data.get("message").and_then(|v| v.as_str());

    nested
        .or(flat)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| m.to_string())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8066".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

/// List request parameters. Doubles as the single source of truth for
/// the filter state mirrored into the page URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    /// `Some(true)` = active only, `Some(false)` = inactive only.
    pub status: Option<bool>,
    pub city: String,
    pub country: String,
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            status: None,
            city: String::new(),
            country: String::new(),
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub(crate) fn new(per_page: u32) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    /// Rebuild from URL query parameters (already percent-decoded by
    /// the router). Unparseable pages clamp to 1.
    pub(crate) fn from_url_parts(
        page: Option<&str>,
        status: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        search: Option<&str>,
        per_page: u32,
    ) -> Self {
        Self {
            page: page
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|p| *p >= 1)
                .unwrap_or(1),
            per_page,
            status: match status {
                Some("active") => Some(true),
                Some("inactive") => Some(false),
                _ => None,
            },
            city: city.unwrap_or_default().trim().to_string(),
            country: country.unwrap_or_default().trim().to_string(),
            search: search.unwrap_or_default().trim().to_string(),
        }
    }

    pub(crate) fn status_str(&self) -> &'static str {
        match self.status {
            Some(true) => "active",
            Some(false) => "inactive",
            None => "",
        }
    }

    /// The query as the list endpoint will see it: filter text trimmed.
    /// `from_url_parts` output is already in this form.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            search: self.search.trim().to_string(),
            ..self.clone()
        }
    }

    fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.status.is_some() {
            pairs.push(("status", self.status_str().to_string()));
        }
        if !self.city.trim().is_empty() {
            pairs.push(("city", self.city.trim().to_string()));
        }
        if !self.country.trim().is_empty() {
            pairs.push(("country", self.country.trim().to_string()));
        }
        if !self.search.trim().is_empty() {
            pairs.push(("search", self.search.trim().to_string()));
        }
        pairs
    }

    /// Query string for the list endpoint. Always carries paging.
    pub(crate) fn to_api_query(&self) -> String {
        let mut parts = vec![
            format!("page={}", self.page),
            format!("per_page={}", self.per_page),
        ];
        for (k, v) in self.filter_pairs() {
            parts.push(format!("{}={}", k, urlencoding::encode(&v)));
        }
        format!("?{}", parts.join("&"))
    }

    /// Query string for the browser address bar. Defaults are omitted
    /// so a pristine list keeps a clean URL.
    pub(crate) fn to_url_query(&self) -> String {
        let mut parts: Vec<String> = self
            .filter_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(&v)))
            .collect();
        if self.page > 1 {
            parts.push(format!("page={}", self.page));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct BulkRequest {
    ids: Vec<i64>,
    action: BulkAction,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct EmailExistsRequest {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_id: Option<i64>,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    #[allow(dead_code)]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    /// The host shell performs login and leaves the bearer token in
    /// localStorage; this screen only ever reads it.
    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = storage::load_token_from_storage();
        Self { base_url, token }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get_auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<serde_json::Value> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);
        req = Self::with_auth_headers(req, self.get_auth_token());

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();

        if status.as_u16() == 401 {
            return Err(ApiError::unauthorized());
        }

        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::http(status, &text));
        }

        // Mutation endpoints may answer 204 / empty body.
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(ApiError::parse)
    }

    /// Accept both the canonical `{clients, meta}` envelope and a bare
    /// array (older deployments paginate client-side).
    pub(crate) fn parse_client_list_response(data: serde_json::Value) -> ClientList {
        if let Some(arr) = data.as_array() {
            let clients: Vec<Client> = arr
                .iter()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect();
            let meta = PageMeta {
                page: 1,
                per_page: clients.len().max(1) as u32,
                total: clients.len() as u64,
                total_pages: 1,
            };
            return ClientList { clients, meta };
        }
        serde_json::from_value(data).unwrap_or_default()
    }

    pub(crate) fn parse_client_response(data: serde_json::Value) -> ApiResult<Client> {
        let v = match data.get("client") {
            Some(inner) => inner.clone(),
            None => data,
        };
        serde_json::from_value(v).map_err(ApiError::parse)
    }

    pub async fn list_clients(&self, query: &ListQuery) -> ApiResult<ClientList> {
        let path = format!("/api/clients{}", query.to_api_query());
        let data = self.request(Method::GET, &path, None::<&()>).await?;
        Ok(Self::parse_client_list_response(data))
    }

    pub async fn get_client(&self, id: i64) -> ApiResult<Client> {
        let data = self
            .request(Method::GET, &format!("/api/clients/{id}"), None::<&()>)
            .await?;
        Self::parse_client_response(data)
    }

    pub async fn create_client(&self, payload: &ClientPayload) -> ApiResult<serde_json::Value> {
        self.request(Method::POST, "/api/clients", Some(payload))
            .await
    }

    pub async fn update_client(&self, id: i64, payload: &ClientPayload) -> ApiResult<Client> {
        let data = self
            .request(Method::PUT, &format!("/api/clients/{id}"), Some(payload))
            .await?;
        Self::parse_client_response(data)
    }

    pub async fn delete_client(&self, id: i64) -> ApiResult<()> {
        self.request(Method::DELETE, &format!("/api/clients/{id}"), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn bulk_update(&self, ids: &[i64], action: BulkAction) -> ApiResult<()> {
        self.request(
            Method::POST,
            "/api/clients/bulk",
            Some(&BulkRequest {
                ids: ids.to_vec(),
                action,
            }),
        )
        .await?;
        Ok(())
    }

    /// Duplicate-address lookup used as a pre-flight check on the form.
    /// `exclude_id` lets an edit keep its own address.
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> ApiResult<bool> {
        let data = self
            .request(
                Method::POST,
                "/api/clients/email-exists",
                Some(&EmailExistsRequest {
                    email: email.to_string(),
                    exclude_id,
                }),
            )
            .await?;
        Ok(data.get("exists").and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_api_message_prefers_nested_error_object() {
        let v = serde_json::json!({
            "error": {"message": "Email already exists"},
            "message": "outer"
        });
        assert_eq!(extract_api_message(&v, "fallback"), "Email already exists");
    }

    #[test]
    fn test_extract_api_message_falls_back_to_flat_message() {
        let v = serde_json::json!({"message": "Company name is required"});
        assert_eq!(
            extract_api_message(&v, "fallback"),
            "Company name is required"
        );
    }

    #[test]
    fn test_extract_api_message_uses_default_when_absent_or_blank() {
        assert_eq!(
            extract_api_message(&serde_json::json!({}), "fallback"),
            "fallback"
        );
        assert_eq!(
            extract_api_message(&serde_json::json!({"message": "   "}), "fallback"),
            "fallback"
        );
        assert_eq!(
            extract_api_message(&serde_json::json!({"error": "boom"}), "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_parse_client_list_envelope() {
        let data = serde_json::json!({
            "clients": [{"id": 1, "company_name": "Acme", "email": "a@acme.io"}],
            "meta": {"page": 2, "per_page": 10, "total": 11, "total_pages": 2}
        });
        let list = ApiClient::parse_client_list_response(data);
        assert_eq!(list.clients.len(), 1);
        assert_eq!(list.clients[0].company_name, "Acme");
        assert_eq!(list.meta.page, 2);
        assert_eq!(list.meta.total, 11);
    }

    #[test]
    fn test_parse_client_list_bare_array() {
        let data = serde_json::json!([
            {"id": 1, "company_name": "Acme"},
            {"id": 2, "company_name": "Globex"}
        ]);
        let list = ApiClient::parse_client_list_response(data);
        assert_eq!(list.clients.len(), 2);
        assert_eq!(list.meta.total, 2);
        assert_eq!(list.meta.total_pages, 1);
    }

    #[test]
    fn test_parse_client_response_accepts_wrapped_and_flat() {
        let wrapped = serde_json::json!({"client": {"id": 7, "company_name": "Acme"}});
        let flat = serde_json::json!({"id": 7, "company_name": "Acme"});
        assert_eq!(ApiClient::parse_client_response(wrapped).unwrap().id, 7);
        assert_eq!(ApiClient::parse_client_response(flat).unwrap().id, 7);
    }

    #[test]
    fn test_list_query_api_string_encodes_filters() {
        let q = ListQuery {
            page: 3,
            per_page: 25,
            status: Some(true),
            city: "San Juan".to_string(),
            country: String::new(),
            search: "acme & co".to_string(),
        };
        assert_eq!(
            q.to_api_query(),
            "?page=3&per_page=25&status=active&city=San%20Juan&search=acme%20%26%20co"
        );
    }

    #[test]
    fn test_list_query_url_string_omits_defaults() {
        assert_eq!(ListQuery::default().to_url_query(), "");

        let q = ListQuery {
            page: 2,
            status: Some(false),
            ..ListQuery::default()
        };
        assert_eq!(q.to_url_query(), "?status=inactive&page=2");
    }

    #[test]
    fn test_list_query_from_url_parts_clamps_bad_pages() {
        let q = ListQuery::from_url_parts(Some("0"), None, None, None, None, 10);
        assert_eq!(q.page, 1);
        let q = ListQuery::from_url_parts(Some("abc"), None, None, None, None, 10);
        assert_eq!(q.page, 1);
        let q = ListQuery::from_url_parts(Some("4"), Some("active"), None, None, Some("x"), 50);
        assert_eq!(q.page, 4);
        assert_eq!(q.status, Some(true));
        assert_eq!(q.search, "x");
        assert_eq!(q.per_page, 50);
    }

    #[test]
    fn test_list_query_normalized_matches_url_round_trip() {
        // A query with half-typed filters must compare equal to what its
        // own URL string parses back into, or the URL sync would fight
        // the user for the input box.
        let q = ListQuery {
            city: "New ".to_string(),
            search: " acme".to_string(),
            ..ListQuery::default()
        };
        let round_tripped =
            ListQuery::from_url_parts(None, None, Some("New"), None, Some("acme"), q.per_page);
        assert_ne!(q, round_tripped);
        assert_eq!(q.normalized(), round_tripped);
    }

    #[test]
    fn test_bulk_request_serializes_lowercase_action() {
        let v = serde_json::to_value(BulkRequest {
            ids: vec![1, 2],
            action: BulkAction::Deactivate,
        })
        .unwrap();
        assert_eq!(v["action"], "deactivate");
        assert_eq!(v["ids"][1], 2);
    }

    #[test]
    fn test_email_exists_request_skips_absent_exclude_id() {
        let v = serde_json::to_value(EmailExistsRequest {
            email: "a@b.co".to_string(),
            exclude_id: None,
        })
        .unwrap();
        assert!(v.get("exclude_id").is_none());

        let v = serde_json::to_value(EmailExistsRequest {
            email: "a@b.co".to_string(),
            exclude_id: Some(9),
        })
        .unwrap();
        assert_eq!(v["exclude_id"], 9);
    }

    #[test]
    fn test_api_client_new_has_no_token() {
        let client = ApiClient::new("http://localhost:8066".to_string());
        assert_eq!(client.base_url, "http://localhost:8066");
        assert!(!client.is_authenticated());
    }
}
