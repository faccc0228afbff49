use serde::Deserialize;

use crate::auth::AuthService;
use crate::backend::ApiClient;
use crate::theme::ThemePreference;
use crate::view::ListQuery;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub api: ApiClient,
    pub auth: AuthService,
    pub theme: ThemePreference,
    /// Filter/sort parameters of the list view, kept between requests.
    pub list_query: ListQuery,
    pub latency_ms: u64,
}
