use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage model of a rack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RackType {
    /// Schema-less document rack.
    #[default]
    Nosql,
    /// Schema-bearing rack, also reachable through the SQL endpoint.
    Sql,
}

/// Response returned by `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests. When present, [`login`]
    /// stores it on the client automatically.
    ///
    /// [`login`]: crate::Client::login
    #[serde(default)]
    pub token: Option<String>,
    /// Account record as the server reports it.
    #[serde(default)]
    pub user: Option<Value>,
}
