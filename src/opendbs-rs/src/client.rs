use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::types::{LoginResponse, RackType};
use crate::{ClientError, ClientOptions, Result};

/// Number of matches the vector search endpoint returns by default.
const DEFAULT_VECTOR_K: usize = 5;

/// OpenDBS REST API client.
///
/// Holds the server base URL, the active bearer token, and a configured
/// transport. Every method issues exactly one HTTP request; failures are
/// surfaced as [`ClientError`], never retried.
pub struct Client {
    base_url: String,
    token: Option<String>,
    client: HttpClient,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateDatabaseRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateRackRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    rack_type: RackType,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Value>,
}

#[derive(Serialize)]
struct SqlRequest<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct FuzzySearchRequest<'a> {
    field: &'a str,
    query: &'a str,
}

#[derive(Serialize)]
struct VectorSearchRequest<'a> {
    field: &'a str,
    vector: &'a [f32],
    k: usize,
}

impl Client {
    /// Create a new client with no token and default options.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, None, ClientOptions::default())
    }

    /// Create a client with an initial bearer token and explicit options.
    pub fn with_options(
        base_url: impl Into<String>,
        token: Option<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder()
            .default_headers(headers)
            .timeout(options.timeout);
        if options.ignore_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: builder.build()?,
        })
    }

    /// Replace the bearer token used by all subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// The active bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Issue a request against an API endpoint and parse the JSON reply.
    ///
    /// `endpoint` is appended to the base URL and should start with `/`.
    /// `body` is sent as the JSON payload when given and non-empty; `query`
    /// pairs are URL-encoded when given and non-empty. A 2xx response
    /// parses into a [`Value`] (empty bodies parse as `Value::Null`); a
    /// non-2xx response becomes [`ClientError::Server`] carrying the
    /// server's `error` message when the body held one.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            if !is_empty_payload(body) {
                request = request.json(body);
            }
        }
        if let Some(query) = query {
            if !query.is_empty() {
                request = request.query(query);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = server_error(status, &text);
            tracing::debug!(status = status.as_u16(), %url, "request failed: {err}");
            return Err(err);
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    // Authentication

    /// Authenticate with username and password. When the response carries
    /// a token, it is stored and used by all subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::to_value(LoginRequest { username, password })?;
        let response = self
            .request(Method::POST, "/api/auth/login", Some(&body), None)
            .await?;
        let login: LoginResponse = serde_json::from_value(response)?;
        if let Some(token) = &login.token {
            self.token = Some(token.clone());
        }
        Ok(login)
    }

    /// Register a new user account. `user_data` is passed through as the
    /// request body.
    pub async fn register(&self, user_data: &Value) -> Result<Value> {
        self.request(Method::POST, "/api/auth/register", Some(user_data), None)
            .await
    }

    // Database management

    /// Create a database.
    pub async fn create_database(&self, name: &str) -> Result<Value> {
        let body = serde_json::to_value(CreateDatabaseRequest { name })?;
        self.request(Method::POST, "/api/databases", Some(&body), None)
            .await
    }

    /// List databases, optionally with their racks embedded. Returns the
    /// `databases` field, defaulting to an empty list.
    pub async fn list_databases(&self, include_racks: bool) -> Result<Vec<Value>> {
        let include = if include_racks { "true" } else { "false" };
        let query = [("include_racks", include)];
        let response = self
            .request(Method::GET, "/api/databases", None, Some(&query))
            .await?;
        Ok(take_list(response, "databases"))
    }

    /// Delete a database and everything in it.
    pub async fn delete_database(&self, name: &str) -> Result<Value> {
        self.request(Method::DELETE, &format!("/api/databases/{name}"), None, None)
            .await
    }

    // Rack management

    /// Create a rack. The `schema` key is sent only when one is given
    /// (SQL racks); NoSQL racks omit it entirely.
    pub async fn create_rack(
        &self,
        database: &str,
        name: &str,
        rack_type: RackType,
        schema: Option<&Value>,
    ) -> Result<Value> {
        let body = serde_json::to_value(CreateRackRequest {
            name,
            rack_type,
            schema,
        })?;
        self.request(
            Method::POST,
            &format!("/api/databases/{database}/racks"),
            Some(&body),
            None,
        )
        .await
    }

    /// List racks in a database. Returns the `racks` field, defaulting to
    /// an empty list.
    pub async fn list_racks(&self, database: &str) -> Result<Vec<Value>> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/databases/{database}/racks"),
                None,
                None,
            )
            .await?;
        Ok(take_list(response, "racks"))
    }

    /// Delete a rack.
    pub async fn delete_rack(&self, database: &str, rack: &str) -> Result<Value> {
        self.request(
            Method::DELETE,
            &format!("/api/databases/{database}/racks/{rack}"),
            None,
            None,
        )
        .await
    }

    // Documents

    /// Insert a document into a rack. The document's fields form the
    /// request body.
    pub async fn insert(&self, database: &str, rack: &str, document: &Value) -> Result<Value> {
        self.request(
            Method::POST,
            &format!("/api/databases/{database}/racks/{rack}/documents"),
            Some(document),
            None,
        )
        .await
    }

    /// Find documents matching `filters` (field/value pairs, equality).
    /// `populate` asks the server to resolve references. Returns the
    /// `results` field, defaulting to an empty list.
    pub async fn find(
        &self,
        database: &str,
        rack: &str,
        filters: &[(&str, &str)],
        populate: bool,
    ) -> Result<Vec<Value>> {
        let mut query: Vec<(&str, &str)> = filters.to_vec();
        if populate {
            query.push(("populate", "true"));
        }
        let response = self
            .request(
                Method::GET,
                &format!("/api/databases/{database}/racks/{rack}/documents"),
                None,
                Some(&query),
            )
            .await?;
        Ok(take_list(response, "results"))
    }

    /// Fetch a single document by id. Returns `None` when nothing matches.
    pub async fn find_one(
        &self,
        database: &str,
        rack: &str,
        id: &str,
        populate: bool,
    ) -> Result<Option<Value>> {
        let mut query = vec![("id", id)];
        if populate {
            query.push(("populate", "true"));
        }
        let response = self
            .request(
                Method::GET,
                &format!("/api/databases/{database}/racks/{rack}/documents"),
                None,
                Some(&query),
            )
            .await?;
        Ok(take_list(response, "results").into_iter().next())
    }

    /// Update a document's fields.
    pub async fn update(
        &self,
        database: &str,
        rack: &str,
        id: &str,
        updates: &Value,
    ) -> Result<Value> {
        self.request(
            Method::PUT,
            &format!("/api/databases/{database}/racks/{rack}/documents/{id}"),
            Some(updates),
            None,
        )
        .await
    }

    /// Delete a document by id.
    pub async fn delete(&self, database: &str, rack: &str, id: &str) -> Result<Value> {
        self.request(
            Method::DELETE,
            &format!("/api/databases/{database}/racks/{rack}/documents/{id}"),
            None,
            None,
        )
        .await
    }

    // SQL

    /// Execute a SQL statement. Returns the `results` field when the
    /// server provides one, otherwise the full response body.
    pub async fn sql(&self, database: &str, query: &str) -> Result<Value> {
        let body = serde_json::to_value(SqlRequest { query })?;
        let mut response = self
            .request(
                Method::POST,
                &format!("/api/sql/{database}/execute"),
                Some(&body),
                None,
            )
            .await?;
        match response.get_mut("results") {
            Some(results) if !results.is_null() => Ok(results.take()),
            _ => Ok(response),
        }
    }

    // Search

    /// Run a structured search. `query_body` is passed through verbatim.
    /// Returns the `results` field, defaulting to an empty list.
    pub async fn search(
        &self,
        database: &str,
        rack: &str,
        query_body: &Value,
    ) -> Result<Vec<Value>> {
        let response = self
            .request(
                Method::POST,
                &format!("/api/databases/{database}/racks/{rack}/search"),
                Some(query_body),
                None,
            )
            .await?;
        Ok(take_list(response, "results"))
    }

    /// Fuzzy-match `query` against a document field. Returns the
    /// `results` field, defaulting to an empty list.
    pub async fn fuzzy_search(
        &self,
        database: &str,
        rack: &str,
        field: &str,
        query: &str,
    ) -> Result<Vec<Value>> {
        let body = serde_json::to_value(FuzzySearchRequest { field, query })?;
        let response = self
            .request(
                Method::POST,
                &format!("/api/databases/{database}/racks/{rack}/search/fuzzy"),
                Some(&body),
                None,
            )
            .await?;
        Ok(take_list(response, "results"))
    }

    /// Nearest-neighbor search over an embedding field, returning the
    /// server default of five matches.
    pub async fn vector_search(
        &self,
        database: &str,
        rack: &str,
        field: &str,
        vector: &[f32],
    ) -> Result<Vec<Value>> {
        self.vector_search_with_k(database, rack, field, vector, DEFAULT_VECTOR_K)
            .await
    }

    /// Nearest-neighbor search returning the top `k` matches.
    pub async fn vector_search_with_k(
        &self,
        database: &str,
        rack: &str,
        field: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<Value>> {
        let body = serde_json::to_value(VectorSearchRequest { field, vector, k })?;
        let response = self
            .request(
                Method::POST,
                &format!("/api/databases/{database}/racks/{rack}/search/vector"),
                Some(&body),
                None,
            )
            .await?;
        Ok(take_list(response, "results"))
    }

    // Backup

    /// Trigger a full server backup.
    pub async fn create_backup(&self) -> Result<Value> {
        self.request(Method::POST, "/api/backup/create", None, None)
            .await
    }

    /// List server backups. Returns the `backups` field, defaulting to an
    /// empty list.
    pub async fn list_backups(&self) -> Result<Vec<Value>> {
        let response = self
            .request(Method::GET, "/api/backup/list", None, None)
            .await?;
        Ok(take_list(response, "backups"))
    }

    /// URL of the quick-backup archive for one rack. No request is made;
    /// the endpoint streams a binary archive, so the download is left to
    /// the caller or to [`Client::download_quick_backup`].
    pub fn quick_backup_rack_url(&self, database: &str, rack: &str) -> String {
        format!(
            "{}/api/backup/quick?database={database}&rack={rack}",
            self.base_url
        )
    }

    /// Download the quick-backup archive for one rack, using the client's
    /// auth and TLS settings. Returns the raw archive bytes.
    pub async fn download_quick_backup(&self, database: &str, rack: &str) -> Result<Vec<u8>> {
        let url = self.quick_backup_rack_url(database, rack);
        tracing::debug!(%url, "downloading quick backup");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(server_error(status, &text));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Pull an array field out of a response envelope. Missing keys and
/// non-array values (the server's `null` included) become an empty list.
fn take_list(mut response: Value, key: &str) -> Vec<Value> {
    match response.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Empty objects and arrays count as no payload at all and are never sent.
fn is_empty_payload(body: &Value) -> bool {
    match body {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Translate a non-2xx response into [`ClientError::Server`], preferring
/// the server's `{"error": …}` envelope over a generic status message.
fn server_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("server returned {status}"));
    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}
