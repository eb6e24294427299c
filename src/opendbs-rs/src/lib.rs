//! OpenDBS Client Library
//!
//! HTTP client for connecting to OpenDBS REST API servers.
//!
//! # Example
//!
//! ```no_run
//! use opendbs_rs::{Client, RackType};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> opendbs_rs::Result<()> {
//!     let mut client = Client::new("http://localhost:4402")?;
//!     client.login("admin", "admin123").await?;
//!
//!     client.create_database("demo").await?;
//!     client.create_rack("demo", "users", RackType::Nosql, None).await?;
//!     client
//!         .insert("demo", "users", &json!({"name": "Jane", "role": "admin"}))
//!         .await?;
//!
//!     let users = client.find("demo", "users", &[], false).await?;
//!     println!("found {} users", users.len());
//!     Ok(())
//! }
//! ```

mod client;
mod options;
mod types;

pub use client::Client;
pub use options::ClientOptions;
pub use types::{LoginResponse, RackType};

/// Re-exported so [`Client::request`] can be called without depending on
/// reqwest directly.
pub use reqwest::Method;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    /// HTTP status code of the failing response, when one was received.
    /// Transport failures never reach the server, so they carry none.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the transport could not connect at all (connection
    /// refused, unreachable host). Useful for "is the server running?"
    /// hints.
    pub fn is_connect(&self) -> bool {
        matches!(self, ClientError::Request(e) if e.is_connect())
    }

    /// True when the request timed out before a response arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Request(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
