use std::time::Duration;

/// Per-client options, all defaulted when absent.
///
/// The client makes exactly one HTTP attempt per call. There is no retry
/// layer; callers that want one wrap their own policy around the client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Skip TLS certificate verification. Intended for servers running
    /// with self-signed certificates; leave off everywhere else.
    pub ignore_ssl: bool,
    /// Total per-request timeout, covering connect, send, and the full
    /// response body.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            ignore_ssl: false,
            timeout: Duration::from_secs(30),
        }
    }
}
