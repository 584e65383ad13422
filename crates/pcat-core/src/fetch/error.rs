//! Manifest fetch errors and their classification for logs.

/// Error returned by a single manifest retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body is not a JSON array of complete plugin records.
    #[error("malformed manifest: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The blocking transfer task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Coarse failure class; every kind is handled the same way by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or total timeout elapsed.
    Timeout,
    /// Network-level failure (DNS, refused, reset).
    Connection,
    /// Server answered with a non-success status.
    HttpStatus(u32),
    /// Payload did not parse.
    Malformed,
    Other,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection",
            ErrorKind::HttpStatus(_) => "http_status",
            ErrorKind::Malformed => "malformed",
            ErrorKind::Other => "other",
        }
    }
}

fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => ErrorKind::HttpStatus(*code),
        FetchError::Malformed(_) => ErrorKind::Malformed,
        FetchError::Join(_) => ErrorKind::Other,
    }
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        classify(self)
    }
}
