use thiserror::Error;

/// Failure of a single weather fetch.
///
/// All variants are recoverable: the controller turns them into panel text
/// (center stream) or cache invalidation (nationwide stream).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connectivity problem: DNS, refused connection, timeout.
    #[error("network error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The body could not be understood.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Http { .. } => "http",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("region catalog is empty")]
    Empty,

    #[error("duplicate region id {0}")]
    DuplicateId(u8),

    #[error("region {id} has out-of-range coordinates ({lat}, {lon})")]
    OutOfRange { id: u8, lat: String, lon: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_status() {
        let err = FetchError::Http { status: 500 };
        assert_eq!(err.to_string(), "HTTP 500");
        assert_eq!(err.kind(), "http");
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: FetchError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().starts_with("malformed response"));
    }
}
