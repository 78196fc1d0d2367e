use opmap_core::HttpMethod;

const MAX_ERROR_BODY_BYTES: usize = 4096;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("HTTP {status} from {method} {url}: {body}")]
    Status {
        status: u16,
        method: HttpMethod,
        url: String,
        body: String,
    },
    #[error("expected HTTP {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
    #[error("http error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn status_error(status: u16, method: HttpMethod, url: impl Into<String>, body: &str) -> Self {
        Self::Status {
            status,
            method,
            url: url.into(),
            body: truncate(body, MAX_ERROR_BODY_BYTES),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }

    /// Network trouble, timeouts, 408, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout | TransportError::Network(_) => true,
            TransportError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
