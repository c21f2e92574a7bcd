use std::error::Error as StdError;
use std::fmt;

pub const RATE_LIMIT_STATUS: u16 = 429;

/// Failure outcome of a single completion request.
#[derive(Debug)]
pub enum RequestError {
    /// The provider answered with a non-success status.
    Status {
        status: u16,
        /// Raw response body, kept for diagnostics and credential heuristics.
        body: String,
    },

    /// No usable response arrived (connection, TLS, or body read failure).
    Transport(reqwest::Error),

    /// A success response whose body was not valid completion JSON.
    Decode(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport(_) | RequestError::Decode(_) => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(RATE_LIMIT_STATUS)
    }

    /// Heuristic: the failure looks like a missing or rejected credential.
    pub fn mentions_credential(&self) -> bool {
        if self.status() == Some(401) {
            return true;
        }
        let text = self.to_string().to_ascii_lowercase();
        ["api key", "api_key", "apikey", "no auth credentials"]
            .iter()
            .any(|needle| text.contains(needle))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "HTTP error! status: {status}")
                } else {
                    write!(f, "HTTP error! status: {status}: {body}")
                }
            }
            RequestError::Transport(err) => write!(f, "request failed: {err}"),
            RequestError::Decode(message) => write!(f, "invalid response body: {message}"),
        }
    }
}

impl StdError for RequestError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            RequestError::Transport(err) => Some(err),
            RequestError::Status { .. } | RequestError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Transport(err)
    }
}
