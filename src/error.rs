use thiserror::Error;

/// Reasons a geocode or autocomplete lookup produced nothing usable.
///
/// None of these are fatal: the caller logs them and keeps whatever it was
/// displaying before.
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("no results found for [{query}]")]
    ZeroResults { query: String },

    #[error("provider rejected the request with status {status}{}", detail(.message))]
    Rejected {
        status: String,
        message: Option<String>,
    },

    #[error("request to the provider failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// The request URL carries the API key, so it is dropped before the error goes anywhere.
impl From<reqwest::Error> for LookupFailure {
    fn from(err: reqwest::Error) -> Self {
        LookupFailure::Transport(err.without_url())
    }
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl LookupFailure {
    /// Whether trying the same request again might succeed.
    ///
    /// Connect failures, timeouts and 5xx answers may clear up; a 4xx or an
    /// undecodable body will not.
    pub fn is_transient(&self) -> bool {
        match self {
            LookupFailure::Transport(e) => {
                e.is_connect() || e.is_timeout() || e.status().is_some_and(|s| s.is_server_error())
            }
            LookupFailure::Rejected { status, .. } => status == "UNKNOWN_ERROR",
            LookupFailure::ZeroResults { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_appended_when_present() {
        let err = LookupFailure::Rejected {
            status: "REQUEST_DENIED".to_string(),
            message: Some("The provided API key is invalid.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "provider rejected the request with status REQUEST_DENIED: The provided API key is invalid."
        );

        let err = LookupFailure::Rejected {
            status: "OVER_QUERY_LIMIT".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "provider rejected the request with status OVER_QUERY_LIMIT");
    }

    #[test]
    fn only_unknown_error_is_retried_among_rejections() {
        let retryable = LookupFailure::Rejected { status: "UNKNOWN_ERROR".into(), message: None };
        let quota = LookupFailure::Rejected { status: "OVER_QUERY_LIMIT".into(), message: None };
        let empty = LookupFailure::ZeroResults { query: "nowhere".into() };
        assert!(retryable.is_transient());
        assert!(!quota.is_transient());
        assert!(!empty.is_transient());
    }
}
