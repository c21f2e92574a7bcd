//! Endpoint URL helpers.

/// Join `endpoint` onto `base_url` without doubling or dropping slashes.
///
/// ```
/// use chatroute::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://openrouter.ai/api/v1/", "/chat/completions"),
///     "https://openrouter.ai/api/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// True for absolute `http://` or `https://` URLs with a non-empty host part.
pub fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(rest) if !rest.is_empty() && !rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        for base in ["https://openrouter.ai/api/v1", "https://openrouter.ai/api/v1///"] {
            for endpoint in ["chat/completions", "/chat/completions"] {
                assert_eq!(
                    construct_api_url(base, endpoint),
                    "https://openrouter.ai/api/v1/chat/completions"
                );
            }
        }
    }

    #[test]
    fn recognizes_http_urls() {
        assert!(is_http_url("https://openrouter.ai/api/v1"));
        assert!(is_http_url("http://127.0.0.1:8080"));
        assert!(!is_http_url("openrouter.ai/api/v1"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("ftp://example.org"));
    }
}
