//! Endpoint URL assembly.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use chatbot_ai::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use chatbot_ai::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.test/v1beta/", "/models/m:generateContent"),
///     "https://example.test/v1beta/models/m:generateContent"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_drops_all_trailing_slashes() {
        assert_eq!(
            normalize_base_url("https://example.test/v1beta"),
            "https://example.test/v1beta"
        );
        assert_eq!(
            normalize_base_url("https://example.test/v1beta///"),
            "https://example.test/v1beta"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_api_url_keeps_model_path_intact() {
        assert_eq!(
            construct_api_url(
                "https://generativelanguage.googleapis.com/v1beta",
                "models/gemini-2.0-flash:generateContent"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            construct_api_url("http://127.0.0.1:1234/", "///models/x:generateContent"),
            "http://127.0.0.1:1234/models/x:generateContent"
        );
    }
}
