//! Masking of API keys in logs and error messages.

use url::Url;

/// Number of trailing key characters left visible
const VISIBLE_SUFFIX: usize = 4;

/// Mask an API key, keeping only its last few characters
///
/// ```
/// use comicvine_metadata::utils::mask_api_key;
///
/// assert_eq!(mask_api_key("abcdef123456"), "****3456");
/// assert_eq!(mask_api_key("abc"), "****");
/// ```
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= VISIBLE_SUFFIX {
        return "****".to_string();
    }

    let suffix: String = chars[chars.len() - VISIBLE_SUFFIX..].iter().collect();
    format!("****{}", suffix)
}

/// Render a request URL with its `api_key` query value masked
pub fn redact_url(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "api_key") {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "api_key" {
                (k.into_owned(), mask_api_key(&v))
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
