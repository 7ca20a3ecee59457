const SEARCH_BASE: &str = "https://www.google.com/search?q=";

/// Build the search URL for a song query.
///
/// The literal suffix " lyrics" is appended to the query before encoding.
/// Spaces become `+` (form-style query encoding); everything else outside
/// the URL-safe set is percent-encoded.
pub fn search_url(query: &str) -> String {
    let encoded = urlencoding::encode(query).replace("%20", "+");
    format!("{SEARCH_BASE}{encoded}+lyrics")
}
