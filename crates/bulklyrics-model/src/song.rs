use serde::{Deserialize, Serialize};

/// The sentinel artist used when the subtitle can't be cleaned.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Everything extracted from one song's search-results page.
///
/// One record is produced per non-blank input line, in input order,
/// whether or not the lyrics were actually found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongData {
    /// Parsed page title when lyrics were found, otherwise the user's
    /// query verbatim. Title-casing is applied at render time, not here.
    pub title: String,
    /// Cleaned subtitle text. `None` when lyrics were not found;
    /// the [`UNKNOWN_ARTIST`] sentinel when cleaning failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// One entry per lyrics container on the page, in document order.
    /// `None` when no container was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<Vec<LyricBlock>>,
    /// First organic search-result URL, used only as a fallback when
    /// `lyrics` is `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One contiguous lyrics container (e.g. a verse): an ordered run of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricBlock {
    pub lines: Vec<String>,
}

impl SongData {
    /// Build the "lyrics not found" record for a query: the query stands in
    /// for the title and only the optional fallback link is carried.
    pub fn not_found(query: &str, link: Option<String>) -> Self {
        Self {
            title: query.to_string(),
            artist: None,
            lyrics: None,
            link,
        }
    }

    /// Whether any lyrics container was found for this song.
    pub fn found(&self) -> bool {
        self.lyrics.is_some()
    }
}

impl LyricBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_query_verbatim() {
        let data = SongData::not_found("mardy bum arctic monkeys", None);
        assert_eq!(data.title, "mardy bum arctic monkeys");
        assert!(data.artist.is_none());
        assert!(!data.found());
    }

    #[test]
    fn test_json_skips_absent_fields() {
        let data = SongData::not_found("everlong", None);
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"title":"everlong"}"#);
    }

    #[test]
    fn test_json_roundtrip() {
        let data = SongData {
            title: "Bohemian Rhapsody".to_string(),
            artist: Some("Queen".to_string()),
            lyrics: Some(vec![LyricBlock::new(vec![
                "Is this the real life?".to_string(),
                "Is this just fantasy?".to_string(),
            ])]),
            link: None,
        };
        let json = serde_json::to_string_pretty(&data).unwrap();
        let parsed: SongData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, "Bohemian Rhapsody");
        assert_eq!(parsed.lyrics.unwrap()[0].lines.len(), 2);
    }
}
