use bulklyrics_model::{LyricBlock, SongData, UNKNOWN_ARTIST};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// Structural markers in Google's search-results markup. These are an
// unversioned external contract: Google can (and eventually will) change
// them, at which point extraction degrades to "lyrics not found" for
// every song rather than crashing.
const LYRICS_CONTAINER: &str = r#"div[jsname="U8S5sf"]"#;
const LYRIC_LINE: &str = r#"span[jsname="YS01Ge"]"#;
const PAGE_TITLE: &str = r#"div[data-attrid="title"]"#;
const PAGE_SUBTITLE: &str = r#"div[data-attrid="subtitle"]"#;
const ORGANIC_RESULT: &str = r#"a[jsname="UWckNb"]"#;

/// Extract a [`SongData`] record from one search-results page.
///
/// If no lyrics container is present the user's query stands in for the
/// title and only the fallback link (first organic result, if any) is
/// carried. A missing element never propagates as an error: every lookup
/// degrades to the corresponding field being absent.
///
/// No title-casing happens here; title and artist are stored as found.
pub fn extract(query: &str, html: &str) -> SongData {
    let document = Html::parse_document(html);

    let container_sel = Selector::parse(LYRICS_CONTAINER).expect("valid selector");
    let containers: Vec<ElementRef> = document.select(&container_sel).collect();

    let link = first_organic_link(&document);

    if containers.is_empty() {
        tracing::debug!(query = %query, "No lyrics container on page");
        return SongData::not_found(query, link);
    }

    let title = page_text(&document, PAGE_TITLE).unwrap_or_else(|| query.to_string());
    let artist = clean_artist(&page_text(&document, PAGE_SUBTITLE).unwrap_or_default());

    let line_sel = Selector::parse(LYRIC_LINE).expect("valid selector");
    let blocks: Vec<LyricBlock> = containers
        .iter()
        .map(|container| {
            let lines = container
                .select(&line_sel)
                .map(|line| line.text().collect::<String>())
                .collect();
            LyricBlock::new(lines)
        })
        .collect();

    tracing::debug!(query = %query, blocks = blocks.len(), "Extracted lyrics");

    SongData {
        title,
        artist: Some(artist),
        lyrics: Some(blocks),
        link,
    }
}

/// Strip the "Song by " lead-in from the raw subtitle text.
///
/// Google renders the subtitle as "Song by <Artist>". The second uppercase
/// letter is assumed to start the artist's name; everything before it is
/// dropped. Known-lossy heuristic: it misfires for artists styled in
/// lowercase, single-word subtitles, and non-Latin scripts, and is kept
/// as-is for compatibility with the pages it was tuned against.
///
/// When the subtitle has no two-uppercase-letter prefix the sentinel
/// [`UNKNOWN_ARTIST`] is returned instead of an error.
pub fn clean_artist(raw: &str) -> String {
    let re = Regex::new(r"^([^A-Z]*[A-Z]){2}").expect("valid regex");
    match re.find(raw) {
        // The last matched character is an ASCII uppercase letter, so one
        // byte before the match end is a char boundary.
        Some(m) => raw[m.end() - 1..].to_string(),
        None => UNKNOWN_ARTIST.to_string(),
    }
}

fn first_organic_link(document: &Html) -> Option<String> {
    let sel = Selector::parse(ORGANIC_RESULT).expect("valid selector");
    document
        .select(&sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}

fn page_text(document: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).expect("valid selector");
    document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>())
}
