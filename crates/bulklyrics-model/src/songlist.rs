use unicode_normalization::UnicodeNormalization;

/// Parse raw user input (clipboard, file, or stdin) into song queries.
///
/// One query per line. Each line is NFC-normalized, stripped of wrapping
/// quote characters, and has internal whitespace runs collapsed to single
/// spaces. Blank and whitespace-only lines are dropped. Order is preserved
/// and determines document order.
pub fn parse_songlist(input: &str) -> Vec<String> {
    input
        .lines()
        .map(clean_query)
        .filter(|q| !q.is_empty())
        .collect()
}

/// Normalize a single query line.
pub fn clean_query(line: &str) -> String {
    let nfc: String = line.nfc().collect();
    let trimmed = strip_wrapping_quotes(nfc.trim());
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_wrapping_quotes(s: &str) -> &str {
    let quotes: &[char] = &['"', '\'', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];
    s.trim_matches(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_dropped_order_kept() {
        let input = "mardy bum arctic monkeys\n\n   \neverlong foo fighters\nbohemian rhapsody\n";
        let songs = parse_songlist(input);
        assert_eq!(
            songs,
            vec![
                "mardy bum arctic monkeys",
                "everlong foo fighters",
                "bohemian rhapsody"
            ]
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(clean_query("  everlong \t  foo fighters  "), "everlong foo fighters");
    }

    #[test]
    fn test_wrapping_quotes_stripped() {
        assert_eq!(clean_query("\"mardy bum\""), "mardy bum");
        assert_eq!(clean_query("\u{201c}everlong\u{201d}"), "everlong");
    }

    #[test]
    fn test_nfc_normalization() {
        // e + combining acute accent -> é (precomposed)
        assert_eq!(clean_query("beyonce\u{0301}"), "beyoncé");
    }

    #[test]
    fn test_crlf_input() {
        let songs = parse_songlist("song one\r\nsong two\r\n");
        assert_eq!(songs, vec!["song one", "song two"]);
    }
}
