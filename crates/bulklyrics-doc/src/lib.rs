use bulklyrics_model::SongData;
use std::path::Path;
use thiserror::Error;

pub mod package;
pub mod xml;

/// Paragraph shown when a song's lyrics were not found, rendered in red.
const NOT_FOUND_TEXT: &str = "Lyrics Not Found";

const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;
const LINE_BREAK: &str = "<w:br/>";

#[derive(Debug, Error)]
pub enum SaveError {
    /// The target can't be written, typically because the document is open
    /// in a word processor. The caller may retry after the user closes it.
    #[error("access denied writing {path} — close the document if it's open and try again")]
    AccessDenied { path: String },

    #[error("failed to write {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to package {path}")]
    Package {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Accumulates song sections into one WordprocessingML document.
///
/// Sections are appended in input order with an explicit page break between
/// (never after) them. Global formatting — 1.27 cm margins, Arial 12 pt
/// default, the attribution footer — lives in the static parts and applies
/// to the whole document no matter how many songs are appended.
#[derive(Debug, Default)]
pub struct LyricsDocument {
    body: String,
    sections: usize,
    hyperlinks: Vec<String>,
}

impl LyricsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one song's section.
    ///
    /// Title (and artist, when present) are rendered in title case here —
    /// the only place casing is applied. Lyrics become one paragraph per
    /// block with a line break between consecutive lines; a song without
    /// lyrics gets the red not-found paragraph and, if available, a
    /// clickable fallback link.
    pub fn append_song(&mut self, song: &SongData) {
        if self.sections > 0 {
            self.body.push_str(PAGE_BREAK);
        }
        self.sections += 1;

        self.push_heading(&title_case(&song.title));

        if let Some(artist) = &song.artist {
            self.push_bold_paragraph(&title_case(artist));
        }

        match &song.lyrics {
            Some(blocks) => {
                for block in blocks {
                    self.push_lyric_block(&block.lines);
                }
            }
            None => {
                self.push_red_paragraph(NOT_FOUND_TEXT);
                if let Some(url) = &song.link {
                    self.push_link_paragraph("Try here: ", url.clone());
                }
            }
        }
    }

    /// Number of song sections appended so far.
    pub fn section_count(&self) -> usize {
        self.sections
    }

    /// Number of page breaks in the body (always sections − 1).
    pub fn page_break_count(&self) -> usize {
        self.body.matches(PAGE_BREAK).count()
    }

    /// The complete `word/document.xml` part, body plus section properties.
    pub fn document_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
 xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    {body}
    <w:sectPr>
      <w:footerReference w:type="default" r:id="rId2"/>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="720" w:right="720" w:bottom="720" w:left="720" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
            body = self.body
        )
    }

    /// Package the document as a `.docx` file at `path`.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let rels = package::document_rels_xml(&self.hyperlinks);
        package::write_package(path, &self.document_xml(), &rels)?;
        tracing::info!(
            path = %path.display(),
            sections = self.sections,
            "Wrote document"
        );
        Ok(())
    }

    fn push_heading(&mut self, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            xml::escape(text)
        ));
    }

    fn push_bold_paragraph(&mut self, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            xml::escape(text)
        ));
    }

    fn push_red_paragraph(&mut self, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:rPr><w:color w:val="FF0000"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            xml::escape(text)
        ));
    }

    /// One paragraph per block; `<w:br/>` between consecutive lines but not
    /// after the last one.
    fn push_lyric_block(&mut self, lines: &[String]) {
        self.body.push_str("<w:p>");
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.body.push_str(&format!("<w:r>{LINE_BREAK}</w:r>"));
            }
            self.body.push_str(&format!(
                r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#,
                xml::escape(line)
            ));
        }
        self.body.push_str("</w:p>");
    }

    fn push_link_paragraph(&mut self, lead: &str, url: String) {
        // Hyperlink relationship ids continue after the two static parts.
        let r_id = format!("rId{}", 3 + self.hyperlinks.len());
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{lead}</w:t></w:r><w:hyperlink r:id="{r_id}"><w:r><w:rPr><w:rStyle w:val="Hyperlink"/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r></w:hyperlink></w:p>"#,
            lead = xml::escape(lead),
            r_id = r_id,
            text = xml::escape(&url),
        ));
        self.hyperlinks.push(url);
    }
}

/// Capitalize the first letter of each whitespace-separated word, lowering
/// the rest. Applied only when rendering into the document.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
