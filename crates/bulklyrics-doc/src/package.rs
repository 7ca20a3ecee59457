//! Static OPC parts and ZIP packaging for the generated `.docx`.
//!
//! The document is a plain ZIP of WordprocessingML parts; only
//! `word/document.xml` and the hyperlink relationships vary per run.

use crate::xml;
use crate::SaveError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Footer attribution line, present once per document.
pub const FOOTER_TEXT: &str = "Bulk Lyrics by MW Digital Development";

pub fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>
</Types>"#
}

pub fn root_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

/// Relationships for the main document part: styles, footer, and one
/// external relationship per "Try here" hyperlink (ids continue from rId3).
pub fn document_rels_xml(hyperlinks: &[String]) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
"#,
    );
    for (i, url) in hyperlinks.iter().enumerate() {
        rels.push_str(&format!(
            r#"  <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>
"#,
            i + 3,
            xml::escape(url),
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

/// Style definitions: Arial 12pt default, a heading style for song titles,
/// and the built-in Hyperlink character style (Word doesn't predefine it,
/// so documents with hyperlinks must carry their own).
pub fn styles_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:rFonts w:ascii="Arial" w:hAnsi="Arial"/>
        <w:sz w:val="24"/>
        <w:szCs w:val="24"/>
      </w:rPr>
    </w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:qFormat/>
    <w:pPr>
      <w:keepNext/>
      <w:spacing w:before="240" w:after="120"/>
      <w:outlineLvl w:val="0"/>
    </w:pPr>
    <w:rPr>
      <w:b/>
      <w:color w:val="2E74B5"/>
      <w:sz w:val="32"/>
      <w:szCs w:val="32"/>
    </w:rPr>
  </w:style>
  <w:style w:type="character" w:styleId="Hyperlink">
    <w:name w:val="Hyperlink"/>
    <w:rPr>
      <w:color w:val="0563C1"/>
      <w:u w:val="single"/>
    </w:rPr>
  </w:style>
</w:styles>"#
}

/// Centered attribution footer in muted gray, 10pt.
pub fn footer_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:p>
    <w:pPr><w:jc w:val="center"/></w:pPr>
    <w:r>
      <w:rPr>
        <w:rFonts w:ascii="Arial" w:hAnsi="Arial"/>
        <w:color w:val="787878"/>
        <w:sz w:val="20"/>
      </w:rPr>
      <w:t>{}</w:t>
    </w:r>
  </w:p>
</w:ftr>"#,
        xml::escape(FOOTER_TEXT)
    )
}

/// Write all parts into a `.docx` ZIP at `path`.
pub fn write_package(
    path: &Path,
    document_xml: &str,
    document_rels: &str,
) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }
    }

    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut zip = ZipWriter::new(file);
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: [(&str, &str); 6] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", root_rels_xml()),
        ("word/document.xml", document_xml),
        ("word/_rels/document.xml.rels", document_rels),
        ("word/styles.xml", styles_xml()),
        ("word/footer1.xml", &footer_xml()),
    ];

    for (name, contents) in parts {
        zip.start_file(name, opt).map_err(|e| zip_error(path, e))?;
        zip.write_all(contents.as_bytes())
            .map_err(|e| io_error(path, e))?;
    }

    zip.finish().map_err(|e| zip_error(path, e))?;
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> SaveError {
    if source.kind() == std::io::ErrorKind::PermissionDenied {
        SaveError::AccessDenied {
            path: path.display().to_string(),
        }
    } else {
        SaveError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

fn zip_error(path: &Path, source: zip::result::ZipError) -> SaveError {
    SaveError::Package {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_rels_hyperlink_ids_follow_static_parts() {
        let rels = document_rels_xml(&[
            "https://example.com/a".to_string(),
            "https://example.com/b?x=1&y=2".to_string(),
        ]);
        assert!(rels.contains(r#"Id="rId3" "#));
        assert!(rels.contains(r#"Id="rId4" "#));
        assert!(rels.contains(r#"Target="https://example.com/b?x=1&amp;y=2""#));
        assert!(rels.contains(r#"TargetMode="External""#));
    }

    #[test]
    fn test_footer_carries_attribution_once() {
        let footer = footer_xml();
        assert_eq!(footer.matches(FOOTER_TEXT).count(), 1);
        assert!(footer.contains(r#"<w:jc w:val="center"/>"#));
        assert!(footer.contains(r#"<w:color w:val="787878"/>"#));
    }
}
