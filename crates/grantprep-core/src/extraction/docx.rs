//! DOCX text extraction: body paragraphs of `word/document.xml`, one per line.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::trace;
use zip::ZipArchive;

use super::{Result, TextExtractor};
use crate::error::ExtractionError;

/// Main document part inside the DOCX container.
const DOCUMENT_PART: &str = "word/document.xml";

/// DOCX text extractor.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(&self, data: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| ExtractionError::DocxArchive(e.to_string()))?;

        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ExtractionError::DocxArchive(format!("{}: {}", DOCUMENT_PART, e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| ExtractionError::DocxArchive(e.to_string()))?;
        Ok(xml)
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let xml = self.read_document_part(data)?;
        let paragraphs = body_paragraphs(&xml)?;
        trace!("DOCX has {} body paragraphs", paragraphs.len());
        Ok(paragraphs.join("\n"))
    }

    fn backend_name(&self) -> &str {
        "docx-xml"
    }
}

/// Text of each top-level paragraph. Paragraphs inside tables are skipped, and
/// so are paragraphs nested in another paragraph (text boxes, shapes): the
/// outer paragraph keeps only its own runs.
fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current = Some(String::new());
                    }
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 && paragraph_depth == 0 => {
                    paragraphs.push(String::new())
                }
                b"w:tab" => {
                    if let Some(p) = own_text(&mut current, paragraph_depth) {
                        p.push('\t');
                    }
                }
                b"w:br" | b"w:cr" => {
                    if let Some(p) = own_text(&mut current, paragraph_depth) {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" if table_depth == 0 => {
                    if paragraph_depth == 1 {
                        if let Some(p) = current.take() {
                            paragraphs.push(p);
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                if let Some(p) = own_text(&mut current, paragraph_depth) {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::DocxXml(e.to_string()))?;
                    p.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::DocxXml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// The open top-level paragraph, unless the reader is inside a nested one.
fn own_text(current: &mut Option<String>, depth: usize) -> Option<&mut String> {
    if depth == 1 { current.as_mut() } else { None }
}

/// In-memory DOCX whose body is `body` (raw WordprocessingML).
#[cfg(test)]
pub(crate) fn docx_with_body(body: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>Mission</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">We serve </w:t></w:r><w:r><w:t>farmers &amp; fishers.</w:t></w:r></w:p>",
        );
        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert_eq!(text, "Mission\nWe serve farmers & fishers.");
    }

    #[test]
    fn test_empty_paragraphs_tabs_and_breaks() {
        let data = docx_with_body(
            "<w:p/><w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>",
        );
        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert_eq!(text, "\na\tb\nc");
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>Before</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>After</w:t></w:r></w:p>",
        );
        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert_eq!(text, "Before\nAfter");
    }

    #[test]
    fn test_text_box_paragraphs_do_not_replace_outer_text() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>Project Description: wells</w:t></w:r>\
             <w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Box</w:t></w:r></w:p></w:txbxContent></w:pict></w:r>\
             <w:r><w:t xml:space=\"preserve\"> for six villages.</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Next</w:t></w:r></w:p>",
        );
        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert_eq!(text, "Project Description: wells for six villages.\nNext");
    }

    #[test]
    fn test_not_a_zip() {
        let err = DocxExtractor::new().extract_text(b"plain text").unwrap_err();
        assert!(matches!(err, ExtractionError::DocxArchive(_)));
    }

    #[test]
    fn test_missing_document_part() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("word/styles.xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<w:styles/>").unwrap();
            zip.finish().unwrap();
        }
        let err = DocxExtractor::new().extract_text(&buf).unwrap_err();
        assert!(matches!(err, ExtractionError::DocxArchive(m) if m.contains(DOCUMENT_PART)));
    }
}
