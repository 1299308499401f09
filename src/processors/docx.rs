//! Word document processor
//!
//! Reads paragraph text out of the OOXML zip container and writes a fresh
//! document with one paragraph per output entry. Styling, tables, and images
//! are not carried over; only paragraph text, blank paragraphs, and ordering
//! survive translation.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};
use zip::write::FileOptions;

use crate::core::batch::{translate_document, Translate};
use crate::core::errors::{Result, TranslationError};

/// Package manifest for the minimal output document
const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#
);

/// Package relationships pointing at the main document part
const RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

/// WordprocessingML namespace for the main document part
const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Word document processor
#[derive(Debug, Clone)]
pub struct DocxProcessor {
    /// Matches `<w:t>` run text inside one paragraph's XML
    run_text_re: Regex,
}

impl Default for DocxProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxProcessor {
    /// Create a new docx processor
    pub fn new() -> Self {
        // The pattern is a constant; a failure here is a programming error.
        let run_text_re =
            Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>").expect("run text pattern");
        Self { run_text_re }
    }

    /// Find docx files in directory
    pub fn find_docx_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(TranslationError::FileError {
                path: dir.display().to_string(),
                message: "Not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && self.is_docx_file(&path) {
                files.push(path);
            }
        }

        Ok(files)
    }

    /// Find docx files recursively
    pub fn find_docx_files_recursive(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(TranslationError::FileError {
                path: dir.display().to_string(),
                message: "Not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && self.is_docx_file(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if file is a Word document
    fn is_docx_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == "docx")
            .unwrap_or(false)
    }

    /// Read the ordered paragraph texts of a document
    ///
    /// A self-closing `<w:p/>` is an empty paragraph; run texts within a
    /// paragraph are concatenated in order.
    pub fn read_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path).map_err(|e| TranslationError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut archive = zip::ZipArchive::new(file)?;
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|_| TranslationError::InvalidFormat {
                format: "docx: missing word/document.xml".to_string(),
            })?
            .read_to_string(&mut xml)?;

        let paragraphs = self.parse_document_xml(&xml);
        debug!(
            "Read {} paragraphs from {}",
            paragraphs.len(),
            path.display()
        );

        Ok(paragraphs)
    }

    /// Write a fresh document with one paragraph per entry
    ///
    /// Paragraph count and ordering, blanks included, match the input slice.
    pub fn write_paragraphs(&self, path: &Path, paragraphs: &[String]) -> Result<()> {
        let file = File::create(path).map_err(|e| TranslationError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let options = FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        let mut zip = zip::ZipWriter::new(file);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(RELS_XML.as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(build_document_xml(paragraphs).as_bytes())?;

        zip.finish()?;
        Ok(())
    }

    /// Translate a single Word document
    pub async fn translate_file<T>(
        &self,
        translator: &T,
        input: &Path,
        output: &Path,
        source_lang: &str,
        target_lang: &str,
        max_chars: usize,
    ) -> Result<()>
    where
        T: Translate + ?Sized,
    {
        debug!("Translating: {}", input.display());

        let paragraphs = self.read_paragraphs(input)?;
        let translated =
            translate_document(translator, &paragraphs, source_lang, target_lang, max_chars)
                .await?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| TranslationError::FileError {
                        path: parent.display().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }

        self.write_paragraphs(output, &translated)?;

        info!("Translated: {} -> {}", input.display(), output.display());
        Ok(())
    }

    /// Extract paragraph texts from the main document part
    fn parse_document_xml(&self, xml: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut pos = 0;

        while let Some(found) = xml[pos..].find("<w:p") {
            let start = pos + found;
            let after = start + "<w:p".len();

            // Skip <w:pPr>, <w:pgSz> and other tags sharing the prefix
            match xml.as_bytes().get(after).copied() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(b'>') | Some(b'/') => {}
                _ => {
                    pos = after;
                    continue;
                }
            }

            let Some(tag_close) = xml[after..].find('>') else {
                break;
            };
            let tag_end = after + tag_close;

            if xml.as_bytes()[tag_end - 1] == b'/' {
                // Self-closing paragraph, no content
                paragraphs.push(String::new());
                pos = tag_end + 1;
                continue;
            }

            let content_start = tag_end + 1;
            let Some(close) = xml[content_start..].find("</w:p>") else {
                break;
            };

            let content = &xml[content_start..content_start + close];
            paragraphs.push(self.collect_run_text(content));
            pos = content_start + close + "</w:p>".len();
        }

        paragraphs
    }

    /// Concatenate the `<w:t>` run texts of one paragraph
    fn collect_run_text(&self, paragraph_xml: &str) -> String {
        let mut text = String::new();
        for capture in self.run_text_re.captures_iter(paragraph_xml) {
            if let Some(run) = capture.get(1) {
                text.push_str(&unescape_xml(run.as_str()));
            }
        }
        text
    }
}

/// Build the main document part with one `<w:p>` per entry
fn build_document_xml(paragraphs: &[String]) -> String {
    let mut body = String::new();
    for text in paragraphs {
        if text.is_empty() {
            body.push_str("<w:p/>");
        } else {
            body.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
            body.push_str(&escape_xml(text));
            body.push_str("</w:t></w:r></w:p>");
        }
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="{ns}"><w:body>{body}</w:body></w:document>"#
        ),
        ns = WORDML_NS,
        body = body
    )
}

/// Decode the five XML named entities
fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Encode text for embedding in the document part
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="{WORDML_NS}"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_parse_paragraphs_in_order() {
        let processor = DocxProcessor::new();
        let xml = document_xml(
            "<w:p><w:r><w:t>Hello</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>World</w:t></w:r></w:p>",
        );

        assert_eq!(
            processor.parse_document_xml(&xml),
            vec!["Hello".to_string(), String::new(), "World".to_string()]
        );
    }

    #[test]
    fn test_parse_concatenates_runs() {
        let processor = DocxProcessor::new();
        let xml = document_xml(
            r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>World</w:t></w:r></w:p>"#,
        );

        assert_eq!(
            processor.parse_document_xml(&xml),
            vec!["Hello World".to_string()]
        );
    }

    #[test]
    fn test_parse_is_not_confused_by_ppr() {
        let processor = DocxProcessor::new();
        let xml = document_xml(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr></w:p>"#);

        assert_eq!(processor.parse_document_xml(&xml), vec![String::new()]);
    }

    #[test]
    fn test_parse_decodes_entities() {
        let processor = DocxProcessor::new();
        let xml = document_xml("<w:p><w:r><w:t>a &amp;&lt; b</w:t></w:r></w:p>");

        assert_eq!(
            processor.parse_document_xml(&xml),
            vec!["a &< b".to_string()]
        );
    }

    #[test]
    fn test_escape_round_trip() {
        let text = r#"5 < 6 & "quotes" aren't > nothing"#;
        assert_eq!(unescape_xml(&escape_xml(text)), text);
    }

    #[test]
    fn test_is_docx_file() {
        let processor = DocxProcessor::new();
        assert!(processor.is_docx_file(Path::new("test.docx")));
        assert!(processor.is_docx_file(Path::new("test.DOCX")));
        assert!(!processor.is_docx_file(Path::new("test.doc")));
        assert!(!processor.is_docx_file(Path::new("test")));
    }

    #[test]
    fn test_write_then_read_preserves_paragraphs() {
        let processor = DocxProcessor::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");

        let paragraphs = vec![
            "First paragraph".to_string(),
            String::new(),
            "Text with <markup> & entities".to_string(),
        ];

        processor.write_paragraphs(&path, &paragraphs).unwrap();
        assert_eq!(processor.read_paragraphs(&path).unwrap(), paragraphs);
    }

    #[test]
    fn test_read_rejects_non_docx_payload() {
        let processor = DocxProcessor::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        assert!(processor.read_paragraphs(&path).is_err());
    }
}
