use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::errors::CoreError;
use super::models::DocumentContent;
use super::pdf::PdfTextExtractor;

/// Turns uploaded document bytes into plain text for the pipeline.
#[derive(Debug, Default, Clone)]
pub struct DocumentTextLoader {
    pdf_text_extractor: PdfTextExtractor,
}

impl DocumentTextLoader {
    pub fn new(pdf_text_extractor: PdfTextExtractor) -> Self {
        Self { pdf_text_extractor }
    }

    pub fn load(&self, file_name: &str, content: DocumentContent) -> Result<String, CoreError> {
        match content {
            DocumentContent::Text(text) => Ok(text),
            DocumentContent::Bytes(data) => self.load_bytes(file_name, &data),
            DocumentContent::Unreadable(reason) => Err(CoreError::unreadable(file_name, reason)),
        }
    }

    pub fn load_bytes(&self, file_name: &str, data: &[u8]) -> Result<String, CoreError> {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => self
                .pdf_text_extractor
                .extract_text(data)
                .map_err(|err| CoreError::unreadable(file_name, format!("PDF parse error: {err}"))),
            "docx" => extract_docx_text(data)
                .map_err(|err| CoreError::unreadable(file_name, format!("DOCX parse error: {err}"))),
            "doc" => Err(CoreError::UnsupportedFileType(file_name.to_string())),
            _ => String::from_utf8(data.to_vec())
                .map_err(|_| CoreError::unreadable(file_name, "text is not valid UTF-8")),
        }
    }
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    // Paragraphs map to lines so section headers stay on their own line.
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}
