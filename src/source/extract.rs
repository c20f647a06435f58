//! Text extraction from downloaded document bytes.
//!
//! PDF text comes from Pdfium page by page; DOCX text is read straight out
//! of the `word/document.xml` entry in the OOXML zip container. Both paths
//! operate on in-memory bytes, so no transient files are created.

use std::io::Read;

use pdfium_render::prelude::{Pdfium, PdfiumError};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::types::DocumentKind;

/// Errors emitted while turning document bytes into text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to load Pdfium runtime: {0}")]
    PdfRuntime(#[from] PdfiumError),

    #[error("failed to load PDF document: {0}")]
    PdfDocument(#[source] PdfiumError),

    #[error("failed to extract text for page {page_index}: {source}")]
    PdfPageText {
        page_index: usize,
        #[source]
        source: PdfiumError,
    },

    #[error("failed to open DOCX container: {0}")]
    DocxContainer(#[from] zip::result::ZipError),

    #[error("failed to read DOCX document xml: {0}")]
    DocxRead(#[from] std::io::Error),

    #[error("failed to parse DOCX document xml: {0}")]
    DocxXml(#[from] quick_xml::Error),
}

/// Extracts plain text from `bytes` according to the document kind.
///
/// The result may be empty (image-only PDFs, empty documents); callers
/// decide whether empty text is worth keeping.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => extract_pdf_text(bytes),
        DocumentKind::Docx => extract_docx_text(bytes),
    }
}

/// Extracts UTF-8 text from a PDF byte slice, one page at a time.
///
/// Non-empty pages are joined with a single newline, matching the page
/// consolidation the rest of the pipeline was tuned against.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let pdfium = Pdfium::new(Pdfium::bind_to_system_library()?);
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(ExtractError::PdfDocument)?;

    let mut buffer = String::new();
    for (page_index, page) in document.pages().iter().enumerate() {
        let page_text = page
            .text()
            .map(|text| text.all())
            .map_err(|source| ExtractError::PdfPageText { page_index, source })?;

        if page_text.is_empty() {
            continue;
        }
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&page_text);
    }
    Ok(buffer)
}

/// Extracts the text runs of a DOCX body.
///
/// Paragraph ends become newlines; explicit breaks and tabs are preserved so
/// the splitter sees the same boundaries a reader would.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;
    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut document_xml)?;

    let mut reader = Reader::from_str(&document_xml);
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(text) => out.push_str(&text.unescape()?),
            Event::Empty(element) => match element.local_name().as_ref() {
                b"br" => out.push('\n'),
                b"tab" => out.push('\t'),
                _ => {}
            },
            Event::End(element) if element.local_name().as_ref() == b"p" => out.push('\n'),
            Event::Eof => break,
            _ => {}
        }
    }

    // The final paragraph newline is container noise, not document text.
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}
