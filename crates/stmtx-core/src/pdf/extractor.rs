//! PDF text extraction using lopdf and pdf-extract.

use std::any::Any;
use std::fs;
use std::panic;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::batch::StatementSource;
use crate::error::{PdfError, StmtxError};
use crate::models::transaction::StatementFile;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Read and load a PDF from disk.
    pub fn open(path: &std::path::Path) -> std::result::Result<Self, StmtxError> {
        let data = fs::read(path)?;
        let mut extractor = Self::new();
        extractor.load(&data)?;
        Ok(extractor)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Statements downloaded from the bank are sometimes encrypted with an empty password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads from bytes, so hand it the decrypted document
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        // pdf-extract panics on some font dictionaries that lopdf accepts
        let data = self.raw_data.as_slice();
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data))
            .map_err(|payload| PdfError::TextExtraction(panic_message(payload.as_ref())))?
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        trace!(
            "Extracted {} pages, {} chars",
            pages.len(),
            pages.iter().map(String::len).sum::<usize>()
        );
        Ok(pages)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("text extraction aborted: {}", detail)
}

/// Statement source reading page text from PDF files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageSource;

impl PdfPageSource {
    pub fn new() -> Self {
        Self
    }
}

impl StatementSource for PdfPageSource {
    fn page_texts(&self, statement: &StatementFile) -> crate::error::Result<Vec<String>> {
        let extractor = PdfExtractor::open(statement.path())?;
        Ok(extractor.extract_pages()?)
    }
}
