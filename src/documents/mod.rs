//! Document text extraction
//!
//! Uploaded documents are turned into plain text behind the
//! [`TextExtractor`] trait so analysis code never touches a parser directly.

pub mod pdf;

pub use pdf::PdfTextExtractor;

use crate::types::AppResult;

/// Converts raw document bytes into concatenated page text.
///
/// Implementations are synchronous and CPU-bound; callers run them on the
/// blocking pool.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, data: &[u8]) -> AppResult<String>;
}

/// Prefix of `text` holding at most `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
