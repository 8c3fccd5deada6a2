//! Search Module
//!
//! Preprint search behind the [`PaperSearch`] trait. The arXiv Atom API is
//! the production backend; ordering and relevance are entirely the
//! service's, no local ranking or deduplication happens here.

pub mod arxiv;

pub use arxiv::ArxivClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AppError, AppResult};

pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 20;
pub const DEFAULT_RESULTS: usize = 5;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Search service returned HTTP {0}")]
    Status(u16),

    #[error("Search service reported an error: {0}")]
    Api(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::Search(err.to_string())
    }
}

/// Result ordering requested from the search service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "relevance", alias = "Relevance")]
    Relevance,
    #[serde(rename = "lastUpdatedDate", alias = "Last Updated Date")]
    LastUpdatedDate,
    #[serde(rename = "submittedDate", alias = "Submitted Date")]
    SubmittedDate,
}

impl SortBy {
    /// Value of arXiv's `sortBy` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
            SortBy::SubmittedDate => "submittedDate",
        }
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: usize,
    pub sort_by: SortBy,
}

impl SearchQuery {
    pub fn new(query: &str, max_results: usize, sort_by: SortBy) -> AppResult<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidRequest("Search query must not be empty".to_string()));
        }
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&max_results) {
            return Err(AppError::InvalidRequest(format!(
                "max_results must be between {} and {}, got {}",
                MIN_RESULTS, MAX_RESULTS, max_results
            )));
        }

        Ok(Self {
            query: query.to_string(),
            max_results,
            sort_by,
        })
    }
}

/// One preprint returned by the search service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub summary: String,
    /// Author names in feed order, joined by ", "
    pub authors: String,
    pub published: NaiveDate,
    pub updated: NaiveDate,
    /// Link to the source PDF
    pub url: String,
}

#[async_trait]
pub trait PaperSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_validation() {
        assert!(SearchQuery::new("graph neural networks", 5, SortBy::Relevance).is_ok());
        assert!(SearchQuery::new("   ", 5, SortBy::Relevance).is_err());
        assert!(SearchQuery::new("llm", 0, SortBy::Relevance).is_err());
        assert!(SearchQuery::new("llm", 21, SortBy::Relevance).is_err());
        assert!(SearchQuery::new("llm", 20, SortBy::SubmittedDate).is_ok());
    }

    #[test]
    fn test_query_is_trimmed() {
        let query = SearchQuery::new("  protein folding ", 1, SortBy::Relevance).unwrap();
        assert_eq!(query.query, "protein folding");
    }

    #[test]
    fn test_sort_by_accepts_labels_and_params() {
        let parsed: SortBy = serde_json::from_str("\"Last Updated Date\"").unwrap();
        assert_eq!(parsed, SortBy::LastUpdatedDate);
        let parsed: SortBy = serde_json::from_str("\"submittedDate\"").unwrap();
        assert_eq!(parsed, SortBy::SubmittedDate);
        assert_eq!(SortBy::default().as_param(), "relevance");
    }
}
