//! Literature Agent
//!
//! Runs a preprint search and stores the results in the session, replacing
//! the previous search.

use tracing::info;

use crate::search::{PaperSearch, SearchQuery, SearchResult};
use crate::session::SessionContext;
use crate::types::AppResult;

pub struct LiteratureAgent;

impl LiteratureAgent {
    pub async fn search(
        session: &mut SessionContext,
        search: &dyn PaperSearch,
        query: &SearchQuery,
    ) -> AppResult<Vec<SearchResult>> {
        let mut results = search.search(query).await?;
        results.truncate(query.max_results);

        info!(
            session_id = %session.id(),
            query = %query.query,
            count = results.len(),
            "Search results stored"
        );

        session.search_results = results.clone();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortBy;
    use crate::testing::{sample_result, CannedSearch};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_results_capped_in_service_order() {
        let backend = CannedSearch::new(vec![
            sample_result("Zeta"),
            sample_result("Alpha"),
            sample_result("Mu"),
            sample_result("Beta"),
        ]);
        let mut session = SessionContext::new(Uuid::new_v4());
        let query = SearchQuery::new("transformers", 3, SortBy::LastUpdatedDate).unwrap();

        let results = LiteratureAgent::search(&mut session, &backend, &query).await.unwrap();

        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha", "Mu"]);
        assert_eq!(session.search_results, results);
        assert_eq!(backend.queries.lock().unwrap()[0], query);
    }

    #[tokio::test]
    async fn test_new_search_replaces_previous() {
        let mut session = SessionContext::new(Uuid::new_v4());
        let query = SearchQuery::new("first", 5, SortBy::Relevance).unwrap();
        LiteratureAgent::search(&mut session, &CannedSearch::new(vec![sample_result("Old")]), &query)
            .await
            .unwrap();

        LiteratureAgent::search(&mut session, &CannedSearch::new(vec![]), &query)
            .await
            .unwrap();

        assert!(session.search_results.is_empty());
    }
}
