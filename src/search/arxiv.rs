//! arXiv API Client
//!
//! Queries the public arXiv Atom API (`export.arxiv.org/api/query`) and
//! maps each feed entry to a [`SearchResult`]. Entries are returned in
//! feed order, capped at the requested count.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{PaperSearch, SearchError, SearchQuery, SearchResult};
use crate::config::SearchConfig;

const USER_AGENT: &str = concat!("reasoning-lab/", env!("CARGO_PKG_VERSION"));
const ERROR_ID_MARKER: &str = "arxiv.org/api/errors";

#[derive(Clone)]
pub struct ArxivClient {
    http: Client,
    base: String,
}

impl ArxivClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, SearchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::RequestFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base: base.to_string(),
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::new(&config.arxiv_api_url, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl PaperSearch for ArxivClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        info!(
            query = %query.query,
            max_results = query.max_results,
            sort_by = query.sort_by.as_param(),
            "Searching arXiv"
        );

        let response = self
            .http
            .get(&self.base)
            .query(&[("search_query", query.query.as_str())])
            .query(&[("start", 0), ("max_results", query.max_results)])
            .query(&[("sortBy", query.sort_by.as_param()), ("sortOrder", "descending")])
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9, text/xml;q=0.8")
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let mut results = parse_atom_feed(&body)?;
        if results.len() > query.max_results {
            warn!(
                returned = results.len(),
                requested = query.max_results,
                "arXiv returned more entries than requested, truncating"
            );
            results.truncate(query.max_results);
        }

        debug!(count = results.len(), "arXiv search complete");
        Ok(results)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
}

#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    authors: Vec<String>,
    pdf_url: Option<String>,
}

impl EntryBuilder {
    fn apply_link(&mut self, link: &BytesStart<'_>) {
        let mut href = None;
        let mut title = None;
        let mut content_type = None;
        for attr in link.attributes().flatten() {
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => continue,
            };
            match attr.key.as_ref() {
                b"href" => href = Some(value),
                b"title" => title = Some(value),
                b"type" => content_type = Some(value),
                _ => {}
            }
        }

        let is_pdf = title.as_deref() == Some("pdf") || content_type.as_deref() == Some("application/pdf");
        if is_pdf && self.pdf_url.is_none() {
            self.pdf_url = href;
        }
    }

    fn finish(self) -> Result<SearchResult, SearchError> {
        if self.id.contains(ERROR_ID_MARKER) {
            let message = if self.summary.trim().is_empty() {
                self.id.clone()
            } else {
                self.summary.trim().to_string()
            };
            return Err(SearchError::Api(message));
        }

        let url = self
            .pdf_url
            .unwrap_or_else(|| self.id.replacen("/abs/", "/pdf/", 1));

        Ok(SearchResult {
            title: collapse_whitespace(&self.title),
            summary: self.summary.trim().to_string(),
            authors: self.authors.join(", "),
            published: parse_feed_date(&self.published)?,
            updated: parse_feed_date(&self.updated)?,
            url,
        })
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_feed_date(raw: &str) -> Result<NaiveDate, SearchError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.date_naive())
        .map_err(|e| SearchError::ParseError(format!("invalid date {:?}: {}", raw, e)))
}

/// Parse an arXiv Atom feed into results, preserving entry order.
pub fn parse_atom_feed(xml: &str) -> Result<Vec<SearchResult>, SearchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut results = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut in_author = false;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                let tag = name.as_ref();
                if tag == b"entry" {
                    entry = Some(EntryBuilder::default());
                    in_author = false;
                    field = None;
                } else if let Some(builder) = entry.as_mut() {
                    match tag {
                        b"author" => in_author = true,
                        b"link" => builder.apply_link(&e),
                        _ => {
                            field = match tag {
                                b"id" => Some(Field::Id),
                                b"title" => Some(Field::Title),
                                b"summary" => Some(Field::Summary),
                                b"published" => Some(Field::Published),
                                b"updated" => Some(Field::Updated),
                                b"name" if in_author => Some(Field::AuthorName),
                                _ => None,
                            };
                            text.clear();
                        }
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(builder) = entry.as_mut() {
                    if e.local_name().as_ref() == b"link" {
                        builder.apply_link(&e);
                    }
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    let chunk = t
                        .unescape()
                        .map_err(|e| SearchError::ParseError(e.to_string()))?;
                    text.push_str(&chunk);
                }
            }
            Event::CData(c) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"entry" => {
                        if let Some(builder) = entry.take() {
                            results.push(builder.finish()?);
                        }
                    }
                    b"author" => in_author = false,
                    _ => {
                        if let (Some(current), Some(builder)) = (field.take(), entry.as_mut()) {
                            let value = std::mem::take(&mut text);
                            match current {
                                Field::Id => builder.id = value,
                                Field::Title => builder.title = value,
                                Field::Summary => builder.summary = value,
                                Field::Published => builder.published = value,
                                Field::Updated => builder.updated = value,
                                Field::AuthorName => builder.authors.push(value.trim().to_string()),
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortBy;
    use mockito::Matcher;

    fn entry(id: &str, title: &str) -> String {
        format!(
            r#"<entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <updated>2024-02-01T10:00:00Z</updated>
    <published>2024-01-15T09:30:00Z</published>
    <title>{title}</title>
    <summary>  We study {title}.
  </summary>
    <author><name>Ada Lovelace</name><arxiv:affiliation>Analytical Engines</arxiv:affiliation></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/{id}v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/{id}v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>"#
        )
    }

    fn feed(entries: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <id>http://arxiv.org/api/query</id>
  <title type="html">ArXiv Query: search_query=all:test</title>
  <updated>2024-03-01T00:00:00-05:00</updated>
  {}
</feed>"#,
            entries.join("\n")
        )
    }

    #[test]
    fn test_parse_feed_entries() {
        let xml = feed(&[
            entry("2401.00001", "Sparse\n      Attention &amp; Memory"),
            entry("2401.00002", "Second Paper"),
        ]);

        let results = parse_atom_feed(&xml).unwrap();

        assert_eq!(results.len(), 2);
        let first = &results[0];
        assert_eq!(first.title, "Sparse Attention & Memory");
        assert_eq!(first.summary, "We study Sparse\n      Attention & Memory.");
        assert_eq!(first.authors, "Ada Lovelace, Alan Turing");
        assert_eq!(first.published, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(first.updated, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(first.url, "http://arxiv.org/pdf/2401.00001v1");
        assert_eq!(results[1].title, "Second Paper");
    }

    #[test]
    fn test_pdf_link_falls_back_to_abs_id() {
        let xml = feed(&[r#"<entry>
    <id>http://arxiv.org/abs/2402.12345v2</id>
    <updated>2024-02-20T00:00:00Z</updated>
    <published>2024-02-19T00:00:00Z</published>
    <title>No pdf link</title>
    <summary>s</summary>
    <author><name>Someone</name></author>
  </entry>"#
            .to_string()]);

        let results = parse_atom_feed(&xml).unwrap();
        assert_eq!(results[0].url, "http://arxiv.org/pdf/2402.12345v2");
    }

    #[test]
    fn test_empty_feed() {
        let results = parse_atom_feed(&feed(&[])).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_error_entry_is_reported() {
        let xml = feed(&[r#"<entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
    <updated>2024-03-01T00:00:00-05:00</updated>
  </entry>"#
            .to_string()]);

        match parse_atom_feed(&xml) {
            Err(SearchError::Api(message)) => assert_eq!(message, "incorrect id format for 1234"),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_sends_parameters_and_caps_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search_query".into(), "quantum error correction".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("max_results".into(), "2".into()),
                Matcher::UrlEncoded("sortBy".into(), "submittedDate".into()),
                Matcher::UrlEncoded("sortOrder".into(), "descending".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(feed(&[
                entry("2401.00003", "C"),
                entry("2401.00001", "A"),
                entry("2401.00002", "B"),
            ]))
            .create_async()
            .await;

        let client = ArxivClient::new(&format!("{}/api/query", server.url()), Duration::from_secs(5)).unwrap();
        let query = SearchQuery::new("quantum error correction", 2, SortBy::SubmittedDate).unwrap();
        let results = client.search(&query).await.unwrap();

        mock.assert_async().await;
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = ArxivClient::new(&format!("{}/api/query", server.url()), Duration::from_secs(5)).unwrap();
        let query = SearchQuery::new("anything", 5, SortBy::Relevance).unwrap();

        assert!(matches!(client.search(&query).await, Err(SearchError::Status(503))));
    }
}
