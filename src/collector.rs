//! News-search client: turns a [`SearchQuery`] into an ordered URL list.
//!
//! One GET against the search endpoint, no pagination, no retries. Every
//! failure (transport, non-2xx status, undecodable body) is logged and
//! recovered as an empty list so the run can carry on.
//!
//! # Response shape
//!
//! ```text
//! { "status": "ok", "totalResults": 2,
//!   "articles": [ { "url": "https://..." }, { "url": "https://..." } ] }
//! ```
//!
//! URLs keep the API's order; duplicates are passed through. An article
//! object without a string `url` yields [`MISSING_URL`].

use crate::error::CollectError;
use crate::http::HttpGet;
use crate::models::{SearchQuery, MISSING_URL};
use crate::utils::truncate_for_log;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Name of the URL dump written under the output directory.
pub const DEBUG_FILE_NAME: &str = "my_news_data.txt";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: Option<String>,
    message: Option<String>,
    articles: Option<Vec<Value>>,
}

/// Build the search request URL.
///
/// Parameters are appended in the order `q`, `apiKey`, `from`, `sortBy`,
/// `pageSize`.
pub fn search_url(endpoint: &Url, api_key: &str, query: &SearchQuery) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("q", &query.term)
        .append_pair("apiKey", api_key)
        .append_pair("from", &query.date_from.format("%Y-%m-%d").to_string())
        .append_pair("sortBy", query.sort.as_param())
        .append_pair("pageSize", &query.max_results.to_string());
    url
}

/// The same URL with the credential masked, for logging.
pub fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

/// Pull the article URLs out of a search response body.
pub fn parse_urls(body: &str, limit: usize) -> Result<Vec<String>, CollectError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| CollectError::Decode(e.to_string()))?;

    if response.status.as_deref() == Some("error") {
        warn!(message = ?response.message, "Search API reported an error");
    }

    let articles = response
        .articles
        .ok_or_else(|| CollectError::Decode("response has no `articles` array".to_string()))?;

    if articles.len() > limit {
        warn!(returned = articles.len(), limit, "Search API returned more articles than requested; truncating");
    }

    Ok(articles
        .iter()
        .take(limit)
        .map(|article| {
            article
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or(MISSING_URL)
                .to_string()
        })
        .collect())
}

/// Overwrite the debug file with one URL per line, creating the directory.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn write_debug_file(path: &Path, urls: &[String]) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    let contents: String = urls.iter().map(|url| format!("{url}\n")).collect();
    fs::write(path, contents).await
}

/// Run the search query against `endpoint`.
///
/// Returns the article URLs in response order, at most
/// `query.max_results` of them. Never fails: errors are logged and yield an
/// empty list.
#[instrument(level = "info", skip_all, fields(term = %query.term, sort = query.sort.as_param(), page_size = query.max_results))]
pub async fn collect<H: HttpGet>(
    http: &H,
    endpoint: &Url,
    api_key: &str,
    query: &SearchQuery,
    debug_file: &Path,
) -> Vec<String> {
    let url = search_url(endpoint, api_key, query);
    info!(url = %redacted(&url), "Querying news search API");

    let urls = match fetch_urls(http, &url, query.max_results as usize).await {
        Ok(urls) => urls,
        Err(e) => {
            error!(error = %e, "Error fetching news");
            return Vec::new();
        }
    };

    info!(count = urls.len(), "Collected article URLs");
    debug!(urls = ?urls, "Article URLs");

    if let Err(e) = write_debug_file(debug_file, &urls).await {
        error!(path = %debug_file.display(), error = %e, "Failed to write URL debug file");
    } else {
        debug!(path = %debug_file.display(), "Wrote URL debug file");
    }

    urls
}

async fn fetch_urls<H: HttpGet>(http: &H, url: &Url, limit: usize) -> Result<Vec<String>, CollectError> {
    let response = http.get(url.as_str(), None).await?;
    info!(status = response.status, "Search API responded");
    let response = response.error_for_status()?;
    parse_urls(&response.body, limit).inspect_err(|_| {
        warn!(body_preview = %truncate_for_log(&response.body, 300), "Unexpected search response body");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::http::testing::FakeHttp;
    use crate::models::SortOrder;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const ENDPOINT: &str = "https://newsapi.test/v2/everything";

    fn query(max_results: u32) -> SearchQuery {
        SearchQuery::new("markets", SortOrder::Popularity, max_results)
            .with_date_from(NaiveDate::from_ymd_opt(2025, 5, 6).unwrap())
    }

    fn endpoint() -> Url {
        Url::parse(ENDPOINT).unwrap()
    }

    fn request_url(max_results: u32) -> String {
        search_url(&endpoint(), "secret", &query(max_results)).to_string()
    }

    #[test]
    fn test_search_url_parameters() {
        let url = search_url(&endpoint(), "secret", &query(49));
        assert_eq!(
            url.as_str(),
            "https://newsapi.test/v2/everything?q=markets&apiKey=secret&from=2025-05-06&sortBy=popularity&pageSize=49"
        );
    }

    #[test]
    fn test_search_url_encodes_term() {
        let q = SearchQuery::new("rates & bonds", SortOrder::PublishedAt, 500)
            .with_date_from(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        let url = search_url(&endpoint(), "k", &q);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("q".to_string(), "rates & bonds".to_string()));
        assert_eq!(pairs[3], ("sortBy".to_string(), "publishedAt".to_string()));
        assert_eq!(pairs[4], ("pageSize".to_string(), "100".to_string()));
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let url = search_url(&endpoint(), "secret", &query(10));
        let shown = redacted(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("apiKey=***") || shown.contains("apiKey=%2A%2A%2A"));
        assert!(shown.contains("q=markets"));
    }

    #[test]
    fn test_parse_urls_substitutes_sentinel() {
        let body = r#"{"status":"ok","articles":[{"url":"http://a.test"},{"title":"no link"},{"url":null}]}"#;
        assert_eq!(parse_urls(body, 100).unwrap(), vec!["http://a.test", MISSING_URL, MISSING_URL]);
    }

    #[test]
    fn test_parse_urls_rejects_bad_bodies() {
        assert!(matches!(parse_urls("<html>", 10), Err(CollectError::Decode(_))));
        assert!(matches!(
            parse_urls(r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#, 10),
            Err(CollectError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_urls_keeps_duplicates_and_truncates() {
        let body = r#"{"articles":[{"url":"http://a.test"},{"url":"http://a.test"},{"url":"http://c.test"}]}"#;
        assert_eq!(parse_urls(body, 2).unwrap(), vec!["http://a.test", "http://a.test"]);
        assert_eq!(parse_urls(r#"{"articles":[]}"#, 2).unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_collect_returns_urls_in_order_and_writes_debug_file() {
        let tmp = TempDir::new().unwrap();
        let debug_file = tmp.path().join("output").join(DEBUG_FILE_NAME);
        let http = FakeHttp::new().respond(
            &request_url(49),
            200,
            r#"{"articles":[{"url":"http://a.test"},{"url":"http://b.test"}]}"#,
        );

        let urls = collect(&http, &endpoint(), "secret", &query(49), &debug_file).await;

        assert_eq!(urls, vec!["http://a.test", "http://b.test"]);
        assert_eq!(http.requested(), vec![request_url(49)]);
        assert_eq!(http.timeouts(), vec![None]);
        let written = std::fs::read_to_string(&debug_file).unwrap();
        assert_eq!(written, "http://a.test\nhttp://b.test\n");
    }

    #[tokio::test]
    async fn test_collect_never_exceeds_page_size() {
        let tmp = TempDir::new().unwrap();
        let articles: Vec<String> = (0..150).map(|i| format!(r#"{{"url":"http://{i}.test"}}"#)).collect();
        let body = format!(r#"{{"articles":[{}]}}"#, articles.join(","));
        let http = FakeHttp::new().respond(&request_url(100), 200, &body);

        let urls = collect(&http, &endpoint(), "secret", &query(100), &tmp.path().join("urls.txt")).await;
        assert_eq!(urls.len(), 100);
        assert_eq!(urls[0], "http://0.test");
    }

    #[tokio::test]
    async fn test_collect_recovers_from_http_error() {
        let tmp = TempDir::new().unwrap();
        let debug_file = tmp.path().join(DEBUG_FILE_NAME);
        let http = FakeHttp::new().respond(&request_url(10), 401, r#"{"status":"error"}"#);

        let urls = collect(&http, &endpoint(), "secret", &query(10), &debug_file).await;
        assert!(urls.is_empty());
        assert!(!debug_file.exists());
    }

    #[tokio::test]
    async fn test_collect_recovers_from_transport_error() {
        let tmp = TempDir::new().unwrap();
        let http = FakeHttp::new().fail(&request_url(10), FetchError::Transport("dns error".into()));

        let urls = collect(&http, &endpoint(), "secret", &query(10), &tmp.path().join("urls.txt")).await;
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_debug_file_write_failure_keeps_urls() {
        let tmp = TempDir::new().unwrap();
        // a regular file where the directory should be
        let blocker = tmp.path().join("output");
        std::fs::write(&blocker, "").unwrap();
        let http = FakeHttp::new().respond(&request_url(5), 200, r#"{"articles":[{"url":"http://a.test"}]}"#);

        let urls = collect(&http, &endpoint(), "secret", &query(5), &blocker.join(DEBUG_FILE_NAME)).await;
        assert_eq!(urls, vec!["http://a.test"]);
    }
}
