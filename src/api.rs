//! NewsAPI client.
//!
//! This module turns an [`ArticleQuery`] into a GET request against one of the
//! two search endpoints and turns the response into [`ArticleRecord`]s.
//!
//! # Architecture
//!
//! - [`Transport`]: async GET seam; [`ReqwestTransport`] is the real one,
//!   tests plug in a canned transport
//! - [`Endpoint`]: the only thing that differs between the two public fetches
//! - [`ArticleClient`]: holds the API key and shares one request/parse path
//!   between [`ArticleClient::fetch_top_headlines`] and
//!   [`ArticleClient::fetch_everything`]
//!
//! # Failure Semantics
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | status 200 | parsed articles |
//! | status != 200 | `warn!` with the status, empty `Vec` |
//! | transport error | `Err(NewsError::TransportFailure)` |
//! | 200 without an `articles` array | `Err(NewsError::MalformedResponse)` |

use crate::error::{NewsError, Result};
use crate::models::{ApiResponse, ArticleRecord};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Base path shared by both endpoints.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Raw HTTP response handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Trait for issuing a GET request with query-string parameters.
///
/// Implementors must return `Err` only for transport-level failures; any
/// response that arrived, whatever its status, is an `Ok(HttpResponse)`.
pub trait Transport {
    async fn get(&self, url: &str, params: &[(&'static str, String)]) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a `reqwest::Client` with the library's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl Transport for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str, params: &[(&'static str, String)]) -> Result<HttpResponse> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Received response");
        Ok(HttpResponse { status, body })
    }
}

/// The two remote query surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    /// Path segment appended to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Everything => "everything",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Filters and search terms for a fetch.
///
/// Every filter has its own field; `terms` is an ordered sequence that is
/// joined with single spaces into the `q` parameter.
///
/// ```ignore
/// let query = ArticleQuery::new()
///     .terms(["bitcoin", "crypto"])
///     .domain("bbc.co.uk")
///     .language("en");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Lower bound on publication, sent as `from`.
    pub date: Option<String>,
    /// Publisher domains, sent comma-joined as `domains`.
    pub domains: Vec<String>,
    /// Two-letter language code, sent verbatim as `language`.
    pub language: Option<String>,
    /// Free-text search terms, sent space-joined as `q`.
    pub terms: Vec<String>,
}

impl ArticleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    pub fn domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.terms.push(term.into());
        self
    }

    pub fn terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms.extend(terms.into_iter().map(Into::into));
        self
    }

    /// Assemble the query-string parameters. `apiKey` is always first.
    ///
    /// Empty optional values are omitted rather than sent blank.
    pub fn to_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("apiKey", api_key.to_string())];

        if !self.terms.is_empty() {
            params.push(("q", self.terms.iter().join(" ")));
        }
        if let Some(date) = self.date.as_deref().filter(|d| !d.is_empty()) {
            params.push(("from", date.to_string()));
        }
        if !self.domains.is_empty() {
            params.push(("domains", self.domains.iter().join(",")));
        }
        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            params.push(("language", language.to_string()));
        }
        params
    }
}

/// Client for the NewsAPI search endpoints.
///
/// Each fetch is independent; the client only holds the key, the base URL and
/// the transport.
pub struct ArticleClient<T = ReqwestTransport> {
    api_key: String,
    base_url: Url,
    transport: T,
}

impl ArticleClient<ReqwestTransport> {
    /// Build a client from a key string using the default HTTP transport.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_transport(api_key, ReqwestTransport::default())
    }

    /// Build a client by reading the API key from a text file.
    ///
    /// Leading and trailing whitespace is stripped, so a whitespace-only file
    /// yields an empty key rather than an error.
    ///
    /// # Errors
    ///
    /// [`NewsError::CredentialSourceUnavailable`] if the file cannot be read.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self> {
        let api_key = read_api_key(path.as_ref())?;
        Ok(Self::new(api_key))
    }
}

impl<T: Transport> ArticleClient<T> {
    /// Build a client around any [`Transport`].
    pub fn with_transport(api_key: impl Into<String>, transport: T) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            transport,
        }
    }

    /// Point the client at a different base URL (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = as_directory(Url::parse(base_url)?);
        Ok(self)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch from the `top-headlines` endpoint.
    ///
    /// # Arguments
    ///
    /// * `query` - Search terms and filters; empty ones are left out of the request
    ///
    /// # Returns
    ///
    /// The parsed articles in response order. A non-200 status is logged with
    /// `warn!` and yields an empty `Vec`.
    ///
    /// # Errors
    ///
    /// - [`NewsError::TransportFailure`] if the request never got a response
    /// - [`NewsError::MalformedResponse`] if a 200 body has no `articles` array
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let client = ArticleClient::from_key_file("api_key.txt")?;
    /// let articles = client
    ///     .fetch_top_headlines(&ArticleQuery::new().domain("bbc.co.uk"))
    ///     .await?;
    /// ```
    pub async fn fetch_top_headlines(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
        self.fetch(Endpoint::TopHeadlines, query).await
    }

    /// Fetch from the `everything` endpoint.
    ///
    /// Same parameters, outcomes and errors as
    /// [`fetch_top_headlines`](Self::fetch_top_headlines).
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let articles = client
    ///     .fetch_everything(&ArticleQuery::new().terms(["bitcoin", "crypto"]).date("2024-10-20"))
    ///     .await?;
    /// ```
    pub async fn fetch_everything(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
        self.fetch(Endpoint::Everything, query).await
    }

    /// Shared fetch path: non-success statuses become an empty result.
    #[instrument(level = "info", skip_all, fields(%endpoint))]
    pub async fn fetch(&self, endpoint: Endpoint, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
        let t0 = Instant::now();
        match self.request(endpoint, query).await {
            Ok(articles) => {
                info!(
                    count = articles.len(),
                    elapsed_ms = t0.elapsed().as_millis(),
                    "Fetched articles"
                );
                Ok(articles)
            }
            Err(NewsError::RemoteRejection { status }) => {
                warn!(status, "Request rejected by the API; returning no articles");
                Ok(Vec::new())
            }
            Err(e) => {
                error!(error = %e, elapsed_ms = t0.elapsed().as_millis(), "Fetch failed");
                Err(e)
            }
        }
    }

    /// Issue the request and parse it, surfacing a non-200 status as
    /// [`NewsError::RemoteRejection`].
    pub async fn request(&self, endpoint: Endpoint, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
        let url = self.endpoint_url(endpoint)?;
        let params = query.to_params(&self.api_key);
        // apiKey is always the first parameter; keep it out of the logs
        let visible: Vec<_> = params.iter().skip(1).collect();
        debug!(%url, params = ?visible, "Sending request");

        let response = self.transport.get(url.as_str(), &params).await?;
        if response.status != 200 {
            debug!(
                status = response.status,
                body_preview = %truncate_for_log(&response.body, 300),
                "Non-success response"
            );
            return Err(NewsError::RemoteRejection {
                status: response.status,
            });
        }
        parse_articles(&response.body)
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        Ok(self.base_url.join(endpoint.path())?)
    }
}

impl<T> fmt::Debug for ArticleClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Decode a success body into article records.
///
/// Field-level absence is never an error; a body without an `articles`
/// array is.
pub fn parse_articles(body: &str) -> Result<Vec<ArticleRecord>> {
    let response: ApiResponse = serde_json::from_str(body).inspect_err(|e| {
        warn!(error = %e, body_preview = %truncate_for_log(body, 300), "Unexpected response shape");
    })?;
    Ok(response
        .articles
        .into_iter()
        .map(ArticleRecord::from)
        .collect())
}

/// Read the API key from a line-oriented text file.
///
/// # Arguments
///
/// * `path` - File holding the key, typically `api_key.txt`
///
/// # Returns
///
/// The file contents with leading and trailing whitespace stripped. A file
/// holding only whitespace gives an empty key.
///
/// # Errors
///
/// [`NewsError::CredentialSourceUnavailable`] if the file cannot be read.
///
/// # Examples
///
/// ```ignore
/// let key = read_api_key(Path::new("api_key.txt"))?;
/// ```
pub fn read_api_key(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Cannot read API key file");
        NewsError::CredentialSourceUnavailable {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(raw.trim().to_string())
}

fn default_base_url() -> Url {
    as_directory(Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"))
}

/// Give the URL path a trailing `/` so that `join` appends instead of replacing
/// the last segment.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    const ONE_ARTICLE: &str = r#"{
        "status": "ok",
        "totalResults": 1,
        "articles": [{
            "source": {"id": "bbc-news", "name": "BBC News"},
            "author": "John Doe",
            "title": "Bitcoin hits new high",
            "description": "Prices surge",
            "url": "https://bbc.co.uk/news/1",
            "urlToImage": null,
            "publishedAt": "2024-10-24T12:00:00Z",
            "content": "Full article content"
        }]
    }"#;

    /// Transport that replays one canned outcome and records each request.
    #[derive(Debug)]
    struct CannedTransport {
        outcome: std::result::Result<HttpResponse, String>,
        seen: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
    }

    impl CannedTransport {
        fn status(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        async fn get(&self, url: &str, params: &[(&'static str, String)]) -> Result<HttpResponse> {
            self.seen
                .borrow_mut()
                .push((url.to_string(), params.to_vec()));
            self.outcome
                .clone()
                .map_err(NewsError::TransportFailure)
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_terms_are_space_joined() {
        let params = ArticleQuery::new()
            .terms(["bitcoin", "crypto"])
            .to_params("key");
        assert_eq!(param(&params, "q"), Some("bitcoin crypto"));
    }

    #[test]
    fn test_domains_are_comma_joined() {
        let params = ArticleQuery::new()
            .domains(["bbc.co.uk", "cnn.com"])
            .to_params("key");
        assert_eq!(param(&params, "domains"), Some("bbc.co.uk,cnn.com"));
    }

    #[test]
    fn test_only_api_key_when_query_empty() {
        let params = ArticleQuery::new().to_params("secret");
        assert_eq!(params, vec![("apiKey", "secret".to_string())]);
    }

    #[test]
    fn test_all_params_present() {
        let params = ArticleQuery::new()
            .date("2024-10-20")
            .domain("bbc.co.uk")
            .language("en")
            .term("election")
            .to_params("secret");
        assert_eq!(param(&params, "apiKey"), Some("secret"));
        assert_eq!(param(&params, "q"), Some("election"));
        assert_eq!(param(&params, "from"), Some("2024-10-20"));
        assert_eq!(param(&params, "domains"), Some("bbc.co.uk"));
        assert_eq!(param(&params, "language"), Some("en"));
    }

    #[test]
    fn test_empty_optional_values_omitted() {
        let params = ArticleQuery::new().date("").language("").to_params("k");
        assert!(param(&params, "from").is_none());
        assert!(param(&params, "language").is_none());
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::TopHeadlines.path(), "top-headlines");
        assert_eq!(Endpoint::Everything.to_string(), "everything");
    }

    #[tokio::test]
    async fn test_top_headlines_parses_single_article() {
        let client = ArticleClient::with_transport("key", CannedTransport::status(200, ONE_ARTICLE));
        let articles = client
            .fetch_top_headlines(&ArticleQuery::new().term("bitcoin"))
            .await
            .unwrap();

        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.url.as_deref(), Some("https://bbc.co.uk/news/1"));
        assert_eq!(a.source.as_deref(), Some("BBC News"));
        assert_eq!(a.author.as_deref(), Some("John Doe"));
        assert_eq!(a.title.as_deref(), Some("Bitcoin hits new high"));
        assert_eq!(a.description.as_deref(), Some("Prices surge"));
        assert_eq!(a.published_at.as_deref(), Some("2024-10-24T12:00:00Z"));
        assert_eq!(a.content.as_deref(), Some("Full article content"));

        let seen = client.transport.seen.borrow();
        assert_eq!(seen[0].0, "https://newsapi.org/v2/top-headlines");
        assert_eq!(param(&seen[0].1, "apiKey"), Some("key"));
    }

    #[tokio::test]
    async fn test_query_reaches_transport() {
        let query = ArticleQuery::new()
            .terms(["bitcoin", "crypto"])
            .date("2024-10-20")
            .domains(["bbc.co.uk", "cnn.com"])
            .language("en");

        let client = ArticleClient::with_transport("key", CannedTransport::status(200, ONE_ARTICLE));
        client.fetch_top_headlines(&query).await.unwrap();
        client.fetch_everything(&query).await.unwrap();

        let seen = client.transport.seen.borrow();
        assert_eq!(seen.len(), 2);
        for (_, params) in seen.iter() {
            assert_eq!(params[0], ("apiKey", "key".to_string()));
            assert_eq!(param(params, "q"), Some("bitcoin crypto"));
            assert_eq!(param(params, "from"), Some("2024-10-20"));
            assert_eq!(param(params, "domains"), Some("bbc.co.uk,cnn.com"));
            assert_eq!(param(params, "language"), Some("en"));
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = ArticleClient::new("key");
        assert_eq!(client.base_url().as_str(), "https://newsapi.org/v2/");
        assert_eq!(
            client.endpoint_url(Endpoint::Everything).unwrap().as_str(),
            "https://newsapi.org/v2/everything"
        );

        let local = ArticleClient::new("key")
            .with_base_url("http://localhost:8080/v2")
            .unwrap();
        assert_eq!(
            local.endpoint_url(Endpoint::TopHeadlines).unwrap().as_str(),
            "http://localhost:8080/v2/top-headlines"
        );
    }

    #[tokio::test]
    async fn test_everything_uses_everything_endpoint() {
        let client = ArticleClient::with_transport("key", CannedTransport::status(200, ONE_ARTICLE));
        let articles = client.fetch_everything(&ArticleQuery::new()).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source.as_deref(), Some("BBC News"));
        assert_eq!(
            client.transport.seen.borrow()[0].0,
            "https://newsapi.org/v2/everything"
        );
    }

    #[tokio::test]
    async fn test_non_success_yields_empty_result() {
        for status in [400u16, 401, 429, 500] {
            let body = r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#;
            let client = ArticleClient::with_transport("bad", CannedTransport::status(status, body));
            assert!(client.fetch_top_headlines(&ArticleQuery::new()).await.unwrap().is_empty());
            assert!(client.fetch_everything(&ArticleQuery::new()).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_request_surfaces_remote_rejection() {
        let client = ArticleClient::with_transport("bad", CannedTransport::status(401, "{}"));
        let err = client
            .request(Endpoint::Everything, &ArticleQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::RemoteRejection { status: 401 }));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = ArticleClient::with_transport("key", CannedTransport::failing("dns error"));
        let err = client
            .fetch_everything(&ArticleQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::TransportFailure(ref m) if m == "dns error"));
    }

    #[tokio::test]
    async fn test_missing_articles_key_is_malformed() {
        let client = ArticleClient::with_transport("key", CannedTransport::status(200, r#"{"status":"ok"}"#));
        let err = client
            .fetch_top_headlines(&ArticleQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_articles_with_missing_fields_map_to_none() {
        let body = r#"{"articles": [{"title": "Only title"}, {}]}"#;
        let client = ArticleClient::with_transport("key", CannedTransport::status(200, body));
        let articles = client.fetch_everything(&ArticleQuery::new()).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("Only title"));
        assert!(articles[0].source.is_none());
        assert_eq!(articles[1], ArticleRecord::default());
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let client = ArticleClient::with_transport("key", CannedTransport::status(200, ONE_ARTICLE))
            .with_base_url("http://localhost:8080/v2/")
            .unwrap();
        client.fetch_everything(&ArticleQuery::new()).await.unwrap();
        assert_eq!(
            client.transport.seen.borrow()[0].0,
            "http://localhost:8080/v2/everything"
        );
    }

    #[tokio::test]
    async fn test_reqwest_connection_refused_is_transport_failure() {
        let client = ArticleClient::new("key")
            .with_base_url("http://127.0.0.1:9/v2")
            .unwrap();
        let err = client
            .fetch_top_headlines(&ArticleQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::TransportFailure(_)));
    }

    #[test]
    fn test_from_key_file_trims_whitespace() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  test_key_with_spaces  \n").unwrap();
        let client = ArticleClient::from_key_file(file.path()).unwrap();
        assert_eq!(client.api_key(), "test_key_with_spaces");
    }

    #[test]
    fn test_whitespace_only_key_file_gives_empty_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t ").unwrap();
        let client = ArticleClient::from_key_file(file.path()).unwrap();
        assert_eq!(client.api_key(), "");
    }

    #[test]
    fn test_missing_key_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArticleClient::from_key_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, NewsError::CredentialSourceUnavailable { .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = ArticleClient::new("super-secret");
        let dbg = format!("{:?}", client);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("newsapi.org"));
    }
}
