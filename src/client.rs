//! Handler of pageview query operations.
//!
//! This module defines two structs, [`Client`] and [`ClientBuilder`].
//! `Client` translates high-level queries (article lists, project lists,
//! ranking requests) into one API request per entity and aggregates the
//! responses. `ClientBuilder` exposes a finer level of granularity for
//! building a `Client`.
//!
//! For convenience, a free function [`article_views`] is provided for ad-hoc
//! queries.
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{Datelike, Utc};
use futures::{stream, StreamExt};
use http::{
    header::{HeaderMap, HeaderValue},
    StatusCode,
};
use log::{debug, warn};
use reqwest::header;
use tokio::time::{timeout_at, Instant};
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    types::{TopResponse, ViewsResponse},
    ErrorKind, QueryOptions, Result, Status, TopArticle, TopOptions,
};

/// Base URL of the Wikimedia pageviews REST API.
pub const DEFAULT_BASE_URL: &str = "https://wikimedia.org/api/rest_v1/metrics/pageviews";
/// Default number of queries dispatched in parallel, 5.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;
/// Default timeout in seconds before a single request is deemed as failed, 20.
pub const DEFAULT_TIMEOUT: u64 = 20;
/// Default user agent, `pageviews-<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("pageviews/", env!("CARGO_PKG_VERSION"));

/// Builder for [`Client`].
///
/// See crate-level documentation for usage example.
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(default, setter(into)))]
#[builder(builder_method(doc = "
Create a builder for building `ClientBuilder`.

On the builder call, call methods with same name as its fields to set their values.

Finally, call `.build()` to create the instance of `ClientBuilder`.
"))]
pub struct ClientBuilder {
    /// Base URL of the pageviews API.
    ///
    /// Points at the public Wikimedia endpoint by default; override it to
    /// talk to a mirror or a mock server.
    #[builder(default = String::from(DEFAULT_BASE_URL))]
    base_url: String,
    /// User-agent used for queries.
    ///
    /// The Wikimedia APIs ask for a descriptive user agent with contact
    /// information, so set this to something identifying your tool.
    #[builder(default = String::from(DEFAULT_USER_AGENT))]
    user_agent: String,
    /// Sets the default [headers] for every request.
    ///
    /// [headers]: https://docs.rs/http/latest/http/header/struct.HeaderName.html
    custom_headers: HeaderMap,
    /// Response timeout per request.
    #[builder(default = Some(Duration::from_secs(DEFAULT_TIMEOUT)))]
    timeout: Option<Duration>,
    /// Overall time budget for one batch query.
    ///
    /// When the budget runs out, the batch stops waiting and every entity
    /// whose request did not complete reports [`Status::Timeout`]. Without a
    /// deadline a batch is still bounded by the per-request `timeout`.
    deadline: Option<Duration>,
    /// Maximum number of requests in flight at any instant.
    #[builder(default = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,
}

impl Default for ClientBuilder {
    #[must_use]
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientBuilder {
    /// Instantiates a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The base URL or the user-agent is invalid.
    /// - The concurrency limit is zero.
    /// - The request client cannot be created.
    ///   See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn client(self) -> Result<Client> {
        let Self {
            base_url,
            user_agent,
            custom_headers: mut headers,
            timeout,
            deadline,
            max_concurrency,
        } = self;

        if max_concurrency == 0 {
            return Err(ErrorKind::InvalidConcurrency(max_concurrency));
        }

        let base_url = Url::parse(&base_url)
            .map_err(|e| ErrorKind::InvalidBaseUrl(base_url.clone(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ErrorKind::InvalidBaseUrl(
                base_url.to_string(),
                "cannot be a base".to_string(),
            ));
        }

        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(ErrorKind::InvalidHeader)?,
        );

        let builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers);

        let reqwest_client = (match timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        })
        .build()
        .map_err(ErrorKind::BuildRequestClient)?;

        Ok(Client {
            reqwest_client,
            base_url,
            deadline,
            max_concurrency,
        })
    }
}

/// Handles pageview queries and aggregates the per-entity responses.
///
/// See [`ClientBuilder`] which contains sane defaults for all configuration
/// options.
#[derive(Debug, Clone)]
pub struct Client {
    /// Underlying `reqwest` client instance that handles the HTTP requests.
    reqwest_client: reqwest::Client,
    /// Base URL all endpoint paths are joined onto.
    base_url: Url,
    /// Overall time budget for one batch query.
    deadline: Option<Duration>,
    /// Maximum number of requests in flight at any instant.
    max_concurrency: usize,
}

impl Client {
    /// Get view counts for one or more articles of a project.
    ///
    /// Each article is fetched with its own API request; requests are
    /// dispatched concurrently, bounded by the configured
    /// `max_concurrency`. The result maps every requested article title to
    /// its [`Status`]: the total view count over the requested range,
    /// [`Status::NotFound`] if the API has no data for the title, or an
    /// error marker if that article's request failed. A failure for one
    /// article never aborts the others.
    ///
    /// Keys are the caller's article strings, exactly as requested.
    /// Duplicate titles collapse to a single key and a single request.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if `project` is empty, `articles` is empty, or any
    /// article title is empty. Per-article failures are reported in the
    /// result map instead.
    pub async fn article_views<S: AsRef<str>>(
        &self,
        project: &str,
        articles: &[S],
        options: &QueryOptions,
    ) -> Result<HashMap<String, Status>> {
        if project.is_empty() {
            return Err(ErrorKind::EmptyProject);
        }
        if articles.is_empty() {
            return Err(ErrorKind::EmptyArticleList);
        }

        let range = options.range.unwrap_or_default();
        let start = range.start_timestamp();
        let end = range.end_timestamp();

        let mut jobs = Vec::with_capacity(articles.len());
        let mut seen = HashSet::with_capacity(articles.len());
        for article in articles {
            let article = article.as_ref();
            if article.is_empty() {
                return Err(ErrorKind::EmptyArticle);
            }
            if !seen.insert(article) {
                continue;
            }
            let url = self.endpoint_url(&[
                "per-article",
                project,
                options.access.as_ref(),
                options.agent.as_ref(),
                article,
                options.granularity.as_ref(),
                &start,
                &end,
            ])?;
            jobs.push((article.to_owned(), url));
        }

        Ok(self.fetch_batch(jobs).await)
    }

    /// Get view counts for one or more projects.
    ///
    /// Same concurrency and aggregation contract as
    /// [`article_views`](Client::article_views), keyed by project domain
    /// (e.g. `en.wikipedia`); one request per project against the aggregate
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if `projects` is empty or contains an empty domain.
    pub async fn project_views<S: AsRef<str>>(
        &self,
        projects: &[S],
        options: &QueryOptions,
    ) -> Result<HashMap<String, Status>> {
        if projects.is_empty() {
            return Err(ErrorKind::EmptyProjectList);
        }

        let range = options.range.unwrap_or_default();
        let start = range.start_timestamp();
        let end = range.end_timestamp();

        let mut jobs = Vec::with_capacity(projects.len());
        let mut seen = HashSet::with_capacity(projects.len());
        for project in projects {
            let project = project.as_ref();
            if project.is_empty() {
                return Err(ErrorKind::EmptyProject);
            }
            if !seen.insert(project) {
                continue;
            }
            let url = self.endpoint_url(&[
                "aggregate",
                project,
                options.access.as_ref(),
                options.agent.as_ref(),
                options.granularity.as_ref(),
                &start,
                &end,
            ])?;
            jobs.push((project.to_owned(), url));
        }

        Ok(self.fetch_batch(jobs).await)
    }

    /// Get the ranking of most-viewed articles for a project on one day.
    ///
    /// A single API request; the ranking is returned in descending view
    /// count order, ties broken by article title, truncated to
    /// `options.limit` entries. A project unknown to the API yields an empty
    /// ranking.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if `project` is empty, `options.limit` is zero, or
    /// the request fails.
    pub async fn top_articles(
        &self,
        project: &str,
        options: &TopOptions,
    ) -> Result<Vec<TopArticle>> {
        if project.is_empty() {
            return Err(ErrorKind::EmptyProject);
        }
        if options.limit == 0 {
            return Err(ErrorKind::InvalidLimit(options.limit));
        }

        let date = options.date.unwrap_or_else(|| Utc::now().date_naive());
        let url = self.endpoint_url(&[
            "top",
            project,
            options.access.as_ref(),
            &date.year().to_string(),
            &format!("{:02}", date.month()),
            &format!("{:02}", date.day()),
        ])?;

        debug!("fetching top articles from {url}");
        let response = self
            .reqwest_client
            .get(url)
            .send()
            .await
            .map_err(ErrorKind::NetworkRequest)?;

        let code = response.status();
        if code == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !code.is_success() {
            return Err(ErrorKind::RejectedStatusCode(code));
        }

        let body: TopResponse = response
            .json()
            .await
            .map_err(ErrorKind::DecodeResponseBody)?;

        let mut articles = body.into_articles();
        articles.sort_unstable_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then_with(|| a.article.cmp(&b.article))
        });
        articles.truncate(options.limit);
        Ok(articles)
    }

    /// Dispatch one request per job, at most `max_concurrency` in flight,
    /// and assemble the outcomes by key.
    ///
    /// The result map is pre-filled with [`Status::Timeout`] for every key;
    /// each completed request overwrites its own slot, so the key set always
    /// equals the job set, even when the deadline cuts the batch short.
    async fn fetch_batch(&self, jobs: Vec<(String, Url)>) -> HashMap<String, Status> {
        debug!(
            "dispatching {} queries, {} at a time",
            jobs.len(),
            self.max_concurrency
        );

        let mut results: HashMap<String, Status> = jobs
            .iter()
            .map(|(key, _)| (key.clone(), Status::Timeout))
            .collect();

        let deadline = self.deadline.map(|budget| Instant::now() + budget);
        let mut in_flight = stream::iter(jobs)
            .map(|(key, url)| async move { (key, self.fetch_views(url).await) })
            .buffer_unordered(self.max_concurrency);

        loop {
            let next = match deadline {
                Some(at) => match timeout_at(at, in_flight.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!("deadline expired, abandoning unfinished queries");
                        break;
                    }
                },
                None => in_flight.next().await,
            };
            match next {
                Some((key, status)) => {
                    results.insert(key, status);
                }
                None => break,
            }
        }

        results
    }

    /// Fetch one timeseries and total it up.
    async fn fetch_views(&self, url: Url) -> Status {
        debug!("fetching {url}");
        let response = match self.reqwest_client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return e.into(),
        };

        let code = response.status();
        if code == StatusCode::NOT_FOUND {
            return Status::NotFound;
        }
        if !code.is_success() {
            warn!("{url} answered with status {code}");
            return Status::Error(ErrorKind::RejectedStatusCode(code));
        }

        match response.json::<ViewsResponse>().await {
            Ok(body) => Status::Views(body.total()),
            Err(e) => e.into(),
        }
    }

    /// Join endpoint path segments onto the base URL.
    ///
    /// Each segment is percent-encoded individually, so article titles with
    /// spaces, slashes or non-ASCII characters stay one path segment.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ErrorKind::InvalidBaseUrl(
                    self.base_url.to_string(),
                    "cannot be a base".to_string(),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// A convenience function to get view counts for articles with default
/// options.
///
/// This provides the simplest query utility without having to create a
/// [`Client`]. For more complex scenarios, see documentation of
/// [`ClientBuilder`] instead.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The request client cannot be built (see [`ClientBuilder::client`] for failure cases).
/// - The query arguments are invalid (see [`Client::article_views`] for failure cases).
pub async fn article_views<S: AsRef<str>>(
    project: &str,
    articles: &[S],
) -> Result<HashMap<String, Status>> {
    let client = ClientBuilder::builder().build().client()?;
    client
        .article_views(project, articles, &QueryOptions::default())
        .await
}
