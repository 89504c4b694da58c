use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[macro_export]
/// Creates a mock API server, which responds with a predefined status to any
/// GET request
macro_rules! mock_server {
    ($status:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let template = wiremock::ResponseTemplate::new($status)$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// A client wired to the given mock server with default settings otherwise.
pub(crate) fn mock_client(server: &MockServer) -> crate::Client {
    crate::ClientBuilder::builder()
        .base_url(server.uri())
        .build()
        .client()
        .expect("client should build against the mock server")
}

/// JSON body of a per-article or aggregate response with one item per count.
pub(crate) fn views_body(counts: &[u64]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = counts
        .iter()
        .map(|views| serde_json::json!({ "views": views }))
        .collect();
    serde_json::json!({ "items": items })
}

/// Mounts a per-article mock returning one time bucket per count.
pub(crate) async fn mount_article(server: &MockServer, article: &str, counts: &[u64]) {
    Mock::given(method("GET"))
        .and(path_regex(format!("^/per-article/.+/{article}/.+")))
        .respond_with(ResponseTemplate::new(200).set_body_json(views_body(counts)))
        .mount(server)
        .await;
}

/// Mounts a per-article mock answering with a bare status code.
pub(crate) async fn mount_article_status(
    server: &MockServer,
    article: &str,
    status: http::StatusCode,
) {
    Mock::given(method("GET"))
        .and(path_regex(format!("^/per-article/.+/{article}/.+")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts an aggregate mock for one project returning one bucket per count.
pub(crate) async fn mount_aggregate(server: &MockServer, project: &str, counts: &[u64]) {
    Mock::given(method("GET"))
        .and(path_regex(format!("^/aggregate/{project}/.+")))
        .respond_with(ResponseTemplate::new(200).set_body_json(views_body(counts)))
        .mount(server)
        .await;
}

/// Mounts a top-articles mock from `(article, views, rank)` rows.
pub(crate) async fn mount_top(server: &MockServer, articles: &[(&str, u64, u32)]) {
    let articles: Vec<serde_json::Value> = articles
        .iter()
        .map(|(article, views, rank)| {
            serde_json::json!({ "article": article, "views": views, "rank": rank })
        })
        .collect();
    let body = serde_json::json!({ "items": [{ "articles": articles }] });
    Mock::given(method("GET"))
        .and(path_regex("^/top/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
