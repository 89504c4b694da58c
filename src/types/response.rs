use serde::{Deserialize, Serialize};

/// One time bucket of a per-article or per-project timeseries.
///
/// The API returns more fields (project, access, agent, timestamp), but only
/// the count matters for totalling a range.
#[derive(Debug, Deserialize)]
pub(crate) struct ViewsItem {
    pub(crate) views: u64,
}

/// Response shape shared by the per-article and aggregate endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ViewsResponse {
    #[serde(default)]
    pub(crate) items: Vec<ViewsItem>,
}

impl ViewsResponse {
    /// Total view count over all returned time buckets.
    pub(crate) fn total(&self) -> u64 {
        self.items.iter().map(|item| item.views).sum()
    }
}

/// Response shape of the top-articles endpoint: a single item wrapping the
/// ranked article list.
#[derive(Debug, Deserialize)]
pub(crate) struct TopResponse {
    #[serde(default)]
    items: Vec<TopItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopItem {
    #[serde(default)]
    articles: Vec<TopArticle>,
}

impl TopResponse {
    pub(crate) fn into_articles(self) -> Vec<TopArticle> {
        self.items
            .into_iter()
            .next()
            .map(|item| item.articles)
            .unwrap_or_default()
    }
}

/// A single row of a top-articles ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArticle {
    /// Article title as reported by the API
    pub article: String,
    /// View count for the ranked day
    pub views: u64,
    /// Position in the upstream ranking (if reported)
    #[serde(default)]
    pub rank: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_views_total() {
        let response: ViewsResponse = serde_json::from_value(serde_json::json!({
            "items": [
                {
                    "project": "en.wikipedia",
                    "article": "Selfie",
                    "granularity": "daily",
                    "timestamp": "2024010100",
                    "access": "all-access",
                    "agent": "all-agents",
                    "views": 600
                },
                { "views": 400 }
            ]
        }))
        .unwrap();
        assert_eq!(response.total(), 1000);
    }

    #[test]
    fn test_views_empty_items() {
        let response: ViewsResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(response.total(), 0);
    }

    #[test]
    fn test_top_articles_nested_shape() {
        let response: TopResponse = serde_json::from_value(serde_json::json!({
            "items": [{
                "project": "en.wikipedia",
                "access": "all-access",
                "year": "2024",
                "month": "01",
                "day": "15",
                "articles": [
                    { "article": "Main_Page", "views": 1000, "rank": 1 },
                    { "article": "Selfie", "views": 500, "rank": 2 }
                ]
            }]
        }))
        .unwrap();

        let articles = response.into_articles();
        assert_eq!(
            articles,
            vec![
                TopArticle {
                    article: "Main_Page".to_owned(),
                    views: 1000,
                    rank: Some(1),
                },
                TopArticle {
                    article: "Selfie".to_owned(),
                    views: 500,
                    rank: Some(2),
                },
            ]
        );
    }

    #[test]
    fn test_top_articles_missing_items() {
        let response: TopResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.into_articles().is_empty());
    }
}
