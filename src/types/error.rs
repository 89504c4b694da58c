use chrono::NaiveDate;
use http::StatusCode;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Possible errors when interacting with the pageviews API
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Network error while connecting to the API endpoint
    #[error("Network error while connecting to the pageviews API")]
    NetworkRequest(#[source] reqwest::Error),
    /// The response body could not be read or decoded as JSON
    #[error("Error decoding pageviews API response body")]
    DecodeResponseBody(#[source] reqwest::Error),
    /// The underlying request client could not be created
    #[error("Error creating request client")]
    BuildRequestClient(#[source] reqwest::Error),
    /// The API answered with an unexpected status code
    #[error("Unexpected status code: {0}")]
    RejectedStatusCode(StatusCode),
    /// The given header could not be parsed.
    /// A possible error when converting a `HeaderValue` from a string or byte
    /// slice.
    #[error("Header could not be parsed")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
    /// The given string can not be used as the API base URL
    #[error("Cannot use `{0}` as API base URL: {1}")]
    InvalidBaseUrl(String, String),
    /// An empty project domain was passed to a query
    #[error("Project must not be empty")]
    EmptyProject,
    /// An empty article title was passed to a query
    #[error("Article must not be empty")]
    EmptyArticle,
    /// A query was issued without any articles
    #[error("At least one article is required")]
    EmptyArticleList,
    /// A query was issued without any projects
    #[error("At least one project is required")]
    EmptyProjectList,
    /// The requested ranking limit is not positive
    #[error("Limit must be positive, got {0}")]
    InvalidLimit(usize),
    /// The configured concurrency bound is not positive
    #[error("Concurrency limit must be positive, got {0}")]
    InvalidConcurrency(usize),
    /// The start of a date range lies after its end
    #[error("Invalid date range: start {0} is after end {1}")]
    InvalidDateRange(NaiveDate, NaiveDate),
    /// The given string is not a valid API timestamp
    #[error("Cannot parse `{0}` as a YYYYMMDD or YYYYMMDDHH timestamp")]
    InvalidDate(String),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NetworkRequest(e1), Self::NetworkRequest(e2))
            | (Self::DecodeResponseBody(e1), Self::DecodeResponseBody(e2))
            | (Self::BuildRequestClient(e1), Self::BuildRequestClient(e2)) => {
                e1.to_string() == e2.to_string()
            }
            (Self::RejectedStatusCode(c1), Self::RejectedStatusCode(c2)) => c1 == c2,
            (Self::InvalidHeader(_), Self::InvalidHeader(_)) => true,
            (Self::InvalidBaseUrl(u1, r1), Self::InvalidBaseUrl(u2, r2)) => u1 == u2 && r1 == r2,
            (Self::EmptyProject, Self::EmptyProject)
            | (Self::EmptyArticle, Self::EmptyArticle)
            | (Self::EmptyArticleList, Self::EmptyArticleList)
            | (Self::EmptyProjectList, Self::EmptyProjectList) => true,
            (Self::InvalidLimit(l1), Self::InvalidLimit(l2))
            | (Self::InvalidConcurrency(l1), Self::InvalidConcurrency(l2)) => l1 == l2,
            (Self::InvalidDateRange(s1, e1), Self::InvalidDateRange(s2, e2)) => {
                s1 == s2 && e1 == e2
            }
            (Self::InvalidDate(d1), Self::InvalidDate(d2)) => d1 == d2,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}

impl Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_equality() {
        assert_eq!(ErrorKind::EmptyProject, ErrorKind::EmptyProject);
        assert_eq!(ErrorKind::InvalidLimit(0), ErrorKind::InvalidLimit(0));
        assert_ne!(ErrorKind::InvalidLimit(0), ErrorKind::InvalidConcurrency(0));
        assert_ne!(ErrorKind::EmptyProject, ErrorKind::EmptyArticle);
        assert_eq!(
            ErrorKind::RejectedStatusCode(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorKind::RejectedStatusCode(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn test_error_serialization() {
        let serialized = serde_json::to_string(&ErrorKind::EmptyProject).unwrap();
        assert_eq!("\"Project must not be empty\"", serialized);
    }
}
