use std::fmt::Display;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::ErrorKind;

/// Outcome of a single pageview query.
///
/// Every requested entity (article or project) ends up with exactly one
/// `Status` in the result map, so "zero views", "no data for this entity"
/// and "request failed" stay distinguishable.
#[derive(Debug, PartialEq, Eq)]
pub enum Status {
    /// Total view count over the requested range
    Views(u64),
    /// The API has no data for the entity
    NotFound,
    /// The request did not complete in time
    Timeout,
    /// Failed request
    Error(ErrorKind),
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Views(views) => write!(f, "{views}"),
            Status::NotFound => f.write_str("not found"),
            Status::Timeout => f.write_str("timeout"),
            Status::Error(e) => write!(f, "{e}"),
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s;

        match self {
            Status::Views(views) => {
                s = serializer.serialize_struct("Status", 2)?;
                s.serialize_field("text", "ok")?;
                s.serialize_field("views", views)?;
            }
            Status::NotFound => {
                s = serializer.serialize_struct("Status", 1)?;
                s.serialize_field("text", "not found")?;
            }
            Status::Timeout => {
                s = serializer.serialize_struct("Status", 1)?;
                s.serialize_field("text", "timeout")?;
            }
            Status::Error(e) => {
                s = serializer.serialize_struct("Status", 2)?;
                s.serialize_field("text", "error")?;
                s.serialize_field("details", &e.to_string())?;
            }
        }

        s.end()
    }
}

impl Status {
    #[inline]
    #[must_use]
    /// Returns `true` if the query was successful
    pub const fn is_success(&self) -> bool {
        matches!(self, Status::Views(_))
    }

    #[inline]
    #[must_use]
    /// Returns `true` if the API has no data for the entity
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Status::NotFound)
    }

    #[inline]
    #[must_use]
    /// Returns `true` if a query took too long to complete
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Status::Timeout)
    }

    #[inline]
    #[must_use]
    /// Returns `true` if the query was not successful
    pub const fn is_error(&self) -> bool {
        matches!(self, Status::Error(_) | Status::Timeout)
    }

    #[must_use]
    /// Return the total view count (if any)
    pub const fn views(&self) -> Option<u64> {
        match self {
            Status::Views(views) => Some(*views),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Status {
    fn from(e: ErrorKind) -> Self {
        Self::Error(e)
    }
}

impl From<reqwest::Error> for Status {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_builder() {
            Self::Error(ErrorKind::BuildRequestClient(e))
        } else if e.is_body() || e.is_decode() {
            Self::Error(ErrorKind::DecodeResponseBody(e))
        } else {
            Self::Error(ErrorKind::NetworkRequest(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, Status};
    use http::StatusCode;

    #[test]
    fn test_status_serialization() {
        let status_views = Status::Views(1000);
        let serialized_with_views = serde_json::to_string(&status_views).unwrap();
        assert_eq!("{\"text\":\"ok\",\"views\":1000}", serialized_with_views);

        let status_timeout = Status::Timeout;
        let serialized_without_views = serde_json::to_string(&status_timeout).unwrap();
        assert_eq!("{\"text\":\"timeout\"}", serialized_without_views);
    }

    #[test]
    fn test_status_predicates() {
        assert!(Status::Views(0).is_success());
        assert!(!Status::Views(0).is_error());
        assert!(Status::NotFound.is_not_found());
        assert!(!Status::NotFound.is_error());
        assert!(Status::Timeout.is_timeout());
        assert!(Status::Timeout.is_error());
        assert!(
            Status::Error(ErrorKind::RejectedStatusCode(StatusCode::BAD_GATEWAY)).is_error()
        );
    }

    #[test]
    fn test_views_accessor() {
        assert_eq!(Status::Views(42).views(), Some(42));
        assert_eq!(Status::NotFound.views(), None);
        assert_eq!(Status::Timeout.views(), None);
    }
}
