use chrono::{Days, NaiveDate, Utc};
use strum::{AsRefStr, Display};
use typed_builder::TypedBuilder;

use crate::{ErrorKind, Result};

/// Default number of entries returned by a top-articles ranking, 1000.
pub const DEFAULT_TOP_LIMIT: usize = 1000;

/// Number of days a date range covers when none is given, 30.
const DEFAULT_RANGE_DAYS: u64 = 30;

/// Access method filter for pageview queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Access {
    /// Views from all access methods combined
    #[default]
    AllAccess,
    /// Desktop site views only
    Desktop,
    /// Mobile website views only
    MobileWeb,
    /// Mobile app views only
    MobileApp,
}

/// User agent type filter for pageview queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Agent {
    /// Views from all agent types combined
    #[default]
    AllAgents,
    /// Human readers
    User,
    /// Search engine crawlers
    Spider,
    /// Self-identified bots
    Bot,
}

/// Time-bucket size used when aggregating pageview counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Granularity {
    /// One bucket per hour
    Hourly,
    /// One bucket per day
    #[default]
    Daily,
    /// One bucket per month
    Monthly,
}

/// An inclusive range of dates a query covers.
///
/// The API addresses time by `YYYYMMDDHH` timestamps; a `DateRange` always
/// renders its bounds with the hour fixed to `00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the range
    pub start: NaiveDate,
    /// Last day of the range
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new date range.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if `start` lies after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ErrorKind::InvalidDateRange(start, end));
        }
        Ok(Self { start, end })
    }

    /// The range covering the last `days` days, ending today (UTC).
    #[must_use]
    pub fn last_days(days: u64) -> Self {
        let end = Utc::now().date_naive();
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Parse a range from two `YYYYMMDD` or `YYYYMMDDHH` timestamps.
    ///
    /// The hour part is accepted for compatibility with the API's timestamp
    /// format, but ignored; ranges are resolved at day precision.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if either timestamp is malformed or if the parsed
    /// start lies after the parsed end.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub(crate) fn start_timestamp(&self) -> String {
        timestamp(self.start)
    }

    pub(crate) fn end_timestamp(&self) -> String {
        timestamp(self.end)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::last_days(DEFAULT_RANGE_DAYS)
    }
}

fn timestamp(date: NaiveDate) -> String {
    date.format("%Y%m%d00").to_string()
}

fn parse_timestamp(s: &str) -> Result<NaiveDate> {
    let digits = match s.len() {
        8 | 10 => s.get(..8).ok_or_else(|| ErrorKind::InvalidDate(s.to_owned()))?,
        _ => return Err(ErrorKind::InvalidDate(s.to_owned())),
    };
    NaiveDate::parse_from_str(digits, "%Y%m%d").map_err(|_| ErrorKind::InvalidDate(s.to_owned()))
}

/// Parameters for [`article_views`] and [`project_views`] queries.
///
/// All fields have documented defaults, so `QueryOptions::default()` asks
/// for daily view counts across all access methods and agent types over the
/// last 30 days.
///
/// [`article_views`]: crate::Client::article_views
/// [`project_views`]: crate::Client::project_views
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(default, setter(into)))]
pub struct QueryOptions {
    /// Access method filter, `all-access` by default
    pub access: Access,
    /// Agent type filter, `all-agents` by default
    pub agent: Agent,
    /// Aggregation bucket size, `daily` by default
    pub granularity: Granularity,
    /// Date range to cover; the last 30 days when `None`
    pub range: Option<DateRange>,
}

impl Default for QueryOptions {
    #[must_use]
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parameters for [`top_articles`] queries.
///
/// [`top_articles`]: crate::Client::top_articles
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(default, setter(into)))]
pub struct TopOptions {
    /// Access method filter, `all-access` by default
    pub access: Access,
    /// Day the ranking covers; today (UTC) when `None`
    pub date: Option<NaiveDate>,
    /// Maximum number of entries to return, 1000 by default
    #[builder(default = DEFAULT_TOP_LIMIT)]
    pub limit: usize,
}

impl Default for TopOptions {
    #[must_use]
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}
