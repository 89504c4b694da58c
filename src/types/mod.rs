#![allow(unreachable_pub)]

mod error;
mod params;
mod response;
mod status;

pub use error::ErrorKind;
pub use params::{
    Access, Agent, DateRange, Granularity, QueryOptions, TopOptions, DEFAULT_TOP_LIMIT,
};
pub use response::TopArticle;
pub(crate) use response::{TopResponse, ViewsResponse};
pub use status::Status;

/// The pageviews `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
