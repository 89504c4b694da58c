//! `pageviews` is an async client for the Wikimedia pageviews REST API.
//! "Hello world" example:
//! ```no_run
//! use pageviews::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let views = pageviews::article_views("en.wikipedia", &["Rust_(programming_language)"]).await?;
//!   println!("{:?}", views);
//!   Ok(())
//! }
//! ```
//!
//! For more specific use-cases you can build a pageviews client yourself,
//! using the `ClientBuilder` which grants full flexibility over base URL,
//! concurrency, timeouts and query parameters:
//!
//! ```no_run
//! use pageviews::{ClientBuilder, Granularity, QueryOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let client = ClientBuilder::builder()
//!       .max_concurrency(2_usize)
//!       .build()
//!       .client()?;
//!   let options = QueryOptions::builder()
//!       .granularity(Granularity::Monthly)
//!       .build();
//!   let views = client
//!       .project_views(&["en.wikipedia", "de.wikipedia"], &options)
//!       .await?;
//!   assert_eq!(views.len(), 2);
//!   Ok(())
//! }
//! ```

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

mod client;
mod types;

#[cfg(test)]
#[macro_use]
pub mod test_utils;

pub use client::article_views;
pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENCY, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use types::*;
