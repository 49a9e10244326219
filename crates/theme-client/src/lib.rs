//! REST client for the dashboard theme API
//!
//! Provides a reqwest based client with exponential backoff on network
//! failures, and [`remote::RemoteThemeRepository`], the remote backend of
//! the theme repository interface.
//!
//! # Example
//!
//! ```rust,no_run
//! use theme_client::{ClientConfig, RemoteThemeRepository, RestClient};
//! use storage::ThemeRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RestClient::new(ClientConfig::new("https://stats.example.com"))?;
//!     let remote = RemoteThemeRepository::new(client);
//!
//!     let names = remote.list().await?;
//!     println!("{} remote themes", names.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod remote;
pub mod retry;

pub use client::{ApiRequest, ClientConfig, HttpMethod, RestClient};
pub use error::{ClientError, Result};
pub use remote::RemoteThemeRepository;
pub use retry::{network_retry, retry, RetryConfig};
