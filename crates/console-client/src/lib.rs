//! Registrar Console Client Library
//!
//! Provides a typed HTTP client for the registrar administration console's
//! backend API: contacts, domains, registrars, security settings, EPP
//! passwords, user data and WHOIS fields.
//!
//! # Example
//!
//! ```rust,no_run
//! use console_client::{ConsoleClient, DomainListQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ConsoleClient::new("https://registry.example")?;
//!
//!     // Who am I, and which registrars can I see?
//!     let user = client.fetch_user_data().await?;
//!     let registrars = client.fetch_registrars().await?;
//!
//!     // Second page of domains matching "example"
//!     let query = DomainListQuery::new("TheRegistrar")
//!         .page_number(2)
//!         .results_per_page(25)
//!         .search_term("example");
//!     let page = client.fetch_domains(&query).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error handling
//!
//! Reads share one failure handler ([`ConsoleClient::catch_error`]): the
//! error is logged, a failure that ended up on the legacy console path
//! triggers the configured [`Navigator`], and a fallback value, when given
//! through [`ConsoleClient::get_json`], replaces the error. Writes return
//! errors as they come.
//!
//! # Testing
//!
//! The `testing` module provides an in-process server harness:
//!
//! ```rust,ignore
//! use console_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let user = server.client.fetch_user_data().await?;
//! assert_eq!(server.navigator.count(), 0);
//! ```

mod client;
mod error;
pub mod navigation;
pub mod testing;
mod types;

pub use client::{ConsoleClient, DEFAULT_API_PREFIX, DEFAULT_LEGACY_REDIRECT_PATH};
pub use error::{ConsoleClientError, Result};
pub use navigation::{Navigator, TracingNavigator};
pub use types::*;
