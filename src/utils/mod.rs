//! Utility modules supporting the ComicVine flows.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and user agent
//! - [`Throttle`] / [`SignalThrottle`]: fixed-delay pacing between requests,
//!   cut short by a shared Ctrl-C [`Interrupt`]
//! - [`mask_api_key`] / [`redact_url`]: keep API keys out of logs and errors
//! - [`issues_table`] / [`detail_table`]: terminal rendering for the CLI
//!
//! # Pacing
//!
//! ```rust,no_run
//! use comicvine_metadata::utils::{SignalThrottle, Throttle};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! SignalThrottle::new().pause(Duration::from_secs(1)).await?;
//! # Ok(())
//! # }
//! ```

mod display;
mod http;
mod redact;
mod throttle;

pub use display::{detail_table, issues_table, truncate_with_ellipsis};
pub use http::{HttpClient, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
pub use redact::{mask_api_key, redact_url};
pub use throttle::{Interrupt, SignalThrottle, Throttle};
