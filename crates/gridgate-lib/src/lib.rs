//! Rust client for the PJM Markets Gateway web service.
//!
//! This is a facade crate that re-exports functionality from the
//! gridgate workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use gridgate_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_env()?;
//!     let client = GatewayClient::with_defaults()?;
//!     let token = authenticate(&client, &credentials).await?;
//!
//!     for outcome in run_all_windows(&client, &token).await {
//!         match outcome.outcome {
//!             Ok(records) => println!("{}: {} records", outcome.window, records.len()),
//!             Err(err) => eprintln!("{}: {err}", outcome.window),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use gridgate_types::*;

// Re-export the streaming XML pipeline
pub use gridgate_xml::{ElementHandler, MarketResultsExtractor, ParseError, StreamingXmlParser};

// Re-export the HTTP layer and orchestration
pub use gridgate_fetch::{
    AuthError, ClientConfig, Credentials, Environment, GatewayClient, OutboundBody, QueryError,
    QuerySpec, SessionToken, WindowOutcome, authenticate, collect_response, extract_token,
    run_all_windows, run_query,
};

/// Prelude module for convenient imports.
///
/// ```
/// use gridgate_lib::prelude::*;
/// ```
pub mod prelude {
    pub use gridgate_types::{
        ChunkBuffer, DayWindow, FieldIssue, GatewayError, HourlyResult, Result,
    };

    pub use gridgate_xml::{ElementHandler, MarketResultsExtractor, StreamingXmlParser};

    pub use gridgate_fetch::{
        ClientConfig, Credentials, Environment, GatewayClient, QuerySpec, SessionToken,
        WindowOutcome, authenticate, run_all_windows, run_query,
    };
}
