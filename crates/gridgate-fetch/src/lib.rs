//! HTTP client, authentication and query orchestration for the gridgate
//! Markets Gateway client.
//!
//! This crate provides the exchange pipeline:
//!
//! - [`Environment`] - Sandbox vs. production endpoint selection
//! - [`GatewayClient`] - HTTP client with a bounded per-exchange timeout
//! - [`authenticate`] - OpenAM session-token acquisition
//! - [`OutboundBody`] / [`collect_response`] - Transfer adapters between
//!   the shared byte buffer and the transport
//! - [`run_query`] / [`run_all_windows`] - Per-window query orchestration
//!   feeding response bytes straight into the streaming parser

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod client;
mod endpoint;
mod query;
mod transfer;

pub use auth::{AuthError, Credentials, SessionToken, authenticate, extract_token};
pub use client::{ClientConfig, GatewayClient};
pub use endpoint::Environment;
pub use query::{QueryError, QuerySpec, WindowOutcome, run_all_windows, run_query};
pub use transfer::{OutboundBody, TRANSFER_CHUNK, collect_response};
