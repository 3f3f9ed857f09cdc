//! Core types for the gridgate PJM Markets Gateway client.
//!
//! This crate provides the fundamental data structures used throughout
//! gridgate:
//!
//! - [`ChunkBuffer`] - Growable byte buffer with a read cursor, shared by
//!   the outbound request and inbound response paths
//! - [`HourlyResult`] - One hourly market-clearing record
//! - [`FieldIssue`] - Field-level problems recovered with defaults
//! - [`DayWindow`] - The yesterday/today/tomorrow query windows
//! - [`GatewayError`] - Workspace-level error taxonomy

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chunk;
mod error;
mod record;
mod window;

pub use chunk::ChunkBuffer;
pub use error::{GatewayError, Result};
pub use record::{FieldIssue, HourlyResult, LOCATION_MAX};
pub use window::DayWindow;
