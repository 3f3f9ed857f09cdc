//! Streaming XML ingestion pipeline for the gridgate Markets Gateway
//! client.
//!
//! This crate provides the event-driven half of the response path:
//!
//! - [`ElementHandler`] - The three-callback interface (open/close/text)
//!   implemented by consumers of the token stream
//! - [`StreamingXmlParser`] - Incremental push parser that accepts bytes
//!   in transport-sized chunks and dispatches events as complete tokens
//!   are recognized
//! - [`MarketResultsExtractor`] - Handler state machine that rebuilds
//!   [`HourlyResult`](gridgate_types::HourlyResult) records from the
//!   event stream

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod extract;
mod handler;
mod parser;

pub use extract::MarketResultsExtractor;
pub use handler::ElementHandler;
pub use parser::{ParseError, StreamingXmlParser};
