//! Query templating and per-window orchestration.

use chrono::{DateTime, Local, NaiveDate};
use futures::StreamExt;
use gridgate_types::{ChunkBuffer, DayWindow, HourlyResult};
use gridgate_xml::{MarketResultsExtractor, ParseError, StreamingXmlParser};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{GatewayClient, OutboundBody, SessionToken};

/// Errors that can occur during one query exchange.
///
/// A failed query aborts only that exchange; the orchestrator continues
/// with the remaining windows.
#[derive(Error, Debug)]
pub enum QueryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned an error status.
    #[error("gateway rejected the query with HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response XML was malformed; partial results are discarded.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Immutable descriptor for one day-window query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpec {
    /// The day window this query covers.
    pub window: DayWindow,
}

impl QuerySpec {
    /// The three fixed queries, in execution order.
    #[must_use]
    pub fn all() -> [Self; 3] {
        DayWindow::ALL.map(|window| Self { window })
    }

    /// Human-readable query name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.window.label()
    }

    /// Local midnight of the queried day, the base for hourly offsets.
    #[must_use]
    pub fn day_start(self, now: DateTime<Local>) -> DateTime<Local> {
        self.window.day_start(now)
    }

    /// Renders the full request body for this query into a buffer the
    /// outbound adapter can drain.
    #[must_use]
    pub fn request_body(self, now: DateTime<Local>) -> ChunkBuffer {
        let payload = market_results_payload(self.window.query_date(now));
        ChunkBuffer::from(envelope(&payload).as_str())
    }
}

/// Renders the query-specific payload for one market-results day.
fn market_results_payload(day: NaiveDate) -> String {
    format!(
        "<QueryMarketResults type='Demand' day='{}'><All/></QueryMarketResults>",
        day.format("%Y-%m-%d")
    )
}

/// Wraps a query payload in the transport envelope the gateway expects.
fn envelope(payload: &str) -> String {
    format!(
        "<Envelope xmlns='http://schemas.xmlsoap.org/soap/envelope/'>\
         <Body>\
         <QueryRequest xmlns='http://emkt.pjm.com/emkt/xml'>\
         {payload}\
         </QueryRequest>\
         </Body>\
         </Envelope>"
    )
}

/// Executes one query exchange and returns its hourly records.
///
/// The request body is streamed from a [`ChunkBuffer`] through the
/// outbound adapter; response bytes are fed to a fresh
/// [`StreamingXmlParser`] in the same chunks the transport delivers
/// them, with no full-response buffering. The parser and its extractor
/// state live exactly as long as this exchange.
///
/// # Errors
///
/// Returns an error on transport failure, an error status, or malformed
/// response XML. Field-level problems do not error; they are flagged on
/// the affected records.
pub async fn run_query(
    client: &GatewayClient,
    token: &SessionToken,
    spec: QuerySpec,
) -> Result<Vec<HourlyResult>, QueryError> {
    let now = Local::now();
    let day_start = spec.day_start(now);
    let body = spec.request_body(now);
    let environment = client.environment();

    debug!(query = spec.name(), url = environment.query_url(), "sending query");

    let response = client
        .http()
        .post(environment.query_url())
        .header(
            reqwest::header::COOKIE,
            format!("{}={}", environment.cookie_name(), token.as_str()),
        )
        .header(reqwest::header::CONTENT_TYPE, "text/xml")
        .body(OutboundBody::new(body))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(QueryError::Status {
            status: status.as_u16(),
        });
    }

    // Streaming inbound adapter: every transport chunk goes straight to
    // the parser.
    let mut parser = StreamingXmlParser::new(MarketResultsExtractor::new(day_start));
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        parser.feed(&chunk?)?;
    }
    let extractor = parser.finish()?;

    let records = extractor.into_records();
    info!(query = spec.name(), records = records.len(), "query complete");
    Ok(records)
}

/// Result of one day-window query.
#[derive(Debug)]
pub struct WindowOutcome {
    /// The window that was queried.
    pub window: DayWindow,
    /// The records, or the error that aborted this exchange.
    pub outcome: Result<Vec<HourlyResult>, QueryError>,
}

impl WindowOutcome {
    /// Returns true if the query failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Runs all three day-window queries sequentially.
///
/// Queries are never pipelined or overlapped, and a failure in one
/// window does not abort the remaining ones; each window's outcome is
/// reported individually.
pub async fn run_all_windows(client: &GatewayClient, token: &SessionToken) -> Vec<WindowOutcome> {
    let mut outcomes = Vec::with_capacity(QuerySpec::all().len());
    for spec in QuerySpec::all() {
        let outcome = run_query(client, token, spec).await;
        if let Err(err) = &outcome {
            error!(query = spec.name(), %err, "query failed, continuing with next window");
        }
        outcomes.push(WindowOutcome {
            window: spec.window,
            outcome,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_payload_interpolates_iso_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(
            market_results_payload(day),
            "<QueryMarketResults type='Demand' day='2024-03-14'><All/></QueryMarketResults>"
        );
    }

    #[test]
    fn test_envelope_wraps_payload() {
        let body = envelope("<X/>");
        assert_eq!(
            body,
            "<Envelope xmlns='http://schemas.xmlsoap.org/soap/envelope/'>\
             <Body>\
             <QueryRequest xmlns='http://emkt.pjm.com/emkt/xml'>\
             <X/>\
             </QueryRequest>\
             </Body>\
             </Envelope>"
        );
    }

    #[test]
    fn test_request_body_for_each_window() {
        let now = reference_now();
        for (spec, day) in QuerySpec::all().iter().zip(["2024-03-14", "2024-03-15", "2024-03-16"])
        {
            let body = spec.request_body(now);
            let text = String::from_utf8(body.as_slice().to_vec()).unwrap();
            assert!(text.contains(&format!("day='{day}'")), "window {}", spec.window);
            assert!(text.starts_with("<Envelope"));
            assert!(text.ends_with("</Envelope>"));
        }
    }

    #[test]
    fn test_query_order_and_names() {
        let specs = QuerySpec::all();
        assert_eq!(specs[0].name(), "Market Results Yesterday");
        assert_eq!(specs[1].name(), "Market Results Today");
        assert_eq!(specs[2].name(), "Market Results Tomorrow");
    }

    #[test]
    fn test_request_body_is_well_formed_xml() {
        // The rendered envelope must survive our own parser.
        let body = QuerySpec::all()[1].request_body(reference_now());
        let mut parser = StreamingXmlParser::new(MarketResultsExtractor::new(reference_now()));
        parser.feed(body.as_slice()).unwrap();
        assert!(parser.finish().is_ok());
    }
}
