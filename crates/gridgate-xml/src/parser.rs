//! Incremental push parser over quick-xml.

use gridgate_types::ChunkBuffer;
use quick_xml::Reader;
use quick_xml::escape::{EscapeError, unescape};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::ElementHandler;

/// Errors that fail a parse session.
///
/// Once a session has failed it is unusable and must be discarded;
/// there is no recovery or resynchronization.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed XML at byte offset {offset}: {source}")]
    Malformed {
        /// Offset of the failing token from the start of the document.
        offset: usize,
        /// Underlying tokenizer error.
        source: quick_xml::Error,
    },

    /// An attribute could not be parsed.
    #[error("bad attribute at byte offset {offset}: {source}")]
    Attr {
        /// Offset of the enclosing tag from the start of the document.
        offset: usize,
        /// Underlying attribute error.
        source: AttrError,
    },

    /// An attribute value carries an unresolvable entity reference.
    #[error("bad entity reference at byte offset {offset}: {source}")]
    Escape {
        /// Offset of the enclosing tag from the start of the document.
        offset: usize,
        /// Underlying escape error.
        source: EscapeError,
    },

    /// The document ended with open and close tags out of balance.
    #[error("unbalanced document at end of input (depth {depth}, byte offset {offset})")]
    Unbalanced {
        /// Offset of the end of input.
        offset: usize,
        /// Net element depth at end of input.
        depth: i64,
    },
}

/// Outcome of one tokenization attempt against the buffered input.
enum Step {
    /// A token was dispatched; this many bytes are consumed.
    Consumed(usize),
    /// The buffered input ends inside a token; wait for more bytes.
    Hold,
    /// The buffered input is fully tokenized.
    Done,
}

/// Incremental, event-driven XML parser.
///
/// Bytes are pushed in whatever chunks the transport delivers via
/// [`feed`](Self::feed); complete tokens are dispatched synchronously to
/// the owned [`ElementHandler`]. Chunk boundaries carry no meaning: a
/// tag or attribute may span any number of chunks and the dispatched
/// event sequence is identical to feeding the document whole.
///
/// A parser is single-use per exchange. [`finish`](Self::finish) flushes
/// the final (possibly empty) input, checks element balance, and returns
/// the handler by value; taking `self` makes feeding after finalization
/// unrepresentable.
///
/// Internally the unconsumed tail of the input is kept in a
/// [`ChunkBuffer`] and re-tokenized when more bytes arrive, so memory
/// use is bounded by the largest single token, not the document.
#[derive(Debug)]
pub struct StreamingXmlParser<H> {
    handler: H,
    pending: ChunkBuffer,
    consumed_total: usize,
    depth: i64,
}

impl<H: ElementHandler> StreamingXmlParser<H> {
    /// Creates a parser dispatching to the given handler.
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            pending: ChunkBuffer::new(),
            consumed_total: 0,
            depth: 0,
        }
    }

    /// Returns a shared reference to the handler.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Pushes a chunk of document bytes, dispatching zero or more
    /// handler events.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered input contains malformed XML.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        self.pending.append(chunk);
        self.drain(false)
    }

    /// Signals end-of-document, dispatching any events still buffered,
    /// and returns the handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining input is malformed or the
    /// document ends with unclosed elements.
    pub fn finish(mut self) -> Result<H, ParseError> {
        self.drain(true)?;
        if self.depth != 0 {
            return Err(ParseError::Unbalanced {
                offset: self.consumed_total,
                depth: self.depth,
            });
        }
        Ok(self.handler)
    }

    /// Tokenizes as much of the buffered input as possible.
    ///
    /// quick-xml is restarted on the unconsumed tail for every token, so
    /// a syntax error raised at the end of the available bytes means the
    /// input stops inside a construct and more data is needed, not that
    /// the document is malformed. A text token reaching the end of the
    /// available bytes is held back until the following `<` (or the
    /// final drain) so that split text runs coalesce deterministically.
    fn drain(&mut self, is_final: bool) -> Result<(), ParseError> {
        loop {
            if self.pending.remaining() == 0 {
                break;
            }

            let mut buf = Vec::new();
            let step = {
                let input = self.pending.unread();
                let mut reader = Reader::from_reader(input);
                // Each restarted reader sees only the unconsumed tail,
                // so end tags have no visible matching start; balance is
                // checked with the session-wide depth counter instead.
                let config = reader.config_mut();
                config.check_end_names = false;
                config.allow_unmatched_ends = true;
                match reader.read_event_into(&mut buf) {
                    Ok(Event::Eof) => Step::Done,
                    Ok(event) => {
                        // After a text event the reader has peeked the
                        // following `<`; buffer_position excludes it, so
                        // this is exactly the bytes the token occupies.
                        let consumed = reader.buffer_position() as usize;
                        let trailing_text =
                            consumed == input.len() && matches!(event, Event::Text(_));
                        if consumed == 0 {
                            // No bytes accounted for: treat as incomplete
                            // input rather than spinning on the same token.
                            Step::Hold
                        } else if trailing_text && !is_final {
                            Step::Hold
                        } else {
                            self.dispatch(event)?;
                            Step::Consumed(consumed)
                        }
                    }
                    Err(quick_xml::Error::Syntax(_)) if !is_final => Step::Hold,
                    Err(source) => {
                        return Err(ParseError::Malformed {
                            offset: self.consumed_total + reader.error_position() as usize,
                            source,
                        });
                    }
                }
            };

            match step {
                Step::Consumed(n) => {
                    self.pending.consume(n);
                    self.consumed_total += n;
                }
                Step::Hold | Step::Done => break,
            }
        }

        // Drop fully consumed input so memory stays bounded by the
        // largest held-back token.
        if self.pending.remaining() == 0 {
            self.pending.clear();
        }

        Ok(())
    }

    /// Routes one token to the handler callbacks.
    fn dispatch(&mut self, event: Event<'_>) -> Result<(), ParseError> {
        match event {
            Event::Start(start) => {
                let name = decode(start.name().as_ref());
                let attributes = self.collect_attributes(&start)?;
                self.handler.on_open(&name, &attributes);
                self.depth += 1;
            }
            Event::Empty(start) => {
                let name = decode(start.name().as_ref());
                let attributes = self.collect_attributes(&start)?;
                self.handler.on_open(&name, &attributes);
                self.handler.on_close(&name);
            }
            Event::End(end) => {
                self.handler.on_close(&decode(end.name().as_ref()));
                self.depth -= 1;
            }
            Event::Text(text) => self.handler.on_text(&text),
            Event::CData(data) => self.handler.on_text(&data),
            // Declarations, comments, processing instructions and
            // doctypes carry no market data.
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => {}
        }
        Ok(())
    }

    /// Collects a tag's attributes as ordered (name, value) pairs with
    /// entity references resolved.
    fn collect_attributes(
        &self,
        start: &BytesStart<'_>,
    ) -> Result<Vec<(String, String)>, ParseError> {
        let offset = self.consumed_total;
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|source| ParseError::Attr { offset, source })?;
            let name = decode(attribute.key.as_ref());
            let raw = decode(&attribute.value);
            let value = unescape(&raw)
                .map_err(|source| ParseError::Escape { offset, source })?
                .into_owned();
            attributes.push((name, value));
        }
        Ok(attributes)
    }
}

/// Decodes a tag or attribute name for the handler interface.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Recorded {
        Open(String, Vec<(String, String)>),
        Close(String),
        Text(Vec<u8>),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<Recorded>,
    }

    impl ElementHandler for Recorder {
        fn on_open(&mut self, name: &str, attributes: &[(String, String)]) {
            self.events
                .push(Recorded::Open(name.to_owned(), attributes.to_vec()));
        }

        fn on_close(&mut self, name: &str) {
            self.events.push(Recorded::Close(name.to_owned()));
        }

        fn on_text(&mut self, text: &[u8]) {
            self.events.push(Recorded::Text(text.to_vec()));
        }
    }

    const DOC: &str = "<?xml version='1.0'?>\
        <MarketResults location='AECO'>\
        <MarketResultsHourly hour='5'>\
        <ClearedMW>123.4</ClearedMW>\
        </MarketResultsHourly>\
        <All/>\
        </MarketResults>";

    fn parse_in_chunks(doc: &str, chunk_size: usize) -> Vec<Recorded> {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        for chunk in doc.as_bytes().chunks(chunk_size) {
            parser.feed(chunk).expect("well-formed document");
        }
        parser.finish().expect("balanced document").events
    }

    #[test]
    fn test_single_chunk_event_sequence() {
        let events = parse_in_chunks(DOC, DOC.len());
        assert_eq!(
            events,
            vec![
                Recorded::Open(
                    "MarketResults".into(),
                    vec![("location".into(), "AECO".into())]
                ),
                Recorded::Open(
                    "MarketResultsHourly".into(),
                    vec![("hour".into(), "5".into())]
                ),
                Recorded::Open("ClearedMW".into(), vec![]),
                Recorded::Text(b"123.4".to_vec()),
                Recorded::Close("ClearedMW".into()),
                Recorded::Close("MarketResultsHourly".into()),
                Recorded::Open("All".into(), vec![]),
                Recorded::Close("All".into()),
                Recorded::Close("MarketResults".into()),
            ]
        );
    }

    #[test]
    fn test_chunking_does_not_change_event_sequence() {
        let whole = parse_in_chunks(DOC, DOC.len());
        for chunk_size in [1, 2, 3, 7, 16, 64] {
            assert_eq!(parse_in_chunks(DOC, chunk_size), whole, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn test_every_split_point_matches() {
        let doc = "<a x='one two'>text &amp; more<b/></a>";
        let whole = parse_in_chunks(doc, doc.len());
        for split in 1..doc.len() {
            let (head, tail) = doc.as_bytes().split_at(split);
            let mut parser = StreamingXmlParser::new(Recorder::default());
            parser.feed(head).unwrap();
            parser.feed(tail).unwrap();
            let events = parser.finish().unwrap().events;
            assert_eq!(events, whole, "split at {split}");
        }
    }

    #[test]
    fn test_text_split_across_feeds_is_coalesced() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"<a>he").unwrap();
        parser.feed(b"llo</a>").unwrap();
        let events = parser.finish().unwrap().events;
        assert_eq!(
            events,
            vec![
                Recorded::Open("a".into(), vec![]),
                Recorded::Text(b"hello".to_vec()),
                Recorded::Close("a".into()),
            ]
        );
    }

    #[test]
    fn test_long_text_fed_byte_by_byte() {
        // Every feed must either dispatch or hold; a text run arriving
        // one byte at a time has to keep advancing the cursor and come
        // out as a single coalesced event.
        let text = "x".repeat(2048);
        let doc = format!("<a>{text}</a>");
        let mut parser = StreamingXmlParser::new(Recorder::default());
        for byte in doc.as_bytes() {
            parser.feed(std::slice::from_ref(byte)).unwrap();
        }
        let events = parser.finish().unwrap().events;
        assert_eq!(
            events,
            vec![
                Recorded::Open("a".into(), vec![]),
                Recorded::Text(text.into_bytes()),
                Recorded::Close("a".into()),
            ]
        );
    }

    #[test]
    fn test_self_closing_emits_open_then_close() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"<All type='Demand'/>").unwrap();
        let events = parser.finish().unwrap().events;
        assert_eq!(
            events,
            vec![
                Recorded::Open("All".into(), vec![("type".into(), "Demand".into())]),
                Recorded::Close("All".into()),
            ]
        );
    }

    #[test]
    fn test_attribute_entities_are_resolved() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"<a name='x &amp; y'/>").unwrap();
        let events = parser.finish().unwrap().events;
        assert_eq!(
            events[0],
            Recorded::Open("a".into(), vec![("name".into(), "x & y".into())])
        );
    }

    #[test]
    fn test_unclosed_element_fails_at_finish() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"<a><b>").unwrap();
        let err = parser.finish().unwrap_err();
        assert!(matches!(err, ParseError::Unbalanced { depth: 2, .. }));
    }

    #[test]
    fn test_truncated_tag_fails_at_finish() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"<a></a").unwrap();
        assert!(matches!(
            parser.finish().unwrap_err(),
            ParseError::Malformed { .. }
        ));
    }

    #[test]
    fn test_bad_attribute_fails_the_session() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        // Attribute without a value is an attribute error, not a
        // wait-for-more-data condition.
        let err = parser.feed(b"<a x><b/></a>").unwrap_err();
        assert!(matches!(err, ParseError::Attr { .. }));
    }

    #[test]
    fn test_empty_feeds_are_harmless() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"").unwrap();
        parser.feed(b"<a/>").unwrap();
        parser.feed(b"").unwrap();
        let events = parser.finish().unwrap().events;
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_cdata_is_reported_as_text() {
        let mut parser = StreamingXmlParser::new(Recorder::default());
        parser.feed(b"<a><![CDATA[12 < 34]]></a>").unwrap();
        let events = parser.finish().unwrap().events;
        assert_eq!(events[1], Recorded::Text(b"12 < 34".to_vec()));
    }
}
