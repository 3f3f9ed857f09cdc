//! The three-callback handler interface.

/// Receiver for the SAX-style event stream produced by
/// [`StreamingXmlParser`](crate::StreamingXmlParser).
///
/// Callbacks are invoked synchronously, in document order, as complete
/// tokens are recognized. Self-closing elements produce an open event
/// immediately followed by a close event.
pub trait ElementHandler {
    /// Called at the start of an element. Attributes are passed as an
    /// ordered sequence of (name, value) pairs with entity references
    /// already resolved.
    fn on_open(&mut self, name: &str, attributes: &[(String, String)]);

    /// Called at the end of an element.
    fn on_close(&mut self, name: &str);

    /// Called for character data between tags.
    ///
    /// A single logical text run may be delivered in multiple calls;
    /// implementations must accumulate. Bytes are passed as they appear
    /// in the document, without entity resolution.
    fn on_text(&mut self, text: &[u8]);
}
