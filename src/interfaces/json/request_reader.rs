use crate::domain::payment::PaymentRequest;
use crate::error::Result;
use std::io::Read;

/// Reads a single payment request document from a JSON source.
pub struct RequestReader<R: Read> {
    source: R,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Parses the document. A JSON `null` yields `None`, meaning no request was given.
    pub fn read(self) -> Result<Option<PaymentRequest>> {
        Ok(serde_json::from_reader(self.source)?)
    }
}
