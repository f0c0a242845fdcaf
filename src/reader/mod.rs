//! # SO Reader Module
//!
//! Single-pass reading of SO documents.
//!
//! quick-xml tokenizes the input; [`SoReader`] turns its events into three
//! callbacks (`on_start`, `on_end`, `on_characters`) carrying local element
//! names, and hands them to an [`EventHandler`]. The document builder is
//! such a handler: it keeps an explicit stack of frames, one per active
//! parse context, and routes every event to the table, matrix, external
//! file or text leaf parser that is currently open.
//!
//! Attribute keys are passed with their prefix (`xmlns:ds`, `xsi:type`),
//! element names without it.

mod builder;
mod config;


pub use config::{ReaderConfig, DEFAULT_INPUT_BUFFER_SIZE};

pub(crate) use builder::DocumentBuilder;

use std::io::BufRead;

use log::debug;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, SoError};

/// Receiver of the parse callbacks
pub trait EventHandler {
    /// An element was opened
    fn on_start(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()>;

    /// An element was closed
    fn on_end(&mut self, name: &str) -> Result<()>;

    /// Character data inside the current element. Text may arrive in
    /// several pieces.
    fn on_characters(&mut self, text: &str) -> Result<()>;
}

/// Event source over any buffered input
pub struct SoReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    depth: usize,
}

fn collect_attributes(e: &BytesStart<'_>, decoder: Decoder) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

impl<R: BufRead> SoReader<R> {
    /// Create a reader; empty elements are reported as a start and an end
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            buf: Vec::new(),
            depth: 0,
        }
    }

    /// Feed every event of the input to `handler`, stopping at the first
    /// error
    pub fn run<H: EventHandler>(&mut self, handler: &mut H) -> Result<()> {
        loop {
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(ref e)) => {
                    let attrs = collect_attributes(e, self.reader.decoder())?;
                    let name = std::str::from_utf8(e.local_name().into_inner())?;
                    self.depth += 1;
                    handler.on_start(name, &attrs)?;
                }
                Ok(Event::End(ref e)) => {
                    let name = std::str::from_utf8(e.local_name().into_inner())?;
                    self.depth = self.depth.saturating_sub(1);
                    handler.on_end(name)?;
                }
                Ok(Event::Text(ref t)) => {
                    if self.depth > 0 {
                        let text = t.unescape()?;
                        handler.on_characters(&text)?;
                    }
                }
                Ok(Event::CData(ref t)) => {
                    if self.depth > 0 {
                        handler.on_characters(std::str::from_utf8(t)?)?;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(SoError::MalformedDocument(format!(
                        "XML error at byte {}: {}",
                        self.reader.error_position(),
                        e
                    )))
                }
                _ => {}
            }
            self.buf.clear();
        }

        if self.depth > 0 {
            return Err(SoError::MalformedDocument(format!(
                "Unexpected end of input with {} open elements",
                self.depth
            )));
        }
        debug!("Reached end of input at byte {}", self.reader.buffer_position());
        Ok(())
    }
}
