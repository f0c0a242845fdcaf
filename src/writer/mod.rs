//! # SO Writer Module
//!
//! Serializes a document tree back to XML with quick-xml.
//!
//! ## Design Principles
//!
//! 1. **Schema Order**: Children are emitted in the order the structure
//!    table declares them, whatever order they were added in. Repeated
//!    children keep their insertion order.
//!
//! 2. **Sentinel Leaves**: Reals that are NA, NaN or infinite are written as
//!    `ct:NA`, `ct:NaN`, `ct:plusInf` and `ct:minusInf` leaves, in tables and
//!    matrices alike.
//!
//! 3. **Side Files**: Tables flagged for it also get their delimited data
//!    file written, next to the output document.

mod config;
mod output;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{WriterConfig, DEFAULT_INDENT_SIZE};
pub(crate) use output::OutputFile;
pub use stats::WriterStats;

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::codec;
use crate::document::{Element, Node};
use crate::error::Result;
use crate::schema::{elements, qualified, CT_PREFIX, ROOT_ATTRIBUTES};
use crate::table::Table;

/// Write `<name>text</name>`
pub(crate) fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write `<name/>`
pub(crate) fn write_empty_element<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::Empty(BytesStart::new(name)))?;
    Ok(())
}

/// Write one real value, using the sentinel leaves where `%f` text would
/// not be a valid `xs:double`
pub(crate) fn write_real_leaf<W: Write>(writer: &mut Writer<W>, x: f64) -> Result<()> {
    if codec::is_na(x) {
        write_empty_element(writer, &qualified(CT_PREFIX, elements::NA))
    } else if x.is_nan() {
        write_empty_element(writer, &qualified(CT_PREFIX, elements::NAN))
    } else if x == f64::INFINITY {
        write_empty_element(writer, &qualified(CT_PREFIX, elements::PLUS_INF))
    } else if x == f64::NEG_INFINITY {
        write_empty_element(writer, &qualified(CT_PREFIX, elements::MINUS_INF))
    } else {
        write_text_element(
            writer,
            &qualified(CT_PREFIX, elements::REAL),
            &codec::double_to_string(x),
        )
    }
}

/// Streaming writer for SO documents
pub struct SoWriter<W: Write> {
    writer: Writer<W>,
    config: WriterConfig,
    base_dir: Option<PathBuf>,
    stats: WriterStats,
}

impl<W: Write> SoWriter<W> {
    /// Create a writer around any `Write` implementation.
    ///
    /// Without a base directory no external data files are written.
    pub fn new(inner: W, config: &WriterConfig) -> Self {
        let writer = if config.pretty {
            Writer::new_with_indent(inner, b' ', config.indent_size)
        } else {
            Writer::new(inner)
        };
        Self {
            writer,
            config: config.clone(),
            base_dir: None,
            stats: WriterStats::default(),
        }
    }

    /// Resolve external data file paths against `dir`
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Statistics of what has been written so far
    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// Consume the writer and return the inner sink
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Write the XML declaration and the whole tree below `root`
    pub fn write_document(&mut self, root: &Element) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut start = BytesStart::new(root.name());
        for (key, value) in ROOT_ATTRIBUTES {
            start.push_attribute((key, value));
        }
        for (key, value) in root.attributes() {
            if !ROOT_ATTRIBUTES.iter().any(|(k, _)| k == key) {
                start.push_attribute((key.as_str(), value.as_str()));
            }
        }
        self.writer.write_event(Event::Start(start))?;
        self.write_children(root)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(root.name())))?;
        if self.config.pretty {
            self.writer.get_mut().write_all(b"\n")?;
        }

        info!("{}", self.stats);
        Ok(())
    }

    fn write_children(&mut self, element: &Element) -> Result<()> {
        let spec = element.spec();
        let mut children: Vec<&Node> = element.children().iter().collect();
        children.sort_by_key(|child| {
            spec.child(child.local_name())
                .map(|(index, _)| index)
                .unwrap_or(usize::MAX)
        });

        for child in children {
            match child {
                Node::Element(e) => self.write_element(e)?,
                Node::Table(t) => self.write_table(t)?,
                Node::Matrix(m) => {
                    m.write_xml(&mut self.writer)?;
                    self.stats.matrices_written += 1;
                }
                Node::ExternalFile(f) => f.write_xml(&mut self.writer)?,
                Node::Leaf(l) => l.write_xml(&mut self.writer)?,
            }
        }
        Ok(())
    }

    fn write_element(&mut self, element: &Element) -> Result<()> {
        let mut start = BytesStart::new(element.name());
        for (key, value) in element.attributes() {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        self.stats.elements_written += 1;

        if element.children().is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        self.writer.write_event(Event::Start(start))?;
        self.write_children(element)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(element.name())))?;
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        table.write_xml(&mut self.writer)?;
        self.stats.tables_written += 1;
        self.stats.rows_written += table.num_rows();

        let Some(file) = table.external_file() else {
            return Ok(());
        };
        if !file.write_on_serialize() || !self.config.write_external_files {
            return Ok(());
        }
        match &self.base_dir {
            Some(dir) => {
                table.write_external_data(dir, self.config.atomic)?;
                self.stats.external_files_written += 1;
            }
            None => debug!(
                "No output directory, not writing data file of table {}",
                table.name()
            ),
        }
        Ok(())
    }
}
