use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::info;

use super::{Element, Node};
use crate::error::{record_error, Result, SoError};
use crate::reader::{DocumentBuilder, ReaderConfig, SoReader};
use crate::schema::{attributes, structure, ROOT_ELEMENT};
use crate::writer::{OutputFile, SoWriter, WriterConfig, WriterStats};

const PHARMML_REF: &str = "PharmMLRef";
const SO_BLOCK: &str = "SOBlock";
const NAME: &str = "name";

/// An SO document
#[derive(Debug, Clone, PartialEq)]
pub struct So {
    root: Element,
}

impl Default for So {
    fn default() -> Self {
        Self::new()
    }
}

impl So {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            root: Element::new(ROOT_ELEMENT, &structure::SO, Vec::new()),
        }
    }

    /// Read a document from a file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_with(path, &ReaderConfig::default())
    }

    /// Read a document from a file with explicit reader settings
    pub fn read_with(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let result = File::open(path).map_err(SoError::from).and_then(|file| {
            Self::from_reader(BufReader::with_capacity(config.buffer_size, file))
        });
        let so = record_error(result)?;
        info!(
            "Read {} with {} blocks",
            path.display(),
            so.blocks().count()
        );
        Ok(so)
    }

    /// Read a document from any buffered input
    pub fn from_reader<R: BufRead>(input: R) -> Result<Self> {
        let mut builder = DocumentBuilder::new();
        SoReader::new(input).run(&mut builder)?;
        Ok(Self {
            root: builder.finish()?,
        })
    }

    /// Parse a document held in memory
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        Self::from_reader(xml.as_bytes())
    }

    /// Write the document to `path`, indented when `pretty` is set
    pub fn write(&self, path: impl AsRef<Path>, pretty: bool) -> Result<WriterStats> {
        self.write_with(path, &WriterConfig::with_pretty(pretty))
    }

    /// Write the document to `path`.
    ///
    /// Data files of tables flagged for it are written next to the
    /// document, their paths resolved against its directory.
    pub fn write_with(&self, path: impl AsRef<Path>, config: &WriterConfig) -> Result<WriterStats> {
        let path = path.as_ref();
        let result = self.write_file(path, config);
        let stats = record_error(result)?;
        info!("Wrote {}", path.display());
        Ok(stats)
    }

    fn write_file(&self, path: &Path, config: &WriterConfig) -> Result<WriterStats> {
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let output = OutputFile::create(path, config.atomic)?;
        let mut writer = SoWriter::new(output, config).with_base_dir(base_dir);
        writer.write_document(&self.root)?;
        let stats = writer.stats().clone();
        writer.into_inner().commit()?;
        Ok(stats)
    }

    /// Write the document to any sink. No external data files are written.
    pub fn to_writer<W: Write>(&self, sink: W, config: &WriterConfig) -> Result<W> {
        let mut writer = SoWriter::new(sink, config);
        writer.write_document(&self.root)?;
        Ok(writer.into_inner())
    }

    /// Serialize the document to a string
    pub fn to_xml_string(&self, pretty: bool) -> Result<String> {
        let bytes = self.to_writer(Vec::new(), &WriterConfig::with_pretty(pretty))?;
        String::from_utf8(bytes).map_err(|e| SoError::Utf8(e.utf8_error()))
    }

    /// The root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable root element
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// All result blocks in document order
    pub fn blocks(&self) -> impl Iterator<Item = &Element> {
        self.root.elements_named(SO_BLOCK)
    }

    /// Block with the given `blkId`
    pub fn block(&self, blk_id: &str) -> Option<&Element> {
        self.blocks()
            .find(|b| b.attribute(attributes::BLK_ID) == Some(blk_id))
    }

    /// Mutable block with the given `blkId`
    pub fn block_mut(&mut self, blk_id: &str) -> Option<&mut Element> {
        self.root.children.iter_mut().find_map(|node| match node {
            Node::Element(e)
                if e.local_name() == SO_BLOCK
                    && e.attribute(attributes::BLK_ID) == Some(blk_id) =>
            {
                Some(e)
            }
            _ => None,
        })
    }

    /// Append a new block
    pub fn add_block(&mut self, blk_id: &str) -> Result<&mut Element> {
        if self.block(blk_id).is_some() {
            return Err(SoError::InvalidStructure(format!(
                "Block '{}' already exists",
                blk_id
            )));
        }
        let block = self.root.push_element(SO_BLOCK)?;
        block.set_attribute(attributes::BLK_ID, blk_id)?;
        Ok(block)
    }

    /// Name of the referenced PharmML file
    pub fn pharmml_ref(&self) -> Option<&str> {
        self.root.element_at(PHARMML_REF)?.attribute(NAME)
    }

    /// Set the referenced PharmML file
    pub fn set_pharmml_ref(&mut self, name: &str) -> Result<()> {
        self.root.ensure_element(PHARMML_REF)?.set_attribute(NAME, name)
    }

    /// Append all blocks of `other`, returning how many were added. The
    /// PharmML reference of `other` is taken over only if this document
    /// has none.
    pub fn merge(&mut self, other: So) -> usize {
        let has_ref = self.root.child(PHARMML_REF).is_some();
        let mut added = 0;
        for node in other.root.children {
            let is_block = node.local_name() == SO_BLOCK;
            let is_ref = node.local_name() == PHARMML_REF;
            if is_block {
                self.root.push_child(node);
                added += 1;
            } else if is_ref && !has_ref {
                self.root.push_child(node);
            }
        }
        added
    }
}
