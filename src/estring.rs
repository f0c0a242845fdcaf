//! Scalar text leaves.

use std::io::Write;

use quick_xml::Writer;

use crate::error::Result;
use crate::reader::EventHandler;
use crate::writer::write_text_element;

/// A named text leaf such as `<ct:String>NONMEM</ct:String>` or `<RunTime>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estring {
    name: String,
    text: String,
}

impl Estring {
    /// Create a leaf written as element `name`
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Element name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        write_text_element(writer, &self.name, &self.text)
    }
}

/// Accumulates the character data of a leaf. Nested markup is not expected
/// and its text is concatenated.
#[derive(Debug)]
pub(crate) struct EstringParser {
    leaf: Estring,
}

impl EstringParser {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            leaf: Estring::new(name, String::new()),
        }
    }

    pub(crate) fn finish(self) -> Estring {
        self.leaf
    }
}

impl EventHandler for EstringParser {
    fn on_start(&mut self, _name: &str, _attrs: &[(String, String)]) -> Result<()> {
        Ok(())
    }

    fn on_end(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn on_characters(&mut self, text: &str) -> Result<()> {
        self.leaf.text.push_str(text);
        Ok(())
    }
}
