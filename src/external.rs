//! External file references.
//!
//! An external file reference points at a sibling file of the document. It
//! is used on its own for raw result and tool setting files, and as the data
//! delegate of a [`Table`](crate::table::Table) whose rows live in a
//! delimited text file instead of inline XML.

use std::io::Write;

use log::warn;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::{Result, SoError};
use crate::reader::EventHandler;
use crate::schema::{attributes, elements, qualified, Delimiter, CT_PREFIX, DS_PREFIX};
use crate::writer::write_text_element;

/// Missing data code declared for an external file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingData {
    /// Code used in the file (`dataCode`)
    pub data_code: String,
    /// What the code stands for (`missingDataType`)
    pub missing_data_type: String,
}

/// Reference to a file next to the SO document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalFile {
    name: String,
    oid: Option<String>,
    path: Option<String>,
    format: Option<String>,
    delimiter: Option<Delimiter>,
    missing_data: Vec<MissingData>,
    description: Option<String>,
    write_on_serialize: bool,
}

impl ExternalFile {
    /// Create an empty reference written as element `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Reference to a delimited data file, as used by tables
    pub fn delimited(oid: &str, path: &str, delimiter: Delimiter) -> Self {
        Self {
            name: qualified(DS_PREFIX, elements::EXTERNAL_FILE),
            oid: Some(oid.to_string()),
            path: Some(path.to_string()),
            format: Some(crate::schema::EXTERNAL_FORMAT_CSV.to_string()),
            delimiter: Some(delimiter),
            ..Default::default()
        }
    }

    /// Element name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Object identifier (`oid`)
    pub fn oid(&self) -> Option<&str> {
        self.oid.as_deref()
    }

    /// Set the object identifier
    pub fn set_oid(&mut self, oid: impl Into<String>) {
        self.oid = Some(oid.into());
    }

    /// Path of the file, relative to the document
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Set the path
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    /// File format (`CSV` for delimited files)
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Set the file format
    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = Some(format.into());
    }

    /// Field delimiter
    pub fn delimiter(&self) -> Option<Delimiter> {
        self.delimiter
    }

    /// Set the field delimiter
    pub fn set_delimiter(&mut self, delimiter: Delimiter) {
        self.delimiter = Some(delimiter);
    }

    /// Declared missing data codes
    pub fn missing_data(&self) -> &[MissingData] {
        &self.missing_data
    }

    /// Declare a missing data code
    pub fn add_missing_data(&mut self, data_code: &str, missing_data_type: &str) {
        self.missing_data.push(MissingData {
            data_code: data_code.to_string(),
            missing_data_type: missing_data_type.to_string(),
        });
    }

    /// Free text description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Set the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Whether the data file is written together with the document
    pub fn write_on_serialize(&self) -> bool {
        self.write_on_serialize
    }

    /// Enable or disable writing the data file together with the document
    pub fn set_write_on_serialize(&mut self, write: bool) {
        self.write_on_serialize = write;
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        if let Some(oid) = &self.oid {
            start.push_attribute((attributes::OID, oid.as_str()));
        }
        writer.write_event(Event::Start(start))?;

        if let Some(path) = &self.path {
            write_text_element(writer, &qualified(DS_PREFIX, elements::PATH), path)?;
        }
        if let Some(format) = &self.format {
            write_text_element(writer, &qualified(DS_PREFIX, elements::FORMAT), format)?;
        }
        if let Some(delimiter) = self.delimiter {
            write_text_element(
                writer,
                &qualified(DS_PREFIX, elements::DELIMITER),
                delimiter.as_str(),
            )?;
        }
        let missing_name = qualified(DS_PREFIX, elements::MISSING_DATA);
        for missing in &self.missing_data {
            let mut elem = BytesStart::new(missing_name.as_str());
            elem.push_attribute((attributes::DATA_CODE, missing.data_code.as_str()));
            elem.push_attribute((
                attributes::MISSING_DATA_TYPE,
                missing.missing_data_type.as_str(),
            ));
            writer.write_event(Event::Empty(elem))?;
        }
        if let Some(description) = &self.description {
            write_text_element(
                writer,
                &qualified(CT_PREFIX, elements::DESCRIPTION),
                description,
            )?;
        }

        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// Builds an [`ExternalFile`] from the events inside its element
#[derive(Debug)]
pub(crate) struct ExternalFileParser {
    file: ExternalFile,
    field: Option<String>,
    text: String,
    depth: usize,
}

impl ExternalFileParser {
    pub(crate) fn new(name: &str, attrs: &[(String, String)]) -> Self {
        let mut file = ExternalFile::new(name);
        for (key, value) in attrs {
            if key == attributes::OID {
                file.oid = Some(value.clone());
            }
        }
        Self {
            file,
            field: None,
            text: String::new(),
            depth: 0,
        }
    }

    /// Nesting level below the reference element; 0 when the next end
    /// event closes the reference itself
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn finish(self) -> ExternalFile {
        self.file
    }
}

impl EventHandler for ExternalFileParser {
    fn on_start(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()> {
        self.depth += 1;
        if self.depth > 1 {
            return Ok(());
        }
        match name {
            elements::PATH | elements::FORMAT | elements::DELIMITER | elements::DESCRIPTION => {
                self.field = Some(name.to_string());
                self.text.clear();
            }
            elements::MISSING_DATA => {
                let lookup = |key: &str| {
                    attrs
                        .iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default()
                };
                self.file.missing_data.push(MissingData {
                    data_code: lookup(attributes::DATA_CODE),
                    missing_data_type: lookup(attributes::MISSING_DATA_TYPE),
                });
            }
            other => warn!("Ignoring <{}> in external file reference", other),
        }
        Ok(())
    }

    fn on_end(&mut self, _name: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return Ok(());
        }
        let Some(field) = self.field.take() else {
            return Ok(());
        };
        let text = std::mem::take(&mut self.text);
        match field.as_str() {
            elements::PATH => self.file.path = Some(text),
            elements::FORMAT => self.file.format = Some(text),
            elements::DELIMITER => {
                let delimiter = text.parse::<Delimiter>().map_err(|_| {
                    SoError::MalformedDocument(format!(
                        "Unknown delimiter '{}' in external file reference",
                        text.trim()
                    ))
                })?;
                self.file.delimiter = Some(delimiter);
            }
            _ => self.file.description = Some(text),
        }
        Ok(())
    }

    fn on_characters(&mut self, text: &str) -> Result<()> {
        if self.field.is_some() && self.depth == 1 {
            self.text.push_str(text);
        }
        Ok(())
    }
}
