//! Convenience operations on `SOBlock` elements.

use super::Element;
use crate::codec;
use crate::error::{Result, SoError};
use crate::external::ExternalFile;
use crate::schema::{attributes, structure};

const MESSAGE_PATH: &str = "TaskInformation/Message";
const MESSAGE_TYPE: &str = "type";

impl Element {
    fn expect_block(&self, operation: &str) -> Result<()> {
        if self.spec() == &structure::SO_BLOCK {
            Ok(())
        } else {
            Err(SoError::InvalidStructure(format!(
                "{} is only available on SOBlock, not {}",
                operation,
                self.name()
            )))
        }
    }

    /// `blkId` of a block
    pub fn blk_id(&self) -> Option<&str> {
        self.attribute(attributes::BLK_ID)
    }

    /// Append a task message to a block.
    ///
    /// `message_type` is the `type` attribute, normally `ERROR`, `WARNING`,
    /// `TERMINATION` or `INFORMATION`.
    pub fn add_message(
        &mut self,
        message_type: &str,
        toolname: &str,
        name: &str,
        content: &str,
        severity: i64,
    ) -> Result<&mut Element> {
        self.expect_block("add_message")?;
        let message = self.push_element(MESSAGE_PATH)?;
        message.set_attribute(MESSAGE_TYPE, message_type)?;
        message.set_leaf("Toolname/String", toolname)?;
        message.set_leaf("Name/String", name)?;
        message.set_leaf("Content/String", content)?;
        message.set_leaf("Severity/Int", codec::int_to_string(severity))?;
        Ok(message)
    }

    /// Task messages of a block in document order
    pub fn messages(&self) -> impl Iterator<Item = &Element> {
        self.element_at("TaskInformation")
            .into_iter()
            .flat_map(|info| info.elements_named("Message"))
    }

    /// Reference a raw data file produced by the tool
    pub fn add_rawresults_datafile(
        &mut self,
        description: Option<&str>,
        path: Option<&str>,
        oid: &str,
    ) -> Result<()> {
        self.expect_block("add_rawresults_datafile")?;
        self.push_external_file("RawResults/DataFile", raw_result(description, path, oid))
    }

    /// Reference a graphics file produced by the tool
    pub fn add_rawresults_graphicsfile(
        &mut self,
        description: Option<&str>,
        path: Option<&str>,
        oid: &str,
    ) -> Result<()> {
        self.expect_block("add_rawresults_graphicsfile")?;
        self.push_external_file("RawResults/GraphicsFile", raw_result(description, path, oid))
    }
}

fn raw_result(description: Option<&str>, path: Option<&str>, oid: &str) -> ExternalFile {
    let mut file = ExternalFile::default();
    file.set_oid(oid);
    if let Some(path) = path {
        file.set_path(path);
    }
    if let Some(description) = description {
        file.set_description(description);
    }
    file
}
