//! XML serialization of tables.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{ColumnData, Table};
use crate::codec;
use crate::error::Result;
use crate::schema::{attributes, elements, qualified, ColumnType, CT_PREFIX, DS_PREFIX};
use crate::writer::{write_empty_element, write_real_leaf, write_text_element};

impl Table {
    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(start))?;

        self.write_definition(writer)?;
        match &self.external_file {
            Some(file) => file.write_xml(writer)?,
            None => self.write_rows(writer)?,
        }

        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }

    fn write_definition<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let definition = qualified(DS_PREFIX, elements::DEFINITION);
        let column_name = qualified(DS_PREFIX, elements::COLUMN);

        writer.write_event(Event::Start(BytesStart::new(definition.as_str())))?;
        for (i, column) in self.columns.iter().enumerate() {
            let column_type = ColumnType::format_list(column.column_types());
            let column_num = (i + 1).to_string();

            let mut elem = BytesStart::new(column_name.as_str());
            elem.push_attribute((attributes::COLUMN_ID, column.column_id()));
            elem.push_attribute((attributes::COLUMN_TYPE, column_type.as_str()));
            elem.push_attribute((attributes::VALUE_TYPE, column.value_type().as_str()));
            elem.push_attribute((attributes::COLUMN_NUM, column_num.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }
        writer.write_event(Event::End(BytesEnd::new(definition.as_str())))?;
        Ok(())
    }

    fn write_rows<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        self.check_row_counts()?;
        let rows_name = qualified(DS_PREFIX, elements::TABLE);
        let row_name = qualified(DS_PREFIX, elements::ROW);
        // Leaf names are fixed per column
        let leaf_names: Vec<Option<String>> = self
            .columns
            .iter()
            .map(|c| {
                c.value_type()
                    .element_name()
                    .map(|name| qualified(CT_PREFIX, name))
            })
            .collect();
        let true_name = qualified(CT_PREFIX, elements::TRUE);
        let false_name = qualified(CT_PREFIX, elements::FALSE);

        writer.write_event(Event::Start(BytesStart::new(rows_name.as_str())))?;
        for row in 0..self.num_rows {
            writer.write_event(Event::Start(BytesStart::new(row_name.as_str())))?;
            for (column, leaf_name) in self.columns.iter().zip(&leaf_names) {
                match (column.data(), leaf_name) {
                    (ColumnData::Real(v), _) => write_real_leaf(writer, v[row])?,
                    (ColumnData::Int(v), Some(name)) => {
                        write_text_element(writer, name, &codec::int_to_string(v[row]))?
                    }
                    (ColumnData::Text(v), Some(name)) => write_text_element(writer, name, &v[row])?,
                    (ColumnData::Boolean(v), _) => {
                        let name = if v[row] { &true_name } else { &false_name };
                        write_empty_element(writer, name)?
                    }
                    // Int and text columns always have a leaf name
                    (_, None) => {}
                }
            }
            writer.write_event(Event::End(BytesEnd::new(row_name.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(rows_name.as_str())))?;
        Ok(())
    }
}
