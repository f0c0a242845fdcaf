//! Event-driven table parser.
//!
//! Receives the events between the start and end tag of a table element and
//! keeps an explicit stack of the constructs it is inside of.

use log::{debug, warn};

use super::Table;
use crate::codec;
use crate::error::{Result, SoError};
use crate::external::ExternalFileParser;
use crate::reader::EventHandler;
use crate::schema::{attributes, elements, qualified, ColumnType, ValueType, DS_PREFIX};

/// Value leaf inside a `ds:Row`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Real,
    Int,
    Text,
    True,
    False,
    Na,
    NaN,
    PlusInf,
    MinusInf,
}

impl Leaf {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            elements::REAL => Leaf::Real,
            elements::INT => Leaf::Int,
            elements::STRING | elements::ID => Leaf::Text,
            elements::TRUE => Leaf::True,
            elements::FALSE => Leaf::False,
            elements::NA => Leaf::Na,
            elements::NAN => Leaf::NaN,
            elements::PLUS_INF => Leaf::PlusInf,
            elements::MINUS_INF => Leaf::MinusInf,
            _ => return None,
        })
    }
}

#[derive(Debug)]
enum State {
    Definition,
    Column,
    Rows,
    Row,
    Leaf(Leaf),
    ExternalFile(ExternalFileParser),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Definition,
    Rows,
    Row,
    Ignored,
    Other,
}

impl Scope {
    fn of(state: &State) -> Self {
        match state {
            State::Definition => Scope::Definition,
            State::Rows => Scope::Rows,
            State::Row => Scope::Row,
            State::Ignored => Scope::Ignored,
            _ => Scope::Other,
        }
    }
}

/// Builds a [`Table`] from the events inside its element
#[derive(Debug)]
pub(crate) struct TableParser {
    table: Table,
    stack: Vec<State>,
    current_column: usize,
    rows: usize,
    text: String,
}

fn attribute<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl TableParser {
    pub(crate) fn new(name: &str, attrs: &[(String, String)]) -> Self {
        let mut table = Table::new(name);
        for (key, value) in attrs {
            table.set_attribute(key, value.as_str());
        }
        Self {
            table,
            stack: Vec::new(),
            current_column: 0,
            rows: 0,
            text: String::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Result<Table> {
        if !self.stack.is_empty() {
            return Err(SoError::MalformedDocument(format!(
                "Table {} ended inside an open element",
                self.table.name()
            )));
        }
        self.table.set_number_of_rows(self.rows)?;
        debug!(
            "Parsed table {} ({} rows x {} columns)",
            self.table.name(),
            self.rows,
            self.table.num_columns()
        );
        Ok(self.table)
    }

    fn define_column(&mut self, attrs: &[(String, String)]) -> Result<()> {
        let column_id = attribute(attrs, attributes::COLUMN_ID).ok_or_else(|| {
            SoError::MalformedDocument(format!(
                "Column without columnId in table {}",
                self.table.name()
            ))
        })?;
        let value_type: ValueType = attribute(attrs, attributes::VALUE_TYPE)
            .ok_or_else(|| {
                SoError::MalformedDocument(format!("Column {} has no valueType", column_id))
            })?
            .parse()?;
        let column_types = attribute(attrs, attributes::COLUMN_TYPE)
            .map(ColumnType::parse_list)
            .unwrap_or_default();

        self.table
            .add_empty_column(column_id, &column_types, value_type)?;
        Ok(())
    }

    fn start_leaf(&mut self, leaf: Leaf) -> Result<()> {
        if self.current_column >= self.table.num_columns() {
            return Err(SoError::MalformedDocument(format!(
                "Row {} of table {} has more values than the {} declared columns",
                self.rows + 1,
                self.table.name(),
                self.table.num_columns()
            )));
        }
        self.text.clear();
        self.stack.push(State::Leaf(leaf));
        Ok(())
    }

    fn commit_leaf(&mut self, leaf: Leaf) -> Result<()> {
        let text = std::mem::take(&mut self.text);
        let index = self.current_column;
        let len = self.table.num_columns();
        let column = self.table.column_mut(index).ok_or(SoError::IndexOutOfRange {
            what: "column",
            index,
            len,
        })?;

        match leaf {
            Leaf::Real => column.append_real(codec::string_to_double(&text))?,
            Leaf::Int => column.append_int(codec::string_to_int(&text))?,
            Leaf::Text => column.append_string(text)?,
            Leaf::True => column.append_boolean(true)?,
            Leaf::False => column.append_boolean(false)?,
            Leaf::Na => column.append_real(codec::na())?,
            Leaf::NaN => column.append_real(f64::NAN)?,
            Leaf::PlusInf => column.append_real(f64::INFINITY)?,
            Leaf::MinusInf => column.append_real(f64::NEG_INFINITY)?,
        }
        self.current_column += 1;
        Ok(())
    }

    fn end_row(&mut self) -> Result<()> {
        if self.current_column != self.table.num_columns() {
            return Err(SoError::MalformedDocument(format!(
                "Row {} of table {} has {} values, expected {}",
                self.rows + 1,
                self.table.name(),
                self.current_column,
                self.table.num_columns()
            )));
        }
        self.rows += 1;
        self.current_column = 0;
        Ok(())
    }
}

impl EventHandler for TableParser {
    fn on_start(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()> {
        if let Some(State::ExternalFile(parser)) = self.stack.last_mut() {
            return parser.on_start(name, attrs);
        }

        let scope = self.stack.last().map(Scope::of);
        match (scope, name) {
            (Some(Scope::Ignored), _) => self.stack.push(State::Ignored),
            (None, elements::DEFINITION) => self.stack.push(State::Definition),
            (None, elements::TABLE) => self.stack.push(State::Rows),
            (None, elements::EXTERNAL_FILE) => {
                let parser =
                    ExternalFileParser::new(&qualified(DS_PREFIX, elements::EXTERNAL_FILE), attrs);
                self.stack.push(State::ExternalFile(parser));
            }
            (Some(Scope::Definition), elements::COLUMN) => {
                self.define_column(attrs)?;
                self.stack.push(State::Column);
            }
            (Some(Scope::Rows), elements::ROW) => {
                self.current_column = 0;
                self.stack.push(State::Row);
            }
            (Some(Scope::Row), other) => match Leaf::from_name(other) {
                Some(leaf) => self.start_leaf(leaf)?,
                None => {
                    return Err(SoError::MalformedDocument(format!(
                        "Unexpected <{}> in row of table {}",
                        other,
                        self.table.name()
                    )))
                }
            },
            (_, other) => {
                warn!("Skipping <{}> in table {}", other, self.table.name());
                self.stack.push(State::Ignored);
            }
        }
        Ok(())
    }

    fn on_end(&mut self, name: &str) -> Result<()> {
        if let Some(State::ExternalFile(parser)) = self.stack.last_mut() {
            if parser.depth() > 0 {
                return parser.on_end(name);
            }
        }

        match self.stack.pop() {
            Some(State::ExternalFile(parser)) => self.table.set_external_file(parser.finish()),
            Some(State::Leaf(leaf)) => self.commit_leaf(leaf)?,
            Some(State::Row) => self.end_row()?,
            Some(_) => {}
            None => {
                return Err(SoError::MalformedDocument(format!(
                    "Unbalanced </{}> in table {}",
                    name,
                    self.table.name()
                )))
            }
        }
        Ok(())
    }

    fn on_characters(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(State::Leaf(_)) => self.text.push_str(text),
            Some(State::ExternalFile(parser)) => parser.on_characters(text)?,
            _ => {}
        }
        Ok(())
    }
}
