//! Dispatcher that assembles the document tree from parse events.

use log::{debug, warn};

use super::EventHandler;
use crate::document::{Element, Node};
use crate::error::{Result, SoError};
use crate::estring::EstringParser;
use crate::external::ExternalFileParser;
use crate::matrix::MatrixParser;
use crate::schema::{structure, NodeKind, ROOT_ATTRIBUTES, ROOT_ELEMENT};
use crate::table::TableParser;

/// One active parse context. Object parsers see only the events inside
/// their own element; `depth` counts how far below it the current event is.
#[derive(Debug)]
enum Frame {
    Element(Element),
    Table { parser: TableParser, depth: usize },
    Matrix { parser: MatrixParser, depth: usize },
    ExternalFile(ExternalFileParser),
    Leaf { parser: EstringParser, depth: usize },
    Skip(usize),
}

/// Builds the root [`Element`] of an SO document
#[derive(Debug, Default)]
pub(crate) struct DocumentBuilder {
    stack: Vec<Frame>,
    root: Option<Element>,
}

impl DocumentBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn finish(self) -> Result<Element> {
        if !self.stack.is_empty() {
            return Err(SoError::MalformedDocument(format!(
                "Document ended with {} open elements",
                self.stack.len()
            )));
        }
        self.root
            .ok_or_else(|| SoError::MalformedDocument("Document has no SO element".to_string()))
    }

    fn start_root(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()> {
        if self.root.is_some() || name != ROOT_ELEMENT {
            return Err(SoError::MalformedDocument(format!(
                "Root element is <{}>, expected <{}>",
                name, ROOT_ELEMENT
            )));
        }
        let extra: Vec<(String, String)> = attrs
            .iter()
            .filter(|(key, _)| !ROOT_ATTRIBUTES.iter().any(|(k, _)| k == key))
            .filter(|(key, _)| !key.starts_with("xmlns"))
            .cloned()
            .collect();
        self.stack.push(Frame::Element(Element::new(
            ROOT_ELEMENT,
            &structure::SO,
            extra,
        )));
        Ok(())
    }

    fn start_child(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()> {
        let Some(Frame::Element(parent)) = self.stack.last() else {
            return Err(SoError::MalformedDocument(format!(
                "<{}> opened outside of a container",
                name
            )));
        };
        let Some((_, child)) = parent.spec().child(name) else {
            warn!("Skipping unknown element <{}> in {}", name, parent.name());
            self.stack.push(Frame::Skip(0));
            return Ok(());
        };

        let qualified = child.qualified_name();
        let frame = match child.kind {
            NodeKind::Element(spec) => Frame::Element(Element::new(qualified, spec, attrs.to_vec())),
            NodeKind::Table => Frame::Table {
                parser: TableParser::new(&qualified, attrs),
                depth: 0,
            },
            NodeKind::Matrix => Frame::Matrix {
                parser: MatrixParser::new(&qualified),
                depth: 0,
            },
            NodeKind::ExternalFile => Frame::ExternalFile(ExternalFileParser::new(&qualified, attrs)),
            NodeKind::Leaf => Frame::Leaf {
                parser: EstringParser::new(&qualified),
                depth: 0,
            },
        };
        self.stack.push(frame);
        Ok(())
    }

    fn attach(&mut self, node: Node) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Element(parent)) => {
                parent.push_child(node);
                Ok(())
            }
            _ => Err(SoError::MalformedDocument(format!(
                "<{}> closed outside of a container",
                node.name()
            ))),
        }
    }

    /// Pop the finished top frame and hand its object to the parent
    fn close(&mut self) -> Result<()> {
        let node = match self.stack.pop() {
            Some(Frame::Element(element)) => {
                if self.stack.is_empty() {
                    debug!("Finished <{}>", element.name());
                    self.root = Some(element);
                    return Ok(());
                }
                Node::Element(element)
            }
            Some(Frame::Table { parser, .. }) => Node::Table(parser.finish()?),
            Some(Frame::Matrix { parser, .. }) => Node::Matrix(parser.finish()?),
            Some(Frame::ExternalFile(parser)) => Node::ExternalFile(parser.finish()),
            Some(Frame::Leaf { parser, .. }) => Node::Leaf(parser.finish()),
            Some(Frame::Skip(_)) => return Ok(()),
            None => {
                return Err(SoError::MalformedDocument(
                    "End tag without open element".to_string(),
                ))
            }
        };
        self.attach(node)
    }
}

impl EventHandler for DocumentBuilder {
    fn on_start(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()> {
        match self.stack.last_mut() {
            None => self.start_root(name, attrs),
            Some(Frame::Element(_)) => self.start_child(name, attrs),
            Some(Frame::Table { parser, depth }) => {
                *depth += 1;
                parser.on_start(name, attrs)
            }
            Some(Frame::Matrix { parser, depth }) => {
                *depth += 1;
                parser.on_start(name, attrs)
            }
            Some(Frame::Leaf { parser, depth }) => {
                *depth += 1;
                parser.on_start(name, attrs)
            }
            Some(Frame::ExternalFile(parser)) => parser.on_start(name, attrs),
            Some(Frame::Skip(depth)) => {
                *depth += 1;
                Ok(())
            }
        }
    }

    fn on_end(&mut self, name: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Table { parser, depth }) if *depth > 0 => {
                *depth -= 1;
                parser.on_end(name)
            }
            Some(Frame::Matrix { parser, depth }) if *depth > 0 => {
                *depth -= 1;
                parser.on_end(name)
            }
            Some(Frame::Leaf { parser, depth }) if *depth > 0 => {
                *depth -= 1;
                parser.on_end(name)
            }
            Some(Frame::ExternalFile(parser)) if parser.depth() > 0 => parser.on_end(name),
            Some(Frame::Skip(depth)) if *depth > 0 => {
                *depth -= 1;
                Ok(())
            }
            _ => self.close(),
        }
    }

    fn on_characters(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Table { parser, .. }) => parser.on_characters(text),
            Some(Frame::Matrix { parser, .. }) => parser.on_characters(text),
            Some(Frame::Leaf { parser, .. }) => parser.on_characters(text),
            Some(Frame::ExternalFile(parser)) => parser.on_characters(text),
            _ => Ok(()),
        }
    }
}
