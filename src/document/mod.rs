//! # SO Document Model
//!
//! An SO document is a tree of container [`Element`]s whose leaves are
//! tables, matrices, external file references and text leaves. Which
//! children a container may hold is fixed by [`crate::schema::structure`];
//! every insertion through the API is checked against it.
//!
//! Paths address descendants by `/`-separated local element names, relative
//! to the element they are used on, e.g. `Estimation/PopulationEstimates/MLE`
//! on an `SOBlock`. Where a name repeats, a path follows the first match.

mod block;
mod so;

#[cfg(test)]
mod tests;

pub use so::So;

use crate::error::{Result, SoError};
use crate::estring::Estring;
use crate::external::ExternalFile;
use crate::matrix::Matrix;
use crate::schema::{local_name, ChildSpec, ElementSpec, NodeKind};
use crate::table::Table;

/// A child of a container element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Nested container
    Element(Element),
    /// Dataset table
    Table(Table),
    /// Named matrix
    Matrix(Matrix),
    /// External file reference
    ExternalFile(ExternalFile),
    /// Text leaf
    Leaf(Estring),
}

impl Node {
    /// Element name as written
    pub fn name(&self) -> &str {
        match self {
            Node::Element(e) => e.name(),
            Node::Table(t) => t.name(),
            Node::Matrix(m) => m.name(),
            Node::ExternalFile(f) => f.name(),
            Node::Leaf(l) => l.name(),
        }
    }

    /// Element name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(self.name())
    }
}

/// A container element of an SO document
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    spec: &'static ElementSpec,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub(crate) fn new(
        name: impl Into<String>,
        spec: &'static ElementSpec,
        attributes: Vec<(String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            spec,
            attributes,
            children: Vec::new(),
        }
    }

    /// Element name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Structure entry the element follows
    pub fn spec(&self) -> &'static ElementSpec {
        self.spec
    }

    /// Attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of attribute `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a declared attribute, replacing an existing value
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        if !self.spec.has_attribute(key) {
            return Err(SoError::InvalidStructure(format!(
                "{} has no attribute '{}'",
                self.name, key
            )));
        }
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
        Ok(())
    }

    /// Children in document order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    /// First child with local name `name`
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|n| n.local_name() == name)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|n| n.local_name() == name)
    }

    /// All children with local name `name`
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |n| n.local_name() == name)
    }

    /// Container children with local name `name`
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children_named(name).filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Remove all children with local name `name`, returning how many there were
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|n| n.local_name() != name);
        before - self.children.len()
    }

    fn split(path: &str) -> (Option<&str>, &str) {
        match path.rfind('/') {
            Some(pos) => (Some(&path[..pos]), &path[pos + 1..]),
            None => (None, path),
        }
    }

    /// Descendant container at `path`
    pub fn element_at(&self, path: &str) -> Option<&Element> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match current.child(segment)? {
                Node::Element(e) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable descendant container at `path`
    pub fn element_at_mut(&mut self, path: &str) -> Option<&mut Element> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match current.child_mut(segment)? {
                Node::Element(e) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    fn node_at(&self, path: &str) -> Option<&Node> {
        let (parent, name) = Self::split(path);
        let parent = match parent {
            Some(p) => self.element_at(p)?,
            None => self,
        };
        parent.child(name)
    }

    fn node_at_mut(&mut self, path: &str) -> Option<&mut Node> {
        let (parent, name) = Self::split(path);
        let parent = match parent {
            Some(p) => self.element_at_mut(p)?,
            None => self,
        };
        parent.child_mut(name)
    }

    /// Table at `path`
    pub fn table_at(&self, path: &str) -> Option<&Table> {
        match self.node_at(path)? {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable table at `path`
    pub fn table_at_mut(&mut self, path: &str) -> Option<&mut Table> {
        match self.node_at_mut(path)? {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Matrix at `path`
    pub fn matrix_at(&self, path: &str) -> Option<&Matrix> {
        match self.node_at(path)? {
            Node::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable matrix at `path`
    pub fn matrix_at_mut(&mut self, path: &str) -> Option<&mut Matrix> {
        match self.node_at_mut(path)? {
            Node::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Text of the leaf at `path`
    pub fn leaf_at(&self, path: &str) -> Option<&str> {
        match self.node_at(path)? {
            Node::Leaf(l) => Some(l.text()),
            _ => None,
        }
    }

    /// External file references named by the last segment of `path`
    pub fn external_files_at<'a>(&'a self, path: &str) -> Vec<&'a ExternalFile> {
        let (parent, name) = Self::split(path);
        let parent = match parent {
            Some(p) => self.element_at(p),
            None => Some(self),
        };
        parent
            .map(|p| {
                p.children
                    .iter()
                    .filter_map(|n| match n {
                        Node::ExternalFile(f) if n.local_name() == name => Some(f),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All tables below this element, depth first, with their paths
    pub fn tables(&self) -> Vec<(String, &Table)> {
        let mut out = Vec::new();
        self.collect_tables("", &mut out);
        out
    }

    fn collect_tables<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Table)>) {
        for child in &self.children {
            let path = if prefix.is_empty() {
                child.local_name().to_string()
            } else {
                format!("{}/{}", prefix, child.local_name())
            };
            match child {
                Node::Element(e) => e.collect_tables(&path, out),
                Node::Table(t) => out.push((path, t)),
                _ => {}
            }
        }
    }

    /// Mutable access to every table below this element
    pub fn tables_mut(&mut self) -> Vec<&mut Table> {
        let mut out = Vec::new();
        for child in &mut self.children {
            match child {
                Node::Element(e) => out.extend(e.tables_mut()),
                Node::Table(t) => out.push(t),
                _ => {}
            }
        }
        out
    }

    /// Allowed child `name` of this element
    fn child_spec(&self, name: &str) -> Result<&'static ChildSpec> {
        self.spec.child(name).map(|(_, c)| c).ok_or_else(|| {
            SoError::InvalidStructure(format!("{} cannot contain {}", self.name, name))
        })
    }

    fn kind_error(&self, spec: &ChildSpec, wanted: &str) -> SoError {
        SoError::InvalidStructure(format!(
            "{}/{} is {:?}, not {}",
            self.name, spec.name, spec.kind, wanted
        ))
    }

    /// Container at `path`, created (with any missing ancestors) if absent
    pub fn ensure_element(&mut self, path: &str) -> Result<&mut Element> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let spec = current.child_spec(segment)?;
            let NodeKind::Element(element_spec) = spec.kind else {
                return Err(current.kind_error(spec, "a container"));
            };
            let index = match current
                .children
                .iter()
                .position(|n| matches!(n, Node::Element(_)) && n.local_name() == segment)
            {
                Some(index) => index,
                None => {
                    current.children.push(Node::Element(Element::new(
                        spec.qualified_name(),
                        element_spec,
                        Vec::new(),
                    )));
                    current.children.len() - 1
                }
            };
            current = current.container_child(index)?;
        }
        Ok(current)
    }

    /// Append a new container at `path`. The last segment must be a
    /// repeated element or not present yet.
    pub fn push_element(&mut self, path: &str) -> Result<&mut Element> {
        let (parent, name) = Self::split(path);
        let parent = match parent {
            Some(p) => self.ensure_element(p)?,
            None => self,
        };
        let spec = parent.child_spec(name)?;
        let NodeKind::Element(element_spec) = spec.kind else {
            return Err(parent.kind_error(spec, "a container"));
        };
        if !spec.repeated && parent.child(name).is_some() {
            return Err(SoError::InvalidStructure(format!(
                "{} already has a {}",
                parent.name, name
            )));
        }
        parent.children.push(Node::Element(Element::new(
            spec.qualified_name(),
            element_spec,
            Vec::new(),
        )));
        let index = parent.children.len() - 1;
        parent.container_child(index)
    }

    fn container_child(&mut self, index: usize) -> Result<&mut Element> {
        match self.children.get_mut(index) {
            Some(Node::Element(e)) => Ok(e),
            _ => Err(SoError::InvalidStructure(format!(
                "Child {} is not a container",
                index
            ))),
        }
    }

    /// Place `node` as child `name` of the container at `parent_path`.
    ///
    /// Non-repeated children replace an existing node of the same name;
    /// repeated ones are appended when `append` is set.
    fn place(&mut self, path: &str, kind: &str, node: Node, append: bool) -> Result<()> {
        let (parent, name) = Self::split(path);
        let parent = match parent {
            Some(p) => self.ensure_element(p)?,
            None => self,
        };
        let spec = parent.child_spec(name)?;
        let matches_kind = matches!(
            (&spec.kind, &node),
            (NodeKind::Table, Node::Table(_))
                | (NodeKind::Matrix, Node::Matrix(_))
                | (NodeKind::ExternalFile, Node::ExternalFile(_))
                | (NodeKind::Leaf, Node::Leaf(_))
        );
        if !matches_kind {
            return Err(parent.kind_error(spec, kind));
        }
        if append && !spec.repeated {
            return Err(SoError::InvalidStructure(format!(
                "{} can hold only one {}",
                parent.name, name
            )));
        }

        let existing = if append {
            None
        } else {
            parent.children.iter().position(|n| n.local_name() == name)
        };
        match existing {
            Some(index) => parent.children[index] = node,
            None => parent.children.push(node),
        }
        Ok(())
    }

    /// Structure entry of the last segment of `path`, creating missing
    /// ancestors on the way
    fn spec_at(&mut self, path: &str) -> Result<&'static ChildSpec> {
        let (parent, name) = Self::split(path);
        let parent = match parent {
            Some(p) => self.ensure_element(p)?,
            None => self,
        };
        parent.child_spec(name)
    }

    /// Store `table` at `path`, replacing the first table there
    pub fn set_table(&mut self, path: &str, mut table: Table) -> Result<()> {
        table.set_name(self.spec_at(path)?.qualified_name());
        self.place(path, "a table", Node::Table(table), false)
    }

    /// Append `table` at `path`, which must be a repeated table
    pub fn push_table(&mut self, path: &str, mut table: Table) -> Result<()> {
        table.set_name(self.spec_at(path)?.qualified_name());
        self.place(path, "a table", Node::Table(table), true)
    }

    /// Store `matrix` at `path`
    pub fn set_matrix(&mut self, path: &str, mut matrix: Matrix) -> Result<()> {
        matrix.set_name(self.spec_at(path)?.qualified_name());
        self.place(path, "a matrix", Node::Matrix(matrix), false)
    }

    /// Store a text leaf at `path`
    pub fn set_leaf(&mut self, path: &str, text: impl Into<String>) -> Result<()> {
        let leaf = Estring::new(self.spec_at(path)?.qualified_name(), text);
        self.place(path, "a text leaf", Node::Leaf(leaf), false)
    }

    /// Add an external file reference at `path`. Repeated references are
    /// appended, single ones replaced.
    pub fn push_external_file(&mut self, path: &str, mut file: ExternalFile) -> Result<()> {
        let spec = self.spec_at(path)?;
        file.set_name(spec.qualified_name());
        self.place(path, "an external file", Node::ExternalFile(file), spec.repeated)
    }
}
