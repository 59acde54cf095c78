//! The schema tree: Form → Section → Row → Column → Field.
//!
//! Children are held behind `Arc` so that a mutation only copies the path
//! from the form down to the node it touches. Every other subtree is shared
//! between the previous and the new tree, and `Arc::ptr_eq` tells a
//! consumer which parts changed.

use crate::{Error, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Widest span a column may take; also the conventional width of a row.
pub const MAX_SPAN: u8 = 4;

/// Which variant of the tree a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Form,
    Section,
    Row,
    Column,
    Field,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Form => "form",
            NodeKind::Section => "section",
            NodeKind::Row => "row",
            NodeKind::Column => "column",
            NodeKind::Field => "field",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input types a field can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Select,
    Checkbox,
    Radio,
}

impl FieldType {
    /// Every field type, in palette order.
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Date,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| Error::MalformedSchema(format!("unknown field type: {s}")))
    }
}

/// A leaf input of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: NodeId,
    /// Fixed at creation.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Field {
    pub fn new(id: impl Into<NodeId>, field_type: FieldType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            name: name.into(),
            label: None,
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A vertical slot inside a row, `span` quarters wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: NodeId,
    pub span: u8,
    pub fields: Vec<Arc<Field>>,
}

impl Column {
    pub fn new(id: impl Into<NodeId>, span: u8) -> Self {
        Self {
            id: id.into(),
            span,
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style).
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(Arc::new(field));
        self
    }
}

/// A horizontal band of columns. The column layout is fixed when the row
/// is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: NodeId,
    pub columns: Vec<Arc<Column>>,
}

impl Row {
    pub fn new(id: impl Into<NodeId>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            columns: columns.into_iter().map(Arc::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: NodeId,
    pub title: String,
    pub rows: Vec<Arc<Row>>,
}

impl Section {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row (builder style).
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(Arc::new(row));
        self
    }
}

/// Root of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Fixed at creation; name edits never change it.
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<Arc<Section>>,
}

/// Index path from the form down to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Form,
    Section {
        section: usize,
    },
    Row {
        section: usize,
        row: usize,
    },
    Column {
        section: usize,
        row: usize,
        column: usize,
    },
    Field {
        section: usize,
        row: usize,
        column: usize,
        field: usize,
    },
}

impl Location {
    /// Kind of the node at this location.
    pub fn kind(&self) -> NodeKind {
        match self {
            Location::Form => NodeKind::Form,
            Location::Section { .. } => NodeKind::Section,
            Location::Row { .. } => NodeKind::Row,
            Location::Column { .. } => NodeKind::Column,
            Location::Field { .. } => NodeKind::Field,
        }
    }

    /// Index of the owning (or located) section, if below the form.
    pub fn section_index(&self) -> Option<usize> {
        match *self {
            Location::Form => None,
            Location::Section { section }
            | Location::Row { section, .. }
            | Location::Column { section, .. }
            | Location::Field { section, .. } => Some(section),
        }
    }
}

impl Form {
    /// Create an empty form.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            sections: Vec::new(),
        }
    }

    /// Append a section (builder style).
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(Arc::new(section));
        self
    }

    /// Find a node by id.
    ///
    /// Searches sections first, then rows within sections, then columns
    /// within rows, then fields within columns.
    pub fn locate(&self, id: &str) -> Option<Location> {
        if self.id == id {
            return Some(Location::Form);
        }
        if let Some(section) = self.sections.iter().position(|s| s.id == id) {
            return Some(Location::Section { section });
        }
        for (section, s) in self.sections.iter().enumerate() {
            if let Some(row) = s.rows.iter().position(|r| r.id == id) {
                return Some(Location::Row { section, row });
            }
        }
        for (section, s) in self.sections.iter().enumerate() {
            for (row, r) in s.rows.iter().enumerate() {
                if let Some(column) = r.columns.iter().position(|c| c.id == id) {
                    return Some(Location::Column {
                        section,
                        row,
                        column,
                    });
                }
            }
        }
        for (section, s) in self.sections.iter().enumerate() {
            for (row, r) in s.rows.iter().enumerate() {
                for (column, c) in r.columns.iter().enumerate() {
                    if let Some(field) = c.fields.iter().position(|f| f.id == id) {
                        return Some(Location::Field {
                            section,
                            row,
                            column,
                            field,
                        });
                    }
                }
            }
        }
        None
    }

    /// Check whether a node with this id and kind exists.
    pub fn contains(&self, kind: NodeKind, id: &str) -> bool {
        self.locate(id).is_some_and(|loc| loc.kind() == kind)
    }

    /// Get a section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id).map(|s| &**s)
    }

    /// Get a row by id.
    pub fn row(&self, id: &str) -> Option<&Row> {
        match self.locate(id)? {
            Location::Row { section, row } => Some(&*self.sections[section].rows[row]),
            _ => None,
        }
    }

    /// Get a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        match self.locate(id)? {
            Location::Column {
                section,
                row,
                column,
            } => Some(&*self.sections[section].rows[row].columns[column]),
            _ => None,
        }
    }

    /// Get a field by id.
    pub fn field(&self, id: &str) -> Option<&Field> {
        match self.locate(id)? {
            Location::Field {
                section,
                row,
                column,
                field,
            } => Some(&*self.sections[section].rows[row].columns[column].fields[field]),
            _ => None,
        }
    }

    /// Every field in tree order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.fields.iter())
            .map(|f| &**f)
    }

    /// Every node id in tree order, the form's own id first.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.id.as_str()).chain(self.sections.iter().flat_map(|section| {
            std::iter::once(section.id.as_str()).chain(section.rows.iter().flat_map(|row| {
                std::iter::once(row.id.as_str()).chain(row.columns.iter().flat_map(|column| {
                    std::iter::once(column.id.as_str())
                        .chain(column.fields.iter().map(|field| field.id.as_str()))
                }))
            }))
        }))
    }

    /// Total number of nodes, the form included.
    pub fn node_count(&self) -> usize {
        self.node_ids().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> Form {
        Form::new("form-1", "Signup")
            .with_section(
                Section::new("section-1", "Personal").with_row(Row::new(
                    "row-1",
                    vec![
                        Column::new("column-1", 2).with_field(Field::new(
                            "field-1",
                            FieldType::Text,
                            "first_name",
                        )),
                        Column::new("column-2", 2),
                    ],
                )),
            )
            .with_section(Section::new("section-2", "Extra"))
    }

    #[test]
    fn locate_every_kind() {
        let form = sample_form();
        assert_eq!(form.locate("form-1"), Some(Location::Form));
        assert_eq!(
            form.locate("section-2"),
            Some(Location::Section { section: 1 })
        );
        assert_eq!(
            form.locate("row-1"),
            Some(Location::Row { section: 0, row: 0 })
        );
        assert_eq!(
            form.locate("column-2"),
            Some(Location::Column {
                section: 0,
                row: 0,
                column: 1
            })
        );
        assert_eq!(
            form.locate("field-1"),
            Some(Location::Field {
                section: 0,
                row: 0,
                column: 0,
                field: 0
            })
        );
        assert_eq!(form.locate("nope"), None);
    }

    #[test]
    fn contains_checks_kind() {
        let form = sample_form();
        assert!(form.contains(NodeKind::Row, "row-1"));
        assert!(!form.contains(NodeKind::Column, "row-1"));
        assert!(!form.contains(NodeKind::Row, "row-9"));
    }

    #[test]
    fn typed_lookups() {
        let form = sample_form();
        assert_eq!(form.section("section-1").map(|s| s.title.as_str()), Some("Personal"));
        assert_eq!(form.row("row-1").map(|r| r.columns.len()), Some(2));
        assert_eq!(form.column("column-1").map(|c| c.span), Some(2));
        assert_eq!(
            form.field("field-1").map(|f| f.field_type),
            Some(FieldType::Text)
        );
        assert!(form.row("column-1").is_none());
    }

    #[test]
    fn node_ids_in_tree_order() {
        let form = sample_form();
        let ids: Vec<_> = form.node_ids().collect();
        assert_eq!(
            ids,
            vec![
                "form-1",
                "section-1",
                "row-1",
                "column-1",
                "field-1",
                "column-2",
                "section-2"
            ]
        );
        assert_eq!(form.node_count(), 7);
    }

    #[test]
    fn field_type_parse_and_display() {
        for ty in FieldType::ALL {
            assert_eq!(ty.to_string().parse::<FieldType>().unwrap(), ty);
        }
        assert!("color".parse::<FieldType>().is_err());
    }

    #[test]
    fn serialization_format() {
        let form = sample_form();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["sections"][0]["rows"][0]["columns"][0]["fields"][0]["type"], "text");
        // absent optionals are omitted
        assert!(json.get("description").is_none());
        assert!(json["sections"][0]["rows"][0]["columns"][0]["fields"][0]
            .get("label")
            .is_none());
    }
}
