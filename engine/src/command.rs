//! Serializable commands: the engine's public operations as data.
//!
//! The presentation layer sends these; [`crate::Engine::apply`] is the only
//! path by which they change a [`crate::BuilderState`].

use crate::mutation::double_option;
use crate::{FieldType, FormPatch, NodeId, NodeRef};
use serde::{Deserialize, Serialize};

/// A single edit to the builder state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    AddSection {
        #[serde(default)]
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    RemoveSection { section_id: NodeId },
    #[serde(rename_all = "camelCase")]
    UpdateSection { section_id: NodeId, title: String },
    #[serde(rename_all = "camelCase")]
    AddRow { section_id: NodeId },
    #[serde(rename_all = "camelCase")]
    RemoveRow { row_id: NodeId },
    #[serde(rename_all = "camelCase")]
    AddField {
        column_id: NodeId,
        #[serde(rename = "type")]
        field_type: FieldType,
    },
    #[serde(rename_all = "camelCase")]
    RemoveField { field_id: NodeId },
    #[serde(rename_all = "camelCase")]
    UpdateField {
        field_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        label: Option<Option<String>>,
    },
    #[serde(rename_all = "camelCase")]
    ReorderRows {
        section_id: NodeId,
        from_index: usize,
        to_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    ReorderFields {
        column_id: NodeId,
        from_index: usize,
        to_index: usize,
    },
    UpdateForm(FormPatch),
    SelectElement {
        #[serde(default)]
        target: Option<NodeRef>,
    },
}

impl Command {
    /// Name of the operation, as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddSection { .. } => "addSection",
            Command::RemoveSection { .. } => "removeSection",
            Command::UpdateSection { .. } => "updateSection",
            Command::AddRow { .. } => "addRow",
            Command::RemoveRow { .. } => "removeRow",
            Command::AddField { .. } => "addField",
            Command::RemoveField { .. } => "removeField",
            Command::UpdateField { .. } => "updateField",
            Command::ReorderRows { .. } => "reorderRows",
            Command::ReorderFields { .. } => "reorderFields",
            Command::UpdateForm(_) => "updateForm",
            Command::SelectElement { .. } => "selectElement",
        }
    }

    /// Whether applying this command may allocate node ids.
    pub fn allocates_ids(&self) -> bool {
        matches!(
            self,
            Command::AddSection { .. } | Command::AddRow { .. } | Command::AddField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format() {
        let cmd = Command::AddField {
            column_id: "column-3".into(),
            field_type: FieldType::Textarea,
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            json,
            json!({"op": "addField", "columnId": "column-3", "type": "textarea"})
        );
    }

    #[test]
    fn parse_presentation_payloads() {
        let cmd: Command = serde_json::from_value(json!({
            "op": "reorderRows",
            "sectionId": "section-1",
            "fromIndex": 0,
            "toIndex": 2
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::ReorderRows {
                section_id: "section-1".into(),
                from_index: 0,
                to_index: 2
            }
        );

        let cmd: Command = serde_json::from_value(json!({"op": "addSection"})).unwrap();
        assert_eq!(cmd, Command::AddSection { title: String::new() });

        let cmd: Command = serde_json::from_value(json!({
            "op": "updateForm",
            "name": "Survey",
            "description": null
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::UpdateForm(FormPatch {
                name: Some("Survey".into()),
                description: Some(None),
            })
        );

        let cmd: Command = serde_json::from_value(json!({
            "op": "selectElement",
            "target": {"type": "row", "id": "row-2"}
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::SelectElement {
                target: Some(NodeRef::row("row-2"))
            }
        );
    }

    #[test]
    fn update_field_distinguishes_null_label() {
        let cmd: Command = serde_json::from_value(json!({
            "op": "updateField",
            "fieldId": "field-1",
            "label": null
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::UpdateField {
                field_id: "field-1".into(),
                name: None,
                label: Some(None),
            }
        );
    }

    #[test]
    fn rejects_unknown_field_type() {
        let result: Result<Command, _> = serde_json::from_value(json!({
            "op": "addField",
            "columnId": "column-1",
            "type": "color"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn names_match_wire_tags() {
        let commands = vec![
            Command::AddSection { title: "S".into() },
            Command::RemoveRow {
                row_id: "row-1".into(),
            },
            Command::UpdateForm(FormPatch::default()),
            Command::SelectElement { target: None },
        ];
        for cmd in commands {
            let json = serde_json::to_value(&cmd).unwrap();
            assert_eq!(json["op"], cmd.name());
        }
    }

    #[test]
    fn only_adds_allocate() {
        assert!(Command::AddRow {
            section_id: "section-1".into()
        }
        .allocates_ids());
        assert!(!Command::RemoveSection {
            section_id: "section-1".into()
        }
        .allocates_ids());
    }
}
