//! Tree mutations.
//!
//! Every operation takes the current [`BuilderState`] and returns a new one.
//! Nothing is mutated in place: the path from the form to the touched node
//! is copied on write and every other subtree keeps its `Arc`.
//!
//! Ids that no longer exist are tolerated. The presentation layer can send
//! events for nodes a previous event already removed, so an unknown id is a
//! silent no-op that hands back the input state.

use crate::{
    error::Result, resolve_targets, retain_live, reorder::try_reorder, Column, EngineConfig,
    Error, Field, FieldType, Form, IdGenerator, Location, NodeId, NodeKind, NodeRef, Row,
    Section, Selection,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// One snapshot of the editor: the schema tree plus the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderState {
    form: Arc<Form>,
    selection: Selection,
}

impl BuilderState {
    /// Start editing `form` with nothing selected.
    pub fn new(form: Form) -> Self {
        Self {
            form: Arc::new(form),
            selection: None,
        }
    }

    /// The schema tree.
    pub fn form(&self) -> &Arc<Form> {
        &self.form
    }

    /// The selected node, if any.
    pub fn selection(&self) -> Option<&NodeRef> {
        self.selection.as_ref()
    }

    /// Install a new tree, dropping the selection if its node is gone.
    fn replace_form(&self, form: Form) -> Self {
        let selection = retain_live(&self.selection, &form);
        if self.selection.is_some() && selection.is_none() {
            tracing::debug!("selected node removed, clearing selection");
        }
        Self {
            form: Arc::new(form),
            selection,
        }
    }
}

/// Edits to the form's own attributes. Absent keys are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

/// Edits to a field. The field type is not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` clears the label.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<Option<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from a missing key (`None`).
pub(crate) fn double_option<'de, D, T>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn section_title(title: &str, config: &EngineConfig) -> String {
    if title.trim().is_empty() {
        config.default_section_title.clone()
    } else {
        title.to_string()
    }
}

fn next_field_name(form: &Form, prefix: &str) -> String {
    let highest = form
        .fields()
        .filter_map(|f| f.name.strip_prefix(prefix)?.strip_prefix('_')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}_{}", prefix, highest + 1)
}

fn column_mut(form: &mut Form, section: usize, row: usize, column: usize) -> &mut Column {
    let section = Arc::make_mut(&mut form.sections[section]);
    let row = Arc::make_mut(&mut section.rows[row]);
    Arc::make_mut(&mut row.columns[column])
}

/// Append a section with no rows. An empty title becomes the configured
/// default.
pub fn add_section(
    state: &BuilderState,
    ids: &mut dyn IdGenerator,
    config: &EngineConfig,
    title: &str,
) -> BuilderState {
    let section = Section::new(ids.next_id(NodeKind::Section), section_title(title, config));
    tracing::debug!(section_id = %section.id, "adding section");

    let mut form = Form::clone(&state.form);
    form.sections.push(Arc::new(section));
    state.replace_form(form)
}

/// Remove a section and everything below it.
pub fn remove_section(state: &BuilderState, section_id: &str) -> BuilderState {
    let Some(index) = state.form.sections.iter().position(|s| s.id == section_id) else {
        tracing::debug!(section_id, "remove_section: unknown section, ignoring");
        return state.clone();
    };

    let mut form = Form::clone(&state.form);
    form.sections.remove(index);
    state.replace_form(form)
}

/// Rename a section. An empty title becomes the configured default.
pub fn update_section(
    state: &BuilderState,
    config: &EngineConfig,
    section_id: &str,
    title: &str,
) -> BuilderState {
    let Some(index) = state.form.sections.iter().position(|s| s.id == section_id) else {
        tracing::debug!(section_id, "update_section: unknown section, ignoring");
        return state.clone();
    };

    let title = section_title(title, config);
    if state.form.sections[index].title == title {
        return state.clone();
    }

    let mut form = Form::clone(&state.form);
    Arc::make_mut(&mut form.sections[index]).title = title;
    state.replace_form(form)
}

/// Append a row, seeded with the configured column layout, to a section.
///
/// Consumes one id for the row and one per column. An unknown section
/// consumes none.
pub fn add_row(
    state: &BuilderState,
    ids: &mut dyn IdGenerator,
    config: &EngineConfig,
    section_id: &str,
) -> BuilderState {
    let Some(index) = state.form.sections.iter().position(|s| s.id == section_id) else {
        tracing::debug!(section_id, "add_row: unknown section, ignoring");
        return state.clone();
    };

    let row_id = ids.next_id(NodeKind::Row);
    let columns = config
        .default_row_spans
        .iter()
        .map(|span| Column::new(ids.next_id(NodeKind::Column), *span))
        .collect();
    let row = Row::new(row_id, columns);
    tracing::debug!(section_id, row_id = %row.id, "adding row");

    let mut form = Form::clone(&state.form);
    Arc::make_mut(&mut form.sections[index])
        .rows
        .push(Arc::new(row));
    state.replace_form(form)
}

/// Remove a row, wherever it lives, and everything below it.
pub fn remove_row(state: &BuilderState, row_id: &str) -> BuilderState {
    let Some(Location::Row { section, row }) = state.form.locate(row_id) else {
        tracing::debug!(row_id, "remove_row: unknown row, ignoring");
        return state.clone();
    };

    let mut form = Form::clone(&state.form);
    Arc::make_mut(&mut form.sections[section]).rows.remove(row);
    state.replace_form(form)
}

/// Append a field of `field_type` to a column, named `<prefix>_<n>`.
pub fn add_field(
    state: &BuilderState,
    ids: &mut dyn IdGenerator,
    config: &EngineConfig,
    column_id: &str,
    field_type: FieldType,
) -> BuilderState {
    let Some(Location::Column {
        section,
        row,
        column,
    }) = state.form.locate(column_id)
    else {
        tracing::debug!(column_id, "add_field: unknown column, ignoring");
        return state.clone();
    };

    let name = next_field_name(&state.form, &config.field_name_prefix);
    let field = Field::new(ids.next_id(NodeKind::Field), field_type, name);
    tracing::debug!(column_id, field_id = %field.id, %field_type, "adding field");

    let mut form = Form::clone(&state.form);
    column_mut(&mut form, section, row, column)
        .fields
        .push(Arc::new(field));
    state.replace_form(form)
}

/// Remove a field.
pub fn remove_field(state: &BuilderState, field_id: &str) -> BuilderState {
    let Some(Location::Field {
        section,
        row,
        column,
        field,
    }) = state.form.locate(field_id)
    else {
        tracing::debug!(field_id, "remove_field: unknown field, ignoring");
        return state.clone();
    };

    let mut form = Form::clone(&state.form);
    column_mut(&mut form, section, row, column).fields.remove(field);
    state.replace_form(form)
}

/// Edit a field's name and label.
pub fn update_field(state: &BuilderState, field_id: &str, patch: &FieldPatch) -> BuilderState {
    let Some(Location::Field {
        section,
        row,
        column,
        field,
    }) = state.form.locate(field_id)
    else {
        tracing::debug!(field_id, "update_field: unknown field, ignoring");
        return state.clone();
    };

    let current = &state.form.sections[section].rows[row].columns[column].fields[field];
    let mut updated = Field::clone(current);
    if let Some(name) = &patch.name {
        updated.name = name.clone();
    }
    if let Some(label) = &patch.label {
        updated.label = label.clone();
    }
    if updated == **current {
        return state.clone();
    }

    let mut form = Form::clone(&state.form);
    column_mut(&mut form, section, row, column).fields[field] = Arc::new(updated);
    state.replace_form(form)
}

/// Move a row within its section's row list.
pub fn reorder_rows(state: &BuilderState, section_id: &str, from: usize, to: usize) -> BuilderState {
    let Some(index) = state.form.sections.iter().position(|s| s.id == section_id) else {
        tracing::debug!(section_id, "reorder_rows: unknown section, ignoring");
        return state.clone();
    };
    let Some(rows) = try_reorder(&state.form.sections[index].rows, from, to) else {
        tracing::debug!(section_id, from, to, "reorder_rows: nothing to move");
        return state.clone();
    };

    let mut form = Form::clone(&state.form);
    Arc::make_mut(&mut form.sections[index]).rows = rows;
    state.replace_form(form)
}

/// Move a field within its column's field list.
pub fn reorder_fields(
    state: &BuilderState,
    column_id: &str,
    from: usize,
    to: usize,
) -> BuilderState {
    let Some(Location::Column {
        section,
        row,
        column,
    }) = state.form.locate(column_id)
    else {
        tracing::debug!(column_id, "reorder_fields: unknown column, ignoring");
        return state.clone();
    };
    let current = &state.form.sections[section].rows[row].columns[column].fields;
    let Some(fields) = try_reorder(current, from, to) else {
        tracing::debug!(column_id, from, to, "reorder_fields: nothing to move");
        return state.clone();
    };

    let mut form = Form::clone(&state.form);
    column_mut(&mut form, section, row, column).fields = fields;
    state.replace_form(form)
}

/// Merge name and description edits into the form. Never fails.
pub fn update_form(state: &BuilderState, patch: &FormPatch) -> BuilderState {
    let mut form = Form::clone(&state.form);
    if let Some(name) = &patch.name {
        form.name = name.clone();
    }
    if let Some(description) = &patch.description {
        form.description = description.clone();
    }
    if form == *state.form {
        return state.clone();
    }
    state.replace_form(form)
}

/// Select a node, or clear the selection with `None`.
///
/// A reference to a node that is not in the tree is stale and ignored.
pub fn select_element(state: &BuilderState, target: Option<NodeRef>) -> BuilderState {
    match target {
        None => BuilderState {
            form: Arc::clone(&state.form),
            selection: None,
        },
        Some(target) if target.is_live(&state.form) => BuilderState {
            form: Arc::clone(&state.form),
            selection: Some(target),
        },
        Some(target) => {
            tracing::debug!(kind = %target.kind, id = %target.id, "select_element: stale reference, ignoring");
            state.clone()
        }
    }
}

/// Add a field to the column the current selection resolves to.
pub fn add_field_at_selection(
    state: &BuilderState,
    ids: &mut dyn IdGenerator,
    config: &EngineConfig,
    field_type: FieldType,
) -> Result<BuilderState> {
    let column_id: NodeId = resolve_targets(&state.form, state.selection())
        .column
        .ok_or(Error::NoTarget(NodeKind::Column))?;
    Ok(add_field(state, ids, config, &column_id, field_type))
}

/// Add a row to the section the current selection resolves to.
pub fn add_row_at_selection(
    state: &BuilderState,
    ids: &mut dyn IdGenerator,
    config: &EngineConfig,
) -> Result<BuilderState> {
    let section_id: NodeId = resolve_targets(&state.form, state.selection())
        .section
        .ok_or(Error::NoTarget(NodeKind::Section))?;
    Ok(add_row(state, ids, config, &section_id))
}
