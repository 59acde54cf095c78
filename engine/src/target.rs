//! Default insertion targets derived from the current selection.
//!
//! Palette actions ("add field", "add row") carry no explicit parent. The
//! parent is inferred here from whatever is selected:
//!
//! | selection | section | column |
//! |---|---|---|
//! | field | section owning the field | column owning the field |
//! | column | section owning the column | the column |
//! | row | section owning the row | row's first column |
//! | section | the section | its first row's first column |
//! | form / nothing | first section | first section's first row's first column |
//!
//! Columns are never selected by the canvas itself, only through
//! `selectElement` commands. A selected column is treated like a field
//! inside it rather than falling back to the form row.
//!
//! A missing intermediate node yields no target. The resolver never
//! substitutes a sibling.

use crate::{Form, Location, NodeId, NodeRef};
use serde::{Deserialize, Serialize};

/// Where palette actions would insert right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targets {
    /// Section receiving a new row.
    pub section: Option<NodeId>,
    /// Column receiving a new field.
    pub column: Option<NodeId>,
}

/// Resolve the default section and column for `selection`.
pub fn resolve_targets(form: &Form, selection: Option<&NodeRef>) -> Targets {
    let Some(selected) = selection else {
        return first_targets(form);
    };

    let location = match form.locate(&selected.id) {
        Some(location) if location.kind() == selected.kind => location,
        _ => {
            tracing::debug!(
                kind = %selected.kind,
                id = %selected.id,
                "selection does not resolve, no insertion target"
            );
            return Targets::default();
        }
    };

    match location {
        Location::Form => first_targets(form),
        Location::Section { section } => {
            let section = &form.sections[section];
            Targets {
                section: Some(section.id.clone()),
                column: section
                    .rows
                    .first()
                    .and_then(|row| row.columns.first())
                    .map(|column| column.id.clone()),
            }
        }
        Location::Row { section, row } => {
            let section = &form.sections[section];
            Targets {
                section: Some(section.id.clone()),
                column: section.rows[row]
                    .columns
                    .first()
                    .map(|column| column.id.clone()),
            }
        }
        Location::Column {
            section,
            row,
            column,
        }
        | Location::Field {
            section,
            row,
            column,
            ..
        } => {
            let section = &form.sections[section];
            Targets {
                section: Some(section.id.clone()),
                column: Some(section.rows[row].columns[column].id.clone()),
            }
        }
    }
}

fn first_targets(form: &Form) -> Targets {
    let section = form.sections.first();
    Targets {
        section: section.map(|s| s.id.clone()),
        column: section
            .and_then(|s| s.rows.first())
            .and_then(|row| row.columns.first())
            .map(|column| column.id.clone()),
    }
}
