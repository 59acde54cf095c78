//! The persisted schema format.
//!
//! The stored artifact is the form tree itself, serialized as nested JSON in
//! tree order. There is no version number and no migration: a document that
//! does not match the shape fails to load, and the caller keeps whatever
//! tree it had.

use crate::{error::Result, Error, Form, NodeKind, MAX_SPAN};
use std::collections::HashSet;

/// Key the schema is stored under.
pub const STORAGE_KEY: &str = "form-builder-schema";

/// Serialize a form to compact JSON.
pub fn to_json(form: &Form) -> Result<String> {
    Ok(serde_json::to_string(form)?)
}

/// Serialize a form to a JSON value.
pub fn to_value(form: &Form) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(form)?)
}

/// Parse and validate a stored form.
pub fn from_json(json: &str) -> Result<Form> {
    let form: Form = serde_json::from_str(json)?;
    validate(&form)?;
    Ok(form)
}

/// Parse and validate a stored form from an already decoded value.
pub fn from_value(value: serde_json::Value) -> Result<Form> {
    let form: Form = serde_json::from_value(value)?;
    validate(&form)?;
    Ok(form)
}

/// Check the invariants serde cannot: ids present and unique, spans in
/// range.
pub fn validate(form: &Form) -> Result<()> {
    let mut seen = HashSet::new();
    let mut check = |kind: NodeKind, id: &str| -> Result<()> {
        if id.is_empty() {
            return Err(Error::EmptyId(kind));
        }
        if !seen.insert(id.to_string()) {
            return Err(Error::DuplicateId(id.to_string()));
        }
        Ok(())
    };

    check(NodeKind::Form, &form.id)?;
    for section in &form.sections {
        check(NodeKind::Section, &section.id)?;
        for row in &section.rows {
            check(NodeKind::Row, &row.id)?;
            for column in &row.columns {
                check(NodeKind::Column, &column.id)?;
                if !(1..=MAX_SPAN).contains(&column.span) {
                    return Err(Error::InvalidSpan {
                        column: column.id.clone(),
                        span: column.span,
                    });
                }
                for field in &column.fields {
                    check(NodeKind::Field, &field.id)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Field, FieldType, Row, Section};
    use serde_json::json;

    fn sample() -> Form {
        let mut form = Form::new("form-1", "Signup").with_section(
            Section::new("section-2", "Account").with_row(Row::new(
                "row-3",
                vec![
                    Column::new("column-4", 3).with_field(
                        Field::new("field-6", FieldType::Text, "email").with_label("Email"),
                    ),
                    Column::new("column-5", 1)
                        .with_field(Field::new("field-7", FieldType::Checkbox, "terms")),
                ],
            )),
        );
        form.description = Some("Create an account".into());
        form
    }

    #[test]
    fn roundtrip() {
        let form = sample();
        let parsed = from_json(&to_json(&form).unwrap()).unwrap();
        assert_eq!(parsed, form);

        let parsed = from_value(to_value(&form).unwrap()).unwrap();
        assert_eq!(parsed, form);
    }

    #[test]
    fn document_shape() {
        let value = to_value(&sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "form-1",
                "name": "Signup",
                "description": "Create an account",
                "sections": [{
                    "id": "section-2",
                    "title": "Account",
                    "rows": [{
                        "id": "row-3",
                        "columns": [
                            {"id": "column-4", "span": 3, "fields": [
                                {"id": "field-6", "type": "text", "name": "email", "label": "Email"}
                            ]},
                            {"id": "column-5", "span": 1, "fields": [
                                {"id": "field-7", "type": "checkbox", "name": "terms"}
                            ]}
                        ]
                    }]
                }]
            })
        );
    }

    #[test]
    fn accepts_null_optionals() {
        let form = from_value(json!({
            "id": "f",
            "name": "",
            "description": null,
            "sections": []
        }))
        .unwrap();
        assert_eq!(form.description, None);
        assert_eq!(form.name, "");
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(
            from_json("[]"),
            Err(Error::MalformedSchema(_))
        ));
        assert!(matches!(
            from_value(json!({"id": "f", "name": "x"})),
            Err(Error::MalformedSchema(_))
        ));
        assert!(matches!(
            from_json("not json"),
            Err(Error::MalformedSchema(_))
        ));
    }

    #[test]
    fn rejects_unknown_field_type() {
        let mut value = to_value(&sample()).unwrap();
        value["sections"][0]["rows"][0]["columns"][0]["fields"][0]["type"] = json!("slider");
        assert!(matches!(from_value(value), Err(Error::MalformedSchema(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut value = to_value(&sample()).unwrap();
        value["sections"][0]["rows"][0]["columns"][1]["fields"][0]["id"] = json!("field-6");
        assert_eq!(
            from_value(value),
            Err(Error::DuplicateId("field-6".into()))
        );
    }

    #[test]
    fn rejects_bad_spans_and_empty_ids() {
        let mut value = to_value(&sample()).unwrap();
        value["sections"][0]["rows"][0]["columns"][0]["span"] = json!(0);
        assert!(matches!(
            from_value(value),
            Err(Error::InvalidSpan { span: 0, .. })
        ));

        let mut value = to_value(&sample()).unwrap();
        value["sections"][0]["id"] = json!("");
        assert_eq!(from_value(value), Err(Error::EmptyId(NodeKind::Section)));
    }
}
