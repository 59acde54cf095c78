//! The engine facade.
//!
//! [`Engine`] bundles the configuration with the id generator, the only
//! state that outlives a single call. It never holds the tree or the
//! selection: callers pass a [`BuilderState`] in and get a new one back.

use crate::{
    error::Result, mutation, persist, BuilderState, Command, EngineConfig, FieldPatch, FieldType,
    Form, FormPatch, IdGenerator, NodeKind, NodeRef, SequentialIds,
};

/// Applies operations to builder snapshots.
#[derive(Debug, Clone)]
pub struct Engine<G: IdGenerator = SequentialIds> {
    config: EngineConfig,
    ids: G,
}

impl Engine<SequentialIds> {
    /// Create an engine with sequential ids.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_ids(config, SequentialIds::new())
    }
}

impl Default for Engine<SequentialIds> {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            ids: SequentialIds::new(),
        }
    }
}

impl<G: IdGenerator> Engine<G> {
    /// Create an engine with a custom id generator.
    pub fn with_ids(config: EngineConfig, ids: G) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ids })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The id generator.
    pub fn ids(&self) -> &G {
        &self.ids
    }

    /// A fresh, empty form with nothing selected.
    pub fn new_state(&mut self) -> BuilderState {
        let id = self.ids.next_id(NodeKind::Form);
        BuilderState::new(Form::new(id, self.config.default_form_name.clone()))
    }

    /// Adopt an existing form. The id generator is advanced past its ids.
    pub fn adopt(&mut self, form: Form) -> BuilderState {
        self.ids.observe(&form);
        BuilderState::new(form)
    }

    /// Load a stored form from JSON.
    ///
    /// On error nothing changes; the caller keeps its current state.
    pub fn load(&mut self, json: &str) -> Result<BuilderState> {
        let form = persist::from_json(json)?;
        Ok(self.adopt(form))
    }

    /// Load a stored form from a decoded JSON value.
    pub fn load_value(&mut self, value: serde_json::Value) -> Result<BuilderState> {
        let form = persist::from_value(value)?;
        Ok(self.adopt(form))
    }

    /// Apply one command.
    pub fn apply(&mut self, state: &BuilderState, command: Command) -> BuilderState {
        tracing::trace!(op = command.name(), "applying command");
        match command {
            Command::AddSection { title } => self.add_section(state, &title),
            Command::RemoveSection { section_id } => self.remove_section(state, &section_id),
            Command::UpdateSection { section_id, title } => {
                self.update_section(state, &section_id, &title)
            }
            Command::AddRow { section_id } => self.add_row(state, &section_id),
            Command::RemoveRow { row_id } => self.remove_row(state, &row_id),
            Command::AddField {
                column_id,
                field_type,
            } => self.add_field(state, &column_id, field_type),
            Command::RemoveField { field_id } => self.remove_field(state, &field_id),
            Command::UpdateField {
                field_id,
                name,
                label,
            } => self.update_field(state, &field_id, &FieldPatch { name, label }),
            Command::ReorderRows {
                section_id,
                from_index,
                to_index,
            } => self.reorder_rows(state, &section_id, from_index, to_index),
            Command::ReorderFields {
                column_id,
                from_index,
                to_index,
            } => self.reorder_fields(state, &column_id, from_index, to_index),
            Command::UpdateForm(patch) => self.update_form(state, &patch),
            Command::SelectElement { target } => self.select_element(state, target),
        }
    }

    pub fn add_section(&mut self, state: &BuilderState, title: &str) -> BuilderState {
        mutation::add_section(state, &mut self.ids, &self.config, title)
    }

    pub fn remove_section(&self, state: &BuilderState, section_id: &str) -> BuilderState {
        mutation::remove_section(state, section_id)
    }

    pub fn update_section(
        &self,
        state: &BuilderState,
        section_id: &str,
        title: &str,
    ) -> BuilderState {
        mutation::update_section(state, &self.config, section_id, title)
    }

    pub fn add_row(&mut self, state: &BuilderState, section_id: &str) -> BuilderState {
        mutation::add_row(state, &mut self.ids, &self.config, section_id)
    }

    pub fn remove_row(&self, state: &BuilderState, row_id: &str) -> BuilderState {
        mutation::remove_row(state, row_id)
    }

    pub fn add_field(
        &mut self,
        state: &BuilderState,
        column_id: &str,
        field_type: FieldType,
    ) -> BuilderState {
        mutation::add_field(state, &mut self.ids, &self.config, column_id, field_type)
    }

    pub fn remove_field(&self, state: &BuilderState, field_id: &str) -> BuilderState {
        mutation::remove_field(state, field_id)
    }

    pub fn update_field(
        &self,
        state: &BuilderState,
        field_id: &str,
        patch: &FieldPatch,
    ) -> BuilderState {
        mutation::update_field(state, field_id, patch)
    }

    pub fn reorder_rows(
        &self,
        state: &BuilderState,
        section_id: &str,
        from: usize,
        to: usize,
    ) -> BuilderState {
        mutation::reorder_rows(state, section_id, from, to)
    }

    pub fn reorder_fields(
        &self,
        state: &BuilderState,
        column_id: &str,
        from: usize,
        to: usize,
    ) -> BuilderState {
        mutation::reorder_fields(state, column_id, from, to)
    }

    pub fn update_form(&self, state: &BuilderState, patch: &FormPatch) -> BuilderState {
        mutation::update_form(state, patch)
    }

    pub fn select_element(&self, state: &BuilderState, target: Option<NodeRef>) -> BuilderState {
        mutation::select_element(state, target)
    }

    /// Palette "add field": insert into the column the selection resolves to.
    pub fn add_field_at_selection(
        &mut self,
        state: &BuilderState,
        field_type: FieldType,
    ) -> Result<BuilderState> {
        mutation::add_field_at_selection(state, &mut self.ids, &self.config, field_type)
    }

    /// Palette "add row": insert into the section the selection resolves to.
    pub fn add_row_at_selection(&mut self, state: &BuilderState) -> Result<BuilderState> {
        mutation::add_row_at_selection(state, &mut self.ids, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, NodeKind};
    use std::sync::Arc;

    #[test]
    fn new_state_is_empty() {
        let mut engine = Engine::default();
        let state = engine.new_state();
        assert_eq!(state.form().id, "form-1");
        assert_eq!(state.form().name, "Untitled form");
        assert!(state.form().sections.is_empty());
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig::default().with_row_spans(vec![3, 3]);
        assert!(matches!(
            Engine::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn apply_builds_a_form() {
        let mut engine = Engine::default();
        let mut state = engine.new_state();

        state = engine.apply(&state, Command::AddSection { title: "Contact".into() });
        let section_id = state.form().sections[0].id.clone();
        state = engine.apply(
            &state,
            Command::AddRow {
                section_id: section_id.clone(),
            },
        );
        let column_id = state.form().sections[0].rows[0].columns[0].id.clone();
        state = engine.apply(
            &state,
            Command::AddField {
                column_id: column_id.clone(),
                field_type: FieldType::Number,
            },
        );
        let field_id = state.form().fields().next().unwrap().id.clone();
        state = engine.apply(
            &state,
            Command::UpdateField {
                field_id: field_id.clone(),
                name: Some("age".into()),
                label: Some(Some("Age".into())),
            },
        );
        state = engine.apply(
            &state,
            Command::SelectElement {
                target: Some(NodeRef::field(&field_id)),
            },
        );

        let field = state.form().field(&field_id).unwrap();
        assert_eq!(field.name, "age");
        assert_eq!(field.label.as_deref(), Some("Age"));
        assert_eq!(state.selection(), Some(&NodeRef::field(&field_id)));
        assert_eq!(state.form().node_count(), 5);
    }

    #[test]
    fn load_advances_ids_past_loaded_tree() {
        let mut engine = Engine::default();
        let json = r#"{
            "id": "form-1",
            "name": "Stored",
            "sections": [{"id": "section-9", "title": "S", "rows": []}]
        }"#;
        let state = engine.load(json).unwrap();
        let state = engine.add_section(&state, "");

        assert_eq!(state.form().sections[1].id, "section-10");
    }

    #[test]
    fn failed_load_leaves_state_alone() {
        let mut engine = Engine::default();
        let state = engine.new_state();
        let before = Arc::clone(state.form());

        let result = engine.load(r#"{"id": "x"}"#);
        assert!(result.is_err());
        assert!(Arc::ptr_eq(&before, state.form()));
        assert_eq!(engine.ids().counter(), 1);
    }

    #[test]
    fn palette_reports_missing_target() {
        let mut engine = Engine::default();
        let state = engine.new_state();
        assert_eq!(
            engine.add_field_at_selection(&state, FieldType::Text),
            Err(Error::NoTarget(NodeKind::Column))
        );
    }

    #[derive(Debug, Default)]
    struct PrefixedIds(u32);

    impl IdGenerator for PrefixedIds {
        fn next_id(&mut self, kind: NodeKind) -> String {
            self.0 += 1;
            format!("custom:{kind}:{}", self.0)
        }
    }

    #[test]
    fn custom_id_generator() {
        let mut engine = Engine::with_ids(EngineConfig::default(), PrefixedIds::default()).unwrap();
        let state = engine.new_state();
        let state = engine.add_section(&state, "S");
        assert_eq!(state.form().id, "custom:form:1");
        assert_eq!(state.form().sections[0].id, "custom:section:2");
    }
}
