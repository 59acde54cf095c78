//! The live editing session held by the server.

use formcraft_engine::{
    resolve_drag_end, resolve_targets, BuilderState, Command, DragItem, Engine, EngineConfig,
    FieldType, Form, IdGenerator, NodeId, NodeKind, NodeRef, Targets,
};
use serde::Serialize;
use std::sync::Arc;

/// Ids of the form `<kind>-<uuid>`.
///
/// Random ids never collide with a stored schema, so `observe` has nothing
/// to do.
#[derive(Debug, Clone, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, kind: NodeKind) -> NodeId {
        format!("{}-{}", kind, uuid::Uuid::new_v4())
    }
}

/// What the UI renders: the tree, the selection and the palette targets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderView {
    pub form: Arc<Form>,
    pub selection: Option<NodeRef>,
    pub targets: Targets,
}

/// One builder session: an engine plus the current snapshot.
#[derive(Debug)]
pub struct Session {
    engine: Engine<UuidIds>,
    state: BuilderState,
}

impl Session {
    /// Start a session with an empty form.
    pub fn new(config: EngineConfig) -> formcraft_engine::error::Result<Self> {
        let mut engine = Engine::with_ids(config, UuidIds)?;
        tracing::debug!(
            row_spans = ?engine.config().default_row_spans,
            section_title = %engine.config().default_section_title,
            "builder session started"
        );
        let state = engine.new_state();
        Ok(Self { engine, state })
    }

    pub fn form(&self) -> &Arc<Form> {
        self.state.form()
    }

    pub fn view(&self) -> BuilderView {
        let selection = self.state.selection().cloned();
        BuilderView {
            form: self.state.form().clone(),
            targets: resolve_targets(self.state.form(), selection.as_ref()),
            selection,
        }
    }

    pub fn apply(&mut self, command: Command) -> BuilderView {
        self.state = self.engine.apply(&self.state, command);
        self.view()
    }

    pub fn add_field_at_selection(
        &mut self,
        field_type: FieldType,
    ) -> formcraft_engine::error::Result<BuilderView> {
        self.state = self.engine.add_field_at_selection(&self.state, field_type)?;
        Ok(self.view())
    }

    pub fn add_row_at_selection(&mut self) -> formcraft_engine::error::Result<BuilderView> {
        self.state = self.engine.add_row_at_selection(&self.state)?;
        Ok(self.view())
    }

    /// Finish a drag. Returns whether anything moved.
    pub fn drag_end(&mut self, active: &DragItem, over: Option<&DragItem>) -> (bool, BuilderView) {
        match resolve_drag_end(self.state.form(), active, over) {
            Some(request) => {
                let before = self.state.form().clone();
                self.state = self.engine.apply(&self.state, Command::from(request));
                let moved = !Arc::ptr_eq(&before, self.state.form());
                (moved, self.view())
            }
            None => (false, self.view()),
        }
    }

    /// Replace the tree with a stored document.
    ///
    /// A document that fails to decode or validate leaves the session as it
    /// was.
    pub fn restore(
        &mut self,
        body: serde_json::Value,
    ) -> formcraft_engine::error::Result<BuilderView> {
        self.state = self.engine.load_value(body)?;
        Ok(self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uuid_ids_carry_the_kind() {
        let mut ids = UuidIds;
        let id = ids.next_id(NodeKind::Section);
        assert!(id.starts_with("section-"));
        assert_ne!(id, ids.next_id(NodeKind::Section));
    }

    #[test]
    fn view_reports_first_targets() {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        let view = session.apply(Command::AddSection {
            title: "Main".into(),
        });
        let section_id = view.form.sections[0].id.clone();
        assert_eq!(view.targets.section, Some(section_id));
        assert_eq!(view.targets.column, None);
    }

    #[test]
    fn failed_restore_keeps_the_tree() {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        session.apply(Command::AddSection {
            title: "Keep".into(),
        });
        let before = session.form().clone();

        let err = session.restore(json!({"id": "f", "sections": "nope"}));
        assert!(err.is_err());
        assert!(Arc::ptr_eq(&before, session.form()));
    }
}
