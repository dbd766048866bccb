//! The node editor: selection handling, session entry points, and the
//! submission pipeline.

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use flowstudio_form::{CompiledForm, compile};
use flowstudio_schema::{VariableSchemaDocument, meta};
use flowstudio_session::{
  EditingMode, PanelTab, PanelTabController, SelectedVariable, VariableEditingSession,
};
use flowstudio_store::{Persistence, Revision, SchemaStore};

use crate::error::EditorError;
use crate::key::derive_key;
use crate::values::{definition_from_values, meta_initial_values};

/// Drives the variable editor for whichever node is currently selected.
///
/// Owns the schema store, the editing session, and the panel tab state; the
/// persistence collaborator is the only external seam. All operations are
/// synchronous except submission and deletion, whose single await point is
/// the external save; that save completes before any local state moves.
///
/// While a save is in flight the editor rejects node switches and new edit
/// entry points with [`EditorError::SubmissionPending`]. This is a
/// cooperative gate: the UI is expected to disable those affordances, and
/// the editor enforces the same rule for callers that do not.
pub struct NodeEditor<P: Persistence> {
  store: SchemaStore,
  session: VariableEditingSession,
  panel: PanelTabController,
  persistence: P,
  current_node: Option<String>,
  pending_submission: bool,
}

impl<P: Persistence> NodeEditor<P> {
  pub fn new(persistence: P) -> Self {
    Self {
      store: SchemaStore::new(),
      session: VariableEditingSession::new(),
      panel: PanelTabController::new(),
      persistence,
      current_node: None,
      pending_submission: false,
    }
  }

  pub fn current_node(&self) -> Option<&str> {
    self.current_node.as_deref()
  }

  /// The current node's document; the empty document when no node is
  /// selected or the node has no schema yet.
  pub fn document(&self) -> VariableSchemaDocument {
    self
      .current_node
      .as_deref()
      .map(|node_id| self.store.get(node_id))
      .unwrap_or_default()
  }

  /// Revision history for the current node, oldest first.
  pub fn revisions(&self) -> &[Revision] {
    self
      .current_node
      .as_deref()
      .map(|node_id| self.store.revisions(node_id))
      .unwrap_or(&[])
  }

  pub fn mode(&self) -> EditingMode {
    self.session.mode()
  }

  pub fn selected_variable(&self) -> Option<&SelectedVariable> {
    self.session.selected()
  }

  pub fn active_tab(&self) -> PanelTab {
    self.panel.active()
  }

  pub fn activate_tab(&mut self, tab: PanelTab) {
    self.panel.activate(tab);
  }

  pub fn submission_pending(&self) -> bool {
    self.pending_submission
  }

  /// Switch to a different node, driven by the selection provider.
  ///
  /// Cancels any open edit session and resets the panel tab unless
  /// `preserve_tab` is set. The node's persisted document is loaded into
  /// the store on first selection. Rejected while a submission is pending.
  pub async fn select_node(
    &mut self,
    node_id: &str,
    preserve_tab: bool,
  ) -> Result<(), EditorError> {
    if self.pending_submission {
      return Err(EditorError::SubmissionPending);
    }
    if self.current_node.as_deref() == Some(node_id) {
      return Ok(());
    }

    self.session.cancel();
    self.panel.node_changed(preserve_tab);

    if !self.store.contains(node_id)
      && let Some(document) = self.persistence.load(node_id).await?
    {
      self.store.replace(node_id, document)?;
    }

    self.current_node = Some(node_id.to_string());
    Ok(())
  }

  /// Begin creating a new variable on the current node.
  pub fn start_create(&mut self) -> Result<(), EditorError> {
    if self.pending_submission {
      return Err(EditorError::SubmissionPending);
    }
    if self.current_node.is_none() {
      return Err(EditorError::NoNodeSelected);
    }
    self.session.start_create();
    Ok(())
  }

  /// Begin editing an existing variable. The session receives its own copy
  /// of the definition, so in-progress edits never touch the store.
  pub fn start_edit(&mut self, key: &str) -> Result<(), EditorError> {
    if self.pending_submission {
      return Err(EditorError::SubmissionPending);
    }
    let node_id = self.current_node.as_deref().ok_or(EditorError::NoNodeSelected)?;
    let definition = self
      .store
      .get(node_id)
      .get(key)
      .cloned()
      .ok_or_else(|| EditorError::UnknownVariable {
        key: key.to_string(),
      })?;

    self.session.start_edit(SelectedVariable {
      key: key.to_string(),
      definition,
    });
    Ok(())
  }

  /// Abandon the in-progress create/edit.
  pub fn cancel_edit(&mut self) {
    self.session.cancel();
  }

  /// Compile the meta-schema form for the current session mode.
  ///
  /// Create compiles the free meta-schema with no initial values; Edit
  /// compiles a derived copy with `title` locked to the selected variable's
  /// existing title and the form seeded from its current state.
  pub fn form(&self) -> Result<CompiledForm, EditorError> {
    match self.session.mode() {
      EditingMode::Create => Ok(compile(&meta::variable_meta_schema(), &Map::new())),
      EditingMode::Edit => {
        let selected = self.session.selected().ok_or(EditorError::NotEditing)?;
        let node_id = self.current_node.as_deref().ok_or(EditorError::NoNodeSelected)?;
        let required = self.store.get(node_id).is_required(&selected.key);
        let schema = meta::variable_meta_schema_locked(&selected.definition.title);
        Ok(compile(&schema, &meta_initial_values(selected, required)))
      }
      EditingMode::Input => Err(EditorError::NotEditing),
    }
  }

  /// Commit the submitted meta-form values: validate, compute the full next
  /// document, save externally, then replace the store document and close
  /// the session.
  ///
  /// A validation failure or key collision returns before anything moves; a
  /// persistence failure leaves the store and session exactly as they were.
  #[instrument(name = "variables_submit", skip(self, values))]
  pub async fn submit(&mut self, values: &Map<String, Value>) -> Result<(), EditorError> {
    let node_id = self.current_node.clone().ok_or(EditorError::NoNodeSelected)?;

    let form = self.form()?;
    let report = form.validate(values);
    if !report.valid {
      warn!(
        node_id = %node_id,
        errors = report.errors.len(),
        "variables_validation_failed"
      );
      return Err(EditorError::ValidationFailed {
        errors: report.errors,
      });
    }

    let (definition, required) = definition_from_values(values)?;

    let mut next = self.store.get(&node_id);
    let key = match self.session.mode() {
      EditingMode::Create => {
        let key = derive_key(&definition.title);
        if key.is_empty() {
          return Err(EditorError::ValidationFailed {
            errors: [(
              meta::TITLE.to_string(),
              "title must contain a letter or digit".to_string(),
            )]
            .into(),
          });
        }
        if next.properties.contains_key(&key) {
          return Err(EditorError::DuplicateKey { key });
        }
        key
      }
      EditingMode::Edit => {
        // Session invariant: Edit mode always carries a selection.
        self
          .session
          .selected()
          .map(|s| s.key.clone())
          .ok_or(EditorError::NotEditing)?
      }
      EditingMode::Input => return Err(EditorError::NotEditing),
    };

    next.insert_variable(&key, definition, required);

    // The external save completes before any local state moves.
    self.pending_submission = true;
    let saved = self.persistence.save(&node_id, &next).await;
    self.pending_submission = false;
    saved?;

    self.store.replace(&node_id, next)?;
    self.session.commit();
    info!(node_id = %node_id, key = %key, "variable_committed");
    Ok(())
  }

  /// Delete a variable: key removed from properties and required together,
  /// saved externally, then committed to the store.
  #[instrument(name = "variables_delete", skip(self))]
  pub async fn delete_variable(&mut self, key: &str) -> Result<(), EditorError> {
    if self.pending_submission {
      return Err(EditorError::SubmissionPending);
    }
    let node_id = self.current_node.clone().ok_or(EditorError::NoNodeSelected)?;

    let mut next = self.store.get(&node_id);
    if next.remove_variable(key).is_none() {
      return Err(EditorError::UnknownVariable {
        key: key.to_string(),
      });
    }

    self.pending_submission = true;
    let saved = self.persistence.save(&node_id, &next).await;
    self.pending_submission = false;
    saved?;

    self.store.replace(&node_id, next)?;
    info!(node_id = %node_id, key = %key, "variable_deleted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicBool, Ordering};

  use async_trait::async_trait;
  use serde_json::json;

  use flowstudio_schema::{VariableDefinition, VariableKind};
  use flowstudio_store::PersistError;

  /// Mock persistence collaborator for testing.
  #[derive(Default)]
  struct MockPersistence {
    saves: Mutex<Vec<(String, VariableSchemaDocument)>>,
    seeded: Mutex<HashMap<String, VariableSchemaDocument>>,
    fail_save: AtomicBool,
  }

  impl MockPersistence {
    fn new() -> Self {
      Self::default()
    }

    fn seed(&self, node_id: &str, document: VariableSchemaDocument) {
      self
        .seeded
        .lock()
        .unwrap()
        .insert(node_id.to_string(), document);
    }

    fn fail_next_save(&self) {
      self.fail_save.store(true, Ordering::SeqCst);
    }

    fn save_count(&self) -> usize {
      self.saves.lock().unwrap().len()
    }
  }

  #[async_trait]
  impl Persistence for MockPersistence {
    async fn save(
      &self,
      node_id: &str,
      document: &VariableSchemaDocument,
    ) -> Result<(), PersistError> {
      if self.fail_save.swap(false, Ordering::SeqCst) {
        return Err(PersistError::Io(std::io::Error::other("backend down")));
      }
      self
        .saves
        .lock()
        .unwrap()
        .push((node_id.to_string(), document.clone()));
      Ok(())
    }

    async fn load(
      &self,
      node_id: &str,
    ) -> Result<Option<VariableSchemaDocument>, PersistError> {
      Ok(self.seeded.lock().unwrap().get(node_id).cloned())
    }
  }

  fn bag(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.clone()))
      .collect()
  }

  fn create_values(title: &str, var_type: &str, required: bool) -> Map<String, Value> {
    bag(&[
      (meta::TITLE, json!(title)),
      (meta::VAR_TYPE, json!(var_type)),
      (meta::REQUIRED, json!(required)),
    ])
  }

  async fn editor_with_node() -> NodeEditor<MockPersistence> {
    let mut editor = NodeEditor::new(MockPersistence::new());
    editor.select_node("node-1", false).await.unwrap();
    editor
  }

  #[tokio::test]
  async fn test_create_edit_delete_lifecycle() {
    let mut editor = editor_with_node().await;

    // Create a required string variable.
    editor.start_create().unwrap();
    editor
      .submit(&create_values("Region", "string", true))
      .await
      .unwrap();

    let doc = editor.document();
    assert!(doc.get("Region").is_some());
    assert!(doc.is_required("Region"));
    assert_eq!(editor.mode(), EditingMode::Input);

    // Edit it: the title is locked, only the constraint changes.
    editor.start_edit("Region").unwrap();
    let form = editor.form().unwrap();
    let title_field = form.field(meta::TITLE).unwrap();
    assert_eq!(title_field.const_value, Some(json!("Region")));

    let mut values = create_values("Region", "string", true);
    values.insert(meta::MAX_LENGTH.to_string(), json!(8));
    editor.submit(&values).await.unwrap();

    let doc = editor.document();
    let def = doc.get("Region").unwrap();
    assert_eq!(def.title, "Region");
    match &def.kind {
      VariableKind::String { max_length, .. } => assert_eq!(*max_length, Some(8)),
      _ => panic!("expected string kind"),
    }

    // Delete it: both maps emptied together.
    editor.delete_variable("Region").await.unwrap();
    let doc = editor.document();
    assert!(doc.get("Region").is_none());
    assert!(!doc.is_required("Region"));
  }

  #[tokio::test]
  async fn test_create_with_colliding_title_fails_duplicate_key() {
    let mut editor = editor_with_node().await;

    editor.start_create().unwrap();
    editor
      .submit(&create_values("Region", "string", false))
      .await
      .unwrap();
    let before = editor.document();

    editor.start_create().unwrap();
    let result = editor.submit(&create_values("Region", "string", false)).await;

    assert!(matches!(result, Err(EditorError::DuplicateKey { key }) if key == "Region"));
    assert_eq!(editor.document(), before);
    // The user must rename; the create session stays open.
    assert_eq!(editor.mode(), EditingMode::Create);
  }

  #[tokio::test]
  async fn test_validation_failure_leaves_edit_session_intact() {
    let mut editor = editor_with_node().await;
    editor.start_create().unwrap();
    editor
      .submit(&create_values("Region", "string", true))
      .await
      .unwrap();
    let before = editor.document();

    editor.start_edit("Region").unwrap();
    // min_length is constrained to be non-negative in the meta-schema.
    let mut values = create_values("Region", "string", true);
    values.insert(meta::MIN_LENGTH.to_string(), json!(-2));
    let result = editor.submit(&values).await;

    assert!(matches!(result, Err(EditorError::ValidationFailed { .. })));
    assert_eq!(editor.document(), before);
    assert_eq!(editor.mode(), EditingMode::Edit);
    assert_eq!(editor.selected_variable().unwrap().key, "Region");
  }

  #[tokio::test]
  async fn test_locked_title_rejects_a_changed_value() {
    let mut editor = editor_with_node().await;
    editor.start_create().unwrap();
    editor
      .submit(&create_values("Region", "string", false))
      .await
      .unwrap();

    editor.start_edit("Region").unwrap();
    let result = editor
      .submit(&create_values("Renamed", "string", false))
      .await;

    match result {
      Err(EditorError::ValidationFailed { errors }) => {
        assert!(errors[meta::TITLE].contains("locked"));
      }
      other => panic!("expected validation failure, got {:?}", other.err()),
    }
    assert_eq!(editor.document().get("Region").unwrap().title, "Region");
  }

  #[tokio::test]
  async fn test_persistence_failure_mutates_nothing() {
    let mut editor = editor_with_node().await;
    editor.start_create().unwrap();

    editor.persistence.fail_next_save();
    let result = editor.submit(&create_values("Region", "string", true)).await;

    assert!(matches!(result, Err(EditorError::Persistence(_))));
    assert!(editor.document().is_empty());
    // Session stays open so the user can retry.
    assert_eq!(editor.mode(), EditingMode::Create);
    assert!(!editor.submission_pending());
    assert_eq!(editor.persistence.save_count(), 0);
  }

  #[tokio::test]
  async fn test_node_switch_is_rejected_while_a_submission_is_pending() {
    let mut editor = editor_with_node().await;
    editor.pending_submission = true;

    let result = editor.select_node("node-2", false).await;
    assert!(matches!(result, Err(EditorError::SubmissionPending)));

    assert!(matches!(
      editor.start_create(),
      Err(EditorError::SubmissionPending)
    ));
    assert!(matches!(
      editor.start_edit("anything"),
      Err(EditorError::SubmissionPending)
    ));
  }

  #[tokio::test]
  async fn test_select_node_resets_tab_and_cancels_the_session() {
    let mut editor = editor_with_node().await;
    editor.start_create().unwrap();
    editor.activate_tab(PanelTab::Settings);

    editor.select_node("node-2", false).await.unwrap();

    assert_eq!(editor.active_tab(), PanelTab::Configuration);
    assert_eq!(editor.mode(), EditingMode::Input);
  }

  #[tokio::test]
  async fn test_select_node_can_preserve_the_tab() {
    let mut editor = editor_with_node().await;
    editor.activate_tab(PanelTab::Versions);

    editor.select_node("node-2", true).await.unwrap();
    assert_eq!(editor.active_tab(), PanelTab::Versions);
  }

  #[tokio::test]
  async fn test_select_node_loads_the_persisted_document() {
    let persistence = MockPersistence::new();
    let mut seeded = VariableSchemaDocument::new();
    seeded.insert_variable(
      "env",
      VariableDefinition::new("Environment", VariableKind::string()),
      true,
    );
    persistence.seed("node-7", seeded.clone());

    let mut editor = NodeEditor::new(persistence);
    editor.select_node("node-7", false).await.unwrap();

    assert_eq!(editor.document(), seeded);
  }

  #[tokio::test]
  async fn test_documents_do_not_bleed_across_nodes() {
    let mut editor = editor_with_node().await;
    editor.start_create().unwrap();
    editor
      .submit(&create_values("Region", "string", true))
      .await
      .unwrap();

    editor.select_node("node-2", false).await.unwrap();
    assert!(editor.document().is_empty());

    editor.select_node("node-1", false).await.unwrap();
    assert!(editor.document().get("Region").is_some());
  }

  #[tokio::test]
  async fn test_edit_entry_points_require_a_node() {
    let mut editor = NodeEditor::new(MockPersistence::new());
    assert!(matches!(
      editor.start_create(),
      Err(EditorError::NoNodeSelected)
    ));
    assert!(matches!(
      editor.start_edit("region"),
      Err(EditorError::NoNodeSelected)
    ));
  }

  #[tokio::test]
  async fn test_start_edit_unknown_variable() {
    let mut editor = editor_with_node().await;
    assert!(matches!(
      editor.start_edit("ghost"),
      Err(EditorError::UnknownVariable { .. })
    ));
  }

  #[tokio::test]
  async fn test_delete_unknown_variable() {
    let mut editor = editor_with_node().await;
    assert!(matches!(
      editor.delete_variable("ghost").await,
      Err(EditorError::UnknownVariable { .. })
    ));
  }

  #[tokio::test]
  async fn test_form_requires_an_active_session() {
    let editor = editor_with_node().await;
    assert!(matches!(editor.form(), Err(EditorError::NotEditing)));
  }

  #[tokio::test]
  async fn test_submit_without_a_session_is_rejected() {
    let mut editor = editor_with_node().await;
    let result = editor.submit(&create_values("Region", "string", false)).await;
    assert!(matches!(result, Err(EditorError::NotEditing)));
  }

  #[tokio::test]
  async fn test_title_without_alphanumerics_cannot_become_a_key() {
    let mut editor = editor_with_node().await;
    editor.start_create().unwrap();

    let result = editor.submit(&create_values("!!!", "string", false)).await;
    match result {
      Err(EditorError::ValidationFailed { errors }) => {
        assert!(errors.contains_key(meta::TITLE));
      }
      other => panic!("expected validation failure, got {:?}", other.err()),
    }
  }

  #[tokio::test]
  async fn test_every_commit_adds_a_revision() {
    let mut editor = editor_with_node().await;

    editor.start_create().unwrap();
    editor
      .submit(&create_values("Region", "string", false))
      .await
      .unwrap();
    editor.delete_variable("Region").await.unwrap();

    assert_eq!(editor.revisions().len(), 2);
    assert_eq!(editor.persistence.save_count(), 2);
  }
}
