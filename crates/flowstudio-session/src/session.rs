use flowstudio_schema::VariableDefinition;

/// A variable pulled out of a document for editing: its key plus an owned
/// copy of the definition. In-progress edits work on this copy and never
/// reach the store until the submission pipeline commits.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedVariable {
  pub key: String,
  pub definition: VariableDefinition,
}

/// What the variable editor is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditingMode {
  /// Viewing the variable list.
  #[default]
  Input,
  /// Editing one existing variable.
  Edit,
  /// Creating a new variable.
  Create,
}

/// Tracks which variable (if any) is being created or edited.
///
/// Invariant: a selection is held iff the session is in Edit mode. Entering
/// Create always clears it.
#[derive(Debug, Default)]
pub struct VariableEditingSession {
  mode: EditingMode,
  selected: Option<SelectedVariable>,
}

impl VariableEditingSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn mode(&self) -> EditingMode {
    self.mode
  }

  /// The variable under edit. Some iff mode is Edit.
  pub fn selected(&self) -> Option<&SelectedVariable> {
    self.selected.as_ref()
  }

  pub fn is_editing(&self) -> bool {
    matches!(self.mode, EditingMode::Edit | EditingMode::Create)
  }

  pub fn start_create(&mut self) {
    self.mode = EditingMode::Create;
    self.selected = None;
  }

  pub fn start_edit(&mut self, variable: SelectedVariable) {
    self.mode = EditingMode::Edit;
    self.selected = Some(variable);
  }

  /// Abandon the in-progress create/edit and return to the list view.
  pub fn cancel(&mut self) {
    self.mode = EditingMode::Input;
    self.selected = None;
  }

  /// Return to the list view after a successful write-back. Called by the
  /// submission pipeline only.
  pub fn commit(&mut self) {
    self.mode = EditingMode::Input;
    self.selected = None;
  }
}
