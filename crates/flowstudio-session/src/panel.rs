/// Tabs of the node configuration panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelTab {
  #[default]
  Configuration,
  Display,
  Testing,
  Versions,
  Settings,
}

/// Selects which panel view is active for the currently selected node.
///
/// Transitions are user-driven and unconditional; there is no terminal
/// state. When the node selection changes the tab resets to Configuration
/// unless the caller asks to preserve it.
#[derive(Debug, Default)]
pub struct PanelTabController {
  active: PanelTab,
}

impl PanelTabController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn active(&self) -> PanelTab {
    self.active
  }

  pub fn activate(&mut self, tab: PanelTab) {
    self.active = tab;
  }

  /// Notify the controller that a different node was selected.
  pub fn node_changed(&mut self, preserve: bool) {
    if !preserve {
      self.active = PanelTab::Configuration;
    }
  }
}
