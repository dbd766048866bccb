//! Flowstudio Session
//!
//! Transient editor-side state machines: the [`VariableEditingSession`]
//! tracks what the user is doing to a variable (viewing the list, editing
//! one, creating one), and the [`PanelTabController`] tracks which panel tab
//! is active for the selected node.
//!
//! Neither talks to the schema store; "what the user is doing" stays
//! separate from "what is persisted".

mod panel;
mod session;

pub use panel::{PanelTab, PanelTabController};
pub use session::{EditingMode, SelectedVariable, VariableEditingSession};
