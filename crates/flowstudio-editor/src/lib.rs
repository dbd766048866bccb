//! Flowstudio Editor
//!
//! The form submission pipeline: ties the schema store, the variable editing
//! session, the panel tab controller, and the compiled meta-schema form
//! together behind one entry point, [`NodeEditor`].
//!
//! The node selection provider drives [`NodeEditor::select_node`]; the UI
//! drives the session entry points and [`NodeEditor::submit`]. Every error is
//! a structured [`EditorError`]; nothing in this crate panics across the
//! component boundary.

mod editor;
mod error;
mod key;
mod values;

pub use editor::NodeEditor;
pub use error::EditorError;
pub use key::derive_key;
