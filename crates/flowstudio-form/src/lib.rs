//! Flowstudio Form
//!
//! The schema-to-form compiler. [`compile`] takes a variable schema document
//! plus an initial value bag and produces an ordered list of
//! [`FieldDescriptor`]s and a pure validation function.
//!
//! Compilation is deterministic: identical schema and initial values always
//! produce an identical field list and identical validation outcomes, so it
//! is safe to re-invoke on every keystroke without drift.
//!
//! The compiler is invoked at two levels: once with the meta-schema to build
//! the variable-editing form itself, and once per node to build the node's
//! runtime configuration form. It does not care which level it is at.

mod compile;
mod field;
mod validate;

pub use compile::{CompiledForm, compile};
pub use field::{Constraints, FieldDescriptor, InputKind};
pub use validate::ValidationReport;
