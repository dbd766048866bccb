//! Flowstudio Store
//!
//! Canonical ownership of per-node variable schema documents plus the
//! persistence seam.
//!
//! The [`SchemaStore`] holds the in-memory document each node's panel reads;
//! documents are substituted wholesale through [`SchemaStore::replace`] —
//! there is no partial patch API, so cross-field invariants (a `required`
//! key dangling after a property removal) cannot be violated piecemeal.
//!
//! The [`Persistence`] trait is the abstract external save the submission
//! pipeline awaits before an editing session may return to the list view.
//! [`FsPersistence`] is the bundled filesystem implementation.

mod error;
mod fs;
mod persist;
mod revision;
mod store;

pub use error::{PersistError, StoreError};
pub use fs::FsPersistence;
pub use persist::Persistence;
pub use revision::Revision;
pub use store::SchemaStore;
