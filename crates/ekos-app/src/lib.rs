//! EKOS orchestration layer.
//!
//! The managers in this crate hold the client-side state of the inspection
//! workflows: the filtered report collection with selection and optimistic
//! mutations, the report form with its dependent-field derivations and staged
//! uploads, the per-report attachment handler with type-dispatched previews,
//! the process-lifetime reference cache, the dashboard aggregation, and the
//! scaffold-component catalogue.
//!
//! Every manager owns its state and applies updates by whole-value
//! replacement after awaits; dropping a manager drops its in-flight future,
//! so a completion can never land in state that no longer exists. Requests
//! themselves are not cancellable once issued.

pub mod attachments;
pub mod collection;
pub mod components;
pub mod dashboard;
pub mod form;
pub mod pagination;
pub mod reference;

pub use attachments::{AttachmentManager, ImageHandle, Preview, PreviewStrategy};
pub use collection::{ReportCollection, ReportFilter};
pub use components::{ComponentCatalog, ComponentFilter};
pub use dashboard::{classify_expiry, load_expiry_overview, CategoryShare, DashboardSummary, ExpiryOverview};
pub use form::{FailedUpload, ReportForm, StagedFile, SubmitOutcome};
pub use pagination::Pagination;
pub use reference::ReferenceCache;
