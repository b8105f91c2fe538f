pub mod details;
pub mod error;
pub mod modal;
pub mod overflow;
pub mod report;
pub mod scheme;
pub mod scroll_lock;

pub use details::{DetailsLoad, FetchOutcome, LoadTicket, SchemeDetails};
pub use error::LaunchpadError;
pub use modal::{ModalVisibility, Panel};
pub use overflow::DescriptionOverflow;
pub use report::{CreateSchemeReport, ReportCategory, ReportDraft};
pub use scheme::{Beneficiary, Criterion, Department, Document, Scheme};
pub use scroll_lock::{ScrollLock, ScrollLockGuard};
