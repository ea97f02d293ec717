//! Client side of the study app: a typed REST client plus the view-state
//! controllers that sit behind the upload panel and the calendar widget.

pub mod api;
pub mod calendar;
pub mod error;
pub mod files;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{HttpApiClient, StudyApi, UploadFile};
pub use calendar::{CalendarAdapter, CalendarOptions, CalendarView, EventDraft};
pub use error::ClientError;
pub use files::{Confirm, FilePanel};
