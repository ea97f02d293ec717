use crate::models::{Event, EventPatch, NewEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::api::StudyApi;
use super::error::ClientError;

/// Color given to events created from the editor
pub const DEFAULT_EVENT_COLOR: &str = "#3788d8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    DayGridMonth,
    TimeGridWeek,
    TimeGridDay,
}

impl CalendarView {
    /// Name the widget uses for this view
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::DayGridMonth => "dayGridMonth",
            CalendarView::TimeGridWeek => "timeGridWeek",
            CalendarView::TimeGridDay => "timeGridDay",
        }
    }
}

/// Widget settings the adapter is mounted with
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarOptions {
    pub initial_view: CalendarView,
    pub views: Vec<CalendarView>,
    pub editable: bool,
    pub selectable: bool,
    pub select_mirror: bool,
    pub weekends: bool,
    pub day_max_events: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            initial_view: CalendarView::DayGridMonth,
            views: vec![
                CalendarView::DayGridMonth,
                CalendarView::TimeGridWeek,
                CalendarView::TimeGridDay,
            ],
            editable: true,
            selectable: true,
            select_mirror: true,
            weekends: true,
            day_max_events: true,
        }
    }
}

/// Contents of the event editor form
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// `None` while creating a new event
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub color: String,
}

impl EventDraft {
    pub fn blank(start: DateTime<Utc>, end: DateTime<Utc>, all_day: bool) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            start,
            end,
            all_day,
            color: DEFAULT_EVENT_COLOR.to_string(),
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            start: event.start,
            end: event.end,
            all_day: event.all_day,
            color: event
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
        }
    }

    fn description(&self) -> Option<String> {
        (!self.description.is_empty()).then(|| self.description.clone())
    }

    pub fn to_new_event(&self) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            start: self.start,
            end: self.end,
            description: self.description(),
            color: Some(self.color.clone()),
            all_day: self.all_day,
        }
    }

    /// Full overwrite of the editable fields; an emptied description clears it
    pub fn to_patch(&self) -> EventPatch {
        EventPatch {
            title: Some(self.title.clone()),
            start: Some(self.start),
            end: Some(self.end),
            description: Some(self.description()),
            color: Some(Some(self.color.clone())),
            all_day: Some(self.all_day),
        }
    }
}

/// Bridges calendar-widget callbacks to the events API.
///
/// Keeps a local copy of the event list that is re-fetched after every
/// successful mutation, plus the state of the editor form when it is open.
pub struct CalendarAdapter {
    api: Arc<dyn StudyApi>,
    events: Vec<Event>,
    editor: Option<EventDraft>,
    options: CalendarOptions,
}

impl CalendarAdapter {
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self::with_options(api, CalendarOptions::default())
    }

    pub fn with_options(api: Arc<dyn StudyApi>, options: CalendarOptions) -> Self {
        Self {
            api,
            events: Vec::new(),
            editor: None,
            options,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn editor(&self) -> Option<&EventDraft> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EventDraft> {
        self.editor.as_mut()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        match self.api.list_events().await {
            Ok(events) => self.events = events,
            Err(e) => tracing::error!("Error fetching events: {}", e),
        }
    }

    /// Persists a drag/resize. On failure the widget is told to undo the
    /// move through `revert`; nothing is retried.
    pub async fn on_event_drop<F>(
        &mut self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        all_day: bool,
        revert: F,
    ) -> Result<(), ClientError>
    where
        F: FnOnce(),
    {
        let patch = EventPatch::moved(start, end, all_day);
        match self.api.update_event(id, &patch).await {
            Ok(_) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error updating event {}: {}", id, e);
                revert();
                Err(e)
            }
        }
    }

    /// Opens the editor on an existing event; unknown ids are ignored
    pub fn on_event_click(&mut self, id: &str) {
        if let Some(event) = self.events.iter().find(|e| e.id == id) {
            self.editor = Some(EventDraft::from_event(event));
        }
    }

    pub fn on_date_select(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, all_day: bool) {
        self.editor = Some(EventDraft::blank(start, end, all_day));
    }

    /// Creates or updates from the editor contents. The editor only closes
    /// when the server accepted the change.
    pub async fn save(&mut self) -> Result<(), ClientError> {
        let Some(draft) = self.editor.clone() else {
            return Ok(());
        };

        let outcome = match &draft.id {
            Some(id) => self.api.update_event(id, &draft.to_patch()).await,
            None => self.api.create_event(&draft.to_new_event()).await,
        };

        match outcome {
            Ok(_) => {
                self.editor = None;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error saving event: {}", e);
                Err(e)
            }
        }
    }

    /// Deletes the event being edited. A blank (unsaved) draft has nothing to delete.
    pub async fn delete(&mut self) -> Result<(), ClientError> {
        let Some(id) = self.editor.as_ref().and_then(|d| d.id.clone()) else {
            return Ok(());
        };

        match self.api.delete_event(&id).await {
            Ok(_) => {
                self.editor = None;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error deleting event: {}", e);
                Err(e)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.editor = None;
    }
}
