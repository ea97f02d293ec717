use crate::models::{ClearReport, Event, EventPatch, FileRecord, NewEvent, UnlinkResult};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::api::{StudyApi, UploadFile};
use super::error::ClientError;

/// In-memory stand-in for the backend used by the controller tests
#[derive(Default)]
pub(crate) struct FakeApi {
    pub files: Mutex<Vec<FileRecord>>,
    pub events: Mutex<Vec<Event>>,
    /// When set, every mutating call answers with this status and body
    pub fail_with: Mutex<Option<(u16, String)>>,
    /// When set, every call fails as if the network were down
    pub offline: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(names: &[&str]) -> Self {
        let api = Self::new();
        for name in names {
            let record = api.make_record(name, 10);
            api.files.lock().unwrap().push(record);
        }
        api
    }

    pub fn fail(&self, status: u16, body: &str) {
        *self.fail_with.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn make_record(&self, name: &str, size: i64) -> FileRecord {
        let id = format!("f{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        FileRecord {
            id: id.clone(),
            filename: format!("{}-{}", id, name),
            original_name: name.to_string(),
            path: format!("uploads/{}-{}", id, name),
            size,
            mime_type: "application/pdf".to_string(),
            upload_date: Utc::now(),
        }
    }

    fn record(&self, call: String, mutating: bool) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        if *self.offline.lock().unwrap() {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if mutating && let Some((status, body)) = self.fail_with.lock().unwrap().clone() {
            return Err(ClientError::Http { status, body });
        }
        Ok(())
    }

    fn not_found(what: &str) -> ClientError {
        ClientError::Http {
            status: 404,
            body: format!("{} not found", what),
        }
    }
}

#[async_trait]
impl StudyApi for FakeApi {
    async fn list_files(&self) -> Result<Vec<FileRecord>, ClientError> {
        self.record("GET /pdfs".to_string(), false)?;
        let mut files = self.files.lock().unwrap().clone();
        files.reverse();
        Ok(files)
    }

    async fn upload_file(&self, file: &UploadFile) -> Result<String, ClientError> {
        self.record(format!("POST /upload {}", file.file_name), true)?;
        let record = self.make_record(&file.file_name, file.bytes.len() as i64);
        let message = format!("File uploaded successfully: {}", record.filename);
        self.files.lock().unwrap().push(record);
        Ok(message)
    }

    async fn delete_file(&self, id: &str) -> Result<String, ClientError> {
        self.record(format!("DELETE /pdfs/{}/delete", id), true)?;
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id != id);
        if files.len() == before {
            return Err(Self::not_found("PDF file"));
        }
        Ok("PDF file deleted successfully".to_string())
    }

    async fn clear_files(&self) -> Result<ClearReport, ClientError> {
        self.record("DELETE /pdfs/clear".to_string(), true)?;
        let removed: Vec<FileRecord> = self.files.lock().unwrap().drain(..).collect();
        Ok(ClearReport {
            removed: removed.len() as u64,
            files: removed
                .into_iter()
                .map(|f| UnlinkResult {
                    id: f.id,
                    path: f.path,
                    unlinked: true,
                    error: None,
                })
                .collect(),
        })
    }

    async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        self.record("GET /events".to_string(), false)?;
        let mut events = self.events.lock().unwrap().clone();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, ClientError> {
        self.record(format!("POST /events {}", event.title), true)?;
        let now = Utc::now();
        let created = Event {
            id: format!("e{}", self.next_id.fetch_add(1, Ordering::Relaxed)),
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            description: event.description.clone(),
            color: event.color.clone(),
            all_day: event.all_day,
            created_at: now,
            updated_at: now,
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event, ClientError> {
        self.record(format!("PUT /events/{}", id), true)?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found("Event"))?;

        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        if let Some(start) = patch.start {
            event.start = start;
        }
        if let Some(end) = patch.end {
            event.end = end;
        }
        if let Some(description) = &patch.description {
            event.description = description.clone();
        }
        if let Some(color) = &patch.color {
            event.color = color.clone();
        }
        if let Some(all_day) = patch.all_day {
            event.all_day = all_day;
        }
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: &str) -> Result<String, ClientError> {
        self.record(format!("DELETE /events/{}", id), true)?;
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(Self::not_found("Event"));
        }
        Ok("Event deleted successfully".to_string())
    }
}
