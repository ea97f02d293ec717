use crate::entities::{events, pdf_files};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Metadata for one uploaded binary, as exposed over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    #[serde(alias = "_id")]
    pub id: String,
    /// Name of the file inside the upload directory
    pub filename: String,
    /// Name as submitted by the client
    #[serde(rename = "originalname")]
    pub original_name: String,
    pub path: String,
    pub size: i64,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
}

impl From<pdf_files::Model> for FileRecord {
    fn from(m: pdf_files::Model) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            original_name: m.original_name,
            path: m.path,
            size: m.size,
            mime_type: m.mime_type,
            upload_date: m.upload_date,
        }
    }
}

/// A calendar entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<events::Model> for Event {
    fn from(m: events::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            start: m.starts_at,
            end: m.ends_at,
            description: m.description,
            color: m.color,
            all_day: m.all_day,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Body of `POST /events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = 1, message = "Event title is required"))]
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub all_day: bool,
}

/// Body of `PUT /events/{id}`. Absent fields are left untouched; for the
/// optional text fields an explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

impl EventPatch {
    /// Patch produced by dragging an event to a new slot
    pub fn moved(start: DateTime<Utc>, end: DateTime<Utc>, all_day: bool) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            all_day: Some(all_day),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// Distinguishes a field sent as `null` (Some(None)) from an absent one (None)
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Outcome of removing one stored file during a bulk clear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnlinkResult {
    pub id: String,
    pub path: String,
    pub unlinked: bool,
    pub error: Option<String>,
}

/// Per-item report returned by `DELETE /pdfs/clear`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClearReport {
    /// Number of metadata records removed
    pub removed: u64,
    pub files: Vec<UnlinkResult>,
}

impl ClearReport {
    pub fn failed(&self) -> impl Iterator<Item = &UnlinkResult> {
        self.files.iter().filter(|f| !f.unlinked)
    }

    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}
