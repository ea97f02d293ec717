use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::{EventPatch, NewEvent};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

/// CRUD over the calendar event collection
pub struct EventService {
    db: DatabaseConnection,
}

impl EventService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All events ordered by start ascending
    pub async fn list_events(&self) -> Result<Vec<events::Model>, AppError> {
        let items = Events::find()
            .order_by_asc(events::Column::StartsAt)
            .order_by_asc(events::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    pub async fn create_event(&self, req: NewEvent) -> Result<events::Model, AppError> {
        req.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let now = Utc::now();
        let event = events::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(req.title),
            starts_at: Set(req.start),
            ends_at: Set(req.end),
            description: Set(req.description),
            color: Set(req.color),
            all_day: Set(req.all_day),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let res = event.insert(&self.db).await?;
        tracing::info!("📅 Created event {} '{}'", res.id, res.title);
        Ok(res)
    }

    /// Merges the present fields of `patch` into the stored event and
    /// refreshes `updated_at`.
    pub async fn update_event(
        &self,
        id: &str,
        patch: EventPatch,
    ) -> Result<events::Model, AppError> {
        let item = Events::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let mut active = item.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(start) = patch.start {
            active.starts_at = Set(start);
        }
        if let Some(end) = patch.end {
            active.ends_at = Set(end);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(color) = patch.color {
            active.color = Set(color);
        }
        if let Some(all_day) = patch.all_day {
            active.all_day = Set(all_day);
        }
        active.updated_at = Set(Utc::now());

        let res = active.update(&self.db).await?;
        tracing::debug!("Updated event {}", res.id);
        Ok(res)
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let res = Events::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        tracing::info!("🗑️  Deleted event {}", id);
        Ok(())
    }

    /// Replaces the whole collection; used by the sample-data seeder
    pub async fn replace_all(&self, events: Vec<NewEvent>) -> Result<Vec<events::Model>, AppError> {
        let cleared = Events::delete_many().exec(&self.db).await?;
        tracing::info!("Cleared {} existing events", cleared.rows_affected);

        let mut created = Vec::with_capacity(events.len());
        for event in events {
            created.push(self.create_event(event).await?);
        }
        Ok(created)
    }
}
