//! MongoDB implementations of the event and registration repositories

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{Event, EventChanges, Registration, RegistrationChanges};
use crate::repository::{EventRepository, RegistrationRepository};

pub const EVENTS_COLLECTION: &str = "events";
pub const REGISTRATIONS_COLLECTION: &str = "registrations";

/// Filter matching `value` exactly, ignoring case
fn case_insensitive_eq(value: &str) -> Document {
    doc! {
        "$regex": format!("^{}$", regex::escape(value)),
        "$options": "i",
    }
}

fn id_filter(id: Uuid) -> Document {
    doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
}

fn event_set(changes: &EventChanges) -> Document {
    let mut set = Document::new();
    if let Some(desc) = &changes.desc {
        set.insert("desc", desc);
    }
    if let Some(date) = &changes.date {
        set.insert("date", date);
    }
    if let Some(time) = &changes.time {
        set.insert("time", time);
    }
    if let Some(capacity) = changes.capacity {
        set.insert("capacity", capacity);
    }
    set
}

fn registration_set(changes: &RegistrationChanges) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.name {
        set.insert("name", name);
    }
    if let Some(email) = &changes.email {
        set.insert("email", email);
    }
    set
}

/// Creates the indexes both repositories rely on.
///
/// The unique `(name, eventTitle)` index backs the duplicate-registration rule at the store level.
pub async fn create_indexes(db: &Database) -> EventResult<()> {
    db.collection::<Event>(EVENTS_COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "title": 1 })
                .options(IndexOptions::builder().name("idx_title".to_string()).build())
                .build(),
        )
        .await?;

    let indexes = vec![
        IndexModel::builder()
            .keys(doc! { "name": 1, "eventTitle": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_name_event_unique".to_string())
                    .build(),
            )
            .build(),
        IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().name("idx_email".to_string()).build())
            .build(),
        IndexModel::builder()
            .keys(doc! { "eventTitle": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_event_title".to_string())
                    .build(),
            )
            .build(),
    ];
    db.collection::<Registration>(REGISTRATIONS_COLLECTION)
        .create_indexes(indexes)
        .await?;

    tracing::info!("MongoDB indexes initialized");
    Ok(())
}

/// MongoDB implementation of the EventRepository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(EVENTS_COLLECTION),
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(title = %event.title))]
    async fn create(&self, event: Event) -> EventResult<Event> {
        self.collection.insert_one(&event).await?;
        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> EventResult<Vec<Event>> {
        let cursor = self.collection.find(doc! {}).await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_title(&self, title: &str) -> EventResult<Option<Event>> {
        Ok(self.collection.find_one(doc! { "title": title }).await?)
    }

    #[instrument(skip(self, changes))]
    async fn update_by_title(
        &self,
        title: &str,
        changes: EventChanges,
    ) -> EventResult<Option<Event>> {
        if changes.is_empty() {
            return self.find_by_title(title).await;
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "title": title }, doc! { "$set": event_set(&changes) })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_by_title(&self, title: &str) -> EventResult<Option<Event>> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "title": title })
            .await?)
    }

    #[instrument(skip(self))]
    async fn reserve_seat(&self, id: Uuid) -> EventResult<Option<Event>> {
        let mut filter = id_filter(id);
        filter.insert("capacity", doc! { "$gt": 0 });

        let reserved = self
            .collection
            .find_one_and_update(
                filter,
                doc! { "$inc": { "capacity": -1 } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(reserved)
    }

    #[instrument(skip(self))]
    async fn release_seat(&self, id: Uuid) -> EventResult<()> {
        self.collection
            .update_one(id_filter(id), doc! { "$inc": { "capacity": 1 } })
            .await?;
        Ok(())
    }
}

/// MongoDB implementation of the RegistrationRepository
#[derive(Clone)]
pub struct MongoRegistrationRepository {
    collection: Collection<Registration>,
}

impl MongoRegistrationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(REGISTRATIONS_COLLECTION),
        }
    }

    async fn find_many(&self, filter: Document) -> EventResult<Vec<Registration>> {
        let cursor = self.collection.find(filter).await?;
        let registrations: Vec<Registration> = cursor.try_collect().await?;
        Ok(registrations)
    }
}

#[async_trait]
impl RegistrationRepository for MongoRegistrationRepository {
    #[instrument(skip(self, registration), fields(name = %registration.name, event_title = %registration.event_title))]
    async fn create(&self, registration: Registration) -> EventResult<Registration> {
        self.collection.insert_one(&registration).await?;
        tracing::info!(registration_id = %registration.id, "Registration created");
        Ok(registration)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> EventResult<Vec<Registration>> {
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> EventResult<Vec<Registration>> {
        self.find_many(doc! { "name": name }).await
    }

    #[instrument(skip(self))]
    async fn exists(&self, name: &str, event_title: &str) -> EventResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "name": name, "eventTitle": event_title })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> EventResult<Vec<Registration>> {
        self.find_many(doc! { "email": case_insensitive_eq(email) })
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_event_title(&self, event_title: &str) -> EventResult<Vec<Registration>> {
        self.find_many(doc! { "eventTitle": case_insensitive_eq(event_title) })
            .await
    }

    #[instrument(skip(self, changes))]
    async fn update_by_name(
        &self,
        name: &str,
        changes: RegistrationChanges,
    ) -> EventResult<Option<Registration>> {
        if changes.is_empty() {
            return Ok(self.collection.find_one(doc! { "name": name }).await?);
        }

        let updated = self
            .collection
            .find_one_and_update(
                doc! { "name": name },
                doc! { "$set": registration_set(&changes) },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_by_name(&self, name: &str) -> EventResult<Option<Registration>> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "name": name })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_filter_escapes_metacharacters() {
        let filter = case_insensitive_eq("a+b@example.com");
        assert_eq!(filter.get_str("$regex").unwrap(), r"^a\+b@example\.com$");
        assert_eq!(filter.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_event_set_only_contains_provided_fields() {
        let set = event_set(&EventChanges {
            date: Some("2025-10-01".into()),
            capacity: Some(0),
            ..Default::default()
        });

        assert_eq!(set.len(), 2);
        assert_eq!(set.get_str("date").unwrap(), "2025-10-01");
        assert_eq!(set.get_i64("capacity").unwrap(), 0);
    }

    #[test]
    fn test_registration_set_uses_stored_field_names() {
        let set = registration_set(&RegistrationChanges {
            name: Some("grace".into()),
            email: None,
        });
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("name").unwrap(), "grace");
    }
}
