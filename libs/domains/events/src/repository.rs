use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventChanges, Registration, RegistrationChanges};

/// Persistence for events, keyed by title
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: Event) -> EventResult<Event>;

    /// All events in insertion order
    async fn list(&self) -> EventResult<Vec<Event>>;

    async fn find_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// First event whose title matches exactly
    async fn find_by_title(&self, title: &str) -> EventResult<Option<Event>>;

    /// Applies `changes` to the first event with `title` and returns the updated event
    async fn update_by_title(&self, title: &str, changes: EventChanges)
    -> EventResult<Option<Event>>;

    /// Removes the first event with `title`, returning it
    async fn delete_by_title(&self, title: &str) -> EventResult<Option<Event>>;

    /// Atomically takes one seat from event `id` if any remain.
    ///
    /// Returns the event after the decrement, or `None` when the event is missing or full.
    async fn reserve_seat(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// Gives back a seat taken by [`EventRepository::reserve_seat`]
    async fn release_seat(&self, id: Uuid) -> EventResult<()>;
}

/// Persistence for registrations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Fails with [`EventError::AlreadyRegistered`] if `(name, eventTitle)` is taken
    async fn create(&self, registration: Registration) -> EventResult<Registration>;

    async fn list(&self) -> EventResult<Vec<Registration>>;

    /// Case-sensitive exact match on `name`
    async fn find_by_name(&self, name: &str) -> EventResult<Vec<Registration>>;

    async fn exists(&self, name: &str, event_title: &str) -> EventResult<bool>;

    /// Case-insensitive exact match on `email`
    async fn find_by_email(&self, email: &str) -> EventResult<Vec<Registration>>;

    /// Case-insensitive exact match on `eventTitle`
    async fn find_by_event_title(&self, event_title: &str) -> EventResult<Vec<Registration>>;

    async fn update_by_name(
        &self,
        name: &str,
        changes: RegistrationChanges,
    ) -> EventResult<Option<Registration>>;

    async fn delete_by_name(&self, name: &str) -> EventResult<Option<Registration>>;
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> EventResult<Event> {
        self.events.write().await.push(event.clone());
        tracing::info!(event_id = %event.id, title = %event.title, "Created event");
        Ok(event)
    }

    async fn list(&self) -> EventResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.title == title).cloned())
    }

    async fn update_by_title(
        &self,
        title: &str,
        changes: EventChanges,
    ) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.iter_mut().find(|e| e.title == title).map(|event| {
            event.apply(&changes);
            event.clone()
        }))
    }

    async fn delete_by_title(&self, title: &str) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        let index = events.iter().position(|e| e.title == title);
        Ok(index.map(|i| events.remove(i)))
    }

    async fn reserve_seat(&self, id: Uuid) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events
            .iter_mut()
            .find(|e| e.id == id && e.capacity > 0)
            .map(|event| {
                event.capacity -= 1;
                event.clone()
            }))
    }

    async fn release_seat(&self, id: Uuid) -> EventResult<()> {
        let mut events = self.events.write().await;
        if let Some(event) = events.iter_mut().find(|e| e.id == id) {
            event.capacity += 1;
        }
        Ok(())
    }
}

/// In-memory implementation of RegistrationRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistrationRepository {
    registrations: Arc<RwLock<Vec<Registration>>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn create(&self, registration: Registration) -> EventResult<Registration> {
        let mut registrations = self.registrations.write().await;

        let taken = registrations
            .iter()
            .any(|r| r.name == registration.name && r.event_title == registration.event_title);
        if taken {
            return Err(EventError::AlreadyRegistered);
        }

        registrations.push(registration.clone());
        tracing::info!(registration_id = %registration.id, "Created registration");
        Ok(registration)
    }

    async fn list(&self) -> EventResult<Vec<Registration>> {
        Ok(self.registrations.read().await.clone())
    }

    async fn find_by_name(&self, name: &str) -> EventResult<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect())
    }

    async fn exists(&self, name: &str, event_title: &str) -> EventResult<bool> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .any(|r| r.name == name && r.event_title == event_title))
    }

    async fn find_by_email(&self, email: &str) -> EventResult<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .filter(|r| eq_ignore_case(&r.email, email))
            .cloned()
            .collect())
    }

    async fn find_by_event_title(&self, event_title: &str) -> EventResult<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .filter(|r| eq_ignore_case(&r.event_title, event_title))
            .cloned()
            .collect())
    }

    async fn update_by_name(
        &self,
        name: &str,
        changes: RegistrationChanges,
    ) -> EventResult<Option<Registration>> {
        let mut registrations = self.registrations.write().await;
        let Some(index) = registrations.iter().position(|r| r.name == name) else {
            return Ok(None);
        };

        let mut updated = registrations[index].clone();
        updated.apply(&changes);

        let clashes = registrations.iter().enumerate().any(|(i, r)| {
            i != index && r.name == updated.name && r.event_title == updated.event_title
        });
        if clashes {
            return Err(EventError::AlreadyRegistered);
        }

        registrations[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_name(&self, name: &str) -> EventResult<Option<Registration>> {
        let mut registrations = self.registrations.write().await;
        let index = registrations.iter().position(|r| r.name == name);
        Ok(index.map(|i| registrations.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, capacity: i64) -> Event {
        Event::new(title, "desc", "2025-09-02", "09:00", capacity)
    }

    #[tokio::test]
    async fn test_reserve_seat_stops_at_zero() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(event("Meetup", 1)).await.unwrap();

        let reserved = repo.reserve_seat(created.id).await.unwrap().unwrap();
        assert_eq!(reserved.capacity, 0);
        assert!(repo.reserve_seat(created.id).await.unwrap().is_none());

        repo.release_seat(created.id).await.unwrap();
        let restored = repo.find_by_title("Meetup").await.unwrap().unwrap();
        assert_eq!(restored.capacity, 1);
    }

    #[tokio::test]
    async fn test_concurrent_reservations_never_oversell() {
        let repo = InMemoryEventRepository::new();
        let workshop = repo.create(event("Workshop", 3)).await.unwrap().id;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.reserve_seat(workshop).await.unwrap() })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                granted += 1;
            }
        }

        assert_eq!(granted, 3);
        let after = repo.find_by_title("Workshop").await.unwrap().unwrap();
        assert_eq!(after.capacity, 0);
    }

    #[tokio::test]
    async fn test_reserve_seat_targets_one_event_among_same_titles() {
        let repo = InMemoryEventRepository::new();
        let full = repo.create(event("Meetup", 0)).await.unwrap();
        let open = repo.create(event("Meetup", 5)).await.unwrap();

        assert!(repo.reserve_seat(full.id).await.unwrap().is_none());
        assert_eq!(repo.find_by_id(open.id).await.unwrap().unwrap().capacity, 5);
        assert!(repo.reserve_seat(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_first_match_only() {
        let repo = InMemoryEventRepository::new();
        let first = repo.create(event("Dup", 1)).await.unwrap();
        repo.create(event("Dup", 2)).await.unwrap();

        let deleted = repo.delete_by_title("Dup").await.unwrap().unwrap();
        assert_eq!(deleted.id, first.id);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_registration_lookups_are_case_insensitive() {
        let repo = InMemoryRegistrationRepository::new();
        let meetup = event("Rust Meetup", 5);
        repo.create(Registration::for_event("ada", "Ada@Example.com", &meetup))
            .await
            .unwrap();

        assert_eq!(repo.find_by_email("ada@example.COM").await.unwrap().len(), 1);
        assert_eq!(repo.find_by_event_title("rust meetup").await.unwrap().len(), 1);
        assert!(repo.find_by_email("ada@example").await.unwrap().is_empty());
        assert!(repo.find_by_name("Ada").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let repo = InMemoryRegistrationRepository::new();
        let meetup = event("Rust Meetup", 5);
        repo.create(Registration::for_event("ada", "a@x.io", &meetup))
            .await
            .unwrap();

        let err = repo
            .create(Registration::for_event("ada", "other@x.io", &meetup))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_registration_rejected() {
        let repo = InMemoryRegistrationRepository::new();
        let meetup = event("Rust Meetup", 5);
        repo.create(Registration::for_event("ada", "a@x.io", &meetup))
            .await
            .unwrap();
        repo.create(Registration::for_event("bob", "b@x.io", &meetup))
            .await
            .unwrap();

        let changes = RegistrationChanges {
            name: Some("ada".into()),
            email: None,
        };
        let err = repo.update_by_name("bob", changes).await.unwrap_err();
        assert!(matches!(err, EventError::AlreadyRegistered));
    }
}
