//! Event and registration services - business rules over the repositories

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, CreateRegistration, DeleteEvent, EmailQuery, Event, EventTitleQuery,
    Registration, RegistrationLookup, UpdateEvent, UpdateRegistration, non_empty,
};
use crate::repository::{EventRepository, RegistrationRepository};

fn required<'a>(value: Option<&'a str>, message: &str) -> EventResult<&'a str> {
    non_empty(value).ok_or_else(|| EventError::Validation(message.to_string()))
}

/// Event lifecycle: create, list, update, delete
pub struct EventService<E: EventRepository> {
    events: Arc<E>,
}

impl<E: EventRepository> EventService<E> {
    pub fn new(events: E) -> Self {
        Self {
            events: Arc::new(events),
        }
    }

    #[instrument(skip(self, input), fields(title = ?input.title))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        input.validate()?;

        let event = input.into_event().ok_or_else(|| {
            EventError::Validation("Please provide title, desc, date, time, and capacity".into())
        })?;
        self.events.create(event).await
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self) -> EventResult<Vec<Event>> {
        self.events.list().await
    }

    /// Partial update keyed by title; omitted fields keep their stored value
    #[instrument(skip(self, input), fields(title = ?input.title))]
    pub async fn update_event(&self, input: UpdateEvent) -> EventResult<Event> {
        input.validate()?;
        let title = required(input.title.as_deref(), "Please provide an event title")?;

        self.events
            .update_by_title(title, input.changes())
            .await?
            .ok_or(EventError::EventNotFound)
    }

    /// Registrations keep their snapshot of a deleted event
    #[instrument(skip(self, input), fields(title = ?input.title))]
    pub async fn delete_event(&self, input: DeleteEvent) -> EventResult<Event> {
        let title = required(input.title.as_deref(), "Please provide an event title")?;

        self.events
            .delete_by_title(title)
            .await?
            .ok_or(EventError::EventNotFound)
    }
}

impl<E: EventRepository> Clone for EventService<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

/// Signups against event capacity, plus registration queries
pub struct RegistrationService<E: EventRepository, R: RegistrationRepository> {
    events: Arc<E>,
    registrations: Arc<R>,
}

impl<E: EventRepository, R: RegistrationRepository> RegistrationService<E, R> {
    pub fn new(events: E, registrations: R) -> Self {
        Self {
            events: Arc::new(events),
            registrations: Arc::new(registrations),
        }
    }

    /// Registers `name` for an event, taking one seat.
    ///
    /// Checks run in order: required fields, event exists, not already registered, seat available.
    /// The seat is taken from the looked-up event with a single conditional decrement,
    /// so capacity never drops below zero.
    #[instrument(skip(self, input), fields(name = ?input.name, event_title = ?input.event_title))]
    pub async fn register(&self, input: CreateRegistration) -> EventResult<Registration> {
        input.validate()?;
        let message = "Please provide name, email, and event title";
        let name = required(input.name.as_deref(), message)?;
        let email = required(input.email.as_deref(), message)?;
        let event_title = required(input.event_title.as_deref(), message)?;

        let target = self
            .events
            .find_by_title(event_title)
            .await?
            .ok_or(EventError::EventNotFound)?;

        if self.registrations.exists(name, event_title).await? {
            return Err(EventError::AlreadyRegistered);
        }

        let Some(event) = self.events.reserve_seat(target.id).await? else {
            return match self.events.find_by_id(target.id).await? {
                Some(_) => Err(EventError::EventFull),
                None => Err(EventError::EventNotFound),
            };
        };

        let registration = Registration::for_event(name, email, &event);
        match self.registrations.create(registration).await {
            Ok(registration) => {
                tracing::info!(remaining = event.capacity, "Seat reserved");
                Ok(registration)
            }
            Err(err) => {
                if let Err(release_err) = self.events.release_seat(event.id).await {
                    tracing::error!(error = %release_err, "Failed to release reserved seat");
                }
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_registrations(&self) -> EventResult<Vec<Registration>> {
        self.registrations.list().await
    }

    #[instrument(skip(self, input), fields(name = ?input.name))]
    pub async fn get_registrations_by_name(
        &self,
        input: RegistrationLookup,
    ) -> EventResult<Vec<Registration>> {
        let name = required(input.name.as_deref(), "Please provide a name")?;

        let found = self.registrations.find_by_name(name).await?;
        if found.is_empty() {
            return Err(EventError::RegistrationNotFound(
                "No registration found with that name".into(),
            ));
        }
        Ok(found)
    }

    #[instrument(skip(self, input))]
    pub async fn search_by_email(&self, input: EmailQuery) -> EventResult<Vec<Registration>> {
        let email = required(input.email.as_deref(), "Please provide an email")?;

        let found = self.registrations.find_by_email(email).await?;
        if found.is_empty() {
            return Err(EventError::RegistrationNotFound(
                "No registration found with that email".into(),
            ));
        }
        Ok(found)
    }

    #[instrument(skip(self, input), fields(event_title = ?input.event_title))]
    pub async fn filter_by_event_title(
        &self,
        input: EventTitleQuery,
    ) -> EventResult<Vec<Registration>> {
        let event_title = required(input.event_title.as_deref(), "Please provide an event title")?;

        let found = self.registrations.find_by_event_title(event_title).await?;
        if found.is_empty() {
            return Err(EventError::RegistrationNotFound(
                "No registrations found for this event".into(),
            ));
        }
        Ok(found)
    }

    /// Changes name and/or email; only non-empty values are applied
    #[instrument(skip(self, input), fields(name = ?input.name))]
    pub async fn update_registration(
        &self,
        input: UpdateRegistration,
    ) -> EventResult<Registration> {
        let name = required(input.name.as_deref(), "Please provide a name")?;

        self.registrations
            .update_by_name(name, input.changes())
            .await?
            .ok_or_else(|| EventError::RegistrationNotFound("Registration not found".into()))
    }

    /// Removes the first registration with the given name.
    ///
    /// The event's capacity is left as is.
    #[instrument(skip(self, input), fields(name = ?input.name))]
    pub async fn delete_registration(&self, input: RegistrationLookup) -> EventResult<Registration> {
        let name = required(
            input.name.as_deref(),
            "Please provide a name to delete registration",
        )?;

        self.registrations
            .delete_by_name(name)
            .await?
            .ok_or_else(|| EventError::RegistrationNotFound("Registration not found".into()))
    }
}

impl<E: EventRepository, R: RegistrationRepository> Clone for RegistrationService<E, R> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            registrations: Arc::clone(&self.registrations),
        }
    }
}
