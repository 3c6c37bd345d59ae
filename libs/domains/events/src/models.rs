//! Event and registration models, request DTOs and response envelopes

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A schedulable happening with a finite number of open seats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Lookup key for update, delete and registration
    pub title: String,
    pub desc: String,
    pub date: String,
    pub time: String,
    /// Remaining open seats
    pub capacity: i64,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        desc: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        capacity: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            desc: desc.into(),
            date: date.into(),
            time: time.into(),
            capacity,
        }
    }

    /// Applies the provided fields, leaving the rest untouched
    pub fn apply(&mut self, changes: &EventChanges) {
        if let Some(desc) = &changes.desc {
            self.desc = desc.clone();
        }
        if let Some(date) = &changes.date {
            self.date = date.clone();
        }
        if let Some(time) = &changes.time {
            self.time = time.clone();
        }
        if let Some(capacity) = changes.capacity {
            self.capacity = capacity;
        }
    }
}

/// One attendee's signup, carrying a snapshot of the event taken at signup time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub event_title: String,
    pub event_desc: String,
    pub event_date: String,
    pub event_time: String,
}

impl Registration {
    pub fn for_event(name: impl Into<String>, email: impl Into<String>, event: &Event) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            event_title: event.title.clone(),
            event_desc: event.desc.clone(),
            event_date: event.date.clone(),
            event_time: event.time.clone(),
        }
    }

    pub fn apply(&mut self, changes: &RegistrationChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
    }
}

/// Partial change set for an event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub desc: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub capacity: Option<i64>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.desc.is_none() && self.date.is_none() && self.time.is_none() && self.capacity.is_none()
    }
}

/// Partial change set for a registration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RegistrationChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Body of `POST /postevent`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(
        required(message = "Please provide title, desc, date, time, and capacity"),
        length(min = 1, message = "Please provide title, desc, date, time, and capacity")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Please provide title, desc, date, time, and capacity"),
        length(min = 1, message = "Please provide title, desc, date, time, and capacity")
    )]
    pub desc: Option<String>,

    #[validate(
        required(message = "Please provide title, desc, date, time, and capacity"),
        length(min = 1, message = "Please provide title, desc, date, time, and capacity")
    )]
    pub date: Option<String>,

    #[validate(
        required(message = "Please provide title, desc, date, time, and capacity"),
        length(min = 1, message = "Please provide title, desc, date, time, and capacity")
    )]
    pub time: Option<String>,

    #[validate(
        required(message = "Please provide title, desc, date, time, and capacity"),
        range(min = 1, message = "Please provide title, desc, date, time, and capacity")
    )]
    pub capacity: Option<i64>,
}

impl CreateEvent {
    /// Consumes a validated request into a new event
    pub(crate) fn into_event(self) -> Option<Event> {
        Some(Event::new(
            self.title?,
            self.desc?,
            self.date?,
            self.time?,
            self.capacity?,
        ))
    }
}

/// Body of `PUT /updateevent`
///
/// Only `title` is required. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    #[validate(
        required(message = "Please provide an event title"),
        length(min = 1, message = "Please provide an event title")
    )]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Event fields cannot be empty"))]
    pub desc: Option<String>,

    #[validate(length(min = 1, message = "Event fields cannot be empty"))]
    pub date: Option<String>,

    #[validate(length(min = 1, message = "Event fields cannot be empty"))]
    pub time: Option<String>,

    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: Option<i64>,
}

impl UpdateEvent {
    pub(crate) fn changes(&self) -> EventChanges {
        EventChanges {
            desc: self.desc.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            capacity: self.capacity,
        }
    }
}

/// Body of `DELETE /deleteevent`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteEvent {
    pub title: Option<String>,
}

/// Body of `POST /registration`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistration {
    #[validate(
        required(message = "Please provide name, email, and event title"),
        length(min = 1, message = "Please provide name, email, and event title")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Please provide name, email, and event title"),
        length(min = 1, message = "Please provide name, email, and event title")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Please provide name, email, and event title"),
        length(min = 1, message = "Please provide name, email, and event title")
    )]
    pub event_title: Option<String>,
}

/// Body of `POST /getoneregistration` and `DELETE /deleteregistration`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegistrationLookup {
    pub name: Option<String>,
}

/// Body of `PUT /updateregistration`
///
/// Empty `newName` or `email` values are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistration {
    pub name: Option<String>,
    pub new_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateRegistration {
    pub(crate) fn changes(&self) -> RegistrationChanges {
        RegistrationChanges {
            name: non_empty(self.new_name.as_deref()).map(str::to_owned),
            email: non_empty(self.email.as_deref()).map(str::to_owned),
        }
    }
}

/// Body of `POST /searchregistration`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Body of `POST /filterregistration`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTitleQuery {
    pub event_title: Option<String>,
}

/// Returns the value when it is present and not empty
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsResponse {
    pub message: String,
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub message: String,
    pub registration: Registration,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationsResponse {
    pub message: String,
    pub registrations: Vec<Registration>,
}
