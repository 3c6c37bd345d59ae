//! Events Domain
//!
//! Events with a finite number of seats, and registrations that take one seat each.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (/postevent, /registration, ...)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Validation, registration workflow
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Traits + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, request DTOs, response envelopes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{
//!     handlers,
//!     mongodb::{MongoEventRepository, MongoRegistrationRepository, create_indexes},
//!     service::{EventService, RegistrationService},
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("events");
//! create_indexes(&db).await?;
//!
//! let events = MongoEventRepository::new(&db);
//! let registrations = MongoRegistrationRepository::new(&db);
//!
//! let router = handlers::router(
//!     EventService::new(events.clone()),
//!     RegistrationService::new(events, registrations),
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateEvent, CreateRegistration, DeleteEvent, EmailQuery, Event, EventChanges,
    EventTitleQuery, Registration, RegistrationChanges, RegistrationLookup, UpdateEvent,
    UpdateRegistration,
};
pub use repository::{
    EventRepository, InMemoryEventRepository, InMemoryRegistrationRepository,
    RegistrationRepository,
};
pub use service::{EventService, RegistrationService};
