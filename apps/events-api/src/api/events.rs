//! Events and registrations routes backed by MongoDB

use crate::state::AppState;
use axum::Router;
use domain_events::{
    EventService, RegistrationService,
    handlers,
    mongodb::{MongoEventRepository, MongoRegistrationRepository},
};

pub fn router(state: &AppState) -> Router {
    let events = MongoEventRepository::new(&state.db);
    let registrations = MongoRegistrationRepository::new(&state.db);

    handlers::router(
        EventService::new(events.clone()),
        RegistrationService::new(events, registrations),
    )
}
