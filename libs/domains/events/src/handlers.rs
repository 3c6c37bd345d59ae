use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};
use axum_helpers::{AppError, ErrorResponse, JsonBody};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    CreateEvent, CreateRegistration, DeleteEvent, EmailQuery, Event, EventResponse,
    EventTitleQuery, EventsResponse, MessageResponse, Registration, RegistrationLookup,
    RegistrationResponse, RegistrationsResponse, UpdateEvent, UpdateRegistration,
};
use crate::repository::{EventRepository, RegistrationRepository};
use crate::service::{EventService, RegistrationService};

/// OpenAPI documentation for the events and registrations API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_event,
        list_events,
        update_event,
        delete_event,
        register,
        list_registrations,
        get_one_registration,
        update_registration,
        delete_registration,
        search_registration,
        filter_registration,
    ),
    components(schemas(
        Event,
        Registration,
        CreateEvent,
        UpdateEvent,
        DeleteEvent,
        CreateRegistration,
        RegistrationLookup,
        UpdateRegistration,
        EmailQuery,
        EventTitleQuery,
        MessageResponse,
        EventResponse,
        EventsResponse,
        RegistrationResponse,
        RegistrationsResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Events", description = "Event management"),
        (name = "Registrations", description = "Signups against event capacity")
    )
)]
pub struct ApiDoc;

/// Create the router for all event and registration endpoints
pub fn router<E, R>(
    event_service: EventService<E>,
    registration_service: RegistrationService<E, R>,
) -> Router
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
{
    let events = Router::new()
        .route("/postevent", post(create_event::<E>))
        .route("/getevent", get(list_events::<E>))
        .route("/updateevent", put(update_event::<E>))
        .route("/deleteevent", delete(delete_event::<E>))
        .with_state(Arc::new(event_service));

    let registrations = Router::new()
        .route("/registration", post(register::<E, R>))
        .route("/getregistration", get(list_registrations::<E, R>))
        .route("/getoneregistration", post(get_one_registration::<E, R>))
        .route("/updateregistration", put(update_registration::<E, R>))
        .route("/deleteregistration", delete(delete_registration::<E, R>))
        .route("/searchregistration", post(search_registration::<E, R>))
        .route("/filterregistration", post(filter_registration::<E, R>))
        .with_state(Arc::new(registration_service));

    events.merge(registrations)
}

type Events<E> = State<Arc<EventService<E>>>;
type Registrations<E, R> = State<Arc<RegistrationService<E, R>>>;

/// Create a new event
#[utoipa::path(
    post,
    path = "/postevent",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 200, description = "Event added successfully", body = EventResponse),
        (status = 400, description = "Missing field", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn create_event<E: EventRepository>(
    State(service): Events<E>,
    JsonBody(input): JsonBody<CreateEvent>,
) -> Result<Json<EventResponse>, AppError> {
    let event = service.create_event(input).await?;
    Ok(Json(EventResponse {
        message: "Event added successfully".into(),
        event,
    }))
}

/// List all events
#[utoipa::path(
    get,
    path = "/getevent",
    tag = "Events",
    responses(
        (status = 200, description = "Events retrieved successfully", body = EventsResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn list_events<E: EventRepository>(
    State(service): Events<E>,
) -> Result<Json<EventsResponse>, AppError> {
    let events = service.list_events().await?;
    Ok(Json(EventsResponse {
        message: "Events retrieved successfully".into(),
        events,
    }))
}

/// Update an event by title
#[utoipa::path(
    put,
    path = "/updateevent",
    tag = "Events",
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 400, description = "Missing title or invalid capacity", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn update_event<E: EventRepository>(
    State(service): Events<E>,
    JsonBody(input): JsonBody<UpdateEvent>,
) -> Result<Json<EventResponse>, AppError> {
    let event = service.update_event(input).await?;
    Ok(Json(EventResponse {
        message: "Event updated successfully".into(),
        event,
    }))
}

/// Delete an event by title
#[utoipa::path(
    delete,
    path = "/deleteevent",
    tag = "Events",
    request_body = DeleteEvent,
    responses(
        (status = 200, description = "Event deleted successfully", body = MessageResponse),
        (status = 400, description = "Missing title", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn delete_event<E: EventRepository>(
    State(service): Events<E>,
    JsonBody(input): JsonBody<DeleteEvent>,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_event(input).await?;
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".into(),
    }))
}

/// Register an attendee, taking one seat
#[utoipa::path(
    post,
    path = "/registration",
    tag = "Registrations",
    request_body = CreateRegistration,
    responses(
        (status = 200, description = "Registration successful", body = RegistrationResponse),
        (status = 400, description = "Missing field or event is full", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Already registered for this event", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn register<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
    JsonBody(input): JsonBody<CreateRegistration>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registration = service.register(input).await?;
    Ok(Json(RegistrationResponse {
        message: "Registration successful".into(),
        registration,
    }))
}

/// List all registrations
#[utoipa::path(
    get,
    path = "/getregistration",
    tag = "Registrations",
    responses(
        (status = 200, description = "All registrations retrieved successfully", body = RegistrationsResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn list_registrations<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
) -> Result<Json<RegistrationsResponse>, AppError> {
    let registrations = service.list_registrations().await?;
    Ok(Json(RegistrationsResponse {
        message: "All registrations retrieved successfully".into(),
        registrations,
    }))
}

/// Find registrations by exact name
#[utoipa::path(
    post,
    path = "/getoneregistration",
    tag = "Registrations",
    request_body = RegistrationLookup,
    responses(
        (status = 200, description = "Registration found successfully", body = RegistrationsResponse),
        (status = 400, description = "Missing name", body = ErrorResponse),
        (status = 404, description = "No registration found with that name", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn get_one_registration<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
    JsonBody(input): JsonBody<RegistrationLookup>,
) -> Result<Json<RegistrationsResponse>, AppError> {
    let registrations = service.get_registrations_by_name(input).await?;
    Ok(Json(RegistrationsResponse {
        message: "Registration found successfully".into(),
        registrations,
    }))
}

/// Change a registration's name and/or email
#[utoipa::path(
    put,
    path = "/updateregistration",
    tag = "Registrations",
    request_body = UpdateRegistration,
    responses(
        (status = 200, description = "Registration updated successfully", body = RegistrationResponse),
        (status = 400, description = "Missing name", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse),
        (status = 409, description = "New name already registered for the event", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn update_registration<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
    JsonBody(input): JsonBody<UpdateRegistration>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registration = service.update_registration(input).await?;
    Ok(Json(RegistrationResponse {
        message: "Registration updated successfully".into(),
        registration,
    }))
}

/// Delete a registration by name
#[utoipa::path(
    delete,
    path = "/deleteregistration",
    tag = "Registrations",
    request_body = RegistrationLookup,
    responses(
        (status = 200, description = "Registration deleted successfully", body = MessageResponse),
        (status = 400, description = "Missing name", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn delete_registration<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
    JsonBody(input): JsonBody<RegistrationLookup>,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_registration(input).await?;
    Ok(Json(MessageResponse {
        message: "Registration deleted successfully".into(),
    }))
}

/// Find registrations by email, ignoring case
#[utoipa::path(
    post,
    path = "/searchregistration",
    tag = "Registrations",
    request_body = EmailQuery,
    responses(
        (status = 200, description = "Registrations found successfully", body = RegistrationsResponse),
        (status = 400, description = "Missing email", body = ErrorResponse),
        (status = 404, description = "No registration found with that email", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn search_registration<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
    JsonBody(input): JsonBody<EmailQuery>,
) -> Result<Json<RegistrationsResponse>, AppError> {
    let registrations = service.search_by_email(input).await?;
    Ok(Json(RegistrationsResponse {
        message: "Registrations found successfully".into(),
        registrations,
    }))
}

/// Find registrations by event title, ignoring case
#[utoipa::path(
    post,
    path = "/filterregistration",
    tag = "Registrations",
    request_body = EventTitleQuery,
    responses(
        (status = 200, description = "Registrations for event found successfully", body = RegistrationsResponse),
        (status = 400, description = "Missing event title", body = ErrorResponse),
        (status = 404, description = "No registrations found for this event", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
async fn filter_registration<E: EventRepository, R: RegistrationRepository>(
    State(service): Registrations<E, R>,
    JsonBody(input): JsonBody<EventTitleQuery>,
) -> Result<Json<RegistrationsResponse>, AppError> {
    let registrations = service.filter_by_event_title(input).await?;
    Ok(Json(RegistrationsResponse {
        message: "Registrations for event found successfully".into(),
        registrations,
    }))
}
