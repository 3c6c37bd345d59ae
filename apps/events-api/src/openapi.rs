//! OpenAPI documentation configuration

use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for the service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        version = "0.1.0",
        description = "Events with limited seats and attendee registrations, stored in MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    modifiers(&DomainPaths),
    tags(
        (name = "Events", description = "Event management"),
        (name = "Registrations", description = "Signups against event capacity")
    )
)]
pub struct ApiDoc;

/// Domain routes live at the root, so their paths are merged rather than nested
struct DomainPaths;

impl Modify for DomainPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_events::ApiDoc::openapi());
    }
}
