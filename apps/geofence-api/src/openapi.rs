//! OpenAPI documentation configuration

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer scheme referenced by the protected region routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/sessions"))
                    .build(),
            ),
        );
    }
}

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Geofence API",
        version = "0.1.0",
        description = "Users with geocoded locations and the regions they own",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/sessions", api = domain_users::SessionsApiDoc),
        (path = "/api/regions", api = domain_regions::ApiDoc)
    ),
    tags(
        (name = "Users", description = "Accounts with a geocoded address"),
        (name = "Sessions", description = "Bearer token issuance"),
        (name = "Regions", description = "Owned polygons with containment and proximity queries")
    )
)]
pub struct ApiDoc;
