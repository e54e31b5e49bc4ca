use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Replenish API",
        version = "0.1.0",
        description = r#"
# Replenish API

Reorder recommendations from uploaded sales/inventory history.

Upload a CSV with the columns `SKU`, `Date`, `UnitsSold`, `OnHand`,
`LeadTimeDays` and optionally `MOQ`, `Cost`. For every SKU the service
forecasts daily demand over the requested horizon, computes safety stock and
reorder sizing, and returns how much to buy, by when, and why.

Rows that fail validation are quarantined and reported as warnings alongside
the recommendations; a missing required column rejects the whole upload.
"#,
        license(name = "MIT")
    ),
    paths(
        crate::handlers::recommendations::analyze,
        crate::health::health,
    ),
    components(schemas(
        crate::models::Analysis,
        crate::models::Recommendation,
        crate::models::StockStatus,
        crate::models::RowWarning,
        crate::models::WarningKind,
        crate::models::SortOrder,
        crate::errors::ErrorResponse,
        crate::health::HealthInfo,
        crate::health::HealthStatus,
    )),
    tags(
        (name = "recommendations", description = "Reorder recommendation pipeline"),
        (name = "health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
