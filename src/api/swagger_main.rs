use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Task Tracker API",
    description = "Tracks tasks owned by users: create them, look them up, update them, delete them"
))]
struct TaskTrackerApi;

/// Builds the OpenAPI document for the whole service by merging in definitions from other
/// locations in the app, such as the [dto] package and submodules of [api][crate::api]
fn api_document() -> utoipa::openapi::OpenApi {
    let mut api_docs = TaskTrackerApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::user::UsersApi::openapi());
    api_docs.merge(super::task::TaskApi::openapi());

    api_docs
}

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_document())
}
