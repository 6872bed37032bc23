pub mod swagger_main;
pub mod task;
#[cfg(test)]
pub mod test_util;
pub mod user;

use crate::{SharedData, logging};
use axum::Router;
use std::sync::Arc;

/// Assembles every route group the service exposes, along with the API documentation and
/// HTTP tracing. The list endpoints answer on both the bare group path and its trailing-slash
/// form.
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .nest("/task", task::task_routes())
        .route("/task/", task::list_route())
        .nest("/user", user::user_routes())
        .route("/user/", user::list_route())
        .merge(swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(router)
}
