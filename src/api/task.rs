use crate::domain::task::driving_ports::{TaskError, TaskPort};
use crate::dto::TransactionStatus;
use crate::external_connections::{ExternalConnectivity, TransactableExternalConnectivity};
use crate::routing_utils::{
    BasicErrorResponse, GenericErrorResponse, Json, NotFoundResponse, Query,
    ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{MethodRouter, delete, get, post, put};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(
    paths(all_tasks, task_by_id, create_task, update_task, delete_task),
    components(schemas(dto::task::Task, dto::task::CreateTask, dto::task::UpdateTask))
)]
/// Defines the OpenAPI documentation for the task API
pub struct TaskApi;
/// Constant used to group task endpoints in OpenAPI documentation
pub const TASK_API_GROUP: &str = "Tasks";

/// Creates a router for endpoints under the "/task" group of APIs
pub fn task_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route("/", list_route())
        .route(
            "/task_id",
            get(
                |State(app_state): AppState, Query(query): Query<dto::task::TaskIdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    task_by_id(query.task_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/create",
            post(
                |State(app_state): AppState,
                 Query(owner): Query<dto::user::UserIdQuery>,
                 Json(new_task): Json<dto::task::CreateTask>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    create_task(owner.user_id, new_task, &mut ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/update",
            put(
                |State(app_state): AppState,
                 Query(query): Query<dto::task::UpdateTaskQuery>,
                 Json(update): Json<dto::task::UpdateTask>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    update_task(
                        query.task_id,
                        query.completed,
                        update,
                        &mut ext_cxn,
                        &task_service,
                    )
                    .await
                },
            ),
        )
        .route(
            "/delete",
            delete(
                |State(app_state): AppState, Query(query): Query<dto::task::TaskIdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    delete_task(query.task_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
}

/// Handler for listing every task. Mounted at both "/task" and "/task/".
pub fn list_route() -> MethodRouter<Arc<SharedData>> {
    get(|State(app_state): AppState| async move {
        let mut ext_cxn = app_state.ext_cxn.clone();
        let task_service = domain::task::TaskService {};

        all_tasks(&mut ext_cxn, &task_service).await
    })
}

/// Turns a failed task operation into the HTTP response the client sees
fn task_error_response(err: TaskError) -> ErrorResponse {
    match err {
        TaskError::TaskDoesNotExist => NotFoundResponse("No such task").into(),
        TaskError::UserDoesNotExist => NotFoundResponse("No such user").into(),
        TaskError::PortError(cause) => GenericErrorResponse(cause).into(),
    }
}

#[utoipa::path(
    get,
    path = "/task",
    tag = TASK_API_GROUP,
    responses(
        (status = 200, description = "Every task in the system", body = Vec<dto::task::Task>),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip_all)]
/// Retrieves every task, whoever owns it
async fn all_tasks(
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::task::Task>>, ErrorResponse> {
    info!("Requested all tasks");
    let task_read = persistence::db_task_driven_ports::DbTaskReader;

    let tasks = task_service
        .all_tasks(&mut *ext_cxn, &task_read)
        .await
        .map_err(task_error_response)?;

    Ok(Json(
        tasks.into_iter().map(dto::task::Task::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/task/task_id",
    tag = TASK_API_GROUP,
    params(dto::task::TaskIdQuery),
    responses(
        (status = 200, description = "The requested task", body = dto::task::Task),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip(ext_cxn, task_service))]
/// Retrieves a single task
async fn task_by_id(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::task::Task>, ErrorResponse> {
    info!("Requested task {task_id}");
    let task_read = persistence::db_task_driven_ports::DbTaskReader;

    let task = task_service
        .task_by_id(task_id, &mut *ext_cxn, &task_read)
        .await
        .map_err(task_error_response)?;

    Ok(Json(dto::task::Task::from(task)))
}

#[utoipa::path(
    post,
    path = "/task/create",
    tag = TASK_API_GROUP,
    params(dto::user::UserIdQuery),
    request_body = dto::task::CreateTask,
    responses(
        (status = 201, description = "Task was created", body = TransactionStatus),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip(new_task, ext_cxn, task_service))]
/// Creates a task owned by the given user. The task starts out incomplete and gets a slug
/// derived from its title.
async fn create_task(
    user_id: i32,
    new_task: dto::task::CreateTask,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, Json<TransactionStatus>), ErrorResponse> {
    info!("Creating task {new_task} for user {user_id}");
    new_task.validate().map_err(ValidationErrorResponse::from)?;

    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let task_write = persistence::db_task_driven_ports::DbTaskWriter;
    let domain_task = domain::task::NewTask::from(new_task);

    task_service
        .create_task_for_user(
            user_id,
            &domain_task,
            &mut *ext_cxn,
            &user_detect,
            &task_write,
        )
        .await
        .map_err(task_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionStatus::new(StatusCode::CREATED, "Successful")),
    ))
}

#[utoipa::path(
    put,
    path = "/task/update",
    tag = TASK_API_GROUP,
    params(dto::task::UpdateTaskQuery),
    request_body = dto::task::UpdateTask,
    responses(
        (status = 200, description = "Task was updated", body = TransactionStatus),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip(update, ext_cxn, task_service))]
/// Replaces a task's title, content, priority and completion flag. The slug stays as it was.
async fn update_task(
    task_id: i32,
    completed: bool,
    update: dto::task::UpdateTask,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<TransactionStatus>, ErrorResponse> {
    info!("Updating task {task_id}");
    update.validate().map_err(ValidationErrorResponse::from)?;

    let task_read = persistence::db_task_driven_ports::DbTaskReader;
    let task_write = persistence::db_task_driven_ports::DbTaskWriter;
    let domain_update = update.into_domain(completed);

    task_service
        .update_task(
            task_id,
            &domain_update,
            &mut *ext_cxn,
            &task_read,
            &task_write,
        )
        .await
        .map_err(task_error_response)?;

    Ok(Json(TransactionStatus::new(
        StatusCode::OK,
        "Task update is successful!",
    )))
}

#[utoipa::path(
    delete,
    path = "/task/delete",
    tag = TASK_API_GROUP,
    params(dto::task::TaskIdQuery),
    responses(
        (status = 200, description = "Task was deleted", body = TransactionStatus),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip(ext_cxn, task_service))]
/// Permanently removes a task
async fn delete_task(
    task_id: i32,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<TransactionStatus>, ErrorResponse> {
    info!("Deleting task {task_id}");
    let task_read = persistence::db_task_driven_ports::DbTaskReader;
    let task_write = persistence::db_task_driven_ports::DbTaskWriter;

    task_service
        .delete_task(task_id, &mut *ext_cxn, &task_read, &task_write)
        .await
        .map_err(task_error_response)?;

    Ok(Json(TransactionStatus::new(
        StatusCode::OK,
        "Task delete is successful!",
    )))
}
