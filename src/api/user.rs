use crate::domain::task::driving_ports::{TaskError, TaskPort};
use crate::domain::user::driving_ports::{CreateUserError, UserPort};
use crate::external_connections::{ExternalConnectivity, TransactableExternalConnectivity};
use crate::routing_utils::{
    AlreadyExistsResponse, BasicErrorResponse, GenericErrorResponse, Json, NotFoundResponse,
    Query, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{MethodRouter, get, post};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(
    paths(get_users, get_user, create_user, tasks_for_user),
    components(schemas(dto::user::User, dto::user::NewUser, dto::user::InsertedUser))
)]
/// Defines the OpenAPI documentation for the user API
pub struct UsersApi;
/// Constant used to group user endpoints in OpenAPI documentation
pub const USER_API_GROUP: &str = "Users";

/// Creates a router for endpoints under the "/user" group of APIs
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route("/", list_route())
        .route(
            "/user_id",
            get(
                |State(app_state): AppState, Query(query): Query<dto::user::UserIdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    get_user(query.user_id, &mut ext_cxn, &user_service).await
                },
            ),
        )
        .route(
            "/create",
            post(
                |State(app_state): AppState, Json(new_user): Json<dto::user::NewUser>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    create_user(new_user, &mut ext_cxn, &user_service).await
                },
            ),
        )
        .route(
            "/tasks",
            get(
                |State(app_state): AppState, Query(query): Query<dto::user::UserIdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    tasks_for_user(query.user_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
}

/// Handler for listing every user. Mounted at both "/user" and "/user/".
pub fn list_route() -> MethodRouter<Arc<SharedData>> {
    get(|State(app_state): AppState| async move {
        let mut ext_cxn = app_state.ext_cxn.clone();
        let user_service = domain::user::UserService {};

        get_users(&mut ext_cxn, &user_service).await
    })
}

#[utoipa::path(
    get,
    path = "/user",
    tag = USER_API_GROUP,
    responses(
        (status = 200, description = "Every user in the system", body = Vec<dto::user::User>),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip_all)]
/// Retrieves a list of all the users in the system.
async fn get_users(
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<Json<Vec<dto::user::User>>, ErrorResponse> {
    info!("Requested users");
    let user_reader = persistence::db_user_driven_ports::DbReadUsers;

    let users = user_service
        .get_users(&mut *ext_cxn, &user_reader)
        .await
        .map_err(GenericErrorResponse)?;

    Ok(Json(users.into_iter().map(dto::user::User::from).collect()))
}

#[utoipa::path(
    get,
    path = "/user/user_id",
    tag = USER_API_GROUP,
    params(dto::user::UserIdQuery),
    responses(
        (status = 200, description = "The requested user", body = dto::user::User),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip(ext_cxn, user_service))]
/// Retrieves a single user
async fn get_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<Json<dto::user::User>, ErrorResponse> {
    info!("Requested user {user_id}");
    let user_reader = persistence::db_user_driven_ports::DbReadUsers;

    let user = user_service
        .get_user(user_id, &mut *ext_cxn, &user_reader)
        .await
        .map_err(GenericErrorResponse)?
        .ok_or(NotFoundResponse("No such user"))?;

    Ok(Json(dto::user::User::from(user)))
}

#[utoipa::path(
    post,
    path = "/user/create",
    tag = USER_API_GROUP,
    request_body = dto::user::NewUser,
    responses(
        (status = 201, description = "User was created", body = dto::user::InsertedUser),
        (status = 400, response = BasicErrorResponse),
        (status = 409, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip_all)]
/// Creates a user. No two users may share the same first and last name.
async fn create_user(
    new_user: dto::user::NewUser,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    user_service: &impl UserPort,
) -> Result<(StatusCode, Json<dto::user::InsertedUser>), ErrorResponse> {
    info!("Attempt to create user: {new_user}");
    new_user.validate().map_err(ValidationErrorResponse::from)?;

    let user_writer = persistence::db_user_driven_ports::DbWriteUsers;
    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let domain_user = domain::user::CreateUser::from(new_user);

    let created_id = user_service
        .create_user(&domain_user, &mut *ext_cxn, &user_writer, &user_detect)
        .await
        .map_err(|err| -> ErrorResponse {
            match err {
                CreateUserError::UserAlreadyExists => {
                    AlreadyExistsResponse("That user already exists.").into()
                }
                CreateUserError::PortError(cause) => GenericErrorResponse(cause).into(),
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(dto::user::InsertedUser { id: created_id }),
    ))
}

#[utoipa::path(
    get,
    path = "/user/tasks",
    tag = USER_API_GROUP,
    params(dto::user::UserIdQuery),
    responses(
        (status = 200, description = "Every task the user owns", body = Vec<dto::task::Task>),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
#[instrument(skip(ext_cxn, task_service))]
/// Retrieves the set of tasks owned by a user
async fn tasks_for_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::task::Task>>, ErrorResponse> {
    info!("Get tasks for user {user_id}");
    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let task_read = persistence::db_task_driven_ports::DbTaskReader;

    let tasks = task_service
        .tasks_for_user(user_id, &mut *ext_cxn, &user_detect, &task_read)
        .await
        .map_err(|err| -> ErrorResponse {
            match err {
                TaskError::PortError(cause) => GenericErrorResponse(cause).into(),
                TaskError::UserDoesNotExist | TaskError::TaskDoesNotExist => {
                    NotFoundResponse("No such user").into()
                }
            }
        })?;

    Ok(Json(tasks.into_iter().map(dto::task::Task::from).collect()))
}
