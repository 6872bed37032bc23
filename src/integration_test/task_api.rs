use super::test_util::{self, empty_request, json_request, send};
use crate::api::test_util::{ErrorBody, deserialize_body};
use crate::dto::{self, TransactionStatus};
use axum::http::{Method, StatusCode};
use speculoos::prelude::*;

fn task_body(title: &str, content: &str, priority: i32) -> dto::task::CreateTask {
    dto::task::CreateTask {
        title: title.to_owned(),
        content: content.to_owned(),
        priority,
    }
}

fn update_body(title: &str, content: &str, priority: i32) -> dto::task::UpdateTask {
    dto::task::UpdateTask {
        title: title.to_owned(),
        content: content.to_owned(),
        priority,
    }
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn task_lifecycle() {
    test_util::prepare_db_and_test(|db| async move {
        let router = test_util::test_router(db);
        let user_id = test_util::create_user(&router, "Jane", "Doe").await;

        let response = send(
            &router,
            json_request(
                Method::POST,
                &format!("/task/create?user_id={user_id}"),
                &task_body("Buy milk", "2%", 1),
            ),
        )
        .await;
        assert_eq!(StatusCode::CREATED, response.status());
        let status: TransactionStatus = deserialize_body(response.into_body()).await;
        assert_eq!(TransactionStatus::new(StatusCode::CREATED, "Successful"), status);

        let response = send(&router, empty_request(Method::GET, "/task/")).await;
        assert_eq!(StatusCode::OK, response.status());
        let tasks: Vec<dto::task::Task> = deserialize_body(response.into_body()).await;
        assert_that!(tasks).has_length(1);
        let created = &tasks[0];
        assert_eq!("buy-milk", created.slug);
        assert_eq!(user_id, created.user_id);
        assert!(!created.completed);
        let task_id = created.id;

        let response = send(
            &router,
            json_request(
                Method::PUT,
                &format!("/task/update?task_id={task_id}&completed=true"),
                &update_body("Buy milk", "whole", 2),
            ),
        )
        .await;
        assert_eq!(StatusCode::OK, response.status());
        let status: TransactionStatus = deserialize_body(response.into_body()).await;
        assert_eq!(
            TransactionStatus::new(StatusCode::OK, "Task update is successful!"),
            status
        );

        let response = send(
            &router,
            empty_request(Method::GET, &format!("/task/task_id?task_id={task_id}")),
        )
        .await;
        assert_eq!(StatusCode::OK, response.status());
        let updated: dto::task::Task = deserialize_body(response.into_body()).await;
        assert!(updated.completed);
        assert_eq!("whole", updated.content);
        assert_eq!(2, updated.priority);

        let response = send(
            &router,
            empty_request(Method::DELETE, &format!("/task/delete?task_id={task_id}")),
        )
        .await;
        assert_eq!(StatusCode::OK, response.status());
        let status: TransactionStatus = deserialize_body(response.into_body()).await;
        assert_eq!(
            TransactionStatus::new(StatusCode::OK, "Task delete is successful!"),
            status
        );

        let response = send(
            &router,
            empty_request(Method::GET, &format!("/task/task_id?task_id={task_id}")),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let body: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("No such task", body.error_description);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn renaming_a_task_keeps_its_slug() {
    test_util::prepare_db_and_test(|db| async move {
        let router = test_util::test_router(db);
        let user_id = test_util::create_user(&router, "Jane", "Doe").await;

        send(
            &router,
            json_request(
                Method::POST,
                &format!("/task/create?user_id={user_id}"),
                &task_body("Water the plants", "", 3),
            ),
        )
        .await;
        let response = send(
            &router,
            empty_request(Method::GET, &format!("/user/tasks?user_id={user_id}")),
        )
        .await;
        let tasks: Vec<dto::task::Task> = deserialize_body(response.into_body()).await;
        let task_id = tasks[0].id;

        let response = send(
            &router,
            json_request(
                Method::PUT,
                &format!("/task/update?task_id={task_id}&completed=false"),
                &update_body("Water the cactus", "", 3),
            ),
        )
        .await;
        assert_eq!(StatusCode::OK, response.status());

        let response = send(
            &router,
            empty_request(Method::GET, &format!("/task/task_id?task_id={task_id}")),
        )
        .await;
        let renamed: dto::task::Task = deserialize_body(response.into_body()).await;
        assert_eq!("Water the cactus", renamed.title);
        assert_eq!("water-the-plants", renamed.slug);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn creating_a_task_for_a_missing_user_writes_nothing() {
    test_util::prepare_db_and_test(|db| async move {
        let router = test_util::test_router(db);

        let response = send(
            &router,
            json_request(
                Method::POST,
                "/task/create?user_id=404",
                &task_body("Buy milk", "2%", 1),
            ),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let body: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("No such user", body.error_description);

        let response = send(&router, empty_request(Method::GET, "/task")).await;
        let tasks: Vec<dto::task::Task> = deserialize_body(response.into_body()).await;
        assert_that!(tasks).is_empty();
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn missing_tasks_cant_be_updated_or_deleted() {
    test_util::prepare_db_and_test(|db| async move {
        let router = test_util::test_router(db);

        let response = send(
            &router,
            json_request(
                Method::PUT,
                "/task/update?task_id=999&completed=true",
                &update_body("Buy milk", "whole", 2),
            ),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(
            &router,
            empty_request(Method::DELETE, "/task/delete?task_id=999"),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let body: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("No such task", body.error_description);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn rejects_unreadable_queries() {
    test_util::prepare_db_and_test(|db| async move {
        let router = test_util::test_router(db);

        let response = send(&router, empty_request(Method::GET, "/task/task_id")).await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let body: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_query", body.error_code);

        let response = send(
            &router,
            empty_request(Method::GET, "/task/task_id?task_id=seven"),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
    });
}
