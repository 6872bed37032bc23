use crate::app_env::test::TEST_DB_URL;
use crate::{SharedData, api, dto, persistence};
use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response, StatusCode};
use dotenv::dotenv;
use futures::FutureExt;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use serde::Serialize;
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A throwaway database which exists for the duration of a single test
struct TestDatabase {
    name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let schema_id: u32 = thread_rng().gen_range(10_000..99_999);
        let name = format!("test_db_{schema_id}");

        let mut conn = PgConnection::connect(base_url).await?;
        let result = sqlx::query(format!("CREATE DATABASE {name}").as_str())
            .execute(&mut conn)
            .await;
        conn.close().await?;
        result?;

        Ok(Self { name })
    }

    async fn drop_database(self, base_url: &str) -> Result<(), sqlx::Error> {
        let mut conn = PgConnection::connect(base_url).await?;
        let result = sqlx::query(format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name).as_str())
            .execute(&mut conn)
            .await;
        conn.close().await?;
        result?;

        Ok(())
    }
}

/// Creates a fresh, fully migrated database for a test and hands the test a pool connected to it.
/// The database is dropped once the test finishes, even if it panics.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_url = env::var(TEST_DB_URL).unwrap_or_else(|_| {
            panic!("You must provide the {TEST_DB_URL} environment variable as the base postgres connection string")
        });
        let test_db = TestDatabase::create(&base_url)
            .await
            .unwrap_or_else(|db_err| panic!("Failed to start test database: {db_err}"));

        let pool = persistence::connect_sqlx(&format!("{base_url}/{}", test_db.name))
            .await
            .expect("Could not connect to the test database");
        persistence::migrate(&pool)
            .await
            .expect("Could not migrate the test database");

        let outcome = AssertUnwindSafe(test_fn(pool.clone())).catch_unwind().await;

        pool.close().await;
        let db_name = test_db.name.clone();
        if let Err(err) = test_db.drop_database(&base_url).await {
            println!("Warning: failed to drop test database {db_name}, you may need to do it manually. Error: {err}");
        }

        if let Err(test_panic) = outcome {
            panic::resume_unwind(test_panic);
        }
    });
}

/// Builds the full application router on top of the given database
pub fn test_router(db: PgPool) -> Router {
    api::build_router(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    }))
}

/// Runs a single request through the router
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed to produce a response")
}

pub fn json_request(method: Method, uri: &str, body: &impl Serialize) -> Request<Body> {
    let payload = serde_json::to_vec(body).expect("Could not serialize request body");

    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload))
        .expect("Could not build request")
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Could not build request")
}

/// Creates a user through the API and returns their ID
pub async fn create_user(router: &Router, first_name: &str, last_name: &str) -> i32 {
    let response = send(
        router,
        json_request(
            Method::POST,
            "/user/create",
            &dto::user::NewUser {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
            },
        ),
    )
    .await;
    assert_eq!(StatusCode::CREATED, response.status());

    let inserted: dto::user::InsertedUser =
        api::test_util::deserialize_body(response.into_body()).await;
    inserted.id
}
