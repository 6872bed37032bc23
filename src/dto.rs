pub mod task;
pub mod user;

use crate::routing_utils::{BasicErrorResponse, ExtraInfo, ValidationErrorSchema};
use axum::http::StatusCode;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Acknowledgement returned by endpoints which change stored data. `status_code` mirrors the
/// HTTP status of the response.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize, Debug, PartialEq, Eq))]
pub struct TransactionStatus {
    #[schema(example = 200)]
    pub status_code: u16,
    #[schema(example = "Task update is successful!")]
    pub transaction: String,
}

impl TransactionStatus {
    pub fn new(status: StatusCode, transaction: &str) -> Self {
        TransactionStatus {
            status_code: status.as_u16(),
            transaction: transaction.to_owned(),
        }
    }
}

/// Schemas shared between groups of API routes
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(TransactionStatus, BasicErrorResponse, ExtraInfo, ValidationErrorSchema),
        responses(BasicErrorResponse),
    )
)]
pub struct OpenApiSchemas;
